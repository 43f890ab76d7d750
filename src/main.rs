use luxury_roulette::{RevealStage, SpinPhase, WheelWidget, WidgetEvent};
use std::thread;
use std::time::Duration;

// Pump cadence for every schedule (sequencer look-ahead, tick cascade,
// reveal delay, particles). 10ms keeps us well under the 25ms the
// sequencer needs.
const PUMP_INTERVAL: Duration = Duration::from_millis(10);

/// Scripted demo: ambient loop, one rigged spin, egg reveal, redirect.
fn main() {
    println!("=== Roleta da Sorte ===");
    println!("Demo: ambient loop + spin + reveal\n");

    let mut widget = WheelWidget::new();
    if widget.audio_is_live() {
        println!("Audio device connected");
    } else {
        println!("No audio device - running silent");
    }

    // Let the ambient groove establish itself
    println!("\nAmbient loop...");
    pump_for(&mut widget, Duration::from_secs(3));

    println!("GIRAR! (spinning for 4 seconds)");
    widget.spin();

    // A second trigger while spinning is ignored, like the disabled button
    assert!(!widget.spin());

    while widget.spin_phase() == SpinPhase::Spinning {
        for event in widget.update() {
            if let WidgetEvent::SpinLanded(outcome) = event {
                let name = &widget.config().segments[outcome.segment].name;
                println!("Landed on segment {}: {}", outcome.segment, name);
            }
        }
        thread::sleep(PUMP_INTERVAL);
    }

    // Reveal modal: continue, hammer an egg, wait for the crack reveal
    println!("\nModal: {}", widget.reveal().prize_name());
    widget.advance_reveal();
    println!("Choosing the middle egg...");
    widget.choose_egg(1);

    while widget.reveal().stage() != RevealStage::Revealed {
        for event in widget.update() {
            if event == WidgetEvent::PrizeRevealed {
                println!("PRÊMIO REVELADO: {}", widget.reveal().prize_name());
            }
        }
        thread::sleep(PUMP_INTERVAL);
    }

    // Let the fanfare tail ring out
    pump_for(&mut widget, Duration::from_secs(2));

    if let Some(WidgetEvent::Redirect(url)) = widget.redeem() {
        println!("\nRESGATAR PRÊMIO → {}", url);
    }

    println!("\n=== Fim ===");
}

fn pump_for(widget: &mut WheelWidget, duration: Duration) {
    let deadline = std::time::Instant::now() + duration;
    while std::time::Instant::now() < deadline {
        widget.update();
        thread::sleep(PUMP_INTERVAL);
    }
}
