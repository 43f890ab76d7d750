// Campaign configuration - the fixed setup of one promotion
//
// Everything the widget shows or decides is configuration, not computation:
// the segment set, the winning index, the offer URL, tempo and volumes.
// Defaults reproduce the reference campaign; an optional JSON file overrides
// them. There is deliberately no entropy anywhere near the outcome.

use crate::wheel::segment::Segment;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Campaign needs at least two segments")]
    TooFewSegments,

    #[error("Exactly one segment must be flagged as winner (found {0})")]
    WinnerCount(usize),

    #[error("Spin duration must be positive")]
    InvalidDuration,
}

/// Full configuration of one campaign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignConfig {
    pub segments: Vec<Segment>,

    /// Total spin duration, milliseconds
    pub spin_duration_ms: u64,
    /// Whole rotations before the wheel settles
    pub full_turns: u32,

    /// Ambient loop tempo
    pub bpm: f64,
    /// Bars between chord changes
    pub chord_change_bars: u32,
    /// Ambient bus gain
    pub ambient_level: f32,

    pub tick_volume: f32,
    pub whoosh_volume: f32,
    pub clack_volume: f32,

    /// Terminal redirect target of the reveal flow
    pub offer_url: String,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            segments: vec![
                Segment::new(1, "iphone.png", "iPhone 16 Pro Max", true),
                Segment::new(2, "galaxy.png", "Samsung Galaxy S25 Ultra", false),
                Segment::new(3, "voucher.png", "Voucher Especial", false),
                Segment::new(4, "choro.png", "Emoji Choro", false),
                Segment::new(5, "777.png", "Prêmio R$777", false),
                Segment::new(6, "presente.png", "Presente Surpresa", false),
            ],
            spin_duration_ms: 4000,
            full_turns: 5,
            bpm: 126.0,
            chord_change_bars: 1,
            ambient_level: 0.08,
            tick_volume: 0.22,
            whoosh_volume: 0.18,
            clack_volume: 0.40,
            offer_url: "https://viralizeishop.online/iphone16".to_string(),
        }
    }
}

impl CampaignConfig {
    /// Load and validate a JSON campaign file
    ///
    /// Missing fields fall back to the defaults, so a campaign file only
    /// needs to spell out what it changes.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the campaign invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.segments.len() < 2 {
            return Err(ConfigError::TooFewSegments);
        }
        let winners = self.segments.iter().filter(|s| s.is_winner).count();
        if winners != 1 {
            return Err(ConfigError::WinnerCount(winners));
        }
        if self.spin_duration_ms == 0 {
            return Err(ConfigError::InvalidDuration);
        }
        Ok(())
    }

    /// Index of the (single) winning segment
    pub fn winning_index(&self) -> usize {
        self.segments
            .iter()
            .position(|s| s.is_winner)
            .expect("Validated config has a winner")
    }

    pub fn winning_segment(&self) -> &Segment {
        &self.segments[self.winning_index()]
    }

    pub fn spin_duration_secs(&self) -> f64 {
        self.spin_duration_ms as f64 / 1000.0
    }
}
