// Filter - State Variable Filter (Chamberlin)
//
// Digital implementation of a 2-pole State Variable Filter with simultaneous
// low-pass, high-pass and band-pass outputs, plus a peaking mode built from
// the band-pass tap (used for the tick's 3 kHz presence boost).
//
// References:
// - Hal Chamberlin's "Musical Applications of Microprocessors" (1985)
// - https://www.earlevel.com/main/2003/03/02/the-digital-state-variable-filter/
//
// Characteristics:
// - 12dB/octave slope (2-pole)
// - Stable up to ~Fs/6 (8kHz @ 48kHz sample rate)
// - Independent frequency and Q control

use std::f32::consts::PI;

/// Filter type/mode
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FilterType {
    /// Low-pass filter (12dB/octave)
    #[default]
    LowPass,
    /// High-pass filter (12dB/octave)
    HighPass,
    /// Band-pass filter (6dB/octave on each side)
    BandPass,
    /// Peaking boost around the cutoff (gain in dB)
    Peaking { gain_db: f32 },
}

/// Filter parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    /// Center/cutoff frequency in Hz
    pub cutoff: f32,
    /// Resonance (Q factor: 0.5 - 20.0)
    pub resonance: f32,
    /// Filter type
    pub filter_type: FilterType,
}

impl FilterParams {
    pub fn lowpass(cutoff: f32) -> Self {
        Self {
            cutoff,
            resonance: 0.707,
            filter_type: FilterType::LowPass,
        }
    }

    pub fn highpass(cutoff: f32) -> Self {
        Self {
            cutoff,
            resonance: 0.707,
            filter_type: FilterType::HighPass,
        }
    }

    pub fn bandpass(cutoff: f32, q: f32) -> Self {
        Self {
            cutoff,
            resonance: q,
            filter_type: FilterType::BandPass,
        }
    }

    pub fn peaking(cutoff: f32, q: f32, gain_db: f32) -> Self {
        Self {
            cutoff,
            resonance: q,
            filter_type: FilterType::Peaking { gain_db },
        }
    }
}

/// State Variable Filter (Chamberlin) implementation
///
/// The one-shot voices never modulate their filters, so coefficients are
/// computed once at construction; there is no smoothing path.
#[derive(Debug, Clone)]
pub struct StateVariableFilter {
    filter_type: FilterType,

    // State variables
    low: f32,
    band: f32,

    // Coefficients
    f: f32, // frequency coefficient
    q: f32, // damping coefficient
}

impl StateVariableFilter {
    pub fn new(params: FilterParams, sample_rate: f32) -> Self {
        // Clamp cutoff to the stability limit of the Chamberlin topology
        let max_cutoff = sample_rate / 6.0;
        let safe_cutoff = params.cutoff.clamp(20.0, max_cutoff);

        // f = 2 * sin(π * fc / Fs)
        let f = 2.0 * (PI * safe_cutoff / sample_rate).sin();

        // q = 1/Q, clamped to keep the loop stable
        let q_factor = params.resonance.clamp(0.5, 20.0);
        let q = (1.0 / q_factor).clamp(0.01, 2.0);

        Self {
            filter_type: params.filter_type,
            low: 0.0,
            band: 0.0,
            f,
            q,
        }
    }

    /// Reset filter state (clear delay lines)
    pub fn reset(&mut self) {
        self.low = 0.0;
        self.band = 0.0;
    }

    /// Process a single sample through the filter
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        // Chamberlin State Variable Filter algorithm
        let high = input - self.low - self.q * self.band;
        self.band += self.f * high;
        self.low += self.f * self.band;

        match self.filter_type {
            FilterType::LowPass => self.low,
            FilterType::HighPass => high,
            FilterType::BandPass => self.band,
            FilterType::Peaking { gain_db } => {
                // Boost the band-pass tap on top of the dry signal
                let k = 10.0f32.powf(gain_db / 20.0) - 1.0;
                input + k * self.band
            }
        }
    }
}
