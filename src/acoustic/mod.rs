//! Acoustic feature extraction.
//!
//! Computes the small feature set the health metrics consume:
//!
//! - **rms** - mean short-time RMS energy
//! - **zcr** - mean zero-crossing rate
//! - **spectral_flatness** - mean Hann-windowed flatness (tonal 0 ... noisy 1)
//! - **median_f0_hz** - median pitch over voiced frames, 50-400 Hz
//! - **speech_rate_bpm** - tempo from onset strength
//!
//! Extraction never fails: an empty signal yields zeros and absent optionals,
//! and pitch/tempo estimation are isolated so one coming up empty cannot
//! disturb the others.
//!
//! Callers are expected to hand in sanitized audio (non-finite samples already
//! replaced); see the binary's WAV loading for the boundary that does this.

mod pitch;
mod spectral;
mod tempo;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use pitch::median_f0;
pub use spectral::{mean_flatness, mean_rms, mean_zcr};
pub use tempo::estimate_tempo;

/// Signal-level features for one audio segment.
///
/// `median_f0_hz` and `speech_rate_bpm` are absent when the signal is unvoiced
/// or no stable tempo exists; the numeric fields degrade to 0.0 on silence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AcousticFeatures {
    pub rms: f32,
    pub zcr: f32,
    pub spectral_flatness: f32,
    pub median_f0_hz: Option<f32>,
    pub speech_rate_bpm: Option<f32>,
}

/// Extract all acoustic features from a mono signal.
///
/// Degenerate input (empty signal, zero sample rate) returns the zero/absent
/// default rather than erroring.
pub fn extract(samples: &[f32], sample_rate: u32) -> AcousticFeatures {
    if samples.is_empty() || sample_rate == 0 {
        debug!(
            len = samples.len(),
            sample_rate, "degenerate audio input, returning default features"
        );
        return AcousticFeatures::default();
    }

    let rms = mean_rms(samples);
    let zcr = mean_zcr(samples);
    let spectral_flatness = mean_flatness(samples);

    let median_f0_hz = median_f0(samples, sample_rate);
    if median_f0_hz.is_none() {
        debug!("no confident pitch detected");
    }
    let speech_rate_bpm = estimate_tempo(samples, sample_rate);
    if speech_rate_bpm.is_none() {
        debug!("no stable tempo detected");
    }

    AcousticFeatures {
        rms,
        zcr,
        spectral_flatness,
        median_f0_hz,
        speech_rate_bpm,
    }
}
