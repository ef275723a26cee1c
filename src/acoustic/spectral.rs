//! Framed spectral and time-domain features: RMS, ZCR, spectral flatness.
//!
//! All three are short-time measures averaged over the signal. Frames are
//! 1024 samples with a 512 hop (~64ms / 32ms at 16kHz). Spectral flatness is
//! the geometric/arithmetic mean ratio of the Hann-windowed power spectrum;
//! frames with negligible energy are skipped so silence reads as 0.0 rather
//! than as maximally flat.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use std::f32::consts::PI;

/// Analysis frame size (~64ms at 16kHz)
pub(crate) const FRAME_SIZE: usize = 1024;

/// Hop between frames (50% overlap)
pub(crate) const HOP_SIZE: usize = 512;

/// Frames with mean-square energy below this are treated as silence.
const SILENCE_ENERGY: f32 = 1e-10;

/// Epsilon guarding log(0) in the flatness ratio.
const FLATNESS_EPS: f32 = 1e-10;

/// Mean short-time RMS over the signal.
///
/// Signals shorter than one frame are measured as a single frame.
pub fn mean_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut sum = 0.0f32;
    let mut frames = 0usize;
    for frame in frame_iter(samples) {
        let energy: f32 = frame.iter().map(|s| s * s).sum::<f32>() / frame.len() as f32;
        sum += energy.sqrt();
        frames += 1;
    }
    sum / frames as f32
}

/// Mean zero-crossing rate over the signal, per-frame crossings / frame length.
pub fn mean_zcr(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut sum = 0.0f32;
    let mut frames = 0usize;
    for frame in frame_iter(samples) {
        let crossings = frame
            .windows(2)
            .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
            .count();
        sum += crossings as f32 / frame.len() as f32;
        frames += 1;
    }
    sum / frames as f32
}

/// Mean spectral flatness over non-silent frames, in [0, 1].
///
/// Returns 0.0 when the signal is shorter than one frame or entirely silent.
pub fn mean_flatness(samples: &[f32]) -> f32 {
    if samples.len() < FRAME_SIZE {
        return 0.0;
    }

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(FRAME_SIZE);

    let mut sum = 0.0f32;
    let mut frames = 0usize;
    let mut start = 0;
    while start + FRAME_SIZE <= samples.len() {
        let frame = &samples[start..start + FRAME_SIZE];
        start += HOP_SIZE;

        let energy: f32 = frame.iter().map(|s| s * s).sum::<f32>() / FRAME_SIZE as f32;
        if energy < SILENCE_ENERGY {
            continue;
        }

        // Hann window to reduce spectral leakage
        let mut spectrum: Vec<Complex<f32>> = frame
            .iter()
            .enumerate()
            .map(|(i, &s)| {
                let window = 0.5 - 0.5 * (2.0 * PI * i as f32 / FRAME_SIZE as f32).cos();
                Complex::new(s * window, 0.0)
            })
            .collect();
        fft.process(&mut spectrum);

        // Power spectrum over positive-frequency bins, DC excluded
        let bins = FRAME_SIZE / 2;
        let mut log_sum = 0.0f32;
        let mut lin_sum = 0.0f32;
        for c in &spectrum[1..=bins] {
            let power = c.norm_sqr();
            log_sum += (power + FLATNESS_EPS).ln();
            lin_sum += power;
        }
        let geo_mean = (log_sum / bins as f32).exp();
        let arith_mean = lin_sum / bins as f32 + FLATNESS_EPS;

        sum += (geo_mean / arith_mean).clamp(0.0, 1.0);
        frames += 1;
    }

    if frames == 0 {
        0.0
    } else {
        sum / frames as f32
    }
}

/// Full frames with hop; a signal shorter than one frame yields itself once.
fn frame_iter(samples: &[f32]) -> impl Iterator<Item = &[f32]> + '_ {
    let step = if samples.len() < FRAME_SIZE {
        samples.len().max(1)
    } else {
        HOP_SIZE
    };
    let size = FRAME_SIZE.min(samples.len());
    samples.windows(size).step_by(step)
}
