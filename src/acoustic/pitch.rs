//! Median fundamental frequency via McLeod pitch detection.
//!
//! Frames the signal, runs the McLeod detector per frame, keeps detections in
//! the speaking range (50-400 Hz), and reports the median over voiced frames.
//! No voiced frame means no estimate, not an error.

use pitch_detection::detector::mcleod::McLeodDetector;
use pitch_detection::detector::PitchDetector;

use super::spectral::{FRAME_SIZE, HOP_SIZE};

/// Minimum pitch in Hz (speaking voice range)
const MIN_PITCH: f32 = 50.0;

/// Maximum pitch in Hz (speaking voice range)
const MAX_PITCH: f32 = 400.0;

/// Power threshold for pitch detection
const POWER_THRESHOLD: f32 = 0.8;

/// Clarity threshold for pitch detection
const CLARITY_THRESHOLD: f32 = 0.5;

/// Median F0 in Hz over all frames with a confident pitch.
///
/// Returns `None` when the signal is shorter than one frame or no frame yields
/// a pitch in range.
pub fn median_f0(samples: &[f32], sample_rate: u32) -> Option<f32> {
    if samples.len() < FRAME_SIZE || sample_rate == 0 {
        return None;
    }

    let mut detector = McLeodDetector::new(FRAME_SIZE, FRAME_SIZE / 2);
    let mut pitches = Vec::new();

    let mut start = 0;
    while start + FRAME_SIZE <= samples.len() {
        let frame = &samples[start..start + FRAME_SIZE];
        if let Some(pitch) =
            detector.get_pitch(frame, sample_rate as usize, POWER_THRESHOLD, CLARITY_THRESHOLD)
        {
            if pitch.frequency >= MIN_PITCH && pitch.frequency <= MAX_PITCH {
                pitches.push(pitch.frequency);
            }
        }
        start += HOP_SIZE;
    }

    if pitches.is_empty() {
        return None;
    }

    pitches.sort_by(f32::total_cmp);
    let mid = pitches.len() / 2;
    let median = if pitches.len() % 2 == 0 {
        (pitches[mid - 1] + pitches[mid]) / 2.0
    } else {
        pitches[mid]
    };
    Some(median)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    /// Generate a sine wave at a given frequency
    fn generate_sine(freq: f32, sample_rate: usize, duration_ms: u32) -> Vec<f32> {
        let num_samples = (sample_rate as u32 * duration_ms / 1000) as usize;
        (0..num_samples)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (2.0 * PI * freq * t).sin() * 0.5
            })
            .collect()
    }

    #[test]
    fn test_median_f0_tracks_tone() {
        let samples = generate_sine(200.0, 16000, 1000);
        let f0 = median_f0(&samples, 16000).expect("tone should be voiced");
        assert!((f0 - 200.0).abs() < 20.0, "f0 = {}", f0);
    }

    #[test]
    fn test_median_f0_silence_is_none() {
        let samples = vec![0.0; 16000];
        assert!(median_f0(&samples, 16000).is_none());
    }

    #[test]
    fn test_median_f0_too_short_is_none() {
        let samples = generate_sine(200.0, 16000, 10); // well under one frame
        assert!(median_f0(&samples, 16000).is_none());
    }

    #[test]
    fn test_median_f0_rejects_out_of_range_tone() {
        // 1 kHz is above the speaking range cap of 400 Hz
        let samples = generate_sine(1000.0, 16000, 500);
        assert!(median_f0(&samples, 16000).is_none());
    }

    #[test]
    fn test_median_f0_two_pitches_lands_between() {
        let mut samples = generate_sine(150.0, 16000, 500);
        samples.extend(generate_sine(250.0, 16000, 500));
        let f0 = median_f0(&samples, 16000).expect("voiced");
        assert!(f0 > 100.0 && f0 < 300.0, "f0 = {}", f0);
    }
}
