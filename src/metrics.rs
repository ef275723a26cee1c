//! Health metric derivation.
//!
//! Combines the normalized emotion distribution, acoustic features, and the
//! primary raw emotion label into bounded 0-100 metrics. Pure arithmetic over
//! named calibration constants; every published value is clamped to [0, 100]
//! and rounded to 2 decimals.

use serde::{Deserialize, Serialize};

use crate::acoustic::AcousticFeatures;
use crate::emotion::{EmotionLabel, NormalizedEmotions};
use crate::round2;

/// RMS amplitude treated as 100% energy (typical speech level).
pub const RMS_FULL_SCALE: f32 = 0.08;

/// Weight of spectral flatness (as a percentage) in the stress level.
const FLATNESS_STRESS_WEIGHT: f32 = 0.4;

/// Weight of signal energy in the energy level.
const ENERGY_RMS_WEIGHT: f32 = 0.6;

/// Weight of the happy+calm share in the energy level.
const ENERGY_MOOD_WEIGHT: f32 = 0.2;

/// Placeholder hydration estimate; not derived from any signal.
pub const HYDRATION_PLACEHOLDER: f32 = 55.0;

/// Wellness weights: inverted stress, energy, hydration.
const WELLNESS_STRESS_WEIGHT: f32 = 0.55;
const WELLNESS_ENERGY_WEIGHT: f32 = 0.35;
const WELLNESS_HYDRATION_WEIGHT: f32 = 0.10;

/// Clarity: flatness penalty and energy bonus applied to inverted ZCR.
const CLARITY_FLATNESS_PENALTY: f32 = 30.0;
const CLARITY_ENERGY_WEIGHT: f32 = 0.1;

/// Fatigue triggers (strict comparisons).
const FATIGUE_STRESS_ABOVE: f32 = 65.0;
const FATIGUE_ENERGY_BELOW: f32 = 35.0;
const FATIGUE_TIRED_ABOVE: f32 = 40.0;

/// Voice tone reads tense at or above this stress level.
const TENSE_STRESS_LEVEL: f32 = 40.0;

/// Speech-rate classification thresholds (BPM).
const FAST_RATE_BPM: f32 = 160.0;
const NORMAL_RATE_BPM: f32 = 80.0;

/// Constrain a value to the inclusive [0, 100] range.
pub fn clamp(x: f32) -> f32 {
    x.max(0.0).min(100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechRate {
    Slow,
    Normal,
    Fast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceTone {
    Relaxed,
    Tense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreathingRate {
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceQuality {
    pub clarity: f32,
    pub volume_consistency: f32,
    pub speech_rate: SpeechRate,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthIndicators {
    /// Fixed placeholder; breathing is not derived from the signal.
    pub breathing_rate: BreathingRate,
    pub voice_tone: VoiceTone,
    pub fatigue_detected: bool,
}

/// Derived wellness metrics for one audio segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthMetrics {
    pub wellness_score: f32,
    pub stress_level: f32,
    pub energy_level: f32,
    pub hydration_level: f32,
    pub voice_quality: VoiceQuality,
    pub health_indicators: HealthIndicators,
}

/// Additive wellness adjustment for the primary emotion (case-insensitive).
/// Unknown or absent labels adjust by 0.
fn wellness_adjustment(primary_emotion: Option<&str>) -> f32 {
    match primary_emotion.and_then(EmotionLabel::parse) {
        Some(EmotionLabel::Happy) => 15.0,
        Some(EmotionLabel::Calm) => 10.0,
        Some(EmotionLabel::Sad) => -30.0,
        Some(EmotionLabel::Anger) | Some(EmotionLabel::Fear) | Some(EmotionLabel::Disgust) => {
            -35.0
        }
        Some(EmotionLabel::Surprised) => -5.0,
        Some(EmotionLabel::Neutral) | None => 0.0,
    }
}

/// Derive all health metrics.
///
/// Pure function of its inputs: no state, no I/O, identical inputs always
/// yield identical output.
pub fn derive_health_metrics(
    emotions: &NormalizedEmotions,
    features: &AcousticFeatures,
    primary_emotion: Option<&str>,
) -> HealthMetrics {
    let flatness = features.spectral_flatness;
    let stress_level = clamp(emotions.stressed + flatness * 100.0 * FLATNESS_STRESS_WEIGHT);

    let energy_from_rms = clamp(features.rms / RMS_FULL_SCALE * 100.0);
    let energy_level = clamp(
        energy_from_rms * ENERGY_RMS_WEIGHT
            + (emotions.happy + emotions.calm) * ENERGY_MOOD_WEIGHT,
    );

    let hydration_level = HYDRATION_PLACEHOLDER;

    let clarity = clamp(
        (1.0 - features.zcr) * 100.0 - flatness * CLARITY_FLATNESS_PENALTY
            + energy_from_rms * CLARITY_ENERGY_WEIGHT,
    );

    let fatigue_detected = stress_level > FATIGUE_STRESS_ABOVE
        || energy_level < FATIGUE_ENERGY_BELOW
        || emotions.tired > FATIGUE_TIRED_ABOVE;

    let base_wellness = clamp(
        (100.0 - stress_level) * WELLNESS_STRESS_WEIGHT
            + energy_level * WELLNESS_ENERGY_WEIGHT
            + hydration_level * WELLNESS_HYDRATION_WEIGHT,
    );
    let wellness_score = clamp(base_wellness + wellness_adjustment(primary_emotion));

    let speech_rate_bpm = features.speech_rate_bpm.unwrap_or(0.0);
    let speech_rate = if speech_rate_bpm > FAST_RATE_BPM {
        SpeechRate::Fast
    } else if speech_rate_bpm > NORMAL_RATE_BPM {
        SpeechRate::Normal
    } else {
        SpeechRate::Slow
    };

    let voice_tone = if stress_level >= TENSE_STRESS_LEVEL {
        VoiceTone::Tense
    } else {
        VoiceTone::Relaxed
    };

    HealthMetrics {
        wellness_score: round2(wellness_score),
        stress_level: round2(stress_level),
        energy_level: round2(energy_level),
        hydration_level: round2(hydration_level),
        voice_quality: VoiceQuality {
            clarity: round2(clarity),
            volume_consistency: round2(clamp(energy_from_rms)),
            speech_rate,
        },
        health_indicators: HealthIndicators {
            breathing_rate: BreathingRate::Normal,
            voice_tone,
            fatigue_detected,
        },
    }
}
