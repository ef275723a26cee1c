//! End-to-end report assembly.
//!
//! Wires the pipeline together: normalize emotions, extract acoustic features,
//! derive health metrics, generate recommendations, and package everything in
//! the JSON shape the response layer ships. Book-keeping fields (recording
//! ids, timestamps, processing time, model identity) belong to the boundary
//! and are not produced here.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::acoustic::{self, AcousticFeatures};
use crate::emotion::{NormalizedEmotions, RawEmotionScores};
use crate::error::AnalysisError;
use crate::metrics::{derive_health_metrics, HealthIndicators, VoiceQuality};
use crate::recommend::{generate_recommendations, Recommendation};

/// The `analysis` block of a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub wellness_score: f32,
    pub stress_level: f32,
    pub energy_level: f32,
    pub hydration_level: f32,
    pub emotions: NormalizedEmotions,
    pub primary_emotion: Option<String>,
    pub voice_quality: VoiceQuality,
    pub health_indicators: HealthIndicators,
}

/// Deterministic metadata accompanying an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Top raw-label probability, 3-decimal rounding.
    pub confidence_score: f32,
    /// Per-label raw scores as percentages, 3-decimal rounding.
    pub raw_emotion_scores: HashMap<String, f32>,
    pub audio_features: AcousticFeatures,
}

/// Complete analysis output for one audio segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub analysis: Analysis,
    pub recommendations: Vec<Recommendation>,
    pub metadata: AnalysisMetadata,
}

/// Run the full scoring pipeline.
///
/// `samples` must be sanitized mono audio (the caller replaces non-finite
/// values; see the crate docs). Fails only on an input-contract violation:
/// a missing emotion label or a zero sample rate.
pub fn analyze(
    raw_scores: &RawEmotionScores,
    samples: &[f32],
    sample_rate: u32,
) -> Result<AnalysisReport, AnalysisError> {
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidSampleRate(sample_rate));
    }

    let emotions = raw_scores.normalize()?;
    let primary_emotion = raw_scores.primary();
    let features = acoustic::extract(samples, sample_rate);
    debug!(?features, primary = ?primary_emotion, "derived inputs ready");

    let metrics = derive_health_metrics(&emotions, &features, primary_emotion.as_deref());
    let recommendations = generate_recommendations(&metrics, &emotions);

    Ok(AnalysisReport {
        analysis: Analysis {
            wellness_score: metrics.wellness_score,
            stress_level: metrics.stress_level,
            energy_level: metrics.energy_level,
            hydration_level: metrics.hydration_level,
            emotions,
            primary_emotion,
            voice_quality: metrics.voice_quality,
            health_indicators: metrics.health_indicators,
        },
        recommendations,
        metadata: AnalysisMetadata {
            confidence_score: round3(raw_scores.confidence()),
            raw_emotion_scores: raw_scores.as_percentages(),
            audio_features: features,
        },
    })
}

fn round3(x: f32) -> f32 {
    (x * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::EmotionLabel;
    use std::f32::consts::PI;

    fn full_scores(pairs: &[(EmotionLabel, f32)]) -> RawEmotionScores {
        let mut map: HashMap<String, f32> =
            EmotionLabel::ALL.iter().map(|l| (l.as_str().to_string(), 0.0)).collect();
        for (label, p) in pairs {
            map.insert(label.as_str().to_string(), *p);
        }
        RawEmotionScores::new(map)
    }

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
    fn test_analyze_end_to_end() {
        let raw = full_scores(&[
            (EmotionLabel::Happy, 0.6),
            (EmotionLabel::Calm, 0.2),
            (EmotionLabel::Neutral, 0.2),
        ]);
        let samples = generate_sine(200.0, 16000, 1000);
        let report = analyze(&raw, &samples, 16000).unwrap();

        assert_eq!(report.analysis.primary_emotion.as_deref(), Some("happy"));
        assert!((report.analysis.emotions.happy - 60.0).abs() < 0.01);
        assert!((0.0..=100.0).contains(&report.analysis.wellness_score));
        assert!((report.metadata.confidence_score - 0.6).abs() < 1e-4);
        assert!(!report.recommendations.is_empty());
        assert!(report.metadata.audio_features.rms > 0.2);
    }

    #[test]
    fn test_analyze_zero_sample_rate_is_error() {
        let raw = full_scores(&[(EmotionLabel::Neutral, 1.0)]);
        assert_eq!(
            analyze(&raw, &[0.0; 100], 0),
            Err(AnalysisError::InvalidSampleRate(0))
        );
    }

    #[test]
    fn test_analyze_missing_label_is_error() {
        let raw = RawEmotionScores::new(
            [("Happy".to_string(), 1.0)].into_iter().collect(),
        );
        let result = analyze(&raw, &[0.0; 100], 16000);
        assert!(matches!(result, Err(AnalysisError::MissingEmotionLabel(_))));
    }

    #[test]
    fn test_analyze_is_pure() {
        let raw = full_scores(&[(EmotionLabel::Sad, 0.7), (EmotionLabel::Neutral, 0.3)]);
        let samples = generate_sine(150.0, 16000, 500);
        let a = analyze(&raw, &samples, 16000).unwrap();
        let b = analyze(&raw, &samples, 16000).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_report_serializes_with_wire_field_names() {
        let raw = full_scores(&[(EmotionLabel::Neutral, 1.0)]);
        let report = analyze(&raw, &[], 16000).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert!(json["analysis"]["wellness_score"].is_number());
        assert_eq!(json["analysis"]["primary_emotion"], "neutral");
        assert_eq!(json["analysis"]["health_indicators"]["breathing_rate"], "normal");
        assert!(json["analysis"]["voice_quality"]["speech_rate"].is_string());
        assert!(json["metadata"]["raw_emotion_scores"]["neutral"].is_number());
        // Silence: optional features serialize as null
        assert!(json["metadata"]["audio_features"]["median_f0_hz"].is_null());
    }

    #[test]
    fn test_silent_audio_still_produces_full_report() {
        let raw = full_scores(&[(EmotionLabel::Calm, 1.0)]);
        let report = analyze(&raw, &vec![0.0; 16000], 16000).unwrap();
        assert_eq!(report.metadata.audio_features, AcousticFeatures::default());
        assert!((0.0..=100.0).contains(&report.analysis.wellness_score));
    }
}
