//! # voice-wellness
//!
//! Deterministic post-processing for a speech-emotion pipeline: turns raw
//! model probabilities and a raw audio signal into bounded wellness metrics
//! and actionable recommendations.
//!
//! Model inference, audio decoding, and serving all live outside this crate;
//! it only owns the reproducible scoring logic in between:
//!
//! ```text
//! 8-label probabilities          mono samples + sample rate
//!          |                                |
//!          v                                v
//!   Emotion Normalizer           Acoustic Feature Extractor
//!   (6 buckets, percent)         (rms / zcr / flatness / f0 / tempo)
//!          |                                |
//!          +───────────────┬────────────────+
//!                          v
//!                 Health Metric Deriver
//!        (wellness / stress / energy / hydration)
//!                          |
//!                          v
//!                 Recommendation Engine
//!                          |
//!                          v
//!                    AnalysisReport
//! ```
//!
//! Every stage is a pure function: no I/O, no shared state, safe to call
//! concurrently. Degraded signal conditions (silence, undetectable pitch or
//! tempo) come back as absent optional fields; only input-contract violations
//! (missing emotion label, zero sample rate) are errors.
//!
//! Callers must sanitize the signal first (replace non-finite samples); the
//! bundled CLI shows the expected boundary handling.
//!
//! ## Example
//!
//! ```ignore
//! use voice_wellness::{analyze, RawEmotionScores};
//!
//! let scores = RawEmotionScores::new(model_output);
//! let report = analyze(&scores, &samples, 16000)?;
//! println!("wellness: {}", report.analysis.wellness_score);
//! ```

pub mod acoustic;
pub mod analysis;
pub mod emotion;
pub mod error;
pub mod metrics;
pub mod recommend;

pub use acoustic::AcousticFeatures;
pub use analysis::{analyze, Analysis, AnalysisMetadata, AnalysisReport};
pub use emotion::{EmotionLabel, NormalizedEmotions, RawEmotionScores};
pub use error::AnalysisError;
pub use metrics::{derive_health_metrics, HealthMetrics};
pub use recommend::{generate_recommendations, Priority, Recommendation, RecommendationKind};

/// Round to 2 decimal places, half away from zero.
pub(crate) fn round2(x: f32) -> f32 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.014), 1.01);
        assert_eq!(round2(1.016), 1.02);
        assert_eq!(round2(33.333), 33.33);
        assert_eq!(round2(-1.237), -1.24);
        assert_eq!(round2(0.0), 0.0);
    }
}
