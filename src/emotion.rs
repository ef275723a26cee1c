//! Emotion labels and distribution normalization.
//!
//! The upstream speech-emotion classifier emits a probability per each of 8
//! fixed labels. Downstream metrics work on a coarser 6-bucket distribution
//! (percentages): anger/disgust/fear collapse into "stressed", sad becomes
//! "tired", the rest map one-to-one.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::round2;

/// The 8 labels of the emotion model's output head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmotionLabel {
    Anger,
    Calm,
    Disgust,
    Fear,
    Happy,
    Neutral,
    Sad,
    Surprised,
}

impl EmotionLabel {
    /// All labels in model output order.
    pub const ALL: [EmotionLabel; 8] = [
        EmotionLabel::Anger,
        EmotionLabel::Calm,
        EmotionLabel::Disgust,
        EmotionLabel::Fear,
        EmotionLabel::Happy,
        EmotionLabel::Neutral,
        EmotionLabel::Sad,
        EmotionLabel::Surprised,
    ];

    /// Label name as the model emits it.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionLabel::Anger => "Anger",
            EmotionLabel::Calm => "Calm",
            EmotionLabel::Disgust => "Disgust",
            EmotionLabel::Fear => "Fear",
            EmotionLabel::Happy => "Happy",
            EmotionLabel::Neutral => "Neutral",
            EmotionLabel::Sad => "Sad",
            EmotionLabel::Surprised => "Surprised",
        }
    }

    /// Case-insensitive parse. Returns `None` for labels outside the model set.
    pub fn parse(s: &str) -> Option<EmotionLabel> {
        EmotionLabel::ALL
            .iter()
            .copied()
            .find(|l| l.as_str().eq_ignore_ascii_case(s))
    }
}

/// Raw per-label probabilities as produced by the emotion model.
///
/// Keys are label strings (matched case-insensitively). The model contract
/// guarantees all 8 known labels are present; [`RawEmotionScores::score`]
/// fails fast on a missing one. Extra keys beyond the known set are tolerated
/// and feed the normalizer's forward-compat fallback.
#[derive(Debug, Clone, Default)]
pub struct RawEmotionScores {
    scores: HashMap<String, f32>,
}

impl RawEmotionScores {
    pub fn new(scores: HashMap<String, f32>) -> Self {
        // Key casing varies between model revisions; store lowercased.
        let scores = scores
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();
        Self { scores }
    }

    /// Probability for a known label. Missing label is a contract violation.
    pub fn score(&self, label: EmotionLabel) -> Result<f32, AnalysisError> {
        self.scores
            .get(&label.as_str().to_ascii_lowercase())
            .copied()
            .ok_or(AnalysisError::MissingEmotionLabel(label))
    }

    /// The highest-probability label, lowercase. Known labels win ties in
    /// declared order; unrecognized extra keys are only considered after them.
    pub fn primary(&self) -> Option<String> {
        let mut best: Option<(&str, f32)> = None;
        for label in EmotionLabel::ALL {
            let key = label.as_str().to_ascii_lowercase();
            if let Some(&p) = self.scores.get(&key) {
                if best.map_or(true, |(_, bp)| p > bp) {
                    best = Some((label.as_str(), p));
                }
            }
        }
        let mut extras: Vec<(&String, &f32)> = self
            .scores
            .iter()
            .filter(|(k, _)| EmotionLabel::parse(k).is_none())
            .collect();
        extras.sort_by(|a, b| a.0.cmp(b.0));
        for (k, &p) in extras {
            if best.map_or(true, |(_, bp)| p > bp) {
                best = Some((k.as_str(), p));
            }
        }
        best.map(|(name, _)| name.to_ascii_lowercase())
    }

    /// Top probability across all labels, or 0.0 for an empty map.
    pub fn confidence(&self) -> f32 {
        self.scores.values().copied().fold(0.0, f32::max)
    }

    /// Per-label scores as percentages, 3-decimal rounding, lowercase keys.
    pub fn as_percentages(&self) -> HashMap<String, f32> {
        self.scores
            .iter()
            .map(|(k, v)| (k.clone(), (v * 100.0 * 1000.0).round() / 1000.0))
            .collect()
    }

    /// Collapse the 8-label distribution into the 6 wellness buckets.
    ///
    /// All 8 known labels must be present. Any extra, unrecognized key
    /// contributes 30% of its mass to `neutral` so a future label-set change
    /// degrades instead of erroring.
    pub fn normalize(&self) -> Result<NormalizedEmotions, AnalysisError> {
        let mut out = NormalizedEmotions::default();
        for label in EmotionLabel::ALL {
            let p = self.score(label)?;
            match label {
                EmotionLabel::Happy => out.happy += p,
                EmotionLabel::Calm => out.calm += p,
                EmotionLabel::Neutral => out.neutral += p,
                EmotionLabel::Anger | EmotionLabel::Disgust | EmotionLabel::Fear => {
                    out.stressed += p
                }
                EmotionLabel::Sad => out.tired += p,
                EmotionLabel::Surprised => out.surprised += p,
            }
        }
        for (key, p) in &self.scores {
            if EmotionLabel::parse(key).is_none() {
                out.neutral += p * 0.3;
            }
        }
        out.happy = round2(out.happy * 100.0);
        out.calm = round2(out.calm * 100.0);
        out.stressed = round2(out.stressed * 100.0);
        out.tired = round2(out.tired * 100.0);
        out.surprised = round2(out.surprised * 100.0);
        out.neutral = round2(out.neutral * 100.0);
        Ok(out)
    }
}

/// The 6-bucket normalized distribution, in percent (2-decimal rounding).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedEmotions {
    pub happy: f32,
    pub calm: f32,
    pub stressed: f32,
    pub tired: f32,
    pub surprised: f32,
    pub neutral: f32,
}

impl NormalizedEmotions {
    pub fn total(&self) -> f32 {
        self.happy + self.calm + self.stressed + self.tired + self.surprised + self.neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scores_from(pairs: &[(&str, f32)]) -> RawEmotionScores {
        RawEmotionScores::new(pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect())
    }

    fn full_scores(anger: f32, calm: f32, disgust: f32, fear: f32, happy: f32, neutral: f32, sad: f32, surprised: f32) -> RawEmotionScores {
        scores_from(&[
            ("Anger", anger),
            ("Calm", calm),
            ("Disgust", disgust),
            ("Fear", fear),
            ("Happy", happy),
            ("Neutral", neutral),
            ("Sad", sad),
            ("Surprised", surprised),
        ])
    }

    #[test]
    fn test_normalize_partitions_to_100() {
        let raw = full_scores(0.1, 0.2, 0.05, 0.05, 0.3, 0.1, 0.15, 0.05);
        let norm = raw.normalize().unwrap();
        assert!((norm.total() - 100.0).abs() <= 0.01, "total = {}", norm.total());
        assert!((norm.stressed - 20.0).abs() < 0.01); // anger + disgust + fear
        assert!((norm.happy - 30.0).abs() < 0.01);
        assert!((norm.tired - 15.0).abs() < 0.01);
    }

    #[test]
    fn test_normalize_missing_label_is_error() {
        let raw = scores_from(&[("Anger", 0.5), ("Calm", 0.5)]);
        assert_eq!(
            raw.normalize(),
            Err(AnalysisError::MissingEmotionLabel(EmotionLabel::Disgust))
        );
    }

    #[test]
    fn test_normalize_unknown_label_feeds_neutral_at_30_pct() {
        let mut pairs: Vec<(&str, f32)> = vec![
            ("Anger", 0.0),
            ("Calm", 0.0),
            ("Disgust", 0.0),
            ("Fear", 0.0),
            ("Happy", 0.0),
            ("Neutral", 0.5),
            ("Sad", 0.0),
            ("Surprised", 0.0),
        ];
        pairs.push(("Contempt", 0.5));
        let norm = scores_from(&pairs).normalize().unwrap();
        // 0.5 + 0.5 * 0.3 = 0.65 -> 65%
        assert!((norm.neutral - 65.0).abs() < 0.01);
    }

    #[test]
    fn test_label_parse_is_case_insensitive() {
        assert_eq!(EmotionLabel::parse("HAPPY"), Some(EmotionLabel::Happy));
        assert_eq!(EmotionLabel::parse("surprised"), Some(EmotionLabel::Surprised));
        assert_eq!(EmotionLabel::parse("contempt"), None);
    }

    #[test]
    fn test_primary_picks_highest_and_lowercases() {
        let raw = full_scores(0.05, 0.1, 0.0, 0.0, 0.6, 0.1, 0.1, 0.05);
        assert_eq!(raw.primary().as_deref(), Some("happy"));
    }

    #[test]
    fn test_primary_tie_breaks_by_label_order() {
        let raw = full_scores(0.2, 0.2, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1);
        // Anger comes before Calm in the model order.
        assert_eq!(raw.primary().as_deref(), Some("anger"));
    }

    #[test]
    fn test_confidence_is_top_probability() {
        let raw = full_scores(0.05, 0.1, 0.0, 0.0, 0.6, 0.1, 0.1, 0.05);
        assert!((raw.confidence() - 0.6).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_normalization_partitions_mass(
            weights in proptest::collection::vec(0.001f32..1.0, 8)
        ) {
            // Scale to a proper distribution, then check the 6 buckets carry
            // the whole mass. Each bucket rounds to 2 decimals, so the sum can
            // drift by up to 0.005 per bucket.
            let total: f32 = weights.iter().sum();
            let raw = full_scores(
                weights[0] / total,
                weights[1] / total,
                weights[2] / total,
                weights[3] / total,
                weights[4] / total,
                weights[5] / total,
                weights[6] / total,
                weights[7] / total,
            );
            let norm = raw.normalize().unwrap();
            prop_assert!((norm.total() - 100.0).abs() <= 0.031, "total = {}", norm.total());
        }
    }
}
