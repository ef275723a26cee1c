//! Recommendation rules.
//!
//! A fixed-order, stateless rule set over the derived metrics. Rules are
//! evaluated and appended in declaration order; the output is never re-sorted,
//! so callers can rely on stable ordering.

use serde::{Deserialize, Serialize};

use crate::emotion::NormalizedEmotions;
use crate::metrics::HealthMetrics;

/// Stress at or above this gets a high-priority breathing exercise.
const STRESS_HIGH: f32 = 70.0;

/// Stress at or above this gets a medium-priority breathing exercise.
const STRESS_MODERATE: f32 = 45.0;

/// Energy below this (or tiredness above [`TIRED_ABOVE`]) suggests a nap.
const ENERGY_LOW: f32 = 40.0;

/// Energy below this makes the nap suggestion high priority.
const ENERGY_VERY_LOW: f32 = 25.0;

/// Tired share above this suggests a nap regardless of energy.
const TIRED_ABOVE: f32 = 40.0;

/// Hydration below this upgrades the reminder to an actual prompt.
const HYDRATION_LOW: f32 = 50.0;

/// Wellness below this suggests reducing background noise.
const WELLNESS_LOW: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    BreathingExercise,
    MicroNap,
    Hydration,
    ReduceNoise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub priority: Priority,
    pub message: String,
}

impl Recommendation {
    fn new(kind: RecommendationKind, priority: Priority, message: &str) -> Self {
        Self {
            kind,
            priority,
            message: message.to_string(),
        }
    }
}

/// Generate the ordered recommendation list for one analysis.
///
/// Rule order: breathing exercise, micro-nap, hydration (always exactly one),
/// reduce noise. Between 1 and 4 entries.
pub fn generate_recommendations(
    metrics: &HealthMetrics,
    emotions: &NormalizedEmotions,
) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    if metrics.stress_level >= STRESS_HIGH {
        recs.push(Recommendation::new(
            RecommendationKind::BreathingExercise,
            Priority::High,
            "High stress detected. Try a 2-minute breathing exercise (box breathing).",
        ));
    } else if metrics.stress_level >= STRESS_MODERATE {
        recs.push(Recommendation::new(
            RecommendationKind::BreathingExercise,
            Priority::Medium,
            "Moderate stress present. Try a 60-second guided breathing exercise.",
        ));
    }

    if metrics.energy_level < ENERGY_LOW || emotions.tired > TIRED_ABOVE {
        let priority = if metrics.energy_level < ENERGY_VERY_LOW {
            Priority::High
        } else {
            Priority::Medium
        };
        recs.push(Recommendation::new(
            RecommendationKind::MicroNap,
            priority,
            "Low energy / tiredness detected. Consider a 10-20 minute power nap or light movement.",
        ));
    }

    // Hydration is currently a constant upstream, but the threshold is still
    // evaluated so the rule keeps working if that ever changes.
    if metrics.hydration_level < HYDRATION_LOW {
        recs.push(Recommendation::new(
            RecommendationKind::Hydration,
            Priority::Medium,
            "Hydration estimate is low. Drink a glass of water.",
        ));
    } else {
        recs.push(Recommendation::new(
            RecommendationKind::Hydration,
            Priority::Low,
            "Stay hydrated - a small reminder to drink water.",
        ));
    }

    if metrics.wellness_score < WELLNESS_LOW {
        recs.push(Recommendation::new(
            RecommendationKind::ReduceNoise,
            Priority::Medium,
            "Try moving to a quieter environment or reducing background noise.",
        ));
    }

    recs
}
