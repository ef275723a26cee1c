//! Error types for the wellness analysis pipeline.
//!
//! Only input-contract violations are errors. Degraded signal conditions
//! (silence, undetectable pitch or tempo) are represented as absent optional
//! fields on [`crate::acoustic::AcousticFeatures`] and never surface here.

use thiserror::Error;

use crate::emotion::EmotionLabel;

#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// The raw score map did not contain one of the 8 known emotion labels.
    /// The model contract guarantees all 8; a missing one means the caller
    /// handed us something else, so fail fast rather than scoring on zeros.
    #[error("missing emotion label in raw scores: {0:?}")]
    MissingEmotionLabel(EmotionLabel),

    /// Sample rate must be a positive number of Hz.
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(u32),
}
