//! Report structures emitted by the checker and the trainer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The machine-readable result of one resume check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultReport {
    /// Integer part of the 0-100 ATS score
    pub ats_score: u32,
    pub matched_keywords: Vec<String>,
    pub extracted_skills: Vec<String>,
    pub suggestions: Vec<String>,
}

impl ResultReport {
    pub fn new(
        ats_score: f64,
        matched_keywords: Vec<String>,
        extracted_skills: Vec<String>,
        suggestions: Vec<String>,
    ) -> Self {
        Self {
            ats_score: ats_score.clamp(0.0, 100.0) as u32,
            matched_keywords,
            extracted_skills,
            suggestions,
        }
    }
}

/// Validation metrics written next to a fine-tuned model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub mse: f64,
    pub pearson: f64,
    pub accuracy: f64,
    pub validation_pairs: usize,
}

/// Metadata saved as `training_summary.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub base_model: String,
    pub trained_at: DateTime<Utc>,
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub training_pairs: usize,
    pub final_loss: f32,
    pub evaluation: EvaluationReport,
}
