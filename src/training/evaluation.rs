//! Validation metrics for a fine-tuned encoder

use crate::error::Result;
use crate::output::report::EvaluationReport;
use crate::processing::embeddings::{cosine_similarity, SentenceEncoder};
use crate::training::pairs::TrainingPair;

/// Scores at or above this are treated as a match when computing accuracy
const MATCH_LABEL_THRESHOLD: f32 = 0.5;

pub fn mean_squared_error(truth: &[f32], predicted: &[f32]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let sum: f64 = truth
        .iter()
        .zip(predicted)
        .map(|(t, p)| (*t as f64 - *p as f64).powi(2))
        .sum();
    sum / truth.len() as f64
}

/// Pearson correlation; NaN when either side has no variance
pub fn pearson_correlation(truth: &[f32], predicted: &[f32]) -> f64 {
    let n = truth.len().min(predicted.len());
    if n == 0 {
        return f64::NAN;
    }
    let mean_t = truth.iter().map(|&v| v as f64).sum::<f64>() / n as f64;
    let mean_p = predicted.iter().map(|&v| v as f64).sum::<f64>() / n as f64;

    let mut covariance = 0.0;
    let mut var_t = 0.0;
    let mut var_p = 0.0;
    for (&t, &p) in truth.iter().zip(predicted) {
        let dt = t as f64 - mean_t;
        let dp = p as f64 - mean_p;
        covariance += dt * dp;
        var_t += dt * dt;
        var_p += dp * dp;
    }
    covariance / (var_t * var_p).sqrt()
}

/// Share of pairs where truth and prediction agree on `score >= 0.5`
pub fn label_accuracy(truth: &[f32], predicted: &[f32]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let agree = truth
        .iter()
        .zip(predicted)
        .filter(|(t, p)| (**t >= MATCH_LABEL_THRESHOLD) == (**p >= MATCH_LABEL_THRESHOLD))
        .count();
    agree as f64 / truth.len() as f64
}

/// Compare the cosine similarity of every validation pair with its target score
pub fn evaluate(encoder: &dyn SentenceEncoder, pairs: &[TrainingPair]) -> Result<EvaluationReport> {
    let resumes: Vec<String> = pairs.iter().map(|p| p.resume.clone()).collect();
    let jobs: Vec<String> = pairs.iter().map(|p| p.job_description.clone()).collect();

    let resume_embeddings = encoder.encode(&resumes)?;
    let job_embeddings = encoder.encode(&jobs)?;

    let predicted = resume_embeddings
        .iter()
        .zip(&job_embeddings)
        .map(|(r, j)| cosine_similarity(r, j))
        .collect::<Result<Vec<f32>>>()?;
    let truth: Vec<f32> = pairs.iter().map(|p| p.score).collect();

    Ok(EvaluationReport {
        mse: mean_squared_error(&truth, &predicted),
        pearson: pearson_correlation(&truth, &predicted),
        accuracy: label_accuracy(&truth, &predicted),
        validation_pairs: pairs.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::test_support::VocabularyEncoder;

    #[test]
    fn test_metrics() {
        let truth = [1.0, 0.1, 0.7];
        let predicted = [0.9, 0.3, 0.4];

        assert!((mean_squared_error(&truth, &predicted) - (0.01 + 0.04 + 0.09) / 3.0).abs() < 1e-6);
        assert!((label_accuracy(&truth, &predicted) - 2.0 / 3.0).abs() < 1e-9);
        assert!(pearson_correlation(&truth, &predicted) > 0.5);
    }

    #[test]
    fn test_perfect_correlation() {
        let truth = [0.1, 0.4, 0.9];
        let predicted = [0.2, 0.5, 1.0];
        assert!((pearson_correlation(&truth, &predicted) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_constant_scores_have_undefined_correlation() {
        assert!(pearson_correlation(&[0.1, 0.1], &[0.3, 0.9]).is_nan());
    }

    #[test]
    fn test_evaluate_with_encoder() {
        let encoder = VocabularyEncoder {
            vocabulary: vec!["python", "nursing"],
        };
        let pairs = vec![
            TrainingPair {
                resume: "python developer".to_string(),
                job_description: "python role".to_string(),
                score: 1.0,
            },
            TrainingPair {
                resume: "python developer".to_string(),
                job_description: "nursing role".to_string(),
                score: 0.1,
            },
        ];

        let report = evaluate(&encoder, &pairs).unwrap();
        assert_eq!(report.validation_pairs, 2);
        assert!((report.accuracy - 1.0).abs() < 1e-9);
        assert!((report.mse - 0.005).abs() < 1e-6);
    }
}
