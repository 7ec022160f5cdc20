//! End-to-end tests for scoring and the resume-checker binary

use resume_checker::config::Config;
use resume_checker::processing::analyzer::ResumeAnalyzer;
use resume_checker::processing::embeddings::{EmbeddingEngine, SentenceEncoder};
use resume_checker::Result;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const USAGE_JSON: &str = r#"{"error": "Invalid arguments. Usage: python resume-checker.py <pdf_path> <keywords>"}"#;

/// Bag-of-words encoder over a fixed vocabulary
struct KeywordEncoder(&'static [&'static str]);

impl SentenceEncoder for KeywordEncoder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| {
                let lower = text.to_lowercase();
                self.0.iter().map(|w| if lower.contains(w) { 1.0 } else { 0.0 }).collect()
            })
            .collect())
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

fn run_checker(args: &[&str], config_dir: &Path) -> Output {
    let config_path = config_dir.join("config.toml");
    if !config_path.exists() {
        let config = Config::default().with_model_dir(Some(config_dir.join("no-model")));
        std::fs::write(&config_path, toml::to_string_pretty(&config).unwrap()).unwrap();
    }

    Command::new(env!("CARGO_BIN_EXE_resume-checker"))
        .args(args)
        .arg("--config")
        .arg(&config_path)
        .env_remove("RESUME_CHECKER_MODEL_DIR")
        .output()
        .unwrap()
}

#[test]
fn test_fixture_resume_scores_matching_keywords() {
    let text = std::fs::read_to_string("tests/fixtures/sample_resume.txt").unwrap();
    let encoder = KeywordEncoder(&["python", "sql", "docker", "cooking", "tableau"]);
    let mut analyzer = ResumeAnalyzer::new(EmbeddingEngine::new(Box::new(encoder))).unwrap();

    let analysis = analyzer.analyze(&text, "Python, SQL, cooking, tableau").unwrap();
    let report = analysis.report;

    assert_eq!(report.matched_keywords, vec!["Python", "SQL"]);
    assert!(report.extracted_skills.contains(&"kubernetes".to_string()));
    // extraction is per token, so the two-word entry is not reported
    assert!(!report.extracted_skills.contains(&"machine learning".to_string()));
    // 2/4 * 70 + 2/4 * 30
    assert_eq!(report.ats_score, 50);
    assert!(report.suggestions.is_empty());
}

#[test]
fn test_wrong_argument_count_prints_usage_json() {
    let temp_dir = TempDir::new().unwrap();
    let output = run_checker(&["only-one-arg.pdf"], temp_dir.path());

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim_end(), USAGE_JSON);
}

#[test]
fn test_empty_resume_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let resume = temp_dir.path().join("empty.txt");
    std::fs::write(&resume, "").unwrap();

    let output = run_checker(&[resume.to_str().unwrap(), "python"], temp_dir.path());
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim_end(), r#"{"error": "Failed to extract text from PDF"}"#);
}

#[test]
fn test_whitespace_only_resume_is_not_an_extraction_failure() {
    let temp_dir = TempDir::new().unwrap();
    let resume = temp_dir.path().join("blank.txt");
    std::fs::write(&resume, "   \n").unwrap();

    let output = run_checker(&[resume.to_str().unwrap(), "python"], temp_dir.path());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Failed to extract text from PDF"));
    assert!(stdout.contains("Extracted Resume Text:"));
}

#[test]
fn test_missing_model_exits_with_error() {
    let temp_dir = TempDir::new().unwrap();
    let output = run_checker(&["tests/fixtures/sample_resume.txt", "python,sql"], temp_dir.path());

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Extracted Resume Text:"));
    assert!(!stdout.contains("ats_score"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no-model"));
}
