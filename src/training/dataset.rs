//! Labelled resume datasets read from local directories

use crate::error::{Result, ResumeCheckerError};
use crate::input::InputManager;
use crate::processing::text_processor::TextProcessor;
use log::{info, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const UNKNOWN_CATEGORY: &str = "Unknown";

/// One cleaned resume with its job category
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeRecord {
    pub text: String,
    pub category: String,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Resume", default)]
    resume: String,
    #[serde(rename = "Category", default)]
    category: Option<String>,
}

/// Load the first CSV file (by name) in `dir`; rows need a `Resume` column
/// and may carry a `Category`
pub fn load_csv_dataset(dir: &Path, processor: &TextProcessor) -> Result<Vec<ResumeRecord>> {
    let csv_path = files_with_extension(dir, "csv")?
        .into_iter()
        .next()
        .ok_or_else(|| ResumeCheckerError::Dataset(format!("No CSV file found in {}", dir.display())))?;

    info!("Reading CSV dataset {}", csv_path.display());
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(&csv_path)?;

    let mut resumes = Vec::new();
    for row in reader.deserialize() {
        let row: CsvRow = row?;
        if row.resume.is_empty() {
            continue;
        }
        let category = row
            .category
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string());

        resumes.push(ResumeRecord {
            text: processor.preprocess_document(&row.resume),
            category,
        });
    }

    Ok(resumes)
}

/// Load every PDF in `dir`; the category is the file-name prefix before the first `_`
pub async fn load_pdf_dataset(dir: &Path, processor: &TextProcessor) -> Result<Vec<ResumeRecord>> {
    let input_manager = InputManager::new().with_fallback(false);
    let mut resumes = Vec::new();

    for pdf_path in files_with_extension(dir, "pdf")? {
        let text = input_manager.extract_text(&pdf_path).await?;
        if text.is_empty() {
            warn!("No text extracted from {}, skipping", pdf_path.display());
            continue;
        }

        let file_name = pdf_path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        resumes.push(ResumeRecord {
            text: processor.preprocess_document(&text),
            category: category_from_file_name(file_name),
        });
    }

    Ok(resumes)
}

pub fn category_from_file_name(file_name: &str) -> String {
    match file_name.split_once('_') {
        Some((prefix, _)) => prefix.to_string(),
        None => UNKNOWN_CATEGORY.to_string(),
    }
}

fn files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| ResumeCheckerError::Dataset(format!("Cannot read dataset directory {}: {}", dir.display(), e)))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(extension) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_csv_rows_are_cleaned_and_categorised() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("resumes.csv"),
            "Category,Resume\n\
             Data Science,\"Built models in Python.   Led a team.\"\n\
             ,Plain resume text\n\
             HR,\n",
        )
        .unwrap();

        let resumes = load_csv_dataset(dir.path(), &TextProcessor::new()).unwrap();
        assert_eq!(resumes.len(), 2);
        assert_eq!(resumes[0].category, "Data Science");
        assert_eq!(resumes[0].text, "Built models in Python. Led a team.");
        assert_eq!(resumes[1].category, "Unknown");
    }

    #[test]
    fn test_directory_without_csv_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();

        let err = load_csv_dataset(dir.path(), &TextProcessor::new()).unwrap_err();
        assert!(matches!(err, ResumeCheckerError::Dataset(_)));
    }

    #[test]
    fn test_category_from_file_name() {
        assert_eq!(category_from_file_name("ENGINEERING_10030015.pdf"), "ENGINEERING");
        assert_eq!(category_from_file_name("resume.pdf"), "Unknown");
    }

    #[tokio::test]
    async fn test_unreadable_pdf_keeps_error_text() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("HR_1.pdf"), b"not a pdf").unwrap();

        let resumes = load_pdf_dataset(dir.path(), &TextProcessor::new()).await.unwrap();
        assert_eq!(resumes.len(), 1);
        assert_eq!(resumes[0].category, "HR");
        assert!(!resumes[0].text.is_empty());
    }
}
