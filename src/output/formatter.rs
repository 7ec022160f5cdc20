//! Console output: JSON lines for callers and a coloured training summary

use crate::error::{Result, ResumeCheckerError};
use crate::output::report::{EvaluationReport, ResultReport};
use crate::processing::sections::{ResumeSections, Section};
use colored::Colorize;
use serde::{Serialize, Serializer};
use serde_json::json;
use std::io;

/// Error printed when the checker is called with the wrong arguments
pub const USAGE_ERROR: &str = "Invalid arguments. Usage: python resume-checker.py <pdf_path> <keywords>";

/// Characters of each section shown in the diagnostics
const SECTION_PREVIEW_CHARS: usize = 100;

/// JSON with `", "` and `": "` separators, matching what existing callers parse
struct SpacedFormatter;

impl serde_json::ser::Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Serialize on a single line with spaced separators
pub fn to_json_line<T: Serialize>(value: &T) -> Result<String> {
    let mut buffer = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, SpacedFormatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(buffer).map_err(|e| ResumeCheckerError::Processing(format!("Invalid UTF-8 in JSON output: {}", e)))
}

pub fn error_line(message: &str) -> String {
    to_json_line(&json!({ "error": message })).unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", message))
}

pub fn warning_line(message: &str) -> String {
    to_json_line(&json!({ "warning": message })).unwrap_or_else(|_| format!("{{\"warning\": \"{}\"}}", message))
}

pub fn report_line(report: &ResultReport) -> Result<String> {
    to_json_line(report)
}

/// Section previews keyed by name, kept in section order when serialized
struct SectionsPreview(Vec<(&'static str, String)>);

impl Serialize for SectionsPreview {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(name, text)| (name, text)))
    }
}

/// Non-empty sections, each cut to its first 100 characters
pub fn sections_preview(sections: &ResumeSections) -> Result<String> {
    let preview = Section::ALL
        .iter()
        .map(|&section| (section, sections.get(section)))
        .filter(|(_, text)| !text.is_empty())
        .map(|(section, text)| {
            let head: String = text.chars().take(SECTION_PREVIEW_CHARS).collect();
            (section.as_str(), format!("{}...", head))
        })
        .collect();
    to_json_line(&SectionsPreview(preview))
}

/// Coloured validation summary for the trainer
pub fn format_evaluation(report: &EvaluationReport) -> String {
    let accuracy = format!("{:.4}", report.accuracy);
    let accuracy = if report.accuracy >= 0.8 {
        accuracy.green()
    } else if report.accuracy >= 0.5 {
        accuracy.yellow()
    } else {
        accuracy.red()
    };

    format!(
        "{}\n  Validation pairs: {}\n  Validation MSE: {:.4}\n  Validation Correlation: {:.4}\n  Validation Classification Accuracy: {}",
        "Evaluation".bold(),
        report.validation_pairs,
        report.mse,
        report.pearson,
        accuracy
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_error_line_is_verbatim() {
        assert_eq!(
            error_line(USAGE_ERROR),
            r#"{"error": "Invalid arguments. Usage: python resume-checker.py <pdf_path> <keywords>"}"#
        );
    }

    #[test]
    fn test_report_line_uses_spaced_separators() {
        let report = ResultReport::new(
            85.0,
            vec!["python".to_string(), "sql".to_string()],
            vec!["python".to_string()],
            vec![],
        );
        assert_eq!(
            report_line(&report).unwrap(),
            r#"{"ats_score": 85, "matched_keywords": ["python", "sql"], "extracted_skills": ["python"], "suggestions": []}"#
        );
    }

    #[test]
    fn test_sections_preview_skips_empty_sections() {
        let long_line = "x".repeat(150);
        let sections = ResumeSections::parse(&format!("Jane\nExperience\n{}", long_line));
        let preview = sections_preview(&sections).unwrap();

        assert!(preview.contains(r#""other": "Jane...""#));
        assert!(preview.contains(&format!(r#""experience": "Experience {}...""#, "x".repeat(89))));
        assert!(!preview.contains("education"));
        assert!(!preview.contains("skills"));
    }

    #[test]
    fn test_sections_preview_keeps_section_order() {
        let sections = ResumeSections::parse("Jane\nSkills\nPython\nEducation\nBSc\nExperience\nEngineer");
        let preview = sections_preview(&sections).unwrap();

        assert_eq!(
            preview,
            r#"{"experience": "Experience Engineer...", "education": "Education BSc...", "skills": "Skills Python...", "other": "Jane..."}"#
        );
    }

    #[test]
    fn test_warning_line() {
        assert_eq!(
            warning_line("Could not detect language. Assuming English."),
            r#"{"warning": "Could not detect language. Assuming English."}"#
        );
    }
}
