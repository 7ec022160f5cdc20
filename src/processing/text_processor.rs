//! Text normalization and sentence segmentation

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

pub struct TextProcessor {
    whitespace_regex: Regex,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        let whitespace_regex = Regex::new(r"\s+").expect("Invalid whitespace regex");
        Self { whitespace_regex }
    }

    /// Split text into trimmed, non-empty sentences
    pub fn split_sentences(&self, text: &str) -> Vec<String> {
        text.unicode_sentences()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Clean a training document: one space-separated line of sentences
    pub fn preprocess_document(&self, text: &str) -> String {
        let normalized = self.normalize_unicode(text);
        self.split_sentences(&normalized)
            .iter()
            .map(|sentence| self.normalize_whitespace(sentence))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Collapse runs of whitespace (including newlines) into single spaces
    pub fn normalize_whitespace(&self, text: &str) -> String {
        self.whitespace_regex.replace_all(text, " ").trim().to_string()
    }

    /// Map typographic punctuation to ASCII
    pub fn normalize_unicode(&self, text: &str) -> String {
        text.chars()
            .map(|c| match c {
                '\u{2018}' | '\u{2019}' => '\'',
                '\u{201C}' | '\u{201D}' => '"',
                '\u{2013}' | '\u{2014}' => '-',
                '\u{2026}' => '.',
                '\u{00A0}' => ' ',
                _ => c,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentence_split() {
        let processor = TextProcessor::new();
        let sentences = processor.split_sentences("Built APIs in Python. Led a team of four!  ");

        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0], "Built APIs in Python.");
        assert_eq!(sentences[1], "Led a team of four!");
    }

    #[test]
    fn test_empty_text_has_no_sentences() {
        let processor = TextProcessor::new();
        assert!(processor.split_sentences("   \n ").is_empty());
    }

    #[test]
    fn test_preprocess_document_flattens_lines() {
        let processor = TextProcessor::new();
        let cleaned = processor.preprocess_document("Skills\n\nPython,   SQL \u{2014} Tableau.\nTeam lead.");

        assert!(!cleaned.contains('\n'));
        assert!(!cleaned.contains("  "));
        assert!(cleaned.contains("Python, SQL - Tableau."));
        assert!(cleaned.ends_with("Team lead."));
    }
}
