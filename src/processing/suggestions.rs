//! Improvement suggestions
//!
//! The generator assembles the analysis context a language model would be
//! prompted with. No model is wired in, so the suggestion list is empty.

use crate::processing::embeddings::EmbeddingEngine;
use crate::processing::scorer::KeywordScores;
use crate::processing::sections::{ResumeSections, Section};
use log::debug;

/// Keywords scoring below this are called out as weak
const WEAK_KEYWORD_SCORE: f32 = 0.4;
/// Scores below this are flagged as having room for improvement
const TARGET_ATS_SCORE: f64 = 80.0;

/// Everything the suggestion context is built from
pub struct SuggestionInput<'a> {
    pub keyword_scores: &'a KeywordScores,
    pub matched_keywords: &'a [String],
    pub extracted_skills: &'a [String],
    pub keywords: &'a str,
    pub sections: &'a ResumeSections,
    pub ats_score: f64,
}

#[derive(Debug, Default)]
pub struct SuggestionGenerator;

impl SuggestionGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Render the natural-language summary of scores, matches and gaps
    pub fn build_context(&self, input: &SuggestionInput<'_>) -> String {
        let keyword_list: Vec<String> = input.keywords.split(',').map(|kw| kw.trim().to_lowercase()).collect();

        let mut context = format!(
            "Resume analysis: ATS score is {} out of 100. Matched keywords: {}. Extracted skills: {}. Input keywords: {}. ",
            input.ats_score,
            input.matched_keywords.join(", "),
            input.extracted_skills.join(", "),
            keyword_list.join(", "),
        );

        if input.matched_keywords.is_empty() {
            context.push_str("No keywords were strongly matched. ");
        }
        for keyword in &keyword_list {
            let score = input.keyword_scores.get(keyword).unwrap_or(0.0);
            if !input.matched_keywords.contains(keyword) && score < WEAK_KEYWORD_SCORE {
                context.push_str(&format!("The keyword '{}' was not well matched (score: {:.2}). ", keyword, score));
            }
        }
        if input.sections.is_empty(Section::Experience) {
            context.push_str("The resume is missing an Experience section. ");
        }
        if input.sections.is_empty(Section::Skills) {
            context.push_str("The resume is missing a Skills section. ");
        }
        if input.ats_score < TARGET_ATS_SCORE {
            context.push_str("The ATS score is below 80, indicating room for improvement. ");
        }

        context
    }

    /// Build the context, release the embedding cache and return the suggestions (currently none)
    pub fn generate(&self, input: &SuggestionInput<'_>, engine: &mut EmbeddingEngine) -> Vec<String> {
        let context = self.build_context(input);
        debug!("Suggestion context: {}", context);

        engine.clear_cache();
        Vec::new()
    }
}
