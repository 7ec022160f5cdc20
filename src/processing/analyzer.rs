//! Scoring pipeline: sections, skills, per-section similarity, ATS score, suggestions

use crate::error::Result;
use crate::output::report::ResultReport;
use crate::processing::ats_score::calculate_ats_score;
use crate::processing::embeddings::EmbeddingEngine;
use crate::processing::scorer::{KeywordScores, SimilarityScorer};
use crate::processing::sections::ResumeSections;
use crate::processing::skills::SkillExtractor;
use crate::processing::suggestions::{SuggestionGenerator, SuggestionInput};
use crate::processing::text_processor::TextProcessor;
use log::{debug, info};
use std::collections::BTreeSet;
use std::time::Instant;

/// Intermediate results kept alongside the report for diagnostics
#[derive(Debug, Clone)]
pub struct Analysis {
    pub sections: ResumeSections,
    pub extracted_skills: Vec<String>,
    pub keyword_scores: KeywordScores,
    pub report: ResultReport,
}

pub struct ResumeAnalyzer {
    engine: EmbeddingEngine,
    skill_extractor: SkillExtractor,
    text_processor: TextProcessor,
    suggestion_generator: SuggestionGenerator,
}

impl ResumeAnalyzer {
    pub fn new(engine: EmbeddingEngine) -> Result<Self> {
        Ok(Self {
            engine,
            skill_extractor: SkillExtractor::new()?,
            text_processor: TextProcessor::new(),
            suggestion_generator: SuggestionGenerator::new(),
        })
    }

    pub fn model_name(&self) -> &str {
        self.engine.model_name()
    }

    /// Score resume text against the comma-separated `keywords`
    pub fn analyze(&mut self, resume_text: &str, keywords: &str) -> Result<Analysis> {
        let start_time = Instant::now();

        let sections = ResumeSections::parse(resume_text);
        let extracted_skills = self.skill_extractor.extract(resume_text);

        let mut matched: BTreeSet<String> = BTreeSet::new();
        let mut keyword_scores = KeywordScores::default();
        {
            let mut scorer = SimilarityScorer::new(&mut self.engine);
            for (section, text) in sections.iter() {
                if text.is_empty() {
                    continue;
                }
                let sentences = self.text_processor.split_sentences(text);
                debug!("Scoring {} sentences from {}", sentences.len(), section);

                let (section_matched, section_scores) = scorer.compute_similarity(&sentences, keywords, section)?;
                matched.extend(section_matched);
                keyword_scores = keyword_scores.merge_max(&section_scores);
            }
        }

        let matched_keywords: Vec<String> = matched.into_iter().collect();
        let total_keywords = keywords.split(',').count();
        let ats_score = calculate_ats_score(&matched_keywords, total_keywords, &extracted_skills, keywords);

        let suggestions = self.suggestion_generator.generate(
            &SuggestionInput {
                keyword_scores: &keyword_scores,
                matched_keywords: &matched_keywords,
                extracted_skills: &extracted_skills,
                keywords,
                sections: &sections,
                ats_score,
            },
            &mut self.engine,
        );

        info!(
            "Analysis finished in {:.2?}: score {:.1}, {} of {} keywords matched",
            start_time.elapsed(),
            ats_score,
            matched_keywords.len(),
            total_keywords
        );

        let report = ResultReport::new(ats_score, matched_keywords, extracted_skills.clone(), suggestions);
        Ok(Analysis {
            sections,
            extracted_skills,
            keyword_scores,
            report,
        })
    }
}
