//! Keyword similarity scoring with per-section weighting

use crate::error::Result;
use crate::processing::embeddings::{similarity_matrix, EmbeddingEngine};
use crate::processing::sections::Section;
use log::info;
use std::collections::BTreeMap;

/// A keyword is matched when its weighted score is strictly above this value
pub const MATCH_THRESHOLD: f32 = 0.25;

/// Best weighted similarity per keyword
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordScores {
    scores: BTreeMap<String, f32>,
}

impl KeywordScores {
    pub fn zeros(keywords: &[String]) -> Self {
        Self {
            scores: keywords.iter().map(|kw| (kw.clone(), 0.0)).collect(),
        }
    }

    pub fn get(&self, keyword: &str) -> Option<f32> {
        self.scores.get(keyword).copied()
    }

    /// Keep the larger score for every keyword seen in either map
    pub fn merge_max(mut self, other: &KeywordScores) -> Self {
        for (keyword, &score) in &other.scores {
            let entry = self.scores.entry(keyword.clone()).or_insert(score);
            if score > *entry {
                *entry = score;
            }
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.scores.iter().map(|(kw, score)| (kw.as_str(), *score))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    fn insert(&mut self, keyword: String, score: f32) {
        self.scores.insert(keyword, score);
    }
}

/// Split the comma-separated keyword argument, trimming each piece
pub fn parse_keywords(keywords: &str) -> Vec<String> {
    keywords.split(',').map(|kw| kw.trim().to_string()).collect()
}

/// Apply the section multiplier and cap at 1.0
pub fn weighted_score(raw_similarity: f32, section: Section) -> f32 {
    (raw_similarity * section.weight()).min(1.0)
}

pub fn is_match(weighted: f32) -> bool {
    weighted > MATCH_THRESHOLD
}

pub struct SimilarityScorer<'a> {
    engine: &'a mut EmbeddingEngine,
}

impl<'a> SimilarityScorer<'a> {
    pub fn new(engine: &'a mut EmbeddingEngine) -> Self {
        Self { engine }
    }

    /// Score every keyword against the sentences of one section.
    ///
    /// Returns the matched keywords (in keyword order) and the weighted score
    /// of every keyword. With no sentences every keyword scores 0.0.
    pub fn compute_similarity(
        &mut self,
        sentences: &[String],
        keywords: &str,
        section: Section,
    ) -> Result<(Vec<String>, KeywordScores)> {
        let keyword_list = parse_keywords(keywords);
        if sentences.is_empty() {
            return Ok((Vec::new(), KeywordScores::zeros(&keyword_list)));
        }

        let sentence_embeddings = self.engine.encode_texts(sentences)?;
        let keyword_embeddings = self.engine.encode_texts(&keyword_list)?;
        let similarities = similarity_matrix(&sentence_embeddings, &keyword_embeddings)?;

        let mut matched = Vec::new();
        let mut scores = KeywordScores::default();
        for (j, keyword) in keyword_list.into_iter().enumerate() {
            let best = similarities.column(j).iter().copied().fold(f32::NEG_INFINITY, f32::max);
            let score = weighted_score(best, section);
            info!("Similarity score for '{}' in {}: {}", keyword, section, score);

            if is_match(score) {
                matched.push(keyword.clone());
            }
            scores.insert(keyword, score);
        }

        Ok((matched, scores))
    }
}
