//! Deterministic encoder for scoring tests

use crate::error::Result;
use crate::processing::embeddings::SentenceEncoder;

/// One dimension per vocabulary word; a text activates the words it contains
pub struct VocabularyEncoder {
    pub vocabulary: Vec<&'static str>,
}

impl SentenceEncoder for VocabularyEncoder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| {
                let lower = text.to_lowercase();
                self.vocabulary
                    .iter()
                    .map(|word| if lower.contains(word) { 1.0 } else { 0.0 })
                    .collect()
            })
            .collect())
    }

    fn name(&self) -> &str {
        "vocabulary"
    }
}
