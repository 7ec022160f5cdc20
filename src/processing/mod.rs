//! Text processing, embeddings and scoring

pub mod analyzer;
pub mod ats_score;
pub mod device;
pub mod embedding_manager;
pub mod embeddings;
pub mod scorer;
pub mod sections;
pub mod sentence_bert;
pub mod skills;
pub mod suggestions;
pub mod text_processor;

#[cfg(test)]
pub(crate) mod test_support;
