//! Sentence encoders, the caching embedding engine and cosine similarity

use crate::error::{Result, ResumeCheckerError};
use log::info;
use model2vec_rs::model::StaticModel;
use ndarray::Array2;
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

/// Anything that maps texts to fixed-dimension embedding vectors
pub trait SentenceEncoder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn name(&self) -> &str;
}

/// Model2Vec static embeddings
pub struct StaticEncoder {
    model: StaticModel,
    name: String,
}

impl StaticEncoder {
    pub fn load(model_path: &Path) -> Result<Self> {
        if !model_path.exists() {
            return Err(ResumeCheckerError::ModelLoading(format!(
                "Static model directory not found: {}",
                model_path.display()
            )));
        }

        let start_time = Instant::now();
        let model = StaticModel::from_pretrained(
            model_path,
            None, // token
            None, // normalize
            None, // subfolder
        )?;
        info!("Static model loaded from {} in {:.2?}", model_path.display(), start_time.elapsed());

        Ok(Self {
            model,
            name: model_path.display().to_string(),
        })
    }
}

impl SentenceEncoder for StaticEncoder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(self.model.encode(texts))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Wraps an encoder with a per-run text cache
pub struct EmbeddingEngine {
    encoder: Box<dyn SentenceEncoder>,
    cache: HashMap<String, Vec<f32>>,
}

impl EmbeddingEngine {
    pub fn new(encoder: Box<dyn SentenceEncoder>) -> Self {
        Self {
            encoder,
            cache: HashMap::new(),
        }
    }

    /// Encode texts, only sending cache misses to the model. Output order matches input.
    pub fn encode_texts(&mut self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut uncached: Vec<String> = Vec::new();
        for text in texts {
            if !self.cache.contains_key(text) && !uncached.contains(text) {
                uncached.push(text.clone());
            }
        }

        if !uncached.is_empty() {
            let embeddings = self.encoder.encode(&uncached)?;
            if embeddings.len() != uncached.len() {
                return Err(ResumeCheckerError::Embedding(format!(
                    "Encoder returned {} embeddings for {} texts",
                    embeddings.len(),
                    uncached.len()
                )));
            }
            self.cache.extend(uncached.into_iter().zip(embeddings));
        }

        texts
            .iter()
            .map(|text| {
                self.cache
                    .get(text)
                    .cloned()
                    .ok_or_else(|| ResumeCheckerError::Embedding(format!("Missing embedding for '{}'", text)))
            })
            .collect()
    }

    pub fn model_name(&self) -> &str {
        self.encoder.name()
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    /// Drop cached embeddings and give the memory back
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        self.cache.shrink_to_fit();
    }
}

/// Cosine similarity between two embeddings; zero vectors score 0.0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(ResumeCheckerError::Processing(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok(dot_product / (norm_a * norm_b))
    }
}

/// Full `rows x cols` cosine similarity matrix
pub fn similarity_matrix(rows: &[Vec<f32>], cols: &[Vec<f32>]) -> Result<Array2<f32>> {
    let a = unit_rows(rows)?;
    let b = unit_rows(cols)?;

    if a.nrows() > 0 && b.nrows() > 0 && a.ncols() != b.ncols() {
        return Err(ResumeCheckerError::Processing(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.ncols(),
            b.ncols()
        )));
    }
    if a.nrows() == 0 || b.nrows() == 0 {
        return Ok(Array2::zeros((a.nrows(), b.nrows())));
    }

    Ok(a.dot(&b.t()))
}

fn unit_rows(vectors: &[Vec<f32>]) -> Result<Array2<f32>> {
    let dim = vectors.first().map(Vec::len).unwrap_or(0);
    let mut matrix = Array2::<f32>::zeros((vectors.len(), dim));

    for (mut row, vector) in matrix.rows_mut().into_iter().zip(vectors) {
        if vector.len() != dim {
            return Err(ResumeCheckerError::Processing(format!(
                "Inconsistent embedding dimension: {} vs {}",
                vector.len(),
                dim
            )));
        }
        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            row.iter_mut().zip(vector).for_each(|(r, v)| *r = v / norm);
        }
    }

    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingEncoder {
        calls: Rc<Cell<usize>>,
    }

    impl SentenceEncoder for CountingEncoder {
        fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            self.calls.set(self.calls.get() + texts.len());
            Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]).unwrap() - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap().abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]).unwrap(), 0.0);
        assert!(cosine_similarity(&[1.0], &[1.0, 0.0]).is_err());
    }

    #[test]
    fn test_similarity_matrix_shape_and_values() {
        let rows = vec![vec![1.0, 0.0], vec![0.0, 2.0], vec![0.0, 0.0]];
        let cols = vec![vec![3.0, 0.0], vec![1.0, 1.0]];

        let matrix = similarity_matrix(&rows, &cols).unwrap();
        assert_eq!(matrix.shape(), &[3, 2]);
        assert!((matrix[[0, 0]] - 1.0).abs() < 1e-6);
        assert!(matrix[[1, 0]].abs() < 1e-6);
        assert!((matrix[[1, 1]] - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
        assert_eq!(matrix[[2, 1]], 0.0);
    }

    #[test]
    fn test_similarity_matrix_dimension_mismatch() {
        let rows = vec![vec![1.0, 0.0]];
        let cols = vec![vec![1.0, 0.0, 0.0]];
        assert!(similarity_matrix(&rows, &cols).is_err());
    }

    #[test]
    fn test_engine_caches_repeated_texts() {
        let calls = Rc::new(Cell::new(0));
        let mut engine = EmbeddingEngine::new(Box::new(CountingEncoder { calls: calls.clone() }));

        let texts = vec!["python".to_string(), "java".to_string(), "python".to_string()];
        let first = engine.encode_texts(&texts).unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(first[0], first[2]);
        assert_eq!(calls.get(), 2);

        engine.encode_texts(&texts[..2]).unwrap();
        assert_eq!(calls.get(), 2);
        assert_eq!(engine.cache_size(), 2);

        engine.clear_cache();
        assert_eq!(engine.cache_size(), 0);
    }
}
