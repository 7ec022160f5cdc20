//! BERT sentence encoder with mean pooling, plus the file layout shared with fine-tuning

use crate::error::{Result, ResumeCheckerError};
use crate::processing::embeddings::SentenceEncoder;
use candle_core::{DType, Device, Tensor};
use candle_nn::{VarBuilder, VarMap};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};

pub const CONFIG_FILE: &str = "config.json";
pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const WEIGHTS_FILE: &str = "model.safetensors";
/// Encoder settings written next to fine-tuned weights
pub const SETTINGS_FILE: &str = "sentence_bert_config.json";

/// Texts per forward pass at inference time
const ENCODE_BATCH_SIZE: usize = 32;

#[derive(Debug, Serialize, Deserialize)]
struct EncoderSettings {
    max_seq_length: usize,
}

pub struct SentenceBert {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    name: String,
}

impl SentenceBert {
    /// Load frozen weights for inference
    pub fn load(model_dir: &Path, device: &Device, max_seq_length: usize) -> Result<Self> {
        let start_time = Instant::now();
        let config = read_config(model_dir)?;
        let tokenizer = load_tokenizer(model_dir, max_seq_length)?;

        let weights = required_file(model_dir, WEIGHTS_FILE)?;
        // SAFETY: the weights file is not modified while mapped
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights], DType::F32, device)? };
        let model = BertModel::load(vb, &config)?;

        info!("Sentence encoder loaded from {} in {:.2?}", model_dir.display(), start_time.elapsed());

        Ok(Self {
            model,
            tokenizer,
            device: device.clone(),
            name: model_dir.display().to_string(),
        })
    }

    /// Mean-pooled embeddings of shape `[texts.len(), hidden_size]`
    pub fn embed(&self, texts: &[String]) -> Result<Tensor> {
        let (input_ids, attention_mask) = tokenize(&self.tokenizer, texts, &self.device)?;
        let token_type_ids = input_ids.zeros_like()?;

        let hidden = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        mean_pool(&hidden, &attention_mask)
    }

    /// Persist fine-tuned weights together with the config and tokenizer they
    /// belong to, and the sequence length they were trained at
    pub fn save(varmap: &VarMap, source_dir: &Path, output_dir: &Path, max_seq_length: usize) -> Result<()> {
        std::fs::create_dir_all(output_dir)?;
        varmap.save(output_dir.join(WEIGHTS_FILE))?;
        for file in [CONFIG_FILE, TOKENIZER_FILE] {
            std::fs::copy(required_file(source_dir, file)?, output_dir.join(file))?;
        }
        let settings = serde_json::to_string_pretty(&EncoderSettings { max_seq_length })?;
        std::fs::write(output_dir.join(SETTINGS_FILE), settings)?;
        Ok(())
    }
}

impl SentenceEncoder for SentenceBert {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(ENCODE_BATCH_SIZE) {
            let pooled = self.embed(batch)?.detach();
            embeddings.extend(pooled.to_vec2::<f32>()?);
        }
        Ok(embeddings)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Sequence length stored with a fine-tuned model, or `default` when absent
pub fn read_max_seq_length(model_dir: &Path, default: usize) -> usize {
    let path = model_dir.join(SETTINGS_FILE);
    let Ok(content) = std::fs::read_to_string(&path) else {
        return default;
    };
    match serde_json::from_str::<EncoderSettings>(&content) {
        Ok(settings) => settings.max_seq_length,
        Err(e) => {
            warn!("Ignoring unreadable {}: {}", path.display(), e);
            default
        }
    }
}

/// Tokenize a batch into `(input_ids, attention_mask)`, both `[batch, seq]`
pub(crate) fn tokenize(tokenizer: &Tokenizer, texts: &[String], device: &Device) -> Result<(Tensor, Tensor)> {
    let encodings = tokenizer
        .encode_batch(texts.to_vec(), true)
        .map_err(|e| ResumeCheckerError::Embedding(format!("Tokenization failed: {}", e)))?;

    let ids = encodings
        .iter()
        .map(|encoding| Tensor::new(encoding.get_ids(), device))
        .collect::<candle_core::Result<Vec<_>>>()?;
    let masks = encodings
        .iter()
        .map(|encoding| Tensor::new(encoding.get_attention_mask(), device))
        .collect::<candle_core::Result<Vec<_>>>()?;

    Ok((Tensor::stack(&ids, 0)?, Tensor::stack(&masks, 0)?))
}

/// Average token states over the attention mask: `[batch, seq, hidden]` -> `[batch, hidden]`
pub(crate) fn mean_pool(hidden: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
    // every sequence has at least [CLS] and [SEP]
    let mask = attention_mask.to_dtype(DType::F32)?.unsqueeze(2)?;
    let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
    let counts = mask.sum(1)?;
    Ok(summed.broadcast_div(&counts)?)
}

pub(crate) fn required_file(model_dir: &Path, file: &str) -> Result<PathBuf> {
    let path = model_dir.join(file);
    if path.exists() {
        Ok(path)
    } else {
        Err(ResumeCheckerError::ModelLoading(format!(
            "{} is missing from model directory {}",
            file,
            model_dir.display()
        )))
    }
}

fn read_config(model_dir: &Path) -> Result<BertConfig> {
    let config_str = std::fs::read_to_string(required_file(model_dir, CONFIG_FILE)?)?;
    serde_json::from_str(&config_str)
        .map_err(|e| ResumeCheckerError::ModelLoading(format!("Failed to parse {}: {}", CONFIG_FILE, e)))
}

pub(crate) fn load_tokenizer(model_dir: &Path, max_seq_length: usize) -> Result<Tokenizer> {
    let mut tokenizer = Tokenizer::from_file(required_file(model_dir, TOKENIZER_FILE)?)
        .map_err(|e| ResumeCheckerError::ModelLoading(format!("Failed to load tokenizer: {}", e)))?;

    tokenizer.with_padding(Some(PaddingParams {
        strategy: PaddingStrategy::BatchLongest,
        ..Default::default()
    }));
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: max_seq_length,
            ..Default::default()
        }))
        .map_err(|e| ResumeCheckerError::ModelLoading(format!("Invalid truncation settings: {}", e)))?;

    Ok(tokenizer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_directory_is_loading_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = SentenceBert::load(&dir.path().join("absent"), &Device::Cpu, 128);

        match result {
            Err(ResumeCheckerError::ModelLoading(message)) => assert!(message.contains(CONFIG_FILE)),
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("loading from an empty directory must fail"),
        }
    }

    #[test]
    fn test_max_seq_length_round_trips_through_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_max_seq_length(dir.path(), 128), 128);

        std::fs::write(dir.path().join(SETTINGS_FILE), r#"{"max_seq_length": 64}"#).unwrap();
        assert_eq!(read_max_seq_length(dir.path(), 128), 64);

        std::fs::write(dir.path().join(SETTINGS_FILE), "not json").unwrap();
        assert_eq!(read_max_seq_length(dir.path(), 128), 128);
    }

    #[test]
    fn test_mean_pool_ignores_padding() {
        let hidden = Tensor::new(&[[[1.0f32, 2.0], [3.0, 4.0], [100.0, 100.0]]], &Device::Cpu).unwrap();
        let mask = Tensor::new(&[[1u32, 1, 0]], &Device::Cpu).unwrap();

        let pooled = mean_pool(&hidden, &mask).unwrap().to_vec2::<f32>().unwrap();
        assert_eq!(pooled, vec![vec![2.0, 3.0]]);
    }
}
