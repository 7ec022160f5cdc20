//! Locating, validating and downloading sentence-embedding models

use crate::config::{Config, EncoderBackend};
use crate::error::{Result, ResumeCheckerError};
use crate::processing::device::select_device;
use crate::processing::embeddings::{SentenceEncoder, StaticEncoder};
use crate::processing::sentence_bert::{read_max_seq_length, SentenceBert, CONFIG_FILE, TOKENIZER_FILE, WEIGHTS_FILE};
use hf_hub::api::tokio::Api;
use log::info;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Manages the local model cache used by the trainer and the checker
pub struct EmbeddingModelManager {
    models_dir: PathBuf,
}

impl EmbeddingModelManager {
    pub fn new(models_dir: PathBuf) -> Self {
        Self { models_dir }
    }

    /// A usable model directory holds the config, tokenizer and safetensors weights
    pub async fn is_valid_model_directory(path: &Path) -> bool {
        for file in [CONFIG_FILE, TOKENIZER_FILE, WEIGHTS_FILE] {
            if fs::metadata(path.join(file)).await.is_err() {
                return false;
            }
        }
        true
    }

    /// Resolve a local directory or Hugging Face repo id to a model directory,
    /// downloading the repo when it is not cached yet
    pub async fn ensure_model_available(&self, repo_or_path: &str) -> Result<PathBuf> {
        let local = Path::new(repo_or_path);
        if local.is_dir() {
            if Self::is_valid_model_directory(local).await {
                return Ok(local.to_path_buf());
            }
            return Err(ResumeCheckerError::ModelLoading(format!(
                "{} does not contain {}, {} and {}",
                local.display(),
                CONFIG_FILE,
                TOKENIZER_FILE,
                WEIGHTS_FILE
            )));
        }

        let cached = self.cache_dir_for(repo_or_path);
        if Self::is_valid_model_directory(&cached).await {
            info!("Using cached base model at {}", cached.display());
            return Ok(cached);
        }

        self.download_model(repo_or_path).await
    }

    /// Download the files needed to run a BERT sentence encoder
    pub async fn download_model(&self, repo_id: &str) -> Result<PathBuf> {
        let model_dir = self.cache_dir_for(repo_id);
        fs::create_dir_all(&model_dir).await.map_err(|e| {
            ResumeCheckerError::ModelError(format!("Failed to create model directory: {}", e))
        })?;

        let api = Api::new().map_err(|e| ResumeCheckerError::ModelError(format!("Failed to initialize HF API: {}", e)))?;
        let repo = api.model(repo_id.to_string());

        info!("Downloading {} into {}", repo_id, model_dir.display());
        for file in [CONFIG_FILE, TOKENIZER_FILE, WEIGHTS_FILE] {
            let file_path = repo.get(file).await.map_err(|e| {
                ResumeCheckerError::ModelError(format!("Failed to download required file {}: {}", file, e))
            })?;
            fs::copy(&file_path, model_dir.join(file))
                .await
                .map_err(|e| ResumeCheckerError::ModelError(format!("Failed to copy {}: {}", file, e)))?;
            info!("  downloaded {}", file);
        }

        Ok(model_dir)
    }

    fn cache_dir_for(&self, repo_id: &str) -> PathBuf {
        self.models_dir.join(repo_id.replace('/', "--"))
    }
}

/// Build the configured scoring encoder from `config.model.model_dir`.
///
/// Sentences are truncated to the length the model was fine-tuned at.
pub fn load_encoder(config: &Config) -> Result<Box<dyn SentenceEncoder>> {
    let model_dir = config.model_dir();
    match config.model.backend {
        EncoderBackend::SentenceBert => {
            let device = select_device(&config.model.device)?;
            let max_seq_length = read_max_seq_length(model_dir, config.training.max_seq_length);
            Ok(Box::new(SentenceBert::load(model_dir, &device, max_seq_length)?))
        }
        EncoderBackend::Static => Ok(Box::new(StaticEncoder::load(model_dir)?)),
    }
}
