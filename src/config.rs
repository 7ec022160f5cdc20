//! Configuration management for the resume checker

use crate::error::{Result, ResumeCheckerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides `model.model_dir`
pub const MODEL_DIR_ENV: &str = "RESUME_CHECKER_MODEL_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub model: ModelConfig,
    pub training: TrainingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Directory holding the fine-tuned model used for scoring
    pub model_dir: PathBuf,
    pub backend: EncoderBackend,
    /// Preferred device: "auto", "cpu", "cuda" or "metal"
    pub device: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncoderBackend {
    /// BERT sentence encoder produced by `train-model`
    SentenceBert,
    /// Model2Vec static embeddings
    Static,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Hugging Face repo id or local directory of the model to fine-tune
    pub base_model: String,
    pub output_dir: PathBuf,
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub weight_decay: f64,
    pub warmup_steps: usize,
    pub seed: u64,
    pub validation_split: f32,
    pub max_seq_length: usize,
    pub margin: f64,
}

impl Default for Config {
    fn default() -> Self {
        let model_dir = Self::models_dir().join("resume_checker_model");

        Self {
            model: ModelConfig {
                model_dir: model_dir.clone(),
                backend: EncoderBackend::SentenceBert,
                device: "auto".to_string(),
            },
            training: TrainingConfig {
                base_model: "sentence-transformers/paraphrase-MiniLM-L3-v2".to_string(),
                output_dir: model_dir,
                epochs: 8,
                batch_size: 4,
                learning_rate: 2e-5,
                weight_decay: 0.01,
                warmup_steps: 200,
                seed: 42,
                validation_split: 0.2,
                max_seq_length: 128,
                margin: 0.5,
            },
        }
    }
}

impl Config {
    /// Load the user configuration, writing the defaults on first use
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        let mut config = if config_path.exists() {
            Self::read_file(&config_path)?
        } else {
            let config = Self::default();
            config.save()?;
            config
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::read_file(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            ResumeCheckerError::Configuration(format!("Failed to parse config {}: {}", path.display(), e))
        })
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeCheckerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&config_path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-checker")
            .join("config.toml")
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var(MODEL_DIR_ENV) {
            if !dir.trim().is_empty() {
                self.model.model_dir = PathBuf::from(dir);
            }
        }
    }

    /// Command-line override for the model directory; takes precedence over everything else
    pub fn with_model_dir(mut self, model_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = model_dir {
            self.model.model_dir = dir;
        }
        self
    }

    /// Root of the local model store, also used to cache downloaded base models
    pub fn models_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resume-checker")
            .join("models")
    }

    pub fn model_dir(&self) -> &Path {
        &self.model.model_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_training_hyperparameters() {
        let config = Config::default();
        assert_eq!(config.training.epochs, 8);
        assert_eq!(config.training.batch_size, 4);
        assert_eq!(config.training.warmup_steps, 200);
        assert_eq!(config.training.seed, 42);
        assert!((config.training.learning_rate - 2e-5).abs() < 1e-12);
        assert_eq!(config.model.backend, EncoderBackend::SentenceBert);
    }

    #[test]
    fn test_toml_round_trip_keeps_backend() {
        let mut config = Config::default();
        config.model.backend = EncoderBackend::Static;

        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("backend = \"static\""));

        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.model.backend, EncoderBackend::Static);
    }

    #[test]
    fn test_load_from_file_and_flag_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.model.model_dir = PathBuf::from("/srv/models/from-file");
        std::fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        if std::env::var(MODEL_DIR_ENV).is_err() {
            assert_eq!(loaded.model_dir(), Path::new("/srv/models/from-file"));
        }

        let overridden = loaded.with_model_dir(Some(PathBuf::from("/tmp/flag")));
        assert_eq!(overridden.model_dir(), Path::new("/tmp/flag"));
    }

    #[test]
    fn test_invalid_toml_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "model = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ResumeCheckerError::Configuration(_)));
    }
}
