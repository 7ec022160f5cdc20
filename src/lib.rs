//! Resume checker library: ATS-style scoring and embedding-model fine-tuning

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod language;
pub mod output;
pub mod processing;
pub mod training;

pub use config::Config;
pub use error::{Result, ResumeCheckerError};
