//! Command-line interfaces for the checker and the trainer

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "resume-checker")]
#[command(version)]
#[command(about = "Score a PDF resume against comma-separated target keywords")]
pub struct CheckerCli {
    /// Path to the resume (PDF or plain text)
    pub pdf_path: PathBuf,

    /// Comma-separated keywords, e.g. "python,sql,docker"
    pub keywords: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory of the fine-tuned model used for scoring
    #[arg(long)]
    pub model_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(name = "train-model")]
#[command(version)]
#[command(about = "Fine-tune the resume scoring model on labelled resume datasets")]
pub struct TrainCli {
    /// Directory containing CSV files with `Resume` and `Category` columns
    #[arg(long)]
    pub csv_dataset: Option<PathBuf>,

    /// Directory of PDF resumes named `<category>_<anything>.pdf`
    #[arg(long)]
    pub pdf_dataset: Option<PathBuf>,

    /// Where the fine-tuned model is written
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Hugging Face repo id or local directory of the base model
    #[arg(long)]
    pub base_model: Option<String>,

    #[arg(long)]
    pub epochs: Option<usize>,

    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Default env_logger filter for a binary
pub fn log_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}
