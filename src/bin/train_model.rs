//! train-model: fine-tune the resume scoring model

use clap::Parser;
use log::{error, info};
use resume_checker::cli::{log_level, TrainCli};
use resume_checker::config::Config;
use resume_checker::error::{Result, ResumeCheckerError};
use resume_checker::output::formatter::format_evaluation;
use resume_checker::processing::device::select_device;
use resume_checker::processing::embedding_manager::EmbeddingModelManager;
use resume_checker::processing::skills::SkillExtractor;
use resume_checker::processing::text_processor::TextProcessor;
use resume_checker::training::dataset::{load_csv_dataset, load_pdf_dataset};
use resume_checker::training::{create_training_pairs, train_validation_split, Trainer};
use std::process;

#[tokio::main]
async fn main() {
    let cli = TrainCli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level(cli.verbose))).init();

    if let Err(e) = run(cli).await {
        error!("Training failed: {}", e);
        process::exit(1);
    }
}

fn load_config(cli: &TrainCli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Some(output) = &cli.output {
        config.training.output_dir = output.clone();
    }
    if let Some(base_model) = &cli.base_model {
        config.training.base_model = base_model.clone();
    }
    if let Some(epochs) = cli.epochs {
        config.training.epochs = epochs;
    }
    if let Some(batch_size) = cli.batch_size {
        config.training.batch_size = batch_size;
    }
    Ok(config)
}

async fn run(cli: TrainCli) -> Result<()> {
    if cli.csv_dataset.is_none() && cli.pdf_dataset.is_none() {
        return Err(ResumeCheckerError::InvalidInput(
            "Provide --csv-dataset and/or --pdf-dataset".to_string(),
        ));
    }
    let config = load_config(&cli)?;
    let processor = TextProcessor::new();

    let mut resumes = Vec::new();
    if let Some(dir) = &cli.csv_dataset {
        println!("Loading CSV dataset from {}...", dir.display());
        let loaded = load_csv_dataset(dir, &processor)?;
        println!("Loaded {} resumes from {}", loaded.len(), dir.display());
        resumes.extend(loaded);
    }
    if let Some(dir) = &cli.pdf_dataset {
        println!("Loading PDF dataset from {}...", dir.display());
        let loaded = load_pdf_dataset(dir, &processor).await?;
        println!("Loaded {} resumes from {}", loaded.len(), dir.display());
        resumes.extend(loaded);
    }
    println!("Total resumes loaded: {}", resumes.len());

    println!("Creating training pairs...");
    let skills = SkillExtractor::new()?;
    let pairs = create_training_pairs(&resumes, &skills);
    let (train, validation) = train_validation_split(pairs, config.training.validation_split, config.training.seed);
    println!(
        "Created {} training pairs and {} validation pairs",
        train.len(),
        validation.len()
    );

    let manager = EmbeddingModelManager::new(Config::models_dir());
    let base_model_dir = manager.ensure_model_available(&config.training.base_model).await?;
    info!("Base model ready at {}", base_model_dir.display());

    let device = select_device(&config.model.device)?;
    let output_dir = config.training.output_dir.clone();

    println!("Starting model training...");
    let summary = Trainer::new(config.training, device).fit(&base_model_dir, &train, &validation)?;

    println!("{}", format_evaluation(&summary.evaluation));
    println!("Model training complete! Model saved to {}", output_dir.display());
    Ok(())
}
