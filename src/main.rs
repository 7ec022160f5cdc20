//! resume-checker: score a resume against target keywords

use clap::error::ErrorKind;
use clap::Parser;
use log::{error, info};
use resume_checker::cli::{log_level, CheckerCli};
use resume_checker::config::Config;
use resume_checker::error::Result;
use resume_checker::input::InputManager;
use resume_checker::language::detect_language;
use resume_checker::output::formatter::{error_line, report_line, sections_preview, to_json_line, warning_line, USAGE_ERROR};
use resume_checker::processing::analyzer::ResumeAnalyzer;
use resume_checker::processing::embedding_manager::load_encoder;
use resume_checker::processing::embeddings::EmbeddingEngine;
use std::process;

#[tokio::main]
async fn main() {
    let cli = match CheckerCli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(_) => {
            println!("{}", error_line(USAGE_ERROR));
            process::exit(1);
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level(cli.verbose))).init();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(cli, config).await {
        error!("{}", e);
        process::exit(1);
    }
}

fn load_config(cli: &CheckerCli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    Ok(config.with_model_dir(cli.model_dir.clone()))
}

async fn run(cli: CheckerCli, config: Config) -> Result<()> {
    info!("Checking {}", cli.pdf_path.display());

    let resume_text = match InputManager::new().extract_text(&cli.pdf_path).await {
        Ok(text) if !text.is_empty() => text,
        Ok(_) => {
            println!("{}", error_line("Failed to extract text from PDF"));
            process::exit(1);
        }
        Err(e) => {
            error!("Text extraction failed: {}", e);
            println!("{}", error_line("Failed to extract text from PDF"));
            process::exit(1);
        }
    };

    if let Some(warning) = detect_language(&resume_text).warning() {
        println!("{}", warning_line(&warning));
    }

    println!("Extracted Resume Text: {}", resume_text);

    info!("Loading scoring model from {}", config.model_dir().display());
    let encoder = load_encoder(&config)?;
    let mut analyzer = ResumeAnalyzer::new(EmbeddingEngine::new(encoder))?;
    info!("Using model {}", analyzer.model_name());

    let analysis = analyzer.analyze(&resume_text, &cli.keywords)?;

    println!("Parsed Sections: {}", sections_preview(&analysis.sections)?);
    println!("Extracted Skills: {}", to_json_line(&analysis.extracted_skills)?);
    println!("{}", report_line(&analysis.report)?);

    Ok(())
}
