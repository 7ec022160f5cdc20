//! Fine-tuning the scoring model on labelled resumes

pub mod bert;
pub mod dataset;
pub mod evaluation;
pub mod loss;
pub mod pairs;
pub mod schedule;
pub mod trainer;

pub use pairs::{create_training_pairs, train_validation_split, TrainingPair};
pub use trainer::Trainer;
