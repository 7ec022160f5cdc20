//! Contrastive fine-tuning of the BERT sentence encoder

use crate::config::TrainingConfig;
use crate::error::{Result, ResumeCheckerError};
use crate::output::report::TrainingSummary;
use crate::processing::sentence_bert::SentenceBert;
use crate::training::bert::FineTuneEncoder;
use crate::training::evaluation::evaluate;
use crate::training::loss::contrastive_loss;
use crate::training::pairs::TrainingPair;
use crate::training::schedule::{total_training_steps, WarmupCosine};
use candle_core::backprop::GradStore;
use candle_core::{Device, Tensor};
use candle_nn::optim::{AdamW, ParamsAdamW};
use candle_nn::{Optimizer, VarMap};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::Path;
use std::time::Instant;

pub const SUMMARY_FILE: &str = "training_summary.json";

pub struct Trainer {
    config: TrainingConfig,
    device: Device,
}

impl Trainer {
    pub fn new(config: TrainingConfig, device: Device) -> Self {
        Self { config, device }
    }

    /// Fine-tune the model in `base_model_dir` on `train`, save it to the
    /// configured output directory and score it on `validation`
    pub fn fit(
        &self,
        base_model_dir: &Path,
        train: &[TrainingPair],
        validation: &[TrainingPair],
    ) -> Result<TrainingSummary> {
        if train.is_empty() {
            return Err(ResumeCheckerError::Training("No training pairs".to_string()));
        }
        let start_time = Instant::now();
        let batch_size = self.config.batch_size.max(1);

        let (model, varmap) = FineTuneEncoder::load(base_model_dir, &self.device, self.config.max_seq_length)?;
        let params = ParamsAdamW {
            lr: self.config.learning_rate,
            weight_decay: self.config.weight_decay,
            ..Default::default()
        };
        let mut optimizer = AdamW::new(varmap.all_vars(), params)?;

        let schedule = WarmupCosine::new(
            self.config.learning_rate,
            self.config.warmup_steps,
            total_training_steps(train.len(), batch_size, self.config.epochs),
        );
        info!(
            "Training on {} pairs for {} epochs ({} steps)",
            train.len(),
            self.config.epochs,
            schedule.total_steps()
        );

        let progress = ProgressBar::new(schedule.total_steps() as u64);
        if let Ok(style) = ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} {msg}") {
            progress.set_style(style);
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut order: Vec<usize> = (0..train.len()).collect();
        let mut step = 0;
        let mut last_loss = 0.0f32;

        for epoch in 1..=self.config.epochs {
            order.shuffle(&mut rng);
            let mut epoch_loss = 0.0f32;
            let mut batches = 0;

            for batch in order.chunks(batch_size) {
                let resumes: Vec<String> = batch.iter().map(|&i| train[i].resume.clone()).collect();
                let jobs: Vec<String> = batch.iter().map(|&i| train[i].job_description.clone()).collect();
                let scores: Vec<f32> = batch.iter().map(|&i| train[i].score).collect();

                let resume_embeddings = model.embed(&resumes)?;
                let job_embeddings = model.embed(&jobs)?;
                let labels = Tensor::new(scores.as_slice(), &self.device)?;
                let loss = contrastive_loss(&resume_embeddings, &job_embeddings, &labels, self.config.margin)?;

                let grads = loss.backward()?;
                if step == 0 {
                    check_gradients(&varmap, &grads)?;
                }
                optimizer.set_learning_rate(schedule.lr_at(step));
                optimizer.step(&grads)?;

                last_loss = loss.to_scalar::<f32>()?;
                epoch_loss += last_loss;
                batches += 1;
                step += 1;

                progress.set_message(format!("epoch {} loss {:.4}", epoch, last_loss));
                progress.inc(1);
            }

            debug!("Epoch {} mean loss {:.4}", epoch, epoch_loss / batches.max(1) as f32);
        }
        progress.finish_with_message(format!("loss {:.4}", last_loss));

        SentenceBert::save(
            &varmap,
            base_model_dir,
            &self.config.output_dir,
            self.config.max_seq_length,
        )?;
        info!(
            "Model saved to {} after {:.2?}",
            self.config.output_dir.display(),
            start_time.elapsed()
        );

        let evaluation = evaluate(&model, validation)?;
        let summary = TrainingSummary {
            base_model: self.config.base_model.clone(),
            trained_at: Utc::now(),
            epochs: self.config.epochs,
            batch_size,
            learning_rate: self.config.learning_rate,
            training_pairs: train.len(),
            final_loss: last_loss,
            evaluation,
        };
        write_summary(&summary, &self.config.output_dir)?;

        Ok(summary)
    }
}

/// Fail when no trainable variable is reachable from the loss
pub fn check_gradients(varmap: &VarMap, grads: &GradStore) -> Result<()> {
    let vars = varmap.all_vars();
    let missing = vars.iter().filter(|v| grads.get(v.as_tensor()).is_none()).count();
    if !vars.is_empty() && missing == vars.len() {
        return Err(ResumeCheckerError::Training(
            "Loss has no gradient with respect to any model weight".to_string(),
        ));
    }
    if missing > 0 {
        warn!("{} of {} weights receive no gradient", missing, vars.len());
    }
    Ok(())
}

pub fn write_summary(summary: &TrainingSummary, output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir)?;
    let content = serde_json::to_string_pretty(summary)?;
    std::fs::write(output_dir.join(SUMMARY_FILE), content)?;
    Ok(())
}
