//! Learning-rate schedule: linear warmup then cosine decay to zero

use std::f64::consts::PI;

#[derive(Debug, Clone, Copy)]
pub struct WarmupCosine {
    peak_lr: f64,
    warmup_steps: usize,
    total_steps: usize,
}

impl WarmupCosine {
    pub fn new(peak_lr: f64, warmup_steps: usize, total_steps: usize) -> Self {
        Self {
            peak_lr,
            warmup_steps,
            total_steps,
        }
    }

    /// Learning rate for the optimizer step with zero-based index `step`
    pub fn lr_at(&self, step: usize) -> f64 {
        if step < self.warmup_steps {
            return self.peak_lr * step as f64 / self.warmup_steps.max(1) as f64;
        }
        let progress = (step - self.warmup_steps) as f64 / (self.total_steps.saturating_sub(self.warmup_steps)).max(1) as f64;
        self.peak_lr * (0.5 * (1.0 + (PI * progress).cos())).max(0.0)
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }
}

/// Optimizer steps for `pairs` examples in batches of `batch_size` over `epochs`
pub fn total_training_steps(pairs: usize, batch_size: usize, epochs: usize) -> usize {
    pairs.div_ceil(batch_size.max(1)) * epochs
}
