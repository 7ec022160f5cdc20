//! Compute device selection for candle models

use crate::error::{Result, ResumeCheckerError};
use candle_core::Device;
use log::{info, warn};

/// Environment variable forcing a device: "cpu", "cuda" or "metal"
pub const DEVICE_ENV: &str = "RESUME_CHECKER_DEVICE";

/// Get the best available device (GPU if available, CPU fallback)
pub fn get_best_device() -> Device {
    #[cfg(feature = "cuda")]
    {
        if let Ok(device) = Device::new_cuda(0) {
            info!("Using CUDA GPU");
            return device;
        }
    }

    if cfg!(target_os = "macos") {
        match Device::new_metal(0) {
            Ok(device) => {
                info!("Using Metal GPU");
                return device;
            }
            Err(e) => warn!("Metal GPU initialization failed: {}", e),
        }
    }

    info!("Using CPU");
    Device::Cpu
}

/// Resolve a device preference; the environment variable wins over `preference`
pub fn select_device(preference: &str) -> Result<Device> {
    let preference = std::env::var(DEVICE_ENV).unwrap_or_else(|_| preference.to_string());

    match preference.to_lowercase().as_str() {
        "cpu" => Ok(Device::Cpu),
        "cuda" => Device::new_cuda(0)
            .map_err(|e| ResumeCheckerError::ModelError(format!("Failed to initialize CUDA: {}", e))),
        "metal" => Device::new_metal(0)
            .map_err(|e| ResumeCheckerError::ModelError(format!("Failed to initialize Metal: {}", e))),
        "auto" | "" => Ok(get_best_device()),
        other => {
            warn!("Unknown device '{}', falling back to auto-detection", other);
            Ok(get_best_device())
        }
    }
}
