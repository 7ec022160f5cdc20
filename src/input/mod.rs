//! Input processing module
//! Handles file detection and text extraction with fallback

pub mod file_detector;
pub mod text_extractor;
pub mod manager;

pub use manager::{extract_text_from_pdf, InputManager};
