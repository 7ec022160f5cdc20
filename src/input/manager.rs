//! Input manager: routes files to extractors and applies the PDF fallback chain

use crate::error::Result;
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{LopdfExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};
use log::{info, warn};
use std::path::Path;

pub struct InputManager {
    pdf_fallback: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self { pdf_fallback: true }
    }

    /// Enable or disable the secondary PDF engine
    pub fn with_fallback(mut self, enable: bool) -> Self {
        self.pdf_fallback = enable;
        self
    }

    /// Extract text from a resume file; everything except `.txt` is treated as PDF.
    ///
    /// PDF extraction never fails here: engine errors surface as the returned
    /// text, which the caller checks for emptiness.
    pub async fn extract_text(&self, path: &Path) -> Result<String> {
        match FileType::from_path(path) {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                if self.pdf_fallback {
                    Ok(extract_text_from_pdf(path).await)
                } else {
                    Ok(PdfExtractor.extract(path).await.unwrap_or_else(|e| e.to_string()))
                }
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await
            }
        }
    }
}

/// Extract PDF text with `pdf-extract`, retrying with `lopdf` when the first
/// engine fails or produces only whitespace. If both fail the secondary
/// engine's error message is returned in place of the text.
pub async fn extract_text_from_pdf(path: &Path) -> String {
    let primary = match PdfExtractor.extract(path).await {
        Ok(text) => text,
        Err(e) => {
            warn!("pdf-extract failed: {}", e);
            String::new()
        }
    };

    if !primary.trim().is_empty() {
        return primary;
    }

    info!("Falling back to lopdf for text extraction...");
    match LopdfExtractor.extract(path).await {
        Ok(text) => text,
        Err(e) => e.to_string(),
    }
}
