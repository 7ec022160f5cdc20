//! Text extraction from PDF and plain-text files

use crate::error::{Result, ResumeCheckerError};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Primary PDF engine backed by `pdf-extract`
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await.map_err(ResumeCheckerError::Io)?;

        // pdf-extract panics on some malformed documents
        let extracted = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(&bytes)))
            .map_err(|_| {
                ResumeCheckerError::PdfExtraction(format!("pdf-extract panicked on '{}'", path.display()))
            })?;

        extracted.map_err(|e| {
            ResumeCheckerError::PdfExtraction(format!("Failed to extract text from PDF '{}': {}", path.display(), e))
        })
    }
}

/// Secondary PDF engine: walks pages with `lopdf` and joins them with newlines
pub struct LopdfExtractor;

impl LopdfExtractor {
    fn extract_pages(bytes: &[u8]) -> std::result::Result<String, lopdf::Error> {
        let document = lopdf::Document::load_mem(bytes)?;
        let mut text = String::new();
        for page_number in document.get_pages().keys() {
            text.push_str(&document.extract_text(&[*page_number])?);
            text.push('\n');
        }
        Ok(text)
    }
}

impl TextExtractor for LopdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await.map_err(ResumeCheckerError::Io)?;

        let extracted = panic::catch_unwind(AssertUnwindSafe(|| Self::extract_pages(&bytes)))
            .map_err(|_| ResumeCheckerError::PdfExtraction(format!("lopdf panicked on '{}'", path.display())))?;

        extracted.map_err(|e| {
            ResumeCheckerError::PdfExtraction(format!("Failed to read PDF '{}' with lopdf: {}", path.display(), e))
        })
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await.map_err(ResumeCheckerError::Io)?;
        Ok(content)
    }
}
