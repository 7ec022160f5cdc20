//! File type detection

use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum FileType {
    Pdf,
    Text,
}

impl FileType {
    /// `.txt` is read as plain text; anything else goes to the PDF engines
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "txt" => FileType::Text,
            _ => FileType::Pdf,
        }
    }

    /// Upload paths often carry no extension at all; those are PDFs too
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(FileType::Pdf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_by_extension_case_insensitively() {
        assert_eq!(FileType::from_path(Path::new("resume.PDF")), FileType::Pdf);
        assert_eq!(FileType::from_path(Path::new("resume.txt")), FileType::Text);
        assert_eq!(FileType::from_path(Path::new("resume.TXT")), FileType::Text);
    }

    #[test]
    fn test_extensionless_and_other_paths_are_pdf() {
        assert_eq!(FileType::from_path(Path::new("uploads/3f9a1c0d2b7e4a6f")), FileType::Pdf);
        assert_eq!(FileType::from_path(Path::new("resume")), FileType::Pdf);
        assert_eq!(FileType::from_path(Path::new("resume.docx")), FileType::Pdf);
    }
}
