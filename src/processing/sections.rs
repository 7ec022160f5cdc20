//! Resume section detection based on header phrases

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Experience,
    Education,
    Skills,
    Other,
}

impl Section {
    pub const ALL: [Section; 4] = [Section::Experience, Section::Education, Section::Skills, Section::Other];

    /// Sections that can be switched to by a header line, in matching order
    const HEADED: [Section; 3] = [Section::Experience, Section::Education, Section::Skills];

    pub fn header_phrases(self) -> &'static [&'static str] {
        match self {
            Section::Experience => &["experience", "work history", "employment"],
            Section::Education => &["education", "academic background"],
            Section::Skills => &["skills", "technical skills", "abilities"],
            Section::Other => &[],
        }
    }

    /// Multiplier applied to similarity scores found in this section
    pub fn weight(self) -> f32 {
        match self {
            Section::Experience => 1.5,
            Section::Skills => 1.3,
            Section::Education => 0.8,
            Section::Other => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Experience => "experience",
            Section::Education => "education",
            Section::Skills => "skills",
            Section::Other => "other",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text of each resume section, space-joined and trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeSections {
    sections: BTreeMap<Section, String>,
}

impl ResumeSections {
    /// Split raw resume text into sections.
    ///
    /// A line mentioning a header phrase moves the cursor to that section and
    /// is itself kept in it. When several groups match, the last one checked
    /// wins. Lines before any header belong to `other`.
    pub fn parse(text: &str) -> Self {
        let mut lines: BTreeMap<Section, Vec<&str>> = Section::ALL.iter().map(|&s| (s, Vec::new())).collect();
        let mut current = Section::Other;

        for line in text.split('\n') {
            let line_lower = line.to_lowercase();
            let line_lower = line_lower.trim();
            for section in Section::HEADED {
                if section.header_phrases().iter().any(|header| line_lower.contains(header)) {
                    current = section;
                }
            }
            lines.entry(current).or_default().push(line);
        }

        let sections = lines
            .into_iter()
            .map(|(section, lines)| (section, lines.join(" ").trim().to_string()))
            .collect();

        Self { sections }
    }

    pub fn get(&self, section: Section) -> &str {
        self.sections.get(&section).map(String::as_str).unwrap_or("")
    }

    pub fn is_empty(&self, section: Section) -> bool {
        self.get(section).is_empty()
    }

    /// Sections in fixed order with their text, including empty ones
    pub fn iter(&self) -> impl Iterator<Item = (Section, &str)> {
        self.sections.iter().map(|(section, text)| (*section, text.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_without_headers_goes_to_other() {
        let text = "Jane Doe\nPassionate builder of things\nLikes hiking";
        let sections = ResumeSections::parse(text);

        assert_eq!(sections.get(Section::Other), "Jane Doe Passionate builder of things Likes hiking");
        assert!(sections.is_empty(Section::Experience));
        assert!(sections.is_empty(Section::Education));
        assert!(sections.is_empty(Section::Skills));
    }

    #[test]
    fn test_header_line_stays_in_its_section() {
        let text = "Jane Doe\nWork Experience\nPython developer at Acme\nEducation\nBSc Computer Science";
        let sections = ResumeSections::parse(text);

        assert_eq!(sections.get(Section::Other), "Jane Doe");
        assert_eq!(sections.get(Section::Experience), "Work Experience Python developer at Acme");
        assert_eq!(sections.get(Section::Education), "Education BSc Computer Science");
    }

    #[test]
    fn test_last_matching_header_group_wins() {
        let text = "Skills and Experience\nRust, Go";
        let sections = ResumeSections::parse(text);

        assert_eq!(sections.get(Section::Skills), "Skills and Experience Rust, Go");
        assert!(sections.is_empty(Section::Experience));
    }

    #[test]
    fn test_header_matching_is_case_insensitive_substring() {
        let text = "EMPLOYMENT HISTORY\nAcme Corp\nACADEMIC BACKGROUND:\nMIT";
        let sections = ResumeSections::parse(text);

        assert_eq!(sections.get(Section::Experience), "EMPLOYMENT HISTORY Acme Corp");
        assert_eq!(sections.get(Section::Education), "ACADEMIC BACKGROUND: MIT");
    }

    #[test]
    fn test_section_weights() {
        assert!(Section::Experience.weight() > Section::Education.weight());
        assert_eq!(Section::Skills.weight(), 1.3);
        assert_eq!(Section::Other.weight(), 1.0);
    }
}
