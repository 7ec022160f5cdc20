//! Skill extraction against a fixed vocabulary

use crate::error::{Result, ResumeCheckerError};
use aho_corasick::{AhoCorasick, MatchKind};
use std::collections::{BTreeSet, HashSet};

/// Skills recognised in resumes and job descriptions
pub const SKILL_VOCABULARY: &[&str] = &[
    "python", "data analysis", "machine learning", "sql", "tableau", "java", "javascript",
    "web development", "software development", "cloud computing", "aws", "azure", "docker",
    "kubernetes", "git", "ci/cd", "agile", "scrum", "project management", "data visualization",
    "statistics", "deep learning", "nlp", "computer vision", "react", "html", "css",
    "photoshop", "illustrator", "ui/ux", "seo", "digital marketing", "financial modeling", "excel",
    "network security", "penetration testing", "incident response", "curriculum development",
    "classroom management", "patient care", "emergency response", "structural design", "autocad",
    "financial reporting", "tax preparation", "auditing",
];

/// Finds vocabulary skills in resume text, case-insensitively
pub struct SkillExtractor {
    matcher: AhoCorasick,
    vocabulary: Vec<String>,
    /// Entries that can appear as a single token
    single_tokens: HashSet<String>,
}

impl SkillExtractor {
    pub fn new() -> Result<Self> {
        Self::with_vocabulary(SKILL_VOCABULARY.iter().map(|s| s.to_string()).collect())
    }

    pub fn with_vocabulary(vocabulary: Vec<String>) -> Result<Self> {
        let vocabulary: Vec<String> = vocabulary.into_iter().map(|s| s.to_lowercase()).collect();
        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::Standard)
            .build(&vocabulary)
            .map_err(|e| ResumeCheckerError::Processing(format!("Failed to build skill matcher: {}", e)))?;

        let single_tokens = vocabulary
            .iter()
            .filter(|skill| !skill.is_empty() && skill.chars().all(char::is_alphanumeric))
            .cloned()
            .collect();

        Ok(Self {
            matcher,
            vocabulary,
            single_tokens,
        })
    }

    /// Return the de-duplicated, sorted skills mentioned in `text`.
    ///
    /// The text is split on every non-alphanumeric character, so `/` and `-`
    /// separate tokens too. Only single-word entries can match, and only as a
    /// whole token: "java" is not found inside "javascript".
    pub fn extract(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .map(str::to_lowercase)
            .filter(|token| self.single_tokens.contains(token))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Substring containment check used when labelling training pairs
    pub fn contained_skills(&self, text: &str) -> BTreeSet<String> {
        self.matcher
            .find_overlapping_iter(text)
            .map(|mat| self.vocabulary[mat.pattern().as_usize()].clone())
            .collect()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }
}
