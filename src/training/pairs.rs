//! Resume / job-description pairs with heuristic match scores

use crate::processing::skills::SkillExtractor;
use crate::training::dataset::ResumeRecord;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

const CATEGORY_MATCH_SCORE: f32 = 0.7;
const CATEGORY_MISMATCH_SCORE: f32 = 0.1;
const SKILL_OVERLAP_WEIGHT: f32 = 0.3;

/// Reference job descriptions, keyed by title
pub const JOB_DESCRIPTIONS: &[(&str, &str)] = &[
    ("Software Engineer", "Looking for a Software Engineer with experience in Python, Java, and machine learning. Must have 3+ years of experience in software development and strong problem-solving skills."),
    ("Data Analyst", "Seeking a Data Analyst proficient in data analysis, SQL, Python, and Tableau. Experience with statistical modeling and data visualization is required."),
    ("HR Specialist", "Hiring an HR Specialist with expertise in employee relations, recruitment, and talent management. Strong communication skills and 5+ years of experience required."),
    ("Machine Learning Engineer", "Looking for a Machine Learning Engineer with expertise in TensorFlow, PyTorch, and deep learning. Experience with NLP and computer vision is a plus."),
    ("Product Manager", "Seeking a Product Manager with experience in agile methodologies, product lifecycle management, and stakeholder communication."),
    ("Web Developer", "Hiring a Web Developer skilled in JavaScript, React, HTML, CSS, and web development frameworks. Experience with REST APIs and Git is required."),
    ("DevOps Engineer", "Looking for a DevOps Engineer with experience in AWS, Docker, Kubernetes, CI/CD pipelines, and infrastructure as code."),
    ("Graphic Designer", "Seeking a Graphic Designer with expertise in Adobe Photoshop, Illustrator, and UI/UX design. Experience with branding and print media is a plus."),
    ("Marketing Manager", "Hiring a Marketing Manager with skills in digital marketing, SEO, content creation, and campaign management. Strong analytical skills required."),
    ("Financial Analyst", "Looking for a Financial Analyst proficient in financial modeling, Excel, and data analysis. Experience in budgeting and forecasting is required."),
    ("Cybersecurity Analyst", "Seeking a Cybersecurity Analyst with expertise in network security, penetration testing, and incident response. Certifications like CISSP or CEH are a plus."),
    ("Teacher", "Hiring a Teacher with experience in curriculum development, classroom management, and student engagement. Teaching certification required."),
    ("Nurse", "Looking for a Nurse with skills in patient care, medical record management, and emergency response. RN license required."),
    ("Civil Engineer", "Seeking a Civil Engineer with experience in structural design, project management, and AutoCAD. Knowledge of environmental regulations is a plus."),
    ("Accountant", "Hiring an Accountant with expertise in financial reporting, tax preparation, and auditing. CPA certification preferred."),
];

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingPair {
    pub resume: String,
    pub job_description: String,
    /// Target similarity in [0, 1]
    pub score: f32,
}

/// Pair every resume with every job description and label the pair
pub fn create_training_pairs(resumes: &[ResumeRecord], skills: &SkillExtractor) -> Vec<TrainingPair> {
    let jobs: Vec<_> = JOB_DESCRIPTIONS
        .iter()
        .map(|(title, description)| (title.to_lowercase(), *description, skills.contained_skills(description)))
        .collect();

    let mut pairs = Vec::with_capacity(resumes.len() * jobs.len());
    for resume in resumes {
        let category = resume.category.to_lowercase();
        let resume_skills = skills.contained_skills(&resume.text);

        for (title, description, job_skills) in &jobs {
            let base = if category.contains(title.as_str()) {
                CATEGORY_MATCH_SCORE
            } else {
                CATEGORY_MISMATCH_SCORE
            };
            let overlap = if job_skills.is_empty() {
                0.0
            } else {
                job_skills.intersection(&resume_skills).count() as f32 / job_skills.len() as f32
            };

            pairs.push(TrainingPair {
                resume: resume.text.clone(),
                job_description: description.to_string(),
                score: (base + overlap * SKILL_OVERLAP_WEIGHT).min(1.0),
            });
        }
    }
    pairs
}

/// Shuffle with a fixed seed and hold out `validation_fraction` (rounded up)
pub fn train_validation_split(
    mut pairs: Vec<TrainingPair>,
    validation_fraction: f32,
    seed: u64,
) -> (Vec<TrainingPair>, Vec<TrainingPair>) {
    let mut rng = StdRng::seed_from_u64(seed);
    pairs.shuffle(&mut rng);

    let validation_len = ((pairs.len() as f32 * validation_fraction).ceil() as usize).min(pairs.len());
    let validation = pairs.split_off(pairs.len() - validation_len);
    (pairs, validation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str, category: &str) -> ResumeRecord {
        ResumeRecord {
            text: text.to_string(),
            category: category.to_string(),
        }
    }

    #[test]
    fn test_every_resume_is_paired_with_every_job() {
        let skills = SkillExtractor::new().unwrap();
        let resumes = vec![record("python", "Data Science"), record("nursing", "Nurse")];

        let pairs = create_training_pairs(&resumes, &skills);
        assert_eq!(pairs.len(), 2 * JOB_DESCRIPTIONS.len());
        assert!(pairs.iter().all(|p| (0.0..=1.0).contains(&p.score)));
    }

    #[test]
    fn test_category_and_skill_overlap_scoring() {
        let skills = SkillExtractor::new().unwrap();
        let resumes = vec![record("I care about patient care and emergency response.", "Registered Nurse")];
        let pairs = create_training_pairs(&resumes, &skills);

        let nurse = pairs.iter().find(|p| p.job_description.contains("Looking for a Nurse")).unwrap();
        // 0.7 + (2/2) * 0.3
        assert!((nurse.score - 1.0).abs() < 1e-6);

        let teaching = pairs.iter().find(|p| p.job_description.starts_with("Hiring a Teacher")).unwrap();
        assert!((teaching.score - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_job_without_vocabulary_skills_gets_no_bonus() {
        let skills = SkillExtractor::new().unwrap();
        let resumes = vec![record("python sql", "HR")];
        let pairs = create_training_pairs(&resumes, &skills);

        let hr = pairs.iter().find(|p| p.job_description.contains("HR Specialist")).unwrap();
        // "hr specialist" is not contained in "hr"
        assert!((hr.score - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_split_is_deterministic_and_rounds_up() {
        let pairs: Vec<TrainingPair> = (0..11)
            .map(|i| TrainingPair {
                resume: format!("resume {}", i),
                job_description: "job".to_string(),
                score: 0.1,
            })
            .collect();

        let (train_a, val_a) = train_validation_split(pairs.clone(), 0.2, 42);
        let (train_b, val_b) = train_validation_split(pairs, 0.2, 42);
        assert_eq!(val_a.len(), 3);
        assert_eq!(train_a.len(), 8);
        assert_eq!(train_a, train_b);
        assert_eq!(val_a, val_b);
    }
}
