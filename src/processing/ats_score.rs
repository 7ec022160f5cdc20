//! ATS score: 70% keyword coverage plus 30% skill overlap

/// Share of the score earned by semantically matched keywords
pub const KEYWORD_WEIGHT: f64 = 70.0;
/// Share of the score earned by extracted skills that are also keywords
pub const SKILL_WEIGHT: f64 = 30.0;

/// Compute the 0-100 ATS score in double precision.
///
/// `total_keywords` is the number of comma-separated pieces in `keywords`;
/// a zero total scores 0.
pub fn calculate_ats_score(
    matched_keywords: &[String],
    total_keywords: usize,
    extracted_skills: &[String],
    keywords: &str,
) -> f64 {
    if total_keywords == 0 {
        return 0.0;
    }
    let total = total_keywords as f64;

    let base_score = matched_keywords.len() as f64 / total * KEYWORD_WEIGHT;

    let keyword_list: Vec<String> = keywords.split(',').map(|kw| kw.trim().to_lowercase()).collect();
    let skill_matches = extracted_skills
        .iter()
        .filter(|skill| keyword_list.contains(*skill))
        .count();
    let skill_bonus = skill_matches as f64 / total * SKILL_WEIGHT;

    (base_score + skill_bonus).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_zero_keywords_scores_zero() {
        assert_eq!(calculate_ats_score(&[], 0, &[], ""), 0.0);
    }

    #[test]
    fn test_linear_formula() {
        let matched = strings(&["python"]);
        let skills = strings(&["python", "docker"]);

        let score = calculate_ats_score(&matched, 3, &skills, "Python, java,cooking");
        // 1/3 * 70 + 1/3 * 30
        assert!((score - 100.0 / 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_score_is_capped_at_100() {
        // more matches than keywords can only come from duplicated keyword pieces
        let matched = strings(&["python", "sql", "aws"]);
        let skills = strings(&["python", "sql"]);

        let score = calculate_ats_score(&matched, 2, &skills, "python,sql");
        assert_eq!(score, 100.0);
    }

    #[test]
    fn test_exact_halves_truncate_to_the_expected_integer() {
        // 7/11 * 70 + 2/11 * 30 is exactly 50 in f64; single precision lands just below
        let keywords = "a,b,c,d,e,f,g,python,sql,h,i";
        let matched = strings(&["a", "b", "c", "d", "e", "f", "g"]);
        let skills = strings(&["python", "sql"]);

        let score = calculate_ats_score(&matched, 11, &skills, keywords);
        assert_eq!(score, 50.0);
        assert_eq!(crate::output::report::ResultReport::new(score, vec![], vec![], vec![]).ats_score, 50);

        let matched = strings(&["a", "b", "c", "d", "e", "f", "g"]);
        let score = calculate_ats_score(&matched, 22, &skills, keywords);
        assert_eq!(score as u32, 25);
    }

    #[test]
    fn test_score_stays_in_range() {
        let keywords = "python,sql,excel,seo";
        let skills = strings(&["python", "excel", "autocad"]);
        for matched_count in 0..=4 {
            let matched: Vec<String> = keywords.split(',').take(matched_count).map(String::from).collect();
            let score = calculate_ats_score(&matched, 4, &skills, keywords);
            assert!((0.0..=100.0).contains(&score), "score {} out of range", score);
        }
    }
}
