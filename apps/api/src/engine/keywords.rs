//! Keyword extraction — scans a job description for the fixed vocabulary.

use crate::engine::tables::{TemplateTables, MIN_LIST_LEN};

/// Returns the vocabulary terms found in `description`, in vocabulary order.
///
/// Matching is plain substring containment on the lower-cased text, so "java"
/// also matches inside "javascript". When fewer than three terms match, the
/// fallback terms are appended so downstream generators always have material.
/// Pure: identical input always yields identical output.
pub fn extract_keywords(description: &str, tables: &TemplateTables) -> Vec<String> {
    let text = description.to_lowercase();

    let mut keywords: Vec<String> = Vec::new();
    for term in &tables.vocabulary {
        if text.contains(term.as_str()) && !keywords.contains(term) {
            keywords.push(term.clone());
        }
    }

    if keywords.len() < MIN_LIST_LEN {
        for term in &tables.fallback_keywords {
            if !keywords.contains(term) {
                keywords.push(term.clone());
            }
        }
    }

    keywords
}

/// Keywords from `keywords` that occur in `text` (case-insensitive).
pub fn mentioned_keywords<'a>(text: &str, keywords: &'a [String]) -> Vec<&'a String> {
    let text = text.to_lowercase();
    keywords
        .iter()
        .filter(|k| text.contains(k.to_lowercase().as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BACKEND_JD: &str = "We are hiring a backend engineer with strong Python and PostgreSQL \
        skills. You will design REST APIs, run services on Kubernetes in AWS, and practice \
        code review in an agile team.";

    #[test]
    fn test_matches_vocabulary_in_order() {
        let tables = TemplateTables::default();
        let keywords = extract_keywords(BACKEND_JD, &tables);
        assert_eq!(
            keywords,
            vec![
                "python", "sql", "postgresql", "rest", "api", "aws", "kubernetes",
                "agile", "design", "code review",
            ]
        );
    }

    #[test]
    fn test_substring_match_finds_java_inside_javascript() {
        let tables = TemplateTables::default();
        let keywords = extract_keywords("Senior JavaScript developer, React and Node", &tables);
        assert!(keywords.contains(&"javascript".to_string()));
        assert!(keywords.contains(&"java".to_string()));
    }

    #[test]
    fn test_sparse_description_gets_fallback_terms() {
        let tables = TemplateTables::default();
        let keywords = extract_keywords("Friendly barista wanted", &tables);
        assert_eq!(keywords, vec!["experience", "skills", "projects", "challenges"]);
    }

    #[test]
    fn test_two_matches_are_kept_before_fallback_terms() {
        let tables = TemplateTables::default();
        let keywords = extract_keywords("Docker and Linux admin", &tables);
        assert_eq!(
            keywords,
            vec!["docker", "linux", "experience", "skills", "projects", "challenges"]
        );
    }

    #[test]
    fn test_empty_description_is_never_empty() {
        let tables = TemplateTables::default();
        assert!(extract_keywords("", &tables).len() >= 3);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let tables = TemplateTables::default();
        assert_eq!(
            extract_keywords(BACKEND_JD, &tables),
            extract_keywords(BACKEND_JD, &tables)
        );
    }

    #[test]
    fn test_mentioned_keywords_ignores_case() {
        let keywords = vec!["rust".to_string(), "docker".to_string(), "sql".to_string()];
        let found = mentioned_keywords("I shipped Rust services in DOCKER", &keywords);
        assert_eq!(found, vec![&keywords[0], &keywords[1]]);
    }
}
