//! Template tables — the fixed vocabulary, question templates, feedback strings
//! and report pools the heuristic engine draws from.
//!
//! Loaded once at startup (built-in defaults, optionally overridden by a JSON
//! file) and shared as `Arc<TemplateTables>`. Never mutated after load.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Slot replaced with a keyword in technical, follow-up and feedback templates.
pub const SKILL_SLOT: &str = "{skill}";
/// Slot replaced with the job title in role-specific and fallback questions.
pub const TITLE_SLOT: &str = "{title}";
/// Slot replaced with an improvement string in unmapped recommendations.
pub const IMPROVEMENT_SLOT: &str = "{improvement}";

/// Minimum length of every report list (strengths, improvements, recommendations).
pub const MIN_LIST_LEN: usize = 3;

/// One fixed sentence per score band, highest band first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackTiers {
    /// score >= 90
    pub excellent: String,
    /// score >= 80
    pub very_good: String,
    /// score >= 70
    pub good: String,
    /// score >= 60
    pub fair: String,
    /// score < 60
    pub needs_improvement: String,
}

/// The four threshold-gated strings used for either strengths or improvements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPhrases {
    /// Emitted when any single question crosses the per-question threshold.
    pub answers: String,
    pub technical: String,
    pub communication: String,
    pub problem_solving: String,
}

/// Constant report returned when aggregation cannot run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackReport {
    pub overall: u32,
    pub technical: u32,
    pub communication: u32,
    pub problem_solving: u32,
    pub question_score: u32,
    pub question_feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateTables {
    pub vocabulary: Vec<String>,
    pub fallback_keywords: Vec<String>,
    pub technical_templates: Vec<String>,
    pub behavioral_questions: Vec<String>,
    pub role_templates: Vec<String>,
    pub fallback_questions: Vec<String>,
    pub follow_up_templates: Vec<String>,
    pub generic_follow_ups: Vec<String>,
    pub positive_feedback: Vec<String>,
    pub generic_acknowledgments: Vec<String>,
    pub fallback_feedback: String,
    pub fallback_follow_up: String,
    pub feedback_tiers: FeedbackTiers,
    pub strengths: CategoryPhrases,
    pub generic_strengths: Vec<String>,
    pub improvements: CategoryPhrases,
    pub generic_improvements: Vec<String>,
    pub recommendation_map: BTreeMap<String, String>,
    pub unmapped_recommendation: String,
    pub generic_recommendations: Vec<String>,
    pub fallback_report: FallbackReport,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

const STRENGTH_ANSWERS: &str = "Gave detailed, relevant answers to key questions";
const STRENGTH_TECHNICAL: &str = "Solid technical knowledge relevant to the role";
const STRENGTH_COMMUNICATION: &str = "Clear and effective communication";
const STRENGTH_PROBLEM_SOLVING: &str = "Structured approach to problem solving";

const IMPROVE_ANSWERS: &str = "Provide more detailed answers with concrete examples";
const IMPROVE_TECHNICAL: &str = "Deepen technical knowledge of the role's core skills";
const IMPROVE_COMMUNICATION: &str = "Structure answers more clearly and concisely";
const IMPROVE_PROBLEM_SOLVING: &str = "Explain your problem-solving process step by step";
const IMPROVE_RELEVANCE: &str = "Relate answers more directly to the job description";
const IMPROVE_IMPACT: &str = "Quantify results and impact where possible";
const IMPROVE_STAR: &str = "Prepare more examples using the STAR method";

impl Default for TemplateTables {
    fn default() -> Self {
        Self {
            vocabulary: strings(&[
                // languages & frameworks
                "javascript", "typescript", "python", "java", "golang", "rust", "ruby",
                "php", "swift", "kotlin", "react", "angular", "vue", "node", "django",
                "flask", "spring", "html", "css",
                // data & infrastructure
                "sql", "postgresql", "mysql", "mongodb", "redis", "graphql", "rest", "api",
                "aws", "azure", "gcp", "docker", "kubernetes", "terraform", "linux", "git",
                "ci/cd", "microservices", "machine learning", "data analysis",
                // soft skills
                "communication", "leadership", "teamwork", "collaboration",
                "problem solving", "mentoring", "stakeholder", "ownership",
                // process
                "agile", "scrum", "testing", "design", "architecture", "security",
                "performance", "scalability", "debugging", "code review", "documentation",
            ]),
            fallback_keywords: strings(&["experience", "skills", "projects", "challenges"]),
            technical_templates: strings(&[
                "Tell me about your experience with {skill}.",
                "How have you used {skill} in a recent project?",
                "What challenges have you faced when working with {skill}, and how did you overcome them?",
                "How would you explain {skill} to someone without a technical background?",
                "What best practices do you follow when working with {skill}?",
            ]),
            behavioral_questions: strings(&[
                "Tell me about a time you had to meet a tight deadline. How did you handle it?",
                "Describe a situation where you disagreed with a teammate. How did you resolve it?",
                "Give an example of a goal you set and how you achieved it.",
                "Tell me about a time you made a mistake at work. What did you learn from it?",
                "Describe a project you are especially proud of and your role in it.",
                "Tell me about a time you had to learn something new quickly.",
                "Describe a situation where you had to take the lead without formal authority.",
                "Tell me about a time you received critical feedback. How did you respond?",
                "Give an example of how you handled competing priorities.",
                "Describe a time you went beyond what was expected of you.",
            ]),
            role_templates: strings(&[
                "What interests you most about the {title} role?",
                "What do you think are the most important skills for a {title}?",
                "How do you stay current with developments relevant to a {title}?",
                "What would you focus on during your first 90 days as a {title}?",
                "How would your previous experience help you succeed as a {title}?",
            ]),
            fallback_questions: strings(&[
                "Tell me about yourself and why you are interested in this {title} position.",
                "What relevant experience do you bring to the {title} role?",
                "Describe a challenging project you worked on and how you handled it.",
                "What are your greatest strengths as a {title}?",
                "Tell me about an area you are working to improve.",
                "How do you approach learning new technologies or skills?",
                "Describe a time you worked effectively as part of a team.",
                "How do you prioritize your work when everything seems urgent?",
                "Where do you see yourself growing as a {title} over the next few years?",
                "Do you have any questions about the {title} position?",
            ]),
            follow_up_templates: strings(&[
                "Building on that, how have you applied {skill} in a real project?",
                "Can you describe a specific problem you solved using {skill}?",
                "How do you keep your {skill} knowledge up to date?",
                "What trade-offs have you considered when working with {skill}?",
                "How would you help a junior colleague get productive with {skill}?",
            ]),
            generic_follow_ups: strings(&[
                "Can you give me a specific example that illustrates that?",
                "What was the outcome, and what would you do differently next time?",
                "How did you measure the success of that work?",
                "What was the most difficult part of that experience?",
                "How did you collaborate with others in that situation?",
            ]),
            positive_feedback: strings(&[
                "Good job highlighting your experience with {skill}.",
                "Nice mention of {skill}; that is directly relevant to this role.",
                "Your point about {skill} shows practical understanding.",
                "Referencing {skill} connects your answer well to the job requirements.",
            ]),
            generic_acknowledgments: strings(&[
                "Thank you for your answer. Try to connect it more directly to the job requirements.",
                "Thanks for sharing. Adding concrete examples would strengthen your response.",
                "Understood. Consider mentioning specific tools or skills you used.",
            ]),
            fallback_feedback: "Thank you for your answer.".to_string(),
            fallback_follow_up: "Can you tell me more about your relevant experience?".to_string(),
            feedback_tiers: FeedbackTiers {
                excellent: "Excellent answer! You demonstrated strong knowledge with a detailed, well-structured response.".to_string(),
                very_good: "Very good answer. You covered the key points with relevant detail.".to_string(),
                good: "Good answer. Adding more specific examples would make it stronger.".to_string(),
                fair: "Adequate answer. Go deeper and tie your experience to the role's requirements.".to_string(),
                needs_improvement: "Answer needs improvement. Provide more detail, concrete examples, and relevant skills.".to_string(),
            },
            strengths: CategoryPhrases {
                answers: STRENGTH_ANSWERS.to_string(),
                technical: STRENGTH_TECHNICAL.to_string(),
                communication: STRENGTH_COMMUNICATION.to_string(),
                problem_solving: STRENGTH_PROBLEM_SOLVING.to_string(),
            },
            generic_strengths: strings(&[
                "Completed the full interview",
                "Engaged with every question",
                "Maintained a professional tone throughout",
            ]),
            improvements: CategoryPhrases {
                answers: IMPROVE_ANSWERS.to_string(),
                technical: IMPROVE_TECHNICAL.to_string(),
                communication: IMPROVE_COMMUNICATION.to_string(),
                problem_solving: IMPROVE_PROBLEM_SOLVING.to_string(),
            },
            generic_improvements: strings(&[IMPROVE_RELEVANCE, IMPROVE_IMPACT, IMPROVE_STAR]),
            recommendation_map: [
                (IMPROVE_ANSWERS, "Practice answering common questions aloud, aiming for two to three minutes and one specific example each."),
                (IMPROVE_TECHNICAL, "Review the core technologies in the job description and build a small project that uses them."),
                (IMPROVE_COMMUNICATION, "Use the STAR method (Situation, Task, Action, Result) to give your answers a clear shape."),
                (IMPROVE_PROBLEM_SOLVING, "Work through practice problems and narrate your reasoning out loud as you go."),
                (IMPROVE_RELEVANCE, "Before each interview, map every requirement in the job description to one of your experiences."),
                (IMPROVE_IMPACT, "Add numbers to your stories: time saved, users served, or performance gained."),
                (IMPROVE_STAR, "Write down five STAR stories covering leadership, conflict, failure, success, and learning."),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
            unmapped_recommendation: "Set aside focused practice time for this area: {improvement}.".to_string(),
            generic_recommendations: strings(&[
                "Schedule regular mock interviews to build confidence",
                "Research the company and role before each interview",
                "Record yourself answering questions and review the recording",
            ]),
            fallback_report: FallbackReport {
                overall: 70,
                technical: 68,
                communication: 75,
                problem_solving: 65,
                question_score: 70,
                question_feedback: "Your answer was recorded. Detailed feedback is unavailable for this question.".to_string(),
                strengths: strings(&[
                    "Completed the interview",
                    "Showed willingness to answer every question",
                    "Communicated in a professional manner",
                ]),
                improvements: strings(&[
                    "Provide more specific examples",
                    "Elaborate more on technical details",
                    "Connect answers to the job requirements",
                ]),
                recommendations: strings(&[
                    "Practice with more mock interviews",
                    "Prepare concrete examples of past work using the STAR method",
                    "Review the key skills listed in the job description",
                ]),
            },
        }
    }
}

impl TemplateTables {
    /// Built-in tables, or the JSON file at `path` layered over them.
    /// Fields missing from the file keep their built-in values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut tables = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read template tables from {}", path.display()))?;
                let tables: TemplateTables = serde_json::from_str(&raw)
                    .with_context(|| format!("Invalid template tables JSON in {}", path.display()))?;
                info!("Loaded template tables from {}", path.display());
                tables
            }
            None => TemplateTables::default(),
        };

        // Extraction matches against lower-cased descriptions.
        for term in tables
            .vocabulary
            .iter_mut()
            .chain(tables.fallback_keywords.iter_mut())
        {
            *term = term.trim().to_lowercase();
        }
        tables.vocabulary.retain(|t| !t.is_empty());
        tables.fallback_keywords.retain(|t| !t.is_empty());

        tables.validate()?;
        Ok(tables)
    }

    /// Rejects tables the engine cannot draw from.
    pub fn validate(&self) -> Result<()> {
        let pools: [(&str, &[String]); 7] = [
            ("fallback_questions", self.fallback_questions.as_slice()),
            ("follow_up_templates", self.follow_up_templates.as_slice()),
            ("generic_follow_ups", self.generic_follow_ups.as_slice()),
            ("positive_feedback", self.positive_feedback.as_slice()),
            ("generic_acknowledgments", self.generic_acknowledgments.as_slice()),
            ("technical_templates", self.technical_templates.as_slice()),
            ("behavioral_questions", self.behavioral_questions.as_slice()),
        ];
        for (name, pool) in pools {
            if pool.is_empty() {
                bail!("Template table '{name}' must not be empty");
            }
        }

        let padded: [(&str, &[String]); 6] = [
            ("fallback_keywords", self.fallback_keywords.as_slice()),
            ("generic_strengths", self.generic_strengths.as_slice()),
            ("generic_improvements", self.generic_improvements.as_slice()),
            ("generic_recommendations", self.generic_recommendations.as_slice()),
            ("fallback_report.strengths", self.fallback_report.strengths.as_slice()),
            ("fallback_report.improvements", self.fallback_report.improvements.as_slice()),
        ];
        for (name, pool) in padded {
            let distinct: HashSet<&String> = pool.iter().collect();
            if distinct.len() < MIN_LIST_LEN {
                bail!("Template table '{name}' needs at least {MIN_LIST_LEN} distinct entries");
            }
        }
        // An empty term matches every text.
        if self.fallback_keywords.iter().any(|t| t.trim().is_empty()) {
            bail!("Template table 'fallback_keywords' must not contain blank terms");
        }
        if self.fallback_report.recommendations.len() < MIN_LIST_LEN {
            bail!("Template table 'fallback_report.recommendations' needs at least {MIN_LIST_LEN} entries");
        }

        if !self.unmapped_recommendation.contains(IMPROVEMENT_SLOT) {
            bail!("'unmapped_recommendation' must contain the {IMPROVEMENT_SLOT} slot");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_tables_are_valid() {
        TemplateTables::default().validate().unwrap();
    }

    #[test]
    fn test_default_pool_sizes() {
        let t = TemplateTables::default();
        assert_eq!(t.technical_templates.len(), 5);
        assert_eq!(t.behavioral_questions.len(), 10);
        assert_eq!(t.role_templates.len(), 5);
        assert_eq!(t.fallback_questions.len(), 10);
        assert_eq!(t.follow_up_templates.len(), 5);
        assert_eq!(t.generic_follow_ups.len(), 5);
        assert_eq!(t.fallback_keywords, vec!["experience", "skills", "projects", "challenges"]);
    }

    #[test]
    fn test_every_category_phrase_has_a_recommendation() {
        let t = TemplateTables::default();
        for phrase in [
            &t.improvements.answers,
            &t.improvements.technical,
            &t.improvements.communication,
            &t.improvements.problem_solving,
        ] {
            assert!(t.recommendation_map.contains_key(phrase), "unmapped: {phrase}");
        }
    }

    #[test]
    fn test_empty_follow_up_pool_is_rejected() {
        let tables = TemplateTables {
            follow_up_templates: vec![],
            ..TemplateTables::default()
        };
        let err = tables.validate().unwrap_err();
        assert!(err.to_string().contains("follow_up_templates"));
    }

    #[test]
    fn test_short_generic_pool_is_rejected() {
        let tables = TemplateTables {
            generic_strengths: strings(&["a", "a", "b"]),
            ..TemplateTables::default()
        };
        assert!(tables.validate().is_err());
    }

    #[test]
    fn test_load_without_path_uses_defaults() {
        let tables = TemplateTables::load(None).unwrap();
        assert_eq!(tables, TemplateTables::default());
    }

    #[test]
    fn test_load_partial_file_keeps_defaults_and_lowercases_vocabulary() {
        let path = std::env::temp_dir().join(format!("tables-{}.json", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{"vocabulary": ["Elixir", "  Phoenix "]}}"#).unwrap();

        let tables = TemplateTables::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(tables.vocabulary, vec!["elixir", "phoenix"]);
        assert_eq!(tables.behavioral_questions.len(), 10);
    }

    #[test]
    fn test_blank_fallback_keyword_is_rejected() {
        let tables = TemplateTables {
            fallback_keywords: strings(&["", "a", "b", "c"]),
            ..TemplateTables::default()
        };
        let err = tables.validate().unwrap_err();
        assert!(err.to_string().contains("fallback_keywords"));
    }

    #[test]
    fn test_load_drops_blank_fallback_keywords() {
        let path = std::env::temp_dir().join(format!("tables-{}.json", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{"fallback_keywords": ["", " Teamwork ", "growth", "impact"]}}"#).unwrap();
        let tables = TemplateTables::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(tables.fallback_keywords, vec!["teamwork", "growth", "impact"]);

        let short = std::env::temp_dir().join(format!("tables-{}.json", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&short).unwrap();
        write!(file, r#"{{"fallback_keywords": ["  ", "a", "b"]}}"#).unwrap();
        let result = TemplateTables::load(Some(&short));
        std::fs::remove_file(&short).ok();
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_file_fails_with_path() {
        let err = TemplateTables::load(Some(Path::new("/nonexistent/tables.json"))).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/tables.json"));
    }
}
