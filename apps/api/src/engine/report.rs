//! Report aggregation — per-question scores, category sub-scores, and the
//! strengths / improvements / recommendations lists.
//!
//! Category sub-scores are the overall score times a fresh random multiplier,
//! not a measurement of technical or communication signal in the answers.
//! They are a heuristic proxy and must stay that way until a real per-category
//! model exists.

use std::ops::Range;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::analyzer::analyze;
use crate::engine::keywords::extract_keywords;
use crate::engine::tables::{TemplateTables, IMPROVEMENT_SLOT, MIN_LIST_LEN};
use crate::engine::EngineError;

const TECHNICAL_JITTER: Range<f64> = 0.9..1.1;
const COMMUNICATION_JITTER: Range<f64> = 0.9..1.1;
const PROBLEM_SOLVING_JITTER: Range<f64> = 0.8..1.0;

/// Any question at or above this earns the per-answer strength.
const STRONG_ANSWER: u32 = 80;
/// Any question at or below this earns the per-answer improvement.
const WEAK_ANSWER: u32 = 65;
/// Category strength at or above, improvement below.
const CATEGORY_BAR: u32 = 75;

/// One question/answer pair as stored by the interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewEntry {
    pub question: String,
    pub answer: String,
    /// Ignored when scoring.
    #[serde(default)]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionAnalysis {
    pub question: String,
    pub score: u32,
    pub feedback: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub overall: u32,
    pub technical: u32,
    pub communication: u32,
    pub problem_solving: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub overall_score: u32,
    pub breakdown: ScoreBreakdown,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub recommendations: Vec<String>,
    pub question_analysis: Vec<QuestionAnalysis>,
}

impl PerformanceReport {
    /// Clamps every score to 0–100 and pads short lists from the generic pools.
    /// Used on reports that did not come from this engine.
    pub fn normalized(mut self, tables: &TemplateTables) -> Self {
        self.overall_score = self.overall_score.min(100);
        self.breakdown.overall = self.breakdown.overall.min(100);
        self.breakdown.technical = self.breakdown.technical.min(100);
        self.breakdown.communication = self.breakdown.communication.min(100);
        self.breakdown.problem_solving = self.breakdown.problem_solving.min(100);
        for qa in &mut self.question_analysis {
            qa.score = qa.score.min(100);
        }
        pad_to_minimum(&mut self.strengths, &tables.generic_strengths);
        pad_to_minimum(&mut self.improvements, &tables.generic_improvements);
        pad_to_minimum(&mut self.recommendations, &tables.generic_recommendations);
        self
    }
}

/// Builds the end-of-interview report. Never fails: any fault, including an
/// interview with no answers, yields the fixed fallback report.
pub fn generate_report<R: Rng + ?Sized>(
    job_title: &str,
    job_description: &str,
    interview_data: &[InterviewEntry],
    tables: &TemplateTables,
    rng: &mut R,
) -> PerformanceReport {
    match try_generate_report(job_description, interview_data, tables, rng) {
        Ok(report) => {
            debug!(
                "Heuristic report for '{job_title}': {}/100 over {} answers",
                report.overall_score,
                report.question_analysis.len()
            );
            report
        }
        Err(e) => {
            warn!("Report aggregation for '{job_title}' failed ({e}); using fallback report");
            fallback_report(interview_data, tables)
        }
    }
}

fn try_generate_report<R: Rng + ?Sized>(
    job_description: &str,
    interview_data: &[InterviewEntry],
    tables: &TemplateTables,
    rng: &mut R,
) -> Result<PerformanceReport, EngineError> {
    if interview_data.is_empty() {
        return Err(EngineError::NoAnswers);
    }

    let keywords = extract_keywords(job_description, tables);

    let question_analysis: Vec<QuestionAnalysis> = interview_data
        .iter()
        .map(|entry| {
            let analysis = analyze(&entry.answer, &keywords, tables);
            QuestionAnalysis {
                question: entry.question.clone(),
                score: analysis.score,
                feedback: analysis.feedback,
            }
        })
        .collect();

    let total: u32 = question_analysis.iter().map(|qa| qa.score).sum();
    let overall = (total as f64 / question_analysis.len() as f64).round() as u32;

    let breakdown = ScoreBreakdown {
        overall,
        technical: jitter(overall, TECHNICAL_JITTER, rng),
        communication: jitter(overall, COMMUNICATION_JITTER, rng),
        problem_solving: jitter(overall, PROBLEM_SOLVING_JITTER, rng),
    };

    let strengths = collect_strengths(&question_analysis, &breakdown, tables);
    let improvements = collect_improvements(&question_analysis, &breakdown, tables);
    let recommendations = recommendations_for(&improvements, tables);

    if strengths.len() < MIN_LIST_LEN || improvements.len() < MIN_LIST_LEN {
        return Err(EngineError::ShortList);
    }

    Ok(PerformanceReport {
        overall_score: overall,
        breakdown,
        strengths,
        improvements,
        recommendations,
        question_analysis,
    })
}

fn jitter<R: Rng + ?Sized>(overall: u32, range: Range<f64>, rng: &mut R) -> u32 {
    let scaled = (overall as f64 * rng.gen_range(range)).round() as u32;
    scaled.min(100)
}

fn collect_strengths(
    analysis: &[QuestionAnalysis],
    breakdown: &ScoreBreakdown,
    tables: &TemplateTables,
) -> Vec<String> {
    let phrases = &tables.strengths;
    let mut strengths = Vec::new();

    if analysis.iter().any(|qa| qa.score >= STRONG_ANSWER) {
        strengths.push(phrases.answers.clone());
    }
    if breakdown.technical >= CATEGORY_BAR {
        strengths.push(phrases.technical.clone());
    }
    if breakdown.communication >= CATEGORY_BAR {
        strengths.push(phrases.communication.clone());
    }
    if breakdown.problem_solving >= CATEGORY_BAR {
        strengths.push(phrases.problem_solving.clone());
    }

    pad_to_minimum(&mut strengths, &tables.generic_strengths);
    strengths
}

fn collect_improvements(
    analysis: &[QuestionAnalysis],
    breakdown: &ScoreBreakdown,
    tables: &TemplateTables,
) -> Vec<String> {
    let phrases = &tables.improvements;
    let mut improvements = Vec::new();

    if analysis.iter().any(|qa| qa.score <= WEAK_ANSWER) {
        improvements.push(phrases.answers.clone());
    }
    if breakdown.technical < CATEGORY_BAR {
        improvements.push(phrases.technical.clone());
    }
    if breakdown.communication < CATEGORY_BAR {
        improvements.push(phrases.communication.clone());
    }
    if breakdown.problem_solving < CATEGORY_BAR {
        improvements.push(phrases.problem_solving.clone());
    }

    pad_to_minimum(&mut improvements, &tables.generic_improvements);
    improvements
}

/// One recommendation per improvement (exact-match lookup, templated when
/// unmapped), padded from the generic pool.
pub fn recommendations_for(improvements: &[String], tables: &TemplateTables) -> Vec<String> {
    let mut recommendations: Vec<String> = improvements
        .iter()
        .map(|improvement| match tables.recommendation_map.get(improvement) {
            Some(recommendation) => recommendation.clone(),
            None => tables
                .unmapped_recommendation
                .replace(IMPROVEMENT_SLOT, &improvement.to_lowercase()),
        })
        .collect();

    pad_to_minimum(&mut recommendations, &tables.generic_recommendations);
    recommendations
}

/// Appends pool entries not already present until `list` holds `MIN_LIST_LEN`.
/// Discovered entries keep their order ahead of the padding.
pub fn pad_to_minimum(list: &mut Vec<String>, pool: &[String]) {
    for item in pool {
        if list.len() >= MIN_LIST_LEN {
            break;
        }
        if !list.contains(item) {
            list.push(item.clone());
        }
    }
}

/// The constant report used when aggregation cannot run.
pub fn fallback_report(interview_data: &[InterviewEntry], tables: &TemplateTables) -> PerformanceReport {
    let fixed = &tables.fallback_report;

    let question_analysis = interview_data
        .iter()
        .map(|entry| QuestionAnalysis {
            question: entry.question.clone(),
            score: fixed.question_score,
            feedback: entry
                .feedback
                .clone()
                .filter(|f| !f.trim().is_empty())
                .unwrap_or_else(|| fixed.question_feedback.clone()),
        })
        .collect();

    PerformanceReport {
        overall_score: fixed.overall,
        breakdown: ScoreBreakdown {
            overall: fixed.overall,
            technical: fixed.technical,
            communication: fixed.communication,
            problem_solving: fixed.problem_solving,
        },
        strengths: fixed.strengths.clone(),
        improvements: fixed.improvements.clone(),
        recommendations: fixed.recommendations.clone(),
        question_analysis,
    }
}
