//! Explainer: pluggable, trait-based generator of human-readable feedback for
//! a finished screening.
//!
//! Default: `RuleBasedExplainer` (deterministic, no network).
//! The pipeline holds an `Arc<dyn Explainer>`; an `Err` from it never fails a
//! screening, the explanation fields are simply left out.

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::ScoringConfig;
use crate::models::result::{Explanation, Rating, SectionAnalysis, SectionKind, SectionScore};
use crate::models::resume::EducationLevel;
use crate::screening::aggregate::Aggregate;
use crate::screening::features::ExtractedFeatures;
use crate::screening::sections::NO_PROJECTS_KEYWORD;

/// Suggestions and strengths kept in the explanation.
const MAX_ITEMS: usize = 5;
/// Keywords quoted per suggestion.
const QUOTED: usize = 3;
/// Vague achievement bullets turned into suggestions.
const MAX_IMPACT_SUGGESTIONS: usize = 2;

#[derive(Debug, Error)]
pub enum ExplainError {
    #[error("Nothing to explain: no section could be scored")]
    NoSections,
}

/// Everything an explainer may read. Borrowed from the pipeline.
pub struct ExplainContext<'a> {
    pub features: &'a ExtractedFeatures,
    pub sections: &'a [SectionScore],
    pub aggregate: &'a Aggregate,
    pub config: &'a ScoringConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExplainOutput {
    pub recommendation: String,
    pub explanation: Explanation,
    /// Per-section suggestions; sections without any are absent.
    pub section_suggestions: BTreeMap<SectionKind, Vec<String>>,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap how feedback is written without touching scoring.
#[async_trait]
pub trait Explainer: Send + Sync {
    async fn explain(&self, ctx: &ExplainContext<'_>) -> Result<ExplainOutput, ExplainError>;
}

// ────────────────────────────────────────────────────────────────────────────
// RuleBasedExplainer
// ────────────────────────────────────────────────────────────────────────────

/// Template-driven feedback from section scores, keyword gaps and impact analysis.
///
/// When no section has a missing keyword the feedback is strengths-only:
/// no suggestions are produced at all.
pub struct RuleBasedExplainer;

#[async_trait]
impl Explainer for RuleBasedExplainer {
    async fn explain(&self, ctx: &ExplainContext<'_>) -> Result<ExplainOutput, ExplainError> {
        if ctx.sections.is_empty() {
            return Err(ExplainError::NoSections);
        }
        Ok(build_explanation(ctx))
    }
}

fn build_explanation(ctx: &ExplainContext<'_>) -> ExplainOutput {
    let strengths_only = ctx.sections.iter().all(|s| s.missing_keywords.is_empty());

    let section_suggestions = if strengths_only {
        BTreeMap::new()
    } else {
        ctx.sections
            .iter()
            .map(|s| (s.section, section_suggestions(s, ctx)))
            .filter(|(_, suggestions)| !suggestions.is_empty())
            .collect()
    };

    let suggestions: Vec<String> = section_suggestions
        .values()
        .flatten()
        .take(MAX_ITEMS)
        .cloned()
        .collect();

    let explanation = Explanation {
        overall_assessment: overall_assessment(ctx.aggregate),
        strengths: strengths(ctx),
        suggestions,
        match_reasoning: match_reasoning(ctx),
        section_analysis: ctx.sections.iter().map(section_analysis).collect(),
    };

    ExplainOutput {
        recommendation: recommendation(ctx.aggregate),
        explanation,
        section_suggestions,
    }
}

fn quote(items: &[String]) -> String {
    items
        .iter()
        .take(QUOTED)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn section_suggestions(score: &SectionScore, ctx: &ExplainContext<'_>) -> Vec<String> {
    let missing = &score.missing_keywords;
    let mut out = Vec::new();

    match score.section {
        SectionKind::Skills => {
            if !missing.is_empty() {
                out.push(format!("Add experience with {}", quote(missing)));
            }
        }
        SectionKind::Experience => {
            if !missing.is_empty() {
                out.push(format!(
                    "Describe work involving {} in your role descriptions",
                    quote(missing)
                ));
            }
            let features = ctx.features;
            if features.resume.experience_years < features.required_years {
                out.push(format!(
                    "The role asks for {} years of experience; make the length of relevant roles explicit",
                    features.required_years
                ));
            }
            out.extend(
                features
                    .impact
                    .gaps
                    .iter()
                    .take(MAX_IMPACT_SUGGESTIONS)
                    .map(|gap| format!("\"{}\": {}. {}", gap.bullet, gap.reason, gap.suggestion)),
            );
        }
        SectionKind::Education => {
            if !missing.is_empty() {
                out.push(format!(
                    "Highlight {} or relevant coursework and certifications",
                    quote(missing)
                ));
            }
        }
        SectionKind::Projects => {
            if missing.len() == 1 && missing[0] == NO_PROJECTS_KEYWORD {
                out.push(
                    "Add projects that demonstrate the key skills named in the job requirements"
                        .to_string(),
                );
            } else if !missing.is_empty() {
                out.push(format!("Add projects that demonstrate {}", quote(missing)));
            }
        }
        SectionKind::Keywords => {
            if !missing.is_empty() {
                out.push(format!(
                    "Incorporate key terms throughout the resume: {}",
                    quote(missing)
                ));
            }
        }
    }
    out
}

fn overall_assessment(aggregate: &Aggregate) -> String {
    let score = aggregate.overall_score;
    match aggregate.overall_rating {
        Rating::Excellent => format!(
            "Excellent match ({score:.1}/100). The candidate aligns strongly with the job requirements across multiple areas."
        ),
        Rating::Good => format!(
            "Good match ({score:.1}/100). The candidate shows solid potential with some areas that could be strengthened."
        ),
        Rating::Fair => format!(
            "Moderate match ({score:.1}/100). The candidate has relevant qualifications but significant gaps exist."
        ),
        Rating::Poor => format!(
            "Limited match ({score:.1}/100). The resume needs substantial changes to meet the role requirements."
        ),
    }
}

fn strengths(ctx: &ExplainContext<'_>) -> Vec<String> {
    let mut out = ctx.aggregate.key_strengths.clone();
    let resume = &ctx.features.resume;

    if resume
        .highest_education()
        .is_some_and(|l| l.rank() >= EducationLevel::Master.rank())
    {
        out.push("Advanced education credentials".to_string());
    }
    if resume.project_count >= 2 {
        out.push("Project portfolio demonstrating practical skills".to_string());
    }
    let impact = &ctx.features.impact;
    if impact.quantified_bullets > 0 {
        out.push(format!(
            "{} of {} experience bullets ({:.0}%) state a measurable outcome",
            impact.quantified_bullets,
            impact.total_bullets,
            impact.quantified_ratio() * 100.0
        ));
    }

    out.truncate(MAX_ITEMS);
    out
}

fn match_reasoning(ctx: &ExplainContext<'_>) -> String {
    let high = section_names(ctx.sections, |s| s.similarity >= ctx.config.strength_threshold);
    let low = section_names(ctx.sections, |s| s.similarity < ctx.config.improvement_threshold);

    let mut parts = Vec::new();
    if !high.is_empty() {
        parts.push(format!(
            "Strong performance in {} contributed positively to the overall score.",
            high.join(", ")
        ));
    }
    if !low.is_empty() {
        parts.push(format!(
            "Lower scores in {} reduced the overall match.",
            low.join(", ")
        ));
    }

    let weights: Vec<String> = ctx
        .sections
        .iter()
        .map(|s| format!("{} ({:.0}%)", s.section, s.weight * 100.0))
        .collect();
    parts.push(format!(
        "The overall score is a weighted combination of {}.",
        weights.join(", ")
    ));

    parts.join(" ")
}

fn section_names<F>(sections: &[SectionScore], pred: F) -> Vec<&'static str>
where
    F: Fn(&SectionScore) -> bool,
{
    sections
        .iter()
        .filter(|s| pred(s))
        .map(|s| s.section.as_str())
        .collect()
}

fn performance_level(similarity: f64) -> &'static str {
    if similarity >= 0.8 {
        "Excellent"
    } else if similarity >= 0.6 {
        "Good"
    } else if similarity >= 0.4 {
        "Fair"
    } else {
        "Needs Improvement"
    }
}

fn section_analysis(score: &SectionScore) -> SectionAnalysis {
    SectionAnalysis {
        section: score.section,
        performance_level: performance_level(score.similarity).to_string(),
        matched_items: score.matched_keywords.len(),
        missing_items: score.missing_keywords.len(),
        key_matches: score.matched_keywords.iter().take(QUOTED).cloned().collect(),
        key_gaps: score.missing_keywords.iter().take(QUOTED).cloned().collect(),
    }
}

fn recommendation(aggregate: &Aggregate) -> String {
    let mut text = match aggregate.overall_rating {
        Rating::Excellent => "Strong fit: recommend advancing to interview.".to_string(),
        Rating::Good => "Good fit: recommend advancing, probing the gaps below.".to_string(),
        Rating::Fair => {
            "Partial fit: consider only if the gaps below can be closed quickly.".to_string()
        }
        Rating::Poor => "Not recommended for this role at this time.".to_string(),
    };
    if !aggregate.skill_gaps.is_empty() {
        text.push_str(&format!(" Key skill gaps: {}.", quote(&aggregate.skill_gaps)));
    }
    text
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::job::{JobDescription, JobInput};
    use crate::models::resume::{ResumeDocument, ResumeInput, WorkExperience};
    use crate::screening::aggregate::aggregate;
    use crate::screening::features::extract;

    fn features() -> ExtractedFeatures {
        let resume = ResumeDocument {
            experience: vec![WorkExperience {
                title: "Analyst".to_string(),
                start_date: NaiveDate::from_ymd_opt(2023, 6, 1),
                achievements: vec![
                    "Cut report time by 40%".to_string(),
                    "Improved the onboarding flow".to_string(),
                ],
                ..Default::default()
            }],
            ..Default::default()
        };
        let job = JobDescription {
            title: "Analyst".to_string(),
            description: "Reporting".to_string(),
            requirements: vec!["3+ years of experience".to_string()],
            ..Default::default()
        };
        extract(
            &ResumeInput::Structured(resume),
            &JobInput::Structured(job),
            20,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        )
    }

    fn score(kind: SectionKind, similarity: f64, matched: &[&str], missing: &[&str]) -> SectionScore {
        SectionScore {
            section: kind,
            score: similarity * 35.0,
            max_score: 35.0,
            weight: 0.35,
            similarity,
            matched_keywords: matched.iter().map(|s| s.to_string()).collect(),
            missing_keywords: missing.iter().map(|s| s.to_string()).collect(),
            suggestions: vec![],
        }
    }

    async fn run(mut sections: Vec<SectionScore>) -> Result<ExplainOutput, ExplainError> {
        let config = ScoringConfig::default();
        let features = features();
        let aggregate = aggregate(&mut sections, &config);
        let ctx = ExplainContext {
            features: &features,
            sections: &sections,
            aggregate: &aggregate,
            config: &config,
        };
        RuleBasedExplainer.explain(&ctx).await
    }

    #[tokio::test]
    async fn test_missing_skills_become_suggestions() {
        let output = run(vec![score(
            SectionKind::Skills,
            0.5,
            &["Python"],
            &["AWS", "Docker", "Kubernetes", "Terraform"],
        )])
        .await
        .unwrap();

        let skills = &output.section_suggestions[&SectionKind::Skills];
        assert_eq!(skills, &vec!["Add experience with AWS, Docker, Kubernetes".to_string()]);
        assert_eq!(output.explanation.suggestions, *skills);
        assert!(output.recommendation.contains("Key skill gaps: AWS, Docker, Kubernetes"));
    }

    #[tokio::test]
    async fn test_no_missing_keywords_is_strengths_only() {
        let output = run(vec![
            score(SectionKind::Skills, 1.0, &["Python", "SQL"], &[]),
            score(SectionKind::Experience, 0.9, &["reporting"], &[]),
        ])
        .await
        .unwrap();

        assert!(output.section_suggestions.is_empty());
        assert!(output.explanation.suggestions.is_empty());
        assert!(!output.explanation.strengths.is_empty());
        assert!(output.explanation.overall_assessment.starts_with("Excellent match"));
    }

    #[tokio::test]
    async fn test_experience_suggestions_include_years_and_impact() {
        let output = run(vec![score(
            SectionKind::Experience,
            0.3,
            &[],
            &["reporting"],
        )])
        .await
        .unwrap();

        let experience = &output.section_suggestions[&SectionKind::Experience];
        assert!(experience[0].contains("reporting"));
        assert!(experience[1].contains("3 years"));
        assert!(experience[2].starts_with("\"Improved the onboarding flow\""));
        assert!(experience[2].contains("vague verb 'improved'"));
    }

    #[tokio::test]
    async fn test_no_projects_suggestion() {
        let output = run(vec![score(
            SectionKind::Projects,
            0.0,
            &[],
            &[NO_PROJECTS_KEYWORD],
        )])
        .await
        .unwrap();
        assert!(output.section_suggestions[&SectionKind::Projects][0].starts_with("Add projects"));
    }

    #[tokio::test]
    async fn test_section_analysis_levels() {
        let output = run(vec![
            score(SectionKind::Skills, 0.85, &["a", "b", "c", "d"], &["e"]),
            score(SectionKind::Keywords, 0.2, &[], &["x"]),
        ])
        .await
        .unwrap();
        let analysis = &output.explanation.section_analysis;
        assert_eq!(analysis[0].performance_level, "Excellent");
        assert_eq!(analysis[0].matched_items, 4);
        assert_eq!(analysis[0].key_matches.len(), 3);
        assert_eq!(analysis[1].performance_level, "Needs Improvement");
        assert!(output.explanation.match_reasoning.contains("Lower scores in keywords"));
    }

    #[tokio::test]
    async fn test_strengths_mention_quantified_bullets() {
        let output = run(vec![score(SectionKind::Skills, 0.9, &["Python"], &[])])
            .await
            .unwrap();
        assert!(output
            .explanation
            .strengths
            .contains(&"1 of 2 experience bullets (50%) state a measurable outcome".to_string()));
    }

    #[tokio::test]
    async fn test_nothing_to_explain_is_an_error() {
        let err = run(vec![]).await.unwrap_err();
        assert!(matches!(err, ExplainError::NoSections));
    }
}
