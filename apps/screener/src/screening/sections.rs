//! Section Scorer: one similarity per scoring dimension, scaled to the
//! section's maximum and annotated with matched and missing keywords.

use std::collections::BTreeSet;

use crate::config::SectionWeights;
use crate::models::result::{SectionKind, SectionScore, SimilarityBackend};
use crate::screening::features::ExtractedFeatures;
use crate::screening::similarity::{coverage, SimilarityEngine, TextPair};
use crate::screening::text::{dedup_preserving_order, normalize, NormalizedText};

/// Weight of text similarity in the experience section; years fit takes the rest.
const EXPERIENCE_TEXT_SHARE: f64 = 0.8;
const EDUCATION_LEVEL_SHARE: f64 = 0.6;

/// Missing keyword reported when the resume lists no projects at all.
pub const NO_PROJECTS_KEYWORD: &str = "projects";

#[derive(Debug, Clone)]
pub struct SectionScoring {
    /// Scored sections in reporting order. `weight` holds the base weight.
    pub scores: Vec<SectionScore>,
    pub skipped: Vec<SectionKind>,
    pub backend: SimilarityBackend,
}

/// Similarity and keyword split for one section, before scaling.
struct Evaluation {
    similarity: f64,
    matched: Vec<String>,
    missing: Vec<String>,
}

/// Scores every section that has something to compare against.
pub async fn score_sections(
    features: &ExtractedFeatures,
    engine: &SimilarityEngine,
    weights: &SectionWeights,
) -> SectionScoring {
    let mut backend = engine.nominal_backend();
    let mut scores = Vec::new();
    let mut skipped = Vec::new();

    for section in SectionKind::ALL {
        let evaluation = match section {
            SectionKind::Skills => score_skills(features),
            SectionKind::Experience => score_experience(features, engine, &mut backend).await,
            SectionKind::Education => score_education(features),
            SectionKind::Projects => score_projects(features, engine, &mut backend).await,
            SectionKind::Keywords => score_keywords(features, engine, &mut backend).await,
        };

        match evaluation {
            Some(evaluation) => scores.push(build_score(section, evaluation, weights.get(section))),
            None => skipped.push(section),
        }
    }

    SectionScoring {
        scores,
        skipped,
        backend,
    }
}

fn build_score(section: SectionKind, evaluation: Evaluation, base_weight: f64) -> SectionScore {
    let similarity = evaluation.similarity.clamp(0.0, 1.0);
    let max_score = base_weight * 100.0;

    SectionScore {
        section,
        score: round1(similarity * max_score).min(max_score),
        max_score,
        weight: base_weight,
        similarity,
        matched_keywords: evaluation.matched,
        missing_keywords: evaluation.missing,
        suggestions: Vec::new(),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn note_fallback(backend: &mut SimilarityBackend, used: SimilarityBackend) {
    if used == SimilarityBackend::LexicalFallback {
        *backend = SimilarityBackend::LexicalFallback;
    }
}

/// Splits `terms` by whether `is_present` holds, keeping their order.
fn partition_terms<F>(terms: &[String], is_present: F) -> (Vec<String>, Vec<String>)
where
    F: Fn(&str) -> bool,
{
    terms.iter().cloned().partition(|t| is_present(t.as_str()))
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

/// Coverage of the job's required skills. Set-valued, so lexical in every mode.
fn score_skills(features: &ExtractedFeatures) -> Option<Evaluation> {
    let required = &features.job.required_skills;
    if required.is_empty() {
        return None;
    }

    let required_keys: BTreeSet<String> = required.iter().map(|s| normalize(s)).collect();
    let similarity = coverage(&required_keys, &features.resume_skill_keys);
    let (matched, missing) =
        partition_terms(required, |s| features.resume_skill_keys.contains(&normalize(s)));

    Some(Evaluation {
        similarity,
        matched,
        missing,
    })
}

async fn score_experience(
    features: &ExtractedFeatures,
    engine: &SimilarityEngine,
    backend: &mut SimilarityBackend,
) -> Option<Evaluation> {
    if features.experience_requirement_tokens.is_empty() {
        return None;
    }

    let text = engine
        .text_similarity(&TextPair {
            resume_text: &features.resume.experience_text,
            job_text: &features.experience_requirement_text,
            resume_tokens: &features.experience_tokens,
            job_tokens: &features.experience_requirement_tokens,
        })
        .await;
    note_fallback(backend, text.backend);

    let years_fit = if features.required_years <= 0.0 {
        1.0
    } else {
        (features.resume.experience_years / features.required_years).min(1.0)
    };

    let (matched, missing) = partition_terms(&features.experience_requirement_terms, |t| {
        features.experience_tokens.contains(t)
    });

    Some(Evaluation {
        similarity: EXPERIENCE_TEXT_SHARE * text.value + (1.0 - EXPERIENCE_TEXT_SHARE) * years_fit,
        matched,
        missing,
    })
}

/// Degree level against the lowest accepted level, blended with field of study.
fn score_education(features: &ExtractedFeatures) -> Option<Evaluation> {
    let requirement = &features.education_requirement;
    if requirement.is_empty() {
        return None;
    }

    let mut matched = Vec::new();
    let mut missing = Vec::new();

    let level_fit = requirement.level.map(|required| {
        let label = required.label().to_string();
        match features.resume.highest_education() {
            Some(held) if held.rank() >= required.rank() => {
                matched.push(label);
                1.0
            }
            Some(held) => {
                missing.push(label);
                held.rank() as f64 / required.rank() as f64
            }
            None => {
                missing.push(label);
                0.0
            }
        }
    });

    let field_fit = if requirement.fields.is_empty() {
        None
    } else {
        let education = NormalizedText::new(&features.resume.education_text);
        let (hit, miss) = partition_terms(&requirement.fields, |f| education.contains_phrase(f));
        let fit = hit.len() as f64 / requirement.fields.len() as f64;
        matched.extend(hit);
        missing.extend(miss);
        Some(fit)
    };

    let similarity = match (level_fit, field_fit) {
        (Some(level), Some(field)) => {
            EDUCATION_LEVEL_SHARE * level + (1.0 - EDUCATION_LEVEL_SHARE) * field
        }
        (Some(level), None) => level,
        (None, Some(field)) => field,
        (None, None) => return None,
    };

    Some(Evaluation {
        similarity,
        matched,
        missing,
    })
}

/// Required and preferred skills evidenced by the resume's projects.
async fn score_projects(
    features: &ExtractedFeatures,
    engine: &SimilarityEngine,
    backend: &mut SimilarityBackend,
) -> Option<Evaluation> {
    let wanted = dedup_preserving_order(
        features
            .job
            .required_skills
            .iter()
            .chain(features.job.preferred_skills.iter()),
    );
    if wanted.is_empty() {
        return None;
    }

    if features.resume.project_count == 0 {
        return Some(Evaluation {
            similarity: 0.0,
            matched: Vec::new(),
            missing: vec![NO_PROJECTS_KEYWORD.to_string()],
        });
    }

    let (matched, missing) =
        partition_terms(&wanted, |s| features.project_phrases.contains_phrase(s));
    let wanted_keys: BTreeSet<String> = wanted.iter().map(|s| normalize(s)).collect();
    let shown_keys: BTreeSet<String> = matched.iter().map(|s| normalize(s)).collect();
    let job_text = wanted.join(", ");

    let similarity = engine
        .text_similarity(&TextPair {
            resume_text: &features.resume.project_text,
            job_text: &job_text,
            resume_tokens: &shown_keys,
            job_tokens: &wanted_keys,
        })
        .await;
    note_fallback(backend, similarity.backend);

    Some(Evaluation {
        similarity: similarity.value,
        matched,
        missing,
    })
}

/// The job's most frequent terms against the whole resume.
async fn score_keywords(
    features: &ExtractedFeatures,
    engine: &SimilarityEngine,
    backend: &mut SimilarityBackend,
) -> Option<Evaluation> {
    let inventory = &features.keyword_inventory;
    if inventory.is_empty() {
        return None;
    }

    let inventory_set: BTreeSet<String> = inventory.iter().cloned().collect();
    let similarity = engine
        .text_similarity(&TextPair {
            resume_text: &features.resume.full_text,
            job_text: &features.job.full_text,
            resume_tokens: &features.resume_tokens,
            job_tokens: &inventory_set,
        })
        .await;
    note_fallback(backend, similarity.backend);

    let (matched, missing) = partition_terms(inventory, |k| features.resume_tokens.contains(k));

    Some(Evaluation {
        similarity: similarity.value,
        matched,
        missing,
    })
}
