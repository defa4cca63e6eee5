//! Aggregator: combines section scores into the overall 0–100 score and rating.

use crate::config::ScoringConfig;
use crate::models::result::{Rating, SectionKind, SectionScore};

/// Required skills reported as gaps.
const MAX_SKILL_GAPS: usize = 5;
/// Keywords quoted in a strength or improvement line.
const KEYWORDS_QUOTED: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub overall_score: f64,
    pub overall_rating: Rating,
    pub key_strengths: Vec<String>,
    pub improvement_areas: Vec<String>,
    pub skill_gaps: Vec<String>,
}

/// Rescales base weights over the scored sections so they sum to 1.0.
///
/// Sections whose base weights are all zero share the total equally.
pub fn redistribute_weights(scores: &mut [SectionScore]) {
    if scores.is_empty() {
        return;
    }
    let total: f64 = scores.iter().map(|s| s.weight).sum();
    let count = scores.len() as f64;
    for score in scores.iter_mut() {
        score.weight = if total > 0.0 {
            score.weight / total
        } else {
            1.0 / count
        };
    }
}

/// Applies weight redistribution and computes the overall result.
///
/// The overall score uses each section's unrounded similarity
/// (`score / max_score` before rounding) so that display rounding of
/// section scores never shifts the total.
pub fn aggregate(scores: &mut [SectionScore], config: &ScoringConfig) -> Aggregate {
    redistribute_weights(scores);

    let raw: f64 = scores.iter().map(|s| s.similarity * s.weight).sum();
    let overall_score = ((raw * 100.0).clamp(0.0, 100.0) * 10.0).round() / 10.0;

    let key_strengths = scores
        .iter()
        .filter(|s| s.similarity >= config.strength_threshold)
        .map(strength_line)
        .collect();

    let improvement_areas = scores
        .iter()
        .filter(|s| s.similarity < config.improvement_threshold)
        .map(improvement_line)
        .collect();

    let skill_gaps = scores
        .iter()
        .find(|s| s.section == SectionKind::Skills)
        .map(|s| {
            s.missing_keywords
                .iter()
                .take(MAX_SKILL_GAPS)
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    Aggregate {
        overall_score,
        overall_rating: config.thresholds.rate(overall_score),
        key_strengths,
        improvement_areas,
        skill_gaps,
    }
}

fn percent(similarity: f64) -> f64 {
    (similarity * 100.0).round()
}

fn strength_line(score: &SectionScore) -> String {
    let mut line = format!(
        "Strong {} alignment ({}%)",
        score.section,
        percent(score.similarity)
    );
    if !score.matched_keywords.is_empty() {
        let quoted: Vec<&str> = score
            .matched_keywords
            .iter()
            .take(KEYWORDS_QUOTED)
            .map(String::as_str)
            .collect();
        line.push_str(&format!(": {}", quoted.join(", ")));
    }
    line
}

fn improvement_line(score: &SectionScore) -> String {
    let mut line = format!(
        "Limited {} alignment ({}%)",
        score.section,
        percent(score.similarity)
    );
    if !score.missing_keywords.is_empty() {
        let quoted: Vec<&str> = score
            .missing_keywords
            .iter()
            .take(KEYWORDS_QUOTED)
            .map(String::as_str)
            .collect();
        line.push_str(&format!(": missing {}", quoted.join(", ")));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(kind: SectionKind, base_weight: f64, similarity: f64) -> SectionScore {
        SectionScore {
            section: kind,
            score: similarity * base_weight * 100.0,
            max_score: base_weight * 100.0,
            weight: base_weight,
            similarity,
            matched_keywords: vec![],
            missing_keywords: vec![],
            suggestions: vec![],
        }
    }

    fn all_sections(similarity: f64) -> Vec<SectionScore> {
        let config = ScoringConfig::default();
        SectionKind::ALL
            .iter()
            .map(|k| section(*k, config.weights.get(*k), similarity))
            .collect()
    }

    #[test]
    fn test_perfect_match_scores_100() {
        let mut scores = all_sections(1.0);
        let result = aggregate(&mut scores, &ScoringConfig::default());
        assert_eq!(result.overall_score, 100.0);
        assert_eq!(result.overall_rating, Rating::Excellent);
        assert_eq!(result.key_strengths.len(), 5);
        assert!(result.improvement_areas.is_empty());
    }

    #[test]
    fn test_no_match_scores_zero() {
        let mut scores = all_sections(0.0);
        let result = aggregate(&mut scores, &ScoringConfig::default());
        assert_eq!(result.overall_score, 0.0);
        assert_eq!(result.overall_rating, Rating::Poor);
        assert_eq!(result.improvement_areas.len(), 5);
    }

    #[test]
    fn test_skipped_weight_is_redistributed() {
        // Skills (0.35) skipped: remaining 0.65 rescales to 1.0.
        let mut scores: Vec<SectionScore> = all_sections(0.5)
            .into_iter()
            .filter(|s| s.section != SectionKind::Skills)
            .collect();
        let result = aggregate(&mut scores, &ScoringConfig::default());

        let total: f64 = scores.iter().map(|s| s.weight).sum();
        assert!((total - 1.0).abs() < 1e-9);
        let experience = &scores[0];
        assert!((experience.weight - 0.25 / 0.65).abs() < 1e-9);
        // max_score keeps the base weight.
        assert_eq!(experience.max_score, 25.0);
        assert_eq!(result.overall_score, 50.0);
    }

    #[test]
    fn test_weighted_mix() {
        let mut scores = vec![
            section(SectionKind::Skills, 0.35, 1.0),
            section(SectionKind::Experience, 0.25, 0.0),
            section(SectionKind::Education, 0.15, 1.0),
            section(SectionKind::Projects, 0.15, 0.0),
            section(SectionKind::Keywords, 0.10, 1.0),
        ];
        let result = aggregate(&mut scores, &ScoringConfig::default());
        assert_eq!(result.overall_score, 60.0);
        assert_eq!(result.overall_rating, Rating::Good);
    }

    #[test]
    fn test_zero_base_weights_share_equally() {
        let mut scores = vec![
            section(SectionKind::Skills, 0.0, 1.0),
            section(SectionKind::Keywords, 0.0, 0.0),
        ];
        let result = aggregate(&mut scores, &ScoringConfig::default());
        assert_eq!(scores[0].weight, 0.5);
        assert_eq!(result.overall_score, 50.0);
    }

    #[test]
    fn test_no_sections_is_poor() {
        let mut scores: Vec<SectionScore> = vec![];
        let result = aggregate(&mut scores, &ScoringConfig::default());
        assert_eq!(result.overall_score, 0.0);
        assert_eq!(result.overall_rating, Rating::Poor);
    }

    #[test]
    fn test_skill_gaps_capped_at_five() {
        let mut skills = section(SectionKind::Skills, 0.35, 0.0);
        skills.missing_keywords = ["AWS", "GCP", "Go", "Rust", "Kafka", "Spark"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut scores = vec![skills];
        let result = aggregate(&mut scores, &ScoringConfig::default());
        assert_eq!(result.skill_gaps, vec!["AWS", "GCP", "Go", "Rust", "Kafka"]);
        assert_eq!(
            result.improvement_areas,
            vec!["Limited skills alignment (0%): missing AWS, GCP, Go"]
        );
    }

    #[test]
    fn test_strength_line_quotes_matches() {
        let mut skills = section(SectionKind::Skills, 0.35, 0.8);
        skills.matched_keywords = vec!["Python".to_string(), "SQL".to_string()];
        let mut scores = vec![skills];
        let result = aggregate(&mut scores, &ScoringConfig::default());
        assert_eq!(
            result.key_strengths,
            vec!["Strong skills alignment (80%): Python, SQL"]
        );
    }
}
