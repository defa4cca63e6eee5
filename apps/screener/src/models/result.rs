use serde::{Deserialize, Serialize};

/// A scoring dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Skills,
    Experience,
    Education,
    Projects,
    Keywords,
}

impl SectionKind {
    /// Fixed order in which sections are scored and reported.
    pub const ALL: [SectionKind; 5] = [
        SectionKind::Skills,
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Projects,
        SectionKind::Keywords,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::Skills => "skills",
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Projects => "projects",
            SectionKind::Keywords => "keywords",
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Poor,
    Fair,
    Good,
    Excellent,
}

/// Which similarity path produced the text-section scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityBackend {
    Lexical,
    Semantic,
    /// Semantic mode was configured but the embedding model was unavailable.
    LexicalFallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionScore {
    pub section: SectionKind,
    pub score: f64,
    pub max_score: f64,
    /// Effective weight after skipped sections were redistributed.
    pub weight: f64,
    pub similarity: f64, // 0.0 – 1.0
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionAnalysis {
    pub section: SectionKind,
    pub performance_level: String,
    pub matched_items: usize,
    pub missing_items: usize,
    pub key_matches: Vec<String>,
    pub key_gaps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub overall_assessment: String,
    pub strengths: Vec<String>,
    pub suggestions: Vec<String>,
    pub match_reasoning: String,
    pub section_analysis: Vec<SectionAnalysis>,
}

/// Full screening result returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub overall_score: f64, // 0 – 100
    pub overall_rating: Rating,
    pub section_scores: Vec<SectionScore>,
    pub skipped_sections: Vec<SectionKind>,
    pub key_strengths: Vec<String>,
    pub improvement_areas: Vec<String>,
    pub skill_gaps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Explanation>,
    pub similarity_backend: SimilarityBackend,
}

impl ScoringResult {
    pub fn section(&self, kind: SectionKind) -> Option<&SectionScore> {
        self.section_scores.iter().find(|s| s.section == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_kind_serde_snake_case() {
        let json = serde_json::to_string(&SectionKind::Keywords).unwrap();
        assert_eq!(json, r#""keywords""#);
    }

    #[test]
    fn test_rating_serde() {
        let rating: Rating = serde_json::from_str(r#""excellent""#).unwrap();
        assert_eq!(rating, Rating::Excellent);
    }

    #[test]
    fn test_optional_fields_omitted_when_absent() {
        let result = ScoringResult {
            overall_score: 50.0,
            overall_rating: Rating::Fair,
            section_scores: vec![],
            skipped_sections: vec![],
            key_strengths: vec![],
            improvement_areas: vec![],
            skill_gaps: vec![],
            recommendation: None,
            explanation: None,
            similarity_backend: SimilarityBackend::Lexical,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("recommendation").is_none());
        assert!(value.get("explanation").is_none());
        assert_eq!(value["similarity_backend"], "lexical");
    }
}
