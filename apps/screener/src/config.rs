use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::result::{Rating, SectionKind};
use crate::screening::similarity::{LexicalMetric, SimilarityMode};

/// Application configuration loaded from environment variables.
/// Only the process port and log level are needed to start; everything else has defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Request body limit for PDF uploads.
    pub max_upload_bytes: usize,
    pub similarity_mode: SimilarityMode,
    pub lexical_metric: LexicalMetric,
    /// Present when `EMBEDDING_API_URL` is set.
    pub embedding: Option<EmbeddingConfig>,
    pub scoring: ScoringConfig,
}

/// Connection settings for the remote embedding model.
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let scoring = match std::env::var("SCORING_CONFIG_PATH") {
            Ok(path) => ScoringConfig::from_file(&path)?,
            Err(_) => ScoringConfig::default(),
        };
        scoring.validate()?;

        let embedding = match std::env::var("EMBEDDING_API_URL") {
            Ok(api_url) => Some(EmbeddingConfig {
                api_url,
                api_key: std::env::var("EMBEDDING_API_KEY").ok(),
                model: std::env::var("EMBEDDING_MODEL")
                    .unwrap_or_else(|_| "text-embedding-3-small".to_string()),
                timeout_secs: std::env::var("EMBEDDING_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse::<u64>()
                    .context("EMBEDDING_TIMEOUT_SECS must be a whole number of seconds")?,
            }),
            Err(_) => None,
        };

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_upload_bytes: upload_limit_bytes(
                &std::env::var("MAX_UPLOAD_MB").unwrap_or_else(|_| "10".to_string()),
            )?,
            similarity_mode: std::env::var("SIMILARITY_MODE")
                .unwrap_or_else(|_| "lexical".to_string())
                .parse()?,
            lexical_metric: std::env::var("LEXICAL_METRIC")
                .unwrap_or_else(|_| "coverage".to_string())
                .parse()?,
            embedding,
            scoring,
        })
    }
}

/// Parses `MAX_UPLOAD_MB` into a byte count.
fn upload_limit_bytes(megabytes: &str) -> Result<usize> {
    megabytes
        .trim()
        .parse::<usize>()
        .context("MAX_UPLOAD_MB must be a whole number of megabytes")?
        .checked_mul(1024 * 1024)
        .with_context(|| format!("MAX_UPLOAD_MB={megabytes} is too large"))
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring table
// ────────────────────────────────────────────────────────────────────────────

/// Base weight of each section. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionWeights {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub projects: f64,
    pub keywords: f64,
}

impl Default for SectionWeights {
    fn default() -> Self {
        Self {
            skills: 0.35,
            experience: 0.25,
            education: 0.15,
            projects: 0.15,
            keywords: 0.10,
        }
    }
}

impl SectionWeights {
    pub fn get(&self, section: SectionKind) -> f64 {
        match section {
            SectionKind::Skills => self.skills,
            SectionKind::Experience => self.experience,
            SectionKind::Education => self.education,
            SectionKind::Projects => self.projects,
            SectionKind::Keywords => self.keywords,
        }
    }

    pub fn sum(&self) -> f64 {
        SectionKind::ALL.iter().map(|s| self.get(*s)).sum()
    }
}

/// Minimum overall score (0 – 100) for each rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingThresholds {
    pub excellent: f64,
    pub good: f64,
    pub fair: f64,
}

impl Default for RatingThresholds {
    fn default() -> Self {
        Self {
            excellent: 80.0,
            good: 60.0,
            fair: 40.0,
        }
    }
}

impl RatingThresholds {
    pub fn rate(&self, score: f64) -> Rating {
        if score >= self.excellent {
            Rating::Excellent
        } else if score >= self.good {
            Rating::Good
        } else if score >= self.fair {
            Rating::Fair
        } else {
            Rating::Poor
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: SectionWeights,
    pub thresholds: RatingThresholds,
    /// Section similarity at or above which the section is reported as a strength.
    pub strength_threshold: f64,
    /// Section similarity below which the section is reported as an improvement area.
    pub improvement_threshold: f64,
    /// Number of job terms kept in the keyword inventory.
    pub keyword_inventory_size: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: SectionWeights::default(),
            thresholds: RatingThresholds::default(),
            strength_threshold: 0.7,
            improvement_threshold: 0.5,
            keyword_inventory_size: 20,
        }
    }
}

impl ScoringConfig {
    /// Reads a JSON scoring table. Missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scoring config '{}'", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid scoring config '{}'", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        for section in SectionKind::ALL {
            let w = self.weights.get(section);
            if !(0.0..=1.0).contains(&w) {
                bail!("Weight for section '{section}' must be within 0.0 – 1.0, got {w}");
            }
        }
        let sum = self.weights.sum();
        if (sum - 1.0).abs() > 1e-6 {
            bail!("Section weights must sum to 1.0, got {sum}");
        }

        let t = &self.thresholds;
        if !(0.0..=100.0).contains(&t.fair) || !(t.fair <= t.good && t.good <= t.excellent) {
            bail!(
                "Rating thresholds must satisfy 0 <= fair <= good <= excellent <= 100 (got {}/{}/{})",
                t.fair,
                t.good,
                t.excellent
            );
        }
        if t.excellent > 100.0 {
            bail!("Excellent threshold cannot exceed 100, got {}", t.excellent);
        }

        if !(0.0..=1.0).contains(&self.strength_threshold)
            || !(0.0..=1.0).contains(&self.improvement_threshold)
        {
            bail!("Strength and improvement thresholds must be within 0.0 – 1.0");
        }
        if self.keyword_inventory_size == 0 {
            bail!("keyword_inventory_size must be at least 1");
        }
        Ok(())
    }
}
