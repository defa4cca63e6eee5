//! Similarity Engine: lexical overlap or embedding cosine, selectable per deployment.
//!
//! Semantic mode degrades to the lexical value whenever the embedding model is
//! missing or a call fails. It never returns an error.

use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::bail;
use tracing::warn;

use crate::embedding::Embedder;
use crate::models::result::SimilarityBackend;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SimilarityMode {
    #[default]
    Lexical,
    Semantic,
}

impl SimilarityMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SimilarityMode::Lexical => "lexical",
            SimilarityMode::Semantic => "semantic",
        }
    }
}

impl FromStr for SimilarityMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lexical" => Ok(SimilarityMode::Lexical),
            "semantic" => Ok(SimilarityMode::Semantic),
            other => bail!("SIMILARITY_MODE must be 'lexical' or 'semantic', got '{other}'"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LexicalMetric {
    /// Share of required tokens present (keyword-match ratio).
    #[default]
    Coverage,
    /// |A ∩ B| / |A ∪ B|.
    Jaccard,
}

impl FromStr for LexicalMetric {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coverage" => Ok(LexicalMetric::Coverage),
            "jaccard" => Ok(LexicalMetric::Jaccard),
            other => bail!("LEXICAL_METRIC must be 'coverage' or 'jaccard', got '{other}'"),
        }
    }
}

/// Fraction of `required` found in `present`. An empty requirement scores 0.0.
pub fn coverage(required: &BTreeSet<String>, present: &BTreeSet<String>) -> f64 {
    if required.is_empty() {
        return 0.0;
    }
    let hits = required.iter().filter(|t| present.contains(*t)).count();
    hits as f64 / required.len() as f64
}

/// Jaccard index. Two empty sets are identical (1.0).
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}

/// Cosine similarity clamped to [0, 1]. `None` when the dimensions differ.
pub fn cosine(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.len() != b.len() {
        return None;
    }
    let (mut dot, mut norm_a, mut norm_b) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return Some(0.0);
    }
    Some((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0))
}

/// The two sides of a free-text section comparison.
#[derive(Debug, Clone, Copy)]
pub struct TextPair<'a> {
    pub resume_text: &'a str,
    pub job_text: &'a str,
    pub resume_tokens: &'a BTreeSet<String>,
    pub job_tokens: &'a BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Similarity {
    pub value: f64, // 0.0 – 1.0
    pub backend: SimilarityBackend,
}

/// Holds the configured mode and, in semantic mode, the shared embedding model.
#[derive(Clone)]
pub struct SimilarityEngine {
    mode: SimilarityMode,
    metric: LexicalMetric,
    embedder: Option<Arc<dyn Embedder>>,
}

impl SimilarityEngine {
    pub fn lexical(metric: LexicalMetric) -> Self {
        Self {
            mode: SimilarityMode::Lexical,
            metric,
            embedder: None,
        }
    }

    /// `embedder` is `None` when the model could not be loaded at startup.
    pub fn semantic(metric: LexicalMetric, embedder: Option<Arc<dyn Embedder>>) -> Self {
        Self {
            mode: SimilarityMode::Semantic,
            metric,
            embedder,
        }
    }

    pub fn mode(&self) -> SimilarityMode {
        self.mode
    }

    /// The backend a screening reports before any per-call fallback.
    pub fn nominal_backend(&self) -> SimilarityBackend {
        match (self.mode, &self.embedder) {
            (SimilarityMode::Lexical, _) => SimilarityBackend::Lexical,
            (SimilarityMode::Semantic, Some(_)) => SimilarityBackend::Semantic,
            (SimilarityMode::Semantic, None) => SimilarityBackend::LexicalFallback,
        }
    }

    /// Lexical similarity of a requirement set against what the resume offers.
    pub fn lexical_similarity(
        &self,
        required: &BTreeSet<String>,
        present: &BTreeSet<String>,
    ) -> f64 {
        match self.metric {
            LexicalMetric::Coverage => coverage(required, present),
            LexicalMetric::Jaccard => jaccard(required, present),
        }
    }

    /// Similarity of two free-text blocks in the configured mode.
    pub async fn text_similarity(&self, pair: &TextPair<'_>) -> Similarity {
        let lexical = self.lexical_similarity(pair.job_tokens, pair.resume_tokens);

        if self.mode == SimilarityMode::Lexical {
            return Similarity {
                value: lexical,
                backend: SimilarityBackend::Lexical,
            };
        }

        let fallback = Similarity {
            value: lexical,
            backend: SimilarityBackend::LexicalFallback,
        };

        let Some(embedder) = &self.embedder else {
            warn!("Semantic similarity requested but no embedding model is loaded; using lexical");
            return fallback;
        };

        if pair.resume_text.trim().is_empty() || pair.job_text.trim().is_empty() {
            return Similarity {
                value: 0.0,
                backend: SimilarityBackend::Semantic,
            };
        }

        let texts = [pair.resume_text.to_string(), pair.job_text.to_string()];
        match embedder.embed(&texts).await {
            Ok(vectors) => match (vectors.first(), vectors.get(1)) {
                (Some(r), Some(j)) => match cosine(r, j) {
                    Some(value) => Similarity {
                        value,
                        backend: SimilarityBackend::Semantic,
                    },
                    None => {
                        warn!(
                            "Embedding model '{}' returned vectors of different dimensions; using lexical",
                            embedder.model_name()
                        );
                        fallback
                    }
                },
                _ => {
                    warn!(
                        "Embedding model '{}' returned too few vectors; using lexical",
                        embedder.model_name()
                    );
                    fallback
                }
            },
            Err(e) => {
                warn!(
                    "Embedding model '{}' failed ({e}); using lexical",
                    embedder.model_name()
                );
                fallback
            }
        }
    }
}
