//! Screening pipeline: validate, extract features, score sections, aggregate,
//! then optionally explain.
//!
//! `Screener` is built once at startup and shared as `Arc<Screener>`. It holds
//! only read-only state, so concurrent requests need no coordination.

pub mod aggregate;
pub mod explainer;
pub mod features;
pub mod handlers;
pub mod impact;
pub mod sections;
pub mod similarity;
pub mod text;
pub mod validation;
pub mod vocabulary;

use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ScoringConfig;
use crate::errors::AppError;
use crate::models::job::JobInput;
use crate::models::result::ScoringResult;
use crate::models::resume::ResumeInput;
use crate::screening::aggregate::aggregate;
use crate::screening::explainer::{ExplainContext, Explainer};
use crate::screening::features::extract;
use crate::screening::sections::score_sections;
use crate::screening::similarity::SimilarityEngine;
use crate::screening::validation::{validate_job, validate_resume};

fn default_explain() -> bool {
    true
}

/// One resume against one job.
#[derive(Debug, Clone, Deserialize)]
pub struct ScreeningRequest {
    pub resume: ResumeInput,
    pub job: JobInput,
    #[serde(default = "default_explain")]
    pub explain: bool,
    /// Reference date for open-ended roles. Defaults to today.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

/// Many resumes against one job. Explanations are off unless requested.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchScreeningRequest {
    pub resumes: Vec<ResumeInput>,
    pub job: JobInput,
    #[serde(default)]
    pub explain: bool,
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchItem {
    /// Position of the resume in the request.
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ScoringResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResult {
    pub job_title: String,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<BatchItem>,
    /// Indices of screened resumes, best score first. Ties keep input order.
    pub ranking: Vec<usize>,
}

pub struct Screener {
    config: ScoringConfig,
    engine: SimilarityEngine,
    explainer: Arc<dyn Explainer>,
}

impl Screener {
    pub fn new(config: ScoringConfig, engine: SimilarityEngine, explainer: Arc<dyn Explainer>) -> Self {
        Self {
            config,
            engine,
            explainer,
        }
    }

    pub fn engine(&self) -> &SimilarityEngine {
        &self.engine
    }

    /// Screens one resume. `as_of` is the reference date for open-ended roles;
    /// callers pass the request's own date or today.
    pub async fn screen(
        &self,
        request: &ScreeningRequest,
        as_of: NaiveDate,
    ) -> Result<ScoringResult, AppError> {
        validate_job(&request.job)?;
        validate_resume(&request.resume)?;
        Ok(self
            .screen_validated(&request.resume, &request.job, request.explain, as_of)
            .await)
    }

    /// Screens each resume independently. A resume that fails validation gets
    /// an error entry; the rest of the batch still runs.
    pub async fn screen_batch(
        &self,
        resumes: &[ResumeInput],
        job: &JobInput,
        explain: bool,
        as_of: NaiveDate,
    ) -> Result<BatchResult, AppError> {
        validate_job(job)?;
        if resumes.is_empty() {
            return Err(AppError::Validation(
                "Batch must contain at least one resume".to_string(),
            ));
        }

        let mut results = Vec::with_capacity(resumes.len());
        for (index, resume) in resumes.iter().enumerate() {
            let item = match validate_resume(resume) {
                Ok(()) => BatchItem {
                    index,
                    result: Some(self.screen_validated(resume, job, explain, as_of).await),
                    error: None,
                },
                Err(e) => {
                    warn!(index, "Skipping resume in batch: {e}");
                    BatchItem {
                        index,
                        result: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            results.push(item);
        }

        let mut ranked: Vec<(usize, f64)> = results
            .iter()
            .filter_map(|item| item.result.as_ref().map(|r| (item.index, r.overall_score)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        let succeeded = ranked.len();
        info!(
            total = resumes.len(),
            succeeded,
            "Batch screening complete"
        );

        Ok(BatchResult {
            job_title: job.title().to_string(),
            total: resumes.len(),
            succeeded,
            failed: resumes.len() - succeeded,
            results,
            ranking: ranked.into_iter().map(|(index, _)| index).collect(),
        })
    }

    async fn screen_validated(
        &self,
        resume: &ResumeInput,
        job: &JobInput,
        explain: bool,
        as_of: NaiveDate,
    ) -> ScoringResult {
        let started = Instant::now();

        let features = extract(resume, job, self.config.keyword_inventory_size, as_of);
        let mut scoring = score_sections(&features, &self.engine, &self.config.weights).await;
        let aggregate = aggregate(&mut scoring.scores, &self.config);

        let mut recommendation = None;
        let mut explanation = None;
        if explain {
            let ctx = ExplainContext {
                features: &features,
                sections: &scoring.scores,
                aggregate: &aggregate,
                config: &self.config,
            };
            match self.explainer.explain(&ctx).await {
                Ok(output) => {
                    for score in scoring.scores.iter_mut() {
                        if let Some(suggestions) = output.section_suggestions.get(&score.section) {
                            score.suggestions = suggestions.clone();
                        }
                    }
                    recommendation = Some(output.recommendation);
                    explanation = Some(output.explanation);
                }
                Err(e) => warn!("Explanation failed, returning scores only: {e}"),
            }
        }

        info!(
            score = aggregate.overall_score,
            rating = ?aggregate.overall_rating,
            backend = ?scoring.backend,
            skipped = scoring.skipped.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Screened resume against '{}'",
            job.title()
        );

        ScoringResult {
            overall_score: aggregate.overall_score,
            overall_rating: aggregate.overall_rating,
            section_scores: scoring.scores,
            skipped_sections: scoring.skipped,
            key_strengths: aggregate.key_strengths,
            improvement_areas: aggregate.improvement_areas,
            skill_gaps: aggregate.skill_gaps,
            recommendation,
            explanation,
            similarity_backend: scoring.backend,
        }
    }
}
