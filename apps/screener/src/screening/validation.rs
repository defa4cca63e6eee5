//! Client-facing checks on screening inputs, run before extraction.

use crate::errors::AppError;
use crate::models::job::JobInput;
use crate::models::resume::{ResumeDocument, ResumeInput};

const MAX_GPA: f64 = 4.0;

pub fn validate_job(job: &JobInput) -> Result<(), AppError> {
    let description = match job {
        JobInput::RawText { text, .. } => text,
        JobInput::Structured(job) => &job.description,
    };
    if description.trim().is_empty() {
        return Err(AppError::Validation(
            "Job description cannot be empty".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_resume(resume: &ResumeInput) -> Result<(), AppError> {
    match resume {
        ResumeInput::RawText { text } => {
            if text.trim().is_empty() {
                return Err(AppError::Validation(
                    "Resume text cannot be empty".to_string(),
                ));
            }
            Ok(())
        }
        ResumeInput::Structured(doc) => validate_document(doc),
    }
}

fn validate_document(doc: &ResumeDocument) -> Result<(), AppError> {
    if doc.is_empty() {
        return Err(AppError::Validation(
            "Resume must contain at least one of summary, skills, experience, education, projects or certifications".to_string(),
        ));
    }

    for (i, role) in doc.experience.iter().enumerate() {
        if let (Some(start), Some(end)) = (role.start_date, role.end_date) {
            if end < start {
                return Err(AppError::Validation(format!(
                    "experience[{i}] ({}): end date {end} is before start date {start}",
                    role.title
                )));
            }
        }
    }

    for (i, edu) in doc.education.iter().enumerate() {
        if let Some(gpa) = edu.gpa {
            if !(0.0..=MAX_GPA).contains(&gpa) {
                return Err(AppError::Validation(format!(
                    "education[{i}] ({}): GPA {gpa} must be between 0.0 and {MAX_GPA}",
                    edu.institution
                )));
            }
        }
    }

    Ok(())
}
