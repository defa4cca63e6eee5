use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    Certificate,
    HighSchool,
    Associate,
    Bachelor,
    Master,
    Doctorate,
}

impl EducationLevel {
    /// Ordinal used for "meets the requirement" comparisons.
    /// Certificates rank alongside a high school diploma.
    pub fn rank(self) -> u8 {
        match self {
            EducationLevel::Certificate | EducationLevel::HighSchool => 1,
            EducationLevel::Associate => 2,
            EducationLevel::Bachelor => 3,
            EducationLevel::Master => 4,
            EducationLevel::Doctorate => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EducationLevel::Certificate => "Certificate",
            EducationLevel::HighSchool => "High school diploma",
            EducationLevel::Associate => "Associate degree",
            EducationLevel::Bachelor => "Bachelor's degree",
            EducationLevel::Master => "Master's degree",
            EducationLevel::Doctorate => "Doctorate",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkExperience {
    pub title: String,
    pub company: String,
    pub start_date: Option<NaiveDate>,
    /// `None` means the role is current.
    pub end_date: Option<NaiveDate>,
    pub description: Vec<String>,
    pub achievements: Vec<String>,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub level: EducationLevel,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub graduation_date: Option<NaiveDate>,
    #[serde(default)]
    pub gpa: Option<f64>,
    #[serde(default)]
    pub relevant_courses: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub url: Option<String>,
    pub achievements: Vec<String>,
}

/// A structured resume as submitted by the resume builder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeDocument {
    pub contact_info: ContactInfo,
    pub summary: Option<String>,
    /// Skill category (e.g. "programming") to skills.
    pub skills: BTreeMap<String, Vec<String>>,
    pub experience: Vec<WorkExperience>,
    pub education: Vec<Education>,
    pub projects: Vec<Project>,
    pub certifications: Vec<String>,
    pub languages: Vec<String>,
}

impl ResumeDocument {
    /// True when the document carries nothing that could be scored.
    pub fn is_empty(&self) -> bool {
        self.summary.as_deref().map_or(true, |s| s.trim().is_empty())
            && self.skills.values().all(|v| v.is_empty())
            && self.experience.is_empty()
            && self.education.is_empty()
            && self.projects.is_empty()
            && self.certifications.is_empty()
    }
}

/// A resume either as text extracted upstream (PDF, paste) or as structured fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum ResumeInput {
    RawText { text: String },
    Structured(ResumeDocument),
}
