use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Entry,
    #[default]
    Mid,
    Senior,
    Lead,
    Executive,
}

impl ExperienceLevel {
    /// Years of experience assumed when the posting does not state a number.
    pub fn default_years(self) -> u32 {
        match self {
            ExperienceLevel::Entry => 1,
            ExperienceLevel::Mid => 3,
            ExperienceLevel::Senior => 5,
            ExperienceLevel::Lead => 8,
            ExperienceLevel::Executive => 10,
        }
    }
}

/// A structured job posting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobDescription {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub description: String,
    pub requirements: Vec<String>,
    pub preferred_qualifications: Vec<String>,
    pub responsibilities: Vec<String>,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub experience_level: ExperienceLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum JobInput {
    RawText {
        text: String,
        #[serde(default)]
        title: Option<String>,
    },
    Structured(JobDescription),
}

impl JobInput {
    pub fn title(&self) -> &str {
        match self {
            JobInput::RawText { title, .. } => title.as_deref().unwrap_or("untitled role"),
            JobInput::Structured(job) => &job.title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_level_default_is_mid() {
        assert_eq!(ExperienceLevel::default(), ExperienceLevel::Mid);
        assert_eq!(ExperienceLevel::default().default_years(), 3);
    }

    #[test]
    fn test_structured_job_deserializes() {
        let json = r#"{
            "format": "structured",
            "title": "Data Analyst",
            "company": "Acme",
            "description": "Analyze data",
            "required_skills": ["Python", "SQL", "AWS"],
            "experience_level": "senior"
        }"#;
        let input: JobInput = serde_json::from_str(json).unwrap();
        match input {
            JobInput::Structured(job) => {
                assert_eq!(job.required_skills, vec!["Python", "SQL", "AWS"]);
                assert_eq!(job.experience_level, ExperienceLevel::Senior);
                assert!(job.responsibilities.is_empty());
            }
            other => panic!("expected structured job, got {other:?}"),
        }
    }

    #[test]
    fn test_raw_job_title_fallback() {
        let input = JobInput::RawText {
            text: "We need a data engineer".to_string(),
            title: None,
        };
        assert_eq!(input.title(), "untitled role");
    }
}
