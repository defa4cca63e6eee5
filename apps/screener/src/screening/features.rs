//! Feature Extractor: resolves raw-text or structured inputs into one
//! normalized profile per side, then derives the token sets each section
//! scorer consumes.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use crate::models::job::{ExperienceLevel, JobDescription, JobInput};
use crate::models::resume::{EducationLevel, ResumeDocument, ResumeInput};
use crate::screening::impact::{assess_bullets, ImpactReport};
use crate::screening::text::{
    dedup_preserving_order, is_posting_word, keyword_inventory, normalize, token_set, tokenize,
    NormalizedText,
};
use crate::screening::vocabulary::{
    match_heading, mentions_skill, ResumeHeading, DEGREE_TERMS, FIELDS_OF_STUDY, KNOWN_SKILLS,
};

/// Required-years patterns, tried in order. The first match wins.
static REQUIRED_YEARS_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)(\d+)\+?\s*years?\s*(?:of\s*)?(?:\w+\s+){0,3}?experience",
        r"(?i)minimum\s*(?:of\s*)?(\d+)\s*years?",
        r"(?i)at\s*least\s*(\d+)\s*years?",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

static YEARS_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d{1,2})\+?\s*(?:years?|yrs)").expect("valid regex"));

/// Upper bound on any single "N years" claim read from free text.
const MAX_CLAIMED_YEARS: f64 = 50.0;

/// The resume, whatever its input format, in one shape.
#[derive(Debug, Clone, Default)]
pub struct ResumeProfile {
    pub summary: String,
    /// Deduplicated by normalized form; first-seen spelling kept.
    pub skills: Vec<String>,
    pub experience_text: String,
    pub experience_bullets: Vec<String>,
    pub experience_years: f64,
    pub education_levels: Vec<EducationLevel>,
    pub education_text: String,
    pub project_count: usize,
    pub project_text: String,
    pub full_text: String,
}

impl ResumeProfile {
    pub fn highest_education(&self) -> Option<EducationLevel> {
        self.education_levels.iter().copied().max_by_key(|l| l.rank())
    }
}

/// The job posting, whatever its input format, in one shape.
#[derive(Debug, Clone, Default)]
pub struct JobProfile {
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub responsibilities: Vec<String>,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub experience_level: ExperienceLevel,
    pub full_text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EducationRequirement {
    /// Lowest degree level the posting accepts, if it names one.
    pub level: Option<EducationLevel>,
    pub fields: Vec<String>,
}

impl EducationRequirement {
    pub fn is_empty(&self) -> bool {
        self.level.is_none() && self.fields.is_empty()
    }
}

/// Everything the section scorers need, computed once per screening.
#[derive(Debug, Clone)]
pub struct ExtractedFeatures {
    pub resume: ResumeProfile,
    pub job: JobProfile,
    /// Normalized resume skills.
    pub resume_skill_keys: BTreeSet<String>,
    /// Responsibilities and requirements, one per line, without degree lines
    /// and "N years of experience" phrases.
    pub experience_requirement_text: String,
    /// Job requirement terms for the experience section, in job order.
    pub experience_requirement_terms: Vec<String>,
    pub experience_requirement_tokens: BTreeSet<String>,
    pub experience_tokens: BTreeSet<String>,
    pub required_years: f64,
    pub education_requirement: EducationRequirement,
    pub project_phrases: NormalizedText,
    pub resume_tokens: BTreeSet<String>,
    pub keyword_inventory: Vec<String>,
    pub impact: ImpactReport,
}

/// Resolves both inputs and derives per-section features.
///
/// `as_of` closes open-ended roles so that identical requests always produce
/// identical experience totals.
pub fn extract(
    resume: &ResumeInput,
    job: &JobInput,
    keyword_limit: usize,
    as_of: NaiveDate,
) -> ExtractedFeatures {
    let job = resolve_job(job);
    let resume = resolve_resume(resume, &job, as_of);

    let resume_skill_keys = resume
        .skills
        .iter()
        .map(|s| normalize(s))
        .filter(|s| !s.is_empty())
        .collect();

    let requirement_text = experience_requirement_text(&job);
    let experience_requirement_terms = dedup_preserving_order(
        tokenize(&requirement_text)
            .into_iter()
            .filter(|t| !is_posting_word(t)),
    );
    let experience_requirement_tokens = experience_requirement_terms.iter().cloned().collect();

    let required_years = required_years(&job);
    let education_requirement = education_requirement(&job);
    let keyword_inventory = keyword_inventory(&job.full_text, keyword_limit);
    let impact = assess_bullets(&resume.experience_bullets);

    debug!(
        resume_skills = resume.skills.len(),
        required_skills = job.required_skills.len(),
        experience_years = resume.experience_years,
        required_years,
        keywords = keyword_inventory.len(),
        "Extracted screening features"
    );

    ExtractedFeatures {
        experience_tokens: token_set(&resume.experience_text),
        project_phrases: NormalizedText::new(&resume.project_text),
        resume_tokens: token_set(&resume.full_text),
        resume_skill_keys,
        experience_requirement_text: requirement_text,
        experience_requirement_terms,
        experience_requirement_tokens,
        required_years,
        education_requirement,
        keyword_inventory,
        impact,
        resume,
        job,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Job resolution
// ────────────────────────────────────────────────────────────────────────────

fn resolve_job(input: &JobInput) -> JobProfile {
    match input {
        JobInput::Structured(job) => structured_job(job),
        JobInput::RawText { text, title } => raw_job(text, title.as_deref()),
    }
}

fn structured_job(job: &JobDescription) -> JobProfile {
    let mut parts = vec![job.title.as_str(), job.description.as_str()];
    parts.extend(job.requirements.iter().map(String::as_str));
    parts.extend(job.preferred_qualifications.iter().map(String::as_str));
    parts.extend(job.responsibilities.iter().map(String::as_str));
    parts.extend(job.required_skills.iter().map(String::as_str));
    parts.extend(job.preferred_skills.iter().map(String::as_str));

    JobProfile {
        title: job.title.clone(),
        description: job.description.clone(),
        requirements: job.requirements.clone(),
        responsibilities: job.responsibilities.clone(),
        required_skills: dedup_preserving_order(&job.required_skills),
        preferred_skills: dedup_preserving_order(&job.preferred_skills),
        experience_level: job.experience_level,
        full_text: join_non_empty(parts),
    }
}

fn raw_job(text: &str, title: Option<&str>) -> JobProfile {
    let lines: Vec<String> = text
        .lines()
        .map(strip_bullet)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();

    let title = title
        .map(str::to_string)
        .or_else(|| lines.first().cloned())
        .unwrap_or_default();

    let normalized = NormalizedText::new(text);
    let required_skills = KNOWN_SKILLS
        .iter()
        .filter(|s| mentions_skill(text, &normalized, s))
        .map(|s| s.to_string())
        .collect();

    JobProfile {
        experience_level: infer_experience_level(&title),
        title,
        description: text.to_string(),
        requirements: lines,
        responsibilities: Vec::new(),
        required_skills,
        preferred_skills: Vec::new(),
        full_text: text.to_string(),
    }
}

/// Seniority from the posting title; mid when nothing matches.
fn infer_experience_level(title: &str) -> ExperienceLevel {
    let title = NormalizedText::new(title);
    let has_any = |words: &[&str]| words.iter().any(|w| title.contains_phrase(w));

    if has_any(&["director", "vp", "vice president", "head of", "chief"]) {
        ExperienceLevel::Executive
    } else if has_any(&["lead", "principal", "staff"]) {
        ExperienceLevel::Lead
    } else if has_any(&["senior", "sr"]) {
        ExperienceLevel::Senior
    } else if has_any(&["junior", "jr", "intern", "entry level", "graduate", "associate"]) {
        ExperienceLevel::Entry
    } else {
        ExperienceLevel::Mid
    }
}

/// Years the posting asks for: the first explicit figure in the requirements,
/// then the description, else the level's default.
fn required_years(job: &JobProfile) -> f64 {
    let requirements = job.requirements.join("\n");
    for text in [requirements.as_str(), job.description.as_str()] {
        for pattern in REQUIRED_YEARS_PATTERNS.iter() {
            if let Some(years) = pattern
                .captures(text)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse::<u32>().ok())
            {
                if years > 0 {
                    return years as f64;
                }
            }
        }
    }
    job.experience_level.default_years() as f64
}

/// Responsibilities and requirements the experience section compares against.
/// Degree lines belong to the education section and years phrases to the years fit.
fn experience_requirement_text(job: &JobProfile) -> String {
    job.responsibilities
        .iter()
        .chain(job.requirements.iter())
        .filter(|line| !is_education_line(line))
        .map(|line| {
            REQUIRED_YEARS_PATTERNS
                .iter()
                .fold(line.to_string(), |acc, p| p.replace_all(&acc, " ").into_owned())
        })
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_education_line(line: &str) -> bool {
    let text = NormalizedText::new(line);
    text.contains_phrase("degree") || !degree_levels(&text).is_empty()
}

fn education_requirement(job: &JobProfile) -> EducationRequirement {
    let text = NormalizedText::new(&format!(
        "{}\n{}",
        job.requirements.join("\n"),
        job.description
    ));

    let mut level = degree_levels(&text).into_iter().min_by_key(|l| l.rank());
    if level.is_none() && text.contains_phrase("degree") {
        level = Some(EducationLevel::Bachelor);
    }

    let fields = FIELDS_OF_STUDY
        .iter()
        .filter(|f| text.contains_phrase(f))
        .map(|f| f.to_string())
        .collect();

    EducationRequirement { level, fields }
}

fn degree_levels(text: &NormalizedText) -> Vec<EducationLevel> {
    DEGREE_TERMS
        .iter()
        .filter(|(term, _)| text.contains_phrase(term))
        .map(|(_, level)| *level)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Resume resolution
// ────────────────────────────────────────────────────────────────────────────

fn resolve_resume(input: &ResumeInput, job: &JobProfile, as_of: NaiveDate) -> ResumeProfile {
    match input {
        ResumeInput::Structured(doc) => structured_resume(doc, as_of),
        ResumeInput::RawText { text } => raw_resume(text, job),
    }
}

fn structured_resume(doc: &ResumeDocument, as_of: NaiveDate) -> ResumeProfile {
    let skills = dedup_preserving_order(
        doc.skills
            .values()
            .flatten()
            .chain(doc.experience.iter().flat_map(|e| e.skills.iter()))
            .chain(doc.projects.iter().flat_map(|p| p.technologies.iter())),
    );

    let mut experience_parts: Vec<&str> = Vec::new();
    let mut experience_bullets = Vec::new();
    let mut experience_days = 0_i64;
    for role in &doc.experience {
        experience_parts.push(&role.title);
        experience_parts.extend(role.description.iter().map(String::as_str));
        experience_parts.extend(role.achievements.iter().map(String::as_str));
        experience_parts.extend(role.skills.iter().map(String::as_str));
        experience_bullets.extend(role.description.iter().cloned());
        experience_bullets.extend(role.achievements.iter().cloned());

        if let Some(start) = role.start_date {
            let end = role.end_date.unwrap_or(as_of).min(as_of);
            if end > start {
                experience_days += (end - start).num_days();
            }
        }
    }

    let mut education_parts: Vec<&str> = Vec::new();
    for edu in &doc.education {
        education_parts.push(&edu.degree);
        education_parts.push(&edu.institution);
        if let Some(major) = &edu.major {
            education_parts.push(major);
        }
        education_parts.extend(edu.relevant_courses.iter().map(String::as_str));
    }

    let mut project_parts: Vec<&str> = Vec::new();
    for project in &doc.projects {
        project_parts.push(&project.name);
        project_parts.push(&project.description);
        project_parts.extend(project.technologies.iter().map(String::as_str));
        project_parts.extend(project.achievements.iter().map(String::as_str));
    }

    let summary = doc.summary.clone().unwrap_or_default();
    let experience_text = join_non_empty(experience_parts);
    let education_text = join_non_empty(education_parts);
    let project_text = join_non_empty(project_parts);

    let mut all_parts = vec![summary.as_str()];
    all_parts.extend(skills.iter().map(String::as_str));
    all_parts.push(&experience_text);
    all_parts.push(&education_text);
    all_parts.push(&project_text);
    all_parts.extend(doc.certifications.iter().map(String::as_str));
    all_parts.extend(doc.languages.iter().map(String::as_str));
    let full_text = join_non_empty(all_parts);

    ResumeProfile {
        summary,
        skills,
        experience_text,
        experience_bullets,
        experience_years: experience_days as f64 / 365.25,
        education_levels: doc.education.iter().map(|e| e.level).collect(),
        education_text,
        project_count: doc.projects.len(),
        project_text,
        full_text,
    }
}

/// Lines grouped under the resume heading they follow.
#[derive(Debug, Default)]
struct RawSections {
    summary: Vec<String>,
    skills: Vec<String>,
    experience: Vec<String>,
    education: Vec<String>,
    projects: Vec<String>,
    found_heading: bool,
}

fn split_sections(text: &str) -> RawSections {
    let mut sections = RawSections::default();
    let mut current = ResumeHeading::Summary;

    for line in text.lines() {
        let line = strip_bullet(line);
        if line.is_empty() {
            continue;
        }
        if let Some(heading) = match_heading(line) {
            current = heading;
            sections.found_heading = true;
            continue;
        }
        let bucket = match current {
            ResumeHeading::Summary => &mut sections.summary,
            ResumeHeading::Skills => &mut sections.skills,
            ResumeHeading::Experience => &mut sections.experience,
            ResumeHeading::Education => &mut sections.education,
            ResumeHeading::Projects => &mut sections.projects,
            ResumeHeading::Other => continue,
        };
        bucket.push(line.to_string());
    }
    sections
}

fn raw_resume(text: &str, job: &JobProfile) -> ResumeProfile {
    let sections = split_sections(text);
    let whole: Vec<String> = text
        .lines()
        .map(strip_bullet)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();

    // Without headings every section sees the whole resume.
    let pick = |lines: &Vec<String>| -> Vec<String> {
        if sections.found_heading {
            lines.clone()
        } else {
            whole.clone()
        }
    };
    let summary = pick(&sections.summary);
    let experience = pick(&sections.experience);
    let education = pick(&sections.education);
    let projects = pick(&sections.projects);

    let normalized = NormalizedText::new(text);
    let skills = dedup_preserving_order(
        KNOWN_SKILLS
            .iter()
            .copied()
            .chain(job.required_skills.iter().map(String::as_str))
            .chain(job.preferred_skills.iter().map(String::as_str))
            .filter(|s| mentions_skill(text, &normalized, s)),
    );

    let education_text = education.join("\n");
    let experience_text = experience.join("\n");

    let experience_years = YEARS_MENTION
        .captures_iter(&experience_text)
        .chain(YEARS_MENTION.captures_iter(&summary.join("\n")))
        .filter_map(|c| c.get(1).and_then(|m| m.as_str().parse::<f64>().ok()))
        .fold(0.0_f64, f64::max)
        .min(MAX_CLAIMED_YEARS);

    ResumeProfile {
        summary: summary.join("\n"),
        skills,
        experience_years,
        education_levels: degree_levels(&NormalizedText::new(&education_text)),
        education_text,
        project_count: usize::from(!projects.is_empty()),
        project_text: projects.join("\n"),
        experience_bullets: experience,
        experience_text,
        full_text: text.to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn strip_bullet(line: &str) -> &str {
    line.trim()
        .trim_start_matches(['-', '*', '•', '·', '▪', '◦'])
        .trim()
}

fn join_non_empty<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::models::resume::{Education, Project, WorkExperience};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn as_of() -> NaiveDate {
        date(2024, 6, 1)
    }

    fn job(required: &[&str]) -> JobDescription {
        JobDescription {
            title: "Data Analyst".to_string(),
            company: "Acme".to_string(),
            description: "Analyze business data and build dashboards.".to_string(),
            requirements: vec!["3+ years of experience with SQL".to_string()],
            responsibilities: vec!["Build reporting pipelines".to_string()],
            required_skills: required.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn resume() -> ResumeDocument {
        let mut skills = BTreeMap::new();
        skills.insert(
            "programming".to_string(),
            vec!["Python".to_string(), "SQL".to_string()],
        );
        ResumeDocument {
            skills,
            experience: vec![WorkExperience {
                title: "Analyst".to_string(),
                company: "Initech".to_string(),
                start_date: Some(date(2020, 6, 1)),
                end_date: None,
                description: vec!["Built reporting pipelines in Python".to_string()],
                achievements: vec!["Cut report time by 40%".to_string()],
                skills: vec!["python".to_string(), "Airflow".to_string()],
            }],
            projects: vec![Project {
                name: "Churn model".to_string(),
                description: "Predicted churn".to_string(),
                technologies: vec!["scikit-learn".to_string()],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_structured_skills_are_merged_and_deduplicated() {
        let features = extract(
            &ResumeInput::Structured(resume()),
            &JobInput::Structured(job(&["Python"])),
            20,
            as_of(),
        );
        assert_eq!(
            features.resume.skills,
            vec!["Python", "SQL", "Airflow", "scikit-learn"]
        );
        assert!(features.resume_skill_keys.contains("scikit learn"));
    }

    #[test]
    fn test_open_role_counts_until_as_of() {
        let features = extract(
            &ResumeInput::Structured(resume()),
            &JobInput::Structured(job(&[])),
            20,
            as_of(),
        );
        assert!((features.resume.experience_years - 4.0).abs() < 0.01);
    }

    #[test]
    fn test_required_years_from_requirements() {
        let features = extract(
            &ResumeInput::Structured(resume()),
            &JobInput::Structured(job(&[])),
            20,
            as_of(),
        );
        assert_eq!(features.required_years, 3.0);
    }

    #[test]
    fn test_required_years_patterns() {
        let mut profile = JobProfile {
            requirements: vec!["Minimum of 7 years in analytics".to_string()],
            ..Default::default()
        };
        assert_eq!(required_years(&profile), 7.0);

        profile.requirements = vec!["At least 2 years working with Spark".to_string()];
        assert_eq!(required_years(&profile), 2.0);

        profile.requirements = vec!["5+ years professional experience".to_string()];
        assert_eq!(required_years(&profile), 5.0);
    }

    #[test]
    fn test_required_years_falls_back_to_level() {
        let profile = JobProfile {
            requirements: vec!["Strong SQL".to_string()],
            experience_level: ExperienceLevel::Senior,
            ..Default::default()
        };
        assert_eq!(required_years(&profile), 5.0);
    }

    #[test]
    fn test_education_requirement_takes_lowest_named_level() {
        let profile = JobProfile {
            requirements: vec![
                "Bachelor's or Master's degree in Computer Science or Statistics".to_string(),
            ],
            ..Default::default()
        };
        let req = education_requirement(&profile);
        assert_eq!(req.level, Some(EducationLevel::Bachelor));
        assert_eq!(req.fields, vec!["Computer Science", "Statistics"]);
    }

    #[test]
    fn test_education_requirement_abbreviations() {
        let profile = JobProfile {
            requirements: vec!["PhD or M.S. preferred".to_string()],
            ..Default::default()
        };
        assert_eq!(
            education_requirement(&profile).level,
            Some(EducationLevel::Master)
        );
    }

    #[test]
    fn test_no_education_requirement() {
        let profile = JobProfile {
            requirements: vec!["Strong communication".to_string()],
            description: "Join our team".to_string(),
            ..Default::default()
        };
        assert!(education_requirement(&profile).is_empty());
    }

    #[test]
    fn test_raw_job_extracts_skills_lines_and_level() {
        let text = "Senior Data Engineer\n- Build ETL pipelines with Python and Airflow\n- 5+ years of experience\n\n- Deploy on AWS";
        let profile = raw_job(text, None);
        assert_eq!(profile.title, "Senior Data Engineer");
        assert_eq!(profile.experience_level, ExperienceLevel::Senior);
        assert_eq!(profile.requirements.len(), 4);
        assert_eq!(profile.requirements[1], "Build ETL pipelines with Python and Airflow");
        assert_eq!(profile.required_skills, vec!["Python", "ETL", "Airflow", "AWS"]);
    }

    #[test]
    fn test_experience_level_inference() {
        assert_eq!(infer_experience_level("Junior Analyst"), ExperienceLevel::Entry);
        assert_eq!(infer_experience_level("Staff Engineer"), ExperienceLevel::Lead);
        assert_eq!(infer_experience_level("Head of Data"), ExperienceLevel::Executive);
        assert_eq!(infer_experience_level("Data Analyst"), ExperienceLevel::Mid);
    }

    #[test]
    fn test_raw_resume_sections_by_heading() {
        let text = "Jane Doe\nAnalyst with 4 years of experience\n\nSKILLS\nPython, SQL, Tableau\n\nEXPERIENCE\n- Built dashboards in Tableau\n- Automated reports with Python\n\nEDUCATION\nB.S. in Statistics\n\nPROJECTS\nForecasting model in R";
        let job = raw_job("Data analyst with SQL, Python and Excel", None);
        let profile = raw_resume(text, &job);

        assert_eq!(profile.experience_bullets.len(), 2);
        assert!(profile.experience_text.contains("Automated reports"));
        assert!(!profile.experience_text.contains("Statistics"));
        assert_eq!(profile.education_levels, vec![EducationLevel::Bachelor]);
        assert_eq!(profile.project_count, 1);
        assert_eq!(profile.experience_years, 4.0);
        assert!(profile.skills.contains(&"Tableau".to_string()));
        assert!(profile.skills.contains(&"R".to_string()));
        assert!(!profile.skills.contains(&"Excel".to_string()));
    }

    #[test]
    fn test_raw_resume_without_headings_uses_whole_text() {
        let text = "Built data pipelines in Python.\nMaster of Science, 2019.";
        let job = raw_job("Python developer", None);
        let profile = raw_resume(text, &job);
        assert_eq!(profile.experience_text, profile.project_text);
        assert_eq!(profile.education_levels, vec![EducationLevel::Master]);
        assert_eq!(profile.project_count, 1);
    }

    #[test]
    fn test_highest_education() {
        let mut doc = resume();
        doc.education = vec![
            Education {
                institution: "State".to_string(),
                degree: "B.S. Statistics".to_string(),
                level: EducationLevel::Bachelor,
                major: Some("Statistics".to_string()),
                graduation_date: None,
                gpa: Some(3.5),
                relevant_courses: vec![],
            },
            Education {
                institution: "Tech".to_string(),
                degree: "M.S. Data Science".to_string(),
                level: EducationLevel::Master,
                major: None,
                graduation_date: None,
                gpa: None,
                relevant_courses: vec![],
            },
        ];
        let profile = structured_resume(&doc, as_of());
        assert_eq!(profile.highest_education(), Some(EducationLevel::Master));
        assert!(profile.education_text.contains("Statistics"));
    }

    #[test]
    fn test_experience_requirement_terms_keep_job_order() {
        let features = extract(
            &ResumeInput::Structured(resume()),
            &JobInput::Structured(job(&[])),
            20,
            as_of(),
        );
        assert_eq!(
            features.experience_requirement_terms,
            vec!["reporting", "pipelines", "sql"]
        );
        assert!(!features.experience_requirement_text.contains("years"));
    }

    #[test]
    fn test_experience_terms_leave_out_degree_lines() {
        let mut posting = job(&[]);
        posting
            .requirements
            .push("Bachelor's degree in Statistics or related field".to_string());
        posting
            .requirements
            .push("Strong written communication".to_string());
        let features = extract(
            &ResumeInput::Structured(resume()),
            &JobInput::Structured(posting),
            20,
            as_of(),
        );
        assert_eq!(
            features.experience_requirement_terms,
            vec!["reporting", "pipelines", "sql", "written", "communication"]
        );
        assert_eq!(
            features.education_requirement.level,
            Some(EducationLevel::Bachelor)
        );
        assert!(!features.keyword_inventory.iter().any(|k| k == "degree"
            || k == "bachelor"
            || k == "experience"
            || k == "years"));
    }

    #[test]
    fn test_scrum_master_is_not_a_degree_requirement() {
        let profile = raw_job(
            "Agile coach\nWe go fast and ship weekly\nCertified Scrum Master preferred",
            None,
        );
        assert!(education_requirement(&profile).level.is_none());
        assert!(profile.required_skills.is_empty());
    }

    #[test]
    fn test_raw_job_recognises_go_in_skill_list() {
        let profile = raw_job("Backend Engineer\nStack: Go, PostgreSQL and Kafka", None);
        assert_eq!(profile.required_skills, vec!["Go", "PostgreSQL", "Kafka"]);
    }

    #[test]
    fn test_missing_optional_fields_are_empty() {
        let features = extract(
            &ResumeInput::Structured(ResumeDocument {
                summary: Some("Analyst".to_string()),
                ..Default::default()
            }),
            &JobInput::Structured(job(&["Python"])),
            20,
            as_of(),
        );
        assert!(features.resume.skills.is_empty());
        assert_eq!(features.resume.project_count, 0);
        assert_eq!(features.resume.experience_years, 0.0);
        assert!(features.impact.gaps.is_empty());
    }
}
