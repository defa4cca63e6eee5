//! Fixed vocabularies used when an input arrives as raw text and carries no
//! explicit skill or education fields.

use crate::models::resume::EducationLevel;
use crate::screening::text::{normalize, NormalizedText};

pub const KNOWN_SKILLS: &[&str] = &[
    // languages
    "Python", "Java", "JavaScript", "TypeScript", "Go", "Rust", "C++", "C#", "Ruby", "PHP",
    "Scala", "Kotlin", "Swift", "R", "SQL", "Bash",
    // data & analytics
    "Excel", "Tableau", "Power BI", "Pandas", "NumPy", "Matplotlib", "Seaborn", "Plotly",
    "Machine Learning", "Deep Learning", "Data Analysis", "Data Science", "Statistics",
    "Data Visualization", "Analytics", "ETL", "Spark", "Hadoop", "Airflow", "TensorFlow",
    "PyTorch", "scikit-learn", "NLP",
    // web & backend
    "React", "Angular", "Vue", "Node.js", "Django", "Flask", "FastAPI", "Spring", "GraphQL",
    "REST", "HTML", "CSS",
    // data stores
    "PostgreSQL", "MySQL", "MongoDB", "Redis", "Elasticsearch", "Kafka", "Snowflake",
    // infrastructure
    "AWS", "Azure", "GCP", "Docker", "Kubernetes", "Terraform", "Linux", "Git", "CI/CD",
    "Jenkins",
    // domain
    "Business Intelligence", "Reporting", "Dashboard", "KPI", "Data Mining",
    "Predictive Modeling", "Forecasting",
    // soft skills
    "Communication", "Problem Solving", "Leadership", "Teamwork", "Presentation",
    "Critical Thinking",
];

/// Skills whose name is also an everyday word, with spellings that are never
/// ambiguous. Elsewhere they count only as an item of a skill list.
const AMBIGUOUS_SKILLS: &[(&str, &[&str])] = &[
    ("Go", &["golang", "go lang"]),
    ("Swift", &["swiftui", "swift programming"]),
    ("Spring", &["spring boot", "spring framework", "spring mvc"]),
];

/// Whether `text` mentions `skill`. `normalized` is `text` in normal form.
pub fn mentions_skill(text: &str, normalized: &NormalizedText, skill: &str) -> bool {
    let key = normalize(skill);
    match AMBIGUOUS_SKILLS.iter().find(|(name, _)| normalize(name) == key) {
        Some((_, aliases)) => {
            aliases.iter().any(|a| normalized.contains_phrase(a)) || is_list_item(text, &key)
        }
        None => normalized.contains_phrase(skill),
    }
}

/// True when `key` stands alone between list separators, as in "Python, Go and Rust".
fn is_list_item(text: &str, key: &str) -> bool {
    text.split(|c: char| matches!(c, ',' | ';' | '/' | '|' | '(' | ')' | ':' | '\n'))
        .map(normalize)
        .any(|item| {
            item.split(" and ")
                .flat_map(|part| part.split(" or "))
                .any(|part| part.trim() == key)
        })
}

pub const FIELDS_OF_STUDY: &[&str] = &[
    "Computer Science",
    "Software Engineering",
    "Data Science",
    "Information Technology",
    "Computer Engineering",
    "Electrical Engineering",
    "Mathematics",
    "Statistics",
    "Physics",
    "Economics",
    "Business Administration",
];

/// Phrases that name a degree level, highest level first within each group.
pub const DEGREE_TERMS: &[(&str, EducationLevel)] = &[
    ("phd", EducationLevel::Doctorate),
    ("ph d", EducationLevel::Doctorate),
    ("doctorate", EducationLevel::Doctorate),
    ("doctoral", EducationLevel::Doctorate),
    // "master" alone also names job titles ("Scrum Master"), so it needs degree context.
    ("master s", EducationLevel::Master),
    ("masters degree", EducationLevel::Master),
    ("masters in", EducationLevel::Master),
    ("master degree", EducationLevel::Master),
    ("master of", EducationLevel::Master),
    ("msc", EducationLevel::Master),
    ("m s", EducationLevel::Master),
    ("ms in", EducationLevel::Master),
    ("mba", EducationLevel::Master),
    ("bachelor", EducationLevel::Bachelor),
    ("bachelors", EducationLevel::Bachelor),
    ("bachelor s", EducationLevel::Bachelor),
    ("bsc", EducationLevel::Bachelor),
    ("b s", EducationLevel::Bachelor),
    ("b tech", EducationLevel::Bachelor),
    ("associate degree", EducationLevel::Associate),
    ("associate s", EducationLevel::Associate),
    ("high school", EducationLevel::HighSchool),
    ("diploma", EducationLevel::HighSchool),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeHeading {
    Summary,
    Skills,
    Experience,
    Education,
    Projects,
    /// A recognised heading whose content is not scored separately.
    Other,
}

const HEADINGS: &[(&str, ResumeHeading)] = &[
    ("summary", ResumeHeading::Summary),
    ("professional summary", ResumeHeading::Summary),
    ("profile", ResumeHeading::Summary),
    ("objective", ResumeHeading::Summary),
    ("skills", ResumeHeading::Skills),
    ("technical skills", ResumeHeading::Skills),
    ("core competencies", ResumeHeading::Skills),
    ("experience", ResumeHeading::Experience),
    ("work experience", ResumeHeading::Experience),
    ("professional experience", ResumeHeading::Experience),
    ("employment history", ResumeHeading::Experience),
    ("internships", ResumeHeading::Experience),
    ("education", ResumeHeading::Education),
    ("academic background", ResumeHeading::Education),
    ("projects", ResumeHeading::Projects),
    ("personal projects", ResumeHeading::Projects),
    ("academic projects", ResumeHeading::Projects),
    ("certifications", ResumeHeading::Other),
    ("achievements", ResumeHeading::Other),
    ("awards", ResumeHeading::Other),
    ("languages", ResumeHeading::Other),
    ("interests", ResumeHeading::Other),
];

/// Recognises a line that is only a section heading (e.g. "WORK EXPERIENCE:").
pub fn match_heading(line: &str) -> Option<ResumeHeading> {
    let normalized = normalize(line);
    HEADINGS
        .iter()
        .find(|(h, _)| *h == normalized)
        .map(|(_, heading)| *heading)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_match_ignores_case_and_punctuation() {
        assert_eq!(match_heading("WORK EXPERIENCE:"), Some(ResumeHeading::Experience));
        assert_eq!(match_heading("  Education "), Some(ResumeHeading::Education));
        assert_eq!(match_heading("Technical Skills"), Some(ResumeHeading::Skills));
    }

    #[test]
    fn test_heading_requires_whole_line() {
        assert_eq!(match_heading("Gained experience with Kafka"), None);
    }

    fn mentions(text: &str, skill: &str) -> bool {
        mentions_skill(text, &NormalizedText::new(text), skill)
    }

    #[test]
    fn test_ambiguous_skill_needs_list_or_alias() {
        assert!(!mentions("We go fast and ship weekly", "Go"));
        assert!(!mentions("Internship, Spring 2023 semester", "Spring"));
        assert!(mentions("Backend services in Golang", "Go"));
        assert!(mentions("Languages: Python, Go and Rust", "Go"));
        assert!(mentions("- Go", "Go"));
        assert!(mentions("Java / Spring Boot microservices", "Spring"));
    }

    #[test]
    fn test_plain_skill_matches_as_phrase() {
        assert!(mentions("Built dashboards with Power BI", "Power BI"));
        assert!(!mentions("Built dashboards", "Python"));
    }

    #[test]
    fn test_master_needs_degree_context() {
        let levels = |text: &str| -> Vec<EducationLevel> {
            let text = NormalizedText::new(text);
            DEGREE_TERMS
                .iter()
                .filter(|(term, _)| text.contains_phrase(term))
                .map(|(_, level)| *level)
                .collect()
        };
        assert!(levels("Certified Scrum Master preferred").is_empty());
        assert!(levels("Scrum Master certification").is_empty());
        assert_eq!(levels("Master's degree in Statistics"), vec![EducationLevel::Master]);
        assert_eq!(levels("Master of Science"), vec![EducationLevel::Master]);
        assert_eq!(levels("MS in Computer Science"), vec![EducationLevel::Master]);
    }

    #[test]
    fn test_vocabularies_have_no_duplicates() {
        let mut seen = std::collections::BTreeSet::new();
        for skill in KNOWN_SKILLS {
            assert!(
                seen.insert(normalize(skill)),
                "duplicate skill {skill}"
            );
        }
    }
}
