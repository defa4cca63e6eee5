//! Impact analysis: flags achievement bullets that state no measurable outcome.
//!
//! Feeds the explainer's experience suggestions; it does not change any score.

#[derive(Debug, Clone, PartialEq)]
pub struct ImpactGap {
    pub bullet: String,
    pub reason: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImpactReport {
    pub total_bullets: usize,
    pub quantified_bullets: usize,
    pub gaps: Vec<ImpactGap>,
}

impl ImpactReport {
    pub fn quantified_ratio(&self) -> f64 {
        if self.total_bullets == 0 {
            return 0.0;
        }
        self.quantified_bullets as f64 / self.total_bullets as f64
    }
}

const VAGUE_VERBS: &[&str] = &[
    "improved",
    "enhanced",
    "helped",
    "worked on",
    "assisted",
    "supported",
    "participated",
    "involved",
    "responsible for",
];

const VAGUE_SCALE_WORDS: &[&str] = &[
    "significant",
    "major",
    "large",
    "huge",
    "massive",
    "substantial",
    "considerable",
    "many",
    "numerous",
    "various",
    "several",
];

/// A bullet counts as quantified when it carries a digit, a percentage, a currency
/// amount, or a written multiplier.
pub fn is_quantified(text: &str) -> bool {
    let lower = text.to_lowercase();
    text.chars().any(|c| c.is_ascii_digit())
        || text.contains('%')
        || text.contains('$')
        || text.contains('€')
        || text.contains('£')
        || ["twice", "double", "tripled", "halved"]
            .iter()
            .any(|w| lower.contains(w))
}

/// Returns the gap for an unquantified bullet, `None` when the bullet is fine.
pub fn assess_bullet(text: &str) -> Option<ImpactGap> {
    if text.trim().is_empty() || is_quantified(text) {
        return None;
    }

    let lower = text.to_lowercase();

    if let Some(vague) = VAGUE_VERBS.iter().find(|v| lower.contains(*v)) {
        return Some(ImpactGap {
            bullet: text.to_string(),
            reason: format!("Contains vague verb '{vague}' without quantified impact"),
            suggestion: format!(
                "Quantify '{vague}': how much, how many, or how fast? Add a number or percentage."
            ),
        });
    }

    if let Some(vague) = VAGUE_SCALE_WORDS.iter().find(|v| {
        lower
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| word == **v)
    }) {
        return Some(ImpactGap {
            bullet: text.to_string(),
            reason: format!("Uses vague scale word '{vague}' without a number"),
            suggestion: format!(
                "Replace '{vague}' with a specific number: e.g. '5x', '40%', '3 weeks'."
            ),
        });
    }

    Some(ImpactGap {
        bullet: text.to_string(),
        reason: "No quantified outcome found".to_string(),
        suggestion: "Add a metric: a number, percentage, amount, or time saved.".to_string(),
    })
}

pub fn assess_bullets<S: AsRef<str>>(bullets: &[S]) -> ImpactReport {
    let mut report = ImpactReport::default();
    for bullet in bullets {
        let bullet = bullet.as_ref();
        if bullet.trim().is_empty() {
            continue;
        }
        report.total_bullets += 1;
        match assess_bullet(bullet) {
            Some(gap) => report.gaps.push(gap),
            None => report.quantified_bullets += 1,
        }
    }
    report
}
