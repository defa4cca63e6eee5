//! Text normalization shared by the feature extractor and section scorer.
//!
//! Normal form: lowercase, every character other than alphanumerics, `+` and `#`
//! replaced by a space, whitespace collapsed. `+`/`#` survive so that "C++" and
//! "C#" stay distinct from "C".

use std::collections::{BTreeMap, BTreeSet};

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be",
    "been", "being", "but", "by", "can", "could", "do", "does", "etc", "for", "from", "had",
    "has", "have", "he", "her", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "just", "may", "me", "more", "most", "must", "my", "no", "not", "of", "on", "or", "other",
    "our", "out", "over", "own", "per", "plus", "so", "such", "than", "that", "the", "their",
    "them", "then", "there", "these", "they", "this", "those", "to", "up", "us", "using", "very",
    "was", "we", "well", "were", "what", "when", "where", "which", "while", "who", "will",
    "with", "within", "would", "you", "your",
];

/// Words every job posting uses. They say nothing about the role, so they are
/// never reported as matched or missing keywords.
const POSTING_WORDS: &[&str] = &[
    "ability", "able", "bachelor", "bachelors", "bonus", "candidate", "candidates", "company",
    "degree", "equivalent", "excellent", "experience", "experienced", "field", "good", "ideal",
    "including", "join", "knowledge", "least", "looking", "master", "masters", "minimum",
    "opportunity", "phd", "position", "preferred", "qualification", "qualifications",
    "related", "required", "requirement", "requirements", "responsibilities", "responsible",
    "role", "skill", "skills", "strong", "year", "years",
    // generic action verbs
    "build", "building", "collaborate", "create", "deliver", "design", "develop", "drive",
    "ensure", "help", "maintain", "manage", "partner", "support", "work", "working", "write",
    "writing",
];

/// Minimum token length for keyword inventories.
const MIN_KEYWORD_LEN: usize = 3;

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

pub fn is_posting_word(token: &str) -> bool {
    POSTING_WORDS.contains(&token)
}

/// Lowercases, strips punctuation and collapses whitespace.
pub fn normalize(text: &str) -> String {
    let mapped: String = text
        .chars()
        .flat_map(|c| c.to_lowercase())
        .map(|c| {
            if c.is_alphanumeric() || c == '+' || c == '#' {
                c
            } else {
                ' '
            }
        })
        .collect();
    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized tokens with stop words, single characters and bare numbers removed.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|t| {
            t.chars().count() >= 2 && t.chars().any(char::is_alphabetic) && !is_stop_word(t)
        })
        .map(str::to_string)
        .collect()
}

pub fn token_set(text: &str) -> BTreeSet<String> {
    tokenize(text).into_iter().collect()
}

/// The most frequent content terms of `text`, ties broken alphabetically.
/// Generic posting vocabulary is left out.
pub fn keyword_inventory(text: &str, limit: usize) -> Vec<String> {
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    for token in tokenize(text) {
        if token.chars().count() < MIN_KEYWORD_LEN || is_posting_word(&token) {
            continue;
        }
        *counts.entry(token).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, u32)> = counts.into_iter().collect();
    // BTreeMap iteration is alphabetical and sort_by is stable.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().take(limit).map(|(t, _)| t).collect()
}

/// Normalized text padded with spaces so phrases only match on token boundaries.
#[derive(Debug, Clone, Default)]
pub struct NormalizedText {
    padded: String,
}

impl NormalizedText {
    pub fn new(raw: &str) -> Self {
        Self {
            padded: format!(" {} ", normalize(raw)),
        }
    }

    pub fn contains_phrase(&self, phrase: &str) -> bool {
        let phrase = normalize(phrase);
        !phrase.is_empty() && self.padded.contains(&format!(" {phrase} "))
    }

    pub fn is_empty(&self) -> bool {
        self.padded.trim().is_empty()
    }
}

/// Deduplicates by normalized form, keeping the first-seen spelling and order.
pub fn dedup_preserving_order<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for item in items {
        let item = item.as_ref().trim();
        let key = normalize(item);
        if key.is_empty() {
            continue;
        }
        if seen.insert(key) {
            out.push(item.to_string());
        }
    }
    out
}
