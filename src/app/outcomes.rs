//! User-intent draft shown before submitting a stack.
//!
//! The draft only echoes and labels what the user wrote. It must never grow
//! into anything that reads like a clinical claim.

use crate::api::models::Peptide;
use lazy_static::lazy_static;
use regex::Regex;

/// Label and pattern per intent, in the order labels are reported.
const INTENT_KEYWORDS: &[(&str, &str)] = &[
    ("recovery", r"\b(?:recover\w*|soreness|fatigue)\b"),
    ("sleep", r"\b(?:sleep\w*|insomnia|rest)\b"),
    ("focus", r"\b(?:focus\w*|cognition|cognitive|brain|clarity|adhd)\b"),
    ("energy", r"\b(?:energy|energi[sz]\w*|motivation|drive)\b"),
    ("metabolic support", r"\b(?:metabolic|metabolism|glucose|insulin|fat loss|weight)\b"),
    ("inflammation support", r"\b(?:inflammation|inflammatory|inflamed|swelling)\b"),
    ("gut support", r"\b(?:gut|gi|stomach|digestion|digestive|ibd|crohn'?s?|colitis)\b"),
    ("skin/hair support", r"\b(?:skin|hair|collagen|glow)\b"),
];

lazy_static! {
    static ref INTENT_PATTERNS: Vec<(&'static str, Regex)> = INTENT_KEYWORDS
        .iter()
        .map(|(label, pattern)| (*label, Regex::new(pattern).expect("intent pattern compiles")))
        .collect();
}

pub const NO_INTENT_PLACEHOLDER: &str = "(none; see the verbatim description below)";

/// Intent labels found in `description`, deduplicated, in table order.
pub fn detect_intents(description: &str) -> Vec<&'static str> {
    let text = description.trim().to_lowercase();
    let mut intents: Vec<&'static str> = Vec::new();

    for (label, pattern) in INTENT_PATTERNS.iter() {
        if pattern.is_match(&text) && !intents.contains(label) {
            intents.push(*label);
        }
    }

    intents
}

fn header_line(stack_name: &str, selected: &[Peptide]) -> String {
    let name = stack_name.trim();
    let titles: Vec<&str> = selected
        .iter()
        .map(|p| p.title.as_str())
        .filter(|t| !t.is_empty())
        .collect();

    let mut parts = Vec::with_capacity(2);
    if !name.is_empty() {
        parts.push(format!("\"{}\"", name));
    }
    if !titles.is_empty() {
        parts.push(format!("({})", titles.join(", ")));
    }

    if parts.is_empty() {
        "Draft summary:".to_string()
    } else {
        format!("Draft summary for {}:", parts.join(" "))
    }
}

/// Builds the three-line outcomes draft: header, detected intents, verbatim
/// description.
pub fn make_outcomes_draft(description: &str, stack_name: &str, selected: &[Peptide]) -> String {
    let desc = description.trim();

    let intents = detect_intents(desc);
    let intent_line = if intents.is_empty() {
        format!("Keywords detected in description: {}.", NO_INTENT_PLACEHOLDER)
    } else {
        format!("Keywords detected in description: {}.", intents.join(", "))
    };

    let verbatim_line = if desc.is_empty() {
        "User description (verbatim): (none)".to_string()
    } else {
        format!("User description (verbatim): \"{}\"", desc)
    };

    [header_line(stack_name, selected), intent_line, verbatim_line].join("\n")
}
