use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single client with a known ACS complexity score.
///
/// Clients whose score is unknown never become entries; the score table only
/// ever holds scores in the fixed 1-5 set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub client_name: String,
    pub score: u8,
}

/// One job posting row from the export, after load-time cleaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub client_name: String,
    pub category: String,
    pub job_title: Option<String>,
    /// Columns from the export that the engine does not interpret.
    pub extra: BTreeMap<String, String>,
}

/// A posting joined with its client's score.
///
/// Postings from unscored clients never become combined rows, so `score` is
/// always one the score table vouches for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombinedRow {
    pub client_name: String,
    pub category: String,
    pub job_title: Option<String>,
    pub score: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityLevel {
    VerySimple,
    Simple,
    Moderate,
    Complex,
    VeryComplex,
}

impl ComplexityLevel {
    pub const fn from_score(score: u8) -> Option<Self> {
        match score {
            1 => Some(Self::VerySimple),
            2 => Some(Self::Simple),
            3 => Some(Self::Moderate),
            4 => Some(Self::Complex),
            5 => Some(Self::VeryComplex),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::VerySimple => "Very Simple",
            Self::Simple => "Simple",
            Self::Moderate => "Moderate",
            Self::Complex => "Complex",
            Self::VeryComplex => "Very Complex",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::VerySimple => "Very Low Complexity - Simple, standardized processes",
            Self::Simple => "Low Complexity - Basic workflows with some variation",
            Self::Moderate => "Medium Complexity - Moderate process complexity",
            Self::Complex => "High Complexity - Complex, multi-step processes",
            Self::VeryComplex => "Very High Complexity - Highly specialized, complex workflows",
        }
    }
}

/// Short label for a score, tolerating values outside the fixed set.
pub fn complexity_label(score: u8) -> &'static str {
    match ComplexityLevel::from_score(score) {
        Some(level) => level.label(),
        None => "Unknown",
    }
}

/// Long-form description for a score, tolerating values outside the fixed set.
pub fn complexity_description(score: u8) -> &'static str {
    match ComplexityLevel::from_score(score) {
        Some(level) => level.description(),
        None => "Unknown Complexity",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_score_in_the_fixed_set_has_a_level() {
        for score in 1..=5u8 {
            let level = ComplexityLevel::from_score(score).expect("score maps to a level");
            assert!(!level.label().is_empty());
            assert!(!level.description().is_empty());
        }
    }

    #[test]
    fn boundary_labels_match_the_published_wording() {
        assert_eq!(complexity_label(1), "Very Simple");
        assert_eq!(complexity_label(5), "Very Complex");
        assert_eq!(
            complexity_description(5),
            "Very High Complexity - Highly specialized, complex workflows"
        );
    }

    #[test]
    fn out_of_range_scores_fall_back_to_unknown() {
        assert!(ComplexityLevel::from_score(0).is_none());
        assert!(ComplexityLevel::from_score(6).is_none());
        assert_eq!(complexity_label(0), "Unknown");
        assert_eq!(complexity_description(9), "Unknown Complexity");
    }
}
