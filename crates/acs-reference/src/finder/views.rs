use std::collections::BTreeMap;

use serde::Serialize;

/// One reference client returned by the similarity matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientMatch {
    pub client_name: String,
    pub acs_score: u8,
    pub job_count: usize,
    pub sample_job_titles: Vec<String>,
    pub matching_category: String,
}

/// Name-search hit from the score table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientScoreView {
    pub client_name: String,
    pub acs_score: u8,
}

/// Aggregate view of a single client's combined postings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientSummary {
    pub client_name: String,
    pub acs_score: u8,
    pub total_jobs: usize,
    pub job_categories: BTreeMap<String, usize>,
    pub sample_job_titles: Vec<String>,
    pub complexity_description: &'static str,
}

/// Entry in the full scored-client listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredClientView {
    pub client_name: String,
    pub acs_score: u8,
    pub complexity_level: &'static str,
}
