mod combine;
pub mod domain;
pub mod postings;
pub mod scores;
mod views;

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::DataConfig;

pub use combine::{combine, CombinedTable};
pub use domain::{
    complexity_description, complexity_label, CombinedRow, ComplexityLevel, Posting, ScoreEntry,
};
pub use postings::{PostingImportError, PostingTable};
pub use scores::{ScoreImportError, ScoreTable};
pub use views::{ClientMatch, ClientScoreView, ClientSummary, ScoredClientView};

/// Result bound applied by callers that do not pass their own.
pub const DEFAULT_SIMILAR_RESULTS: usize = 10;
pub const DEFAULT_SEARCH_RESULTS: usize = 20;

const SAMPLE_TITLES_PER_MATCH: usize = 5;
const SAMPLE_TITLES_PER_SUMMARY: usize = 10;

/// In-memory reference matching engine over the score and posting tables.
///
/// Built once at startup and read-only afterwards: every query method takes
/// `&self` and never mutates table state, so overlapping readers need no
/// coordination. Callers that might race on first construction must
/// serialize it themselves.
pub struct ReferenceFinder {
    scores: ScoreTable,
    postings: Option<PostingTable>,
    combined: Option<CombinedTable>,
}

impl ReferenceFinder {
    /// Load both sources and join them. Construction never fails: a score
    /// source that cannot be read falls back to the placeholder entry, and a
    /// posting source that cannot be read leaves the posting and combined
    /// tables unavailable.
    pub fn initialize(data: &DataConfig) -> Self {
        let scores = scores::load_or_fallback(&data.score_file);
        let postings = match PostingTable::from_path(&data.job_data_file) {
            Ok(table) => Some(table),
            Err(err) => {
                warn!(
                    path = %data.job_data_file.display(),
                    error = %err,
                    "job posting export unavailable"
                );
                None
            }
        };
        Self::from_tables(scores, postings)
    }

    /// Assemble an engine from already-built tables, joining when the posting
    /// table is present.
    pub fn from_tables(scores: ScoreTable, postings: Option<PostingTable>) -> Self {
        let combined = postings.as_ref().map(|table| combine(&scores, table));
        Self {
            scores,
            postings,
            combined,
        }
    }

    pub fn score_table(&self) -> &ScoreTable {
        &self.scores
    }

    pub fn posting_table(&self) -> Option<&PostingTable> {
        self.postings.as_ref()
    }

    pub fn combined_table(&self) -> Option<&CombinedTable> {
        self.combined.as_ref()
    }

    /// Find reference clients whose postings match the target score and job
    /// category, strongest references (most matching postings) first.
    ///
    /// Scores outside the fixed 1-5 set simply match nothing. An empty
    /// result is the expected signal for both "no data" and "no match";
    /// the cases are told apart in the logs only.
    pub fn find_similar_clients(
        &self,
        target_score: u8,
        target_category: &str,
        target_country: Option<&str>,
        max_results: usize,
    ) -> Vec<ClientMatch> {
        let Some(combined) = self.combined.as_ref() else {
            warn!("similar-client search skipped: combined table unavailable");
            return Vec::new();
        };

        if let Some(country) = target_country {
            // Reserved filter: no country column is joined into the combined
            // table yet.
            debug!(country, "ignoring country filter");
        }

        let category_rows: Vec<&CombinedRow> = combined
            .rows()
            .iter()
            .filter(|row| row.category == target_category)
            .collect();
        if category_rows.is_empty() {
            warn!(category = target_category, "no postings for requested job category");
            return Vec::new();
        }

        let matching: Vec<&CombinedRow> = category_rows
            .into_iter()
            .filter(|row| row.score == target_score)
            .collect();
        if matching.is_empty() {
            warn!(
                score = target_score,
                category = target_category,
                "no postings at requested score within category"
            );
            return Vec::new();
        }

        // Group rows per client in first-seen order; the later sort is
        // stable, so equal job counts keep this order.
        let mut grouped: Vec<(String, Vec<&CombinedRow>)> = Vec::new();
        let mut by_client: HashMap<&str, usize> = HashMap::new();
        for row in matching.iter().copied() {
            match by_client.get(row.client_name.as_str()) {
                Some(&position) => grouped[position].1.push(row),
                None => {
                    by_client.insert(row.client_name.as_str(), grouped.len());
                    grouped.push((row.client_name.clone(), vec![row]));
                }
            }
        }

        info!(
            clients = grouped.len(),
            postings = matching.len(),
            score = target_score,
            category = target_category,
            "found reference candidates"
        );

        let mut matches: Vec<ClientMatch> = grouped
            .into_iter()
            .map(|(client_name, rows)| ClientMatch {
                client_name,
                acs_score: rows[0].score,
                job_count: rows.len(),
                sample_job_titles: distinct_titles(
                    rows.iter().filter_map(|row| row.job_title.as_deref()),
                    SAMPLE_TITLES_PER_MATCH,
                ),
                matching_category: target_category.to_string(),
            })
            .collect();

        matches.sort_by(|a, b| b.job_count.cmp(&a.job_count));
        matches.truncate(max_results);
        matches
    }

    /// Case-insensitive substring search over score-table client names,
    /// returned in table order.
    pub fn search_clients(&self, query: &str, max_results: usize) -> Vec<ClientScoreView> {
        let needle = query.to_lowercase();
        self.scores
            .entries()
            .iter()
            .filter(|entry| entry.client_name.to_lowercase().contains(&needle))
            .take(max_results)
            .map(|entry| ClientScoreView {
                client_name: entry.client_name.clone(),
                acs_score: entry.score,
            })
            .collect()
    }

    /// Aggregate posting summary for one client, or `None` when the combined
    /// table is unavailable or holds no rows for the name.
    pub fn get_client_summary(&self, client_name: &str) -> Option<ClientSummary> {
        let Some(combined) = self.combined.as_ref() else {
            warn!("client summary skipped: combined table unavailable");
            return None;
        };

        let rows: Vec<&CombinedRow> = combined
            .rows()
            .iter()
            .filter(|row| row.client_name == client_name)
            .collect();
        let first = rows.first()?;

        let mut job_categories: BTreeMap<String, usize> = BTreeMap::new();
        for row in &rows {
            *job_categories.entry(row.category.clone()).or_insert(0) += 1;
        }

        Some(ClientSummary {
            client_name: client_name.to_string(),
            acs_score: first.score,
            total_jobs: rows.len(),
            job_categories,
            sample_job_titles: distinct_titles(
                rows.iter().filter_map(|row| row.job_title.as_deref()),
                SAMPLE_TITLES_PER_SUMMARY,
            ),
            complexity_description: complexity_description(first.score),
        })
    }

    /// Sorted, deduplicated categories from the posting table; empty when the
    /// export never loaded.
    pub fn get_job_categories(&self) -> Vec<String> {
        match self.postings.as_ref() {
            Some(table) => table.categories(),
            None => Vec::new(),
        }
    }

    /// Every scored client with its complexity level, ordered by name.
    pub fn list_all_scored_clients(&self) -> Vec<ScoredClientView> {
        let mut clients: Vec<ScoredClientView> = self
            .scores
            .entries()
            .iter()
            .map(|entry| ScoredClientView {
                client_name: entry.client_name.clone(),
                acs_score: entry.score,
                complexity_level: complexity_label(entry.score),
            })
            .collect();
        clients.sort_by(|a, b| a.client_name.cmp(&b.client_name));
        clients
    }
}

/// Distinct titles in first-seen order, capped.
fn distinct_titles<'a>(titles: impl Iterator<Item = &'a str>, cap: usize) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for title in titles {
        if seen.len() == cap {
            break;
        }
        if !seen.iter().any(|existing| existing == title) {
            seen.push(title.to_string());
        }
    }
    seen
}

pub(crate) fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn posting(client: &str, category: &str, title: &str) -> Posting {
        Posting {
            client_name: client.to_string(),
            category: category.to_string(),
            job_title: Some(title.to_string()),
            extra: BTreeMap::new(),
        }
    }

    fn engine(scores: Vec<(&str, u8)>, postings: Vec<Posting>) -> ReferenceFinder {
        let table = ScoreTable::from_entries(scores.into_iter().map(|(name, score)| ScoreEntry {
            client_name: name.to_string(),
            score,
        }));
        ReferenceFinder::from_tables(table, Some(PostingTable::from_rows(postings)))
    }

    #[test]
    fn distinct_titles_keeps_first_seen_order_and_cap() {
        let titles = ["T1", "T2", "T1", "T3", "T4", "T5", "T6"];
        let collected = distinct_titles(titles.into_iter(), 5);
        assert_eq!(collected, vec!["T1", "T2", "T3", "T4", "T5"]);
    }

    #[test]
    fn out_of_range_target_score_matches_nothing() {
        let finder = engine(vec![("A", 1)], vec![posting("A", "Cat1", "T1")]);

        assert!(finder.find_similar_clients(0, "Cat1", None, 10).is_empty());
        assert!(finder.find_similar_clients(6, "Cat1", None, 10).is_empty());
    }

    #[test]
    fn country_filter_does_not_change_results() {
        let finder = engine(
            vec![("A", 1), ("B", 1)],
            vec![
                posting("A", "Cat1", "T1"),
                posting("B", "Cat1", "T2"),
            ],
        );

        let without = finder.find_similar_clients(1, "Cat1", None, 10);
        let with = finder.find_similar_clients(1, "Cat1", Some("Germany"), 10);
        assert_eq!(without, with);
    }

    #[test]
    fn equal_job_counts_keep_first_seen_order() {
        let finder = engine(
            vec![("A", 1), ("B", 1), ("C", 1)],
            vec![
                posting("A", "Cat1", "T1"),
                posting("B", "Cat1", "T2"),
                posting("C", "Cat1", "T3"),
            ],
        );

        let matches = finder.find_similar_clients(1, "Cat1", None, 10);
        let names: Vec<&str> = matches.iter().map(|m| m.client_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn unavailable_postings_leave_every_query_empty() {
        let scores = ScoreTable::from_entries([ScoreEntry {
            client_name: "A".to_string(),
            score: 1,
        }]);
        let finder = ReferenceFinder::from_tables(scores, None);

        assert!(finder.posting_table().is_none());
        assert!(finder.combined_table().is_none());
        assert!(finder.find_similar_clients(1, "Cat1", None, 10).is_empty());
        assert!(finder.get_client_summary("A").is_none());
        assert!(finder.get_job_categories().is_empty());
        assert_eq!(finder.list_all_scored_clients().len(), 1);
    }

    #[test]
    fn loaded_but_empty_postings_differ_from_unavailable() {
        let scores = ScoreTable::from_entries([ScoreEntry {
            client_name: "A".to_string(),
            score: 1,
        }]);
        let finder = ReferenceFinder::from_tables(scores, Some(PostingTable::from_rows(vec![])));

        assert!(finder.posting_table().is_some());
        let combined = finder.combined_table().expect("join ran on empty table");
        assert!(combined.is_empty());
    }
}
