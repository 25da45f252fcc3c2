use tracing::info;

use super::domain::{CombinedRow, Posting};
use super::postings::PostingTable;
use super::scores::ScoreTable;

/// Postings joined with the score table. Every row carries a known score.
#[derive(Debug, Clone, Default)]
pub struct CombinedTable {
    rows: Vec<CombinedRow>,
}

impl CombinedTable {
    pub fn rows(&self) -> &[CombinedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Left-join postings to the score table by exact, case-sensitive client
/// name, then drop every row that found no score. Postings from unscored
/// clients never enter the combined table.
pub fn combine(scores: &ScoreTable, postings: &PostingTable) -> CombinedTable {
    let joined: Vec<(&Posting, Option<u8>)> = postings
        .rows()
        .iter()
        .map(|posting| (posting, scores.score_for(&posting.client_name)))
        .collect();

    let unmatched = joined.iter().filter(|(_, score)| score.is_none()).count();
    let rows: Vec<CombinedRow> = joined
        .into_iter()
        .filter_map(|(posting, score)| {
            score.map(|score| CombinedRow {
                client_name: posting.client_name.clone(),
                category: posting.category.clone(),
                job_title: posting.job_title.clone(),
                score,
            })
        })
        .collect();

    info!(
        rows = rows.len(),
        dropped = unmatched,
        "combined job postings with score table"
    );
    CombinedTable { rows }
}
