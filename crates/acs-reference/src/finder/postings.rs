use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use super::domain::Posting;

pub(crate) const CLIENT_NAME_COLUMN: &str = "CLIENT_NAME";
pub(crate) const CATEGORY_COLUMN: &str = "DETAIL_NORMALISED_CATEGORY";

#[derive(Debug, thiserror::Error)]
pub enum PostingImportError {
    #[error("failed to read job posting export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid job posting CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("job posting export is missing required column {0}")]
    MissingColumn(&'static str),
}

#[derive(Debug, Deserialize)]
struct PostingRow {
    #[serde(
        rename = "CLIENT_NAME",
        default,
        deserialize_with = "super::empty_string_as_none"
    )]
    client_name: Option<String>,
    #[serde(
        rename = "DETAIL_NORMALISED_CATEGORY",
        default,
        deserialize_with = "super::empty_string_as_none"
    )]
    category: Option<String>,
    #[serde(
        rename = "JOB_TITLE",
        default,
        deserialize_with = "super::empty_string_as_none"
    )]
    job_title: Option<String>,
    #[serde(flatten)]
    extra: BTreeMap<String, String>,
}

/// Job postings in export order.
///
/// A source that could not be loaded is represented by the engine as `None`,
/// distinct from a table that loaded zero rows.
#[derive(Debug, Clone, Default)]
pub struct PostingTable {
    rows: Vec<Posting>,
}

impl PostingTable {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PostingImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PostingImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        for column in [CLIENT_NAME_COLUMN, CATEGORY_COLUMN] {
            if !headers.iter().any(|header| header == column) {
                return Err(PostingImportError::MissingColumn(column));
            }
        }

        let mut rows = Vec::new();
        let mut dropped = 0usize;
        for record in csv_reader.deserialize::<PostingRow>() {
            let row = record?;
            let (Some(client_name), Some(category)) = (row.client_name, row.category) else {
                dropped += 1;
                continue;
            };
            rows.push(Posting {
                client_name,
                category,
                job_title: row.job_title,
                extra: row.extra,
            });
        }

        let clients = rows
            .iter()
            .map(|row| row.client_name.as_str())
            .collect::<HashSet<_>>()
            .len();
        info!(postings = rows.len(), clients, dropped, "loaded job posting export");
        Ok(Self { rows })
    }

    pub fn from_rows(rows: Vec<Posting>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Posting] {
        &self.rows
    }

    /// Sorted, deduplicated category listing.
    pub fn categories(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn from_reader_loads_rows_and_passthrough_columns() {
        let csv = "CLIENT_NAME,DETAIL_NORMALISED_CATEGORY,JOB_TITLE,NORMALISED_COUNTRY\n\
Wells Fargo,Banking,Credit Analyst,United States\n\
Adecco,Staffing,Recruiter,Germany\n";
        let table = PostingTable::from_reader(Cursor::new(csv)).expect("table parses");

        assert_eq!(table.len(), 2);
        let first = &table.rows()[0];
        assert_eq!(first.client_name, "Wells Fargo");
        assert_eq!(first.category, "Banking");
        assert_eq!(first.job_title.as_deref(), Some("Credit Analyst"));
        assert_eq!(
            first.extra.get("NORMALISED_COUNTRY").map(String::as_str),
            Some("United States")
        );
    }

    #[test]
    fn from_reader_trims_whitespace_in_headers() {
        let csv = " CLIENT_NAME , DETAIL_NORMALISED_CATEGORY ,JOB_TITLE\nAdecco,Staffing,Recruiter\n";
        let table = PostingTable::from_reader(Cursor::new(csv)).expect("table parses");

        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].category, "Staffing");
    }

    #[test]
    fn rows_missing_required_values_are_dropped() {
        let csv = "CLIENT_NAME,DETAIL_NORMALISED_CATEGORY,JOB_TITLE\n\
Adecco,Staffing,Recruiter\n\
,Staffing,Orphan Row\n\
Shiftsmart,,Shift Worker\n";
        let table = PostingTable::from_reader(Cursor::new(csv)).expect("table parses");

        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].client_name, "Adecco");
    }

    #[test]
    fn missing_required_column_fails_the_load() {
        let csv = "CLIENT_NAME,JOB_TITLE\nAdecco,Recruiter\n";
        let error = PostingTable::from_reader(Cursor::new(csv)).expect_err("expected column error");

        match error {
            PostingImportError::MissingColumn(column) => {
                assert_eq!(column, CATEGORY_COLUMN);
            }
            other => panic!("expected missing column error, got {other:?}"),
        }
    }

    #[test]
    fn categories_are_sorted_and_deduplicated() {
        let csv = "CLIENT_NAME,DETAIL_NORMALISED_CATEGORY,JOB_TITLE\n\
A,Retail,T1\nB,Banking,T2\nC,Retail,T3\n";
        let table = PostingTable::from_reader(Cursor::new(csv)).expect("table parses");

        assert_eq!(table.categories(), vec!["Banking", "Retail"]);
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let error = PostingTable::from_path("./does-not-exist.csv").expect_err("expected io error");
        match error {
            PostingImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
