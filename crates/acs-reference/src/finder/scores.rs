use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use super::domain::ScoreEntry;

#[derive(Debug, thiserror::Error)]
pub enum ScoreImportError {
    #[error("failed to read score table: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid score table CSV data: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Deserialize)]
struct ScoreRow {
    #[serde(
        rename = "CLIENT_NAME",
        default,
        deserialize_with = "super::empty_string_as_none"
    )]
    client_name: Option<String>,
    #[serde(
        rename = "ACS_SCORE",
        default,
        deserialize_with = "super::empty_string_as_none"
    )]
    acs_score: Option<String>,
}

/// Static table of clients with known complexity scores, in source order.
///
/// Source order matters: name search returns hits in table order, without
/// re-sorting. Duplicate client names keep their first position and the last
/// score written.
#[derive(Debug, Clone, Default)]
pub struct ScoreTable {
    entries: Vec<ScoreEntry>,
    index: HashMap<String, usize>,
}

impl ScoreTable {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ScoreImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ScoreImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut table = Self::default();
        let mut unscored = 0usize;
        for record in csv_reader.deserialize::<ScoreRow>() {
            let row = record?;
            let Some(client_name) = row.client_name else {
                continue;
            };
            match row.acs_score.as_deref().and_then(parse_score) {
                Some(score) => table.insert(ScoreEntry { client_name, score }),
                None => unscored += 1,
            }
        }

        info!(
            clients = table.len(),
            unscored, "loaded ACS score table"
        );
        Ok(table)
    }

    pub fn from_entries<I: IntoIterator<Item = ScoreEntry>>(entries: I) -> Self {
        let mut table = Self::default();
        for entry in entries {
            table.insert(entry);
        }
        table
    }

    /// Placeholder table used when the configured source cannot be read.
    pub fn fallback() -> Self {
        Self::from_entries([ScoreEntry {
            client_name: "Test Client".to_string(),
            score: 1,
        }])
    }

    fn insert(&mut self, entry: ScoreEntry) {
        match self.index.get(&entry.client_name) {
            Some(&position) => self.entries[position] = entry,
            None => {
                self.index.insert(entry.client_name.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// Exact, case-sensitive score lookup.
    pub fn score_for(&self, client_name: &str) -> Option<u8> {
        self.index
            .get(client_name)
            .map(|&position| self.entries[position].score)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scores outside the fixed 1-5 set count as unscored.
fn parse_score(raw: &str) -> Option<u8> {
    raw.parse::<u8>().ok().filter(|score| (1..=5).contains(score))
}

/// Soft-failure entry point: any problem reading the source degrades to the
/// placeholder table so downstream components always have a row to work with.
pub fn load_or_fallback<P: AsRef<Path>>(path: P) -> ScoreTable {
    let path = path.as_ref();
    match ScoreTable::from_path(path) {
        Ok(table) if !table.is_empty() => table,
        Ok(_) => {
            warn!(
                path = %path.display(),
                "score table source held no scored clients, using placeholder entry"
            );
            ScoreTable::fallback()
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %err,
                "could not load score table, using placeholder entry"
            );
            ScoreTable::fallback()
        }
    }
}
