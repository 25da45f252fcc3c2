//! In-memory client reference matching: joins a static ACS complexity score
//! table with a job posting export and answers "find clients similar to X"
//! queries over the combined data.

pub mod config;
pub mod error;
pub mod finder;
pub mod telemetry;
