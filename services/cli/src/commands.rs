use std::path::PathBuf;

use acs_reference::config::AppConfig;
use acs_reference::error::AppError;
use acs_reference::finder::{
    ReferenceFinder, DEFAULT_SEARCH_RESULTS, DEFAULT_SIMILAR_RESULTS,
};
use chrono::{DateTime, Local};
use clap::Args;
use serde::Serialize;

/// Source overrides shared by every command.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct DataArgs {
    /// Override the configured job posting export path
    #[arg(long)]
    pub(crate) job_data: Option<PathBuf>,
    /// Override the configured ACS score table path
    #[arg(long)]
    pub(crate) scores: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct SimilarArgs {
    /// Target ACS score (1-5)
    #[arg(long)]
    pub(crate) score: u8,
    /// Target job category (exact match)
    #[arg(long)]
    pub(crate) category: String,
    /// Reserved country filter (accepted, not yet applied)
    #[arg(long)]
    pub(crate) country: Option<String>,
    /// Maximum number of reference clients to return
    #[arg(long, default_value_t = DEFAULT_SIMILAR_RESULTS)]
    pub(crate) max_results: usize,
    /// Emit JSON instead of the human-readable listing
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) data: DataArgs,
}

#[derive(Args, Debug)]
pub(crate) struct SummaryArgs {
    /// Client name (exact match against the combined table)
    #[arg(long)]
    pub(crate) client: String,
    /// Emit JSON instead of the human-readable summary
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) data: DataArgs,
}

#[derive(Args, Debug)]
pub(crate) struct SearchArgs {
    /// Name fragment to search for (case-insensitive)
    #[arg(long)]
    pub(crate) query: String,
    /// Maximum number of clients to return
    #[arg(long, default_value_t = DEFAULT_SEARCH_RESULTS)]
    pub(crate) max_results: usize,
    /// Emit JSON instead of the human-readable listing
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) data: DataArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CategoriesArgs {
    /// Emit JSON instead of the human-readable listing
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) data: DataArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ClientsArgs {
    /// Emit JSON instead of the human-readable listing
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) data: DataArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    #[command(flatten)]
    pub(crate) data: DataArgs,
}

#[derive(Debug, Serialize)]
struct QueryEnvelope<T: Serialize> {
    generated_at: DateTime<Local>,
    total_found: usize,
    results: T,
}

fn build_engine(config: &AppConfig, overrides: &DataArgs) -> ReferenceFinder {
    let mut data = config.data.clone();
    if let Some(path) = &overrides.job_data {
        data.job_data_file = path.clone();
    }
    if let Some(path) = &overrides.scores {
        data.score_file = path.clone();
    }
    ReferenceFinder::initialize(&data)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn run_similar(config: &AppConfig, args: SimilarArgs) -> Result<(), AppError> {
    let SimilarArgs {
        score,
        category,
        country,
        max_results,
        json,
        data,
    } = args;

    let finder = build_engine(config, &data);
    let matches = finder.find_similar_clients(score, &category, country.as_deref(), max_results);

    if json {
        return print_json(&QueryEnvelope {
            generated_at: Local::now(),
            total_found: matches.len(),
            results: matches,
        });
    }

    if matches.is_empty() {
        println!("No reference clients found for ACS {score} in category '{category}'");
        return Ok(());
    }

    println!("Reference clients for ACS {score} in category '{category}'");
    for (rank, client) in matches.iter().enumerate() {
        println!(
            "{}. {} (ACS {}) - {} matching postings",
            rank + 1,
            client.client_name,
            client.acs_score,
            client.job_count
        );
        if !client.sample_job_titles.is_empty() {
            println!("   sample titles: {}", client.sample_job_titles.join(", "));
        }
    }
    Ok(())
}

pub(crate) fn run_summary(config: &AppConfig, args: SummaryArgs) -> Result<(), AppError> {
    let SummaryArgs { client, json, data } = args;

    let finder = build_engine(config, &data);
    let summary = finder.get_client_summary(&client);

    if json {
        return print_json(&QueryEnvelope {
            generated_at: Local::now(),
            total_found: usize::from(summary.is_some()),
            results: summary,
        });
    }

    let Some(summary) = summary else {
        println!("No combined posting data for client '{client}'");
        return Ok(());
    };

    println!("Summary for {}", summary.client_name);
    println!(
        "- ACS {} ({})",
        summary.acs_score, summary.complexity_description
    );
    println!(
        "- {} postings across {} categories",
        summary.total_jobs,
        summary.job_categories.len()
    );
    for (category, count) in &summary.job_categories {
        println!("  - {category}: {count}");
    }
    if !summary.sample_job_titles.is_empty() {
        println!("- sample titles: {}", summary.sample_job_titles.join(", "));
    }
    Ok(())
}

pub(crate) fn run_search(config: &AppConfig, args: SearchArgs) -> Result<(), AppError> {
    let SearchArgs {
        query,
        max_results,
        json,
        data,
    } = args;

    let finder = build_engine(config, &data);
    let hits = finder.search_clients(&query, max_results);

    if json {
        return print_json(&QueryEnvelope {
            generated_at: Local::now(),
            total_found: hits.len(),
            results: hits,
        });
    }

    println!("Name search '{query}' matched {} scored clients", hits.len());
    for hit in &hits {
        println!("- {} (ACS {})", hit.client_name, hit.acs_score);
    }
    Ok(())
}

pub(crate) fn run_categories(config: &AppConfig, args: CategoriesArgs) -> Result<(), AppError> {
    let CategoriesArgs { json, data } = args;

    let finder = build_engine(config, &data);
    let categories = finder.get_job_categories();

    if json {
        return print_json(&QueryEnvelope {
            generated_at: Local::now(),
            total_found: categories.len(),
            results: categories,
        });
    }

    if categories.is_empty() {
        println!("No job categories available");
        return Ok(());
    }
    println!("{} job categories", categories.len());
    for category in &categories {
        println!("- {category}");
    }
    Ok(())
}

pub(crate) fn run_clients(config: &AppConfig, args: ClientsArgs) -> Result<(), AppError> {
    let ClientsArgs { json, data } = args;

    let finder = build_engine(config, &data);
    let clients = finder.list_all_scored_clients();

    if json {
        return print_json(&QueryEnvelope {
            generated_at: Local::now(),
            total_found: clients.len(),
            results: clients,
        });
    }

    println!("{} scored clients", clients.len());
    for client in &clients {
        println!(
            "- {} (ACS {}, {})",
            client.client_name, client.acs_score, client.complexity_level
        );
    }
    Ok(())
}

pub(crate) fn run_demo(config: &AppConfig, args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { data } = args;
    let finder = build_engine(config, &data);

    println!("ACS client reference finder demo");
    println!("- {} scored clients", finder.score_table().len());
    match finder.posting_table() {
        Some(postings) => println!(
            "- {} job postings across {} categories",
            postings.len(),
            finder.get_job_categories().len()
        ),
        None => println!("- job posting export unavailable"),
    }
    match finder.combined_table() {
        Some(combined) => println!("- {} postings joined with a known score", combined.len()),
        None => println!("- combined table unavailable"),
    }

    let Some(first) = finder
        .combined_table()
        .and_then(|combined| combined.rows().first().cloned())
    else {
        println!("\nNo combined data to demonstrate queries against");
        return Ok(());
    };

    println!(
        "\nReference clients for ACS {} in category '{}'",
        first.score, first.category
    );
    let matches =
        finder.find_similar_clients(first.score, &first.category, None, DEFAULT_SIMILAR_RESULTS);
    for (rank, client) in matches.iter().enumerate() {
        println!(
            "{}. {} - {} matching postings",
            rank + 1,
            client.client_name,
            client.job_count
        );
    }

    if let Some(summary) = finder.get_client_summary(&first.client_name) {
        println!("\nSummary for {}", summary.client_name);
        println!(
            "- ACS {} ({})",
            summary.acs_score, summary.complexity_description
        );
        println!(
            "- {} postings across {} categories",
            summary.total_jobs,
            summary.job_categories.len()
        );
        for (category, count) in &summary.job_categories {
            println!("  - {category}: {count}");
        }
    }

    let query: String = first.client_name.chars().take(4).collect();
    let hits = finder.search_clients(&query, DEFAULT_SEARCH_RESULTS);
    println!("\nName search '{query}' matched {} scored clients", hits.len());
    for hit in &hits {
        println!("- {} (ACS {})", hit.client_name, hit.acs_score);
    }
    Ok(())
}
