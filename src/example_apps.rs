//! Reusable demo runners shared by the example binaries.
//!
//! Each runner parses its own CLI from an args iterator and works against an
//! injected store handle, so examples and tests can drive them with any
//! [`Store`] implementation.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, error::ErrorKind};

use crate::backfill::sync_id_to_title_index;
use crate::config::ImportConfig;
use crate::constants::import::DEFAULT_BATCH_THRESHOLD;
use crate::import::Importer;
use crate::query::QueryEngine;
use crate::schema::SchemaManager;
use crate::source::CsvFileSource;
use crate::store::Store;

#[derive(Debug, Parser)]
#[command(
    name = "end_to_end_demo",
    disable_help_subcommand = true,
    about = "Import CSV datasets, backfill the id index, and run the query patterns",
    after_help = "Dataset paths fall back to WIDETABLE_ITEMS_PATH and WIDETABLE_RATINGS_PATH."
)]
struct EndToEndDemoCli {
    #[arg(
        long = "items",
        value_name = "PATH",
        help = "CSV file of item records (itemId,title,categories)"
    )]
    items_path: Option<PathBuf>,
    #[arg(
        long = "ratings",
        value_name = "PATH",
        help = "CSV file of rating records (userId,itemId,score,observedAt)"
    )]
    ratings_path: Option<PathBuf>,
    #[arg(
        long = "batch-threshold",
        default_value_t = DEFAULT_BATCH_THRESHOLD,
        value_parser = parse_positive_usize,
        help = "Staged mutations per table before a batch is flushed"
    )]
    batch_threshold: usize,
    #[arg(long = "title", value_name = "TITLE", help = "Item title to query after import")]
    title: Option<String>,
    #[arg(long = "user", value_name = "USER_ID", help = "User id to query after import")]
    user_id: Option<String>,
}

/// Import both datasets, run the index backfill, then answer any requested
/// queries as pretty-printed JSON.
pub fn run_end_to_end_demo<I>(args_iter: I, store: Arc<dyn Store>) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    init_tracing();
    let Some(cli) = parse_cli::<EndToEndDemoCli, _>(
        std::iter::once("end_to_end_demo".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    let mut config = ImportConfig::from_env();
    if cli.items_path.is_some() {
        config.items_path = cli.items_path;
    }
    if cli.ratings_path.is_some() {
        config.ratings_path = cli.ratings_path;
    }
    config.batch_threshold = cli.batch_threshold;
    let config = config.validated()?;

    SchemaManager::new(store.clone()).ensure_all_tables()?;

    let mut importer = Importer::new(store.clone(), config.batch_threshold);
    let mut items = CsvFileSource::open(config.items_path()?)?;
    let item_summary = importer.import_items(&mut items)?;
    println!(
        "items imported: {} (skipped {})",
        item_summary.imported, item_summary.skipped
    );

    let mut ratings = CsvFileSource::open(config.ratings_path()?)?;
    let rating_summary = importer.import_ratings(&mut ratings)?;
    println!(
        "ratings imported: {} (skipped {})",
        rating_summary.imported, rating_summary.skipped
    );

    let synced = sync_id_to_title_index(store.clone(), config.batch_threshold)?;
    println!("index rows synced: {synced}");

    run_queries(
        &QueryEngine::new(store),
        cli.title.as_deref(),
        cli.user_id.as_deref(),
    )
}

#[derive(Debug, Parser)]
#[command(
    name = "query_demo",
    disable_help_subcommand = true,
    about = "Run the three query patterns against an already-populated store"
)]
struct QueryDemoCli {
    #[arg(long = "title", value_name = "TITLE", help = "Item title to look up")]
    title: Option<String>,
    #[arg(long = "user", value_name = "USER_ID", help = "User id to list ratings for")]
    user_id: Option<String>,
}

/// Answer the requested queries against `store` as pretty-printed JSON.
pub fn run_query_demo<I>(args_iter: I, store: Arc<dyn Store>) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    init_tracing();
    let Some(cli) =
        parse_cli::<QueryDemoCli, _>(std::iter::once("query_demo".to_string()).chain(args_iter))?
    else {
        return Ok(());
    };
    if cli.title.is_none() && cli.user_id.is_none() {
        println!("Nothing to query; pass --title and/or --user.");
        return Ok(());
    }
    run_queries(
        &QueryEngine::new(store),
        cli.title.as_deref(),
        cli.user_id.as_deref(),
    )
}

fn run_queries(
    queries: &QueryEngine,
    title: Option<&str>,
    user_id: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    if let Some(title) = title {
        match queries.item_detail(title)? {
            Some(detail) => println!("{}", serde_json::to_string_pretty(&detail)?),
            None => println!("No item found for title '{title}'."),
        }
        let ratings = queries.ratings_by_item(title)?;
        println!(
            "ratings for item '{title}': {}",
            serde_json::to_string_pretty(&ratings)?
        );
    }
    if let Some(user_id) = user_id {
        let ratings = queries.ratings_by_user(user_id)?;
        println!(
            "ratings by user '{user_id}': {}",
            serde_json::to_string_pretty(&ratings)?
        );
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}

fn parse_positive_usize(value: &str) -> Result<usize, String> {
    let parsed: usize = value
        .parse()
        .map_err(|_| format!("'{value}' is not a valid positive integer"))?;
    if parsed == 0 {
        return Err("value must be at least 1".to_string());
    }
    Ok(parsed)
}
