//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{info, warn};

use crate::adapters::csv_store::CsvStore;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::thread_pacer::ThreadPacer;
use crate::adapters::tushare::TushareClient;
use crate::domain::collector::{fetch_holders, Collector, COOLDOWN, COOLDOWN_EVERY};
use crate::domain::dataset::unique_codes;
use crate::domain::error::HolderscanError;
use crate::domain::query::query;
use crate::domain::record::{HolderFilter, HolderRecord};
use crate::domain::retry::RetryPolicy;
use crate::domain::security::TsCode;
use crate::ports::config_port::ConfigPort;
use crate::ports::pacing_port::Pacer;
use crate::ports::provider_port::HolderProvider;

#[derive(Parser, Debug)]
#[command(name = "holderscan", about = "Top-10 floating shareholder collector and query tool")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch holders for a single stock
    Fetch {
        /// Stock code, bare (600519) or qualified (600519.SH)
        #[arg(long)]
        code: String,
        /// Report period, YYYYMMDD
        #[arg(long)]
        period: Option<String>,
        /// Announcement date, YYYYMMDD
        #[arg(long)]
        ann_date: Option<String>,
        /// Start of date range, YYYYMMDD or "today"
        #[arg(long, value_parser = parse_compact_date)]
        start: Option<NaiveDate>,
        /// End of date range, YYYYMMDD or "today"
        #[arg(long, value_parser = parse_compact_date)]
        end: Option<NaiveDate>,
        /// Keep only rows whose holder name equals this exactly
        #[arg(long)]
        holder: Option<String>,
        #[arg(short, long)]
        config: PathBuf,
        /// Artifact directory
        #[arg(short, long, default_value = "stock_data")]
        out: PathBuf,
    },
    /// Collect holders for the whole listed universe into the daily artifact
    Batch {
        /// Start of date range, YYYYMMDD or "today"
        #[arg(long, value_parser = parse_compact_date)]
        start: Option<NaiveDate>,
        /// End of date range, YYYYMMDD or "today"
        #[arg(long, value_parser = parse_compact_date)]
        end: Option<NaiveDate>,
        #[arg(short, long)]
        config: PathBuf,
        /// Artifact directory
        #[arg(short, long, default_value = "stock_data")]
        out: PathBuf,
    },
    /// Find stocks whose holder register matches every name fragment
    Query {
        /// Name fragments, matched as case-insensitive substrings; a stock
        /// must match all of them
        #[arg(required = true)]
        names: Vec<String>,
        /// Artifact directory
        #[arg(short, long, default_value = "stock_data")]
        out: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Fetch {
            code,
            period,
            ann_date,
            start,
            end,
            holder,
            config,
            out,
        } => run_fetch(&code, period, ann_date, start, end, holder.as_deref(), &config, &out),
        Command::Batch {
            start,
            end,
            config,
            out,
        } => run_batch(start, end, &config, &out),
        Command::Query { names, out } => run_query(&names, &out),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}

/// YYYYMMDD, or "today" for the current local date.
pub fn parse_compact_date(input: &str) -> Result<NaiveDate, String> {
    if input.eq_ignore_ascii_case("today") {
        return Ok(chrono::Local::now().date_naive());
    }
    NaiveDate::parse_from_str(input, "%Y%m%d")
        .map_err(|_| format!("expected YYYYMMDD or \"today\", got {input:?}"))
}

fn build_client(config_path: &PathBuf) -> Result<(TushareClient, FileConfigAdapter), HolderscanError> {
    let config = FileConfigAdapter::from_file(config_path)?;
    let token = config.require_string("provider", "token")?;
    let api_url = config.get_string("provider", "api_url");
    let client = TushareClient::new(token, api_url)?;
    Ok((client, config))
}

/// Single-key fetch plus persistence: non-empty results are merged into the
/// same daily artifact the batch mode writes, so a single-stock run on the
/// same day tops up that day's dataset instead of vanishing after the print.
pub fn fetch_and_persist(
    provider: &dyn HolderProvider,
    pacer: &dyn Pacer,
    retry: &RetryPolicy,
    filter: &HolderFilter,
    holder: Option<&str>,
    store: &CsvStore,
    date: NaiveDate,
) -> Result<Vec<HolderRecord>, HolderscanError> {
    let rows = fetch_holders(provider, pacer, retry, filter, holder)?;
    if !rows.is_empty() {
        let (path, merged) = store.merge_daily(rows.clone(), date)?;
        info!(
            "merged {} fetched rows into {} ({} rows total)",
            rows.len(),
            path.display(),
            merged.len()
        );
    }
    Ok(rows)
}

fn run_fetch(
    code: &str,
    period: Option<String>,
    ann_date: Option<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    holder: Option<&str>,
    config_path: &PathBuf,
    out: &PathBuf,
) -> Result<(), HolderscanError> {
    let (client, _config) = build_client(config_path)?;
    let filter = HolderFilter {
        ts_code: Some(TsCode::new(code)?),
        period,
        ann_date,
        start_date: start,
        end_date: end,
    };

    let store = CsvStore::new(out.clone());
    let rows = fetch_and_persist(
        &client,
        &ThreadPacer,
        &RetryPolicy::default(),
        &filter,
        holder,
        &store,
        chrono::Local::now().date_naive(),
    )?;
    if rows.is_empty() {
        println!("no holder rows matched");
        return Ok(());
    }
    print_rows(&rows);
    println!("{} rows, {} distinct stock codes", rows.len(), unique_codes(&rows));
    Ok(())
}

fn run_batch(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    config_path: &PathBuf,
    out: &PathBuf,
) -> Result<(), HolderscanError> {
    let (client, config) = build_client(config_path)?;
    let cooldown_every = config.get_int("collector", "cooldown_every", COOLDOWN_EVERY as i64);
    let cooldown_secs = config.get_int("collector", "cooldown_secs", COOLDOWN.as_secs() as i64);
    let collector = Collector::new(&client, &ThreadPacer).with_cooldown(
        cooldown_every.max(1) as usize,
        Duration::from_secs(cooldown_secs.max(0) as u64),
    );

    let universe = collector.universe()?;
    info!("fetched universe of {} listed stocks", universe.len());

    let filter = HolderFilter::default().with_date_range(start, end);
    let outcome = collector.collect(&universe, &filter);
    if !outcome.skipped.is_empty() {
        warn!(
            "{} of {} stocks skipped after repeated fetch failures",
            outcome.skipped.len(),
            universe.len()
        );
    }

    let store = CsvStore::new(out.clone());
    let today = chrono::Local::now().date_naive();
    let code_count = unique_codes(&outcome.rows);
    let (path, rows) = store.merge_daily(outcome.rows, today)?;
    info!(
        "collected {} distinct stock codes; artifact {} now holds {} rows",
        code_count,
        path.display(),
        rows.len()
    );
    Ok(())
}

fn run_query(names: &[String], out: &PathBuf) -> Result<(), HolderscanError> {
    let store = CsvStore::new(out.clone());
    let (date, rows) = store
        .latest_daily()?
        .ok_or_else(|| HolderscanError::NoDataset {
            dir: out.display().to_string(),
        })?;
    info!("queried dataset of {} rows collected on {}", rows.len(), date);

    let outcome = query(names, &rows)?;
    if outcome.is_empty() {
        println!("no stock matches every given holder name");
        return Ok(());
    }

    print_rows(&outcome.rows);
    println!(
        "{} stocks hold all of [{}]",
        outcome.codes.len(),
        outcome.predicates.join(", ")
    );

    let path = store.write_query_result(&outcome, chrono::Local::now().date_naive())?;
    info!("query result saved to {}", path.display());
    Ok(())
}

fn print_rows(rows: &[HolderRecord]) {
    println!(
        "{:<12} {:<10} {:<10} {:<16} {:<10} holder_name",
        "ts_code", "end_date", "ann_date", "hold_amount", "hold_ratio"
    );
    for row in rows {
        println!(
            "{:<12} {:<10} {:<10} {:<16} {:<10} {}",
            row.ts_code, row.end_date, row.ann_date, row.hold_amount, row.hold_ratio,
            row.holder_name
        );
    }
}
