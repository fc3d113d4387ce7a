// Entry point and high-level CLI flow.
//
// - Load the order file and print what was read.
// - Compute the zone x client summary and the zone rollup.
// - Build the three-sheet workbook, park it in the report cache and write
//   it out under its report key.
// - Print previews of the (optionally filtered) summaries.
mod cli;
mod logging;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::Cli;
use once_cell::sync::OnceCell;
use order_summarizer::cache::{report_file_name, ttl_from_secs, ReportCache};
use order_summarizer::config::{load_configuration, AppConfig};
use order_summarizer::output::{build_workbook, preview_table_rows, write_json};
use order_summarizer::util::{format_int, format_number};
use order_summarizer::{
    compute_summaries, loader, to_export_rows, zone_rollup, ClientSummary, RawTable,
    SummaryResponse, ZoneSummary,
};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};

// Generated reports live here until they expire, mirroring a download
// endpoint's store.
static REPORT_CACHE: OnceCell<Mutex<ReportCache>> = OnceCell::new();

fn report_cache(cfg: &AppConfig) -> &'static Mutex<ReportCache> {
    REPORT_CACHE.get_or_init(|| {
        Mutex::new(ReportCache::new(ttl_from_secs(cfg.report_ttl_secs)))
    })
}

/// Read the input file after checking its type and size.
fn handle_load(path: &Path, cfg: &AppConfig) -> Result<RawTable> {
    loader::SourceFormat::from_path(path)?;
    let size = std::fs::metadata(path)
        .with_context(|| format!("cannot read {}", path.display()))?
        .len();
    if size > cfg.max_input_bytes {
        bail!(
            "{} is {} bytes, larger than the {} byte limit",
            path.display(),
            format_int(size),
            format_int(cfg.max_input_bytes)
        );
    }

    let table = loader::load_table(path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    println!(
        "Processing dataset... ({} rows, {} columns loaded)\n",
        format_int(table.len() as u64),
        format_int(table.columns().len() as u64)
    );
    Ok(table)
}

/// Store the workbook under a fresh report key, then fetch it back by key
/// and write it to `out_dir`.
fn handle_store_report(bytes: Vec<u8>, out_dir: &Path, cfg: &AppConfig) -> Result<(String, PathBuf)> {
    let mut cache = report_cache(cfg)
        .lock()
        .map_err(|_| anyhow::anyhow!("report cache lock poisoned"))?;
    let purged = cache.purge_expired(chrono::Utc::now());
    if purged > 0 {
        info!(purged, "dropped expired reports");
    }
    let key = cache.insert(bytes);
    let data = cache.get(&key).context("Report expired")?;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("cannot create {}", out_dir.display()))?;
    let path = out_dir.join(report_file_name(&key));
    std::fs::write(&path, data).with_context(|| format!("cannot write {}", path.display()))?;
    Ok((key, path))
}

fn print_previews(clients: &ClientSummary, zones: &ZoneSummary, max_rows: usize) {
    println!("Zone x Client Summary\n");
    preview_table_rows(&to_export_rows(clients), max_rows);
    println!("Zone Rollup\n");
    preview_table_rows(&to_export_rows(zones), usize::MAX);
    if let Some(total) = zones.grand_total_row() {
        println!(
            "Overall: {} orders, {}% completed\n",
            format_int(total.grand_total()),
            format_number(total.completion() * 100.0, 2)
        );
    }
}

fn handle_generate_reports(cli: &Cli, cfg: &AppConfig, raw: &RawTable) -> Result<()> {
    let (clients, zones) = compute_summaries(raw)?;

    let bytes = build_workbook(raw, &clients, &zones).context("failed to build workbook")?;
    let out_dir = cli
        .out_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&cfg.output_dir));
    let (key, path) = handle_store_report(bytes, &out_dir, cfg)?;
    println!("Report {} saved to {}\n", key, path.display());

    if let Some(json_path) = &cli.json {
        let response = SummaryResponse::new(&clients, &zones, key);
        write_json(json_path, &response)
            .with_context(|| format!("failed to write {}", json_path.display()))?;
        println!("Summary JSON written to {}\n", json_path.display());
    }

    let max_rows = cli.preview.unwrap_or(cfg.preview_rows);
    let filter = cli.client_filter();
    if filter.is_empty() {
        print_previews(&clients, &zones, max_rows);
    } else {
        let filtered = filter.apply(&clients);
        if filtered.rows.is_empty() {
            warn!(?filter, "filter matched no clients");
        }
        println!(
            "(Filtered: {} of {} clients)\n",
            format_int(filtered.rows.len() as u64),
            format_int(clients.rows.len() as u64)
        );
        let filtered_zones = zone_rollup(&filtered);
        print_previews(&filtered, &filtered_zones, max_rows);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_configuration(cli.config.as_deref()).context("failed to load configuration")?;
    logging::init_logger(&cfg.log_level);

    let raw = handle_load(&cli.input, &cfg)?;
    handle_generate_reports(&cli, &cfg, &raw)
}
