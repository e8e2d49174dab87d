use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;

use favorites_search::matcher::Query;
use favorites_search::models::{Record, SearchStats, TrackSummary};
use favorites_search::progress::{create_spinner, format_duration, is_log_only, log_phase, set_log_only};
use favorites_search::safety::validate_output_path;
use favorites_search::search::{filter_records_par, filter_records_with_stats};
use favorites_search::store::{load_records, save_records};

#[derive(Parser)]
#[command(name = "favorites-search")]
#[command(about = "Search a favorites collection by track, album or artist")]
struct Args {
    /// Favorites export (.json) or database (.sqlite3, .sqlite, .db)
    source: PathBuf,

    /// Search text; empty lists every favorite
    #[arg(default_value = "")]
    query: String,

    /// Write matching tracks to this JSON file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Worker threads (0 = rayon default, 1 = sequential)
    #[arg(long, default_value = "0")]
    workers: usize,

    /// Hide spinners and log plain phase lines
    #[arg(long)]
    log_only: bool,

    /// Write search statistics JSON to this file
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Print at most this many matches
    #[arg(long)]
    limit: Option<usize>,

    /// Print matches as JSON summaries instead of a table
    #[arg(long)]
    json: bool,
}

/// Sequential runs (and `--stats`) go through the instrumented filter.
fn run_search<'a>(records: &'a [Record], query: &str, args: &Args) -> (Vec<&'a Record>, SearchStats) {
    if args.workers == 1 || args.stats.is_some() {
        return filter_records_with_stats(records, query);
    }

    let start = Instant::now();
    let matched = filter_records_par(records, query);
    let parsed = Query::parse(query);
    let stats = SearchStats {
        total_records: records.len(),
        matched_records: matched.len(),
        token_count: parsed.as_ref().map_or(0, |q| q.tokens().len()),
        empty_query: parsed.is_none(),
        elapsed_seconds: start.elapsed().as_secs_f64(),
        ..Default::default()
    };
    (matched, stats)
}

fn print_matches(matched: &[&Record], limit: Option<usize>, as_json: bool) -> Result<()> {
    let shown = limit.unwrap_or(matched.len()).min(matched.len());
    let summaries: Vec<TrackSummary> = matched[..shown]
        .iter()
        .map(|r| TrackSummary::from_record(r))
        .collect();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!("\n{:<12} {:<40} {:<30} {}", "ID", "Title", "Artist", "Album");
    println!("{:-<100}", "");
    for s in &summaries {
        println!(
            "{:<12} {:<40} {:<30} {}",
            s.id.as_deref().unwrap_or("-"),
            s.name.as_deref().unwrap_or("-"),
            s.artist.as_deref().unwrap_or("-"),
            s.album.as_deref().unwrap_or("")
        );
    }
    if shown < matched.len() {
        println!("... {} more", matched.len() - shown);
    }
    if matched.is_empty() {
        println!("No matching favorites.");
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    set_log_only(args.log_only);

    if args.workers > 1 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.workers)
            .build_global()
            .context("Failed to set thread pool size")?;
    }

    if let Some(ref output) = args.output {
        validate_output_path(output, &args.source)?;
    }

    let start = Instant::now();

    let spinner = create_spinner("Loading favorites");
    let favorites = load_records(&args.source)?;
    spinner.finish_and_clear();
    if is_log_only() || favorites.skipped > 0 {
        log_phase(
            "LOAD",
            &format!(
                "{} favorites from {:?} ({} skipped)",
                favorites.records.len(),
                args.source,
                favorites.skipped
            ),
        );
    }

    let (matched, stats) = run_search(&favorites.records, &args.query, &args);
    if is_log_only() {
        log_phase(
            "SEARCH",
            &format!(
                "{:?}: {}/{} matched ({:.1}%)",
                args.query.trim(),
                stats.matched_records,
                stats.total_records,
                stats.match_rate()
            ),
        );
        stats.log_phase("search");
    }

    print_matches(&matched, args.limit, args.json)?;

    if let Some(ref output) = args.output {
        save_records(output, &matched)?;
        log_phase("OUTPUT", &format!("Wrote {} tracks to {:?}", matched.len(), output));
    }

    if let Some(ref path) = args.stats {
        stats
            .write_to_file(path)
            .with_context(|| format!("Failed to write stats to {}", path.display()))?;
    }

    if is_log_only() {
        log_phase("DONE", &format!("Elapsed: {}", format_duration(start.elapsed())));
    }

    Ok(())
}
