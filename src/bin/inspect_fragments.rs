//! Show the searchable fragments extracted from every favorite.
//!
//! Useful when an upstream source changes its schema and tracks stop showing
//! up in search: records with no fragments are the ones no query can find.
//!
//! Usage: inspect-fragments <favorites.json|favorites.sqlite3> [--cjk-only]

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use favorites_search::models::TrackSummary;
use favorites_search::normalize::{extract_fragments, CJK_TEXT};
use favorites_search::progress::{create_progress_bar, log_phase, log_progress, set_log_only};
use favorites_search::schema::FIELD_SCHEMA;
use favorites_search::store::load_records;

#[derive(Parser)]
#[command(name = "inspect-fragments")]
#[command(about = "Print the searchable text extracted from each favorite")]
struct Args {
    source: PathBuf,

    /// Only show records with Japanese/CJK text
    #[arg(long)]
    cjk_only: bool,

    #[arg(long)]
    log_only: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    set_log_only(args.log_only);

    let favorites = load_records(&args.source)?;
    let total = favorites.records.len() as u64;
    log_phase(
        "LOAD",
        &format!(
            "{} favorites ({} skipped), field schema v{}",
            total, favorites.skipped, FIELD_SCHEMA.version
        ),
    );

    let pb = create_progress_bar(total, "Extracting fragments");
    let mut lines = Vec::new();
    let mut without_fragments = 0usize;
    let mut cjk_records = 0usize;

    for (i, record) in favorites.records.iter().enumerate() {
        let fragments = extract_fragments(record);
        let has_cjk = fragments.iter().any(|f| CJK_TEXT.is_match(f));
        if fragments.is_empty() {
            without_fragments += 1;
        }
        if has_cjk {
            cjk_records += 1;
        }

        if !args.cjk_only || has_cjk {
            let id = TrackSummary::from_record(record).id.unwrap_or_else(|| format!("#{}", i));
            lines.push(format!("{}\t{}", id, fragments.join(" | ")));
        }

        pb.inc(1);
        log_progress("EXTRACT", i as u64 + 1, total, 1000);
    }
    pb.finish_and_clear();

    for line in &lines {
        println!("{}", line);
    }

    println!("\n{:=<60}", "");
    println!("  Records: {}", total);
    println!("  Without fragments: {}", without_fragments);
    println!("  With CJK text: {}", cjk_records);
    println!("{:=<60}", "");

    Ok(())
}
