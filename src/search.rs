//! Collection filtering: the public entry point of favorites search.
//!
//! Filtering is stable (matches keep their input order), idempotent and
//! never mutates records. An empty or whitespace-only query returns every
//! record without running the matcher.

use rayon::prelude::*;
use std::time::Instant;

use crate::matcher::Query;
use crate::models::{Record, SearchStats};
use crate::normalize::extract_fragments;

/// Whether a single record satisfies a parsed query.
pub fn record_satisfies(record: &Record, query: &Query) -> bool {
    query.matches_fragments(&extract_fragments(record))
}

/// Filter `records` by `query`, preserving order.
pub fn filter_records<'a>(records: &'a [Record], query: &str) -> Vec<&'a Record> {
    match Query::parse(query) {
        None => records.iter().collect(),
        Some(q) => records.iter().filter(|r| record_satisfies(r, &q)).collect(),
    }
}

/// Parallel `filter_records`. Output is identical, order included.
pub fn filter_records_par<'a>(records: &'a [Record], query: &str) -> Vec<&'a Record> {
    match Query::parse(query) {
        None => records.iter().collect(),
        Some(q) => records
            .par_iter()
            .filter(|r| record_satisfies(r, &q))
            .collect(),
    }
}

/// Sequential filter that also reports statistics.
pub fn filter_records_with_stats<'a>(
    records: &'a [Record],
    query: &str,
) -> (Vec<&'a Record>, SearchStats) {
    let start = Instant::now();
    let mut stats = SearchStats {
        total_records: records.len(),
        ..Default::default()
    };

    let matched: Vec<&Record> = match Query::parse(query) {
        None => {
            stats.empty_query = true;
            records.iter().collect()
        }
        Some(q) => {
            stats.token_count = q.tokens().len();
            records
                .iter()
                .filter(|r| {
                    let fragments = extract_fragments(r);
                    if fragments.is_empty() {
                        stats.records_without_fragments += 1;
                    }
                    q.matches_fragments(&fragments)
                })
                .collect()
        }
    };

    stats.matched_records = matched.len();
    stats.elapsed_seconds = start.elapsed().as_secs_f64();
    (matched, stats)
}
