//! Loading and saving favorites collections.
//!
//! A collection comes either from a JSON export (a top-level array of tracks,
//! or `{"favorites": [...]}`) or from a SQLite database with a `favorites`
//! table holding one JSON document per track.
//!
//! ```sql
//! CREATE TABLE favorites (
//!     id          TEXT NOT NULL,
//!     source      TEXT NOT NULL DEFAULT '',
//!     track_json  TEXT NOT NULL,
//!     added_at    INTEGER NOT NULL,
//!     PRIMARY KEY (id, source)
//! );
//! ```

use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, OpenFlags};
use serde_json::Value;
use std::path::Path;

use crate::models::Record;

/// Tracks loaded from a store, plus rows that could not be parsed.
#[derive(Debug, Default)]
pub struct Favorites {
    pub records: Vec<Record>,
    pub skipped: usize,
}

/// Load a favorites collection, choosing the format by file extension.
pub fn load_records(path: &Path) -> Result<Favorites> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "json" => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let records = parse_records(&text)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            Ok(Favorites {
                records,
                skipped: 0,
            })
        }
        "sqlite3" | "sqlite" | "db" => {
            let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
                .with_context(|| format!("Failed to open favorites database {}", path.display()))?;
            load_from_connection(&conn)
        }
        _ => bail!(
            "Unsupported favorites source '{}': expected .json, .sqlite3, .sqlite or .db",
            path.display()
        ),
    }
}

/// Parse a JSON export into records.
pub fn parse_records(text: &str) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_str(text)?;
    match value {
        Value::Array(records) => Ok(records),
        Value::Object(mut map) => match map.remove("favorites") {
            Some(Value::Array(records)) => Ok(records),
            _ => bail!("expected an array of tracks or an object with a 'favorites' array"),
        },
        _ => bail!("expected an array of tracks or an object with a 'favorites' array"),
    }
}

/// Read every favorite, newest first.
///
/// Rows whose `track_json` is not valid JSON are skipped and counted.
pub fn load_from_connection(conn: &Connection) -> Result<Favorites> {
    let mut stmt = conn
        .prepare("SELECT id, track_json FROM favorites ORDER BY added_at DESC, rowid DESC")
        .context("Failed to query favorites table")?;

    let mut favorites = Favorites::default();
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let id: String = row.get(0)?;
        let json: String = row.get(1)?;
        match serde_json::from_str::<Value>(&json) {
            Ok(record) => favorites.records.push(record),
            Err(e) => {
                eprintln!("[LOAD] Skipping favorite {}: invalid track JSON ({})", id, e);
                favorites.skipped += 1;
            }
        }
    }
    Ok(favorites)
}

pub fn create_favorites_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS favorites (
             id          TEXT NOT NULL,
             source      TEXT NOT NULL DEFAULT '',
             track_json  TEXT NOT NULL,
             added_at    INTEGER NOT NULL,
             PRIMARY KEY (id, source)
         );",
    )?;
    Ok(())
}

/// Insert or replace one favorite, keyed by the track's `id` and `source`.
pub fn insert_favorite(conn: &Connection, track: &Record, added_at: i64) -> Result<()> {
    let id = match track.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => bail!("track has no usable 'id' field"),
    };
    let source = track.get("source").and_then(Value::as_str).unwrap_or("");
    let json = serde_json::to_string(track)?;
    conn.execute(
        "INSERT OR REPLACE INTO favorites (id, source, track_json, added_at) VALUES (?1, ?2, ?3, ?4)",
        params![id, source, json, added_at],
    )?;
    Ok(())
}

/// Write records as a pretty-printed JSON array.
pub fn save_records(path: &Path, records: &[&Record]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
