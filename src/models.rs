//! Core data models for favorites search.
//!
//! Track records stay as raw `serde_json::Value`s: upstream sources disagree
//! on field names and shapes, so nothing here assumes a fixed struct. The
//! types below classify those values, summarize them for display, and carry
//! search statistics.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::schema::FIELD_SCHEMA;

/// A track record as received from an upstream source.
pub type Record = Value;

// ============================================================================
// Artist Shapes
// ============================================================================

/// Shape of an artist-bearing field value.
///
/// `Absent` covers missing fields, `null`, numbers and booleans: none of
/// those are searchable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArtistShape<'a> {
    Absent,
    /// Plain artist text: `"Hatsune Miku"`
    Text(&'a str),
    /// Object with a text `name`: `{"name": "Hatsune Miku", "id": 7}`
    NamedEntity {
        name: &'a str,
        fields: &'a Map<String, Value>,
    },
    /// Ordered sequence of texts and/or artist objects.
    Sequence(&'a [Value]),
    /// Object without a usable `name`. Only reachable through traversal.
    Opaque(&'a Map<String, Value>),
}

impl<'a> ArtistShape<'a> {
    pub fn classify(value: Option<&'a Value>) -> Self {
        match value {
            Some(Value::String(s)) => ArtistShape::Text(s),
            Some(Value::Array(items)) => ArtistShape::Sequence(items),
            Some(Value::Object(fields)) => match fields.get(FIELD_SCHEMA.entity_name) {
                Some(Value::String(name)) => ArtistShape::NamedEntity { name, fields },
                _ => ArtistShape::Opaque(fields),
            },
            _ => ArtistShape::Absent,
        }
    }

    /// Name to show for this shape, if it has exactly one.
    pub fn display_name(&self) -> Option<&'a str> {
        match *self {
            ArtistShape::Text(s) => Some(s),
            ArtistShape::NamedEntity { name, .. } => Some(name),
            _ => None,
        }
    }
}

// ============================================================================
// Display Models
// ============================================================================

/// Flattened view of a record for printing.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrackSummary {
    pub id: Option<String>,
    pub name: Option<String>,
    pub artist: Option<String>, // All artist names joined with ", "
    pub album: Option<String>,
    pub source: Option<String>,
}

impl TrackSummary {
    pub fn from_record(record: &Record) -> Self {
        let text = |field: &str| record.get(field).and_then(Value::as_str).map(str::to_string);

        let id = match record.get("id") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        let album = text(FIELD_SCHEMA.album).or_else(|| {
            ArtistShape::classify(record.get(FIELD_SCHEMA.nested_album))
                .display_name()
                .map(str::to_string)
        });

        TrackSummary {
            id,
            name: text(FIELD_SCHEMA.name),
            artist: display_artist(record),
            album,
            source: text("source"),
        }
    }
}

/// Best-effort artist display string: first artist field that yields names.
pub fn display_artist(record: &Record) -> Option<String> {
    let fields = [
        FIELD_SCHEMA.artist,
        FIELD_SCHEMA.artists,
        FIELD_SCHEMA.item_artists,
    ];
    for field in fields {
        let names: Vec<&str> = match ArtistShape::classify(record.get(field)) {
            ArtistShape::Sequence(items) => items
                .iter()
                .filter_map(|item| ArtistShape::classify(Some(item)).display_name())
                .collect(),
            shape => shape.display_name().into_iter().collect(),
        };
        if !names.is_empty() {
            return Some(names.join(", "));
        }
    }
    FIELD_SCHEMA
        .legacy_artist_fields
        .iter()
        .find_map(|f| record.get(*f).and_then(Value::as_str))
        .map(str::to_string)
}

// ============================================================================
// Statistics (Instrumentation)
// ============================================================================

/// Per-search statistics, written by the CLI with `--stats`.
#[derive(Default, Debug, Clone, Serialize)]
pub struct SearchStats {
    pub total_records: usize,
    pub matched_records: usize,
    pub token_count: usize,
    pub empty_query: bool,
    pub records_without_fragments: usize,

    // Timing
    pub elapsed_seconds: f64,
}

impl SearchStats {
    /// Calculate match rate as a percentage
    pub fn match_rate(&self) -> f64 {
        if self.total_records == 0 {
            0.0
        } else {
            100.0 * self.matched_records as f64 / self.total_records as f64
        }
    }

    /// Log stats to stderr in JSON format
    pub fn log_phase(&self, phase: &str) {
        if let Ok(json) = serde_json::to_string_pretty(self) {
            eprintln!("[STATS:{}]\n{}", phase, json);
        }
    }

    /// Write stats to a JSON file
    pub fn write_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
