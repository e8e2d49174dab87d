//! Fragment extraction: turns a track record of any shape into the ordered
//! list of text fragments a query is matched against.
//!
//! Fields are read in a fixed order (see `FIELD_SCHEMA`):
//! name, album, artist, artists, ar, al, then the legacy artist fields.
//! Malformed input never fails; it just contributes nothing.

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashSet;
use serde_json::Value;

use crate::models::{ArtistShape, Record};
use crate::schema::{FIELD_SCHEMA, MAX_TRAVERSAL_DEPTH};

// ============================================================================
// Fragment Collection
// ============================================================================

/// Ordered, de-duplicated fragments borrowed from one record.
#[derive(Default)]
struct Fragments<'a> {
    items: Vec<&'a str>,
    seen: FxHashSet<&'a str>,
}

impl<'a> Fragments<'a> {
    fn push(&mut self, s: &'a str) {
        if !s.is_empty() && self.seen.insert(s) {
            self.items.push(s);
        }
    }
}

// ============================================================================
// Bounded Traversal
// ============================================================================

/// Worklist walk over nested objects/arrays collecting every text value.
///
/// Each entry carries its depth; children of a value at `max_depth` are not
/// expanded. A value instance is visited at most once per walker, keyed by
/// its address.
pub struct Traversal {
    max_depth: usize,
    visited: FxHashSet<usize>,
}

impl Traversal {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            visited: FxHashSet::default(),
        }
    }

    /// Collect text values reachable from `root` in document order.
    pub fn collect<'a>(&mut self, root: &'a Value, out: &mut Vec<&'a str>) {
        let mut stack: Vec<(&'a Value, usize)> = vec![(root, 0)];

        while let Some((value, depth)) = stack.pop() {
            if !self.visited.insert(value as *const Value as usize) {
                continue;
            }
            match value {
                Value::String(s) => out.push(s),
                Value::Array(items) if depth < self.max_depth => {
                    // Reversed so the stack pops children in order
                    stack.extend(items.iter().rev().map(|v| (v, depth + 1)));
                }
                Value::Object(fields) if depth < self.max_depth => {
                    stack.extend(fields.values().rev().map(|v| (v, depth + 1)));
                }
                _ => {}
            }
        }
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

impl Default for Traversal {
    fn default() -> Self {
        Self::new(MAX_TRAVERSAL_DEPTH)
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// Extract the searchable text fragments of a record.
///
/// Returns an empty list for records without any searchable field,
/// including non-object records.
pub fn extract_fragments(record: &Record) -> Vec<&str> {
    let mut fragments = Fragments::default();
    let mut walker = Traversal::default();
    let mut buf = Vec::new();

    // 1-2: display name and album title
    if let Some(name) = text_field(record, FIELD_SCHEMA.name) {
        fragments.push(name);
    }
    if let Some(album) = text_field(record, FIELD_SCHEMA.album) {
        fragments.push(album);
    }

    // 3: primary artist, any shape
    let artist = record.get(FIELD_SCHEMA.artist);
    match ArtistShape::classify(artist) {
        ArtistShape::Sequence(items) => {
            extract_artist_items(items, &mut fragments, &mut walker, &mut buf)
        }
        shape => extract_artist(shape, artist, &mut fragments, &mut walker, &mut buf),
    }

    // 4-5: alias sequences, only when they really are sequences
    for field in [FIELD_SCHEMA.artists, FIELD_SCHEMA.item_artists] {
        if let ArtistShape::Sequence(items) = ArtistShape::classify(record.get(field)) {
            extract_artist_items(items, &mut fragments, &mut walker, &mut buf);
        }
    }

    // 6: nested album object, walked in full
    if let Some(album) = record.get(FIELD_SCHEMA.nested_album).filter(|v| v.is_object()) {
        walk_into(album, &mut fragments, &mut walker, &mut buf);
    }

    // 7: legacy flat fields
    for field in FIELD_SCHEMA.legacy_artist_fields {
        if let Some(s) = text_field(record, field) {
            fragments.push(s);
        }
    }

    fragments.items
}

fn text_field<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    record.get(field).and_then(Value::as_str)
}

fn extract_artist_items<'a>(
    items: &'a [Value],
    fragments: &mut Fragments<'a>,
    walker: &mut Traversal,
    buf: &mut Vec<&'a str>,
) {
    for item in items {
        extract_artist(ArtistShape::classify(Some(item)), Some(item), fragments, walker, buf);
    }
}

/// Handle one artist value. Nested sequences inside a sequence element are
/// walked generically rather than re-interpreted as artist lists.
fn extract_artist<'a>(
    shape: ArtistShape<'a>,
    value: Option<&'a Value>,
    fragments: &mut Fragments<'a>,
    walker: &mut Traversal,
    buf: &mut Vec<&'a str>,
) {
    match shape {
        ArtistShape::Absent => {}
        ArtistShape::Text(s) => fragments.push(s),
        ArtistShape::NamedEntity { name, .. } => {
            fragments.push(name);
            if let Some(v) = value {
                walk_into(v, fragments, walker, buf);
            }
        }
        ArtistShape::Sequence(_) | ArtistShape::Opaque(_) => {
            if let Some(v) = value {
                walk_into(v, fragments, walker, buf);
            }
        }
    }
}

fn walk_into<'a>(
    value: &'a Value,
    fragments: &mut Fragments<'a>,
    walker: &mut Traversal,
    buf: &mut Vec<&'a str>,
) {
    buf.clear();
    walker.collect(value, buf);
    for s in buf.drain(..) {
        fragments.push(s);
    }
}

// ============================================================================
// CJK Detection
// ============================================================================

/// Hiragana, katakana, CJK extension A and unified ideographs.
pub static CJK_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x{3040}-\x{30FF}\x{3400}-\x{4DBF}\x{4E00}-\x{9FFF}]").unwrap());

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_order() {
        let record = json!({
            "singer": "Legacy",
            "al": {"name": "Nested Album"},
            "ar": [{"name": "Item Artist"}],
            "artists": ["Alias Artist"],
            "artist": "Main Artist",
            "album": "Album Title",
            "name": "Track"
        });
        assert_eq!(
            extract_fragments(&record),
            vec![
                "Track",
                "Album Title",
                "Main Artist",
                "Alias Artist",
                "Item Artist",
                "Nested Album",
                "Legacy"
            ]
        );
    }

    #[test]
    fn test_artist_object_traversed() {
        let record = json!({"artist": {"name": "Hatsune Miku", "alias": {"jp": "初音ミク"}}});
        let fragments = extract_fragments(&record);
        assert_eq!(fragments[0], "Hatsune Miku");
        assert!(fragments.contains(&"初音ミク"));
        // name is not repeated by the traversal
        assert_eq!(fragments.iter().filter(|f| **f == "Hatsune Miku").count(), 1);
    }

    #[test]
    fn test_artist_sequence_mixed() {
        let record = json!({"artist": ["DECO*27", {"name": "Hatsune Miku"}, 7, null, {"id": 2, "nick": "Rin"}]});
        assert_eq!(extract_fragments(&record), vec!["DECO*27", "Hatsune Miku", "Rin"]);
    }

    #[test]
    fn test_alias_fields_must_be_sequences() {
        let record = json!({"artists": "Not A List", "ar": {"name": "Not A List Either"}});
        assert!(extract_fragments(&record).is_empty());
    }

    #[test]
    fn test_nested_album_walk() {
        let record = json!({"al": {"artist": {"name": "Hatsune Miku"}, "id": 9, "tags": ["vocaloid"]}});
        let fragments = extract_fragments(&record);
        assert!(fragments.contains(&"Hatsune Miku"));
        assert!(fragments.contains(&"vocaloid"));
    }

    #[test]
    fn test_nested_album_must_be_object() {
        assert!(extract_fragments(&json!({"al": "Flat"})).is_empty());
        assert!(extract_fragments(&json!({"al": ["Flat"]})).is_empty());
    }

    #[test]
    fn test_wrong_types_ignored() {
        let record = json!({"name": 5, "album": {"title": "x"}, "artist": true, "singer": ["y"], "author": null});
        assert!(extract_fragments(&record).is_empty());
        assert!(extract_fragments(&json!(null)).is_empty());
        assert!(extract_fragments(&json!("Lemon")).is_empty());
        assert!(extract_fragments(&json!([{"name": "Lemon"}])).is_empty());
    }

    #[test]
    fn test_depth_bound() {
        // "deep" sits `levels` below the al object
        fn nest(levels: usize) -> Value {
            let mut v = json!("deep");
            for _ in 0..levels {
                v = json!({ "next": v });
            }
            json!({ "al": v })
        }
        assert_eq!(extract_fragments(&nest(MAX_TRAVERSAL_DEPTH)), vec!["deep"]);
        assert!(extract_fragments(&nest(MAX_TRAVERSAL_DEPTH + 1)).is_empty());
    }

    #[test]
    fn test_traversal_visits_instance_once() {
        let shared = json!({"name": "Once", "inner": ["Twice?"]});
        let mut walker = Traversal::new(MAX_TRAVERSAL_DEPTH);
        let mut out = Vec::new();
        walker.collect(&shared, &mut out);
        walker.collect(&shared, &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(walker.visited_count(), 4);
    }

    #[test]
    fn test_traversal_document_order() {
        let value = json!({"a": ["1", "2"], "b": {"c": "3"}, "d": "4"});
        let mut out = Vec::new();
        Traversal::default().collect(&value, &mut out);
        assert_eq!(out, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_duplicate_fragments_collapsed() {
        let record = json!({"name": "Lemon", "album": "Lemon", "al": {"name": "Lemon"}});
        assert_eq!(extract_fragments(&record), vec!["Lemon"]);
    }

    #[test]
    fn test_cjk_text_detection() {
        assert!(CJK_TEXT.is_match("ずっと真夜中でいいのに。"));
        assert!(CJK_TEXT.is_match("ヨルシカ"));
        assert!(CJK_TEXT.is_match("周杰伦"));
        assert!(!CJK_TEXT.is_match("Queen"));
        assert!(!CJK_TEXT.is_match("Björk"));
    }
}
