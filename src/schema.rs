//! Field-name aliases used by the upstream track sources.
//!
//! Every source names its artist/album fields differently. All names the
//! normalizer looks at live here, so upstream schema drift is a one-place
//! change: add the alias and bump `version`.

/// Maximum nesting depth walked when traversing opaque artist/album objects.
pub const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Field names read from a track record, in enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    /// Bumped whenever an alias is added, removed or reordered.
    pub version: u32,
    /// Display name of the track.
    pub name: &'static str,
    /// Album title (flat text).
    pub album: &'static str,
    /// Primary artist field: text, artist object, or sequence of either.
    pub artist: &'static str,
    /// Alternate artists sequence.
    pub artists: &'static str,
    /// Per-item artist sequence (NetEase style `ar`).
    pub item_artists: &'static str,
    /// Nested album object (NetEase style `al`), may hold artist info.
    pub nested_album: &'static str,
    /// Attribute carrying an artist-like object's name.
    pub entity_name: &'static str,
    /// Legacy flat text fields checked last.
    pub legacy_artist_fields: &'static [&'static str],
}

/// The schema every search uses.
pub const FIELD_SCHEMA: FieldSchema = FieldSchema {
    version: 1,
    name: "name",
    album: "album",
    artist: "artist",
    artists: "artists",
    item_artists: "ar",
    nested_album: "al",
    entity_name: "name",
    legacy_artist_fields: &["artistsname", "singer", "author", "composer"],
};

impl Default for FieldSchema {
    fn default() -> Self {
        FIELD_SCHEMA
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_fields_unique() {
        let fields = FIELD_SCHEMA.legacy_artist_fields;
        for (i, a) in fields.iter().enumerate() {
            assert!(!fields[i + 1..].contains(a), "duplicate alias {}", a);
        }
    }

    #[test]
    fn test_default_is_current_schema() {
        assert_eq!(FieldSchema::default(), FIELD_SCHEMA);
        assert_eq!(FieldSchema::default().version, 1);
    }
}
