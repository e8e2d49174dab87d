//! Favorites search library - shared modules for all binaries.
//!
//! The search core (`normalize`, `matcher`, `search`) is pure and holds no
//! state; `store`, `progress` and `safety` support the command-line tools.

pub mod matcher;
pub mod models;
pub mod normalize;
pub mod progress;
pub mod safety;
pub mod schema;
pub mod search;
pub mod store;

pub use matcher::{fragment_matches, record_matches, Query};
pub use models::Record;
pub use normalize::extract_fragments;
pub use schema::{FieldSchema, FIELD_SCHEMA};
pub use search::{filter_records, filter_records_par};
