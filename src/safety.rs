//! Guards against overwriting the favorites source when exporting results.

use anyhow::{bail, Result};
use std::path::Path;

/// Validates that an export path is safe to write.
///
/// Checks:
/// - Output must be a `.json` file
/// - Output cannot be the favorites source itself
/// - Output cannot look like a favorites database
pub fn validate_output_path(output: &Path, source: &Path) -> Result<()> {
    let is_json = output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if !is_json {
        bail!(
            "Safety check failed: output '{}' must be a .json file",
            output.display()
        );
    }

    let same_file = match (output.canonicalize(), source.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => output == source,
    };
    if same_file {
        bail!(
            "Safety check failed: output '{}' cannot be the same as source '{}'",
            output.display(),
            source.display()
        );
    }

    let output_name = output.file_name().and_then(|n| n.to_str()).unwrap_or("");
    for pattern in [".sqlite3", ".sqlite", ".db"] {
        if output_name.contains(pattern) {
            bail!(
                "Safety check failed: output '{}' matches database pattern '{}'",
                output.display(),
                pattern
            );
        }
    }

    Ok(())
}
