//! Column encoding for the `Going` and `Flaking` lists.
//!
//! Lists are written as JSON arrays of strings. Rows written by the original bot
//! joined names with `",;"`; those still decode, and are rewritten as JSON on the
//! next update.

use super::RepositoryError;

const LEGACY_DELIMITER: &str = ",;";

pub fn encode(names: &[String]) -> Result<String, RepositoryError> {
    serde_json::to_string(names).map_err(|error| RepositoryError::Decode(error.to_string()))
}

/// Reads a stored list. Anything that is not a JSON array of strings is taken as
/// the legacy form, so display names that happen to start with `[` still load.
pub fn decode(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Vec<String>>(trimmed) {
        Ok(names) => names,
        Err(_) => raw.split(LEGACY_DELIMITER).map(str::to_owned).collect(),
    }
}
