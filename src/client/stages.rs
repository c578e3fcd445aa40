//! Stage identifier resolution.

use std::sync::LazyLock;

use regex::Regex;

use super::models::Stage;
use crate::error_handling::ApiError;

static STAGE_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("stage id pattern is valid")
});

/// Whether `identifier` already looks like a stage id.
pub fn is_stage_id(identifier: &str) -> bool {
    STAGE_ID_PATTERN.is_match(identifier)
}

/// Resolves stage names or ids to stage ids.
///
/// Ids pass through untouched. Names are matched case-insensitively: an exact
/// match wins, otherwise the first stage (in upstream order) whose name
/// contains the identifier, or is contained in it.
///
/// # Errors
///
/// Returns `ApiError::StageNotFound` for the first identifier with no match.
pub fn resolve_stage_identifiers<S: AsRef<str>>(
    stages: &[Stage],
    identifiers: &[S],
) -> Result<Vec<String>, ApiError> {
    let names: Vec<(String, &str)> = stages
        .iter()
        .map(|stage| (stage.text.to_lowercase(), stage.id.as_str()))
        .collect();

    identifiers
        .iter()
        .map(|identifier| {
            let identifier = identifier.as_ref();
            if is_stage_id(identifier) {
                return Ok(identifier.to_string());
            }
            let wanted = identifier.trim().to_lowercase();
            if wanted.is_empty() {
                return Err(ApiError::StageNotFound(identifier.to_string()));
            }
            names
                .iter()
                .find(|(name, _)| *name == wanted)
                .or_else(|| {
                    names
                        .iter()
                        .find(|(name, _)| name.contains(&wanted) || wanted.contains(name.as_str()))
                })
                .map(|(_, id)| id.to_string())
                .ok_or_else(|| ApiError::StageNotFound(identifier.to_string()))
        })
        .collect()
}
