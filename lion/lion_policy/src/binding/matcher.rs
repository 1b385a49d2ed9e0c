//! Hierarchical scope matching.
//!
//! A scope is a delimiter-separated path such as `contract.negotiation`.
//! A binding to a scope covers that scope and every scope below it.

use lion_core::error::BindingError;

/// Check that a scope is non-empty and has no empty segment.
pub fn check_scope(scope: &str, delimiter: &str) -> Result<(), BindingError> {
    if scope.is_empty() || scope.split(delimiter).any(str::is_empty) {
        return Err(BindingError::MalformedScope(scope.to_string()));
    }
    Ok(())
}

/// Whether a binding to `bound` covers the query scope `query`: the bound
/// scope's segments are a prefix of the query's segments.
pub(crate) fn covers(bound: &str, query: &str, delimiter: &str) -> bool {
    let mut query_segments = query.split(delimiter);
    bound
        .split(delimiter)
        .all(|segment| query_segments.next() == Some(segment))
}
