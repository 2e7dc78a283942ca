//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::QueryError;

/// Map a command failure to the line printed on stderr.
///
/// Query errors print their own message; everything else prints the full
/// context chain.
pub fn map_error(e: &anyhow::Error) -> String {
    match e.downcast_ref::<QueryError>() {
        Some(query_error) => query_error.to_string(),
        None => format!("{:#}", e),
    }
}
