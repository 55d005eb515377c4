//! Shared response body types for API handlers.

use serde::Serialize;

/// `{ "status": "..." }` acknowledgement returned by the relation actions.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}
