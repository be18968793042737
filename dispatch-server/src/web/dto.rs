//! Wire types for the HTTP API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Body of `POST /optimize`.
///
/// Train records are decoded per train rather than as one typed map so
/// that a malformed record can be attributed to its train id.
#[derive(Debug, Clone, Deserialize)]
pub struct OptimizeRequest {
    /// Raw train records keyed by train id.
    #[serde(default)]
    pub trains: BTreeMap<String, serde_json::Value>,

    /// Segments currently out of service, as `[from, to]` pairs.
    #[serde(default)]
    pub non_functional_segments: Vec<[String; 2]>,
}

/// JSON error body returned for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable description of what went wrong.
    pub error: String,
}
