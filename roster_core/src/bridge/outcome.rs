//! Submission outcome decoding
//!
//! The server answers a submission one of three ways, and the bridge maps
//! every response — including ones that fit no schema — onto a tagged
//! outcome rather than inspecting loose JSON shapes.

use std::collections::BTreeMap;

use http::StatusCode;
use serde::Deserialize;

use crate::models::SubmitResponse;

/// Message rendered for anything that is neither a success nor a
/// decodable validation failure.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred.";

/// Result of one submission exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 2xx with `{"success": true, "message": ...}`.
    Success { message: String },
    /// 400 with `{"error": {"<field>": ["<message>", ...]}}`. A `BTreeMap`
    /// keeps the flattened rendering deterministic.
    Invalid {
        field_errors: BTreeMap<String, Vec<String>>,
    },
    /// Everything else: other statuses, undecodable bodies, transport
    /// failures, or a 2xx that does not report success.
    Failed,
}

#[derive(Debug, Deserialize)]
struct ValidationBody {
    error: BTreeMap<String, Vec<String>>,
}

/// Decodes a response against the wire contract.
pub fn decode_response(status: StatusCode, body: &[u8]) -> SubmitOutcome {
    if status.is_success() {
        return match serde_json::from_slice::<SubmitResponse>(body) {
            Ok(response) if response.success => SubmitOutcome::Success {
                message: response.message,
            },
            Ok(_) | Err(_) => SubmitOutcome::Failed,
        };
    }

    if status == StatusCode::BAD_REQUEST {
        return match serde_json::from_slice::<ValidationBody>(body) {
            Ok(body) => SubmitOutcome::Invalid {
                field_errors: body.error,
            },
            Err(_) => SubmitOutcome::Failed,
        };
    }

    SubmitOutcome::Failed
}

/// Flattens every per-field message list into one newline-joined block
/// for the inline error region.
pub fn flatten_messages(field_errors: &BTreeMap<String, Vec<String>>) -> String {
    field_errors
        .values()
        .flat_map(|messages| messages.iter())
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}
