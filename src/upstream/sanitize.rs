//! Payload sanitization for the upstream completion API.
//!
//! # Responsibilities
//! - Strip fields the chat.completions endpoint rejects
//! - Normalize the token-limit field name
//! - Force streaming mode

use serde_json::{Map, Value};

/// Fields removed before forwarding. The first two are relay-side metadata;
/// the rest are sampling knobs the upstream deployment does not accept.
const STRIPPED_FIELDS: &[&str] = &[
    "elevenlabs_extra_body",
    "user_id",
    "reasoning_effort",
    "temperature",
    "top_p",
];

/// Rewrite an inbound payload into the shape the upstream expects.
///
/// Pure transform: no I/O, absent keys are no-ops, and every field not
/// named here passes through untouched.
pub fn sanitize(mut payload: Map<String, Value>) -> Map<String, Value> {
    for field in STRIPPED_FIELDS {
        payload.remove(*field);
    }

    // chat.completions takes max_tokens; some callers send the
    // responses-style name instead. Move the value over unless the caller
    // already set max_tokens, in which case the duplicate is dropped.
    if let Some(limit) = payload.remove("max_output_tokens") {
        if !payload.contains_key("max_tokens") {
            payload.insert("max_tokens".to_string(), limit);
        }
    }

    payload.insert("stream".to_string(), Value::Bool(true));
    payload
}
