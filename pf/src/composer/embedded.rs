//! Embedded skeletons
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Name of the generic fallback skeleton
pub const GENERIC_NAME: &str = "generic";

pub const JSON_AGENT: &str = include_str!("../../prompts/json-agent.pmt");

pub const SUMMARIZATION: &str = include_str!("../../prompts/summarization.pmt");

pub const KEYWORD_AGENT: &str = include_str!("../../prompts/keyword-agent.pmt");

/// Used for any template without a dedicated skeleton
pub const GENERIC: &str = include_str!("../../prompts/generic.pmt");

/// Get the embedded skeleton by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "json-agent" => Some(JSON_AGENT),
        "summarization" => Some(SUMMARIZATION),
        "keyword-agent" => Some(KEYWORD_AGENT),
        GENERIC_NAME => Some(GENERIC),
        _ => {
            debug!(%name, "get_embedded: no match found");
            None
        }
    }
}

/// Every embedded skeleton as (name, source)
pub fn all() -> [(&'static str, &'static str); 4] {
    [
        ("json-agent", JSON_AGENT),
        ("summarization", SUMMARIZATION),
        ("keyword-agent", KEYWORD_AGENT),
        (GENERIC_NAME, GENERIC),
    ]
}
