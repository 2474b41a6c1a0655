// Record representations on either side of normalization.

use serde_json::Value;

/// A raw device/peer record straight from a fetcher, in the source's native
/// naming convention. Re-exported from the api crate so both layers agree on
/// the shape.
pub use tailgraph_api::RawRecord;

/// A record whose keys have been rewritten into canonical snake_case,
/// recursively for nested maps. For the alphanumeric camel/PascalCase keys
/// the sources emit, every rewritten key matches
/// `^[a-z0-9]+(_[a-z0-9]+)*$`; free-form nested payload keys (latency
/// region names like `San Francisco`) are lowercased but keep their spaces
/// and punctuation.
pub type NormalizedRecord = serde_json::Map<String, Value>;

/// Whether a key satisfies the canonical snake_case shape.
pub fn is_canonical_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('_')
        && !key.ends_with('_')
        && !key.contains("__")
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
