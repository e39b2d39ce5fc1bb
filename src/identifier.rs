//! Artifact identifier generation and validation
//!
//! Identifiers name published artifacts and gate download access, so they must
//! never collide across concurrent publishes and must stay inside the strict
//! `[a-zA-Z0-9_]+` alphabet that the download gateway enforces.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;

/// Fixed prefix carried by every generated identifier
pub const ID_PREFIX: &str = "conv_";

/// Length of the random suffix appended after the time component
///
/// 62^6 possibilities per millisecond keeps same-millisecond collisions out of
/// reach at expected request rates; uniqueness is by construction, not locking.
const SUFFIX_LEN: usize = 6;

/// Generate an identifier from an explicit clock reading and random source
///
/// Kept pure over its inputs so charset compliance and collision behavior are
/// testable without touching the filesystem or wall clock.
pub fn generate(now: DateTime<Utc>, rng: &mut impl Rng) -> String {
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| rng.sample(Alphanumeric) as char)
        .collect();
    format!("{ID_PREFIX}{}_{suffix}", now.timestamp_millis())
}

/// Generate a fresh identifier from the wall clock and thread RNG
pub fn new_file_id() -> String {
    generate(Utc::now(), &mut rand::thread_rng())
}

/// Validate a caller-supplied identifier against `[a-zA-Z0-9_]+`
///
/// Rejects empty strings and every character outside the alphabet, including
/// path separators and dots. This is the sole defense against path traversal
/// and runs before any filesystem access.
pub fn is_valid(raw: &str) -> bool {
    !raw.is_empty()
        && raw
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
}
