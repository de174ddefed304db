//! Stable article identifiers.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

const URL_HASH_MODULUS: u64 = 100_000;
const DIGEST_HEX_CHARS: usize = 16;

/// A five-digit hash of `url`, stable across runs and platforms.
#[must_use]
pub fn url_hash(url: &str) -> u64 {
    let digest = Sha256::digest(url.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(head) % URL_HASH_MODULUS
}

/// `<prefix>-<unix seconds>-<url hash>`, used for feed and government articles.
#[must_use]
pub fn timestamped_id(prefix: &str, at: DateTime<Utc>, url: &str) -> String {
    format!("{prefix}-{}-{:05}", at.timestamp(), url_hash(url))
}

/// First 16 hex characters of `sha256("<source>-<url>-<published>")`.
#[must_use]
pub fn digest_id(source: &str, url: &str, published: &str) -> String {
    let digest = Sha256::digest(format!("{source}-{url}-{published}").as_bytes());
    let mut hex = String::with_capacity(DIGEST_HEX_CHARS);
    for byte in &digest[..DIGEST_HEX_CHARS / 2] {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}
