//! Content normalization and hashing.
//!
//! The content hash is computed over normalized text so that insignificant
//! formatting (indentation width, trailing spaces, a final newline) never
//! registers as a change.

use sha2::{Digest, Sha256};

/// Normalize page content for hashing.
///
/// Every run of whitespace collapses to a single space and trailing
/// whitespace, including the final newline, is stripped.
pub fn normalize_content(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut in_whitespace = false;
    for ch in content.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push(' ');
                in_whitespace = true;
            }
        } else {
            out.push(ch);
            in_whitespace = false;
        }
    }
    let trimmed_len = out.trim_end().len();
    out.truncate(trimmed_len);
    out
}

/// Compute the content hash of a page: hex SHA256 of the normalized content.
///
/// ```
/// use docdelta_core::snapshot::digest::compute_content_hash;
///
/// assert_eq!(
///     compute_content_hash("# Title\n\nBody  text\n"),
///     compute_content_hash("# Title Body text"),
/// );
/// ```
pub fn compute_content_hash(content: &str) -> String {
    hash_string(&normalize_content(content))
}

fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
