//! Content hashing for cache keys and de-duplication.

// crates.io
use md5::{Digest, Md5};

/// Returns the MD5 digest of `input`'s UTF-8 bytes as 32 lowercase hex characters.
///
/// Suitable for keying and de-duplicating content, not for anything security sensitive.
pub fn content_hash(input: &str) -> String {
	let digest = Md5::digest(input.as_bytes());

	format!("{digest:x}")
}
