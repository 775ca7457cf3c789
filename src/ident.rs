//! Random identifiers for runs, documents, and scratch files.

// crates.io
use uuid::Uuid;

/// Returns a random (v4) UUID as 32 lowercase hex characters without separators.
pub fn generate_identifier() -> String {
	Uuid::new_v4().simple().to_string()
}
