//! Optional observability helpers for network-facing operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit `notebook_helpers.op` spans (field `op`, plus `model` for
//!   generations) and nested `notebook_helpers.step` spans carrying the exchange `stage`.
//! - Enable `metrics` to increment `notebook_helpers_op_total{op,outcome}`,
//!   `notebook_helpers_exchange_rejections_total{stage,status_class}`, and
//!   `notebook_helpers_generated_fragments_total`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
	/// Two-step service-account token exchange.
	TokenExchange,
	/// Streaming text generation call.
	TextGeneration,
}
impl OpKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpKind::TokenExchange => "token_exchange",
			OpKind::TextGeneration => "text_generation",
		}
	}
}
impl Display for OpKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Remote side declined the request with a non-success status.
	Rejected,
	/// Error propagated back to the caller.
	Failure,
}
impl OpOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpOutcome::Attempt => "attempt",
			OpOutcome::Success => "success",
			OpOutcome::Rejected => "rejected",
			OpOutcome::Failure => "failure",
		}
	}
}
impl Display for OpOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
