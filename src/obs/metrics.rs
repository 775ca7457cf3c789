//! Counters for exchanges and generations. Every function is a no-op unless the `metrics`
//! feature is enabled and a global recorder is installed.

// self
use crate::{
	exchange::ExchangeStage,
	obs::{OpKind, OpOutcome},
};

/// Counts one outcome of an exchange or generation in `notebook_helpers_op_total`.
pub fn record_op_outcome(kind: OpKind, outcome: OpOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"notebook_helpers_op_total",
			"op" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Counts an identity provider rejection, labeled by the exchange step and status class.
pub fn record_step_rejection(stage: ExchangeStage, status: u16) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"notebook_helpers_exchange_rejections_total",
			"stage" => stage.as_str(),
			"status_class" => status_class(status)
		)
		.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (stage, status);
	}
}

/// Adds the number of text fragments one generation produced.
pub fn record_generated_fragments(count: u64) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("notebook_helpers_generated_fragments_total").increment(count);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = count;
	}
}

/// Buckets a status code into `4xx`, `5xx`, or `other` to keep label cardinality fixed.
pub fn status_class(status: u16) -> &'static str {
	match status {
		400..=499 => "4xx",
		500..=599 => "5xx",
		_ => "other",
	}
}
