//! Spans and events for exchanges and generations, compiled away without the `tracing`
//! feature.

// self
use crate::{_prelude::*, exchange::ExchangeStage};
#[cfg(feature = "tracing")] use crate::obs::OpKind;

/// Future returned by [`OpSpan::instrument`].
#[cfg(feature = "tracing")]
pub type InstrumentedOp<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`OpSpan::instrument`].
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOp<F> = F;

/// Span attached to one exchange, one exchange step, or one generation.
///
/// Top-level operations use `notebook_helpers.op` with an `op` field; exchange steps nest a
/// `notebook_helpers.step` span carrying the `stage`.
#[derive(Clone, Debug)]
pub struct OpSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OpSpan {
	/// Span around a full two-step exchange.
	pub fn exchange() -> Self {
		#[cfg(feature = "tracing")]
		{
			Self {
				span: tracing::info_span!(
					"notebook_helpers.op",
					op = OpKind::TokenExchange.as_str()
				),
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			Self {}
		}
	}

	/// Span around the request for `stage`.
	pub fn exchange_step(stage: ExchangeStage) -> Self {
		#[cfg(feature = "tracing")]
		{
			Self {
				span: tracing::debug_span!(
					"notebook_helpers.step",
					op = OpKind::TokenExchange.as_str(),
					stage = stage.as_str()
				),
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = stage;

			Self {}
		}
	}

	/// Span around one streaming generation against `model`.
	pub fn generation(model: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			Self {
				span: tracing::info_span!(
					"notebook_helpers.op",
					op = OpKind::TextGeneration.as_str(),
					model
				),
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = model;

			Self {}
		}
	}

	/// Runs `fut` inside the span without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOp<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a debug event for a step the identity provider declined.
pub fn step_rejected_event(stage: ExchangeStage, status: u16) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(stage = stage.as_str(), status, "identity provider rejected exchange step");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (stage, status);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn step_span_passes_output_through() {
		let exchange = OpSpan::exchange();
		let step = OpSpan::exchange_step(ExchangeStage::IdToken);
		let value = exchange.instrument(step.instrument(async { "id-token" })).await;

		assert_eq!(value, "id-token");
	}

	#[tokio::test]
	async fn generation_span_passes_output_through() {
		let span = OpSpan::generation("gemini-1.5-pro-002");
		let text = span.instrument(async { String::from("fragment") }).await;

		assert_eq!(text, "fragment");
	}

	#[test]
	fn rejection_event_is_safe_without_subscriber() {
		step_rejected_event(ExchangeStage::BearerToken, 403);
	}
}
