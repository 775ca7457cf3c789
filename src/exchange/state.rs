//! Named states of the two-step exchange.

// self
use crate::{
	_prelude::*,
	auth::{BearerToken, IdentityToken},
};

/// Exchange step that produced a response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExchangeStage {
	/// Password grant returning the identity assertion.
	IdToken,
	/// Jwt-bearer grant returning the bearer token.
	BearerToken,
}
impl ExchangeStage {
	/// Returns a stable label suitable for span fields and error messages.
	pub const fn as_str(self) -> &'static str {
		match self {
			ExchangeStage::IdToken => "id_token",
			ExchangeStage::BearerToken => "bearer_token",
		}
	}
}
impl Display for ExchangeStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Progress of a single exchange.
///
/// `AwaitingIdToken -> AwaitingBearerToken -> Done`, with `Failed` reachable from either
/// awaiting state when the provider answers with a non-success status.
#[derive(Debug)]
pub enum ExchangeState {
	/// Password grant not yet answered.
	AwaitingIdToken,
	/// Password grant succeeded; jwt-bearer grant not yet answered.
	AwaitingBearerToken(IdentityToken),
	/// Bearer token issued.
	Done(BearerToken),
	/// Provider rejected a step.
	Failed {
		/// Step that was rejected.
		stage: ExchangeStage,
		/// HTTP status returned for that step.
		status: u16,
	},
}
impl ExchangeState {
	/// Stage awaiting a response, if the exchange is still in flight.
	pub fn pending_stage(&self) -> Option<ExchangeStage> {
		match self {
			ExchangeState::AwaitingIdToken => Some(ExchangeStage::IdToken),
			ExchangeState::AwaitingBearerToken(_) => Some(ExchangeStage::BearerToken),
			ExchangeState::Done(_) | ExchangeState::Failed { .. } => None,
		}
	}
}

/// Terminal result of an exchange.
#[derive(Clone, Debug)]
pub enum ExchangeOutcome {
	/// Both steps succeeded.
	Issued(BearerToken),
	/// A step returned a non-success status; no token is produced.
	Rejected {
		/// Step that was rejected.
		stage: ExchangeStage,
		/// HTTP status returned for that step.
		status: u16,
	},
}
impl ExchangeOutcome {
	/// Collapses the outcome into an optional token.
	pub fn into_token(self) -> Option<BearerToken> {
		match self {
			ExchangeOutcome::Issued(token) => Some(token),
			ExchangeOutcome::Rejected { .. } => None,
		}
	}

	/// Returns `true` when a token was issued.
	pub fn is_issued(&self) -> bool {
		matches!(self, ExchangeOutcome::Issued(_))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::TokenSecret;

	#[test]
	fn pending_stage_follows_the_sequence() {
		let identity = IdentityToken {
			id_token: TokenSecret::new("id"),
			access_token: TokenSecret::new("access"),
		};

		assert_eq!(ExchangeState::AwaitingIdToken.pending_stage(), Some(ExchangeStage::IdToken));
		assert_eq!(
			ExchangeState::AwaitingBearerToken(identity).pending_stage(),
			Some(ExchangeStage::BearerToken),
		);
		assert_eq!(ExchangeState::Done(BearerToken::new("bearer")).pending_stage(), None);
		assert_eq!(
			ExchangeState::Failed { stage: ExchangeStage::IdToken, status: 401 }.pending_stage(),
			None,
		);
	}

	#[test]
	fn rejected_outcome_yields_no_token() {
		let outcome = ExchangeOutcome::Rejected { stage: ExchangeStage::BearerToken, status: 400 };

		assert!(!outcome.is_issued());
		assert!(outcome.into_token().is_none());
	}
}
