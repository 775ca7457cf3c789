//! Two-step service-account exchange: password grant, then jwt-bearer grant.
//!
//! Both requests are form posts to the same endpoint. A non-success status at either step
//! ends the exchange without a token and without raising; transport faults and malformed
//! success bodies propagate as typed [`Error`] values.

mod form;
mod profile;
mod state;

pub use profile::*;
pub use state::*;

// crates.io
use oauth2::AsyncHttpClient;
// self
use crate::{
	_prelude::*,
	auth::{BearerToken, Credentials, IdentityToken, token::BearerTokenResponse},
	exchange::form::FormFields,
	http::{self, TokenHttpClient},
	obs::{self, OpKind, OpOutcome, OpSpan},
};
#[cfg(feature = "reqwest")] use crate::{error::ConfigError, http::ReqwestHttpClient};

#[cfg(feature = "reqwest")]
/// Exchanger specialized for the crate's default reqwest transport.
pub type ReqwestExchanger = TokenExchanger<ReqwestHttpClient>;

/// Obtains bearer tokens from an identity provider for service-account credentials.
///
/// The exchanger holds no per-call state; every [`exchange`](Self::exchange) issues at most
/// two requests and keeps no copy of the credentials or tokens it handled.
#[derive(Clone)]
pub struct TokenExchanger<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// HTTP client wrapper used for every outbound request.
	pub http_client: Arc<C>,
	/// Connection and scope values sent with both steps.
	pub profile: ExchangeProfile,
}
impl<C> TokenExchanger<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Creates an exchanger on top of the caller-provided transport.
	pub fn with_http_client(http_client: impl Into<Arc<C>>) -> Self {
		Self { http_client: http_client.into(), profile: ExchangeProfile::default() }
	}

	/// Replaces the connection and scope values.
	pub fn with_profile(mut self, profile: ExchangeProfile) -> Self {
		self.profile = profile;

		self
	}

	/// Runs the exchange and returns the bearer token, or `None` when the provider rejected
	/// either step.
	pub async fn exchange(&self, credentials: &Credentials) -> Result<Option<BearerToken>> {
		Ok(self.exchange_detailed(credentials).await?.into_token())
	}

	/// Runs the exchange and reports which step rejected it, if any.
	pub async fn exchange_detailed(&self, credentials: &Credentials) -> Result<ExchangeOutcome> {
		const KIND: OpKind = OpKind::TokenExchange;

		let span = OpSpan::exchange();

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span.instrument(self.drive(credentials)).await;

		match &result {
			Ok(ExchangeOutcome::Issued(_)) => obs::record_op_outcome(KIND, OpOutcome::Success),
			Ok(ExchangeOutcome::Rejected { .. }) =>
				obs::record_op_outcome(KIND, OpOutcome::Rejected),
			Err(_) => obs::record_op_outcome(KIND, OpOutcome::Failure),
		}

		result
	}

	async fn drive(&self, credentials: &Credentials) -> Result<ExchangeOutcome> {
		let handle = self.http_client.handle();
		let mut state = ExchangeState::AwaitingIdToken;

		loop {
			state = match state {
				ExchangeState::AwaitingIdToken => {
					let fields = form::identity_fields(credentials, &self.profile);

					match self
						.post::<IdentityToken>(&handle, credentials, ExchangeStage::IdToken, &fields)
						.await?
					{
						StepReply::Accepted(identity) => ExchangeState::AwaitingBearerToken(identity),
						StepReply::Rejected(status) =>
							ExchangeState::Failed { stage: ExchangeStage::IdToken, status },
					}
				},
				ExchangeState::AwaitingBearerToken(identity) => {
					let fields = form::bearer_fields(credentials, &self.profile, &identity);
					let issued_at = OffsetDateTime::now_utc();

					match self
						.post::<BearerTokenResponse>(
							&handle,
							credentials,
							ExchangeStage::BearerToken,
							&fields,
						)
						.await?
					{
						StepReply::Accepted(response) =>
							ExchangeState::Done(BearerToken::from_response(response, issued_at)),
						StepReply::Rejected(status) =>
							ExchangeState::Failed { stage: ExchangeStage::BearerToken, status },
					}
				},
				ExchangeState::Done(token) => return Ok(ExchangeOutcome::Issued(token)),
				ExchangeState::Failed { stage, status } =>
					return Ok(ExchangeOutcome::Rejected { stage, status }),
			};
		}
	}

	async fn post<T>(
		&self,
		handle: &C::Handle,
		credentials: &Credentials,
		stage: ExchangeStage,
		fields: &FormFields<'_>,
	) -> Result<StepReply<T>>
	where
		T: DeserializeOwned,
	{
		let request = form::post_form(&credentials.auth_url, fields)?;
		let response = OpSpan::exchange_step(stage)
			.instrument(handle.call(request))
			.await
			.map_err(http::map_transport_error)?;
		let status = response.status();

		if !status.is_success() {
			obs::step_rejected_event(stage, status.as_u16());
			obs::record_step_rejection(stage, status.as_u16());

			return Ok(StepReply::Rejected(status.as_u16()));
		}

		let mut de = serde_json::Deserializer::from_slice(response.body());

		serde_path_to_error::deserialize(&mut de).map(StepReply::Accepted).map_err(|source| {
			Error::MalformedResponse { stage, source, status: status.as_u16() }
		})
	}
}
#[cfg(feature = "reqwest")]
impl TokenExchanger<ReqwestHttpClient> {
	/// Creates an exchanger backed by a reqwest client that does not follow redirects.
	pub fn new() -> Result<Self, ConfigError> {
		Ok(Self::with_http_client(ReqwestHttpClient::new()?))
	}
}
impl<C> Debug for TokenExchanger<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenExchanger").field("profile", &self.profile).finish()
	}
}

enum StepReply<T> {
	Accepted(T),
	Rejected(u16),
}

/// One-shot exchange over a fresh reqwest transport.
///
/// Returns `Ok(None)` when the provider rejects either step.
#[cfg(feature = "reqwest")]
pub async fn get_bearer_token(
	client_id: &str,
	username: &str,
	password: &str,
	auth_url: &str,
) -> Result<Option<BearerToken>> {
	let credentials = Credentials::new(client_id, username, password, auth_url)?;

	ReqwestExchanger::new()?.exchange(&credentials).await
}
