//! Runs the two-step service-account exchange against a local mock identity provider and
//! prints the resulting bearer token metadata.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use notebook_helpers::{
	auth::Credentials,
	exchange::{ExchangeOutcome, ReqwestExchanger},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let identity_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token").body_includes("grant_type=password");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id_token\":\"demo-id\",\"access_token\":\"demo-access\"}");
		})
		.await;
	let bearer_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token").body_includes("assertion=demo-id");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"demo-bearer\",\"token_type\":\"Bearer\",\"expires_in\":3600}");
		})
		.await;
	let credentials =
		Credentials::new("demo-client", "svc-demo", "demo-password", &server.url("/oauth/token"))?;
	let exchanger = ReqwestExchanger::new()?;

	match exchanger.exchange_detailed(&credentials).await? {
		ExchangeOutcome::Issued(token) => println!(
			"Issued {} token expiring at {:?}.",
			token.token_type.as_deref().unwrap_or("bearer"),
			token.expires_at,
		),
		ExchangeOutcome::Rejected { stage, status } =>
			println!("Provider rejected the {stage} step with status {status}."),
	}

	identity_mock.assert_async().await;
	bearer_mock.assert_async().await;

	Ok(())
}
