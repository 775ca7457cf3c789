//! Notebook helpers: a two-step service-account bearer token exchange, a streaming text
//! generation client, and the small hashing, identifier, JSON persistence, and markdown
//! rendering utilities used alongside them during data exploration.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod digest;
pub mod display;
pub mod error;
pub mod exchange;
#[cfg(feature = "reqwest")] pub mod generation;
pub mod http;
pub mod ident;
pub mod obs;
pub mod persist;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::Credentials,
		exchange::{ReqwestExchanger, TokenExchanger},
		http::ReqwestHttpClient,
	};

	/// Path served by mock identity providers in integration tests.
	pub const TOKEN_PATH: &str = "/oauth/token";

	/// Builds a reqwest HTTP client with redirect following disabled.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		ReqwestHttpClient::new().expect("Failed to build Reqwest client for tests.")
	}

	/// Constructs a [`TokenExchanger`] backed by the reqwest transport used across
	/// integration tests.
	pub fn build_reqwest_test_exchanger() -> ReqwestExchanger {
		TokenExchanger::with_http_client(test_reqwest_http_client())
	}

	/// Builds credentials pointing at `auth_url` with fixed test identities.
	pub fn test_credentials(auth_url: &str) -> Credentials {
		Credentials::new("client-notebook", "svc-analyst", "hunter2", auth_url)
			.expect("Test credentials should be valid.")
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		path::{Path, PathBuf},
		sync::Arc,
	};
	#[cfg(any(test, feature = "reqwest"))] pub use std::pin::Pin;

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
