//! Crate-level error types shared by the token exchange, generation client, and file helpers.

// self
use crate::{_prelude::*, exchange::ExchangeStage};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// A rejected credential exchange is not an error; it surfaces as an absent token. Everything
/// below is a fault the caller did not ask for.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Identity provider answered with a success status but an unusable body.
	#[error("Token endpoint returned a malformed {stage} response.")]
	MalformedResponse {
		/// Exchange step that produced the body.
		stage: ExchangeStage,
		/// Structured parsing failure, including the JSON path of a missing field.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
	/// Text generation failure.
	#[error(transparent)]
	Generation(#[from] GenerationError),
	/// JSON file helper failure.
	#[error(transparent)]
	Persist(#[from] PersistError),
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Authentication endpoint is not an absolute URL.
	#[error("Authentication URL is invalid.")]
	InvalidAuthUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Model endpoint URL cannot be assembled.
	#[error("Model endpoint URL is invalid.")]
	InvalidModelEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A required credential field is empty.
	#[error("Credential field `{field}` must not be empty.")]
	MissingField {
		/// Field label.
		field: &'static str,
	},
	/// Prompt payload cannot be serialized to JSON.
	#[error("Prompt payload cannot be serialized.")]
	PromptEncode(#[source] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling a remote endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling a remote endpoint.")]
	Io(#[from] std::io::Error),
	/// Transport failed without a structured error.
	#[error("Transport failed: {message}.")]
	Other {
		/// Transport-supplied message.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Failures raised while streaming generated text.
#[derive(Debug, ThisError)]
pub enum GenerationError {
	/// Generation endpoint rejected the request.
	#[error("Generation endpoint returned status {status}: {body}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Truncated response body.
		body: String,
	},
	/// A streamed event could not be parsed.
	#[error("Generation stream carried a malformed chunk.")]
	MalformedChunk {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// A streamed event line is not valid UTF-8.
	#[error("Generation stream carried an event that is not valid UTF-8.")]
	InvalidUtf8 {
		/// Position of the first invalid byte within the payload.
		#[source]
		source: std::str::Utf8Error,
	},
}

/// JSON file helper failures.
#[derive(Debug, ThisError)]
pub enum PersistError {
	/// Reading or writing the file failed.
	#[error("Failed to access {}.", .path.display())]
	Io {
		/// File involved in the failure.
		path: PathBuf,
		/// Underlying I/O failure.
		#[source]
		source: std::io::Error,
	},
	/// File contents are not the expected JSON shape.
	#[error("Failed to parse {}.", .path.display())]
	Parse {
		/// File involved in the failure.
		path: PathBuf,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Value cannot be serialized to JSON.
	#[error("Failed to serialize JSON for {}.", .path.display())]
	Serialize {
		/// Destination file.
		path: PathBuf,
		/// Underlying serializer failure.
		#[source]
		source: serde_json::Error,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn persist_error_converts_into_crate_error_with_source() {
		let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
		let err: Error = PersistError::Io { path: PathBuf::from("missing.json"), source: io }.into();

		assert!(matches!(err, Error::Persist(PersistError::Io { .. })));
		assert_eq!(err.to_string(), "Failed to access missing.json.");

		let source =
			StdError::source(&err).expect("Persist error should expose the I/O failure as source.");

		assert_eq!(source.to_string(), "gone");
	}

	#[test]
	fn malformed_response_names_the_stage() {
		use std::collections::BTreeMap;

		let mut de = serde_json::Deserializer::from_str("{\"a\":\"x\"}");
		let source = serde_path_to_error::deserialize::<_, BTreeMap<String, u8>>(&mut de)
			.expect_err("String value should not parse as u8.");

		assert_eq!(source.path().to_string(), "a");

		let err = Error::MalformedResponse { stage: ExchangeStage::IdToken, source, status: 200 };

		assert_eq!(err.to_string(), "Token endpoint returned a malformed id_token response.");
	}
}
