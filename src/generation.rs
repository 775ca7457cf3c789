//! Streaming text generation against a hosted model endpoint.
//!
//! A prompt is serialized to JSON, sent as a single user text part, and the server-sent
//! event stream that comes back is folded into one string. Sampling and safety settings
//! come from an explicit [`GenerationConfig`] rather than process-wide defaults.

mod config;
mod sse;
mod wire;

pub use config::*;
pub use sse::*;

// std
use std::collections::VecDeque;
// crates.io
use futures_util::{Stream, StreamExt};
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::{ConfigError, GenerationError, TransportError},
	generation::wire::{Content, GenerateRequest, SamplingParams, StreamChunk},
	obs::{self, OpKind, OpOutcome, OpSpan},
};

/// Client for the streaming generate method of one model.
#[derive(Clone)]
pub struct TextGenerator {
	client: ReqwestClient,
	endpoint: ModelEndpoint,
	access_token: TokenSecret,
	config: GenerationConfig,
}
impl TextGenerator {
	const ERROR_BODY_LIMIT: usize = 512;

	/// Creates a generator authorized with `access_token` and the default configuration.
	pub fn new(endpoint: ModelEndpoint, access_token: impl Into<String>) -> Self {
		Self {
			client: ReqwestClient::default(),
			endpoint,
			access_token: TokenSecret::new(access_token),
			config: GenerationConfig::default(),
		}
	}

	/// Replaces the sampling and safety configuration.
	pub fn with_config(mut self, config: GenerationConfig) -> Self {
		self.config = config;

		self
	}

	/// Uses a caller-provided reqwest client.
	pub fn with_client(mut self, client: ReqwestClient) -> Self {
		self.client = client;

		self
	}

	/// Configuration sent with every request.
	pub fn config(&self) -> &GenerationConfig {
		&self.config
	}

	/// Generates text for `prompt` and returns the concatenation of every streamed fragment.
	pub async fn generate<P>(&self, prompt: &P) -> Result<String>
	where
		P: ?Sized + Serialize,
	{
		const KIND: OpKind = OpKind::TextGeneration;

		let span = OpSpan::generation(&self.endpoint.model);

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let mut chunks = self.stream(prompt).await?;
				let mut text = String::new();
				let mut fragments = 0;

				while let Some(chunk) = chunks.next_chunk().await {
					text.push_str(&chunk?);

					fragments += 1;
				}

				obs::record_generated_fragments(fragments);

				Ok::<_, Error>(text)
			})
			.await;

		match &result {
			Ok(_) => obs::record_op_outcome(KIND, OpOutcome::Success),
			Err(Error::Generation(GenerationError::Status { .. })) =>
				obs::record_op_outcome(KIND, OpOutcome::Rejected),
			Err(_) => obs::record_op_outcome(KIND, OpOutcome::Failure),
		}

		result
	}

	/// Starts a generation and returns the fragment sequence without consuming it.
	pub async fn stream<P>(
		&self,
		prompt: &P,
	) -> Result<TextChunks<impl Stream<Item = Result<impl AsRef<[u8]>, ReqwestError>> + Unpin + Send>>
	where
		P: ?Sized + Serialize,
	{
		let url = self.endpoint.stream_url()?;
		let prompt = serde_json::to_string(prompt).map_err(ConfigError::PromptEncode)?;
		let body = GenerateRequest {
			contents: [Content::user_text(prompt)],
			generation_config: SamplingParams {
				temperature: self.config.temperature,
				top_p: self.config.top_p,
				max_output_tokens: self.config.max_output_tokens,
			},
			safety_settings: &self.config.safety_settings,
		};
		let body = serde_json::to_vec(&body).map_err(ConfigError::PromptEncode)?;
		let response = self
			.client
			.post(url)
			.bearer_auth(self.access_token.expose())
			.header(reqwest::header::CONTENT_TYPE, "application/json")
			.body(body)
			.send()
			.await
			.map_err(TransportError::from)?;
		let status = response.status();

		if !status.is_success() {
			let text = response.text().await.unwrap_or_default();
			let body = text.chars().take(Self::ERROR_BODY_LIMIT).collect();

			return Err(GenerationError::Status { status: status.as_u16(), body }.into());
		}

		Ok(TextChunks::new(Box::pin(response.bytes_stream())))
	}
}
impl Debug for TextGenerator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TextGenerator")
			.field("endpoint", &self.endpoint)
			.field("access_token", &self.access_token)
			.field("config", &self.config)
			.finish()
	}
}

/// Finite, non-restartable sequence of generated text fragments.
///
/// Fragments are yielded in arrival order; chunks without text (usage reports, safety
/// stops) are skipped. A malformed event yields an error at its own position, so the
/// sequence does not depend on how the network split the bytes.
pub struct TextChunks<S> {
	source: S,
	decoder: SseDecoder,
	ready: VecDeque<Result<String>>,
	exhausted: bool,
}
impl<S, B, E> TextChunks<S>
where
	S: Stream<Item = Result<B, E>> + Unpin,
	B: AsRef<[u8]>,
	E: 'static + Send + Sync + StdError,
{
	/// Wraps a raw byte stream carrying server-sent events.
	pub fn new(source: S) -> Self {
		Self { source, decoder: SseDecoder::default(), ready: VecDeque::new(), exhausted: false }
	}

	/// Returns the next fragment, or `None` once the stream is drained.
	pub async fn next_chunk(&mut self) -> Option<Result<String>> {
		loop {
			if let Some(item) = self.ready.pop_front() {
				return Some(item);
			}
			if self.exhausted {
				return None;
			}

			let payloads = match self.source.next().await {
				Some(Ok(bytes)) => self.decoder.push(bytes.as_ref()),
				Some(Err(e)) => {
					self.exhausted = true;

					return Some(Err(TransportError::network(e).into()));
				},
				None => {
					self.exhausted = true;

					self.decoder.finish().into_iter().collect()
				},
			};

			for payload in payloads {
				match payload.map_err(Error::from).and_then(|payload| parse_chunk(&payload)) {
					Ok(Some(text)) => self.ready.push_back(Ok(text)),
					Ok(None) => (),
					Err(e) => self.ready.push_back(Err(e)),
				}
			}
		}
	}

	/// Drains the sequence and concatenates every fragment.
	pub async fn collect_text(mut self) -> Result<String> {
		let mut text = String::new();

		while let Some(chunk) = self.next_chunk().await {
			text.push_str(&chunk?);
		}

		Ok(text)
	}
}
impl<S> Debug for TextChunks<S> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TextChunks")
			.field("ready", &self.ready.len())
			.field("pending_bytes", &self.decoder.pending())
			.field("exhausted", &self.exhausted)
			.finish()
	}
}

fn parse_chunk(payload: &str) -> Result<Option<String>> {
	let mut de = serde_json::Deserializer::from_str(payload);
	let chunk: StreamChunk = serde_path_to_error::deserialize(&mut de)
		.map_err(|source| GenerationError::MalformedChunk { source })?;

	Ok(chunk.text())
}

#[cfg(test)]
mod tests {
	// std
	use std::io;
	// crates.io
	use futures_util::stream;
	// self
	use super::*;

	fn chunk(text: &str) -> String {
		format!("data: {{\"candidates\":[{{\"content\":{{\"role\":\"model\",\"parts\":[{{\"text\":\"{text}\"}}]}}}}]}}\n\n")
	}

	#[tokio::test]
	async fn fragments_are_concatenated_in_arrival_order() {
		let body = format!("{}{}{}", chunk("The "), chunk("quick "), chunk("fox"));
		let bytes = body.into_bytes();
		let pieces = bytes.chunks(7).map(|piece| Ok::<_, io::Error>(piece.to_vec())).collect::<Vec<_>>();
		let text = TextChunks::new(stream::iter(pieces))
			.collect_text()
			.await
			.expect("Well-formed stream should collect.");

		assert_eq!(text, "The quick fox");
	}

	#[tokio::test]
	async fn next_chunk_yields_each_fragment_then_none() {
		let pieces = vec![
			Ok::<_, io::Error>(chunk("a").into_bytes()),
			Ok(b"data: {\"usageMetadata\":{\"totalTokenCount\":2}}\n\n".to_vec()),
			Ok(chunk("b").into_bytes()),
		];
		let mut chunks = TextChunks::new(stream::iter(pieces));

		assert_eq!(chunks.next_chunk().await.and_then(Result::ok).as_deref(), Some("a"));
		assert_eq!(chunks.next_chunk().await.and_then(Result::ok).as_deref(), Some("b"));
		assert!(chunks.next_chunk().await.is_none());
		assert!(chunks.next_chunk().await.is_none());
	}

	#[tokio::test]
	async fn malformed_chunk_surfaces_typed_error() {
		let pieces = vec![Ok::<_, io::Error>(b"data: {\"candidates\":7}\n\n".to_vec())];
		let err = TextChunks::new(stream::iter(pieces))
			.collect_text()
			.await
			.expect_err("Malformed chunk should fail collection.");

		assert!(matches!(err, Error::Generation(GenerationError::MalformedChunk { .. })));
	}

	#[tokio::test]
	async fn malformed_chunk_position_is_independent_of_read_boundaries() {
		async fn drain(pieces: Vec<Result<Vec<u8>, io::Error>>) -> Vec<Option<String>> {
			let mut chunks = TextChunks::new(stream::iter(pieces));
			let mut seen = Vec::new();

			while let Some(item) = chunks.next_chunk().await {
				seen.push(item.ok());
			}

			seen
		}

		let malformed = b"data: {\"candidates\":7}\n\n".to_vec();
		let after = chunk("after").into_bytes();
		let joined = [malformed.clone(), after.clone()].concat();
		let expected = vec![None, Some("after".to_owned())];

		assert_eq!(drain(vec![Ok(joined)]).await, expected);
		assert_eq!(drain(vec![Ok(malformed), Ok(after)]).await, expected);
	}

	#[tokio::test]
	async fn invalid_utf8_fragment_is_an_error() {
		let pieces = vec![Ok::<_, io::Error>(
			b"data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"caf\xff\"}]}}]}\n\n"
				.to_vec(),
		)];
		let err = TextChunks::new(stream::iter(pieces))
			.collect_text()
			.await
			.expect_err("Invalid UTF-8 should not be repaired.");

		assert!(matches!(err, Error::Generation(GenerationError::InvalidUtf8 { .. })));
	}

	#[tokio::test]
	async fn stream_errors_end_the_sequence() {
		let pieces = vec![Ok(chunk("partial").into_bytes()), Err(io::Error::other("reset"))];
		let mut chunks = TextChunks::new(stream::iter(pieces));

		assert_eq!(chunks.next_chunk().await.and_then(Result::ok).as_deref(), Some("partial"));
		assert!(matches!(chunks.next_chunk().await, Some(Err(Error::Transport(_)))));
		assert!(chunks.next_chunk().await.is_none());
	}
}
