//! Server-sent-events framing for the streaming generate method.

// self
use crate::error::GenerationError;

/// Reassembles `data:` payloads from arbitrarily split network chunks.
///
/// Lines are only decoded once their terminating newline has arrived, so multi-byte UTF-8
/// sequences split across chunks are never cut. A payload that is not valid UTF-8 is
/// reported in place rather than repaired.
#[derive(Debug, Default)]
pub struct SseDecoder {
	buffer: Vec<u8>,
}
impl SseDecoder {
	/// Buffers `bytes` and returns every payload completed by them, in arrival order.
	pub fn push(&mut self, bytes: &[u8]) -> Vec<Result<String, GenerationError>> {
		self.buffer.extend_from_slice(bytes);

		let mut payloads = Vec::new();

		while let Some(end) = self.buffer.iter().position(|byte| *byte == b'\n') {
			let line = self.buffer.drain(..=end).collect::<Vec<_>>();

			payloads.extend(data_payload(&line));
		}

		payloads
	}

	/// Flushes an unterminated final line, if it carries a payload.
	pub fn finish(&mut self) -> Option<Result<String, GenerationError>> {
		let rest = std::mem::take(&mut self.buffer);

		data_payload(&rest)
	}

	/// Number of bytes waiting for a line terminator.
	pub fn pending(&self) -> usize {
		self.buffer.len()
	}
}

fn data_payload(line: &[u8]) -> Option<Result<String, GenerationError>> {
	let line = line.strip_suffix(b"\n").unwrap_or(line);
	let line = line.strip_suffix(b"\r").unwrap_or(line);
	let payload = line.strip_prefix(b"data:")?;
	let payload = payload.strip_prefix(b" ").unwrap_or(payload);

	if payload.is_empty() || payload == b"[DONE]" {
		return None;
	}

	Some(
		std::str::from_utf8(payload)
			.map(str::to_owned)
			.map_err(|source| GenerationError::InvalidUtf8 { source }),
	)
}
