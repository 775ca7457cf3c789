//! JSON bodies exchanged with the streaming generate method.

// self
use crate::{_prelude::*, generation::SafetySetting};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateRequest<'a> {
	pub(crate) contents: [Content; 1],
	pub(crate) generation_config: SamplingParams,
	pub(crate) safety_settings: &'a [SafetySetting],
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct Content {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub(crate) role: Option<String>,
	#[serde(default)]
	pub(crate) parts: Vec<Part>,
}
impl Content {
	pub(crate) fn user_text(text: String) -> Self {
		Self { role: Some("user".into()), parts: vec![Part { text: Some(text) }] }
	}
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Part {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub(crate) text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SamplingParams {
	pub(crate) temperature: f32,
	pub(crate) top_p: f32,
	pub(crate) max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StreamChunk {
	#[serde(default)]
	pub(crate) candidates: Vec<Candidate>,
}
impl StreamChunk {
	/// Text of the first candidate, or `None` when the chunk carries no text.
	pub(crate) fn text(self) -> Option<String> {
		let candidate = self.candidates.into_iter().next()?;
		let text = candidate.content.parts.into_iter().filter_map(|part| part.text).collect::<String>();

		if text.is_empty() { None } else { Some(text) }
	}
}

#[derive(Debug, Deserialize)]
pub(crate) struct Candidate {
	#[serde(default)]
	pub(crate) content: Content,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn chunk_text_joins_parts_of_first_candidate() {
		let chunk: StreamChunk = serde_json::from_str(
			"{\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"Hel\"},{\"text\":\"lo\"}]}},{\"content\":{\"parts\":[{\"text\":\"ignored\"}]}}]}",
		)
		.expect("Chunk fixture should parse.");

		assert_eq!(chunk.text().as_deref(), Some("Hello"));
	}

	#[test]
	fn usage_only_chunk_has_no_text() {
		let chunk: StreamChunk = serde_json::from_str(
			"{\"usageMetadata\":{\"promptTokenCount\":3,\"totalTokenCount\":9}}",
		)
		.expect("Usage-only chunk should parse.");

		assert_eq!(chunk.text(), None);

		let chunk: StreamChunk =
			serde_json::from_str("{\"candidates\":[{\"finishReason\":\"SAFETY\"}]}")
				.expect("Candidate without content should parse.");

		assert_eq!(chunk.text(), None);
	}
}
