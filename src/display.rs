//! Markdown renderers for retrieved article chunks and assembled prompts.
//!
//! Every renderer comes in a full and a partial flavor. Partial output shortens each text
//! field to [`PREVIEW_LIMIT`] characters so long documents stay skimmable in a notebook cell.

// std
use std::borrow::Cow;
// self
use crate::_prelude::*;

/// Characters kept by the partial renderers.
pub const PREVIEW_LIMIT: usize = 150;

const ELLIPSIS: &str = "...";

/// A retrieved passage of an article.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleChunk {
	/// Article title.
	pub title: String,
	/// Where the article came from, e.g. a URL.
	#[serde(default)]
	pub source: Option<String>,
	/// Passage text.
	pub text: String,
}

/// One message of a chat-style prompt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
	/// Speaker role, e.g. `system` or `user`.
	pub role: String,
	/// Message body.
	pub content: String,
}

/// Ordered prompt messages.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
	/// Messages in send order.
	pub messages: Vec<PromptMessage>,
}

#[derive(Clone, Copy)]
enum Detail {
	Full,
	Partial,
}
impl Detail {
	fn apply(self, text: &str) -> Cow<'_, str> {
		match self {
			Detail::Full => Cow::Borrowed(text),
			Detail::Partial => truncate_preview(text, PREVIEW_LIMIT),
		}
	}
}

/// Keeps the first `limit` characters of `text` and appends `...` when anything was cut.
///
/// Counts `char`s, not bytes, so multi-byte text is never split mid-character. Text at or
/// under the limit is returned unchanged.
pub fn truncate_preview(text: &str, limit: usize) -> Cow<'_, str> {
	match text.char_indices().nth(limit) {
		Some((cut, _)) => Cow::Owned(format!("{}{ELLIPSIS}", &text[..cut])),
		None => Cow::Borrowed(text),
	}
}

/// Renders one chunk with its full text.
pub fn render_chunk_full(chunk: &ArticleChunk) -> String {
	render_chunk(chunk, Detail::Full)
}

/// Renders one chunk with its text shortened to [`PREVIEW_LIMIT`] characters.
pub fn render_chunk_partial(chunk: &ArticleChunk) -> String {
	render_chunk(chunk, Detail::Partial)
}

/// Renders numbered chunks with their full text, separated by rules.
pub fn render_chunks_full(chunks: &[ArticleChunk]) -> String {
	render_chunks(chunks, Detail::Full)
}

/// Renders numbered chunks with shortened text, separated by rules.
pub fn render_chunks_partial(chunks: &[ArticleChunk]) -> String {
	render_chunks(chunks, Detail::Partial)
}

/// Renders every prompt message in full.
pub fn render_prompt_full(prompt: &Prompt) -> String {
	render_prompt(prompt, Detail::Full)
}

/// Renders every prompt message with its content shortened to [`PREVIEW_LIMIT`] characters.
pub fn render_prompt_partial(prompt: &Prompt) -> String {
	render_prompt(prompt, Detail::Partial)
}

fn render_chunk(chunk: &ArticleChunk, detail: Detail) -> String {
	let mut out = format!("### {}\n\n", chunk.title);

	if let Some(source) = &chunk.source {
		out.push_str(&format!("*Source: {source}*\n\n"));
	}

	out.push_str(&detail.apply(&chunk.text));

	out
}

fn render_chunks(chunks: &[ArticleChunk], detail: Detail) -> String {
	chunks
		.iter()
		.enumerate()
		.map(|(idx, chunk)| format!("**Chunk {}**\n\n{}", idx + 1, render_chunk(chunk, detail)))
		.collect::<Vec<_>>()
		.join("\n\n---\n\n")
}

fn render_prompt(prompt: &Prompt, detail: Detail) -> String {
	prompt
		.messages
		.iter()
		.map(|message| format!("**{}**\n\n{}", message.role, detail.apply(&message.content)))
		.collect::<Vec<_>>()
		.join("\n\n")
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn chunk(text: &str) -> ArticleChunk {
		ArticleChunk {
			title: "Rates outlook".into(),
			source: Some("https://news.example.com/rates".into()),
			text: text.into(),
		}
	}

	#[test]
	fn long_text_keeps_exactly_the_limit_then_ellipsis() {
		let text = "x".repeat(PREVIEW_LIMIT + 25);
		let preview = truncate_preview(&text, PREVIEW_LIMIT);

		assert_eq!(preview.chars().count(), PREVIEW_LIMIT + ELLIPSIS.len());
		assert_eq!(&preview[..PREVIEW_LIMIT], &text[..PREVIEW_LIMIT]);
		assert!(preview.ends_with(ELLIPSIS));
	}

	#[test]
	fn text_at_or_under_the_limit_is_unchanged() {
		let exact = "y".repeat(PREVIEW_LIMIT);

		assert_eq!(truncate_preview(&exact, PREVIEW_LIMIT), exact);
		assert_eq!(truncate_preview("short", PREVIEW_LIMIT), "short");
		assert_eq!(truncate_preview("", PREVIEW_LIMIT), "");
	}

	#[test]
	fn truncation_counts_characters_not_bytes() {
		let text = "\u{e9}".repeat(PREVIEW_LIMIT + 1);
		let preview = truncate_preview(&text, PREVIEW_LIMIT);

		assert_eq!(preview, format!("{}...", "\u{e9}".repeat(PREVIEW_LIMIT)));
	}

	#[test]
	fn chunk_renderers_differ_only_in_text_length() {
		let long = "word ".repeat(60);
		let full = render_chunk_full(&chunk(&long));
		let partial = render_chunk_partial(&chunk(&long));

		assert!(full.starts_with("### Rates outlook\n\n*Source: https://news.example.com/rates*\n\n"));
		assert!(full.ends_with(&long));
		assert!(partial.ends_with(&format!("{}...", &long[..PREVIEW_LIMIT])));
	}

	#[test]
	fn chunk_lists_are_numbered_and_separated() {
		let untitled = ArticleChunk { title: "Second".into(), source: None, text: "b".into() };
		let rendered = render_chunks_partial(&[chunk("a"), untitled]);

		assert_eq!(
			rendered,
			"**Chunk 1**\n\n### Rates outlook\n\n*Source: https://news.example.com/rates*\n\na\n\n---\n\n**Chunk 2**\n\n### Second\n\nb",
		);
		assert_eq!(render_chunks_full(&[]), "");
	}

	#[test]
	fn prompt_partial_truncates_each_message() {
		let prompt: Prompt = serde_json::from_value(serde_json::json!({
			"messages": [
				{ "role": "system", "content": "Answer briefly." },
				{ "role": "user", "content": "z".repeat(200) },
			]
		}))
		.expect("Prompt fixture should deserialize.");
		let full = render_prompt_full(&prompt);
		let partial = render_prompt_partial(&prompt);

		assert!(full.contains(&"z".repeat(200)));
		assert_eq!(
			partial,
			format!("**system**\n\nAnswer briefly.\n\n**user**\n\n{}...", "z".repeat(PREVIEW_LIMIT)),
		);
	}
}
