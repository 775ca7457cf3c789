//! Streams a generation from a local mock model endpoint, printing fragments as they
//! arrive, then saves the prompt and answer to a JSON file keyed by content hash.

// std
use std::env;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use notebook_helpers::{
	digest::content_hash,
	generation::{ModelEndpoint, TextGenerator},
	ident::generate_identifier,
	persist::{load_dict, save_dict},
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let body = ["Bond ", "yields ", "fell."]
		.iter()
		.map(|text| {
			format!(
				"data: {}\n\n",
				json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
			)
		})
		.collect::<String>();
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).query_param("alt", "sse");
			then.status(200).header("content-type", "text/event-stream").body(body);
		})
		.await;
	let endpoint = ModelEndpoint::new("demo-project", "us-central1", "gemini-demo")
		.with_base_url(Url::parse(&server.url("/"))?);
	let generator = TextGenerator::new(endpoint, "demo-access");
	let prompt = json!({ "question": "What happened to bond yields?" });
	let mut chunks = generator.stream(&prompt).await?;
	let mut answer = String::new();

	while let Some(fragment) = chunks.next_chunk().await {
		let fragment = fragment?;

		println!("fragment: {fragment:?}");
		answer.push_str(&fragment);
	}

	let base = env::temp_dir().join(format!("answer_{}", generate_identifier()));
	let record = json!({ "prompt_hash": content_hash(&prompt.to_string()), "answer": answer });

	save_dict(&record, base.with_extension("json"))?;

	let reloaded = load_dict(&base)?;

	println!("Saved record: {}.", serde_json::to_string_pretty(&reloaded)?);

	mock.assert_async().await;

	Ok(())
}
