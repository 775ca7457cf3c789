//! Sampling, safety, and endpoint configuration for text generation.

// self
use crate::{_prelude::*, error::ConfigError};

/// Harm categories accepted by the generation endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HarmCategory {
	/// Hateful content.
	#[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
	HateSpeech,
	/// Dangerous content.
	#[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
	DangerousContent,
	/// Sexually explicit content.
	#[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
	SexuallyExplicit,
	/// Harassment.
	#[serde(rename = "HARM_CATEGORY_HARASSMENT")]
	Harassment,
}

/// Blocking threshold applied to a harm category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
	/// Never block.
	BlockNone,
	/// Block only high-probability harm.
	BlockOnlyHigh,
	/// Block medium and high probability harm.
	BlockMediumAndAbove,
	/// Block low, medium, and high probability harm.
	BlockLowAndAbove,
}

/// One safety override sent with every request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
	/// Harm category the threshold applies to.
	pub category: HarmCategory,
	/// Threshold for the category.
	pub threshold: HarmBlockThreshold,
}

/// Generation parameters sent with every request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
	/// Sampling temperature.
	pub temperature: f32,
	/// Nucleus sampling probability mass.
	pub top_p: f32,
	/// Upper bound on generated tokens.
	pub max_output_tokens: u32,
	/// Safety overrides.
	pub safety_settings: Vec<SafetySetting>,
}
impl GenerationConfig {
	/// Overrides the sampling temperature.
	pub fn with_temperature(mut self, temperature: f32) -> Self {
		self.temperature = temperature;

		self
	}

	/// Overrides the nucleus sampling probability mass.
	pub fn with_top_p(mut self, top_p: f32) -> Self {
		self.top_p = top_p;

		self
	}

	/// Overrides the generated token limit.
	pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
		self.max_output_tokens = max_output_tokens;

		self
	}

	/// Replaces the safety overrides.
	pub fn with_safety_settings(
		mut self,
		settings: impl IntoIterator<Item = SafetySetting>,
	) -> Self {
		self.safety_settings = settings.into_iter().collect();

		self
	}
}
impl Default for GenerationConfig {
	fn default() -> Self {
		let safety_settings = [
			HarmCategory::HateSpeech,
			HarmCategory::DangerousContent,
			HarmCategory::SexuallyExplicit,
			HarmCategory::Harassment,
		]
		.into_iter()
		.map(|category| SafetySetting { category, threshold: HarmBlockThreshold::BlockNone })
		.collect();

		Self { temperature: 0.2, top_p: 0.95, max_output_tokens: 8192, safety_settings }
	}
}

/// Project, region, and model addressed by a [`TextGenerator`](crate::generation::TextGenerator).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEndpoint {
	/// Cloud project identifier.
	pub project: String,
	/// Region hosting the model, e.g. `us-central1`.
	pub location: String,
	/// Publisher model identifier.
	pub model: String,
	/// Overrides the regional API host. Must end with `/`.
	#[serde(default)]
	pub base_url: Option<Url>,
}
impl ModelEndpoint {
	/// Addresses `model` in `project` at `location` on the regional API host.
	pub fn new(
		project: impl Into<String>,
		location: impl Into<String>,
		model: impl Into<String>,
	) -> Self {
		Self {
			project: project.into(),
			location: location.into(),
			model: model.into(),
			base_url: None,
		}
	}

	/// Sends requests to `base_url` instead of the regional API host.
	pub fn with_base_url(mut self, base_url: Url) -> Self {
		self.base_url = Some(base_url);

		self
	}

	/// Server-sent-events URL of the streaming generate method.
	pub fn stream_url(&self) -> Result<Url, ConfigError> {
		let base = match &self.base_url {
			Some(base) => base.clone(),
			None => Url::parse(&format!("https://{}-aiplatform.googleapis.com/", self.location))
				.map_err(|source| ConfigError::InvalidModelEndpoint { source })?,
		};
		let path = format!(
			"v1/projects/{}/locations/{}/publishers/google/models/{}:streamGenerateContent",
			self.project, self.location, self.model,
		);
		let mut url =
			base.join(&path).map_err(|source| ConfigError::InvalidModelEndpoint { source })?;

		url.set_query(Some("alt=sse"));

		Ok(url)
	}
}
