use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::Error;
use crate::schema::{Message, MessageRole};
use crate::traits::{ChatModel, LanguageModel, Runnable};
use crate::Result;

/// Default REST endpoint for the Gemini API
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model name
pub const DEFAULT_MODEL: &str = "models/gemini-pro-latest";

const GENERATE_CONTENT: &str = "generateContent";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

impl GeminiContent {
    fn new(role: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![GeminiPart { text: text.into() }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

/// A model advertised by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    /// Full model name, e.g. `models/gemini-pro-latest`
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    /// Whether the model can be used for text generation
    pub fn supports_generation(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == GENERATE_CONTENT)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Pick the first generation-capable model whose name contains `preferred`,
/// otherwise the first model listed.
pub fn select_model(models: &[ModelInfo], preferred: &str) -> Result<String> {
    models
        .iter()
        .find(|m| m.name.contains(preferred) && m.supports_generation())
        .or_else(|| models.first())
        .map(|m| m.name.clone())
        .ok_or_else(|| Error::LLM("No models available".to_string()))
}

/// Google Gemini client
pub struct GeminiLLM {
    api_key: String,
    model: String,
    temperature: f32,
    max_output_tokens: Option<u32>,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiLLM {
    /// Create a new Gemini client
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            temperature: 0.2,
            max_output_tokens: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a client from loaded settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.require_api_key()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        info!(model = %settings.model, "created Gemini client");

        Ok(Self {
            api_key: api_key.to_string(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_output_tokens: None,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Set the temperature parameter
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the max_output_tokens parameter
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }

    /// Point the client at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Use a different model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn model_path(&self) -> String {
        if self.model.starts_with("models/") {
            self.model.clone()
        } else {
            format!("models/{}", self.model)
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:{}", self.base_url, self.model_path(), GENERATE_CONTENT)
    }

    fn generation_config(&self) -> GeminiGenerationConfig {
        GeminiGenerationConfig {
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
        }
    }

    /// Build a request from chat messages.
    ///
    /// System messages become the system instruction and assistant turns are
    /// sent with the API's `model` role.
    fn create_request(&self, messages: &[Message]) -> GeminiRequest {
        let mut system = Vec::new();
        let mut contents = Vec::new();

        for msg in messages {
            match msg.role {
                MessageRole::System => system.push(msg.content.as_str()),
                MessageRole::User => contents.push(GeminiContent::new(Some("user"), &msg.content)),
                MessageRole::Assistant => {
                    contents.push(GeminiContent::new(Some("model"), &msg.content))
                }
            }
        }

        GeminiRequest {
            contents,
            system_instruction: (!system.is_empty())
                .then(|| GeminiContent::new(None, system.join("\n"))),
            generation_config: self.generation_config(),
        }
    }

    async fn generate(&self, request: &GeminiRequest) -> Result<String> {
        debug!(model = %self.model, turns = request.contents.len(), "calling Gemini");

        let res = self
            .client
            .post(self.endpoint())
            .json(request)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(Error::Request)?;

        let status = res.status();

        if !status.is_success() {
            let error_text = res.text().await.unwrap_or_default();
            return Err(Error::LLM(format!(
                "Gemini API error: {} - {}",
                status, error_text
            )));
        }

        let response: GeminiResponse = res.json().await.map_err(Error::Request)?;
        extract_text(response)
    }

    /// List the models available to this API key, following pagination
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(format!("{}/models", self.base_url))
                .header("x-goog-api-key", &self.api_key);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let res = request.send().await.map_err(Error::Request)?;
            let status = res.status();
            if !status.is_success() {
                let error_text = res.text().await.unwrap_or_default();
                return Err(Error::LLM(format!(
                    "Gemini API error: {} - {}",
                    status, error_text
                )));
            }

            let page: ListModelsResponse = res.json().await.map_err(Error::Request)?;
            models.extend(page.models);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(models)
    }
}

fn extract_text(response: GeminiResponse) -> Result<String> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| Error::LLM("No candidates returned".to_string()))?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(Error::LLM(format!(
            "Empty response (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    Ok(text)
}

#[async_trait]
impl Runnable<String, String> for GeminiLLM {
    async fn invoke(&self, input: String) -> Result<String> {
        let request = self.create_request(&[Message::user(input)]);
        self.generate(&request).await
    }
}

#[async_trait]
impl Runnable<Vec<Message>, Message> for GeminiLLM {
    async fn invoke(&self, input: Vec<Message>) -> Result<Message> {
        if input.is_empty() {
            return Err(Error::LLM("No messages provided".to_string()));
        }
        let request = self.create_request(&input);
        Ok(Message::assistant(self.generate(&request).await?))
    }
}

fn gemini_parameters(llm: &GeminiLLM) -> HashMap<String, Value> {
    let mut params = HashMap::new();
    params.insert("temperature".to_string(), json!(llm.temperature));
    if let Some(max_output_tokens) = llm.max_output_tokens {
        params.insert("max_output_tokens".to_string(), json!(max_output_tokens));
    }
    params
}

impl LanguageModel for GeminiLLM {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn parameters(&self) -> HashMap<String, Value> {
        gemini_parameters(self)
    }
}

impl ChatModel for GeminiLLM {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn parameters(&self) -> HashMap<String, Value> {
        gemini_parameters(self)
    }
}
