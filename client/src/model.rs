use async_trait::async_trait;
use log::debug;

use crate::{
    client::{ApiKey, AuthMode, GeminiClient},
    endpoints::generate_content::{GenerateContentRequest, GenerateContentResponse, GenerationConfig},
    error::GeminiError,
};

/// Default model used for chat generation
pub const DEFAULT_CHAT_MODEL: &str = "gemini-2.5-flash-lite";

/// A text-in, text-out language model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Identifier of the underlying model
    fn model_name(&self) -> &str;

    /// Sends `prompt` as a single user turn and returns the generated text.
    async fn generate_from_single_prompt(&self, prompt: &str) -> Result<String, GeminiError>;
}

/// [`LanguageModel`] backed by the Gemini `generateContent` endpoint.
#[derive(Clone, Debug)]
pub struct GeminiModel {
    client: GeminiClient,
    key: ApiKey,
    auth: AuthMode,
    model: String,
    config: GenerationConfig,
}

impl GeminiModel {
    pub fn new(client: GeminiClient, key: ApiKey) -> Self {
        Self {
            client,
            key,
            auth: AuthMode::default(),
            model: DEFAULT_CHAT_MODEL.to_string(),
            config: GenerationConfig::default(),
        }
    }

    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_auth(mut self, auth: AuthMode) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    fn request_for(&self, prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest::builder()
            .user(prompt)
            .generation_config(self.config.clone())
            .build()
    }
}

#[async_trait]
impl LanguageModel for GeminiModel {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate_from_single_prompt(&self, prompt: &str) -> Result<String, GeminiError> {
        let response = self
            .client
            .clone()
            .generate_content(&self.model)
            .api_key(&self.key, self.auth)
            .json(self.request_for(prompt))
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        debug!(
            "generateContent({}) answered {} with {} bytes",
            self.model,
            status,
            body.len()
        );

        if !status.is_success() {
            return Err(GeminiError::from_error_body(status.as_u16(), &body));
        }

        let parsed: GenerateContentResponse = serde_json::from_slice(&body)?;
        parsed.into_text()
    }
}
