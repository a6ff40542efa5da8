use crate::error::RelayError;
use actix_cors::Cors;
use actix_web::{
    http::{header, Method},
    post, web,
};
use gemini_client::LanguageModel;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Represents the application state shared across HTTP request handlers.
///
/// The model client is built once at startup and only read afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Language model the chat endpoint forwards to
    pub model: Arc<dyn LanguageModel>,
    /// Persona placed in front of every user message
    pub system_prompt: String,
    /// Log prompts and replies at debug level
    pub debug: bool,
}

impl AppState {
    pub fn new(model: Arc<dyn LanguageModel>, system_prompt: impl Into<String>) -> Self {
        Self {
            model,
            system_prompt: system_prompt.into(),
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Body of `POST /api/chat`
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Active,
}

/// Successful reply of `POST /api/chat`
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ChatReply {
    pub response: String,
    pub status: AgentStatus,
}

/// Joins the persona and the user's message into the prompt sent upstream.
pub fn compose_prompt(system_prompt: &str, message: &str) -> String {
    format!("{system_prompt}\nUser: {message}")
}

#[post("/api/chat")]
pub async fn chat(
    req: web::Json<ChatRequest>,
    data: web::Data<AppState>,
) -> Result<web::Json<ChatReply>, RelayError> {
    let request = req.into_inner();
    if request.message.trim().is_empty() {
        return Err(RelayError::InvalidRequest(
            "message must not be empty".to_string(),
        ));
    }

    let prompt = compose_prompt(&data.system_prompt, &request.message);
    if data.debug {
        debug!("\n\n===== Prompt sent to {}: =====\n{prompt}", data.model.model_name());
    }

    let response = data
        .model
        .generate_from_single_prompt(&prompt)
        .await
        .inspect_err(|e| error!("Model call failed: {e}"))?;

    if data.debug {
        debug!("\n\n===== Reply from {}: =====\n{response}", data.model.model_name());
    }
    info!("Answered chat message ({} chars)", response.len());

    Ok(web::Json(ChatReply {
        response,
        status: AgentStatus::Active,
    }))
}

/// JSON extractor settings that report bad bodies as `{"error": ...}` with 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| RelayError::InvalidRequest(err.to_string()).into())
}

/// Cross-origin policy admitting only `allowed_origin`. Requests carrying any
/// other `Origin` are answered with 400 before they reach a handler.
pub fn cors_policy(allowed_origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(allowed_origin)
        .block_on_origin_mismatch(true)
        .allowed_methods([Method::POST, Method::OPTIONS])
        .allowed_headers([header::ORIGIN, header::CONTENT_TYPE])
        .expose_headers([header::CONTENT_LENGTH])
        .supports_credentials()
}

/// Registers the relay's routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(chat);
}
