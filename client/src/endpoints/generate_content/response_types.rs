use serde::{Deserialize, Serialize};

use super::Content;
use crate::error::GeminiError;

/// Response body of `models/{model}:generateContent`.
///
/// Fields the client does not use (safety ratings, citations, etc.) are ignored.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates; empty when the prompt was blocked
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

/// A single generated answer.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    /// Why generation stopped, e.g. "STOP", "MAX_TOKENS", "SAFETY"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub total_token_count: u32,
}

impl GenerateContentResponse {
    /// Text of the first candidate, if it has any.
    pub fn first_text(&self) -> Option<String> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(Content::joined_text)
            .filter(|text| !text.is_empty())
    }

    /// Consumes the response and returns the first candidate's text.
    ///
    /// # Errors
    /// * `GeminiError::Blocked` if the prompt was rejected
    /// * `GeminiError::EmptyResponse` if no candidate carries text
    pub fn into_text(self) -> Result<String, GeminiError> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.clone())
        {
            return Err(GeminiError::Blocked(reason));
        }
        self.first_text().ok_or(GeminiError::EmptyResponse)
    }
}

/// Error envelope returned by the API with non-success statuses.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    /// Canonical status name, e.g. "PERMISSION_DENIED"
    #[serde(default)]
    pub status: Option<String>,
}

impl GeminiError {
    /// Builds an [`GeminiError::Api`] from a non-success status and its body.
    ///
    /// Falls back to the raw body when it is not the API's error envelope.
    pub fn from_error_body(status: u16, body: &[u8]) -> Self {
        let message = match serde_json::from_slice::<ApiErrorBody>(body) {
            Ok(parsed) => match parsed.error.status {
                Some(name) => format!("{name}: {}", parsed.error.message),
                None => parsed.error.message,
            },
            Err(_) => String::from_utf8_lossy(body).trim().to_string(),
        };
        GeminiError::Api { status, message }
    }
}
