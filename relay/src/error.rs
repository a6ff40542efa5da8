use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use gemini_client::GeminiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    /// Malformed or incomplete chat request from the caller
    #[error("{0}")]
    InvalidRequest(String),
    /// The model call failed
    #[error("Agent crashed: {0}")]
    Model(#[from] GeminiError),
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            RelayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::Model(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}
