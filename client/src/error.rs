use thiserror::Error;

/// A custom error type for the Gemini API client.
#[derive(Error, Debug)]
pub enum GeminiError {
    /// No usable API key was supplied.
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,
    /// The forward proxy address could not be used.
    #[error("invalid proxy address {address}: {source}")]
    InvalidProxy {
        address: String,
        #[source]
        source: reqwest::Error,
    },
    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    /// An error occurred while sending a request or reading its body.
    #[error("request error: {0}")]
    Request(#[source] reqwest::Error),
    /// An error occurred while serializing or deserializing data.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// A non-success status returned by the API.
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },
    /// The prompt was rejected before generation.
    #[error("prompt blocked: {0}")]
    Blocked(String),
    /// The API answered without any candidate text.
    #[error("no content in generation response")]
    EmptyResponse,
}

impl From<reqwest::Error> for GeminiError {
    // The request URL may carry the key in its query string.
    fn from(value: reqwest::Error) -> Self {
        GeminiError::Request(value.without_url())
    }
}
