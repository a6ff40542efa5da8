pub mod client;
pub mod endpoints;
pub mod error;
pub mod model;

// Re-export commonly used types
pub use client::{
    ApiKey, AuthMode, GeminiClient, GeminiClientBuilder, GeminiRequestBuilder, API_KEY_ENV,
    API_KEY_HEADER, DEFAULT_BASE_URL, DEFAULT_PROXY,
};
pub use endpoints::generate_content::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part, Role,
};
pub use error::GeminiError;
pub use model::{GeminiModel, LanguageModel, DEFAULT_CHAT_MODEL};
