use gemini_client::{
    ApiKey, AuthMode, GeminiClient, GeminiError, GeminiModel, GenerationConfig,
};

use crate::cli::Cli;

/// Persona placed in front of every user message
pub const SYSTEM_PROMPT: &str =
    "You are SysAgent, a high-performance system optimizer. Answer briefly and technically.";

/// Validated relay configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub host: String,
    pub port: u16,
    pub allowed_origin: String,
    pub system_prompt: String,
    pub model: String,
    pub auth: AuthMode,
    pub generation: GenerationConfig,
    pub api_key: ApiKey,
    pub proxy: Option<String>,
    pub client: GeminiClient,
    pub debug: bool,
}

impl RelaySettings {
    /// Checks the command line and environment. The API key is validated
    /// first so a missing key stops startup before any client exists.
    pub fn from_cli(cli: &Cli) -> Result<Self, GeminiError> {
        let api_key = cli.upstream.api_key()?;
        let client = cli.upstream.client()?;
        Ok(Self {
            host: cli.host.clone(),
            port: cli.port,
            allowed_origin: cli.allowed_origin.clone(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            model: cli.model.clone(),
            auth: cli.auth,
            generation: GenerationConfig {
                temperature: cli.temperature,
                top_p: cli.top_p,
                top_k: cli.top_k,
                max_output_tokens: cli.max_output_tokens,
            },
            api_key,
            proxy: cli.upstream.proxy().map(str::to_string),
            client,
            debug: cli.debug,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The proxy-routed model shared by all workers.
    pub fn build_model(&self) -> GeminiModel {
        GeminiModel::new(self.client.clone(), self.api_key.clone())
            .with_model(self.model.clone())
            .with_auth(self.auth)
            .with_generation_config(self.generation.clone())
    }
}
