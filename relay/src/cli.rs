use clap::{Args, Parser};
use gemini_client::{ApiKey, AuthMode, GeminiClient, GeminiError, DEFAULT_BASE_URL, DEFAULT_PROXY};

/// Options shared by every binary that talks to the Gemini API
#[derive(Args, Debug, Clone)]
pub struct UpstreamArgs {
    /// API key for Gemini (alternatively use GEMINI_API_KEY env var)
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Forward proxy used for all outbound calls
    #[arg(long, env = "GEMINI_PROXY", default_value = DEFAULT_PROXY)]
    pub proxy: String,

    /// Connect to the API directly instead of through the proxy
    #[arg(long)]
    pub no_proxy: bool,

    /// Base URL of the generative language API
    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
}

impl UpstreamArgs {
    /// Validated API key. Fails before anything touches the network.
    pub fn api_key(&self) -> Result<ApiKey, GeminiError> {
        ApiKey::new(self.api_key.as_deref())
    }

    /// Proxy address in effect, `None` when connecting directly
    pub fn proxy(&self) -> Option<&str> {
        (!self.no_proxy).then_some(self.proxy.as_str())
    }

    pub fn client(&self) -> Result<GeminiClient, GeminiError> {
        GeminiClient::builder()
            .proxy(self.proxy())
            .base_url(self.base_url.clone())
            .build()
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "sysagent",
    about = "SysAgent chat relay: forwards chat messages to Gemini through a forward proxy",
    version
)]
pub struct Cli {
    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, default_value = "8080")]
    pub port: u16,

    /// The only origin allowed to make cross-origin requests
    #[arg(long, default_value = "http://localhost:3000")]
    pub allowed_origin: String,

    /// Gemini model used for chat replies
    #[arg(long, default_value = gemini_client::DEFAULT_CHAT_MODEL)]
    pub model: String,

    /// How the API key is sent upstream (header or query)
    #[arg(long, default_value = "header")]
    pub auth: AuthMode,

    /// Sampling temperature passed to the model
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Nucleus sampling cutoff passed to the model
    #[arg(long)]
    pub top_p: Option<f32>,

    /// Number of highest-probability tokens considered when sampling
    #[arg(long)]
    pub top_k: Option<u32>,

    /// Upper bound on generated tokens per reply
    #[arg(long)]
    pub max_output_tokens: Option<u32>,

    #[command(flatten)]
    pub upstream: UpstreamArgs,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Write logs to a file in the working directory
    #[arg(long)]
    pub log_to_file: bool,

    /// Log incoming requests, prompts and replies
    #[arg(long)]
    pub debug: bool,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "sysagent-diagnose",
    about = "Sends one raw request to the Gemini API to check the key and proxy",
    version
)]
pub struct DiagnoseCli {
    /// Gemini model to probe
    #[arg(long, default_value = crate::diagnostic::DIAGNOSTIC_MODEL)]
    pub model: String,

    /// How the API key is sent upstream (query or header)
    #[arg(long, default_value = "query")]
    pub auth: AuthMode,

    #[command(flatten)]
    pub upstream: UpstreamArgs,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}
