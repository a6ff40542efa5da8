use reqwest::{Client, Proxy, RequestBuilder};
use serde::Serialize;
use std::{fmt, future::Future, marker::PhantomData, str::FromStr};

use crate::{endpoints::generate_content::GenerateContentRequest, error::GeminiError};

/// Default host of the generative language API
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Local forward proxy all outbound calls go through unless told otherwise
pub const DEFAULT_PROXY: &str = "http://127.0.0.1:7897";
/// Header used by [`AuthMode::Header`]
pub const API_KEY_HEADER: &str = "x-goog-api-key";
/// Environment variable the API key is read from
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Represents the state where no API key has been set for the request
pub struct NoApiKey;
/// Represents the state where an API key has been set for the request
pub struct ApiKeySet;
/// Represents the state where a payload has been set for the request
pub struct PayloadSet;

/// An API key that is known to be non-blank.
///
/// The value is trimmed on construction and never shown by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Builds a key from a raw value, rejecting missing or blank input.
    pub fn new<S: AsRef<str>>(raw: Option<S>) -> Result<Self, GeminiError> {
        match raw.as_ref().map(|s| s.as_ref().trim()) {
            Some(key) if !key.is_empty() => Ok(ApiKey(key.to_string())),
            _ => Err(GeminiError::MissingApiKey),
        }
    }

    /// Reads the key from `GEMINI_API_KEY`.
    pub fn from_env() -> Result<Self, GeminiError> {
        Self::new(std::env::var(API_KEY_ENV).ok())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

/// How the API key is attached to outgoing requests
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthMode {
    /// `?key=<key>` on the request URL
    Query,
    /// `x-goog-api-key: <key>` request header
    #[default]
    Header,
}

impl FromStr for AuthMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "query" => Ok(AuthMode::Query),
            "header" => Ok(AuthMode::Header),
            other => Err(format!(
                "unknown auth mode '{other}', expected 'query' or 'header'"
            )),
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::Query => write!(f, "query"),
            AuthMode::Header => write!(f, "header"),
        }
    }
}

/// Builder for making requests to Gemini API endpoints
///
/// # Type Parameters
///
/// * `Api` - Represents the authentication state (NoApiKey or ApiKeySet)
/// * `Payload` - Represents the request payload state
pub struct GeminiRequestBuilder<Api, Payload>(
    pub RequestBuilder,
    pub PhantomData<Payload>,
    pub PhantomData<Api>,
);

impl From<Client> for GeminiClient {
    fn from(value: Client) -> Self {
        Self {
            client: value,
            base_url: None,
        }
    }
}

/// A client for interacting with the Gemini API
///
/// Wraps a reqwest::Client and provides convenient methods for making API requests.
/// Use [`GeminiClient::builder`] to route traffic through a forward proxy or to
/// point the client at a different host.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    pub client: Client,
    pub base_url: Option<String>,
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self {
            client: Client::new(),
            base_url: None,
        }
    }
}

impl GeminiClient {
    /// Creates a client with reqwest's default configuration
    pub fn new() -> GeminiClient {
        GeminiClient::default()
    }

    pub fn builder() -> GeminiClientBuilder {
        GeminiClientBuilder::default()
    }

    /// Base URL requests are sent to, without a trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    /// Creates a request builder for `models/{model}:generateContent`
    ///
    /// # Returns
    ///
    /// A `GeminiRequestBuilder` that still needs an API key and a payload
    pub fn generate_content(
        self,
        model: &str,
    ) -> GeminiRequestBuilder<NoApiKey, GenerateContentRequest> {
        let url = format!(
            "{}{}",
            self.base_url(),
            crate::endpoints::generate_content::path(model)
        );
        self.client.post(&url).into()
    }
}

/// Configures the transport underneath a [`GeminiClient`]
#[derive(Debug, Clone, Default)]
pub struct GeminiClientBuilder {
    proxy: Option<String>,
    base_url: Option<String>,
}

impl GeminiClientBuilder {
    /// Routes HTTP and HTTPS traffic through `proxy`. `None` connects directly
    /// and also ignores proxy settings from the environment.
    pub fn proxy<S: Into<String>>(mut self, proxy: Option<S>) -> Self {
        self.proxy = proxy.map(Into::into);
        self
    }

    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn build(self) -> Result<GeminiClient, GeminiError> {
        let builder = Client::builder();
        let builder = match &self.proxy {
            Some(address) => {
                let proxy = Proxy::all(address).map_err(|source| GeminiError::InvalidProxy {
                    address: address.clone(),
                    source,
                })?;
                builder.proxy(proxy)
            }
            None => builder.no_proxy(),
        };
        let client = builder.build().map_err(GeminiError::Client)?;
        Ok(GeminiClient {
            client,
            base_url: self.base_url,
        })
    }
}

impl<T> GeminiRequestBuilder<NoApiKey, T> {
    /// Attaches the API key using the given mechanism
    ///
    /// # Returns
    ///
    /// A new GeminiRequestBuilder with the ApiKeySet state, preserving the payload type
    pub fn api_key(self, key: &ApiKey, mode: AuthMode) -> GeminiRequestBuilder<ApiKeySet, T> {
        match mode {
            AuthMode::Query => self.0.query(&[("key", key.expose())]).into(),
            AuthMode::Header => self.0.header(API_KEY_HEADER, key.expose()).into(),
        }
    }
}

impl<K, T: Serialize> GeminiRequestBuilder<K, T> {
    /// Sets the JSON payload for the request
    pub fn json(self, payload: T) -> GeminiRequestBuilder<K, PayloadSet> {
        self.0.json(&payload).into()
    }
}

impl GeminiRequestBuilder<ApiKeySet, PayloadSet> {
    /// Sends the configured request and returns the raw response
    ///
    /// Non-success statuses are not turned into errors here; callers decide
    /// what a given status means.
    pub fn send(self) -> impl Future<Output = Result<reqwest::Response, reqwest::Error>> {
        self.0.send()
    }
}

impl<T, U> From<RequestBuilder> for GeminiRequestBuilder<T, U> {
    fn from(value: RequestBuilder) -> Self {
        GeminiRequestBuilder(value, PhantomData, PhantomData)
    }
}
