use serde::{Deserialize, Serialize};

/// Author of a piece of conversation content
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// A single part of a content block. Only text parts are modelled.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    pub fn text<S: Into<String>>(text: S) -> Self {
        Part {
            text: Some(text.into()),
        }
    }
}

/// One turn of content sent to or returned by the model.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// A user turn holding a single text part.
    pub fn user<S: Into<String>>(text: S) -> Self {
        Content {
            role: Some(Role::User),
            parts: vec![Part::text(text)],
        }
    }

    /// Text content with no role, as used for system instructions.
    pub fn plain<S: Into<String>>(text: S) -> Self {
        Content {
            role: None,
            parts: vec![Part::text(text)],
        }
    }

    /// Concatenation of every text part.
    pub fn joined_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

/// Sampling parameters for a generation call
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl GenerationConfig {
    pub fn is_empty(&self) -> bool {
        self == &GenerationConfig::default()
    }
}

/// Request body of `models/{model}:generateContent`.
///
/// # Fields
/// * `contents` - Conversation turns, oldest first
/// * `system_instruction` - Optional instruction applied to the whole exchange
/// * `generation_config` - Optional sampling parameters
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    pub fn builder() -> GenerateContentRequestBuilder {
        GenerateContentRequestBuilder::default()
    }

    /// A request holding one user turn and nothing else.
    pub fn single_prompt<S: Into<String>>(prompt: S) -> Self {
        Self::builder().user(prompt).build()
    }
}

/// Builder for constructing GenerateContentRequest instances.
#[derive(Debug, Clone, Default)]
pub struct GenerateContentRequestBuilder {
    contents: Vec<Content>,
    system_instruction: Option<Content>,
    config: GenerationConfig,
}

impl GenerateContentRequestBuilder {
    /// Appends a user turn.
    pub fn user<S: Into<String>>(mut self, text: S) -> Self {
        self.contents.push(Content::user(text));
        self
    }

    pub fn system_instruction<S: Into<String>>(mut self, text: S) -> Self {
        self.system_instruction = Some(Content::plain(text));
        self
    }

    pub fn temperature<T: Into<Option<f32>>>(mut self, temperature: T) -> Self {
        self.config.temperature = temperature.into();
        self
    }

    pub fn top_p<T: Into<Option<f32>>>(mut self, top_p: T) -> Self {
        self.config.top_p = top_p.into();
        self
    }

    pub fn top_k<T: Into<Option<u32>>>(mut self, top_k: T) -> Self {
        self.config.top_k = top_k.into();
        self
    }

    pub fn max_output_tokens<T: Into<Option<u32>>>(mut self, max_output_tokens: T) -> Self {
        self.config.max_output_tokens = max_output_tokens.into();
        self
    }

    /// Replaces every sampling parameter at once.
    pub fn generation_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the request. An all-default generation config is left out of the payload.
    pub fn build(self) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: self.contents,
            system_instruction: self.system_instruction,
            generation_config: (!self.config.is_empty()).then_some(self.config),
        }
    }
}
