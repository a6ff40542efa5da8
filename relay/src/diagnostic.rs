//! One-shot connectivity check against the Gemini API.
//!
//! Sends a single raw `generateContent` call through the configured proxy and
//! sorts the answer into [`Diagnosis`] buckets by status code alone.

use gemini_client::{ApiKey, AuthMode, GeminiClient, GeminiError, GenerateContentRequest};
use log::warn;
use reqwest::StatusCode;
use std::error::Error;
use std::io::{self, Write};

/// Model the probe is sent to
pub const DIAGNOSTIC_MODEL: &str = "gemini-2.5-flash";
/// Text of the probe prompt
pub const PROBE_PROMPT: &str = "If you receive this, reply with 'SYSTEM_CHECK_PASSED'";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnosis {
    Success,
    AuthorizationFailed,
    Unknown,
}

impl Diagnosis {
    pub fn from_status(status: u16) -> Self {
        match status {
            200 => Diagnosis::Success,
            403 => Diagnosis::AuthorizationFailed,
            _ => Diagnosis::Unknown,
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            Diagnosis::Success => "✅ DIAGNOSIS: Success! Your Key and Proxy are working.",
            Diagnosis::AuthorizationFailed => "❌ DIAGNOSIS: Authorization Failed.",
            Diagnosis::Unknown => "⚠️ DIAGNOSIS: Unknown Error. Read the body above.",
        }
    }

    /// Suggested next step, if there is one
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            Diagnosis::Success => Some(
                "Result: Connectivity is fine. If the relay still fails, check its model settings (--model, --auth).",
            ),
            Diagnosis::AuthorizationFailed => Some(
                "Reason: The server rejected the key. If the key is new, wait 5 mins or check 'Google AI Studio' vs 'Vertex AI' settings.",
            ),
            Diagnosis::Unknown => None,
        }
    }
}

/// Raw answer to the probe
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub status: StatusCode,
    pub body: String,
}

impl ProbeOutcome {
    pub fn diagnosis(&self) -> Diagnosis {
        Diagnosis::from_status(self.status.as_u16())
    }
}

pub fn probe_request() -> GenerateContentRequest {
    GenerateContentRequest::single_prompt(PROBE_PROMPT)
}

/// Renders `error` followed by every distinct cause in its source chain.
pub fn error_chain(error: &dyn Error) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !rendered.contains(&text) {
            rendered.push_str(": ");
            rendered.push_str(&text);
        }
        source = cause.source();
    }
    rendered
}

/// Sends the probe once. Any HTTP answer, whatever its status, is an `Ok`.
///
/// A body that cannot be read in full does not hide the status; the read
/// failure is reported in place of the body.
///
/// # Errors
/// `GeminiError::Request` when the proxy or the API cannot be reached. The
/// error never carries the request URL.
pub async fn run_probe(
    client: GeminiClient,
    key: &ApiKey,
    auth: AuthMode,
    model: &str,
) -> Result<ProbeOutcome, GeminiError> {
    let response = client
        .generate_content(model)
        .api_key(key, auth)
        .json(probe_request())
        .send()
        .await?;
    let status = response.status();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            let reason = error_chain(&GeminiError::from(e));
            warn!("Reading the {status} response body failed: {reason}");
            format!("<body could not be read: {reason}>")
        }
    };
    Ok(ProbeOutcome { status, body })
}

pub fn write_banner<W: Write>(
    out: &mut W,
    proxy: Option<&str>,
    base_url: &str,
    model: &str,
) -> io::Result<()> {
    writeln!(out, "--- SYSTEM DIAGNOSTIC ---")?;
    writeln!(out, "1. Proxy Target: {}", proxy.unwrap_or("none (direct)"))?;
    writeln!(
        out,
        "2. Target URL: {}{} (Key Hidden)",
        base_url.trim_end_matches('/'),
        gemini_client::endpoints::generate_content::path(model)
    )?;
    writeln!(out, "3. Sending Raw HTTP Request...")
}

pub fn write_outcome<W: Write>(out: &mut W, outcome: &ProbeOutcome) -> io::Result<()> {
    writeln!(
        out,
        "\nStatus Code: {} {}",
        outcome.status.as_u16(),
        outcome.status.canonical_reason().unwrap_or("")
    )?;
    writeln!(out, "Response Body: {}", outcome.body)?;

    let diagnosis = outcome.diagnosis();
    writeln!(out, "\n{}", diagnosis.headline())?;
    if let Some(remediation) = diagnosis.remediation() {
        writeln!(out, "{remediation}")?;
    }
    Ok(())
}

pub fn write_network_error<W: Write>(out: &mut W, error: &GeminiError) -> io::Result<()> {
    writeln!(out, "\n❌ NETWORK ERROR: {}", error_chain(error))?;
    writeln!(
        out,
        "Suggestion: Check if your VPN/Proxy is running and allows LAN connections."
    )
}
