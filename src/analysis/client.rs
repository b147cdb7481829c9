use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{XsheetError, XsheetResult};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// A text-generation service: prompt in, prose out.
pub trait Analyzer {
    fn generate(&self, prompt: &str) -> XsheetResult<String>;
}

/// Connection settings for [`GeminiAnalyzer`].
///
/// The credential is always passed in explicitly; nothing here reads the process environment.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl std::fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl AnalysisConfig {
    /// `<base_url>/<model>:generateContent`
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model.trim()
        )
    }
}

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Deserialize, Default)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Deserialize)]
struct GeminiCandidatePart {
    #[serde(default)]
    text: String,
}

fn request_body(prompt: &str) -> GeminiRequest {
    GeminiRequest {
        contents: vec![GeminiContent {
            parts: vec![GeminiPart {
                text: prompt.to_string(),
            }],
        }],
    }
}

/// Concatenated text of the first candidate; empty when the model returned nothing.
fn response_text(resp: GeminiResponse) -> String {
    resp.candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().map(|p| p.text).collect::<String>())
        .unwrap_or_default()
}

/// Gemini `generateContent` over a blocking HTTP client.
pub struct GeminiAnalyzer {
    client: reqwest::blocking::Client,
    api_key: String,
    endpoint: String,
}

impl GeminiAnalyzer {
    pub fn new(config: AnalysisConfig) -> XsheetResult<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| XsheetError::analysis("API Key is missing; pass --api-key or set API_KEY."))?
            .to_string();

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| XsheetError::analysis(format!("failed to build http client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            endpoint: config.endpoint(),
        })
    }
}

impl Analyzer for GeminiAnalyzer {
    #[tracing::instrument(skip(self, prompt), fields(endpoint = %self.endpoint, prompt_bytes = prompt.len()))]
    fn generate(&self, prompt: &str) -> XsheetResult<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(prompt))
            .send()
            .map_err(|e| XsheetError::analysis(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(XsheetError::analysis(format!("API error ({status}): {text}")));
        }

        let json: GeminiResponse = response
            .json()
            .map_err(|e| XsheetError::analysis(format!("Failed to parse JSON: {e}")))?;
        let text = response_text(json);
        tracing::debug!(chars = text.chars().count(), "received analysis");
        Ok(text)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/analysis/client.rs"]
mod tests;
