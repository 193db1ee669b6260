use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::http::{build_client, decode_json, parse_url, send, HttpSettings};
use crate::HttpError;

/// Turns a post body into a short summary.
#[async_trait::async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String, HttpError>;
}

/// Gemini `generateContent` client.
pub struct GeminiSummarizer {
    url: Url,
    client: reqwest::Client,
    max_bytes: u64,
}

impl GeminiSummarizer {
    /// `endpoint` is the model URL without the `:generateContent` suffix.
    pub fn new(endpoint: &str, api_key: &str, settings: &HttpSettings) -> Result<Self, HttpError> {
        let mut url = parse_url(&format!(
            "{}:generateContent",
            endpoint.trim().trim_end_matches('/')
        ))?;
        url.query_pairs_mut().append_pair("key", api_key);
        Ok(Self {
            url,
            client: build_client(settings)?,
            max_bytes: settings.max_bytes,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<GenerateCandidate>,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateCandidate {
    #[serde(default)]
    content: Option<GenerateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContent {
    #[serde(default)]
    parts: Vec<GeneratePart>,
}

#[derive(Debug, Default, Deserialize)]
struct GeneratePart {
    #[serde(default)]
    text: Option<String>,
}

fn summary_request(text: &str) -> serde_json::Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": format!("Summarize the following in two sentences:\n\n{text}") }]
        }],
        "generationConfig": {
            "temperature": 0.3,
            "candidateCount": 1,
            "topP": 1.0,
            "maxOutputTokens": 200
        }
    })
}

#[async_trait::async_trait]
impl Summarizer for GeminiSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, HttpError> {
        let request = self
            .client
            .post(self.url.clone())
            .json(&summary_request(text));
        let body = send(request, self.max_bytes).await?;
        let response: GenerateResponse = decode_json(&body)?;

        // An answer without text is an empty summary, not an error.
        let summary = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .map(|text| text.trim().to_string())
            .unwrap_or_default();
        Ok(summary)
    }
}
