use std::future::Future;

use reqwest::Client;
use serde::{
    Deserialize,
    Serialize,
};

use super::CompletionService;
use crate::core::{
    http::http_client,
    PipError,
};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Reads the key from `GEMINI_API_KEY`, falling back to `API_KEY`.
pub fn api_key_from_env() -> Option<String> {
    ["GEMINI_API_KEY", "API_KEY"]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .find_map(|part| part.text)
    }
}

pub struct GeminiService {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiService {
    pub fn new(api_key: String, model: &str) -> Result<Self, PipError> {
        let model = if model.trim().is_empty() { DEFAULT_MODEL } else { model.trim() };
        Ok(Self { client: http_client()?, api_key, model: model.to_string() })
    }

    /// `None` when no API key is present in the environment.
    pub fn from_env(model: &str) -> Result<Option<Self>, PipError> {
        match api_key_from_env() {
            Some(key) => Self::new(key, model).map(Some),
            None => Ok(None),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", API_BASE, self.model)
    }
}

impl CompletionService for GeminiService {
    fn complete_json(&self, prompt: String) -> impl Future<Output = Result<String, PipError>> + Send {
        let request = self.client.post(self.endpoint()).header("x-goog-api-key", &self.api_key);

        async move {
            let body = GenerateRequest {
                contents: [Content { parts: [Part { text: &prompt }] }],
                generation_config: GenerationConfig { response_mime_type: "application/json" },
            };

            let response = request.json(&body).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(PipError::Remote(format!("HTTP {status}")));
            }

            let reply: GenerateResponse = response.json().await?;
            reply.first_text().ok_or_else(|| PipError::Remote("empty response".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let body = GenerateRequest {
            contents: [Content { parts: [Part { text: "hi" }] }],
            generation_config: GenerationConfig { response_mime_type: "application/json" },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn test_first_text_of_response() {
        let reply: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"[]"}],"role":"model"}}]}"#,
        )
        .unwrap();
        assert_eq!(reply.first_text().as_deref(), Some("[]"));

        let empty: GenerateResponse = serde_json::from_str(r#"{"promptFeedback":{}}"#).unwrap();
        assert!(empty.first_text().is_none());
    }

    #[test]
    fn test_blank_model_uses_default() {
        let service = GeminiService::new("key".to_string(), " ").unwrap();
        assert!(service.endpoint().ends_with("/gemini-2.0-flash:generateContent"));
    }
}
