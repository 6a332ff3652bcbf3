use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::client::Provider;
use crate::error::ProviderError;
use crate::util::SecretString;

fn status_error(provider: &'static str, status: u16, body: String) -> ProviderError {
    if status == 401 || status == 403 {
        ProviderError::Auth { provider, status }
    } else {
        ProviderError::Api {
            provider,
            status,
            body,
        }
    }
}

// ============================================================================
// Gemini Provider (Google Generative AI)
// ============================================================================

pub struct GeminiProvider {
    api_key: SecretString,
    model: String,
    max_tokens: u32,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    #[serde(rename = "systemInstruction")]
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    /// Bias the backend toward structured output.
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiResponseContent,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: String,
}

impl GeminiProvider {
    pub fn new(
        api_key: String,
        model: String,
        max_tokens: u32,
        timeout_secs: u64,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            api_key: api_key.into(),
            model,
            max_tokens,
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .map_err(|source| ProviderError::Network {
                    provider: "gemini",
                    source,
                })?,
        })
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ProviderError> {
        let request = GeminiRequest {
            system_instruction: GeminiContent {
                parts: vec![GeminiPart {
                    text: system_prompt.to_string(),
                }],
            },
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: user_prompt.to_string(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                max_output_tokens: self.max_tokens,
                response_mime_type: "application/json",
            },
        };

        debug!("Calling Gemini API with model: {}", self.model);

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model,
            self.api_key.expose()
        );

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|source| ProviderError::Network {
                provider: "gemini",
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(status_error("gemini", status, body));
        }

        let api_response: GeminiResponse = response
            .json()
            .await
            .map_err(|_| ProviderError::Empty { provider: "gemini" })?;

        let text: String = api_response
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ProviderError::Empty { provider: "gemini" });
        }
        Ok(text)
    }
}

// ============================================================================
// OpenAI Provider (also serves OpenAI-compatible gateways)
// ============================================================================

pub struct OpenAIProvider {
    api_key: SecretString,
    model: String,
    base_url: String,
    max_tokens: u32,
    client: Client,
}

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    temperature: f32,
    max_tokens: u32,
    /// Bias the backend toward structured output.
    response_format: OpenAIResponseFormat,
}

#[derive(Debug, Serialize)]
struct OpenAIResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

impl OpenAIProvider {
    pub fn new(
        api_key: String,
        model: String,
        max_tokens: u32,
        timeout_secs: u64,
    ) -> Result<Self, ProviderError> {
        Self::with_base_url(
            api_key,
            model,
            "https://api.openai.com/v1".to_string(),
            max_tokens,
            timeout_secs,
        )
    }

    pub fn with_base_url(
        api_key: String,
        model: String,
        base_url: String,
        max_tokens: u32,
        timeout_secs: u64,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            api_key: api_key.into(),
            model,
            base_url,
            max_tokens,
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .map_err(|source| ProviderError::Network {
                    provider: "openai",
                    source,
                })?,
        })
    }
}

#[async_trait]
impl Provider for OpenAIProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ProviderError> {
        let request = OpenAIRequest {
            model: self.model.clone(),
            messages: vec![
                OpenAIMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                OpenAIMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
            temperature: 0.7,
            max_tokens: self.max_tokens,
            response_format: OpenAIResponseFormat {
                format_type: "json_object",
            },
        };

        debug!(
            "Calling OpenAI-compatible API at {} with model: {}",
            self.base_url, self.model
        );

        let url = format!("{}/chat/completions", self.base_url);

        let mut req = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&request);

        // Only add authorization if API key is not empty
        if !self.api_key.is_empty() {
            req = req.header("authorization", format!("Bearer {}", self.api_key.expose()));
        }

        let response = req.send().await.map_err(|source| ProviderError::Network {
            provider: "openai",
            source,
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(status_error("openai", status, body));
        }

        let api_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|_| ProviderError::Empty { provider: "openai" })?;

        api_response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .filter(|text| !text.is_empty())
            .ok_or(ProviderError::Empty { provider: "openai" })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_provider_creation() {
        let provider =
            GeminiProvider::new("test_key".to_string(), "gemini-1.5-pro".to_string(), 8192, 60)
                .unwrap();
        assert_eq!(provider.api_key.expose(), "test_key");
        assert_eq!(provider.model, "gemini-1.5-pro");
        assert_eq!(provider.max_tokens, 8192);
    }

    #[test]
    fn test_openai_provider_creation() {
        let provider =
            OpenAIProvider::new("test_key".to_string(), "gpt-4o".to_string(), 4096, 60).unwrap();
        assert_eq!(provider.api_key.expose(), "test_key");
        assert_eq!(provider.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_openai_provider_with_custom_base_url() {
        let provider = OpenAIProvider::with_base_url(
            "test_key".to_string(),
            "llama3".to_string(),
            "http://localhost:11434/v1".to_string(),
            16384,
            60,
        )
        .unwrap();
        assert_eq!(provider.base_url, "http://localhost:11434/v1");
    }

    #[test]
    fn test_gemini_request_structure() {
        let request = GeminiRequest {
            system_instruction: GeminiContent {
                parts: vec![GeminiPart {
                    text: "system".to_string(),
                }],
            },
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: "user".to_string(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                max_output_tokens: 8192,
                response_mime_type: "application/json",
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "system");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "user");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 8192);
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn test_gemini_response_parsing() {
        let json = r#"{
            "candidates": [
                {
                    "content": {
                        "parts": [
                            {"text": "{\"outline\""},
                            {"text": ": []}"}
                        ]
                    }
                }
            ]
        }"#;

        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        let text: String = response.candidates[0]
            .content
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect();
        assert_eq!(text, "{\"outline\": []}");
    }

    #[test]
    fn test_gemini_response_empty_candidates() {
        let response: GeminiResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(response.candidates.is_empty());

        // Missing candidates field also deserializes.
        let response: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert!(response.candidates.is_empty());
    }

    #[test]
    fn test_openai_request_structure() {
        let request = OpenAIRequest {
            model: "gpt-4o".to_string(),
            messages: vec![
                OpenAIMessage {
                    role: "system".to_string(),
                    content: "sys".to_string(),
                },
                OpenAIMessage {
                    role: "user".to_string(),
                    content: "usr".to_string(),
                },
            ],
            temperature: 0.7,
            max_tokens: 4096,
            response_format: OpenAIResponseFormat {
                format_type: "json_object",
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "usr");
        assert_eq!(json["response_format"]["type"], "json_object");
    }

    #[test]
    fn test_openai_response_parsing() {
        let json = r#"{
            "choices": [
                {
                    "message": {
                        "role": "assistant",
                        "content": "{\"slides\": []}"
                    }
                }
            ]
        }"#;

        let response: OpenAIResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices[0].message.content, "{\"slides\": []}");
    }

    #[test]
    fn test_status_error_classification() {
        assert!(matches!(
            status_error("gemini", 401, String::new()),
            ProviderError::Auth { status: 401, .. }
        ));
        assert!(matches!(
            status_error("openai", 403, String::new()),
            ProviderError::Auth { status: 403, .. }
        ));
        assert!(matches!(
            status_error("openai", 500, String::new()),
            ProviderError::Api { status: 500, .. }
        ));
    }
}
