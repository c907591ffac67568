use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::repository::LlmGateway;
use crate::error::FunctionsError;

/// Chat completions against an OpenAI-compatible gateway.
#[derive(Clone)]
pub struct HttpLlmGateway {
    pub client: Client,
    /// Gateway root, e.g. `https://gateway.example.com/v1`.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: String,
}

impl LlmGateway for HttpLlmGateway {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, FunctionsError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.2,
        };

        let response = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.base_url.trim_end_matches('/')
            ))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| FunctionsError::Upstream(format!("LLM gateway unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FunctionsError::Upstream(format!(
                "LLM gateway returned {status}: {body}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| FunctionsError::Upstream(format!("malformed LLM response: {e}")))?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| FunctionsError::Upstream("LLM response had no choices".into()))
    }
}
