//! Wire types for the OpenAI chat completions protocol.

use serde::{Deserialize, Serialize};

use dugout_types::llm::{CompletionRequest, CompletionResponse, Usage};

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

impl From<&CompletionRequest> for ChatRequest {
    /// The system prompt becomes a leading `system` message.
    fn from(request: &CompletionRequest) -> Self {
        let system = request.system.iter().map(|content| ChatMessage {
            role: "system".to_string(),
            content: content.clone(),
        });
        let messages = request.messages.iter().map(|m| ChatMessage {
            role: m.role.to_string(),
            content: m.content.clone(),
        });

        ChatRequest {
            model: request.model.clone(),
            messages: system.chain(messages).collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

impl ChatResponse {
    /// Text of the first choice; empty if the model returned none.
    pub fn into_completion(self) -> CompletionResponse {
        let content = self
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        let usage = self.usage.unwrap_or_default();

        CompletionResponse {
            id: self.id,
            content,
            model: self.model,
            usage: Usage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            },
        }
    }
}
