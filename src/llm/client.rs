// src/llm/client.rs
//! Minimal OpenAI-compatible chat-completions client: plain text replies
//! and forced tool calls returning structured arguments.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;

use crate::app_log;
use crate::core::ServiceConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Function the model is forced to call
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

impl ToolDefinition {
    fn to_request_value(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }

    fn choice_value(&self) -> Value {
        json!({ "type": "function", "function": { "name": self.name } })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    function: FunctionCall,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    name: String,
    arguments: String,
}

impl ChatResponse {
    /// Text of the first choice
    pub(crate) fn into_content(self) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .context("LLM response contained no message content")
    }

    /// Arguments of the first call to `tool_name`, `None` when the model did
    /// not call it.
    pub(crate) fn tool_arguments<T: DeserializeOwned>(self, tool_name: &str) -> Result<Option<T>> {
        let Some(choice) = self.choices.into_iter().next() else {
            return Ok(None);
        };
        let Some(call) = choice
            .message
            .tool_calls
            .into_iter()
            .find(|call| call.function.name == tool_name)
        else {
            return Ok(None);
        };

        let parsed = serde_json::from_str(&call.function.arguments)
            .with_context(|| format!("Malformed arguments for tool {}", tool_name))?;
        Ok(Some(parsed))
    }
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl LlmClient {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let api_url = config
            .llm_api_url
            .clone()
            .context("LLM_API_URL environment variable not set")?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_url,
            api_key: config.llm_api_key.clone(),
            model: config.llm_model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_url)
    }

    /// Free-form completion over `messages`
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: Option<u32>,
    ) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature,
            max_tokens,
            tools: None,
            tool_choice: None,
        };
        self.send(&request).await?.into_content()
    }

    /// Forces a call to `tool` and decodes its arguments
    pub async fn call_tool<T: DeserializeOwned>(
        &self,
        messages: &[ChatMessage],
        tool: &ToolDefinition,
        temperature: f32,
        max_tokens: Option<u32>,
    ) -> Result<Option<T>> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature,
            max_tokens,
            tools: Some(vec![tool.to_request_value()]),
            tool_choice: Some(tool.choice_value()),
        };
        self.send(&request).await?.tool_arguments(tool.name)
    }

    async fn send(&self, request: &ChatRequest<'_>) -> Result<ChatResponse> {
        app_log!(
            info,
            "Sending {} messages to {} ({})",
            request.messages.len(),
            self.endpoint(),
            self.model
        );

        let mut builder = self.client.post(self.endpoint()).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .context("Failed to send request to LLM API")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            app_log!(error, "LLM API error {}: {}", status, error_text);
            anyhow::bail!("LLM API returned error {}: {}", status, error_text);
        }

        response
            .json::<ChatResponse>()
            .await
            .context("Failed to parse LLM API response")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Echo {
        value: i64,
    }

    fn response(raw: Value) -> ChatResponse {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_request_shape_for_tool_call() {
        let tool = ToolDefinition {
            name: "echo",
            description: "Echo a value",
            parameters: json!({"type": "object"}),
        };
        let messages = vec![ChatMessage::system("s"), ChatMessage::user("u")];
        let request = ChatRequest {
            model: "m",
            messages: &messages,
            temperature: 0.0,
            max_tokens: None,
            tools: Some(vec![tool.to_request_value()]),
            tool_choice: Some(tool.choice_value()),
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "u");
        assert_eq!(body["tools"][0]["function"]["name"], "echo");
        assert_eq!(body["tool_choice"]["function"]["name"], "echo");
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_plain_request_omits_tools() {
        let messages = vec![ChatMessage::user("hi")];
        let request = ChatRequest {
            model: "m",
            messages: &messages,
            temperature: 0.1,
            max_tokens: Some(4000),
            tools: None,
            tool_choice: None,
        };
        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("tools").is_none());
        assert_eq!(body["max_tokens"], 4000);
    }

    #[test]
    fn test_content_extraction() {
        let ok = response(json!({"choices": [{"message": {"content": "Hello"}}]}));
        assert_eq!(ok.into_content().unwrap(), "Hello");

        let empty = response(json!({"choices": []}));
        assert!(empty.into_content().is_err());
    }

    #[test]
    fn test_tool_arguments() {
        let called = response(json!({"choices": [{"message": {
            "content": null,
            "tool_calls": [{"function": {"name": "echo", "arguments": "{\"value\": 7}"}}]
        }}]}));
        assert_eq!(
            called.tool_arguments::<Echo>("echo").unwrap(),
            Some(Echo { value: 7 })
        );

        let not_called = response(json!({"choices": [{"message": {"content": "no"}}]}));
        assert_eq!(not_called.tool_arguments::<Echo>("echo").unwrap(), None);

        let malformed = response(json!({"choices": [{"message": {
            "tool_calls": [{"function": {"name": "echo", "arguments": "{oops"}}]
        }}]}));
        assert!(malformed.tool_arguments::<Echo>("echo").is_err());
    }

    #[test]
    fn test_client_requires_api_url() {
        let config = ServiceConfig::from_lookup(|_| None).unwrap();
        assert!(LlmClient::new(&config).is_err());
    }

    #[test]
    fn test_message_round_trip_from_transcript() {
        let messages: Vec<ChatMessage> = serde_json::from_str(
            r#"[{"role": "user", "content": "Хочу в Go"}, {"role": "assistant", "content": "Ок"}]"#,
        )
        .unwrap();
        assert_eq!(messages[0], ChatMessage::user("Хочу в Go"));
        assert_eq!(messages[1].role.to_string(), "assistant");
    }
}
