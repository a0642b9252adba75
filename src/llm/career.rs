// src/llm/career.rs
//! Conversational career guidance with a bounded per-user history.

use anyhow::Result;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::client::{ChatMessage, LlmClient, Role};
use super::prompts::CAREER_SYSTEM_PROMPT;
use crate::app_log;

pub const DEFAULT_MAX_HISTORY: usize = 10;

const CHAT_TEMPERATURE: f32 = 0.1;
const CHAT_MAX_TOKENS: u32 = 4000;

/// In-memory dialog store keeping the most recent messages per user
#[derive(Debug)]
pub struct DialogHistory {
    dialogs: RwLock<HashMap<Uuid, Vec<ChatMessage>>>,
    max_length: usize,
}

impl DialogHistory {
    pub fn new(max_length: usize) -> Self {
        Self {
            dialogs: RwLock::new(HashMap::new()),
            max_length: max_length.max(1),
        }
    }

    pub async fn push(&self, user_id: Uuid, role: Role, content: &str) {
        let mut dialogs = self.dialogs.write().await;
        let history = dialogs.entry(user_id).or_default();
        history.push(ChatMessage::new(role, content));
        if history.len() > self.max_length {
            let excess = history.len() - self.max_length;
            history.drain(..excess);
        }
    }

    pub async fn get(&self, user_id: Uuid) -> Vec<ChatMessage> {
        self.dialogs
            .read()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn clear(&self, user_id: Uuid) {
        self.dialogs.write().await.remove(&user_id);
    }
}

impl Default for DialogHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

pub struct CareerChat {
    client: LlmClient,
    history: DialogHistory,
}

impl CareerChat {
    pub fn new(client: LlmClient, max_history_length: usize) -> Self {
        Self {
            client,
            history: DialogHistory::new(max_history_length),
        }
    }

    /// Records the message, asks the model and records its reply
    pub async fn process_message(&self, user_id: Uuid, message: &str) -> Result<String> {
        self.history.push(user_id, Role::User, message).await;

        let mut messages = vec![ChatMessage::system(CAREER_SYSTEM_PROMPT)];
        messages.extend(self.history.get(user_id).await);

        let reply = self
            .client
            .chat(&messages, CHAT_TEMPERATURE, Some(CHAT_MAX_TOKENS))
            .await?;
        app_log!(debug, "Career chat reply for {}: {} chars", user_id, reply.len());

        self.history.push(user_id, Role::Assistant, &reply).await;
        Ok(reply)
    }

    pub async fn history(&self, user_id: Uuid) -> Vec<ChatMessage> {
        self.history.get(user_id).await
    }

    pub async fn clear_history(&self, user_id: Uuid) {
        self.history.clear(user_id).await;
    }
}
