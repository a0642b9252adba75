// src/types/response.rs
use serde::{Deserialize, Serialize};

// ===== Service Response Types =====

/// Body returned by the document extraction service.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractionResponse {
    pub text: String,
    #[serde(default)]
    pub pages: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
}

impl ExtractionResponse {
    pub fn is_failure(&self) -> bool {
        matches!(self.status.as_deref(), Some(status) if status != "success" && status != "ok")
    }
}
