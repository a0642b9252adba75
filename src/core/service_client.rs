// src/core/service_client.rs
//! Client for the document extraction service (PDF/DOCX to plain text).

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use std::time::Duration;

use crate::app_log;
use crate::parsing::clean_text;
use crate::types::response::ExtractionResponse;
use crate::utils::document_content_type;

const EXTRACT_ENDPOINT: &str = "/extract";

pub struct ExtractionClient {
    client: reqwest::Client,
    base_url: String,
}

impl ExtractionClient {
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, EXTRACT_ENDPOINT)
    }

    /// Sends the document and returns its cleaned text.
    pub async fn extract_text(&self, content: Vec<u8>, file_name: &str) -> Result<String> {
        if content.is_empty() {
            anyhow::bail!("File is empty: {}", file_name);
        }
        let content_type = document_content_type(file_name)?;
        let url = self.endpoint();

        let form = Form::new().part(
            "file",
            Part::bytes(content)
                .file_name(file_name.to_string())
                .mime_str(content_type)
                .context("Failed to create multipart")?,
        );

        app_log!(info, "Calling extraction service: {}", url);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .context("HTTP request failed")?;

        let status = response.status();
        app_log!(trace, "Response status: {}", status);

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            app_log!(error, "Extraction service error response: {}", error_text);
            anyhow::bail!("Service returned error status {}: {}", status, error_text)
        }

        let body: ExtractionResponse = response
            .json()
            .await
            .context("Failed to parse extraction response")?;
        if body.is_failure() {
            anyhow::bail!(
                "Extraction failed: {}",
                body.status.unwrap_or_else(|| "unknown".to_string())
            );
        }

        let text = clean_text(&body.text);
        if text.is_empty() {
            anyhow::bail!("No text could be extracted from {}", file_name);
        }
        app_log!(debug, "Extracted {} characters from {}", text.chars().count(), file_name);
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = ExtractionClient::new("http://127.0.0.1:5555/", 5).unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:5555/extract");
    }

    #[tokio::test]
    async fn test_rejects_before_any_request() {
        let client = ExtractionClient::new("http://127.0.0.1:9", 1).unwrap();
        let empty = client.extract_text(Vec::new(), "vacancy.pdf").await;
        assert!(empty.unwrap_err().to_string().contains("empty"));
        let wrong_type = client.extract_text(b"text".to_vec(), "vacancy.txt").await;
        assert!(wrong_type.unwrap_err().to_string().contains("Unsupported"));
    }
}
