// src/core/config_manager.rs
//! Unified configuration: environment paths, outbound services and matcher
//! tunables.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::environment::EnvironmentConfig;
use crate::matcher::{default_index, MatcherConfig, SkillIndex, SkillLexicon};

pub const DEFAULT_EXTRACTION_URL: &str = "http://127.0.0.1:5555";
pub const DEFAULT_LLM_MODEL: &str = "Qwen2.5-72B-Instruct-AWQ";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: EnvironmentConfig,
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub extraction_url: String,
    pub llm_api_url: Option<String>,
    pub llm_api_key: Option<String>,
    pub llm_model: String,
    pub timeout_seconds: u64,
}

impl ServiceConfig {
    /// Builds the service section from a variable lookup; `load_service`
    /// passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_seconds = match lookup("SERVICE_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                anyhow::anyhow!("SERVICE_TIMEOUT_SECS must be a number of seconds, got {}", raw)
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            extraction_url: lookup("EXTRACTION_SERVICE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_EXTRACTION_URL.to_string()),
            llm_api_url: lookup("LLM_API_URL").map(|url| url.trim_end_matches('/').to_string()),
            llm_api_key: lookup("LLM_API_KEY").filter(|key| !key.trim().is_empty()),
            llm_model: lookup("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            timeout_seconds,
        })
    }
}

impl ConfigManager {
    /// Load all configurations
    pub fn load() -> Result<Self> {
        let environment = EnvironmentConfig::load()?;
        let service = Self::load_service()?;
        Ok(Self {
            environment,
            service,
        })
    }

    /// Load service configuration
    fn load_service() -> Result<ServiceConfig> {
        ServiceConfig::from_lookup(|name| std::env::var(name).ok())
    }

    /// Matcher tunables from the configured TOML file, or the defaults when
    /// no file is present.
    pub async fn load_matcher_config(&self) -> Result<MatcherConfig> {
        match existing(self.environment.matcher_config_path.as_deref()) {
            Some(path) => {
                info!("Loading matcher configuration from {}", path.display());
                MatcherConfig::load(path).await
            }
            None => Ok(MatcherConfig::default()),
        }
    }

    /// Skill index over the configured lexicon file, or the shared built-in
    /// index when no file is present.
    pub async fn load_skill_index(&self) -> Result<Arc<SkillIndex>> {
        match existing(self.environment.lexicon_path.as_deref()) {
            Some(path) => {
                let lexicon = SkillLexicon::load(path).await?;
                info!(
                    "Loaded skill lexicon with {} entries from {}",
                    lexicon.len(),
                    path.display()
                );
                Ok(Arc::new(SkillIndex::build(&lexicon)))
            }
            None => Ok(default_index()),
        }
    }

    /// Ensure all required directories exist
    pub async fn ensure_directories(&self) -> Result<()> {
        self.environment.ensure_directories().await
    }
}

fn existing(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| p.exists())
}
