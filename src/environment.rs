// src/environment.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub data_path: PathBuf,
    pub database_path: PathBuf,
    /// Optional lexicon override; the built-in lexicon is used when absent.
    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,
    /// Optional matcher tunables; defaults apply when absent.
    #[serde(default)]
    pub matcher_config_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: EnvironmentConfig,
}

impl EnvironmentConfig {
    /// Load configuration based on environment
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        let base_dir = std::env::current_dir().context("Failed to get current directory")?;
        let config_path = base_dir.join(CONFIG_FILE);
        if !config_path.exists() {
            info!("{} not found, using defaults under {}", CONFIG_FILE, base_dir.display());
            return Ok(Self::defaults(&base_dir));
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        Self::from_yaml(&content, &environment, &base_dir)
    }

    pub fn get_environment() -> String {
        std::env::var("CAREER_MATCH_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    pub fn defaults(base_dir: &Path) -> Self {
        let data_path = base_dir.join("data");
        Self {
            database_path: data_path.join("career_match.db"),
            lexicon_path: Some(data_path.join("lexicon.toml")),
            matcher_config_path: Some(data_path.join("matcher.toml")),
            data_path,
        }
    }

    /// Picks the profile for `environment` and makes its paths absolute
    /// against `base_dir`.
    pub fn from_yaml(content: &str, environment: &str, base_dir: &Path) -> Result<Self> {
        let config_file: ConfigFile =
            serde_yaml::from_str(content).context("Failed to parse config.yaml")?;

        let env_config = match environment {
            "production" => config_file.production,
            _ => config_file.local,
        };

        Ok(Self {
            data_path: Self::resolve_path(base_dir, &env_config.data_path),
            database_path: Self::resolve_path(base_dir, &env_config.database_path),
            lexicon_path: env_config
                .lexicon_path
                .map(|p| Self::resolve_path(base_dir, &p)),
            matcher_config_path: env_config
                .matcher_config_path
                .map(|p| Self::resolve_path(base_dir, &p)),
        })
    }

    fn resolve_path(base_dir: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Ensure the data directory and the database parent exist
    pub async fn ensure_directories(&self) -> Result<()> {
        use crate::core::FsOps;

        FsOps::ensure_dir_exists(&self.data_path).await?;
        if let Some(db_parent) = self.database_path.parent() {
            FsOps::ensure_dir_exists(db_parent).await?;
        }

        info!("All configured directories ensured to exist");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
local:
  data_path: data
  database_path: data/career_match.db
  lexicon_path: data/lexicon.toml
production:
  data_path: /app/data
  database_path: /app/data/career_match.db
"#;

    #[test]
    fn test_local_profile_resolved_against_base() {
        let base = Path::new("/srv/career");
        let config = EnvironmentConfig::from_yaml(YAML, "local", base).unwrap();
        assert_eq!(config.database_path, base.join("data/career_match.db"));
        assert_eq!(config.lexicon_path, Some(base.join("data/lexicon.toml")));
        assert_eq!(config.matcher_config_path, None);
    }

    #[test]
    fn test_production_profile_keeps_absolute_paths() {
        let config = EnvironmentConfig::from_yaml(YAML, "production", Path::new("/tmp")).unwrap();
        assert_eq!(config.data_path, PathBuf::from("/app/data"));
        assert_eq!(config.lexicon_path, None);
    }

    #[test]
    fn test_unknown_profile_falls_back_to_local() {
        let config = EnvironmentConfig::from_yaml(YAML, "staging", Path::new("/x")).unwrap();
        assert_eq!(config.data_path, PathBuf::from("/x/data"));
    }

    #[test]
    fn test_defaults() {
        let config = EnvironmentConfig::defaults(Path::new("/w"));
        assert_eq!(config.database_path, PathBuf::from("/w/data/career_match.db"));
        assert_eq!(config.matcher_config_path, Some(PathBuf::from("/w/data/matcher.toml")));
    }

    #[test]
    fn test_malformed_yaml_rejected() {
        assert!(EnvironmentConfig::from_yaml("local: [", "local", Path::new("/")).is_err());
    }
}
