use std::path::{Path, PathBuf};

use thiserror::Error;

use byline_core::Rules;

/// Store configuration from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// JSON file overriding the default rule set.
    pub rules_path: Option<PathBuf>,
}

impl Config {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            rules_path: None,
        }
    }

    pub fn with_rules_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.rules_path = Some(path.into());
        self
    }

    /// Load configuration from environment variables.
    /// DATABASE_URL defaults to "sqlite://byline.db"; BYLINE_RULES is optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://byline.db".to_string());
        if database_url.trim().is_empty() {
            return Err(ConfigError::Invalid("DATABASE_URL", "must not be empty"));
        }

        let rules_path = match std::env::var("BYLINE_RULES") {
            Ok(path) if path.trim().is_empty() => {
                return Err(ConfigError::Invalid("BYLINE_RULES", "must not be empty"))
            }
            Ok(path) => Some(PathBuf::from(path)),
            Err(_) => None,
        };

        Ok(Config {
            database_url,
            rules_path,
        })
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, &'static str),

    #[error("Failed to read rules file {path}: {source}")]
    ReadRules {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse rules file {path}: {source}")]
    ParseRules {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Load the rule set from a JSON file, or the default rules when no path is given.
/// Keys missing from the file keep their default values.
pub fn load_rules(path: Option<&Path>) -> Result<Rules, ConfigError> {
    let Some(path) = path else {
        tracing::info!("Using default validation rules");
        return Ok(Rules::default());
    };

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadRules {
        path: path.to_path_buf(),
        source,
    })?;
    let rules: Rules = serde_json::from_str(&content).map_err(|source| ConfigError::ParseRules {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        "Loaded validation rules from {}: {} categories, {} clickbait phrases",
        path.display(),
        rules.post.categories.len(),
        rules.post.clickbait_phrases.len()
    );
    Ok(rules)
}
