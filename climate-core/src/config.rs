use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::risk::TargetGroup;

/// Environment variable that overrides the stored text-generation API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Placeholder shipped in sample env files; treated as "no key".
const PLACEHOLDER_API_KEY: &str = "your_openai_api_key_here";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for the optional chat-completion explainer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextGenerationConfig {
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for TextGenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout(),
        }
    }
}

impl TextGenerationConfig {
    /// The usable API key, if any. Empty strings and the sample placeholder don't count.
    pub fn usable_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// default_target = "elderly"
///
/// [text_generation]
/// api_key = "..."
/// model = "gpt-3.5-turbo"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Target group applied when a command doesn't name one.
    pub default_target: Option<String>,

    #[serde(default)]
    pub text_generation: TextGenerationConfig,
}

impl Config {
    /// Return the default target as a strongly-typed TargetGroup, if one is set.
    pub fn default_target_group(&self) -> Result<Option<TargetGroup>> {
        self.default_target
            .as_deref()
            .map(TargetGroup::try_from)
            .transpose()
            .context("Invalid `default_target` in config file")
    }

    pub fn set_default_target(&mut self, target: TargetGroup) {
        self.default_target = Some(target.as_str().to_string());
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.text_generation.api_key = Some(api_key);
    }

    /// Replace the stored key with the environment override when it is set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_api_key_override(std::env::var(API_KEY_ENV).ok());
    }

    fn apply_api_key_override(&mut self, value: Option<String>) {
        if let Some(key) = value.filter(|k| !k.trim().is_empty()) {
            self.text_generation.api_key = Some(key);
        }
    }

    pub fn is_text_generation_configured(&self) -> bool {
        self.text_generation.usable_api_key().is_some()
    }

    /// Load config from disk (or defaults on first run) and apply env overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    /// Load config from a specific file, returning defaults when it doesn't exist.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("kr", "gyeonggi-climate", "climate-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
