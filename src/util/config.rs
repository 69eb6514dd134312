// src/util/config.rs
//! Chat configuration: optional YAML file, then environment overrides.
//! The API key is never read from the file, only from the environment.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{bail, WrapErr};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ChatError;
use crate::modules::chat::GenerationParams;

pub const DEFAULT_CONFIG_FILE: &str = "talksy.yml";

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant named Talksy. Always answer in clean \
Markdown format with headings, bullet points, and bold keywords for readability.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// OpenAI-compatible base URL; `/chat/completions` is appended.
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub system_prompt: String,
    /// Name of the environment variable holding the bearer credential.
    pub api_key_env: String,
    pub log_dir: String,
    /// Prompts offered on the welcome screen.
    pub suggestions: Vec<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        let params = GenerationParams::default();
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: params.model,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            log_dir: "./logs".to_string(),
            suggestions: vec![
                "What can you help me with?".to_string(),
                "Explain Rust ownership in three bullet points.".to_string(),
                "Give me a checklist for debugging a failing CI pipeline.".to_string(),
            ],
        }
    }
}

impl ChatConfig {
    /// Load from the process environment and an optional file.
    pub fn load(cli_path: Option<PathBuf>) -> color_eyre::Result<Self> {
        let env = |key: &str| std::env::var(key).ok();
        let mut config = match resolve_path(cli_path, env) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(env);
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> color_eyre::Result<Self> {
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("reading config {}", path.display()))?;
        let config: ChatConfig = serde_yaml::from_str(&content)
            .wrap_err_with(|| format!("parsing config {}", path.display()))?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(url) = env("TALKSY_BASE_URL").filter(|v| !v.is_empty()) {
            self.base_url = url;
        }
        if let Some(model) = env("TALKSY_MODEL").filter(|v| !v.is_empty()) {
            self.model = model;
        }
    }

    pub fn validate(&self) -> color_eyre::Result<()> {
        if self.base_url.trim().is_empty() {
            bail!("base_url must not be empty");
        }
        if self.model.trim().is_empty() {
            bail!("model must not be empty");
        }
        if self.max_tokens == 0 {
            bail!("max_tokens must be greater than zero");
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            bail!("temperature must be between 0.0 and 2.0, got {}", self.temperature);
        }
        Ok(())
    }

    pub fn api_key(&self) -> crate::error::Result<String> {
        self.api_key_from(|key| std::env::var(key).ok())
    }

    pub fn api_key_from(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> crate::error::Result<String> {
        env(&self.api_key_env)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                ChatError::Config(format!("environment variable {} is not set", self.api_key_env))
            })
    }

    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

/// CLI argument first, then `TALKSY_CONFIG`, then `./talksy.yml` if it exists.
fn resolve_path(
    cli_path: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> Option<PathBuf> {
    cli_path
        .or_else(|| env("TALKSY_CONFIG").filter(|v| !v.is_empty()).map(PathBuf::from))
        .or_else(|| {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.exists().then_some(default)
        })
}
