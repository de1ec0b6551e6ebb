// src/core/config_manager.rs
//! Process-wide configuration, built once at startup and handed to the service

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

use crate::chat::scripted::KeywordRule;

pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
pub const DEFAULT_GATEWAY_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "openai/gpt-3.5-turbo";
pub const DEFAULT_PORT: u16 = 8000;

/// Which pipeline answers `/api/chat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Forward to the gateway, falling back to canned replies on failure.
    #[default]
    Remote,
    /// Never call the gateway; answer from the keyword table.
    #[serde(alias = "scripted", alias = "offline")]
    ScriptedFallback,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Remote => "remote",
            Strategy::ScriptedFallback => "scripted",
        }
    }
}

impl FromStr for Strategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "remote" => Ok(Strategy::Remote),
            "scripted" | "scripted_fallback" | "offline" => Ok(Strategy::ScriptedFallback),
            other => anyhow::bail!("Unknown chat strategy: {}. Use remote or scripted", other),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
    pub site_url: String,
    pub site_name: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_GATEWAY_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            timeout_seconds: 30,
            site_url: "http://localhost:3000".to_string(),
            site_name: "Hiring Assistant".to_string(),
        }
    }
}

impl GatewayConfig {
    /// A blank key counts as no key.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }
}

// Keep the key out of logs.
impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_key", &self.api_key().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("site_url", &self.site_url)
            .field("site_name", &self.site_name)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Fixed seed for reproducible fallback selection.
    pub seed: Option<u64>,
    /// Replaces the built-in pool when non-empty.
    pub replies: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptedConfig {
    /// Replaces the built-in keyword table when non-empty. Order matters.
    pub rules: Vec<KeywordRule>,
    pub default_reply: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub strategy: Strategy,
    pub port: u16,
    pub system_prompt: Option<String>,
    pub gateway: GatewayConfig,
    pub fallback: FallbackConfig,
    pub scripted: ScriptedConfig,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            port: DEFAULT_PORT,
            system_prompt: None,
            gateway: GatewayConfig::default(),
            fallback: FallbackConfig::default(),
            scripted: ScriptedConfig::default(),
        }
    }
}

pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration: defaults, then the YAML file, then environment overrides.
    ///
    /// An explicitly requested file must exist; the default `config.yaml` is optional.
    pub fn load(config_path: Option<&Path>) -> Result<ChatConfig> {
        let (path, required) = match config_path {
            Some(path) => (path.to_path_buf(), true),
            None => match std::env::var("HIRING_CHAT_CONFIG") {
                Ok(path) => (PathBuf::from(path), true),
                Err(_) => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
            },
        };

        let config = Self::load_file(&path, required)?;
        let config = Self::apply_overrides(config, |key| std::env::var(key).ok())?;

        info!(
            "Configuration loaded: strategy={}, gateway={}, api_key_configured={}",
            config.strategy.as_str(),
            config.gateway.base_url,
            config.gateway.has_api_key()
        );
        if config.strategy == Strategy::Remote && !config.gateway.has_api_key() {
            warn!("No gateway API key configured, every remote reply will be a fallback");
        }

        Ok(config)
    }

    pub fn load_file(path: &Path, required: bool) -> Result<ChatConfig> {
        if !path.exists() {
            if required {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            info!("No {} found, using defaults", path.display());
            return Ok(ChatConfig::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse_yaml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse_yaml(content: &str) -> Result<ChatConfig> {
        if content.trim().is_empty() {
            return Ok(ChatConfig::default());
        }
        serde_yaml::from_str(content).context("Invalid configuration YAML")
    }

    /// Apply environment-style overrides through `lookup`, so tests need not touch the real environment.
    pub fn apply_overrides<F>(mut config: ChatConfig, lookup: F) -> Result<ChatConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GATEWAY_API_KEY").or_else(|| lookup("OPENROUTER_API_KEY")) {
            config.gateway.api_key = Some(key);
        }
        if let Some(url) = lookup("GATEWAY_BASE_URL") {
            config.gateway.base_url = url;
        }
        if let Some(model) = lookup("GATEWAY_MODEL") {
            config.gateway.model = model;
        }
        if let Some(secs) = lookup("GATEWAY_TIMEOUT_SECS") {
            config.gateway.timeout_seconds = secs
                .parse()
                .with_context(|| format!("GATEWAY_TIMEOUT_SECS must be a number, got {}", secs))?;
        }
        if let Some(site_url) = lookup("SITE_URL") {
            config.gateway.site_url = site_url;
        }
        if let Some(site_name) = lookup("SITE_NAME") {
            config.gateway.site_name = site_name;
        }
        if let Some(strategy) = lookup("CHAT_STRATEGY") {
            config.strategy = strategy.parse()?;
        }
        if let Some(seed) = lookup("FALLBACK_SEED") {
            config.fallback.seed = Some(
                seed.parse()
                    .with_context(|| format!("FALLBACK_SEED must be a number, got {}", seed))?,
            );
        }
        if let Some(port) = lookup("PORT").or_else(|| lookup("ROCKET_PORT")) {
            config.port = port
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid port number, got {}", port))?;
        }

        if config.gateway.timeout_seconds == 0 {
            anyhow::bail!("Gateway timeout must be at least one second");
        }

        Ok(config)
    }
}
