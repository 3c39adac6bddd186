use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{FrontdeskError, Result};

/// Top-level configuration for the Frontdesk application.
///
/// Loaded from `~/.frontdesk/config.toml` by default. Each section
/// corresponds to a bounded context or cross-cutting concern. Values may be
/// overridden by environment variables and CLI flags in the binary crate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrontdeskConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub escalation: EscalationConfig,
    #[serde(default)]
    pub agent: AgentConfig,
}

impl FrontdeskConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: FrontdeskConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| FrontdeskError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Bind address for the HTTP API.
    pub host: String,
    /// API server port.
    pub port: u16,
    /// Environment name: development, staging, production.
    pub environment: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            environment: "development".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Document store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database path for the document store.
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "~/.frontdesk/frontdesk.db".to_string(),
        }
    }
}

/// Text-completion capability settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Chat-completions endpoint URL (OpenAI-compatible).
    pub url: String,
    /// API key; usually supplied via environment variable.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Request timeout in seconds. Expired calls are treated as failed,
    /// not retried.
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            url: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: String::new(),
            model: "gpt-4-turbo".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Realtime channel credentials.
///
/// Consumed by the external voice/realtime transport adapter, which
/// delivers text turns into the conversation agent; carried here so a
/// single config file covers the whole deployment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Transport server URL.
    pub url: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Help request lifecycle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationConfig {
    /// Seconds a request stays pending before the sweep times it out.
    pub timeout_secs: u64,
    /// Seconds between timeout sweeps.
    pub sweep_interval_secs: u64,
    /// Supervisor notification retry budget. Recognized but not yet used
    /// by the dispatcher, which is single-attempt fire-and-forget.
    pub notification_retry: u32,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 3600,
            sweep_interval_secs: 60,
            notification_retry: 3,
        }
    }
}

/// Conversation agent settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Business name injected into the system prompt.
    pub business_name: String,
    /// Maximum knowledge entries embedded into the prompt context.
    pub context_entries: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            business_name: "Glamour Haven Salon".to_string(),
            context_entries: 5,
        }
    }
}
