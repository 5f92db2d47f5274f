use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub const DEFAULT_ENDPOINT_URL: &str = "https://f53c-34-16-141-190.ngrok-free.app/generate";
pub const DEFAULT_MODEL_ID: &str = "us.amazon.nova-lite-v1:0";

/// Placeholder in a conversational endpoint URL replaced by the model id.
pub const MODEL_ID_PLACEHOLDER: &str = "{model_id}";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub logs: LogsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,
    #[serde(default = "default_model_id")]
    pub model_id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    RawInference,
    Conversational,
}

impl BackendConfig {
    /// Endpoint with any `{model_id}` placeholder filled in.
    pub fn resolved_endpoint(&self) -> String {
        self.endpoint_url.replace(MODEL_ID_PLACEHOLDER, &self.model_id)
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RawInference => write!(f, "raw_inference"),
            Self::Conversational => write!(f, "conversational"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw_inference" | "raw-inference" | "raw" => Ok(Self::RawInference),
            "conversational" | "converse" => Ok(Self::Conversational),
            other => Err(crate::Error::config(format!(
                "Unknown backend kind: '{}'. Valid kinds: raw_inference, conversational",
                other
            ))),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            logs: LogsConfig::default(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            endpoint_url: default_endpoint_url(),
            model_id: default_model_id(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_endpoint_url() -> String {
    DEFAULT_ENDPOINT_URL.to_string()
}

fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}
