mod types;

pub use types::*;

use crate::{Error, Result};
use std::{env, io::ErrorKind};
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Resolves configuration once at start-up: the YAML file named by
/// `CONFIG_PATH` (or `config.yaml`), then environment overrides.
pub async fn load() -> Result<Config> {
    let explicit_path = env::var("CONFIG_PATH").ok();
    let config_path = explicit_path
        .clone()
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    debug!("Loading configuration from: {}", config_path);

    let mut config = match load_file(&config_path).await {
        Ok(config) => config,
        // Only the implicit default file is optional.
        Err(Error::Io(e)) if e.kind() == ErrorKind::NotFound && explicit_path.is_none() => {
            debug!("No configuration file found, using built-in defaults");
            Config::default()
        }
        Err(e) => return Err(e),
    };

    apply_env_overrides(&mut config, |key| env::var(key).ok())?;

    Ok(config)
}

pub async fn load_file(path: &str) -> Result<Config> {
    let config_str = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&config_str)?;
    Ok(config)
}

/// Applies `EXTERNAL_API_URL`, `BACKEND_KIND`, `MODEL_ID`, `HOST` and `PORT`
/// from `lookup` on top of `config`.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("EXTERNAL_API_URL") {
        config.backend.endpoint_url = url;
    }
    if let Some(kind) = lookup("BACKEND_KIND") {
        config.backend.kind = kind.parse()?;
    }
    if let Some(model_id) = lookup("MODEL_ID") {
        config.backend.model_id = model_id;
    }
    if let Some(host) = lookup("HOST") {
        config.server.host = host;
    }
    if let Some(port) = lookup("PORT") {
        config.server.port = port
            .parse()
            .map_err(|_| Error::config(format!("Invalid PORT value: '{}'", port)))?;
    }
    Ok(())
}
