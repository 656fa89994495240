use crate::models::settings::Settings;
use anyhow::{anyhow, Context, Result};

/// Parse and validate a settings document
pub fn settings_from_toml(content: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(content).context("Failed to parse settings")?;
    settings
        .validate()
        .map_err(|e| anyhow!("Invalid settings: {}", e))?;
    Ok(settings)
}

pub fn settings_to_toml(settings: &Settings) -> Result<String> {
    toml::to_string_pretty(settings).context("Failed to serialize settings")
}
