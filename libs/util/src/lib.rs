use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use serde::de::DeserializeOwned;
use toml::{map::Map, Value};

pub fn workspace_dir() -> anyhow::Result<PathBuf> {
    let output = std::process::Command::new(env!("CARGO"))
        .arg("locate-project")
        .arg("--workspace")
        .arg("--message-format=plain")
        .output()
        .context("failed to run cargo locate-project")?
        .stdout;
    let cargo_path = std::str::from_utf8(&output)
        .context("cargo locate-project printed invalid utf-8")?;
    let dir = Path::new(cargo_path.trim())
        .parent()
        .ok_or_else(|| anyhow!("workspace manifest has no parent directory"))?;

    Ok(dir.to_path_buf())
}

pub fn load_toml<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    toml::from_str::<T>(&text)
        .with_context(|| format!("failed to parse {}", path.display()))
}

pub fn load_config<T: DeserializeOwned>(config_name: &str) -> anyhow::Result<T> {
    load_toml(&workspace_dir()?.join(config_name))
}

pub fn load_secrets(file_name: &str) -> anyhow::Result<Map<String, Value>> {
    load_toml(&workspace_dir()?.join(file_name))
}

/// Reads a secret that must be present and non-blank.
pub fn require(secrets: &Map<String, Value>, key: &str) -> anyhow::Result<String> {
    let Some(value) = secrets.get(key) else {
        bail!("{} was not found", key);
    };
    let Some(value) = value.as_str() else {
        bail!("{} must be a string", key);
    };
    if value.trim().is_empty() {
        bail!("{} must not be empty", key);
    }

    Ok(value.to_string())
}
