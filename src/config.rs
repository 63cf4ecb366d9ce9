// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::{DEFAULT_ENDPOINTS, DEFAULT_TIMEOUT};
use crate::rate_store::DEFAULT_TTL;

/// Smallest accepted refresh interval
pub const MIN_TTL_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rate endpoints tried in order; `{base}` is replaced by the base currency
    pub endpoints: Vec<String>,
    pub ttl_secs: u64,
    pub timeout_secs: u64,
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoints: DEFAULT_ENDPOINTS.iter().map(|e| e.to_string()).collect(),
            ttl_secs: DEFAULT_TTL.as_secs(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            output_dir: PathBuf::from("output"),
        }
    }
}

impl Config {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Reject settings that would hammer the rate endpoints
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.ttl_secs < MIN_TTL_SECS {
            bail!(
                "ttl_secs must be at least {} seconds, got {}",
                MIN_TTL_SECS,
                self.ttl_secs
            );
        }
        if self.endpoints.is_empty() {
            bail!("at least one rate endpoint is required");
        }
        Ok(())
    }

    /// Apply `FX_RATE_ENDPOINTS`, `FX_TTL_SECS` and `FX_TIMEOUT_SECS` overrides
    pub fn apply_env(&mut self) -> anyhow::Result<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides read through `lookup`, then validate the result
    pub fn apply_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoints) = lookup("FX_RATE_ENDPOINTS") {
            let endpoints: Vec<String> = endpoints
                .split(',')
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty())
                .collect();
            if !endpoints.is_empty() {
                self.endpoints = endpoints;
            }
        }
        if let Some(ttl) = lookup("FX_TTL_SECS") {
            self.ttl_secs = ttl
                .trim()
                .parse()
                .with_context(|| format!("FX_TTL_SECS is not a number: {}", ttl))?;
        }
        if let Some(timeout) = lookup("FX_TIMEOUT_SECS") {
            self.timeout_secs = timeout
                .trim()
                .parse()
                .with_context(|| format!("FX_TIMEOUT_SECS is not a number: {}", timeout))?;
        }
        self.validate()
    }
}

fn get_config_path() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("config.toml");
    path
}

pub fn load_config_from(path: &Path) -> anyhow::Result<Config> {
    let config_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: Config = toml::from_str(&config_str)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    Ok(config)
}

/// Load `config.toml` (defaults when absent) and apply environment overrides
pub fn load_config() -> anyhow::Result<Config> {
    let path = get_config_path();
    let mut config = if path.exists() {
        load_config_from(&path)?
    } else {
        Config::default()
    };
    config.apply_env()?;
    Ok(config)
}

pub fn save_config(config: &Config, path: &Path) -> anyhow::Result<()> {
    let config_str = toml::to_string_pretty(config)?;
    fs::write(path, config_str)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.endpoints.len(), DEFAULT_ENDPOINTS.len());
        assert_eq!(config.ttl(), Duration::from_secs(3600));
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_partial_file_keeps_defaults() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "ttl_secs = 120\n")?;

        let config = load_config_from(&path)?;
        assert_eq!(config.ttl_secs, 120);
        assert_eq!(config.endpoints, Config::default().endpoints);
        Ok(())
    }

    #[test]
    fn test_save_and_load() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        let config = Config {
            endpoints: vec!["http://localhost:8080/rates/{base}".to_string()],
            ttl_secs: 60,
            timeout_secs: 2,
            output_dir: PathBuf::from("exports"),
        };

        save_config(&config, &path)?;
        assert_eq!(load_config_from(&path)?, config);
        Ok(())
    }

    #[test]
    fn test_zero_ttl_is_rejected() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "ttl_secs = 0\n")?;
        assert!(load_config_from(&path).is_err());

        let mut config = Config::default();
        let err = config
            .apply_overrides(|key| (key == "FX_TTL_SECS").then(|| "0".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("ttl_secs"));

        let mut config = Config::default();
        config.apply_overrides(|key| (key == "FX_TTL_SECS").then(|| "60".to_string()))?;
        assert_eq!(config.ttl(), Duration::from_secs(MIN_TTL_SECS));
        Ok(())
    }

    #[test]
    fn test_env_overrides() -> anyhow::Result<()> {
        let vars = HashMap::from([
            (
                "FX_RATE_ENDPOINTS",
                " http://a.test/{base} ,, http://b.test/latest/{base}",
            ),
            ("FX_TTL_SECS", " 900 "),
            ("FX_TIMEOUT_SECS", "3"),
        ]);
        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()))?;

        assert_eq!(
            config.endpoints,
            vec!["http://a.test/{base}", "http://b.test/latest/{base}"]
        );
        assert_eq!(config.ttl(), Duration::from_secs(900));
        assert_eq!(config.timeout(), Duration::from_secs(3));
        Ok(())
    }

    #[test]
    fn test_blank_endpoint_override_keeps_defaults() -> anyhow::Result<()> {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "FX_RATE_ENDPOINTS").then(|| " , ".to_string()))?;
        assert_eq!(config, Config::default());

        let mut config = Config::default();
        config.apply_overrides(|_| None)?;
        assert_eq!(config, Config::default());
        Ok(())
    }

    #[test]
    fn test_unparseable_overrides() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(|key| (key == "FX_TTL_SECS").then(|| "an hour".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("FX_TTL_SECS"));

        let mut config = Config::default();
        let err = config
            .apply_overrides(|key| (key == "FX_TIMEOUT_SECS").then(|| "-1".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("FX_TIMEOUT_SECS"));
    }

    #[test]
    fn test_invalid_file() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "ttl_secs = \"soon\"\n")?;
        assert!(load_config_from(&path).is_err());
        Ok(())
    }
}
