// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Collector endpoint configuration for gridq.
//!
//! The pool address is resolved in precedence order: command line
//! (positional argument or --pool), the GRIDQ_POOL environment
//! variable, the optional ~/.gridq/config.json file, then built-in
//! defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

use crate::error::Error;

/// Fallback collector host when nothing is configured.
pub const DEFAULT_HOST: &str = "localhost";

/// Fallback collector port.
pub const DEFAULT_PORT: u16 = 9618;

/// Environment variable supplying a default collector address.
pub const POOL_ENV: &str = "GRIDQ_POOL";

/// Get the base gridq directory (~/.gridq/)
pub fn base_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|p| p.join(".gridq"))
        .context("Could not determine home directory")
}

/// Optional on-disk configuration (~/.gridq/config.json)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Default collector address, as HOST[:PORT]
    #[serde(default)]
    pub pool: Option<String>,
}

impl Config {
    /// Load config from disk, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Get the config file path (~/.gridq/config.json)
    pub fn config_path() -> Result<PathBuf> {
        Ok(base_dir()?.join("config.json"))
    }
}

/// A resolved collector endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    /// Parse a HOST[:PORT] spec; a bare host gets the default port.
    pub fn parse(address: &str) -> std::result::Result<Self, Error> {
        let bad = || Error::BadAddress {
            address: address.to_string(),
        };

        let spec = address.trim();
        if spec.is_empty() {
            return Err(bad());
        }

        match spec.rsplit_once(':') {
            Some((host, port)) => {
                if host.is_empty() {
                    return Err(bad());
                }
                let port: u16 = port.parse().map_err(|_| bad())?;
                Ok(Self {
                    host: host.to_string(),
                    port,
                })
            }
            None => Ok(Self {
                host: spec.to_string(),
                port: DEFAULT_PORT,
            }),
        }
    }

    /// Base URL for collector requests.
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Resolve the collector endpoint from an explicit override, the
/// environment, the config file, and built-in defaults, in that order.
pub fn resolve_endpoint(explicit: Option<&str>) -> Result<Endpoint> {
    if let Some(address) = explicit {
        return Ok(Endpoint::parse(address)?);
    }

    if let Ok(address) = std::env::var(POOL_ENV) {
        return Ok(Endpoint::parse(&address)?);
    }

    let config = Config::load().unwrap_or_else(|e| {
        warn!("ignoring unreadable config: {e:#}");
        Config::default()
    });
    if let Some(address) = &config.pool {
        return Ok(Endpoint::parse(address)?);
    }

    Ok(Endpoint {
        host: DEFAULT_HOST.to_string(),
        port: DEFAULT_PORT,
    })
}
