//! Server settings read from the environment at startup.
//!
//! Every variable is optional. A missing one is logged and replaced by its
//! default; a present but unparsable one stops the server.

use std::{env, fmt::Display, str::FromStr};

use log::{info, warn};
use thiserror::Error;

/// The deployed Apps Script web app that serves the spreadsheet rows.
pub const DEFAULT_UPSTREAM_URL: &str = "https://script.google.com/macros/s/AKfycbwBlMfq130W_WlhmE0x09IRThNFRGAPh90h-lV3KhpAdxdX5vtSKIrZeBx1nH0P3UxD/exec";

#[derive(Error, Debug)]
#[error("Invalid {key} value {value:?}: {reason}")]
pub struct ConfigError {
    key: &'static str,
    value: String,
    reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment `{other}`")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Source the proxy fetches from; also the key its cache entry is bound to.
    pub upstream_url: String,
    /// `Development` adds the error chain to failed `/api/messages` responses.
    pub environment: Environment,
    /// Open the gallery in the default browser once the server is up.
    pub open_browser: bool,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            host: try_load("GALLERY_HOST", "127.0.0.1")?,
            port: try_load("GALLERY_PORT", "8080")?,
            upstream_url: try_load("GALLERY_UPSTREAM_URL", DEFAULT_UPSTREAM_URL)?,
            environment: try_load("GALLERY_ENV", "production")?,
            open_browser: try_load("GALLERY_OPEN_BROWSER", "false")?,
        })
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError {
            key,
            value: value.clone(),
            reason: e.to_string(),
        }
    })
}
