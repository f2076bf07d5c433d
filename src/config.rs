use crate::model::ModelPaths;
use crate::report::RangePolicy;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_RANDOM_FOREST_MODEL: &str = "models/random_forest.json";
pub const DEFAULT_XGBOOST_MODEL: &str = "models/xgboost.json";

/// Runtime settings, read from the environment with local defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub models: ModelPaths,
    /// `APP_LOG_LEVEL`; when unset the subscriber falls back to `RUST_LOG`.
    pub log_level: Option<String>,
    pub range_policy: RangePolicy,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("APP_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = match lookup("APP_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => 8080,
        };

        let models = ModelPaths {
            random_forest: PathBuf::from(
                lookup("RANDOM_FOREST_MODEL")
                    .unwrap_or_else(|| DEFAULT_RANDOM_FOREST_MODEL.to_string()),
            ),
            xgboost: PathBuf::from(
                lookup("XGBOOST_MODEL").unwrap_or_else(|| DEFAULT_XGBOOST_MODEL.to_string()),
            ),
        };

        let log_level = lookup("APP_LOG_LEVEL").filter(|level| !level.trim().is_empty());

        let range_policy = match lookup("STRICT_INPUT_RANGES") {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => RangePolicy::Reject,
                "0" | "false" | "no" | "off" | "" => RangePolicy::PassThrough,
                _ => return Err(ConfigError::InvalidFlag("STRICT_INPUT_RANGES", raw)),
            },
            None => RangePolicy::PassThrough,
        };

        Ok(Self {
            host,
            port,
            models,
            log_level,
            range_policy,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost {
                host: self.host.clone(),
                source,
            })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a valid u16, got '{0}'")]
    InvalidPort(String),
    #[error("APP_HOST '{host}' must be an IPv4 or IPv6 address")]
    InvalidHost {
        host: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("{0} must be true or false, got '{1}'")]
    InvalidFlag(&'static str, String),
}
