use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use rover_telemetry_lib::SeedSource;
use thiserror::Error;
use warp::http::Uri;

pub const BIND_VAR: &str = "TELEMETRY_BIND";
pub const ORIGIN_VAR: &str = "TELEMETRY_ALLOWED_ORIGIN";
pub const TICK_VAR: &str = "TELEMETRY_TICK_MS";
pub const SEED_VAR: &str = "TELEMETRY_SEED";

const DEFAULT_BIND: &str = "0.0.0.0:8000";
const DEFAULT_ORIGIN: &str = "http://localhost:5173";
const DEFAULT_TICK_MS: u64 = 500;

/// Errors returned while reading server configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value:?}")]
    InvalidAddr { var: &'static str, value: String },

    #[error("{var} must be an origin like http://host:port, got {value:?}")]
    InvalidOrigin { var: &'static str, value: String },

    #[error("{var} must be a positive number of milliseconds, got {value:?}")]
    InvalidTick { var: &'static str, value: String },

    #[error("{var} must be an unsigned 64-bit integer, got {value:?}")]
    InvalidSeed { var: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub bind:           SocketAddr,
    pub allowed_origin: String,
    pub tick:           Duration,
    pub seeds:          SeedSource,
}

impl Config {
    /// Read from the process environment (after `.env` has been loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = lookup(BIND_VAR).unwrap_or_else(|| DEFAULT_BIND.into());
        let bind = bind_raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidAddr { var: BIND_VAR, value: bind_raw.clone() })?;

        let allowed_origin = lookup(ORIGIN_VAR).unwrap_or_else(|| DEFAULT_ORIGIN.into());
        if !is_origin(&allowed_origin) {
            return Err(ConfigError::InvalidOrigin { var: ORIGIN_VAR, value: allowed_origin });
        }

        let tick = match lookup(TICK_VAR) {
            None => Duration::from_millis(DEFAULT_TICK_MS),
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                _ => return Err(ConfigError::InvalidTick { var: TICK_VAR, value: raw }),
            },
        };

        let seeds = match lookup(SEED_VAR) {
            None => SeedSource::Entropy,
            Some(raw) if raw.trim().is_empty() => SeedSource::Entropy,
            Some(raw) => raw
                .trim()
                .parse()
                .map(SeedSource::Fixed)
                .map_err(|_| ConfigError::InvalidSeed { var: SEED_VAR, value: raw })?,
        };

        Ok(Self { bind, allowed_origin, tick, seeds })
    }
}

/// scheme://authority with nothing after it, the shape CORS origins take
fn is_origin(value: &str) -> bool {
    let Some((scheme, rest)) = value.split_once("://") else {
        return false;
    };
    if scheme.is_empty() || rest.is_empty() || rest.contains('/') {
        return false;
    }
    value
        .parse::<Uri>()
        .map(|uri| uri.scheme().is_some() && uri.authority().is_some())
        .unwrap_or(false)
}
