//! Process configuration, read from the environment once at startup.

use std::env;
use std::net::SocketAddr;

use chrono::Duration;
use thiserror::Error;

use ems_auth::{KeyError, SigningKey};

pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("EMS_JWT_SECRET is not usable: {0}")]
    BadSecret(#[from] KeyError),
    #[error("EMS_TOKEN_TTL_SECS must be a positive number of seconds")]
    BadTtl,
    #[error("EMS_BIND_ADDR must be host:port")]
    BadBindAddr,
}

#[derive(Debug)]
pub struct Config {
    pub signing_key: SigningKey,
    pub token_validity: Duration,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let signing_key = match env::var("EMS_JWT_SECRET") {
            Ok(encoded) => {
                let key = SigningKey::from_base64(&encoded)?;
                tracing::info!("signing key loaded from EMS_JWT_SECRET");
                key
            }
            Err(_) => {
                tracing::warn!(
                    "EMS_JWT_SECRET not set; generated an ephemeral signing key, \
                     issued tokens will not survive a restart"
                );
                SigningKey::generate()
            }
        };

        let token_validity = match env::var("EMS_TOKEN_TTL_SECS") {
            Ok(raw) => {
                let secs: i64 = raw.parse().map_err(|_| ConfigError::BadTtl)?;
                if secs <= 0 {
                    return Err(ConfigError::BadTtl);
                }
                Duration::seconds(secs)
            }
            Err(_) => Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
        };

        let bind_addr = env::var("EMS_BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .map_err(|_| ConfigError::BadBindAddr)?;

        Ok(Self {
            signing_key,
            token_validity,
            bind_addr,
        })
    }
}
