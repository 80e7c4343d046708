//! Configuration management
//!
//! Loaded from environment variables (after an optional `.env` file):
//!
//! | Variable | Default |
//! |---|---|
//! | `JWT_SECRET` | required |
//! | `TOKEN_TTL_SECS` | 3600 |
//! | `HASH_MEMORY_KIB` / `HASH_ITERATIONS` / `HASH_PARALLELISM` | Argon2 defaults |
//! | `SERVER_HOST` / `SERVER_PORT` | 0.0.0.0 / 8080 |
//! | `BOOTSTRAP_USERNAME` / `BOOTSTRAP_PASSWORD` | unset |

use anyhow::{bail, Context, Result};
use crypto_core::{validate_secret_strength, HashCost, SecretStrength, SigningSecret};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub jwt_secret: SecretString,
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
    #[serde(default = "default_hash_memory_kib")]
    pub hash_memory_kib: u32,
    #[serde(default = "default_hash_iterations")]
    pub hash_iterations: u32,
    #[serde(default = "default_hash_parallelism")]
    pub hash_parallelism: u32,
    #[serde(default = "default_server_host")]
    pub server_host: String,
    #[serde(default = "default_server_port")]
    pub server_port: u16,
    /// Optional user provisioned at startup
    #[serde(default)]
    pub bootstrap_username: Option<String>,
    #[serde(default)]
    pub bootstrap_password: Option<SecretString>,
}

fn default_token_ttl_secs() -> u64 {
    crypto_core::DEFAULT_TOKEN_TTL_SECS
}

fn default_hash_memory_kib() -> u32 {
    HashCost::default().memory_kib
}

fn default_hash_iterations() -> u32 {
    HashCost::default().iterations
}

fn default_hash_parallelism() -> u32 {
    HashCost::default().parallelism
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

impl Config {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        let config: Config =
            envy::from_env().context("Failed to load configuration from environment")?;
        config.validate()?;
        Ok(config)
    }

    /// Load from explicit key/value pairs using the same names as the environment.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Config = envy::from_iter(pairs).context("Failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match validate_secret_strength(self.jwt_secret.expose_secret()) {
            SecretStrength::Weak => {
                bail!("JWT_SECRET is too weak: use at least 32 random bytes")
            }
            SecretStrength::Acceptable => {
                tracing::warn!("JWT_SECRET is acceptable but shorter than recommended 64 bytes");
            }
            SecretStrength::Strong => {}
        }

        if self.token_ttl_secs == 0 {
            bail!("TOKEN_TTL_SECS must be greater than zero");
        }

        if self.bootstrap_username.is_some() != self.bootstrap_password.is_some() {
            bail!("BOOTSTRAP_USERNAME and BOOTSTRAP_PASSWORD must be set together");
        }

        Ok(())
    }

    pub fn signing_secret(&self) -> SigningSecret {
        SigningSecret::from(self.jwt_secret.expose_secret())
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    pub fn hash_cost(&self) -> HashCost {
        HashCost {
            memory_kib: self.hash_memory_kib,
            iterations: self.hash_iterations,
            parallelism: self.hash_parallelism,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Username and plaintext password of the bootstrap user, if configured.
    pub fn bootstrap_user(&self) -> Option<(&str, &str)> {
        match (&self.bootstrap_username, &self.bootstrap_password) {
            (Some(username), Some(password)) => Some((username.as_str(), password.expose_secret())),
            _ => None,
        }
    }
}
