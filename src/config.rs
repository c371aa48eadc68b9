//! Configuration for keyshare
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

use crate::keyshare::{ExpiryPolicy, DEFAULT_MAX_BODY_BYTES};

/// Longest accepted key share TTL (one day)
pub const MAX_KEY_TTL_SECS: u64 = 24 * 60 * 60;

/// Keyshare - ephemeral key sharing for device pairing
#[derive(Parser, Debug, Clone)]
#[command(name = "keyshare")]
#[command(about = "Ephemeral in-memory key sharing service")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Seconds a key share stays available after it is written (0 = never expire)
    #[arg(long, env = "KEY_TTL_SECS", default_value = "120")]
    pub key_ttl_secs: u64,

    /// What a firing expiry deletes when the name was rewritten in the meantime
    #[arg(long, env = "EXPIRY_POLICY", value_enum, default_value_t = ExpiryPolicy::Unconditional)]
    pub expiry_policy: ExpiryPolicy,

    /// Maximum accepted POST /keys body size in bytes
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// TTL applied to every write
    pub fn key_ttl(&self) -> Duration {
        Duration::from_secs(self.key_ttl_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_body_bytes == 0 {
            return Err("MAX_BODY_BYTES must be greater than zero".to_string());
        }

        if self.key_ttl_secs > MAX_KEY_TTL_SECS {
            return Err(format!(
                "KEY_TTL_SECS must be at most {} (one day)",
                MAX_KEY_TTL_SECS
            ));
        }

        Ok(())
    }
}
