use std::env;
use std::time::Duration;

use tracing::warn;

/// Where the HTTP server listens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Reads HOST and PORT, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT").unwrap_or(defaults.port),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Limits and timings shared by every client session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Capacity of each client's outbound queue
    pub outbound_capacity: usize,
    /// Capacity of the hub's command mailbox
    pub hub_capacity: usize,
    /// Largest inbound frame accepted, in bytes
    pub max_message_size: usize,
    /// Time allowed for one write to the peer
    pub write_wait: Duration,
    /// Time allowed between frames from the peer
    pub pong_wait: Duration,
    /// Heartbeat period, must be shorter than `pong_wait`
    pub ping_period: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let pong_wait = Duration::from_secs(60);
        Self {
            outbound_capacity: 256,
            hub_capacity: 256,
            max_message_size: 512,
            write_wait: Duration::from_secs(10),
            pong_wait,
            ping_period: pong_wait * 9 / 10,
        }
    }
}

impl SessionConfig {
    /// Defaults with OUTBOUND_CAPACITY and MAX_MESSAGE_SIZE overrides
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Zero or unparsable overrides fall back to the defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            outbound_capacity: parse_value("OUTBOUND_CAPACITY", lookup("OUTBOUND_CAPACITY"))
                .filter(|c| *c > 0)
                .unwrap_or(defaults.outbound_capacity),
            max_message_size: parse_value("MAX_MESSAGE_SIZE", lookup("MAX_MESSAGE_SIZE"))
                .filter(|s| *s > 0)
                .unwrap_or(defaults.max_message_size),
            ..defaults
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    parse_value(name, env::var(name).ok())
}

fn parse_value<T: std::str::FromStr>(name: &str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var = name, value = %raw, "Ignoring unparsable environment variable");
            None
        }
    }
}
