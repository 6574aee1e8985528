//! Gossiper application settings
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::config_error;
use crate::error::Result;
use crate::gossip::PeerSet;

pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const STANDARD_PORT_HTTP: u16 = 8081;
pub const DEFAULT_PORT_HTTP: &str = "8081";
pub const DEFAULT_GOSSIP_INTERVAL_MS: &str = "2000";
pub const DEFAULT_DELIVERY_TIMEOUT_MS: &str = "1000";

/// Timing for the gossip loop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GossipConfig {
    /// Time between gossip rounds
    pub interval: Duration,
    /// Upper bound on a single peer delivery
    pub delivery_timeout: Duration,
}

impl Default for GossipConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            delivery_timeout: Duration::from_secs(1),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    // Name used in logs
    pub node_name: String,

    // Server listen address
    pub listen_address: String,

    // HTTP API listen port
    pub listen_port: u16,

    // Other nodes, as host:port
    pub peers: Vec<String>,

    // Gossip Configuration
    pub gossip_interval_ms: u64,
    pub delivery_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            node_name: "node1".to_string(),
            listen_address: "127.0.0.1".to_string(),
            listen_port: STANDARD_PORT_HTTP,
            peers: Vec::new(),
            gossip_interval_ms: 2000,
            delivery_timeout_ms: 1000,
        }
    }
}

impl Settings {
    /// host:port this node is reachable on, used to drop ourselves from the peer list
    pub fn self_address(&self) -> String {
        format!("{}:{}", self.listen_address, self.listen_port)
    }

    pub fn socket_address(&self) -> Result<SocketAddr> {
        let ip = self
            .listen_address
            .parse::<IpAddr>()
            .map_err(|e| config_error!("invalid listen address '{}': {}", self.listen_address, e))?;
        Ok(SocketAddr::from((ip, self.listen_port)))
    }

    pub fn gossip_config(&self) -> Result<GossipConfig> {
        if self.gossip_interval_ms == 0 {
            return Err(config_error!("gossip interval must be greater than zero"));
        }
        if self.delivery_timeout_ms == 0 {
            return Err(config_error!("delivery timeout must be greater than zero"));
        }
        Ok(GossipConfig {
            interval: Duration::from_millis(self.gossip_interval_ms),
            delivery_timeout: Duration::from_millis(self.delivery_timeout_ms),
        })
    }

    pub fn peer_set(&self) -> PeerSet {
        PeerSet::new(self.peers.iter().map(String::as_str), &self.self_address())
    }

    /// Check everything that can be checked before binding
    pub fn validate(&self) -> Result<()> {
        if self.node_name.trim().is_empty() {
            return Err(config_error!("node name must not be empty"));
        }
        self.socket_address()?;
        self.gossip_config()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GossiperError;

    #[test]
    fn defaults_match_cli_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.listen_port.to_string(), DEFAULT_PORT_HTTP);
        assert_eq!(settings.gossip_interval_ms.to_string(), DEFAULT_GOSSIP_INTERVAL_MS);
        assert_eq!(settings.delivery_timeout_ms.to_string(), DEFAULT_DELIVERY_TIMEOUT_MS);
        assert_eq!(settings.gossip_config().unwrap(), GossipConfig::default());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let settings = Settings {
            gossip_interval_ms: 0,
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(GossiperError::Config(_))));
    }

    #[test]
    fn bad_listen_address_is_rejected() {
        let settings = Settings {
            listen_address: "not-an-ip".to_string(),
            ..Settings::default()
        };
        assert!(matches!(settings.socket_address(), Err(GossiperError::Config(_))));
    }

    #[test]
    fn peer_set_excludes_self() {
        let settings = Settings {
            peers: vec![
                "127.0.0.1:8081".to_string(),
                "127.0.0.1:8082".to_string(),
                "127.0.0.1:8083".to_string(),
            ],
            ..Settings::default()
        };
        let peers = settings.peer_set();
        assert_eq!(peers.len(), 2);
        assert!(!peers.contains("127.0.0.1:8081"));
    }
}
