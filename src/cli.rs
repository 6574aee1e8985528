//! CLI for this application
//!
use crate::error::Result;
use crate::settings;

#[derive(Clone, Debug, clap::Parser)]
#[clap(version, about)]
pub struct Cli {
    // Node name used in logs
    #[clap(
        long,
        default_value = "node1",
        env("GOSSIPER_NODE_NAME"),
        help = "Name of this node"
    )]
    pub node_name: String,

    // Server listen address
    #[clap(
        long,
        default_value = "127.0.0.1",
        env("GOSSIPER_LISTEN_ADDRESS"),
        help = "IP Address to listen on"
    )]
    pub listen_address: String,

    // HTTP API listen port
    #[clap(
        long,
        default_value = settings::DEFAULT_PORT_HTTP,
        env("GOSSIPER_HTTP_LISTEN_PORT"),
        help = "Port to bind the HTTP API and gossip endpoint to"
    )]
    pub listen_port: u16,

    // Cluster configuration information: peers
    #[clap(
        long,
        env("GOSSIPER_PEERS"),
        value_delimiter = ',',
        help = "Comma-separated peer addresses (e.g., 127.0.0.1:8082,127.0.0.1:8083). If empty, gossip is disabled."
    )]
    pub peers: Vec<String>,

    // Time between gossip rounds
    #[clap(
        long,
        default_value = settings::DEFAULT_GOSSIP_INTERVAL_MS,
        env("GOSSIPER_GOSSIP_INTERVAL_MS"),
        help = "Milliseconds between gossip rounds"
    )]
    pub gossip_interval_ms: u64,

    // Upper bound on a single delivery
    #[clap(
        long,
        default_value = settings::DEFAULT_DELIVERY_TIMEOUT_MS,
        env("GOSSIPER_DELIVERY_TIMEOUT_MS"),
        help = "Milliseconds to wait for a peer to accept gossip"
    )]
    pub delivery_timeout_ms: u64,
}

impl Cli {
    pub fn into_settings(self) -> Result<settings::Settings> {
        let settings = settings::Settings {
            node_name: self.node_name,
            listen_address: self.listen_address,
            listen_port: self.listen_port,
            peers: self.peers,
            gossip_interval_ms: self.gossip_interval_ms,
            delivery_timeout_ms: self.delivery_timeout_ms,
        };
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn defaults() {
        let settings = Cli::try_parse_from(["gossiper"])
            .unwrap()
            .into_settings()
            .unwrap();
        assert_eq!(settings.node_name, "node1");
        assert_eq!(settings.listen_port, settings::STANDARD_PORT_HTTP);
        assert!(settings.peers.is_empty());
        assert_eq!(settings.gossip_interval_ms, 2000);
    }

    #[test]
    fn peers_are_comma_separated() {
        let cli = Cli::try_parse_from([
            "gossiper",
            "--node-name",
            "node2",
            "--listen-port",
            "8082",
            "--peers",
            "127.0.0.1:8081,127.0.0.1:8083",
        ])
        .unwrap();
        assert_eq!(cli.peers, vec!["127.0.0.1:8081", "127.0.0.1:8083"]);
        let settings = cli.into_settings().unwrap();
        assert_eq!(settings.peer_set().len(), 2);
    }

    #[test]
    fn zero_timeout_fails_validation() {
        let cli = Cli::try_parse_from(["gossiper", "--delivery-timeout-ms", "0"]).unwrap();
        assert!(cli.into_settings().is_err());
    }
}
