use clap::Parser;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gossiper::api;
use gossiper::cli;
use gossiper::node::Node;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gossiper=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse args and env vars
    let settings = cli::Cli::parse().into_settings()?;
    let socket_address = settings.socket_address()?;

    // Core node and its background gossip
    let node = Node::new(&settings)?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let gossip_task = node.spawn_gossip(shutdown_rx);

    // Start server
    info!("[{}] Starting Gossiper on {}", settings.node_name, socket_address);
    let listener = std::net::TcpListener::bind(socket_address)?;
    api::serve(listener, node, shutdown_signal()).await?;

    // Stop gossiping once the API is down
    let _ = shutdown_tx.send(true);
    gossip_task.await?;
    info!("[{}] Shut down cleanly", settings.node_name);

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
