// dicemesh signaling server
//
// Serves the peer query and signaling socket on the secure port and
// redirects plain HTTP to it. Log level comes from RUST_LOG (default: info).

use clap::Parser;
use dicemesh::gateway::{self, GatewayConfig, SignalingGateway};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dicemesh", version, about = "Signaling server for the dice table")]
struct Cli {
    /// Address to bind both listeners to
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// Plain HTTP port (redirects to the secure port)
    #[arg(long, default_value_t = 3333)]
    http_port: u16,

    /// Signaling port
    #[arg(long, default_value_t = 3334)]
    secure_port: u16,

    /// Mount point of the signaling socket
    #[arg(long, default_value = "/peerjs")]
    path: String,

    /// Maximum simultaneously connected peers
    #[arg(long, default_value_t = 1000)]
    max_peers: usize,
}

impl Cli {
    fn into_config(self) -> GatewayConfig {
        GatewayConfig::new()
            .with_bind_address(&self.bind)
            .with_http_port(self.http_port)
            .with_secure_port(self.secure_port)
            .with_signaling_path(&self.path)
            .with_max_peers(self.max_peers)
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Cli::parse().into_config();
    let signaling = match SignalingGateway::new(config) {
        Ok(signaling) => Arc::new(signaling),
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(2);
        }
    };

    tokio::select! {
        result = gateway::serve(signaling) => {
            if let Err(e) = result {
                error!(error = %e, "server stopped");
                std::process::exit(1);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
        }
    }
}
