// Gateway module - THE SIGNALING SERVICE
// Connection lifecycle, presence fan-out, peer query and the HTTP redirect

mod config;
mod http;
mod redirect;
mod signaling;

pub use config::{ConfigError, GatewayConfig};
pub use http::{router, ConnectParams};
pub use redirect::{redirect_location, redirect_router};
pub use signaling::{GatewayError, RelayOutcome, SignalingGateway};

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Bind both ports and serve until either listener fails
pub async fn serve(gateway: Arc<SignalingGateway>) -> Result<(), GatewayError> {
    let config = gateway.config().clone();

    let secure = TcpListener::bind(config.secure_bind()).await?;
    let plain = TcpListener::bind(config.http_bind()).await?;
    let secure_port = secure.local_addr()?.port();
    info!(addr = %secure.local_addr()?, "signaling listening");
    info!(addr = %plain.local_addr()?, secure_port, "redirecting plain HTTP");

    let signaling = axum::serve(secure, router(gateway));
    let redirect = axum::serve(plain, redirect_router(secure_port));
    tokio::try_join!(
        async { signaling.await.map_err(GatewayError::from) },
        async { redirect.await.map_err(GatewayError::from) },
    )?;
    Ok(())
}
