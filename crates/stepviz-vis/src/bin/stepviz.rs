//! Stepviz Visualization Server
//!
//! Serve the step sequence API and WebSocket stream.

use stepviz_vis::{VisConfig, VisServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stepviz=info,stepviz_vis=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = VisConfig::from_env()?;

    // Optional positional port
    if let Some(arg) = std::env::args().nth(1) {
        let port: u16 = arg
            .parse()
            .map_err(|_| format!("Invalid port: {arg}"))?;
        config = config.with_port(port);
    }

    tracing::info!(
        addr = %config.addr,
        speed = config.speed.level(),
        value = config.value.get(),
        strict = config.strict,
        "Starting Stepviz"
    );

    let addr = config.addr;
    VisServer::new(config).serve(addr).await?;

    Ok(())
}
