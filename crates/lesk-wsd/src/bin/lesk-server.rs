use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use lesk_wsd::config::{ResourceArgs, RunArgs, init_tracing};
use lesk_wsd::{AppState, router};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";

#[derive(Parser)]
#[command(name = "lesk-server")]
#[command(about = "Serve Lesk word sense disambiguation over HTTP")]
struct Cli {
    #[command(flatten)]
    resources: ResourceArgs,
    /// Defaults for requests that name no context or metric.
    #[command(flatten)]
    run: RunArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let defaults = cli.run.options()?;

    let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    info!("binding to {}:{}", host, port);
    info!("default options: {} / {}", defaults.policy, defaults.metric);

    let lesk = Arc::new(cli.resources.build()?);
    let state = AppState { lesk, defaults };

    let app = router(state).layer(TraceLayer::new_for_http());
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;
    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;
    Ok(())
}
