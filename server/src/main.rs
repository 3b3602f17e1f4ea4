use anyhow::Result;
use axum::Router;
use clap::Parser;
use hanrei_core::bm25::{DEFAULT_B, DEFAULT_K1};
use hanrei_core::Bm25Params;
use hanrei_server::build_app;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Path to the exported metadata.json
    #[arg(long, default_value = "./data/metadata.json")]
    data: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// BM25 term-frequency saturation
    #[arg(long, default_value_t = DEFAULT_K1)]
    bm25_k1: f64,
    /// BM25 length normalisation
    #[arg(long, default_value_t = DEFAULT_B)]
    bm25_b: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let params = Bm25Params::new(args.bm25_k1, args.bm25_b)?;
    let app: Router = build_app(&args.data, params)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, data = %args.data, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
