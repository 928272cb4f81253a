//! omega-signal binary: load config, bind, serve until Ctrl+C or SIGTERM.

use std::path::PathBuf;

use clap::Parser;
use omega_signal::{logging, shutdown_signal, store_from_config, Server};

#[derive(Parser)]
#[command(name = "omega-signal", about = "Realtime signaling server for Omega Connect")]
struct Args {
    /// Config file to load instead of the platform default.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on, overriding `server.port`.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> omega_common::Result<()> {
    let args = Args::parse();

    let config = logging::load_config_logged(
        logging::bootstrap_subscriber(),
        args.config.as_deref(),
        args.port,
    )?;
    logging::init(&config.logging);

    let store = store_from_config(&config.store)?;
    let server = Server::bind(&config, store).await?;
    tracing::info!("omega-signal listening on {}", server.local_addr()?);

    server.run(shutdown_signal()).await;
    Ok(())
}
