use clap::Parser;
use client::network::Client;
use log::info;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:8080")]
    server: String,

    /// Display name to join with right after connecting
    #[arg(short = 'n', long)]
    name: Option<String>,

    /// Milliseconds between keep-alive packets
    #[arg(long, default_value = "2000")]
    heartbeat_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    info!("Starting client...");
    info!("Connecting to: {}", args.server);

    let mut client = Client::new(
        &args.server,
        args.name,
        Duration::from_millis(args.heartbeat_ms.max(100)),
    )
    .await?;

    client.run().await?;

    Ok(())
}
