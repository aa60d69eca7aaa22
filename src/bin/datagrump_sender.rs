use std::sync::Arc;
use anyhow::anyhow;
use clap::Parser;
use clap_derive::Parser;
use datagrump::config::SenderConfig;
use datagrump::controller::fixed_window::FixedWindowController;
use datagrump::end_point::sender::SenderEndPoint;
use tokio::net::lookup_host;
use tracing::{error, Level};

/// Sends a stream of datagrams to a receiver, as fast as the congestion controller admits
#[derive(Parser)]
struct Args {
    host: String,
    port: u16,

    /// log every send and ack as seen by the controller
    #[clap(long, default_value_t = false)]
    debug: bool,

    #[clap(long, default_value_t = FixedWindowController::DEFAULT_WINDOW_SIZE)]
    window_size: u64,

    #[clap(long, default_value_t = FixedWindowController::DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,

    #[clap(long, default_value_t = SenderConfig::DEFAULT_PAYLOAD_LEN)]
    payload_len: usize,

    #[clap(short, long, default_value_t = false)]
    verbose: bool,

    #[clap(long, default_value_t = false)]
    very_verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
pub async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = match (args.verbose || args.debug, args.very_verbose) {
        (_, true) => Level::TRACE,
        (true, _) => Level::DEBUG,
        (false, false) => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .try_init()
        .ok();

    let peer_addr = lookup_host((args.host.as_str(), args.port)).await?
        .next()
        .ok_or_else(|| anyhow!("{} does not resolve to any address", args.host))?;

    let mut config = SenderConfig::new(peer_addr);
    config.payload_len = args.payload_len;

    let controller = FixedWindowController::new(args.window_size, args.timeout_ms);
    let mut sender = SenderEndPoint::connect_udp(Arc::new(config), controller).await?;

    sender.run(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("can not listen for Ctrl-C, shutting down: {}", e);
        }
    }).await
}
