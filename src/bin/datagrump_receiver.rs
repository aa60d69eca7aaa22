use clap::Parser;
use clap_derive::Parser;
use datagrump::config::ReceiverConfig;
use datagrump::end_point::receiver::ReceiverEndPoint;
use tracing::{error, Level};

/// Acknowledges every datagram it receives
#[derive(Parser)]
struct Args {
    port: u16,

    #[clap(short, long, default_value_t = false)]
    verbose: bool,

    #[clap(long, default_value_t = false)]
    very_verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
pub async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = match (args.verbose, args.very_verbose) {
        (_, true) => Level::TRACE,
        (true, _) => Level::DEBUG,
        (false, false) => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .try_init()
        .ok();

    let mut receiver = ReceiverEndPoint::bind_udp(&ReceiverConfig::for_port(args.port)).await?;

    receiver.run(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("can not listen for Ctrl-C, shutting down: {}", e);
        }
    }).await
}
