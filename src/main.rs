//! Fanout DNS server.
//!
//! Answers every question locally with a fixed record, or, given
//! `--resolver <host:port>`, relays each question to an upstream recursive
//! resolver and merges the answers.

use log::info;
use tokio::signal;

use fanout_dns_server::{config::ServerConfig, errors::DnsError, handlers::run_udp_server};

#[tokio::main]
async fn main() -> Result<(), DnsError> {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let config = ServerConfig::load()?;
    match config.resolver {
        Some(resolver) => info!("forwarding each question to {}", resolver),
        None => info!("no resolver configured, answering queries locally"),
    }

    // Set up shutdown signal handler
    let shutdown_signal = async {
        signal::ctrl_c().await.expect("Failed to listen for shutdown signal");
        info!("Shutdown signal received");
    };

    tokio::select! {
        _ = shutdown_signal => {
            info!("Initiating graceful shutdown...");
            Ok(())
        },
        res = run_udp_server(config) => res,
    }
}
