//! Request handling for the DNS server.
//!
//! This module owns the UDP server loop: receive a datagram, hand it to a
//! spawned task that parses it, answers it locally or through the upstream
//! resolver, and sends the response back to the source address.

use std::net::SocketAddr;
use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::net::UdpSocket;
use tokio::task;

use crate::config::ServerConfig;
use crate::dns::{answer_question, build_response, resolve_questions};
use crate::errors::DnsError;
use crate::message::{Message, OPCODE_QUERY, RCODE_NOT_IMPLEMENTED, RCODE_NO_ERROR};

/// Bind the configured address and serve until the socket fails.
///
/// # Arguments
/// * `config` - The server configuration.
///
/// # Returns
/// A `Result` that is `Err` on bind failure or a fatal receive error.
pub async fn run_udp_server(config: ServerConfig) -> Result<(), DnsError> {
    let socket = UdpSocket::bind(config.bind_addr).await?;
    info!("UDP DNS server listening on {}", config.bind_addr);
    serve_udp(socket, config).await
}

/// Serve queries on an already-bound socket.
///
/// Each datagram is handled on its own task; tasks share nothing but the
/// outbound socket, and each replies to the source address it captured. A
/// receive error is fatal to the loop; everything downstream of a receive
/// only affects its own datagram.
pub async fn serve_udp(socket: UdpSocket, config: ServerConfig) -> Result<(), DnsError> {
    let socket = Arc::new(socket);
    let mut buf = vec![0u8; config.max_packet_size];

    loop {
        match socket.recv_from(&mut buf).await {
            Ok((amt, src)) => {
                let packet = buf[..amt].to_vec();
                let socket = socket.clone();
                let config = config.clone();
                task::spawn(async move {
                    if let Err(e) = handle_udp_query(packet, src, socket, config).await {
                        warn!("UDP query error from {}: {}", src, e);
                    }
                });
            }
            Err(e) => {
                error!("UDP receive error: {}", e);
                return Err(e.into());
            }
        }
    }
}

/// Handle one received datagram.
///
/// Unparseable packets are logged and get no response. A non-query Opcode
/// is answered with RCODE 4 and stub answers; otherwise the questions are
/// answered locally or fanned out to the configured resolver.
pub async fn handle_udp_query(
    packet: Vec<u8>,
    src: SocketAddr,
    socket: Arc<UdpSocket>,
    config: ServerConfig,
) -> Result<(), DnsError> {
    let request = match Message::from_bytes(&packet) {
        Ok(message) => message,
        Err(e) => {
            debug!("dropping malformed query from {}: {}", src, e);
            return Ok(());
        }
    };

    let rcode = if request.header.opcode == OPCODE_QUERY {
        RCODE_NO_ERROR
    } else {
        RCODE_NOT_IMPLEMENTED
    };

    let (answers, recursion_available) = match config.resolver {
        Some(resolver) if rcode == RCODE_NO_ERROR => {
            (resolve_questions(&request, resolver).await, true)
        }
        _ => (
            request.questions.iter().map(answer_question).collect(),
            false,
        ),
    };

    let response = build_response(&request, rcode, answers, recursion_available);
    socket.send_to(&response.to_bytes(), src).await?;
    Ok(())
}
