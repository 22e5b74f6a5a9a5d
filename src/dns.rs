//! Query answering and upstream forwarding.
//!
//! This module provides functions for synthesizing local answers, fanning a
//! multi-question query out to an upstream resolver one question at a time,
//! and assembling the response message sent back to the client.

use std::net::SocketAddr;
use std::time::Duration;

use log::{info, warn};
use tokio::net::UdpSocket;
use tokio::time::timeout;

use crate::config::MAX_PACKET_SIZE;
use crate::errors::DnsError;
use crate::message::{Header, Message, Question, ResourceRecord, CLASS_IN, RCODE_NO_ERROR, TYPE_A};

/// TTL for locally synthesized answers, in seconds.
pub const STUB_TTL: u32 = 60;

/// Address returned for every locally answered question.
pub const STUB_ADDR: [u8; 4] = [8, 8, 8, 8];

/// How long to wait on an upstream resolver before dropping the question.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(3);

/// Synthesize the fixed A record a stub-mode server answers with.
pub fn answer_question(question: &Question) -> ResourceRecord {
    ResourceRecord {
        name: question.name.clone(),
        rtype: TYPE_A,
        rclass: CLASS_IN,
        ttl: STUB_TTL,
        rdata: STUB_ADDR.to_vec(),
    }
}

/// A query carrying exactly one of the client's questions, under the
/// client's ID and Opcode.
fn single_question_query(request: &Message, question: Question) -> Message {
    Message {
        header: Header {
            id: request.header.id,
            qr: false,
            opcode: request.header.opcode,
            rd: request.header.rd,
            rcode: RCODE_NO_ERROR,
            qdcount: 1,
            ..Default::default()
        },
        questions: vec![question],
        ..Default::default()
    }
}

/// Send one query datagram to the upstream resolver and read one response.
///
/// A fresh socket is bound and connected per call; responses are correlated
/// by the connected socket, so one socket never serves two questions.
///
/// # Arguments
/// * `resolver` - The upstream resolver to forward to.
/// * `query` - The serialized DNS query to forward.
///
/// # Returns
/// A `Result` containing the raw response datagram or an error.
pub async fn forward_question(resolver: SocketAddr, query: &[u8]) -> Result<Vec<u8>, DnsError> {
    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    socket.connect(resolver).await?;
    socket.send(query).await?;

    let mut buf = vec![0u8; MAX_PACKET_SIZE];
    let size = timeout(UPSTREAM_TIMEOUT, socket.recv(&mut buf))
        .await
        .map_err(|_| DnsError::UpstreamTimeout)??;
    buf.truncate(size);
    Ok(buf)
}

/// Resolve every question of `request` against the upstream resolver, one
/// single-question round-trip per question, and merge the answers in
/// question order.
///
/// A question whose round-trip fails (I/O, timeout, or an unparseable
/// response) contributes no answers; the remaining questions still run.
pub async fn resolve_questions(request: &Message, resolver: SocketAddr) -> Vec<ResourceRecord> {
    let mut answers = Vec::new();
    for question in &request.questions {
        info!("forwarding question for {} to {}", question.name, resolver);
        let query = single_question_query(request, question.clone());
        let packet = match forward_question(resolver, &query.to_bytes()).await {
            Ok(packet) => packet,
            Err(e) => {
                warn!("upstream query for {} failed: {}", question.name, e);
                continue;
            }
        };
        match Message::from_bytes(&packet) {
            Ok(response) => answers.extend(response.answers),
            Err(e) => warn!("invalid upstream response for {}: {}", question.name, e),
        }
    }
    answers
}

/// Build the response to `request`.
///
/// The ID, Opcode, and RD bit are echoed from the request; QR is set, RA
/// reflects whether the answers came from the forwarder, and the request's
/// questions are echoed verbatim.
pub fn build_response(
    request: &Message,
    rcode: u8,
    answers: Vec<ResourceRecord>,
    recursion_available: bool,
) -> Message {
    Message {
        header: Header {
            id: request.header.id,
            qr: true,
            opcode: request.header.opcode,
            rd: request.header.rd,
            ra: recursion_available,
            rcode,
            qdcount: request.questions.len() as u16,
            ancount: answers.len() as u16,
            ..Default::default()
        },
        questions: request.questions.clone(),
        answers,
        ..Default::default()
    }
}
