//! Typed representation of a DNS message.
//!
//! One `Message` is built per received datagram and lives only until its
//! response has been serialized; no state crosses datagrams.

use std::fmt;

use crate::errors::ParseError;
use crate::wire;

/// Standard query opcode.
pub const OPCODE_QUERY: u8 = 0;
/// No error condition.
pub const RCODE_NO_ERROR: u8 = 0;
/// The server does not support the requested kind of query.
pub const RCODE_NOT_IMPLEMENTED: u8 = 4;
/// Host address record type.
pub const TYPE_A: u16 = 1;
/// The Internet class.
pub const CLASS_IN: u16 = 1;

/// A full DNS message: header plus the four record sections.
///
/// ```text
///     +---------------------+
///     |        Header       |
///     +---------------------+
///     |       Question      | the question for the name server
///     +---------------------+
///     |        Answer       | RRs answering the question
///     +---------------------+
///     |      Authority      | RRs pointing toward an authority
///     +---------------------+
///     |      Additional     | RRs holding additional information
///     +---------------------+
/// ```
///
/// See section 4.1 of RFC 1035.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
}

impl Message {
    /// Decode one UDP payload into a message, expanding compressed names.
    pub fn from_bytes(packet: &[u8]) -> Result<Self, ParseError> {
        wire::read_message(packet)
    }

    /// Serialize the message, compressing repeated name suffixes. The four
    /// header counts are derived from the section lengths, not from the
    /// values stored in `header`.
    pub fn to_bytes(&self) -> Vec<u8> {
        wire::write_message(self)
    }
}

/// The fixed 12-byte message header.
///
/// ```text
///                                     1  1  1  1  1  1
///       0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                      ID                       |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |QR|   Opcode  |AA|TC|RD|RA|   Z    |   RCODE   |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                    QDCOUNT                    |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                    ANCOUNT                    |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                    NSCOUNT                    |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                    ARCOUNT                    |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
///
/// See section 4.1.1 of RFC 1035.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub id: u16,
    /// Query (false) or response (true).
    pub qr: bool,
    /// Kind of query, 4 bits. Copied into responses even when unknown.
    pub opcode: u8,
    /// Authoritative answer.
    pub aa: bool,
    /// Truncated.
    pub tc: bool,
    /// Recursion desired; set by the client and echoed back.
    pub rd: bool,
    /// Recursion available; set by the server.
    pub ra: bool,
    /// Reserved, 3 bits. Always zero on headers this server constructs.
    pub z: u8,
    /// Response code, 4 bits.
    pub rcode: u8,
    pub qdcount: u16,
    pub ancount: u16,
    pub nscount: u16,
    pub arcount: u16,
}

/// A domain name held in canonical dotted form ("codecrafters.io").
///
/// The root name is the empty string. Labels are capped at 63 bytes on the
/// wire; the reader can never produce a longer one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Name(String);

impl Name {
    /// The root name (a single zero byte on the wire).
    pub fn root() -> Self {
        Name(String::new())
    }

    /// Join already-decoded labels into a name.
    pub fn from_labels(labels: Vec<String>) -> Self {
        Name(labels.join("."))
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The dot-separated labels, outermost first. Empty for the root name.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.split('.').filter(|label| !label.is_empty())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Name(s.trim_end_matches('.').to_string())
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str(".")
        } else {
            f.write_str(&self.0)
        }
    }
}

/// One entry in the question section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: Name,
    pub qtype: u16,
    pub qclass: u16,
}

/// One resource record, shared by the answer, authority, and additional
/// sections.
///
/// RDATA is carried as opaque bytes: names embedded in CNAME/NS/MX/SOA data
/// are neither expanded on read nor compressed on write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: Name,
    pub rtype: u16,
    pub rclass: u16,
    pub ttl: u32,
    pub rdata: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_from_str_trims_trailing_dot() {
        assert_eq!(Name::from("example.com."), Name::from("example.com"));
        assert_eq!(Name::from("example.com").as_str(), "example.com");
    }

    #[test]
    fn name_labels() {
        let name = Name::from("a.example.com");
        assert_eq!(name.labels().collect::<Vec<_>>(), vec!["a", "example", "com"]);
        assert_eq!(Name::root().labels().count(), 0);
    }

    #[test]
    fn root_name_display() {
        assert_eq!(Name::root().to_string(), ".");
        assert!(Name::from("").is_root());
    }
}
