//! Error types for the DNS server.

use thiserror::Error;

/// Represents errors that can occur in the DNS server.
#[derive(Error, Debug)]
pub enum DnsError {
    /// I/O errors from the underlying system.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors from decoding a DNS packet.
    #[error("Invalid DNS packet: {0}")]
    Parse(#[from] ParseError),

    /// Configuration errors from invalid settings.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The upstream resolver did not answer in time.
    #[error("upstream resolver timed out")]
    UpstreamTimeout,
}

/// A structured decode failure for one DNS packet.
///
/// Every variant names the exact way a hostile or truncated packet broke the
/// wire format, so callers can log something more useful than "bad packet".
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The packet is shorter than the fixed 12-byte header.
    #[error("packet shorter than the 12-byte DNS header")]
    ShortHeader,

    /// A fixed-width field (count, TYPE, CLASS, TTL, RDLENGTH) ran past the
    /// end of the packet.
    #[error("packet truncated mid-field")]
    Truncated,

    /// A name's labels ran past the end of the packet.
    #[error("name runs past the end of the packet")]
    NameOutOfRange,

    /// A compression pointer is missing its second byte.
    #[error("compression pointer truncated")]
    TruncatedPointer,

    /// A compression pointer targets an offset at or past the packet end.
    #[error("compression pointer targets offset {target} beyond the packet")]
    PointerOutOfRange { target: usize },

    /// Following compression pointers revisited an offset; the name would
    /// never terminate.
    #[error("compression pointer loop at offset {offset}")]
    CompressionLoop { offset: usize },

    /// A length byte claims a label longer than the 63-byte wire limit.
    #[error("label length {length} exceeds the 63-byte limit")]
    LabelTooLong { length: u8 },

    /// A length byte uses the reserved `10` prefix.
    #[error("reserved label type in length byte {byte:#04x}")]
    ReservedLabel { byte: u8 },

    /// A record's RDLENGTH extends past the end of the packet.
    #[error("record data runs past the end of the packet")]
    TruncatedRData,
}
