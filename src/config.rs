//! Configuration for the DNS server.
//!
//! Configuration is captured once at process start and passed by value to
//! the server loop; nothing is reloaded at runtime.

use std::env;
use std::net::{SocketAddr, ToSocketAddrs};

use crate::errors::DnsError;

/// Address the server listens on unless `DNS_BIND` overrides it.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:2053";

/// The classic DNS/UDP message ceiling, applied in both directions.
pub const MAX_PACKET_SIZE: usize = 512;

/// Server configuration loaded from the command line and environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the DNS server to.
    pub bind_addr: SocketAddr,

    /// Upstream resolver to forward questions to. `None` selects stub mode.
    pub resolver: Option<SocketAddr>,

    /// Receive buffer size for inbound and upstream datagrams.
    pub max_packet_size: usize,
}

impl ServerConfig {
    /// Load configuration from `std::env::args` and the environment.
    pub fn load() -> Result<Self, DnsError> {
        Self::from_args(env::args().skip(1))
    }

    /// Build a configuration from command-line arguments.
    ///
    /// `--resolver <host:port>` (or `--resolver=<host:port>`) selects
    /// forwarder mode; an absent or empty value means stub mode. The
    /// `DNS_RESOLVER` and `DNS_BIND` environment variables fill in whatever
    /// the arguments leave unset.
    pub fn from_args<I>(mut args: I) -> Result<Self, DnsError>
    where
        I: Iterator<Item = String>,
    {
        let mut resolver_arg = None;
        while let Some(arg) = args.next() {
            if let Some(value) = arg.strip_prefix("--resolver=") {
                resolver_arg = Some(value.to_string());
            } else if arg == "--resolver" {
                resolver_arg = Some(args.next().unwrap_or_default());
            } else {
                return Err(DnsError::Config(format!("unknown argument: {arg}")));
            }
        }

        let resolver = match resolver_arg.or_else(|| env::var("DNS_RESOLVER").ok()) {
            Some(addr) if !addr.is_empty() => Some(resolve_addr(&addr)?),
            _ => None,
        };

        let bind_addr = env::var("DNS_BIND")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.into())
            .parse()
            .map_err(|_| DnsError::Config("Invalid DNS_BIND address".into()))?;

        Ok(Self {
            bind_addr,
            resolver,
            max_packet_size: MAX_PACKET_SIZE,
        })
    }
}

/// Resolve a `host:port` string to a socket address.
fn resolve_addr(addr: &str) -> Result<SocketAddr, DnsError> {
    addr.to_socket_addrs()
        .map_err(|e| DnsError::Config(format!("Invalid resolver address {addr}: {e}")))?
        .next()
        .ok_or_else(|| DnsError::Config(format!("Resolver address {addr} did not resolve")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn no_arguments_means_stub_mode() {
        let config = ServerConfig::from_args(args(&[])).unwrap();
        assert!(config.resolver.is_none());
        assert_eq!(config.max_packet_size, 512);
    }

    #[test]
    fn resolver_flag_selects_forwarder_mode() {
        let config = ServerConfig::from_args(args(&["--resolver", "1.2.3.4:53"])).unwrap();
        assert_eq!(config.resolver, Some("1.2.3.4:53".parse().unwrap()));

        let config = ServerConfig::from_args(args(&["--resolver=1.2.3.4:5353"])).unwrap();
        assert_eq!(config.resolver, Some("1.2.3.4:5353".parse().unwrap()));
    }

    #[test]
    fn empty_resolver_means_stub_mode() {
        let config = ServerConfig::from_args(args(&["--resolver", ""])).unwrap();
        assert!(config.resolver.is_none());
    }

    #[test]
    fn unknown_argument_is_rejected() {
        assert!(ServerConfig::from_args(args(&["--frobnicate"])).is_err());
    }

    #[test]
    fn malformed_resolver_is_rejected() {
        assert!(ServerConfig::from_args(args(&["--resolver", "not an address"])).is_err());
    }
}
