//! Identity resolution from connection metadata.

use std::net::SocketAddr;

use super::value_object::Identity;

/// Derive a client identity from the connection's network origin.
///
/// The forwarded address wins when the header is present and non-blank;
/// otherwise the peer's IP address is used (the port is dropped so that
/// reconnects from the same host map to the same identity). The forwarded
/// value is taken verbatim apart from surrounding whitespace.
pub fn resolve_identity(remote_addr: &SocketAddr, forwarded_for: Option<&str>) -> Identity {
    match forwarded_for.map(str::trim) {
        Some(forwarded) if !forwarded.is_empty() => Identity::new(forwarded),
        _ => Identity::new(remote_addr.ip().to_string()),
    }
}
