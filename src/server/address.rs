//! Host and port value types for binding the server.

use std::fmt;
use std::net::{SocketAddr, ToSocketAddrs};

use crate::server::error::ServerError;

/// A host name or IP literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostAddress(String);

impl HostAddress {
    pub fn with(host: &str) -> Result<Self, ServerError> {
        let host = host.trim();
        if host.is_empty() {
            return Err(ServerError::InvalidArgument("host is empty".to_string()));
        }
        if host.chars().any(|c| c.is_whitespace() || c == '/') {
            return Err(ServerError::InvalidArgument(format!("invalid host {:?}", host)));
        }
        Ok(Self(host.to_string()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A TCP port. Port 0 asks the system for any free port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpPort(u16);

impl IpPort {
    pub fn with(port: i64) -> Result<Self, ServerError> {
        u16::try_from(port)
            .map(Self)
            .map_err(|_| ServerError::InvalidArgument(format!("port {} out of range", port)))
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl From<u16> for IpPort {
    fn from(port: u16) -> Self {
        Self(port)
    }
}

impl fmt::Display for IpPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolve to the first socket address for `host:port`.
pub fn resolve(host: &HostAddress, port: IpPort) -> Result<SocketAddr, ServerError> {
    let unresolved = |detail: String| {
        ServerError::InvalidArgument(format!("cannot resolve {}:{}: {}", host, port, detail))
    };

    (host.value(), port.value())
        .to_socket_addrs()
        .map_err(|e| unresolved(e.to_string()))?
        .next()
        .ok_or_else(|| unresolved("no addresses".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_validation() {
        assert!(HostAddress::with("localhost").is_ok());
        assert!(matches!(HostAddress::with("  "), Err(ServerError::InvalidArgument(_))));
        assert!(matches!(HostAddress::with("a b"), Err(ServerError::InvalidArgument(_))));
    }

    #[test]
    fn port_range() {
        assert_eq!(IpPort::with(8080).unwrap().value(), 8080);
        assert!(matches!(IpPort::with(-1), Err(ServerError::InvalidArgument(_))));
        assert!(matches!(IpPort::with(65536), Err(ServerError::InvalidArgument(_))));
    }

    #[test]
    fn resolves_ip_literal() {
        let host = HostAddress::with("127.0.0.1").unwrap();
        let addr = resolve(&host, IpPort::from(8080)).unwrap();
        assert_eq!(addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
    }
}
