//! Bolt endpoint parsing and handshake
//!
//! Implements just enough of the bolt wire preamble for verify-on-connect:
//! the four-byte magic followed by four proposed protocol versions, answered
//! by the server's chosen version. Everything past version negotiation is
//! the remote driver's business, not ours.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use thiserror::Error;

/// Bolt magic preamble, sent before version negotiation
pub const MAGIC: [u8; 4] = [0x60, 0x60, 0xB0, 0x17];

/// Protocol versions proposed to the server, preferred first
pub const PROPOSED_VERSIONS: [u32; 4] = [4, 3, 2, 1];

/// Default bolt port when the URI omits one
pub const DEFAULT_PORT: u16 = 7687;

/// Errors from endpoint parsing or the verification handshake
#[derive(Debug, Error)]
pub enum BoltError {
    #[error("URI '{0}' is not a bolt endpoint")]
    NotBolt(String),

    #[error("endpoint '{0}' did not resolve to an address")]
    Unresolvable(String),

    #[error("io error during handshake: {0}")]
    Io(#[from] std::io::Error),

    #[error("server accepted none of the proposed protocol versions")]
    UnsupportedVersion,
}

/// Host and port extracted from a bolt URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoltEndpoint {
    pub host: String,
    pub port: u16,
}

impl BoltEndpoint {
    /// Parse `bolt://host[:port]` (also tolerates the bare `bolt:host` form)
    pub fn parse(uri: &str) -> Result<Self, BoltError> {
        let rest = uri
            .strip_prefix("bolt://")
            .or_else(|| uri.strip_prefix("bolt:"))
            .ok_or_else(|| BoltError::NotBolt(uri.to_string()))?;
        if rest.is_empty() {
            return Err(BoltError::NotBolt(uri.to_string()));
        }
        let authority = rest.split('/').next().unwrap_or(rest);
        match authority.rsplit_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| BoltError::NotBolt(uri.to_string()))?;
                Ok(Self {
                    host: host.to_string(),
                    port,
                })
            }
            None => Ok(Self {
                host: authority.to_string(),
                port: DEFAULT_PORT,
            }),
        }
    }

    fn socket_addr(&self) -> Result<SocketAddr, BoltError> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(BoltError::from)?
            .next()
            .ok_or_else(|| BoltError::Unresolvable(format!("{}:{}", self.host, self.port)))
    }
}

/// Perform the version-negotiation handshake against the endpoint
///
/// Returns the version the server selected. Any transport failure or a
/// zero version reply fails fast; nothing is deferred to first use.
pub fn handshake(endpoint: &BoltEndpoint, timeout: Duration) -> Result<u32, BoltError> {
    let addr = endpoint.socket_addr()?;
    let mut stream = TcpStream::connect_timeout(&addr, timeout)?;
    stream.set_read_timeout(Some(timeout))?;
    stream.set_write_timeout(Some(timeout))?;

    let mut request = Vec::with_capacity(20);
    request.extend_from_slice(&MAGIC);
    for version in PROPOSED_VERSIONS {
        request.extend_from_slice(&version.to_be_bytes());
    }
    stream.write_all(&request)?;

    let mut reply = [0u8; 4];
    stream.read_exact(&mut reply)?;
    let chosen = u32::from_be_bytes(reply);
    if chosen == 0 {
        return Err(BoltError::UnsupportedVersion);
    }
    Ok(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_host_and_port() {
        let endpoint = BoltEndpoint::parse("bolt://graph.internal:7688").unwrap();
        assert_eq!(endpoint.host, "graph.internal");
        assert_eq!(endpoint.port, 7688);
    }

    #[test]
    fn test_parse_defaults_port() {
        let endpoint = BoltEndpoint::parse("bolt://localhost").unwrap();
        assert_eq!(endpoint.port, DEFAULT_PORT);
    }

    #[test]
    fn test_parse_rejects_non_bolt() {
        assert!(matches!(
            BoltEndpoint::parse("http://localhost:7474"),
            Err(BoltError::NotBolt(_))
        ));
        assert!(matches!(
            BoltEndpoint::parse("bolt:"),
            Err(BoltError::NotBolt(_))
        ));
    }

    #[test]
    fn test_parse_rejects_bad_port() {
        assert!(matches!(
            BoltEndpoint::parse("bolt://localhost:notaport"),
            Err(BoltError::NotBolt(_))
        ));
    }

    #[test]
    fn test_handshake_against_loopback_server() {
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 20];
            stream.read_exact(&mut request).unwrap();
            assert_eq!(&request[..4], &MAGIC);
            // Choose the first proposed version
            stream.write_all(&request[4..8]).unwrap();
        });

        let endpoint = BoltEndpoint {
            host: "127.0.0.1".into(),
            port,
        };
        let chosen = handshake(&endpoint, Duration::from_secs(2)).unwrap();
        assert_eq!(chosen, PROPOSED_VERSIONS[0]);
        server.join().unwrap();
    }

    #[test]
    fn test_handshake_zero_version_is_unsupported() {
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 20];
            stream.read_exact(&mut request).unwrap();
            stream.write_all(&[0, 0, 0, 0]).unwrap();
        });

        let endpoint = BoltEndpoint {
            host: "127.0.0.1".into(),
            port,
        };
        assert!(matches!(
            handshake(&endpoint, Duration::from_secs(2)),
            Err(BoltError::UnsupportedVersion)
        ));
        server.join().unwrap();
    }

    #[test]
    fn test_handshake_closed_port_fails_fast() {
        use std::net::TcpListener;

        // Bind then drop to get a port that is very likely closed
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let endpoint = BoltEndpoint {
            host: "127.0.0.1".into(),
            port,
        };
        assert!(matches!(
            handshake(&endpoint, Duration::from_millis(500)),
            Err(BoltError::Io(_))
        ));
    }
}
