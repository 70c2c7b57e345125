//! Shared utilities for integration tests.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use http_bridge::{HostAddress, HttpHandler, HttpServer, IpPort};

/// Start a server for `handler` on an ephemeral loopback port.
pub fn start_server<H>(handler: H) -> (HttpServer, SocketAddr)
where
    H: HttpHandler + 'static,
{
    let host = HostAddress::with("127.0.0.1").unwrap();
    let mut server = HttpServer::with(host, IpPort::from(0), handler).unwrap();
    server.start().unwrap();
    let addr = server.local_addr().unwrap();
    (server, addr)
}

/// Send raw request text and return the raw response text.
///
/// The request should ask for `Connection: close` so the read terminates.
#[allow(dead_code)]
pub fn raw_request(addr: SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.set_read_timeout(Some(Duration::from_secs(10))).unwrap();
    stream.write_all(request.as_bytes()).unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

/// Raw `GET` of `path` with `Connection: close`.
#[allow(dead_code)]
pub fn raw_get(addr: SocketAddr, path: &str) -> String {
    raw_request(
        addr,
        &format!(
            "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
            path, addr
        ),
    )
}

/// Header lines of a raw response, names lower-cased.
#[allow(dead_code)]
pub fn header_lines(response: &str) -> Vec<(String, String)> {
    let head = response.split("\r\n\r\n").next().unwrap_or("");
    head.lines()
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
        .collect()
}
