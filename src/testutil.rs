//! Test-only helpers: one-shot and scripted HTTP responders for exercising
//! the client against canned responses without touching the network.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

/// Serve exactly one HTTP exchange on an ephemeral localhost port.
///
/// Returns the base URL to point the client at and a handle that yields the
/// raw request (request line, headers and body) once the exchange completes.
pub fn serve_once(status: u16, body: &'static str) -> (String, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let base_url = format!("http://{}", listener.local_addr().expect("listener addr"));

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept connection");
        let request = read_request(&mut stream);
        write_response(&mut stream, status, body);
        request
    });

    (base_url, handle)
}

/// Serve a fixed sequence of HTTP exchanges, one connection each, in order.
///
/// The handle yields the raw requests once every scripted exchange has been
/// served; further connection attempts fail because the listener is dropped.
pub fn serve_exchanges(
    exchanges: &'static [(u16, &'static str)],
) -> (String, thread::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let base_url = format!("http://{}", listener.local_addr().expect("listener addr"));

    let handle = thread::spawn(move || {
        exchanges
            .iter()
            .map(|(status, body)| {
                let (mut stream, _) = listener.accept().expect("accept connection");
                let request = read_request(&mut stream);
                write_response(&mut stream, *status, body);
                request
            })
            .collect()
    });

    (base_url, handle)
}

fn write_response(stream: &mut TcpStream, status: u16, body: &str) {
    let reason = match status {
        200 => "OK",
        401 => "Unauthorized",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).expect("write response");
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut raw = Vec::new();
    let mut buf = [0u8; 1024];

    loop {
        let n = stream.read(&mut buf).expect("read request");
        raw.extend_from_slice(&buf[..n]);

        if let Some(header_end) = find_header_end(&raw) {
            let head = String::from_utf8_lossy(&raw[..header_end]).to_string();
            let content_length = content_length(&head);
            while raw.len() < header_end + 4 + content_length {
                let n = stream.read(&mut buf).expect("read request body");
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
            }
            return String::from_utf8_lossy(&raw).to_string();
        }

        if n == 0 {
            return String::from_utf8_lossy(&raw).to_string();
        }
    }
}

fn find_header_end(raw: &[u8]) -> Option<usize> {
    raw.windows(4).position(|w| w == b"\r\n\r\n")
}

fn content_length(head: &str) -> usize {
    head.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}
