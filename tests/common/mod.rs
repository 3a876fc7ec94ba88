//! Shared utilities for relay integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One scripted upstream answer.
pub enum Script {
    /// Plain response with the given status and body.
    Status { status: u16, body: &'static str },
    /// Chunked 200 event stream; each piece is written after `delay_ms`.
    Stream { chunks: &'static [&'static str], delay_ms: u64 },
    /// Chunked 200 stream dropped after the pieces, without a final chunk.
    AbortedStream { chunks: &'static [&'static str], delay_ms: u64 },
}

/// Scripted mock upstream that records every request it serves.
///
/// Answers follow the script in order; the last entry repeats if more
/// requests arrive than entries exist. Every response closes the
/// connection, so each relay attempt shows up as exactly one hit.
pub struct MockUpstream {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<(String, String)>>>,
    write_aborts: Arc<AtomicUsize>,
}

impl MockUpstream {
    /// Bind on an ephemeral port and start serving the script.
    pub async fn start(script: Vec<Script>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let hits = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let write_aborts = Arc::new(AtomicUsize::new(0));
        let script = Arc::new(script);

        {
            let hits = hits.clone();
            let requests = requests.clone();
            let write_aborts = write_aborts.clone();
            tokio::spawn(async move {
                loop {
                    match listener.accept().await {
                        Ok((mut socket, _)) => {
                            let _ = socket.set_nodelay(true);
                            let hits = hits.clone();
                            let requests = requests.clone();
                            let write_aborts = write_aborts.clone();
                            let script = script.clone();
                            tokio::spawn(async move {
                                let Some((head, body)) = read_request(&mut socket).await else {
                                    return;
                                };
                                let index = hits.fetch_add(1, Ordering::SeqCst);
                                requests.lock().unwrap().push((head, body));

                                if let Some(step) = script.get(index).or_else(|| script.last()) {
                                    if !write_response(&mut socket, step).await {
                                        write_aborts.fetch_add(1, Ordering::SeqCst);
                                    }
                                }
                                let _ = socket.shutdown().await;
                            });
                        }
                        Err(_) => break,
                    }
                }
            });
        }

        Self {
            base_url: format!("http://{}", addr),
            hits,
            requests,
            write_aborts,
        }
    }

    /// Number of requests that reached the upstream.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Number of responses cut short because the peer closed the connection.
    #[allow(dead_code)]
    pub fn write_aborts(&self) -> usize {
        self.write_aborts.load(Ordering::SeqCst)
    }

    /// Captured (head, body) pairs in arrival order.
    #[allow(dead_code)]
    pub fn captured_requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

/// Read one HTTP request: headers, then `Content-Length` bytes of body.
async fn read_request(socket: &mut TcpStream) -> Option<(String, String)> {
    let mut buf: Vec<u8> = Vec::new();
    let mut tmp = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut tmp).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&tmp[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut tmp).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&tmp[..n]);
    }

    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();
    Some((head, body))
}

/// Write one scripted response. Returns false if the peer closed the
/// connection before the response was fully written.
async fn write_response(socket: &mut TcpStream, step: &Script) -> bool {
    match step {
        Script::Status { status, body } => {
            let status_text = match *status {
                200 => "200 OK",
                401 => "401 Unauthorized",
                403 => "403 Forbidden",
                429 => "429 Too Many Requests",
                500 => "500 Internal Server Error",
                503 => "503 Service Unavailable",
                _ => "200 OK",
            };
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_text,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.is_ok()
        }
        Script::Stream { chunks, delay_ms } | Script::AbortedStream { chunks, delay_ms } => {
            let head = "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n";
            if socket.write_all(head.as_bytes()).await.is_err() {
                return false;
            }

            for chunk in *chunks {
                tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                let frame = format!("{:x}\r\n{}\r\n", chunk.len(), chunk);
                if socket.write_all(frame.as_bytes()).await.is_err() {
                    return false;
                }
            }

            // A clean stream ends with the zero chunk; an aborted one just
            // drops the connection mid-body.
            if matches!(step, Script::Stream { .. }) {
                let _ = socket.write_all(b"0\r\n\r\n").await;
            }
            true
        }
    }
}
