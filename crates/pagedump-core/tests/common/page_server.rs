//! Minimal HTTP/1.1 server for integration tests that answers `?page=N`
//! requests from a caller-supplied script.
//!
//! Every response carries `Connection: close`, so each attempt is a fresh
//! connection and each request is recorded once.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

/// Decides the response for (page, nth request for that page, 1-based).
pub type Responder = dyn Fn(u32, usize) -> (u16, String) + Send + Sync;

pub struct PageServer {
    /// Base URL with a `{page}` placeholder, e.g. `http://127.0.0.1:1234/api?page={page}`.
    pub url_template: String,
    requests: Arc<Mutex<Vec<u32>>>,
}

impl PageServer {
    /// Pages requested so far, in arrival order (retries included).
    pub fn requests(&self) -> Vec<u32> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count_for(&self, page: u32) -> usize {
        self.requests().iter().filter(|&&p| p == page).count()
    }
}

/// Starts a server in a background thread. It runs until the process exits.
pub fn start<F>(respond: F) -> PageServer
where
    F: Fn(u32, usize) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let respond: Arc<Responder> = Arc::new(respond);
    let requests = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            handle(stream, respond.as_ref(), &log);
        }
    });
    PageServer {
        url_template: format!("http://127.0.0.1:{}/api.php?request=all&page={{page}}", port),
        requests,
    }
}

/// `page_of_items(p, n)` renders a SteamSpy-style object of `n` apps keyed by appid.
pub fn page_of_items(page: u32, n: u32) -> String {
    let entries: Vec<String> = (0..n)
        .map(|i| {
            let appid = page * 1000 + i;
            format!(r#""{appid}":{{"appid":{appid},"name":"app {appid}"}}"#)
        })
        .collect();
    format!("{{{}}}", entries.join(","))
}

fn handle(mut stream: std::net::TcpStream, respond: &Responder, log: &Mutex<Vec<u32>>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let page = match parse_page(request) {
        Some(p) => p,
        None => {
            let _ = stream.write_all(b"HTTP/1.1 400 Bad Request\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
            return;
        }
    };
    let nth = {
        let mut log = log.lock().unwrap();
        log.push(page);
        log.iter().filter(|&&p| p == page).count()
    };
    let (status, body) = respond(page, nth);
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason(status),
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(body.as_bytes());
}

/// Extracts N from a request line like `GET /api.php?request=all&page=N HTTP/1.1`.
fn parse_page(request: &str) -> Option<u32> {
    let target = request.lines().next()?.split_whitespace().nth(1)?;
    let query = target.split_once('?')?.1;
    query
        .split('&')
        .find_map(|kv| kv.strip_prefix("page="))
        .and_then(|v| v.parse().ok())
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}
