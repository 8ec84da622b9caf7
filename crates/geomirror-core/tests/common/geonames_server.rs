//! Minimal HTTP/1.1 server standing in for the GeoNames export host and the
//! release API in integration tests.
//!
//! Serves HEAD and GET for the archive path with configurable ETag,
//! Last-Modified and truncation, plus `GET /repos/<owner>/<repo>` and its
//! `/releases/latest`.
//! State can be swapped between runs to simulate an upstream change.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// What the server currently publishes.
#[derive(Debug, Clone)]
pub struct Served {
    pub body: Vec<u8>,
    pub etag: Option<String>,
    pub last_modified: Option<String>,
    /// Advertise the full Content-Length on GET but send only half the body.
    pub truncate_get: bool,
    /// Status returned for HEAD and GET of the archive.
    pub status: u16,
    /// Status for the archive GET only; `None` uses `status`.
    pub get_status: Option<u16>,
    /// Bytes added to the Content-Length advertised on HEAD.
    pub head_extra: u64,
    /// `owner/repo` known to the release API; anything else is 404.
    pub repo: Option<String>,
    /// Notes of the latest release; `None` → 404 from the release endpoint.
    pub release_body: Option<String>,
}

impl Served {
    pub fn archive(body: Vec<u8>, etag: &str) -> Self {
        Self {
            body,
            etag: Some(etag.to_string()),
            last_modified: Some("Fri, 16 Oct 2026 01:21:07 GMT".to_string()),
            truncate_get: false,
            status: 200,
            get_status: None,
            head_extra: 0,
            repo: None,
            release_body: None,
        }
    }
}

pub struct GeonamesServer {
    pub base_url: String,
    state: Arc<Mutex<Served>>,
    gets: Arc<Mutex<u32>>,
}

impl GeonamesServer {
    /// Starts a server in a background thread. It runs until the process exits.
    pub fn start(served: Served) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(Mutex::new(served));
        let gets = Arc::new(Mutex::new(0));
        let (st, g) = (Arc::clone(&state), Arc::clone(&gets));
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let st = Arc::clone(&st);
                let g = Arc::clone(&g);
                thread::spawn(move || handle(stream, &st, &g));
            }
        });
        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            state,
            gets,
        }
    }

    pub fn archive_url(&self) -> String {
        format!("{}/export/zip/allCountries.zip", self.base_url)
    }

    pub fn update(&self, f: impl FnOnce(&mut Served)) {
        f(&mut self.state.lock().unwrap());
    }

    /// Number of archive GETs served so far.
    pub fn archive_gets(&self) -> u32 {
        *self.gets.lock().unwrap()
    }
}

fn handle(mut stream: TcpStream, state: &Mutex<Served>, gets: &Mutex<u32>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("");
    let served = state.lock().unwrap().clone();

    if let Some(rest) = path.strip_prefix("/repos/") {
        let (repo, latest) = match rest.strip_suffix("/releases/latest") {
            Some(repo) => (repo, true),
            None => (rest, false),
        };
        let known = served.repo.as_deref() == Some(repo);
        let json = match (known, latest, served.release_body) {
            (true, false, _) => Some(serde_json::json!({ "full_name": repo })),
            (true, true, Some(notes)) => Some(serde_json::json!({
                "tag_name": "geonames-latest",
                "name": "GeoNames allCountries",
                "body": notes,
            })),
            _ => None,
        };
        match json {
            Some(json) => respond(
                &mut stream,
                "200 OK",
                &[("Content-Type", "application/json")],
                json.to_string().as_bytes(),
                None,
            ),
            None => respond(
                &mut stream,
                "404 Not Found",
                &[],
                b"{\"message\":\"Not Found\"}",
                None,
            ),
        }
        return;
    }

    if path != "/export/zip/allCountries.zip" {
        respond(&mut stream, "404 Not Found", &[], b"", None);
        return;
    }

    let get_status = status_line(served.get_status.unwrap_or(served.status));
    let head_status = status_line(served.status);
    let mut headers: Vec<(&str, &str)> = vec![("Content-Type", "application/zip")];
    let etag = served.etag.as_ref().map(|e| format!("\"{e}\""));
    if let Some(e) = etag.as_deref() {
        headers.push(("ETag", e));
    }
    if let Some(lm) = served.last_modified.as_deref() {
        headers.push(("Last-Modified", lm));
    }

    if method.eq_ignore_ascii_case("HEAD") {
        let head = format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
            head_status,
            served.body.len() as u64 + served.head_extra,
            header_block(&headers)
        );
        let _ = stream.write_all(head.as_bytes());
        return;
    }
    if method.eq_ignore_ascii_case("GET") {
        *gets.lock().unwrap() += 1;
        let send = if served.truncate_get {
            Some(served.body.len() / 2)
        } else {
            None
        };
        respond(&mut stream, &get_status, &headers, &served.body, send);
        return;
    }
    respond(&mut stream, "405 Method Not Allowed", &[], b"", None);
}

fn status_line(status: u16) -> String {
    match status {
        200 => "200 OK".to_string(),
        404 => "404 Not Found".to_string(),
        503 => "503 Service Unavailable".to_string(),
        other => format!("{other} Status"),
    }
}

fn header_block(headers: &[(&str, &str)]) -> String {
    headers
        .iter()
        .map(|(k, v)| format!("{k}: {v}\r\n"))
        .collect()
}

/// Writes a response advertising `body.len()` bytes; `send` limits how many are actually sent.
fn respond(
    stream: &mut TcpStream,
    status: &str,
    headers: &[(&str, &str)],
    body: &[u8],
    send: Option<usize>,
) {
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
        status,
        body.len(),
        header_block(headers)
    );
    let _ = stream.write_all(head.as_bytes());
    let n = send.unwrap_or(body.len()).min(body.len());
    let _ = stream.write_all(&body[..n]);
    let _ = stream.flush();
}
