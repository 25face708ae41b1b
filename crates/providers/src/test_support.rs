//! Local HTTP stub standing in for the Gemini endpoint.

use std::thread::{self, JoinHandle};
use tiny_http::{Header, Response, Server};

/// What the client put on the wire for one request.
#[derive(Debug)]
pub struct Seen {
    pub url: String,
    pub api_key: Option<String>,
}

/// Answer one request per entry of `replies`, in order, then stop. Returns the
/// base URL to point a client at and a handle yielding the requests seen.
pub fn serve<B>(replies: Vec<(u16, B)>) -> (String, JoinHandle<Vec<Seen>>)
where
    B: Into<String> + Send + 'static,
{
    let server = Server::http("127.0.0.1:0").expect("bind stub");
    let addr = server.server_addr().to_ip().expect("tcp address");
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for (status, body) in replies {
            let Ok(request) = server.recv() else { break };
            seen.push(Seen {
                url: request.url().to_string(),
                api_key: request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv("x-goog-api-key"))
                    .map(|h| h.value.as_str().to_string()),
            });
            let content_type = Header::from_bytes("Content-Type", "application/json").unwrap();
            let response = Response::from_string(body)
                .with_status_code(status)
                .with_header(content_type);
            let _ = request.respond(response);
        }
        seen
    });
    (format!("http://{}", addr), handle)
}

/// A text reply whose single part is `text`.
pub fn text_reply(text: &str) -> String {
    serde_json::json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
        .to_string()
}
