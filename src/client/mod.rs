//! HTTP client for the web shell backend.
//!
//! Three JSON endpoints: command execution, process listing and process
//! cancellation. The backend is opaque; this module only knows the
//! request/response shapes in [`crate::models`].

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::constants::{CANCEL_PATH, EXECUTE_PATH, PROCESSES_PATH};
use crate::models::{
    CancelReply, CancelRequest, CommandReply, CommandRequest, ProcessList, ProcessRecord,
};

/// Transport-level failure talking to the backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Unreachable host, refused connection, timeout, broken body stream.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("server returned {0}")]
    Status(StatusCode),
    /// The body was not the JSON shape we expected.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Async client for the backend endpoints. Cheap to clone.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    client: Client,
}

impl BackendClient {
    /// Create a client for `base_url` (including any path prefix).
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Run a command in the backend shell. An empty command only fetches the prompt.
    pub async fn execute(&self, command: &str) -> Result<CommandReply, ClientError> {
        debug!(command, "execute");
        let resp = self
            .client
            .post(self.url(EXECUTE_PATH))
            .json(&CommandRequest { command })
            .send()
            .await?;
        decode(resp).await
    }

    /// Fetch the current process snapshot.
    pub async fn list_processes(&self) -> Result<Vec<ProcessRecord>, ClientError> {
        let resp = self.client.get(self.url(PROCESSES_PATH)).send().await?;
        let list: ProcessList = decode(resp).await?;
        Ok(list.processes)
    }

    /// Ask the backend to cancel every pid in `pids` in one request.
    pub async fn cancel_processes(&self, pids: &[u32]) -> Result<CancelReply, ClientError> {
        debug!(?pids, "cancel_processes");
        let resp = self
            .client
            .post(self.url(CANCEL_PATH))
            .json(&CancelRequest { pids })
            .send()
            .await?;
        decode(resp).await
    }
}

/// Check the status, then parse the body as `T`.
async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(ClientError::Status(status));
    }
    let text = resp.text().await?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::sync::mpsc;

    /// A request as seen by the fake backend: (method, url, body).
    type Seen = (String, String, String);

    /// Serve `body` with `status` for every request on a random local port.
    fn fake_backend(status: u16, body: &'static str) -> (BackendClient, mpsc::Receiver<Seen>) {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || {
            for mut request in server.incoming_requests() {
                let mut received = String::new();
                let _ = request.as_reader().read_to_string(&mut received);
                let _ = tx.send((
                    request.method().as_str().to_string(),
                    request.url().to_string(),
                    received,
                ));
                let response = tiny_http::Response::from_string(body)
                    .with_status_code(status)
                    .with_header(
                        tiny_http::Header::from_bytes("Content-Type", "application/json").unwrap(),
                    );
                let _ = request.respond(response);
            }
        });

        let client = BackendClient::new(
            &format!("http://127.0.0.1:{}/", port),
            Duration::from_secs(5),
        );
        (client, rx)
    }

    #[tokio::test]
    async fn execute_posts_command_and_parses_reply() {
        let (client, seen) =
            fake_backend(200, r#"{"output": "hello", "prompt": "me@box:tmp$ "}"#);
        let reply = client.execute("echo hello").await.unwrap();
        assert_eq!(reply.output.as_deref(), Some("hello"));
        assert_eq!(reply.prompt, "me@box:tmp$ ");

        let (method, url, body) = seen.recv().unwrap();
        assert_eq!(method, "POST");
        assert_eq!(url, "/execute");
        assert_eq!(body, r#"{"command":"echo hello"}"#);
    }

    #[tokio::test]
    async fn list_processes_parses_snapshot() {
        let (client, seen) = fake_backend(
            200,
            r#"{"processes": [
                {"pid": 100, "user": "www", "command": "nginx", "cpu": 1.5, "mem": 0.3},
                {"pid": 200, "user": "me", "command": "python app.py", "cpu": 55, "mem": 12.0}
            ]}"#,
        );
        let procs = client.list_processes().await.unwrap();
        assert_eq!(procs.len(), 2);
        assert_eq!(procs[1].pid, 200);
        assert_eq!(procs[1].command, "python app.py");

        let (method, url, _) = seen.recv().unwrap();
        assert_eq!(method, "GET");
        assert_eq!(url, "/get_processes");
    }

    #[tokio::test]
    async fn cancel_sends_all_pids_in_one_request() {
        let (client, seen) = fake_backend(
            200,
            r#"{"success": true, "errors": [{"pid": 100, "error": "Permission denied"}]}"#,
        );
        let reply = client.cancel_processes(&[100, 200]).await.unwrap();
        assert!(reply.success);
        assert_eq!(reply.errors.len(), 1);
        assert_eq!(reply.errors[0].error, "Permission denied");

        let (_, url, body) = seen.recv().unwrap();
        assert_eq!(url, "/cancel_processes");
        assert_eq!(body, r#"{"pids":[100,200]}"#);
        assert!(seen.try_recv().is_err());
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let (client, _seen) = fake_backend(500, r#"{"error": "boom"}"#);
        let err = client.list_processes().await.unwrap_err();
        assert!(matches!(err, ClientError::Status(s) if s.as_u16() == 500));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let (client, _seen) = fake_backend(200, "<html>not json</html>");
        let err = client.execute("ls").await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        // Bind then drop to get a port with nothing listening.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = BackendClient::new(
            &format!("http://127.0.0.1:{}", port),
            Duration::from_secs(2),
        );
        let err = client.cancel_processes(&[1]).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let client = BackendClient::new("http://host:5000/shell/", Duration::from_secs(1));
        assert_eq!(client.base_url(), "http://host:5000/shell");
        assert_eq!(client.url(EXECUTE_PATH), "http://host:5000/shell/execute");
    }
}
