//! HTTP access to the flight quote endpoint.

use crate::model::SearchConfig;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Url;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("HTTP {status}: {status_text}")]
    Http { status: u16, status_text: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid request url: {0}")]
    InvalidUrl(String),
}

/// Single-shot GET of a quote path. Implementations never retry.
#[async_trait]
pub trait FetchQuotes: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<Bytes, FetchError>;
}

pub struct FlightClient {
    http: reqwest::Client,
    host: Url,
}

impl FlightClient {
    pub fn new(cfg: &SearchConfig) -> anyhow::Result<Self> {
        let host = Url::parse(&cfg.host)
            .map_err(|e| anyhow::anyhow!("invalid host {:?}: {e}", cfg.host))?;
        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(cfg.timeout)
            .build()?;
        Ok(Self { http, host })
    }

    fn resolve(&self, path: &str) -> Result<Url, FetchError> {
        self.host
            .join(path)
            .map_err(|e| FetchError::InvalidUrl(format!("{path}: {e}")))
    }
}

#[async_trait]
impl FetchQuotes for FlightClient {
    async fn fetch(&self, path: &str) -> Result<Bytes, FetchError> {
        let url = self.resolve(path)?;
        debug!(%url, "GET");
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        resp.bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn config(host: String) -> SearchConfig {
        SearchConfig {
            host,
            base_path: crate::model::DEFAULT_BASE_PATH.into(),
            timeout: Duration::from_secs(5),
            user_agent: "flight-search-test".into(),
            search_id: "test".into(),
        }
    }

    /// Serve one canned HTTP response and hand back the request line.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = sock.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            let resp = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            sock.write_all(resp.as_bytes()).await.unwrap();
            sock.shutdown().await.ok();
            request.lines().next().unwrap_or_default().to_string()
        });
        (format!("http://{addr}"), handle)
    }

    #[tokio::test]
    async fn success_returns_body() {
        let (host, server) = serve_once("200 OK", r#"{"Quotes":[]}"#).await;
        let client = FlightClient::new(&config(host)).unwrap();
        let body = client.fetch("/api/flights/JFK/LAX/2024-01-10").await.unwrap();
        assert_eq!(&body[..], br#"{"Quotes":[]}"#);
        let request_line = server.await.unwrap();
        assert!(request_line.starts_with("GET /api/flights/JFK/LAX/2024-01-10 "));
    }

    #[tokio::test]
    async fn non_success_status_is_http_error() {
        let (host, _server) = serve_once("503 Service Unavailable", "").await;
        let client = FlightClient::new(&config(host)).unwrap();
        let err = client.fetch("/api/flights/JFK/LAX/2024-01-10").await.unwrap_err();
        assert_eq!(
            err,
            FetchError::Http {
                status: 503,
                status_text: "Service Unavailable".into()
            }
        );
    }

    #[tokio::test]
    async fn refused_connection_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = FlightClient::new(&config(format!("http://{addr}"))).unwrap();
        let err = client.fetch("/api/flights/JFK/LAX/2024-01-10").await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)), "{err:?}");
    }

    #[test]
    fn bad_host_is_rejected() {
        assert!(FlightClient::new(&config("not a url".into())).is_err());
    }
}
