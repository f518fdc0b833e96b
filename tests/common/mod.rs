//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use forecast_cascade::config::{CascadeConfig, Tier};
use forecast_cascade::http::HttpServer;
use forecast_cascade::lifecycle::Shutdown;

/// A running tier. Dropping it does not stop the server; call `stop`.
pub struct RunningTier {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl RunningTier {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn stop(&self) {
        self.shutdown.trigger();
    }
}

/// Config with short waits so retry and breaker paths finish quickly.
pub fn fast_config(retry_count: u32, failure_threshold: u32, break_ms: u64) -> CascadeConfig {
    let mut config = CascadeConfig::default();
    config.resilience.retry_count = retry_count;
    config.resilience.retry_interval_ms = Some(20);
    config.resilience.failure_threshold = failure_threshold;
    config.resilience.break_duration_ms = Some(break_ms);
    config.resilience.attempt_timeout_ms = Some(2_000);
    config
}

/// Same as `fast_config`, pointed at `downstream`.
pub fn fast_config_to(downstream: &str, retry_count: u32, failure_threshold: u32, break_ms: u64) -> CascadeConfig {
    let mut config = fast_config(retry_count, failure_threshold, break_ms);
    config.downstream.base_url = Some(downstream.to_string());
    config
}

/// Serve a pre-built app on an ephemeral port with the full middleware stack.
pub async fn spawn_app(tier: Tier, config: CascadeConfig, app: Router) -> RunningTier {
    serve(HttpServer::with_app(tier, config, app)).await
}

/// Assemble `tier` from `config` and serve it on an ephemeral port.
pub async fn spawn_tier(tier: Tier, config: CascadeConfig) -> RunningTier {
    let server = HttpServer::new(tier, config).expect("tier assembles");
    serve(server).await
}

async fn serve(server: HttpServer) -> RunningTier {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    RunningTier { addr, shutdown }
}

/// Mock downstream that answers each request with `f(n)`, where `n` is the
/// zero-based request number. Returns the address and a request counter.
pub async fn start_programmable_backend<F, Fut>(f: F) -> (SocketAddr, Arc<AtomicU32>)
where
    F: Fn(u32) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let counter = counter.clone();
                    tokio::spawn(async move {
                        read_request_head(&mut socket).await;
                        let n = counter.fetch_add(1, Ordering::SeqCst);
                        let (status, body) = f(n).await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, calls)
}

/// Mock downstream that always answers with the same status and body.
pub async fn start_mock_backend(status: u16, body: &'static str) -> (SocketAddr, Arc<AtomicU32>) {
    start_programmable_backend(move |_| async move { (status, body.to_string()) }).await
}

/// An address nothing listens on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

async fn read_request_head(socket: &mut tokio::net::TcpStream) {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    loop {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    return;
                }
            }
        }
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}
