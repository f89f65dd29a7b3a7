#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pixgen::{ImageFetcher, ImageLoader, ModelCatalog, ModelSource, PixgenError, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Pull the `seed` query parameter out of a generation url.
pub fn seed_of(url: &str) -> u64 {
    url.split(['?', '&'])
        .find_map(|part| part.strip_prefix("seed="))
        .and_then(|seed| seed.parse().ok())
        .expect("url carries a seed")
}

/// Loader that records every url and answers per seed.
pub struct FakeLoader {
    pub requested: Mutex<Vec<String>>,
    pub failing: HashSet<u64>,
    pub stalled: HashSet<u64>,
    pub delay: Box<dyn Fn(u64) -> Duration + Send + Sync>,
}

impl FakeLoader {
    pub fn new() -> Self {
        Self {
            requested: Mutex::new(Vec::new()),
            failing: HashSet::new(),
            stalled: HashSet::new(),
            delay: Box::new(|_| Duration::ZERO),
        }
    }

    pub fn failing(mut self, seeds: impl IntoIterator<Item = u64>) -> Self {
        self.failing.extend(seeds);
        self
    }

    /// Seeds whose load never finishes within any reasonable deadline.
    pub fn stalled(mut self, seeds: impl IntoIterator<Item = u64>) -> Self {
        self.stalled.extend(seeds);
        self
    }

    pub fn with_delay(mut self, delay: impl Fn(u64) -> Duration + Send + Sync + 'static) -> Self {
        self.delay = Box::new(delay);
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageLoader for FakeLoader {
    async fn load(&self, url: &str) -> Result<String> {
        self.requested.lock().unwrap().push(url.to_string());
        let seed = seed_of(url);

        if self.stalled.contains(&seed) {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
        tokio::time::sleep((self.delay)(seed)).await;

        if self.failing.contains(&seed) {
            return Err(PixgenError::ImageLoadFailure("connection reset".into()));
        }
        Ok(url.to_string())
    }
}

/// Fetcher serving fixed bytes, or failing when `bytes` is `None`.
pub struct FakeFetcher {
    pub bytes: Option<Vec<u8>>,
    pub calls: Mutex<usize>,
}

impl FakeFetcher {
    pub fn serving(bytes: &[u8]) -> Self {
        Self {
            bytes: Some(bytes.to_vec()),
            calls: Mutex::new(0),
        }
    }

    pub fn broken() -> Self {
        Self {
            bytes: None,
            calls: Mutex::new(0),
        }
    }
}

#[async_trait]
impl ImageFetcher for FakeFetcher {
    async fn fetch_bytes(&self, _url: &str) -> Result<Vec<u8>> {
        *self.calls.lock().unwrap() += 1;
        self.bytes
            .clone()
            .ok_or_else(|| PixgenError::DownloadFailure("image endpoint returned 404".into()))
    }
}

pub struct FixedModels(pub ModelCatalog);

#[async_trait]
impl ModelSource for FixedModels {
    async fn fetch_models(&self) -> ModelCatalog {
        self.0.clone()
    }
}

pub fn init_logging() {
    let _ = pixgen::logger::init_with_config(
        pixgen::logger::LoggerConfig::development().with_colors(false),
    );
}

/// Minimal HTTP/1.1 responder on an ephemeral port. `handler` maps a
/// request path to a status code and body. Returns the base url.
pub async fn spawn_responder<F>(handler: F) -> String
where
    F: Fn(&str) -> (u16, Vec<u8>) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handler = Arc::new(handler);

    tokio::spawn(async move {
        loop {
            let (mut socket, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => break,
            };
            let handler = handler.clone();
            tokio::spawn(async move {
                let mut request: Vec<u8> = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let head = String::from_utf8_lossy(&request);
                let path = head
                    .lines()
                    .next()
                    .and_then(|line| line.split_whitespace().nth(1))
                    .unwrap_or("/")
                    .to_string();

                let (status, body) = (*handler)(&path);
                let reason = if status < 400 { "OK" } else { "Error" };
                let header = format!(
                    "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    status,
                    reason,
                    body.len()
                );
                let _ = socket.write_all(header.as_bytes()).await;
                let _ = socket.write_all(&body).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}", addr)
}
