//! Minimal Prometheus scrape endpoint.
//!
//! `Registry` handles are shared, so the caller passes a clone of the
//! registry the metrics were registered in.

use prometheus::Registry;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use xc_telemetry::encode_metrics;

/// Serve `registry` in text format on every connection accepted by
/// `listener`, until `shutdown` flips.
pub async fn serve_metrics(
    listener: TcpListener,
    registry: Registry,
    mut shutdown: watch::Receiver<bool>,
) {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "[runtime] metrics endpoint listening");
    }
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (mut stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!("[runtime] metrics accept failed: {}", e);
                        continue;
                    }
                };
                let registry = registry.clone();
                tokio::spawn(async move {
                    // The request itself is irrelevant; drain what arrived.
                    let mut buf = [0u8; 1024];
                    let _ = stream.read(&mut buf).await;

                    let response = match encode_metrics(&registry) {
                        Ok(body) => format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: text/plain; version=0.0.4\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        ),
                        Err(e) => {
                            warn!("[runtime] metrics encoding failed: {}", e);
                            "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string()
                        }
                    };
                    if let Err(e) = stream.write_all(response.as_bytes()).await {
                        debug!(%peer, "[runtime] metrics write failed: {}", e);
                    }
                    let _ = stream.shutdown().await;
                });
            }
            _ = shutdown.changed() => {
                info!("[runtime] metrics endpoint shutting down");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpStream;
    use xc_telemetry::ChainMetrics;

    #[tokio::test]
    async fn test_scrape_returns_metrics() {
        let registry = Registry::new();
        let metrics = ChainMetrics::register(&registry).unwrap();
        metrics.blocks_produced.inc();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = watch::channel(false);
        let server = tokio::spawn(serve_metrics(listener, registry.clone(), rx));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(b"GET /metrics HTTP/1.1\r\n\r\n").await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();

        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.contains("xc_runtime_blocks_produced_total 1"));

        tx.send(true).unwrap();
        server.await.unwrap();
    }
}
