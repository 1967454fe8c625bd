use axum::http::{header, StatusCode};
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Local HTTP server serving one fixed body on every path.
pub struct MockHttpServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockHttpServer {
    pub async fn start(status: StatusCode, body: &'static str) -> std::io::Result<Self> {
        Self::start_with(status, "text/plain", body.as_bytes().to_vec()).await
    }

    /// Serves raw bytes with an explicit content type.
    pub async fn start_with(
        status: StatusCode,
        content_type: &'static str,
        body: Vec<u8>,
    ) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let app = Router::new().fallback(move || {
            let body = body.clone();
            async move { (status, [(header::CONTENT_TYPE, content_type)], body) }
        });

        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// `host:port`, as a Pi-hole host setting.
    pub fn host(&self) -> String {
        self.addr.to_string()
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for MockHttpServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
