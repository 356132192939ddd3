//! TCP accept loop.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use super::handler::handle_connection;
use crate::telemetry;
use crate::{FoodRetriever, PantryError, Result};

/// Line-protocol server.
///
/// Every accepted connection runs on its own task; at most
/// `max_connections` of them are served at once; the rest wait for a free
/// slot. A failing connection never stops the accept loop.
pub struct Server {
    listener: TcpListener,
    retriever: FoodRetriever,
    permits: Arc<Semaphore>,
}

impl Server {
    /// Bind to `address`.
    pub async fn bind(
        address: &str,
        max_connections: usize,
        retriever: FoodRetriever,
    ) -> Result<Self> {
        if max_connections == 0 {
            return Err(PantryError::Configuration(
                "max_connections must be at least 1".to_string(),
            ));
        }
        let listener = TcpListener::bind(address).await.map_err(|e| {
            PantryError::Configuration(format!("failed to bind {address}: {e}"))
        })?;
        Ok(Self {
            listener,
            retriever,
            permits: Arc::new(Semaphore::new(max_connections)),
        })
    }

    /// Address actually bound (useful with port 0).
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections forever.
    pub async fn serve(self) -> Result<()> {
        self.serve_until(std::future::pending()).await
    }

    /// Accept connections until `shutdown` resolves.
    ///
    /// Connections already being served keep running on their tasks.
    pub async fn serve_until(self, shutdown: impl Future<Output = ()>) -> Result<()> {
        let addr = self.local_addr()?;
        info!(%addr, "accepting connections");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!(%addr, "shutting down listener");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => self.spawn_connection(stream, peer),
                    Err(e) => warn!(error = %e, "failed to accept connection"),
                },
            }
        }
    }

    fn spawn_connection(&self, stream: TcpStream, peer: SocketAddr) {
        metrics::counter!(telemetry::CONNECTIONS_TOTAL).increment(1);
        let retriever = self.retriever.clone();
        let permits = Arc::clone(&self.permits);

        tokio::spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            let peer = peer.to_string();
            info!(%peer, "client connected");

            let (read, write) = stream.into_split();
            match handle_connection(BufReader::new(read), write, &retriever, &peer).await {
                Ok(()) => info!(%peer, "client disconnected"),
                Err(e) => warn!(%peer, error = %e, "error handling client connection"),
            }
            debug!(%peer, "connection slot released");
        });
    }
}
