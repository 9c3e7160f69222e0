//! UDP syslog listener.
//!
//! Receives datagrams, parses each into a canonical record, and hands it to
//! the ingestion pipeline. One task per message; a failed ingestion is
//! reported and dropped, never retried here.

use crate::{app::AppState, ingest, parser};
use tokio::net::UdpSocket;
use tracing::{debug, error, info};

pub async fn start_syslog(state: AppState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr =
        std::env::var("LOGNEST_SYSLOG_ADDR").unwrap_or_else(|_| "127.0.0.1:10514".to_string());
    let socket = UdpSocket::bind(&addr).await?;
    info!("syslog listener: {}", addr);

    let mut buf = vec![0u8; 8192];
    loop {
        let (n, peer) = socket.recv_from(&mut buf).await?;
        // Encoding is the sender's concern; take what is decodable.
        let raw = String::from_utf8_lossy(&buf[..n]).to_string();
        debug!("syslog <= {} bytes from {}", n, peer);

        let state = state.clone();
        tokio::spawn(async move {
            let parsed = parser::parse_message(&raw);
            match ingest::ingest(&state.db, &parsed).await {
                Ok(id) => debug!("ingested message {} from {}", id, peer),
                Err(e) => error!("ingest error from {}: {}", peer, e),
            }
        });
    }
}
