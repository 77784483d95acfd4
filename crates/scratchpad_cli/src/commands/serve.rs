//! Serve command implementation.

use scratchpad_server::{ScratchpadServer, ServerConfig};
use std::net::SocketAddr;
use tracing::{info, warn};

/// Runs the server until Ctrl-C.
pub fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(config))
}

async fn serve(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting local scratchpad...");
    let server = ScratchpadServer::new(config)?;
    info!(
        "Open on any device in your network: {}",
        lan_url(server.config().bind_addr)
    );

    server.serve_with_shutdown(shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(err) => {
            warn!(error = %err, "cannot listen for Ctrl-C, serving until killed");
            std::future::pending::<()>().await;
        }
    }
}

/// The address other devices should open.
fn lan_url(addr: SocketAddr) -> String {
    if addr.ip().is_unspecified() {
        format!("http://<your-computer-ip>:{}", addr.port())
    } else {
        format!("http://{addr}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_bind_needs_machine_address() {
        let addr: SocketAddr = "0.0.0.0:5000".parse().unwrap();
        assert_eq!(lan_url(addr), "http://<your-computer-ip>:5000");
    }

    #[test]
    fn specific_bind_is_used_verbatim() {
        let addr: SocketAddr = "192.168.1.20:8080".parse().unwrap();
        assert_eq!(lan_url(addr), "http://192.168.1.20:8080");
    }
}
