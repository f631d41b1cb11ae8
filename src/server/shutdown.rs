//! Graceful shutdown trigger for the server binary.

use std::future::{self, Future};
use std::io;

use tokio::signal;
use tracing::{error, info};

/// Resolve when `listener` reports its signal.
///
/// If the listener could not be installed this never resolves, so a broken
/// handler cannot stop the server.
pub async fn wait_for<F>(name: &str, listener: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(e) = listener.await {
        error!("Failed to listen for {name}: {e}");
        future::pending::<()>().await;
    }
}

/// Resolve on Ctrl-C or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = wait_for("Ctrl-C", signal::ctrl_c());

    #[cfg(unix)]
    let terminate = wait_for("SIGTERM", async {
        let mut sig = signal::unix::signal(signal::unix::SignalKind::terminate())?;
        sig.recv().await;
        Ok::<(), io::Error>(())
    });

    #[cfg(not(unix))]
    let terminate = future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn failed_listener_never_resolves() {
        let failed = async {
            Err::<(), _>(io::Error::new(io::ErrorKind::Other, "no signal handler"))
        };

        let waited =
            tokio::time::timeout(Duration::from_millis(50), wait_for("Ctrl-C", failed)).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn delivered_signal_resolves() {
        let delivered = async { Ok::<(), io::Error>(()) };

        let waited =
            tokio::time::timeout(Duration::from_millis(50), wait_for("Ctrl-C", delivered)).await;
        assert!(waited.is_ok());
    }
}
