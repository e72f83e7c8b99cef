use std::convert::Infallible;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use crate::router::Router;

/// How long a graceful shutdown waits for in-flight connections to drain.
const SHUTDOWN_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Bind `addr` and serve the router until `shutdown` resolves, then drain
/// in-flight connections (bounded by [`SHUTDOWN_DRAIN_TIMEOUT`]).
///
/// Each accepted connection runs on its own tokio task; request
/// concurrency is whatever the connections carry.
pub async fn serve<F>(router: Router, addr: &str, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send,
{
    let listener = TcpListener::bind(addr).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let router = Arc::new(router);
    let server = auto::Builder::new(TokioExecutor::new());
    let graceful = GracefulShutdown::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, _remote) = match accepted {
                    Ok(pair) => pair,
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let io = TokioIo::new(stream);
                let router = router.clone();
                let service = service_fn(move |request| {
                    let router = router.clone();
                    async move { Ok::<_, Infallible>(router.dispatch(request).await) }
                });

                let connection = graceful.watch(server.serve_connection(io, service).into_owned());
                tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        tracing::debug!(error = %e, "connection closed with error");
                    }
                });
            }
            _ = &mut shutdown => {
                drop(listener);
                break;
            }
        }
    }

    tokio::select! {
        _ = graceful.shutdown() => {
            info!("All connections drained");
        }
        _ = tokio::time::sleep(SHUTDOWN_DRAIN_TIMEOUT) => {
            tracing::warn!("Drain timed out, aborting remaining connections");
        }
    }

    Ok(())
}

/// Resolves on SIGINT (Ctrl+C) or, on unix, SIGTERM.
///
/// Pass this as the `shutdown` future of [`serve`].
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully");
        },
    }
}
