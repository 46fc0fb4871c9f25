//! Graceful shutdown coordination.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{broadcast, watch};

/// Broadcasts a shutdown request to the accept loop and every open
/// connection, then lets the caller wait (bounded by a timeout) for the
/// server to report that it stopped.
#[derive(Clone)]
pub struct ShutdownCoordinator {
	timeout: Duration,
	shutdown_tx: broadcast::Sender<()>,
	complete_tx: Arc<watch::Sender<bool>>,
	triggered: Arc<AtomicBool>,
}

impl ShutdownCoordinator {
	/// # Examples
	///
	/// ```
	/// use std::time::Duration;
	/// use visitcard_server::ShutdownCoordinator;
	///
	/// let coordinator = ShutdownCoordinator::new(Duration::from_secs(5));
	/// assert!(!coordinator.is_shutting_down());
	/// coordinator.shutdown();
	/// assert!(coordinator.is_shutting_down());
	/// ```
	pub fn new(timeout: Duration) -> Self {
		let (shutdown_tx, _) = broadcast::channel(1);
		let (complete_tx, _) = watch::channel(false);
		Self {
			timeout,
			shutdown_tx,
			complete_tx: Arc::new(complete_tx),
			triggered: Arc::new(AtomicBool::new(false)),
		}
	}

	pub fn timeout(&self) -> Duration {
		self.timeout
	}

	/// Receiver that fires once [`shutdown`](Self::shutdown) is called
	pub fn subscribe(&self) -> broadcast::Receiver<()> {
		self.shutdown_tx.subscribe()
	}

	/// Ask the server to stop; repeated calls are no-ops
	pub fn shutdown(&self) {
		if !self.triggered.swap(true, Ordering::SeqCst) {
			tracing::info!("shutdown requested");
			// No subscribers simply means nothing is running yet
			let _ = self.shutdown_tx.send(());
		}
	}

	pub fn is_shutting_down(&self) -> bool {
		self.triggered.load(Ordering::SeqCst)
	}

	/// Called by the server once it stopped accepting connections
	pub fn notify_shutdown_complete(&self) {
		self.complete_tx.send_replace(true);
	}

	/// Wait until the server reports completion or the timeout elapses.
	///
	/// Returns `true` when the server finished in time.
	pub async fn wait_for_shutdown(&self) -> bool {
		let mut rx = self.complete_tx.subscribe();
		match tokio::time::timeout(self.timeout, rx.wait_for(|done| *done)).await {
			Ok(Ok(_)) => true,
			Ok(Err(_)) => false,
			Err(_) => {
				tracing::warn!(timeout = ?self.timeout, "graceful shutdown timed out");
				false
			}
		}
	}
}

/// Resolves on Ctrl-C (and SIGTERM on unix)
pub async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = tokio::signal::ctrl_c().await {
			tracing::error!(error = %e, "failed to listen for Ctrl-C");
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
			Ok(mut signal) => {
				signal.recv().await;
			}
			Err(e) => {
				tracing::error!(error = %e, "failed to listen for SIGTERM");
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {}
		_ = terminate => {}
	}
}
