//! Core Signal implementation

use super::core::{ReceiverFn, SignalName};
use super::error::SignalError;
use parking_lot::RwLock;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Type alias for predicate functions
type PredicateFn<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Information about a connected receiver
struct ReceiverInfo<T: Send + Sync + 'static> {
	receiver: ReceiverFn<T>,
	dispatch_uid: Option<String>,
	priority: i32,                     // Higher values execute first
	predicate: Option<PredicateFn<T>>, // Optional condition for execution
}

impl<T: Send + Sync + 'static> Clone for ReceiverInfo<T> {
	fn clone(&self) -> Self {
		Self {
			receiver: Arc::clone(&self.receiver),
			dispatch_uid: self.dispatch_uid.clone(),
			priority: self.priority,
			predicate: self.predicate.clone(),
		}
	}
}

/// A signal that dispatches events to connected receivers
///
/// Clones share the same receiver list.
pub struct Signal<T: Send + Sync + 'static> {
	receivers: Arc<RwLock<Vec<ReceiverInfo<T>>>>,
	name: SignalName,
}

impl<T: Send + Sync + 'static> Signal<T> {
	/// Create a new signal
	///
	/// # Examples
	///
	/// ```
	/// use visitcard_core::signals::{Signal, SignalName};
	///
	/// let signal = Signal::<String>::new(SignalName::POST_SAVE);
	/// assert_eq!(signal.receiver_count(), 0);
	/// assert_eq!(signal.name().as_str(), "post_save");
	/// ```
	pub fn new(name: SignalName) -> Self {
		Self {
			receivers: Arc::new(RwLock::new(Vec::new())),
			name,
		}
	}

	pub fn name(&self) -> SignalName {
		self.name
	}

	/// Connect a receiver with full options
	///
	/// # Arguments
	/// * `receiver` - The receiver function to connect
	/// * `dispatch_uid` - Optional unique identifier; connecting again with the
	///   same uid replaces the earlier receiver
	/// * `priority` - Execution priority (higher values execute first, default: 0)
	pub fn connect_with_options<F, Fut>(
		&self,
		receiver: F,
		dispatch_uid: Option<String>,
		priority: i32,
	) where
		F: Fn(Arc<T>) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<(), SignalError>> + Send + 'static,
	{
		self.connect_with_full_options::<F, Fut, fn(&T) -> bool>(
			receiver,
			dispatch_uid,
			priority,
			None,
		);
	}

	fn connect_with_full_options<F, Fut, P>(
		&self,
		receiver: F,
		dispatch_uid: Option<String>,
		priority: i32,
		predicate: Option<P>,
	) where
		F: Fn(Arc<T>) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<(), SignalError>> + Send + 'static,
		P: Fn(&T) -> bool + Send + Sync + 'static,
	{
		let boxed: ReceiverFn<T> = Arc::new(move |instance| Box::pin(receiver(instance)));
		let pred: Option<PredicateFn<T>> = predicate.map(|p| Arc::new(p) as PredicateFn<T>);
		let mut receivers = self.receivers.write();

		// Remove existing receiver with same dispatch_uid
		if let Some(ref uid) = dispatch_uid {
			receivers.retain(|r| r.dispatch_uid.as_ref() != Some(uid));
		}

		receivers.push(ReceiverInfo {
			receiver: boxed,
			dispatch_uid,
			priority,
			predicate: pred,
		});

		// Stable sort keeps connection order among equal priorities
		receivers.sort_by(|a, b| b.priority.cmp(&a.priority));
	}

	/// Connect a receiver function to this signal
	pub fn connect<F, Fut>(&self, receiver: F)
	where
		F: Fn(Arc<T>) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<(), SignalError>> + Send + 'static,
	{
		self.connect_with_options(receiver, None, 0);
	}

	/// Connect a receiver that only runs when `predicate` holds for the instance
	pub fn connect_if<F, Fut, P>(&self, receiver: F, predicate: P)
	where
		F: Fn(Arc<T>) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<(), SignalError>> + Send + 'static,
		P: Fn(&T) -> bool + Send + Sync + 'static,
	{
		self.connect_with_full_options(receiver, None, 0, Some(predicate));
	}

	/// Disconnect a receiver by dispatch_uid
	pub fn disconnect(&self, dispatch_uid: &str) -> bool {
		let mut receivers = self.receivers.write();
		let original_len = receivers.len();
		receivers.retain(|r| r.dispatch_uid.as_deref() != Some(dispatch_uid));
		receivers.len() < original_len
	}

	/// Send the signal to every receiver, stopping at the first error
	pub async fn send(&self, instance: T) -> Result<(), SignalError> {
		let instance = Arc::new(instance);
		// Snapshot so receivers may connect/disconnect while we dispatch
		let receivers = self.receivers.read().clone();
		tracing::debug!(signal = %self.name, receivers = receivers.len(), "sending signal");

		for receiver_info in receivers {
			if let Some(ref predicate) = receiver_info.predicate
				&& !predicate(&instance)
			{
				continue;
			}

			(receiver_info.receiver)(Arc::clone(&instance)).await?;
		}

		Ok(())
	}

	/// Send the signal to every receiver, collecting each result
	pub async fn send_robust(&self, instance: T) -> Vec<Result<(), SignalError>> {
		let instance = Arc::new(instance);
		let receivers = self.receivers.read().clone();
		let mut results = Vec::with_capacity(receivers.len());

		for receiver_info in receivers {
			if let Some(ref predicate) = receiver_info.predicate
				&& !predicate(&instance)
			{
				continue;
			}

			let result = (receiver_info.receiver)(Arc::clone(&instance)).await;
			if let Err(ref e) = result {
				tracing::warn!(signal = %self.name, error = %e, "signal receiver failed");
			}
			results.push(result);
		}

		results
	}

	/// Get number of connected receivers
	pub fn receiver_count(&self) -> usize {
		self.receivers.read().len()
	}

	/// Clear all receivers
	pub fn disconnect_all(&self) {
		self.receivers.write().clear();
	}
}

impl<T: Send + Sync + 'static> Clone for Signal<T> {
	fn clone(&self) -> Self {
		Self {
			receivers: Arc::clone(&self.receivers),
			name: self.name,
		}
	}
}

impl<T: Send + Sync + 'static> fmt::Debug for Signal<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Signal")
			.field("name", &self.name)
			.field("receiver_count", &self.receiver_count())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use parking_lot::Mutex;
	use rstest::rstest;

	#[rstest]
	#[tokio::test]
	async fn test_send_reaches_all_receivers() {
		// Arrange
		let signal = Signal::<i64>::new(SignalName::POST_SAVE);
		let seen = Arc::new(Mutex::new(Vec::new()));
		for tag in ["a", "b"] {
			let seen = seen.clone();
			signal.connect(move |value| {
				let seen = seen.clone();
				async move {
					seen.lock().push(format!("{}{}", tag, value));
					Ok(())
				}
			});
		}

		// Act
		signal.send(7).await.unwrap();

		// Assert
		assert_eq!(*seen.lock(), vec!["a7".to_string(), "b7".to_string()]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_dispatch_uid_replaces_receiver() {
		// Arrange
		let signal = Signal::<i64>::new(SignalName::POST_SAVE);
		let calls = Arc::new(Mutex::new(0));
		for _ in 0..3 {
			let calls = calls.clone();
			signal.connect_with_options(
				move |_| {
					let calls = calls.clone();
					async move {
						*calls.lock() += 1;
						Ok(())
					}
				},
				Some("audit".to_string()),
				0,
			);
		}

		// Act
		signal.send(1).await.unwrap();

		// Assert
		assert_eq!(signal.receiver_count(), 1);
		assert_eq!(*calls.lock(), 1);
	}

	#[rstest]
	#[tokio::test]
	async fn test_priority_orders_receivers() {
		// Arrange
		let signal = Signal::<()>::new(SignalName::POST_DELETE);
		let order = Arc::new(Mutex::new(Vec::new()));
		for (priority, tag) in [(0, "low"), (10, "high"), (5, "mid")] {
			let order = order.clone();
			signal.connect_with_options(
				move |_| {
					let order = order.clone();
					async move {
						order.lock().push(tag);
						Ok(())
					}
				},
				None,
				priority,
			);
		}

		// Act
		signal.send(()).await.unwrap();

		// Assert
		assert_eq!(*order.lock(), vec!["high", "mid", "low"]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_send_stops_at_first_error() {
		// Arrange
		let signal = Signal::<()>::new(SignalName::POST_SAVE);
		let reached = Arc::new(Mutex::new(false));
		signal.connect_with_options(
			|_| async { Err(SignalError::new("boom")) },
			None,
			1,
		);
		let flag = reached.clone();
		signal.connect(move |_| {
			let flag = flag.clone();
			async move {
				*flag.lock() = true;
				Ok(())
			}
		});

		// Act
		let result = signal.send(()).await;

		// Assert
		assert_eq!(result, Err(SignalError::new("boom")));
		assert!(!*reached.lock());
	}

	#[rstest]
	#[tokio::test]
	async fn test_send_robust_collects_errors() {
		// Arrange
		let signal = Signal::<()>::new(SignalName::POST_SAVE);
		signal.connect(|_| async { Err(SignalError::new("first")) });
		signal.connect(|_| async { Ok(()) });

		// Act
		let results = signal.send_robust(()).await;

		// Assert
		assert_eq!(results.len(), 2);
		assert!(results[0].is_err());
		assert!(results[1].is_ok());
	}

	#[rstest]
	#[tokio::test]
	async fn test_connect_if_skips_when_predicate_false() {
		// Arrange
		let signal = Signal::<i64>::new(SignalName::POST_SAVE);
		let calls = Arc::new(Mutex::new(0));
		let counter = calls.clone();
		signal.connect_if(
			move |_| {
				let counter = counter.clone();
				async move {
					*counter.lock() += 1;
					Ok(())
				}
			},
			|value| *value > 10,
		);

		// Act
		signal.send(3).await.unwrap();
		signal.send(30).await.unwrap();

		// Assert
		assert_eq!(*calls.lock(), 1);
	}

	#[rstest]
	fn test_disconnect_by_uid() {
		// Arrange
		let signal = Signal::<()>::new(SignalName::POST_SAVE);
		signal.connect_with_options(|_| async { Ok(()) }, Some("x".into()), 0);

		// Act & Assert
		assert!(signal.disconnect("x"));
		assert!(!signal.disconnect("x"));
		assert_eq!(signal.receiver_count(), 0);
	}
}
