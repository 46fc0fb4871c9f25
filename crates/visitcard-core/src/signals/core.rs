//! Core signal types

use super::error::SignalError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type-safe signal name
///
/// # Examples
///
/// ```
/// use visitcard_core::signals::SignalName;
///
/// assert_eq!(SignalName::POST_SAVE.as_str(), "post_save");
/// assert_eq!(SignalName::custom("profile_viewed").as_str(), "profile_viewed");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignalName(&'static str);

impl SignalName {
	/// Sent after a model instance is saved
	pub const POST_SAVE: Self = Self("post_save");
	/// Sent after a model instance is deleted
	pub const POST_DELETE: Self = Self("post_delete");

	/// Create a custom signal name
	pub const fn custom(name: &'static str) -> Self {
		Self(name)
	}

	pub const fn as_str(&self) -> &'static str {
		self.0
	}
}

impl fmt::Display for SignalName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.0)
	}
}

/// Signal receiver function type
pub type ReceiverFn<T> = Arc<
	dyn Fn(Arc<T>) -> Pin<Box<dyn Future<Output = Result<(), SignalError>> + Send>> + Send + Sync,
>;
