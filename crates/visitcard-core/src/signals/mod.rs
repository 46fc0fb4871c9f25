//! Async signal dispatch.
//!
//! A [`Signal`] holds an ordered list of receivers. Sending awaits each
//! receiver in priority order and stops at the first error, so a failing
//! receiver fails the operation that emitted the signal.
//!
//! ```
//! use visitcard_core::signals::{Signal, SignalName};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let signal = Signal::<String>::new(SignalName::POST_SAVE);
//! signal.connect(|value| async move {
//!     assert_eq!(value.as_str(), "hello");
//!     Ok(())
//! });
//! signal.send("hello".to_string()).await.unwrap();
//! # });
//! ```

mod core;
mod error;
mod signal;

pub use self::core::{ReceiverFn, SignalName};
pub use error::SignalError;
pub use signal::Signal;
