//! Epoch-based task scheduler.
//!
//! Each submitted [`RequestConfiguration`](crate::request::RequestConfiguration)
//! starts a new epoch.  Only the task for the newest epoch may publish a
//! terminal outcome; anything older is aborted or its result discarded.
//!
//! ```text
//! configure(tokens, pair) ──▶ submit ──▶ InFlight(e)
//!                                          │
//!                          TaskRunner::run ┴──▶ Succeeded(e, T) | Failed(e, kind)
//!
//! observe() ──▶ watch::Receiver<TaskOutcome<T>>   (latest value first)
//! ```
//!
//! # Quick start
//!
//! ```rust
//! use async_trait::async_trait;
//! use emoji_translate::request::{LanguagePair, RequestConfiguration};
//! use emoji_translate::scheduler::{TaskOutcome, TaskRunner, TaskScheduler};
//! use emoji_translate::service::ServiceError;
//!
//! struct Count;
//!
//! #[async_trait]
//! impl TaskRunner for Count {
//!     type Output = usize;
//!     async fn run(&self, c: &RequestConfiguration) -> Result<usize, ServiceError> {
//!         Ok(c.source_tokens().len())
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let scheduler = TaskScheduler::new(Count);
//! let mut outcomes = scheduler.observe();
//!
//! let config = scheduler.configure(["🐶", "🌸"], LanguagePair::new("en", "ko"));
//! let epoch = config.epoch();
//! scheduler.submit(config);
//!
//! let outcome = outcomes.wait_for(|o| o.is_terminal()).await.unwrap().clone();
//! assert_eq!(outcome, TaskOutcome::Succeeded(epoch, 2));
//! # }
//! ```

pub mod outcome;
pub mod runner;
pub mod task;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use outcome::TaskOutcome;
pub use runner::TaskScheduler;
pub use task::TaskRunner;
