//! The unit of work a [`TaskScheduler`](super::TaskScheduler) runs per epoch.

use async_trait::async_trait;

use crate::request::RequestConfiguration;
use crate::service::ServiceError;

/// Async operation run once for each submitted configuration.
///
/// The scheduler owns the runner behind an `Arc` and may call `run` for a new
/// epoch while the previous call is still pending, so implementors must be
/// `Send + Sync` and must not rely on calls being serialized.
#[async_trait]
pub trait TaskRunner: Send + Sync + 'static {
    /// Value published in `TaskOutcome::Succeeded`.
    type Output: Clone + Send + Sync + 'static;

    async fn run(&self, configuration: &RequestConfiguration) -> Result<Self::Output, ServiceError>;
}
