//! [`TaskScheduler`] — runs one task per submitted configuration and
//! publishes the outcome of the current epoch only.
//!
//! # Flow
//!
//! ```text
//! submit(config e)
//!   ├─ e <= current ──▶ dropped (stale configuration)
//!   └─ e >  current ──▶ current = e, abort previous task (optional)
//!                       publish InFlight(e)
//!                       tokio::spawn(runner.run(config))
//!                           └─▶ complete(e, result)   (a panic is a failure)
//!                                 ├─ e == current ─▶ publish Succeeded / Failed
//!                                 └─ e != current ─▶ discard
//! ```
//!
//! The epoch comparison and the publication happen under one mutex, the same
//! one `submit` takes, so a result can never be published after a newer
//! `InFlight`.

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::SchedulerConfig;
use crate::request::{Epoch, EpochClock, LanguagePair, RequestConfiguration};
use crate::service::ServiceError;

use super::outcome::TaskOutcome;
use super::task::TaskRunner;

/// Lock a mutex, recovering the data if a panicking holder poisoned it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

struct Current {
    epoch: Epoch,
    task: Option<JoinHandle<()>>,
}

struct Shared<T> {
    current: Mutex<Current>,
    outcome_tx: watch::Sender<TaskOutcome<T>>,
}

impl<T: Clone + Send + Sync + 'static> Shared<T> {
    fn complete(&self, epoch: Epoch, result: Result<T, ServiceError>) {
        let current = lock(&self.current);
        if current.epoch != epoch {
            log::debug!(
                "scheduler: discarding result for {epoch}, current is {}",
                current.epoch
            );
            return;
        }

        let outcome = match result {
            Ok(value) => {
                log::debug!("scheduler: {epoch} succeeded");
                TaskOutcome::Succeeded(epoch, value)
            }
            Err(err) => {
                log::warn!("scheduler: {epoch} failed: {err}");
                TaskOutcome::Failed(epoch, err.kind())
            }
        };
        self.outcome_tx.send_replace(outcome);
    }
}

// ---------------------------------------------------------------------------
// TaskScheduler
// ---------------------------------------------------------------------------

/// Runs a [`TaskRunner`] for each submitted [`RequestConfiguration`].
///
/// `submit` must be called from within a tokio runtime.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use emoji_translate::config::AppConfig;
/// use emoji_translate::request::LanguagePair;
/// use emoji_translate::scheduler::TaskScheduler;
/// use emoji_translate::service::ApiTranslator;
/// use emoji_translate::translation::TranslationTask;
///
/// # async fn example() {
/// let config = AppConfig::default();
/// let translator = Arc::new(ApiTranslator::from_config(&config.translation));
/// let scheduler = TaskScheduler::new(TranslationTask::new(
///     translator,
///     config.translation.languages.clone(),
/// ));
///
/// let mut outcomes = scheduler.observe();
/// scheduler.submit(scheduler.configure(["🐶", "🌸"], LanguagePair::new("en", "ko")));
///
/// let outcome = outcomes.wait_for(|o| o.is_terminal()).await.unwrap();
/// println!("{:?}", *outcome);
/// # }
/// ```
pub struct TaskScheduler<R: TaskRunner> {
    runner: Arc<R>,
    clock: EpochClock,
    shared: Arc<Shared<R::Output>>,
    abort_superseded: bool,
}

impl<R: TaskRunner> TaskScheduler<R> {
    /// Scheduler with default [`SchedulerConfig`].
    pub fn new(runner: R) -> Self {
        Self::with_config(runner, &SchedulerConfig::default())
    }

    pub fn with_config(runner: R, config: &SchedulerConfig) -> Self {
        let (outcome_tx, _) = watch::channel(TaskOutcome::Idle);
        Self {
            runner: Arc::new(runner),
            clock: EpochClock::new(),
            shared: Arc::new(Shared {
                current: Mutex::new(Current {
                    epoch: Epoch::ZERO,
                    task: None,
                }),
                outcome_tx,
            }),
            abort_superseded: config.abort_superseded,
        }
    }

    /// The clock this scheduler's configurations should be minted from.
    pub fn clock(&self) -> &EpochClock {
        &self.clock
    }

    /// Build a configuration stamped with this scheduler's next epoch.
    pub fn configure<I, S>(&self, tokens: I, parameters: LanguagePair) -> RequestConfiguration
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RequestConfiguration::new(&self.clock, tokens, parameters)
    }

    /// Start the epoch described by `configuration`.
    ///
    /// Publishes `InFlight` before returning and never blocks on the task.
    /// A configuration that is not newer than the current epoch is dropped.
    pub fn submit(&self, configuration: RequestConfiguration) {
        let epoch = configuration.epoch();
        let mut current = lock(&self.shared.current);

        if !epoch.is_newer_than(current.epoch) {
            log::debug!(
                "scheduler: dropping stale configuration {epoch}, current is {}",
                current.epoch
            );
            return;
        }

        if let Some(previous) = current.task.take() {
            if self.abort_superseded {
                previous.abort();
            }
        }

        log::debug!("scheduler: {} superseded by {epoch}", current.epoch);
        current.epoch = epoch;
        self.shared.outcome_tx.send_replace(TaskOutcome::InFlight(epoch));

        let runner = Arc::clone(&self.runner);
        let shared = Arc::clone(&self.shared);
        current.task = Some(tokio::spawn(async move {
            let result = AssertUnwindSafe(runner.run(&configuration))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    log::error!("scheduler: task for {epoch} panicked");
                    Err(ServiceError::Request("task panicked".into()))
                });
            shared.complete(epoch, result);
        }));
    }

    /// Subscribe to outcomes.
    ///
    /// The receiver starts at the latest outcome, so late subscribers see a
    /// finished epoch immediately.
    pub fn observe(&self) -> watch::Receiver<TaskOutcome<R::Output>> {
        self.shared.outcome_tx.subscribe()
    }

    /// Snapshot of the latest outcome.
    pub fn outcome(&self) -> TaskOutcome<R::Output> {
        self.shared.outcome_tx.borrow().clone()
    }

    pub fn current_epoch(&self) -> Epoch {
        lock(&self.shared.current).epoch
    }
}

impl<R: TaskRunner> Drop for TaskScheduler<R> {
    fn drop(&mut self) {
        if let Some(task) = lock(&self.shared.current).task.take() {
            task.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::ErrorKind;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;
    use tokio::time::timeout;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Upper-cases the first token.  Tokens starting with `slow` wait for
    /// `gate`; `fail` and `unavailable` return the matching error; `panic`
    /// panics.
    struct ScriptedRunner {
        gate: Arc<Notify>,
        finished: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl TaskRunner for ScriptedRunner {
        type Output = String;

        async fn run(&self, configuration: &RequestConfiguration) -> Result<String, ServiceError> {
            let token = configuration
                .source_tokens()
                .first()
                .cloned()
                .unwrap_or_default();

            if token.starts_with("slow") {
                self.gate.notified().await;
            }
            self.finished.fetch_add(1, Ordering::SeqCst);

            match token.as_str() {
                "panic" => panic!("runner bug"),
                "fail" => Err(ServiceError::Request("boom".into())),
                "unavailable" => Err(ServiceError::Unavailable),
                other => Ok(other.to_uppercase()),
            }
        }
    }

    struct Harness {
        scheduler: TaskScheduler<ScriptedRunner>,
        gate: Arc<Notify>,
        finished: Arc<AtomicUsize>,
    }

    fn harness(abort_superseded: bool) -> Harness {
        let gate = Arc::new(Notify::new());
        let finished = Arc::new(AtomicUsize::new(0));
        let runner = ScriptedRunner {
            gate: Arc::clone(&gate),
            finished: Arc::clone(&finished),
        };
        let scheduler = TaskScheduler::with_config(runner, &SchedulerConfig { abort_superseded });
        Harness {
            scheduler,
            gate,
            finished,
        }
    }

    fn pair() -> LanguagePair {
        LanguagePair::new("en", "ko")
    }

    async fn terminal(rx: &mut watch::Receiver<TaskOutcome<String>>) -> TaskOutcome<String> {
        let guard = timeout(Duration::from_secs(5), rx.wait_for(|o| o.is_terminal()))
            .await
            .expect("timed out waiting for a terminal outcome")
            .expect("scheduler dropped");
        TaskOutcome::clone(&guard)
    }

    async fn settle(finished: &AtomicUsize, runs: usize) {
        timeout(Duration::from_secs(5), async {
            while finished.load(Ordering::SeqCst) < runs {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("runner did not finish");

        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn starts_idle() {
        let h = harness(true);
        assert_eq!(h.scheduler.outcome(), TaskOutcome::Idle);
        assert_eq!(h.scheduler.current_epoch(), Epoch::ZERO);
    }

    #[tokio::test]
    async fn submit_publishes_in_flight_before_returning() {
        let h = harness(true);
        let config = h.scheduler.configure(["slow"], pair());
        let epoch = config.epoch();

        h.scheduler.submit(config);

        assert_eq!(h.scheduler.outcome(), TaskOutcome::InFlight(epoch));
        h.gate.notify_one();
    }

    #[tokio::test]
    async fn success_is_published_for_current_epoch() {
        let h = harness(true);
        let mut rx = h.scheduler.observe();
        let config = h.scheduler.configure(["dog"], pair());
        let epoch = config.epoch();

        h.scheduler.submit(config);

        assert_eq!(
            terminal(&mut rx).await,
            TaskOutcome::Succeeded(epoch, "DOG".into())
        );
    }

    #[tokio::test]
    async fn service_error_becomes_failed_outcome() {
        let h = harness(true);
        let mut rx = h.scheduler.observe();
        let config = h.scheduler.configure(["fail"], pair());
        let epoch = config.epoch();

        h.scheduler.submit(config);

        assert_eq!(
            terminal(&mut rx).await,
            TaskOutcome::Failed(
                epoch,
                ErrorKind::Service("HTTP request failed: boom".into())
            )
        );
    }

    #[tokio::test]
    async fn unavailable_becomes_plain_failure() {
        let h = harness(true);
        let mut rx = h.scheduler.observe();
        let config = h.scheduler.configure(["unavailable"], pair());
        let epoch = config.epoch();

        h.scheduler.submit(config);

        assert_eq!(
            terminal(&mut rx).await,
            TaskOutcome::Failed(epoch, ErrorKind::Unavailable)
        );
    }

    #[tokio::test]
    async fn panicking_runner_becomes_failed_outcome() {
        let h = harness(true);
        let mut rx = h.scheduler.observe();
        let config = h.scheduler.configure(["panic"], pair());
        let epoch = config.epoch();

        h.scheduler.submit(config);

        assert_eq!(
            terminal(&mut rx).await,
            TaskOutcome::Failed(
                epoch,
                ErrorKind::Service("HTTP request failed: task panicked".into())
            )
        );

        let retry = h.scheduler.configure(["dog"], pair());
        let retry_epoch = retry.epoch();
        h.scheduler.submit(retry);
        settle(&h.finished, 2).await;
        assert_eq!(
            h.scheduler.outcome(),
            TaskOutcome::Succeeded(retry_epoch, "DOG".into())
        );
    }

    /// Without aborting, the superseded task runs to completion and its
    /// result is silently discarded.
    #[tokio::test]
    async fn superseded_result_is_discarded() {
        let h = harness(false);
        let mut rx = h.scheduler.observe();

        let first = h.scheduler.configure(["slow-cat"], pair());
        let second = h.scheduler.configure(["dog"], pair());
        let second_epoch = second.epoch();

        h.scheduler.submit(first);
        h.scheduler.submit(second);

        let expected = TaskOutcome::Succeeded(second_epoch, "DOG".to_string());
        assert_eq!(terminal(&mut rx).await, expected);

        h.gate.notify_one();
        settle(&h.finished, 2).await;

        assert_eq!(h.finished.load(Ordering::SeqCst), 2);
        assert_eq!(h.scheduler.outcome(), expected);
    }

    #[tokio::test]
    async fn superseded_task_is_aborted_when_configured() {
        let h = harness(true);
        let mut rx = h.scheduler.observe();

        let first = h.scheduler.configure(["slow-cat"], pair());
        let second = h.scheduler.configure(["dog"], pair());

        h.scheduler.submit(first);
        h.scheduler.submit(second);
        terminal(&mut rx).await;

        h.gate.notify_one();
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }

        assert_eq!(h.finished.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stale_configuration_is_dropped() {
        let h = harness(true);
        let mut rx = h.scheduler.observe();

        let older = h.scheduler.configure(["cat"], pair());
        let newer = h.scheduler.configure(["dog"], pair());
        let newer_epoch = newer.epoch();

        h.scheduler.submit(newer);
        h.scheduler.submit(older);

        assert_eq!(h.scheduler.current_epoch(), newer_epoch);
        assert_eq!(
            terminal(&mut rx).await,
            TaskOutcome::Succeeded(newer_epoch, "DOG".into())
        );
        settle(&h.finished, 1).await;
        assert_eq!(h.finished.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn resubmitting_after_failure_recovers() {
        let h = harness(true);
        let mut rx = h.scheduler.observe();

        h.scheduler.submit(h.scheduler.configure(["fail"], pair()));
        assert!(terminal(&mut rx).await.error().is_some());

        let retry = h.scheduler.configure(["dog"], pair());
        let retry_epoch = retry.epoch();
        h.scheduler.submit(retry);

        let outcome = timeout(
            Duration::from_secs(5),
            rx.wait_for(|o| o.epoch() == Some(retry_epoch) && o.is_terminal()),
        )
        .await
        .expect("timed out")
        .expect("scheduler dropped")
        .clone();
        assert_eq!(outcome, TaskOutcome::Succeeded(retry_epoch, "DOG".into()));
    }

    #[tokio::test]
    async fn invalidated_configuration_runs_again() {
        let h = harness(true);
        let mut rx = h.scheduler.observe();

        let config = h.scheduler.configure(["dog"], pair());
        let again = config.invalidate(h.scheduler.clock());
        let again_epoch = again.epoch();

        h.scheduler.submit(config);
        terminal(&mut rx).await;
        settle(&h.finished, 1).await;

        h.scheduler.submit(again);
        settle(&h.finished, 2).await;
        assert_eq!(
            h.scheduler.outcome(),
            TaskOutcome::Succeeded(again_epoch, "DOG".into())
        );
    }

    #[tokio::test]
    async fn late_subscriber_sees_terminal_outcome() {
        let h = harness(true);
        let mut rx = h.scheduler.observe();
        let config = h.scheduler.configure(["dog"], pair());
        let epoch = config.epoch();

        h.scheduler.submit(config);
        terminal(&mut rx).await;

        let late = h.scheduler.observe();
        assert_eq!(*late.borrow(), TaskOutcome::Succeeded(epoch, "DOG".into()));
    }
}
