//! [`TaskOutcome`] — what a [`TaskScheduler`](super::TaskScheduler) publishes.

use crate::request::Epoch;
use crate::service::ErrorKind;

/// Observable state of the scheduler's current epoch.
///
/// The state machine per epoch is:
///
/// ```text
/// Idle ──submit──▶ InFlight(e) ──ok──▶ Succeeded(e, value)
///                              └─err─▶ Failed(e, kind)
/// any ──submit──▶ InFlight(e') (e' > e, nothing more is ever published for e)
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TaskOutcome<T> {
    /// Nothing has been submitted yet.
    #[default]
    Idle,

    /// The task for this epoch is running.
    InFlight(Epoch),

    /// The task for this epoch finished with a value.
    Succeeded(Epoch, T),

    /// The task for this epoch failed.  Terminal until the next submit.
    Failed(Epoch, ErrorKind),
}

impl<T> TaskOutcome<T> {
    /// The epoch this outcome belongs to; `None` for `Idle`.
    pub fn epoch(&self) -> Option<Epoch> {
        match self {
            TaskOutcome::Idle => None,
            TaskOutcome::InFlight(e) | TaskOutcome::Succeeded(e, _) | TaskOutcome::Failed(e, _) => {
                Some(*e)
            }
        }
    }

    /// ```
    /// use emoji_translate::request::Epoch;
    /// use emoji_translate::scheduler::TaskOutcome;
    ///
    /// assert!(!TaskOutcome::<()>::Idle.is_busy());
    /// assert!(TaskOutcome::<()>::InFlight(Epoch::from(1)).is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        matches!(self, TaskOutcome::InFlight(_))
    }

    /// `true` for `Succeeded` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskOutcome::Succeeded(..) | TaskOutcome::Failed(..))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            TaskOutcome::Succeeded(_, value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorKind> {
        match self {
            TaskOutcome::Failed(_, kind) => Some(kind),
            _ => None,
        }
    }

    /// A short label suitable for a status line.
    pub fn label(&self) -> &'static str {
        match self {
            TaskOutcome::Idle => "Idle",
            TaskOutcome::InFlight(_) => "Working",
            TaskOutcome::Succeeded(..) => "Done",
            TaskOutcome::Failed(..) => "Error",
        }
    }
}
