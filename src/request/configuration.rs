//! [`RequestConfiguration`] — the immutable value that starts a scheduler task.

use serde::{Deserialize, Serialize};

use super::epoch::{Epoch, EpochClock};

// ---------------------------------------------------------------------------
// LanguagePair
// ---------------------------------------------------------------------------

/// Source and target language tags (BCP-47 style, e.g. `"en"` → `"ko"`).
///
/// The scheduler treats this as opaque; only the task runner interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// RequestConfiguration
// ---------------------------------------------------------------------------

/// One desired unit of work.
///
/// Two configurations are the *same request* iff every field, epoch
/// included, is equal.  There are no setters: superseding a configuration
/// means building a new one, usually via [`invalidate`](Self::invalidate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfiguration {
    source_tokens: Vec<String>,
    parameters: LanguagePair,
    epoch: Epoch,
}

impl RequestConfiguration {
    /// Build a configuration stamped with the clock's next epoch.
    pub fn new<I, S>(clock: &EpochClock, source_tokens: I, parameters: LanguagePair) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source_tokens: source_tokens.into_iter().map(Into::into).collect(),
            parameters,
            epoch: clock.tick(),
        }
    }

    pub fn source_tokens(&self) -> &[String] {
        &self.source_tokens
    }

    pub fn parameters(&self) -> &LanguagePair {
        &self.parameters
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// `true` when `self` replaces `other` in a scheduler.
    pub fn supersedes(&self, other: &RequestConfiguration) -> bool {
        self.epoch.is_newer_than(other.epoch)
    }

    /// Same tokens and parameters under a fresh epoch.
    ///
    /// Submitting the result re-runs the task even though nothing the user
    /// can see has changed.
    pub fn invalidate(&self, clock: &EpochClock) -> Self {
        Self {
            source_tokens: self.source_tokens.clone(),
            parameters: self.parameters.clone(),
            epoch: clock.tick(),
        }
    }
}
