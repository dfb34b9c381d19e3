//! Monotonic epoch counter shared by a scheduler and the UI that feeds it.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Epoch
// ---------------------------------------------------------------------------

/// Identifies one generation of requested work.
///
/// Epochs only ever grow.  A higher epoch supersedes every lower one, no
/// matter what the rest of the request looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Epoch(u64);

impl Epoch {
    /// The epoch before any work was requested.
    pub const ZERO: Epoch = Epoch(0);

    pub fn value(self) -> u64 {
        self.0
    }

    /// Returns `true` when `self` supersedes `other`.
    ///
    /// ```
    /// use emoji_translate::request::Epoch;
    ///
    /// assert!(Epoch::from(2).is_newer_than(Epoch::from(1)));
    /// assert!(!Epoch::from(2).is_newer_than(Epoch::from(2)));
    /// ```
    pub fn is_newer_than(self, other: Epoch) -> bool {
        self.0 > other.0
    }
}

impl From<u64> for Epoch {
    fn from(value: u64) -> Self {
        Epoch(value)
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// EpochClock
// ---------------------------------------------------------------------------

/// Hands out strictly increasing epochs.
///
/// Cheap to clone (`Arc` clone); every clone draws from the same counter, so
/// the UI and the component it drives can mint epochs independently without
/// ever producing the same value twice.
#[derive(Debug, Clone, Default)]
pub struct EpochClock {
    last: Arc<AtomicU64>,
}

impl EpochClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next epoch.
    pub fn tick(&self) -> Epoch {
        Epoch(self.last.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// The most recently allocated epoch (`Epoch::ZERO` before the first tick).
    pub fn last(&self) -> Epoch {
        Epoch(self.last.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_one() {
        let clock = EpochClock::new();
        assert_eq!(clock.last(), Epoch::ZERO);
        assert_eq!(clock.tick(), Epoch::from(1));
        assert_eq!(clock.last(), Epoch::from(1));
    }

    #[test]
    fn ticks_strictly_increase() {
        let clock = EpochClock::new();
        let a = clock.tick();
        let b = clock.tick();
        let c = clock.tick();
        assert!(b.is_newer_than(a));
        assert!(c.is_newer_than(b));
    }

    #[test]
    fn clones_share_the_counter() {
        let clock = EpochClock::new();
        let other = clock.clone();
        let a = clock.tick();
        let b = other.tick();
        assert_ne!(a, b);
        assert_eq!(clock.last(), b);
    }

    #[test]
    fn concurrent_ticks_never_collide() {
        let clock = EpochClock::new();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let clock = clock.clone();
                std::thread::spawn(move || (0..250).map(|_| clock.tick()).collect::<Vec<_>>())
            })
            .collect();

        let mut all: Vec<Epoch> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 1000);
        assert_eq!(clock.last(), Epoch::from(1000));
    }

    #[test]
    fn display_uses_hash_prefix() {
        assert_eq!(Epoch::from(7).to_string(), "#7");
    }
}
