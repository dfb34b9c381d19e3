//! Request values that describe one unit of work.
//!
//! Every "start work" action in the UI produces a fresh, immutable value
//! stamped with an [`Epoch`] taken from an [`EpochClock`].  The scheduler and
//! the generation pipeline compare epochs at the completion boundary to
//! decide whether a result is still wanted.
//!
//! ```text
//! EpochClock::tick() ──▶ RequestConfiguration { tokens, pair, epoch }  ──▶ TaskScheduler
//!                    └─▶ GenerationRequest    { tokens, variants, epoch } ──▶ GenerationPipeline
//! ```
//!
//! # Quick start
//!
//! ```rust
//! use emoji_translate::request::{EpochClock, LanguagePair, RequestConfiguration};
//!
//! let clock = EpochClock::new();
//! let first = RequestConfiguration::new(&clock, ["🐶"], LanguagePair::new("en", "ko"));
//! let again = first.invalidate(&clock);
//!
//! assert!(again.supersedes(&first));
//! assert_eq!(again.source_tokens(), first.source_tokens());
//! ```

pub mod configuration;
pub mod epoch;
pub mod generation;

pub use configuration::{LanguagePair, RequestConfiguration};
pub use epoch::{Epoch, EpochClock};
pub use generation::GenerationRequest;
