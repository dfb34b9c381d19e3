//! Emoji-name translation run through the [`TaskScheduler`](crate::scheduler::TaskScheduler).
//!
//! ```text
//! ["😀", "🐶"] ──display_name──▶ "Grinning Face, Dog Face"
//!                                  │
//!                       Translator::translate(pair)
//!                                  │
//!                                  ▼
//!                   "웃는 얼굴, 개 얼굴" ──align──▶ [😀: 웃는 얼굴, 🐶: 개 얼굴]
//! ```

pub mod align;
pub mod task;

pub use align::{align, TranslatedPart, Translation};
pub use task::{PrepareTask, TranslationTask};
