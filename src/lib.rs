//! Emoji translation and illustration.
//!
//! Pick a few emoji, translate their names into another language through a
//! [`scheduler::TaskScheduler`], and illustrate each one with a
//! [`pipeline::GenerationPipeline`] that falls back to locally drawn
//! placeholders when no image service is available.

pub mod config;
pub mod emoji;
pub mod fallback;
pub mod pipeline;
pub mod request;
pub mod scheduler;
pub mod service;
pub mod translation;
