//! Image generation pipeline.
//!
//! This module fans a [`GenerationRequest`](crate::request::GenerationRequest)
//! out into independent image calls and exposes the aggregated result as an
//! observable [`PipelineState`].
//!
//! # Architecture
//!
//! ```text
//! GenerationPipeline::start(request)
//!        │
//!        ├─ publish Generating([])
//!        │
//!        └─ driver task (one per epoch)
//!              ├─ call (token, v0) ─┐
//!              ├─ call (token, v1) ─┼─ mpsc ─▶ Aggregate ─▶ Generating(partial)
//!              └─ ...              ─┘                    └─▶ Completed(groups) | Failed
//!
//! watch::Receiver<PipelineState> ←─── observe()
//! ```
//!
//! A call whose image service reports `Unavailable` is answered by the
//! [`FallbackGenerator`](crate::fallback::FallbackGenerator) instead.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use emoji_translate::config::AppConfig;
//! use emoji_translate::pipeline::{GenerationPipeline, PipelineState};
//! use emoji_translate::service::ApiImageGenerator;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let generator = Arc::new(ApiImageGenerator::from_config(&config.generation));
//!     let pipeline = GenerationPipeline::from_config(generator, &config.generation, &config.scheduler);
//!
//!     let mut states = pipeline.observe();
//!     pipeline.start(pipeline.request(["😀", "🐶"]));
//!
//!     let state = states.wait_for(PipelineState::is_terminal).await.unwrap();
//!     for group in state.groups().unwrap_or_default() {
//!         println!("{}: {} images", group.token, group.artifacts.len());
//!     }
//! }
//! ```

pub mod artifact;
pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use artifact::{group_by_token, ArtifactGroup, ArtifactOrigin, GeneratedArtifact};
pub use runner::{prompt_for, GenerationPipeline};
pub use state::PipelineState;
