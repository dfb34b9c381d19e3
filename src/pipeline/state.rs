//! Generation pipeline state machine.
//!
//! [`PipelineState`] is what [`GenerationPipeline::observe`] publishes.  Every
//! value is a complete snapshot, so a subscriber can render it without having
//! seen any earlier state.
//!
//! [`GenerationPipeline::observe`]: super::GenerationPipeline::observe

use crate::service::ErrorKind;

use super::artifact::{ArtifactGroup, GeneratedArtifact};

// ---------------------------------------------------------------------------
// PipelineState
// ---------------------------------------------------------------------------

/// States of the image generation pipeline.
///
/// The state machine transitions are:
///
/// ```text
/// Idle ──start──▶ Generating([])
///                 ──artifact──▶ Generating([.., a])      (only grows)
///                 ──all calls resolved, ≥1 artifact──▶ Completed(groups)
///                 ──all calls resolved, none failed──▶ Completed(empty groups)
///                 ──every call failed──▶ Failed(first error)
/// any state ──start──▶ Generating([])                    (new epoch)
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PipelineState {
    /// Nothing has been started yet.
    #[default]
    Idle,

    /// Calls are outstanding.  Holds the artifacts received so far, in
    /// arrival order.
    Generating(Vec<GeneratedArtifact>),

    /// Every call has resolved.  One group per requested token, in request
    /// order.
    Completed(Vec<ArtifactGroup>),

    /// Every call failed; carries the first recorded error.
    Failed(ErrorKind),
}

impl PipelineState {
    /// Returns `true` while calls are outstanding.
    ///
    /// ```
    /// use emoji_translate::pipeline::PipelineState;
    ///
    /// assert!(!PipelineState::Idle.is_busy());
    /// assert!(PipelineState::Generating(vec![]).is_busy());
    /// assert!(!PipelineState::Completed(vec![]).is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        matches!(self, PipelineState::Generating(_))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Completed(_) | PipelineState::Failed(_))
    }

    /// A short human-readable label for a status line.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineState::Idle => "Idle",
            PipelineState::Generating(_) => "Generating",
            PipelineState::Completed(_) => "Done",
            PipelineState::Failed(_) => "Error",
        }
    }

    /// Number of artifacts in this snapshot.
    pub fn artifact_count(&self) -> usize {
        match self {
            PipelineState::Generating(partial) => partial.len(),
            PipelineState::Completed(groups) => groups.iter().map(|g| g.artifacts.len()).sum(),
            PipelineState::Idle | PipelineState::Failed(_) => 0,
        }
    }

    pub fn groups(&self) -> Option<&[ArtifactGroup]> {
        match self {
            PipelineState::Completed(groups) => Some(groups),
            _ => None,
        }
    }

    pub fn partial(&self) -> Option<&[GeneratedArtifact]> {
        match self {
            PipelineState::Generating(partial) => Some(partial),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorKind> {
        match self {
            PipelineState::Failed(kind) => Some(kind),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
