//! Generated artifacts and their per-token grouping.

use std::sync::Arc;

use crate::service::ImageData;

/// Where an artifact came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactOrigin {
    /// Produced by the remote image service.
    Remote,
    /// Produced locally by the fallback generator.
    Fallback,
}

/// One generated image for a `(token, variant_index)` pair.
///
/// The payload sits behind an `Arc` so state snapshots can be cloned for
/// every subscriber without copying image bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub token: String,
    pub variant_index: usize,
    pub payload: Arc<ImageData>,
    pub origin: ArtifactOrigin,
}

impl GeneratedArtifact {
    pub fn remote(token: impl Into<String>, variant_index: usize, payload: ImageData) -> Self {
        Self {
            token: token.into(),
            variant_index,
            payload: Arc::new(payload),
            origin: ArtifactOrigin::Remote,
        }
    }

    pub fn fallback(token: impl Into<String>, variant_index: usize, payload: ImageData) -> Self {
        Self {
            token: token.into(),
            variant_index,
            payload: Arc::new(payload),
            origin: ArtifactOrigin::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == ArtifactOrigin::Fallback
    }
}

/// All artifacts for one requested token, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactGroup {
    pub token: String,
    pub artifacts: Vec<GeneratedArtifact>,
}

/// Group `artifacts` by token.
///
/// Every token in `tokens` gets a group, in `tokens` order, even when it has
/// no artifacts; artifacts for tokens not in `tokens` are dropped.
pub fn group_by_token(tokens: &[String], artifacts: &[GeneratedArtifact]) -> Vec<ArtifactGroup> {
    tokens
        .iter()
        .map(|token| ArtifactGroup {
            token: token.clone(),
            artifacts: artifacts
                .iter()
                .filter(|a| &a.token == token)
                .cloned()
                .collect(),
        })
        .collect()
}
