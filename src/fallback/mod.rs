//! Deterministic local image generator used when the remote service is
//! unavailable.
//!
//! ```text
//! (token, variant_index) ──▶ FallbackLayout ──▶ to_svg ──▶ GeneratedArtifact { origin: Fallback }
//!                               │
//!                               ├─ even: Radiant (radial gradient + light beams)
//!                               └─ odd:  Bokeh   (linear gradient + scattered circles)
//! ```
//!
//! # Quick start
//!
//! ```rust
//! use emoji_translate::fallback::{FallbackGenerator, FallbackStyle};
//!
//! let generator = FallbackGenerator::default();
//! let artifact = generator.generate("🐶", 0);
//!
//! assert!(artifact.is_fallback());
//! assert_eq!(generator.layout("🐶", 0).style, FallbackStyle::Radiant);
//! assert_eq!(artifact, generator.generate("🐶", 0));
//! ```

pub mod layout;
pub mod render;

pub use layout::{FallbackLayout, FallbackStyle, Flourish, GradientKind};
pub use render::to_svg;

use crate::pipeline::GeneratedArtifact;
use crate::service::ImageData;

// ---------------------------------------------------------------------------
// FallbackGenerator
// ---------------------------------------------------------------------------

/// Pure, synchronous placeholder generator.
///
/// Never suspends and never fails; the same `(token, variant_index)` always
/// yields the same artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackGenerator {
    canvas: u32,
}

impl FallbackGenerator {
    /// Generator for a square canvas of `canvas` pixels.
    pub fn new(canvas: u32) -> Self {
        Self { canvas }
    }

    pub fn canvas(&self) -> u32 {
        self.canvas
    }

    /// The structural layout without rendering it.
    pub fn layout(&self, token: &str, variant_index: usize) -> FallbackLayout {
        FallbackLayout::new(token, variant_index, self.canvas)
    }

    pub fn generate(&self, token: &str, variant_index: usize) -> GeneratedArtifact {
        let svg = to_svg(&self.layout(token, variant_index));
        GeneratedArtifact::fallback(token, variant_index, ImageData::svg(svg))
    }
}

impl Default for FallbackGenerator {
    fn default() -> Self {
        Self::new(512)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_generation_is_identical() {
        let generator = FallbackGenerator::default();
        let a = generator.generate("🐶", 0);
        let b = generator.generate("🐶", 0);
        assert_eq!(a, b);
        assert_eq!(generator.layout("🐶", 0), generator.layout("🐶", 0));
    }

    #[test]
    fn artifact_identity_matches_inputs() {
        let artifact = FallbackGenerator::default().generate("🌸", 3);
        assert_eq!(artifact.token, "🌸");
        assert_eq!(artifact.variant_index, 3);
        assert!(artifact.is_fallback());
        assert_eq!(artifact.payload.media_type, "image/svg+xml");
    }

    #[test]
    fn variants_differ() {
        let generator = FallbackGenerator::default();
        assert_ne!(
            generator.generate("🐶", 0).payload,
            generator.generate("🐶", 1).payload
        );
    }

    #[test]
    fn canvas_size_reaches_document() {
        let artifact = FallbackGenerator::new(256).generate("😀", 0);
        let svg = String::from_utf8(artifact.payload.bytes.clone()).unwrap();
        assert!(svg.contains(r#"width="256""#));
    }
}
