//! Structural description of a fallback image.
//!
//! Everything here is a pure function of `(token, variant_index, canvas)`.
//! Decorative circle placement draws from a PRNG seeded with an FNV-1a hash
//! of the token and variant, so repeated calls produce identical layouts on
//! every toolchain.

use std::f32::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Geometry is specified on a 512 px reference canvas and scaled.
const REFERENCE_CANVAS: f32 = 512.0;
const MIN_CANVAS: u32 = 64;

// ---------------------------------------------------------------------------
// Style
// ---------------------------------------------------------------------------

/// The two visual branches, selected by variant parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackStyle {
    /// Radial gradient with light beams (even variants).
    Radiant,
    /// Linear gradient with scattered bokeh circles (odd variants).
    Bokeh,
}

impl FallbackStyle {
    /// ```
    /// use emoji_translate::fallback::FallbackStyle;
    ///
    /// assert_eq!(FallbackStyle::for_variant(0), FallbackStyle::Radiant);
    /// assert_eq!(FallbackStyle::for_variant(3), FallbackStyle::Bokeh);
    /// ```
    pub fn for_variant(variant_index: usize) -> Self {
        if variant_index % 2 == 0 {
            FallbackStyle::Radiant
        } else {
            FallbackStyle::Bokeh
        }
    }
}

// ---------------------------------------------------------------------------
// Layout parts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientKind {
    /// Centred, radius `canvas / 1.2`.
    Radial,
    /// Top-left to bottom-right.
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gradient {
    pub kind: GradientKind,
    pub from: &'static str,
    pub to: &'static str,
}

/// Translucent rounded card drawn over the background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Card {
    pub inset: f32,
    pub corner_radius: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub text: String,
    pub font_size: f32,
    pub cx: f32,
    pub cy: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub blur: f32,
    pub offset_y: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beam {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub cx: f32,
    pub cy: f32,
    pub r: f32,
}

/// Foreground decoration drawn over the glyph.
#[derive(Debug, Clone, PartialEq)]
pub enum Flourish {
    Beams {
        beams: Vec<Beam>,
        stroke_width: f32,
        opacity: f32,
    },
    Circles {
        circles: Vec<Circle>,
        opacity: f32,
    },
}

// ---------------------------------------------------------------------------
// FallbackLayout
// ---------------------------------------------------------------------------

/// Complete drawing instructions for one fallback artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackLayout {
    pub canvas: u32,
    pub style: FallbackStyle,
    pub background: Gradient,
    pub card: Card,
    pub glyph: Glyph,
    pub shadow: Shadow,
    pub flourish: Flourish,
}

impl FallbackLayout {
    pub fn new(token: &str, variant_index: usize, canvas: u32) -> Self {
        let canvas = canvas.max(MIN_CANVAS);
        let size = canvas as f32;
        let scale = size / REFERENCE_CANVAS;
        let mid = size / 2.0;
        let style = FallbackStyle::for_variant(variant_index);

        let (background, shadow, flourish) = match style {
            FallbackStyle::Radiant => (
                Gradient {
                    kind: GradientKind::Radial,
                    from: "#007AFF",
                    to: "#30B0C7",
                },
                Shadow {
                    blur: 16.0 * scale,
                    offset_y: 8.0 * scale,
                    opacity: 0.35,
                },
                Flourish::Beams {
                    beams: beams(mid, 40.0 * scale, 220.0 * scale),
                    stroke_width: 6.0 * scale,
                    opacity: 0.25,
                },
            ),
            FallbackStyle::Bokeh => (
                Gradient {
                    kind: GradientKind::Linear,
                    from: "#FF2D55",
                    to: "#FF9500",
                },
                Shadow {
                    blur: 6.0 * scale,
                    offset_y: 3.0 * scale,
                    opacity: 0.2,
                },
                Flourish::Circles {
                    circles: circles(token, variant_index, size, scale),
                    opacity: 0.12,
                },
            ),
        };

        Self {
            canvas,
            style,
            background,
            card: Card {
                inset: 24.0 * scale,
                corner_radius: 28.0 * scale,
                opacity: 0.15,
            },
            glyph: Glyph {
                text: token.to_string(),
                font_size: 220.0 * scale,
                cx: mid,
                cy: mid,
            },
            shadow,
            flourish,
        }
    }
}

/// One beam every 30°.  A closing stroke at 360° would overlap the first.
const BEAM_COUNT: usize = 12;
const CIRCLE_COUNT: usize = 12;

fn beams(mid: f32, inner: f32, outer: f32) -> Vec<Beam> {
    (0..BEAM_COUNT)
        .map(|i| {
            let angle = i as f32 * PI / 6.0;
            let (sin, cos) = angle.sin_cos();
            Beam {
                x1: mid + cos * inner,
                y1: mid + sin * inner,
                x2: mid + cos * outer,
                y2: mid + sin * outer,
            }
        })
        .collect()
}

fn circles(token: &str, variant_index: usize, size: f32, scale: f32) -> Vec<Circle> {
    let mut rng = StdRng::seed_from_u64(seed(token, variant_index));
    (0..CIRCLE_COUNT)
        .map(|_| {
            let r = rng.gen_range(16.0..=44.0) * scale;
            Circle {
                cx: rng.gen_range(r..=size - r),
                cy: rng.gen_range(r..=size - r),
                r,
            }
        })
        .collect()
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a over the token's UTF-8 bytes followed by the variant index
/// as little-endian `u64`.
fn seed(token: &str, variant_index: usize) -> u64 {
    token
        .bytes()
        .chain((variant_index as u64).to_le_bytes())
        .fold(FNV_OFFSET, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_is_fixed_fnv1a() {
        assert_eq!(seed("🐶", 0), 0x5cb1_b711_301a_8c42);
        assert_eq!(seed("🐶", 1), 0x7bac_7e1a_3b09_d663);
    }

    #[test]
    fn full_circle_has_twelve_distinct_beams() {
        let beams = beams(256.0, 40.0, 220.0);
        assert_eq!(beams.len(), 12);
        let last = beams[11];
        assert!((last.x2 - beams[0].x2).abs() > 1.0 || (last.y2 - beams[0].y2).abs() > 1.0);
    }

    #[test]
    fn parity_selects_branch() {
        for v in 0..6 {
            let layout = FallbackLayout::new("🐶", v, 512);
            if v % 2 == 0 {
                assert_eq!(layout.style, FallbackStyle::Radiant);
                assert_eq!(layout.background.kind, GradientKind::Radial);
                assert!(matches!(layout.flourish, Flourish::Beams { .. }));
            } else {
                assert_eq!(layout.style, FallbackStyle::Bokeh);
                assert_eq!(layout.background.kind, GradientKind::Linear);
                assert!(matches!(layout.flourish, Flourish::Circles { .. }));
            }
        }
    }

    #[test]
    fn shadow_differs_by_parity() {
        let even = FallbackLayout::new("😀", 0, 512);
        let odd = FallbackLayout::new("😀", 1, 512);
        assert_eq!(even.shadow.blur, 16.0);
        assert_eq!(even.shadow.offset_y, 8.0);
        assert_eq!(odd.shadow.blur, 6.0);
        assert_eq!(odd.shadow.offset_y, 3.0);
    }

    #[test]
    fn glyph_is_centred_on_reference_canvas() {
        let layout = FallbackLayout::new("🌸", 0, 512);
        assert_eq!(layout.canvas, 512);
        assert_eq!(layout.glyph.text, "🌸");
        assert_eq!(layout.glyph.font_size, 220.0);
        assert_eq!((layout.glyph.cx, layout.glyph.cy), (256.0, 256.0));
        assert_eq!(layout.card.inset, 24.0);
        assert_eq!(layout.card.corner_radius, 28.0);
    }

    #[test]
    fn geometry_scales_with_canvas() {
        let layout = FallbackLayout::new("🌸", 0, 256);
        assert_eq!(layout.glyph.font_size, 110.0);
        assert_eq!(layout.card.inset, 12.0);
    }

    #[test]
    fn tiny_canvas_is_clamped() {
        let layout = FallbackLayout::new("🌸", 1, 1);
        assert_eq!(layout.canvas, MIN_CANVAS);
    }

    #[test]
    fn layout_is_deterministic() {
        assert_eq!(
            FallbackLayout::new("🐶", 1, 512),
            FallbackLayout::new("🐶", 1, 512)
        );
    }

    #[test]
    fn circles_stay_inside_canvas() {
        let layout = FallbackLayout::new("🦊", 1, 512);
        let Flourish::Circles { circles, .. } = layout.flourish else {
            panic!("odd variant must scatter circles");
        };
        assert_eq!(circles.len(), CIRCLE_COUNT);
        for c in circles {
            assert!((16.0..=44.0).contains(&c.r));
            assert!(c.cx - c.r >= 0.0 && c.cx + c.r <= 512.0);
            assert!(c.cy - c.r >= 0.0 && c.cy + c.r <= 512.0);
        }
    }

    #[test]
    fn beams_radiate_from_centre() {
        let layout = FallbackLayout::new("🦊", 0, 512);
        let Flourish::Beams { beams, .. } = layout.flourish else {
            panic!("even variant must draw beams");
        };
        assert_eq!(beams.len(), BEAM_COUNT);
        let first = beams[0];
        assert!((first.x1 - 296.0).abs() < 1e-3);
        assert!((first.x2 - 476.0).abs() < 1e-3);
        assert!((first.y1 - 256.0).abs() < 1e-3);
    }
}
