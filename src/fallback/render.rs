//! SVG rendering of a [`FallbackLayout`].

use std::fmt::Write as _;

use super::layout::{FallbackLayout, Flourish, GradientKind};

/// Render `layout` as a standalone SVG document.
pub fn to_svg(layout: &FallbackLayout) -> String {
    let size = layout.canvas;
    let s = size as f32;
    let mut svg = String::with_capacity(4096);

    // `write!` into a String cannot fail.
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
    );

    svg.push_str("<defs>\n");
    let bg = layout.background;
    match bg.kind {
        GradientKind::Radial => {
            let _ = writeln!(
                svg,
                r#"<radialGradient id="bg" gradientUnits="userSpaceOnUse" cx="{c}" cy="{c}" r="{r:.2}"><stop offset="0" stop-color="{from}"/><stop offset="1" stop-color="{to}"/></radialGradient>"#,
                c = s / 2.0,
                r = s / 1.2,
                from = bg.from,
                to = bg.to,
            );
        }
        GradientKind::Linear => {
            let _ = writeln!(
                svg,
                r#"<linearGradient id="bg" x1="0" y1="0" x2="1" y2="1"><stop offset="0" stop-color="{}"/><stop offset="1" stop-color="{}"/></linearGradient>"#,
                bg.from, bg.to,
            );
        }
    }
    let shadow = layout.shadow;
    let _ = writeln!(
        svg,
        r##"<filter id="glyph-shadow" x="-50%" y="-50%" width="200%" height="200%"><feDropShadow dx="0" dy="{:.2}" stdDeviation="{:.2}" flood-color="#000000" flood-opacity="{}"/></filter>"##,
        shadow.offset_y,
        shadow.blur / 2.0,
        shadow.opacity,
    );
    svg.push_str("</defs>\n");

    let _ = writeln!(
        svg,
        r#"<rect width="{size}" height="{size}" fill="url(#bg)"/>"#
    );

    let card = layout.card;
    let _ = writeln!(
        svg,
        r##"<rect x="{i:.2}" y="{i:.2}" width="{w:.2}" height="{w:.2}" rx="{r:.2}" fill="#FFFFFF" fill-opacity="{o}"/>"##,
        i = card.inset,
        w = s - 2.0 * card.inset,
        r = card.corner_radius,
        o = card.opacity,
    );

    let glyph = &layout.glyph;
    let _ = writeln!(
        svg,
        r#"<text x="{:.2}" y="{:.2}" font-size="{:.2}" text-anchor="middle" dominant-baseline="central" filter="url(#glyph-shadow)">{}</text>"#,
        glyph.cx,
        glyph.cy,
        glyph.font_size,
        escape(&glyph.text),
    );

    match &layout.flourish {
        Flourish::Beams {
            beams,
            stroke_width,
            opacity,
        } => {
            let _ = writeln!(
                svg,
                r##"<g stroke="#FFFFFF" stroke-opacity="{opacity}" stroke-width="{stroke_width:.2}" stroke-linecap="round">"##
            );
            for b in beams {
                let _ = writeln!(
                    svg,
                    r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}"/>"#,
                    b.x1, b.y1, b.x2, b.y2
                );
            }
            svg.push_str("</g>\n");
        }
        Flourish::Circles { circles, opacity } => {
            let _ = writeln!(svg, r##"<g fill="#FFFFFF" fill-opacity="{opacity}">"##);
            for c in circles {
                let _ = writeln!(
                    svg,
                    r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}"/>"#,
                    c.cx, c.cy, c.r
                );
            }
            svg.push_str("</g>\n");
        }
    }

    svg.push_str("</svg>\n");
    svg
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
