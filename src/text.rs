//! Font loading, text measurement and glyph rasterization.
//!
//! The engine never touches font files directly; the embedding application
//! registers TTF/OTF bytes per [`FontFamily`] in a [`FontLibrary`]. Requests
//! for an unregistered family fall back to the first registered one. When no
//! font is available at all, measurement degrades to a deterministic per-glyph
//! approximation so layout stays valid, and drawing becomes a logged no-op.

use std::collections::HashMap;

use image::{Rgba, RgbaImage};
use palette::{Mix, Srgb};
use rusttype::{Font, Scale, point};

use crate::error::{Error, Result};
use crate::identity::FontFamily;

/// Advance width per glyph, as a fraction of the text size, used when no
/// font is registered for measurement.
const APPROX_ADVANCE_RATIO: f32 = 0.6;

// ============================================================================
// FontLibrary
// ============================================================================

/// Registered fonts keyed by family.
#[derive(Default)]
pub struct FontLibrary {
    fonts: HashMap<FontFamily, Font<'static>>,
}

impl FontLibrary {
    /// Creates an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers font bytes for a family, replacing any previous entry.
    pub fn register(&mut self, family: FontFamily, data: Vec<u8>) -> Result<()> {
        let font = Font::try_from_vec(data)
            .ok_or_else(|| Error::InvalidInput(format!("unreadable font for {}", family.key())))?;
        self.fonts.insert(family, font);
        Ok(())
    }

    /// Returns true if no fonts are registered.
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Resolves a family to a registered font.
    ///
    /// The requested family wins when present; otherwise the first registered
    /// family in [`FontFamily::ALL`] order is used. `None` only when the
    /// library is empty.
    pub fn resolve(&self, family: FontFamily) -> Option<&Font<'static>> {
        self.fonts
            .get(&family)
            .or_else(|| FontFamily::ALL.iter().find_map(|f| self.fonts.get(f)))
    }

    /// Measures the rendered width of `text` at `px`, including
    /// `letter_spacing` between glyphs.
    pub fn text_width(&self, family: FontFamily, text: &str, px: f32, letter_spacing: f32) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        let glyph_count = text.chars().count();
        let spacing = letter_spacing * (glyph_count.saturating_sub(1)) as f32;

        match self.resolve(family) {
            Some(font) => {
                let scale = Scale::uniform(px);
                let advance: f32 = text
                    .chars()
                    .map(|ch| font.glyph(ch).scaled(scale).h_metrics().advance_width)
                    .sum();
                advance + spacing
            }
            None => glyph_count as f32 * px * APPROX_ADVANCE_RATIO + spacing,
        }
    }
}

// ============================================================================
// Text fills
// ============================================================================

/// Fill applied to drawn glyphs.
#[derive(Debug, Clone, Copy)]
pub enum TextFill {
    /// A single color.
    Solid(Rgba<u8>),

    /// Left-to-right linear gradient over `[start_x, start_x + width)` in
    /// surface coordinates.
    Gradient {
        from: Rgba<u8>,
        to: Rgba<u8>,
        start_x: f32,
        width: f32,
    },
}

impl TextFill {
    /// The fill color at surface column `x`.
    fn color_at(&self, x: f32) -> Rgba<u8> {
        match *self {
            TextFill::Solid(color) => color,
            TextFill::Gradient {
                from,
                to,
                start_x,
                width,
            } => {
                let t = if width <= 0.0 {
                    0.0
                } else {
                    ((x - start_x) / width).clamp(0.0, 1.0)
                };
                mix_rgba(from, to, t)
            }
        }
    }
}

/// Interpolates two colors in linear RGB.
pub fn mix_rgba(a: Rgba<u8>, b: Rgba<u8>, t: f32) -> Rgba<u8> {
    let lin_a: palette::LinSrgb<f32> = Srgb::new(
        a[0] as f32 / 255.0,
        a[1] as f32 / 255.0,
        a[2] as f32 / 255.0,
    )
    .into_linear();
    let lin_b: palette::LinSrgb<f32> = Srgb::new(
        b[0] as f32 / 255.0,
        b[1] as f32 / 255.0,
        b[2] as f32 / 255.0,
    )
    .into_linear();
    let mixed: Srgb<f32> = Srgb::from_linear(lin_a.mix(lin_b, t));
    let alpha = a[3] as f32 + (b[3] as f32 - a[3] as f32) * t;
    Rgba([
        (mixed.red * 255.0).round() as u8,
        (mixed.green * 255.0).round() as u8,
        (mixed.blue * 255.0).round() as u8,
        alpha.round() as u8,
    ])
}

// ============================================================================
// Glyph drawing
// ============================================================================

/// Draws `text` with its baseline at `(x, baseline_y)`.
///
/// Glyph coverage is alpha-composited (source over) onto the surface, with
/// the fill resolved per column so gradients stay continuous across glyphs.
/// `alpha` scales the whole draw (used for glow underdraws).
#[allow(clippy::too_many_arguments)]
pub fn draw_text(
    img: &mut RgbaImage,
    font: &Font<'static>,
    px: f32,
    x: f32,
    baseline_y: f32,
    fill: &TextFill,
    text: &str,
    letter_spacing: f32,
    alpha: f32,
) {
    let scale = Scale::uniform(px);
    let mut caret_x = x;

    for ch in text.chars() {
        let glyph = font
            .glyph(ch)
            .scaled(scale)
            .positioned(point(caret_x, baseline_y));
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, coverage| {
                let px_x = gx as i32 + bb.min.x;
                let px_y = gy as i32 + bb.min.y;
                if px_x < 0 || px_y < 0 {
                    return;
                }
                let (px_x, px_y) = (px_x as u32, px_y as u32);
                if px_x >= img.width() || px_y >= img.height() {
                    return;
                }
                let color = fill.color_at(px_x as f32);
                let sa = coverage * alpha * (color[3] as f32 / 255.0);
                if sa <= 0.0 {
                    return;
                }
                blend_pixel(img.get_pixel_mut(px_x, px_y), color, sa);
            });
        }
        caret_x += glyph.unpositioned().h_metrics().advance_width + letter_spacing;
    }
}

/// Source-over blend of `color` at source alpha `sa` onto `dst`.
fn blend_pixel(dst: &mut Rgba<u8>, color: Rgba<u8>, sa: f32) {
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }
    for c in 0..3 {
        let s = color[c] as f32 / 255.0;
        let d = dst[c] as f32 / 255.0;
        dst[c] = (((s * sa + d * da * (1.0 - sa)) / out_a) * 255.0).round() as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_measures_zero() {
        let lib = FontLibrary::new();
        assert_eq!(lib.text_width(FontFamily::Montserrat, "", 120.0, 0.0), 0.0);
    }

    #[test]
    fn approximate_measurement_without_fonts() {
        let lib = FontLibrary::new();
        let w = lib.text_width(FontFamily::Montserrat, "SEK", 120.0, 0.0);
        assert_eq!(w, 3.0 * 120.0 * APPROX_ADVANCE_RATIO);
    }

    #[test]
    fn letter_spacing_counts_gaps_not_glyphs() {
        let lib = FontLibrary::new();
        let plain = lib.text_width(FontFamily::Montserrat, "AB", 100.0, 0.0);
        let spaced = lib.text_width(FontFamily::Montserrat, "AB", 100.0, 6.0);
        assert_eq!(spaced - plain, 6.0);
    }

    #[test]
    fn resolve_on_empty_library_is_none() {
        let lib = FontLibrary::new();
        assert!(lib.resolve(FontFamily::Orbitron).is_none());
    }

    #[test]
    fn solid_fill_ignores_position() {
        let fill = TextFill::Solid(Rgba([10, 20, 30, 255]));
        assert_eq!(fill.color_at(0.0).0, [10, 20, 30, 255]);
        assert_eq!(fill.color_at(999.0).0, [10, 20, 30, 255]);
    }

    #[test]
    fn gradient_fill_endpoints_and_clamp() {
        let fill = TextFill::Gradient {
            from: Rgba([255, 0, 0, 255]),
            to: Rgba([0, 0, 255, 255]),
            start_x: 100.0,
            width: 200.0,
        };
        assert_eq!(fill.color_at(100.0).0, [255, 0, 0, 255]);
        assert_eq!(fill.color_at(300.0).0, [0, 0, 255, 255]);
        // Before the span clamps to the start color.
        assert_eq!(fill.color_at(0.0).0, [255, 0, 0, 255]);

        let mid = fill.color_at(200.0);
        assert!(mid[0] > 0 && mid[2] > 0, "midpoint blends both endpoints");
    }

    #[test]
    fn mix_endpoints_are_exact() {
        let a = Rgba([12, 34, 56, 255]);
        let b = Rgba([200, 100, 50, 255]);
        assert_eq!(mix_rgba(a, b, 0.0).0, a.0);
        assert_eq!(mix_rgba(a, b, 1.0).0, b.0);
    }

    #[test]
    fn blend_onto_transparent_keeps_color() {
        let mut dst = Rgba([0, 0, 0, 0]);
        blend_pixel(&mut dst, Rgba([10, 200, 30, 255]), 1.0);
        assert_eq!(dst.0, [10, 200, 30, 255]);
    }
}
