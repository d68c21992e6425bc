//! Layout arithmetic for the logo composition.
//!
//! Everything here is a pure function of the parameters: text widths are
//! measured at a fixed reference size, combined with fixed spacing constants
//! into a content width, floored at a minimum canvas width and multiplied by
//! the export scale. The compositor consumes the same [`TextLayout`] so the
//! measured positions and the drawn positions can never drift apart.

use serde::{Deserialize, Serialize};

use crate::identity::LogoParameters;
use crate::text::FontLibrary;

/// Reference text size the names are measured and drawn at, in base units.
pub const REFERENCE_TEXT_SIZE: f32 = 120.0;

/// Size of the thin separator glyph.
pub const SEPARATOR_TEXT_SIZE: f32 = 110.0;

/// Leading space reserved for the icon region.
pub const ICON_SPACE: f32 = 250.0;

/// Gap on each side of the separator glyph when it is shown.
pub const SEPARATOR_GAP: f32 = 34.0;

/// Single gap between the names when the separator is hidden.
pub const WORD_GAP: f32 = 56.0;

/// Trailing margin added to the content width.
pub const MARGIN: f32 = 170.0;

/// Fixed base canvas height.
pub const BASE_HEIGHT: f32 = 500.0;

/// Minimum base canvas width; empty names still yield a valid canvas.
pub const MIN_BASE_WIDTH: f32 = 1200.0;

/// Side of the square box the icon is fitted into.
pub const ICON_BOX: f32 = 190.0;

/// Icon anchor (box and glow center), in base units.
pub const ICON_CENTER: (f32, f32) = (130.0, 250.0);

/// Radius of the decorative glow halo.
pub const GLOW_RADIUS: f32 = 160.0;

/// Baseline the name segments sit on.
pub const BASELINE_Y: f32 = 290.0;

/// Subtitle text size, letter spacing and baseline offset.
pub const SUBTITLE_TEXT_SIZE: f32 = 34.0;
pub const SUBTITLE_LETTER_SPACING: f32 = 6.0;
pub const SUBTITLE_OFFSET_Y: f32 = 70.0;

/// Separator glyph drawn between the name segments.
pub const SEPARATOR_GLYPH: &str = "+";

// ============================================================================
// Dimensions
// ============================================================================

/// Final pixel dimensions of the export surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

// ============================================================================
// Text layout
// ============================================================================

/// Measured positions of the text row, in unscaled base units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextLayout {
    /// Width of `name1` at the reference size.
    pub name1_width: f32,
    /// Width of `name2` at the reference size.
    pub name2_width: f32,
    /// Width of the separator glyph, 0.0 when hidden.
    pub separator_width: f32,
    /// Left edge of `name1`.
    pub name1_x: f32,
    /// Left edge of the separator glyph (meaningless when hidden).
    pub separator_x: f32,
    /// Left edge of `name2`.
    pub name2_x: f32,
    /// Right edge of the text row; the subtitle right-aligns here.
    pub text_end_x: f32,
    /// Icon space + names + middle gap.
    pub content_width: f32,
}

/// Measures both names and the optional separator into a [`TextLayout`].
pub fn layout_text(fonts: &FontLibrary, params: &LogoParameters) -> TextLayout {
    let name1_width = fonts.text_width(params.font, &params.name1, REFERENCE_TEXT_SIZE, 0.0);
    let name2_width = fonts.text_width(params.font, &params.name2, REFERENCE_TEXT_SIZE, 0.0);

    let name1_x = ICON_SPACE;
    let (separator_width, separator_x, name2_x) = if params.show_separator {
        let sep_width = fonts.text_width(params.font, SEPARATOR_GLYPH, SEPARATOR_TEXT_SIZE, 0.0);
        let sep_x = name1_x + name1_width + SEPARATOR_GAP;
        (sep_width, sep_x, sep_x + sep_width + SEPARATOR_GAP)
    } else {
        let next = name1_x + name1_width + WORD_GAP;
        (0.0, next, next)
    };

    let text_end_x = name2_x + name2_width;
    TextLayout {
        name1_width,
        name2_width,
        separator_width,
        name1_x,
        separator_x,
        name2_x,
        text_end_x,
        content_width: text_end_x,
    }
}

/// Computes the export surface dimensions for the current parameters.
///
/// `width >= MIN_BASE_WIDTH * factor` always holds and
/// `height == BASE_HEIGHT * factor` exactly; recompute on every input change,
/// the result is never cached beyond the latest value.
pub fn compute_dimensions(fonts: &FontLibrary, params: &LogoParameters) -> Dimensions {
    let layout = layout_text(fonts, params);
    let base_width = MIN_BASE_WIDTH.max(layout.content_width + MARGIN);
    let factor = params.export_scale.factor();
    Dimensions {
        width: (base_width * factor).round() as u32,
        height: (BASE_HEIGHT * factor).round() as u32,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::ExportScale;

    fn params() -> LogoParameters {
        LogoParameters::default()
    }

    #[test]
    fn height_is_exactly_base_times_factor() {
        let fonts = FontLibrary::new();
        for (scale, expected) in [
            (ExportScale::Sm, 250),
            (ExportScale::Md, 500),
            (ExportScale::Lg, 1000),
            (ExportScale::Xl, 2000),
        ] {
            let mut p = params();
            p.export_scale = scale;
            assert_eq!(compute_dimensions(&fonts, &p).height, expected);
        }
    }

    #[test]
    fn width_respects_scaled_floor() {
        let fonts = FontLibrary::new();
        for scale in [
            ExportScale::Sm,
            ExportScale::Md,
            ExportScale::Lg,
            ExportScale::Xl,
        ] {
            let mut p = params();
            p.export_scale = scale;
            let dims = compute_dimensions(&fonts, &p);
            let floor = (MIN_BASE_WIDTH * scale.factor()).round() as u32;
            assert!(dims.width >= floor, "{} < {}", dims.width, floor);
        }
    }

    #[test]
    fn empty_names_hit_the_floor() {
        let fonts = FontLibrary::new();
        let mut p = params();
        p.name1.clear();
        p.name2.clear();
        let dims = compute_dimensions(&fonts, &p);
        assert_eq!(dims.width, MIN_BASE_WIDTH as u32);
        assert_eq!(dims.height, BASE_HEIGHT as u32);
    }

    #[test]
    fn long_names_grow_the_canvas() {
        let fonts = FontLibrary::new();
        let mut p = params();
        p.name1 = "EXTRAORDINARILY".into();
        p.name2 = "LONGBRANDNAME".into();
        let dims = compute_dimensions(&fonts, &p);
        let layout = layout_text(&fonts, &p);
        assert!(layout.content_width + MARGIN > MIN_BASE_WIDTH);
        assert_eq!(dims.width, (layout.content_width + MARGIN).round() as u32);
    }

    #[test]
    fn separator_widens_the_middle_gap() {
        let fonts = FontLibrary::new();
        let mut with_sep = params();
        with_sep.show_separator = true;
        let mut without = params();
        without.show_separator = false;

        let a = layout_text(&fonts, &with_sep);
        let b = layout_text(&fonts, &without);
        assert!(a.name2_x > b.name2_x);
        assert_eq!(b.separator_width, 0.0);
        // Hidden separator leaves a single fixed gap.
        assert_eq!(b.name2_x - (b.name1_x + b.name1_width), WORD_GAP);
    }

    #[test]
    fn layout_is_deterministic() {
        let fonts = FontLibrary::new();
        let p = params();
        assert_eq!(layout_text(&fonts, &p), layout_text(&fonts, &p));
        assert_eq!(
            compute_dimensions(&fonts, &p),
            compute_dimensions(&fonts, &p)
        );
    }
}
