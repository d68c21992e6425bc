//! The compositor: draws the logo onto a pixel surface in a fixed order.
//!
//! Draw order (later draws occlude earlier ones): transparent clear, glow
//! halo, icon, `name1`, optional separator, `name2` with its gradient,
//! subtitle. Rendering is a pure function of its inputs: the same parameters,
//! identity and decoded icon always produce byte-identical pixels. Missing
//! fonts degrade to a logged no-op for the text steps; they never fail the
//! render.

use image::{Rgba, RgbaImage};
use log::warn;
use palette::{Hsl, IntoColor, Srgb};

use crate::icon::DecodedIcon;
use crate::identity::{BrandIdentity, LogoParameters, Theme, parse_hex_color};
use crate::layout::{
    self, BASELINE_Y, Dimensions, GLOW_RADIUS, ICON_BOX, ICON_CENTER, REFERENCE_TEXT_SIZE,
    SEPARATOR_GLYPH, SEPARATOR_TEXT_SIZE, SUBTITLE_LETTER_SPACING, SUBTITLE_OFFSET_Y,
    SUBTITLE_TEXT_SIZE,
};
use crate::text::{FontLibrary, TextFill, draw_text};

/// Peak opacity of the glow halo.
const GLOW_ALPHA: f32 = 0.35;

/// Opacity of the accent under-glow behind `name1` in dark theme.
const TEXT_GLOW_ALPHA: f32 = 0.22;

/// Opacity of the icon silhouette outline in dark theme.
const OUTLINE_ALPHA: f32 = 0.18;

/// Renders the full composition onto a fresh surface of `dims` pixels.
pub fn render(
    dims: Dimensions,
    params: &LogoParameters,
    identity: &BrandIdentity,
    icon: &DecodedIcon,
    fonts: &FontLibrary,
) -> RgbaImage {
    let s = params.export_scale.factor();
    let accent = identity.accent();

    // 1. Clear to transparent.
    let mut surface = RgbaImage::from_pixel(dims.width, dims.height, Rgba([0, 0, 0, 0]));

    // 2. Decorative glow halo at the icon anchor.
    let (cx, cy) = (ICON_CENTER.0 * s, ICON_CENTER.1 * s);
    draw_glow(&mut surface, cx, cy, GLOW_RADIUS * s, accent);

    // 3. Icon, fitted into its box, outlined softly in dark theme.
    draw_icon(&mut surface, icon, cx, cy, ICON_BOX * s, params.theme, accent, s);

    // 4-7. Text row and subtitle.
    let text_layout = layout::layout_text(fonts, params);
    let Some(font) = fonts.resolve(params.font) else {
        warn!("no fonts registered; skipping text draws");
        return surface;
    };
    let font = font.clone();
    let baseline = BASELINE_Y * s;
    let name_px = REFERENCE_TEXT_SIZE * s;

    // 4. name1 in the theme text color, glowing in dark theme.
    let name1_x = text_layout.name1_x * s;
    if params.theme == Theme::Dark && !params.name1.is_empty() {
        let offset = (2.0 * s).max(1.0);
        for (dx, dy) in [(-offset, 0.0), (offset, 0.0), (0.0, -offset), (0.0, offset)] {
            draw_text(
                &mut surface,
                &font,
                name_px,
                name1_x + dx,
                baseline + dy,
                &TextFill::Solid(accent),
                &params.name1,
                0.0,
                TEXT_GLOW_ALPHA,
            );
        }
    }
    draw_text(
        &mut surface,
        &font,
        name_px,
        name1_x,
        baseline,
        &TextFill::Solid(params.theme.text_color()),
        &params.name1,
        0.0,
        1.0,
    );

    // 5. Thin separator glyph in the accent color.
    if params.show_separator {
        draw_text(
            &mut surface,
            &font,
            SEPARATOR_TEXT_SIZE * s,
            text_layout.separator_x * s,
            baseline,
            &TextFill::Solid(accent),
            SEPARATOR_GLYPH,
            0.0,
            1.0,
        );
    }

    // 6. name2 with the accent-to-blue gradient across its own span.
    let gradient = TextFill::Gradient {
        from: accent,
        to: parse_hex_color(crate::identity::GRADIENT_END_HEX).expect("fixed gradient end parses"),
        start_x: text_layout.name2_x * s,
        width: (text_layout.name2_width * s).max(1.0),
    };
    draw_text(
        &mut surface,
        &font,
        name_px,
        text_layout.name2_x * s,
        baseline,
        &gradient,
        &params.name2,
        0.0,
        1.0,
    );

    // 7. Subtitle, right-aligned beneath the baseline.
    if !identity.subtitle.is_empty() {
        let spacing = SUBTITLE_LETTER_SPACING * s;
        let subtitle_width =
            fonts.text_width(params.font, &identity.subtitle, SUBTITLE_TEXT_SIZE * s, spacing);
        draw_text(
            &mut surface,
            &font,
            SUBTITLE_TEXT_SIZE * s,
            text_layout.text_end_x * s - subtitle_width,
            baseline + SUBTITLE_OFFSET_Y * s,
            &TextFill::Solid(accent),
            &identity.subtitle,
            spacing,
            1.0,
        );
    }

    surface
}

// ============================================================================
// Draw helpers
// ============================================================================

/// Soft circular glow: accent color with a smooth radial alpha falloff.
///
/// Purely decorative; it blends under everything drawn afterwards.
fn draw_glow(surface: &mut RgbaImage, cx: f32, cy: f32, radius: f32, color: Rgba<u8>) {
    if radius <= 0.0 {
        return;
    }
    let x0 = ((cx - radius).floor().max(0.0)) as u32;
    let y0 = ((cy - radius).floor().max(0.0)) as u32;
    let x1 = ((cx + radius).ceil() as u32).min(surface.width());
    let y1 = ((cy + radius).ceil() as u32).min(surface.height());

    for y in y0..y1 {
        for x in x0..x1 {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let d = (dx * dx + dy * dy).sqrt() / radius;
            if d >= 1.0 {
                continue;
            }
            let falloff = (1.0 - d * d).powi(2);
            let src = Rgba([
                color[0],
                color[1],
                color[2],
                (GLOW_ALPHA * falloff * 255.0).round() as u8,
            ]);
            let dst = surface.get_pixel(x, y);
            surface.put_pixel(x, y, alpha_blend(src, *dst));
        }
    }
}

/// Fits the decoded icon into a `box_px` square centered at `(cx, cy)`,
/// preserving aspect ratio, with a soft silhouette outline in dark theme.
#[allow(clippy::too_many_arguments)]
fn draw_icon(
    surface: &mut RgbaImage,
    icon: &DecodedIcon,
    cx: f32,
    cy: f32,
    box_px: f32,
    theme: Theme,
    accent: Rgba<u8>,
    s: f32,
) {
    let (src_w, src_h) = (icon.image.width(), icon.image.height());
    if src_w == 0 || src_h == 0 || box_px < 1.0 {
        warn!("degenerate icon or box, skipping icon draw");
        return;
    }
    let fit = (box_px / src_w as f32).min(box_px / src_h as f32);
    let target_w = ((src_w as f32 * fit).round() as u32).max(1);
    let target_h = ((src_h as f32 * fit).round() as u32).max(1);
    let fitted = if (target_w, target_h) == (src_w, src_h) {
        icon.image.clone()
    } else {
        image::imageops::resize(
            &icon.image,
            target_w,
            target_h,
            image::imageops::FilterType::Lanczos3,
        )
    };

    let x = (cx - target_w as f32 / 2.0).round() as i32;
    let y = (cy - target_h as f32 / 2.0).round() as i32;

    if theme == Theme::Dark {
        let tint = lighten_color(accent, 0.35);
        let outline = silhouette(
            &fitted,
            Rgba([tint[0], tint[1], tint[2], (OUTLINE_ALPHA * 255.0) as u8]),
        );
        let r = (2.0 * s).round().max(1.0) as i32;
        for (dx, dy) in [
            (-r, 0),
            (r, 0),
            (0, -r),
            (0, r),
            (-r, -r),
            (r, -r),
            (-r, r),
            (r, r),
        ] {
            composite_over(surface, &outline, x + dx, y + dy);
        }
    }

    composite_over(surface, &fitted, x, y);
}

/// The icon's alpha mask filled with a uniform color.
fn silhouette(image: &RgbaImage, color: Rgba<u8>) -> RgbaImage {
    let mut out = RgbaImage::new(image.width(), image.height());
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] > 0 {
            let a = (pixel[3] as u32 * color[3] as u32 / 255) as u8;
            out.put_pixel(x, y, Rgba([color[0], color[1], color[2], a]));
        }
    }
    out
}

/// Composites `src` onto `dest` at `(x, y)` with source-over blending.
pub fn composite_over(dest: &mut RgbaImage, src: &RgbaImage, x: i32, y: i32) {
    let dest_width = dest.width() as i32;
    let dest_height = dest.height() as i32;

    for sy in 0..src.height() {
        for sx in 0..src.width() {
            let dx = x + sx as i32;
            let dy = y + sy as i32;
            if dx < 0 || dy < 0 || dx >= dest_width || dy >= dest_height {
                continue;
            }
            let src_pixel = src.get_pixel(sx, sy);
            if src_pixel[3] == 0 {
                continue;
            }
            let dst_pixel = dest.get_pixel(dx as u32, dy as u32);
            let blended = alpha_blend(*src_pixel, *dst_pixel);
            dest.put_pixel(dx as u32, dy as u32, blended);
        }
    }
}

/// Alpha blends two RGBA pixels (source over destination).
fn alpha_blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let blend = |s: u8, d: u8| -> u8 {
        let sf = s as f32 / 255.0;
        let df = d as f32 / 255.0;
        (((sf * sa + df * da * (1.0 - sa)) / out_a) * 255.0).round() as u8
    };
    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}

/// Lightens a color in HSL space; used for accent-derived tints.
pub fn lighten_color(color: Rgba<u8>, amount: f32) -> Rgba<u8> {
    let rgb = Srgb::new(
        color[0] as f32 / 255.0,
        color[1] as f32 / 255.0,
        color[2] as f32 / 255.0,
    );
    let mut hsl: Hsl = rgb.into_color();
    hsl.lightness = (hsl.lightness + amount).min(1.0);
    let lightened: Srgb = hsl.into_color();
    Rgba([
        (lightened.red * 255.0).round() as u8,
        (lightened.green * 255.0).round() as u8,
        (lightened.blue * 255.0).round() as u8,
        color[3],
    ])
}

// ============================================================================
// Tests
// ============================================================================
