//! Icon registry, custom uploads and drawable-source resolution.
//!
//! Icons come from two places: a fixed registry of vector glyphs (a key,
//! label, category and a 24x24 path) and user-uploaded bitmaps stored as
//! base64 data URLs. Resolution collapses both into a [`DrawableSource`],
//! a tagged union the compositor consumes without knowing which variant it
//! got. Rasterization is a separate, fallible phase ([`DrawableSource::load`])
//! so the draw step itself stays synchronous and pure.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::identity::truncate_subtitle;

/// Registry key every unknown icon key falls back to.
pub const DEFAULT_ICON_KEY: &str = "palette";

/// Upload size cap for custom icons.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

// ============================================================================
// Icon registry
// ============================================================================

/// A fixed registry entry: a monochrome 24x24 vector glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconDef {
    pub key: &'static str,
    pub label: &'static str,
    pub category: &'static str,
    /// SVG path data in a 24x24 viewBox.
    pub path: &'static str,
}

impl IconDef {
    /// Builds standalone SVG markup for this glyph, filled with `color_hex`.
    pub fn svg_markup(&self, color_hex: &str) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" width="24" height="24"><path d="{}" fill="{}"/></svg>"#,
            self.path, color_hex
        )
    }
}

const REGISTRY: &[IconDef] = &[
    IconDef {
        key: "palette",
        label: "Palette",
        category: "art",
        path: "M12 2a10 10 0 0 0 0 20c1.1 0 2-.9 2-2 0-.5-.2-.9-.5-1.3-.3-.3-.5-.8-.5-1.2 0-1.1.9-2 2-2h2.4c2.5 0 4.6-2 4.6-4.6C22 6.1 17.5 2 12 2zM6.5 13A1.5 1.5 0 1 1 8 11.5 1.5 1.5 0 0 1 6.5 13zm3-4A1.5 1.5 0 1 1 11 7.5 1.5 1.5 0 0 1 9.5 9zm5 0A1.5 1.5 0 1 1 16 7.5 1.5 1.5 0 0 1 14.5 9zm3 4a1.5 1.5 0 1 1 1.5-1.5 1.5 1.5 0 0 1-1.5 1.5z",
    },
    IconDef {
        key: "rocket",
        label: "Rocket",
        category: "tech",
        path: "M12 2c3.5 1.5 6 5 6 9l-2 2v4l-4-2-4 2v-4l-2-2c0-4 2.5-7.5 6-9zm0 5a2 2 0 1 0 2 2 2 2 0 0 0-2-2zM8 18l-3 4 4-1.5zm8 0l1 2.5L21 22z",
    },
    IconDef {
        key: "bolt",
        label: "Bolt",
        category: "tech",
        path: "M13 2 3 14h7l-1 8 10-12h-7l1-8z",
    },
    IconDef {
        key: "code",
        label: "Code",
        category: "tech",
        path: "M9.4 16.6 4.8 12l4.6-4.6L8 6l-6 6 6 6zm5.2 0 4.6-4.6-4.6-4.6L16 6l6 6-6 6zM13 4l-4 16h2l4-16z",
    },
    IconDef {
        key: "camera",
        label: "Camera",
        category: "media",
        path: "M9 3 7.2 5H4a2 2 0 0 0-2 2v12a2 2 0 0 0 2 2h16a2 2 0 0 0 2-2V7a2 2 0 0 0-2-2h-3.2L15 3zm3 5.5A4.5 4.5 0 1 1 7.5 13 4.5 4.5 0 0 1 12 8.5zm0 2A2.5 2.5 0 1 0 14.5 13 2.5 2.5 0 0 0 12 10.5z",
    },
    IconDef {
        key: "music",
        label: "Music",
        category: "media",
        path: "M9 3v10.6a3.5 3.5 0 1 0 2 3.2V7h8v6.6a3.5 3.5 0 1 0 2 3.2V3z",
    },
    IconDef {
        key: "gamepad",
        label: "Gamepad",
        category: "play",
        path: "M6 8a6 6 0 0 0-6 6 4 4 0 0 0 7.2 2.4L8 15h8l.8 1.4A4 4 0 0 0 24 14a6 6 0 0 0-6-6zm1 2h2v2h2v2H9v2H7v-2H5v-2h2zm10 0a1 1 0 1 1-1 1 1 1 0 0 1 1-1zm2 3a1 1 0 1 1-1 1 1 1 0 0 1 1-1z",
    },
    IconDef {
        key: "star",
        label: "Star",
        category: "play",
        path: "m12 2 3 6.6 7 .8-5.2 4.8L18.2 21 12 17.4 5.8 21l1.4-6.8L2 9.4l7-.8z",
    },
    IconDef {
        key: "heart",
        label: "Heart",
        category: "life",
        path: "M12 21C7 16.5 2.5 13 2.5 8.5A4.5 4.5 0 0 1 7 4c1.8 0 3.6.9 5 2.4C13.4 4.9 15.2 4 17 4a4.5 4.5 0 0 1 4.5 4.5C21.5 13 17 16.5 12 21z",
    },
    IconDef {
        key: "leaf",
        label: "Leaf",
        category: "life",
        path: "M20 4c-9 0-15 4-16 12 0 2 1 4 3 4 7 0 13-5 13-16zM6 18c2-5 5-8 10-10-4 5-6 8-10 10z",
    },
    IconDef {
        key: "coffee",
        label: "Coffee",
        category: "food",
        path: "M4 5h14v3h2a3 3 0 0 1 0 6h-2.3A7 7 0 0 1 11 19a7 7 0 0 1-7-7zm14 5v2h2a1 1 0 0 0 0-2zM3 20h16v2H3z",
    },
    IconDef {
        key: "book",
        label: "Book",
        category: "life",
        path: "M5 2h14a1 1 0 0 1 1 1v18a1 1 0 0 1-1 1H6a3 3 0 0 1-3-3V5a3 3 0 0 1 3-3zm1 14a1 1 0 0 0-1 1 1 1 0 0 0 1 1h12v-2zm2-10v2h8V6z",
    },
];

/// The full fixed icon registry.
pub fn registry() -> &'static [IconDef] {
    REGISTRY
}

/// Looks up a registry entry by key.
pub fn find_icon(key: &str) -> Option<&'static IconDef> {
    REGISTRY.iter().find(|def| def.key == key)
}

/// Registry entries belonging to a category, in registry order.
pub fn icons_in_category(category: &str) -> impl Iterator<Item = &'static IconDef> + '_ {
    REGISTRY.iter().filter(move |def| def.category == category)
}

// ============================================================================
// Custom icons
// ============================================================================

/// A user-uploaded icon, stored as a data URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomIcon {
    pub id: String,
    pub name: String,
    /// `data:<mime>;base64,<payload>` encoding of the uploaded bitmap.
    pub image_data: String,
}

/// The persisted collection of custom icons.
///
/// Ids are minted from a monotonic counter so they stay unique across
/// sessions; the whole collection is written back on every mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomIconCollection {
    icons: Vec<CustomIcon>,
    next_id: u64,
}

impl CustomIconCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and stores an upload, returning the minted icon.
    ///
    /// Rejects non-image MIME types and payloads over [`MAX_UPLOAD_BYTES`]
    /// without touching the collection.
    pub fn add(&mut self, name: &str, mime: &str, bytes: &[u8]) -> Result<&CustomIcon> {
        if !mime.starts_with("image/") {
            return Err(Error::InvalidInput(format!("not an image file: {mime}")));
        }
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(Error::InvalidInput(format!(
                "image exceeds the {} MB upload limit",
                MAX_UPLOAD_BYTES / (1024 * 1024)
            )));
        }
        let icon = CustomIcon {
            id: format!("icon-{:04}", self.next_id),
            name: truncate_subtitle(name),
            image_data: encode_data_url(mime, bytes),
        };
        self.next_id += 1;
        self.icons.push(icon);
        Ok(self.icons.last().expect("just pushed"))
    }

    /// Removes an icon by id. Returns true if something was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.icons.len();
        self.icons.retain(|icon| icon.id != id);
        self.icons.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&CustomIcon> {
        self.icons.iter().find(|icon| icon.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CustomIcon> {
        self.icons.iter()
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

/// Encodes bytes as a `data:` URL.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", BASE64.encode(bytes))
}

/// Decodes the payload of a `data:` URL (or bare base64).
pub fn decode_data_url(data: &str) -> Result<Vec<u8>> {
    let payload = match data.split_once("base64,") {
        Some((_, rest)) => rest,
        None => data,
    };
    BASE64
        .decode(payload.trim())
        .map_err(|e| Error::InvalidInput(format!("undecodable image data: {e}")))
}

// ============================================================================
// Drawable sources
// ============================================================================

/// A resolved glyph source: either registry vector markup or an uploaded
/// bitmap. The compositor handles both uniformly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawableSource {
    /// Standalone SVG markup to be rasterized.
    VectorGlyph { markup: String },

    /// An embedded bitmap, still in its data-URL encoding.
    Bitmap { image_data: String },
}

/// A rasterized icon, ready for synchronous compositing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedIcon {
    pub image: RgbaImage,
}

impl DrawableSource {
    /// Rasterizes the source so vector glyphs fit within `box_px` on their
    /// larger side.
    ///
    /// This is the single fallible phase of the export path; rendering after
    /// it is pure. Bitmaps keep their native size here and are fitted by the
    /// compositor.
    pub fn load(&self, box_px: u32) -> Result<DecodedIcon> {
        match self {
            DrawableSource::VectorGlyph { markup } => {
                let image = rasterize_svg(markup, box_px)?;
                Ok(DecodedIcon { image })
            }
            DrawableSource::Bitmap { image_data } => {
                let bytes = decode_data_url(image_data)?;
                let image = image::load_from_memory(&bytes)?.to_rgba8();
                Ok(DecodedIcon { image })
            }
        }
    }
}

/// Resolves the active icon selection into a drawable source.
///
/// A selected custom icon that still exists wins over the registry key.
/// Unknown registry keys fall back to [`DEFAULT_ICON_KEY`]; this never fails.
pub fn resolve_icon_source(
    icon_key: &str,
    selected_custom: Option<&str>,
    collection: &CustomIconCollection,
    accent_hex: &str,
) -> DrawableSource {
    if let Some(custom) = selected_custom.and_then(|id| collection.get(id)) {
        return DrawableSource::Bitmap {
            image_data: custom.image_data.clone(),
        };
    }
    let def = find_icon(icon_key)
        .or_else(|| find_icon(DEFAULT_ICON_KEY))
        .expect("default icon is registered");
    DrawableSource::VectorGlyph {
        markup: def.svg_markup(accent_hex),
    }
}

// ============================================================================
// SVG rasterization
// ============================================================================

/// Renders SVG markup to an RGBA image scaled to fit `size` on its larger
/// dimension, preserving aspect ratio.
pub fn rasterize_svg(markup: &str, size: u32) -> Result<RgbaImage> {
    let opts = Options::default();
    let tree = Tree::from_str(markup, &opts)
        .map_err(|e| Error::InvalidResponse(format!("unparsable svg: {e}")))?;

    let svg_size = tree.size();
    let scale = size as f32 / svg_size.width().max(svg_size.height());
    let width = (svg_size.width() * scale).ceil().max(1.0) as u32;
    let height = (svg_size.height() * scale).ceil().max(1.0) as u32;

    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| Error::InvalidInput(format!("degenerate svg size {width}x{height}")))?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    Ok(pixmap_to_rgba_image(&pixmap))
}

/// Converts a tiny_skia pixmap (premultiplied alpha) to an `RgbaImage`.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for y in 0..pixmap.height() {
        for x in 0..pixmap.width() {
            let pixel = pixmap.pixel(x, y).expect("in bounds");
            let (r, g, b, a) =
                unpremultiply(pixel.red(), pixel.green(), pixel.blue(), pixel.alpha());
            img.put_pixel(x, y, Rgba([r, g, b, a]));
        }
    }
    img
}

fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    if a == 0 {
        (0, 0, 0, 0)
    } else {
        let a_f = a as f32 / 255.0;
        (
            (r as f32 / a_f).round().min(255.0) as u8,
            (g as f32 / a_f).round().min(255.0) as u8,
            (b as f32 / a_f).round().min(255.0) as u8,
            a,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        use image::ImageFormat;
        let img = RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255]));
        let mut buf = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn registry_contains_default_icon() {
        assert!(find_icon(DEFAULT_ICON_KEY).is_some());
        assert!(registry().len() >= 10);
    }

    #[test]
    fn categories_partition_the_registry() {
        let by_category: usize = ["art", "tech", "media", "play", "life", "food"]
            .iter()
            .map(|cat| icons_in_category(cat).count())
            .sum();
        assert_eq!(by_category, registry().len());
    }

    #[test]
    fn unknown_key_resolves_to_default_icon() {
        let collection = CustomIconCollection::new();
        let source = resolve_icon_source("no-such-icon", None, &collection, "#00f260");
        let DrawableSource::VectorGlyph { markup } = source else {
            panic!("expected a vector glyph");
        };
        let default = find_icon(DEFAULT_ICON_KEY).unwrap();
        assert!(markup.contains(default.path));
    }

    #[test]
    fn custom_icon_takes_precedence_over_key() {
        let mut collection = CustomIconCollection::new();
        let id = collection
            .add("My Logo", "image/png", &png_bytes(4, 4))
            .unwrap()
            .id
            .clone();

        let source = resolve_icon_source("rocket", Some(&id), &collection, "#00f260");
        assert!(matches!(source, DrawableSource::Bitmap { .. }));
    }

    #[test]
    fn dangling_selection_falls_back_to_key() {
        let collection = CustomIconCollection::new();
        let source = resolve_icon_source("rocket", Some("icon-0042"), &collection, "#00f260");
        let DrawableSource::VectorGlyph { markup } = source else {
            panic!("expected a vector glyph");
        };
        assert!(markup.contains(find_icon("rocket").unwrap().path));
    }

    #[test]
    fn oversized_upload_rejected_without_state_change() {
        let mut collection = CustomIconCollection::new();
        let big = vec![0u8; MAX_UPLOAD_BYTES + 1];
        let err = collection.add("big", "image/png", &big).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(collection.is_empty());
    }

    #[test]
    fn non_image_mime_rejected() {
        let mut collection = CustomIconCollection::new();
        let err = collection
            .add("doc", "application/pdf", &[1, 2, 3])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(collection.is_empty());
    }

    #[test]
    fn custom_icon_names_truncate() {
        let mut collection = CustomIconCollection::new();
        let icon = collection
            .add("A NAME THAT IS FAR TOO LONG", "image/png", &png_bytes(2, 2))
            .unwrap();
        assert_eq!(icon.name.chars().count(), 15);
    }

    #[test]
    fn ids_stay_unique_after_removal() {
        let mut collection = CustomIconCollection::new();
        let first = collection
            .add("a", "image/png", &png_bytes(2, 2))
            .unwrap()
            .id
            .clone();
        collection.remove(&first);
        let second = collection
            .add("b", "image/png", &png_bytes(2, 2))
            .unwrap()
            .id
            .clone();
        assert_ne!(first, second);
    }

    #[test]
    fn data_url_round_trip() {
        let bytes = vec![1u8, 2, 3, 4, 5];
        let url = encode_data_url("image/png", &bytes);
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(decode_data_url(&url).unwrap(), bytes);
    }

    #[test]
    fn vector_glyph_loads_at_requested_box() {
        let collection = CustomIconCollection::new();
        let source = resolve_icon_source("bolt", None, &collection, "#00f260");
        let decoded = source.load(64).unwrap();
        assert_eq!(decoded.image.width().max(decoded.image.height()), 64);
    }

    #[test]
    fn bitmap_loads_from_data_url() {
        let mut collection = CustomIconCollection::new();
        let id = collection
            .add("photo", "image/png", &png_bytes(8, 6))
            .unwrap()
            .id
            .clone();
        let source = resolve_icon_source("palette", Some(&id), &collection, "#00f260");
        let decoded = source.load(64).unwrap();
        assert_eq!((decoded.image.width(), decoded.image.height()), (8, 6));
    }
}
