//! PNG export and file-name synthesis.
//!
//! The exporter encodes a composed surface losslessly and derives the output
//! file name from the current parameters, or uses a caller-provided name
//! verbatim. It reads its inputs and never mutates them; the "download" is a
//! plain local file write.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::identity::{BrandIdentity, LogoParameters};
use crate::error::Result;

/// An encoded export, ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Writes the artifact into `dir`, returning the full path.
    pub fn save_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Strips everything but ASCII alphanumerics.
fn sanitize_component(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Derives the output file name.
///
/// A non-empty trimmed `custom` wins outright; otherwise the name is
/// synthesized as `Logo-<name1><name2>-<sanitizedSubtitle>-<ThemeLabel>-<sizeCode>.png`.
pub fn file_name(params: &LogoParameters, identity: &BrandIdentity, custom: &str) -> String {
    let custom = custom.trim();
    if !custom.is_empty() {
        return format!("{custom}.png");
    }
    format!(
        "Logo-{}{}-{}-{}-{}.png",
        params.name1,
        params.name2,
        sanitize_component(&identity.subtitle),
        params.theme.label(),
        params.export_scale.code(),
    )
}

/// Encodes a surface as lossless PNG bytes.
pub fn encode_png(surface: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(surface.clone()).write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Encodes the surface and pairs it with its derived file name.
pub fn export_png(
    surface: &RgbaImage,
    params: &LogoParameters,
    identity: &BrandIdentity,
    custom: &str,
) -> Result<ExportArtifact> {
    Ok(ExportArtifact {
        file_name: file_name(params, identity, custom),
        bytes: encode_png(surface)?,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{ExportScale, Theme};
    use image::Rgba;

    fn params() -> LogoParameters {
        let mut p = LogoParameters::new("SEK", "COMIX");
        p.theme = Theme::Dark;
        p.export_scale = ExportScale::Lg;
        p
    }

    #[test]
    fn synthesized_name_strips_subtitle_punctuation() {
        let identity = BrandIdentity::new("palette", "#00f260", "Creator Studio!");
        assert_eq!(
            file_name(&params(), &identity, ""),
            "Logo-SEKCOMIX-CreatorStudio-DarkMode-lg.png"
        );
    }

    #[test]
    fn custom_name_overrides_everything() {
        let identity = BrandIdentity::default_identity();
        assert_eq!(file_name(&params(), &identity, "MyLogo"), "MyLogo.png");
        assert_eq!(file_name(&params(), &identity, "  MyLogo  "), "MyLogo.png");
    }

    #[test]
    fn whitespace_custom_name_falls_through() {
        let identity = BrandIdentity::default_identity();
        assert_eq!(
            file_name(&params(), &identity, "   "),
            "Logo-SEKCOMIX-STUDIO-DarkMode-lg.png"
        );
    }

    #[test]
    fn light_theme_and_sizes_show_in_name() {
        let identity = BrandIdentity::default_identity();
        let mut p = params();
        p.theme = Theme::Light;
        p.export_scale = ExportScale::Xl;
        assert_eq!(
            file_name(&p, &identity, ""),
            "Logo-SEKCOMIX-STUDIO-LightMode-xl.png"
        );
    }

    #[test]
    fn encoded_bytes_are_png() {
        let surface = RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]));
        let bytes = encode_png(&surface).unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn png_round_trips_pixels() {
        let surface = RgbaImage::from_pixel(3, 5, Rgba([7, 8, 9, 128]));
        let bytes = encode_png(&surface).unwrap();
        let back = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(back.as_raw(), surface.as_raw());
    }

    #[test]
    fn export_does_not_mutate_inputs() {
        let p = params();
        let identity = BrandIdentity::default_identity();
        let p_before = p.clone();
        let id_before = identity.clone();
        let surface = RgbaImage::new(2, 2);
        export_png(&surface, &p, &identity, "").unwrap();
        assert_eq!(p, p_before);
        assert_eq!(identity, id_before);
    }

    #[test]
    fn save_writes_the_named_file() {
        let dir = std::env::temp_dir().join("brandkit-export-test");
        std::fs::create_dir_all(&dir).unwrap();
        let artifact = ExportArtifact {
            file_name: "MyLogo.png".into(),
            bytes: vec![1, 2, 3],
        };
        let path = artifact.save_to_dir(&dir).unwrap();
        assert!(path.ends_with("MyLogo.png"));
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
        std::fs::remove_file(path).unwrap();
    }
}
