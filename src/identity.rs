//! Brand identity and logo parameter types.
//!
//! [`BrandIdentity`] is the icon/color/subtitle triple describing a brand's
//! visual theme. It is produced by the remote advisor or defaulted, and
//! mutated piecewise by user picks. [`LogoParameters`] holds everything else
//! the render pipeline needs: the two name segments, separator visibility,
//! font family, theme and export scale.

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum subtitle length; longer input is truncated, never rejected.
pub const SUBTITLE_MAX_CHARS: usize = 15;

/// Fixed right-hand stop of the name gradient.
pub const GRADIENT_END_HEX: &str = "#0575e6";

// ============================================================================
// BrandIdentity
// ============================================================================

/// The derived icon/color/subtitle triple for a brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandIdentity {
    /// Key into the fixed icon registry.
    pub icon_key: String,

    /// Accent color as a `#rrggbb` hex string.
    pub color_hex: String,

    /// Short subtitle, at most [`SUBTITLE_MAX_CHARS`] characters.
    ///
    /// Truncation is also enforced on deserialization, so hand-edited
    /// profiles cannot smuggle in longer values.
    #[serde(deserialize_with = "deserialize_subtitle")]
    pub subtitle: String,
}

fn deserialize_subtitle<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(truncate_subtitle(&s))
}

impl BrandIdentity {
    /// Creates an identity, truncating the subtitle to the allowed length.
    pub fn new(
        icon_key: impl Into<String>,
        color_hex: impl Into<String>,
        subtitle: impl Into<String>,
    ) -> Self {
        Self {
            icon_key: icon_key.into(),
            color_hex: color_hex.into(),
            subtitle: truncate_subtitle(&subtitle.into()),
        }
    }

    /// The identity every failed or skipped advisor call degrades to.
    pub fn default_identity() -> Self {
        Self::new("palette", "#00f260", "STUDIO")
    }

    /// Replaces the subtitle, enforcing truncation.
    pub fn set_subtitle(&mut self, subtitle: &str) {
        self.subtitle = truncate_subtitle(subtitle);
    }

    /// The accent color as a pixel value, or the default accent when the
    /// stored hex string is unparsable.
    pub fn accent(&self) -> Rgba<u8> {
        parse_hex_color(&self.color_hex)
            .unwrap_or_else(|_| parse_hex_color("#00f260").expect("default accent parses"))
    }
}

impl Default for BrandIdentity {
    fn default() -> Self {
        Self::default_identity()
    }
}

/// Truncates a subtitle to [`SUBTITLE_MAX_CHARS`] characters.
pub fn truncate_subtitle(subtitle: &str) -> String {
    subtitle.chars().take(SUBTITLE_MAX_CHARS).collect()
}

/// Parses a `#rrggbb` hex string into an opaque RGBA pixel.
pub fn parse_hex_color(s: &str) -> Result<Rgba<u8>> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidInput(format!("invalid color: {s}")));
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).expect("checked hex digits");
    Ok(Rgba([byte(0), byte(2), byte(4), 255]))
}

// ============================================================================
// Fonts, themes, scales
// ============================================================================

/// The five known font families.
///
/// Unknown keys always fall back to the first registered family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFamily {
    #[default]
    Montserrat,
    Poppins,
    Orbitron,
    BebasNeue,
    ArchivoBlack,
}

impl FontFamily {
    /// All known families, fallback first.
    pub const ALL: [FontFamily; 5] = [
        FontFamily::Montserrat,
        FontFamily::Poppins,
        FontFamily::Orbitron,
        FontFamily::BebasNeue,
        FontFamily::ArchivoBlack,
    ];

    /// Stable string key for persistence and file naming.
    pub fn key(self) -> &'static str {
        match self {
            FontFamily::Montserrat => "montserrat",
            FontFamily::Poppins => "poppins",
            FontFamily::Orbitron => "orbitron",
            FontFamily::BebasNeue => "bebas-neue",
            FontFamily::ArchivoBlack => "archivo-black",
        }
    }

    /// Looks up a family by key, falling back to the first known family.
    pub fn from_key(key: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|f| f.key() == key)
            .unwrap_or(Self::ALL[0])
    }
}

/// Background theme of the composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Label used in synthesized file names.
    pub fn label(self) -> &'static str {
        match self {
            Theme::Dark => "DarkMode",
            Theme::Light => "LightMode",
        }
    }

    /// Base text color: white on dark, dark navy on light.
    pub fn text_color(self) -> Rgba<u8> {
        match self {
            Theme::Dark => Rgba([255, 255, 255, 255]),
            Theme::Light => Rgba([15, 23, 42, 255]),
        }
    }
}

/// Discrete output resolution tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportScale {
    Sm,
    #[default]
    Md,
    Lg,
    Xl,
}

impl ExportScale {
    /// Multiplier applied to the base canvas size.
    pub fn factor(self) -> f32 {
        match self {
            ExportScale::Sm => 0.5,
            ExportScale::Md => 1.0,
            ExportScale::Lg => 2.0,
            ExportScale::Xl => 4.0,
        }
    }

    /// Size code used in synthesized file names.
    pub fn code(self) -> &'static str {
        match self {
            ExportScale::Sm => "sm",
            ExportScale::Md => "md",
            ExportScale::Lg => "lg",
            ExportScale::Xl => "xl",
        }
    }
}

// ============================================================================
// LogoParameters
// ============================================================================

/// User-chosen parameters of the logo composition.
///
/// Name segments are always stored upper-cased; the session setters enforce
/// this, and [`LogoParameters::new`] applies the same normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoParameters {
    pub name1: String,
    pub name2: String,
    pub show_separator: bool,
    pub font: FontFamily,
    pub theme: Theme,
    pub export_scale: ExportScale,
}

impl LogoParameters {
    pub fn new(name1: &str, name2: &str) -> Self {
        Self {
            name1: name1.to_uppercase(),
            name2: name2.to_uppercase(),
            show_separator: true,
            font: FontFamily::default(),
            theme: Theme::default(),
            export_scale: ExportScale::default(),
        }
    }
}

impl Default for LogoParameters {
    fn default() -> Self {
        Self::new("SEK", "COMIX")
    }
}

// ============================================================================
// Tests
// ============================================================================
