//! The generative advisor seam.
//!
//! The remote AI service is an external collaborator, not part of the render
//! engine: callers implement [`BrandAdvisor`] over whatever transport they
//! use, and this module owns the error translation around it. Identity
//! failures never reach the render pipeline — the session substitutes the
//! default identity. Icon-image generation surfaces its errors, and image
//! editing is stubbed: it always fails with [`Error::Unsupported`].

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::icon::encode_data_url;
use crate::identity::BrandIdentity;

/// A remote brand-intelligence service.
///
/// Implementations wrap the actual transport; the engine only sees these
/// three calls.
pub trait BrandAdvisor {
    /// Suggests an icon/color/subtitle identity for a free-text category.
    fn suggest_identity(&self, category: &str) -> Result<BrandIdentity>;

    /// Produces SVG markup for a free-text subject in the given accent color.
    fn generate_icon_svg(&self, subject: &str, accent_hex: &str) -> Result<String>;

    /// Applies an AI edit to an uploaded photo.
    ///
    /// Not yet supported: the default implementation always fails, and
    /// implementors are expected to leave it that way for now.
    fn edit_image(&self, _image: &[u8], _instruction: &str) -> Result<Vec<u8>> {
        Err(Error::Unsupported)
    }
}

/// Wire shape of the identity response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentitySuggestion {
    icon_key: String,
    color_hex: String,
    subtitle: String,
}

/// Parses an identity response body.
///
/// Malformed JSON or missing fields yield [`Error::InvalidResponse`]; the
/// subtitle is truncated on the way in. Callers treat any failure the same
/// as a transport failure and fall back to the default identity.
pub fn parse_identity_response(body: &str) -> Result<BrandIdentity> {
    let suggestion: IdentitySuggestion = serde_json::from_str(body)
        .map_err(|e| Error::InvalidResponse(format!("bad identity payload: {e}")))?;
    Ok(BrandIdentity::new(
        suggestion.icon_key,
        suggestion.color_hex,
        suggestion.subtitle,
    ))
}

/// Validates generated icon markup: it must contain an `<svg` root marker.
pub fn validate_icon_markup(markup: &str) -> Result<&str> {
    if markup.contains("<svg") {
        Ok(markup)
    } else {
        Err(Error::InvalidResponse(
            "generated markup has no <svg> element".into(),
        ))
    }
}

/// Requests a generated icon and converts it to a displayable data URL.
pub fn fetch_icon_image(
    advisor: &dyn BrandAdvisor,
    subject: &str,
    accent_hex: &str,
) -> Result<String> {
    let markup = advisor.generate_icon_svg(subject, accent_hex)?;
    let markup = validate_icon_markup(&markup)?;
    Ok(encode_data_url("image/svg+xml", markup.as_bytes()))
}

/// An advisor with canned answers; useful offline and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticAdvisor {
    pub identity: Option<BrandIdentity>,
    pub icon_svg: Option<String>,
}

impl BrandAdvisor for StaticAdvisor {
    fn suggest_identity(&self, _category: &str) -> Result<BrandIdentity> {
        self.identity
            .clone()
            .ok_or_else(|| Error::RemoteService("no canned identity".into()))
    }

    fn generate_icon_svg(&self, _subject: &str, _accent_hex: &str) -> Result<String> {
        self.icon_svg
            .clone()
            .ok_or_else(|| Error::RemoteService("no canned icon".into()))
    }
}

// ============================================================================
// Tests
// ============================================================================
