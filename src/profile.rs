//! Serializable brand profile for saving and sharing a design.
//!
//! A [`BrandProfile`] captures everything needed to reproduce a logo — the
//! identity triple, the composition parameters and an optional export file
//! name — in a JSON-friendly format.
//!
//! # Example
//!
//! ```
//! use brandkit_renderer::{BrandIdentity, BrandProfile, LogoParameters};
//!
//! // Build a profile
//! let profile = BrandProfile::new()
//!     .with_identity(BrandIdentity::new("rocket", "#ff8800", "LAUNCH LAB"))
//!     .with_params(LogoParameters::new("hyper", "nova"))
//!     .with_custom_filename("HyperNova");
//!
//! // Serialize to JSON for saving
//! let json = profile.to_json().unwrap();
//!
//! // Restore later
//! let restored = BrandProfile::from_json(&json).unwrap();
//! ```

use serde::{Deserialize, Serialize};

use crate::identity::{BrandIdentity, LogoParameters};
use crate::session::StudioSession;

/// A serializable snapshot of a whole design.
///
/// Missing fields deserialize to defaults, so an empty `{}` is a valid
/// profile describing the default design.
///
/// # JSON Format
///
/// ```json
/// {
///   "identity": { "iconKey": "rocket", "colorHex": "#ff8800", "subtitle": "LAUNCH LAB" },
///   "params": {
///     "name1": "HYPER", "name2": "NOVA", "showSeparator": true,
///     "font": "montserrat", "theme": "dark", "exportScale": "md"
///   },
///   "customFilename": "HyperNova"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BrandProfile {
    /// The icon/color/subtitle triple.
    #[serde(default)]
    pub identity: BrandIdentity,

    /// The composition parameters.
    #[serde(default)]
    pub params: LogoParameters,

    /// Export file name override. `None` means synthesize one.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub custom_filename: Option<String>,
}

impl BrandProfile {
    /// Creates a profile describing the default design.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the identity.
    pub fn with_identity(mut self, identity: BrandIdentity) -> Self {
        self.identity = identity;
        self
    }

    /// Sets the composition parameters.
    pub fn with_params(mut self, params: LogoParameters) -> Self {
        self.params = params;
        self
    }

    /// Sets the export file name override.
    pub fn with_custom_filename(mut self, name: impl Into<String>) -> Self {
        self.custom_filename = Some(name.into());
        self
    }

    /// Snapshots the current design of a session.
    pub fn capture(session: &StudioSession) -> Self {
        Self {
            identity: session.identity().clone(),
            params: session.params().clone(),
            custom_filename: None,
        }
    }

    /// Restores this design into a session.
    ///
    /// Runs through the session setters so the usual normalization
    /// (upper-casing, truncation) and dimension refresh apply even to
    /// hand-edited profile files.
    pub fn apply(&self, session: &mut StudioSession) {
        session.apply_identity(self.identity.clone());
        session.set_name1(&self.params.name1);
        session.set_name2(&self.params.name2);
        session.set_show_separator(self.params.show_separator);
        session.set_font(self.params.font);
        session.set_theme(self.params.theme);
        session.set_export_scale(self.params.export_scale);
    }

    /// The file name override as the exporter expects it (empty = none).
    pub fn custom_filename(&self) -> &str {
        self.custom_filename.as_deref().unwrap_or("")
    }

    /// Serializes the profile to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the profile to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a profile from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// Tests
// ============================================================================
