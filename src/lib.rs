//! brandkit-renderer: Deterministic logo composition and PNG export
//!
//! This crate turns a small set of brand inputs — an icon, an accent color,
//! two name segments and a subtitle — into a finished logo image. Layout is
//! pure arithmetic over measured text widths, compositing follows a fixed
//! draw order, and the same inputs always produce byte-identical output.
//!
//! # Example
//!
//! ```no_run
//! use brandkit_renderer::{FontLibrary, MemoryStore, StudioSession};
//!
//! let mut fonts = FontLibrary::new();
//! fonts.register(
//!     brandkit_renderer::FontFamily::Montserrat,
//!     std::fs::read("Montserrat-Bold.ttf").unwrap(),
//! ).unwrap();
//!
//! let mut session = StudioSession::new(fonts, Box::new(MemoryStore::new()));
//! session.set_name1("hyper");
//! session.set_name2("nova");
//!
//! let artifact = session.export_logo("").unwrap();
//! artifact.save_to_dir(std::path::Path::new(".")).unwrap();
//! ```
//!
//! # Saving designs
//!
//! A whole design snapshots to JSON through [`BrandProfile`]:
//!
//! ```
//! use brandkit_renderer::{BrandProfile, FontLibrary, MemoryStore, StudioSession};
//!
//! let mut session = StudioSession::new(FontLibrary::new(), Box::new(MemoryStore::new()));
//! session.set_name1("hyper");
//!
//! let json = BrandProfile::capture(&session).to_json().unwrap();
//! let restored = BrandProfile::from_json(&json).unwrap();
//! ```

mod compositor;
mod error;
mod export;
mod icon;
mod identity;
mod layout;
mod profile;
mod remote;
mod session;
mod store;
mod text;

pub use compositor::render;
pub use error::{Error, Result};
pub use export::{ExportArtifact, encode_png, export_png, file_name};
pub use icon::{
    CustomIcon, CustomIconCollection, DEFAULT_ICON_KEY, DecodedIcon, DrawableSource, IconDef,
    MAX_UPLOAD_BYTES, decode_data_url, encode_data_url, find_icon, icons_in_category,
    rasterize_svg, registry, resolve_icon_source,
};
pub use identity::{
    BrandIdentity, ExportScale, FontFamily, GRADIENT_END_HEX, LogoParameters, SUBTITLE_MAX_CHARS,
    Theme, parse_hex_color, truncate_subtitle,
};
pub use layout::{Dimensions, TextLayout, compute_dimensions, layout_text};
pub use profile::BrandProfile;
pub use remote::{
    BrandAdvisor, StaticAdvisor, fetch_icon_image, parse_identity_response, validate_icon_markup,
};
pub use session::{PendingExport, StudioSession};
pub use store::{
    DEFAULT_PRESETS, FileStore, KeyValueStore, MemoryStore, PresetCategories, load_custom_icons,
    load_presets, save_custom_icons, save_presets,
};
pub use text::{FontLibrary, TextFill};
