//! The editing session: one mutable context owning all brand state.
//!
//! All mutation flows through setters that enforce the data-model invariants
//! (upper-cased names, truncated subtitles, deduplicated presets) and refresh
//! the derived dimensions, so the rest of the engine can stay pure. The
//! session also owns the store handle and writes collections back in full on
//! every mutation.
//!
//! Export is an explicit two-phase operation: [`StudioSession::begin_export`]
//! snapshots the inputs and raises an in-flight flag, and
//! [`StudioSession::finish_export`] performs the fallible image load, the
//! synchronous render and the PNG encode. A second `begin_export` while one
//! is pending fails with [`Error::ExportInFlight`] instead of racing two
//! downloads.

use crate::compositor;
use crate::error::{Error, Result};
use crate::export::{self, ExportArtifact};
use crate::icon::{CustomIconCollection, DrawableSource, resolve_icon_source};
use crate::identity::{
    BrandIdentity, ExportScale, FontFamily, LogoParameters, Theme, parse_hex_color,
};
use crate::layout::{self, Dimensions, ICON_BOX};
use crate::remote::BrandAdvisor;
use crate::store::{
    KeyValueStore, PresetCategories, load_custom_icons, load_presets, save_custom_icons,
    save_presets,
};
use crate::text::FontLibrary;

/// A snapshot taken at export start; consumed by `finish_export`.
#[derive(Debug)]
pub struct PendingExport {
    params: LogoParameters,
    identity: BrandIdentity,
    dims: Dimensions,
    source: DrawableSource,
}

/// The single active editing session.
pub struct StudioSession {
    identity: BrandIdentity,
    params: LogoParameters,
    selected_custom_icon: Option<String>,
    presets: PresetCategories,
    custom_icons: CustomIconCollection,
    fonts: FontLibrary,
    store: Box<dyn KeyValueStore>,
    dims: Dimensions,
    export_in_flight: bool,
}

impl StudioSession {
    /// Opens a session: collections are read from the store once, here.
    pub fn new(fonts: FontLibrary, store: Box<dyn KeyValueStore>) -> Self {
        let presets = load_presets(store.as_ref());
        let custom_icons = load_custom_icons(store.as_ref());
        let params = LogoParameters::default();
        let dims = layout::compute_dimensions(&fonts, &params);
        Self {
            identity: BrandIdentity::default_identity(),
            params,
            selected_custom_icon: None,
            presets,
            custom_icons,
            fonts,
            store,
            dims,
            export_in_flight: false,
        }
    }

    // ---- Read access ----

    pub fn identity(&self) -> &BrandIdentity {
        &self.identity
    }

    pub fn params(&self) -> &LogoParameters {
        &self.params
    }

    /// The latest derived surface dimensions (pure derivation, last value).
    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    pub fn presets(&self) -> &PresetCategories {
        &self.presets
    }

    pub fn custom_icons(&self) -> &CustomIconCollection {
        &self.custom_icons
    }

    pub fn selected_custom_icon(&self) -> Option<&str> {
        self.selected_custom_icon.as_deref()
    }

    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    pub fn export_in_flight(&self) -> bool {
        self.export_in_flight
    }

    fn refresh_dimensions(&mut self) {
        self.dims = layout::compute_dimensions(&self.fonts, &self.params);
    }

    // ---- Parameter setters ----

    pub fn set_name1(&mut self, name: &str) {
        self.params.name1 = name.to_uppercase();
        self.refresh_dimensions();
    }

    pub fn set_name2(&mut self, name: &str) {
        self.params.name2 = name.to_uppercase();
        self.refresh_dimensions();
    }

    pub fn set_show_separator(&mut self, show: bool) {
        self.params.show_separator = show;
        self.refresh_dimensions();
    }

    pub fn set_font(&mut self, font: FontFamily) {
        self.params.font = font;
        self.refresh_dimensions();
    }

    /// Sets the font by key; unknown keys fall back to the first family.
    pub fn set_font_key(&mut self, key: &str) {
        self.set_font(FontFamily::from_key(key));
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.params.theme = theme;
    }

    pub fn set_export_scale(&mut self, scale: ExportScale) {
        self.params.export_scale = scale;
        self.refresh_dimensions();
    }

    // ---- Identity mutation ----

    /// Replaces the whole identity (an advisor result or a restored profile).
    ///
    /// Clears any custom icon selection so the new icon key takes effect.
    pub fn apply_identity(&mut self, identity: BrandIdentity) {
        self.identity = identity;
        self.selected_custom_icon = None;
        self.refresh_dimensions();
    }

    /// Picks an accent color; invalid hex is rejected without state change.
    pub fn set_accent_color(&mut self, color_hex: &str) -> Result<()> {
        parse_hex_color(color_hex)?;
        self.identity.color_hex = color_hex.trim().to_string();
        Ok(())
    }

    /// Picks a registry icon, clearing any custom selection.
    pub fn set_icon_key(&mut self, key: &str) {
        self.identity.icon_key = key.to_string();
        self.selected_custom_icon = None;
    }

    pub fn set_subtitle(&mut self, subtitle: &str) {
        self.identity.set_subtitle(subtitle);
    }

    /// Asks the advisor for an identity.
    ///
    /// Blank input makes no call and changes nothing (returns false). Any
    /// advisor failure degrades to the default identity without retry, so
    /// the render pipeline always has a valid identity.
    pub fn request_identity(&mut self, advisor: &dyn BrandAdvisor, category: &str) -> bool {
        let category = category.trim();
        if category.is_empty() {
            return false;
        }
        let identity = advisor
            .suggest_identity(category)
            .unwrap_or_else(|_| BrandIdentity::default_identity());
        self.apply_identity(identity);
        true
    }

    // ---- Custom icons ----

    /// Validates and stores an upload, persisting the collection.
    ///
    /// Returns the minted icon id. Rejected uploads leave all state intact.
    pub fn add_custom_icon(&mut self, name: &str, mime: &str, bytes: &[u8]) -> Result<String> {
        let id = self.custom_icons.add(name, mime, bytes)?.id.clone();
        save_custom_icons(self.store.as_mut(), &self.custom_icons)?;
        Ok(id)
    }

    /// Selects a stored custom icon by id.
    pub fn select_custom_icon(&mut self, id: &str) -> Result<()> {
        if self.custom_icons.get(id).is_none() {
            return Err(Error::InvalidInput(format!("no custom icon {id}")));
        }
        self.selected_custom_icon = Some(id.to_string());
        Ok(())
    }

    pub fn clear_custom_icon_selection(&mut self) {
        self.selected_custom_icon = None;
    }

    /// Deletes a custom icon; a selection referencing it is cleared so no
    /// dangling id survives. Returns true if something was deleted.
    pub fn delete_custom_icon(&mut self, id: &str) -> Result<bool> {
        let removed = self.custom_icons.remove(id);
        if removed {
            if self.selected_custom_icon.as_deref() == Some(id) {
                self.selected_custom_icon = None;
            }
            save_custom_icons(self.store.as_mut(), &self.custom_icons)?;
        }
        Ok(removed)
    }

    // ---- Preset categories ----

    /// Adds a preset label (case-insensitively deduplicated); persists on change.
    pub fn add_preset(&mut self, label: &str) -> Result<bool> {
        let added = self.presets.add(label);
        if added {
            save_presets(self.store.as_mut(), &self.presets)?;
        }
        Ok(added)
    }

    pub fn remove_preset(&mut self, label: &str) -> Result<bool> {
        let removed = self.presets.remove(label);
        if removed {
            save_presets(self.store.as_mut(), &self.presets)?;
        }
        Ok(removed)
    }

    /// Restores the fixed default preset list and persists it.
    pub fn clear_presets(&mut self) -> Result<()> {
        self.presets.clear();
        save_presets(self.store.as_mut(), &self.presets)
    }

    // ---- Rendering and export ----

    /// Resolves the current icon selection into a drawable source.
    pub fn resolve_source(&self) -> DrawableSource {
        resolve_icon_source(
            &self.identity.icon_key,
            self.selected_custom_icon.as_deref(),
            &self.custom_icons,
            &self.identity.color_hex,
        )
    }

    /// Starts an export, snapshotting all inputs.
    ///
    /// Fails with [`Error::ExportInFlight`] while another export is pending.
    pub fn begin_export(&mut self) -> Result<PendingExport> {
        if self.export_in_flight {
            return Err(Error::ExportInFlight);
        }
        self.export_in_flight = true;
        Ok(PendingExport {
            params: self.params.clone(),
            identity: self.identity.clone(),
            dims: self.dims,
            source: self.resolve_source(),
        })
    }

    /// Loads, renders and encodes a pending export.
    ///
    /// The image load is the only fallible step; the render itself is pure.
    /// The in-flight flag clears whether or not this succeeds.
    pub fn finish_export(
        &mut self,
        pending: PendingExport,
        custom_filename: &str,
    ) -> Result<ExportArtifact> {
        let result = (|| {
            let box_px = (ICON_BOX * pending.params.export_scale.factor()).round() as u32;
            let icon = pending.source.load(box_px.max(1))?;
            let surface = compositor::render(
                pending.dims,
                &pending.params,
                &pending.identity,
                &icon,
                &self.fonts,
            );
            export::export_png(&surface, &pending.params, &pending.identity, custom_filename)
        })();
        self.export_in_flight = false;
        result
    }

    /// Abandons a pending export, clearing the in-flight flag.
    pub fn cancel_export(&mut self, pending: PendingExport) {
        drop(pending);
        self.export_in_flight = false;
    }

    /// Convenience wrapper: begin and finish in one call.
    pub fn export_logo(&mut self, custom_filename: &str) -> Result<ExportArtifact> {
        let pending = self.begin_export()?;
        self.finish_export(pending, custom_filename)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DEFAULT_PRESETS, MemoryStore};
    use image::{Rgba, RgbaImage};
    use std::cell::Cell;

    fn session() -> StudioSession {
        StudioSession::new(FontLibrary::new(), Box::new(MemoryStore::new()))
    }

    fn png_bytes() -> Vec<u8> {
        let img = RgbaImage::from_pixel(4, 4, Rgba([0, 128, 255, 255]));
        let mut buf = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    /// Advisor that counts calls and returns a fixed answer or failure.
    struct CountingAdvisor {
        calls: Cell<u32>,
        fail: bool,
    }

    impl BrandAdvisor for CountingAdvisor {
        fn suggest_identity(&self, _category: &str) -> Result<BrandIdentity> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                Err(Error::RemoteService("quota exceeded".into()))
            } else {
                Ok(BrandIdentity::new("rocket", "#ff8800", "LAUNCH LAB"))
            }
        }

        fn generate_icon_svg(&self, _subject: &str, _accent_hex: &str) -> Result<String> {
            Err(Error::RemoteService("unused".into()))
        }
    }

    #[test]
    fn names_are_uppercased_and_dimensions_refresh() {
        let mut s = session();
        let before = s.dimensions();
        s.set_name1("hyper");
        s.set_name2("borealongname");
        assert_eq!(s.params().name1, "HYPER");
        assert_eq!(s.params().name2, "BOREALONGNAME");
        assert_ne!(s.dimensions(), before);
    }

    #[test]
    fn blank_identity_request_makes_no_call() {
        let mut s = session();
        let advisor = CountingAdvisor {
            calls: Cell::new(0),
            fail: false,
        };
        let before = s.identity().clone();
        assert!(!s.request_identity(&advisor, "   "));
        assert_eq!(advisor.calls.get(), 0);
        assert_eq!(*s.identity(), before);
    }

    #[test]
    fn identity_request_applies_suggestion() {
        let mut s = session();
        let advisor = CountingAdvisor {
            calls: Cell::new(0),
            fail: false,
        };
        assert!(s.request_identity(&advisor, "space gaming"));
        assert_eq!(advisor.calls.get(), 1);
        assert_eq!(s.identity().icon_key, "rocket");
        assert_eq!(s.identity().subtitle, "LAUNCH LAB");
    }

    #[test]
    fn failed_identity_request_degrades_to_default() {
        let mut s = session();
        s.set_subtitle("CUSTOM");
        let advisor = CountingAdvisor {
            calls: Cell::new(0),
            fail: true,
        };
        assert!(s.request_identity(&advisor, "anything"));
        assert_eq!(*s.identity(), BrandIdentity::default_identity());
    }

    #[test]
    fn invalid_accent_color_rejected_without_change() {
        let mut s = session();
        let before = s.identity().color_hex.clone();
        assert!(s.set_accent_color("#zzz").is_err());
        assert_eq!(s.identity().color_hex, before);
        s.set_accent_color("#123abc").unwrap();
        assert_eq!(s.identity().color_hex, "#123abc");
    }

    #[test]
    fn deleting_selected_icon_clears_selection() {
        let mut s = session();
        let id = s.add_custom_icon("mark", "image/png", &png_bytes()).unwrap();
        s.select_custom_icon(&id).unwrap();
        assert_eq!(s.selected_custom_icon(), Some(id.as_str()));

        assert!(s.delete_custom_icon(&id).unwrap());
        assert_eq!(s.selected_custom_icon(), None);
    }

    #[test]
    fn deleting_other_icon_keeps_selection() {
        let mut s = session();
        let keep = s.add_custom_icon("keep", "image/png", &png_bytes()).unwrap();
        let drop_id = s.add_custom_icon("drop", "image/png", &png_bytes()).unwrap();
        s.select_custom_icon(&keep).unwrap();

        assert!(s.delete_custom_icon(&drop_id).unwrap());
        assert_eq!(s.selected_custom_icon(), Some(keep.as_str()));
    }

    #[test]
    fn oversized_upload_changes_nothing() {
        let mut s = session();
        let big = vec![0u8; crate::icon::MAX_UPLOAD_BYTES + 1];
        assert!(s.add_custom_icon("big", "image/png", &big).is_err());
        assert!(s.custom_icons().is_empty());
    }

    #[test]
    fn picking_registry_icon_clears_custom_selection() {
        let mut s = session();
        let id = s.add_custom_icon("mark", "image/png", &png_bytes()).unwrap();
        s.select_custom_icon(&id).unwrap();
        s.set_icon_key("bolt");
        assert_eq!(s.selected_custom_icon(), None);
        assert_eq!(s.identity().icon_key, "bolt");
    }

    #[test]
    fn presets_survive_a_session_restart() {
        let dir = std::env::temp_dir().join("brandkit-session-restart-test");
        {
            let store = crate::store::FileStore::new(&dir).unwrap();
            let mut s = StudioSession::new(FontLibrary::new(), Box::new(store));
            s.add_preset("Podcasts").unwrap();
        }
        let store = crate::store::FileStore::new(&dir).unwrap();
        let s = StudioSession::new(FontLibrary::new(), Box::new(store));
        assert!(s.presets().contains("Podcasts"));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn clear_presets_restores_defaults() {
        let mut s = session();
        s.add_preset("Extra").unwrap();
        s.remove_preset("Gaming").unwrap();
        s.clear_presets().unwrap();
        let labels: Vec<_> = s.presets().iter().collect();
        assert_eq!(labels, DEFAULT_PRESETS);
    }

    #[test]
    fn export_produces_named_png() {
        let mut s = session();
        s.set_export_scale(ExportScale::Sm);
        let artifact = s.export_logo("").unwrap();
        assert_eq!(artifact.file_name, "Logo-SEKCOMIX-STUDIO-DarkMode-sm.png");
        assert_eq!(&artifact.bytes[..4], &[0x89, b'P', b'N', b'G']);
        assert!(!s.export_in_flight());
    }

    #[test]
    fn overlapping_exports_are_rejected() {
        let mut s = session();
        let pending = s.begin_export().unwrap();
        assert!(matches!(s.begin_export(), Err(Error::ExportInFlight)));

        let artifact = s.finish_export(pending, "MyLogo").unwrap();
        assert_eq!(artifact.file_name, "MyLogo.png");
        // Flag cleared; a new export may start.
        assert!(s.begin_export().is_ok());
    }

    #[test]
    fn cancel_clears_the_in_flight_flag() {
        let mut s = session();
        let pending = s.begin_export().unwrap();
        s.cancel_export(pending);
        assert!(!s.export_in_flight());
        assert!(s.begin_export().is_ok());
    }

    #[test]
    fn export_uses_selected_custom_icon() {
        let mut s = session();
        s.set_export_scale(ExportScale::Sm);
        let id = s.add_custom_icon("mark", "image/png", &png_bytes()).unwrap();
        s.select_custom_icon(&id).unwrap();
        assert!(matches!(
            s.resolve_source(),
            crate::icon::DrawableSource::Bitmap { .. }
        ));
        assert!(s.export_logo("custom-icon-test").is_ok());
    }
}
