use super::pe_adjust::{Adjustment, AdjustmentSet, AspectRatio, Transform};
use super::pe_compose::{StyleDescriptor, compose};
use super::pe_history::History;
use super::pe_presets::{self, FilterPreset};
use crate::error::ExportError;
use crate::modules::helpers::encoded_image::EncodedImage;
use crate::modules::helpers::image_export::{self, ExportTier};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoPolicy {
    /// Undo also puts preset, adjustments and transform back to defaults.
    ResetTools,
    KeepTools,
}

impl UndoPolicy {
    pub fn from_flag(reset_tools_on_undo: bool) -> Self {
        if reset_tools_on_undo { UndoPolicy::ResetTools } else { UndoPolicy::KeepTools }
    }
}

/// All editing state for the loaded photo. Every mutation goes through a method here.
#[derive(Debug)]
pub struct EditorSession {
    history: History,
    preset: &'static FilterPreset,
    adjustments: AdjustmentSet,
    transform: Transform,
    undo_policy: UndoPolicy,
}

impl EditorSession {
    pub fn new(history_cap: usize, undo_policy: UndoPolicy) -> Self {
        Self {
            history: History::with_cap(history_cap),
            preset: pe_presets::original(),
            adjustments: AdjustmentSet::default(),
            transform: Transform::default(),
            undo_policy,
        }
    }

    pub fn has_image(&self) -> bool { !self.history.is_empty() }
    pub fn current(&self) -> Option<&EncodedImage> { self.history.current() }
    pub fn history_len(&self) -> usize { self.history.len() }
    pub fn can_undo(&self) -> bool { self.history.can_undo() }
    pub fn preset(&self) -> &'static FilterPreset { self.preset }
    pub fn adjustments(&self) -> &AdjustmentSet { &self.adjustments }
    pub fn transform(&self) -> &Transform { &self.transform }

    pub fn set_undo_policy(&mut self, policy: UndoPolicy) { self.undo_policy = policy; }
    pub fn set_history_cap(&mut self, cap: usize) { self.history.set_cap(cap); }

    /// Starts over with a single-entry history and default tools.
    pub fn load_image(&mut self, image: EncodedImage) {
        self.history.reset(image);
        self.reset_tools();
    }

    /// Records an edit result as the new current image. Tool state is kept.
    pub fn commit(&mut self, image: EncodedImage) {
        if self.history.is_empty() {
            self.history.reset(image);
        } else {
            self.history.push(image);
        }
    }

    /// Returns the new current image, or None when there was nothing to undo.
    pub fn undo(&mut self) -> Option<EncodedImage> {
        let restored = self.history.undo().cloned()?;
        if self.undo_policy == UndoPolicy::ResetTools { self.reset_tools(); }
        Some(restored)
    }

    pub fn select_preset(&mut self, preset: &'static FilterPreset) { self.preset = preset; }
    pub fn set_adjustment(&mut self, adj: Adjustment, value: i32) { self.adjustments.set(adj, value); }
    pub fn reset_adjustments(&mut self) { self.adjustments = AdjustmentSet::default(); }

    pub fn set_rotation(&mut self, degrees: f32) { self.transform.set_rotation(degrees); }
    pub fn rotate_by(&mut self, degrees: f32) { self.transform.rotate_by(degrees); }
    pub fn flip_horizontal(&mut self) { self.transform.flip_horizontal(); }
    pub fn flip_vertical(&mut self) { self.transform.flip_vertical(); }
    pub fn set_aspect(&mut self, aspect: AspectRatio) { self.transform.aspect = aspect; }
    pub fn reset_transform(&mut self) { self.transform = Transform::default(); }

    pub fn reset_tools(&mut self) {
        self.preset = pe_presets::original();
        self.adjustments = AdjustmentSet::default();
        self.transform = Transform::default();
    }

    pub fn style(&self) -> StyleDescriptor { compose(self.preset, &self.adjustments, &self.transform) }

    pub fn export(&self, tier: ExportTier, high_precision: bool, dir: &Path) -> Result<PathBuf, ExportError> {
        let current = self.current().ok_or(ExportError::NoImage)?;
        image_export::export_image(current, &self.style().filter, tier, high_precision, dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn img(shade: u8) -> EncodedImage { EncodedImage::solid(2, 2, [shade, 0, 0, 255]) }

    fn tweak(s: &mut EditorSession) {
        s.select_preset(pe_presets::by_id("retro").unwrap());
        s.set_adjustment(Adjustment::Brightness, 150);
        s.rotate_by(90.0);
        s.set_aspect(AspectRatio::Fixed(1, 1));
    }

    fn tools_are_default(s: &EditorSession) -> bool {
        s.preset().is_original() && s.adjustments().is_default() && s.transform().is_identity()
    }

    #[test]
    fn test_new_session_is_empty() {
        let s = EditorSession::new(0, UndoPolicy::ResetTools);
        assert!(!s.has_image());
        assert!(!s.can_undo());
        assert!(tools_are_default(&s));
    }

    #[test]
    fn test_load_resets_history_and_tools() {
        let mut s = EditorSession::new(0, UndoPolicy::ResetTools);
        s.load_image(img(1));
        s.commit(img(2));
        tweak(&mut s);

        s.load_image(img(3));
        assert_eq!(s.history_len(), 1);
        assert_eq!(s.current(), Some(&img(3)));
        assert!(tools_are_default(&s));
    }

    #[test]
    fn test_commit_keeps_tools() {
        let mut s = EditorSession::new(0, UndoPolicy::ResetTools);
        s.load_image(img(1));
        tweak(&mut s);
        s.commit(img(2));
        assert_eq!(s.history_len(), 2);
        assert_eq!(s.preset().id, "retro");
    }

    #[test]
    fn test_undo_resets_tools_by_policy() {
        let mut s = EditorSession::new(0, UndoPolicy::ResetTools);
        s.load_image(img(1));
        s.commit(img(2));
        tweak(&mut s);
        assert_eq!(s.undo(), Some(img(1)));
        assert!(tools_are_default(&s));
    }

    #[test]
    fn test_undo_can_keep_tools() {
        let mut s = EditorSession::new(0, UndoPolicy::KeepTools);
        s.load_image(img(1));
        s.commit(img(2));
        tweak(&mut s);
        assert_eq!(s.undo(), Some(img(1)));
        assert_eq!(s.adjustments().get(Adjustment::Brightness), 150);
        assert_eq!(s.transform().rotation_degrees, 90.0);
    }

    #[test]
    fn test_undo_at_single_entry_changes_nothing() {
        let mut s = EditorSession::new(0, UndoPolicy::ResetTools);
        s.load_image(img(1));
        tweak(&mut s);
        assert_eq!(s.undo(), None);
        assert_eq!(s.preset().id, "retro");
        assert_eq!(s.history_len(), 1);
    }

    #[test]
    fn test_style_follows_state() {
        let mut s = EditorSession::new(0, UndoPolicy::ResetTools);
        s.load_image(img(1));
        s.select_preset(pe_presets::by_id("vivid").unwrap());
        s.set_adjustment(Adjustment::Contrast, 80);
        let css = s.style().filter_css();
        assert!(css.starts_with("saturate(1.6) contrast(1.15) brightness(1.05)"));
        assert!(css.ends_with("contrast(0.8) saturate(1)"));
    }

    #[test]
    fn test_export_without_image() {
        let s = EditorSession::new(0, UndoPolicy::ResetTools);
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(s.export(ExportTier::Original, false, dir.path()), Err(ExportError::NoImage)));
    }

    #[test]
    fn test_export_uses_current_image() {
        let mut s = EditorSession::new(0, UndoPolicy::ResetTools);
        s.load_image(EncodedImage::solid(400, 300, [20, 20, 20, 255]));
        s.commit(EncodedImage::solid(100, 50, [20, 20, 20, 255]));
        let dir = tempfile::tempdir().unwrap();
        let path = s.export(ExportTier::Original, false, dir.path()).unwrap();
        let written = image::open(path).unwrap();
        assert_eq!((written.width(), written.height()), (100, 50));
    }
}
