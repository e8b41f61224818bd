use super::pe_adjust::{Adjustment, AdjustmentSet, Transform};
use super::pe_presets::FilterPreset;
use crate::modules::helpers::css_filter::{self, FilterFn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fit {
    Contain,
    /// Crop to this width / height ratio.
    Cover(f32),
}

/// Everything the canvas needs to draw the current image.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDescriptor {
    pub filter: Vec<FilterFn>,
    pub transform: Transform,
    pub fit: Fit,
}

/// Preset terms first, then brightness, contrast and saturate.
/// Exposure, vignette and sharpness are not rendered.
pub fn compose(preset: &FilterPreset, adjustments: &AdjustmentSet, transform: &Transform) -> StyleDescriptor {
    let pct = |adj: Adjustment| adjustments.get(adj) as f32 / 100.0;

    let mut filter = preset.filters();
    filter.push(FilterFn::Brightness(pct(Adjustment::Brightness)));
    filter.push(FilterFn::Contrast(pct(Adjustment::Contrast)));
    filter.push(FilterFn::Saturate(pct(Adjustment::Saturation)));

    let fit = match transform.aspect.ratio() {
        Some(r) => Fit::Cover(r),
        None => Fit::Contain,
    };

    StyleDescriptor { filter, transform: *transform, fit }
}

impl StyleDescriptor {
    pub fn filter_css(&self) -> String { css_filter::to_css(&self.filter) }

    pub fn transform_css(&self) -> String {
        format!(
            "rotate({}deg) scaleX({}) scaleY({})",
            self.transform.rotation_degrees, self.transform.scale_x, self.transform.scale_y
        )
    }
}
