use std::ops::RangeInclusive;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    Brightness,
    Contrast,
    Saturation,
    Exposure,
    Vignette,
    Sharpness,
}

impl Adjustment {
    pub fn range(&self) -> RangeInclusive<i32> {
        match self {
            Adjustment::Brightness | Adjustment::Contrast | Adjustment::Saturation | Adjustment::Exposure => 0..=200,
            Adjustment::Vignette | Adjustment::Sharpness => 0..=100,
        }
    }

    pub fn default_value(&self) -> i32 {
        match self {
            Adjustment::Vignette | Adjustment::Sharpness => 0,
            _ => 100,
        }
    }
}

/// User-tuned percentages. Values are clamped to each adjustment's range on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjustmentSet {
    brightness: i32,
    contrast: i32,
    saturation: i32,
    /// Stored but not part of the rendered filter chain.
    exposure: i32,
    vignette: i32,
    sharpness: i32,
}

impl Default for AdjustmentSet {
    fn default() -> Self {
        Self {
            brightness: Adjustment::Brightness.default_value(),
            contrast: Adjustment::Contrast.default_value(),
            saturation: Adjustment::Saturation.default_value(),
            exposure: Adjustment::Exposure.default_value(),
            vignette: Adjustment::Vignette.default_value(),
            sharpness: Adjustment::Sharpness.default_value(),
        }
    }
}

impl AdjustmentSet {
    pub fn get(&self, adj: Adjustment) -> i32 {
        match adj {
            Adjustment::Brightness => self.brightness,
            Adjustment::Contrast => self.contrast,
            Adjustment::Saturation => self.saturation,
            Adjustment::Exposure => self.exposure,
            Adjustment::Vignette => self.vignette,
            Adjustment::Sharpness => self.sharpness,
        }
    }

    pub fn set(&mut self, adj: Adjustment, value: i32) {
        let range = adj.range();
        let value = value.clamp(*range.start(), *range.end());
        let slot = match adj {
            Adjustment::Brightness => &mut self.brightness,
            Adjustment::Contrast => &mut self.contrast,
            Adjustment::Saturation => &mut self.saturation,
            Adjustment::Exposure => &mut self.exposure,
            Adjustment::Vignette => &mut self.vignette,
            Adjustment::Sharpness => &mut self.sharpness,
        };
        *slot = value;
    }

    pub fn is_default(&self) -> bool { *self == Self::default() }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectRatio {
    Free,
    Fixed(u32, u32),
}

impl AspectRatio {
    pub const PRESETS: [AspectRatio; 6] = [
        AspectRatio::Free,
        AspectRatio::Fixed(1, 1),
        AspectRatio::Fixed(4, 3),
        AspectRatio::Fixed(3, 4),
        AspectRatio::Fixed(16, 9),
        AspectRatio::Fixed(9, 16),
    ];

    pub fn ratio(&self) -> Option<f32> {
        match *self {
            AspectRatio::Fixed(w, h) if w > 0 && h > 0 => Some(w as f32 / h as f32),
            _ => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            AspectRatio::Free => "free".to_string(),
            AspectRatio::Fixed(w, h) => format!("{}:{}", w, h),
        }
    }
}

/// Preview-only geometry: rotation in degrees and signed axis scales.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub rotation_degrees: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub aspect: AspectRatio,
}

impl Default for Transform {
    fn default() -> Self {
        Self { rotation_degrees: 0.0, scale_x: 1.0, scale_y: 1.0, aspect: AspectRatio::Free }
    }
}

impl Transform {
    /// Keeps the angle in (-180, 180].
    pub fn set_rotation(&mut self, degrees: f32) {
        let mut d = degrees.rem_euclid(360.0);
        if d > 180.0 { d -= 360.0; }
        self.rotation_degrees = d;
    }

    pub fn rotate_by(&mut self, degrees: f32) { self.set_rotation(self.rotation_degrees + degrees); }
    pub fn flip_horizontal(&mut self) { self.scale_x = -self.scale_x; }
    pub fn flip_vertical(&mut self) { self.scale_y = -self.scale_y; }
    pub fn is_identity(&self) -> bool { *self == Self::default() }
}
