use crate::modules::helpers::css_filter::{FilterFn, parse_chain};

#[derive(Debug, PartialEq, Eq)]
pub struct FilterPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub css: &'static str,
}

pub static PRESETS: [FilterPreset; 8] = [
    FilterPreset { id: "original", name: "Original", css: "" },
    FilterPreset { id: "vivid", name: "Vívido", css: "saturate(1.6) contrast(1.15) brightness(1.05)" },
    FilterPreset { id: "warm", name: "Cálido", css: "sepia(0.3) saturate(1.3) hue-rotate(-10deg)" },
    FilterPreset { id: "cool", name: "Frío", css: "hue-rotate(15deg) saturate(1.25) brightness(1.05)" },
    FilterPreset { id: "bw", name: "B y N", css: "grayscale(1) contrast(1.2)" },
    FilterPreset { id: "cinematic", name: "Cine", css: "contrast(1.3) saturate(0.8) sepia(0.2)" },
    FilterPreset { id: "dreamy", name: "Ensueño", css: "brightness(1.1) saturate(1.2) blur(0.5px) contrast(0.9)" },
    FilterPreset { id: "retro", name: "Retro", css: "sepia(0.4) contrast(0.8) hue-rotate(-20deg) brightness(1.1)" },
];

pub fn original() -> &'static FilterPreset { &PRESETS[0] }

pub fn by_id(id: &str) -> Option<&'static FilterPreset> {
    PRESETS.iter().find(|p| p.id == id)
}

impl FilterPreset {
    pub fn is_original(&self) -> bool { self.css.is_empty() }

    /// A preset whose expression fails to parse renders like the original.
    pub fn filters(&self) -> Vec<FilterFn> {
        parse_chain(self.css).unwrap_or_else(|e| {
            log::warn!("Preset '{}' has an invalid filter: {}", self.id, e);
            Vec::new()
        })
    }
}
