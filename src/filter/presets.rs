use super::FilterKind;
use FilterKind::*;

/// A named set of filter values applied in one click
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterPreset {
    pub name: &'static str,
    pub values: &'static [(FilterKind, f32)],
}

pub static PRESETS: [FilterPreset; 8] = [
    FilterPreset {
        name: "Original",
        values: &[(Brightness, 100.0), (Contrast, 100.0), (Saturation, 100.0), (Sepia, 0.0), (Grayscale, 0.0)],
    },
    FilterPreset {
        name: "Vivid",
        values: &[(Brightness, 110.0), (Contrast, 120.0), (Saturation, 130.0), (Sepia, 0.0), (Grayscale, 0.0)],
    },
    FilterPreset {
        name: "B&W",
        values: &[(Brightness, 100.0), (Contrast, 110.0), (Saturation, 0.0), (Sepia, 0.0), (Grayscale, 100.0)],
    },
    FilterPreset {
        name: "Sepia",
        values: &[(Brightness, 100.0), (Contrast, 100.0), (Saturation, 90.0), (Sepia, 80.0), (Grayscale, 0.0)],
    },
    FilterPreset {
        name: "Vintage",
        values: &[(Brightness, 90.0), (Contrast, 90.0), (Saturation, 80.0), (Sepia, 30.0), (Grayscale, 20.0)],
    },
    FilterPreset {
        name: "Cool",
        values: &[(Brightness, 100.0), (Contrast, 100.0), (Saturation, 90.0), (Hue, 180.0), (Grayscale, 0.0)],
    },
    FilterPreset {
        name: "Warm",
        values: &[(Brightness, 105.0), (Contrast, 100.0), (Saturation, 110.0), (Hue, -30.0), (Grayscale, 0.0)],
    },
    FilterPreset {
        name: "Sharp",
        values: &[(Brightness, 105.0), (Contrast, 120.0), (Saturation, 110.0), (Sharpen, 50.0), (Grayscale, 0.0)],
    },
];

impl FilterPreset {
    pub fn by_name(name: &str) -> Option<&'static FilterPreset> {
        PRESETS.iter().find(|preset| preset.name == name)
    }
}
