use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: gauge identifier → Color32
// ---------------------------------------------------------------------------

/// Maps gauge identifiers to distinct colours.
///
/// Keyed on the dataset's full gauge list so a gauge keeps its colour no
/// matter which subset is currently selected.
#[derive(Debug, Clone)]
pub struct GaugeColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl GaugeColors {
    /// Build a colour map over all gauges of the dataset, in their
    /// first-seen order.
    pub fn new(gauges: &[String]) -> Self {
        let palette = generate_palette(gauges.len());
        let mapping: BTreeMap<String, Color32> = gauges
            .iter()
            .cloned()
            .zip(palette.into_iter())
            .collect();

        GaugeColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a gauge.
    pub fn color_for(&self, gauge: &str) -> Color32 {
        self.mapping
            .get(gauge)
            .copied()
            .unwrap_or(self.default_color)
    }
}
