use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::chart::ChartKind;
use crate::state::StatusLevel;

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
            // Start at sky blue so the first series matches the usual default.
            let hue = 200.0 + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.55);
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
// Chart colours: one per chart kind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ChartPalette {
    colors: Vec<Color32>,
    /// Outline used for histogram bars and box edges.
    pub edge: Color32,
}

impl Default for ChartPalette {
    fn default() -> Self {
        Self {
            colors: generate_palette(ChartKind::ALL.len()),
            edge: Color32::BLACK,
        }
    }
}

impl ChartPalette {
    pub fn color_for(&self, kind: ChartKind) -> Color32 {
        let idx = ChartKind::ALL
            .iter()
            .position(|k| *k == kind)
            .unwrap_or_default();
        self.colors.get(idx).copied().unwrap_or(Color32::LIGHT_BLUE)
    }
}

/// Text colour of a status message.
pub fn status_color(level: StatusLevel) -> Color32 {
    match level {
        StatusLevel::Success => Color32::from_rgb(46, 160, 67),
        StatusLevel::Info => Color32::from_rgb(56, 132, 255),
        StatusLevel::Warning => Color32::from_rgb(214, 160, 20),
        StatusLevel::Error => Color32::RED,
    }
}
