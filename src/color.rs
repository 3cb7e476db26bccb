use eframe::egui::{self, Color32};
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Theme colours
// ---------------------------------------------------------------------------

pub const PRIMARY: Color32 = Color32::from_rgb(0x1a, 0x73, 0xe8);
pub const BACKGROUND: Color32 = Color32::from_rgb(0xf8, 0xf9, 0xfa);
pub const TEXT: Color32 = Color32::from_rgb(0x20, 0x21, 0x24);
pub const ERROR: Color32 = Color32::from_rgb(0xd9, 0x30, 0x25);
pub const SUCCESS: Color32 = Color32::from_rgb(0x1e, 0x8e, 0x3e);

/// Same hue and saturation as `color`, with the given HSL lightness (0..1).
pub fn tint(color: Color32, lightness: f32) -> Color32 {
    let rgb = Srgb::new(
        color.r() as f32 / 255.0,
        color.g() as f32 / 255.0,
        color.b() as f32 / 255.0,
    );
    let mut hsl: Hsl = rgb.into_color();
    hsl.lightness = lightness.clamp(0.0, 1.0);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0).round() as u8,
        (rgb.green * 255.0).round() as u8,
        (rgb.blue * 255.0).round() as u8,
    )
}

/// Light theme built around the primary blue.
pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::light();
    visuals.panel_fill = BACKGROUND;
    visuals.window_fill = BACKGROUND;
    visuals.override_text_color = Some(TEXT);
    visuals.hyperlink_color = PRIMARY;
    visuals.selection.bg_fill = tint(PRIMARY, 0.85);
    visuals.selection.stroke.color = PRIMARY;
    visuals.error_fg_color = ERROR;
    ctx.set_visuals(visuals);
}
