use super::dashboard::ServerStatus;
use eframe::egui::{self, Color32, FontFamily, FontId, TextStyle, Visuals};

pub const ONLINE: Color32 = Color32::from_rgb(34, 197, 94);
pub const OFFLINE: Color32 = Color32::from_rgb(239, 68, 68);
pub const REBOOTING: Color32 = Color32::from_rgb(234, 179, 8);

pub fn status_color(status: ServerStatus) -> Color32 {
    match status {
        ServerStatus::Online => ONLINE,
        ServerStatus::Offline => OFFLINE,
        ServerStatus::Rebooting => REBOOTING,
    }
}

pub fn apply_theme(ctx: &egui::Context, dark_mode: bool) {
    let accent = if dark_mode {
        Color32::from_rgb(148, 163, 184)
    } else {
        Color32::from_rgb(15, 23, 42)
    };

    let mut visuals = if dark_mode {
        Visuals::dark()
    } else {
        Visuals::light()
    };
    visuals.hyperlink_color = accent;
    visuals.selection.bg_fill = accent.linear_multiply(if dark_mode { 0.5 } else { 0.25 });
    visuals.selection.stroke.color = accent;
    visuals.panel_fill = if dark_mode {
        Color32::from_rgb(17, 24, 39)
    } else {
        Color32::from_rgb(243, 244, 246)
    };
    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(10.0, 8.0);
    style.spacing.button_padding = egui::vec2(10.0, 6.0);

    style.text_styles.insert(
        TextStyle::Heading,
        FontId::new(22.0, FontFamily::Proportional),
    );
    style
        .text_styles
        .insert(TextStyle::Body, FontId::new(15.0, FontFamily::Proportional));
    style.text_styles.insert(
        TextStyle::Button,
        FontId::new(14.0, FontFamily::Proportional),
    );
    style.text_styles.insert(
        TextStyle::Small,
        FontId::new(12.0, FontFamily::Proportional),
    );

    ctx.set_style(style);
}
