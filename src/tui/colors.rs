use crate::profile::colors::{Rgb, Rgba};
use crate::search::SearchStatus;
use ratatui::style::Color;

pub const BAR_BG: Color = Color::Rgb(0, 95, 135);
pub const PANEL_BG: Color = Color::Rgb(40, 40, 50);
pub const MAP_LAND: Color = Color::Rgb(90, 90, 100);

pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Blend a translucent color over the panel background
pub fn blend(rgba: Rgba) -> Color {
    let Color::Rgb(br, bg, bb) = PANEL_BG else {
        return to_color(rgba.rgb);
    };
    let a = rgba.alpha.clamp(0.0, 1.0);
    let mix = |fg: u8, bg: u8| (fg as f32 * a + bg as f32 * (1.0 - a)).round() as u8;
    Color::Rgb(mix(rgba.rgb.0, br), mix(rgba.rgb.1, bg), mix(rgba.rgb.2, bb))
}

/// Bar color for a point: fill dimmed by its opacity
pub fn point_color(fill: Rgb, opacity: f32) -> Color {
    blend(fill.with_alpha(opacity))
}

pub fn status_color(status: &SearchStatus) -> Color {
    match status {
        SearchStatus::Idle => Color::DarkGray,
        SearchStatus::Pending => Color::Yellow,
        SearchStatus::Ready => Color::Cyan,
        SearchStatus::NoResults => Color::Gray,
        SearchStatus::Failed(_) => Color::Red,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_colors_pass_through() {
        assert_eq!(point_color(Rgb(10, 20, 30), 1.0), Color::Rgb(10, 20, 30));
    }

    #[test]
    fn translucent_colors_blend_toward_background() {
        assert_eq!(blend(Rgb::WHITE.with_alpha(0.0)), PANEL_BG);
        let Color::Rgb(r, _, _) = blend(Rgb::WHITE.with_alpha(0.5)) else {
            panic!("expected rgb");
        };
        assert!(r > 40 && r < 255);
    }
}
