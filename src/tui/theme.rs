use std::collections::HashMap;

use ratatui::style::Color;

/// Parsed color theme for the picker
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub border: Color,
    pub today: Color,
    /// Background of the selection endpoints
    pub selection_bg: Color,
    /// Background of days between the endpoints
    pub range_bg: Color,
    pub warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            border: Color::Rgb(0x7D, 0x78, 0xBF),
            today: Color::Rgb(0x44, 0xDD, 0xFF),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            range_bg: Color::Rgb(0x26, 0x0C, 0x33),
            warning: Color::Rgb(0xFF, 0xD7, 0x00),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from the `[colors]` config table, falling back to
    /// defaults for anything unset or unparseable
    pub fn from_config(colors: &HashMap<String, String>) -> Self {
        let mut theme = Theme::default();

        for (key, value) in colors {
            if let Some(color) = parse_hex_color(value) {
                match key.as_str() {
                    "background" => theme.background = color,
                    "text" => theme.text = color,
                    "text_bright" => theme.text_bright = color,
                    "highlight" => theme.highlight = color,
                    "dim" => theme.dim = color,
                    "border" => theme.border = color,
                    "today" => theme.today = color,
                    "selection_bg" => theme.selection_bg = color,
                    "range_bg" => theme.range_bg = color,
                    "warning" => theme.warning = color,
                    _ => {}
                }
            }
        }

        theme
    }
}
