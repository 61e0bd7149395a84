use ratatui::style::Color;

use crate::config::ColorsConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuLevel {
    Low,
    Medium,
    High,
}

/// CPU cell coloring. A level applies once usage is strictly above its
/// threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CpuPalette {
    pub low: Color,
    pub medium: Color,
    pub high: Color,
    pub medium_threshold: f64,
    pub high_threshold: f64,
}

impl CpuPalette {
    pub fn from_config(colors: &ColorsConfig) -> Self {
        Self {
            low: parse_hex_color(&colors.cpu_low).unwrap_or(Color::Rgb(0x6C, 0xB8, 0x6C)),
            medium: parse_hex_color(&colors.cpu_medium).unwrap_or(Color::Rgb(0xFF, 0xA9, 0x00)),
            high: parse_hex_color(&colors.cpu_high).unwrap_or(Color::Rgb(0xE7, 0x48, 0x56)),
            medium_threshold: colors.cpu_medium_threshold,
            high_threshold: colors.cpu_high_threshold,
        }
    }

    pub fn level(&self, percent: f64) -> CpuLevel {
        if percent > self.high_threshold {
            CpuLevel::High
        } else if percent > self.medium_threshold {
            CpuLevel::Medium
        } else {
            CpuLevel::Low
        }
    }

    pub fn color(&self, percent: f64) -> Color {
        match self.level(percent) {
            CpuLevel::Low => self.low,
            CpuLevel::Medium => self.medium,
            CpuLevel::High => self.high,
        }
    }
}

impl Default for CpuPalette {
    fn default() -> Self {
        Self::from_config(&ColorsConfig::default())
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    pub header_accent_bg: Color,
    pub header_accent_fg: Color,
    pub status_ok: Color,
    pub status_err: Color,
    pub statusbar_bg: Color,
    pub overlay_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub accent: Color,
    pub pill_key_bg: Color,
    pub pill_key_fg: Color,
    pub pill_desc_fg: Color,
    pub surface_bg: Color,
    pub gauge_filled: Color,
    pub gauge_unfilled: Color,
    pub sparkline_color: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub cpu: CpuPalette,
}

impl Theme {
    pub fn from_config(theme_name: &str, colors: &ColorsConfig) -> Self {
        let mut theme = match theme_name.to_lowercase().as_str() {
            "light" => Self::light(),
            _ => Self::dark(),
        };
        theme.cpu = CpuPalette::from_config(colors);
        theme
    }

    pub fn next(&self, colors: &ColorsConfig) -> Self {
        let next_name = match self.name {
            "dark" => "light",
            _ => "dark",
        };
        Theme::from_config(next_name, colors)
    }

    pub fn cpu_color(&self, percent: f64) -> Color {
        self.cpu.color(percent)
    }

    pub fn dark() -> Self {
        Self {
            name: "dark",
            header_accent_bg: Color::Rgb(0x2b, 0x6c, 0xb0),
            header_accent_fg: Color::Rgb(0xf5, 0xf7, 0xfa),
            status_ok: Color::Rgb(0x6c, 0xb8, 0x6c),
            status_err: Color::Rgb(0xe7, 0x48, 0x56),
            statusbar_bg: Color::Rgb(0x1e, 0x1e, 0x2a),
            overlay_border: Color::Rgb(0x58, 0x5b, 0x70),
            text_primary: Color::Rgb(0xcd, 0xd6, 0xf4),
            text_secondary: Color::Rgb(0x93, 0x99, 0xb2),
            accent: Color::Rgb(0x89, 0xb4, 0xfa),
            pill_key_bg: Color::Rgb(0x89, 0xb4, 0xfa),
            pill_key_fg: Color::Rgb(0x11, 0x11, 0x1b),
            pill_desc_fg: Color::Rgb(0xba, 0xc2, 0xde),
            surface_bg: Color::Rgb(0x18, 0x18, 0x25),
            gauge_filled: Color::Rgb(0x89, 0xb4, 0xfa),
            gauge_unfilled: Color::Rgb(0x31, 0x32, 0x44),
            sparkline_color: Color::Rgb(0xa6, 0xe3, 0xa1),
            selection_bg: Color::Rgb(0x31, 0x32, 0x44),
            selection_fg: Color::Rgb(0xf5, 0xf7, 0xfa),
            cpu: CpuPalette::default(),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            header_accent_bg: Color::Rgb(0x1e, 0x66, 0xf5),
            header_accent_fg: Color::Rgb(0xff, 0xff, 0xff),
            status_ok: Color::Rgb(0x40, 0xa0, 0x2b),
            status_err: Color::Rgb(0xd2, 0x0f, 0x39),
            statusbar_bg: Color::Rgb(0xe6, 0xe9, 0xef),
            overlay_border: Color::Rgb(0x9c, 0xa0, 0xb0),
            text_primary: Color::Rgb(0x4c, 0x4f, 0x69),
            text_secondary: Color::Rgb(0x6c, 0x6f, 0x85),
            accent: Color::Rgb(0x1e, 0x66, 0xf5),
            pill_key_bg: Color::Rgb(0x1e, 0x66, 0xf5),
            pill_key_fg: Color::Rgb(0xff, 0xff, 0xff),
            pill_desc_fg: Color::Rgb(0x4c, 0x4f, 0x69),
            surface_bg: Color::Rgb(0xef, 0xf1, 0xf5),
            gauge_filled: Color::Rgb(0x1e, 0x66, 0xf5),
            gauge_unfilled: Color::Rgb(0xcc, 0xd0, 0xda),
            sparkline_color: Color::Rgb(0x40, 0xa0, 0x2b),
            selection_bg: Color::Rgb(0xcc, 0xd0, 0xda),
            selection_fg: Color::Rgb(0x11, 0x11, 0x1b),
            cpu: CpuPalette::default(),
        }
    }
}

pub fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_levels_use_strict_thresholds() {
        let palette = CpuPalette::default();
        assert_eq!(palette.level(0.0), CpuLevel::Low);
        assert_eq!(palette.level(50.0), CpuLevel::Low);
        assert_eq!(palette.level(50.1), CpuLevel::Medium);
        assert_eq!(palette.level(80.0), CpuLevel::Medium);
        assert_eq!(palette.level(80.5), CpuLevel::High);
        assert_eq!(palette.color(95.0), Color::Rgb(0xE7, 0x48, 0x56));
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(parse_hex_color("#6CB86C"), Some(Color::Rgb(0x6C, 0xB8, 0x6C)));
        assert_eq!(parse_hex_color("6CB86C"), None);
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn bad_config_colors_fall_back() {
        let colors = ColorsConfig {
            cpu_low: "green".to_string(),
            ..ColorsConfig::default()
        };
        let palette = CpuPalette::from_config(&colors);
        assert_eq!(palette.low, Color::Rgb(0x6C, 0xB8, 0x6C));
    }

    #[test]
    fn theme_cycles() {
        let colors = ColorsConfig::default();
        let theme = Theme::from_config("dark", &colors);
        assert_eq!(theme.next(&colors).name, "light");
        assert_eq!(theme.next(&colors).next(&colors).name, "dark");
    }
}
