//! Design-token color parsing and WCAG contrast math.

use serde::{Deserialize, Serialize};

use crate::errors::HudError;

/// Color sample decoded from a hexadecimal design token.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse a 3- or 6-digit hex token; the leading `#` is optional.
    /// 3-digit tokens expand by doubling each nibble (`#abc` -> `#aabbcc`).
    pub fn parse(token: &str) -> Result<Self, HudError> {
        let raw = token.trim().trim_start_matches('#');
        let expanded = match raw.len() {
            3 => raw.chars().flat_map(|c| [c, c]).collect::<String>(),
            6 => raw.to_string(),
            _ => return Err(HudError::InvalidColor(token.to_string())),
        };
        let value = u32::from_str_radix(&expanded, 16)
            .map_err(|_| HudError::InvalidColor(token.to_string()))?;
        Ok(Self {
            r: (value >> 16) as u8,
            g: (value >> 8) as u8,
            b: value as u8,
        })
    }
}

/// WCAG relative luminance of an sRGB color, in [0, 1].
pub fn relative_luminance(color: Rgb) -> f64 {
    let r = srgb_to_linear(color.r);
    let g = srgb_to_linear(color.g);
    let b = srgb_to_linear(color.b);

    0.2126 * r + 0.7152 * g + 0.0722 * b
}

fn srgb_to_linear(channel: u8) -> f64 {
    let v = f64::from(channel) / 255.0;
    if v <= 0.03928 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// WCAG contrast ratio between two colors, in [1, 21].
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let l1 = relative_luminance(a);
    let l2 = relative_luminance(b);

    let lighter = l1.max(l2);
    let darker = l1.min(l2);

    (lighter + 0.05) / (darker + 0.05)
}
