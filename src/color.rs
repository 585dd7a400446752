//! Paint color normalization to `#rrggbb`.

use std::fmt;

use crate::error::ConvertError;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub [u8; 3]);

impl Color {
    /// Parse a functional `rgb(r, g, b)` color, or `#rrggbb` / `#rgb` hex.
    ///
    /// For the functional form the first three integer runs are taken as
    /// the channels; values above 255 clamp to 255.
    pub fn parse(s: &str) -> Result<Self, ConvertError> {
        let s = s.trim();
        let invalid = || ConvertError::InvalidColor(s.to_string());
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(invalid);
        }
        if !s.starts_with("rgb") {
            return Err(invalid());
        }
        let channels: Vec<u8> = s
            .split(|c: char| !c.is_ascii_digit())
            .filter(|run| !run.is_empty())
            .take(3)
            .map(|run| run.parse::<u64>().unwrap_or(u64::MAX).min(255) as u8)
            .collect();
        match channels[..] {
            [r, g, b] => Ok(Color([r, g, b])),
            _ => Err(invalid()),
        }
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();
    match hex.len() {
        6 => Some(Color([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        ])),
        3 => {
            let mut rgb = [0u8; 3];
            for (i, slot) in rgb.iter_mut().enumerate() {
                *slot = channel(&hex[i..i + 1])? * 17;
            }
            Some(Color(rgb))
        }
        _ => None,
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn functional_rgb_to_hex() {
        let color = Color::parse("rgb(255, 0, 128)").unwrap();
        assert_eq!(color, Color([255, 0, 128]));
        assert_eq!(color.to_string(), "#ff0080");
    }

    #[test]
    fn rgba_alpha_is_ignored() {
        assert_eq!(
            Color::parse("rgba(1, 2, 3, 0.5)").unwrap().to_string(),
            "#010203"
        );
    }

    #[test]
    fn out_of_range_channels_clamp() {
        assert_eq!(Color::parse("rgb(300,0,99999999999999999999)").unwrap(), Color([255, 0, 255]));
    }

    #[test]
    fn hex_forms() {
        assert_eq!(Color::parse("#A0b1C2").unwrap(), Color([0xa0, 0xb1, 0xc2]));
        assert_eq!(Color::parse("#f0a").unwrap(), Color([0xff, 0x00, 0xaa]));
    }

    #[test]
    fn malformed_colors_are_rejected() {
        for bad in ["red", "rgb(1, 2)", "#12345", "#gggggg", "", "#ééé"] {
            assert!(
                matches!(Color::parse(bad), Err(ConvertError::InvalidColor(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
