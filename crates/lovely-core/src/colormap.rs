//! Colours and colour maps for the image views.
//!
//! Colour maps are stored as nine evenly spaced anchor colours and sampled
//! with linear interpolation between neighbouring anchors.

use core::fmt;
use core::str::FromStr;

use crate::error::LovelyError;

/// An 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const GRAY: Self = Self::new(128, 128, 128);
    pub const RED: Self = Self::new(255, 0, 0);
    pub const BLUE: Self = Self::new(0, 0, 255);
    pub const CYAN: Self = Self::new(0, 255, 255);
    pub const FUCHSIA: Self = Self::new(255, 0, 255);
    pub const YELLOW: Self = Self::new(255, 255, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from channel intensities in `[0, 1]`; out-of-range and NaN
    /// inputs are clipped (NaN to 0).
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        Self::new(unit_to_u8(r), unit_to_u8(g), unit_to_u8(b))
    }

    /// Linear interpolation towards `other`; `t` is clipped to `[0, 1]`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let mix = |a: u8, b: u8| -> u8 {
            let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Self::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Hex form, `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Map an intensity in `[0, 1]` to `0..=255`.
#[inline]
pub(crate) fn unit_to_u8(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl FromStr for Rgb {
    type Err = LovelyError;

    /// Accepts the named colours used by the views or `#rrggbb`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let named = match s.to_ascii_lowercase().as_str() {
            "black" => Some(Self::BLACK),
            "white" => Some(Self::WHITE),
            "gray" | "grey" => Some(Self::GRAY),
            "red" => Some(Self::RED),
            "blue" => Some(Self::BLUE),
            "cyan" => Some(Self::CYAN),
            "fuchsia" | "magenta" => Some(Self::FUCHSIA),
            "yellow" => Some(Self::YELLOW),
            _ => None,
        };
        if let Some(c) = named {
            return Ok(c);
        }

        let hex = s
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.is_ascii())
            .ok_or_else(|| LovelyError::invalid_argument(format!("unknown colour {s:?}")))?;
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| LovelyError::invalid_argument(format!("bad hex colour {s:?}")))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Colour maps
// ---------------------------------------------------------------------------

/// Colour maps available to [`chans`](crate::Lovely::chans).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Colormap {
    /// Black to white.
    Gray,
    /// Perceptually uniform dark purple to yellow.
    Viridis,
    /// Cyclic light / blue / dark / red / light.
    #[default]
    Twilight,
}

const VIRIDIS: [Rgb; 9] = [
    Rgb::new(68, 1, 84),
    Rgb::new(71, 44, 122),
    Rgb::new(59, 81, 139),
    Rgb::new(44, 113, 142),
    Rgb::new(33, 144, 141),
    Rgb::new(39, 173, 129),
    Rgb::new(92, 200, 99),
    Rgb::new(170, 220, 50),
    Rgb::new(253, 231, 37),
];

const TWILIGHT: [Rgb; 9] = [
    Rgb::new(226, 217, 226),
    Rgb::new(153, 180, 201),
    Rgb::new(95, 125, 189),
    Rgb::new(83, 66, 157),
    Rgb::new(47, 20, 54),
    Rgb::new(123, 40, 84),
    Rgb::new(178, 86, 85),
    Rgb::new(206, 155, 140),
    Rgb::new(226, 217, 226),
];

impl Colormap {
    /// Colour for `t` in `[0, 1]` (clipped).
    pub fn sample(self, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let anchors: &[Rgb] = match self {
            Self::Gray => return Rgb::BLACK.lerp(Rgb::WHITE, t),
            Self::Viridis => &VIRIDIS,
            Self::Twilight => &TWILIGHT,
        };
        let segments = (anchors.len() - 1) as f64;
        let pos = t * segments;
        let i = (pos.floor() as usize).min(anchors.len() - 2);
        anchors[i].lerp(anchors[i + 1], pos - i as f64)
    }
}

impl FromStr for Colormap {
    type Err = LovelyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gray" | "grey" => Ok(Self::Gray),
            "viridis" => Ok(Self::Viridis),
            "twilight" => Ok(Self::Twilight),
            _ => Err(LovelyError::invalid_argument(format!(
                "unknown colour map {s:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_unit_clips() {
        assert_eq!(Rgb::from_unit(0.0, 0.5, 1.0), Rgb::new(0, 128, 255));
        assert_eq!(Rgb::from_unit(-1.0, 2.0, f64::NAN), Rgb::new(0, 255, 0));
    }

    #[test]
    fn test_lerp() {
        assert_eq!(Rgb::BLACK.lerp(Rgb::WHITE, 0.5), Rgb::new(128, 128, 128));
        assert_eq!(Rgb::BLACK.lerp(Rgb::WHITE, 3.0), Rgb::WHITE);
    }

    #[test]
    fn test_parse_colours() {
        assert_eq!("blue".parse::<Rgb>().unwrap(), Rgb::BLUE);
        assert_eq!("Fuchsia".parse::<Rgb>().unwrap(), Rgb::FUCHSIA);
        assert_eq!("#0a0b0c".parse::<Rgb>().unwrap(), Rgb::new(10, 11, 12));
        assert!("#zzzzzz".parse::<Rgb>().is_err());
        assert!("chartreuse".parse::<Rgb>().is_err());
        assert_eq!(Rgb::new(10, 11, 12).to_string(), "#0a0b0c");
    }

    #[test]
    fn test_colormap_endpoints() {
        assert_eq!(Colormap::Gray.sample(0.0), Rgb::BLACK);
        assert_eq!(Colormap::Gray.sample(1.0), Rgb::WHITE);
        assert_eq!(Colormap::Viridis.sample(0.0), VIRIDIS[0]);
        assert_eq!(Colormap::Viridis.sample(1.0), VIRIDIS[8]);
        assert_eq!(Colormap::Viridis.sample(0.5), VIRIDIS[4]);
        // cyclic
        assert_eq!(Colormap::Twilight.sample(0.0), Colormap::Twilight.sample(1.0));
    }

    #[test]
    fn test_colormap_parse() {
        assert_eq!("viridis".parse::<Colormap>().unwrap(), Colormap::Viridis);
        assert_eq!(Colormap::default(), Colormap::Twilight);
        assert!("jet".parse::<Colormap>().is_err());
    }
}
