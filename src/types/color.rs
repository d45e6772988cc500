//! Color values
//!
//! Parsing of computed-style color strings into [`Rgba`], uppercase hex
//! normalisation, and the HSL space used for shade derivation.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Alpha at or below which a color is treated as invisible
pub const INVISIBLE_ALPHA: f32 = 0.05;

static RGB_FN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^rgba?\(\s*([\d.]+%?)[\s,]+([\d.]+%?)[\s,]+([\d.]+%?)(?:\s*[,/]\s*([\d.]+%?))?\s*\)$")
        .unwrap()
});

/// An sRGB color with straight alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a CSS color as browsers report it in computed styles.
    ///
    /// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb()`/`rgba()` in comma or
    /// space syntax, `transparent`, `white` and `black`.
    pub fn parse(input: &str) -> Option<Self> {
        let value = input.trim().to_ascii_lowercase();

        match value.as_str() {
            "transparent" => return Some(Self::rgba(0, 0, 0, 0.0)),
            "white" => return Some(Self::WHITE),
            "black" => return Some(Self::BLACK),
            _ => {}
        }

        if let Some(hex) = value.strip_prefix('#') {
            return Self::parse_hex(hex);
        }

        let caps = RGB_FN_RE.captures(&value)?;
        let r = parse_channel(caps.get(1)?.as_str())?;
        let g = parse_channel(caps.get(2)?.as_str())?;
        let b = parse_channel(caps.get(3)?.as_str())?;
        let a = match caps.get(4) {
            Some(m) => parse_alpha(m.as_str())?,
            None => 1.0,
        };
        Some(Self::rgba(r, g, b, a))
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        let expand = |c: char| -> Option<u8> {
            let v = c.to_digit(16)? as u8;
            Some(v * 16 + v)
        };
        let pair = |s: &str| u8::from_str_radix(s, 16).ok();

        match hex.len() {
            3 => {
                let mut chars = hex.chars();
                Some(Self::rgb(
                    expand(chars.next()?)?,
                    expand(chars.next()?)?,
                    expand(chars.next()?)?,
                ))
            }
            6 => Some(Self::rgb(
                pair(hex.get(0..2)?)?,
                pair(hex.get(2..4)?)?,
                pair(hex.get(4..6)?)?,
            )),
            8 => Some(Self::rgba(
                pair(hex.get(0..2)?)?,
                pair(hex.get(2..4)?)?,
                pair(hex.get(4..6)?)?,
                pair(hex.get(6..8)?)? as f32 / 255.0,
            )),
            _ => None,
        }
    }

    /// Uppercase `#RRGGBB`, alpha dropped
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// `rgba(r, g, b, a)` with alpha rounded to two decimals
    pub fn to_css_rgba(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            (self.a * 100.0).round() / 100.0
        )
    }

    pub fn is_visible(&self) -> bool {
        self.a > INVISIBLE_ALPHA
    }

    /// Channel spread no larger than `tolerance`
    pub fn is_neutral(&self, tolerance: u8) -> bool {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        max - min <= tolerance
    }

    /// WCAG relative luminance in `0.0..=1.0`
    pub fn relative_luminance(&self) -> f64 {
        fn linear(c: u8) -> f64 {
            let c = c as f64 / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * linear(self.r) + 0.7152 * linear(self.g) + 0.0722 * linear(self.b)
    }

    pub fn to_hsl(&self) -> Hsl {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let d = max - min;

        if d == 0.0 {
            return Hsl {
                h: 0.0,
                s: 0.0,
                l,
                a: self.a as f64,
            };
        }

        let s = d / (1.0 - (2.0 * l - 1.0).abs());
        let h = if max == r {
            60.0 * (((g - b) / d).rem_euclid(6.0))
        } else if max == g {
            60.0 * ((b - r) / d + 2.0)
        } else {
            60.0 * ((r - g) / d + 4.0)
        };

        Hsl {
            h,
            s: s.clamp(0.0, 1.0),
            l,
            a: self.a as f64,
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a >= 1.0 {
            write!(f, "{}", self.to_hex())
        } else {
            write!(f, "{}", self.to_css_rgba())
        }
    }
}

fn parse_channel(s: &str) -> Option<u8> {
    if let Some(pct) = s.strip_suffix('%') {
        let v: f64 = pct.parse().ok()?;
        return Some((v.clamp(0.0, 100.0) * 2.55).round() as u8);
    }
    let v: f64 = s.parse().ok()?;
    Some(v.clamp(0.0, 255.0).round() as u8)
}

fn parse_alpha(s: &str) -> Option<f32> {
    if let Some(pct) = s.strip_suffix('%') {
        let v: f32 = pct.parse().ok()?;
        return Some((v / 100.0).clamp(0.0, 1.0));
    }
    let v: f32 = s.parse().ok()?;
    Some(v.clamp(0.0, 1.0))
}

/// Normalise a CSS color string to uppercase hex if it is visible
pub fn normalize_color(input: &str) -> Option<String> {
    Rgba::parse(input)
        .filter(|c| c.is_visible())
        .map(|c| c.to_hex())
}

// =============================================================================
// HSL
// =============================================================================

/// HSL with hue in degrees and saturation/lightness/alpha in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
    pub a: f64,
}

impl Hsl {
    pub fn to_rgba(&self) -> Rgba {
        let s = self.s.clamp(0.0, 1.0);
        let l = self.l.clamp(0.0, 1.0);
        let h = self.h.rem_euclid(360.0);

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = l - c / 2.0;

        let (r, g, b) = match (h / 60.0) as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgba::rgba(to_u8(r), to_u8(g), to_u8(b), self.a.clamp(0.0, 1.0) as f32)
    }

    pub fn with_lightness(mut self, l: f64) -> Self {
        self.l = l.clamp(0.0, 1.0);
        self
    }

    pub fn with_saturation(mut self, s: f64) -> Self {
        self.s = s.clamp(0.0, 1.0);
        self
    }
}

/// Broad hue family for a chromatic color
pub fn hue_family(hsl: &Hsl) -> &'static str {
    if hsl.s < 0.12 {
        return "neutral";
    }
    match hsl.h {
        h if !(15.0..345.0).contains(&h) => "red",
        h if h < 45.0 => "orange",
        h if h < 70.0 => "yellow",
        h if h < 165.0 => "green",
        h if h < 200.0 => "cyan",
        h if h < 255.0 => "blue",
        h if h < 300.0 => "purple",
        _ => "pink",
    }
}

/// Short brand-psychology note for a color
pub fn psychology(hsl: &Hsl) -> &'static str {
    match hue_family(hsl) {
        "red" => "urgency, energy, alertness",
        "orange" => "warmth, enthusiasm, approachability",
        "yellow" => "optimism, attention, caution",
        "green" => "growth, safety, success",
        "cyan" => "clarity, calm, freshness",
        "blue" => "trust, stability, professionalism",
        "purple" => "creativity, premium, imagination",
        "pink" => "playfulness, care, friendliness",
        _ => "balance, neutrality, restraint",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rgb_function() {
        let c = Rgba::parse("rgb(0, 100, 250)").unwrap();
        assert_eq!(c.to_hex(), "#0064FA");
        assert_eq!(c.a, 1.0);

        let c = Rgba::parse("rgba(0, 0, 0, 0.5)").unwrap();
        assert_eq!(c.a, 0.5);

        let c = Rgba::parse("rgb(10 20 30 / 50%)").unwrap();
        assert_eq!((c.r, c.g, c.b), (10, 20, 30));
        assert_eq!(c.a, 0.5);
    }

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(Rgba::parse("#fff").unwrap().to_hex(), "#FFFFFF");
        assert_eq!(Rgba::parse("#0064fa").unwrap().to_hex(), "#0064FA");
        let c = Rgba::parse("#00000080").unwrap();
        assert!((c.a - 0.502).abs() < 0.01);
        assert!(Rgba::parse("#12").is_none());
        assert!(Rgba::parse("hsl(1, 2%, 3%)").is_none());
    }

    #[test]
    fn test_normalize_drops_transparent() {
        assert_eq!(normalize_color("transparent"), None);
        assert_eq!(normalize_color("rgba(0, 0, 0, 0)"), None);
        assert_eq!(normalize_color("rgb(255,255,255)"), Some("#FFFFFF".into()));
    }

    #[test]
    fn test_neutral_predicate() {
        assert!(Rgba::rgb(120, 125, 128).is_neutral(12));
        assert!(!Rgba::rgb(0, 100, 250).is_neutral(12));
    }

    #[test]
    fn test_hsl_round_trip() {
        for c in [
            Rgba::rgb(0, 100, 250),
            Rgba::rgb(255, 0, 0),
            Rgba::rgb(18, 200, 77),
            Rgba::rgb(128, 128, 128),
        ] {
            let back = c.to_hsl().to_rgba();
            assert_eq!(back.to_hex(), c.to_hex());
        }
    }

    #[test]
    fn test_hue_family() {
        assert_eq!(hue_family(&Rgba::rgb(0, 100, 250).to_hsl()), "blue");
        assert_eq!(hue_family(&Rgba::rgb(220, 30, 30).to_hsl()), "red");
        assert_eq!(hue_family(&Rgba::rgb(40, 180, 60).to_hsl()), "green");
        assert_eq!(hue_family(&Rgba::rgb(128, 128, 130).to_hsl()), "neutral");
    }
}
