//! Colour type and parsing.
//!
//! Colours arrive from the command line as names (`red`, `cornflowerblue`),
//! hex literals or CSS-style functions and are resolved to RGBA bytes.

use std::fmt;

use palette::{Hsl, IntoColor, Srgb};

use crate::error::{Result, TransferError};

/// An RGBA colour value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    /// Create a new colour from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a new opaque colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Parse a colour name, hex literal, `rgb()`/`rgba()` or `hsl()` function.
    ///
    /// Names and function keywords are case-insensitive.
    pub fn parse(input: &str) -> Result<Self> {
        let s = input.trim();
        let lower = s.to_ascii_lowercase();

        if s.starts_with('#') {
            return Self::from_hex(s);
        }
        if let Some(args) = function_args(&lower, "rgba") {
            return parse_rgb_args(&args, true).ok_or_else(|| invalid(input));
        }
        if let Some(args) = function_args(&lower, "rgb") {
            return parse_rgb_args(&args, false).ok_or_else(|| invalid(input));
        }
        if let Some(args) = function_args(&lower, "hsl") {
            return parse_hsl_args(&args).ok_or_else(|| invalid(input));
        }

        palette::named::from_str(&lower)
            .map(|c| Self::rgb(c.red, c.green, c.blue))
            .ok_or_else(|| invalid(input))
    }

    /// Parse a hex colour string.
    ///
    /// Supports formats:
    /// - `#RGB` (3 digits, expanded to 6)
    /// - `#RGBA` (4 digits, expanded to 8)
    /// - `#RRGGBB` (6 digits)
    /// - `#RRGGBBAA` (8 digits)
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !hex.is_ascii() {
            return Err(invalid(s));
        }

        let digits: Vec<u8> = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<_>>()
            .ok_or_else(|| invalid(s))?;

        match digits.as_slice() {
            [r, g, b] => Ok(Self::rgb(r << 4 | r, g << 4 | g, b << 4 | b)),
            [r, g, b, a] => Ok(Self::new(r << 4 | r, g << 4 | g, b << 4 | b, a << 4 | a)),
            [r1, r0, g1, g0, b1, b0] => Ok(Self::rgb(r1 << 4 | r0, g1 << 4 | g0, b1 << 4 | b0)),
            [r1, r0, g1, g0, b1, b0, a1, a0] => Ok(Self::new(
                r1 << 4 | r0,
                g1 << 4 | g0,
                b1 << 4 | b0,
                a1 << 4 | a0,
            )),
            _ => Err(invalid(s)),
        }
    }

    /// Convert to RGBA array.
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[u8; 4]> for Colour {
    fn from(rgba: [u8; 4]) -> Self {
        Self::new(rgba[0], rgba[1], rgba[2], rgba[3])
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

fn invalid(input: &str) -> TransferError {
    TransferError::Colour {
        input: input.to_string(),
    }
}

/// Split `name(a, b, c)` into its trimmed arguments.
fn function_args(input: &str, name: &str) -> Option<Vec<String>> {
    let inner = input
        .strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')?;
    Some(inner.split(',').map(|a| a.trim().to_string()).collect())
}

/// A channel value: either `0..=255` or a percentage of 255.
fn channel(arg: &str) -> Option<u8> {
    match arg.strip_suffix('%') {
        Some(pct) => {
            let pct: f32 = pct.trim().parse().ok()?;
            if !(0.0..=100.0).contains(&pct) {
                return None;
            }
            Some((pct * 255.0 / 100.0 + 0.5) as u8)
        }
        None => arg.parse().ok(),
    }
}

fn parse_rgb_args(args: &[String], with_alpha: bool) -> Option<Colour> {
    match (args, with_alpha) {
        ([r, g, b], false) => Some(Colour::rgb(channel(r)?, channel(g)?, channel(b)?)),
        ([r, g, b, a], true) => Some(Colour::new(
            channel(r)?,
            channel(g)?,
            channel(b)?,
            a.parse().ok()?,
        )),
        _ => None,
    }
}

fn parse_hsl_args(args: &[String]) -> Option<Colour> {
    let [h, s, l] = args else {
        return None;
    };
    let hue: f32 = h.parse().ok()?;
    let saturation: f32 = s.strip_suffix('%')?.trim().parse().ok()?;
    let lightness: f32 = l.strip_suffix('%')?.trim().parse().ok()?;

    let hsl = Hsl::new(hue, saturation / 100.0, lightness / 100.0);
    let rgb: Srgb<f32> = hsl.into_color();
    Some(Colour::rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    ))
}
