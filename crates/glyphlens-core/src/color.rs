#![forbid(unsafe_code)]

//! Color types and color-space conversion.
//!
//! Converts a sampled RGB triple into the three encodings the tooltip
//! displays: hex, LCH, and HCL. LCH and HCL are the same cylindrical CIE
//! Lab representation and differ only in field order.
//!
//! # Pipeline
//!
//! sRGB channels are normalized to `[0, 1]`, mapped through the D65 XYZ
//! matrix, divided by the reference white, pushed through the CIE
//! cube-root/linear piecewise function into Lab, and finally into LCh with
//! the hue in degrees on `[0, 360)`. All displayed components round to the
//! nearest integer.
//!
//! # Invariants
//!
//! 1. `hex_to_rgb(rgb_to_hex(c)) == c` for every `Rgb`.
//! 2. `rgb_to_lch` and `rgb_to_hcl` agree component-wise on every input.
//! 3. Achromatic inputs (r == g == b) report zero chroma and zero hue; the
//!    hue is forced to 0 whenever chroma rounds to 0, since `atan2` on the
//!    residual a/b noise would otherwise report an arbitrary angle.

/// RGB color (opaque).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel (0–255).
    pub r: u8,
    /// Green channel (0–255).
    pub g: u8,
    /// Blue channel (0–255).
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Cylindrical Lab value in lightness/chroma/hue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lch {
    /// Lightness, 0–100.
    pub l: i32,
    /// Chroma.
    pub c: i32,
    /// Hue angle in degrees, `[0, 360)`.
    pub h: i32,
}

/// Cylindrical Lab value in hue/chroma/lightness order.
///
/// Value-identical to [`Lch`] up to field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hcl {
    /// Hue angle in degrees, `[0, 360)`.
    pub h: i32,
    /// Chroma.
    pub c: i32,
    /// Lightness, 0–100.
    pub l: i32,
}

/// D65 reference white.
const REF_WHITE_X: f64 = 0.95047;
const REF_WHITE_Y: f64 = 1.0;
const REF_WHITE_Z: f64 = 1.08883;

/// CIE piecewise threshold and linear-segment parameters.
const LAB_EPSILON: f64 = 0.008856;
const LAB_SLOPE: f64 = 7.787;
const LAB_OFFSET: f64 = 16.0 / 116.0;

/// Chroma below this rounds to 0; such colors are treated as achromatic.
const ACHROMATIC_CHROMA: f64 = 0.5;

/// Format an RGB triple as a lowercase `#rrggbb` string.
#[must_use]
pub fn rgb_to_hex(rgb: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b)
}

/// Parse a 6-digit hex color, with or without a leading `#`.
///
/// Returns `None` for any other shape. Case-insensitive.
#[must_use]
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// The CIE cube-root/linear piecewise function.
fn lab_f(t: f64) -> f64 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        LAB_SLOPE * t + LAB_OFFSET
    }
}

/// Unrounded Lab components for an RGB triple.
fn rgb_to_lab(rgb: Rgb) -> (f64, f64, f64) {
    let r = f64::from(rgb.r) / 255.0;
    let g = f64::from(rgb.g) / 255.0;
    let b = f64::from(rgb.b) / 255.0;

    let x = 0.4124 * r + 0.3576 * g + 0.1805 * b;
    let y = 0.2126 * r + 0.7152 * g + 0.0722 * b;
    let z = 0.0193 * r + 0.1192 * g + 0.9505 * b;

    let fx = lab_f(x / REF_WHITE_X);
    let fy = lab_f(y / REF_WHITE_Y);
    let fz = lab_f(z / REF_WHITE_Z);

    let l = 116.0 * fy - 16.0;
    let a = 500.0 * (fx - fy);
    let b = 200.0 * (fy - fz);
    (l, a, b)
}

/// Convert an RGB triple to integer-rounded LCH.
#[must_use]
pub fn rgb_to_lch(rgb: Rgb) -> Lch {
    let (l, a, b) = rgb_to_lab(rgb);
    let c = a.hypot(b);
    let h = if c < ACHROMATIC_CHROMA {
        0.0
    } else {
        b.atan2(a).to_degrees().rem_euclid(360.0)
    };
    Lch {
        l: l.round() as i32,
        c: c.round() as i32,
        h: (h.round() as i32).rem_euclid(360),
    }
}

/// Convert an RGB triple to integer-rounded HCL.
///
/// Same computation as [`rgb_to_lch`], fields reordered.
#[must_use]
pub fn rgb_to_hcl(rgb: Rgb) -> Hcl {
    let lch = rgb_to_lch(rgb);
    Hcl {
        h: lch.h,
        c: lch.c,
        l: lch.l,
    }
}
