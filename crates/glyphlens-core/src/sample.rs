#![forbid(unsafe_code)]

//! Style and color sampling.
//!
//! Normalizes a node's resolved style into the plain records the tooltip
//! renders. Color extraction leans on the host style engine: most authored
//! syntaxes (named colors, `hsl()`, …) arrive normalized to a canonical
//! `rgb()`/`rgba()` string, from which the channel triple is taken; alpha
//! is ignored. Wide-gamut syntaxes the engine leaves un-normalized
//! (`color(display-p3 …)`, `oklch(…)`) carry no such triple and are
//! reported as absent, never as an error.

use std::hash::{DefaultHasher, Hash, Hasher};

use crate::color::{Hcl, Lch, Rgb, rgb_to_hcl, rgb_to_hex, rgb_to_lch};
use crate::dom::{DomTree, NodeId};

/// Typography of one element at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StyleSnapshot {
    /// Resolved font-family list, quote characters stripped.
    pub font_family: String,
    /// Resolved font size.
    pub font_size: String,
    /// Resolved font weight.
    pub font_weight: String,
    /// Resolved line height.
    pub line_height: String,
    /// Resolved letter spacing.
    pub letter_spacing: String,
    /// Resolved text alignment.
    pub text_align: String,
}

/// Foreground color of one element in the three displayed encodings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColorSnapshot {
    /// The sampled triple.
    pub rgb: Rgb,
    /// `#rrggbb` form.
    pub hex: String,
    /// Lightness/chroma/hue form.
    pub lch: Lch,
    /// Hue/chroma/lightness form.
    pub hcl: Hcl,
}

/// Sample the typography of `node`.
///
/// Returns `None` when `node` is not an element.
#[must_use]
pub fn sample_style<D: DomTree + ?Sized>(dom: &D, node: NodeId) -> Option<StyleSnapshot> {
    let style = dom.resolved_style(node)?;
    Some(StyleSnapshot {
        font_family: strip_quotes(&style.font_family),
        font_size: style.font_size,
        font_weight: style.font_weight,
        line_height: style.line_height,
        letter_spacing: style.letter_spacing,
        text_align: style.text_align,
    })
}

/// Sample the foreground color of `node` as an RGB triple.
///
/// Returns `None` when `node` is not an element or its resolved color
/// string carries no parseable triple.
#[must_use]
pub fn sample_color<D: DomTree + ?Sized>(dom: &D, node: NodeId) -> Option<Rgb> {
    let style = dom.resolved_style(node)?;
    parse_rgb_triple(&style.color)
}

/// Assemble the displayed encodings for a sampled triple.
#[must_use]
pub fn color_snapshot(rgb: Rgb) -> ColorSnapshot {
    ColorSnapshot {
        rgb,
        hex: rgb_to_hex(rgb),
        lch: rgb_to_lch(rgb),
        hcl: rgb_to_hcl(rgb),
    }
}

/// Fingerprint of tooltip content, used to skip no-op re-renders.
#[must_use]
pub fn content_hash(style: &StyleSnapshot, color: Option<&ColorSnapshot>) -> u64 {
    let mut hasher = DefaultHasher::new();
    style.hash(&mut hasher);
    color.hash(&mut hasher);
    hasher.finish()
}

/// Extract the channel triple of a canonical `rgb()`/`rgba()` string.
///
/// `"rgb(12, 34, 56)"` and `"rgba(12, 34, 56, 0.5)"` both yield
/// `(12, 34, 56)`; values above 255 clamp. The scan is anchored to the
/// function: any other color syntax the style engine leaves un-normalized
/// (`color(display-p3 …)`, `oklch(…)`, keywords) yields `None`, as does a
/// function body with fewer than three integers.
#[must_use]
pub fn parse_rgb_triple(color: &str) -> Option<Rgb> {
    let body = rgb_function_body(color.trim())?;
    let mut channels = [0u8; 3];
    let mut found = 0usize;
    let mut run: Option<u32> = None;

    for byte in body.bytes().chain(std::iter::once(b' ')) {
        if byte.is_ascii_digit() {
            let digit = u32::from(byte - b'0');
            run = Some(run.unwrap_or(0).saturating_mul(10).saturating_add(digit));
        } else if let Some(value) = run.take() {
            channels[found] = value.min(255) as u8;
            found += 1;
            if found == 3 {
                return Some(Rgb::new(channels[0], channels[1], channels[2]));
            }
        }
    }
    None
}

/// The text between the parens of a leading `rgb(`/`rgba(` function,
/// ASCII case-insensitive. `None` for any other shape.
fn rgb_function_body(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    if bytes.len() < 3 || !bytes[..3].eq_ignore_ascii_case(b"rgb") {
        return None;
    }
    let rest = &s[3..];
    let rest = rest.strip_prefix(['a', 'A']).unwrap_or(rest);
    let body = rest.strip_prefix('(')?;
    body.find(')').map(|end| &body[..end])
}

fn strip_quotes(family: &str) -> String {
    family.chars().filter(|c| *c != '"' && *c != '\'').collect()
}
