//! sRGB hex <-> linear RGB helpers.
//!
//! Presets are authored as sRGB hex values (what designers hand over) but all
//! interpolation happens on linear channels, so conversions live here.

use glam::Vec3;

#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Convert a packed `0xRRGGBB` sRGB value to linear RGB.
pub fn hex_to_linear(hex: u32) -> Vec3 {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    Vec3::new(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b))
}

/// Convert linear RGB back to packed sRGB, clamping out-of-gamut channels.
pub fn linear_to_hex(color: Vec3) -> u32 {
    let quantize = |c: f32| (linear_to_srgb(c.clamp(0.0, 1.0)) * 255.0).round() as u32;
    (quantize(color.x) << 16) | (quantize(color.y) << 8) | quantize(color.z)
}

/// Parse `#rrggbb` (or `rrggbb`) into linear RGB.
pub fn parse_hex(s: &str) -> Option<Vec3> {
    let digits = s.strip_prefix('#').unwrap_or(s);
    if digits.len() != 6 {
        return None;
    }
    u32::from_str_radix(digits, 16).ok().map(hex_to_linear)
}

/// Format linear RGB as `#rrggbb`.
pub fn format_hex(color: Vec3) -> String {
    format!("#{:06x}", linear_to_hex(color))
}
