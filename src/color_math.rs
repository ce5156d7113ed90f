//! RGB/HSL conversion and the hex codec. Pure functions; everything else
//! in the engine is built on these.

use crate::types::color::{Hsl, Rgba};

/// Standard max/min channel conversion. Achromatic input (max == min)
/// yields h = 0, s = 0.
pub fn rgb_to_hsl(rgb: &Rgba) -> Hsl {
    let r = rgb.r as f32 / 255.0;
    let g = rgb.g as f32 / 255.0;
    let b = rgb.b as f32 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl::new(0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let mut h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    h /= 6.0;

    Hsl::new(h * 360.0, s, l)
}

fn hue_to_channel(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Sector interpolation back to RGB. Channels are rounded to the nearest
/// integer; alpha is stored as given, the caller rounds and clamps it.
pub fn hsl_to_rgb(hsl: &Hsl, alpha: u8) -> Rgba {
    let h = hsl.h / 360.0;
    let s = hsl.s;
    let l = hsl.l;

    let (r, g, b) = if s == 0.0 {
        (l, l, l)
    } else {
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        (
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        )
    };

    Rgba::new(round_channel(r), round_channel(g), round_channel(b), alpha)
}

fn round_channel(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Lowercase `#rrggbb`. Alpha is never encoded; callers track it out of
/// band.
pub fn rgb_to_hex(rgb: &Rgba) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b)
}

/// Parses an optional-`#`, case-insensitive, exactly-6-digit hex color.
/// Returns `None` on anything malformed; parsed colors are opaque.
pub fn hex_to_rgb(hex: &str) -> Option<Rgba> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some(Rgba::opaque(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let samples = [
            Rgba::opaque(0, 0, 0),
            Rgba::opaque(255, 255, 255),
            Rgba::opaque(255, 0, 0),
            Rgba::opaque(18, 52, 86),
            Rgba::opaque(200, 0, 0),
            Rgba::opaque(1, 2, 3),
        ];
        for c in samples {
            let hex = rgb_to_hex(&c);
            let back = hex_to_rgb(&hex).unwrap();
            assert_eq!((back.r, back.g, back.b), (c.r, c.g, c.b), "{hex}");
        }
    }

    #[test]
    fn hex_parse_accepts_case_and_optional_hash() {
        assert_eq!(hex_to_rgb("#FF00aa"), Some(Rgba::opaque(255, 0, 170)));
        assert_eq!(hex_to_rgb("ff00aa"), Some(Rgba::opaque(255, 0, 170)));
    }

    #[test]
    fn hex_parse_rejects_malformed() {
        assert_eq!(hex_to_rgb(""), None);
        assert_eq!(hex_to_rgb("#fff"), None);
        assert_eq!(hex_to_rgb("#ff00aa00"), None);
        assert_eq!(hex_to_rgb("#ff00ag"), None);
        assert_eq!(hex_to_rgb("not a color"), None);
    }

    #[test]
    fn hex_emits_lowercase() {
        assert_eq!(rgb_to_hex(&Rgba::opaque(255, 171, 205)), "#ffabcd");
    }

    #[test]
    fn hsl_of_primaries() {
        let red = rgb_to_hsl(&Rgba::opaque(255, 0, 0));
        assert!((red.h - 0.0).abs() < 0.01);
        assert!((red.s - 1.0).abs() < 0.01);
        assert!((red.l - 0.5).abs() < 0.01);

        let green = rgb_to_hsl(&Rgba::opaque(0, 255, 0));
        assert!((green.h - 120.0).abs() < 0.01);

        let blue = rgb_to_hsl(&Rgba::opaque(0, 0, 255));
        assert!((blue.h - 240.0).abs() < 0.01);
    }

    #[test]
    fn achromatic_has_zero_hue_and_saturation() {
        for v in [0u8, 77, 128, 255] {
            let hsl = rgb_to_hsl(&Rgba::opaque(v, v, v));
            assert_eq!(hsl.h, 0.0);
            assert_eq!(hsl.s, 0.0);
        }
    }

    #[test]
    fn hsl_round_trip_within_one_per_channel() {
        // Sweep a lattice of the RGB cube; rounding may move each channel
        // by at most one step.
        for r in (0..=255u16).step_by(17) {
            for g in (0..=255u16).step_by(17) {
                for b in (0..=255u16).step_by(17) {
                    let c = Rgba::opaque(r as u8, g as u8, b as u8);
                    let back = hsl_to_rgb(&rgb_to_hsl(&c), c.a);
                    assert!(
                        (back.r as i16 - c.r as i16).abs() <= 1
                            && (back.g as i16 - c.g as i16).abs() <= 1
                            && (back.b as i16 - c.b as i16).abs() <= 1,
                        "{c:?} -> {back:?}"
                    );
                    assert_eq!(back.a, c.a);
                }
            }
        }
    }

    #[test]
    fn alpha_passes_through_conversion() {
        let hsl = rgb_to_hsl(&Rgba::new(10, 20, 30, 128));
        assert_eq!(hsl_to_rgb(&hsl, 128).a, 128);
    }
}
