//! Unique-color extraction from a decoded RGBA buffer.

use std::collections::HashSet;

use crate::color_math::{rgb_to_hex, rgb_to_hsl};
use crate::types::color::{PaletteColor, Rgba};

/// Hard ceiling on unique colors per image. Every recolor pass is
/// O(colors x pixels) per group, so photographic palettes are refused
/// outright instead of degrading.
pub const MAX_UNIQUE_COLORS: usize = 500;

/// Scans the buffer and returns every distinct color in first-seen order.
/// Uniqueness is keyed by the full (r,g,b,a) tuple so distinct alpha
/// levels stay distinct entries. Fully transparent pixels never enter the
/// palette and are never recolorable.
pub fn extract_unique_colors(rgba_data: &[u8]) -> Vec<Rgba> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for px in rgba_data.chunks_exact(4) {
        if px[3] == 0 {
            continue;
        }
        let color = Rgba::new(px[0], px[1], px[2], px[3]);
        if seen.insert(color) {
            unique.push(color);
        }
    }
    unique
}

/// Pairs each unique color with its hex key and sorts for display by
/// ascending lightness, then saturation, then hue. The order is purely
/// presentational but has to be deterministic; downstream group membership
/// inherits it as insertion order.
pub fn build_display_palette(unique: Vec<Rgba>) -> Vec<PaletteColor> {
    let mut palette: Vec<PaletteColor> = unique
        .into_iter()
        .map(|original| PaletteColor {
            hex: rgb_to_hex(&original),
            original,
        })
        .collect();
    palette.sort_by(|a, b| {
        let ha = rgb_to_hsl(&a.original);
        let hb = rgb_to_hsl(&b.original);
        ha.l.total_cmp(&hb.l)
            .then(ha.s.total_cmp(&hb.s))
            .then(ha.h.total_cmp(&hb.h))
    });
    palette
}

/// Full extraction step for an image load. Rejects the load before any
/// group or recolor state exists when the image carries more than
/// [`MAX_UNIQUE_COLORS`] unique colors.
pub fn extract_palette(rgba_data: &[u8]) -> Result<Vec<PaletteColor>, String> {
    let unique = extract_unique_colors(rgba_data);
    if unique.len() > MAX_UNIQUE_COLORS {
        return Err(format!(
            "Image has too many unique colors ({}), maximum allowed is {}",
            unique.len(),
            MAX_UNIQUE_COLORS
        ));
    }
    Ok(build_display_palette(unique))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_of(colors: &[Rgba]) -> Vec<u8> {
        let mut data = Vec::with_capacity(colors.len() * 4);
        for c in colors {
            data.extend_from_slice(&[c.r, c.g, c.b, c.a]);
        }
        data
    }

    #[test]
    fn transparent_pixels_never_enter_the_palette() {
        let data = buffer_of(&[
            Rgba::new(10, 20, 30, 0),
            Rgba::opaque(10, 20, 30),
            Rgba::new(200, 0, 0, 0),
        ]);
        let unique = extract_unique_colors(&data);
        assert_eq!(unique, vec![Rgba::opaque(10, 20, 30)]);
    }

    #[test]
    fn uniqueness_keys_on_full_rgba() {
        let data = buffer_of(&[
            Rgba::opaque(10, 20, 30),
            Rgba::new(10, 20, 30, 128),
            Rgba::opaque(10, 20, 30),
        ]);
        let unique = extract_unique_colors(&data);
        assert_eq!(unique.len(), 2);

        // Both alpha variants share one hex key in the display palette.
        let palette = build_display_palette(unique);
        assert_eq!(palette[0].hex, "#0a141e");
        assert_eq!(palette[1].hex, "#0a141e");
    }

    #[test]
    fn display_palette_sorts_dark_to_light() {
        let data = buffer_of(&[
            Rgba::opaque(255, 255, 255),
            Rgba::opaque(0, 0, 0),
            Rgba::opaque(128, 128, 128),
        ]);
        let palette = extract_palette(&data).unwrap();
        let hexes: Vec<&str> = palette.iter().map(|p| p.hex.as_str()).collect();
        assert_eq!(hexes, vec!["#000000", "#808080", "#ffffff"]);
    }

    #[test]
    fn ceiling_admits_exactly_max_colors() {
        // 500 distinct reds/greens: (r, g) pairs walked deterministically.
        let mut colors = Vec::new();
        for i in 0..MAX_UNIQUE_COLORS {
            colors.push(Rgba::opaque((i % 250) as u8, (i / 250) as u8, 77));
        }
        let data = buffer_of(&colors);
        assert!(extract_palette(&data).is_ok());
    }

    #[test]
    fn ceiling_rejects_one_over_max() {
        let mut colors = Vec::new();
        for i in 0..=MAX_UNIQUE_COLORS {
            colors.push(Rgba::opaque((i % 250) as u8, (i / 250) as u8, 77));
        }
        let data = buffer_of(&colors);
        let err = extract_palette(&data).unwrap_err();
        assert!(err.contains("too many unique colors"), "{err}");
    }

    #[test]
    fn duplicate_pixels_collapse() {
        let data = buffer_of(&[Rgba::opaque(5, 5, 5); 64]);
        assert_eq!(extract_unique_colors(&data).len(), 1);
    }
}
