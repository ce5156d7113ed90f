//! Automatic color categorization and the primary-color resolver.
//!
//! Palette colors fall into a fixed ordered list of hue/lightness buckets;
//! the first matching bucket wins, which keeps boundary colors (dark
//! low-saturation reds and the like) out of multiple buckets. Each
//! non-empty bucket becomes an auto group.

use crate::color_math::rgb_to_hsl;
use crate::types::color::{Hsl, PaletteColor, Rgba};
use crate::types::group::{ColorGroup, HexSet};

fn is_blackish(hsl: &Hsl) -> bool {
    hsl.l < 0.15 && hsl.s < 0.25
}

fn is_whiteish(hsl: &Hsl) -> bool {
    hsl.l > 0.85 && hsl.s < 0.25
}

struct Category {
    name: &'static str,
    /// Prototypical HSL for the category, the reference point when picking
    /// a group's primary color.
    prototype: Hsl,
    matches: fn(&Hsl) -> bool,
}

/// Order is load-bearing: categorization takes the first match.
const CATEGORIES: &[Category] = &[
    Category {
        name: "Blacks",
        prototype: Hsl::new(0.0, 0.0, 0.05),
        matches: is_blackish,
    },
    Category {
        name: "Whites",
        prototype: Hsl::new(0.0, 0.0, 0.95),
        matches: is_whiteish,
    },
    Category {
        name: "Grays",
        prototype: Hsl::new(0.0, 0.0, 0.5),
        matches: |hsl| hsl.s < 0.15 && !is_blackish(hsl) && !is_whiteish(hsl),
    },
    Category {
        name: "Reds",
        prototype: Hsl::new(0.0, 1.0, 0.5),
        matches: |hsl| (hsl.h >= 335.0 || hsl.h < 15.0) && hsl.s >= 0.15 && !is_blackish(hsl),
    },
    Category {
        name: "Oranges",
        prototype: Hsl::new(30.0, 1.0, 0.5),
        matches: |hsl| hsl.h >= 15.0 && hsl.h < 45.0 && hsl.s >= 0.15 && !is_blackish(hsl),
    },
    Category {
        name: "Yellows",
        prototype: Hsl::new(60.0, 1.0, 0.5),
        matches: |hsl| hsl.h >= 45.0 && hsl.h < 70.0 && hsl.s >= 0.15 && !is_blackish(hsl),
    },
    Category {
        name: "Greens",
        prototype: Hsl::new(120.0, 1.0, 0.5),
        matches: |hsl| hsl.h >= 70.0 && hsl.h < 165.0 && hsl.s >= 0.15 && !is_blackish(hsl),
    },
    Category {
        name: "Cyans",
        prototype: Hsl::new(180.0, 1.0, 0.5),
        matches: |hsl| hsl.h >= 165.0 && hsl.h < 195.0 && hsl.s >= 0.15 && !is_blackish(hsl),
    },
    Category {
        name: "Blues",
        prototype: Hsl::new(240.0, 1.0, 0.5),
        matches: |hsl| hsl.h >= 195.0 && hsl.h < 255.0 && hsl.s >= 0.15 && !is_blackish(hsl),
    },
    Category {
        name: "Purples",
        prototype: Hsl::new(270.0, 1.0, 0.5),
        matches: |hsl| hsl.h >= 255.0 && hsl.h < 295.0 && hsl.s >= 0.15 && !is_blackish(hsl),
    },
    Category {
        name: "Magentas/Pinks",
        prototype: Hsl::new(300.0, 1.0, 0.5),
        matches: |hsl| hsl.h >= 295.0 && hsl.h < 335.0 && hsl.s >= 0.15 && !is_blackish(hsl),
    },
];

fn category_slug(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '/')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Buckets the palette into auto groups. Empty categories are omitted;
/// ids are `auto_<slug>_<index>` with the index taken over the surviving
/// categories, so identical palettes always produce identical groups.
pub fn auto_group_palette(palette: &[PaletteColor]) -> Vec<ColorGroup> {
    let mut buckets: Vec<HexSet> = CATEGORIES.iter().map(|_| HexSet::new()).collect();
    for color in palette {
        if color.original.a == 0 {
            continue;
        }
        let hsl = rgb_to_hsl(&color.original);
        for (bucket, category) in buckets.iter_mut().zip(CATEGORIES) {
            if (category.matches)(&hsl) {
                bucket.insert(color.hex.clone());
                break;
            }
        }
    }

    CATEGORIES
        .iter()
        .zip(buckets)
        .filter(|(_, bucket)| !bucket.is_empty())
        .enumerate()
        .map(|(index, (category, hexes))| ColorGroup {
            id: format!("auto_{}_{}", category_slug(category.name), index),
            name: category.name.to_string(),
            is_auto: true,
            hexes,
        })
        .collect()
}

fn prototype_for(category_name: &str) -> Option<Hsl> {
    CATEGORIES
        .iter()
        .find(|c| c.name == category_name)
        .map(|c| c.prototype)
}

/// Weighted similarity between two HSL values; lower is closer. Hue uses
/// the shortest circular arc normalized to [0,1]. Saturation and lightness
/// are weighted above hue, which matches how alike two pixel-art shades
/// read.
pub fn hsl_distance(a: &Hsl, b: &Hsl) -> f32 {
    let raw = (a.h - b.h).abs();
    let delta_h = raw.min(360.0 - raw) / 180.0;
    delta_h * 0.5 + (a.s - b.s).abs() * 1.5 + (a.l - b.l).abs() * 2.0
}

fn find_palette_entry<'a>(palette: &'a [PaletteColor], hex: &str) -> Option<&'a PaletteColor> {
    palette.iter().find(|p| p.hex == hex)
}

/// Resolves a group's primary color, the anchor for relative tinting.
///
/// Auto groups pick the member closest to the category prototype under
/// [`hsl_distance`] (ties go to the earliest member). User groups, or auto
/// groups whose prototype lookup fails, fall back to the first member that
/// is present in the palette. Returns the original RGBA of the chosen
/// palette entry, or `None` when nothing resolves.
pub fn group_primary_original(group: &ColorGroup, palette: &[PaletteColor]) -> Option<Rgba> {
    if group.hexes.is_empty() {
        return None;
    }

    let mut primary_hex: Option<&str> = None;

    if group.is_auto && let Some(prototype) = prototype_for(&group.name) {
        let mut min_distance = f32::INFINITY;
        for hex in group.hexes.iter() {
            if let Some(entry) = find_palette_entry(palette, hex) {
                let distance = hsl_distance(&rgb_to_hsl(&entry.original), &prototype);
                if distance < min_distance {
                    min_distance = distance;
                    primary_hex = Some(hex);
                }
            }
        }
    }

    if primary_hex.is_none() {
        primary_hex = group
            .hexes
            .iter()
            .find(|hex| palette.iter().any(|p| p.hex == *hex));
    }

    primary_hex
        .and_then(|hex| find_palette_entry(palette, hex))
        .map(|entry| entry.original)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{build_display_palette, extract_unique_colors};

    fn palette_of(colors: &[Rgba]) -> Vec<PaletteColor> {
        let mut data = Vec::new();
        for c in colors {
            data.extend_from_slice(&[c.r, c.g, c.b, c.a]);
        }
        build_display_palette(extract_unique_colors(&data))
    }

    #[test]
    fn no_color_lands_in_two_auto_groups() {
        let palette = palette_of(&[
            Rgba::opaque(10, 10, 10),
            Rgba::opaque(250, 250, 250),
            Rgba::opaque(128, 128, 128),
            Rgba::opaque(255, 0, 0),
            Rgba::opaque(200, 100, 20),
            Rgba::opaque(240, 230, 40),
            Rgba::opaque(30, 200, 60),
            Rgba::opaque(40, 200, 210),
            Rgba::opaque(20, 60, 230),
            Rgba::opaque(150, 40, 230),
            Rgba::opaque(230, 40, 200),
        ]);
        let groups = auto_group_palette(&palette);
        for entry in &palette {
            let owners = groups
                .iter()
                .filter(|g| g.hexes.contains(&entry.hex))
                .count();
            assert!(owners <= 1, "{} claimed {} times", entry.hex, owners);
        }
    }

    #[test]
    fn dark_desaturated_red_is_black_not_red() {
        // l ~ 0.13, s ~ 0.18: hue and saturation alone would put this in
        // the Reds band; the dark guard keeps it in Blacks.
        let palette = palette_of(&[Rgba::opaque(40, 28, 28)]);
        let groups = auto_group_palette(&palette);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Blacks");
    }

    #[test]
    fn hue_band_boundaries() {
        // h = 15 falls in Oranges, h = 334.6... stays in Magentas/Pinks,
        // h >= 335 wraps into Reds.
        let orange_boundary = rgb_to_hsl(&Rgba::opaque(255, 64, 0));
        assert!(orange_boundary.h >= 15.0 && orange_boundary.h < 45.0);

        let palette = palette_of(&[Rgba::opaque(255, 64, 0), Rgba::opaque(255, 0, 106)]);
        let groups = auto_group_palette(&palette);
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert!(names.contains(&"Oranges"));
        assert!(names.contains(&"Reds"));
    }

    #[test]
    fn empty_categories_are_omitted_and_ids_reindexed() {
        let palette = palette_of(&[Rgba::opaque(255, 0, 0), Rgba::opaque(0, 0, 255)]);
        let groups = auto_group_palette(&palette);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].id, "auto_reds_0");
        assert_eq!(groups[1].id, "auto_blues_1");
        assert!(groups.iter().all(|g| g.is_auto));
    }

    #[test]
    fn magentas_pinks_slug_flattens_the_slash() {
        let palette = palette_of(&[Rgba::opaque(255, 0, 200)]);
        let groups = auto_group_palette(&palette);
        assert_eq!(groups[0].id, "auto_magentas_pinks_0");
        assert_eq!(groups[0].name, "Magentas/Pinks");
    }

    #[test]
    fn auto_primary_is_closest_to_prototype() {
        let palette = palette_of(&[Rgba::opaque(200, 0, 0), Rgba::opaque(255, 0, 0)]);
        let groups = auto_group_palette(&palette);
        let reds = groups.iter().find(|g| g.name == "Reds").unwrap();
        // Pure red sits exactly on the Reds prototype {0, 1, 0.5}.
        assert_eq!(
            group_primary_original(reds, &palette),
            Some(Rgba::opaque(255, 0, 0))
        );
    }

    #[test]
    fn user_group_primary_falls_back_to_first_palette_member() {
        let palette = palette_of(&[Rgba::opaque(255, 0, 0), Rgba::opaque(0, 255, 0)]);
        let group = ColorGroup {
            id: "group_1".into(),
            name: "Custom".into(),
            is_auto: false,
            hexes: ["#123456", "#00ff00", "#ff0000"].into_iter().collect(),
        };
        // #123456 is not in the palette, so the first resolvable member wins.
        assert_eq!(
            group_primary_original(&group, &palette),
            Some(Rgba::opaque(0, 255, 0))
        );
    }

    #[test]
    fn unresolvable_group_has_no_primary() {
        let palette = palette_of(&[Rgba::opaque(255, 0, 0)]);
        let group = ColorGroup {
            id: "group_2".into(),
            name: "Ghost".into(),
            is_auto: false,
            hexes: ["#123456"].into_iter().collect(),
        };
        assert_eq!(group_primary_original(&group, &palette), None);

        let empty = ColorGroup {
            id: "group_3".into(),
            name: "Empty".into(),
            is_auto: false,
            hexes: HexSet::new(),
        };
        assert_eq!(group_primary_original(&empty, &palette), None);
    }
}
