//! The recolor pipeline. One recompute walks a list of group passes over
//! the original pixels and produces a fresh RGBA buffer; nothing here
//! mutates session state, so the same inputs always yield the same image.
//!
//! Passes run in list order and each writes only the pixels it claims,
//! which makes the last claiming group win wherever memberships overlap.
//! Every read goes back to the original buffer, never to an earlier
//! pass's output.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::color_math::{hex_to_rgb, hsl_to_rgb, rgb_to_hsl};
use crate::tint::{apply_pixel_tint, calculate_tinted_color_for_group_member};
use crate::types::color::{Hsl, Rgba};
use crate::types::group::{AppliedGroupSettings, GroupKey, HexSet};

/// One group's contribution to a recompute: which original hexes it
/// claims, the settings to apply, and the resolved tint anchor.
#[derive(Debug, Clone)]
pub struct GroupPass {
    pub key: GroupKey,
    pub members: HexSet,
    pub settings: AppliedGroupSettings,
    /// Original RGBA of the group's primary color. `None` for the
    /// sentinel, and for named groups whose primary cannot be resolved;
    /// those skip their tint while the sliders still apply.
    pub primary: Option<Rgba>,
}

/// What one recompute covers: every named group at once (quick recolor),
/// or a single group. While a membership edit is in progress the staged
/// selection substitutes for the stored one.
#[derive(Debug, Clone)]
pub enum RecolorScope<'a> {
    AllGroups,
    Single {
        key: GroupKey,
        staged_members: Option<&'a HexSet>,
    },
}

/// Membership and override checks key on the original RGB triple; the
/// hex form exists for display and storage only.
fn rgb_keys(members: &HexSet) -> HashSet<[u8; 3]> {
    members
        .iter()
        .filter_map(hex_to_rgb)
        .map(|c| [c.r, c.g, c.b])
        .collect()
}

/// Recomputes the displayed image from the original buffer. `overrides`
/// pin an original hex to a fixed output value regardless of grouping.
pub fn recolor(
    original: &[u8],
    passes: &[GroupPass],
    overrides: &BTreeMap<String, Rgba>,
) -> Vec<u8> {
    let mut output = original.to_vec();
    let override_values: HashMap<[u8; 3], Rgba> = overrides
        .iter()
        .filter_map(|(hex, value)| hex_to_rgb(hex).map(|c| ([c.r, c.g, c.b], *value)))
        .collect();

    for pass in passes {
        if pass.members.is_empty() {
            continue;
        }
        let members = rgb_keys(&pass.members);
        apply_pass(original, &mut output, pass, &members, &override_values);
    }
    output
}

fn apply_pass(
    original: &[u8],
    output: &mut [u8],
    pass: &GroupPass,
    members: &HashSet<[u8; 3]>,
    overrides: &HashMap<[u8; 3], Rgba>,
) {
    let settings = &pass.settings;
    let adjusts_alpha = settings.alpha_delta != 0.0;
    let alpha_factor = 1.0 + settings.alpha_delta / 100.0;
    let tint_strength = settings.tint_amount / 100.0;
    let passthrough = settings.is_passthrough();

    for (index, pixel) in original.chunks_exact(4).enumerate() {
        let at = index * 4;
        let source = Rgba::new(pixel[0], pixel[1], pixel[2], pixel[3]);

        // A pass that leaves alpha alone has nothing to say about pixels
        // that start invisible.
        if source.a == 0 && !adjusts_alpha {
            output[at + 3] = 0;
            continue;
        }

        let key = [source.r, source.g, source.b];
        if let Some(value) = overrides.get(&key) {
            output[at] = value.r;
            output[at + 1] = value.g;
            output[at + 2] = value.b;
            output[at + 3] = value.a;
            continue;
        }

        if !members.contains(&key) {
            if source.a == 0 {
                output[at + 3] = 0;
            }
            continue;
        }

        if passthrough {
            output[at..at + 4].copy_from_slice(pixel);
            continue;
        }

        let mut adjusted_alpha = f32::from(source.a);
        if adjusts_alpha {
            adjusted_alpha *= alpha_factor;
        }
        let adjusted_alpha = adjusted_alpha.clamp(0.0, 255.0).round() as u8;

        let mut working = Rgba::new(source.r, source.g, source.b, adjusted_alpha);
        if tint_strength > 0.0 {
            working = match (&pass.key, pass.primary) {
                (GroupKey::AllColors, _) => {
                    apply_pixel_tint(&working, &settings.tint_color, tint_strength)
                }
                (GroupKey::Named(_), Some(primary)) => calculate_tinted_color_for_group_member(
                    &working,
                    &primary,
                    &settings.tint_color,
                    tint_strength,
                ),
                (GroupKey::Named(_), None) => working,
            };
        }

        let hsl = rgb_to_hsl(&working);
        let hue = (hsl.h + settings.hue_delta).rem_euclid(360.0);
        let saturation = (hsl.s + settings.saturation_delta / 100.0).clamp(0.0, 1.0);
        let mut lightness = hsl.l + settings.lightness_delta / 100.0;
        if settings.contrast_delta != 0.0 {
            lightness = 0.5 + (lightness - 0.5) * (1.0 + settings.contrast_delta / 100.0);
        }
        let lightness = lightness.clamp(0.0, 1.0);

        let transformed = hsl_to_rgb(&Hsl::new(hue, saturation, lightness), working.a);
        output[at] = transformed.r;
        output[at + 1] = transformed.g;
        output[at + 2] = transformed.b;
        output[at + 3] = transformed.a;
    }
}

/// Dims everything outside the selected original colors to a tenth of its
/// visible alpha, leaving selected pixels untouched. Works on top of the
/// current recolored preview so the isolation tracks live edits.
pub fn blend_isolation_preview(original: &[u8], preview: &[u8], selected: &HexSet) -> Vec<u8> {
    let mut output = preview.to_vec();
    if original.len() != preview.len() {
        log::warn!(
            "isolation preview buffers differ in size ({} vs {} bytes), showing the preview unblended",
            original.len(),
            preview.len()
        );
        return output;
    }

    let selected_keys = rgb_keys(selected);
    for (index, pixel) in original.chunks_exact(4).enumerate() {
        let at = index * 4;
        if pixel[3] == 0 {
            output[at + 3] = 0;
            continue;
        }
        if !selected_keys.contains(&[pixel[0], pixel[1], pixel[2]]) {
            let visible = f32::from(output[at + 3]);
            output[at + 3] = (visible * 0.1).round() as u8;
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_of(colors: &[Rgba]) -> Vec<u8> {
        let mut data = Vec::new();
        for c in colors {
            data.extend_from_slice(&[c.r, c.g, c.b, c.a]);
        }
        data
    }

    fn pixel(buffer: &[u8], index: usize) -> Rgba {
        let at = index * 4;
        Rgba::new(buffer[at], buffer[at + 1], buffer[at + 2], buffer[at + 3])
    }

    fn named_pass(members: &[&str], settings: AppliedGroupSettings) -> GroupPass {
        GroupPass {
            key: GroupKey::named("g"),
            members: members.iter().copied().collect(),
            settings,
            primary: members.first().and_then(|hex| hex_to_rgb(hex)),
        }
    }

    #[test]
    fn quick_tint_repaints_members_and_leaves_the_rest() {
        let original = buffer_of(&[Rgba::opaque(255, 0, 0), Rgba::opaque(255, 255, 255)]);
        let pass = named_pass(
            &["#ff0000"],
            AppliedGroupSettings {
                tint_color: Rgba::opaque(0, 0, 255),
                tint_amount: 100.0,
                ..Default::default()
            },
        );
        let out = recolor(&original, &[pass], &BTreeMap::new());
        assert_eq!(pixel(&out, 0), Rgba::opaque(0, 0, 255));
        assert_eq!(pixel(&out, 1), Rgba::opaque(255, 255, 255));
    }

    #[test]
    fn hue_shift_wraps_red_to_cyan() {
        let original = buffer_of(&[Rgba::opaque(255, 0, 0)]);
        let pass = named_pass(
            &["#ff0000"],
            AppliedGroupSettings {
                hue_delta: 180.0,
                ..Default::default()
            },
        );
        let out = recolor(&original, &[pass], &BTreeMap::new());
        assert_eq!(pixel(&out, 0), Rgba::opaque(0, 255, 255));
    }

    #[test]
    fn full_negative_contrast_collapses_lightness_to_middle() {
        let original = buffer_of(&[Rgba::opaque(200, 0, 0)]);
        let pass = named_pass(
            &["#c80000"],
            AppliedGroupSettings {
                contrast_delta: -100.0,
                ..Default::default()
            },
        );
        let out = recolor(&original, &[pass], &BTreeMap::new());
        // l snaps to 0.5 while hue and saturation stay, giving pure red.
        assert_eq!(pixel(&out, 0), Rgba::opaque(255, 0, 0));
    }

    #[test]
    fn later_pass_wins_overlapping_membership() {
        let original = buffer_of(&[Rgba::opaque(255, 0, 0)]);
        let green = named_pass(
            &["#ff0000"],
            AppliedGroupSettings {
                hue_delta: 120.0,
                ..Default::default()
            },
        );
        let blue = named_pass(
            &["#ff0000"],
            AppliedGroupSettings {
                hue_delta: -120.0,
                ..Default::default()
            },
        );
        let out = recolor(&original, &[green, blue], &BTreeMap::new());
        assert_eq!(pixel(&out, 0), Rgba::opaque(0, 0, 255));
    }

    #[test]
    fn override_beats_the_group_transform() {
        let original = buffer_of(&[Rgba::opaque(255, 0, 0)]);
        let pass = named_pass(
            &["#ff0000"],
            AppliedGroupSettings {
                hue_delta: 180.0,
                ..Default::default()
            },
        );
        let mut overrides = BTreeMap::new();
        overrides.insert("#ff0000".to_string(), Rgba::new(1, 2, 3, 77));
        let out = recolor(&original, &[pass], &overrides);
        assert_eq!(pixel(&out, 0), Rgba::new(1, 2, 3, 77));
    }

    #[test]
    fn transparent_pixels_pass_through_alpha_neutral_passes() {
        let original = buffer_of(&[Rgba::new(10, 20, 30, 0)]);
        let pass = named_pass(
            &["#0a141e"],
            AppliedGroupSettings {
                hue_delta: 180.0,
                ..Default::default()
            },
        );
        let out = recolor(&original, &[pass], &BTreeMap::new());
        assert_eq!(pixel(&out, 0), Rgba::new(10, 20, 30, 0));
    }

    #[test]
    fn alpha_adjusting_pass_transforms_invisible_members_in_place() {
        let original = buffer_of(&[Rgba::new(255, 0, 0, 0)]);
        let pass = named_pass(
            &["#ff0000"],
            AppliedGroupSettings {
                hue_delta: 120.0,
                alpha_delta: -50.0,
                ..Default::default()
            },
        );
        let out = recolor(&original, &[pass], &BTreeMap::new());
        // The pixel stays invisible but its stored color still shifts.
        assert_eq!(pixel(&out, 0), Rgba::new(0, 255, 0, 0));
    }

    #[test]
    fn alpha_delta_scales_opacity() {
        let original = buffer_of(&[Rgba::new(10, 20, 30, 200)]);
        let pass = named_pass(
            &["#0a141e"],
            AppliedGroupSettings {
                alpha_delta: -50.0,
                ..Default::default()
            },
        );
        let out = recolor(&original, &[pass], &BTreeMap::new());
        assert_eq!(pixel(&out, 0), Rgba::new(10, 20, 30, 100));
    }

    #[test]
    fn empty_membership_skips_the_pass() {
        let original = buffer_of(&[Rgba::opaque(255, 0, 0)]);
        let pass = named_pass(
            &[],
            AppliedGroupSettings {
                hue_delta: 180.0,
                ..Default::default()
            },
        );
        let out = recolor(&original, &[pass], &BTreeMap::new());
        assert_eq!(out, original);
    }

    #[test]
    fn sentinel_pass_tints_every_palette_color() {
        let original = buffer_of(&[Rgba::opaque(255, 0, 0), Rgba::new(0, 0, 0, 0)]);
        let pass = GroupPass {
            key: GroupKey::AllColors,
            members: ["#ff0000"].into_iter().collect(),
            settings: AppliedGroupSettings {
                tint_color: Rgba::opaque(0, 0, 255),
                tint_amount: 50.0,
                ..Default::default()
            },
            primary: None,
        };
        let out = recolor(&original, &[pass], &BTreeMap::new());
        // Red half-way to blue along the short hue arc lands on magenta.
        assert_eq!(pixel(&out, 0), Rgba::opaque(255, 0, 255));
        assert_eq!(pixel(&out, 1), Rgba::new(0, 0, 0, 0));
    }

    #[test]
    fn passthrough_pass_copies_members_verbatim() {
        let original = buffer_of(&[Rgba::new(123, 45, 67, 89)]);
        let pass = named_pass(&["#7b2d43"], AppliedGroupSettings::default());
        let out = recolor(&original, &[pass], &BTreeMap::new());
        assert_eq!(out, original);
    }

    #[test]
    fn isolation_preview_dims_unselected_colors() {
        let original = buffer_of(&[
            Rgba::opaque(255, 0, 0),
            Rgba::opaque(0, 255, 0),
            Rgba::new(0, 0, 0, 0),
        ]);
        let selected: HexSet = ["#ff0000"].into_iter().collect();
        let out = blend_isolation_preview(&original, &original, &selected);
        assert_eq!(out[3], 255);
        assert_eq!(out[7], 26);
        assert_eq!(out[11], 0);
    }

    #[test]
    fn isolation_preview_keeps_mismatched_buffers_unblended() {
        let original = buffer_of(&[Rgba::opaque(255, 0, 0)]);
        let preview = buffer_of(&[Rgba::opaque(1, 2, 3), Rgba::opaque(4, 5, 6)]);
        let selected = HexSet::new();
        let out = blend_isolation_preview(&original, &preview, &selected);
        assert_eq!(out, preview);
    }
}
