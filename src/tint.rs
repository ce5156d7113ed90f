//! Tint blending.
//!
//! Group tinting moves a whole group as one cohesive unit: every member
//! keeps its lightness offset from the group's primary color, so shading
//! survives a recolor (highlights stay highlights after skin turns blue).
//! The all-colors group has no primary to anchor on and interpolates HSL
//! directly instead.

use crate::color_math::{hsl_to_rgb, rgb_to_hsl};
use crate::types::color::{Hsl, Rgba};

/// The member's HSL at full tint strength: hue and saturation of the
/// tinted primary, lightness shifted by the member's original offset from
/// the primary.
fn full_tint_target_hsl(member: &Rgba, primary: &Rgba, tint_target: &Rgba) -> Hsl {
    let tinted_primary = rgb_to_hsl(tint_target);
    let offset = rgb_to_hsl(member).l - rgb_to_hsl(primary).l;
    Hsl::new(
        tinted_primary.h,
        tinted_primary.s,
        (tinted_primary.l + offset).clamp(0.0, 1.0),
    )
}

/// Tints one group member toward `tint_target` by `amount` (0..=1),
/// relative to the group primary. Alpha is preserved from `member`
/// throughout; tinting never changes alpha.
pub fn calculate_tinted_color_for_group_member(
    member: &Rgba,
    primary: &Rgba,
    tint_target: &Rgba,
    amount: f32,
) -> Rgba {
    let amount = amount.clamp(0.0, 1.0);

    if amount >= 0.999 {
        if member.same_rgb(primary) {
            // The primary itself lands exactly on the target.
            return Rgba::new(tint_target.r, tint_target.g, tint_target.b, member.a);
        }
        if tint_target.same_rgb(primary) {
            // Full-strength tint toward the group's own primary must not
            // shift the other members.
            return *member;
        }
        let target = full_tint_target_hsl(member, primary, tint_target);
        return hsl_to_rgb(&target, member.a);
    }

    // Partial blend: resolve the full-strength target first (no special
    // cases on this path), then interpolate each channel linearly.
    let target = full_tint_target_hsl(member, primary, tint_target);
    let full = hsl_to_rgb(&target, member.a);
    let lerp = |from: u8, to: u8| {
        (from as f32 + (to as f32 - from as f32) * amount)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    Rgba::new(
        lerp(member.r, full.r),
        lerp(member.g, full.g),
        lerp(member.b, full.b),
        member.a,
    )
}

/// Direct HSL interpolation toward `tint_source`, used when tinting the
/// whole palette at once. Hue travels the shorter circular arc and only
/// moves when the tint source itself carries saturation, so a gray source
/// (or a gray base against a negligible amount) never drags hue around.
pub fn apply_pixel_tint(base: &Rgba, tint_source: &Rgba, amount: f32) -> Rgba {
    let t = amount.clamp(0.0, 1.0);
    let base_hsl = rgb_to_hsl(base);
    let source_hsl = rgb_to_hsl(tint_source);

    let h = if source_hsl.s > 0.01 && t > 0.001 {
        let mut diff = source_hsl.h - base_hsl.h;
        if diff > 180.0 {
            diff -= 360.0;
        }
        if diff < -180.0 {
            diff += 360.0;
        }
        (base_hsl.h + diff * t + 360.0) % 360.0
    } else {
        base_hsl.h
    };
    let s = base_hsl.s + (source_hsl.s - base_hsl.s) * t;
    let l = base_hsl.l + (source_hsl.l - base_hsl.l) * t;

    hsl_to_rgb(
        &Hsl::new(h, s.clamp(0.0, 1.0), l.clamp(0.0, 1.0)),
        base.a,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = Rgba::opaque(255, 0, 0);
    const DARK_RED: Rgba = Rgba::opaque(200, 0, 0);
    const BLUE: Rgba = Rgba::opaque(0, 0, 255);

    #[test]
    fn zero_amount_is_identity() {
        let cases = [
            (DARK_RED, RED, BLUE),
            (RED, RED, BLUE),
            (Rgba::new(13, 200, 77, 64), RED, BLUE),
        ];
        for (member, primary, target) in cases {
            assert_eq!(
                calculate_tinted_color_for_group_member(&member, &primary, &target, 0.0),
                member
            );
        }
    }

    #[test]
    fn full_blend_maps_primary_exactly_onto_target() {
        let primary = Rgba::new(255, 0, 0, 130);
        let out = calculate_tinted_color_for_group_member(&primary, &primary, &BLUE, 1.0);
        assert_eq!(out, Rgba::new(0, 0, 255, 130));
    }

    #[test]
    fn tinting_toward_own_primary_leaves_members_alone() {
        let out = calculate_tinted_color_for_group_member(&DARK_RED, &RED, &RED, 1.0);
        assert_eq!(out, DARK_RED);
    }

    #[test]
    fn members_keep_their_shading_offset() {
        // Dark red sits 0.108 below the primary's lightness; after a full
        // blue tint it lands the same distance below blue.
        let out = calculate_tinted_color_for_group_member(&DARK_RED, &RED, &BLUE, 1.0);
        assert_eq!(out, Rgba::opaque(0, 0, 200));
    }

    #[test]
    fn partial_blend_interpolates_channels() {
        let out = calculate_tinted_color_for_group_member(&DARK_RED, &RED, &BLUE, 0.5);
        assert_eq!(out, Rgba::opaque(100, 0, 100));
    }

    #[test]
    fn tint_preserves_alpha_at_every_amount() {
        let member = Rgba::new(200, 0, 0, 90);
        for amount in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let out = calculate_tinted_color_for_group_member(&member, &RED, &BLUE, amount);
            assert_eq!(out.a, 90, "amount {amount}");
        }
    }

    #[test]
    fn pixel_tint_full_amount_reaches_the_source() {
        let out = apply_pixel_tint(&RED, &BLUE, 1.0);
        assert_eq!(out, Rgba::opaque(0, 0, 255));
    }

    #[test]
    fn pixel_tint_zero_amount_is_identity() {
        let base = Rgba::new(37, 120, 9, 200);
        let out = apply_pixel_tint(&base, &BLUE, 0.0);
        // Amount 0 still round-trips through HSL; only rounding slack is
        // allowed.
        assert!((out.r as i16 - base.r as i16).abs() <= 1);
        assert!((out.g as i16 - base.g as i16).abs() <= 1);
        assert!((out.b as i16 - base.b as i16).abs() <= 1);
        assert_eq!(out.a, base.a);
    }

    #[test]
    fn gray_tint_source_does_not_drag_hue() {
        let gray = Rgba::opaque(128, 128, 128);
        let out = apply_pixel_tint(&RED, &gray, 0.5);
        // Saturation halves, hue must stay on red.
        let hsl = crate::color_math::rgb_to_hsl(&out);
        assert!(hsl.h < 1.0 || hsl.h > 359.0, "hue drifted to {}", hsl.h);
        assert!((hsl.s - 0.5).abs() < 0.02);
    }

    #[test]
    fn pixel_tint_hue_takes_the_short_arc() {
        // 350 degrees toward 10 degrees crosses zero instead of sweeping
        // the long way through cyan.
        let base = Rgba::opaque(255, 0, 43);
        let source = Rgba::opaque(255, 43, 0);
        let out = apply_pixel_tint(&base, &source, 0.5);
        assert_eq!(out, Rgba::opaque(255, 0, 0));
    }
}
