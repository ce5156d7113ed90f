use std::ops::RangeInclusive;

use crate::types::color::Rgba;

/// Slider ranges exposed by the UI. The engine clamps defensively anyway.
pub const HUE_DELTA_RANGE: RangeInclusive<f32> = -180.0..=180.0;
pub const SATURATION_DELTA_RANGE: RangeInclusive<f32> = -100.0..=100.0;
pub const LIGHTNESS_DELTA_RANGE: RangeInclusive<f32> = -100.0..=100.0;
pub const CONTRAST_DELTA_RANGE: RangeInclusive<f32> = -100.0..=100.0;
pub const ALPHA_DELTA_RANGE: RangeInclusive<f32> = -100.0..=0.0;
pub const TINT_AMOUNT_RANGE: RangeInclusive<f32> = 0.0..=100.0;

pub const DEFAULT_TINT_COLOR: Rgba = Rgba::opaque(255, 255, 255);

/// Which group an operation addresses. The "all colors" group is never
/// stored in the group list; it implicitly contains every palette hex.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    AllColors,
    Named(String),
}

impl GroupKey {
    pub fn named(id: impl Into<String>) -> Self {
        Self::Named(id.into())
    }

    pub fn is_all_colors(&self) -> bool {
        matches!(self, Self::AllColors)
    }
}

/// Insertion-ordered set of hex keys. Group membership and the primary
/// fallback both depend on a stable, reproducible order, which a hash set
/// would not give.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HexSet(Vec<String>);

impl HexSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds a hex unless already present; returns whether it was added.
    pub fn insert(&mut self, hex: impl Into<String>) -> bool {
        let hex = hex.into();
        if self.0.iter().any(|h| *h == hex) {
            return false;
        }
        self.0.push(hex);
        true
    }

    pub fn remove(&mut self, hex: &str) -> bool {
        match self.0.iter().position(|h| h == hex) {
            Some(i) => {
                self.0.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, hex: &str) -> bool {
        self.0.iter().any(|h| h == hex)
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }
}

impl FromIterator<String> for HexSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        let mut set = Self::new();
        for hex in iter {
            set.insert(hex);
        }
        set
    }
}

impl<'a> FromIterator<&'a str> for HexSet {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        iter.into_iter().map(str::to_owned).collect()
    }
}

/// A named, possibly overlapping subset of palette colors sharing one
/// adjustment record. Auto-groups come from the categorizer at image load;
/// user groups from staged selections.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorGroup {
    pub id: String,
    pub name: String,
    pub is_auto: bool,
    pub hexes: HexSet,
}

impl ColorGroup {
    pub fn key(&self) -> GroupKey {
        GroupKey::Named(self.id.clone())
    }
}

/// The per-group adjustment record. Deltas are percentages except
/// `hue_delta` (degrees); `alpha_delta` only fades (range -100..0).
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedGroupSettings {
    pub hue_delta: f32,
    pub saturation_delta: f32,
    pub lightness_delta: f32,
    pub contrast_delta: f32,
    pub alpha_delta: f32,
    pub tint_color: Rgba,
    pub tint_amount: f32,
}

impl Default for AppliedGroupSettings {
    fn default() -> Self {
        Self {
            hue_delta: 0.0,
            saturation_delta: 0.0,
            lightness_delta: 0.0,
            contrast_delta: 0.0,
            alpha_delta: 0.0,
            tint_color: DEFAULT_TINT_COLOR,
            tint_amount: 0.0,
        }
    }
}

impl AppliedGroupSettings {
    /// True when no delta and no tint amount is in effect. The tint color
    /// alone has no influence while the amount is zero, so such a record
    /// recolors nothing.
    pub fn is_passthrough(&self) -> bool {
        self.hue_delta == 0.0
            && self.saturation_delta == 0.0
            && self.lightness_delta == 0.0
            && self.contrast_delta == 0.0
            && self.alpha_delta == 0.0
            && self.tint_amount == 0.0
    }

    /// The quick-recolor shape: untouched sliders with a full-strength tint.
    pub fn is_pure_quick_tint(&self) -> bool {
        self.hue_delta == 0.0
            && self.saturation_delta == 0.0
            && self.lightness_delta == 0.0
            && self.contrast_delta == 0.0
            && self.alpha_delta == 0.0
            && self.tint_amount == 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_set_keeps_insertion_order() {
        let mut set = HexSet::new();
        assert!(set.insert("#ff0000"));
        assert!(set.insert("#00ff00"));
        assert!(!set.insert("#ff0000"));
        let order: Vec<&str> = set.iter().collect();
        assert_eq!(order, vec!["#ff0000", "#00ff00"]);
        assert_eq!(set.first(), Some("#ff0000"));

        assert!(set.remove("#ff0000"));
        assert_eq!(set.first(), Some("#00ff00"));
        assert!(!set.remove("#ff0000"));
    }

    #[test]
    fn default_settings_are_passthrough() {
        let settings = AppliedGroupSettings::default();
        assert!(settings.is_passthrough());
        assert!(!settings.is_pure_quick_tint());
    }

    #[test]
    fn quick_tint_shape() {
        let settings = AppliedGroupSettings {
            tint_amount: 100.0,
            tint_color: Rgba::opaque(0, 0, 255),
            ..Default::default()
        };
        assert!(settings.is_pure_quick_tint());
        assert!(!settings.is_passthrough());
    }
}
