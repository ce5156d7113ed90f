//! The recolor session: one loaded image plus every piece of mutable model
//! state that hangs off it. Groups, applied settings, primary records and
//! overrides live here; all operations are plain in-memory mutations with
//! no I/O, and every collection iterates in a deterministic order.

use std::collections::BTreeMap;

use crate::color_math::{hex_to_rgb, rgb_to_hex};
use crate::grouping::{auto_group_palette, group_primary_original};
use crate::palette::extract_palette;
use crate::recolor::{GroupPass, RecolorScope};
use crate::types::color::{PaletteColor, Rgba};
use crate::types::group::{
    AppliedGroupSettings, ColorGroup, DEFAULT_TINT_COLOR, GroupKey, HexSet,
};

#[derive(Debug)]
pub struct RecolorSession {
    width: u32,
    height: u32,
    original_rgba: Vec<u8>,
    palette: Vec<PaletteColor>,
    groups: Vec<ColorGroup>,
    settings: BTreeMap<GroupKey, AppliedGroupSettings>,
    /// Reset targets, written at group creation and on membership-driven
    /// reassignment. Keyed by named group id.
    initial_primaries: BTreeMap<String, String>,
    /// User-facing "make primary" selections. Falls back to the initial
    /// record when absent.
    current_primaries: BTreeMap<String, String>,
    /// Original hex -> pinned final value. Applies globally, independent
    /// of groups.
    overrides: BTreeMap<String, Rgba>,
    next_user_group_id: u64,
}

impl RecolorSession {
    /// Builds a session from a decoded RGBA buffer. Rejects mismatched
    /// dimensions and palettes over the ceiling before any state exists.
    pub fn from_rgba(width: u32, height: u32, original_rgba: Vec<u8>) -> Result<Self, String> {
        let expected = width as usize * height as usize * 4;
        if original_rgba.len() != expected {
            return Err(format!(
                "Buffer length {} does not match {}x{} RGBA",
                original_rgba.len(),
                width,
                height
            ));
        }

        let palette = extract_palette(&original_rgba)?;
        let groups = auto_group_palette(&palette);

        let mut session = Self {
            width,
            height,
            original_rgba,
            palette,
            groups,
            settings: BTreeMap::new(),
            initial_primaries: BTreeMap::new(),
            current_primaries: BTreeMap::new(),
            overrides: BTreeMap::new(),
            next_user_group_id: 0,
        };
        session.seed_auto_group_records();
        Ok(session)
    }

    /// Every auto group starts with default settings, its tint color based
    /// on the resolved primary, and identical initial/current primary
    /// records.
    fn seed_auto_group_records(&mut self) {
        let mut seeds = Vec::with_capacity(self.groups.len());
        for group in &self.groups {
            let mut settings = AppliedGroupSettings::default();
            let primary_hex = match group_primary_original(group, &self.palette) {
                Some(rgb) => {
                    settings.tint_color = rgb;
                    Some(rgb_to_hex(&rgb))
                }
                None => group.hexes.first().map(|first| {
                    if let Some(rgb) = hex_to_rgb(first) {
                        settings.tint_color = rgb;
                    }
                    first.to_string()
                }),
            };
            seeds.push((group.id.clone(), settings, primary_hex));
        }
        for (id, settings, primary_hex) in seeds {
            self.settings.insert(GroupKey::Named(id.clone()), settings);
            if let Some(hex) = primary_hex {
                self.initial_primaries.insert(id.clone(), hex.clone());
                self.current_primaries.insert(id, hex);
            }
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn original_rgba(&self) -> &[u8] {
        &self.original_rgba
    }

    pub fn palette(&self) -> &[PaletteColor] {
        &self.palette
    }

    pub fn palette_contains(&self, hex: &str) -> bool {
        self.palette.iter().any(|p| p.hex == hex)
    }

    pub fn groups(&self) -> &[ColorGroup] {
        &self.groups
    }

    pub fn group(&self, id: &str) -> Option<&ColorGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn groups_containing(&self, hex: &str) -> Vec<&ColorGroup> {
        self.groups.iter().filter(|g| g.hexes.contains(hex)).collect()
    }

    /// The sentinel group's implicit membership: every palette hex.
    pub fn all_palette_hexes(&self) -> HexSet {
        self.palette.iter().map(|p| p.hex.as_str()).collect()
    }

    // --- applied settings ---------------------------------------------

    /// The settings record for a group, defaults when none was written yet.
    pub fn settings_for(&self, key: &GroupKey) -> AppliedGroupSettings {
        self.settings.get(key).cloned().unwrap_or_default()
    }

    pub fn set_settings(&mut self, key: GroupKey, settings: AppliedGroupSettings) {
        self.settings.insert(key, settings);
    }

    /// Resets the sliders and arms a full-strength tint in one step.
    pub fn set_quick_tint(&mut self, key: GroupKey, tint_color: Rgba) {
        self.settings.insert(
            key,
            AppliedGroupSettings {
                tint_color,
                tint_amount: 100.0,
                ..Default::default()
            },
        );
    }

    /// Restores a named group's pristine settings. The tint color re-bases
    /// on the initial primary; the current primary selection stays.
    pub fn reset_group_to_initial(&mut self, group_id: &str) -> Result<(), String> {
        if self.group(group_id).is_none() {
            return Err(format!("Unknown group '{group_id}'"));
        }
        let mut pristine = AppliedGroupSettings::default();
        if let Some(hex) = self.initial_primaries.get(group_id)
            && let Some(rgb) = hex_to_rgb(hex)
        {
            pristine.tint_color = rgb;
        }
        self.settings
            .insert(GroupKey::named(group_id), pristine);
        Ok(())
    }

    /// Clones the source group's settings onto the target, and adopts the
    /// source's primary when the target also contains it.
    pub fn copy_settings_from(&mut self, source_id: &str, target_id: &str) -> Result<(), String> {
        if source_id == target_id {
            return Err("Cannot copy settings from a group onto itself".to_string());
        }
        if self.group(source_id).is_none() {
            return Err(format!("Unknown group '{source_id}'"));
        }
        if self.group(target_id).is_none() {
            return Err(format!("Unknown group '{target_id}'"));
        }
        let settings = self.settings_for(&GroupKey::named(source_id));
        self.settings
            .insert(GroupKey::named(target_id), settings);

        if let Some(primary) = self.current_primary_hex(source_id).map(str::to_string)
            && self
                .group(target_id)
                .is_some_and(|g| g.hexes.contains(&primary))
        {
            self.set_primary(target_id, &primary)?;
        }
        Ok(())
    }

    /// A group reads as modified when its record differs from the pristine
    /// state, with the tint baseline being the initial primary (default
    /// white for the sentinel). The exact quick-tint shape with the
    /// baseline color still counts as unmodified.
    pub fn is_group_modified(&self, key: &GroupKey) -> bool {
        let settings = self.settings_for(key);
        let baseline_hex = match key {
            GroupKey::AllColors => None,
            GroupKey::Named(id) => self.initial_primaries.get(id),
        };
        let baseline = match baseline_hex {
            Some(hex) => match hex_to_rgb(hex) {
                Some(rgb) => rgb,
                None => return true,
            },
            None => DEFAULT_TINT_COLOR,
        };
        let tint_differs = rgb_to_hex(&settings.tint_color) != rgb_to_hex(&baseline);
        if settings.is_pure_quick_tint() {
            return tint_differs;
        }
        !settings.is_passthrough() || tint_differs
    }

    // --- primaries ----------------------------------------------------

    pub fn initial_primary_hex(&self, group_id: &str) -> Option<&str> {
        self.initial_primaries.get(group_id).map(String::as_str)
    }

    /// The effective primary: the user's pick, else the initial record.
    pub fn current_primary_hex(&self, group_id: &str) -> Option<&str> {
        self.current_primaries
            .get(group_id)
            .or_else(|| self.initial_primaries.get(group_id))
            .map(String::as_str)
    }

    fn tint_follows_primary(&self, group_id: &str) -> bool {
        let tint_hex = rgb_to_hex(&self.settings_for(&GroupKey::named(group_id)).tint_color);
        if tint_hex == rgb_to_hex(&DEFAULT_TINT_COLOR) {
            return true;
        }
        self.initial_primaries
            .get(group_id)
            .is_some_and(|initial| initial.eq_ignore_ascii_case(&tint_hex))
    }

    /// Makes `hex` the group's current primary. The tint color follows the
    /// new primary only while the user has not customized it (it still
    /// equals the default white or the initial primary).
    pub fn set_primary(&mut self, group_id: &str, hex: &str) -> Result<(), String> {
        let Some(group) = self.group(group_id) else {
            return Err(format!("Unknown group '{group_id}'"));
        };
        if !group.hexes.contains(hex) {
            return Err(format!(
                "Color {hex} is not a member of group '{}'",
                group.name
            ));
        }
        let follow = self.tint_follows_primary(group_id);
        self.current_primaries
            .insert(group_id.to_string(), hex.to_string());
        if follow && let Some(rgb) = hex_to_rgb(hex) {
            let key = GroupKey::named(group_id);
            let mut settings = self.settings_for(&key);
            settings.tint_color = rgb;
            self.settings.insert(key, settings);
        }
        Ok(())
    }

    /// The original RGBA anchoring this group's relative tint: the recorded
    /// primary resolved against the palette, else a fresh resolver pass.
    pub fn tint_anchor_for(&self, group: &ColorGroup) -> Option<Rgba> {
        if let Some(hex) = self.current_primary_hex(&group.id)
            && let Some(entry) = self.palette.iter().find(|p| p.hex == hex)
        {
            return Some(entry.original);
        }
        group_primary_original(group, &self.palette)
    }

    /// Reassigns both primary records after `removed_hex` left the group.
    /// The first remaining member becomes the new primary (records clear
    /// when the group emptied), and the tint baseline follows under the
    /// same rule as an explicit "make primary".
    fn reassign_primary_after_removal(&mut self, group_id: &str, removed_hex: &str) {
        let current = self.current_primaries.get(group_id);
        let initial = self.initial_primaries.get(group_id);
        let affected = current.is_some_and(|h| h == removed_hex)
            || initial.is_some_and(|h| h == removed_hex);
        if !affected {
            return;
        }

        let next = self
            .group(group_id)
            .and_then(|g| g.hexes.first())
            .map(str::to_string);
        let follow = self.tint_follows_primary(group_id);

        match &next {
            Some(hex) => {
                self.initial_primaries
                    .insert(group_id.to_string(), hex.clone());
                self.current_primaries
                    .insert(group_id.to_string(), hex.clone());
            }
            None => {
                self.initial_primaries.remove(group_id);
                self.current_primaries.remove(group_id);
            }
        }

        if follow {
            let replacement = next
                .as_deref()
                .and_then(hex_to_rgb)
                .unwrap_or(DEFAULT_TINT_COLOR);
            let key = GroupKey::named(group_id);
            let mut settings = self.settings_for(&key);
            settings.tint_color = replacement;
            self.settings.insert(key, settings);
        }
    }

    // --- group lifecycle ----------------------------------------------

    /// Creates a user group from a staged selection and prepends it to the
    /// list. The initial primary is resolved immediately and becomes the
    /// tint baseline.
    pub fn create_group(&mut self, name: &str, hexes: HexSet) -> Result<String, String> {
        let name = name.trim();
        if name.is_empty() {
            return Err("Group name cannot be empty".to_string());
        }
        if hexes.is_empty() {
            return Err("Cannot save an empty group".to_string());
        }

        self.next_user_group_id += 1;
        let id = format!("group_{}", self.next_user_group_id);
        let group = ColorGroup {
            id: id.clone(),
            name: name.to_string(),
            is_auto: false,
            hexes,
        };

        let mut settings = AppliedGroupSettings::default();
        let primary_hex = match group_primary_original(&group, &self.palette) {
            Some(rgb) => {
                settings.tint_color = rgb;
                Some(rgb_to_hex(&rgb))
            }
            None => group.hexes.first().map(|first| {
                if let Some(rgb) = hex_to_rgb(first) {
                    settings.tint_color = rgb;
                }
                first.to_string()
            }),
        };

        self.groups.insert(0, group);
        self.settings.insert(GroupKey::named(&id), settings);
        if let Some(hex) = primary_hex {
            self.initial_primaries.insert(id.clone(), hex.clone());
            self.current_primaries.insert(id.clone(), hex);
        }
        Ok(id)
    }

    pub fn rename_group(&mut self, group_id: &str, name: &str) -> Result<(), String> {
        let name = name.trim();
        if name.is_empty() {
            return Err("Group name cannot be empty".to_string());
        }
        match self.groups.iter_mut().find(|g| g.id == group_id) {
            Some(group) => {
                group.name = name.to_string();
                Ok(())
            }
            None => Err(format!("Unknown group '{group_id}'")),
        }
    }

    pub fn delete_group(&mut self, group_id: &str) -> Result<(), String> {
        let before = self.groups.len();
        self.groups.retain(|g| g.id != group_id);
        if self.groups.len() == before {
            return Err(format!("Unknown group '{group_id}'"));
        }
        self.settings.remove(&GroupKey::named(group_id));
        self.initial_primaries.remove(group_id);
        self.current_primaries.remove(group_id);
        Ok(())
    }

    /// Adds a palette color to a group. A group that somehow lacks a
    /// primary record gains one from its first member.
    pub fn add_color(&mut self, group_id: &str, hex: &str) -> Result<(), String> {
        if !self.palette_contains(hex) {
            return Err(format!("Color {hex} is not in the current palette"));
        }
        let Some(group) = self.groups.iter_mut().find(|g| g.id == group_id) else {
            return Err(format!("Unknown group '{group_id}'"));
        };
        group.hexes.insert(hex);

        if self.current_primary_hex(group_id).is_none()
            && let Some(first) = self
                .group(group_id)
                .and_then(|g| g.hexes.first())
                .map(str::to_string)
        {
            let follow = self.tint_follows_primary(group_id);
            self.initial_primaries
                .insert(group_id.to_string(), first.clone());
            self.current_primaries
                .insert(group_id.to_string(), first.clone());
            if follow && let Some(rgb) = hex_to_rgb(&first) {
                let key = GroupKey::named(group_id);
                let mut settings = self.settings_for(&key);
                settings.tint_color = rgb;
                self.settings.insert(key, settings);
            }
        }
        Ok(())
    }

    /// Removes a color from a group, reassigning the primary if it was
    /// removed and pruning the group when it empties (auto groups survive
    /// empty; they are permanent fixtures of the palette).
    pub fn remove_color(&mut self, group_id: &str, hex: &str) -> Result<(), String> {
        let Some(group) = self.groups.iter_mut().find(|g| g.id == group_id) else {
            return Err(format!("Unknown group '{group_id}'"));
        };
        if !group.hexes.remove(hex) {
            return Ok(());
        }
        self.reassign_primary_after_removal(group_id, hex);
        self.prune_empty_groups();
        Ok(())
    }

    /// Commits a staged membership edit onto an existing group. An empty
    /// selection is rejected and the prior state kept.
    pub fn commit_group_edit(&mut self, group_id: &str, staged: &HexSet) -> Result<(), String> {
        if staged.is_empty() {
            return Err("Cannot save an empty group".to_string());
        }
        let Some(group) = self.groups.iter_mut().find(|g| g.id == group_id) else {
            return Err(format!("Unknown group '{group_id}'"));
        };
        group.hexes = staged.clone();

        let old_primary = self.current_primary_hex(group_id).map(str::to_string);
        match old_primary {
            Some(primary) if !staged.contains(&primary) => {
                if let Some(first) = staged.first().map(str::to_string) {
                    self.set_primary(group_id, &first)?;
                }
            }
            None => {
                if let Some(first) = staged.first().map(str::to_string) {
                    self.set_primary(group_id, &first)?;
                    self.initial_primaries
                        .insert(group_id.to_string(), first);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn prune_empty_groups(&mut self) {
        let removed: Vec<String> = self
            .groups
            .iter()
            .filter(|g| !g.is_auto && g.hexes.is_empty())
            .map(|g| g.id.clone())
            .collect();
        if removed.is_empty() {
            return;
        }
        self.groups.retain(|g| g.is_auto || !g.hexes.is_empty());
        for id in removed {
            self.settings.remove(&GroupKey::Named(id.clone()));
            self.initial_primaries.remove(&id);
            self.current_primaries.remove(&id);
        }
    }

    /// Replaces the whole group list from a loaded preset, in file order.
    /// Preset groups come in as user groups; primaries are re-resolved and
    /// become the modified-flag baseline, while the tint color is taken
    /// from the preset verbatim.
    pub fn load_groups(&mut self, entries: Vec<(String, Vec<String>, AppliedGroupSettings)>) {
        let sentinel = self.settings.remove(&GroupKey::AllColors);
        self.groups.clear();
        self.settings.clear();
        self.initial_primaries.clear();
        self.current_primaries.clear();
        if let Some(settings) = sentinel {
            self.settings.insert(GroupKey::AllColors, settings);
        }

        for (name, colors, settings) in entries {
            self.next_user_group_id += 1;
            let id = format!("group_{}", self.next_user_group_id);
            let group = ColorGroup {
                id: id.clone(),
                name,
                is_auto: false,
                hexes: colors.into_iter().collect(),
            };
            if let Some(rgb) = group_primary_original(&group, &self.palette) {
                let hex = rgb_to_hex(&rgb);
                self.initial_primaries.insert(id.clone(), hex.clone());
                self.current_primaries.insert(id.clone(), hex);
            }
            self.settings.insert(GroupKey::Named(id.clone()), settings);
            self.groups.push(group);
        }
    }

    // --- overrides ----------------------------------------------------

    /// Pins an original palette hex to a picked replacement color. The
    /// stored alpha comes from the first palette entry carrying that hex
    /// (255 when none resolves).
    pub fn set_override(&mut self, original_hex: &str, picked_hex: &str) -> Result<(), String> {
        let Some(picked) = hex_to_rgb(picked_hex) else {
            return Err(format!("Invalid override color '{picked_hex}'"));
        };
        let alpha = self
            .palette
            .iter()
            .find(|p| p.hex == original_hex)
            .map_or(255, |p| p.original.a);
        self.overrides.insert(
            original_hex.to_string(),
            Rgba::new(picked.r, picked.g, picked.b, alpha),
        );
        Ok(())
    }

    pub fn clear_override(&mut self, original_hex: &str) {
        self.overrides.remove(original_hex);
    }

    pub fn override_for(&self, original_hex: &str) -> Option<Rgba> {
        self.overrides.get(original_hex).copied()
    }

    pub fn overrides(&self) -> &BTreeMap<String, Rgba> {
        &self.overrides
    }

    // --- recolor plumbing ---------------------------------------------

    fn pass_for_group(&self, group: &ColorGroup, members: HexSet) -> GroupPass {
        GroupPass {
            key: group.key(),
            members,
            settings: self.settings_for(&group.key()),
            primary: self.tint_anchor_for(group),
        }
    }

    fn sentinel_pass(&self) -> GroupPass {
        GroupPass {
            key: GroupKey::AllColors,
            members: self.all_palette_hexes(),
            settings: self.settings_for(&GroupKey::AllColors),
            primary: None,
        }
    }

    /// Assembles the group passes for one recompute. Single-group scope
    /// recolors just that group (the staged membership substitutes while
    /// an edit is in progress); unknown ids fall back to the sentinel.
    pub fn passes_for(&self, scope: &RecolorScope<'_>) -> Vec<GroupPass> {
        match scope {
            RecolorScope::AllGroups => self
                .groups
                .iter()
                .map(|g| self.pass_for_group(g, g.hexes.clone()))
                .collect(),
            RecolorScope::Single {
                key: GroupKey::AllColors,
                ..
            } => vec![self.sentinel_pass()],
            RecolorScope::Single {
                key: GroupKey::Named(id),
                staged_members,
            } => match self.group(id) {
                Some(group) => {
                    let members = staged_members
                        .map(|s| (*s).clone())
                        .unwrap_or_else(|| group.hexes.clone());
                    vec![self.pass_for_group(group, members)]
                }
                None => vec![self.sentinel_pass()],
            },
        }
    }
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

    /// 4x1 image: two reds, white, transparent.
    fn red_session() -> RecolorSession {
        let data = buffer_of(&[
            Rgba::opaque(255, 0, 0),
            Rgba::opaque(200, 0, 0),
            Rgba::opaque(255, 255, 255),
            Rgba::new(9, 9, 9, 0),
        ]);
        RecolorSession::from_rgba(4, 1, data).unwrap()
    }

    #[test]
    fn load_seeds_auto_groups_with_primary_tint() {
        let session = red_session();
        let names: Vec<&str> = session.groups().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Whites", "Reds"]);

        let reds = session.group("auto_reds_1").unwrap();
        assert_eq!(session.initial_primary_hex(&reds.id), Some("#ff0000"));
        assert_eq!(session.current_primary_hex(&reds.id), Some("#ff0000"));
        let settings = session.settings_for(&reds.key());
        assert_eq!(settings.tint_color, Rgba::opaque(255, 0, 0));
        assert!(!session.is_group_modified(&reds.key()));
    }

    #[test]
    fn rejects_mismatched_buffer() {
        let err = RecolorSession::from_rgba(2, 2, vec![0; 12]).unwrap_err();
        assert!(err.contains("does not match"), "{err}");
    }

    #[test]
    fn create_group_prepends_and_seeds_records() {
        let mut session = red_session();
        let id = session
            .create_group("Skin", ["#ff0000", "#c80000"].into_iter().collect())
            .unwrap();
        assert_eq!(id, "group_1");
        assert_eq!(session.groups()[0].id, id);
        assert_eq!(session.current_primary_hex(&id), Some("#ff0000"));
        assert_eq!(
            session.settings_for(&GroupKey::named(&id)).tint_color,
            Rgba::opaque(255, 0, 0)
        );

        assert!(session.create_group("  ", HexSet::new()).is_err());
        assert!(
            session
                .create_group("Empty", HexSet::new())
                .unwrap_err()
                .contains("empty group")
        );
    }

    #[test]
    fn set_primary_requires_membership() {
        let mut session = red_session();
        let err = session.set_primary("auto_reds_1", "#ffffff").unwrap_err();
        assert!(err.contains("not a member"), "{err}");
        session.set_primary("auto_reds_1", "#c80000").unwrap();
        assert_eq!(session.current_primary_hex("auto_reds_1"), Some("#c80000"));
        // The initial record is the reset target and stays put.
        assert_eq!(session.initial_primary_hex("auto_reds_1"), Some("#ff0000"));
    }

    #[test]
    fn tint_follows_primary_until_customized() {
        let mut session = red_session();
        // Untouched tint (still the initial primary) follows.
        session.set_primary("auto_reds_1", "#c80000").unwrap();
        assert_eq!(
            session
                .settings_for(&GroupKey::named("auto_reds_1"))
                .tint_color,
            Rgba::opaque(200, 0, 0)
        );

        // A customized tint color stops following.
        let key = GroupKey::named("auto_reds_1");
        let mut settings = session.settings_for(&key);
        settings.tint_color = Rgba::opaque(0, 0, 255);
        session.set_settings(key.clone(), settings);
        session.set_primary("auto_reds_1", "#ff0000").unwrap();
        assert_eq!(
            session.settings_for(&key).tint_color,
            Rgba::opaque(0, 0, 255)
        );
    }

    #[test]
    fn removing_the_primary_reassigns_both_records() {
        let mut session = red_session();
        let id = session
            .create_group("Pair", ["#ff0000", "#c80000"].into_iter().collect())
            .unwrap();
        session.remove_color(&id, "#ff0000").unwrap();
        assert_eq!(session.current_primary_hex(&id), Some("#c80000"));
        assert_eq!(session.initial_primary_hex(&id), Some("#c80000"));
        // Tint was still on the old primary, so it follows the new one.
        assert_eq!(
            session.settings_for(&GroupKey::named(&id)).tint_color,
            Rgba::opaque(200, 0, 0)
        );
    }

    #[test]
    fn emptied_user_group_is_pruned_but_auto_survives() {
        let mut session = red_session();
        let id = session
            .create_group("Solo", ["#c80000"].into_iter().collect())
            .unwrap();
        session.remove_color(&id, "#c80000").unwrap();
        assert!(session.group(&id).is_none());
        assert!(session.current_primary_hex(&id).is_none());

        let whites = "auto_whites_0";
        session.remove_color(whites, "#ffffff").unwrap();
        let group = session.group(whites).unwrap();
        assert!(group.hexes.is_empty());
        assert!(session.current_primary_hex(whites).is_none());
    }

    #[test]
    fn commit_group_edit_rejects_empty_and_replaces_membership() {
        let mut session = red_session();
        let id = session
            .create_group("Edit", ["#ff0000"].into_iter().collect())
            .unwrap();
        let err = session.commit_group_edit(&id, &HexSet::new()).unwrap_err();
        assert!(err.contains("empty group"), "{err}");
        assert_eq!(session.group(&id).unwrap().hexes.len(), 1);

        let staged: HexSet = ["#c80000", "#ffffff"].into_iter().collect();
        session.commit_group_edit(&id, &staged).unwrap();
        assert_eq!(session.group(&id).unwrap().hexes, staged);
        // The old primary left the set; the first staged member takes over.
        assert_eq!(session.current_primary_hex(&id), Some("#c80000"));
    }

    #[test]
    fn quick_tint_with_baseline_color_reads_unmodified() {
        let mut session = red_session();
        let key = GroupKey::named("auto_reds_1");
        session.set_quick_tint(key.clone(), Rgba::opaque(255, 0, 0));
        assert!(!session.is_group_modified(&key));

        session.set_quick_tint(key.clone(), Rgba::opaque(0, 0, 255));
        assert!(session.is_group_modified(&key));
    }

    #[test]
    fn any_delta_marks_the_group_modified() {
        let mut session = red_session();
        let key = GroupKey::named("auto_reds_1");
        let mut settings = session.settings_for(&key);
        settings.hue_delta = 1.0;
        session.set_settings(key.clone(), settings);
        assert!(session.is_group_modified(&key));
    }

    #[test]
    fn sentinel_modified_baseline_is_white() {
        let mut session = red_session();
        assert!(!session.is_group_modified(&GroupKey::AllColors));
        let mut settings = session.settings_for(&GroupKey::AllColors);
        settings.tint_color = Rgba::opaque(1, 2, 3);
        session.set_settings(GroupKey::AllColors, settings);
        assert!(session.is_group_modified(&GroupKey::AllColors));
    }

    #[test]
    fn override_takes_alpha_from_palette_entry() {
        let data = buffer_of(&[Rgba::new(10, 20, 30, 128), Rgba::opaque(255, 0, 0)]);
        let mut session = RecolorSession::from_rgba(2, 1, data).unwrap();
        session.set_override("#0a141e", "#00ff00").unwrap();
        assert_eq!(
            session.override_for("#0a141e"),
            Some(Rgba::new(0, 255, 0, 128))
        );

        session.clear_override("#0a141e");
        assert_eq!(session.override_for("#0a141e"), None);

        assert!(session.set_override("#0a141e", "nonsense").is_err());
    }

    #[test]
    fn copy_settings_clones_record_and_member_primary() {
        let mut session = red_session();
        let source = session
            .create_group("Source", ["#ff0000", "#c80000"].into_iter().collect())
            .unwrap();
        let target = session
            .create_group("Target", ["#c80000"].into_iter().collect())
            .unwrap();

        let mut settings = session.settings_for(&GroupKey::named(&source));
        settings.hue_delta = 42.0;
        session.set_settings(GroupKey::named(&source), settings);

        session.copy_settings_from(&source, &target).unwrap();
        assert_eq!(
            session.settings_for(&GroupKey::named(&target)).hue_delta,
            42.0
        );
        // Source primary #ff0000 is not a member of the target; the
        // target's own primary stands.
        assert_eq!(session.current_primary_hex(&target), Some("#c80000"));
    }

    #[test]
    fn reset_restores_defaults_and_initial_tint() {
        let mut session = red_session();
        let key = GroupKey::named("auto_reds_1");
        let mut settings = session.settings_for(&key);
        settings.hue_delta = 90.0;
        settings.tint_color = Rgba::opaque(0, 0, 255);
        settings.tint_amount = 55.0;
        session.set_settings(key.clone(), settings);

        session.reset_group_to_initial("auto_reds_1").unwrap();
        let reset = session.settings_for(&key);
        assert!(reset.is_passthrough());
        assert_eq!(reset.tint_color, Rgba::opaque(255, 0, 0));
        assert!(!session.is_group_modified(&key));
    }

    #[test]
    fn load_groups_replaces_list_in_file_order() {
        let mut session = red_session();
        session
            .create_group("Doomed", ["#ff0000"].into_iter().collect())
            .unwrap();

        let entries = vec![
            (
                "First".to_string(),
                vec!["#ff0000".to_string(), "#c80000".to_string()],
                AppliedGroupSettings {
                    hue_delta: 10.0,
                    ..Default::default()
                },
            ),
            (
                "Second".to_string(),
                vec!["#ffffff".to_string()],
                AppliedGroupSettings::default(),
            ),
        ];
        session.load_groups(entries);

        let names: Vec<&str> = session.groups().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second"]);
        let first = &session.groups()[0];
        assert_eq!(
            session.settings_for(&first.key()).hue_delta,
            10.0
        );
        assert_eq!(session.current_primary_hex(&first.id), Some("#ff0000"));
    }

    #[test]
    fn groups_containing_reports_every_owner() {
        let mut session = red_session();
        session
            .create_group("Extra", ["#ff0000"].into_iter().collect())
            .unwrap();
        let owners = session.groups_containing("#ff0000");
        assert_eq!(owners.len(), 2);
    }
}
