//! Keyboard shortcuts for plot actions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modifier {
    None,
    Ctrl,
    Alt,
    Shift,
    CtrlShift,
}

impl Modifier {
    /// Text shown before the key, including the joining `+`.
    fn prefix(self) -> &'static str {
        match self {
            Modifier::None => "",
            Modifier::Ctrl => "Ctrl+",
            Modifier::Alt => "Alt+",
            Modifier::Shift => "Shift+",
            Modifier::CtrlShift => "Ctrl+Shift+",
        }
    }
}

/// Command counts as Ctrl. Combinations without a binding collapse to `None`.
impl From<egui::Modifiers> for Modifier {
    fn from(m: egui::Modifiers) -> Self {
        match (m.ctrl || m.command, m.alt, m.shift) {
            (true, false, true) => Modifier::CtrlShift,
            (true, false, false) => Modifier::Ctrl,
            (false, true, false) => Modifier::Alt,
            (false, false, true) => Modifier::Shift,
            _ => Modifier::None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotkey {
    pub modifier: Modifier,
    pub key: char,
}

impl Hotkey {
    pub fn new(modifier: Modifier, key: char) -> Self {
        Self { modifier, key }
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.modifier.prefix(), self.key)
    }
}

impl FromStr for Hotkey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('+').map(str::trim).collect();
        let (key, mods) = match parts.split_last() {
            Some((k, m)) if !k.is_empty() => (*k, m),
            _ => return Err("empty hotkey".to_string()),
        };
        let mut chars = key.chars();
        let ch = match (chars.next(), chars.next()) {
            (Some(c), None) => c.to_ascii_uppercase(),
            _ => return Err(format!("invalid key '{}'", key)),
        };
        let mut lowers: Vec<String> = mods.iter().map(|m| m.to_lowercase()).collect();
        lowers.sort();
        let modifier = match lowers.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
            [] => Modifier::None,
            ["ctrl"] | ["control"] => Modifier::Ctrl,
            ["alt"] => Modifier::Alt,
            ["shift"] => Modifier::Shift,
            ["ctrl", "shift"] => Modifier::CtrlShift,
            other => return Err(format!("unknown modifier combo '{:?}'", other)),
        };
        Ok(Hotkey { modifier, key: ch })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HotkeyName {
    SelectMode,
    PanZoomMode,
    ResetView,
    SelectAll,
    ClearSelection,
    SelectByStats,
    ToggleSelectionType,
    StickyShift,
    ExportSelection,
}

impl HotkeyName {
    pub fn label(self) -> &'static str {
        match self {
            HotkeyName::SelectMode => "Select mode",
            HotkeyName::PanZoomMode => "Pan/zoom mode",
            HotkeyName::ResetView => "Reset view",
            HotkeyName::SelectAll => "Select all",
            HotkeyName::ClearSelection => "Clear selection",
            HotkeyName::SelectByStats => "Select by stats",
            HotkeyName::ToggleSelectionType => "Toggle selection type",
            HotkeyName::StickyShift => "Sticky shift",
            HotkeyName::ExportSelection => "Export selection",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hotkeys {
    pub select_mode: Option<Hotkey>,
    pub pan_zoom_mode: Option<Hotkey>,
    pub reset_view: Option<Hotkey>,
    pub select_all: Option<Hotkey>,
    pub clear_selection: Option<Hotkey>,
    pub select_by_stats: Option<Hotkey>,
    pub toggle_selection_type: Option<Hotkey>,
    pub sticky_shift: Option<Hotkey>,
    pub export_selection: Option<Hotkey>,
}

impl Default for Hotkeys {
    fn default() -> Self {
        Self {
            select_mode: Some(Hotkey::new(Modifier::None, 'S')),
            pan_zoom_mode: Some(Hotkey::new(Modifier::None, 'Z')),
            reset_view: Some(Hotkey::new(Modifier::None, 'R')),
            select_all: Some(Hotkey::new(Modifier::Ctrl, 'A')),
            clear_selection: Some(Hotkey::new(Modifier::Ctrl, 'X')),
            select_by_stats: Some(Hotkey::new(Modifier::None, 'T')),
            toggle_selection_type: Some(Hotkey::new(Modifier::None, 'G')),
            sticky_shift: Some(Hotkey::new(Modifier::None, 'H')),
            export_selection: Some(Hotkey::new(Modifier::None, 'E')),
        }
    }
}

impl Hotkeys {
    pub fn get(&self, name: HotkeyName) -> Option<Hotkey> {
        match name {
            HotkeyName::SelectMode => self.select_mode,
            HotkeyName::PanZoomMode => self.pan_zoom_mode,
            HotkeyName::ResetView => self.reset_view,
            HotkeyName::SelectAll => self.select_all,
            HotkeyName::ClearSelection => self.clear_selection,
            HotkeyName::SelectByStats => self.select_by_stats,
            HotkeyName::ToggleSelectionType => self.toggle_selection_type,
            HotkeyName::StickyShift => self.sticky_shift,
            HotkeyName::ExportSelection => self.export_selection,
        }
    }

    pub const ORDER: [HotkeyName; 9] = [
        HotkeyName::SelectMode,
        HotkeyName::PanZoomMode,
        HotkeyName::ResetView,
        HotkeyName::SelectAll,
        HotkeyName::ClearSelection,
        HotkeyName::SelectByStats,
        HotkeyName::ToggleSelectionType,
        HotkeyName::StickyShift,
        HotkeyName::ExportSelection,
    ];

    /// Actions bound to `hk`.
    pub fn actions_for(&self, hk: Hotkey) -> Vec<HotkeyName> {
        Self::ORDER
            .iter()
            .copied()
            .filter(|n| self.get(*n) == Some(hk))
            .collect()
    }
}

fn char_from_key(key: egui::Key) -> Option<char> {
    let name = key.name();
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphanumeric() => Some(c.to_ascii_uppercase()),
        _ => None,
    }
}

/// Collect the actions triggered this frame. Nothing fires while a text
/// field has focus.
pub fn detect_hotkey_actions(cfg: &Hotkeys, ctx: &egui::Context) -> Vec<HotkeyName> {
    if ctx.wants_keyboard_input() {
        return Vec::new();
    }
    let mut actions = Vec::new();
    ctx.input(|input| {
        for ev in &input.events {
            if let egui::Event::Key {
                key,
                pressed: true,
                repeat: false,
                modifiers,
                ..
            } = ev
            {
                let Some(ch) = char_from_key(*key) else { continue };
                for act in cfg.actions_for(Hotkey::new(Modifier::from(*modifiers), ch)) {
                    if !actions.contains(&act) {
                        actions.push(act);
                    }
                }
            }
        }
    });
    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_round_trip() {
        let hk: Hotkey = "ctrl+a".parse().unwrap();
        assert_eq!(hk, Hotkey::new(Modifier::Ctrl, 'A'));
        assert_eq!(hk.to_string(), "Ctrl+A");
        assert!("ctrl+meta+a".parse::<Hotkey>().is_err());
        assert!("".parse::<Hotkey>().is_err());
    }

    #[test]
    fn defaults_map_to_actions() {
        let hk = Hotkeys::default();
        assert_eq!(hk.actions_for(Hotkey::new(Modifier::None, 'R')), vec![HotkeyName::ResetView]);
        assert!(hk.actions_for(Hotkey::new(Modifier::Alt, 'R')).is_empty());
    }
}
