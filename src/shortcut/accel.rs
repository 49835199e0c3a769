//! Key chords and accelerators.
//!
//! Parses human-readable chord strings like `"Ctrl+Shift+N"` and matches them
//! against key presses coming out of egui. Several chords may share one
//! string, separated by whitespace and optionally wrapped in `<...>`:
//! `"<Ctrl+N> <F2>"`.
use egui::Key;
use std::fmt;

/// Bitmask of the modifiers that must be held for a chord.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ModifierMask(u8);

impl ModifierMask {
    pub const NONE: Self = Self(0);
    pub const SHIFT: Self = Self(1);
    pub const CTRL: Self = Self(2);
    pub const ALT: Self = Self(4);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Converts egui modifiers. `Cmd` on macOS counts as `Ctrl`.
    pub fn from_egui(modifiers: egui::Modifiers) -> Self {
        let mut mask = Self::NONE;
        if modifiers.shift {
            mask = mask | Self::SHIFT;
        }
        if modifiers.ctrl || modifiers.command || modifiers.mac_cmd {
            mask = mask | Self::CTRL;
        }
        if modifiers.alt {
            mask = mask | Self::ALT;
        }
        mask
    }
}

impl std::ops::BitOr for ModifierMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// The non-modifier part of a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordKey {
    /// A physical key reported by `egui::Event::Key`
    Key(Key),
    /// A typed character reported by `egui::Event::Text` (e.g. `<` or `*`)
    Char(char),
}

/// One modifier+key alternative of an accelerator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub modifiers: ModifierMask,
    pub key: ChordKey,
}

impl KeyChord {
    pub fn new(modifiers: ModifierMask, key: Key) -> Self {
        Self {
            modifiers,
            key: ChordKey::Key(key),
        }
    }

    /// Parses a single chord such as `"Ctrl+Shift+N"`.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split('+').map(str::trim).collect();

        // "Ctrl++" names the plus character itself
        let (mods, key_str) = if s.ends_with("++") {
            (&parts[..parts.len().saturating_sub(2)], "+")
        } else {
            let (last, mods) = parts.split_last()?;
            (mods, *last)
        };

        let mut modifiers = ModifierMask::NONE;
        for part in mods {
            modifiers = modifiers
                | match part.to_ascii_lowercase().as_str() {
                    "shift" => ModifierMask::SHIFT,
                    "ctrl" | "control" | "cmd" | "command" => ModifierMask::CTRL,
                    "alt" | "option" => ModifierMask::ALT,
                    _ => return None,
                };
        }

        Some(Self {
            modifiers,
            key: parse_key(key_str)?,
        })
    }

    pub fn matches(&self, press: &KeyPress) -> bool {
        if self.modifiers != press.modifiers {
            return false;
        }
        match self.key {
            ChordKey::Key(key) => press.key == Some(key),
            ChordKey::Char(c) => press.ch == Some(c),
        }
    }
}

fn parse_key(s: &str) -> Option<ChordKey> {
    if s.is_empty() {
        return None;
    }
    if let Some(key) = Key::from_name(s) {
        return Some(ChordKey::Key(key));
    }

    let mut chars = s.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    match Key::from_name(&c.to_ascii_uppercase().to_string()) {
        Some(key) => Some(ChordKey::Key(key)),
        None => Some(ChordKey::Char(c)),
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(ModifierMask::CTRL) {
            write!(f, "Ctrl+")?;
        }
        if self.modifiers.contains(ModifierMask::ALT) {
            write!(f, "Alt+")?;
        }
        if self.modifiers.contains(ModifierMask::SHIFT) {
            write!(f, "Shift+")?;
        }
        match self.key {
            ChordKey::Key(key) => write!(f, "{}", key.name()),
            ChordKey::Char(c) => write!(f, "{}", c),
        }
    }
}

/// A key press as seen by the shortcut resolver.
///
/// Presses built from `egui::Event::Key` carry `key`; presses built from
/// `egui::Event::Text` carry `ch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub modifiers: ModifierMask,
    pub key: Option<Key>,
    pub ch: Option<char>,
}

impl KeyPress {
    pub fn key(modifiers: ModifierMask, key: Key) -> Self {
        Self {
            modifiers,
            key: Some(key),
            ch: None,
        }
    }

    pub fn character(modifiers: ModifierMask, ch: char) -> Self {
        Self {
            modifiers,
            key: None,
            ch: Some(ch),
        }
    }

    /// Builds a press from an egui event. Releases and multi-character text
    /// are ignored.
    pub fn from_event(event: &egui::Event, modifiers: egui::Modifiers) -> Option<Self> {
        match event {
            egui::Event::Key {
                key,
                pressed: true,
                modifiers,
                ..
            } => Some(Self::key(ModifierMask::from_egui(*modifiers), *key)),
            egui::Event::Text(text) => {
                let mut chars = text.chars();
                let c = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                // Shift is implied by the character itself
                let mask = ModifierMask(ModifierMask::from_egui(modifiers).0 & !ModifierMask::SHIFT.0);
                Some(Self::character(mask, c))
            }
            _ => None,
        }
    }
}

/// The set of chords bound to one binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accelerator {
    chords: Vec<KeyChord>,
}

impl Accelerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends every chord found in `s`. Chords that fail to parse are skipped
    /// with a warning; duplicates are not added twice. Returns how many chords
    /// were accepted.
    pub fn add_keys_from_str(&mut self, s: &str) -> usize {
        let mut added = 0;
        for token in s.split_whitespace() {
            let token = token.trim_start_matches('<').trim_end_matches('>');
            if token.is_empty() {
                continue;
            }
            match KeyChord::parse(token) {
                Some(chord) => {
                    self.add_chord(chord);
                    added += 1;
                }
                None => log::warn!("Ignoring malformed key chord '{}' in '{}'", token, s),
            }
        }
        added
    }

    pub fn add_chord(&mut self, chord: KeyChord) {
        if !self.chords.contains(&chord) {
            self.chords.push(chord);
        }
    }

    pub fn chords(&self) -> &[KeyChord] {
        &self.chords
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    /// True when any alternative matches the press.
    pub fn check(&self, press: &KeyPress) -> bool {
        self.chords.iter().any(|chord| chord.matches(press))
    }
}

impl fmt::Display for Accelerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chord) in self.chords.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", chord)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_modifiers_in_any_case_and_order() {
        let chord = KeyChord::parse("shift+CTRL+n").unwrap();
        assert_eq!(chord.modifiers, ModifierMask::CTRL | ModifierMask::SHIFT);
        assert_eq!(chord.key, ChordKey::Key(Key::N));
    }

    #[test]
    fn lowercase_letter_is_the_same_key() {
        assert_eq!(KeyChord::parse("m"), KeyChord::parse("M"));
    }

    #[test]
    fn rejects_unknown_modifier_and_dangling_modifier() {
        assert_eq!(KeyChord::parse("Hyper+N"), None);
        assert_eq!(KeyChord::parse("Ctrl+"), None);
        assert_eq!(KeyChord::parse("Escapee"), None);
    }

    #[test]
    fn plus_can_be_bound() {
        let chord = KeyChord::parse("Ctrl++").unwrap();
        assert_eq!(chord.modifiers, ModifierMask::CTRL);
        assert!(matches!(chord.key, ChordKey::Key(_) | ChordKey::Char('+')));
    }

    #[test]
    fn several_chords_in_one_string() {
        let mut accel = Accelerator::new();
        assert_eq!(accel.add_keys_from_str("<Ctrl+N> <F2>"), 2);
        assert!(accel.check(&KeyPress::key(ModifierMask::CTRL, Key::N)));
        assert!(accel.check(&KeyPress::key(ModifierMask::NONE, Key::F2)));
        assert!(!accel.check(&KeyPress::key(ModifierMask::NONE, Key::N)));
    }

    #[test]
    fn modifiers_must_match_exactly() {
        let mut accel = Accelerator::new();
        accel.add_keys_from_str("Ctrl+Z");
        assert!(!accel.check(&KeyPress::key(ModifierMask::CTRL | ModifierMask::SHIFT, Key::Z)));
    }
}
