// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canonical key combinations.

use alloc::string::String;
use core::convert::Infallible;
use core::fmt;
use core::str::FromStr;

use smallvec::SmallVec;

use crate::{KeyboardInput, Modifiers};

/// Canonical token for the space bar, whose host key value is a single `" "`.
const SPACE: &str = "space";

/// Token for a literal `+` key inside a human-written shortcut.
const PLUS: &str = "+";

/// A normalized, order-independent keyboard shortcut.
///
/// A combination is a set of [`Modifiers`] plus a sorted, de-duplicated list of
/// lower-case key tokens (normally exactly one). Two spellings of the same physical
/// combination always compare equal and hash identically:
///
/// ```
/// use understory_key_combo::KeyCombination;
///
/// let a = KeyCombination::parse("Ctrl+A");
/// let b = KeyCombination::parse("a + ctrl");
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "ctrl + a");
/// ```
///
/// The [`Display`](fmt::Display) rendering lists modifiers in lexicographic order
/// (`alt`, `ctrl`, `meta`, `shift`) followed by the keys, joined with `" + "`.
/// Parsing a rendering yields the same combination again.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeyCombination {
    modifiers: Modifiers,
    keys: SmallVec<[String; 1]>,
}

impl KeyCombination {
    /// Build a combination from a modifier set and a single key name.
    pub fn new(modifiers: Modifiers, key: &str) -> Self {
        let mut combo = Self::canonicalize([key]);
        combo.modifiers |= modifiers;
        combo
    }

    /// Canonicalize a sequence of tokens.
    ///
    /// Empty tokens are dropped, the rest are lower-cased. Tokens naming a modifier
    /// (`ctrl`, `shift`, `alt`, `meta`) join the modifier set; all other tokens are
    /// keys, which are sorted and de-duplicated. Neither the order of the tokens nor
    /// repeated tokens affect the result.
    pub fn canonicalize<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut modifiers = Modifiers::empty();
        let mut keys: SmallVec<[String; 1]> = SmallVec::new();
        for part in parts {
            let part = part.as_ref();
            if part.is_empty() {
                continue;
            }
            let token = normalize_token(part);
            match Modifiers::from_token(&token) {
                Some(modifier) => modifiers |= modifier,
                None => keys.push(token),
            }
        }
        keys.sort_unstable();
        keys.dedup();
        Self { modifiers, keys }
    }

    /// Parse a human-written shortcut such as `"Ctrl + Shift + K"` or `"alt+F4"`.
    ///
    /// The text is split on `+` and every token is trimmed; empty tokens are dropped.
    /// Two or more delimiters in a row (`"ctrl + +"`, or just `"+"`) stand for the
    /// literal plus key. Parsing never fails: malformed input canonicalizes to whatever
    /// tokens remain, which may simply never match a live key press.
    pub fn parse(text: &str) -> Self {
        let mut parts: SmallVec<[&str; 4]> = SmallVec::new();
        let mut empty_run = 0_usize;
        for token in text.split('+').map(str::trim) {
            if token.is_empty() {
                empty_run += 1;
                continue;
            }
            if empty_run >= 2 {
                parts.push(PLUS);
            }
            empty_run = 0;
            parts.push(token);
        }
        if empty_run >= 2 {
            parts.push(PLUS);
        }
        Self::canonicalize(parts)
    }

    /// Derive the combination of a live key press.
    ///
    /// The pressed key is canonicalized like any other token, so pressing `"A"` with
    /// Control held yields `ctrl + a`, and pressing a bare modifier key (key value
    /// `"Shift"`) yields just that modifier.
    pub fn from_input(input: &KeyboardInput) -> Self {
        Self::new(input.modifiers, &input.key)
    }

    /// Whether a live key press produces this combination.
    pub fn matches(&self, input: &KeyboardInput) -> bool {
        *self == Self::from_input(input)
    }

    /// The modifier set.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// The sorted key tokens.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// The primary key, when the combination has exactly one.
    pub fn key(&self) -> Option<&str> {
        match self.keys.as_slice() {
            [key] => Some(key),
            _ => None,
        }
    }

    /// True if the combination has neither modifiers nor keys.
    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty() && self.keys.is_empty()
    }
}

fn normalize_token(token: &str) -> String {
    if token == " " {
        return String::from(SPACE);
    }
    token.to_lowercase()
}

impl fmt::Display for KeyCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens = self
            .modifiers
            .tokens()
            .map(|token| -> &str { token })
            .chain(self.keys.iter().map(String::as_str));
        for (i, token) in tokens.enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            f.write_str(token)?;
        }
        Ok(())
    }
}

impl FromStr for KeyCombination {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for KeyCombination {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl From<&KeyboardInput> for KeyCombination {
    fn from(input: &KeyboardInput) -> Self {
        Self::from_input(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;

    fn render(text: &str) -> String {
        KeyCombination::parse(text).to_string()
    }

    #[test]
    fn spellings_of_the_same_combination_agree() {
        assert_eq!(render("Ctrl+A"), "ctrl + a");
        assert_eq!(render("a + ctrl"), "ctrl + a");
        assert_eq!(render("CTRL +a"), "ctrl + a");
        assert_eq!(render("shift + ctrl + alt + k"), "alt + ctrl + shift + k");
    }

    #[test]
    fn canonicalize_is_order_independent() {
        let parts = ["shift", "meta", "ArrowUp", "ctrl"];
        let expected = KeyCombination::canonicalize(parts);
        // Every rotation and the reversal yield the same combination.
        for shift in 0..parts.len() {
            let mut rotated: Vec<&str> = parts.to_vec();
            rotated.rotate_left(shift);
            assert_eq!(KeyCombination::canonicalize(&rotated), expected);
            rotated.reverse();
            assert_eq!(KeyCombination::canonicalize(&rotated), expected);
        }
        assert_eq!(expected.to_string(), "ctrl + meta + shift + arrowup");
    }

    #[test]
    fn canonicalize_is_idempotent() {
        for text in ["Ctrl+A", "alt + shift + F5", "Enter", "ctrl + +", "+", "meta"] {
            let once = render(text);
            assert_eq!(render(&once), once, "re-canonicalizing {text:?}");
        }
    }

    #[test]
    fn duplicates_collapse() {
        assert_eq!(render("ctrl + Ctrl + a + A"), "ctrl + a");
        let combo = KeyCombination::canonicalize(["a", "", "a", "CTRL", "ctrl"]);
        assert_eq!(combo.to_string(), "ctrl + a");
        assert_eq!(combo.key(), Some("a"));
    }

    #[test]
    fn empty_tokens_are_dropped() {
        assert_eq!(render("ctrl++a"), "ctrl + a");
        assert_eq!(render(" + ctrl + a + "), "ctrl + a");
        assert!(KeyCombination::parse("").is_empty());
        assert!(KeyCombination::canonicalize(vec![""; 3]).is_empty());
    }

    #[test]
    fn consecutive_delimiters_name_the_plus_key() {
        let combo = KeyCombination::parse("ctrl + +");
        assert_eq!(combo.modifiers(), Modifiers::CTRL);
        assert_eq!(combo.key(), Some("+"));
        assert_eq!(render("+"), "+");
        let pressed = KeyboardInput::new("+").ctrl();
        assert!(combo.matches(&pressed));
    }

    #[test]
    fn live_input_is_case_insensitive() {
        let combo = KeyCombination::parse("ctrl + a");
        assert!(combo.matches(&KeyboardInput::new("a").ctrl()));
        assert!(combo.matches(&KeyboardInput::new("A").ctrl()));
        assert!(!combo.matches(&KeyboardInput::new("a")));
        assert!(!combo.matches(&KeyboardInput::new("A").ctrl().shift()));
    }

    #[test]
    fn auto_repeat_does_not_change_the_combination() {
        let first = KeyboardInput::new("k").ctrl();
        let held = first.clone().repeated();
        assert!(held.repeat);
        assert_eq!(KeyCombination::from_input(&held), KeyCombination::from_input(&first));
    }

    #[test]
    fn bare_modifier_press_is_the_modifier_alone() {
        let pressed = KeyboardInput::new("Shift").shift();
        let combo = KeyCombination::from_input(&pressed);
        assert_eq!(combo.modifiers(), Modifiers::SHIFT);
        assert!(combo.keys().is_empty());
        assert_eq!(combo, KeyCombination::parse("shift"));
    }

    #[test]
    fn space_bar_has_a_name() {
        let combo = KeyCombination::parse("Ctrl + Space");
        assert!(combo.matches(&KeyboardInput::new(" ").ctrl()));
        assert_eq!(combo.to_string(), "ctrl + space");
    }

    #[test]
    fn from_str_never_fails() {
        let combo: KeyCombination = "Alt + F4".parse().unwrap();
        assert_eq!(combo, KeyCombination::new(Modifiers::ALT, "F4"));
        let nonsense: KeyCombination = "hyper + ctrl + x".parse().unwrap();
        assert_eq!(nonsense.to_string(), "ctrl + hyper + x");
        assert_eq!(nonsense.key(), None);
    }
}
