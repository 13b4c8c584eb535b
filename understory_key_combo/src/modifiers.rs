// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Modifier key set.

bitflags::bitflags! {
    /// Modifier keys held during a key press.
    ///
    /// Flags are declared in lexicographic order of their names so that iterating the
    /// set yields the canonical rendering order (`alt`, `ctrl`, `meta`, `shift`).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// The Alt (Option) key.
        const ALT   = 0b0000_0001;
        /// The Control key.
        const CTRL  = 0b0000_0010;
        /// The Meta (Command, Windows) key.
        const META  = 0b0000_0100;
        /// The Shift key.
        const SHIFT = 0b0000_1000;
    }
}

impl Modifiers {
    /// Look up a single modifier by its lower-case token (`ctrl`, `shift`, `alt`, `meta`).
    ///
    /// The token must already be lower-cased; anything else is not a modifier.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "alt" => Some(Self::ALT),
            "ctrl" => Some(Self::CTRL),
            "meta" => Some(Self::META),
            "shift" => Some(Self::SHIFT),
            _ => None,
        }
    }

    /// Lower-case tokens for every modifier in the set, in canonical order.
    pub fn tokens(self) -> impl Iterator<Item = &'static str> {
        [
            (Self::ALT, "alt"),
            (Self::CTRL, "ctrl"),
            (Self::META, "meta"),
            (Self::SHIFT, "shift"),
        ]
        .into_iter()
        .filter(move |(flag, _)| self.contains(*flag))
        .map(|(_, token)| token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn tokens_are_lexicographic() {
        let all = Modifiers::all();
        let tokens: Vec<&str> = all.tokens().collect();
        assert_eq!(tokens, ["alt", "ctrl", "meta", "shift"]);
        let mut sorted = tokens.clone();
        sorted.sort_unstable();
        assert_eq!(tokens, sorted);
    }

    #[test]
    fn from_token_is_exact() {
        assert_eq!(Modifiers::from_token("ctrl"), Some(Modifiers::CTRL));
        assert_eq!(Modifiers::from_token("Ctrl"), None);
        assert_eq!(Modifiers::from_token("control"), None);
        assert_eq!(Modifiers::from_token("a"), None);
    }
}
