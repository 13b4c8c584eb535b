// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Live key press payload.

use alloc::string::String;

use crate::Modifiers;

/// A key press as reported by the host: the key value plus the modifier state.
///
/// `key` follows the host's key value naming (for example `"a"`, `"A"`, `"Enter"`,
/// `"ArrowUp"`, `" "`). No normalization happens here; see
/// [`KeyCombination::from_input`](crate::KeyCombination::from_input).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeyboardInput {
    /// Key value of the pressed key.
    pub key: String,
    /// Modifiers held while the key was pressed.
    pub modifiers: Modifiers,
    /// True when the press is an auto-repeat of a held key.
    ///
    /// Informational only: a repeated press canonicalizes like the first one, so bound
    /// shortcuts fire on every repeat.
    pub repeat: bool,
}

impl KeyboardInput {
    /// A press of `key` with no modifiers held.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::empty(),
            repeat: false,
        }
    }

    /// Replace the modifier state.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Add Control to the modifier state.
    #[must_use]
    pub fn ctrl(self) -> Self {
        self.with_modifier(Modifiers::CTRL)
    }

    /// Add Shift to the modifier state.
    #[must_use]
    pub fn shift(self) -> Self {
        self.with_modifier(Modifiers::SHIFT)
    }

    /// Add Alt to the modifier state.
    #[must_use]
    pub fn alt(self) -> Self {
        self.with_modifier(Modifiers::ALT)
    }

    /// Add Meta to the modifier state.
    #[must_use]
    pub fn meta(self) -> Self {
        self.with_modifier(Modifiers::META)
    }

    /// Mark the press as an auto-repeat.
    #[must_use]
    pub fn repeated(mut self) -> Self {
        self.repeat = true;
        self
    }

    fn with_modifier(mut self, modifier: Modifiers) -> Self {
        self.modifiers |= modifier;
        self
    }
}
