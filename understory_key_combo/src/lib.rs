// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_key_combo --heading-base-level=0

//! Understory Key Combo: canonical keyboard shortcut combinations.
//!
//! Shortcuts are authored by humans (`"Ctrl + S"`, `"shift+alt+ArrowUp"`) and reported by
//! hosts as a key value plus modifier flags. This crate maps both onto a single value type,
//! [`KeyCombination`], so that a shortcut table can be keyed by value and a live key press
//! can be looked up directly.
//!
//! ## Canonical form
//!
//! - Tokens are lower-cased; empty tokens are dropped; duplicates collapse.
//! - `ctrl`, `shift`, `alt`, and `meta` are [`Modifiers`]; every other token is a key.
//! - The rendering lists modifiers in lexicographic order and then the sorted keys,
//!   joined with `" + "`.
//!
//! ```
//! use understory_key_combo::{KeyCombination, KeyboardInput, canonicalize};
//!
//! // Order and case do not matter.
//! assert_eq!(canonicalize(["A", "ctrl"]), "ctrl + a");
//!
//! // A live press with Control held and key value "A" matches `ctrl + a`.
//! let shortcut = KeyCombination::parse("Ctrl + A");
//! assert!(shortcut.matches(&KeyboardInput::new("A").ctrl()));
//! ```
//!
//! ## Ambiguities
//!
//! The shortcut grammar uses `+` as its delimiter. Two delimiters in a row name the plus key
//! itself, so `"ctrl + +"` means "Control and the plus key". The space bar, reported by hosts
//! as `" "`, is spelled `space`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod combination;
mod input;
mod modifiers;

use alloc::string::{String, ToString};

pub use combination::KeyCombination;
pub use input::KeyboardInput;
pub use modifiers::Modifiers;

/// Canonicalize a sequence of tokens and render the result.
///
/// Equivalent to `KeyCombination::canonicalize(parts).to_string()`.
///
/// ```
/// use understory_key_combo::canonicalize;
///
/// assert_eq!(canonicalize(["Shift", "ctrl", "k", "shift"]), "ctrl + shift + k");
/// assert_eq!(canonicalize(canonicalize(["k", "ctrl"]).split(" + ")), "ctrl + k");
/// ```
pub fn canonicalize<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    KeyCombination::canonicalize(parts).to_string()
}
