// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_shortcut --heading-base-level=0

//! Understory Shortcut: bind keyboard shortcut maps to UI elements.
//!
//! ## Overview
//!
//! A [`ShortcutMap`] pairs human-written shortcut strings (`"Ctrl + S"`, `"shift+alt+k"`)
//! with handlers. Binding it to an element:
//!
//! 1. makes the element focusable, since only focused elements receive key presses;
//! 2. canonicalizes every shortcut into a [`ShortcutTable`] (later spellings of the same
//!    combination win);
//! 3. subscribes one capture-phase `keydown` listener through a
//!    [`ListenerRegistry`](understory_listener::ListenerRegistry) that looks each press up
//!    in the table.
//!
//! [`bind_keyboard_shortcut`] does this for one element and returns a
//! [`ListenerController`](understory_listener::ListenerController).
//! [`KeyboardShortcuts`] does it for a list of elements and manages the bindings across
//! mount, update, and unmount, rebinding only when the targets or the identity of the map
//! change.
//!
//! ## Example
//!
//! ```
//! use std::{cell::Cell, rc::Rc};
//! use understory_key_combo::KeyboardInput;
//! use understory_listener::{Document, ElementFlags, ListenerRegistry};
//! use understory_shortcut::{KeyboardShortcutOptions, KeyboardShortcuts, ShortcutMap};
//!
//! let doc = Document::new();
//! let list = doc.insert(None, ElementFlags::empty());
//! let registry = ListenerRegistry::new(doc.clone());
//!
//! let moved = Rc::new(Cell::new(0_i32));
//! let (up, down) = (moved.clone(), moved.clone());
//! let shortcuts = Rc::new(
//!     ShortcutMap::new()
//!         .on("ArrowUp", move || up.set(up.get() - 1))
//!         .on("ArrowDown", move || down.set(down.get() + 1)),
//! );
//!
//! let mut keyboard = KeyboardShortcuts::new(registry, KeyboardShortcutOptions::default());
//! keyboard.mount(&[list], shortcuts).unwrap();
//!
//! doc.focus(list);
//! doc.press_key(KeyboardInput::new("ArrowDown"));
//! doc.press_key(KeyboardInput::new("ArrowDown"));
//! doc.press_key(KeyboardInput::new("ArrowUp"));
//! assert_eq!(moved.get(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod binder;
mod error;
mod keyboard;
mod table;

pub use binder::{bind_keyboard_shortcut, prevent_default_keyboard_shortcuts};
pub use error::ShortcutError;
pub use keyboard::{BindingSession, KeyboardShortcutOptions, KeyboardShortcuts, SessionState};
pub use table::{ShortcutHandler, ShortcutMap, ShortcutTable};
