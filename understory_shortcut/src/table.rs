// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-authored shortcut maps and the canonical tables built from them.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use understory_key_combo::{KeyCombination, KeyboardInput};

/// A zero-argument shortcut handler.
pub type ShortcutHandler = Rc<dyn Fn()>;

/// Shortcuts as a caller writes them: shortcut strings paired with handlers.
///
/// Entries keep their authoring order. Strings are not validated; see
/// [`KeyCombination::parse`] for how they are read.
///
/// ```
/// use understory_shortcut::ShortcutMap;
///
/// let shortcuts = ShortcutMap::new()
///     .on("Ctrl + S", || println!("save"))
///     .on("ctrl + shift + s", || println!("save as"));
/// assert_eq!(shortcuts.len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct ShortcutMap {
    entries: Vec<(String, ShortcutHandler)>,
}

impl ShortcutMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shortcut, builder style.
    #[must_use]
    pub fn on(mut self, shortcut: impl Into<String>, handler: impl Fn() + 'static) -> Self {
        self.insert(shortcut, handler);
        self
    }

    /// Add a shortcut.
    pub fn insert(&mut self, shortcut: impl Into<String>, handler: impl Fn() + 'static) {
        self.entries.push((shortcut.into(), Rc::new(handler)));
    }

    /// Shortcut strings and handlers in authoring order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ShortcutHandler)> {
        self.entries.iter().map(|(s, h)| (s.as_str(), h))
    }

    /// Number of authored entries (before canonical duplicates collapse).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonicalize every entry into a [`ShortcutTable`].
    pub fn to_table(&self) -> ShortcutTable {
        let mut table = ShortcutTable::new();
        for (shortcut, handler) in &self.entries {
            table.insert(KeyCombination::parse(shortcut), handler.clone());
        }
        table
    }
}

impl fmt::Debug for ShortcutMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(s, _)| s))
            .finish()
    }
}

impl<S, F> FromIterator<(S, F)> for ShortcutMap
where
    S: Into<String>,
    F: Fn() + 'static,
{
    fn from_iter<I: IntoIterator<Item = (S, F)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (shortcut, handler) in iter {
            map.insert(shortcut, handler);
        }
        map
    }
}

/// Dispatch table from [`KeyCombination`] to handler.
///
/// When two entries canonicalize to the same combination, the one inserted last wins.
#[derive(Clone, Default)]
pub struct ShortcutTable {
    handlers: HashMap<KeyCombination, ShortcutHandler>,
}

impl ShortcutTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `combo` to `handler`, returning the handler it replaced.
    pub fn insert(
        &mut self,
        combo: KeyCombination,
        handler: ShortcutHandler,
    ) -> Option<ShortcutHandler> {
        self.handlers.insert(combo, handler)
    }

    /// The handler for `combo`.
    pub fn get(&self, combo: &KeyCombination) -> Option<&ShortcutHandler> {
        self.handlers.get(combo)
    }

    /// The handler a live key press resolves to.
    pub fn lookup(&self, input: &KeyboardInput) -> Option<&ShortcutHandler> {
        self.get(&KeyCombination::from_input(input))
    }

    /// Run the handler for a live key press. Returns whether one ran.
    pub fn dispatch(&self, input: &KeyboardInput) -> bool {
        match self.lookup(input) {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }

    /// The combinations present in the table, in no particular order.
    pub fn combinations(&self) -> impl Iterator<Item = &KeyCombination> {
        self.handlers.keys()
    }

    /// Number of distinct combinations.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// True if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for ShortcutTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}

impl From<&ShortcutMap> for ShortcutTable {
    fn from(map: &ShortcutMap) -> Self {
        map.to_table()
    }
}
