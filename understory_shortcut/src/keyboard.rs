// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lifecycle adapter: keep a shortcut map bound to a set of elements across
//! mount, update, and unmount.
//!
//! ## State machine
//!
//! A [`KeyboardShortcuts`] is either [`SessionState::Unbound`] or
//! [`SessionState::Bound`]:
//!
//! - [`mount`](KeyboardShortcuts::mount) binds every target (Unbound → Bound).
//! - [`update`](KeyboardShortcuts::update) rebinds only when the target list or the
//!   identity of the shortcut map changed; the previous session is aborted first.
//! - [`unmount`](KeyboardShortcuts::unmount), [`abort_keyboard`](KeyboardShortcuts::abort_keyboard),
//!   or dropping the adapter aborts the session (Bound → Unbound).
//!
//! Binding is all-or-nothing for listeners: if any target fails, the listeners already
//! created for that session are aborted and the adapter stays unbound. Targets that were
//! made focusable before the failure stay focusable; the host offers no way to undo it.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;
use core::mem;

use smallvec::SmallVec;
use understory_listener::{
    EventHost, FocusHost, ListenerController, ListenerError, ListenerRegistry,
};

use crate::{
    ShortcutError, ShortcutMap, bind_keyboard_shortcut, prevent_default_keyboard_shortcuts,
};

/// Options for [`KeyboardShortcuts`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyboardShortcutOptions {
    /// Also suppress propagation and the default action of every `keydown` reaching a
    /// target. Best effort; see [`prevent_default_keyboard_shortcuts`].
    pub prevent_browser_shortcuts: bool,
}

/// Whether a session is currently bound.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No listeners are subscribed.
    Unbound,
    /// Listeners are subscribed for every target.
    Bound,
}

/// The listeners created by one binding, torn down as a unit.
///
/// Clones share the same session, so a clone can be handed to a shortcut handler that
/// needs to abort the bindings it belongs to.
#[derive(Clone, Default)]
pub struct BindingSession {
    controllers: Rc<RefCell<Vec<ListenerController>>>,
}

impl BindingSession {
    /// Abort every listener in the session. Safe to call any number of times.
    pub fn abort(&self) {
        let controllers = mem::take(&mut *self.controllers.borrow_mut());
        for controller in &controllers {
            controller.abort();
        }
    }

    /// Number of listeners in the session.
    pub fn len(&self) -> usize {
        self.controllers.borrow().len()
    }

    /// True if the session holds no listeners.
    pub fn is_empty(&self) -> bool {
        self.controllers.borrow().is_empty()
    }

    fn replace(&self, controllers: Vec<ListenerController>) {
        let previous = mem::replace(&mut *self.controllers.borrow_mut(), controllers);
        for controller in &previous {
            controller.abort();
        }
    }
}

impl fmt::Debug for BindingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.controllers.borrow().iter()).finish()
    }
}

/// Keeps a [`ShortcutMap`] bound to one or more elements for the lifetime of a component.
///
/// ```
/// use std::{cell::Cell, rc::Rc};
/// use understory_key_combo::KeyboardInput;
/// use understory_listener::{Document, ElementFlags, ListenerRegistry};
/// use understory_shortcut::{KeyboardShortcuts, SessionState, ShortcutMap};
///
/// let doc = Document::new();
/// let editor = doc.insert(None, ElementFlags::empty());
/// let registry = ListenerRegistry::new(doc.clone());
///
/// let undo = Rc::new(Cell::new(0));
/// let counter = undo.clone();
/// let shortcuts = Rc::new(ShortcutMap::new().on("ctrl + z", move || counter.set(counter.get() + 1)));
///
/// let mut keyboard = KeyboardShortcuts::new(registry, Default::default());
/// keyboard.mount(&[editor], shortcuts.clone()).unwrap();
/// assert_eq!(keyboard.state(), SessionState::Bound);
///
/// doc.focus(editor);
/// doc.press_key(KeyboardInput::new("z").ctrl());
///
/// // Same targets, same map: nothing to do.
/// assert!(!keyboard.update(&[editor], &shortcuts).unwrap());
///
/// keyboard.unmount();
/// doc.press_key(KeyboardInput::new("z").ctrl());
/// assert_eq!(undo.get(), 1);
/// ```
pub struct KeyboardShortcuts<K, H> {
    registry: ListenerRegistry<K, H>,
    options: KeyboardShortcutOptions,
    targets: SmallVec<[K; 4]>,
    shortcuts: Option<Rc<ShortcutMap>>,
    session: BindingSession,
}

impl<K: fmt::Debug, H> fmt::Debug for KeyboardShortcuts<K, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyboardShortcuts")
            .field("options", &self.options)
            .field("targets", &self.targets)
            .field("shortcuts", &self.shortcuts)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl<K, H> KeyboardShortcuts<K, H>
where
    K: Copy + Eq + fmt::Debug + 'static,
    H: EventHost<K> + FocusHost<K> + 'static,
{
    /// Create an unbound adapter.
    pub fn new(registry: ListenerRegistry<K, H>, options: KeyboardShortcutOptions) -> Self {
        Self {
            registry,
            options,
            targets: SmallVec::new(),
            shortcuts: None,
            session: BindingSession::default(),
        }
    }

    /// Bind `shortcuts` to every target, replacing any previous session.
    pub fn mount(
        &mut self,
        targets: &[K],
        shortcuts: Rc<ShortcutMap>,
    ) -> Result<(), ShortcutError> {
        self.session.abort();
        self.targets = targets.iter().copied().collect();
        self.shortcuts = Some(shortcuts);
        let result = self.bind();
        if result.is_err() {
            self.targets.clear();
            self.shortcuts = None;
        }
        result
    }

    /// Rebind if `targets` or the identity of `shortcuts` changed since the last bind.
    ///
    /// Returns whether a rebind happened. A map is compared by [`Rc::ptr_eq`], not by
    /// contents: build a new `Rc` to force a rebind.
    pub fn update(
        &mut self,
        targets: &[K],
        shortcuts: &Rc<ShortcutMap>,
    ) -> Result<bool, ShortcutError> {
        let same_targets = self.targets.as_slice() == targets;
        let same_map = self
            .shortcuts
            .as_ref()
            .is_some_and(|current| Rc::ptr_eq(current, shortcuts));
        if same_targets && same_map {
            return Ok(false);
        }
        tracing::debug!(same_targets, same_map, "rebinding keyboard shortcuts");
        self.mount(targets, shortcuts.clone())?;
        Ok(true)
    }

    /// Abort the session and forget the targets and map.
    pub fn unmount(&mut self) {
        tracing::debug!(listeners = self.session.len(), "unmounting keyboard shortcuts");
        self.abort_keyboard();
        self.targets.clear();
        self.shortcuts = None;
    }

    fn bind(&self) -> Result<(), ShortcutError> {
        let Some(shortcuts) = &self.shortcuts else {
            return Ok(());
        };
        let mut controllers = Vec::with_capacity(self.targets.len() * 2);
        for (index, &target) in self.targets.iter().enumerate() {
            if let Err(source) = self.bind_target(target, shortcuts, &mut controllers) {
                for controller in &controllers {
                    controller.abort();
                }
                tracing::debug!(index, ?target, %source, "keyboard shortcut binding rolled back");
                return Err(ShortcutError::Bind { index, source });
            }
        }
        tracing::debug!(
            targets = self.targets.len(),
            listeners = controllers.len(),
            "keyboard shortcuts mounted"
        );
        self.session.replace(controllers);
        Ok(())
    }

    fn bind_target(
        &self,
        target: K,
        shortcuts: &ShortcutMap,
        out: &mut Vec<ListenerController>,
    ) -> Result<(), ListenerError> {
        if self.options.prevent_browser_shortcuts {
            out.push(prevent_default_keyboard_shortcuts(&self.registry, target)?);
        }
        out.push(bind_keyboard_shortcut(&self.registry, target, shortcuts)?);
        Ok(())
    }
}

impl<K, H> KeyboardShortcuts<K, H> {
    /// Abort every listener of the current session. Safe to call any number of times.
    ///
    /// Targets and map are kept, so an [`update`](Self::update) with the same inputs does
    /// not rebind.
    pub fn abort_keyboard(&self) {
        self.session.abort();
    }

    /// A shared handle to the current session, for aborting from elsewhere.
    pub fn session(&self) -> BindingSession {
        self.session.clone()
    }

    /// The current state.
    pub fn state(&self) -> SessionState {
        if self.session.is_empty() {
            SessionState::Unbound
        } else {
            SessionState::Bound
        }
    }

    /// The registry this adapter binds through.
    pub fn registry(&self) -> &ListenerRegistry<K, H> {
        &self.registry
    }
}

impl<K, H> Drop for KeyboardShortcuts<K, H> {
    fn drop(&mut self) {
        self.session.abort();
    }
}
