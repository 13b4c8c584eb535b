// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The seam between the registry and whatever actually delivers events.

use alloc::rc::Rc;

use crate::{Event, EventKind, ListenerError};

/// A subscribed callback as the host sees it.
///
/// Identity is the allocation: the host matches removals with [`Rc::ptr_eq`].
pub type Callback<K> = Rc<dyn Fn(&mut Event<K>)>;

/// Options for one listener subscription.
///
/// The default is a passive, bubble-phase listener that stays subscribed until aborted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Observe the event in the capture phase instead of the bubble phase.
    pub capture: bool,
    /// The listener promises not to prevent the default action.
    pub passive: bool,
    /// Abort the subscription before the first invocation.
    pub once: bool,
}

impl Default for ListenerOptions {
    fn default() -> Self {
        Self {
            capture: false,
            passive: true,
            once: false,
        }
    }
}

impl ListenerOptions {
    /// Set the capture flag.
    #[must_use]
    pub const fn with_capture(mut self, capture: bool) -> Self {
        self.capture = capture;
        self
    }

    /// Set the passive flag.
    #[must_use]
    pub const fn with_passive(mut self, passive: bool) -> Self {
        self.passive = passive;
        self
    }

    /// Set the once flag.
    #[must_use]
    pub const fn with_once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }
}

/// Native subscribe/unsubscribe primitives of an event host.
///
/// Only [`ListenerRegistry`](crate::ListenerRegistry) should call these; everything
/// else subscribes through the registry so that it stays the single record of what is
/// currently subscribed.
///
/// Methods take `&self`: hosts are shared handles and must tolerate being called
/// from inside a callback they are currently dispatching to.
pub trait EventHost<K> {
    /// Subscribe `callback` to `kind` events on `target`.
    ///
    /// Subscribing the same `(kind, callback, capture)` twice is a no-op.
    fn add_listener(
        &self,
        target: K,
        kind: EventKind,
        callback: &Callback<K>,
        options: ListenerOptions,
    ) -> Result<(), ListenerError>;

    /// Remove the subscription matching `(target, kind, callback, options.capture)`.
    ///
    /// Removing something that is not subscribed is a no-op.
    fn remove_listener(
        &self,
        target: K,
        kind: EventKind,
        callback: &Callback<K>,
        options: ListenerOptions,
    );
}

/// Keyboard focus participation of host nodes.
pub trait FocusHost<K> {
    /// Whether `target` can currently receive keyboard focus.
    fn is_focusable(&self, target: K) -> bool;

    /// Make `target` participate in focus traversal if it does not already.
    ///
    /// This is an observable change to the node (for a DOM host, a `tabindex`).
    fn make_focusable(&self, target: K) -> Result<(), ListenerError>;
}
