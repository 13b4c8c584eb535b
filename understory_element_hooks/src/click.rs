// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Press and click state for a set of elements.
//!
//! A [`ClickTracker`] subscribes to `pointerdown`, `pointerup`, `pointercancel`, and
//! `click` on every target:
//!
//! | Event           | Active flag | Callback                          |
//! |-----------------|-------------|-----------------------------------|
//! | `pointerdown`   | on          | [`ClickOptions::on_active_start`] |
//! | `pointerup`     | off         | [`ClickOptions::on_active_end`]   |
//! | `pointercancel` | off         | [`ClickOptions::on_active_end`]   |
//! | `click`         | unchanged   | [`ClickOptions::on_click`]        |
//!
//! These are bubbling events, so a press on a descendant of a target is reported with the
//! descendant as [`PressEvent::target`] and the tracked element as
//! [`PressEvent::current_target`].

use alloc::rc::Rc;
use core::cell::Cell;
use core::fmt;

use understory_listener::{
    Event, EventHost, EventKind, ListenerError, ListenerRegistry, PointerInput,
};

use crate::subscriptions::Subscriptions;

/// A press transition or a click.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PressEvent<K> {
    /// Kind of the underlying event.
    pub kind: EventKind,
    /// Element the event was dispatched at.
    pub target: K,
    /// Tracked element whose listener observed it.
    pub current_target: K,
    /// Pointer state, if the host attached any.
    pub pointer: Option<PointerInput>,
}

/// Callback invoked with a [`PressEvent`].
pub type PressHandler<K> = Rc<dyn Fn(&PressEvent<K>)>;

/// Configuration for [`ClickTracker`].
pub struct ClickOptions<K> {
    /// Attach nothing; the tracker stays inactive.
    pub disabled: bool,
    /// Runs on `click`.
    pub on_click: Option<PressHandler<K>>,
    /// Runs on `pointerdown`.
    pub on_active_start: Option<PressHandler<K>>,
    /// Runs on `pointerup` and `pointercancel`.
    pub on_active_end: Option<PressHandler<K>>,
}

impl<K> ClickOptions<K> {
    /// Enabled, with no callbacks.
    pub fn new() -> Self {
        Self {
            disabled: false,
            on_click: None,
            on_active_start: None,
            on_active_end: None,
        }
    }

    /// Set [`disabled`](Self::disabled).
    #[must_use]
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set [`on_click`](Self::on_click).
    #[must_use]
    pub fn with_on_click(mut self, f: impl Fn(&PressEvent<K>) + 'static) -> Self {
        self.on_click = Some(Rc::new(f));
        self
    }

    /// Set [`on_active_start`](Self::on_active_start).
    #[must_use]
    pub fn with_on_active_start(mut self, f: impl Fn(&PressEvent<K>) + 'static) -> Self {
        self.on_active_start = Some(Rc::new(f));
        self
    }

    /// Set [`on_active_end`](Self::on_active_end).
    #[must_use]
    pub fn with_on_active_end(mut self, f: impl Fn(&PressEvent<K>) + 'static) -> Self {
        self.on_active_end = Some(Rc::new(f));
        self
    }
}

impl<K> Default for ClickOptions<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Clone for ClickOptions<K> {
    fn clone(&self) -> Self {
        Self {
            disabled: self.disabled,
            on_click: self.on_click.clone(),
            on_active_start: self.on_active_start.clone(),
            on_active_end: self.on_active_end.clone(),
        }
    }
}

impl<K> fmt::Debug for ClickOptions<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClickOptions")
            .field("disabled", &self.disabled)
            .field("on_click", &self.on_click.is_some())
            .field("on_active_start", &self.on_active_start.is_some())
            .field("on_active_end", &self.on_active_end.is_some())
            .finish()
    }
}

/// Tracks whether any of a set of elements is being pressed, and reports clicks.
///
/// Dropping the tracker detaches its listeners.
///
/// ```
/// use std::{cell::Cell, rc::Rc};
/// use understory_element_hooks::{ClickOptions, ClickTracker};
/// use understory_listener::{Document, ElementFlags, Event, EventKind, ListenerRegistry, PointerInput};
///
/// let doc = Document::new();
/// let button = doc.insert(None, ElementFlags::empty());
/// let registry = ListenerRegistry::new(doc.clone());
///
/// let clicks = Rc::new(Cell::new(0));
/// let counter = clicks.clone();
/// let press = ClickTracker::attach(
///     &registry,
///     &[button],
///     ClickOptions::new().with_on_click(move |_| counter.set(counter.get() + 1)),
/// )
/// .unwrap();
///
/// doc.dispatch(Event::pointer(EventKind::PointerDown, button, PointerInput::default()));
/// assert!(press.is_active());
/// doc.dispatch(Event::pointer(EventKind::PointerUp, button, PointerInput::default()));
/// doc.dispatch(Event::pointer(EventKind::Click, button, PointerInput::default()));
/// assert!(!press.is_active());
/// assert_eq!(clicks.get(), 1);
/// ```
#[derive(Debug)]
pub struct ClickTracker {
    active: Rc<Cell<bool>>,
    subscriptions: Subscriptions,
}

impl ClickTracker {
    /// Subscribe to presses and clicks on every target.
    ///
    /// With [`ClickOptions::disabled`] nothing is subscribed. If the host refuses any
    /// subscription, none are kept.
    pub fn attach<K, H>(
        registry: &ListenerRegistry<K, H>,
        targets: &[K],
        options: ClickOptions<K>,
    ) -> Result<Self, ListenerError>
    where
        K: Copy + 'static,
        H: EventHost<K> + 'static,
    {
        let active = Rc::new(Cell::new(false));
        if options.disabled {
            return Ok(Self {
                active,
                subscriptions: Subscriptions::default(),
            });
        }

        let flag = active.clone();
        let subscriptions = Subscriptions::subscribe(
            registry,
            targets,
            &[
                EventKind::PointerDown,
                EventKind::PointerUp,
                EventKind::PointerCancel,
                EventKind::Click,
            ],
            Rc::new(move |event: &Event<K>| {
                let kind = event.kind();
                let callback = match kind {
                    EventKind::PointerDown => {
                        flag.set(true);
                        &options.on_active_start
                    }
                    EventKind::PointerUp | EventKind::PointerCancel => {
                        flag.set(false);
                        &options.on_active_end
                    }
                    _ => &options.on_click,
                };
                if let Some(callback) = callback {
                    callback(&PressEvent {
                        kind,
                        target: event.target(),
                        current_target: event.current_target(),
                        pointer: event.pointer_input().copied(),
                    });
                }
            }),
        )?;
        tracing::trace!(listeners = subscriptions.len(), "press tracking attached");
        Ok(Self {
            active,
            subscriptions,
        })
    }

    /// Whether a press is in progress on a target.
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Whether any listeners are attached.
    pub fn is_attached(&self) -> bool {
        self.subscriptions.len() != 0
    }

    /// Remove every listener and clear the active flag. Safe to call repeatedly.
    pub fn detach(&mut self) {
        self.subscriptions.abort_all();
        self.active.set(false);
    }
}
