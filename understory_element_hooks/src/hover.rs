// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover state for a set of elements.
//!
//! A [`HoverTracker`] subscribes to `pointerenter`, `pointerleave`, and `pointercancel` on
//! every target. Entering turns the shared hovered flag on; leaving or a canceled pointer
//! turns it off. Each transition runs [`HoverOptions::on_hover`] first and then the
//! phase-specific callback.
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//! use understory_element_hooks::{HoverOptions, HoverPhase, HoverTracker};
//! use understory_listener::{Document, ElementFlags, Event, EventKind, ListenerRegistry, PointerInput};
//!
//! let doc = Document::new();
//! let card = doc.insert(None, ElementFlags::empty());
//! let registry = ListenerRegistry::new(doc.clone());
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let sink = log.clone();
//! let hover = HoverTracker::attach(
//!     &registry,
//!     &[card],
//!     HoverOptions::new().with_on_hover(move |ev| sink.borrow_mut().push(ev.phase)),
//! )
//! .unwrap();
//!
//! doc.dispatch(Event::pointer(EventKind::PointerEnter, card, PointerInput::default()));
//! assert!(hover.is_hovered());
//! doc.dispatch(Event::pointer(EventKind::PointerLeave, card, PointerInput::default()));
//! assert!(!hover.is_hovered());
//! assert_eq!(*log.borrow(), [HoverPhase::Start, HoverPhase::End]);
//! ```

use alloc::rc::Rc;
use core::cell::Cell;
use core::fmt;

use understory_listener::{
    Event, EventHost, EventKind, ListenerError, ListenerRegistry, PointerInput,
};

use crate::subscriptions::Subscriptions;

/// Which edge of a hover a callback is reporting.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HoverPhase {
    /// The pointer entered.
    Start,
    /// The pointer left or was canceled.
    End,
}

/// A hover transition.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HoverEvent<K> {
    /// Element the pointer event was dispatched at.
    pub target: K,
    /// Tracked element whose listener observed it.
    pub current_target: K,
    /// Start or end.
    pub phase: HoverPhase,
    /// Pointer state, if the host attached any.
    pub pointer: Option<PointerInput>,
}

/// Callback invoked on a hover transition.
pub type HoverHandler<K> = Rc<dyn Fn(&HoverEvent<K>)>;

/// Configuration for [`HoverTracker`].
pub struct HoverOptions<K> {
    /// Attach nothing; the tracker stays unhovered.
    pub disabled: bool,
    /// Runs when the pointer enters a target.
    pub on_hover_start: Option<HoverHandler<K>>,
    /// Runs when the pointer leaves a target or is canceled.
    pub on_hover_end: Option<HoverHandler<K>>,
    /// Runs on both transitions, before the phase-specific callback.
    pub on_hover: Option<HoverHandler<K>>,
}

impl<K> HoverOptions<K> {
    /// Enabled, with no callbacks.
    pub fn new() -> Self {
        Self {
            disabled: false,
            on_hover_start: None,
            on_hover_end: None,
            on_hover: None,
        }
    }

    /// Set [`disabled`](Self::disabled).
    #[must_use]
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set [`on_hover_start`](Self::on_hover_start).
    #[must_use]
    pub fn with_on_hover_start(mut self, f: impl Fn(&HoverEvent<K>) + 'static) -> Self {
        self.on_hover_start = Some(Rc::new(f));
        self
    }

    /// Set [`on_hover_end`](Self::on_hover_end).
    #[must_use]
    pub fn with_on_hover_end(mut self, f: impl Fn(&HoverEvent<K>) + 'static) -> Self {
        self.on_hover_end = Some(Rc::new(f));
        self
    }

    /// Set [`on_hover`](Self::on_hover).
    #[must_use]
    pub fn with_on_hover(mut self, f: impl Fn(&HoverEvent<K>) + 'static) -> Self {
        self.on_hover = Some(Rc::new(f));
        self
    }
}

impl<K> Default for HoverOptions<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Clone for HoverOptions<K> {
    fn clone(&self) -> Self {
        Self {
            disabled: self.disabled,
            on_hover_start: self.on_hover_start.clone(),
            on_hover_end: self.on_hover_end.clone(),
            on_hover: self.on_hover.clone(),
        }
    }
}

impl<K> fmt::Debug for HoverOptions<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HoverOptions")
            .field("disabled", &self.disabled)
            .field("on_hover_start", &self.on_hover_start.is_some())
            .field("on_hover_end", &self.on_hover_end.is_some())
            .field("on_hover", &self.on_hover.is_some())
            .finish()
    }
}

/// Tracks whether the pointer is over any of a set of elements.
///
/// The flag is shared by all targets: entering any of them sets it, leaving any of them
/// clears it. Dropping the tracker detaches its listeners.
#[derive(Debug)]
pub struct HoverTracker {
    hovered: Rc<Cell<bool>>,
    subscriptions: Subscriptions,
}

impl HoverTracker {
    /// Subscribe to hover transitions on every target.
    ///
    /// With [`HoverOptions::disabled`] nothing is subscribed. If the host refuses any
    /// subscription, none are kept.
    pub fn attach<K, H>(
        registry: &ListenerRegistry<K, H>,
        targets: &[K],
        options: HoverOptions<K>,
    ) -> Result<Self, ListenerError>
    where
        K: Copy + 'static,
        H: EventHost<K> + 'static,
    {
        let hovered = Rc::new(Cell::new(false));
        if options.disabled {
            return Ok(Self {
                hovered,
                subscriptions: Subscriptions::default(),
            });
        }

        let flag = hovered.clone();
        let subscriptions = Subscriptions::subscribe(
            registry,
            targets,
            &[
                EventKind::PointerEnter,
                EventKind::PointerLeave,
                EventKind::PointerCancel,
            ],
            Rc::new(move |event: &Event<K>| {
                let phase = match event.kind() {
                    EventKind::PointerEnter => HoverPhase::Start,
                    _ => HoverPhase::End,
                };
                flag.set(phase == HoverPhase::Start);
                let hover = HoverEvent {
                    target: event.target(),
                    current_target: event.current_target(),
                    phase,
                    pointer: event.pointer_input().copied(),
                };
                if let Some(on_hover) = &options.on_hover {
                    on_hover(&hover);
                }
                let specific = match phase {
                    HoverPhase::Start => &options.on_hover_start,
                    HoverPhase::End => &options.on_hover_end,
                };
                if let Some(specific) = specific {
                    specific(&hover);
                }
            }),
        )?;
        tracing::trace!(listeners = subscriptions.len(), "hover tracking attached");
        Ok(Self {
            hovered,
            subscriptions,
        })
    }

    /// Whether the pointer is currently over a target.
    pub fn is_hovered(&self) -> bool {
        self.hovered.get()
    }

    /// Whether any listeners are attached.
    pub fn is_attached(&self) -> bool {
        self.subscriptions.len() != 0
    }

    /// Remove every listener and clear the hovered flag. Safe to call repeatedly.
    pub fn detach(&mut self) {
        self.subscriptions.abort_all();
        self.hovered.set(false);
    }
}
