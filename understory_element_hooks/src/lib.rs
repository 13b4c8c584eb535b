// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_element_hooks --heading-base-level=0

//! Understory Element Hooks: interaction state for elements, built on a listener registry.
//!
//! Each helper subscribes through a
//! [`ListenerRegistry`](understory_listener::ListenerRegistry), keeps its own small piece of
//! state, and removes exactly what it subscribed when it is detached or dropped.
//!
//! - [`HoverTracker`]: whether the pointer is over any of a set of elements.
//! - [`ClickTracker`]: whether any of a set of elements is being pressed, plus click reports.
//! - [`ResizeObserver`]: size changes of observed elements, each with the previous size.
//! - [`CallbackRef`]: an observable slot for an element reference.
//!
//! ## Example
//!
//! ```
//! use understory_element_hooks::{ClickOptions, ClickTracker, HoverOptions, HoverTracker};
//! use understory_listener::{Document, ElementFlags, Event, EventKind, ListenerRegistry, PointerInput};
//!
//! let doc = Document::new();
//! let button = doc.insert(None, ElementFlags::empty());
//! let registry = ListenerRegistry::new(doc.clone());
//!
//! let hover = HoverTracker::attach(&registry, &[button], HoverOptions::new()).unwrap();
//! let press = ClickTracker::attach(&registry, &[button], ClickOptions::new()).unwrap();
//!
//! doc.dispatch(Event::pointer(EventKind::PointerEnter, button, PointerInput::default()));
//! doc.dispatch(Event::pointer(EventKind::PointerDown, button, PointerInput::default()));
//! assert!(hover.is_hovered() && press.is_active());
//!
//! drop((hover, press));
//! assert!(registry.is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod callback_ref;
mod click;
mod hover;
mod resize;
mod subscriptions;

pub use callback_ref::{CallbackRef, CallbackRefOptions};
pub use click::{ClickOptions, ClickTracker, PressEvent, PressHandler};
pub use hover::{HoverEvent, HoverHandler, HoverOptions, HoverPhase, HoverTracker};
pub use resize::{ResizeEntry, ResizeObserver};
