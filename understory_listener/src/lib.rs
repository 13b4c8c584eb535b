// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_listener --heading-base-level=0

//! Understory Listener: a registry of event listeners over a pluggable event host.
//!
//! ## Overview
//!
//! UI code subscribes to host events (key presses, pointer transitions, resizes) and must
//! reliably unsubscribe when a component goes away. This crate keeps one table of every
//! live subscription so that teardown is exact and idempotent:
//!
//! - [`ListenerRegistry`] allocates a stable [`ListenerId`] per subscription, remembers the
//!   exact `(target, kind, callback, options)` it subscribed, and hands back a
//!   [`ListenerController`] whose [`abort`](ListenerController::abort) can be called any
//!   number of times.
//! - [`EventHost`] is the seam to the thing that actually delivers events (a DOM, a
//!   windowing toolkit, a test harness). Only the registry calls it.
//! - [`FocusHost`] exposes keyboard-focus participation, which keyboard handling needs.
//! - [`Document`] is an in-memory host with DOM dispatch rules for headless use and tests.
//!
//! ## Events
//!
//! [`Event`] carries an [`EventKind`], a typed [`EventPayload`], and propagation state.
//! Listeners may call [`Event::stop_propagation`], [`Event::stop_immediate_propagation`],
//! and [`Event::prevent_default`] (ignored for passive listeners, which is the default).
//! The [`dispatcher`] module builds and walks the capture → target → bubble sequence.
//!
//! ## Example
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//! use understory_key_combo::KeyboardInput;
//! use understory_listener::{
//!     Document, ElementFlags, EventKind, ListenerOptions, ListenerRegistry,
//! };
//!
//! let doc = Document::new();
//! let field = doc.insert(None, ElementFlags::NATIVELY_FOCUSABLE);
//! let registry = ListenerRegistry::new(doc.clone());
//!
//! let keys = Rc::new(RefCell::new(Vec::new()));
//! let sink = keys.clone();
//! let controller = registry
//!     .register(
//!         Some(field),
//!         EventKind::KeyDown,
//!         ListenerOptions::default().with_capture(true),
//!         move |ev, _| {
//!             if let Some(input) = ev.keyboard_input() {
//!                 sink.borrow_mut().push(input.key.clone());
//!             }
//!         },
//!     )
//!     .unwrap();
//!
//! doc.focus(field);
//! doc.press_key(KeyboardInput::new("q"));
//! controller.abort();
//! doc.press_key(KeyboardInput::new("w"));
//! assert_eq!(*keys.borrow(), ["q"]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod dispatcher;

mod document;
mod error;
mod event;
mod host;
mod registry;

pub use document::{DispatchOutcome, Document, ElementFlags, ElementId};
pub use error::ListenerError;
pub use event::{Event, EventKind, EventPayload, Phase, PointerInput, ResizeInput};
pub use host::{Callback, EventHost, FocusHost, ListenerOptions};
pub use registry::{ListenerController, ListenerId, ListenerRegistry};
