// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener registry: stable ids for host subscriptions and idempotent abort.
//!
//! The registry is an owned service object. Construct one per host (usually at
//! application start) and pass clones of the handle to whatever needs to subscribe;
//! clones share the same table. Every [`register`](ListenerRegistry::register) allocates
//! a fresh [`ListenerId`] from a counter that is never rewound, records the exact
//! `(target, kind, callback, options)` it subscribed, and returns a
//! [`ListenerController`]. Aborting removes that exact subscription from the host and
//! deletes the entry; aborting an id that is already gone does nothing.
//!
//! ## Threading
//!
//! The registry is single-threaded (`!Send`): it is meant to be mutated only from the
//! UI thread that also dispatches events.

use alloc::rc::{Rc, Weak};
use core::cell::{Cell, RefCell};
use core::fmt;
use core::num::NonZeroU64;

use hashbrown::HashMap;

use crate::{Callback, Event, EventHost, EventKind, ListenerError, ListenerOptions};

/// Identity of one registered listener.
///
/// Ids are unique for the lifetime of the registry and never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(NonZeroU64);

impl ListenerId {
    /// The raw counter value.
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

struct ListenerEntry<K> {
    target: Option<K>,
    kind: EventKind,
    options: ListenerOptions,
    callback: Callback<K>,
}

struct RegistryInner<K, H> {
    host: H,
    entries: RefCell<HashMap<ListenerId, ListenerEntry<K>>>,
    next_id: Cell<NonZeroU64>,
}

impl<K: Copy, H: EventHost<K>> RegistryInner<K, H> {
    fn allocate_id(&self) -> ListenerId {
        let id = self.next_id.get();
        self.next_id.set(id.saturating_add(1));
        ListenerId(id)
    }
}

/// Type-erased access to a registry, so controllers do not carry its type parameters.
trait AbortListener {
    fn abort(&self, id: ListenerId);
    fn contains(&self, id: ListenerId) -> bool;
}

impl<K: Copy, H: EventHost<K>> AbortListener for RegistryInner<K, H> {
    fn abort(&self, id: ListenerId) {
        let Some(entry) = self.entries.borrow_mut().remove(&id) else {
            return;
        };
        if let Some(target) = entry.target {
            self.host
                .remove_listener(target, entry.kind, &entry.callback, entry.options);
        }
        tracing::trace!(id = id.get(), event = entry.kind.name(), "aborted listener");
    }

    fn contains(&self, id: ListenerId) -> bool {
        self.entries.borrow().contains_key(&id)
    }
}

/// Handle for aborting one registered listener.
///
/// Controllers are cheap to clone and hold only a weak reference to the registry, so
/// aborting after the registry is gone is a no-op.
#[derive(Clone)]
pub struct ListenerController {
    id: ListenerId,
    registry: Weak<dyn AbortListener>,
}

impl ListenerController {
    /// The listener's id.
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Remove the subscription. Safe to call any number of times.
    pub fn abort(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.abort(self.id);
        }
    }

    /// Whether the subscription is still registered.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.contains(self.id))
    }
}

impl fmt::Debug for ListenerController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerController")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Table of every listener subscribed through it, keyed by [`ListenerId`].
///
/// ```
/// use understory_listener::{
///     Document, ElementFlags, Event, EventKind, ListenerOptions, ListenerRegistry,
/// };
/// use std::{cell::Cell, rc::Rc};
///
/// let doc = Document::new();
/// let el = doc.insert(None, ElementFlags::empty());
/// let registry = ListenerRegistry::new(doc.clone());
///
/// let clicks = Rc::new(Cell::new(0));
/// let counter = clicks.clone();
/// let controller = registry
///     .register(Some(el), EventKind::Click, ListenerOptions::default(), move |_, _| {
///         counter.set(counter.get() + 1);
///     })
///     .unwrap();
///
/// doc.dispatch(Event::new(EventKind::Click, el, Default::default()));
/// controller.abort();
/// controller.abort();
/// doc.dispatch(Event::new(EventKind::Click, el, Default::default()));
/// assert_eq!(clicks.get(), 1);
/// ```
pub struct ListenerRegistry<K, H> {
    inner: Rc<RegistryInner<K, H>>,
}

impl<K, H> Clone for ListenerRegistry<K, H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K, H> fmt::Debug for ListenerRegistry<K, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("len", &self.inner.entries.borrow().len())
            .field("next_id", &self.inner.next_id.get())
            .finish_non_exhaustive()
    }
}

impl<K: Copy + 'static, H: EventHost<K> + 'static> ListenerRegistry<K, H> {
    /// Create an empty registry subscribing through `host`.
    pub fn new(host: H) -> Self {
        Self {
            inner: Rc::new(RegistryInner {
                host,
                entries: RefCell::new(HashMap::new()),
                next_id: Cell::new(NonZeroU64::MIN),
            }),
        }
    }

    /// The host this registry subscribes through.
    pub fn host(&self) -> &H {
        &self.inner.host
    }

    /// Subscribe `handler` to `kind` events on `target`.
    ///
    /// The handler receives the event and its own controller, so it can abort itself.
    /// With no target, an id and entry are still allocated but nothing is subscribed.
    /// If the host refuses the subscription nothing is recorded.
    pub fn register<F>(
        &self,
        target: Option<K>,
        kind: EventKind,
        options: ListenerOptions,
        handler: F,
    ) -> Result<ListenerController, ListenerError>
    where
        F: Fn(&mut Event<K>, &ListenerController) + 'static,
    {
        let id = self.inner.allocate_id();
        let registry: Weak<RegistryInner<K, H>> = Rc::downgrade(&self.inner);
        let controller = ListenerController { id, registry };

        let own = controller.clone();
        let callback: Callback<K> = Rc::new(move |event: &mut Event<K>| {
            if options.once {
                own.abort();
            }
            handler(event, &own);
        });

        if let Some(target) = target {
            self.inner
                .host
                .add_listener(target, kind, &callback, options)?;
        }
        self.inner.entries.borrow_mut().insert(
            id,
            ListenerEntry {
                target,
                kind,
                options,
                callback,
            },
        );
        tracing::trace!(
            id = id.get(),
            event = kind.name(),
            capture = options.capture,
            "registered listener"
        );
        Ok(controller)
    }

    /// Abort the listener with `id`. Unknown or already aborted ids are ignored.
    pub fn abort(&self, id: ListenerId) {
        self.inner.abort(id);
    }

    /// Whether `id` is currently registered.
    pub fn contains(&self, id: ListenerId) -> bool {
        self.inner.contains(id)
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
