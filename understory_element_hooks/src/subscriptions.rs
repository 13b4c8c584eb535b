// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use understory_listener::{
    Event, EventHost, EventKind, ListenerController, ListenerError, ListenerOptions,
    ListenerRegistry,
};

/// Shared handler fanned out to every `(target, kind)` subscription.
pub(crate) type SharedHandler<K> = Rc<dyn Fn(&Event<K>)>;

/// A group of listeners that live and die together. Dropping the group aborts them.
#[derive(Default)]
pub(crate) struct Subscriptions {
    controllers: Vec<ListenerController>,
}

impl Subscriptions {
    /// Subscribe `handler` to each kind on each target.
    ///
    /// If the host refuses any subscription, the ones already made are aborted.
    pub(crate) fn subscribe<K, H>(
        registry: &ListenerRegistry<K, H>,
        targets: &[K],
        kinds: &[EventKind],
        handler: SharedHandler<K>,
    ) -> Result<Self, ListenerError>
    where
        K: Copy + 'static,
        H: EventHost<K> + 'static,
    {
        let mut group = Self {
            controllers: Vec::with_capacity(targets.len() * kinds.len()),
        };
        for &target in targets {
            for &kind in kinds {
                let handler = handler.clone();
                let controller = registry.register(
                    Some(target),
                    kind,
                    ListenerOptions::default(),
                    move |event, _| handler(event),
                )?;
                group.controllers.push(controller);
            }
        }
        Ok(group)
    }

    pub(crate) fn len(&self) -> usize {
        self.controllers.len()
    }

    pub(crate) fn abort_all(&mut self) {
        for controller in self.controllers.drain(..) {
            controller.abort();
        }
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        self.abort_all();
    }
}

impl fmt::Debug for Subscriptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.controllers.iter()).finish()
    }
}
