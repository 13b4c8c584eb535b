// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resize observation with the previous size of each target.

use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;
use kurbo::Size;
use understory_listener::{
    EventHost, EventKind, ListenerController, ListenerError, ListenerOptions, ListenerRegistry,
};

/// One size report for one target.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ResizeEntry<K> {
    /// The resized element.
    pub target: K,
    /// Its new size.
    pub size: Size,
}

type ResizeCallback<K> = Rc<dyn Fn(&ResizeEntry<K>, Option<&ResizeEntry<K>>)>;

/// Delivers resize notifications for a set of observed elements.
///
/// The callback receives each new entry together with the previous entry seen for the same
/// target (`None` for the first). History survives [`unobserve`](Self::unobserve) of other
/// targets but is cleared for the target itself and by [`disconnect`](Self::disconnect).
///
/// ```
/// use std::{cell::RefCell, rc::Rc};
/// use kurbo::Size;
/// use understory_element_hooks::ResizeObserver;
/// use understory_listener::{Document, ElementFlags, ListenerRegistry};
///
/// let doc = Document::new();
/// let pane = doc.insert(None, ElementFlags::empty());
/// let registry = ListenerRegistry::new(doc.clone());
///
/// let widths = Rc::new(RefCell::new(Vec::new()));
/// let sink = widths.clone();
/// let mut observer = ResizeObserver::new(registry, move |entry, prev| {
///     sink.borrow_mut().push((entry.size.width, prev.map(|p| p.size.width)));
/// });
/// observer.observe(pane).unwrap();
///
/// doc.set_size(pane, Size::new(100.0, 50.0));
/// doc.set_size(pane, Size::new(120.0, 50.0));
/// assert_eq!(*widths.borrow(), [(100.0, None), (120.0, Some(100.0))]);
/// ```
pub struct ResizeObserver<K, H> {
    registry: ListenerRegistry<K, H>,
    callback: ResizeCallback<K>,
    last: Rc<RefCell<HashMap<K, ResizeEntry<K>>>>,
    observed: HashMap<K, ListenerController>,
}

impl<K: fmt::Debug, H> fmt::Debug for ResizeObserver<K, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResizeObserver")
            .field("observed", &self.observed)
            .field("last", &self.last.borrow())
            .finish_non_exhaustive()
    }
}

impl<K, H> ResizeObserver<K, H>
where
    K: Copy + Eq + Hash + fmt::Debug + 'static,
    H: EventHost<K> + 'static,
{
    /// Create an observer with nothing observed yet.
    pub fn new(
        registry: ListenerRegistry<K, H>,
        callback: impl Fn(&ResizeEntry<K>, Option<&ResizeEntry<K>>) + 'static,
    ) -> Self {
        Self {
            registry,
            callback: Rc::new(callback),
            last: Rc::default(),
            observed: HashMap::new(),
        }
    }

    /// Start delivering resizes of `target`. Observing a target twice is a no-op.
    pub fn observe(&mut self, target: K) -> Result<(), ListenerError> {
        if self.observed.contains_key(&target) {
            return Ok(());
        }
        let callback = self.callback.clone();
        let last = self.last.clone();
        let controller = self.registry.register(
            Some(target),
            EventKind::Resize,
            ListenerOptions::default(),
            move |event, _| {
                let Some(input) = event.resize_input() else {
                    return;
                };
                let entry = ResizeEntry {
                    target: event.current_target(),
                    size: input.size,
                };
                let prev = last.borrow_mut().insert(entry.target, entry);
                callback(&entry, prev.as_ref());
            },
        )?;
        tracing::trace!(?target, "observing resizes");
        self.observed.insert(target, controller);
        Ok(())
    }

    /// Stop delivering resizes of `target` and forget its last entry.
    pub fn unobserve(&mut self, target: K) {
        if let Some(controller) = self.observed.remove(&target) {
            controller.abort();
        }
        self.last.borrow_mut().remove(&target);
    }

    /// Whether `target` is observed.
    pub fn is_observing(&self, target: K) -> bool {
        self.observed.contains_key(&target)
    }

    /// The last entry delivered for `target`.
    pub fn last_entry(&self, target: K) -> Option<ResizeEntry<K>> {
        self.last.borrow().get(&target).copied()
    }
}

impl<K, H> ResizeObserver<K, H> {
    /// Number of observed targets.
    pub fn len(&self) -> usize {
        self.observed.len()
    }

    /// True if nothing is observed.
    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// Stop observing every target and clear the history.
    pub fn disconnect(&mut self) {
        for (_, controller) in self.observed.drain() {
            controller.abort();
        }
        self.last.borrow_mut().clear();
    }
}

impl<K, H> Drop for ResizeObserver<K, H> {
    fn drop(&mut self) {
        for (_, controller) in self.observed.drain() {
            controller.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    use understory_listener::{Document, ElementFlags, ElementId};

    type Log = Rc<RefCell<Vec<(ElementId, Size, Option<Size>)>>>;

    fn observer(doc: &Document) -> (ResizeObserver<ElementId, Document>, Log) {
        let log: Log = Rc::default();
        let sink = log.clone();
        let observer = ResizeObserver::new(ListenerRegistry::new(doc.clone()), move |entry, prev| {
            sink.borrow_mut()
                .push((entry.target, entry.size, prev.map(|p| p.size)));
        });
        (observer, log)
    }

    #[test]
    fn previous_entry_is_per_target() {
        let doc = Document::new();
        let a = doc.insert(None, ElementFlags::empty());
        let b = doc.insert(None, ElementFlags::empty());
        let (mut obs, log) = observer(&doc);
        obs.observe(a).unwrap();
        obs.observe(b).unwrap();

        let small = Size::new(10.0, 10.0);
        let large = Size::new(20.0, 20.0);
        doc.set_size(a, small);
        doc.set_size(b, large);
        doc.set_size(a, large);

        assert_eq!(
            *log.borrow(),
            [(a, small, None), (b, large, None), (a, large, Some(small))]
        );
        assert_eq!(obs.last_entry(a).map(|e| e.size), Some(large));
    }

    #[test]
    fn child_resizes_do_not_reach_observed_parent() {
        let doc = Document::new();
        let parent = doc.insert(None, ElementFlags::empty());
        let child = doc.insert(Some(parent), ElementFlags::empty());
        let (mut obs, log) = observer(&doc);
        obs.observe(parent).unwrap();
        doc.set_size(child, Size::new(5.0, 5.0));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn observe_is_idempotent() {
        let doc = Document::new();
        let a = doc.insert(None, ElementFlags::empty());
        let (mut obs, log) = observer(&doc);
        obs.observe(a).unwrap();
        obs.observe(a).unwrap();
        assert_eq!(obs.len(), 1);
        assert_eq!(doc.listener_count(a, EventKind::Resize), 1);
        doc.set_size(a, Size::new(1.0, 1.0));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn unobserve_and_disconnect_stop_delivery() {
        let doc = Document::new();
        let a = doc.insert(None, ElementFlags::empty());
        let b = doc.insert(None, ElementFlags::empty());
        let (mut obs, log) = observer(&doc);
        obs.observe(a).unwrap();
        obs.observe(b).unwrap();

        obs.unobserve(a);
        assert!(!obs.is_observing(a));
        doc.set_size(a, Size::new(1.0, 1.0));
        assert!(log.borrow().is_empty());

        doc.set_size(b, Size::new(1.0, 1.0));
        obs.disconnect();
        assert!(obs.is_empty());
        assert_eq!(obs.last_entry(b), None);
        doc.set_size(b, Size::new(2.0, 2.0));
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(doc.listener_count(b, EventKind::Resize), 0);
    }

    #[test]
    fn detached_target_is_refused() {
        let doc = Document::new();
        let gone = doc.insert(None, ElementFlags::empty());
        doc.remove(gone);
        let (mut obs, _log) = observer(&doc);
        assert_eq!(obs.observe(gone), Err(ListenerError::DetachedTarget));
        assert!(obs.is_empty());
    }

    #[test]
    fn dropping_the_observer_unsubscribes() {
        let doc = Document::new();
        let a = doc.insert(None, ElementFlags::empty());
        let (mut obs, _log) = observer(&doc);
        obs.observe(a).unwrap();
        drop(obs);
        assert_eq!(doc.listener_count(a, EventKind::Resize), 0);
    }
}
