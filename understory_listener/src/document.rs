// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory event host.
//!
//! [`Document`] is a small element tree that implements [`EventHost`] and [`FocusHost`]
//! with DOM dispatch rules. It backs headless hosts and tests: insert elements, subscribe
//! through a [`ListenerRegistry`](crate::ListenerRegistry), then dispatch synthetic events.
//!
//! ## Dispatch rules
//!
//! - Capture listeners of the ancestors run root → parent, then the target's capture
//!   listeners, then its bubble listeners, then (for bubbling kinds) the ancestors'
//!   bubble listeners parent → root.
//! - [`Event::stop_propagation`] takes effect after the current element's listeners;
//!   [`Event::stop_immediate_propagation`] takes effect at once.
//! - Listeners are snapshotted per element before they run; a listener removed while the
//!   event is in flight is skipped.
//! - Passive listeners cannot prevent the default action.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use kurbo::Size;
use smallvec::SmallVec;
use understory_key_combo::KeyboardInput;

use crate::dispatcher::{self, Outcome};
use crate::{
    Callback, Event, EventHost, EventKind, FocusHost, ListenerError, ListenerOptions, Phase,
};

/// Identifier for an element in a [`Document`] (generational).
///
/// Ids of removed elements stay stale even when their slot is reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32, u32);

impl ElementId {
    const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Element flags controlling focus participation.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// Element is focusable without a tab index (buttons, inputs, links).
        const NATIVELY_FOCUSABLE = 0b0000_0001;
        /// Element is disabled and can never receive focus.
        const DISABLED           = 0b0000_0010;
    }
}

/// What happened to a dispatched event.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// A non-passive listener prevented the default action.
    pub default_prevented: bool,
    /// A listener stopped propagation.
    pub propagation_stopped: bool,
    /// Number of listeners invoked.
    pub invoked: usize,
}

#[derive(Clone)]
struct ListenerRecord {
    kind: EventKind,
    capture: bool,
    passive: bool,
    callback: Callback<ElementId>,
    live: Rc<Cell<bool>>,
}

impl ListenerRecord {
    fn retire(&self) {
        self.live.set(false);
    }
}

struct Element {
    generation: u32,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    flags: ElementFlags,
    tab_index: Option<i32>,
    size: Size,
    listeners: Vec<ListenerRecord>,
}

impl Element {
    fn new(generation: u32, flags: ElementFlags) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            flags,
            tab_index: None,
            size: Size::ZERO,
            listeners: Vec::new(),
        }
    }

    fn is_focusable(&self) -> bool {
        !self.flags.contains(ElementFlags::DISABLED)
            && (self.flags.contains(ElementFlags::NATIVELY_FOCUSABLE) || self.tab_index.is_some())
    }
}

#[derive(Default)]
struct DocumentInner {
    elements: Vec<Option<Element>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    focused: Option<ElementId>,
}

impl DocumentInner {
    fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements
            .get(id.idx())?
            .as_ref()
            .filter(|el| el.generation == id.1)
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements
            .get_mut(id.idx())?
            .as_mut()
            .filter(|el| el.generation == id.1)
    }

    /// Root→`id` path; caller ensures `id` is live.
    fn path_to(&self, id: ElementId) -> SmallVec<[ElementId; 8]> {
        let mut out = SmallVec::new();
        let mut cur = Some(id);
        while let Some(node) = cur {
            out.push(node);
            cur = self.element(node).and_then(|el| el.parent);
        }
        out.reverse();
        out
    }

    fn remove_subtree(&mut self, id: ElementId) {
        if self.element(id).is_none() {
            return;
        }
        let Some(el) = self.elements[id.idx()].take() else {
            return;
        };
        for record in &el.listeners {
            record.retire();
        }
        if self.focused == Some(id) {
            self.focused = None;
        }
        self.free_list.push(id.idx());
        for child in el.children {
            self.remove_subtree(child);
        }
    }
}

/// Shared handle to an in-memory element tree.
///
/// Clones refer to the same document.
///
/// ```
/// use understory_listener::{Document, ElementFlags};
///
/// let doc = Document::new();
/// let root = doc.insert(None, ElementFlags::empty());
/// let button = doc.insert(Some(root), ElementFlags::NATIVELY_FOCUSABLE);
/// assert_eq!(doc.parent_of(button), Some(root));
/// assert!(doc.focus(button));
/// assert!(!doc.focus(root));
/// assert_eq!(doc.focused(), Some(button));
/// ```
#[derive(Clone, Default)]
pub struct Document {
    inner: Rc<RefCell<DocumentInner>>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Document")
            .field(
                "elements",
                &inner.elements.iter().filter(|e| e.is_some()).count(),
            )
            .field("focused", &inner.focused)
            .finish_non_exhaustive()
    }
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new element as a child of `parent` (or as a root if `None`).
    ///
    /// A stale `parent` makes the new element a root.
    pub fn insert(&self, parent: Option<ElementId>, flags: ElementFlags) -> ElementId {
        let mut inner = self.inner.borrow_mut();
        let (idx, generation) = if let Some(idx) = inner.free_list.pop() {
            let generation = inner.generations[idx].saturating_add(1);
            inner.generations[idx] = generation;
            inner.elements[idx] = Some(Element::new(generation, flags));
            (idx, generation)
        } else {
            let generation = 1_u32;
            inner.elements.push(Some(Element::new(generation, flags)));
            inner.generations.push(generation);
            (inner.elements.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ElementId uses 32-bit indices by design."
        )]
        let id = ElementId(idx as u32, generation);
        if let Some(p) = parent
            && let Some(parent_el) = inner.element_mut(p)
        {
            parent_el.children.push(id);
            if let Some(el) = inner.element_mut(id) {
                el.parent = Some(p);
            }
        }
        id
    }

    /// Remove an element and its subtree.
    ///
    /// Listeners on removed elements never run again, even for an event in flight.
    pub fn remove(&self, id: ElementId) {
        let mut inner = self.inner.borrow_mut();
        let Some(parent) = inner.element(id).map(|el| el.parent) else {
            return;
        };
        if let Some(parent_el) = parent.and_then(|p| inner.element_mut(p)) {
            parent_el.children.retain(|&c| c != id);
        }
        inner.remove_subtree(id);
    }

    /// Whether `id` refers to a live element.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.inner.borrow().element(id).is_some()
    }

    /// Parent of a live element, `None` for roots or stale ids.
    pub fn parent_of(&self, id: ElementId) -> Option<ElementId> {
        self.inner.borrow().element(id).and_then(|el| el.parent)
    }

    /// Children of a live element, empty for stale ids.
    pub fn children_of(&self, id: ElementId) -> Vec<ElementId> {
        self.inner
            .borrow()
            .element(id)
            .map(|el| el.children.clone())
            .unwrap_or_default()
    }

    /// Flags of a live element.
    pub fn flags(&self, id: ElementId) -> Option<ElementFlags> {
        self.inner.borrow().element(id).map(|el| el.flags)
    }

    /// Replace the flags of a live element.
    pub fn set_flags(&self, id: ElementId, flags: ElementFlags) {
        let mut inner = self.inner.borrow_mut();
        if let Some(el) = inner.element_mut(id) {
            el.flags = flags;
        }
        if flags.contains(ElementFlags::DISABLED) && inner.focused == Some(id) {
            inner.focused = None;
        }
    }

    /// Tab index of a live element, if it has one.
    pub fn tab_index(&self, id: ElementId) -> Option<i32> {
        self.inner.borrow().element(id).and_then(|el| el.tab_index)
    }

    /// Set or clear the tab index of a live element.
    pub fn set_tab_index(&self, id: ElementId, tab_index: Option<i32>) {
        if let Some(el) = self.inner.borrow_mut().element_mut(id) {
            el.tab_index = tab_index;
        }
    }

    /// Move keyboard focus to `id`. Returns false (and leaves focus alone) if the
    /// element is stale or not focusable.
    pub fn focus(&self, id: ElementId) -> bool {
        let mut inner = self.inner.borrow_mut();
        if !inner.element(id).is_some_and(Element::is_focusable) {
            return false;
        }
        inner.focused = Some(id);
        true
    }

    /// Clear keyboard focus.
    pub fn blur(&self) {
        self.inner.borrow_mut().focused = None;
    }

    /// The focused element.
    pub fn focused(&self) -> Option<ElementId> {
        self.inner.borrow().focused
    }

    /// Size of a live element.
    pub fn size(&self, id: ElementId) -> Option<Size> {
        self.inner.borrow().element(id).map(|el| el.size)
    }

    /// Resize an element and, if its size changed, deliver a resize notification.
    pub fn set_size(&self, id: ElementId, size: Size) -> Option<DispatchOutcome> {
        {
            let mut inner = self.inner.borrow_mut();
            let el = inner.element_mut(id)?;
            if el.size == size {
                return None;
            }
            el.size = size;
        }
        Some(self.dispatch(Event::resize(id, size)))
    }

    /// Number of listeners of `kind` currently subscribed on `id`.
    pub fn listener_count(&self, id: ElementId, kind: EventKind) -> usize {
        self.inner
            .borrow()
            .element(id)
            .map(|el| el.listeners.iter().filter(|r| r.kind == kind).count())
            .unwrap_or(0)
    }

    /// Dispatch a key press to the focused element as a `keydown` event.
    ///
    /// Returns `None` when nothing has focus; keyboard input only reaches focusable
    /// elements.
    pub fn press_key(&self, input: KeyboardInput) -> Option<DispatchOutcome> {
        let focused = self.focused()?;
        Some(self.dispatch(Event::keyboard(EventKind::KeyDown, focused, input)))
    }

    /// Dispatch `event` at its target.
    ///
    /// Dispatching at a stale element does nothing.
    pub fn dispatch(&self, mut event: Event<ElementId>) -> DispatchOutcome {
        let kind = event.kind();
        let path = {
            let inner = self.inner.borrow();
            if inner.element(event.target()).is_none() {
                return DispatchOutcome::default();
            }
            inner.path_to(event.target())
        };
        let seq = dispatcher::propagation_path(&path, kind.bubbles());

        let mut invoked = 0;
        dispatcher::run(&seq, &mut event, |step, event| {
            event.enter(step.node, step.phase);
            for record in self.snapshot(step.node, kind, step.phase) {
                if !record.live.get() {
                    continue;
                }
                event.set_passive_listener(record.passive);
                (record.callback)(event);
                invoked += 1;
                if event.is_immediate_propagation_stopped() {
                    break;
                }
            }
            event.set_passive_listener(false);
            if event.is_propagation_stopped() {
                Outcome::Stop
            } else {
                Outcome::Continue
            }
        });

        DispatchOutcome {
            default_prevented: event.is_default_prevented(),
            propagation_stopped: event.is_propagation_stopped(),
            invoked,
        }
    }

    /// Listeners of `node` that run in `phase`, in the order they must run.
    fn snapshot(&self, node: ElementId, kind: EventKind, phase: Phase) -> Vec<ListenerRecord> {
        let inner = self.inner.borrow();
        let Some(el) = inner.element(node) else {
            return Vec::new();
        };
        let order: &[bool] = match phase {
            Phase::Capture => &[true],
            Phase::Target => &[true, false],
            Phase::Bubble => &[false],
        };
        let mut out = Vec::new();
        for &capture in order {
            out.extend(
                el.listeners
                    .iter()
                    .filter(|r| r.kind == kind && r.capture == capture)
                    .cloned(),
            );
        }
        out
    }
}

impl EventHost<ElementId> for Document {
    fn add_listener(
        &self,
        target: ElementId,
        kind: EventKind,
        callback: &Callback<ElementId>,
        options: ListenerOptions,
    ) -> Result<(), ListenerError> {
        let mut inner = self.inner.borrow_mut();
        let el = inner
            .element_mut(target)
            .ok_or(ListenerError::DetachedTarget)?;
        let duplicate = el.listeners.iter().any(|r| {
            r.kind == kind && r.capture == options.capture && Rc::ptr_eq(&r.callback, callback)
        });
        if !duplicate {
            el.listeners.push(ListenerRecord {
                kind,
                capture: options.capture,
                passive: options.passive,
                callback: callback.clone(),
                live: Rc::new(Cell::new(true)),
            });
        }
        Ok(())
    }

    fn remove_listener(
        &self,
        target: ElementId,
        kind: EventKind,
        callback: &Callback<ElementId>,
        options: ListenerOptions,
    ) {
        let mut inner = self.inner.borrow_mut();
        let Some(el) = inner.element_mut(target) else {
            return;
        };
        let position = el.listeners.iter().position(|r| {
            r.kind == kind && r.capture == options.capture && Rc::ptr_eq(&r.callback, callback)
        });
        if let Some(i) = position {
            el.listeners.remove(i).retire();
        }
    }
}

impl FocusHost<ElementId> for Document {
    fn is_focusable(&self, target: ElementId) -> bool {
        self.inner
            .borrow()
            .element(target)
            .is_some_and(Element::is_focusable)
    }

    fn make_focusable(&self, target: ElementId) -> Result<(), ListenerError> {
        let mut inner = self.inner.borrow_mut();
        let el = inner
            .element_mut(target)
            .ok_or(ListenerError::DetachedTarget)?;
        if el.flags.contains(ElementFlags::DISABLED) {
            return Err(ListenerError::NotFocusable);
        }
        if !el.is_focusable() {
            el.tab_index = Some(0);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use crate::EventPayload;

    type Log = Rc<RefCell<Vec<(&'static str, ElementId, Phase)>>>;

    fn logging(log: &Log, name: &'static str) -> Callback<ElementId> {
        let log = log.clone();
        Rc::new(move |ev: &mut Event<ElementId>| {
            log.borrow_mut().push((name, ev.current_target(), ev.phase()));
        })
    }

    fn capture() -> ListenerOptions {
        ListenerOptions::default().with_capture(true)
    }

    fn tree() -> (Document, ElementId, ElementId, ElementId) {
        let doc = Document::new();
        let root = doc.insert(None, ElementFlags::empty());
        let mid = doc.insert(Some(root), ElementFlags::empty());
        let leaf = doc.insert(Some(mid), ElementFlags::empty());
        (doc, root, mid, leaf)
    }

    #[test]
    fn capture_target_bubble_order() {
        let (doc, root, mid, leaf) = tree();
        let log: Log = Rc::default();
        let kind = EventKind::Click;
        doc.add_listener(root, kind, &logging(&log, "root-bubble"), ListenerOptions::default())
            .unwrap();
        doc.add_listener(root, kind, &logging(&log, "root-capture"), capture())
            .unwrap();
        doc.add_listener(leaf, kind, &logging(&log, "leaf-bubble"), ListenerOptions::default())
            .unwrap();
        doc.add_listener(leaf, kind, &logging(&log, "leaf-capture"), capture())
            .unwrap();
        doc.add_listener(mid, kind, &logging(&log, "mid-capture"), capture())
            .unwrap();

        let outcome = doc.dispatch(Event::new(kind, leaf, EventPayload::Empty));
        assert_eq!(outcome.invoked, 5);
        assert_eq!(
            *log.borrow(),
            vec![
                ("root-capture", root, Phase::Capture),
                ("mid-capture", mid, Phase::Capture),
                ("leaf-capture", leaf, Phase::Target),
                ("leaf-bubble", leaf, Phase::Target),
                ("root-bubble", root, Phase::Bubble),
            ]
        );
    }

    #[test]
    fn non_bubbling_kinds_skip_ancestor_bubble_listeners() {
        let (doc, root, _mid, leaf) = tree();
        let log: Log = Rc::default();
        let kind = EventKind::PointerEnter;
        doc.add_listener(root, kind, &logging(&log, "root"), ListenerOptions::default())
            .unwrap();
        doc.add_listener(leaf, kind, &logging(&log, "leaf"), ListenerOptions::default())
            .unwrap();
        doc.dispatch(Event::new(kind, leaf, EventPayload::Empty));
        assert_eq!(*log.borrow(), vec![("leaf", leaf, Phase::Target)]);
    }

    #[test]
    fn stop_propagation_finishes_current_element() {
        let (doc, root, mid, leaf) = tree();
        let log: Log = Rc::default();
        let kind = EventKind::KeyDown;
        let stopper: Callback<ElementId> = Rc::new(|ev: &mut Event<ElementId>| ev.stop_propagation());
        doc.add_listener(mid, kind, &stopper, capture()).unwrap();
        doc.add_listener(mid, kind, &logging(&log, "mid-sibling"), capture())
            .unwrap();
        doc.add_listener(leaf, kind, &logging(&log, "leaf"), capture())
            .unwrap();
        doc.add_listener(root, kind, &logging(&log, "root"), ListenerOptions::default())
            .unwrap();

        let outcome = doc.dispatch(Event::keyboard(kind, leaf, KeyboardInput::new("x")));
        assert!(outcome.propagation_stopped);
        assert_eq!(*log.borrow(), vec![("mid-sibling", mid, Phase::Capture)]);
    }

    #[test]
    fn stop_immediate_propagation_skips_siblings() {
        let (doc, _root, _mid, leaf) = tree();
        let log: Log = Rc::default();
        let kind = EventKind::KeyDown;
        let stopper: Callback<ElementId> =
            Rc::new(|ev: &mut Event<ElementId>| ev.stop_immediate_propagation());
        doc.add_listener(leaf, kind, &stopper, capture()).unwrap();
        doc.add_listener(leaf, kind, &logging(&log, "sibling"), capture())
            .unwrap();
        doc.dispatch(Event::keyboard(kind, leaf, KeyboardInput::new("x")));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn passive_listeners_cannot_prevent_default() {
        let (doc, _root, _mid, leaf) = tree();
        let kind = EventKind::KeyDown;
        let preventer: Callback<ElementId> = Rc::new(|ev: &mut Event<ElementId>| ev.prevent_default());
        doc.add_listener(leaf, kind, &preventer, ListenerOptions::default())
            .unwrap();
        let outcome = doc.dispatch(Event::keyboard(kind, leaf, KeyboardInput::new("x")));
        assert!(!outcome.default_prevented);

        doc.remove_listener(leaf, kind, &preventer, ListenerOptions::default());
        let active = ListenerOptions::default().with_passive(false);
        doc.add_listener(leaf, kind, &preventer, active).unwrap();
        let outcome = doc.dispatch(Event::keyboard(kind, leaf, KeyboardInput::new("x")));
        assert!(outcome.default_prevented);
    }

    #[test]
    fn duplicate_subscriptions_are_ignored() {
        let (doc, _root, _mid, leaf) = tree();
        let log: Log = Rc::default();
        let cb = logging(&log, "once");
        doc.add_listener(leaf, EventKind::Click, &cb, ListenerOptions::default())
            .unwrap();
        doc.add_listener(leaf, EventKind::Click, &cb, ListenerOptions::default())
            .unwrap();
        // Same callback in the other phase is a distinct subscription.
        doc.add_listener(leaf, EventKind::Click, &cb, capture()).unwrap();
        assert_eq!(doc.listener_count(leaf, EventKind::Click), 2);
    }

    #[test]
    fn removal_needs_matching_capture_flag() {
        let (doc, _root, _mid, leaf) = tree();
        let log: Log = Rc::default();
        let cb = logging(&log, "l");
        doc.add_listener(leaf, EventKind::KeyDown, &cb, capture()).unwrap();
        doc.remove_listener(leaf, EventKind::KeyDown, &cb, ListenerOptions::default());
        assert_eq!(doc.listener_count(leaf, EventKind::KeyDown), 1);
        doc.remove_listener(leaf, EventKind::KeyDown, &cb, capture());
        assert_eq!(doc.listener_count(leaf, EventKind::KeyDown), 0);
    }

    #[test]
    fn listener_removed_mid_dispatch_does_not_run() {
        let (doc, _root, mid, leaf) = tree();
        let log: Log = Rc::default();
        let victim = logging(&log, "victim");
        doc.add_listener(leaf, EventKind::Click, &victim, ListenerOptions::default())
            .unwrap();
        let remover: Callback<ElementId> = {
            let doc = doc.clone();
            let victim = victim.clone();
            Rc::new(move |_: &mut Event<ElementId>| {
                doc.remove_listener(leaf, EventKind::Click, &victim, ListenerOptions::default());
            })
        };
        doc.add_listener(mid, EventKind::Click, &remover, capture()).unwrap();
        doc.dispatch(Event::new(EventKind::Click, leaf, EventPayload::Empty));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn removed_elements_are_stale_and_silent() {
        let (doc, root, mid, leaf) = tree();
        let log: Log = Rc::default();
        doc.add_listener(leaf, EventKind::Click, &logging(&log, "leaf"), ListenerOptions::default())
            .unwrap();
        doc.remove(mid);
        assert!(!doc.is_alive(mid));
        assert!(!doc.is_alive(leaf));
        assert!(doc.children_of(root).is_empty());
        let outcome = doc.dispatch(Event::new(EventKind::Click, leaf, EventPayload::Empty));
        assert_eq!(outcome, DispatchOutcome::default());
        assert!(log.borrow().is_empty());

        // Slot reuse bumps the generation; the old id stays stale.
        let fresh = doc.insert(Some(root), ElementFlags::empty());
        assert_ne!(fresh, leaf);
        assert_ne!(fresh, mid);
        assert!(!doc.is_alive(leaf));
    }

    #[test]
    fn focus_requires_focusability() {
        let (doc, root, _mid, leaf) = tree();
        assert!(!doc.is_focusable(leaf));
        assert!(!doc.focus(leaf));
        assert_eq!(doc.press_key(KeyboardInput::new("a")), None);

        doc.make_focusable(leaf).unwrap();
        assert_eq!(doc.tab_index(leaf), Some(0));
        assert!(doc.focus(leaf));
        assert_eq!(doc.focused(), Some(leaf));

        doc.set_flags(root, ElementFlags::DISABLED);
        assert_eq!(doc.make_focusable(root), Err(ListenerError::NotFocusable));
        doc.set_flags(leaf, ElementFlags::DISABLED);
        assert_eq!(doc.focused(), None);
    }

    #[test]
    fn make_focusable_keeps_existing_tab_index() {
        let doc = Document::new();
        let el = doc.insert(None, ElementFlags::empty());
        doc.set_tab_index(el, Some(3));
        doc.make_focusable(el).unwrap();
        assert_eq!(doc.tab_index(el), Some(3));

        let button = doc.insert(None, ElementFlags::NATIVELY_FOCUSABLE);
        doc.make_focusable(button).unwrap();
        assert_eq!(doc.tab_index(button), None);
    }

    #[test]
    fn set_size_notifies_only_on_change() {
        let (doc, _root, _mid, leaf) = tree();
        let log: Log = Rc::default();
        doc.add_listener(leaf, EventKind::Resize, &logging(&log, "resize"), ListenerOptions::default())
            .unwrap();
        assert!(doc.set_size(leaf, Size::new(4.0, 2.0)).is_some());
        assert!(doc.set_size(leaf, Size::new(4.0, 2.0)).is_none());
        assert_eq!(doc.size(leaf), Some(Size::new(4.0, 2.0)));
        assert_eq!(log.borrow().len(), 1);
    }
}
