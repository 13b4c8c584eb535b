// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Binding a shortcut map to one element.

use core::fmt::Debug;

use understory_key_combo::KeyCombination;
use understory_listener::{
    EventHost, EventKind, FocusHost, ListenerController, ListenerError, ListenerOptions,
    ListenerRegistry,
};

use crate::ShortcutMap;

/// Bind `shortcuts` to `target`.
///
/// The target is made focusable first (keyboard events only reach focusable elements),
/// the map is canonicalized into a [`ShortcutTable`](crate::ShortcutTable), and a single
/// capture-phase `keydown` listener is registered. Each key press is canonicalized and
/// looked up; a match runs its handler, anything else is ignored. Handlers are not
/// wrapped: whatever they do propagates to the host's dispatch.
///
/// The table is built once; later changes to `shortcuts` need a new binding.
///
/// ```
/// use std::{cell::Cell, rc::Rc};
/// use understory_key_combo::KeyboardInput;
/// use understory_listener::{Document, ElementFlags, ListenerRegistry};
/// use understory_shortcut::{ShortcutMap, bind_keyboard_shortcut};
///
/// let doc = Document::new();
/// let panel = doc.insert(None, ElementFlags::empty());
/// let registry = ListenerRegistry::new(doc.clone());
///
/// let saved = Rc::new(Cell::new(0));
/// let counter = saved.clone();
/// let shortcuts = ShortcutMap::new().on("Ctrl + S", move || counter.set(counter.get() + 1));
/// let controller = bind_keyboard_shortcut(&registry, panel, &shortcuts).unwrap();
///
/// // The panel was made focusable by binding.
/// assert!(doc.focus(panel));
/// doc.press_key(KeyboardInput::new("s").ctrl());
/// controller.abort();
/// doc.press_key(KeyboardInput::new("s").ctrl());
/// assert_eq!(saved.get(), 1);
/// ```
pub fn bind_keyboard_shortcut<K, H>(
    registry: &ListenerRegistry<K, H>,
    target: K,
    shortcuts: &ShortcutMap,
) -> Result<ListenerController, ListenerError>
where
    K: Copy + Debug + 'static,
    H: EventHost<K> + FocusHost<K> + 'static,
{
    registry.host().make_focusable(target)?;
    let table = shortcuts.to_table();
    let combinations = table.len();
    let controller = registry.register(
        Some(target),
        EventKind::KeyDown,
        ListenerOptions::default().with_capture(true),
        move |event, _| {
            let Some(input) = event.keyboard_input() else {
                return;
            };
            let combo = KeyCombination::from_input(input);
            if let Some(handler) = table.get(&combo) {
                tracing::trace!(%combo, "keyboard shortcut matched");
                handler();
            }
        },
    )?;
    tracing::debug!(
        ?target,
        combinations,
        id = controller.id().get(),
        "bound keyboard shortcuts"
    );
    Ok(controller)
}

/// Stop `keydown` events at `target` from propagating and from running their default
/// action.
///
/// Registers a non-passive capture-phase listener. Listeners on `target` itself still
/// run, so shortcuts bound to the same element keep working. This is best effort: hosts
/// may reserve combinations that no listener can suppress.
pub fn prevent_default_keyboard_shortcuts<K, H>(
    registry: &ListenerRegistry<K, H>,
    target: K,
) -> Result<ListenerController, ListenerError>
where
    K: Copy + 'static,
    H: EventHost<K> + 'static,
{
    registry.register(
        Some(target),
        EventKind::KeyDown,
        ListenerOptions::default()
            .with_capture(true)
            .with_passive(false),
        |event, _| {
            event.stop_propagation();
            event.prevent_default();
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::Cell;

    use understory_key_combo::KeyboardInput;
    use understory_listener::{Document, ElementFlags, ElementId, Event};

    fn setup() -> (Document, ElementId, ListenerRegistry<ElementId, Document>) {
        let doc = Document::new();
        let el = doc.insert(None, ElementFlags::empty());
        (doc.clone(), el, ListenerRegistry::new(doc))
    }

    fn count(map: ShortcutMap, shortcut: &str) -> (ShortcutMap, Rc<Cell<u32>>) {
        let n = Rc::new(Cell::new(0));
        let c = n.clone();
        (map.on(shortcut, move || c.set(c.get() + 1)), n)
    }

    fn keydown(el: ElementId, input: KeyboardInput) -> Event<ElementId> {
        Event::keyboard(EventKind::KeyDown, el, input)
    }

    #[test]
    fn ctrl_a_fires_once_for_either_case() {
        let (doc, el, registry) = setup();
        let (map, h1) = count(ShortcutMap::new(), "ctrl + a");
        bind_keyboard_shortcut(&registry, el, &map).unwrap();

        doc.dispatch(keydown(el, KeyboardInput::new("a").ctrl()));
        assert_eq!(h1.get(), 1);
        doc.dispatch(keydown(el, KeyboardInput::new("A").ctrl()));
        assert_eq!(h1.get(), 2);
    }

    #[test]
    fn auto_repeat_presses_fire_every_time() {
        let (doc, el, registry) = setup();
        let (map, h) = count(ShortcutMap::new(), "ArrowDown");
        bind_keyboard_shortcut(&registry, el, &map).unwrap();

        doc.dispatch(keydown(el, KeyboardInput::new("ArrowDown")));
        doc.dispatch(keydown(el, KeyboardInput::new("ArrowDown").repeated()));
        doc.dispatch(keydown(el, KeyboardInput::new("ArrowDown").repeated()));
        assert_eq!(h.get(), 3);
    }

    #[test]
    fn last_spelling_wins() {
        let (doc, el, registry) = setup();
        let (map, h1) = count(ShortcutMap::new(), "a + ctrl");
        let (map, h2) = count(map, "Ctrl + A");
        bind_keyboard_shortcut(&registry, el, &map).unwrap();

        doc.dispatch(keydown(el, KeyboardInput::new("a").ctrl()));
        assert_eq!((h1.get(), h2.get()), (0, 1));
    }

    #[test]
    fn unmatched_and_non_keyboard_events_are_ignored() {
        let (doc, el, registry) = setup();
        let (map, h) = count(ShortcutMap::new(), "ctrl + a");
        bind_keyboard_shortcut(&registry, el, &map).unwrap();

        doc.dispatch(keydown(el, KeyboardInput::new("b").ctrl()));
        doc.dispatch(keydown(el, KeyboardInput::new("a")));
        doc.dispatch(Event::new(
            EventKind::KeyDown,
            el,
            understory_listener::EventPayload::Empty,
        ));
        assert_eq!(h.get(), 0);
    }

    #[test]
    fn non_focusable_target_becomes_focusable_and_receives_keys() {
        let (doc, el, registry) = setup();
        assert!(!doc.focus(el));
        let (map, h) = count(ShortcutMap::new(), "Enter");
        bind_keyboard_shortcut(&registry, el, &map).unwrap();

        assert_eq!(doc.tab_index(el), Some(0));
        assert!(doc.focus(el));
        doc.press_key(KeyboardInput::new("Enter"));
        assert_eq!(h.get(), 1);
    }

    #[test]
    fn capture_sees_keys_aimed_at_descendants_first() {
        let (doc, panel, registry) = setup();
        let input = doc.insert(Some(panel), ElementFlags::NATIVELY_FOCUSABLE);
        let (map, h) = count(ShortcutMap::new(), "Escape");
        bind_keyboard_shortcut(&registry, panel, &map).unwrap();

        // A descendant handler that swallows the key in its own capture listener still
        // runs after the panel's capture listener.
        registry
            .register(
                Some(input),
                EventKind::KeyDown,
                ListenerOptions::default().with_capture(true),
                |ev, _| ev.stop_propagation(),
            )
            .unwrap();
        doc.focus(input);
        doc.press_key(KeyboardInput::new("Escape"));
        assert_eq!(h.get(), 1);
    }

    #[test]
    fn abort_silences_the_binding() {
        let (doc, el, registry) = setup();
        let (map, h) = count(ShortcutMap::new(), "ctrl + a");
        let controller = bind_keyboard_shortcut(&registry, el, &map).unwrap();
        controller.abort();
        controller.abort();
        doc.dispatch(keydown(el, KeyboardInput::new("a").ctrl()));
        assert_eq!(h.get(), 0);
        assert_eq!(doc.listener_count(el, EventKind::KeyDown), 0);
    }

    #[test]
    fn binding_a_disabled_target_fails() {
        let (doc, el, registry) = setup();
        doc.set_flags(el, ElementFlags::DISABLED);
        let err = bind_keyboard_shortcut(&registry, el, &ShortcutMap::new()).unwrap_err();
        assert_eq!(err, ListenerError::NotFocusable);
        assert!(registry.is_empty());
    }

    #[test]
    fn prevention_blocks_default_and_descendants() {
        let (doc, panel, registry) = setup();
        let child = doc.insert(Some(panel), ElementFlags::NATIVELY_FOCUSABLE);
        let child_hits = Rc::new(Cell::new(0));
        let hits = child_hits.clone();
        registry
            .register(
                Some(child),
                EventKind::KeyDown,
                ListenerOptions::default(),
                move |_, _| hits.set(hits.get() + 1),
            )
            .unwrap();

        prevent_default_keyboard_shortcuts(&registry, panel).unwrap();
        let (map, h) = count(ShortcutMap::new(), "ctrl + t");
        bind_keyboard_shortcut(&registry, panel, &map).unwrap();

        let outcome = doc.dispatch(keydown(child, KeyboardInput::new("t").ctrl()));
        assert!(outcome.default_prevented);
        assert!(outcome.propagation_stopped);
        assert_eq!(h.get(), 1);
        assert_eq!(child_hits.get(), 0);
    }
}
