// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event model shared by hosts and listeners.
//!
//! An [`Event`] carries its [`EventKind`], the node it was dispatched at, a typed
//! [`EventPayload`], and the propagation state that listeners mutate while it travels
//! through the capture → target → bubble sequence.

use core::fmt;

use kurbo::{Point, Size};
use understory_key_combo::KeyboardInput;

/// The kind of an event, analogous to a DOM event type name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A key was pressed.
    KeyDown,
    /// A key was released.
    KeyUp,
    /// A pointer button was pressed.
    PointerDown,
    /// A pointer button was released.
    PointerUp,
    /// The host canceled an active pointer interaction.
    PointerCancel,
    /// A pointer entered the node. Does not bubble.
    PointerEnter,
    /// A pointer left the node. Does not bubble.
    PointerLeave,
    /// A press and release completed on the node.
    Click,
    /// The node's size changed. Does not bubble.
    Resize,
}

impl EventKind {
    /// Host-facing name of the kind (`"keydown"`, `"pointerenter"`, ...).
    pub const fn name(self) -> &'static str {
        match self {
            Self::KeyDown => "keydown",
            Self::KeyUp => "keyup",
            Self::PointerDown => "pointerdown",
            Self::PointerUp => "pointerup",
            Self::PointerCancel => "pointercancel",
            Self::PointerEnter => "pointerenter",
            Self::PointerLeave => "pointerleave",
            Self::Click => "click",
            Self::Resize => "resize",
        }
    }

    /// Whether events of this kind travel back up through the bubble phase.
    pub const fn bubbles(self) -> bool {
        !matches!(self, Self::PointerEnter | Self::PointerLeave | Self::Resize)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Propagation phase of a dispatch step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Root → parent of target.
    Capture,
    /// The target itself.
    Target,
    /// Parent of target → root.
    Bubble,
}

/// Pointer state attached to pointer events.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerInput {
    /// Identifier of the pointer (mouse, pen, or a touch contact).
    pub pointer_id: u64,
    /// Button that changed state, `0` for the primary button.
    pub button: u8,
    /// Pointer position in host coordinates.
    pub position: Point,
}

impl Default for PointerInput {
    fn default() -> Self {
        Self {
            pointer_id: 1,
            button: 0,
            position: Point::ZERO,
        }
    }
}

/// Size reported with a resize notification.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ResizeInput {
    /// New content size of the node.
    pub size: Size,
}

/// Typed payload of an event.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum EventPayload {
    /// No payload.
    #[default]
    Empty,
    /// Key value and modifier state.
    Keyboard(KeyboardInput),
    /// Pointer identity, button, and position.
    Pointer(PointerInput),
    /// New size of the node.
    Resize(ResizeInput),
}

/// An event travelling through a host.
///
/// Listeners read the payload and may stop propagation or prevent the default action.
/// Hosts call [`Event::enter`] before each dispatch step and
/// [`Event::set_passive_listener`] around each listener invocation.
#[derive(Clone, Debug)]
pub struct Event<K> {
    kind: EventKind,
    target: K,
    current_target: K,
    phase: Phase,
    payload: EventPayload,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
    default_prevented: bool,
    in_passive_listener: bool,
}

impl<K: Copy> Event<K> {
    /// Create an event of `kind` aimed at `target`.
    pub fn new(kind: EventKind, target: K, payload: EventPayload) -> Self {
        Self {
            kind,
            target,
            current_target: target,
            phase: Phase::Target,
            payload,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
            default_prevented: false,
            in_passive_listener: false,
        }
    }

    /// A keyboard event of `kind` (normally [`EventKind::KeyDown`]) aimed at `target`.
    pub fn keyboard(kind: EventKind, target: K, input: KeyboardInput) -> Self {
        Self::new(kind, target, EventPayload::Keyboard(input))
    }

    /// A pointer event of `kind` aimed at `target`.
    pub fn pointer(kind: EventKind, target: K, input: PointerInput) -> Self {
        Self::new(kind, target, EventPayload::Pointer(input))
    }

    /// A resize notification for `target`.
    pub fn resize(target: K, size: Size) -> Self {
        Self::new(EventKind::Resize, target, EventPayload::Resize(ResizeInput { size }))
    }

    /// The event kind.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The node the event was dispatched at.
    pub fn target(&self) -> K {
        self.target
    }

    /// The node whose listeners are currently running.
    pub fn current_target(&self) -> K {
        self.current_target
    }

    /// The current propagation phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The typed payload.
    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }

    /// The key press, for keyboard events.
    pub fn keyboard_input(&self) -> Option<&KeyboardInput> {
        match &self.payload {
            EventPayload::Keyboard(input) => Some(input),
            _ => None,
        }
    }

    /// The pointer state, for pointer events.
    pub fn pointer_input(&self) -> Option<&PointerInput> {
        match &self.payload {
            EventPayload::Pointer(input) => Some(input),
            _ => None,
        }
    }

    /// The new size, for resize notifications.
    pub fn resize_input(&self) -> Option<&ResizeInput> {
        match &self.payload {
            EventPayload::Resize(input) => Some(input),
            _ => None,
        }
    }

    /// Stop propagation once the listeners of the current node have run.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop propagation immediately, skipping the remaining listeners of the current node.
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    /// Ask the host not to run its default action for this event.
    ///
    /// Ignored while a passive listener is running.
    pub fn prevent_default(&mut self) {
        if self.in_passive_listener {
            tracing::trace!(event = self.kind.name(), "prevent_default ignored in passive listener");
            return;
        }
        self.default_prevented = true;
    }

    /// Whether propagation was stopped.
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Whether immediate propagation was stopped.
    pub fn is_immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }

    /// Whether the default action was prevented.
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Move the event to a dispatch step. For hosts.
    pub fn enter(&mut self, current_target: K, phase: Phase) {
        self.current_target = current_target;
        self.phase = phase;
    }

    /// Mark whether the listener about to run is passive. For hosts.
    pub fn set_passive_listener(&mut self, passive: bool) {
        self.in_passive_listener = passive;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passive_listeners_cannot_prevent_default() {
        let mut ev = Event::keyboard(EventKind::KeyDown, 1_u32, KeyboardInput::new("a"));
        ev.set_passive_listener(true);
        ev.prevent_default();
        assert!(!ev.is_default_prevented());
        ev.set_passive_listener(false);
        ev.prevent_default();
        assert!(ev.is_default_prevented());
    }

    #[test]
    fn immediate_stop_implies_stop() {
        let mut ev = Event::new(EventKind::Click, 7_u32, EventPayload::Empty);
        ev.stop_immediate_propagation();
        assert!(ev.is_propagation_stopped());
        assert!(ev.is_immediate_propagation_stopped());
    }

    #[test]
    fn payload_accessors_match_kind() {
        let ev = Event::resize(3_u32, Size::new(10.0, 20.0));
        assert_eq!(ev.kind(), EventKind::Resize);
        assert_eq!(ev.resize_input().map(|r| r.size), Some(Size::new(10.0, 20.0)));
        assert!(ev.keyboard_input().is_none());
        assert!(ev.pointer_input().is_none());
    }

    #[test]
    fn enter_and_leave_do_not_bubble() {
        assert!(EventKind::KeyDown.bubbles());
        assert!(EventKind::Click.bubbles());
        assert!(!EventKind::PointerEnter.bubbles());
        assert!(!EventKind::PointerLeave.bubbles());
        assert!(!EventKind::Resize.bubbles());
    }
}
