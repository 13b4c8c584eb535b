// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard shortcuts and element hooks over an in-memory document.
//!
//! A toolbar button and an editor pane live under one root. The editor gets a shortcut map
//! through the lifecycle adapter, the button gets hover and press tracking, and the editor's
//! size is observed. Every interaction is simulated, then everything is torn down and the
//! registry is checked to be empty.
//!
//! Run:
//! - `cargo run -p understory_demos --example keyboard_shortcuts`
//! - `RUST_LOG=trace cargo run -p understory_demos --example keyboard_shortcuts` to see
//!   every subscription and removal.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Size;
use tracing_subscriber::EnvFilter;
use understory_element_hooks::{
    ClickOptions, ClickTracker, HoverOptions, HoverPhase, HoverTracker, ResizeObserver,
};
use understory_key_combo::{KeyboardInput, canonicalize};
use understory_listener::{
    Document, ElementFlags, Event, EventKind, ListenerRegistry, PointerInput,
};
use understory_shortcut::{KeyboardShortcutOptions, KeyboardShortcuts, ShortcutMap};

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .init();

    let doc = Document::new();
    let root = doc.insert(None, ElementFlags::empty());
    let button = doc.insert(Some(root), ElementFlags::NATIVELY_FOCUSABLE);
    let editor = doc.insert(Some(root), ElementFlags::empty());
    let registry = ListenerRegistry::new(doc.clone());

    let log = Rc::new(RefCell::new(Vec::<String>::new()));

    // Shortcuts. The two spellings of undo collapse into one entry; the later one wins.
    let record = |text: &'static str| {
        let log = log.clone();
        move || log.borrow_mut().push(text.to_owned())
    };
    let shortcuts = Rc::new(
        ShortcutMap::new()
            .on("Ctrl + S", record("save"))
            .on("z+ctrl", record("undo (first spelling)"))
            .on("ctrl + z", record("undo"))
            .on("ctrl + +", record("zoom in"))
            .on("Escape", record("close")),
    );
    tracing::info!(canonical = %canonicalize(["Z", "Ctrl"]), "undo is bound as");

    let mut keyboard = KeyboardShortcuts::new(
        registry.clone(),
        KeyboardShortcutOptions {
            prevent_browser_shortcuts: true,
        },
    );
    if let Err(err) = keyboard.mount(&[editor], shortcuts.clone()) {
        tracing::error!(%err, "could not bind editor shortcuts");
        return;
    }

    // Hover and press on the toolbar button.
    let hover_log = log.clone();
    let hover = HoverTracker::attach(
        &registry,
        &[button],
        HoverOptions::new().with_on_hover(move |ev| {
            let edge = match ev.phase {
                HoverPhase::Start => "start",
                HoverPhase::End => "end",
            };
            hover_log.borrow_mut().push(format!("hover {edge}"));
        }),
    );
    let click_log = log.clone();
    let press = ClickTracker::attach(
        &registry,
        &[button],
        ClickOptions::new().with_on_click(move |_| click_log.borrow_mut().push("click".into())),
    );
    let (Ok(hover), Ok(press)) = (hover, press) else {
        tracing::error!("could not attach pointer tracking");
        return;
    };

    // Editor size.
    let resize_log = log.clone();
    let mut resize = ResizeObserver::new(registry.clone(), move |entry, prev| {
        resize_log.borrow_mut().push(format!(
            "resized to {}x{} (was {:?})",
            entry.size.width,
            entry.size.height,
            prev.map(|p| (p.size.width, p.size.height)),
        ));
    });
    if let Err(err) = resize.observe(editor) {
        tracing::error!(%err, "could not observe editor");
        return;
    }

    tracing::info!(listeners = registry.len(), "everything attached");

    // Keyboard.
    doc.focus(editor);
    for input in [
        KeyboardInput::new("s").ctrl(),
        KeyboardInput::new("Z").ctrl(),
        KeyboardInput::new("+").ctrl(),
        KeyboardInput::new("q").ctrl(),
        KeyboardInput::new("Escape"),
    ] {
        let outcome = doc.press_key(input.clone());
        tracing::info!(
            key = %input.key,
            default_prevented = outcome.is_some_and(|o| o.default_prevented),
            "key pressed"
        );
    }

    // Pointer.
    for kind in [
        EventKind::PointerEnter,
        EventKind::PointerDown,
        EventKind::PointerUp,
        EventKind::Click,
        EventKind::PointerLeave,
    ] {
        doc.dispatch(Event::pointer(kind, button, PointerInput::default()));
    }
    tracing::info!(
        hovered = hover.is_hovered(),
        active = press.is_active(),
        "pointer left the button"
    );

    // Layout.
    doc.set_size(editor, Size::new(640.0, 480.0));
    doc.set_size(editor, Size::new(800.0, 480.0));

    // Rebinding with the same map is a no-op; a new map identity rebinds.
    match keyboard.update(&[editor], &shortcuts) {
        Ok(rebound) => tracing::info!(rebound, "update with the same map"),
        Err(err) => tracing::error!(%err, "update failed"),
    }

    for line in log.borrow().iter() {
        println!("{line}");
    }

    keyboard.unmount();
    drop((hover, press, resize));
    tracing::info!(listeners = registry.len(), "everything torn down");
    assert!(registry.is_empty(), "every listener is removed on teardown");
}
