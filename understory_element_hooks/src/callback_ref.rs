// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An observable slot for an element reference.
//!
//! UI code often needs to react when the element behind a reference appears, changes, or
//! goes away. A [`CallbackRef`] holds an optional value and notifies:
//!
//! - `on_attach` with the new value whenever a value is set,
//! - every change callback with `(new, previous)` whenever a value is set,
//! - `on_detach` whenever the slot is cleared.
//!
//! Change callbacks are not run when the slot is cleared.
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//! use understory_element_hooks::CallbackRef;
//!
//! let slot: CallbackRef<u32> = CallbackRef::default();
//! let changes = Rc::new(RefCell::new(Vec::new()));
//! let sink = changes.clone();
//! slot.on_change(move |new, prev| sink.borrow_mut().push((*new, prev.copied())), false);
//!
//! slot.set_value(Some(1));
//! slot.set_value(Some(2));
//! assert_eq!(*changes.borrow(), [(1, None), (2, Some(1))]);
//! assert_eq!(slot.current(), Some(2));
//! ```

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

type ChangeCallback<T> = Rc<dyn Fn(&T, Option<&T>)>;

/// Initial value and callbacks for a [`CallbackRef`].
pub struct CallbackRefOptions<T> {
    /// Value held before the first [`CallbackRef::set_value`].
    pub default_value: Option<T>,
    /// Runs with the new value each time a value is set.
    pub on_attach: Option<Box<dyn Fn(&T)>>,
    /// Runs each time the slot is cleared.
    pub on_detach: Option<Box<dyn Fn()>>,
    /// First change callback; more can be added with [`CallbackRef::on_change`].
    pub on_change: Option<Box<dyn Fn(&T, Option<&T>)>>,
}

impl<T> Default for CallbackRefOptions<T> {
    fn default() -> Self {
        Self {
            default_value: None,
            on_attach: None,
            on_detach: None,
            on_change: None,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for CallbackRefOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRefOptions")
            .field("default_value", &self.default_value)
            .field("on_attach", &self.on_attach.is_some())
            .field("on_detach", &self.on_detach.is_some())
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

struct Inner<T> {
    value: RefCell<Option<T>>,
    on_attach: Option<Box<dyn Fn(&T)>>,
    on_detach: Option<Box<dyn Fn()>>,
    on_change: RefCell<Vec<ChangeCallback<T>>>,
}

/// A shared, observable `Option<T>`.
///
/// Clones share the slot. Callbacks run after the new value is stored and without any
/// internal borrow held, so they may read the slot or register further callbacks.
pub struct CallbackRef<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for CallbackRef<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Default for CallbackRef<T> {
    fn default() -> Self {
        Self::new(CallbackRefOptions::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for CallbackRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRef")
            .field("value", &self.inner.value.borrow())
            .field("on_change", &self.inner.on_change.borrow().len())
            .finish_non_exhaustive()
    }
}

impl<T> CallbackRef<T> {
    /// Create a slot from `options`.
    pub fn new(options: CallbackRefOptions<T>) -> Self {
        let on_change = options
            .on_change
            .map(|f| -> ChangeCallback<T> { Rc::from(f) })
            .into_iter()
            .collect();
        Self {
            inner: Rc::new(Inner {
                value: RefCell::new(options.default_value),
                on_attach: options.on_attach,
                on_detach: options.on_detach,
                on_change: RefCell::new(on_change),
            }),
        }
    }

    /// Whether the slot holds a value.
    pub fn is_set(&self) -> bool {
        self.inner.value.borrow().is_some()
    }

    /// Run `f` against the current value without cloning it.
    pub fn with_current<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        f(self.inner.value.borrow().as_ref())
    }
}

impl<T: Clone> CallbackRef<T> {
    /// A copy of the current value.
    pub fn current(&self) -> Option<T> {
        self.inner.value.borrow().clone()
    }

    /// Store `value` and notify.
    ///
    /// `Some` runs `on_attach` and then every change callback with the previous value.
    /// `None` runs `on_detach`.
    pub fn set_value(&self, value: Option<T>) {
        let prev = self.inner.value.replace(value.clone());
        match value {
            Some(value) => {
                if let Some(on_attach) = &self.inner.on_attach {
                    on_attach(&value);
                }
                let callbacks = self.inner.on_change.borrow().clone();
                for callback in &callbacks {
                    callback(&value, prev.as_ref());
                }
            }
            None => {
                if let Some(on_detach) = &self.inner.on_detach {
                    on_detach();
                }
            }
        }
    }

    /// Add a change callback.
    ///
    /// With `replay_current`, the callback runs once right away with the current value and
    /// no previous value, if the slot is set.
    pub fn on_change(&self, callback: impl Fn(&T, Option<&T>) + 'static, replay_current: bool) {
        let callback: ChangeCallback<T> = Rc::new(callback);
        if replay_current && let Some(current) = self.current() {
            callback(&current, None);
        }
        self.inner.on_change.borrow_mut().push(callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::{String, ToString};
    use core::cell::Cell;

    #[test]
    fn attach_change_detach_order() {
        let log: Rc<RefCell<Vec<String>>> = Rc::default();
        let (a, d, c) = (log.clone(), log.clone(), log.clone());
        let slot = CallbackRef::new(CallbackRefOptions {
            default_value: None,
            on_attach: Some(Box::new(move |v: &i32| a.borrow_mut().push(alloc::format!("attach {v}")))),
            on_detach: Some(Box::new(move || d.borrow_mut().push("detach".to_string()))),
            on_change: Some(Box::new(move |v: &i32, prev: Option<&i32>| {
                c.borrow_mut().push(alloc::format!("change {v} from {prev:?}"));
            })),
        });

        slot.set_value(Some(1));
        slot.set_value(Some(2));
        slot.set_value(None);
        assert_eq!(
            *log.borrow(),
            [
                "attach 1",
                "change 1 from None",
                "attach 2",
                "change 2 from Some(1)",
                "detach",
            ]
        );
        assert!(!slot.is_set());
    }

    #[test]
    fn default_value_is_previous_on_first_set() {
        let seen = Rc::new(Cell::new(None));
        let sink = seen.clone();
        let slot = CallbackRef::new(CallbackRefOptions {
            default_value: Some(5),
            ..CallbackRefOptions::default()
        });
        slot.on_change(move |_, prev| sink.set(prev.copied()), false);
        slot.set_value(Some(6));
        assert_eq!(seen.get(), Some(5));
    }

    #[test]
    fn replay_runs_only_when_set() {
        let runs = Rc::new(Cell::new(0));
        let slot: CallbackRef<u8> = CallbackRef::default();

        let r = runs.clone();
        slot.on_change(move |_, _| r.set(r.get() + 1), true);
        assert_eq!(runs.get(), 0);

        slot.set_value(Some(3));
        assert_eq!(runs.get(), 1);

        let r = runs.clone();
        slot.on_change(
            move |v, prev| {
                assert_eq!((*v, prev), (3, None), "replay has no previous value");
                r.set(r.get() + 10);
            },
            true,
        );
        assert_eq!(runs.get(), 11);
    }

    #[test]
    fn callbacks_may_read_and_extend_the_slot() {
        let slot: CallbackRef<i32> = CallbackRef::default();
        let inner = slot.clone();
        let observed = Rc::new(Cell::new(0));
        let sink = observed.clone();
        slot.on_change(
            move |_, _| {
                sink.set(inner.current().unwrap_or_default());
                inner.on_change(|_, _| {}, false);
            },
            false,
        );
        slot.set_value(Some(9));
        assert_eq!(observed.get(), 9);
        assert_eq!(slot.inner.on_change.borrow().len(), 2);
    }
}
