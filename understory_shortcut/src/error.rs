// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_listener::ListenerError;

/// Binding a shortcut session failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ShortcutError {
    /// The target at `index` could not be bound; no listener from that session stays
    /// subscribed. Earlier targets keep the focusability binding gave them.
    #[error("binding keyboard shortcuts to target #{index} failed")]
    Bind {
        /// Position of the failing target in the target list.
        index: usize,
        /// Why the host refused it.
        source: ListenerError,
    },
}
