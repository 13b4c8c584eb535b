// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by event hosts.

/// A host refused an operation on a listener target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ListenerError {
    /// The target is not (or no longer) part of the host.
    #[error("listener target is not attached to the host")]
    DetachedTarget,
    /// The target cannot be made to receive keyboard focus.
    #[error("listener target cannot receive keyboard focus")]
    NotFocusable,
}
