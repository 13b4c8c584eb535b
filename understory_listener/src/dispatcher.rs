// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher helper: build a capture → target → bubble sequence and walk it.
//!
//! Hosts use [`propagation_path`] to turn a root→target path into dispatch steps and
//! [`run`] to visit those steps, honoring [`Outcome::Stop`].
//!
//! ## Semantics
//!
//! - Capture visits the ancestors root→parent, then the target, then (for bubbling
//!   kinds) the ancestors parent→root.
//! - [`Outcome::Stop`] aborts propagation immediately (no target/bubble if raised in capture).
//! - [`run`] returns the entry where propagation stopped, or `None` if the sequence
//!   completed.
//!
//! ```
//! use understory_listener::dispatcher::{self, Outcome};
//! use understory_listener::Phase;
//!
//! let seq = dispatcher::propagation_path(&[1_u32, 2, 3], true);
//! let mut seen = Vec::new();
//! let stopped = dispatcher::run(&seq, &mut seen, |d, seen| {
//!     seen.push((d.phase, d.node));
//!     Outcome::Continue
//! });
//! assert!(stopped.is_none());
//! assert_eq!(seen, vec![
//!     (Phase::Capture, 1), (Phase::Capture, 2),
//!     (Phase::Target, 3),
//!     (Phase::Bubble, 2), (Phase::Bubble, 1),
//! ]);
//! ```

use alloc::vec::Vec;

use crate::Phase;

/// One step of a dispatch sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dispatch<K> {
    /// Phase of this step.
    pub phase: Phase,
    /// Node whose listeners run in this step.
    pub node: K,
}

impl<K> Dispatch<K> {
    /// A capture step at `node`.
    pub fn capture(node: K) -> Self {
        Self {
            phase: Phase::Capture,
            node,
        }
    }

    /// The target step at `node`.
    pub fn target(node: K) -> Self {
        Self {
            phase: Phase::Target,
            node,
        }
    }

    /// A bubble step at `node`.
    pub fn bubble(node: K) -> Self {
        Self {
            phase: Phase::Bubble,
            node,
        }
    }
}

/// Whether propagation continues after a step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Keep going.
    Continue,
    /// Abort propagation; no later steps run.
    Stop,
}

/// Emit the dispatch sequence for a root→target `path`.
///
/// The last element of `path` is the target. When `bubbles` is false the sequence ends
/// at the target step. An empty path yields an empty sequence.
pub fn propagation_path<K: Copy>(path: &[K], bubbles: bool) -> Vec<Dispatch<K>> {
    let mut out = Vec::new();
    let Some((&target, ancestors)) = path.split_last() else {
        return out;
    };

    for &n in ancestors {
        out.push(Dispatch::capture(n));
    }

    out.push(Dispatch::target(target));

    if bubbles {
        for &n in ancestors.iter().rev() {
            out.push(Dispatch::bubble(n));
        }
    }
    out
}

/// Run a handler over a dispatch sequence and honor stop outcomes.
///
/// - `seq`: a sequence in capture → target → bubble order, as produced by
///   [`propagation_path`].
/// - `event`: a mutable payload carried across handler calls.
/// - `handler`: per-step callback; return [`Outcome::Stop`] to abort propagation.
///
/// Returns `None` if every step was visited, or the step where propagation stopped.
pub fn run<'a, K, E>(
    seq: &'a [Dispatch<K>],
    event: &mut E,
    mut handler: impl FnMut(&Dispatch<K>, &mut E) -> Outcome,
) -> Option<&'a Dispatch<K>> {
    for d in seq {
        match handler(d, event) {
            Outcome::Continue => {}
            Outcome::Stop => return Some(d),
        }
    }
    None
}
