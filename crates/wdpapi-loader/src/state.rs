// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::sync::atomic::{AtomicU8, Ordering};

/// Load state: not yet attempted
const STATE_NOT_ATTEMPTED: u8 = 0;
/// Load state: claimed by a winner, attempt in progress
const STATE_ATTEMPTED: u8 = 1;
/// Load state: the winner's attempt has returned (success or failure)
const STATE_SETTLED: u8 = 2;

/// Process-wide record of whether a load has been attempted.
///
/// Transitions exactly once from "not attempted" to "attempted". The extra
/// settled marker only exists so that waiting followers know when to stop
/// spinning; it carries no outcome.
#[derive(Debug)]
pub struct LoadState {
    state: AtomicU8,
}

impl LoadState {
    /// Creates a state that has not been attempted.
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(STATE_NOT_ATTEMPTED),
        }
    }

    /// Tries to become the single loader.
    ///
    /// Returns `true` for exactly one caller over the lifetime of `self`.
    #[inline]
    pub fn try_claim(&self) -> bool {
        self.state
            .compare_exchange(
                STATE_NOT_ATTEMPTED,
                STATE_ATTEMPTED,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Returns `true` once any caller has claimed the load.
    pub fn is_attempted(&self) -> bool {
        self.state.load(Ordering::Acquire) != STATE_NOT_ATTEMPTED
    }

    /// Returns `true` once the winner's attempt has returned.
    pub fn is_settled(&self) -> bool {
        self.state.load(Ordering::Acquire) == STATE_SETTLED
    }

    /// Marks the winner's attempt as finished. Called by the winner only.
    pub(crate) fn settle(&self) {
        self.state.store(STATE_SETTLED, Ordering::Release);
    }

    /// Spins until the winner has settled.
    pub(crate) fn wait_settled(&self) {
        while !self.is_settled() {
            core::hint::spin_loop();
        }
    }
}

impl Default for LoadState {
    fn default() -> Self {
        Self::new()
    }
}
