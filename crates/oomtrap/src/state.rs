// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Shared run counters.

/// Counters shared across the whole run, mutated only by the decision engine.
///
/// Both fields start at zero and only ever grow. `granted_bytes` counts
/// bytes handed out on Allow; frees are not tracked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunState {
    /// Number of eligible calls seen so far, denied ones included.
    pub call_count: u64,
    /// Cumulative bytes granted outside the skip window.
    pub granted_bytes: u64,
}

impl RunState {
    /// Creates a zeroed run state.
    pub fn new() -> Self {
        Self::default()
    }
}
