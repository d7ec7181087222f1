// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Failure-draw randomness.
//!
//! The decision path runs inside an interposed `malloc`, so it must not
//! allocate or call back into the allocator. A tiny xorshift generator is
//! enough: `fail_percent` only needs to be observably probabilistic across
//! repeated runs, nothing cryptographic.

/// Source of the probabilistic-denial draw.
///
/// Tests substitute a scripted implementation to make random denial
/// deterministic.
pub trait FailureRng {
    /// Returns a uniform-ish integer in `[0, 100)`.
    fn draw_percent(&mut self) -> u32;
}

/// Xorshift64 generator.
///
/// Seeded from the resolved real-allocator handle address by the preload
/// layer, which varies run to run under ASLR.
#[derive(Debug, Clone, Copy)]
pub struct Xorshift64 {
    state: u64,
}

/// Xorshift has an absorbing zero state; substitute a fixed odd constant.
const ZERO_SEED_FALLBACK: u64 = 0x9E37_79B9_7F4A_7C15;

impl Xorshift64 {
    /// Creates a generator from the given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            state: if seed == 0 { ZERO_SEED_FALLBACK } else { seed },
        }
    }

    fn xorshift(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }
}

impl FailureRng for Xorshift64 {
    fn draw_percent(&mut self) -> u32 {
        (self.xorshift() % 100) as u32
    }
}
