// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

mod config;
mod filter;

use std::path::PathBuf;

use crate::caller::CallerInfo;
use crate::rng::FailureRng;

/// Replays a scripted sequence of percent draws, cycling when exhausted.
pub(crate) struct ScriptedRng {
    draws: Vec<u32>,
    next: usize,
}

impl ScriptedRng {
    pub(crate) fn new(draws: Vec<u32>) -> Self {
        Self { draws, next: 0 }
    }

    /// Draws that never fall under any fail_percent below 100.
    pub(crate) fn never_failing() -> Self {
        Self::new(vec![99])
    }
}

impl FailureRng for ScriptedRng {
    fn draw_percent(&mut self) -> u32 {
        let draw = self.draws[self.next % self.draws.len()];
        self.next += 1;
        draw
    }
}

/// Canonical-izable path that is definitely a real, mapped binary.
pub(crate) fn target_path() -> PathBuf {
    std::env::current_exe().expect("Failed to get current exe")
}

/// A caller attributed to the target binary with the given symbol.
pub(crate) fn target_caller(symbol: &str) -> CallerInfo {
    CallerInfo {
        return_address: 0x4210,
        module_path: Some(target_path()),
        symbol: Some(symbol.to_string()),
    }
}

/// A caller attributed to a module other than the target.
pub(crate) fn foreign_caller() -> CallerInfo {
    let path = std::env::temp_dir().join("oomtrap_test_foreign_module.so");
    std::fs::write(&path, b"not really a library").expect("Failed to write temp module");
    CallerInfo {
        return_address: 0x7fff_0000,
        module_path: Some(path),
        symbol: Some("some_library_fn".to_string()),
    }
}
