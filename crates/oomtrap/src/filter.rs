// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Admission filter: decides whether a call may be fault-injected at all.

use std::fs;
use std::path::Path;

use crate::caller::CallerInfo;
use crate::config::Config;

/// Returns whether the attributed call is eligible for policy evaluation.
///
/// `target` must already be canonicalized. All conditions must hold:
///
/// 1. The caller's module path, canonicalized, equals `target`. This keeps
///    injection scoped to the binary under test and excludes the interposer
///    itself, the loader, and every other library in the process.
/// 2. If the frame has no symbol and `ignore_anonymous` is set, the call is
///    ineligible.
/// 3. A present symbol must not contain any entry of `rejected_symbols`
///    (case-sensitive substring, checked in order).
///
/// Ineligible calls bypass the decision engine entirely: not counted, not
/// charged, always passed through to the real allocator.
pub fn is_eligible(caller: &CallerInfo, config: &Config, target: &Path) -> bool {
    let Some(module) = caller.module_path.as_deref() else {
        return false;
    };
    let Ok(module) = fs::canonicalize(module) else {
        return false;
    };
    if module != target {
        return false;
    }

    match caller.symbol.as_deref() {
        None => !config.ignore_anonymous,
        Some(symbol) => !config
            .rejected_symbols
            .iter()
            .any(|rejected| symbol.contains(rejected.as_str())),
    }
}
