// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Call-site attribution types.

use std::path::PathBuf;

/// Attribution of a single allocation call to its originating code location.
///
/// Ephemeral: computed per call and consumed immediately by the admission
/// filter. Module and symbol resolution may fail independently (stripped
/// binaries, addresses outside any mapped module); absence of either field
/// degrades eligibility, never errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerInfo {
    /// Return address of the frame that called the interposed entry point.
    /// Zero means the address could not be captured.
    pub return_address: usize,
    /// Path of the executable or shared library containing the address.
    pub module_path: Option<PathBuf>,
    /// Name of the enclosing function, when symbol information is available.
    pub symbol: Option<String>,
}

impl CallerInfo {
    /// An attribution where nothing could be resolved.
    ///
    /// Such calls are unconditionally ineligible: never denied, never counted.
    pub fn unresolved(return_address: usize) -> Self {
        Self {
            return_address,
            module_path: None,
            symbol: None,
        }
    }
}

/// Capability interface: resolve a code address to (module, symbol).
///
/// The preload layer backs this with the platform's dynamic-loader query;
/// tests substitute mocks to drive the admission filter and decision engine
/// without depending on any real binary's debug information.
pub trait CallerResolver {
    /// Resolves the given return address. Must not fail: unresolvable
    /// addresses yield [`CallerInfo::unresolved`].
    fn resolve(&self, return_address: usize) -> CallerInfo;
}
