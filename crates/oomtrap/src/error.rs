// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use thiserror::Error;

/// Session construction error
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// The reference target binary could not be canonicalized.
    ///
    /// Without a canonical target path the admission filter cannot scope
    /// injection to the binary under test, so the session must not be used.
    #[error("reference target binary could not be canonicalized")]
    TargetUnresolved,
}
