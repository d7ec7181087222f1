// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Ordered fault-decision policy.

use crate::config::Config;
use crate::rng::FailureRng;
use crate::state::RunState;

/// Why an eligible call was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The eligible-call ceiling (`max_calls`) was exceeded.
    MaxCalls,
    /// The granted-bytes ceiling (`max_memory`) was exceeded.
    MaxMemory,
    /// The random draw fell under `fail_percent`.
    Random,
}

impl DenyReason {
    /// Human-readable reason, as it appears in the status log.
    pub fn as_str(self) -> &'static str {
        match self {
            DenyReason::MaxCalls => "max calls",
            DenyReason::MaxMemory => "max memory",
            DenyReason::Random => "random failure",
        }
    }
}

/// Outcome of the decision engine for one eligible call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Allowed inside the skip window: counted, but neither charged to
    /// `granted_bytes` nor logged.
    Exempt,
    /// Allowed; the request size has been charged to `granted_bytes`.
    Allow,
    /// Denied; the real allocator must not be invoked.
    Deny(DenyReason),
}

/// Applies the ordered policy to one eligible call.
///
/// `call_count` is incremented first, so the skip window and the max-calls
/// ceiling both count only eligible calls. Checks apply in strict order and
/// the first match wins:
///
/// 1. skip window — unconditional [`Decision::Exempt`]
/// 2. max-calls ceiling
/// 3. max-memory ceiling — compares `granted_bytes` as it stood *before*
///    this request, so the request that crosses the ceiling is still allowed
///    and the one after it is the first to be denied
/// 4. random failure — uniform draw in [0, 100) under `fail_percent`
/// 5. otherwise Allow, charging `size` to `granted_bytes`
pub fn decide(
    size: u64,
    state: &mut RunState,
    config: &Config,
    rng: &mut dyn FailureRng,
) -> Decision {
    state.call_count += 1;

    if config.skip_count > 0 && state.call_count <= config.skip_count {
        return Decision::Exempt;
    }

    let effective_count = state.call_count as i64 - config.skip_count as i64;
    if config.max_calls >= 0 && effective_count > config.max_calls {
        return Decision::Deny(DenyReason::MaxCalls);
    }

    if config.max_memory >= 0 && state.granted_bytes > config.max_memory as u64 {
        return Decision::Deny(DenyReason::MaxMemory);
    }

    if config.fail_percent >= 0 && (rng.draw_percent() as i32) < config.fail_percent {
        return Decision::Deny(DenyReason::Random);
    }

    state.granted_bytes += size;
    Decision::Allow
}
