// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! # oomtrap
//!
//! Allocation-fault decision engine for black-box out-of-memory testing.
//!
//! oomtrap sits between a target program and the real allocator and decides,
//! per allocation request, whether to satisfy the request or synthesize an
//! out-of-memory failure. This crate is the policy core; the actual `malloc`
//! interposition lives in `oomtrap-preload`.
//!
//! ## Pipeline
//!
//! 1. **Attribution** — a [`CallerResolver`] maps the caller's return address
//!    to a [`CallerInfo`] (containing module, enclosing symbol).
//! 2. **Admission** — [`is_eligible`] gates fault injection to calls that
//!    originate from the target binary itself, so loader internals, foreign
//!    libraries and the interposer's own allocations are never denied.
//! 3. **Decision** — [`decide`] applies the ordered policy (skip window,
//!    max-calls ceiling, max-memory ceiling, random failure) against the
//!    shared [`RunState`].
//!
//! [`FaultSession`] ties the three stages together behind a single
//! [`FaultSession::on_request`] entry point and owns all shared state.
//!
//! ## Example
//!
//! ```rust
//! use oomtrap::{CallerInfo, Config, FaultSession, Verdict, Xorshift64};
//!
//! let mut config = Config::default();
//! config.max_calls = 1;
//! config.fail_percent = 0;
//! config.print_log = false;
//!
//! let target = std::env::current_exe().unwrap();
//! let mut session = FaultSession::new(config, &target, Xorshift64::seeded(7)).unwrap();
//!
//! let caller = CallerInfo {
//!     return_address: 0x1000,
//!     module_path: Some(target),
//!     symbol: Some("parse_input".into()),
//! };
//!
//! assert_eq!(session.on_request(64, &caller), Verdict::Allow);
//! assert!(matches!(session.on_request(64, &caller), Verdict::Deny(_)));
//! ```

#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
mod tests;

mod caller;
mod config;
mod engine;
mod error;
mod filter;
mod logger;
mod rng;
mod session;
mod state;

pub use caller::{CallerInfo, CallerResolver};
pub use config::{Config, env};
pub use engine::{Decision, DenyReason, decide};
pub use error::SessionError;
pub use filter::is_eligible;
pub use rng::{FailureRng, Xorshift64};
pub use session::{FaultSession, Verdict};
pub use state::RunState;
