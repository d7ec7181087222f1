// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Process-lifetime fault-injection context.

use std::fs;
use std::path::{Path, PathBuf};

use crate::caller::CallerInfo;
use crate::config::{Config, env};
use crate::engine::{Decision, DenyReason, decide};
use crate::error::SessionError;
use crate::filter::is_eligible;
use crate::logger;
use crate::rng::FailureRng;
use crate::state::RunState;

/// What the interposer must do with one allocation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Ineligible call: forward to the real allocator, untouched and
    /// uncounted.
    PassThrough,
    /// Eligible and allowed: forward to the real allocator and return its
    /// result verbatim.
    Allow,
    /// Eligible and denied: return null without invoking the real allocator.
    Deny(DenyReason),
}

/// The fault-injection context: policy, counters, target reference and the
/// failure-draw generator, constructed once at startup and living for the
/// process lifetime.
///
/// All state mutation happens inside [`FaultSession::on_request`]; callers
/// that need deterministic counts under multithreaded targets must serialize
/// calls to it (the preload layer does so with a single mutex).
#[derive(Debug)]
pub struct FaultSession<R: FailureRng> {
    config: Config,
    state: RunState,
    target: PathBuf,
    rng: R,
}

impl<R: FailureRng> FaultSession<R> {
    /// Creates a session for the given target binary.
    ///
    /// The target path is canonicalized once, here; the admission filter
    /// compares canonicalized caller modules against it on every call.
    pub fn new(config: Config, target: &Path, rng: R) -> Result<Self, SessionError> {
        let target = fs::canonicalize(target).map_err(|_| SessionError::TargetUnresolved)?;
        Ok(Self {
            config,
            state: RunState::new(),
            target,
            rng,
        })
    }

    /// Creates a session configured from the environment.
    ///
    /// The target reference is `MALLOC_TESTER_TARGET` when set, otherwise
    /// the running executable image.
    pub fn from_env(rng: R) -> Result<Self, SessionError> {
        let target = match std::env::var_os(env::TARGET) {
            Some(path) => PathBuf::from(path),
            None => std::env::current_exe().map_err(|_| SessionError::TargetUnresolved)?,
        };
        Self::new(Config::from_env(), &target, rng)
    }

    /// Runs one allocation request through admission and policy.
    ///
    /// Eligible decisions are logged when `print_log` is set, except inside
    /// the skip window (exempt calls are silent, like pass-throughs).
    pub fn on_request(&mut self, size: usize, caller: &CallerInfo) -> Verdict {
        if !is_eligible(caller, &self.config, &self.target) {
            return Verdict::PassThrough;
        }

        let decision = decide(size as u64, &mut self.state, &self.config, &mut self.rng);

        if self.config.print_log && decision != Decision::Exempt {
            logger::emit(
                self.state.call_count,
                size as u64,
                self.state.granted_bytes,
                caller,
                decision,
            );
        }

        match decision {
            Decision::Exempt | Decision::Allow => Verdict::Allow,
            Decision::Deny(reason) => Verdict::Deny(reason),
        }
    }

    /// Read access to the policy configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable handle for live policy changes between calls, e.g. from a
    /// debugger.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Current run counters.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// The canonicalized target reference the admission filter matches on.
    pub fn target(&self) -> &Path {
        &self.target
    }
}
