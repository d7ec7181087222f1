// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Fault-injection policy configuration.
//!
//! A [`Config`] is built once per process: defaults first, then an overlay
//! from the environment via [`Config::from_env`]. Interactive sessions may
//! mutate it afterwards through `FaultSession::config_mut`.

use std::str::FromStr;

/// Environment variable names understood by [`Config::from_env`].
pub mod env {
    /// Master switch. Interception is disabled while this variable is absent.
    pub const ENABLE: &str = "MALLOC_TESTER_ENABLE";
    /// Path of the binary under test. Defaults to the running executable.
    pub const TARGET: &str = "MALLOC_TESTER_TARGET";
    /// Eligible calls exempt from policy at the start of the run.
    pub const SKIP_COUNT: &str = "MALLOC_SKIP_COUNT";
    /// Ceiling on eligible calls before unconditional denial.
    pub const MAX_CALLS: &str = "MALLOC_MAX_CALLS";
    /// Ceiling on cumulative granted bytes before unconditional denial.
    pub const MAX_MEMORY: &str = "MALLOC_MAX_MEMORY";
    /// Probability (0-100) of random denial.
    pub const FAIL_PERCENT: &str = "MALLOC_FAIL_PERCENT";
    /// Nonzero enables per-call status logging.
    pub const PRINT: &str = "MALLOC_PRINT";
    /// Nonzero treats symbol-less frames as ineligible.
    pub const IGNORE_ANONYMOUS: &str = "MALLOC_IGNORE_ANONYMOUS";
    /// Colon-separated substrings; matching symbol names are ineligible.
    pub const REJECTED_SYMBOLS: &str = "MALLOC_REJECTED_SYMBOLS";
}

const SKIP_COUNT_DEFAULT: u64 = 0;
const MAX_CALLS_DEFAULT: i64 = -1;
const MAX_MEMORY_DEFAULT: i64 = -1;
const FAIL_PERCENT_DEFAULT: i32 = 20;
const IGNORE_ANONYMOUS_DEFAULT: bool = false;
const PRINT_DEFAULT: bool = true;

/// Symbols that must never be fault-injected, regardless of policy.
///
/// Denying an allocation inside the loader or the dl machinery can corrupt
/// the very state the attribution path depends on.
const REJECTED_SYMBOLS_DEFAULT: &[&str] = &["_dl_", "__libc", "dlsym", "dlopen", "dlerror"];

/// Tunable policy parameters and the symbol rejection list.
///
/// Lives for the process lifetime. Read-mostly: the decision path only reads
/// it; mutation happens at startup ([`Config::from_env`]) or through the
/// session's mutable handle in interactive/debugging use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Ceiling on eligible calls, `-1` = unbounded.
    pub max_calls: i64,
    /// Ceiling on cumulative granted bytes, `-1` = unbounded.
    pub max_memory: i64,
    /// Probability (0-100) of synthetic denial; negative disables the draw.
    pub fail_percent: i32,
    /// Eligible calls exempt from policy at the start of the run.
    pub skip_count: u64,
    /// Treat frames with no resolvable symbol as ineligible.
    pub ignore_anonymous: bool,
    /// Emit one status line per eligible decision.
    pub print_log: bool,
    /// Ordered substrings; a symbol containing any entry is ineligible.
    pub rejected_symbols: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_calls: MAX_CALLS_DEFAULT,
            max_memory: MAX_MEMORY_DEFAULT,
            fail_percent: FAIL_PERCENT_DEFAULT,
            skip_count: SKIP_COUNT_DEFAULT,
            ignore_anonymous: IGNORE_ANONYMOUS_DEFAULT,
            print_log: PRINT_DEFAULT,
            rejected_symbols: REJECTED_SYMBOLS_DEFAULT
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

impl Config {
    /// Builds a configuration from defaults overlaid with environment values.
    ///
    /// Malformed values fall back to the built-in default for that field.
    /// Setting [`env::REJECTED_SYMBOLS`] replaces the built-in rejection list
    /// entirely; an empty value clears it.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.skip_count = parse_env(env::SKIP_COUNT, SKIP_COUNT_DEFAULT);
        config.max_calls = parse_env(env::MAX_CALLS, MAX_CALLS_DEFAULT);
        config.max_memory = parse_env(env::MAX_MEMORY, MAX_MEMORY_DEFAULT);
        config.fail_percent = parse_env(env::FAIL_PERCENT, FAIL_PERCENT_DEFAULT);
        config.print_log = parse_env::<i64>(env::PRINT, PRINT_DEFAULT as i64) != 0;
        config.ignore_anonymous =
            parse_env::<i64>(env::IGNORE_ANONYMOUS, IGNORE_ANONYMOUS_DEFAULT as i64) != 0;

        if let Ok(list) = std::env::var(env::REJECTED_SYMBOLS) {
            config.rejected_symbols = list
                .split(':')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }

        config
    }

    /// Returns whether the master switch is set in the environment.
    ///
    /// The value does not matter, only presence: `MALLOC_TESTER_ENABLE=1` in
    /// a wrapper script and `setenv("MALLOC_TESTER_ENABLE", "1", 1)` from a
    /// debugger both work.
    pub fn interception_enabled() -> bool {
        std::env::var_os(env::ENABLE).is_some()
    }
}

fn parse_env<T: FromStr + Copy>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(value) => value.trim().parse().unwrap_or(default),
        Err(_) => default,
    }
}
