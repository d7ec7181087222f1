// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use serial_test::serial;

use crate::config::{Config, env};

fn clear_env() {
    for name in [
        env::ENABLE,
        env::TARGET,
        env::SKIP_COUNT,
        env::MAX_CALLS,
        env::MAX_MEMORY,
        env::FAIL_PERCENT,
        env::PRINT,
        env::IGNORE_ANONYMOUS,
        env::REJECTED_SYMBOLS,
    ] {
        unsafe { std::env::remove_var(name) };
    }
}

// =============================================================================
// defaults
// =============================================================================

#[test]
fn test_defaults() {
    let config = Config::default();

    assert_eq!(config.max_calls, -1);
    assert_eq!(config.max_memory, -1);
    assert_eq!(config.fail_percent, 20);
    assert_eq!(config.skip_count, 0);
    assert!(!config.ignore_anonymous);
    assert!(config.print_log);
    assert!(!config.rejected_symbols.is_empty());
}

// =============================================================================
// from_env()
// =============================================================================

#[test]
#[serial(oomtrap_env)]
fn test_from_env_with_clean_environment_matches_defaults() {
    clear_env();
    assert_eq!(Config::from_env(), Config::default());
}

#[test]
#[serial(oomtrap_env)]
fn test_from_env_overlays_values() {
    clear_env();
    unsafe {
        std::env::set_var(env::SKIP_COUNT, "3");
        std::env::set_var(env::MAX_CALLS, "10");
        std::env::set_var(env::MAX_MEMORY, "65536");
        std::env::set_var(env::FAIL_PERCENT, "0");
        std::env::set_var(env::PRINT, "0");
        std::env::set_var(env::IGNORE_ANONYMOUS, "1");
    }

    let config = Config::from_env();
    clear_env();

    assert_eq!(config.skip_count, 3);
    assert_eq!(config.max_calls, 10);
    assert_eq!(config.max_memory, 65536);
    assert_eq!(config.fail_percent, 0);
    assert!(!config.print_log);
    assert!(config.ignore_anonymous);
}

#[test]
#[serial(oomtrap_env)]
fn test_from_env_malformed_value_falls_back_to_default() {
    clear_env();
    unsafe {
        std::env::set_var(env::MAX_CALLS, "lots");
        std::env::set_var(env::FAIL_PERCENT, "");
    }

    let config = Config::from_env();
    clear_env();

    assert_eq!(config.max_calls, -1);
    assert_eq!(config.fail_percent, 20);
}

#[test]
#[serial(oomtrap_env)]
fn test_from_env_rejected_symbols_list() {
    clear_env();
    unsafe { std::env::set_var(env::REJECTED_SYMBOLS, "_dl_:getline:parse_") };

    let config = Config::from_env();
    clear_env();

    assert_eq!(config.rejected_symbols, vec!["_dl_", "getline", "parse_"]);
}

#[test]
#[serial(oomtrap_env)]
fn test_from_env_empty_rejected_symbols_clears_list() {
    clear_env();
    unsafe { std::env::set_var(env::REJECTED_SYMBOLS, "") };

    let config = Config::from_env();
    clear_env();

    assert!(config.rejected_symbols.is_empty());
}

// =============================================================================
// interception_enabled()
// =============================================================================

#[test]
#[serial(oomtrap_env)]
fn test_interception_enabled_checks_presence_not_value() {
    clear_env();
    assert!(!Config::interception_enabled());

    unsafe { std::env::set_var(env::ENABLE, "0") };
    assert!(Config::interception_enabled());

    unsafe { std::env::set_var(env::ENABLE, "1") };
    assert!(Config::interception_enabled());

    clear_env();
}
