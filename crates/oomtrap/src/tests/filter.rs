// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::fs;

use crate::caller::CallerInfo;
use crate::filter::is_eligible;
use crate::tests::{foreign_caller, target_caller, target_path};
use crate::Config;

fn canonical_target() -> std::path::PathBuf {
    fs::canonicalize(target_path()).expect("Failed to canonicalize current exe")
}

// =============================================================================
// module matching
// =============================================================================

#[test]
fn test_target_module_is_eligible() {
    let config = Config::default();
    assert!(is_eligible(
        &target_caller("parse_input"),
        &config,
        &canonical_target()
    ));
}

#[test]
fn test_foreign_module_is_ineligible() {
    let config = Config::default();
    assert!(!is_eligible(&foreign_caller(), &config, &canonical_target()));
}

#[test]
fn test_missing_module_is_ineligible() {
    let config = Config::default();
    assert!(!is_eligible(
        &CallerInfo::unresolved(0),
        &config,
        &canonical_target()
    ));
}

#[test]
fn test_nonexistent_module_path_is_ineligible() {
    let config = Config::default();
    let caller = CallerInfo {
        return_address: 0x1234,
        module_path: Some("/nonexistent/oomtrap/module.so".into()),
        symbol: Some("f".to_string()),
    };
    assert!(!is_eligible(&caller, &config, &canonical_target()));
}

#[test]
fn test_module_path_is_compared_canonically() {
    let config = Config::default();
    let target = canonical_target();

    // Reach the exe through a relative `..` hop; canonicalization must fold it.
    let mut indirect = target.clone();
    let file_name = indirect.file_name().expect("exe has a name").to_owned();
    let dir_name = indirect
        .parent()
        .and_then(|p| p.file_name())
        .expect("exe has a parent dir")
        .to_owned();
    indirect.pop();
    indirect.push("..");
    indirect.push(dir_name);
    indirect.push(file_name);

    let caller = CallerInfo {
        return_address: 0x1234,
        module_path: Some(indirect),
        symbol: Some("f".to_string()),
    };
    assert!(is_eligible(&caller, &config, &target));
}

// =============================================================================
// anonymous frames
// =============================================================================

#[test]
fn test_anonymous_frame_eligible_by_default() {
    let config = Config::default();
    let mut caller = target_caller("ignored");
    caller.symbol = None;
    assert!(is_eligible(&caller, &config, &canonical_target()));
}

#[test]
fn test_anonymous_frame_ineligible_when_configured() {
    let mut config = Config::default();
    config.ignore_anonymous = true;

    let mut caller = target_caller("ignored");
    caller.symbol = None;
    assert!(!is_eligible(&caller, &config, &canonical_target()));
}

// =============================================================================
// rejected symbols
// =============================================================================

#[test]
fn test_rejected_substring_is_ineligible() {
    let mut config = Config::default();
    config.rejected_symbols = vec!["internal_".to_string()];

    assert!(!is_eligible(
        &target_caller("my_internal_helper"),
        &config,
        &canonical_target()
    ));
    assert!(is_eligible(
        &target_caller("my_public_helper"),
        &config,
        &canonical_target()
    ));
}

#[test]
fn test_rejected_match_is_case_sensitive() {
    let mut config = Config::default();
    config.rejected_symbols = vec!["Internal".to_string()];

    assert!(is_eligible(
        &target_caller("my_internal_helper"),
        &config,
        &canonical_target()
    ));
}

#[test]
fn test_default_rejection_list_covers_loader_symbols() {
    let config = Config::default();

    assert!(!is_eligible(
        &target_caller("_dl_map_object"),
        &config,
        &canonical_target()
    ));
    assert!(!is_eligible(
        &target_caller("__libc_start_main"),
        &config,
        &canonical_target()
    ));
}

#[test]
fn test_empty_rejection_list_rejects_nothing() {
    let mut config = Config::default();
    config.rejected_symbols.clear();

    assert!(is_eligible(
        &target_caller("_dl_map_object"),
        &config,
        &canonical_target()
    ));
}
