// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! `dladdr`-backed caller attribution.

use std::ffi::{CStr, OsStr};
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;

use oomtrap::{CallerInfo, CallerResolver};

/// Resolves code addresses through the dynamic loader's `dladdr`.
///
/// Module and symbol resolution degrade independently: stripped binaries
/// yield a module but no symbol, addresses outside any mapped object yield
/// nothing. Failures never error — they produce an unresolved attribution,
/// which the admission filter treats as pass-through.
pub struct DladdrResolver;

impl CallerResolver for DladdrResolver {
    fn resolve(&self, return_address: usize) -> CallerInfo {
        if return_address == 0 {
            return CallerInfo::unresolved(0);
        }

        let mut info: libc::Dl_info = unsafe { core::mem::zeroed() };
        let found =
            unsafe { libc::dladdr(return_address as *const libc::c_void, &mut info) };
        if found == 0 {
            return CallerInfo::unresolved(return_address);
        }

        let module_path = (!info.dli_fname.is_null()).then(|| {
            let name = unsafe { CStr::from_ptr(info.dli_fname) };
            PathBuf::from(OsStr::from_bytes(name.to_bytes()))
        });
        let symbol = (!info.dli_sname.is_null()).then(|| {
            let name = unsafe { CStr::from_ptr(info.dli_sname) };
            name.to_string_lossy().into_owned()
        });

        CallerInfo {
            return_address,
            module_path,
            symbol,
        }
    }
}
