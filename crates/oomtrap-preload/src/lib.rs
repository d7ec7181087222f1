// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! # oomtrap-preload
//!
//! `LD_PRELOAD` interposer exporting `malloc`, wired to the `oomtrap`
//! fault-decision engine.
//!
//! ## Usage
//!
//! ```text
//! cargo build --release -p oomtrap-preload
//!
//! MALLOC_TESTER_ENABLE=1 MALLOC_MAX_CALLS=100 \
//!     LD_PRELOAD=target/release/liboomtrap_preload.so ./program_to_test
//! ```
//!
//! Under gdb, leave the enable flag unset at launch and inject
//! `setenv("MALLOC_TESTER_ENABLE", "1", 1)` once the target reaches `main`:
//! the interposer re-checks the flag on every call until it first appears,
//! then reads the rest of the configuration once.
//!
//! ## Interposition safety
//!
//! Everything this library itself allocates (environment reads, path
//! canonicalization, attribution strings) re-enters the exported `malloc`.
//! A thread-local guard routes such re-entrant calls straight to the real
//! allocator, so the engine only ever sees the target's own requests. The
//! eligible path is serialized behind one mutex, which makes counts
//! deterministic even for multithreaded targets.

#![cfg(unix)]
#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

mod binding;
mod resolver;


use std::cell::Cell;
use std::sync::Mutex;

use oomtrap::{CallerResolver, Config, FaultSession, Verdict, Xorshift64};

use crate::resolver::DladdrResolver;

/// Lifecycle of the process-wide session.
enum SessionSlot {
    /// Enable flag not seen yet; re-checked on every call.
    Pending,
    /// Session construction failed; interception is permanently off.
    Broken,
    /// Interception active.
    Active(FaultSession<Xorshift64>),
}

static SESSION: Mutex<SessionSlot> = Mutex::new(SessionSlot::Pending);

thread_local! {
    /// Set while a thread is inside the hook; re-entrant allocations from
    /// our own bookkeeping bypass the engine entirely.
    static IN_HOOK: Cell<bool> = const { Cell::new(false) };
}

/// The interposed entry point for x86_64.
///
/// The shim forwards the caller's return address (top of stack at entry) as
/// a second argument and tail-calls the hook, so the hook returns straight
/// to the original caller.
#[cfg(all(not(test), target_arch = "x86_64"))]
#[unsafe(naked)]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn malloc(_size: libc::size_t) -> *mut libc::c_void {
    core::arch::naked_asm!(
        "mov rsi, [rsp]",
        "jmp {hook}",
        hook = sym malloc_hook,
    )
}

/// The interposed entry point for aarch64 (return address lives in `x30`).
#[cfg(all(not(test), target_arch = "aarch64"))]
#[unsafe(naked)]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn malloc(_size: libc::size_t) -> *mut libc::c_void {
    core::arch::naked_asm!(
        "mov x1, x30",
        "b {hook}",
        hook = sym malloc_hook,
    )
}

/// Fallback entry point for architectures without a return-address shim.
///
/// Attribution sees no return address, so every call passes through: the
/// interposer is inert but harmless.
#[cfg(all(not(test), not(any(target_arch = "x86_64", target_arch = "aarch64"))))]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn malloc(size: libc::size_t) -> *mut libc::c_void {
    malloc_hook(size, 0)
}

extern "C" fn malloc_hook(size: libc::size_t, return_address: usize) -> *mut libc::c_void {
    let re_entered = IN_HOOK.with(|flag| flag.replace(true));
    if re_entered {
        // Allocation from our own machinery. If it raced the initial dlsym
        // binding there is nothing safe to hand out; glibc's dlsym does not
        // allocate, so this branch stays theoretical.
        return match binding::try_real_malloc() {
            Some(real) => unsafe { real(size) },
            None => core::ptr::null_mut(),
        };
    }

    let real = binding::real_malloc();
    let verdict = evaluate(size, return_address);
    IN_HOOK.with(|flag| flag.set(false));

    match verdict {
        Verdict::PassThrough | Verdict::Allow => unsafe { real(size) },
        Verdict::Deny(_) => core::ptr::null_mut(),
    }
}

/// Runs one request through the session, creating it on first enabled call.
fn evaluate(size: libc::size_t, return_address: usize) -> Verdict {
    let mut slot = match SESSION.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    if matches!(*slot, SessionSlot::Pending) {
        if !Config::interception_enabled() {
            return Verdict::PassThrough;
        }
        *slot = match FaultSession::from_env(Xorshift64::seeded(binding::seed())) {
            Ok(session) => SessionSlot::Active(session),
            Err(_) => SessionSlot::Broken,
        };
    }

    match &mut *slot {
        SessionSlot::Active(session) => {
            let caller = DladdrResolver.resolve(return_address);
            session.on_request(size, &caller)
        }
        SessionSlot::Pending | SessionSlot::Broken => Verdict::PassThrough,
    }
}
