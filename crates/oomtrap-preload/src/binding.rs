// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! One-shot binding of the real `malloc`.
//!
//! The handle is resolved at most once per process, lazily, through
//! `dlsym(RTLD_NEXT, "malloc")` — a side channel that skips our own exported
//! `malloc`, so resolution never routes back through the interposed entry
//! point. A spin-guarded atomic state machine makes the first use the only
//! synchronization point.

use core::mem;
use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

/// Signature of the underlying allocation primitive.
pub type RealMalloc = unsafe extern "C" fn(libc::size_t) -> *mut libc::c_void;

/// Binding state: not yet attempted
const STATE_UNBOUND: u8 = 0;
/// Binding state: in progress by another caller
const STATE_IN_PROGRESS: u8 = 1;
/// Binding state: handle cached
const STATE_BOUND: u8 = 2;

static BIND_STATE: AtomicU8 = AtomicU8::new(STATE_UNBOUND);
static REAL_MALLOC: AtomicUsize = AtomicUsize::new(0);

/// Returns the cached real-allocator handle, resolving it on first use.
///
/// Unresolvable means the interposer cannot function: rather than silently
/// handing out garbage memory, the process is aborted (via a raw stderr
/// message that performs no allocation).
#[inline]
pub fn real_malloc() -> RealMalloc {
    if BIND_STATE.load(Ordering::Acquire) == STATE_BOUND {
        // Invariant: a BOUND state implies a non-null cached handle.
        return unsafe { mem::transmute::<usize, RealMalloc>(REAL_MALLOC.load(Ordering::Relaxed)) };
    }

    bind_slow();
    real_malloc()
}

/// Returns the handle only if binding has already completed.
///
/// Used on re-entrant paths that must not wait on the binding in progress.
#[inline]
pub fn try_real_malloc() -> Option<RealMalloc> {
    if BIND_STATE.load(Ordering::Acquire) == STATE_BOUND {
        Some(unsafe { mem::transmute::<usize, RealMalloc>(REAL_MALLOC.load(Ordering::Relaxed)) })
    } else {
        None
    }
}

/// Address of the resolved handle, used to seed the failure-draw generator.
///
/// Varies run to run under ASLR, which is all `fail_percent` needs. Zero
/// until binding completes.
#[inline]
pub fn seed() -> u64 {
    REAL_MALLOC.load(Ordering::Acquire) as u64
}

#[cold]
#[inline(never)]
fn bind_slow() {
    match BIND_STATE.compare_exchange(
        STATE_UNBOUND,
        STATE_IN_PROGRESS,
        Ordering::Acquire,
        Ordering::Relaxed,
    ) {
        Ok(_) => {
            let handle = unsafe { libc::dlsym(libc::RTLD_NEXT, c"malloc".as_ptr()) };
            if handle.is_null() {
                fatal(b"[oomtrap] fatal: dlsym(RTLD_NEXT, \"malloc\") failed\n");
            }
            REAL_MALLOC.store(handle as usize, Ordering::Relaxed);
            BIND_STATE.store(STATE_BOUND, Ordering::Release);
        }
        Err(_) => {
            while BIND_STATE.load(Ordering::Acquire) != STATE_BOUND {
                core::hint::spin_loop();
            }
        }
    }
}

fn fatal(message: &[u8]) -> ! {
    unsafe {
        libc::write(libc::STDERR_FILENO, message.as_ptr().cast(), message.len());
        libc::abort();
    }
}
