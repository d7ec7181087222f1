// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Per-decision status lines.
//!
//! Formatting uses a fixed stack buffer and the line is written straight to
//! the stderr file descriptor: the logging path must never allocate (it runs
//! inside an interposed `malloc`) and must never fail the call — formatting
//! truncates on overflow and write errors are swallowed.

use core::fmt::{self, Write};

use crate::caller::CallerInfo;
use crate::engine::Decision;

const LINE_CAPACITY: usize = 256;

/// `fmt::Write` into a fixed byte buffer, silently truncating on overflow.
struct LineBuf {
    buf: [u8; LINE_CAPACITY],
    len: usize,
}

impl LineBuf {
    fn new() -> Self {
        Self {
            buf: [0u8; LINE_CAPACITY],
            len: 0,
        }
    }

    fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl Write for LineBuf {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let remaining = LINE_CAPACITY - self.len;
        let take = s.len().min(remaining);
        self.buf[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
        Ok(())
    }
}

fn format_line(
    out: &mut LineBuf,
    index: u64,
    size: u64,
    total: u64,
    caller: &CallerInfo,
    decision: Decision,
) {
    let symbol = caller.symbol.as_deref().unwrap_or("unknown");
    let _ = write!(
        out,
        "[oomtrap] call #{index} | size: {size} | total: {total} | caller {:#x} {symbol} | ",
        caller.return_address,
    );
    let _ = match decision {
        Decision::Allow | Decision::Exempt => out.write_str("ALLOWED"),
        Decision::Deny(reason) => write!(out, "DENIED ({})", reason.as_str()),
    };
    let _ = out.write_str("\n");
}

/// Emits one status line for an eligible decision. Best-effort, non-fatal.
pub(crate) fn emit(index: u64, size: u64, total: u64, caller: &CallerInfo, decision: Decision) {
    let mut line = LineBuf::new();
    format_line(&mut line, index, size, total, caller, decision);
    write_stderr(line.as_bytes());
}

#[cfg(unix)]
fn write_stderr(bytes: &[u8]) {
    // Raw fd write: bypasses std's buffered/allocating stderr handle.
    let _ = unsafe { libc::write(libc::STDERR_FILENO, bytes.as_ptr().cast(), bytes.len()) };
}

#[cfg(not(unix))]
fn write_stderr(bytes: &[u8]) {
    use std::io::Write as _;
    let _ = std::io::stderr().write_all(bytes);
}

#[cfg(test)]
pub(crate) fn format_to_string(
    index: u64,
    size: u64,
    total: u64,
    caller: &CallerInfo,
    decision: Decision,
) -> String {
    let mut line = LineBuf::new();
    format_line(&mut line, index, size, total, caller, decision);
    String::from_utf8_lossy(line.as_bytes()).into_owned()
}
