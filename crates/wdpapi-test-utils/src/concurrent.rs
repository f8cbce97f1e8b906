// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::sync::{Arc, Barrier};
use std::thread;

/// Runs `f` on `threads` threads released together by a barrier and returns
/// every result in spawn order.
///
/// # Panics
///
/// Panics if any thread panics.
pub fn run_concurrently<T, F>(threads: usize, f: F) -> Vec<T>
where
    T: Send + 'static,
    F: Fn() -> T + Send + Sync + 'static,
{
    let barrier = Arc::new(Barrier::new(threads));
    let f = Arc::new(f);

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            let f = Arc::clone(&f);
            thread::spawn(move || {
                barrier.wait();
                f()
            })
        })
        .collect();

    handles
        .into_iter()
        .map(|h| h.join().expect("Failed to join()"))
        .collect()
}
