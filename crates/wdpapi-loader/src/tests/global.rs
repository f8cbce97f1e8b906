// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use serial_test::serial;

use crate::global::{ensure_loaded, ensure_loaded_blocking, loaded_module};

// The only test in this binary touching the process-wide loader.
#[test]
#[serial(loader)]
fn test_global_ensure_loaded_attempts_once() {
    let first = ensure_loaded();
    let second = ensure_loaded();

    assert!(second.is_ok());
    // Already settled, so the blocking variant returns at once.
    assert!(ensure_loaded_blocking().is_ok());

    #[cfg(windows)]
    {
        assert!(first.is_ok());
        assert!(loaded_module().is_some());
    }

    #[cfg(not(windows))]
    {
        assert!(matches!(first, Err(crate::LoadError::UnsupportedPlatform)));
        assert!(loaded_module().is_none());
    }
}
