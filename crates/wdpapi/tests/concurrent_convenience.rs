// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! First use of the convenience API from many threads at once.
//!
//! Kept alone in its own test binary so that these calls make the first
//! load attempt.

use wdpapi::{LoadError, ProtectionError, ProtectionScope};
use wdpapi_test_utils::run_concurrently;

#[test]
fn test_concurrent_first_protect_never_sees_not_loaded() {
    let results = run_concurrently(32, || {
        wdpapi::protect(b"value", b"salt", ProtectionScope::CurrentUser)
    });

    let not_loaded = results
        .iter()
        .filter(|r| {
            matches!(
                r,
                Err(ProtectionError::LibraryResolution(LoadError::NotLoaded))
            )
        })
        .count();
    assert_eq!(not_loaded, 0);

    #[cfg(windows)]
    for result in results {
        let protected = result.expect("Failed to protect()");
        let plain = wdpapi::unprotect(&protected, b"salt").expect("Failed to unprotect()");
        assert_eq!(plain, b"value");
    }

    #[cfg(not(windows))]
    assert!(results.iter().all(|r| r
        .as_ref()
        .is_err_and(ProtectionError::is_unsupported_platform)));
}
