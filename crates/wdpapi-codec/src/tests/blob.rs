// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use crate::blob::{Blob, platform_len};
use crate::error::ProtectionError;

#[test]
fn test_blob_copies_caller_bytes() {
    let mut caller = vec![1u8, 2, 3, 4];
    let mut blob = Blob::copy_from("input", &caller);

    caller.iter_mut().for_each(|b| *b = 0);

    assert_eq!(blob.as_slice(), &[1, 2, 3, 4]);
    assert_ne!(blob.as_mut_ptr(), caller.as_mut_ptr());
}

#[test]
fn test_empty_blob_has_non_null_pointer() {
    let mut blob = Blob::copy_from("entropy", &[]);

    assert!(blob.is_empty());
    assert_eq!(blob.len(), 0);
    assert!(!blob.as_mut_ptr().is_null());
}

#[test]
fn test_blob_name_and_debug_hide_contents() {
    let blob = Blob::copy_from("entropy", b"salt");

    assert_eq!(blob.name(), "entropy");

    let debug = format!("{blob:?}");
    assert!(debug.contains("entropy"));
    assert!(!debug.contains("salt"));
}

#[test]
fn test_platform_len_fits_u32() {
    let blob = Blob::copy_from("input", b"value");

    assert_eq!(blob.platform_len().expect("Failed to platform_len()"), 5);
    assert_eq!(platform_len("input", u32::MAX as usize).expect("Failed to platform_len()"), u32::MAX);
}

#[cfg(target_pointer_width = "64")]
#[test]
fn test_platform_len_rejects_oversized_argument() {
    let len = u32::MAX as usize + 1;

    let err = platform_len("entropy", len).expect_err("Expected TooLarge");

    assert!(matches!(err, ProtectionError::TooLarge { param: "entropy", len: l } if l == len));
    assert_eq!(err.code(), None);
    assert_eq!(
        err.to_string(),
        "entropy is too large for the protection facility (4294967296 bytes)"
    );
}
