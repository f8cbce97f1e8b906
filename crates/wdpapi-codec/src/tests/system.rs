// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

#[cfg(windows)]
use serial_test::serial;

use crate::codec::{decrypt, encrypt};
use crate::error::ProtectionError;
use crate::scope::ProtectionScope;

#[cfg(not(windows))]
#[test]
fn test_system_facility_is_unsupported() {
    let encrypted = encrypt(Some(b"value"), Some(b"salt"), ProtectionScope::CurrentUser);
    let decrypted = decrypt(Some(b"value"), Some(b"salt"));

    assert!(encrypted.expect_err("Expected unsupported").is_unsupported_platform());
    assert!(decrypted.expect_err("Expected unsupported").is_unsupported_platform());
}

#[test]
fn test_system_facility_validates_before_any_call() {
    assert!(matches!(
        encrypt(None, Some(b""), ProtectionScope::CurrentUser),
        Err(ProtectionError::InvalidArgument("input"))
    ));
    assert!(matches!(
        decrypt(Some(b""), None),
        Err(ProtectionError::InvalidArgument("entropy"))
    ));
}

#[cfg(windows)]
#[test]
#[serial(loader)]
fn test_system_facility_round_trip() {
    wdpapi_loader::ensure_loaded().expect("Failed to ensure_loaded()");

    let encrypted = encrypt(Some(b"value"), Some(b"salt"), ProtectionScope::CurrentUser)
        .expect("Failed to encrypt()");
    let decrypted = decrypt(Some(&encrypted), Some(b"salt")).expect("Failed to decrypt()");

    assert_eq!(decrypted, b"value");
}

#[cfg(windows)]
#[test]
#[serial(loader)]
fn test_system_facility_reports_platform_messages() {
    wdpapi_loader::ensure_loaded().expect("Failed to ensure_loaded()");

    let result = decrypt(Some(b"some value"), Some(b"some entropy"));

    let err = result.expect_err("Expected OperationFailed");
    assert_eq!(err.code(), Some(87));
    assert!(err.to_string().contains("(error code 87)"));
}

#[cfg(windows)]
#[test]
fn test_missing_entry_point_is_library_resolution_failure() {
    use wdpapi_loader::LoadError;
    use windows::Win32::System::LibraryLoader::GetModuleHandleW;
    use windows::core::{s, w};

    use crate::system::platform::proc_address;

    // Safety: kernel32 is mapped into every Windows process.
    let kernel32 =
        unsafe { GetModuleHandleW(w!("kernel32.dll")) }.expect("Failed to GetModuleHandleW()");

    let err = proc_address(kernel32, s!("CryptProtectData"), "CryptProtectData")
        .expect_err("Expected MissingEntryPoint");

    assert!(matches!(
        err,
        ProtectionError::LibraryResolution(LoadError::MissingEntryPoint("CryptProtectData"))
    ));
    assert_eq!(err.code(), None);
}

#[cfg(windows)]
#[test]
fn test_format_message_returns_platform_text() {
    use crate::system::platform::format_message;

    let message = format_message(87);

    assert!(!message.is_empty());
    assert_ne!(message, "Unknown error");
}

#[cfg(windows)]
#[test]
fn test_format_message_unknown_code() {
    use crate::system::platform::format_message;

    assert_eq!(format_message(0xDEAD_BEEF), "Unknown error");
}
