// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use wdpapi_codec::{ProtectionError, ProtectionScope, decrypt, encrypt};
use wdpapi_loader::ensure_loaded_blocking;

/// Returns true if this host has a data protection facility.
pub const fn is_supported() -> bool {
    cfg!(windows)
}

/// Loads the protection library if needed, then encrypts `input`.
///
/// A thread that races another one through first use waits for that load to
/// settle instead of failing with [`LoadError::NotLoaded`](wdpapi_loader::LoadError::NotLoaded).
///
/// # Errors
///
/// - [`ProtectionError::LibraryResolution`] if the library cannot be loaded
/// - [`ProtectionError::OperationFailed`] if the facility rejects the call
pub fn protect(
    input: &[u8],
    entropy: &[u8],
    scope: ProtectionScope,
) -> Result<Vec<u8>, ProtectionError> {
    ensure_loaded_blocking()?;
    encrypt(Some(input), Some(entropy), scope)
}

/// Loads the protection library if needed, then decrypts `input`. First use
/// waits as in [`protect`].
///
/// # Errors
///
/// As [`protect`]; a wrong `entropy` surfaces as
/// [`ProtectionError::OperationFailed`].
pub fn unprotect(input: &[u8], entropy: &[u8]) -> Result<Vec<u8>, ProtectionError> {
    ensure_loaded_blocking()?;
    decrypt(Some(input), Some(entropy))
}

/// [`protect`] over the UTF-8 bytes of `input`.
///
/// # Errors
///
/// See [`protect`].
pub fn protect_str(
    input: &str,
    entropy: &[u8],
    scope: ProtectionScope,
) -> Result<Vec<u8>, ProtectionError> {
    protect(input.as_bytes(), entropy, scope)
}

/// [`unprotect`] followed by UTF-8 decoding.
///
/// # Errors
///
/// See [`unprotect`]; [`ProtectionError::InvalidUtf8`] if the plaintext is not
/// UTF-8.
pub fn unprotect_to_string(input: &[u8], entropy: &[u8]) -> Result<String, ProtectionError> {
    let bytes = unprotect(input, entropy)?;
    Ok(String::from_utf8(bytes)?)
}
