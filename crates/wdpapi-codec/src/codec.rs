// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use log::debug;

use crate::blob::Blob;
use crate::error::ProtectionError;
use crate::native_buffer::NativeBuffer;
use crate::scope::ProtectionScope;
use crate::system::SystemFacility;
use crate::traits::ProtectionFacility;

/// Encrypts `input` with the platform facility.
///
/// The protection library must have been loaded
/// (see [`wdpapi_loader::ensure_loaded`]).
///
/// # Errors
///
/// - [`ProtectionError::InvalidArgument`] if `input` or `entropy` is `None`
/// - [`ProtectionError::LibraryResolution`] if the library is not loaded or
///   the host is unsupported
/// - [`ProtectionError::OperationFailed`] if the facility rejects the call
pub fn encrypt(
    input: Option<&[u8]>,
    entropy: Option<&[u8]>,
    scope: ProtectionScope,
) -> Result<Vec<u8>, ProtectionError> {
    encrypt_with(&SystemFacility, input, entropy, scope)
}

/// Decrypts `input` with the platform facility. The scope is recovered
/// from the payload.
///
/// # Errors
///
/// As [`encrypt`]. A wrong `entropy` is reported by the facility as an
/// ordinary [`ProtectionError::OperationFailed`].
pub fn decrypt(input: Option<&[u8]>, entropy: Option<&[u8]>) -> Result<Vec<u8>, ProtectionError> {
    decrypt_with(&SystemFacility, input, entropy)
}

/// [`encrypt`] against an explicit facility.
///
/// # Errors
///
/// See [`encrypt`].
pub fn encrypt_with<F: ProtectionFacility + ?Sized>(
    facility: &F,
    input: Option<&[u8]>,
    entropy: Option<&[u8]>,
    scope: ProtectionScope,
) -> Result<Vec<u8>, ProtectionError> {
    let (mut input, mut entropy) = marshal(input, entropy)?;

    let raw = facility
        .protect(&mut input, &mut entropy, scope.protect_flags())
        .inspect_err(|e| debug!("protect failed: {e}"))?;

    // Safety: `raw` was just returned by `facility` and nothing else owns it.
    let buffer = unsafe { NativeBuffer::adopt(raw, facility) };

    Ok(buffer.to_vec()?)
}

/// [`decrypt`] against an explicit facility.
///
/// # Errors
///
/// See [`decrypt`].
pub fn decrypt_with<F: ProtectionFacility + ?Sized>(
    facility: &F,
    input: Option<&[u8]>,
    entropy: Option<&[u8]>,
) -> Result<Vec<u8>, ProtectionError> {
    let (mut input, mut entropy) = marshal(input, entropy)?;

    let raw = facility
        .unprotect(&mut input, &mut entropy, ProtectionScope::unprotect_flags())
        .inspect_err(|e| debug!("unprotect failed: {e}"))?;

    // Safety: `raw` was just returned by `facility`, nothing else owns it, and
    // unprotect output is writable plaintext.
    let buffer = unsafe { NativeBuffer::adopt(raw, facility).wipe_on_release() };

    Ok(buffer.to_vec()?)
}

fn marshal(input: Option<&[u8]>, entropy: Option<&[u8]>) -> Result<(Blob, Blob), ProtectionError> {
    let input = input.ok_or(ProtectionError::InvalidArgument("input"))?;
    let entropy = entropy.ok_or(ProtectionError::InvalidArgument("entropy"))?;

    Ok((
        Blob::copy_from("input", input),
        Blob::copy_from("entropy", entropy),
    ))
}
