// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use crate::blob::Blob;
use crate::error::ProtectionError;
use crate::native_buffer::RawBlob;

/// The platform protect/unprotect primitives.
///
/// Implementations report failures as [`ProtectionError::OperationFailed`]
/// carrying the platform's message and code, or
/// [`ProtectionError::LibraryResolution`] when the primitive is unavailable.
/// Output buffers are foreign-owned and must be handed back through
/// [`release`](Self::release).
pub trait ProtectionFacility {
    /// Protects `input`, salted with `entropy`.
    ///
    /// # Errors
    ///
    /// Returns the facility's failure; no output buffer exists in that case.
    fn protect(
        &self,
        input: &mut Blob,
        entropy: &mut Blob,
        flags: u32,
    ) -> Result<RawBlob, ProtectionError>;

    /// Unprotects `input`, which must have been protected with the same `entropy`.
    ///
    /// # Errors
    ///
    /// Returns the facility's failure; no output buffer exists in that case.
    fn unprotect(
        &self,
        input: &mut Blob,
        entropy: &mut Blob,
        flags: u32,
    ) -> Result<RawBlob, ProtectionError>;

    /// Releases an output buffer.
    ///
    /// # Safety
    ///
    /// `blob` must have been returned by [`protect`](Self::protect) or
    /// [`unprotect`](Self::unprotect) on this facility and not released yet.
    unsafe fn release(&self, blob: RawBlob);
}
