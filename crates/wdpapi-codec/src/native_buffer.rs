// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! NativeBuffer - scoped ownership of facility-allocated output.
//!
//! Wraps the output blob of a successful foreign call and releases it through
//! the facility exactly once, on drop. Copying out happens before the drop, so
//! a failed copy still releases the buffer.

use std::collections::TryReserveError;

use crate::traits::ProtectionFacility;

/// Pointer/length pair as produced by the facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBlob {
    /// Start of the region; may be null when `len` is zero.
    pub ptr: *mut u8,
    /// Length in bytes.
    pub len: usize,
}

impl RawBlob {
    /// An empty blob with a null pointer.
    pub const fn empty() -> Self {
        Self {
            ptr: core::ptr::null_mut(),
            len: 0,
        }
    }
}

/// A facility-owned output buffer, released on drop.
pub struct NativeBuffer<'f, F: ProtectionFacility + ?Sized> {
    raw: RawBlob,
    facility: &'f F,
    wipe_on_release: bool,
}

impl<'f, F: ProtectionFacility + ?Sized> NativeBuffer<'f, F> {
    /// Takes ownership of `raw`.
    ///
    /// # Safety
    ///
    /// `raw` must have just been returned by `facility`, must not be released
    /// by anyone else, and `raw.ptr` must be valid for reads of `raw.len`
    /// bytes whenever `raw.len` fits in an allocation.
    pub unsafe fn adopt(raw: RawBlob, facility: &'f F) -> Self {
        Self {
            raw,
            facility,
            wipe_on_release: false,
        }
    }

    /// Zeroizes the buffer contents before releasing it.
    ///
    /// # Safety
    ///
    /// `raw.ptr` must also be valid for writes of `raw.len` bytes.
    pub unsafe fn wipe_on_release(mut self) -> Self {
        self.wipe_on_release = true;
        self
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.raw.len
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.raw.len == 0
    }

    /// Copies the contents into an owned vector.
    ///
    /// # Errors
    ///
    /// Returns [`TryReserveError`] if the destination cannot be allocated. The
    /// buffer is untouched and still released on drop.
    pub fn to_vec(&self) -> Result<Vec<u8>, TryReserveError> {
        let mut out = Vec::new();
        out.try_reserve_exact(self.raw.len)?;

        if let Some(slice) = self.as_slice() {
            out.extend_from_slice(slice);
        }

        Ok(out)
    }

    fn as_slice(&self) -> Option<&[u8]> {
        if self.raw.ptr.is_null() || self.raw.len == 0 {
            return None;
        }

        // Safety: guaranteed by `adopt`.
        Some(unsafe { core::slice::from_raw_parts(self.raw.ptr, self.raw.len) })
    }
}

impl<F: ProtectionFacility + ?Sized> Drop for NativeBuffer<'_, F> {
    fn drop(&mut self) {
        // A length past `isize::MAX` cannot describe a real region.
        if self.wipe_on_release && !self.raw.ptr.is_null() && self.raw.len <= isize::MAX as usize {
            // Safety: guaranteed by `wipe_on_release`.
            let slice = unsafe { core::slice::from_raw_parts_mut(self.raw.ptr, self.raw.len) };
            zeroize::Zeroize::zeroize(slice);
        }

        // Safety: `raw` came from `facility` (see `adopt`) and is released only here.
        unsafe { self.facility.release(self.raw) };
    }
}

impl<F: ProtectionFacility + ?Sized> core::fmt::Debug for NativeBuffer<'_, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NativeBuffer")
            .field("len", &self.raw.len)
            .finish_non_exhaustive()
    }
}
