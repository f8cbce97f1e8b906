// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use zeroize::Zeroizing;

use crate::error::ProtectionError;

/// A private, immutable-to-the-caller copy of an argument, handed to the
/// facility as a pointer/length pair.
///
/// The copy is zeroized on drop.
pub struct Blob {
    name: &'static str,
    bytes: Zeroizing<Vec<u8>>,
}

impl Blob {
    /// Copies `bytes` into a new blob named after the argument it carries.
    pub fn copy_from(name: &'static str, bytes: &[u8]) -> Self {
        Self {
            name,
            bytes: Zeroizing::new(bytes.to_vec()),
        }
    }

    /// Argument name, used in error reports.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the blob is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Length as the 32-bit count a platform blob carries.
    ///
    /// # Errors
    ///
    /// [`ProtectionError::TooLarge`] past `u32::MAX` bytes.
    pub fn platform_len(&self) -> Result<u32, ProtectionError> {
        platform_len(self.name, self.len())
    }

    /// Contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Data pointer for the foreign call. Never null, even when empty.
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.bytes.as_mut_ptr()
    }
}

pub(crate) fn platform_len(param: &'static str, len: usize) -> Result<u32, ProtectionError> {
    u32::try_from(len).map_err(|_| ProtectionError::TooLarge { param, len })
}

impl core::fmt::Debug for Blob {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Blob")
            .field("name", &self.name)
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
