// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::borrow::Cow;
use std::path::Path;

use crate::error::LoadError;

/// The step that actually maps a native library into the process.
///
/// Implementations must be idempotent with respect to the platform loader
/// (loading the same library twice is harmless), but the [`Loader`](crate::Loader)
/// guarantees they are invoked at most once per attempt path.
pub trait Linker: Send + Sync {
    /// Loads `file_name` from the platform's native library search path.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Link`] if the library cannot be found or loaded, or
    /// [`LoadError::UnsupportedPlatform`] if the host has no protection facility.
    fn link_by_name(&self, file_name: &str) -> Result<(), LoadError>;

    /// Loads the library from an absolute path.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Link`] if the file cannot be loaded.
    fn link_from_path(&self, path: &Path) -> Result<(), LoadError>;
}

/// Source of library bytes bundled with the distributable.
pub trait ResourceBundle: Send + Sync {
    /// Returns the bytes of the resource named exactly `name`, if bundled.
    fn resource(&self, name: &str) -> Option<Cow<'_, [u8]>>;
}
