// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! The process-wide loader.

use crate::config::{FollowerPolicy, LoaderConfig};
use crate::loader::Loader;
use crate::resources::EMBEDDED_RESOURCES;
use crate::system::{ModuleHandle, SYSTEM_LINKER};

static LOADER: Loader<'static> = Loader::new(LoaderConfig::new(), &SYSTEM_LINKER, &EMBEDDED_RESOURCES);

/// Loads the protection library into the process, at most once.
///
/// Safe to call any number of times from any thread. Only the first call
/// has an effect and reports an error; concurrent callers that lose the race
/// return immediately without waiting (see [`FollowerPolicy::Skip`](crate::FollowerPolicy::Skip)).
///
/// # Errors
///
/// See [`Loader::ensure_loaded`].
pub fn ensure_loaded() -> Result<(), crate::LoadError> {
    LOADER.ensure_loaded()
}

/// [`ensure_loaded`], but a caller that loses the race waits until the
/// winner's attempt has settled.
///
/// On return the library is either loaded or will never be, so a following
/// protection call cannot fail with [`LoadError::NotLoaded`](crate::LoadError::NotLoaded)
/// while a load is still in flight.
///
/// # Errors
///
/// See [`Loader::ensure_loaded`].
pub fn ensure_loaded_blocking() -> Result<(), crate::LoadError> {
    LOADER.ensure_loaded_with(FollowerPolicy::Wait)
}

/// Returns the module handle of the protection library once it is loaded.
pub fn loaded_module() -> Option<ModuleHandle> {
    SYSTEM_LINKER.module()
}
