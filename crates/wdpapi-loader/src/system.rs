// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! SystemLinker - the platform implementation of [`Linker`].

use core::ffi::c_void;
use core::ptr::{self, NonNull};
use core::sync::atomic::{AtomicPtr, Ordering};
use std::path::Path;

use crate::error::LoadError;
use crate::traits::Linker;

/// The process-wide system linker.
///
/// Holds the module handle of the loaded protection library so the codec can
/// resolve its entry points.
pub static SYSTEM_LINKER: SystemLinker = SystemLinker::new();

/// Opaque handle of a library mapped into the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleHandle(NonNull<c_void>);

// Safety: a module handle is a process-global value, valid on every thread.
unsafe impl Send for ModuleHandle {}
unsafe impl Sync for ModuleHandle {}

impl ModuleHandle {
    /// Raw handle as returned by the platform loader.
    pub fn as_ptr(&self) -> *mut c_void {
        self.0.as_ptr()
    }
}

/// Loads libraries through the operating system loader and remembers the
/// resulting module handle.
#[derive(Debug)]
pub struct SystemLinker {
    module: AtomicPtr<c_void>,
}

impl SystemLinker {
    /// Creates a linker with no module loaded.
    pub const fn new() -> Self {
        Self {
            module: AtomicPtr::new(ptr::null_mut()),
        }
    }

    /// Returns the handle of the loaded library, if a load succeeded.
    pub fn module(&self) -> Option<ModuleHandle> {
        NonNull::new(self.module.load(Ordering::Acquire)).map(ModuleHandle)
    }

    #[cfg_attr(not(windows), allow(dead_code))]
    fn publish(&self, module: *mut c_void) {
        self.module.store(module, Ordering::Release);
    }
}

impl Default for SystemLinker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(windows)]
impl Linker for SystemLinker {
    fn link_by_name(&self, file_name: &str) -> Result<(), LoadError> {
        let module = platform::load_library(file_name.as_ref()).map_err(|reason| {
            LoadError::Link {
                name: file_name.to_owned(),
                reason,
            }
        })?;
        self.publish(module);
        Ok(())
    }

    fn link_from_path(&self, path: &Path) -> Result<(), LoadError> {
        let module = platform::load_library(path.as_os_str()).map_err(|reason| LoadError::Link {
            name: path.display().to_string(),
            reason,
        })?;
        self.publish(module);
        Ok(())
    }
}

#[cfg(not(windows))]
impl Linker for SystemLinker {
    fn link_by_name(&self, _file_name: &str) -> Result<(), LoadError> {
        Err(LoadError::UnsupportedPlatform)
    }

    fn link_from_path(&self, _path: &Path) -> Result<(), LoadError> {
        Err(LoadError::UnsupportedPlatform)
    }
}

#[cfg(windows)]
mod platform {
    use core::ffi::c_void;
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;

    use windows::Win32::System::LibraryLoader::LoadLibraryW;
    use windows::core::PCWSTR;

    /// `LoadLibraryW` over a NUL-terminated UTF-16 copy of `name`.
    pub(super) fn load_library(name: &OsStr) -> Result<*mut c_void, String> {
        let wide: Vec<u16> = name.encode_wide().chain(core::iter::once(0)).collect();

        // Safety: `wide` is NUL-terminated and outlives the call.
        let module = unsafe { LoadLibraryW(PCWSTR(wide.as_ptr())) }
            .map_err(|e| e.message().to_string())?;

        Ok(module.0)
    }
}
