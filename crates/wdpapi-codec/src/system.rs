// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! SystemFacility - the platform implementation of [`ProtectionFacility`].
//!
//! On Windows the entry points are resolved from the module loaded by
//! `wdpapi-loader`; nothing is linked statically, so a call made before the
//! load completes reports [`LoadError::NotLoaded`](wdpapi_loader::LoadError::NotLoaded).

use crate::blob::Blob;
use crate::error::ProtectionError;
use crate::native_buffer::RawBlob;
use crate::traits::ProtectionFacility;

/// The operating system's data protection facility.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFacility;

#[cfg(not(windows))]
impl ProtectionFacility for SystemFacility {
    fn protect(&self, _: &mut Blob, _: &mut Blob, _: u32) -> Result<RawBlob, ProtectionError> {
        Err(wdpapi_loader::LoadError::UnsupportedPlatform.into())
    }

    fn unprotect(&self, _: &mut Blob, _: &mut Blob, _: u32) -> Result<RawBlob, ProtectionError> {
        Err(wdpapi_loader::LoadError::UnsupportedPlatform.into())
    }

    unsafe fn release(&self, _: RawBlob) {}
}

#[cfg(windows)]
impl ProtectionFacility for SystemFacility {
    fn protect(
        &self,
        input: &mut Blob,
        entropy: &mut Blob,
        flags: u32,
    ) -> Result<RawBlob, ProtectionError> {
        platform::protect(input, entropy, flags)
    }

    fn unprotect(
        &self,
        input: &mut Blob,
        entropy: &mut Blob,
        flags: u32,
    ) -> Result<RawBlob, ProtectionError> {
        platform::unprotect(input, entropy, flags)
    }

    unsafe fn release(&self, blob: RawBlob) {
        // Safety: forwarded from the caller.
        unsafe { platform::local_free(blob) }
    }
}

#[cfg(windows)]
pub(crate) mod platform {
    use core::ffi::c_void;
    use core::ptr;

    use windows::Win32::Foundation::{BOOL, GetLastError, HLOCAL, HMODULE, LocalFree};
    use windows::Win32::Security::Cryptography::CRYPT_INTEGER_BLOB;
    use windows::Win32::System::Diagnostics::Debug::{
        FORMAT_MESSAGE_ALLOCATE_BUFFER, FORMAT_MESSAGE_FROM_SYSTEM, FORMAT_MESSAGE_IGNORE_INSERTS,
        FormatMessageW,
    };
    use windows::Win32::System::LibraryLoader::GetProcAddress;
    use windows::core::{PCSTR, PCWSTR, PWSTR, s, w};

    use wdpapi_loader::{LoadError, loaded_module};

    use crate::blob::Blob;
    use crate::error::ProtectionError;
    use crate::native_buffer::RawBlob;

    type CryptProtectDataFn = unsafe extern "system" fn(
        pdatain: *const CRYPT_INTEGER_BLOB,
        szdatadescr: PCWSTR,
        poptionalentropy: *const CRYPT_INTEGER_BLOB,
        pvreserved: *const c_void,
        ppromptstruct: *const c_void,
        dwflags: u32,
        pdataout: *mut CRYPT_INTEGER_BLOB,
    ) -> BOOL;

    type CryptUnprotectDataFn = unsafe extern "system" fn(
        pdatain: *const CRYPT_INTEGER_BLOB,
        ppszdatadescr: *mut PWSTR,
        poptionalentropy: *const CRYPT_INTEGER_BLOB,
        pvreserved: *const c_void,
        ppromptstruct: *const c_void,
        dwflags: u32,
        pdataout: *mut CRYPT_INTEGER_BLOB,
    ) -> BOOL;

    /// MAKELANGID(LANG_NEUTRAL, SUBLANG_DEFAULT)
    const LANGUAGE_NEUTRAL_DEFAULT: u32 = 0x0400;
    const UNKNOWN_ERROR: &str = "Unknown error";

    pub(super) fn protect(
        input: &mut Blob,
        entropy: &mut Blob,
        flags: u32,
    ) -> Result<RawBlob, ProtectionError> {
        let module = module()?;
        let entry_point = proc_address(module, s!("CryptProtectData"), "CryptProtectData")?;
        // Safety: `CryptProtectData` has exactly this signature.
        let protect: CryptProtectDataFn = unsafe { core::mem::transmute(entry_point) };

        let data_in = crypt_blob(input)?;
        let optional_entropy = crypt_blob(entropy)?;
        let mut data_out = CRYPT_INTEGER_BLOB::default();

        // Safety: both input blobs point into live private copies; `data_out`
        // receives a LocalAlloc'd buffer on success.
        let ok = unsafe {
            protect(
                &data_in,
                w!("wdpapi"),
                &optional_entropy,
                ptr::null(),
                ptr::null(),
                flags,
                &mut data_out,
            )
        };

        finish(ok, data_out)
    }

    pub(super) fn unprotect(
        input: &mut Blob,
        entropy: &mut Blob,
        flags: u32,
    ) -> Result<RawBlob, ProtectionError> {
        let module = module()?;
        let entry_point = proc_address(module, s!("CryptUnprotectData"), "CryptUnprotectData")?;
        // Safety: `CryptUnprotectData` has exactly this signature.
        let unprotect: CryptUnprotectDataFn = unsafe { core::mem::transmute(entry_point) };

        let data_in = crypt_blob(input)?;
        let optional_entropy = crypt_blob(entropy)?;
        let mut data_out = CRYPT_INTEGER_BLOB::default();

        // Safety: as in `protect`; no description is requested back.
        let ok = unsafe {
            unprotect(
                &data_in,
                ptr::null_mut(),
                &optional_entropy,
                ptr::null(),
                ptr::null(),
                flags,
                &mut data_out,
            )
        };

        finish(ok, data_out)
    }

    /// # Safety
    ///
    /// `blob` must be an unreleased output of `protect`/`unprotect`.
    pub(super) unsafe fn local_free(blob: RawBlob) {
        if blob.ptr.is_null() {
            return;
        }

        // Safety: CryptProtectData/CryptUnprotectData allocate with LocalAlloc.
        let _ = unsafe { LocalFree(HLOCAL(blob.ptr.cast())) };
    }

    fn module() -> Result<HMODULE, ProtectionError> {
        let module = loaded_module().ok_or(LoadError::NotLoaded)?;
        Ok(HMODULE(module.as_ptr()))
    }

    /// Resolves `symbol` from `module`. A missing export is a resolution failure.
    pub(crate) fn proc_address(
        module: HMODULE,
        symbol: PCSTR,
        name: &'static str,
    ) -> Result<unsafe extern "system" fn() -> isize, ProtectionError> {
        // Safety: `module` stays loaded for the process lifetime; `symbol` is NUL-terminated.
        unsafe { GetProcAddress(module, symbol) }
            .ok_or(ProtectionError::LibraryResolution(LoadError::MissingEntryPoint(name)))
    }

    fn crypt_blob(blob: &mut Blob) -> Result<CRYPT_INTEGER_BLOB, ProtectionError> {
        Ok(CRYPT_INTEGER_BLOB {
            cbData: blob.platform_len()?,
            pbData: blob.as_mut_ptr(),
        })
    }

    fn finish(ok: BOOL, data_out: CRYPT_INTEGER_BLOB) -> Result<RawBlob, ProtectionError> {
        if !ok.as_bool() {
            return Err(last_error());
        }

        Ok(RawBlob {
            ptr: data_out.pbData,
            len: data_out.cbData as usize,
        })
    }

    /// Reads the thread's last error and resolves its system message.
    fn last_error() -> ProtectionError {
        // Safety: no preconditions.
        let code = unsafe { GetLastError() }.0;
        ProtectionError::operation_failed(format_message(code), code)
    }

    /// System message text for `code`, sized by the platform.
    pub(crate) fn format_message(code: u32) -> String {
        let mut buffer = PWSTR::null();

        // Safety: with ALLOCATE_BUFFER the platform stores a LocalAlloc'd
        // pointer into `buffer`, which is released below.
        let len = unsafe {
            FormatMessageW(
                FORMAT_MESSAGE_ALLOCATE_BUFFER
                    | FORMAT_MESSAGE_FROM_SYSTEM
                    | FORMAT_MESSAGE_IGNORE_INSERTS,
                None,
                code,
                LANGUAGE_NEUTRAL_DEFAULT,
                PWSTR(ptr::addr_of_mut!(buffer).cast()),
                0,
                None,
            )
        } as usize;

        if len == 0 || buffer.is_null() {
            return UNKNOWN_ERROR.to_owned();
        }

        // Safety: the platform wrote `len` UTF-16 units at `buffer`.
        let message = String::from_utf16_lossy(unsafe { core::slice::from_raw_parts(buffer.0, len) });

        // Safety: `buffer` was allocated by FormatMessageW and is not used again.
        let _ = unsafe { LocalFree(HLOCAL(buffer.0.cast())) };

        message
    }
}
