// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for wdpapi-codec.
use std::collections::TryReserveError;
use std::string::FromUtf8Error;

use thiserror::Error;
use wdpapi_loader::LoadError;

/// Errors returned by protection operations.
#[derive(Debug, Error)]
pub enum ProtectionError {
    /// A required argument was absent. Raised before any foreign call.
    #[error("Must provide {0}")]
    InvalidArgument(&'static str),

    /// An argument does not fit in a platform blob.
    #[error("{param} is too large for the protection facility ({len} bytes)")]
    TooLarge {
        /// Which argument.
        param: &'static str,
        /// Its length in bytes.
        len: usize,
    },

    /// The protection library is unavailable (not found, not loaded yet, or
    /// unsupported on this host).
    #[error("protection library unavailable: {0}")]
    LibraryResolution(#[from] LoadError),

    /// The facility reported a failure; message and code are the platform's.
    #[error("{message} (error code {code})")]
    OperationFailed {
        /// Platform message text.
        message: String,
        /// Platform error code.
        code: u32,
    },

    /// The facility's output could not be copied into owned memory.
    #[error("cannot allocate output buffer: {0}")]
    Allocation(#[from] TryReserveError),

    /// Unprotected bytes were requested as text but are not UTF-8.
    #[error("unprotected data is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
}

impl ProtectionError {
    /// Builds an [`OperationFailed`](Self::OperationFailed), trimming the
    /// trailing line break the platform appends to message text.
    pub fn operation_failed(message: impl AsRef<str>, code: u32) -> Self {
        Self::OperationFailed {
            message: message.as_ref().trim_end().to_owned(),
            code,
        }
    }

    /// Platform error code, for [`OperationFailed`](Self::OperationFailed).
    pub fn code(&self) -> Option<u32> {
        match self {
            Self::OperationFailed { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Returns true if the host has no protection facility.
    pub fn is_unsupported_platform(&self) -> bool {
        matches!(self, Self::LibraryResolution(LoadError::UnsupportedPlatform))
    }
}
