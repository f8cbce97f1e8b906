// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for wdpapi-loader.
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while making the protection library available to the process.
///
/// All of these are fatal for the process: the load is attempted once and the
/// outcome is never retried.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The linker rejected the library (by name or by extracted path).
    #[error("cannot load library `{name}`: {reason}")]
    Link {
        /// File name or absolute path that was handed to the linker.
        name: String,
        /// Platform-supplied reason.
        reason: String,
    },

    /// The library is not on the search path and no bundled copy exists.
    #[error("Cannot find library resource: {0}")]
    ResourceNotFound(String),

    /// The bundled copy could not be written to a private temporary file.
    #[error("failed to extract library resource to {path}: {source}")]
    Extract {
        /// Destination that could not be created or written.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The library loaded but does not export a required entry point.
    #[error("library does not export `{0}`")]
    MissingEntryPoint(&'static str),

    /// A protection call was made before any load attempt succeeded.
    #[error("protection library has not been loaded")]
    NotLoaded,

    /// The host has no data protection facility.
    #[error("data protection is not supported on this platform")]
    UnsupportedPlatform,
}
