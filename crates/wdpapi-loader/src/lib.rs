// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! # wdpapi_loader
//!
//! Locates and loads the native library that exposes the platform data
//! protection primitive, exactly once per process.
//!
//! ## Load sequence
//!
//! 1. A single atomic compare-and-set picks the one caller that performs the
//!    load. Every other caller returns immediately (or, with
//!    [`FollowerPolicy::Wait`], spins until the winner's attempt settles).
//! 2. The winner asks the [`Linker`] to load the library by bare file name from
//!    the platform search path.
//! 3. On failure, the library bytes are resolved from a [`ResourceBundle`],
//!    written to a fresh private temporary directory and loaded from there.
//! 4. If the resource is missing or extraction/linking fails, a [`LoadError`]
//!    is returned. The attempt is never retried within the process.
//!
//! Only the attempt is remembered, never its outcome.
//!
//! ## Example
//!
//! ```rust
//! match wdpapi_loader::ensure_loaded() {
//!     Ok(()) => {}
//!     Err(wdpapi_loader::LoadError::UnsupportedPlatform) => {
//!         // No protection facility on this host.
//!     }
//!     Err(e) => panic!("failed to load protection library: {e}"),
//! }
//! ```
//!
//! ## Platform Support
//!
//! - Windows: `LoadLibraryW` over `crypt32.dll` (or the configured name)
//! - Everything else: [`LoadError::UnsupportedPlatform`], nothing is extracted

#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
mod tests;

mod config;
mod error;
mod extract;
mod global;
mod loader;
mod resources;
mod state;
mod support;
mod system;
mod traits;

pub use config::{FollowerPolicy, LoaderConfig};
pub use error::LoadError;
pub use global::{ensure_loaded, ensure_loaded_blocking, loaded_module};
pub use loader::Loader;
pub use resources::{EMBEDDED_RESOURCES, EmbeddedResources};
pub use state::LoadState;
pub use system::{ModuleHandle, SYSTEM_LINKER, SystemLinker};
pub use traits::{Linker, ResourceBundle};

#[cfg(any(test, feature = "test-utils"))]
pub use support::test_utils;
