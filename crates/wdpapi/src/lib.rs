// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! # wdpapi
//!
//! Encrypt and decrypt opaque byte payloads with the Windows data protection
//! facility, bound to the current user or the local machine and optionally
//! salted with caller-supplied entropy. No key material is ever handled here.
//!
//! # Quick Start
//!
//! ```rust
//! use wdpapi::ProtectionScope;
//!
//! fn main() -> Result<(), wdpapi::ProtectionError> {
//!     if !wdpapi::is_supported() {
//!         return Ok(());
//!     }
//!
//!     let protected = wdpapi::protect(b"hunter2", b"app salt", ProtectionScope::CurrentUser)?;
//!     let plain = wdpapi::unprotect(&protected, b"app salt")?;
//!     assert_eq!(plain, b"hunter2");
//!
//!     Ok(())
//! }
//! ```
//!
//! # Layers
//!
//! - [`ensure_loaded`]: loads the native library once per process, falling back
//!   to a bundled copy (feature `bundled`) when it is not on the search path
//! - [`encrypt`] / [`decrypt`]: the raw call contract; arguments are `Option`s
//!   and a missing one is reported as [`ProtectionError::InvalidArgument`]
//! - [`protect`] / [`unprotect`]: load-then-call convenience over slices;
//!   first use goes through [`ensure_loaded_blocking`], so concurrent callers
//!   never observe a load that is still in flight
//!
//! # Errors
//!
//! Failures reported by the platform keep its message and code verbatim:
//!
//! ```text
//! The parameter is incorrect. (error code 87)   // not a protected payload
//! The data is invalid. (error code 13)          // entropy mismatch
//! ```
//!
//! Nothing is retried. On hosts without the facility every call fails with
//! [`LoadError::UnsupportedPlatform`]; no weaker protection is substituted.

#![warn(missing_docs)]

mod convenience;

pub use convenience::{is_supported, protect, protect_str, unprotect, unprotect_to_string};

pub use wdpapi_codec::{ProtectionError, ProtectionScope, decrypt, encrypt};
pub use wdpapi_loader::{FollowerPolicy, LoadError, LoaderConfig, ensure_loaded, ensure_loaded_blocking};

/// Codec internals: blobs, native buffers and the facility seam.
pub mod codec {
    pub use wdpapi_codec::*;
}

/// Loader internals: load state, linkers and resource bundles.
pub mod loader {
    pub use wdpapi_loader::*;
}
