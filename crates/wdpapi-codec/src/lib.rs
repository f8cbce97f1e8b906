// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! # wdpapi_codec
//!
//! The encrypt/decrypt call contract over the platform data protection
//! facility (`CryptProtectData` / `CryptUnprotectData` on Windows).
//!
//! Each operation:
//!
//! 1. Validates that `input` and `entropy` are present (either may be empty).
//! 2. Copies both into private [`Blob`]s so the facility never sees caller memory.
//! 3. Calls the facility, which either yields a foreign-owned output buffer or a
//!    numeric failure code.
//! 4. Adopts the output into a [`NativeBuffer`], copies it into an owned
//!    `Vec<u8>` and releases it through the facility on every exit path.
//! 5. Translates failure codes into [`ProtectionError::OperationFailed`] with the
//!    platform's message text.
//!
//! ## Example
//!
//! ```rust
//! use wdpapi_codec::{ProtectionScope, decrypt, encrypt};
//!
//! let _ = wdpapi_loader::ensure_loaded();
//!
//! match encrypt(Some(b"secret"), Some(b"salt"), ProtectionScope::CurrentUser) {
//!     Ok(protected) => {
//!         let plain = decrypt(Some(&protected), Some(b"salt")).expect("Failed to decrypt");
//!         assert_eq!(plain, b"secret");
//!     }
//!     Err(e) => assert!(e.is_unsupported_platform()),
//! }
//! ```
//!
//! ## Platform Support
//!
//! - Windows: entry points resolved from the library loaded by `wdpapi-loader`
//! - Everything else: every call fails with an unsupported-platform error;
//!   no substitute protection is applied

#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
mod tests;

mod blob;
mod codec;
mod error;
mod native_buffer;
mod scope;
mod support;
mod system;
mod traits;

pub use blob::Blob;
pub use codec::{decrypt, decrypt_with, encrypt, encrypt_with};
pub use error::ProtectionError;
pub use native_buffer::{NativeBuffer, RawBlob};
pub use scope::{ProtectionScope, CRYPTPROTECT_LOCAL_MACHINE, CRYPTPROTECT_UI_FORBIDDEN};
pub use system::SystemFacility;
pub use traits::ProtectionFacility;

#[cfg(any(test, feature = "test-utils"))]
pub use support::test_utils;
