// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Resources compiled into the crate.
//!
//! With the `bundled` feature, the library at `$WDPAPI_BUNDLED_LIBRARY`
//! (an absolute path, read at compile time) is embedded under the name in
//! `$WDPAPI_BUNDLED_NAME`, or under the default library file name.

use std::borrow::Cow;

use crate::traits::ResourceBundle;

#[cfg(feature = "bundled")]
const BUNDLED_NAME: &str = match option_env!("WDPAPI_BUNDLED_NAME") {
    Some(name) => name,
    None => "crypt32.dll",
};

#[cfg(feature = "bundled")]
const BUNDLED: &[(&str, &[u8])] = &[(
    BUNDLED_NAME,
    include_bytes!(env!("WDPAPI_BUNDLED_LIBRARY")),
)];

#[cfg(not(feature = "bundled"))]
const BUNDLED: &[(&str, &[u8])] = &[];

/// Resources embedded in the binary at compile time.
pub static EMBEDDED_RESOURCES: EmbeddedResources = EmbeddedResources::new(BUNDLED);

/// A fixed table of named, statically embedded resources.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedResources {
    entries: &'static [(&'static str, &'static [u8])],
}

impl EmbeddedResources {
    /// Creates a bundle over the given `(name, bytes)` table.
    pub const fn new(entries: &'static [(&'static str, &'static [u8])]) -> Self {
        Self { entries }
    }

    /// Number of embedded resources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is embedded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceBundle for EmbeddedResources {
    fn resource(&self, name: &str) -> Option<Cow<'_, [u8]>> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, bytes)| Cow::Borrowed(*bytes))
    }
}
