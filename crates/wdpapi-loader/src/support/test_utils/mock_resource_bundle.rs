// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::borrow::Cow;

use crate::traits::ResourceBundle;

/// In-memory resource bundle for testing.
#[derive(Debug, Default, Clone)]
pub struct MockResourceBundle {
    entries: Vec<(String, Vec<u8>)>,
}

impl MockResourceBundle {
    /// Creates an empty bundle.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a bundle holding a single resource.
    pub fn with_resource(name: &str, bytes: &[u8]) -> Self {
        Self {
            entries: vec![(name.to_owned(), bytes.to_vec())],
        }
    }
}

impl ResourceBundle for MockResourceBundle {
    fn resource(&self, name: &str) -> Option<Cow<'_, [u8]>> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, bytes)| Cow::Borrowed(bytes.as_slice()))
    }
}
