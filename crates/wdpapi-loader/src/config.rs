// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};

/// Default library providing `CryptProtectData` / `CryptUnprotectData`.
pub(crate) const DEFAULT_LIBRARY_NAME: &str = "crypt32";

/// Default prefix for the private extraction directory.
pub(crate) const DEFAULT_TEMP_PREFIX: &str = "wdpapi-";

/// What callers that lose the load race do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FollowerPolicy {
    /// Return immediately, without waiting for the winner.
    ///
    /// A protection call issued right away may observe
    /// [`LoadError::NotLoaded`](crate::LoadError::NotLoaded).
    #[default]
    Skip,
    /// Spin until the winner's attempt has settled (success or failure).
    Wait,
}

/// Runtime configuration of a [`Loader`](crate::Loader).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Bare library name, without platform prefix or extension.
    pub library_name: &'static str,
    /// Prefix of the temporary directory used by the resource fallback.
    pub temp_prefix: &'static str,
    /// Behaviour of callers that lose the load race.
    pub follower_policy: FollowerPolicy,
}

impl LoaderConfig {
    /// Creates the default configuration (`crypt32`, [`FollowerPolicy::Skip`]).
    pub const fn new() -> Self {
        Self {
            library_name: DEFAULT_LIBRARY_NAME,
            temp_prefix: DEFAULT_TEMP_PREFIX,
            follower_policy: FollowerPolicy::Skip,
        }
    }

    /// Overrides the bare library name.
    pub const fn with_library_name(mut self, library_name: &'static str) -> Self {
        self.library_name = library_name;
        self
    }

    /// Overrides the temporary directory prefix.
    pub const fn with_temp_prefix(mut self, temp_prefix: &'static str) -> Self {
        self.temp_prefix = temp_prefix;
        self
    }

    /// Overrides the follower policy.
    pub const fn with_follower_policy(mut self, follower_policy: FollowerPolicy) -> Self {
        self.follower_policy = follower_policy;
        self
    }

    /// Platform file name of the library, e.g. `crypt32.dll`.
    ///
    /// Also the exact name under which the bundled resource is resolved.
    pub fn file_name(&self) -> String {
        format!("{DLL_PREFIX}{}{DLL_SUFFIX}", self.library_name)
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::new()
    }
}
