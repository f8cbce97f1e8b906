// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Loader - one-shot library loading with a bundled-resource fallback.

use log::{debug, error, info, warn};

use crate::config::{FollowerPolicy, LoaderConfig};
use crate::error::LoadError;
use crate::extract::extract_to_temp;
use crate::state::LoadState;
use crate::traits::{Linker, ResourceBundle};

/// Loads a native library at most once over its lifetime.
///
/// The process-wide instance behind [`ensure_loaded`](crate::ensure_loaded)
/// uses [`SYSTEM_LINKER`](crate::SYSTEM_LINKER) and
/// [`EMBEDDED_RESOURCES`](crate::EMBEDDED_RESOURCES). Custom instances are
/// useful to change the [`LoaderConfig`] or to substitute test doubles.
pub struct Loader<'a> {
    state: LoadState,
    config: LoaderConfig,
    linker: &'a dyn Linker,
    resources: &'a dyn ResourceBundle,
}

/// Settles the state when the winner's attempt returns or unwinds.
struct SettleGuard<'s>(&'s LoadState);

impl Drop for SettleGuard<'_> {
    fn drop(&mut self) {
        self.0.settle();
    }
}

impl<'a> Loader<'a> {
    /// Creates a loader that has not attempted anything yet.
    pub const fn new(
        config: LoaderConfig,
        linker: &'a dyn Linker,
        resources: &'a dyn ResourceBundle,
    ) -> Self {
        Self {
            state: LoadState::new(),
            config,
            linker,
            resources,
        }
    }

    /// Returns the configuration this loader was built with.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Returns the load state.
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Makes sure the library load has been attempted.
    ///
    /// Only the first caller performs the load and sees its outcome. Every
    /// later or concurrent caller returns `Ok(())` right away, or, with
    /// [`FollowerPolicy::Wait`], once the first caller's attempt has returned.
    ///
    /// # Errors
    ///
    /// For the winning caller only: [`LoadError::UnsupportedPlatform`] on
    /// hosts without a protection facility, [`LoadError::ResourceNotFound`]
    /// if the library is neither on the search path nor bundled, and
    /// [`LoadError::Extract`] / [`LoadError::Link`] if the fallback fails.
    pub fn ensure_loaded(&self) -> Result<(), LoadError> {
        self.ensure_loaded_with(self.config.follower_policy)
    }

    /// [`ensure_loaded`](Self::ensure_loaded) with `policy` in place of the
    /// configured follower policy for this call.
    ///
    /// # Errors
    ///
    /// See [`ensure_loaded`](Self::ensure_loaded).
    pub fn ensure_loaded_with(&self, policy: FollowerPolicy) -> Result<(), LoadError> {
        if !self.state.try_claim() {
            if policy == FollowerPolicy::Wait {
                self.state.wait_settled();
            }
            return Ok(());
        }

        let _settle = SettleGuard(&self.state);
        let result = self.load();

        if let Err(e) = &result {
            error!("failed to load `{}`: {e}", self.config.file_name());
        }

        result
    }

    fn load(&self) -> Result<(), LoadError> {
        let file_name = self.config.file_name();

        debug!("loading `{file_name}` from the library search path");
        match self.linker.link_by_name(&file_name) {
            Ok(()) => {
                info!("loaded `{file_name}` from the library search path");
                return Ok(());
            }
            Err(LoadError::UnsupportedPlatform) => return Err(LoadError::UnsupportedPlatform),
            Err(e) => warn!("`{file_name}` not loadable from search path ({e}), trying bundled copy"),
        }

        let bytes = self
            .resources
            .resource(&file_name)
            .ok_or_else(|| LoadError::ResourceNotFound(file_name.clone()))?;

        let path = extract_to_temp(&bytes, &file_name, self.config.temp_prefix)?;
        self.linker.link_from_path(&path)?;

        info!("loaded `{file_name}` from {}", path.display());
        Ok(())
    }
}

impl core::fmt::Debug for Loader<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Loader")
            .field("state", &self.state)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
