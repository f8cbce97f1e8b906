// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Test doubles for the loader seams.

mod mock_linker;
mod mock_resource_bundle;

pub use mock_linker::{MockLinker, MockLinkerBehaviour};
pub use mock_resource_bundle::MockResourceBundle;
