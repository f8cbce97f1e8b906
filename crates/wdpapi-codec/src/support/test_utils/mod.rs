// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Test doubles for the codec seams.

mod mock_facility;

pub use mock_facility::{
    ERROR_INVALID_DATA, ERROR_INVALID_PARAMETER, MockFacility, MockFacilityBehaviour,
};
