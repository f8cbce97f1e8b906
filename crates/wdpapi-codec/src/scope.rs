// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

/// Never show UI; fail instead.
pub const CRYPTPROTECT_UI_FORBIDDEN: u32 = 0x1;
/// Tie protection to the machine rather than the current user.
pub const CRYPTPROTECT_LOCAL_MACHINE: u32 = 0x4;

/// Identity the protection key is derived from.
///
/// Only affects encryption; decryption recovers the scope from the payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ProtectionScope {
    /// Only the same user (on the same machine) can decrypt.
    #[default]
    CurrentUser,
    /// Any user on the same machine can decrypt.
    LocalMachine,
}

impl ProtectionScope {
    /// Maps a "local machine?" flag to a scope.
    pub const fn from_local_machine(local_machine: bool) -> Self {
        if local_machine {
            Self::LocalMachine
        } else {
            Self::CurrentUser
        }
    }

    /// Flags passed to the protect primitive.
    pub const fn protect_flags(self) -> u32 {
        match self {
            Self::CurrentUser => CRYPTPROTECT_UI_FORBIDDEN,
            Self::LocalMachine => CRYPTPROTECT_UI_FORBIDDEN | CRYPTPROTECT_LOCAL_MACHINE,
        }
    }

    /// Flags passed to the unprotect primitive.
    pub const fn unprotect_flags() -> u32 {
        CRYPTPROTECT_UI_FORBIDDEN
    }
}
