// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use crate::scope::{CRYPTPROTECT_LOCAL_MACHINE, CRYPTPROTECT_UI_FORBIDDEN, ProtectionScope};

#[test]
fn test_default_scope_is_current_user() {
    assert_eq!(ProtectionScope::default(), ProtectionScope::CurrentUser);
}

#[test]
fn test_from_local_machine() {
    assert_eq!(ProtectionScope::from_local_machine(true), ProtectionScope::LocalMachine);
    assert_eq!(ProtectionScope::from_local_machine(false), ProtectionScope::CurrentUser);
}

#[test]
fn test_protect_flags_forbid_ui() {
    assert_eq!(ProtectionScope::CurrentUser.protect_flags(), CRYPTPROTECT_UI_FORBIDDEN);
    assert_eq!(
        ProtectionScope::LocalMachine.protect_flags(),
        CRYPTPROTECT_UI_FORBIDDEN | CRYPTPROTECT_LOCAL_MACHINE
    );
}

#[test]
fn test_unprotect_flags_carry_no_scope() {
    assert_eq!(ProtectionScope::unprotect_flags(), CRYPTPROTECT_UI_FORBIDDEN);
}

#[test]
fn test_flag_values_match_wincrypt() {
    assert_eq!(CRYPTPROTECT_UI_FORBIDDEN, 0x1);
    assert_eq!(CRYPTPROTECT_LOCAL_MACHINE, 0x4);
}
