// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Tests for Loader, driven through MockLinker and MockResourceBundle.

use std::fs;
use std::time::Duration;

use wdpapi_test_utils::run_concurrently;

use crate::config::{FollowerPolicy, LoaderConfig};
use crate::error::LoadError;
use crate::loader::Loader;
use crate::support::test_utils::{MockLinker, MockLinkerBehaviour, MockResourceBundle};

const LIBRARY_IMAGE: &[u8] = b"MZ\x90\x00bundled protection library";

fn cleanup(linker: &MockLinker) {
    for path in linker.linked_paths() {
        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }
}

fn leak<T>(value: T) -> &'static T {
    Box::leak(Box::new(value))
}

// =============================================================================
// ensure_loaded() - search path
// =============================================================================

#[test]
fn test_loads_from_search_path() {
    let linker = MockLinker::new(MockLinkerBehaviour::None);
    let resources = MockResourceBundle::empty();
    let loader = Loader::new(LoaderConfig::new(), &linker, &resources);

    loader.ensure_loaded().expect("Failed to ensure_loaded()");

    assert_eq!(linker.by_name_count(), 1);
    assert_eq!(linker.from_path_count(), 0);
    assert!(loader.state().is_attempted());
    assert!(loader.state().is_settled());
}

#[test]
fn test_second_call_is_a_no_op() {
    let linker = MockLinker::new(MockLinkerBehaviour::None);
    let resources = MockResourceBundle::empty();
    let loader = Loader::new(LoaderConfig::new(), &linker, &resources);

    loader.ensure_loaded().expect("Failed to ensure_loaded()");
    loader.ensure_loaded().expect("Failed to ensure_loaded()");
    loader.ensure_loaded().expect("Failed to ensure_loaded()");

    assert_eq!(linker.by_name_count(), 1);
}

#[test]
fn test_unsupported_platform_fails_fast() {
    let linker = MockLinker::new(MockLinkerBehaviour::Unsupported);
    let config = LoaderConfig::new();
    let resources = MockResourceBundle::with_resource(&config.file_name(), LIBRARY_IMAGE);
    let loader = Loader::new(config, &linker, &resources);

    let result = loader.ensure_loaded();

    assert!(matches!(result, Err(LoadError::UnsupportedPlatform)));
    assert_eq!(linker.from_path_count(), 0);
}

// =============================================================================
// ensure_loaded() - bundled resource fallback
// =============================================================================

#[test]
fn test_falls_back_to_bundled_resource() {
    let linker = MockLinker::new(MockLinkerBehaviour::FailByName);
    let config = LoaderConfig::new().with_temp_prefix("wdpapi-test-");
    let resources = MockResourceBundle::with_resource(&config.file_name(), LIBRARY_IMAGE);
    let loader = Loader::new(config, &linker, &resources);

    loader.ensure_loaded().expect("Failed to ensure_loaded()");

    assert_eq!(linker.by_name_count(), 1);
    assert_eq!(linker.from_path_count(), 1);

    let paths = linker.linked_paths();
    assert_eq!(paths.len(), 1);
    assert!(paths[0].is_absolute());
    assert_eq!(
        paths[0].file_name().and_then(|n| n.to_str()),
        Some(config.file_name().as_str())
    );
    assert_eq!(fs::read(&paths[0]).expect("Failed to read()"), LIBRARY_IMAGE);

    cleanup(&linker);
}

#[test]
fn test_fallback_resolves_resource_by_exact_name() {
    let linker = MockLinker::new(MockLinkerBehaviour::FailByName);
    let config = LoaderConfig::new().with_library_name("tasktop_wdpapi");
    let resources = MockResourceBundle::with_resource("crypt32.dll.bak", LIBRARY_IMAGE);
    let loader = Loader::new(config, &linker, &resources);

    let result = loader.ensure_loaded();

    match result {
        Err(LoadError::ResourceNotFound(name)) => assert_eq!(name, config.file_name()),
        other => panic!("expected ResourceNotFound, got {other:?}"),
    }
}

#[test]
fn test_missing_resource_is_reported() {
    let linker = MockLinker::new(MockLinkerBehaviour::FailByName);
    let resources = MockResourceBundle::empty();
    let loader = Loader::new(LoaderConfig::new(), &linker, &resources);

    let result = loader.ensure_loaded();

    let err = result.expect_err("Expected ResourceNotFound");
    assert!(matches!(err, LoadError::ResourceNotFound(_)));
    assert!(err.to_string().starts_with("Cannot find library resource: "));
    assert_eq!(linker.from_path_count(), 0);
}

#[test]
fn test_link_failure_after_extraction_is_reported() {
    let linker = MockLinker::new(MockLinkerBehaviour::FailAlways);
    let config = LoaderConfig::new().with_temp_prefix("wdpapi-test-");
    let resources = MockResourceBundle::with_resource(&config.file_name(), LIBRARY_IMAGE);
    let loader = Loader::new(config, &linker, &resources);

    let result = loader.ensure_loaded();

    assert!(matches!(result, Err(LoadError::Link { .. })));
    assert_eq!(linker.from_path_count(), 1);

    cleanup(&linker);
}

#[test]
fn test_failure_is_not_retried() {
    let linker = MockLinker::new(MockLinkerBehaviour::FailByName);
    let resources = MockResourceBundle::empty();
    let loader = Loader::new(LoaderConfig::new(), &linker, &resources);

    assert!(loader.ensure_loaded().is_err());
    // Only the attempt is remembered; later callers see no error.
    assert!(loader.ensure_loaded().is_ok());
    assert!(loader.ensure_loaded().is_ok());

    assert_eq!(linker.by_name_count(), 1);
}

// =============================================================================
// ensure_loaded() - concurrent first use
// =============================================================================

#[test]
fn test_concurrent_callers_load_exactly_once() {
    let linker = leak(MockLinker::new(MockLinkerBehaviour::None).with_delay(Duration::from_millis(50)));
    let resources = leak(MockResourceBundle::empty());
    let loader = leak(Loader::new(LoaderConfig::new(), linker, resources));

    let results = run_concurrently(64, move || loader.ensure_loaded());

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(linker.by_name_count(), 1);
    assert_eq!(linker.from_path_count(), 0);
}

#[test]
fn test_concurrent_callers_only_winner_sees_failure() {
    let linker = leak(MockLinker::new(MockLinkerBehaviour::FailByName).with_delay(Duration::from_millis(50)));
    let resources = leak(MockResourceBundle::empty());
    let loader = leak(Loader::new(LoaderConfig::new(), linker, resources));

    let results = run_concurrently(32, move || loader.ensure_loaded());

    assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);
    assert_eq!(linker.by_name_count(), 1);
}

#[test]
fn test_wait_policy_followers_return_after_winner_settles() {
    let linker = leak(MockLinker::new(MockLinkerBehaviour::None).with_delay(Duration::from_millis(100)));
    let resources = leak(MockResourceBundle::empty());
    let config = LoaderConfig::new().with_follower_policy(FollowerPolicy::Wait);
    let loader = leak(Loader::new(config, linker, resources));

    let results = run_concurrently(16, move || {
        let result = loader.ensure_loaded();
        (result.is_ok(), loader.state().is_settled())
    });

    assert!(results.iter().all(|(ok, settled)| *ok && *settled));
    assert_eq!(linker.by_name_count(), 1);
}

#[test]
fn test_wait_override_on_skip_loader() {
    let linker = leak(MockLinker::new(MockLinkerBehaviour::None).with_delay(Duration::from_millis(100)));
    let resources = leak(MockResourceBundle::empty());
    let loader = leak(Loader::new(LoaderConfig::new(), linker, resources));

    let results = run_concurrently(16, move || {
        let result = loader.ensure_loaded_with(FollowerPolicy::Wait);
        (result.is_ok(), loader.state().is_settled(), linker.is_linked())
    });

    assert_eq!(loader.config().follower_policy, FollowerPolicy::Skip);
    assert!(results.iter().all(|(ok, settled, linked)| *ok && *settled && *linked));
    assert_eq!(linker.by_name_count(), 1);
}

#[test]
fn test_skip_policy_followers_do_not_wait() {
    let linker = leak(MockLinker::new(MockLinkerBehaviour::None).with_delay(Duration::from_millis(500)));
    let resources = leak(MockResourceBundle::empty());
    let loader = leak(Loader::new(LoaderConfig::new(), linker, resources));

    let winner = std::thread::spawn(move || loader.ensure_loaded());

    while !loader.state().is_attempted() {
        std::hint::spin_loop();
    }

    // The winner is still sleeping inside the linker.
    assert!(loader.ensure_loaded().is_ok());
    assert!(!loader.state().is_settled());

    winner
        .join()
        .expect("Failed to join()")
        .expect("Failed to ensure_loaded()");
    assert!(loader.state().is_settled());
}
