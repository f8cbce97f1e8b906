// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use core::time::Duration;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::LoadError;
use crate::traits::Linker;

/// Configurable behavior for [`MockLinker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockLinkerBehaviour {
    /// Both link steps succeed.
    None,
    /// Loading by name fails, loading from a path succeeds.
    FailByName,
    /// Both link steps fail.
    FailAlways,
    /// Loading by name reports an unsupported platform.
    Unsupported,
}

/// Mock linker for testing.
///
/// Counts every call and records the paths handed to [`Linker::link_from_path`].
/// An optional delay inside `link_by_name` widens the window in which
/// concurrent callers race for the load.
#[derive(Debug)]
pub struct MockLinker {
    behaviour: MockLinkerBehaviour,
    delay: Duration,
    by_name_count: AtomicUsize,
    from_path_count: AtomicUsize,
    linked: AtomicBool,
    linked_paths: Mutex<Vec<PathBuf>>,
}

impl MockLinker {
    /// Creates a new mock linker with the specified behavior.
    pub fn new(behaviour: MockLinkerBehaviour) -> Self {
        Self {
            behaviour,
            delay: Duration::ZERO,
            by_name_count: AtomicUsize::new(0),
            from_path_count: AtomicUsize::new(0),
            linked: AtomicBool::new(false),
            linked_paths: Mutex::new(Vec::new()),
        }
    }

    /// Makes `link_by_name` sleep for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of `link_by_name` calls.
    pub fn by_name_count(&self) -> usize {
        self.by_name_count.load(Ordering::SeqCst)
    }

    /// Number of `link_from_path` calls.
    pub fn from_path_count(&self) -> usize {
        self.from_path_count.load(Ordering::SeqCst)
    }

    /// Returns true once a link step has succeeded.
    pub fn is_linked(&self) -> bool {
        self.linked.load(Ordering::SeqCst)
    }

    /// Paths passed to `link_from_path`, in call order.
    pub fn linked_paths(&self) -> Vec<PathBuf> {
        self.linked_paths
            .lock()
            .map(|paths| paths.clone())
            .unwrap_or_default()
    }
}

impl Linker for MockLinker {
    fn link_by_name(&self, file_name: &str) -> Result<(), LoadError> {
        self.by_name_count.fetch_add(1, Ordering::SeqCst);

        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }

        match self.behaviour {
            MockLinkerBehaviour::None => {
                self.linked.store(true, Ordering::SeqCst);
                Ok(())
            }
            MockLinkerBehaviour::FailByName | MockLinkerBehaviour::FailAlways => {
                Err(LoadError::Link {
                    name: file_name.to_owned(),
                    reason: "The specified module could not be found.".to_owned(),
                })
            }
            MockLinkerBehaviour::Unsupported => Err(LoadError::UnsupportedPlatform),
        }
    }

    fn link_from_path(&self, path: &Path) -> Result<(), LoadError> {
        self.from_path_count.fetch_add(1, Ordering::SeqCst);

        if let Ok(mut paths) = self.linked_paths.lock() {
            paths.push(path.to_path_buf());
        }

        match self.behaviour {
            MockLinkerBehaviour::FailAlways => Err(LoadError::Link {
                name: path.display().to_string(),
                reason: "%1 is not a valid Win32 application.".to_owned(),
            }),
            _ => {
                self.linked.store(true, Ordering::SeqCst);
                Ok(())
            }
        }
    }
}
