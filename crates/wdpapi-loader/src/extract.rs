// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Extraction of a bundled library into a private temporary directory.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use crate::error::LoadError;

/// Writes `bytes` as `file_name` inside a freshly created temporary directory
/// and returns the absolute path of the written file.
///
/// The directory is kept on success: the library stays mapped for the life
/// of the process. On failure the directory and any partial file are removed.
pub(crate) fn extract_to_temp(
    bytes: &[u8],
    file_name: &str,
    prefix: &str,
) -> Result<PathBuf, LoadError> {
    let dir = tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .map_err(|source| LoadError::Extract {
            path: std::env::temp_dir(),
            source,
        })?;

    let path = dir.path().join(file_name);
    let extract_err = |source| LoadError::Extract {
        path: path.clone(),
        source,
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(extract_err)?;
    file.write_all(bytes).map_err(extract_err)?;
    file.sync_all().map_err(extract_err)?;
    drop(file);

    let dir = dir.keep();
    Ok(dir.join(file_name))
}
