// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! MockFacility - an in-process stand-in for the platform facility.
//!
//! Payload layout:
//!
//! ```text
//! magic (4) | scope flags (1) | nonce (16) | tag (32) | ciphertext (n)
//! ```
//!
//! The keystream and tag are SHA-256 over the nonce and entropy, so a
//! payload only opens with the entropy it was sealed with. Garbage input is
//! rejected with code 87 and a wrong entropy with code 13, as the real
//! facility does.

use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::collections::HashMap;
use std::sync::Mutex;

use sha2::{Digest, Sha256};

use crate::blob::Blob;
use crate::error::ProtectionError;
use crate::native_buffer::RawBlob;
use crate::scope::CRYPTPROTECT_LOCAL_MACHINE;
use crate::traits::ProtectionFacility;

/// "The parameter is incorrect."
pub const ERROR_INVALID_PARAMETER: u32 = 87;
/// "The data is invalid."
pub const ERROR_INVALID_DATA: u32 = 13;

const MAGIC: &[u8; 4] = b"WDPM";
const NONCE_LEN: usize = 16;
const TAG_LEN: usize = 32;
const HEADER_LEN: usize = MAGIC.len() + 1 + NONCE_LEN + TAG_LEN;

/// Configurable behavior for [`MockFacility`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFacilityBehaviour {
    /// Normal operation.
    None,
    /// `protect` fails with the given code.
    FailProtect(u32),
    /// `unprotect` fails with the given code.
    FailUnprotect(u32),
    /// `protect` succeeds but reports an output length no allocation can hold.
    OversizedProtectOutput,
    /// `unprotect` succeeds but reports an output length no allocation can hold.
    OversizedUnprotectOutput,
}

/// Mock protection facility for testing.
///
/// Every output buffer is tracked until released, so tests can assert that
/// each one is released exactly once.
#[derive(Debug)]
pub struct MockFacility {
    behaviour: MockFacilityBehaviour,
    protect_count: AtomicUsize,
    unprotect_count: AtomicUsize,
    release_count: AtomicUsize,
    foreign_releases: AtomicUsize,
    wiped_releases: AtomicUsize,
    last_flags: AtomicU32,
    outstanding: Mutex<HashMap<usize, Box<[u8]>>>,
}

impl MockFacility {
    /// Creates a new mock facility with the specified behavior.
    pub fn new(behaviour: MockFacilityBehaviour) -> Self {
        Self {
            behaviour,
            protect_count: AtomicUsize::new(0),
            unprotect_count: AtomicUsize::new(0),
            release_count: AtomicUsize::new(0),
            foreign_releases: AtomicUsize::new(0),
            wiped_releases: AtomicUsize::new(0),
            last_flags: AtomicU32::new(0),
            outstanding: Mutex::new(HashMap::new()),
        }
    }

    /// Changes the mock behavior at runtime.
    pub fn change_behaviour(&mut self, behaviour: MockFacilityBehaviour) {
        self.behaviour = behaviour;
    }

    /// Number of `protect` calls.
    pub fn protect_count(&self) -> usize {
        self.protect_count.load(Ordering::SeqCst)
    }

    /// Number of `unprotect` calls.
    pub fn unprotect_count(&self) -> usize {
        self.unprotect_count.load(Ordering::SeqCst)
    }

    /// Number of `release` calls.
    pub fn release_count(&self) -> usize {
        self.release_count.load(Ordering::SeqCst)
    }

    /// Number of `release` calls for buffers this facility did not own
    /// (double releases included).
    pub fn foreign_releases(&self) -> usize {
        self.foreign_releases.load(Ordering::SeqCst)
    }

    /// Number of released buffers whose contents were all zero.
    pub fn wiped_releases(&self) -> usize {
        self.wiped_releases.load(Ordering::SeqCst)
    }

    /// Number of output buffers issued and not yet released.
    pub fn outstanding(&self) -> usize {
        self.outstanding.lock().map(|map| map.len()).unwrap_or(usize::MAX)
    }

    /// Flags passed to the most recent `protect`/`unprotect`.
    pub fn last_flags(&self) -> u32 {
        self.last_flags.load(Ordering::SeqCst)
    }

    /// Platform message text for `code`, line break included.
    pub fn describe(code: u32) -> &'static str {
        match code {
            ERROR_INVALID_PARAMETER => "The parameter is incorrect.\r\n",
            ERROR_INVALID_DATA => "The data is invalid.\r\n",
            _ => "Unknown error",
        }
    }

    /// Hands out a tracked copy of `bytes`, as the facility would.
    pub fn issue(&self, bytes: &[u8]) -> RawBlob {
        self.issue_with_len(bytes, bytes.len())
    }

    fn issue_with_len(&self, bytes: &[u8], reported_len: usize) -> RawBlob {
        // At least one byte so every issued buffer has a distinct address.
        let mut storage = vec![0u8; bytes.len().max(1)].into_boxed_slice();
        storage[..bytes.len()].copy_from_slice(bytes);

        let ptr = storage.as_mut_ptr();
        if let Ok(mut map) = self.outstanding.lock() {
            map.insert(ptr as usize, storage);
        }

        RawBlob {
            ptr,
            len: reported_len,
        }
    }

    fn fail(code: u32) -> ProtectionError {
        ProtectionError::operation_failed(Self::describe(code), code)
    }

    fn seal(input: &[u8], entropy: &[u8], flags: u32) -> Result<Vec<u8>, ProtectionError> {
        let mut nonce = [0u8; NONCE_LEN];
        getrandom::fill(&mut nonce).map_err(|_| Self::fail(ERROR_INVALID_DATA))?;

        let scope = (flags & CRYPTPROTECT_LOCAL_MACHINE) as u8;
        let ciphertext = apply_keystream(input, &nonce, entropy);
        let tag = tag(scope, &nonce, entropy, input);

        let mut out = Vec::with_capacity(HEADER_LEN + input.len());
        out.extend_from_slice(MAGIC);
        out.push(scope);
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&tag);
        out.extend_from_slice(&ciphertext);

        Ok(out)
    }

    fn open(payload: &[u8], entropy: &[u8]) -> Result<Vec<u8>, ProtectionError> {
        if payload.len() < HEADER_LEN || &payload[..MAGIC.len()] != MAGIC {
            return Err(Self::fail(ERROR_INVALID_PARAMETER));
        }

        let scope = payload[MAGIC.len()];
        let (nonce, rest) = payload[MAGIC.len() + 1..].split_at(NONCE_LEN);
        let (expected_tag, ciphertext) = rest.split_at(TAG_LEN);

        let plaintext = apply_keystream(ciphertext, nonce, entropy);

        if tag(scope, nonce, entropy, &plaintext).as_slice() != expected_tag {
            return Err(Self::fail(ERROR_INVALID_DATA));
        }

        Ok(plaintext)
    }
}

impl ProtectionFacility for MockFacility {
    fn protect(
        &self,
        input: &mut Blob,
        entropy: &mut Blob,
        flags: u32,
    ) -> Result<RawBlob, ProtectionError> {
        self.protect_count.fetch_add(1, Ordering::SeqCst);
        self.last_flags.store(flags, Ordering::SeqCst);

        match self.behaviour {
            MockFacilityBehaviour::FailProtect(code) => Err(Self::fail(code)),
            MockFacilityBehaviour::OversizedProtectOutput => {
                let sealed = Self::seal(input.as_slice(), entropy.as_slice(), flags)?;
                Ok(self.issue_with_len(&sealed, usize::MAX))
            }
            _ => {
                let sealed = Self::seal(input.as_slice(), entropy.as_slice(), flags)?;
                Ok(self.issue(&sealed))
            }
        }
    }

    fn unprotect(
        &self,
        input: &mut Blob,
        entropy: &mut Blob,
        flags: u32,
    ) -> Result<RawBlob, ProtectionError> {
        self.unprotect_count.fetch_add(1, Ordering::SeqCst);
        self.last_flags.store(flags, Ordering::SeqCst);

        if let MockFacilityBehaviour::FailUnprotect(code) = self.behaviour {
            return Err(Self::fail(code));
        }

        let plaintext = Self::open(input.as_slice(), entropy.as_slice())?;

        match self.behaviour {
            MockFacilityBehaviour::OversizedUnprotectOutput => {
                Ok(self.issue_with_len(&plaintext, usize::MAX))
            }
            _ => Ok(self.issue(&plaintext)),
        }
    }

    unsafe fn release(&self, blob: RawBlob) {
        self.release_count.fetch_add(1, Ordering::SeqCst);

        let removed = self
            .outstanding
            .lock()
            .ok()
            .and_then(|mut map| map.remove(&(blob.ptr as usize)));

        match removed {
            Some(storage) if storage.iter().all(|&b| b == 0) => {
                self.wiped_releases.fetch_add(1, Ordering::SeqCst);
            }
            Some(_) => {}
            None => {
                self.foreign_releases.fetch_add(1, Ordering::SeqCst);
            }
        }
    }
}

fn apply_keystream(data: &[u8], nonce: &[u8], entropy: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());

    for (counter, chunk) in data.chunks(32).enumerate() {
        let block = Sha256::new()
            .chain_update(b"stream")
            .chain_update(nonce)
            .chain_update((entropy.len() as u64).to_le_bytes())
            .chain_update(entropy)
            .chain_update((counter as u64).to_le_bytes())
            .finalize();

        out.extend(chunk.iter().zip(block.iter()).map(|(a, b)| a ^ b));
    }

    out
}

fn tag(scope: u8, nonce: &[u8], entropy: &[u8], plaintext: &[u8]) -> [u8; TAG_LEN] {
    Sha256::new()
        .chain_update(b"tag")
        .chain_update([scope])
        .chain_update(nonce)
        .chain_update((entropy.len() as u64).to_le_bytes())
        .chain_update(entropy)
        .chain_update(plaintext)
        .finalize()
        .into()
}
