//! Secure memory types for the two session secrets.
//!
//! This module provides:
//! - [`MasterSecret`] — the user's plaintext master password, held only for
//!   the current session
//! - [`DerivedKey`] — the 256-bit symmetric key produced by the KDF
//! - [`disable_core_dumps`] — process hardening for unlocked sessions
//!
//! Both secret types zero their memory on drop, lock their pages in RAM via
//! `mlock` (best effort), and mask `Debug`/`Display` output.

use crate::error::CryptoError;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use zeroize::Zeroize;

/// Length of a derived symmetric key in bytes (256 bits).
pub const KEY_LEN: usize = 32;

// ---------------------------------------------------------------------------
// MasterSecret
// ---------------------------------------------------------------------------

/// The user's master password.
///
/// Exists only in memory for the lifetime of a session — never persisted,
/// never logged. The inner [`SecretString`] zeroizes on drop.
pub struct MasterSecret {
    inner: SecretString,
}

impl MasterSecret {
    /// Wrap a plaintext master password.
    ///
    /// Takes ownership of the `String` so no unmanaged copy remains with
    /// the caller.
    #[must_use]
    pub fn new(secret: String) -> Self {
        Self {
            inner: SecretString::from(secret),
        }
    }

    /// Expose the password bytes for key derivation.
    ///
    /// Keep exposure minimal — prefer using the slice within a single
    /// expression rather than binding it to a long-lived variable.
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        self.inner.expose_secret().as_bytes()
    }
}

impl From<&str> for MasterSecret {
    fn from(secret: &str) -> Self {
        Self::new(secret.to_owned())
    }
}

impl fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterSecret(***)")
    }
}

impl fmt::Display for MasterSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterSecret(***)")
    }
}

// ---------------------------------------------------------------------------
// DerivedKey
// ---------------------------------------------------------------------------

/// A 256-bit symmetric key derived from the master secret.
///
/// The key lives on the heap so its address is stable across moves —
/// `mlock` is applied once at construction and `munlock` exactly once on
/// drop, after zeroization.
pub struct DerivedKey {
    bytes: Box<[u8; KEY_LEN]>,
    locked: bool,
}

impl DerivedKey {
    /// Take ownership of raw key bytes.
    ///
    /// If `mlock` fails (insufficient privileges or quota) the key is kept
    /// unlocked; zeroize-on-drop is independent of lock status.
    #[must_use]
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        let boxed = Box::new(bytes);
        let locked = platform::try_mlock(boxed.as_ptr(), KEY_LEN);
        Self {
            bytes: boxed,
            locked,
        }
    }

    /// Expose the raw key bytes for a cryptographic operation.
    #[must_use]
    pub fn expose(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Returns `true` if the key's page is currently `mlock`'d.
    #[must_use]
    pub const fn is_mlocked(&self) -> bool {
        self.locked
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
        if self.locked {
            platform::try_munlock(self.bytes.as_ptr(), KEY_LEN);
        }
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey(***)")
    }
}

impl fmt::Display for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey(***)")
    }
}

// ---------------------------------------------------------------------------
// Core dump disabling
// ---------------------------------------------------------------------------

/// Disable core dumps for the current process.
///
/// On Unix: sets `RLIMIT_CORE` to 0 (both soft and hard limits).
/// On non-Unix: no-op.
///
/// # Errors
///
/// Returns `CryptoError::SecureMemory` if the `setrlimit` call fails.
pub fn disable_core_dumps() -> Result<(), CryptoError> {
    platform::disable_core_dumps_impl()
}

// ---------------------------------------------------------------------------
// Platform-specific implementations
// ---------------------------------------------------------------------------

#[cfg(unix)]
mod platform {
    use crate::error::CryptoError;

    pub(super) fn try_mlock(ptr: *const u8, len: usize) -> bool {
        // SAFETY: mlock accepts any valid pointer/length pair; on failure
        // the kernel returns an error code and no memory is touched.
        unsafe { libc::mlock(ptr.cast(), len) == 0 }
    }

    pub(super) fn try_munlock(ptr: *const u8, len: usize) {
        // SAFETY: munlock is safe to call; failure is non-critical.
        unsafe {
            libc::munlock(ptr.cast(), len);
        }
    }

    pub(super) fn disable_core_dumps_impl() -> Result<(), CryptoError> {
        let limit = libc::rlimit {
            rlim_cur: 0,
            rlim_max: 0,
        };
        // SAFETY: setrlimit with RLIMIT_CORE is a standard POSIX call.
        let ret = unsafe { libc::setrlimit(libc::RLIMIT_CORE, &raw const limit) };
        if ret != 0 {
            return Err(CryptoError::SecureMemory(
                "failed to disable core dumps via RLIMIT_CORE".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(not(unix))]
mod platform {
    use crate::error::CryptoError;

    pub(super) fn try_mlock(_ptr: *const u8, _len: usize) -> bool {
        false
    }

    pub(super) fn try_munlock(_ptr: *const u8, _len: usize) {}

    pub(super) fn disable_core_dumps_impl() -> Result<(), CryptoError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
