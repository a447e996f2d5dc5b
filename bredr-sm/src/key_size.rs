//! Encryption key size
//!
//! The encryption key size (the *entropy* `L` of the session key) is negotiated by the two devices
//! over LMP. It is the number of bytes of entropy the session key `Kc'` carries, the key itself is
//! always 128 bits.
//!
//! A [`KeySizePolicy`] is the range of key sizes a device accepts. The default policy follows the
//! Bluetooth Core Specification erratum for the KNOB attack and accepts a minimum of seven bytes.

use crate::Error;
use core::fmt;

/// The maximum encryption key size (in bytes)
pub const ENCRYPTION_KEY_MAX_SIZE: usize = 16;

/// The smallest encryption key size (in bytes) that can be derived
pub const ENCRYPTION_KEY_MIN_SIZE: usize = 1;

/// The smallest encryption key size accepted by the default [`KeySizePolicy`]
pub const DEFAULT_MIN_KEY_SIZE: usize = 7;

/// A validated encryption key size
///
/// This is always within `1..=16` bytes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct EncryptionKeySize(u8);

impl EncryptionKeySize {
    /// The full entropy key size
    pub const MAX: EncryptionKeySize = EncryptionKeySize(ENCRYPTION_KEY_MAX_SIZE as u8);

    /// Create a new `EncryptionKeySize`
    ///
    /// # Error
    /// An error is returned if `size` is not within `1..=16`.
    pub fn new(size: usize) -> Result<Self, Error> {
        if (ENCRYPTION_KEY_MIN_SIZE..=ENCRYPTION_KEY_MAX_SIZE).contains(&size) {
            Ok(EncryptionKeySize(size as u8))
        } else {
            Err(Error::InvalidEntropy(size))
        }
    }

    /// Get the size in bytes
    pub fn get(self) -> usize {
        self.0.into()
    }

    /// Check if the key is not reduced
    pub fn is_full_entropy(self) -> bool {
        self == Self::MAX
    }
}

impl TryFrom<usize> for EncryptionKeySize {
    type Error = Error;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        Self::new(size)
    }
}

impl TryFrom<u8> for EncryptionKeySize {
    type Error = Error;

    fn try_from(size: u8) -> Result<Self, Self::Error> {
        Self::new(size.into())
    }
}

impl From<EncryptionKeySize> for u8 {
    fn from(size: EncryptionKeySize) -> Self {
        size.0
    }
}

impl From<EncryptionKeySize> for usize {
    fn from(size: EncryptionKeySize) -> Self {
        size.get()
    }
}

impl fmt::Display for EncryptionKeySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bytes", self.0)
    }
}

/// The range of accepted encryption key sizes
///
/// A deserialized policy is validated the same way as [`KeySizePolicy::new`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawKeySizePolicy"))]
pub struct KeySizePolicy {
    min: EncryptionKeySize,
    max: EncryptionKeySize,
}

/// The unvalidated form of a `KeySizePolicy`
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawKeySizePolicy {
    min: u8,
    max: u8,
}

#[cfg(feature = "serde")]
impl TryFrom<RawKeySizePolicy> for KeySizePolicy {
    type Error = Error;

    fn try_from(raw: RawKeySizePolicy) -> Result<Self, Self::Error> {
        KeySizePolicy::new(raw.min.into(), raw.max.into())
    }
}

impl KeySizePolicy {
    /// Create a new `KeySizePolicy`
    ///
    /// # Error
    /// An error is returned if either `min` or `max` is not a valid encryption key size or if `min`
    /// is larger than `max`.
    pub fn new(min: usize, max: usize) -> Result<Self, Error> {
        let min = EncryptionKeySize::new(min)?;
        let max = EncryptionKeySize::new(max)?;

        if min > max {
            return Err(Error::InvalidEntropy(min.get()));
        }

        Ok(KeySizePolicy { min, max })
    }

    /// A policy that accepts every key size
    ///
    /// This is needed for computing the keys of sessions that were downgraded below the minimum of
    /// the default policy.
    pub fn permissive() -> Self {
        KeySizePolicy {
            min: EncryptionKeySize(ENCRYPTION_KEY_MIN_SIZE as u8),
            max: EncryptionKeySize::MAX,
        }
    }

    /// Get the smallest accepted key size
    pub fn min(&self) -> EncryptionKeySize {
        self.min
    }

    /// Get the largest accepted key size
    pub fn max(&self) -> EncryptionKeySize {
        self.max
    }

    /// Check if `size` is accepted by this policy
    pub fn accepts(&self, size: usize) -> bool {
        (self.min.get()..=self.max.get()).contains(&size)
    }

    /// Validate a requested key size against this policy
    ///
    /// # Error
    /// [`KeySizeRejected`](Error::KeySizeRejected) is returned when `requested` is not accepted.
    pub fn negotiate(&self, requested: usize) -> Result<EncryptionKeySize, Error> {
        if self.accepts(requested) {
            EncryptionKeySize::new(requested)
        } else {
            log::warn!(
                "(KDF) rejected encryption key size of {} bytes, the policy accepts {} to {}",
                requested,
                self.min,
                self.max
            );

            Err(Error::KeySizeRejected {
                requested,
                min: self.min.get(),
                max: self.max.get(),
            })
        }
    }
}

impl Default for KeySizePolicy {
    fn default() -> Self {
        KeySizePolicy {
            min: EncryptionKeySize(DEFAULT_MIN_KEY_SIZE as u8),
            max: EncryptionKeySize::MAX,
        }
    }
}
