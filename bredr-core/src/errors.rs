//! `bredr` Errors
//!
//! These are errors that are used by the libraries within `bredr`.

use core::fmt::{self, Display, Formatter};

/// A key derivation error
///
/// Every fallible operation of the `bredr` libraries returns this error. Input shape errors
/// (`InvalidLength`, `InvalidEntropy`, `InvalidFormat`) are detected when a function is entered
/// and before any part of the computation is done. The functions are deterministic, so retrying
/// an operation that returned an error will return the same error.
///
/// ### `NoInverse`
/// Not every polynomial has a multiplicative inverse for a given modulus. `NoInverse` is a valid
/// outcome of [`multiplicative_inverse`] and does not mean something went wrong, see
/// [`is_domain_outcome`](Error::is_domain_outcome).
///
/// ### `StructuralInvariantViolation`
/// This is returned when an internal consistency check fails. It can only be returned when
/// debug assertions are enabled and it always means there is a bug within the implementation.
///
/// [`multiplicative_inverse`]: crate::gf2::multiplicative_inverse
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A fixed size input did not have the mandated number of bytes
    InvalidLength { expected: usize, found: usize },
    /// The entropy (encryption key size in bytes) is not within the range `1..=16`
    InvalidEntropy(usize),
    /// The modulus polynomial is zero or too wide for the stated field
    InvalidModulus,
    /// The polynomial has no multiplicative inverse for the modulus
    NoInverse,
    /// An internal consistency check failed
    StructuralInvariantViolation,
    /// The negotiated encryption key size is not accepted by the key size policy
    KeySizeRejected { requested: usize, min: usize, max: usize },
    /// The text form of a value could not be parsed
    InvalidFormat,
}

impl Error {
    /// Check if this error is a valid outcome of an operation
    ///
    /// Only `NoInverse` is a domain outcome, every other error is either the fault of the input or
    /// a bug.
    pub fn is_domain_outcome(&self) -> bool {
        matches!(self, Error::NoInverse)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Error::InvalidLength { expected, found } => {
                write!(f, "invalid length, expected {expected} bytes but found {found}")
            }
            Error::InvalidEntropy(entropy) => write!(
                f,
                "invalid entropy of {entropy} bytes, the entropy must be within 1 to 16 bytes"
            ),
            Error::InvalidModulus => f.write_str("the modulus polynomial is invalid for the field"),
            Error::NoInverse => f.write_str("no multiplicative inverse exists"),
            Error::StructuralInvariantViolation => f.write_str("structural invariant violation"),
            Error::KeySizeRejected { requested, min, max } => write!(
                f,
                "encryption key size of {requested} bytes rejected, the accepted sizes are {min} to \
                {max} bytes"
            ),
            Error::InvalidFormat => f.write_str("invalid format"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
