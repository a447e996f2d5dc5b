//! Polynomial arithmetic over GF(2)
//!
//! A [`Polynomial`] is a polynomial with binary coefficients, stored as a bit sequence of an
//! explicit width. The width does not need to match a machine word, the encryption key size
//! reduction uses 128 bit wide operands whose products are 256 bits wide. Addition of two
//! polynomials is XOR, multiplication is the carry-less (shift and XOR) product.
//!
//! The field operations take the modulus polynomial and the field width `n` of GF(2<sup>n</sup>)
//! as explicit arguments. A modulus is valid for a field when it is not zero and it has at most
//! `n + 1` significant bits (a degree of at most `n`).
//!
//! ```
//! use bredr_core::gf2::{mod_multiply, multiplicative_inverse, Polynomial};
//!
//! // The AES field, GF(2^8) modulo x^8 + x^4 + x^3 + x + 1
//! let modulus = Polynomial::from_u128(0x11B, 9);
//!
//! let a = Polynomial::from_u8(0x53);
//!
//! let inverse = multiplicative_inverse(&a, &modulus, 8).unwrap();
//!
//! assert_eq!(Polynomial::from_u8(0xCA), inverse);
//!
//! assert!(mod_multiply(&a, &inverse, &modulus, 8).unwrap().is_one());
//! ```

use crate::errors::Error;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

const LIMB_BITS: usize = 64;

fn limbs_for(width: usize) -> usize {
    (width + LIMB_BITS - 1) / LIMB_BITS
}

/// A polynomial over GF(2)
///
/// Bit `i` of the polynomial is the coefficient of x<sup>i</sup>. Every polynomial has a width,
/// the number of coefficients it holds, and no coefficient at or above the width is ever set.
///
/// Equality is by value, two polynomials of different widths are equal if all of their
/// coefficients are equal.
#[derive(Clone)]
pub struct Polynomial {
    limbs: Vec<u64>,
    width: usize,
}

impl Polynomial {
    /// Create the zero polynomial with a width of `width` bits
    pub fn zero(width: usize) -> Self {
        Polynomial {
            limbs: vec![0; limbs_for(width)],
            width,
        }
    }

    /// Create the unit polynomial
    ///
    /// The width of the unit polynomial is at least one bit.
    pub fn one(width: usize) -> Self {
        let mut one = Polynomial::zero(width.max(1));

        one.limbs[0] = 1;

        one
    }

    /// Create a polynomial from the bits of a `u128`
    ///
    /// Bits of `value` at or above `width` are dropped.
    pub fn from_u128(value: u128, width: usize) -> Self {
        let mut polynomial = Polynomial::zero(width);

        for (limb, value_limb) in polynomial.limbs.iter_mut().zip([value as u64, (value >> 64) as u64]) {
            *limb = value_limb;
        }

        polynomial.mask_unused();

        polynomial
    }

    /// Create an eight bit wide polynomial from a byte
    pub fn from_u8(value: u8) -> Self {
        Polynomial::from_u128(value.into(), 8)
    }

    /// Create a polynomial from bytes ordered with the most significant byte first
    ///
    /// The width of the polynomial is eight times the number of bytes.
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        let mut polynomial = Polynomial::zero(bytes.len() * 8);

        for (index, byte) in bytes.iter().rev().enumerate() {
            polynomial.limbs[index / 8] |= u64::from(*byte) << ((index % 8) * 8);
        }

        polynomial
    }

    /// Get the bytes of this polynomial with the most significant byte first
    ///
    /// The returned vector contains `ceil(width / 8)` bytes.
    pub fn to_be_bytes(&self) -> Vec<u8> {
        let len = (self.width + 7) / 8;

        (0..len)
            .rev()
            .map(|index| (self.limbs[index / 8] >> ((index % 8) * 8)) as u8)
            .collect()
    }

    /// Get the value of this polynomial as a `u128`
    ///
    /// `None` is returned if the degree of the polynomial is 128 or larger.
    pub fn to_u128(&self) -> Option<u128> {
        if self.bit_len() > 128 {
            return None;
        }

        let low = self.limbs.first().copied().unwrap_or_default();

        let high = self.limbs.get(1).copied().unwrap_or_default();

        Some(u128::from(high) << 64 | u128::from(low))
    }

    /// Get the width (the number of coefficients) of this polynomial
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get the degree of this polynomial
    ///
    /// `None` is returned for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.limbs
            .iter()
            .enumerate()
            .rev()
            .find(|(_, limb)| **limb != 0)
            .map(|(index, limb)| index * LIMB_BITS + (LIMB_BITS - 1) - limb.leading_zeros() as usize)
    }

    /// Get the number of significant bits of this polynomial
    ///
    /// This is the degree plus one, or zero for the zero polynomial.
    pub fn bit_len(&self) -> usize {
        self.degree().map(|degree| degree + 1).unwrap_or_default()
    }

    /// Check if this is the zero polynomial
    pub fn is_zero(&self) -> bool {
        self.limbs.iter().all(|limb| *limb == 0)
    }

    /// Check if this is the unit polynomial
    pub fn is_one(&self) -> bool {
        self.degree() == Some(0)
    }

    /// Get the coefficient of x<sup>power</sup>
    pub fn coefficient(&self, power: usize) -> bool {
        self.limbs
            .get(power / LIMB_BITS)
            .map(|limb| (limb >> (power % LIMB_BITS)) & 1 == 1)
            .unwrap_or_default()
    }

    /// Set the coefficient of x<sup>power</sup> to one
    ///
    /// # Panics
    /// `power` must be less than the width of this polynomial.
    pub fn set_coefficient(&mut self, power: usize) {
        assert!(power < self.width, "power {} is outside of the width {}", power, self.width);

        self.limbs[power / LIMB_BITS] |= 1 << (power % LIMB_BITS);
    }

    /// Create a copy of this polynomial with a different width
    ///
    /// When `width` is less than the current width the coefficients at or above `width` are
    /// dropped, which is the same as taking the polynomial modulo x<sup>width</sup>. Otherwise the
    /// polynomial is zero padded.
    pub fn resized(&self, width: usize) -> Self {
        let mut resized = Polynomial::zero(width);

        for (limb, own) in resized.limbs.iter_mut().zip(self.limbs.iter()) {
            *limb = *own;
        }

        resized.mask_unused();

        resized
    }

    /// Shrink the width to the number of significant bits (at least one)
    fn trimmed(&self) -> Self {
        self.resized(self.bit_len().max(1))
    }

    fn mask_unused(&mut self) {
        let unused = self.limbs.len() * LIMB_BITS - self.width;

        if unused != 0 {
            if let Some(last) = self.limbs.last_mut() {
                *last &= u64::MAX >> unused;
            }
        }
    }

    /// XOR `other` multiplied by x<sup>shift</sup> into `self`
    ///
    /// Coefficients that would land at or above the width of `self` are dropped.
    fn xor_shifted(&mut self, other: &Polynomial, shift: usize) {
        let limb_shift = shift / LIMB_BITS;
        let bit_shift = shift % LIMB_BITS;

        for (index, limb) in other.limbs.iter().copied().enumerate().filter(|(_, limb)| *limb != 0) {
            let low = index + limb_shift;

            if let Some(target) = self.limbs.get_mut(low) {
                *target ^= limb << bit_shift;
            }

            if bit_shift != 0 {
                if let Some(target) = self.limbs.get_mut(low + 1) {
                    *target ^= limb >> (LIMB_BITS - bit_shift);
                }
            }
        }

        self.mask_unused();
    }
}

impl PartialEq for Polynomial {
    fn eq(&self, other: &Self) -> bool {
        let len = self.limbs.len().max(other.limbs.len());

        (0..len).all(|index| self.limbs.get(index).unwrap_or(&0) == other.limbs.get(index).unwrap_or(&0))
    }
}

impl Eq for Polynomial {}

impl core::ops::BitXor for &Polynomial {
    type Output = Polynomial;

    /// Polynomial addition
    ///
    /// The width of the sum is the larger of the two widths.
    fn bitxor(self, rhs: Self) -> Polynomial {
        let mut sum = self.resized(self.width.max(rhs.width));

        sum.xor_shifted(rhs, 0);

        sum
    }
}

impl fmt::LowerHex for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_str("0x")?;
        }

        let digits = ((self.width + 3) / 4).max(1);

        for index in (0..digits).rev() {
            let nibble = (self.limbs.get(index / 16).copied().unwrap_or_default() >> ((index % 16) * 4)) & 0xF;

            write!(f, "{:x}", nibble)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Polynomial {{ width: {}, value: {:#x} }}", self.width, self)
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}

/// Validate a modulus for the field GF(2<sup>field_width</sup>)
fn check_modulus(modulus: &Polynomial, field_width: usize) -> Result<(), Error> {
    if field_width == 0 || modulus.is_zero() || modulus.bit_len() > field_width + 1 {
        Err(Error::InvalidModulus)
    } else {
        Ok(())
    }
}

/// Polynomial long division of `dividend` by a non-zero `divisor`
///
/// Both the quotient and remainder have the width of the dividend.
fn long_division(dividend: &Polynomial, divisor: &Polynomial) -> (Polynomial, Polynomial) {
    let mut quotient = Polynomial::zero(dividend.width);

    let mut remainder = dividend.clone();

    if let Some(divisor_degree) = divisor.degree() {
        while let Some(remainder_degree) = remainder.degree() {
            if remainder_degree < divisor_degree {
                break;
            }

            let shift = remainder_degree - divisor_degree;

            quotient.set_coefficient(shift);

            remainder.xor_shifted(divisor, shift);
        }
    }

    (quotient, remainder)
}

/// Polynomial multiplication
///
/// This is the product of `a` and `b` without any reduction. The width of the product is the sum
/// of the widths of `a` and `b`, which is always large enough for the product as the product of
/// an `m` bit wide polynomial and an `n` bit wide polynomial has at most `m + n - 1` significant
/// bits.
pub fn multiply(a: &Polynomial, b: &Polynomial) -> Polynomial {
    let mut product = Polynomial::zero(a.width + b.width);

    for power in (0..b.width).filter(|power| b.coefficient(*power)) {
        product.xor_shifted(a, power);
    }

    product
}

/// Polynomial division within the field GF(2<sup>field_width</sup>)
///
/// The return is the tuple (quotient, remainder). The quotient has the width of `a`, and the
/// remainder has a width of `field_width`.
///
/// # Error
/// [`InvalidModulus`](Error::InvalidModulus) is returned if `modulus` is zero, has a degree
/// larger than `field_width`, or `field_width` is zero.
pub fn divmod(a: &Polynomial, modulus: &Polynomial, field_width: usize) -> Result<(Polynomial, Polynomial), Error> {
    check_modulus(modulus, field_width)?;

    let (quotient, remainder) = long_division(a, modulus);

    Ok((quotient, remainder.resized(field_width)))
}

/// Modular multiplication within the field GF(2<sup>field_width</sup>)
///
/// This is the remainder of the product of `a` and `b` divided by `modulus`.
///
/// # Error
/// See [`divmod`]
pub fn mod_multiply(
    a: &Polynomial,
    b: &Polynomial,
    modulus: &Polynomial,
    field_width: usize,
) -> Result<Polynomial, Error> {
    check_modulus(modulus, field_width)?;

    let (_, remainder) = long_division(&multiply(a, b), modulus);

    Ok(remainder.resized(field_width))
}

/// Multiplicative inverse within the field GF(2<sup>field_width</sup>)
///
/// This uses the extended Euclidean algorithm over polynomials. The inverse is returned reduced
/// by `modulus` with a width of `field_width`.
///
/// # Error
/// * [`NoInverse`](Error::NoInverse) is returned when the greatest common divisor of `a` and
///   `modulus` is not one. This always is the case for the zero polynomial.
/// * [`InvalidModulus`](Error::InvalidModulus), see [`divmod`].
pub fn multiplicative_inverse(a: &Polynomial, modulus: &Polynomial, field_width: usize) -> Result<Polynomial, Error> {
    check_modulus(modulus, field_width)?;

    let (_, reduced) = long_division(a, modulus);

    if reduced.is_zero() {
        return Err(Error::NoInverse);
    }

    let mut r_previous = modulus.trimmed();
    let mut r_current = reduced.trimmed();

    let mut s_previous = Polynomial::zero(1);
    let mut s_current = Polynomial::one(1);

    let mut steps = 0usize;

    while !r_current.is_zero() {
        let (quotient, remainder) = long_division(&r_previous, &r_current);

        let s_next = &s_previous ^ &multiply(&quotient, &s_current);

        r_previous = core::mem::replace(&mut r_current, remainder.trimmed());

        s_previous = core::mem::replace(&mut s_current, s_next.trimmed());

        steps += 1;
    }

    log::trace!("(GF2) euclidean algorithm finished after {} steps", steps);

    if !r_previous.is_one() {
        return Err(Error::NoInverse);
    }

    let (_, inverse) = long_division(&s_previous, modulus);

    Ok(inverse.resized(field_width))
}
