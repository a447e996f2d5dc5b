//! The hash function `H`
//!
//! `H` is the hash used by both `E1` and `E3`. It takes a 128 bit key `K`, a 128 bit value `I1`
//! and an `L` byte value `I2`.
//!
//! ```text
//! H(K, I1, I2, L) = A'r([K~], [E(I2, L) + (Ar([K], I1) ^ I1)])
//! ```
//!
//! where `E(I2, L)` is the cyclic expansion of `I2` to sixteen bytes, `+` is bytewise addition
//! modulo 256 and `K~` is the [tilde](crate::safer_plus::tilde) of `K`.

use crate::safer_plus::{ar_traced, tilde, Block, RoundTrace, SubkeySchedule, BLOCK_LEN};
use crate::Error;

/// Everything computed by one evaluation of `H`
#[derive(Clone, Debug)]
pub struct HashTrace {
    pub schedule: SubkeySchedule,
    pub rounds: RoundTrace,
    pub prime_schedule: SubkeySchedule,
    pub prime_rounds: RoundTrace,
}

impl HashTrace {
    /// The output of `H`
    pub fn output(&self) -> &Block {
        self.prime_rounds.output()
    }
}

/// Expand `value` to sixteen bytes by repeating it
///
/// # Error
/// [`InvalidLength`](Error::InvalidLength) is returned if the length of `value` is not `l`. It is
/// also returned if `l` is zero or larger than sixteen, then `expected` is the closest valid
/// length (one or sixteen).
pub fn expand(value: &[u8], l: usize) -> Result<Block, Error> {
    if value.len() != l {
        return Err(Error::InvalidLength {
            expected: l,
            found: value.len(),
        });
    }

    if l == 0 || l > BLOCK_LEN {
        return Err(Error::InvalidLength {
            expected: l.clamp(1, BLOCK_LEN),
            found: l,
        });
    }

    Ok(expand_cyclic(value))
}

/// `value` must be within `1..=16` bytes
pub(crate) fn expand_cyclic(value: &[u8]) -> Block {
    core::array::from_fn(|i| value[i % value.len()])
}

/// The hash function `H`
///
/// The return is the 128 bit output block. The callers interpret it, `E1` splits it into `SRES`
/// and `ACO` where `E3` uses it as the encryption key.
///
/// # Error
/// See [`expand`]
pub fn h(key: &Block, i1: &Block, i2: &[u8], l: usize) -> Result<Block, Error> {
    h_traced(key, i1, i2, l).map(|trace| *trace.output())
}

/// The hash function `H` with every intermediate value
///
/// # Error
/// See [`expand`]
pub fn h_traced(key: &Block, i1: &Block, i2: &[u8], l: usize) -> Result<HashTrace, Error> {
    let expanded = expand(i2, l)?;

    Ok(compose(key, i1, &expanded))
}

pub(crate) fn compose(key: &Block, i1: &Block, expanded: &Block) -> HashTrace {
    let schedule = SubkeySchedule::new(key);

    let prime_schedule = SubkeySchedule::new(&tilde(key));

    let rounds = ar_traced(&schedule, i1, false);

    let mixed: Block = core::array::from_fn(|i| expanded[i].wrapping_add(rounds.output()[i] ^ i1[i]));

    let prime_rounds = ar_traced(&prime_schedule, &mixed, true);

    HashTrace {
        schedule,
        rounds,
        prime_schedule,
        prime_rounds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(value: u128) -> Block {
        value.to_be_bytes()
    }

    #[test]
    fn expand_test() {
        let aco = [0x48, 0xaf, 0xcd, 0xd4, 0xbd, 0x40, 0xfe, 0xf7, 0x66, 0x93, 0xb1, 0x13];

        assert_eq!(Ok(block(0x48afcdd4bd40fef76693b11348afcdd4)), expand(&aco, 12));

        assert_eq!(Ok([0xAB; BLOCK_LEN]), expand(&[0xAB], 1));

        assert_eq!(
            Err(Error::InvalidLength { expected: 6, found: 12 }),
            expand(&aco, 6)
        );

        assert_eq!(
            Err(Error::InvalidLength { expected: 1, found: 0 }),
            expand(&[], 0)
        );

        assert_eq!(
            Err(Error::InvalidLength { expected: 16, found: 17 }),
            expand(&[0; 17], 17)
        );
    }

    #[test]
    fn h_with_address() {
        let trace = h_traced(&[0; BLOCK_LEN], &[0; BLOCK_LEN], &[0; 6], 6).unwrap();

        assert_eq!(Some(&block(0x78d19f9307d2476a523ec7a8a026042a)), trace.rounds.get(2));

        assert_eq!(&block(0x158ffe43352085e8a5ec7a88e1ff2ba8), trace.prime_rounds.input());

        assert_eq!(&block(0x056c0fe648afcdd4bd40fef76693b113), trace.output());
    }

    #[test]
    fn h_with_offset() {
        let aco = 0x48afcdd4bd40fef76693b113u128.to_be_bytes();

        let trace = h_traced(&[0; BLOCK_LEN], &[0; BLOCK_LEN], &aco[4..], 12).unwrap();

        assert_eq!(&block(0x5d3ecb17f26083df0b7f2b9b29aef87c), trace.prime_rounds.input());

        assert_eq!(Some(&block(0xeee3e8744a5f8896de95831ed837ffd5)), trace.prime_rounds.get(8));

        assert_eq!(&block(0xcc802aecc7312285912e90af6a1e1154), trace.output());

        let key = block(0x34e86915d20c485090a6977931f96df5);
        let rand = block(0x950e604e655ea3800fe3eb4a28918087);
        let aco = 0x68f4f472b5586ac5850f5f74u128.to_be_bytes();

        let trace = h_traced(&key, &rand, &aco[4..], 12).unwrap();

        assert_eq!(Some(&block(0xd46f5a04c967f55840f83d1cdb5f9afc)), trace.rounds.get(2));

        assert_eq!(&block(0x39809afb773efd1b7510cd4cb7c49f34), trace.prime_rounds.input());

        assert_eq!(Some(&block(0x1663a4f98e2862eddd3ec2fb03dcc8a4)), trace.prime_schedule.subkey(17));

        assert_eq!(Ok(block(0xc1beafea6e747e304cf0bd7734b0a9e2)), h(&key, &rand, &aco[4..], 12));
    }

    #[test]
    fn h_rejects_mismatched_lengths() {
        assert_eq!(
            Err(Error::InvalidLength { expected: 12, found: 6 }),
            h(&[0; BLOCK_LEN], &[0; BLOCK_LEN], &[0; 6], 12)
        );
    }
}
