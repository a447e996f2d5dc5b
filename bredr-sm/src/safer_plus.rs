//! The SAFER+ round function
//!
//! `Ar` is the SAFER+ block cipher as it is used by the BR/EDR hash function `H`. The plain
//! `Ar` and the modified `A'r` differ only by the input of the third round, `A'r` adds the
//! input of the first round to it. Both are a single function here, [`ar`], selected by the
//! `is_second_pass` flag.
//!
//! # Rounds
//! Every round mixes in two subkeys, the odd subkey before the substitution layer and the even
//! subkey after it. The substitution layer uses the exponentiation table `e(x) = 45^x mod 257`
//! at the positions 0, 3, 4, 7, 8, 11, 12 and 15 and the logarithm (the inverse of `e`) at the
//! other positions. The round ends with four layers of the Pseudo-Hadamard transform with the
//! *Armenian shuffle* permutation between them. After the eighth round the seventeenth subkey is
//! mixed in.

use crate::Error;
use core::fmt;

/// The number of bytes in a block
pub const BLOCK_LEN: usize = 16;

/// The number of rounds of `Ar`
pub const ROUNDS: usize = 8;

/// The number of subkeys within a key schedule
pub const SUBKEY_COUNT: usize = 2 * ROUNDS + 1;

/// A 128 bit block
pub type Block = [u8; BLOCK_LEN];

const fn exp_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut value: u16 = 1;
    let mut index = 0;

    while index < 256 {
        // 45^128 mod 257 is 256, which is stored as zero
        table[index] = (value % 256) as u8;

        value = (value * 45) % 257;

        index += 1;
    }

    table
}

const fn log_table(exp: &[u8; 256]) -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut index = 0;

    while index < 256 {
        table[exp[index] as usize] = index as u8;

        index += 1;
    }

    table
}

/// Bias vectors `B2` to `B17`
///
/// Byte `i` of bias vector `N` is `e(e(17N + i + 1))`. Entries zero and one are unused.
const fn bias_table(exp: &[u8; 256]) -> [Block; SUBKEY_COUNT + 1] {
    let mut table = [[0u8; BLOCK_LEN]; SUBKEY_COUNT + 1];
    let mut n = 2;

    while n <= SUBKEY_COUNT {
        let mut i = 0;

        while i < BLOCK_LEN {
            table[n][i] = exp[exp[(17 * n + i + 1) % 256] as usize];

            i += 1;
        }

        n += 1;
    }

    table
}

const EXP: [u8; 256] = exp_table();

const LOG: [u8; 256] = log_table(&EXP);

const BIAS: [Block; SUBKEY_COUNT + 1] = bias_table(&EXP);

/// The Armenian shuffle
///
/// Byte `j` of the output is byte `PERMUTATION[j]` of the input.
const PERMUTATION: [usize; BLOCK_LEN] = [8, 11, 12, 15, 2, 1, 6, 5, 10, 9, 14, 13, 0, 7, 4, 3];

/// Constants of the offset used to create `K~` from `K`
const TILDE_OFFSET: [u8; 8] = [233, 229, 223, 193, 179, 167, 149, 131];

/// Check if the byte at `position` uses XOR for odd subkeys and `e` in the substitution layer
const fn is_exp_position(position: usize) -> bool {
    matches!(position % 4, 0 | 3)
}

/// The exponentiation half of the substitution layer
pub fn nonlinear_forward(byte: u8) -> u8 {
    EXP[byte as usize]
}

/// The logarithm half of the substitution layer
///
/// This is the inverse of [`nonlinear_forward`].
pub fn nonlinear_inverse(byte: u8) -> u8 {
    LOG[byte as usize]
}

/// Mix in an odd numbered subkey
///
/// Bytes at the exponentiation positions are combined by XOR, the others by addition modulo 256.
pub fn mix_odd(l: &Block, r: &Block) -> Block {
    core::array::from_fn(|i| {
        if is_exp_position(i) {
            l[i] ^ r[i]
        } else {
            l[i].wrapping_add(r[i])
        }
    })
}

/// Mix in an even numbered subkey
///
/// This is the complement of [`mix_odd`], bytes at the exponentiation positions are added and the
/// others are combined by XOR.
pub fn mix_even(l: &Block, r: &Block) -> Block {
    core::array::from_fn(|i| {
        if is_exp_position(i) {
            l[i].wrapping_add(r[i])
        } else {
            l[i] ^ r[i]
        }
    })
}

/// The substitution layer
pub fn nonlinear(block: &Block) -> Block {
    core::array::from_fn(|i| {
        if is_exp_position(i) {
            nonlinear_forward(block[i])
        } else {
            nonlinear_inverse(block[i])
        }
    })
}

/// The two byte Pseudo-Hadamard transform
pub fn pht(x: u8, y: u8) -> (u8, u8) {
    (x.wrapping_mul(2).wrapping_add(y), x.wrapping_add(y))
}

/// Apply [`pht`] to each of the eight byte pairs of a block
pub fn pht_block(block: &Block) -> Block {
    let mut out = [0u8; BLOCK_LEN];

    for (pair, out_pair) in block.chunks_exact(2).zip(out.chunks_exact_mut(2)) {
        let (x, y) = pht(pair[0], pair[1]);

        out_pair[0] = x;
        out_pair[1] = y;
    }

    out
}

/// The Armenian shuffle
pub fn permute(block: &Block) -> Block {
    core::array::from_fn(|j| block[PERMUTATION[j]])
}

/// Create `K~`, the key of the second pass of `H`, from the key `K`
pub fn tilde(key: &Block) -> Block {
    core::array::from_fn(|i| {
        let offset = TILDE_OFFSET[i % 8];

        // the add positions flip after the eighth byte
        if (i % 2 == 0) == (i < 8) {
            key[i].wrapping_add(offset)
        } else {
            key[i] ^ offset
        }
    })
}

/// The subkeys of `Ar`
///
/// The seventeen subkeys are derived from a 128 bit key. A seventeenth byte, the XOR of all the
/// key bytes, is appended to the key. The first subkey is the key itself, and for every
/// following subkey each of the seventeen bytes is rotated left by three bits, a sixteen byte
/// window is selected starting one byte further than the window of the previous subkey, and the
/// bias vector of the subkey is added to the window.
#[derive(Clone, PartialEq, Eq)]
pub struct SubkeySchedule {
    subkeys: [Block; SUBKEY_COUNT],
}

impl SubkeySchedule {
    /// Derive the key schedule for `key`
    pub fn new(key: &Block) -> Self {
        let mut register = [0u8; BLOCK_LEN + 1];

        register[..BLOCK_LEN].copy_from_slice(key);

        register[BLOCK_LEN] = key.iter().fold(0, |parity, byte| parity ^ byte);

        let mut subkeys = [[0u8; BLOCK_LEN]; SUBKEY_COUNT];

        subkeys[0].copy_from_slice(&register[..BLOCK_LEN]);

        for n in 2..=SUBKEY_COUNT {
            register.iter_mut().for_each(|byte| *byte = byte.rotate_left(3));

            subkeys[n - 1] =
                core::array::from_fn(|j| register[(n - 1 + j) % (BLOCK_LEN + 1)].wrapping_add(BIAS[n][j]));
        }

        SubkeySchedule { subkeys }
    }

    /// Derive the key schedule for a key within a slice
    ///
    /// # Error
    /// An error is returned if `key` is not sixteen bytes.
    pub fn try_from_slice(key: &[u8]) -> Result<Self, Error> {
        let key = <&Block>::try_from(key).map_err(|_| Error::InvalidLength {
            expected: BLOCK_LEN,
            found: key.len(),
        })?;

        Ok(Self::new(key))
    }

    /// Get subkey `K[index]`
    ///
    /// `None` is returned if `index` is not within `1..=17`.
    pub fn subkey(&self, index: usize) -> Option<&Block> {
        index.checked_sub(1).and_then(|index| self.subkeys.get(index))
    }

    /// `index` is always within `1..=17` for the rounds of `Ar`
    fn round_key(&self, index: usize) -> &Block {
        &self.subkeys[index - 1]
    }
}

impl fmt::Debug for SubkeySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SubkeySchedule { .. }")
    }
}

/// The intermediate values of one run of `Ar`
///
/// Slot 1 is the input, slots 2 through 9 are the outputs of the eight rounds, and slot 10 is the
/// output of `Ar`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundTrace {
    slots: [Block; 10],
}

impl RoundTrace {
    /// Get the block at `slot`
    ///
    /// `None` is returned if `slot` is not within `1..=10`.
    pub fn get(&self, slot: usize) -> Option<&Block> {
        slot.checked_sub(1).and_then(|index| self.slots.get(index))
    }

    /// Get the input of `Ar`
    pub fn input(&self) -> &Block {
        &self.slots[0]
    }

    /// Get the output of `Ar`
    pub fn output(&self) -> &Block {
        &self.slots[9]
    }
}

/// Run `Ar` (or `A'r` when `is_second_pass` is true) over `input`
pub fn ar(schedule: &SubkeySchedule, input: &Block, is_second_pass: bool) -> Block {
    *ar_traced(schedule, input, is_second_pass).output()
}

/// Run `Ar` and keep every intermediate round output
pub fn ar_traced(schedule: &SubkeySchedule, input: &Block, is_second_pass: bool) -> RoundTrace {
    let mut slots = [[0u8; BLOCK_LEN]; 10];

    slots[0] = *input;

    let mut state = *input;

    for round in 1..=ROUNDS {
        if is_second_pass && round == 3 {
            state = mix_odd(&state, input);
        }

        state = mix_odd(&state, schedule.round_key(2 * round - 1));

        state = nonlinear(&state);

        state = mix_even(&state, schedule.round_key(2 * round));

        state = pht_block(&state);

        for _ in 0..3 {
            state = pht_block(&permute(&state));
        }

        log_trace!("SAFER+", "round {} output: {:02x?}", round, state);

        slots[round] = state;
    }

    slots[9] = mix_odd(&state, schedule.round_key(SUBKEY_COUNT));

    RoundTrace { slots }
}
