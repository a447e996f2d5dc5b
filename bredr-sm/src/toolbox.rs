//! The Legacy Cryptographic Toolbox
//!
//! This contains the functions of BR/EDR legacy authentication and encryption as they are
//! defined in the Bluetooth Specification v5.0 | Vol 2, Part H, section 6: *Key Generation
//! Functions* and section 4: *Encryption Key Size Reduction*.
//!
//! # The Algorithms
//! * [`e1`] is the authentication function. It produces the signed response `SRES` and the
//!   authenticated ciphering offset `ACO`.
//! * [`e3`] is the encryption key generation function. It produces the encryption key `Kc` from
//!   the link key, `EN_RAND` and the ciphering offset `COF`.
//! * [`es`] is the encryption key size reduction. It reduces the entropy of `Kc` to `L` bytes.
//! * [`kdf`] chains the above to produce the session key `Kc'`.
//!
//! [`mac`] and [`mkdf`] are an enhanced key derivation where both devices contribute a
//! diversification nonce to the encryption key.
//!
//! # Note
//! For the functions defined in the specification, all `u128` inputs and outputs are the 16 byte
//! blocks in big-endian order. A [`BluetoothDeviceAddress`] is always in the order it is
//! transferred over the HCI, these functions reverse it where it is needed.

use crate::hash::{compose, expand_cyclic};
use crate::key_size::EncryptionKeySize;
use crate::{BluetoothDeviceAddress, Error};
use bredr_core::gf2::{mod_multiply, multiply, Polynomial};
use rand_core::{CryptoRng, RngCore};

/// The number of bytes of `SRES`
pub const SRES_LEN: usize = 4;

/// The number of bytes of the authenticated ciphering offset
pub const ACO_LEN: usize = 12;

/// The number of bytes of the ciphering offset
pub const COF_LEN: usize = ACO_LEN;

/// The polynomials `g1(x)` of the key size reduction indexed by the key size
///
/// The polynomial for a key size of 16 bytes is `x^128`, it is never used as a sixteen byte key is
/// not reduced.
const G1: [u128; 17] = [
    0,
    0x0000_0000_0000_0000_0000_0000_0000_011D,
    0x0000_0000_0000_0000_0000_0000_0001_003F,
    0x0000_0000_0000_0000_0000_0000_0100_00DB,
    0x0000_0000_0000_0000_0000_0001_0000_00AF,
    0x0000_0000_0000_0000_0000_0100_0000_0039,
    0x0000_0000_0000_0000_0001_0000_0000_0291,
    0x0000_0000_0000_0000_0100_0000_0000_0095,
    0x0000_0000_0000_0001_0000_0000_0000_001B,
    0x0000_0000_0000_0100_0000_0000_0000_0609,
    0x0000_0000_0001_0000_0000_0000_0000_0215,
    0x0000_0000_0100_0000_0000_0000_0000_013B,
    0x0000_0001_0000_0000_0000_0000_0000_00DD,
    0x0000_0100_0000_0000_0000_0000_0000_049D,
    0x0001_0000_0000_0000_0000_0000_0000_014F,
    0x0100_0000_0000_0000_0000_0000_0000_00E7,
    0,
];

/// The polynomials `g2(x)` of the key size reduction indexed by the key size
const G2: [u128; 17] = [
    0,
    0x00E2_75A0_ABD2_18D4_CF92_8B9B_BF6C_B08F,
    0x0001_E3F6_3D76_59B3_7F18_C258_CFF6_EFEF,
    0x0000_01BE_F66C_6C3A_B103_0A5A_1919_808B,
    0x0000_0001_6AB8_9969_DE17_467F_D373_6AD9,
    0x0000_0000_0163_0632_91DA_50EC_5571_5247,
    0x0000_0000_0000_2C93_52AA_6CC0_5446_8311,
    0x0000_0000_0000_00B3_F7FF_FCE2_79F3_A073,
    0x0000_0000_0000_0000_A1AB_815B_C7EC_8025,
    0x0000_0000_0000_0000_0002_C980_11D8_B04D,
    0x0000_0000_0000_0000_0000_058E_24F9_A4BB,
    0x0000_0000_0000_0000_0000_000C_A760_24D7,
    0x0000_0000_0000_0000_0000_0000_1C9C_26B9,
    0x0000_0000_0000_0000_0000_0000_0026_D9E3,
    0x0000_0000_0000_0000_0000_0000_0000_4377,
    0x0000_0000_0000_0000_0000_0000_0000_0089,
    0x0000_0000_0000_0000_0000_0000_0000_0001,
];

/// The authenticated ciphering offset
///
/// This is the last twelve bytes of the output of [`e1`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aco(pub [u8; ACO_LEN]);

impl Aco {
    pub fn to_bytes(self) -> [u8; ACO_LEN] {
        self.0
    }
}

impl From<[u8; ACO_LEN]> for Aco {
    fn from(aco: [u8; ACO_LEN]) -> Self {
        Aco(aco)
    }
}

/// The ciphering offset
///
/// The ciphering offset used by [`e3`] is the ACO for point-to-point encryption or the address of
/// the master concatenated with itself for broadcast encryption.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cof(pub [u8; COF_LEN]);

impl Cof {
    /// Create a ciphering offset from an authenticated ciphering offset
    pub fn from_aco(aco: Aco) -> Self {
        Cof(aco.0)
    }

    /// Create the broadcast ciphering offset from the address of the master
    pub fn from_master_address(master: BluetoothDeviceAddress) -> Self {
        let address = master.to_be_bytes();

        let mut cof = [0u8; COF_LEN];

        cof[..address.len()].copy_from_slice(&address);
        cof[address.len()..].copy_from_slice(&address);

        Cof(cof)
    }

    pub fn to_bytes(self) -> [u8; COF_LEN] {
        self.0
    }
}

impl From<Aco> for Cof {
    fn from(aco: Aco) -> Self {
        Cof::from_aco(aco)
    }
}

/// Authentication function *E1*
///
/// # Inputs
/// - k: the link key
/// - rand: the challenge `AU_RAND`
/// - address: the address of the verifying device
///
/// The return is the tuple (`SRES`, `ACO`).
pub fn e1(k: u128, rand: u128, address: BluetoothDeviceAddress) -> (u32, Aco) {
    let output = *compose(&k.to_be_bytes(), &rand.to_be_bytes(), &expand_cyclic(&address.to_be_bytes())).output();

    let mut sres = [0u8; SRES_LEN];
    let mut aco = [0u8; ACO_LEN];

    sres.copy_from_slice(&output[..SRES_LEN]);
    aco.copy_from_slice(&output[SRES_LEN..]);

    (u32::from_be_bytes(sres), Aco(aco))
}

/// Encryption key generation function *E3*
///
/// # Inputs
/// - k: the link key
/// - rand: `EN_RAND`
/// - cof: the ciphering offset
///
/// The return is the encryption key `Kc`.
pub fn e3(k: u128, rand: u128, cof: Cof) -> u128 {
    let output = *compose(&k.to_be_bytes(), &rand.to_be_bytes(), &expand_cyclic(&cof.0)).output();

    u128::from_be_bytes(output)
}

/// Encryption key size reduction *Es*
///
/// This reduces the entropy of `kc` to `entropy` bytes. The reduced key is
///
/// ```text
/// Kc'(x) = g2(x) * (Kc(x) mod g1(x))
/// ```
///
/// where the polynomials `g1` and `g2` depend on the key size. `Kc` is the polynomial whose
/// coefficient of x<sup>127</sup> is the most significant bit of `kc`. A key size of sixteen does
/// not change the key.
///
/// # Error
/// * [`InvalidEntropy`](Error::InvalidEntropy) is returned when `entropy` is not within
///   `1..=16`.
/// * [`StructuralInvariantViolation`](Error::StructuralInvariantViolation) is returned (only with
///   debug assertions) if `Kc mod g1` is wider than `entropy` bytes.
pub fn es(kc: u128, entropy: usize) -> Result<u128, Error> {
    let entropy = EncryptionKeySize::new(entropy)?;

    if entropy.is_full_entropy() {
        return Ok(kc);
    }

    let l = entropy.get();

    let g1 = Polynomial::from_u128(G1[l], 128);

    let g2 = Polynomial::from_u128(G2[l], 128);

    let kc_mod_g1 = mod_multiply(&Polynomial::from_u128(kc, 128), &Polynomial::one(128), &g1, 128)?;

    check_reduction(&kc_mod_g1, l)?;

    // deg(g1) + deg(g2) is at most 128, so the low 128 coefficients are the entire product
    multiply(&g2, &kc_mod_g1)
        .resized(128)
        .to_u128()
        .ok_or(Error::StructuralInvariantViolation)
}

/// Check that `Kc mod g1` has no more than `entropy` bytes
fn check_reduction(kc_mod_g1: &Polynomial, entropy: usize) -> Result<(), Error> {
    if cfg!(debug_assertions) && kc_mod_g1.bit_len() > 8 * entropy {
        log::error!(
            "(KDF) Kc mod g1 has {} significant bits for an entropy of {} bytes",
            kc_mod_g1.bit_len(),
            entropy
        );

        return Err(Error::StructuralInvariantViolation);
    }

    Ok(())
}

/// Reduce `Kc` as it is done within the key derivation
///
/// The first byte of `Kc` is the least significant byte for the key size reduction.
fn reduce(kc: u128, entropy: EncryptionKeySize) -> Result<u128, Error> {
    log_trace!("KDF", "Kc: {:032x}", kc);

    let kc_prime = es(kc.swap_bytes(), entropy.get())?.swap_bytes();

    log_trace!("KDF", "Kc': {:032x}", kc_prime);

    Ok(kc_prime)
}

/// The session key derivation
///
/// This derives the session key `Kc'` used by E0 encryption.
///
/// # Inputs
/// - link_key: the link key
/// - au_rand: the authentication challenge
/// - en_rand: the encryption random number
/// - address: the address of the device that was challenged
/// - entropy: the negotiated encryption key size
///
/// # Error
/// [`InvalidEntropy`](Error::InvalidEntropy) is returned when `entropy` is not within `1..=16`
pub fn kdf(
    link_key: u128,
    au_rand: u128,
    en_rand: u128,
    address: BluetoothDeviceAddress,
    entropy: usize,
) -> Result<u128, Error> {
    let entropy = EncryptionKeySize::new(entropy)?;

    log_debug!("KDF", "deriving session key for {} with an entropy of {}", address, entropy);

    let (_, aco) = e1(link_key, au_rand, address);

    let kc = e3(link_key, en_rand, aco.into());

    reduce(kc, entropy)
}

/// Diversifier message authentication code
///
/// This is `SRES || ACO` of [`e1`] over the diversification nonce.
///
/// `address` is in HCI order and is fed to `E1` most significant byte first, the same as for
/// [`e1`] and [`kdf`]. Implementations that pass the HCI order bytes to `E1` unreversed compute a
/// different MAC for the same address.
pub fn mac(link_key: u128, en_nonce: u128, address: BluetoothDeviceAddress) -> u128 {
    let (sres, aco) = e1(link_key, en_nonce, address);

    let mut output = [0u8; 16];

    output[..SRES_LEN].copy_from_slice(&sres.to_be_bytes());
    output[SRES_LEN..].copy_from_slice(&aco.0);

    u128::from_be_bytes(output)
}

/// The enhanced session key derivation
///
/// This is [`kdf`] where the encryption key is generated from two diversification nonces, one from
/// the central (`en_nonce_c`) and one from the peripheral (`en_nonce_p`). `Kc` is the output of
/// `E3` for the nonce of the central, and it is used as the key of a second `E3` for the nonce of
/// the peripheral.
///
/// # Error
/// [`InvalidEntropy`](Error::InvalidEntropy) is returned when `entropy` is not within `1..=16`
pub fn mkdf(
    link_key: u128,
    au_rand: u128,
    en_nonce_c: u128,
    en_nonce_p: u128,
    address: BluetoothDeviceAddress,
    entropy: usize,
) -> Result<u128, Error> {
    let entropy = EncryptionKeySize::new(entropy)?;

    log_debug!("KDF", "deriving enhanced session key for {} with an entropy of {}", address, entropy);

    let (_, aco) = e1(link_key, au_rand, address);

    let cof = Cof::from(aco);

    let kc = e3(link_key, en_nonce_c, cof);

    let kc2 = e3(kc, en_nonce_p, cof);

    reduce(kc2, entropy)
}

/// Verify the signed response of a challenged device
pub fn verify_sres(link_key: u128, au_rand: u128, address: BluetoothDeviceAddress, sres: u32) -> bool {
    let (expected, _) = e1(link_key, au_rand, address);

    expected == sres
}

/// Generate a random `u128` value with the provided generator
pub fn rand_u128_with<R: CryptoRng + RngCore>(rng: &mut R) -> u128 {
    let mut bytes = [0u8; 16];

    rng.fill_bytes(&mut bytes);

    <u128>::from_ne_bytes(bytes)
}

/// Generate a random `u128` value
#[cfg(feature = "sys-rand")]
pub fn rand_u128() -> u128 {
    rand_u128_with(&mut rand_core::OsRng)
}

/// Generate a nonce
#[cfg(feature = "sys-rand")]
pub fn nonce() -> u128 {
    rand_u128()
}
