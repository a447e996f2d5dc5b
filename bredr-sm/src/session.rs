use crate::key_size::KeySizePolicy;
use crate::toolbox::{e1, kdf, Aco};
use crate::{BluetoothDeviceAddress, Error};

/// The values of one legacy session
///
/// These are the raw values exchanged (or held) by two devices that authenticate each other
/// with the link key and then start encryption. The challenge `au_rand` is sent to the device with
/// the `address`, and `key_size` is the negotiated encryption key size.
///
/// ```
/// use bredr_sm::{BluetoothDeviceAddress, LegacySession};
///
/// let session = LegacySession {
///     link_key: 0x97773CA35380352AEBB317027C360BEE,
///     address: "F9:F1:04:36:4E:40".parse().unwrap(),
///     au_rand: 0,
///     en_rand: 0,
///     key_size: 16,
/// };
///
/// assert_eq!(0x674444bf_8008b7d1_1e30d372_43392579, session.session_key().unwrap());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LegacySession {
    pub link_key: u128,
    pub address: BluetoothDeviceAddress,
    pub au_rand: u128,
    pub en_rand: u128,
    pub key_size: usize,
}

impl LegacySession {
    /// Create a new session with random challenges
    ///
    /// `AU_RAND` and `EN_RAND` are generated with the system's random number generator.
    #[cfg(feature = "sys-rand")]
    pub fn new_random(link_key: u128, address: BluetoothDeviceAddress, key_size: usize) -> Self {
        LegacySession {
            link_key,
            address,
            au_rand: crate::toolbox::rand_u128(),
            en_rand: crate::toolbox::rand_u128(),
            key_size,
        }
    }

    /// Get the expected response (`SRES`) of the challenged device
    pub fn authentication_response(&self) -> u32 {
        e1(self.link_key, self.au_rand, self.address).0
    }

    /// Get the authenticated ciphering offset of this session
    pub fn aco(&self) -> Aco {
        e1(self.link_key, self.au_rand, self.address).1
    }

    /// Check the response of the challenged device
    pub fn verify(&self, sres: u32) -> bool {
        self.authentication_response() == sres
    }

    /// Derive the session key `Kc'`
    ///
    /// # Error
    /// [`InvalidEntropy`](Error::InvalidEntropy) is returned if the key size is not within
    /// `1..=16`.
    pub fn session_key(&self) -> Result<u128, Error> {
        kdf(self.link_key, self.au_rand, self.en_rand, self.address, self.key_size)
    }

    /// Derive the session key `Kc'` if the key size is accepted by `policy`
    ///
    /// # Error
    /// [`KeySizeRejected`](Error::KeySizeRejected) is returned if the key size is not accepted by
    /// the policy.
    pub fn session_key_with_policy(&self, policy: &KeySizePolicy) -> Result<u128, Error> {
        let key_size = policy.negotiate(self.key_size)?;

        kdf(self.link_key, self.au_rand, self.en_rand, self.address, key_size.get())
    }
}
