//! Core types for BR/EDR legacy key derivation
//!
//! This contains the types shared by the other `bredr-*` libraries. The error taxonomy lives in
//! [`errors`], the polynomial arithmetic over GF(2) used by the encryption key size reduction
//! lives in [`gf2`], and the Bluetooth device address type is defined here.
//!
//! Nothing within this library performs I/O and nothing keeps mutable state between calls, so
//! every function is safe to call from any number of threads at once.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod errors;
pub mod gf2;

pub use errors::Error;

use core::fmt;
use core::str::FromStr;

/// The number of octets within a Bluetooth device address
pub const BD_ADDR_LEN: usize = 6;

/// A Bluetooth device address (BD_ADDR)
///
/// The address is stored in the same order it is transferred over the HCI, the least significant
/// octet is the first octet. Any cryptographic function that needs the address most significant
/// octet first (such as `E1`) is responsible for reversing it, see
/// [`to_be_bytes`](BluetoothDeviceAddress::to_be_bytes).
///
/// The text form of an address is the conventional most significant octet first form. Both
/// `"40:4E:36:04:F1:F9"` and `"404E3604F1F9"` parse into the same address.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BluetoothDeviceAddress(pub [u8; BD_ADDR_LEN]);

impl BluetoothDeviceAddress {
    /// Create an address of all zeros
    pub const fn zeroed() -> Self {
        BluetoothDeviceAddress([0; BD_ADDR_LEN])
    }

    /// Create an address from octets in most significant octet first order
    pub fn from_be_bytes(mut bytes: [u8; BD_ADDR_LEN]) -> Self {
        bytes.reverse();

        BluetoothDeviceAddress(bytes)
    }

    /// Get the octets of the address with the most significant octet first
    pub fn to_be_bytes(self) -> [u8; BD_ADDR_LEN] {
        let mut bytes = self.0;

        bytes.reverse();

        bytes
    }

    /// Get the octets of the address with the least significant octet first
    pub fn to_le_bytes(self) -> [u8; BD_ADDR_LEN] {
        self.0
    }

    /// Try to create an address from a slice of octets in least significant octet first order
    ///
    /// # Error
    /// An error is returned if the length of `slice` is not six.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, Error> {
        let address = <[u8; BD_ADDR_LEN]>::try_from(slice).map_err(|_| Error::InvalidLength {
            expected: BD_ADDR_LEN,
            found: slice.len(),
        })?;

        Ok(BluetoothDeviceAddress(address))
    }
}

impl From<[u8; BD_ADDR_LEN]> for BluetoothDeviceAddress {
    fn from(address: [u8; BD_ADDR_LEN]) -> Self {
        BluetoothDeviceAddress(address)
    }
}

impl TryFrom<&[u8]> for BluetoothDeviceAddress {
    type Error = Error;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        Self::try_from_slice(slice)
    }
}

impl fmt::Display for BluetoothDeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            self.0[5], self.0[4], self.0[3], self.0[2], self.0[1], self.0[0]
        )
    }
}

impl FromStr for BluetoothDeviceAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut be_bytes = [0u8; BD_ADDR_LEN];

        let mut digits = s.chars().filter(|c| *c != ':');

        let mut count = 0;

        while let Some(high) = digits.next() {
            let low = digits.next().ok_or(Error::InvalidFormat)?;

            let octet = high
                .to_digit(16)
                .zip(low.to_digit(16))
                .map(|(h, l)| ((h << 4) | l) as u8)
                .ok_or(Error::InvalidFormat)?;

            *be_bytes.get_mut(count).ok_or(Error::InvalidFormat)? = octet;

            count += 1;
        }

        if count != BD_ADDR_LEN {
            return Err(Error::InvalidFormat);
        }

        Ok(BluetoothDeviceAddress::from_be_bytes(be_bytes))
    }
}
