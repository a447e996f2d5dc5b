//! BR/EDR Legacy Key Derivation
//!
//! This reproduces the key derivation of BR/EDR legacy security. The session key used by E0
//! encryption is derived from a link key, the random numbers `AU_RAND` and `EN_RAND`, the address
//! of the challenged device and the negotiated encryption key size.
//!
//! This library only computes keys. It does not take part in LMP, it does not parse captures, and
//! it does not store keys. The values are expected to come from somewhere else.
//!
//! The library is split into two:
//! * [`bredr_core`] contains the error type, the Bluetooth device address and the
//!   polynomial arithmetic over GF(2)
//! * [`sm`](bredr_sm) contains SAFER+, the hash function `H` and the functions `E1`, `E3`, `Es`
//!   built on top of them.
//!
//! Both `no_std` and `std` are supported, `alloc` is required for the polynomial arithmetic.
//!
//! ```
//! use bredr_kdf::{kdf, BluetoothDeviceAddress};
//!
//! let link_key = 0x97773CA35380352AEBB317027C360BEE;
//!
//! let address: BluetoothDeviceAddress = "F9:F1:04:36:4E:40".parse().unwrap();
//!
//! assert_eq!(Ok(0x61d97e37_17259fa9_31a45741_ebc4010f), kdf(link_key, 0, 0, address, 1));
//! ```
//!
//! # Features
//! * `std` (default) implements `std::error::Error` for [`Error`]
//! * `sm` (default) enables the key derivation library
//! * `sys-rand` (default) enables random generation of challenges with the system's random number
//!   generator
//! * `serde` implements `Serialize` and `Deserialize` for the data types

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

#[doc(inline)]
pub use bredr_core;

#[cfg(feature = "sm")]
#[doc(inline)]
pub use bredr_sm as sm;

pub use bredr_core::{BluetoothDeviceAddress, Error};

#[cfg(feature = "sm")]
pub use bredr_sm::{toolbox::kdf, EncryptionKeySize, KeySizePolicy, LegacySession};
