//! BR/EDR Legacy Security
//!
//! This is the key derivation used by BR/EDR legacy authentication and encryption. A session key
//! is derived from the link key shared by two devices, the two random numbers exchanged over LMP,
//! the address of the verifying device and the negotiated encryption key size.
//!
//! ```text
//!                 AU_RAND, BD_ADDR              EN_RAND              L
//!                       |                          |                 |
//! link key --+--> [ E1 ] --> SRES, ACO ---> [ E3 ] --> Kc ---> [ Es ] --> Kc'
//!            |                                 ^
//!            +---------------------------------+
//! ```
//!
//! Both `E1` and `E3` are built on the hash function [`H`](hash::h), a keyed hash made from two
//! passes of the SAFER+ round function (see [`safer_plus`]). The encryption key size reduction
//! `Es` maps the 128 bit `Kc` into a key with only `L` bytes of entropy using polynomial
//! arithmetic over GF(2) (see [`bredr_core::gf2`]).
//!
//! The functions are within the [`toolbox`] module, and [`LegacySession`] bundles the values of
//! one captured legacy session.
//!
//! ```
//! use bredr_sm::toolbox::kdf;
//! use bredr_sm::BluetoothDeviceAddress;
//!
//! let link_key = 0x97773CA35380352AEBB317027C360BEE;
//! let address = BluetoothDeviceAddress([0x40, 0x4E, 0x36, 0x04, 0xF1, 0xF9]);
//!
//! let session_key = kdf(link_key, 0, 0, address, 1).unwrap();
//!
//! assert_eq!(0x61d97e37_17259fa9_31a45741_ebc4010f, session_key);
//! ```
//!
//! # Logging
//! Logging is done through the [`log`](https://docs.rs/log) facade. The stages of a derivation
//! are logged at the `debug` level, anything that contains key material or intermediate cipher
//! state is only logged at the `trace` level.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

/// Log at the `debug` level with the name of the component as the prefix
macro_rules! log_debug {
    ($component:literal, $fmt:literal $(, $arg:expr)* $(,)?) => {
        log::debug!(concat!("(", $component, ") ", $fmt) $(, $arg)*)
    };
}

/// Log at the `trace` level with the name of the component as the prefix
macro_rules! log_trace {
    ($component:literal, $fmt:literal $(, $arg:expr)* $(,)?) => {
        log::trace!(concat!("(", $component, ") ", $fmt) $(, $arg)*)
    };
}

pub mod hash;
pub mod key_size;
pub mod safer_plus;
mod session;
pub mod toolbox;

pub use bredr_core::{errors::Error, BluetoothDeviceAddress};
pub use key_size::{EncryptionKeySize, KeySizePolicy};
pub use session::LegacySession;
