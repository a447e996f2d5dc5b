//! Key derivation integration test framework

use bredr_core::BluetoothDeviceAddress;
use simplelog::{Config, LevelFilter, TestLogger};
use std::sync::Once;

static LOGGER: Once = Once::new();

/// Enable logging for a test
///
/// Logs are captured by the test harness, they are only shown for failed tests.
pub fn init_logging() {
    LOGGER.call_once(|| {
        // another test binary may already have set the logger
        let _ = TestLogger::init(LevelFilter::Trace, Config::default());
    });
}

/// Convert hex as printed in the Bluetooth specification (or a capture) into bytes
///
/// Whitespace and colons between the groups of digits are ignored.
///
/// # Panics
/// This panics if `spec_data` contains anything other than an even number of hex digits.
pub fn parse_spec_test_data(spec_data: &str) -> Vec<u8> {
    let nibbles = spec_data
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .map(|c| c.to_digit(16).expect("not a hex digit") as u8)
        .collect::<Vec<u8>>();

    assert_eq!(0, nibbles.len() % 2, "odd number of hex digits");

    nibbles.chunks(2).map(|pair| (pair[0] << 4) | pair[1]).collect()
}

/// Parse a sixteen byte value
pub fn u128_from_spec(spec_data: &str) -> u128 {
    let bytes: [u8; 16] = parse_spec_test_data(spec_data)
        .try_into()
        .expect("value is not sixteen bytes");

    u128::from_be_bytes(bytes)
}

/// Parse an address that is in the byte order of the HCI (least significant byte first)
pub fn address_from_hci_order(spec_data: &str) -> BluetoothDeviceAddress {
    BluetoothDeviceAddress::try_from_slice(&parse_spec_test_data(spec_data)).expect("invalid address")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_test() {
        assert_eq!(vec![0x56, 0x78, 0x9a, 0xbc], parse_spec_test_data("5678 9ABC"));

        assert_eq!(0x0102_0304_0506_0708_090a_0b0c_0d0e_0f10, u128_from_spec("01020304 05060708 090a0b0c 0d0e0f10"));

        assert_eq!(
            BluetoothDeviceAddress([0x40, 0x4E, 0x36, 0x04, 0xF1, 0xF9]),
            address_from_hci_order("40:4E:36:04:F1:F9")
        );
    }
}
