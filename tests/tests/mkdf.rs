//! Tests for the enhanced session key derivation

use bredr_sm::toolbox::{e1, e3, es, kdf, mac, mkdf, Cof};
use bredr_sm::Error;
use bredr_tests::{address_from_hci_order, init_logging, u128_from_spec};

const LINK_KEY: &str = "F80FA88F F3DC39F6 59F1155F 0B4D249E";

const ADDRESS: &str = "BA BA BA BA BA BA";

#[test]
fn mkdf_is_two_e3() {
    init_logging();

    let link_key = u128_from_spec(LINK_KEY);

    let address = address_from_hci_order(ADDRESS);

    let en_nonce_c = 0;
    let en_nonce_p = 1;

    let (_, aco) = e1(link_key, 0, address);

    let cof = Cof::from(aco);

    let kc = e3(link_key, en_nonce_c, cof);

    let kc2 = e3(kc, en_nonce_p, cof);

    for entropy in 1..=16 {
        assert_eq!(
            es(kc2.swap_bytes(), entropy).map(u128::swap_bytes),
            mkdf(link_key, 0, en_nonce_c, en_nonce_p, address, entropy)
        );
    }

    assert_eq!(Ok(kc2), mkdf(link_key, 0, en_nonce_c, en_nonce_p, address, 16));
}

#[test]
fn both_nonces_contribute() {
    init_logging();

    let link_key = u128_from_spec(LINK_KEY);

    let address = address_from_hci_order(ADDRESS);

    let key = mkdf(link_key, 0, 0, 1, address, 7).unwrap();

    assert_ne!(key, mkdf(link_key, 0, 0, 2, address, 7).unwrap());

    assert_ne!(key, mkdf(link_key, 0, 1, 1, address, 7).unwrap());

    assert_ne!(key, kdf(link_key, 0, 0, address, 7).unwrap());
}

#[test]
fn mac_matches_e1() {
    init_logging();

    let link_key = u128_from_spec(LINK_KEY);

    let address = address_from_hci_order(ADDRESS);

    let nonce = u128_from_spec("00000000 00000000 00000000 00000001");

    let (sres, aco) = e1(link_key, nonce, address);

    let mac = mac(link_key, nonce, address);

    assert_eq!(sres, (mac >> 96) as u32);

    assert_eq!(aco.to_bytes(), mac.to_be_bytes()[4..]);
}

#[test]
fn invalid_entropy() {
    init_logging();

    let address = address_from_hci_order(ADDRESS);

    assert_eq!(Err(Error::InvalidEntropy(0)), mkdf(0, 0, 0, 0, address, 0));

    assert_eq!(Err(Error::InvalidEntropy(17)), mkdf(0, 0, 0, 0, address, 17));
}
