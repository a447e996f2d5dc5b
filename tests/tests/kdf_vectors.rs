//! Tests for the session key derivation
//!
//! The vectors are session keys of the KNOB attack, where the encryption key size was downgraded
//! to every size from one to sixteen bytes.

use bredr_sm::toolbox::{e1, e3, es, kdf, Cof};
use bredr_sm::{Error, KeySizePolicy, LegacySession};
use bredr_tests::{address_from_hci_order, init_logging, u128_from_spec};

const LINK_KEY: &str = "97773CA3 5380352A EBB31702 7C360BEE";

const ADDRESS: &str = "40 4E 36 04 F1 F9";

const SESSION_KEYS: [&str; 16] = [
    "61d97e37 17259fa9 31a45741 ebc4010f",
    "f899f6f9 f2fd3c75 80712e97 1bb65946",
    "6a516d6c f3b0c1e2 d7fa516e 49a185fb",
    "92a7d169 5f9fa949 a58093f0 7cb5cfd2",
    "e704580f ea5d97b0 6ca67a0a 7fd232b5",
    "89af8d19 e226c9ab c164c371 e11fe90e",
    "cc2de649 88a54ec6 fcd1edeb 4fa08521",
    "fde6d783 b5d97f43 0c346496 6f05e400",
    "f3c64abe 37c11568 0496a319 e8743700",
    "98dc7701 d413fc8c cdf9f087 9f4ce900",
    "d7e37ea7 6572f10f e00e4c5d a2a9a405",
    "4031012b 857b8b9e 193efc58 78f04c05",
    "664e0a61 7f03f1e8 8751629e 5647d209",
    "0c3880e2 b92d6f6f c402f726 6e5b110e",
    "a85b53e7 da0c8b87 80bfd28d e1529013",
    "674444bf 8008b7d1 1e30d372 43392579",
];

#[test]
fn every_key_size() {
    init_logging();

    let link_key = u128_from_spec(LINK_KEY);

    let address = address_from_hci_order(ADDRESS);

    for (index, session_key) in SESSION_KEYS.iter().enumerate() {
        let entropy = index + 1;

        assert_eq!(
            Ok(u128_from_spec(session_key)),
            kdf(link_key, 0, 0, address, entropy),
            "entropy of {} bytes",
            entropy
        );
    }
}

#[test]
fn full_entropy_key_is_not_reduced() {
    init_logging();

    let link_key = u128_from_spec(LINK_KEY);

    let address = address_from_hci_order(ADDRESS);

    let (_, aco) = e1(link_key, 0, address);

    let kc = e3(link_key, 0, Cof::from_aco(aco));

    assert_eq!(Ok(kc), kdf(link_key, 0, 0, address, 16));

    assert_eq!(Ok(kc), es(kc, 16));
}

#[test]
fn pipeline_is_the_composition_of_the_toolbox() {
    init_logging();

    let link_key = u128_from_spec(LINK_KEY);

    let address = address_from_hci_order(ADDRESS);

    let (_, aco) = e1(link_key, 0, address);

    let kc = e3(link_key, 0, aco.into());

    for entropy in 1..=16 {
        let reduced = es(kc.swap_bytes(), entropy).map(u128::swap_bytes);

        assert_eq!(reduced, kdf(link_key, 0, 0, address, entropy));
    }
}

#[test]
fn field_experiments() {
    init_logging();

    let session = LegacySession {
        link_key: u128_from_spec(LINK_KEY),
        address: address_from_hci_order("20 81 9A 09 3E 41"),
        au_rand: u128_from_spec("459a3212 d1452c6a 1b793789 fda175f6"),
        en_rand: 0,
        key_size: 9,
    };

    assert_eq!(Ok(u128_from_spec("dd4a4b89 503d20a9 bc4a6a88 87abf801")), session.session_key());

    let session = LegacySession {
        link_key: u128_from_spec("F80FA88F F3DC39F6 59F1155F 0B4D249E"),
        address: address_from_hci_order("DC E5 5B 27 71 96"),
        au_rand: 0,
        en_rand: 0,
        key_size: 7,
    };

    assert_eq!(Ok(u128_from_spec("455ef086 9087fe7a 5a5683ef 24f7387c")), session.session_key());

    assert_eq!(session.session_key(), session.session_key_with_policy(&KeySizePolicy::default()));
}

#[test]
fn downgraded_sessions_need_a_permissive_policy() {
    init_logging();

    let link_key = u128_from_spec(LINK_KEY);

    let address = address_from_hci_order(ADDRESS);

    for (index, session_key) in SESSION_KEYS.iter().enumerate().take(6) {
        let session = LegacySession {
            link_key,
            address,
            au_rand: 0,
            en_rand: 0,
            key_size: index + 1,
        };

        assert!(matches!(
            session.session_key_with_policy(&KeySizePolicy::default()),
            Err(Error::KeySizeRejected { .. })
        ));

        assert_eq!(
            Ok(u128_from_spec(session_key)),
            session.session_key_with_policy(&KeySizePolicy::permissive())
        );
    }
}

#[test]
fn invalid_entropy() {
    init_logging();

    let address = address_from_hci_order(ADDRESS);

    for entropy in [0, 17, usize::MAX] {
        assert_eq!(Err(Error::InvalidEntropy(entropy)), kdf(0, 0, 0, address, entropy));
    }
}
