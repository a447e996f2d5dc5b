//! Tests for deriving many session keys at once
//!
//! Every function of the key derivation is pure, so the keys derived in parallel must be the same
//! keys that are derived one at a time.

use bredr_core::BluetoothDeviceAddress;
use bredr_sm::toolbox::{kdf, rand_u128_with};
use bredr_sm::LegacySession;
use bredr_tests::{address_from_hci_order, init_logging, u128_from_spec};
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

const SESSION_COUNT: usize = 512;

fn random_sessions(seed: u64) -> Vec<LegacySession> {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);

    (0..SESSION_COUNT)
        .map(|_| LegacySession {
            link_key: rand_u128_with(&mut rng),
            address: BluetoothDeviceAddress(rng.gen()),
            au_rand: rand_u128_with(&mut rng),
            en_rand: rand_u128_with(&mut rng),
            key_size: rng.gen_range(1..=16),
        })
        .collect()
}

#[test]
fn parallel_derivation_matches_sequential() {
    init_logging();

    let sessions = random_sessions(0xB7ED_4B0B);

    let sequential = sessions
        .iter()
        .map(|session| session.session_key().unwrap())
        .collect::<Vec<_>>();

    let parallel = sessions
        .par_iter()
        .map(|session| session.session_key().unwrap())
        .collect::<Vec<_>>();

    assert_eq!(sequential, parallel);
}

#[test]
fn parallel_authentication() {
    init_logging();

    let sessions = random_sessions(0x5E55_1015);

    let responses = sessions
        .par_iter()
        .map(LegacySession::authentication_response)
        .collect::<Vec<_>>();

    sessions
        .par_iter()
        .zip(responses.par_iter())
        .for_each(|(session, sres)| assert!(session.verify(*sres)));
}

#[test]
fn parallel_known_answers() {
    init_logging();

    let link_key = u128_from_spec("97773CA3 5380352A EBB31702 7C360BEE");

    let address = address_from_hci_order("40 4E 36 04 F1 F9");

    let keys = (1..=16usize)
        .into_par_iter()
        .map(|entropy| kdf(link_key, 0, 0, address, entropy).unwrap())
        .collect::<Vec<_>>();

    assert_eq!(u128_from_spec("61d97e37 17259fa9 31a45741 ebc4010f"), keys[0]);

    assert_eq!(u128_from_spec("674444bf 8008b7d1 1e30d372 43392579"), keys[15]);
}
