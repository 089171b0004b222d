use proptest::prelude::*;
use stocking_stuffer_miner::crypto::{has_leading_zero_nibbles, hex_has_leading_zeros};
use stocking_stuffer_miner::{LeadingZeros, Md5Digest, DIGEST_SIZE};

/// Zero the first `nibbles` nibbles of `bytes`
fn with_zero_prefix(mut bytes: [u8; DIGEST_SIZE], nibbles: usize) -> [u8; DIGEST_SIZE] {
    for byte in bytes.iter_mut().take(nibbles / 2) {
        *byte = 0;
    }
    if nibbles % 2 == 1 {
        bytes[nibbles / 2] &= 0x0f;
    }
    bytes
}

proptest! {
    #[test]
    fn raw_and_hex_checks_agree(
        bytes in prop::array::uniform16(any::<u8>()),
        prefix in 0usize..=32,
        required in 0u8..=32,
    ) {
        let digest = Md5Digest::new(with_zero_prefix(bytes, prefix));
        let zeros = LeadingZeros::new(required).unwrap();

        prop_assert_eq!(
            has_leading_zero_nibbles(&digest, zeros),
            hex_has_leading_zeros(&digest, zeros)
        );
    }

    #[test]
    fn check_matches_zero_count(
        bytes in prop::array::uniform16(any::<u8>()),
        prefix in 0usize..=32,
        required in 0u8..=32,
    ) {
        let digest = Md5Digest::new(with_zero_prefix(bytes, prefix));
        let zeros = LeadingZeros::new(required).unwrap();

        prop_assert_eq!(
            has_leading_zero_nibbles(&digest, zeros),
            digest.leading_zero_nibbles() >= required
        );
    }

    #[test]
    fn zero_prefix_is_always_met(
        bytes in prop::array::uniform16(any::<u8>()),
        prefix in 0usize..=32,
    ) {
        let digest = Md5Digest::new(with_zero_prefix(bytes, prefix));
        let zeros = LeadingZeros::new(prefix as u8).unwrap();

        prop_assert!(has_leading_zero_nibbles(&digest, zeros));
        prop_assert!(hex_has_leading_zeros(&digest, zeros));
    }
}

#[test]
fn every_requirement_on_single_set_nibble() {
    // One non-zero nibble at each position, checked against every requirement
    for position in 0..32usize {
        let mut bytes = [0u8; DIGEST_SIZE];
        bytes[position / 2] = if position % 2 == 0 { 0x10 } else { 0x01 };
        let digest = Md5Digest::new(bytes);

        for required in 0..=32u8 {
            let zeros = LeadingZeros::new(required).unwrap();
            let expected = usize::from(required) <= position;
            assert_eq!(has_leading_zero_nibbles(&digest, zeros), expected);
            assert_eq!(hex_has_leading_zeros(&digest, zeros), expected);
        }
    }
}
