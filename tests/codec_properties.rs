//! Property tests for the IBM float conversions

use proptest::prelude::*;
use segy::codec::{ibm_bits_to_ieee, ieee_to_ibm_bits};
use segy::{ibm_to_ieee, ieee_to_ibm};

/// Normalized IBM patterns whose magnitude is an IEEE normal and whose
/// lowest fraction bit is clear
fn ibm_in_range() -> impl Strategy<Value = u32> {
    (any::<bool>(), 34u32..=96, 0x0010_0000u32..=0x00ff_ffff).prop_map(|(negative, exponent, fraction)| {
        (u32::from(negative) << 31) | (exponent << 24) | (fraction & !1)
    })
}

proptest! {
    #[test]
    fn ibm_pattern_survives_ieee(bits in ibm_in_range()) {
        prop_assert_eq!(ieee_to_ibm_bits(ibm_bits_to_ieee(bits)), bits);
    }

    #[test]
    fn ieee_value_survives_ibm(value in prop_oneof![1.0e-30f32..1.0e30, -1.0e30f32..-1.0e-30]) {
        let back = ibm_bits_to_ieee(ieee_to_ibm_bits(value));
        prop_assert!((back - value).abs() <= value.abs() * 4.0e-6, "{} -> {}", value, back);
        prop_assert_eq!(back.is_sign_negative(), value.is_sign_negative());
    }

    #[test]
    fn byte_order_is_consistent(value in any::<f32>().prop_filter("finite", |v| v.is_finite())) {
        let be = ieee_to_ibm(value, true);
        let le = ieee_to_ibm(value, false);
        let mut reversed = le;
        reversed.reverse();
        prop_assert_eq!(be, reversed);
        prop_assert_eq!(
            ibm_to_ieee(be, true).to_bits(),
            ibm_to_ieee(le, false).to_bits()
        );
    }

    #[test]
    fn conversions_never_produce_non_finite(bits in any::<u32>()) {
        prop_assert!(ibm_bits_to_ieee(bits).is_finite());
    }
}

#[test]
fn saturates_at_exponent_overflow() {
    // Largest IBM magnitude that still fits an f32, and the first that does not.
    assert!(ibm_bits_to_ieee(0x60ff_fffe) < f32::MAX);
    assert_eq!(ibm_bits_to_ieee(0x6110_0000), f32::MAX);
    assert_eq!(ibm_bits_to_ieee(0xe110_0000), -f32::MAX);
    assert_eq!(ieee_to_ibm_bits(f32::MAX), 0x60ff_ffff);
    assert_eq!(ieee_to_ibm_bits(-f32::MAX), 0xe0ff_ffff);
}
