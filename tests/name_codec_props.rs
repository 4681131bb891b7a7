//! Property tests for the fixed-width name codec.

use proptest::prelude::*;
use ugrid_store::codec::{decode_fixed_strings, encode_fixed_strings};
use ugrid_store::UgridError;

proptest! {
    /// Any ASCII name that fits the stride survives an encode/decode trip.
    #[test]
    fn ascii_names_round_trip(
        names in proptest::collection::vec("[ -~]{0,40}", 0..8),
    ) {
        // Trailing spaces are indistinguishable from padding by design;
        // generate trimmed names.
        let names: Vec<String> = names
            .into_iter()
            .map(|n| n.trim_end().to_string())
            .collect();
        let buf = encode_fixed_strings(&names, 40).unwrap();
        prop_assert_eq!(buf.len(), names.len() * 40);
        let decoded = decode_fixed_strings(&buf, names.len(), 40).unwrap();
        prop_assert_eq!(decoded, names);
    }

    /// Names longer than the stride always fail, never truncate.
    #[test]
    fn overlong_names_always_fail(
        prefix in "[a-z]{41,64}",
        stride in 1usize..41,
    ) {
        let err = encode_fixed_strings(&[prefix.clone()], stride).unwrap_err();
        prop_assert!(matches!(err, UgridError::NameTooLong { .. }), "unexpected error: {:?}", err);
    }

    /// Decoding arbitrary ASCII buffers of the right size never panics.
    #[test]
    fn decode_is_total_over_ascii_buffers(
        rows in 0usize..6,
        body in proptest::collection::vec(0x20u8..0x7f, 0..240),
    ) {
        let stride = 40;
        let mut buf = body;
        buf.resize(rows * stride, b' ');
        let decoded = decode_fixed_strings(&buf, rows, stride).unwrap();
        prop_assert_eq!(decoded.len(), rows);
    }
}
