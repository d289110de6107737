//! Tests for the tuple literal codec

use nbody_studio_core::tuple;
use proptest::prelude::*;

#[test]
fn test_decode_basic_tuple() {
    assert_eq!(tuple::decode("(a, b, c)"), vec!["a", "b", "c"]);
}

#[test]
fn test_decode_trims_elements() {
    assert_eq!(
        tuple::decode("(  prev!(position) ,velocity )"),
        vec!["prev!(position)", "velocity"]
    );
}

#[test]
fn test_decode_malformed_never_raises() {
    assert_eq!(tuple::decode("not-a-tuple"), Vec::<String>::new());
    assert_eq!(tuple::decode(""), Vec::<String>::new());
    assert_eq!(tuple::decode("   "), Vec::<String>::new());
    assert_eq!(tuple::decode("(unclosed"), Vec::<String>::new());
}

#[test]
fn test_decode_empty_tuple() {
    assert_eq!(tuple::decode("()"), Vec::<String>::new());
}

#[test]
fn test_encode_canonical_form() {
    let parts = vec!["a".to_string(), "b".to_string()];
    assert_eq!(tuple::encode(&parts), "(a, b)");
    assert_eq!(tuple::encode(&[]), "()");
}

#[test]
fn test_part_within_bounds() {
    assert_eq!(tuple::part("(a, b)", 1), "b");
}

#[test]
fn test_part_beyond_length_is_empty() {
    assert_eq!(tuple::part("(a, b)", 2), "");
    assert_eq!(tuple::part("not-a-tuple", 0), "");
}

#[test]
fn test_set_part_replaces_in_place() {
    assert_eq!(tuple::set_part("(a, b)", 0, "z"), "(z, b)");
}

#[test]
fn test_set_part_grows_sequence() {
    // Setting index 3 on a two-element tuple pads with empties
    assert_eq!(tuple::set_part("(a, b)", 3, "d"), "(a, b, , d)");
}

#[test]
fn test_set_part_on_malformed_text_starts_fresh() {
    assert_eq!(tuple::set_part("garbage", 1, "b"), "(, b)");
}

proptest! {
    /// decode(encode(parts)) == parts for elements free of embedded
    /// commas, parentheses, and surrounding whitespace
    #[test]
    fn prop_roundtrip(parts in prop::collection::vec("[A-Za-z0-9_!.]{1,16}", 0..8)) {
        let encoded = tuple::encode(&parts);
        prop_assert_eq!(tuple::decode(&encoded), parts);
    }

    /// Getting any index beyond the decoded length yields an empty string
    #[test]
    fn prop_sparse_get(text in ".*", extra in 0usize..4) {
        let len = tuple::decode(&text).len();
        prop_assert_eq!(tuple::part(&text, len + extra), "");
    }

    /// Arbitrary text never panics the decoder
    #[test]
    fn prop_decode_total(text in ".*") {
        let _ = tuple::decode(&text);
    }

    /// set_part always yields text that decodes to at least index + 1 elements
    #[test]
    fn prop_set_part_reaches_index(
        text in ".*",
        index in 0usize..6,
        value in "[A-Za-z0-9_]{1,8}",
    ) {
        let updated = tuple::set_part(&text, index, &value);
        let parts = tuple::decode(&updated);
        prop_assert!(parts.len() >= index + 1);
        prop_assert_eq!(&parts[index], &value);
    }
}
