use redact_core::{normalize, RedactionMethod, DEFAULT_BLUR_KSIZE};

fn blur(raw: &str) -> u64 {
    normalize(RedactionMethod::Blur, raw, "0.06").blur_kernel_size
}

#[test]
fn malformed_or_non_positive_blur_falls_back_to_default() {
    for raw in ["", "abc", "0", "-1", "-150", "  ", "px12", "99999999999999999999"] {
        assert_eq!(blur(raw), DEFAULT_BLUR_KSIZE, "input {raw:?}");
    }
    assert_eq!(DEFAULT_BLUR_KSIZE, 151);
}

#[test]
fn even_blur_is_bumped_to_next_odd() {
    for n in [2u64, 4, 10, 150, 2048] {
        assert_eq!(blur(&n.to_string()), n + 1);
    }
}

#[test]
fn odd_blur_is_kept() {
    for n in [1u64, 3, 51, 151, 999] {
        assert_eq!(blur(&n.to_string()), n);
    }
}

#[test]
fn blur_uses_leading_integer_like_a_lenient_parser() {
    assert_eq!(blur(" 12px"), 13);
    assert_eq!(blur("7.9"), 7);
}

#[test]
fn mosaic_scale_is_passed_through_without_a_floor() {
    let params = normalize(RedactionMethod::Pixelate, "151", "0.06");
    assert_eq!(params.method, RedactionMethod::Pixelate);
    assert_eq!(params.mosaic_scale, 0.06);

    assert_eq!(normalize(RedactionMethod::Pixelate, "151", "-0.5").mosaic_scale, -0.5);
    assert_eq!(normalize(RedactionMethod::Pixelate, "151", "0").mosaic_scale, 0.0);
    assert!(normalize(RedactionMethod::Pixelate, "151", "fine").mosaic_scale.is_nan());
}

#[test]
fn method_names_round_trip_through_wire_strings() {
    assert_eq!(RedactionMethod::Blur.as_str(), "blur");
    assert_eq!(RedactionMethod::Pixelate.to_string(), "pixelate");
    assert_eq!(RedactionMethod::from_name("Pixelate"), Some(RedactionMethod::Pixelate));
    assert_eq!(RedactionMethod::from_name("smudge"), None);
}

#[test]
fn blur_beyond_32_bits_keeps_the_odd_rule() {
    assert_eq!(blur("4294967296"), 4_294_967_297);
    assert_eq!(blur("4294967297"), 4_294_967_297);
    assert_eq!(blur("9223372036854775806"), 9_223_372_036_854_775_807);
}
