use super::*;
use crate::testing::corner_case_channels;

// ---------------------------------------------------------------------------
// approx_div3
// ---------------------------------------------------------------------------

#[test]
fn test_approx_div3_exhaustive() {
    for n in 0..=DIV3_MAX_INPUT {
        assert_eq!(approx_div3(n), n / 3, "approx_div3({n})");
    }
}

#[test]
fn test_approx_div3_u8_exhaustive() {
    for n in 0..=u8::MAX {
        assert_eq!(approx_div3_u8(n), n / 3, "approx_div3_u8({n})");
    }
}

#[test]
fn test_approx_div3_known_hard_inputs() {
    // A (6 * r) >> 4 correction gets all of these wrong.
    for n in [47u16, 95, 143, 155, 191, 203, 206, 239, 251, 254] {
        assert_eq!(approx_div3(n), n / 3, "approx_div3({n})");
    }
}

#[test]
fn test_one_third_truncates_exactly() {
    for sum in 0..=DIV3_MAX_INPUT {
        let q = (sum as f32 * ONE_THIRD) as u16;
        assert_eq!(q, sum / 3, "sum = {sum}");
    }
}

// ---------------------------------------------------------------------------
// Clamping
// ---------------------------------------------------------------------------

#[test]
fn test_clamp_policy() {
    assert_eq!(clamp(-20, 0, 255), 0);
    assert_eq!(clamp(315, 0, 255), 255);
    assert_eq!(clamp(128, 0, 255), 128);
    assert_eq!(clamp(10, 20, 30), 20);
}

#[test]
fn test_tone_intensity_zero_clamps_blue() {
    let params = SepiaParams::default();
    assert_eq!(params.tone(0), (0, 20, 40));
}

#[test]
fn test_tone_intensity_max_clamps_green_and_red() {
    let params = SepiaParams::default();
    assert_eq!(params.tone(255), (235, 255, 255));
}

#[test]
fn test_tone_never_leaves_bounds() {
    let params = SepiaParams::default();
    for intensity in 0..=255 {
        let (b, g, r) = params.tone(intensity);
        for v in [b, g, r] {
            assert!((0..=255).contains(&v), "intensity {intensity} -> {v}");
        }
    }
}

#[test]
fn test_green_shortcut_matches_recompute() {
    let params = SepiaParams {
        bias_b: -100,
        bias_g: 10,
        bias_r: 30,
        min: 5,
        max: 250,
    };
    for intensity in 0..=255 {
        let (b, g, r) = params.tone(intensity);
        assert_eq!(b, clamp(intensity + params.bias_b as i32, 5, 250));
        assert_eq!(g, clamp(intensity + params.bias_g as i32, 5, 250));
        assert_eq!(r, clamp(intensity + params.bias_r as i32, 5, 250));
    }
}

// ---------------------------------------------------------------------------
// sepia_pixel and Tone implementations
// ---------------------------------------------------------------------------

#[test]
fn test_sepia_pixel_uniform_90() {
    let params = SepiaParams::default();
    assert_eq!(sepia_pixel(90, 90, 90, &params), (70, 110, 130));
}

#[test]
fn test_sepia_pixel_truncates_average() {
    let params = SepiaParams::default();
    // (100 + 101 + 101) / 3 = 100.67 -> 100
    assert_eq!(sepia_pixel(100, 101, 101, &params), (80, 120, 140));
}

#[test]
fn test_tone_impls_agree() {
    let params = SepiaParams::default();
    let (b, g, r) = corner_case_channels();

    for i in 0..b.len() {
        let expected = sepia_pixel(b[i], g[i], r[i], &params);

        let (bu, gu, ru) = u8::tone(b[i], g[i], r[i], &params);
        assert_eq!((bu, gu, ru), expected, "u8 at {i}");

        let (bi, gi, ri) = i32::tone(b[i] as i32, g[i] as i32, r[i] as i32, &params);
        assert_eq!((bi.to_u8(), gi.to_u8(), ri.to_u8()), expected, "i32 at {i}");

        let (bf, gf, rf) = f32::tone(b[i] as f32, g[i] as f32, r[i] as f32, &params);
        assert_eq!((bf.to_u8(), gf.to_u8(), rf.to_u8()), expected, "f32 at {i}");
    }
}

#[test]
fn test_apply_scalar_in_place() {
    let params = SepiaParams::default();
    let mut b = vec![90i32, 0, 255];
    let mut g = vec![90i32, 0, 255];
    let mut r = vec![90i32, 0, 255];

    apply_scalar(&mut b, &mut g, &mut r, &params);

    assert_eq!(b, vec![70, 0, 235]);
    assert_eq!(g, vec![110, 20, 255]);
    assert_eq!(r, vec![130, 40, 255]);
}

#[test]
#[should_panic(expected = "green channel length mismatch")]
fn test_apply_scalar_length_mismatch_panics() {
    let params = SepiaParams::default();
    apply_scalar(&mut [0u8; 3], &mut [0u8; 2], &mut [0u8; 3], &params);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn test_default_params_are_valid() {
    SepiaParams::default().validate().unwrap();
}

#[test]
fn test_validate_rejects_inverted_bounds() {
    let params = SepiaParams {
        min: 200,
        max: 100,
        ..Default::default()
    };
    assert!(matches!(params.validate(), Err(Error::InvalidConfig(_))));
}

#[test]
fn test_validate_rejects_large_bias() {
    let params = SepiaParams {
        bias_r: 300,
        ..Default::default()
    };
    assert!(matches!(params.validate(), Err(Error::InvalidConfig(_))));
}
