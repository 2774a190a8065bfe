//! SSE2 lane kernels (x86_64).
//!
//! Integer lanes widen 8 samples to `i16x8`; float lanes run two `f32x4`
//! halves per 8-element lane.

use std::arch::x86_64::*;

use super::LANE_WIDTH;
use crate::transform::{ONE_THIRD, SepiaParams};

/// Fixed-point sepia over lane-aligned 8-bit channels.
///
/// # Safety
/// Caller must ensure SSE2 is available.
#[target_feature(enable = "sse2")]
pub unsafe fn sepia_u8(b: &mut [u8], g: &mut [u8], r: &mut [u8], params: &SepiaParams) {
    unsafe {
        let zero = _mm_setzero_si128();
        let bias_b = _mm_set1_epi16(params.bias_b);
        let green_offset = _mm_set1_epi16(params.green_offset());
        let red_offset = _mm_set1_epi16(params.red_offset());
        let lo = _mm_set1_epi16(params.min as i16);
        let hi = _mm_set1_epi16(params.max as i16);

        let lanes = b
            .chunks_exact_mut(LANE_WIDTH)
            .zip(g.chunks_exact_mut(LANE_WIDTH))
            .zip(r.chunks_exact_mut(LANE_WIDTH));

        for ((b, g), r) in lanes {
            let bv = load_u8x8(b.as_ptr(), zero);
            let gv = load_u8x8(g.as_ptr(), zero);
            let rv = load_u8x8(r.as_ptr(), zero);

            let sum = _mm_add_epi16(_mm_add_epi16(bv, gv), rv);
            let base = _mm_add_epi16(div3_epu16(sum), bias_b);

            let nb = clamp_epi16(base, lo, hi);
            let ng = clamp_epi16(_mm_add_epi16(base, green_offset), lo, hi);
            let nr = clamp_epi16(_mm_add_epi16(base, red_offset), lo, hi);

            store_u8x8(b.as_mut_ptr(), nb);
            store_u8x8(g.as_mut_ptr(), ng);
            store_u8x8(r.as_mut_ptr(), nr);
        }
    }
}

/// Floating-point sepia over lane-aligned `f32` channels.
///
/// # Safety
/// Caller must ensure SSE2 is available.
#[target_feature(enable = "sse2")]
pub unsafe fn sepia_f32(b: &mut [f32], g: &mut [f32], r: &mut [f32], params: &SepiaParams) {
    unsafe {
        let third = _mm_set1_ps(ONE_THIRD);
        let bias_b = _mm_set1_ps(params.bias_b as f32);
        let green_offset = _mm_set1_ps(params.green_offset() as f32);
        let red_offset = _mm_set1_ps(params.red_offset() as f32);
        let lo = _mm_set1_ps(params.min as f32);
        let hi = _mm_set1_ps(params.max as f32);

        let lanes = b
            .chunks_exact_mut(LANE_WIDTH)
            .zip(g.chunks_exact_mut(LANE_WIDTH))
            .zip(r.chunks_exact_mut(LANE_WIDTH));

        for ((b, g), r) in lanes {
            for half in [0, 4] {
                let bp = b.as_mut_ptr().add(half);
                let gp = g.as_mut_ptr().add(half);
                let rp = r.as_mut_ptr().add(half);

                let sum = _mm_add_ps(
                    _mm_add_ps(_mm_loadu_ps(bp), _mm_loadu_ps(gp)),
                    _mm_loadu_ps(rp),
                );
                let base = _mm_add_ps(_mm_mul_ps(sum, third), bias_b);

                let nb = _mm_max_ps(_mm_min_ps(base, hi), lo);
                let ng = _mm_max_ps(_mm_min_ps(_mm_add_ps(base, green_offset), hi), lo);
                let nr = _mm_max_ps(_mm_min_ps(_mm_add_ps(base, red_offset), hi), lo);

                _mm_storeu_ps(bp, nb);
                _mm_storeu_ps(gp, ng);
                _mm_storeu_ps(rp, nr);
            }
        }
    }
}

/// Truncating division by 3 of eight `u16` values in `0..=765`.
///
/// # Safety
/// Caller must ensure SSE2 is available.
#[inline]
#[target_feature(enable = "sse2")]
pub(super) unsafe fn div3_epu16(n: __m128i) -> __m128i {
    unsafe {
        let mut q = _mm_add_epi16(_mm_srli_epi16(n, 2), _mm_srli_epi16(n, 4));
        q = _mm_add_epi16(q, _mm_srli_epi16(q, 4));
        q = _mm_add_epi16(q, _mm_srli_epi16(q, 8));
        let three_q = _mm_add_epi16(q, _mm_add_epi16(q, q));
        let rem = _mm_sub_epi16(n, three_q);
        let correction = _mm_srli_epi16(_mm_mullo_epi16(rem, _mm_set1_epi16(11)), 5);
        _mm_add_epi16(q, correction)
    }
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn clamp_epi16(v: __m128i, lo: __m128i, hi: __m128i) -> __m128i {
    unsafe { _mm_max_epi16(_mm_min_epi16(v, hi), lo) }
}

/// Loads 8 bytes and zero-extends them to `u16x8`.
#[inline]
#[target_feature(enable = "sse2")]
unsafe fn load_u8x8(ptr: *const u8, zero: __m128i) -> __m128i {
    unsafe { _mm_unpacklo_epi8(_mm_loadl_epi64(ptr as *const __m128i), zero) }
}

/// Narrows `i16x8` (already within `0..=255`) and stores 8 bytes.
#[inline]
#[target_feature(enable = "sse2")]
unsafe fn store_u8x8(ptr: *mut u8, v: __m128i) {
    unsafe { _mm_storel_epi64(ptr as *mut __m128i, _mm_packus_epi16(v, v)) }
}
