//! AVX float lane kernel (x86_64): one `f32x8` register per lane.

use std::arch::x86_64::*;

use super::LANE_WIDTH;
use crate::transform::{ONE_THIRD, SepiaParams};

/// Floating-point sepia over lane-aligned `f32` channels.
///
/// No FMA: results must equal the scalar path bit for bit.
///
/// # Safety
/// Caller must ensure AVX is available.
#[target_feature(enable = "avx")]
pub unsafe fn sepia_f32(b: &mut [f32], g: &mut [f32], r: &mut [f32], params: &SepiaParams) {
    unsafe {
        let third = _mm256_set1_ps(ONE_THIRD);
        let bias_b = _mm256_set1_ps(params.bias_b as f32);
        let green_offset = _mm256_set1_ps(params.green_offset() as f32);
        let red_offset = _mm256_set1_ps(params.red_offset() as f32);
        let lo = _mm256_set1_ps(params.min as f32);
        let hi = _mm256_set1_ps(params.max as f32);

        let lanes = b
            .chunks_exact_mut(LANE_WIDTH)
            .zip(g.chunks_exact_mut(LANE_WIDTH))
            .zip(r.chunks_exact_mut(LANE_WIDTH));

        for ((b, g), r) in lanes {
            let bv = _mm256_loadu_ps(b.as_ptr());
            let gv = _mm256_loadu_ps(g.as_ptr());
            let rv = _mm256_loadu_ps(r.as_ptr());

            let sum = _mm256_add_ps(_mm256_add_ps(bv, gv), rv);
            let base = _mm256_add_ps(_mm256_mul_ps(sum, third), bias_b);

            let nb = _mm256_max_ps(_mm256_min_ps(base, hi), lo);
            let ng = _mm256_max_ps(_mm256_min_ps(_mm256_add_ps(base, green_offset), hi), lo);
            let nr = _mm256_max_ps(_mm256_min_ps(_mm256_add_ps(base, red_offset), hi), lo);

            _mm256_storeu_ps(b.as_mut_ptr(), nb);
            _mm256_storeu_ps(g.as_mut_ptr(), ng);
            _mm256_storeu_ps(r.as_mut_ptr(), nr);
        }
    }
}
