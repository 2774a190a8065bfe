//! NEON lane kernels (aarch64).

use std::arch::aarch64::*;

use super::LANE_WIDTH;
use crate::transform::{ONE_THIRD, SepiaParams};

/// Fixed-point sepia over lane-aligned 8-bit channels.
///
/// # Safety
/// Caller must ensure NEON is available (always true on aarch64).
#[target_feature(enable = "neon")]
pub unsafe fn sepia_u8(b: &mut [u8], g: &mut [u8], r: &mut [u8], params: &SepiaParams) {
    unsafe {
        let bias_b = vdupq_n_s16(params.bias_b);
        let green_offset = vdupq_n_s16(params.green_offset());
        let red_offset = vdupq_n_s16(params.red_offset());
        let lo = vdupq_n_s16(params.min as i16);
        let hi = vdupq_n_s16(params.max as i16);

        let lanes = b
            .chunks_exact_mut(LANE_WIDTH)
            .zip(g.chunks_exact_mut(LANE_WIDTH))
            .zip(r.chunks_exact_mut(LANE_WIDTH));

        for ((b, g), r) in lanes {
            let bv = vmovl_u8(vld1_u8(b.as_ptr()));
            let gv = vmovl_u8(vld1_u8(g.as_ptr()));
            let rv = vmovl_u8(vld1_u8(r.as_ptr()));

            let sum = vaddq_u16(vaddq_u16(bv, gv), rv);
            let base = vaddq_s16(vreinterpretq_s16_u16(vdiv3_u16(sum)), bias_b);

            let nb = vmaxq_s16(vminq_s16(base, hi), lo);
            let ng = vmaxq_s16(vminq_s16(vaddq_s16(base, green_offset), hi), lo);
            let nr = vmaxq_s16(vminq_s16(vaddq_s16(base, red_offset), hi), lo);

            vst1_u8(b.as_mut_ptr(), vqmovun_s16(nb));
            vst1_u8(g.as_mut_ptr(), vqmovun_s16(ng));
            vst1_u8(r.as_mut_ptr(), vqmovun_s16(nr));
        }
    }
}

/// Floating-point sepia over lane-aligned `f32` channels (two `f32x4` halves
/// per lane).
///
/// # Safety
/// Caller must ensure NEON is available (always true on aarch64).
#[target_feature(enable = "neon")]
pub unsafe fn sepia_f32(b: &mut [f32], g: &mut [f32], r: &mut [f32], params: &SepiaParams) {
    unsafe {
        let bias_b = vdupq_n_f32(params.bias_b as f32);
        let green_offset = vdupq_n_f32(params.green_offset() as f32);
        let red_offset = vdupq_n_f32(params.red_offset() as f32);
        let lo = vdupq_n_f32(params.min as f32);
        let hi = vdupq_n_f32(params.max as f32);

        let lanes = b
            .chunks_exact_mut(LANE_WIDTH)
            .zip(g.chunks_exact_mut(LANE_WIDTH))
            .zip(r.chunks_exact_mut(LANE_WIDTH));

        for ((b, g), r) in lanes {
            for half in [0, 4] {
                let bp = b.as_mut_ptr().add(half);
                let gp = g.as_mut_ptr().add(half);
                let rp = r.as_mut_ptr().add(half);

                let sum = vaddq_f32(vaddq_f32(vld1q_f32(bp), vld1q_f32(gp)), vld1q_f32(rp));
                let base = vaddq_f32(vmulq_n_f32(sum, ONE_THIRD), bias_b);

                let nb = vmaxq_f32(vminq_f32(base, hi), lo);
                let ng = vmaxq_f32(vminq_f32(vaddq_f32(base, green_offset), hi), lo);
                let nr = vmaxq_f32(vminq_f32(vaddq_f32(base, red_offset), hi), lo);

                vst1q_f32(bp, nb);
                vst1q_f32(gp, ng);
                vst1q_f32(rp, nr);
            }
        }
    }
}

/// Truncating division by 3 of eight `u16` values in `0..=765`.
#[inline]
#[target_feature(enable = "neon")]
unsafe fn vdiv3_u16(n: uint16x8_t) -> uint16x8_t {
    unsafe {
        // q ~ n * 0.0101b
        let mut q = vaddq_u16(vshrq_n_u16::<2>(n), vshrq_n_u16::<4>(n));
        // q ~ n * 0.01010101b
        q = vaddq_u16(q, vshrq_n_u16::<4>(q));
        // q ~ n * 0.0101010101010101b
        q = vaddq_u16(q, vshrq_n_u16::<8>(q));
        let rem = vsubq_u16(n, vmulq_n_u16(q, 3));
        vaddq_u16(q, vshrq_n_u16::<5>(vmulq_n_u16(rem, 11)))
    }
}
