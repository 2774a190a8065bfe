//! Portable lane kernels on plain `[T; LANE_WIDTH]` arrays.
//!
//! Same lane structure as the SIMD kernels; the compiler is free to
//! auto-vectorize the per-lane loops.

use super::LANE_WIDTH;
use crate::transform::{ONE_THIRD, SepiaParams, approx_div3};

/// Fixed-point sepia over lane-aligned 8-bit channels.
pub fn sepia_u8(b: &mut [u8], g: &mut [u8], r: &mut [u8], params: &SepiaParams) {
    let bias_b = params.bias_b;
    let green_offset = params.green_offset();
    let red_offset = params.red_offset();
    let lo = params.min as i16;
    let hi = params.max as i16;

    let lanes = b
        .chunks_exact_mut(LANE_WIDTH)
        .zip(g.chunks_exact_mut(LANE_WIDTH))
        .zip(r.chunks_exact_mut(LANE_WIDTH));

    for ((b, g), r) in lanes {
        let mut sum = [0u16; LANE_WIDTH];
        for i in 0..LANE_WIDTH {
            sum[i] = b[i] as u16 + g[i] as u16 + r[i] as u16;
        }

        let base = sum.map(|s| approx_div3(s) as i16 + bias_b);

        for i in 0..LANE_WIDTH {
            b[i] = base[i].min(hi).max(lo) as u8;
            g[i] = (base[i] + green_offset).min(hi).max(lo) as u8;
            r[i] = (base[i] + red_offset).min(hi).max(lo) as u8;
        }
    }
}

/// Floating-point sepia over lane-aligned `f32` channels.
pub fn sepia_f32(b: &mut [f32], g: &mut [f32], r: &mut [f32], params: &SepiaParams) {
    let bias_b = params.bias_b as f32;
    let green_offset = params.green_offset() as f32;
    let red_offset = params.red_offset() as f32;
    let lo = params.min as f32;
    let hi = params.max as f32;

    let lanes = b
        .chunks_exact_mut(LANE_WIDTH)
        .zip(g.chunks_exact_mut(LANE_WIDTH))
        .zip(r.chunks_exact_mut(LANE_WIDTH));

    for ((b, g), r) in lanes {
        let mut base = [0.0f32; LANE_WIDTH];
        for i in 0..LANE_WIDTH {
            base[i] = (b[i] + g[i] + r[i]) * ONE_THIRD + bias_b;
        }

        for i in 0..LANE_WIDTH {
            b[i] = base[i].min(hi).max(lo);
            g[i] = (base[i] + green_offset).min(hi).max(lo);
            r[i] = (base[i] + red_offset).min(hi).max(lo);
        }
    }
}
