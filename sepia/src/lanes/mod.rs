//! Lane batch executor: runs the channel transform over 8-wide vector lanes.
//!
//! Bodies are processed in `LANE_WIDTH` batches by the best kernel available
//! at runtime (SSE2/AVX on x86_64, NEON on aarch64, portable arrays
//! elsewhere). A tail shorter than one lane is always drained by the scalar
//! transform.

pub mod portable;

#[cfg(target_arch = "aarch64")]
mod neon;

#[cfg(target_arch = "x86_64")]
mod avx;

#[cfg(target_arch = "x86_64")]
mod sse;


use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::transform::{self, SepiaParams};

/// Number of elements processed by one vector operation.
pub const LANE_WIDTH: usize = 8;

/// Which lane kernels the executor may choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LaneBackend {
    /// Use the widest SIMD kernel the CPU supports.
    #[default]
    Auto,
    /// Always use the portable array kernel.
    Portable,
}

/// Kernel that actually processed the lanes of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum LaneKernel {
    #[strum(serialize = "sse2")]
    Sse2,
    #[strum(serialize = "avx")]
    Avx,
    #[strum(serialize = "neon")]
    Neon,
    #[strum(serialize = "portable")]
    Portable,
}

/// Fixed-point sepia over 8-bit planar channels.
pub fn apply_lanes_u8(
    b: &mut [u8],
    g: &mut [u8],
    r: &mut [u8],
    params: &SepiaParams,
    backend: LaneBackend,
) -> LaneKernel {
    assert_eq!(b.len(), g.len(), "green channel length mismatch");
    assert_eq!(b.len(), r.len(), "red channel length mismatch");

    let body = body_len(b.len());
    let (b, b_tail) = b.split_at_mut(body);
    let (g, g_tail) = g.split_at_mut(body);
    let (r, r_tail) = r.split_at_mut(body);

    let kernel = dispatch_u8(b, g, r, params, backend);
    transform::apply_scalar(b_tail, g_tail, r_tail, params);
    kernel
}

/// Floating-point sepia over `f32` planar channels.
pub fn apply_lanes_f32(
    b: &mut [f32],
    g: &mut [f32],
    r: &mut [f32],
    params: &SepiaParams,
    backend: LaneBackend,
) -> LaneKernel {
    assert_eq!(b.len(), g.len(), "green channel length mismatch");
    assert_eq!(b.len(), r.len(), "red channel length mismatch");

    let body = body_len(b.len());
    let (b, b_tail) = b.split_at_mut(body);
    let (g, g_tail) = g.split_at_mut(body);
    let (r, r_tail) = r.split_at_mut(body);

    let kernel = dispatch_f32(b, g, r, params, backend);
    transform::apply_scalar(b_tail, g_tail, r_tail, params);
    kernel
}

/// Length of the lane-aligned prefix of a `len`-element range.
#[inline]
pub fn body_len(len: usize) -> usize {
    len - len % LANE_WIDTH
}

fn dispatch_u8(
    b: &mut [u8],
    g: &mut [u8],
    r: &mut [u8],
    params: &SepiaParams,
    backend: LaneBackend,
) -> LaneKernel {
    debug_assert_eq!(b.len() % LANE_WIDTH, 0);

    if backend == LaneBackend::Auto {
        #[cfg(target_arch = "x86_64")]
        if common::cpu_features::has_sse2() {
            // SAFETY: SSE2 support verified above
            unsafe { sse::sepia_u8(b, g, r, params) };
            return LaneKernel::Sse2;
        }

        #[cfg(target_arch = "aarch64")]
        if common::cpu_features::has_neon() {
            // SAFETY: NEON is always available on aarch64
            unsafe { neon::sepia_u8(b, g, r, params) };
            return LaneKernel::Neon;
        }
    }

    portable::sepia_u8(b, g, r, params);
    LaneKernel::Portable
}

fn dispatch_f32(
    b: &mut [f32],
    g: &mut [f32],
    r: &mut [f32],
    params: &SepiaParams,
    backend: LaneBackend,
) -> LaneKernel {
    debug_assert_eq!(b.len() % LANE_WIDTH, 0);

    if backend == LaneBackend::Auto {
        #[cfg(target_arch = "x86_64")]
        {
            if common::cpu_features::has_avx() {
                // SAFETY: AVX support verified above
                unsafe { avx::sepia_f32(b, g, r, params) };
                return LaneKernel::Avx;
            }
            if common::cpu_features::has_sse2() {
                // SAFETY: SSE2 support verified above
                unsafe { sse::sepia_f32(b, g, r, params) };
                return LaneKernel::Sse2;
            }
        }

        #[cfg(target_arch = "aarch64")]
        if common::cpu_features::has_neon() {
            // SAFETY: NEON is always available on aarch64
            unsafe { neon::sepia_f32(b, g, r, params) };
            return LaneKernel::Neon;
        }
    }

    portable::sepia_f32(b, g, r, params);
    LaneKernel::Portable
}
