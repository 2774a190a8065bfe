//! Per-element sepia math shared by every execution strategy.
//!
//! For each pixel the three samples are averaged into an intensity, which is
//! then biased per channel and clamped:
//!
//! ```text
//! intensity = floor((b + g + r) / 3)
//! base      = intensity + bias_b
//! b'        = clamp(base)
//! g'        = clamp(base + (bias_g - bias_b))
//! r'        = clamp(base + (bias_r - bias_b))
//! ```
//!
//! Green and red are derived from the unclamped `base`, so the result equals
//! a straight per-channel recompute for any parameter set.

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::raster::Sample;

/// Largest input accepted by [`approx_div3`]: the sum of three 8-bit samples.
pub const DIV3_MAX_INPUT: u16 = 3 * u8::MAX as u16;

/// `1/3` as used by the floating-point paths. Rounds up, so
/// `trunc(sum * ONE_THIRD) == sum / 3` for every integral `sum` in `0..=765`.
pub const ONE_THIRD: f32 = 1.0 / 3.0;

/// Largest accepted magnitude of a channel bias.
pub const MAX_BIAS: i16 = u8::MAX as i16;

/// Per-channel biases and clamp bounds of the sepia tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SepiaParams {
    pub bias_b: i16,
    pub bias_g: i16,
    pub bias_r: i16,
    pub min: u8,
    pub max: u8,
}

impl Default for SepiaParams {
    fn default() -> Self {
        Self {
            bias_b: -20,
            bias_g: 20,
            bias_r: 40,
            min: 0,
            max: 255,
        }
    }
}

impl SepiaParams {
    /// Offset of green relative to the biased blue value.
    #[inline]
    pub fn green_offset(&self) -> i16 {
        self.bias_g - self.bias_b
    }

    /// Offset of red relative to the biased blue value.
    #[inline]
    pub fn red_offset(&self) -> i16 {
        self.bias_r - self.bias_b
    }

    pub fn validate(&self) -> Result<()> {
        for (name, bias) in [
            ("bias_b", self.bias_b),
            ("bias_g", self.bias_g),
            ("bias_r", self.bias_r),
        ] {
            if !(-MAX_BIAS..=MAX_BIAS).contains(&bias) {
                return Err(Error::InvalidConfig(format!(
                    "{} = {} is outside -{}..={}",
                    name, bias, MAX_BIAS, MAX_BIAS
                )));
            }
        }
        if self.min > self.max {
            return Err(Error::InvalidConfig(format!(
                "clamp min {} is greater than max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }

    /// Biased and clamped `(b', g', r')` for an already computed intensity.
    #[inline]
    pub fn tone(&self, intensity: i32) -> (i32, i32, i32) {
        let lo = self.min as i32;
        let hi = self.max as i32;
        let base = intensity + self.bias_b as i32;
        (
            clamp(base, lo, hi),
            clamp(base + self.green_offset() as i32, lo, hi),
            clamp(base + self.red_offset() as i32, lo, hi),
        )
    }

    /// Floating-point counterpart of [`tone`](Self::tone); `intensity` is
    /// not truncated, truncation happens when the sample is written back.
    #[inline]
    pub fn tone_f32(&self, intensity: f32) -> (f32, f32, f32) {
        let lo = self.min as f32;
        let hi = self.max as f32;
        let base = intensity + self.bias_b as f32;
        (
            clamp_f32(base, lo, hi),
            clamp_f32(base + self.green_offset() as f32, lo, hi),
            clamp_f32(base + self.red_offset() as f32, lo, hi),
        )
    }
}

/// `max(lo, min(v, hi))`.
#[inline]
pub fn clamp(v: i32, lo: i32, hi: i32) -> i32 {
    v.min(hi).max(lo)
}

#[inline]
pub fn clamp_f32(v: f32, lo: f32, hi: f32) -> f32 {
    v.min(hi).max(lo)
}

/// Truncating `n / 3` without a divide, exact for `n` in `0..=765`.
///
/// Shift-and-add steps approximate `n * 0.010101...b` from below; the
/// remainder `r = n - 3q` is then at most 11 and `(11 * r) >> 5` adds the
/// missing `floor(r / 3)`.
#[inline]
pub const fn approx_div3(n: u16) -> u16 {
    debug_assert!(n <= DIV3_MAX_INPUT);
    let mut q = (n >> 2) + (n >> 4);
    q += q >> 4;
    q += q >> 8;
    let r = n - q * 3;
    q + ((r * 11) >> 5)
}

/// [`approx_div3`] for a single 8-bit sample.
#[inline]
pub const fn approx_div3_u8(n: u8) -> u8 {
    approx_div3(n as u16) as u8
}

/// Sepia tone of one pixel, as used by the per-pixel accessor strategy.
#[inline]
pub fn sepia_pixel(b: u8, g: u8, r: u8, params: &SepiaParams) -> (u8, u8, u8) {
    let intensity = (b as i32 + g as i32 + r as i32) / 3;
    let (b, g, r) = params.tone(intensity);
    (b as u8, g as u8, r as u8)
}

/// A sample type the channel transform can run on directly.
pub trait Tone: Sample {
    fn tone(b: Self, g: Self, r: Self, params: &SepiaParams) -> (Self, Self, Self);
}

impl Tone for i32 {
    /// True integer divide.
    #[inline]
    fn tone(b: i32, g: i32, r: i32, params: &SepiaParams) -> (i32, i32, i32) {
        params.tone((b + g + r) / 3)
    }
}

impl Tone for u8 {
    /// Fixed-point divide, matching the integer vector lanes.
    #[inline]
    fn tone(b: u8, g: u8, r: u8, params: &SepiaParams) -> (u8, u8, u8) {
        let sum = b as u16 + g as u16 + r as u16;
        let (b, g, r) = params.tone(approx_div3(sum) as i32);
        (b as u8, g as u8, r as u8)
    }
}

impl Tone for f32 {
    #[inline]
    fn tone(b: f32, g: f32, r: f32, params: &SepiaParams) -> (f32, f32, f32) {
        params.tone_f32((b + g + r) * ONE_THIRD)
    }
}

/// Applies the transform in place over three equally long channel slices.
pub fn apply_scalar<T: Tone>(b: &mut [T], g: &mut [T], r: &mut [T], params: &SepiaParams) {
    assert_eq!(b.len(), g.len(), "green channel length mismatch");
    assert_eq!(b.len(), r.len(), "red channel length mismatch");

    for ((b, g), r) in b.iter_mut().zip(g.iter_mut()).zip(r.iter_mut()) {
        (*b, *g, *r) = T::tone(*b, *g, *r, params);
    }
}
