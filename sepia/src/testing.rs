//! Shared helpers for unit tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::raster::{ChannelOrder, Raster};

/// Deterministic random raster with optional row padding.
pub fn random_raster(
    width: usize,
    height: usize,
    padding: usize,
    order: ChannelOrder,
    seed: u64,
) -> Raster {
    let mut rng = StdRng::seed_from_u64(seed);
    let stride = width * 3 + padding;
    let mut bytes = vec![0u8; stride * height];
    rng.fill(&mut bytes[..]);
    Raster::from_bytes(width, height, stride, order, bytes).unwrap()
}

/// Random channel triple of `len` samples.
pub fn random_channels(len: usize, seed: u64) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut channel = || (0..len).map(|_| rng.random::<u8>()).collect::<Vec<u8>>();
    let b = channel();
    let g = channel();
    let r = channel();
    (b, g, r)
}

/// Every `(b, g, r)` combination on a coarse grid plus the extremes.
pub fn corner_case_channels() -> (Vec<u8>, Vec<u8>, Vec<u8>) {
    let levels: Vec<u8> = (0..=255u16).step_by(17).map(|v| v as u8).collect();
    let mut b = Vec::new();
    let mut g = Vec::new();
    let mut r = Vec::new();
    for &bv in &levels {
        for &gv in &levels {
            for &rv in &levels {
                b.push(bv);
                g.push(gv);
                r.push(rv);
            }
        }
    }
    (b, g, r)
}
