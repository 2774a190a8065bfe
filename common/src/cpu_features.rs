//! CPU feature detection for runtime SIMD dispatch.
//!
//! Detection runs once and is cached. Use these functions instead of calling
//! `is_x86_feature_detected!` in hot paths.

use std::sync::OnceLock;

/// CPU feature flags detected once at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct X86Features {
    pub sse2: bool,
    pub avx: bool,
}

static FEATURES: OnceLock<X86Features> = OnceLock::new();

/// Get cached CPU features (detected once on first call).
#[cfg(target_arch = "x86_64")]
#[inline]
pub fn get() -> X86Features {
    *FEATURES.get_or_init(|| X86Features {
        sse2: is_x86_feature_detected!("sse2"),
        avx: is_x86_feature_detected!("avx"),
    })
}

/// Get cached CPU features - stub for non-x86 platforms.
#[cfg(not(target_arch = "x86_64"))]
#[inline]
pub fn get() -> X86Features {
    *FEATURES.get_or_init(X86Features::default)
}

/// Check if SSE2 is available.
#[inline]
pub fn has_sse2() -> bool {
    get().sse2
}

/// Check if AVX is available.
#[inline]
pub fn has_avx() -> bool {
    get().avx
}

/// NEON is part of the aarch64 baseline.
#[inline]
pub fn has_neon() -> bool {
    cfg!(target_arch = "aarch64")
}
