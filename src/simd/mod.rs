//! SIMD step kernels.
//!
//! On x86_64 the AVX-512F kernel processes all 16 lanes in one register.
//! Every other target, and x86_64 CPUs without AVX-512F, run the portable
//! lane loop in [`crate::kernel`].

#[cfg(target_arch = "x86_64")]
pub(crate) mod x86;

/// Whether the AVX-512 kernel can run here.
///
/// Needs runtime detection through `std`, or a build with `avx512f` enabled
/// at compile time. Always false with the `portable-kernel` feature.
#[inline]
pub fn avx512_available() -> bool {
    #[cfg(all(
        target_arch = "x86_64",
        not(feature = "portable-kernel"),
        any(test, feature = "std")
    ))]
    {
        is_x86_feature_detected!("avx512f")
    }

    #[cfg(all(
        target_arch = "x86_64",
        not(feature = "portable-kernel"),
        not(any(test, feature = "std"))
    ))]
    {
        cfg!(target_feature = "avx512f")
    }

    #[cfg(any(not(target_arch = "x86_64"), feature = "portable-kernel"))]
    {
        false
    }
}
