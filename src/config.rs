//! Configuration for scanning text against a pattern.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What the bottom row of the DP matrix measures.
///
/// The only difference between the modes is the constant shifted into the
/// low end of the horizontal-positive vector each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Mode {
    /// Global edit distance between the pattern and the text read so far.
    /// The top DP row is `0, 1, 2, ...`, so the HP boundary bit is 1.
    #[default]
    Global,
    /// Best edit distance of the pattern against any substring ending at the
    /// current position. The top DP row is all zeros, so the HP boundary bit
    /// is 0.
    Search,
}

impl Mode {
    /// Bit shifted into the bottom of the horizontal-positive vector.
    #[inline]
    pub const fn hp_boundary(self) -> bool {
        matches!(self, Mode::Global)
    }
}

/// Which step kernel runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Backend {
    /// Pick the fastest kernel the CPU supports.
    #[default]
    Auto,
    /// Portable lane loop, available everywhere.
    Portable,
    /// AVX-512F kernel (x86_64 only).
    Avx512,
}

impl Backend {
    /// Whether this backend can run on the current CPU.
    pub fn is_available(self) -> bool {
        match self {
            Backend::Auto | Backend::Portable => true,
            Backend::Avx512 => crate::simd::avx512_available(),
        }
    }

    /// Turn `Auto` into a concrete backend, and downgrade an unavailable
    /// request to `Portable`.
    pub fn resolve(self) -> Backend {
        let resolved = match self {
            Backend::Auto if Backend::Avx512.is_available() => Backend::Avx512,
            Backend::Auto => Backend::Portable,
            Backend::Avx512 if !Backend::Avx512.is_available() => {
                log::debug!("AVX-512 kernel requested but unavailable, using portable kernel");
                Backend::Portable
            }
            other => other,
        };
        log::debug!("step kernel: {:?} (requested {:?})", resolved, self);
        resolved
    }
}

/// Configuration for a [`Scanner`](crate::Scanner).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Global distance or substring search (default: global)
    pub mode: Mode,
    /// Step kernel selection (default: auto)
    pub backend: Backend,
}

impl Config {
    /// Global edit distance with automatic kernel selection.
    pub fn global() -> Self {
        Self::default()
    }

    /// Approximate substring search with automatic kernel selection.
    pub fn search() -> Self {
        Self {
            mode: Mode::Search,
            ..Self::default()
        }
    }

    /// Set the mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the backend.
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }
}
