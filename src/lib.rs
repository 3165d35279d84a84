//! # myers-lanes
//!
//! Bit-parallel edit distance (Myers/Hyyrö) over 512-bit vectors split into
//! 16 lanes of 32 bits.
//!
//! Each text symbol advances one DP column with a handful of word operations
//! per lane. The one operation that would serialise the lanes, the carry of
//! the `(EQ & VP) + VP` add, is predicted a step ahead, validated before use
//! and recomputed sequentially when the prediction is wrong. The result is
//! always exact.
//!
//! ## Module Organization
//!
//! - [`bits`] - 512-bit lane vectors and per-lane masks
//! - [`table`] - per-symbol match vectors of a pattern
//! - [`kernel`] - the update step, carry predictor, validator and recovery path
//! - [`simd`] - AVX-512F step kernel with runtime detection
//! - [`reference`] - sequential multiword implementation
//! - [`scan`] - streaming scanner and one-shot drivers
//!
//! ## Quick Start
//!
//! ```
//! use myers_lanes::{find, MatchTable};
//!
//! assert_eq!(myers_lanes::distance(b"kitten", b"sitting").unwrap(), 3);
//!
//! let table = MatchTable::from_bytes(b"GATTACA").unwrap();
//! let hit = find(&table, b"CCCCGATTTACACCC", 1).unwrap();
//! assert_eq!(hit.distance, 1);
//! ```
//!
//! ## Features
//!
//! - `std` (default) - runtime CPU feature detection for the AVX-512 kernel
//! - `portable-kernel` - never select the AVX-512 kernel (for benchmarking)
//! - `serde` - `Serialize`/`Deserialize` for configuration, state and results

// Use no_std unless std feature is enabled or we're in test mode
#![cfg_attr(not(any(test, feature = "std")), no_std)]

// When using no_std, we need to explicitly link the alloc crate
#[cfg(not(any(test, feature = "std")))]
extern crate alloc;

/// 512-bit lane vectors and lane masks.
pub mod bits;

/// Pattern match tables.
pub mod table;

/// Vertical delta state.
pub mod state;

/// Scan configuration.
pub mod config;

/// Error types.
pub mod error;

/// The lane-parallel update step.
pub mod kernel;

/// SIMD step kernels.
pub mod simd;

/// Sequential reference implementation.
pub mod reference;

/// Scanning drivers.
pub mod scan;

pub use bits::{BitVector, LaneMask};
pub use config::{Backend, Config, Mode};
pub use error::PatternError;
pub use kernel::{step, step_with, CarryVector, Frame, MatchSignal, Step};
pub use reference::Reference;
pub use scan::{bounded_distance, distance, find, find_all, Match, ScanStats, Scanner};
pub use state::State;
pub use table::MatchTable;
