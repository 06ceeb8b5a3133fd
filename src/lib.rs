//! # camwb
//!
//! Color correction for 8-bit interleaved camera frames.
//!
//! A raw sensor pixel `(s0, s1, s2)` is mapped through a fixed 3×3 color
//! matrix ([`ColorMatrix::CAMERA`]), clamped to `[0, 255]` and rounded. The
//! transform has a scalar `f64` reference ([`correct_pixel`]) and a
//! lane-parallel bulk form ([`correct_bulk`]) that works on groups of 8 pixels
//! (24 bytes) with x86-64 AVX2+FMA, ARM NEON, and WASM SIMD128 kernels, plus a
//! portable lane-unrolled fallback. Every bulk tier stays within ±1 count per
//! channel of the reference.
//!
//! Frame-level callers should go through [`WhiteBalancer`], which resolves the
//! backend once for a fixed [`FrameGeometry`]:
//!
//! ```rust
//! use camwb::{FrameGeometry, WhiteBalancer};
//!
//! let balancer = WhiteBalancer::new(FrameGeometry::new(4, 2).unwrap());
//! let raw = vec![10u8, 20, 30].repeat(8);
//! let mut out = vec![0u8; raw.len()];
//! balancer.white_balance(&raw, &mut out).unwrap();
//! assert_eq!(&out[..3], &[13, 13, 49]);
//! ```
//!
//! ## Byte positions
//!
//! Channel names are only a convention. The contract is positional: output
//! byte 0 holds `d2`, byte 1 holds `d1`, byte 2 holds `d0`
//! (see [`OUTPUT_POSITION`]).
//!
//! ## Feature flags
//!
//! - **`rgb`**: typed entry points over [`rgb`] pixel slices via bytemuck.
//! - **`imgref`**: whole-image entry points over [`imgref`] types. Implies `rgb`.

#![no_std]
#![forbid(unsafe_code)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub mod bytes;
mod dispatch;
mod matrix;

pub use bytes::*;
pub use dispatch::{Backend, FrameGeometry, WhiteBalancer};
pub use matrix::{ColorMatrix, OUTPUT_POSITION, clamp_to_u8};

#[cfg(feature = "rgb")]
pub mod typed_rgb;

#[cfg(feature = "imgref")]
pub mod imgref;

/// Bytes per interleaved pixel.
pub const BYTES_PER_PIXEL: usize = 3;

/// Pixels processed per vector group.
pub const GROUP_PIXELS: usize = 8;

/// Bytes per vector group. Bulk buffers must be a multiple of this.
pub const GROUP_BYTES: usize = GROUP_PIXELS * BYTES_PER_PIXEL;

/// A rejected buffer. Checks run before any byte is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CorrectionError {
    /// Length is zero, not a multiple of the processing granularity
    /// (3 bytes per pixel, 24 bytes per vector group), or not the configured
    /// frame size.
    #[error("buffer length is not a valid multiple of the processing granularity")]
    InvalidLength,
    /// The destination does not describe the same pixels as the source
    /// (length, stride, or image dimensions disagree).
    #[error("destination buffer does not match the source buffer")]
    InvalidBuffer,
}
