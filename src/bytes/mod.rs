// ---------------------------------------------------------------------------
// Byte-level color correction with SIMD dispatch.
//
// Architecture: #[rite] group kernels transform 8 pixels (24 bytes) at a
// time; #[rite] row functions run the kernels over the aligned prefix and
// finish any tail with the scalar reference. #[arcane] wrappers dispatch via
// incant!: contiguous (single call) and strided (loop over rows, single
// dispatch).
// ---------------------------------------------------------------------------

use crate::{BYTES_PER_PIXEL, CorrectionError, GROUP_BYTES};
use archmage::incant;

mod scalar;
use scalar::*;

pub use scalar::{correct_pixel, correct_pixel_fixed};
pub(crate) use scalar::{correct_pixels, correct_pixels_inplace};

#[cfg(target_arch = "x86_64")]
mod avx2;
#[cfg(target_arch = "x86_64")]
use avx2::*;

#[cfg(target_arch = "aarch64")]
mod neon;
#[cfg(target_arch = "aarch64")]
use neon::*;

#[cfg(target_arch = "wasm32")]
mod wasm;
#[cfg(target_arch = "wasm32")]
use wasm::*;


// ===========================================================================
// Shuffle tables shared by the vector tiers
// ===========================================================================

// A group is loaded as two overlapping 16-byte vectors: `lo` = bytes 0..16
// and `hi` = bytes 8..24. Index 0x80 selects zero under pshufb, tbl and
// swizzle alike, so each table pair can be merged with a plain OR.
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64", target_arch = "wasm32"))]
mod tables {
    const Z: u8 = 0x80;

    /// Per input channel: picks that channel's 8 samples into bytes 0..8.
    pub(super) const GATHER_LO: [[u8; 16]; 3] = [
        [0, 3, 6, 9, 12, 15, Z, Z, Z, Z, Z, Z, Z, Z, Z, Z],
        [1, 4, 7, 10, 13, Z, Z, Z, Z, Z, Z, Z, Z, Z, Z, Z],
        [2, 5, 8, 11, 14, Z, Z, Z, Z, Z, Z, Z, Z, Z, Z, Z],
    ];

    pub(super) const GATHER_HI: [[u8; 16]; 3] = [
        [Z, Z, Z, Z, Z, Z, 10, 13, Z, Z, Z, Z, Z, Z, Z, Z],
        [Z, Z, Z, Z, Z, 8, 11, 14, Z, Z, Z, Z, Z, Z, Z, Z],
        [Z, Z, Z, Z, Z, 9, 12, 15, Z, Z, Z, Z, Z, Z, Z, Z],
    ];

    // Scatter sources: `a` holds output position 0 in bytes 0..8 and
    // position 1 in bytes 8..16; `b` holds position 2 in bytes 0..8.
    pub(super) const SCATTER_A_LO: [u8; 16] = [0, 8, Z, 1, 9, Z, 2, 10, Z, 3, 11, Z, 4, 12, Z, 5];
    pub(super) const SCATTER_B_LO: [u8; 16] = [Z, Z, 0, Z, Z, 1, Z, Z, 2, Z, Z, 3, Z, Z, 4, Z];
    pub(super) const SCATTER_A_HI: [u8; 16] = [13, Z, 6, 14, Z, 7, 15, Z, Z, Z, Z, Z, Z, Z, Z, Z];
    pub(super) const SCATTER_B_HI: [u8; 16] = [Z, 5, Z, Z, 6, Z, Z, 7, Z, Z, Z, Z, Z, Z, Z, Z];
}

// ===========================================================================
// Validation helpers
// ===========================================================================

#[inline]
fn check_len(len: usize, granularity: usize) -> Result<(), CorrectionError> {
    if len == 0 || !len.is_multiple_of(granularity) {
        tracing::trace!(len, granularity, "rejected buffer length");
        Err(CorrectionError::InvalidLength)
    } else {
        Ok(())
    }
}

#[inline]
fn check_pair(src_len: usize, dst_len: usize, granularity: usize) -> Result<(), CorrectionError> {
    check_len(src_len, granularity)?;
    if dst_len != src_len {
        tracing::trace!(src_len, dst_len, "destination length differs from source");
        return Err(CorrectionError::InvalidBuffer);
    }
    Ok(())
}

#[inline]
fn check_strided(
    len: usize,
    width: usize,
    height: usize,
    stride: usize,
    err: CorrectionError,
) -> Result<(), CorrectionError> {
    if width == 0 || height == 0 {
        return Err(CorrectionError::InvalidLength);
    }
    let row_bytes = width.checked_mul(BYTES_PER_PIXEL).ok_or(err)?;
    if row_bytes > stride {
        return Err(err);
    }
    let total = (height - 1)
        .checked_mul(stride)
        .ok_or(err)?
        .checked_add(row_bytes)
        .ok_or(err)?;
    if len < total {
        return Err(err);
    }
    Ok(())
}

// ===========================================================================
// Public API: bulk (whole 8-pixel groups only)
// ===========================================================================

/// Color-correct `src` into `dst`, 8 pixels at a time.
///
/// `src.len()` must be a positive multiple of 24 ([`GROUP_BYTES`]) and
/// `dst.len()` must equal it. Nothing is written on error.
///
/// Every output byte is within ±1 of [`correct_pixel`] for the same pixel.
///
/// ```rust
/// use camwb::{CorrectionError, correct_bulk};
///
/// let src = [10u8, 20, 30].repeat(8);
/// let mut dst = vec![0u8; 24];
/// correct_bulk(&src, &mut dst).unwrap();
/// assert_eq!(&dst[..3], &[13, 13, 49]);
///
/// let mut short = vec![0u8; 25];
/// assert_eq!(correct_bulk(&[0u8; 25], &mut short), Err(CorrectionError::InvalidLength));
/// ```
pub fn correct_bulk(src: &[u8], dst: &mut [u8]) -> Result<(), CorrectionError> {
    check_pair(src.len(), dst.len(), GROUP_BYTES)?;
    incant!(correct_impl(src, dst), [v3, arm_v2, wasm128, scalar]);
    Ok(())
}

/// In-place form of [`correct_bulk`].
pub fn correct_bulk_inplace(buf: &mut [u8]) -> Result<(), CorrectionError> {
    check_len(buf.len(), GROUP_BYTES)?;
    incant!(correct_inplace_impl(buf), [v3, arm_v2, wasm128, scalar]);
    Ok(())
}

// ===========================================================================
// Public API: any whole number of pixels
// ===========================================================================

/// Color-correct any positive whole number of pixels.
///
/// The 24-byte-aligned prefix goes through the vector kernels; the remaining
/// 1–7 pixels use [`correct_pixel`].
pub fn correct(src: &[u8], dst: &mut [u8]) -> Result<(), CorrectionError> {
    check_pair(src.len(), dst.len(), BYTES_PER_PIXEL)?;
    incant!(correct_impl(src, dst), [v3, arm_v2, wasm128, scalar]);
    Ok(())
}

/// In-place form of [`correct`].
pub fn correct_inplace(buf: &mut [u8]) -> Result<(), CorrectionError> {
    check_len(buf.len(), BYTES_PER_PIXEL)?;
    incant!(correct_inplace_impl(buf), [v3, arm_v2, wasm128, scalar]);
    Ok(())
}

// ===========================================================================
// Public API: strided
// ===========================================================================

/// Color-correct a strided frame.
///
/// `width` is in pixels. `src_stride` / `dst_stride` are the distances in
/// bytes between the starts of consecutive rows and must be ≥ `width × 3`.
/// Padding bytes between rows are never read or written.
///
/// Source geometry problems report [`CorrectionError::InvalidLength`];
/// destination geometry problems report [`CorrectionError::InvalidBuffer`].
pub fn correct_strided(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
    src_stride: usize,
    dst_stride: usize,
) -> Result<(), CorrectionError> {
    check_strided(src.len(), width, height, src_stride, CorrectionError::InvalidLength)?;
    check_strided(dst.len(), width, height, dst_stride, CorrectionError::InvalidBuffer)?;
    incant!(
        correct_strided(src, dst, width, height, src_stride, dst_stride),
        [v3, arm_v2, wasm128, scalar]
    );
    Ok(())
}

/// In-place form of [`correct_strided`].
pub fn correct_inplace_strided(
    buf: &mut [u8],
    width: usize,
    height: usize,
    stride: usize,
) -> Result<(), CorrectionError> {
    check_strided(buf.len(), width, height, stride, CorrectionError::InvalidLength)?;
    incant!(
        correct_inplace_strided(buf, width, height, stride),
        [v3, arm_v2, wasm128, scalar]
    );
    Ok(())
}
