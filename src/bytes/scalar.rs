use archmage::prelude::*;

use crate::matrix::{ColorMatrix, FIXED_COEFFS, LANE_COEFFS, OUTPUT_POSITION, clamp_to_u8, narrow_q20};
use crate::{GROUP_BYTES, GROUP_PIXELS};

// ===========================================================================
// Per-pixel reference
// ===========================================================================

/// Color-correct one pixel with `f64` arithmetic.
///
/// This is the reference every bulk tier is measured against.
///
/// ```rust
/// assert_eq!(camwb::correct_pixel([10, 20, 30]), [13, 13, 49]);
/// assert_eq!(camwb::correct_pixel([0, 0, 0]), [0, 0, 0]);
/// ```
#[inline]
pub fn correct_pixel(src: [u8; 3]) -> [u8; 3] {
    let d = ColorMatrix::CAMERA.apply(src);
    let mut out = [0u8; 3];
    for (value, &pos) in d.into_iter().zip(&OUTPUT_POSITION) {
        out[pos] = clamp_to_u8(value);
    }
    out
}

/// Color-correct one pixel in Q20 fixed point, for targets without an FPU.
///
/// Within ±1 of [`correct_pixel`] for every input.
#[inline]
pub fn correct_pixel_fixed(src: [u8; 3]) -> [u8; 3] {
    let s = src.map(i32::from);
    FIXED_COEFFS.map(|row| narrow_q20(row[0] * s[0] + row[1] * s[1] + row[2] * s[2]))
}

pub(crate) fn correct_pixels(src: &[u8], dst: &mut [u8]) {
    let (src_px, _) = src.as_chunks::<3>();
    let (dst_px, _) = dst.as_chunks_mut::<3>();
    for (s, d) in src_px.iter().zip(dst_px) {
        *d = correct_pixel(*s);
    }
}

pub(crate) fn correct_pixels_inplace(buf: &mut [u8]) {
    let (px, _) = buf.as_chunks_mut::<3>();
    for p in px {
        *p = correct_pixel(*p);
    }
}

// ===========================================================================
// Portable lane-unrolled group kernel
// ===========================================================================

#[inline(always)]
fn narrow_f32(x: f32) -> u8 {
    (x.clamp(0.0, 255.0) + 0.5) as u8
}

/// Same arithmetic as the vector tiers (`f32` lanes), one lane at a time.
#[inline]
pub(super) fn correct_group_scalar(
    _token: ScalarToken,
    src: &[u8; GROUP_BYTES],
    dst: &mut [u8; GROUP_BYTES],
) {
    let mut lanes = [[0.0f32; GROUP_PIXELS]; 3];
    for (i, px) in src.chunks_exact(3).enumerate() {
        for (lane, &s) in lanes.iter_mut().zip(px) {
            lane[i] = s as f32;
        }
    }
    for (i, px) in dst.chunks_exact_mut(3).enumerate() {
        for (out, row) in px.iter_mut().zip(&LANE_COEFFS) {
            *out = narrow_f32(row[0] * lanes[0][i] + row[1] * lanes[1][i] + row[2] * lanes[2][i]);
        }
    }
}

// ===========================================================================
// Scalar row implementations
// ===========================================================================

pub(super) fn correct_row_scalar(t: ScalarToken, src: &[u8], dst: &mut [u8]) {
    let (src_groups, src_tail) = src.as_chunks::<GROUP_BYTES>();
    let (dst_groups, dst_tail) = dst.as_chunks_mut::<GROUP_BYTES>();
    for (s, d) in src_groups.iter().zip(dst_groups) {
        correct_group_scalar(t, s, d);
    }
    correct_pixels(src_tail, dst_tail);
}

pub(super) fn correct_row_inplace_scalar(t: ScalarToken, row: &mut [u8]) {
    let (groups, tail) = row.as_chunks_mut::<GROUP_BYTES>();
    for g in groups {
        let s = *g;
        correct_group_scalar(t, &s, g);
    }
    correct_pixels_inplace(tail);
}

// ===========================================================================
// Scalar contiguous wrappers (dispatch targets for incant!)
// ===========================================================================

pub(super) fn correct_impl_scalar(t: ScalarToken, s: &[u8], d: &mut [u8]) {
    correct_row_scalar(t, s, d);
}
pub(super) fn correct_inplace_impl_scalar(t: ScalarToken, b: &mut [u8]) {
    correct_row_inplace_scalar(t, b);
}

// ===========================================================================
// Scalar strided wrappers
// ===========================================================================

pub(super) fn correct_strided_scalar(
    t: ScalarToken,
    src: &[u8],
    dst: &mut [u8],
    w: usize,
    h: usize,
    ss: usize,
    ds: usize,
) {
    for y in 0..h {
        correct_row_scalar(t, &src[y * ss..][..w * 3], &mut dst[y * ds..][..w * 3]);
    }
}
pub(super) fn correct_inplace_strided_scalar(
    t: ScalarToken,
    buf: &mut [u8],
    w: usize,
    h: usize,
    stride: usize,
) {
    for y in 0..h {
        correct_row_inplace_scalar(t, &mut buf[y * stride..][..w * 3]);
    }
}
