use core::arch::x86_64::{__m128i, __m256};

use archmage::prelude::*;
use safe_unaligned_simd::x86_64::{_mm_loadu_si128, _mm_storeu_si128};

use super::tables::{GATHER_HI, GATHER_LO, SCATTER_A_HI, SCATTER_A_LO, SCATTER_B_HI, SCATTER_B_LO};
use super::{correct_pixels, correct_pixels_inplace};
use crate::GROUP_BYTES;
use crate::matrix::LANE_COEFFS;

// ===========================================================================
// x86-64 AVX2+FMA: rite group kernel
// ===========================================================================

/// Pull one input channel's 8 samples out of a group and widen to f32.
#[rite]
fn gather_v3(_token: X64V3Token, lo: __m128i, hi: __m128i, channel: usize) -> __m256 {
    let lo_mask = _mm_loadu_si128(&GATHER_LO[channel]);
    let hi_mask = _mm_loadu_si128(&GATHER_HI[channel]);
    let bytes = _mm_or_si128(_mm_shuffle_epi8(lo, lo_mask), _mm_shuffle_epi8(hi, hi_mask));
    _mm256_cvtepi32_ps(_mm256_cvtepu8_epi32(bytes))
}

/// Multiply-accumulate one output row across lanes, round to nearest and
/// narrow i32 → i16 → u8 with saturation. Result lives in bytes 0..8.
#[rite]
fn mac_narrow_v3(_token: X64V3Token, s0: __m256, s1: __m256, s2: __m256, row: [f32; 3]) -> __m128i {
    let acc = _mm256_mul_ps(s0, _mm256_set1_ps(row[0]));
    let acc = _mm256_fmadd_ps(s1, _mm256_set1_ps(row[1]), acc);
    let acc = _mm256_fmadd_ps(s2, _mm256_set1_ps(row[2]), acc);
    let q = _mm256_cvtps_epi32(acc);
    let words = _mm_packs_epi32(_mm256_castsi256_si128(q), _mm256_extracti128_si256::<1>(q));
    _mm_packus_epi16(words, words)
}

#[rite]
pub(super) fn correct_group_v3(
    token: X64V3Token,
    src: &[u8; GROUP_BYTES],
    dst: &mut [u8; GROUP_BYTES],
) {
    let lo: &[u8; 16] = src[..16].try_into().unwrap();
    let hi: &[u8; 16] = src[8..].try_into().unwrap();
    let lo = _mm_loadu_si128(lo);
    let hi = _mm_loadu_si128(hi);

    let s0 = gather_v3(token, lo, hi, 0);
    let s1 = gather_v3(token, lo, hi, 1);
    let s2 = gather_v3(token, lo, hi, 2);

    let p0 = mac_narrow_v3(token, s0, s1, s2, LANE_COEFFS[0]);
    let p1 = mac_narrow_v3(token, s0, s1, s2, LANE_COEFFS[1]);
    let p2 = mac_narrow_v3(token, s0, s1, s2, LANE_COEFFS[2]);

    let a = _mm_unpacklo_epi64(p0, p1);
    let out_lo = _mm_or_si128(
        _mm_shuffle_epi8(a, _mm_loadu_si128(&SCATTER_A_LO)),
        _mm_shuffle_epi8(p2, _mm_loadu_si128(&SCATTER_B_LO)),
    );
    let out_hi = _mm_or_si128(
        _mm_shuffle_epi8(a, _mm_loadu_si128(&SCATTER_A_HI)),
        _mm_shuffle_epi8(p2, _mm_loadu_si128(&SCATTER_B_HI)),
    );
    let d: &mut [u8; 16] = (&mut dst[..16]).try_into().unwrap();
    _mm_storeu_si128(d, out_lo);
    let mut tmp = [0u8; 16];
    _mm_storeu_si128(&mut tmp, out_hi);
    dst[16..].copy_from_slice(&tmp[..8]);
}

// ===========================================================================
// x86-64 AVX2: rite row implementations
// ===========================================================================

#[rite]
pub(super) fn correct_row_v3(t: X64V3Token, src: &[u8], dst: &mut [u8]) {
    let (src_groups, src_tail) = src.as_chunks::<GROUP_BYTES>();
    let (dst_groups, dst_tail) = dst.as_chunks_mut::<GROUP_BYTES>();
    for (s, d) in src_groups.iter().zip(dst_groups) {
        correct_group_v3(t, s, d);
    }
    correct_pixels(src_tail, dst_tail);
}

#[rite]
pub(super) fn correct_row_inplace_v3(t: X64V3Token, row: &mut [u8]) {
    let (groups, tail) = row.as_chunks_mut::<GROUP_BYTES>();
    for g in groups {
        let s = *g;
        correct_group_v3(t, &s, g);
    }
    correct_pixels_inplace(tail);
}

// ===========================================================================
// x86-64 arcane contiguous wrappers
// ===========================================================================

#[arcane]
pub(super) fn correct_impl_v3(t: X64V3Token, s: &[u8], d: &mut [u8]) {
    correct_row_v3(t, s, d);
}
#[arcane]
pub(super) fn correct_inplace_impl_v3(t: X64V3Token, b: &mut [u8]) {
    correct_row_inplace_v3(t, b);
}

// ===========================================================================
// x86-64 arcane strided wrappers
// ===========================================================================

#[arcane]
pub(super) fn correct_strided_v3(
    t: X64V3Token,
    src: &[u8],
    dst: &mut [u8],
    w: usize,
    h: usize,
    ss: usize,
    ds: usize,
) {
    for y in 0..h {
        correct_row_v3(t, &src[y * ss..][..w * 3], &mut dst[y * ds..][..w * 3]);
    }
}
#[arcane]
pub(super) fn correct_inplace_strided_v3(
    t: X64V3Token,
    buf: &mut [u8],
    w: usize,
    h: usize,
    stride: usize,
) {
    for y in 0..h {
        correct_row_inplace_v3(t, &mut buf[y * stride..][..w * 3]);
    }
}
