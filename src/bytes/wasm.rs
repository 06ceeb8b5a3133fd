use core::arch::wasm32::{
    f32x4_add, f32x4_convert_u32x4, f32x4_mul, f32x4_nearest, f32x4_splat, i8x16_swizzle,
    i16x8_narrow_i32x4, i32x4_trunc_sat_f32x4, u8x16_narrow_i16x8, u16x8_extend_low_u8x16,
    u32x4_extend_high_u16x8, u32x4_extend_low_u16x8, u64x2_shuffle, v128, v128_or,
};

use archmage::prelude::*;
use safe_unaligned_simd::wasm32::{v128_load, v128_store};

use super::tables::{GATHER_HI, GATHER_LO, SCATTER_A_HI, SCATTER_A_LO, SCATTER_B_HI, SCATTER_B_LO};
use super::{correct_pixels, correct_pixels_inplace};
use crate::GROUP_BYTES;
use crate::matrix::LANE_COEFFS;

// ===========================================================================
// WASM SIMD128: rite group kernel
// ===========================================================================

/// One input channel's 8 samples as two f32x4 halves.
#[rite]
fn gather_wasm128(_token: Wasm128Token, lo: v128, hi: v128, channel: usize) -> [v128; 2] {
    let bytes = v128_or(
        i8x16_swizzle(lo, v128_load(&GATHER_LO[channel])),
        i8x16_swizzle(hi, v128_load(&GATHER_HI[channel])),
    );
    let words = u16x8_extend_low_u8x16(bytes);
    [
        f32x4_convert_u32x4(u32x4_extend_low_u16x8(words)),
        f32x4_convert_u32x4(u32x4_extend_high_u16x8(words)),
    ]
}

#[rite]
fn mac_wasm128(_token: Wasm128Token, s0: v128, s1: v128, s2: v128, row: [f32; 3]) -> v128 {
    let acc = f32x4_mul(s0, f32x4_splat(row[0]));
    let acc = f32x4_add(acc, f32x4_mul(s1, f32x4_splat(row[1])));
    let acc = f32x4_add(acc, f32x4_mul(s2, f32x4_splat(row[2])));
    i32x4_trunc_sat_f32x4(f32x4_nearest(acc))
}

/// Multiply-accumulate one output row, round to nearest, saturating narrow.
/// Result lives in bytes 0..8.
#[rite]
fn mac_narrow_wasm128(token: Wasm128Token, s: [[v128; 2]; 3], row: [f32; 3]) -> v128 {
    let lo = mac_wasm128(token, s[0][0], s[1][0], s[2][0], row);
    let hi = mac_wasm128(token, s[0][1], s[1][1], s[2][1], row);
    let words = i16x8_narrow_i32x4(lo, hi);
    u8x16_narrow_i16x8(words, words)
}

#[rite]
pub(super) fn correct_group_wasm128(
    token: Wasm128Token,
    src: &[u8; GROUP_BYTES],
    dst: &mut [u8; GROUP_BYTES],
) {
    let lo: &[u8; 16] = src[..16].try_into().unwrap();
    let hi: &[u8; 16] = src[8..].try_into().unwrap();
    let lo = v128_load(lo);
    let hi = v128_load(hi);

    let s = [
        gather_wasm128(token, lo, hi, 0),
        gather_wasm128(token, lo, hi, 1),
        gather_wasm128(token, lo, hi, 2),
    ];

    let p0 = mac_narrow_wasm128(token, s, LANE_COEFFS[0]);
    let p1 = mac_narrow_wasm128(token, s, LANE_COEFFS[1]);
    let p2 = mac_narrow_wasm128(token, s, LANE_COEFFS[2]);

    let a = u64x2_shuffle::<0, 2>(p0, p1);
    let out_lo = v128_or(
        i8x16_swizzle(a, v128_load(&SCATTER_A_LO)),
        i8x16_swizzle(p2, v128_load(&SCATTER_B_LO)),
    );
    let out_hi = v128_or(
        i8x16_swizzle(a, v128_load(&SCATTER_A_HI)),
        i8x16_swizzle(p2, v128_load(&SCATTER_B_HI)),
    );
    let d: &mut [u8; 16] = (&mut dst[..16]).try_into().unwrap();
    v128_store(d, out_lo);
    let mut tmp = [0u8; 16];
    v128_store(&mut tmp, out_hi);
    dst[16..].copy_from_slice(&tmp[..8]);
}

// ===========================================================================
// WASM SIMD128: rite row implementations
// ===========================================================================

#[rite]
pub(super) fn correct_row_wasm128(t: Wasm128Token, src: &[u8], dst: &mut [u8]) {
    let (src_groups, src_tail) = src.as_chunks::<GROUP_BYTES>();
    let (dst_groups, dst_tail) = dst.as_chunks_mut::<GROUP_BYTES>();
    for (s, d) in src_groups.iter().zip(dst_groups) {
        correct_group_wasm128(t, s, d);
    }
    correct_pixels(src_tail, dst_tail);
}

#[rite]
pub(super) fn correct_row_inplace_wasm128(t: Wasm128Token, row: &mut [u8]) {
    let (groups, tail) = row.as_chunks_mut::<GROUP_BYTES>();
    for g in groups {
        let s = *g;
        correct_group_wasm128(t, &s, g);
    }
    correct_pixels_inplace(tail);
}

// ===========================================================================
// WASM arcane contiguous wrappers
// ===========================================================================

#[arcane]
pub(super) fn correct_impl_wasm128(t: Wasm128Token, s: &[u8], d: &mut [u8]) {
    correct_row_wasm128(t, s, d);
}
#[arcane]
pub(super) fn correct_inplace_impl_wasm128(t: Wasm128Token, b: &mut [u8]) {
    correct_row_inplace_wasm128(t, b);
}

// ===========================================================================
// WASM arcane strided wrappers
// ===========================================================================

#[arcane]
pub(super) fn correct_strided_wasm128(
    t: Wasm128Token,
    src: &[u8],
    dst: &mut [u8],
    w: usize,
    h: usize,
    ss: usize,
    ds: usize,
) {
    for y in 0..h {
        correct_row_wasm128(t, &src[y * ss..][..w * 3], &mut dst[y * ds..][..w * 3]);
    }
}
#[arcane]
pub(super) fn correct_inplace_strided_wasm128(
    t: Wasm128Token,
    buf: &mut [u8],
    w: usize,
    h: usize,
    stride: usize,
) {
    for y in 0..h {
        correct_row_inplace_wasm128(t, &mut buf[y * stride..][..w * 3]);
    }
}
