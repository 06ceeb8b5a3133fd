use core::arch::aarch64::{
    float32x4_t, uint8x8_t, uint8x16_t, vcombine_s16, vcombine_u8, vcvtnq_s32_f32, vcvtq_f32_u32,
    vfmaq_n_f32, vget_high_u16, vget_low_u16, vget_low_u8, vmovl_u8, vmovl_u16, vmulq_n_f32,
    vorrq_u8, vqmovn_s32, vqmovun_s16, vqtbl1q_u8,
};

use archmage::prelude::*;
use safe_unaligned_simd::aarch64::{vld1q_u8, vst1q_u8};

use super::tables::{GATHER_HI, GATHER_LO, SCATTER_A_HI, SCATTER_A_LO, SCATTER_B_HI, SCATTER_B_LO};
use super::{correct_pixels, correct_pixels_inplace};
use crate::GROUP_BYTES;
use crate::matrix::LANE_COEFFS;

// ===========================================================================
// ARM NEON: rite group kernel
// ===========================================================================

/// One input channel's 8 samples as two f32x4 halves.
#[rite]
fn gather_arm_v2(
    _token: Arm64V2Token,
    lo: uint8x16_t,
    hi: uint8x16_t,
    channel: usize,
) -> [float32x4_t; 2] {
    let bytes = vorrq_u8(
        vqtbl1q_u8(lo, vld1q_u8(&GATHER_LO[channel])),
        vqtbl1q_u8(hi, vld1q_u8(&GATHER_HI[channel])),
    );
    let words = vmovl_u8(vget_low_u8(bytes));
    [
        vcvtq_f32_u32(vmovl_u16(vget_low_u16(words))),
        vcvtq_f32_u32(vmovl_u16(vget_high_u16(words))),
    ]
}

/// Multiply-accumulate one output row, round to nearest, saturating narrow.
#[rite]
fn mac_narrow_arm_v2(_token: Arm64V2Token, s: [[float32x4_t; 2]; 3], row: [f32; 3]) -> uint8x8_t {
    let lo = vmulq_n_f32(s[0][0], row[0]);
    let lo = vfmaq_n_f32(lo, s[1][0], row[1]);
    let lo = vfmaq_n_f32(lo, s[2][0], row[2]);
    let hi = vmulq_n_f32(s[0][1], row[0]);
    let hi = vfmaq_n_f32(hi, s[1][1], row[1]);
    let hi = vfmaq_n_f32(hi, s[2][1], row[2]);
    let words = vcombine_s16(
        vqmovn_s32(vcvtnq_s32_f32(lo)),
        vqmovn_s32(vcvtnq_s32_f32(hi)),
    );
    vqmovun_s16(words)
}

#[rite]
pub(super) fn correct_group_arm_v2(
    token: Arm64V2Token,
    src: &[u8; GROUP_BYTES],
    dst: &mut [u8; GROUP_BYTES],
) {
    let lo: &[u8; 16] = src[..16].try_into().unwrap();
    let hi: &[u8; 16] = src[8..].try_into().unwrap();
    let lo = vld1q_u8(lo);
    let hi = vld1q_u8(hi);

    let s = [
        gather_arm_v2(token, lo, hi, 0),
        gather_arm_v2(token, lo, hi, 1),
        gather_arm_v2(token, lo, hi, 2),
    ];

    let p0 = mac_narrow_arm_v2(token, s, LANE_COEFFS[0]);
    let p1 = mac_narrow_arm_v2(token, s, LANE_COEFFS[1]);
    let p2 = mac_narrow_arm_v2(token, s, LANE_COEFFS[2]);

    let a = vcombine_u8(p0, p1);
    let b = vcombine_u8(p2, p2);
    let out_lo = vorrq_u8(
        vqtbl1q_u8(a, vld1q_u8(&SCATTER_A_LO)),
        vqtbl1q_u8(b, vld1q_u8(&SCATTER_B_LO)),
    );
    let out_hi = vorrq_u8(
        vqtbl1q_u8(a, vld1q_u8(&SCATTER_A_HI)),
        vqtbl1q_u8(b, vld1q_u8(&SCATTER_B_HI)),
    );
    let d: &mut [u8; 16] = (&mut dst[..16]).try_into().unwrap();
    vst1q_u8(d, out_lo);
    let mut tmp = [0u8; 16];
    vst1q_u8(&mut tmp, out_hi);
    dst[16..].copy_from_slice(&tmp[..8]);
}

// ===========================================================================
// ARM NEON: rite row implementations
// ===========================================================================

#[rite]
pub(super) fn correct_row_arm_v2(t: Arm64V2Token, src: &[u8], dst: &mut [u8]) {
    let (src_groups, src_tail) = src.as_chunks::<GROUP_BYTES>();
    let (dst_groups, dst_tail) = dst.as_chunks_mut::<GROUP_BYTES>();
    for (s, d) in src_groups.iter().zip(dst_groups) {
        correct_group_arm_v2(t, s, d);
    }
    correct_pixels(src_tail, dst_tail);
}

#[rite]
pub(super) fn correct_row_inplace_arm_v2(t: Arm64V2Token, row: &mut [u8]) {
    let (groups, tail) = row.as_chunks_mut::<GROUP_BYTES>();
    for g in groups {
        let s = *g;
        correct_group_arm_v2(t, &s, g);
    }
    correct_pixels_inplace(tail);
}

// ===========================================================================
// ARM arcane contiguous wrappers
// ===========================================================================

#[arcane]
pub(super) fn correct_impl_arm_v2(t: Arm64V2Token, s: &[u8], d: &mut [u8]) {
    correct_row_arm_v2(t, s, d);
}
#[arcane]
pub(super) fn correct_inplace_impl_arm_v2(t: Arm64V2Token, b: &mut [u8]) {
    correct_row_inplace_arm_v2(t, b);
}

// ===========================================================================
// ARM arcane strided wrappers
// ===========================================================================

#[arcane]
pub(super) fn correct_strided_arm_v2(
    t: Arm64V2Token,
    src: &[u8],
    dst: &mut [u8],
    w: usize,
    h: usize,
    ss: usize,
    ds: usize,
) {
    for y in 0..h {
        correct_row_arm_v2(t, &src[y * ss..][..w * 3], &mut dst[y * ds..][..w * 3]);
    }
}
#[arcane]
pub(super) fn correct_inplace_strided_arm_v2(
    t: Arm64V2Token,
    buf: &mut [u8],
    w: usize,
    h: usize,
    stride: usize,
) {
    for y in 0..h {
        correct_row_inplace_arm_v2(t, &mut buf[y * stride..][..w * 3]);
    }
}
