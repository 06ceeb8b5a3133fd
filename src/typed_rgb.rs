//! Color correction over [`rgb`] pixel slices via bytemuck.
//!
//! Byte positions are preserved: whatever the struct calls the fields, output
//! byte 0 of each pixel holds `d2`, byte 1 `d1` and byte 2 `d0`. The typed
//! forms only save the caller a `cast_slice`.
//!
//! ```rust
//! use rgb::Rgb;
//! use camwb::typed_rgb;
//!
//! let raw = vec![Rgb::new(10u8, 20, 30); 16];
//! let mut out = vec![Rgb::default(); 16];
//! typed_rgb::correct_rgb(&raw, &mut out).unwrap();
//! assert_eq!(out[0], Rgb::new(13, 13, 49));
//! ```

use crate::CorrectionError;
use rgb::{Bgr, Rgb};

/// Correct `src` into `dst`. Any non-zero pixel count is accepted.
pub fn correct_rgb(src: &[Rgb<u8>], dst: &mut [Rgb<u8>]) -> Result<(), CorrectionError> {
    let src_bytes: &[u8] = bytemuck::cast_slice(src);
    let dst_bytes: &mut [u8] = bytemuck::cast_slice_mut(dst);
    crate::bytes::correct(src_bytes, dst_bytes)
}

/// Correct `pixels` in place. An empty slice is left alone.
pub fn correct_rgb_mut(pixels: &mut [Rgb<u8>]) {
    if pixels.is_empty() {
        return;
    }
    let bytes: &mut [u8] = bytemuck::cast_slice_mut(pixels);
    crate::bytes::correct_inplace(bytes).expect("typed slice is always valid");
}

/// Correct `src` into `dst` for frames stored as [`Bgr`].
///
/// Same byte transform as [`correct_rgb`]; field `b` is position 0.
pub fn correct_bgr(src: &[Bgr<u8>], dst: &mut [Bgr<u8>]) -> Result<(), CorrectionError> {
    let src_bytes: &[u8] = bytemuck::cast_slice(src);
    let dst_bytes: &mut [u8] = bytemuck::cast_slice_mut(dst);
    crate::bytes::correct(src_bytes, dst_bytes)
}

#[cfg(test)]
mod tests {
    extern crate alloc;
    use super::*;
    use alloc::vec;

    #[test]
    fn test_correct_rgb() {
        let src = vec![Rgb::new(10u8, 20, 30), Rgb::new(255, 255, 255), Rgb::new(0, 0, 0)];
        let mut dst = vec![Rgb::default(); 3];
        correct_rgb(&src, &mut dst).unwrap();
        assert_eq!(dst[0], Rgb::new(13, 13, 49));
        assert_eq!(dst[1], Rgb::new(255, 250, 255));
        assert_eq!(dst[2], Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_correct_rgb_mut() {
        let mut pixels = vec![Rgb::new(10u8, 20, 30); 9];
        correct_rgb_mut(&mut pixels);
        assert!(pixels.iter().all(|&p| p == Rgb::new(13, 13, 49)));
        correct_rgb_mut(&mut []);
    }

    #[test]
    fn test_correct_bgr_keeps_positions() {
        let src = vec![Bgr {
            b: 10u8,
            g: 20,
            r: 30,
        }];
        let mut dst = vec![Bgr::default(); 1];
        correct_bgr(&src, &mut dst).unwrap();
        assert_eq!(
            dst[0],
            Bgr {
                b: 13,
                g: 13,
                r: 49
            }
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(correct_rgb(&[], &mut []), Err(CorrectionError::InvalidLength));
        let src = vec![Rgb::new(1u8, 2, 3); 4];
        let mut dst = vec![Rgb::default(); 3];
        assert_eq!(correct_rgb(&src, &mut dst), Err(CorrectionError::InvalidBuffer));
    }
}
