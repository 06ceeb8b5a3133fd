//! Whole-image color correction using [`imgref`] types.
//!
//! Images may be strided; each row is corrected on its own, so padding
//! between rows is never touched. No allocation, caller owns all buffers.
//!
//! ```rust
//! use rgb::Rgb;
//! use ::imgref::{ImgVec, ImgRefMut};
//! use camwb::imgref;
//!
//! let src = ImgVec::new(vec![Rgb::new(10u8, 20, 30); 6], 3, 2);
//! let mut dst_buf = vec![Rgb::default(); 6];
//! let dst = ImgRefMut::new(&mut dst_buf, 3, 2);
//! imgref::white_balance_img(src.as_ref(), dst).unwrap();
//! assert_eq!(dst_buf[5], Rgb::new(13, 13, 49));
//! ```

use imgref::{ImgRef, ImgRefMut, ImgVec};
use rgb::Rgb;

use crate::CorrectionError;

// ---------------------------------------------------------------------------
// Dimension checks
// ---------------------------------------------------------------------------

fn check_nonempty(w: usize, h: usize) -> Result<(), CorrectionError> {
    if w == 0 || h == 0 {
        Err(CorrectionError::InvalidLength)
    } else {
        Ok(())
    }
}

fn check_dims(sw: usize, sh: usize, dw: usize, dh: usize) -> Result<(), CorrectionError> {
    if sw != dw || sh != dh {
        Err(CorrectionError::InvalidBuffer)
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Copy
// ---------------------------------------------------------------------------

/// Correct `src` into `dst`. Both images must have the same width and height;
/// strides may differ.
pub fn white_balance_img(
    src: ImgRef<'_, Rgb<u8>>,
    mut dst: ImgRefMut<'_, Rgb<u8>>,
) -> Result<(), CorrectionError> {
    check_nonempty(src.width(), src.height())?;
    check_dims(src.width(), src.height(), dst.width(), dst.height())?;
    for (src_row, dst_row) in src.rows().zip(dst.rows_mut()) {
        let s: &[u8] = bytemuck::cast_slice(src_row);
        let d: &mut [u8] = bytemuck::cast_slice_mut(dst_row);
        crate::correct(s, d)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// In place
// ---------------------------------------------------------------------------

/// Correct an image in place, row by row.
pub fn white_balance_img_inplace(mut img: ImgRefMut<'_, Rgb<u8>>) -> Result<(), CorrectionError> {
    check_nonempty(img.width(), img.height())?;
    for row in img.rows_mut() {
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(row);
        crate::correct_inplace(bytes)?;
    }
    Ok(())
}

/// Take ownership of a frame, correct it in place and hand it back.
pub fn white_balance_imgvec(mut img: ImgVec<Rgb<u8>>) -> Result<ImgVec<Rgb<u8>>, CorrectionError> {
    white_balance_img_inplace(img.as_mut())?;
    Ok(img)
}
