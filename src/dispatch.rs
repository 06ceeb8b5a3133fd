//! Frame-level entry point: pick an implementation once, then run it per frame.

use core::fmt;

#[cfg(any(target_arch = "x86_64", target_arch = "aarch64", target_arch = "wasm32"))]
use archmage::SimdToken;

use crate::bytes::{correct_bulk, correct_bulk_inplace, correct_pixels, correct_pixels_inplace};
use crate::{BYTES_PER_PIXEL, CorrectionError, GROUP_PIXELS};

/// Which implementation a [`WhiteBalancer`] runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Backend {
    /// x86-64-v3: AVX2 + FMA.
    Avx2,
    /// AArch64 NEON.
    Neon,
    /// WebAssembly SIMD128.
    Simd128,
    /// Per-pixel `f64` reference.
    Scalar,
}

impl Backend {
    /// Best vector backend the running CPU supports, or [`Backend::Scalar`].
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        if archmage::X64V3Token::summon().is_some() {
            return Self::Avx2;
        }
        #[cfg(target_arch = "aarch64")]
        if archmage::Arm64V2Token::summon().is_some() {
            return Self::Neon;
        }
        #[cfg(target_arch = "wasm32")]
        if archmage::Wasm128Token::summon().is_some() {
            return Self::Simd128;
        }
        Self::Scalar
    }

    /// `true` for every backend except [`Backend::Scalar`].
    pub fn is_vector(self) -> bool {
        !matches!(self, Self::Scalar)
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Avx2 => "avx2",
            Self::Neon => "neon",
            Self::Simd128 => "simd128",
            Self::Scalar => "scalar",
        })
    }
}

/// Frame dimensions in pixels. Always 3 bytes per pixel, rows packed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameGeometry {
    width: usize,
    height: usize,
    byte_len: usize,
}

impl FrameGeometry {
    /// Fails with [`CorrectionError::InvalidLength`] for a zero dimension or a
    /// frame whose byte size overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, CorrectionError> {
        if width == 0 || height == 0 {
            return Err(CorrectionError::InvalidLength);
        }
        let byte_len = width
            .checked_mul(height)
            .and_then(|px| px.checked_mul(BYTES_PER_PIXEL))
            .ok_or(CorrectionError::InvalidLength)?;
        Ok(Self {
            width,
            height,
            byte_len,
        })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// `width × height`.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Exact length, in bytes, of a frame buffer for this geometry.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }
}

/// Color-corrects whole frames of one fixed geometry.
///
/// The backend is chosen at construction: a vector backend when the CPU has
/// one and the frame is a whole number of 8-pixel groups, the per-pixel
/// reference otherwise.
///
/// ```rust
/// use camwb::{Backend, CorrectionError, FrameGeometry, WhiteBalancer};
///
/// let wb = WhiteBalancer::new(FrameGeometry::new(3, 1).unwrap());
/// assert_eq!(wb.backend(), Backend::Scalar); // 3 pixels: not a whole group
///
/// let mut frame = [10u8, 20, 30, 0, 0, 0, 255, 255, 255];
/// wb.white_balance_inplace(&mut frame).unwrap();
/// assert_eq!(frame, [13, 13, 49, 0, 0, 0, 255, 250, 255]);
///
/// assert_eq!(wb.white_balance_inplace(&mut [0; 6]), Err(CorrectionError::InvalidLength));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WhiteBalancer {
    geometry: FrameGeometry,
    backend: Backend,
}

impl WhiteBalancer {
    /// Configure for `geometry`, resolving the backend once.
    ///
    /// Uses [`Backend::detect`] when it finds a vector unit and
    /// [`FrameGeometry::pixel_count`] is a multiple of 8; every other case
    /// gets [`Backend::Scalar`]. The choice is logged at `debug`.
    pub fn new(geometry: FrameGeometry) -> Self {
        let detected = Backend::detect();
        let backend = if detected.is_vector() && geometry.pixel_count().is_multiple_of(GROUP_PIXELS)
        {
            detected
        } else {
            Backend::Scalar
        };
        tracing::debug!(
            width = geometry.width(),
            height = geometry.height(),
            %detected,
            %backend,
            "white balancer configured"
        );
        Self { geometry, backend }
    }

    /// Always use the per-pixel reference, regardless of CPU support.
    pub fn force_scalar(geometry: FrameGeometry) -> Self {
        tracing::debug!(
            width = geometry.width(),
            height = geometry.height(),
            "white balancer pinned to scalar"
        );
        Self {
            geometry,
            backend: Backend::Scalar,
        }
    }

    /// Backend chosen at construction.
    #[inline]
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Frame geometry this balancer accepts.
    #[inline]
    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    fn check_frame(&self, len: usize) -> Result<(), CorrectionError> {
        if len != self.geometry.byte_len() {
            tracing::trace!(len, expected = self.geometry.byte_len(), "rejected frame");
            return Err(CorrectionError::InvalidLength);
        }
        Ok(())
    }

    /// Correct one frame from `src` into `dst`.
    ///
    /// `src.len()` must equal [`FrameGeometry::byte_len`]
    /// ([`CorrectionError::InvalidLength`]) and `dst.len()` must equal
    /// `src.len()` ([`CorrectionError::InvalidBuffer`]).
    pub fn white_balance(&self, src: &[u8], dst: &mut [u8]) -> Result<(), CorrectionError> {
        self.check_frame(src.len())?;
        if dst.len() != src.len() {
            return Err(CorrectionError::InvalidBuffer);
        }
        if self.backend.is_vector() {
            correct_bulk(src, dst)
        } else {
            correct_pixels(src, dst);
            Ok(())
        }
    }

    /// In-place form of [`white_balance`](Self::white_balance).
    pub fn white_balance_inplace(&self, buf: &mut [u8]) -> Result<(), CorrectionError> {
        self.check_frame(buf.len())?;
        if self.backend.is_vector() {
            correct_bulk_inplace(buf)
        } else {
            correct_pixels_inplace(buf);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate alloc;
    use super::*;
    use crate::correct_pixel;
    use alloc::{vec, vec::Vec};

    fn frame(geometry: FrameGeometry) -> Vec<u8> {
        (0..geometry.byte_len()).map(|i| (i * 7 % 256) as u8).collect()
    }

    #[test]
    fn geometry_rejects_zero_and_overflow() {
        assert_eq!(FrameGeometry::new(0, 4), Err(CorrectionError::InvalidLength));
        assert_eq!(FrameGeometry::new(4, 0), Err(CorrectionError::InvalidLength));
        assert_eq!(
            FrameGeometry::new(usize::MAX, 2),
            Err(CorrectionError::InvalidLength)
        );
        assert_eq!(
            FrameGeometry::new(usize::MAX / 2, 1),
            Err(CorrectionError::InvalidLength)
        );
        let g = FrameGeometry::new(640, 480).unwrap();
        assert_eq!(g.pixel_count(), 307_200);
        assert_eq!(g.byte_len(), 921_600);
    }

    #[test]
    fn ragged_frames_use_scalar() {
        let wb = WhiteBalancer::new(FrameGeometry::new(3, 3).unwrap());
        assert_eq!(wb.backend(), Backend::Scalar);
        let wb = WhiteBalancer::new(FrameGeometry::new(8, 1).unwrap());
        assert_eq!(wb.backend(), Backend::detect());
    }

    #[test]
    fn scalar_backend_is_exact_reference() {
        let g = FrameGeometry::new(5, 3).unwrap();
        let wb = WhiteBalancer::force_scalar(g);
        let src = frame(g);
        let mut dst = vec![0u8; src.len()];
        wb.white_balance(&src, &mut dst).unwrap();
        for (s, d) in src.chunks_exact(3).zip(dst.chunks_exact(3)) {
            assert_eq!(d, correct_pixel([s[0], s[1], s[2]]));
        }
    }

    #[test]
    fn backends_agree_within_one() {
        let g = FrameGeometry::new(16, 4).unwrap();
        let src = frame(g);
        let mut vector = vec![0u8; src.len()];
        let mut scalar = vec![0u8; src.len()];
        WhiteBalancer::new(g).white_balance(&src, &mut vector).unwrap();
        WhiteBalancer::force_scalar(g).white_balance(&src, &mut scalar).unwrap();
        for (i, (v, s)) in vector.iter().zip(&scalar).enumerate() {
            assert!(v.abs_diff(*s) <= 1, "byte {i}: {v} vs {s}");
        }

        let mut buf = src.clone();
        WhiteBalancer::new(g).white_balance_inplace(&mut buf).unwrap();
        assert_eq!(buf, vector);
    }

    #[test]
    fn rejects_wrong_frame_sizes() {
        let g = FrameGeometry::new(8, 2).unwrap();
        for wb in [WhiteBalancer::new(g), WhiteBalancer::force_scalar(g)] {
            let src = vec![0u8; g.byte_len()];
            assert_eq!(
                wb.white_balance(&src[..24], &mut [0; 24]),
                Err(CorrectionError::InvalidLength)
            );
            let mut dst = vec![7u8; g.byte_len() - 3];
            assert_eq!(wb.white_balance(&src, &mut dst), Err(CorrectionError::InvalidBuffer));
            assert!(dst.iter().all(|&b| b == 7));
            assert_eq!(
                wb.white_balance_inplace(&mut [0; 51]),
                Err(CorrectionError::InvalidLength)
            );
        }
    }
}
