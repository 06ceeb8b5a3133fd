// ---------------------------------------------------------------------------
// Sensor color matrix, clamp policy, and output byte binding.
// ---------------------------------------------------------------------------

/// Destination byte position for each matrix output `d0`, `d1`, `d2`.
///
/// `d0` lands in byte 2, `d1` in byte 1, `d2` in byte 0.
pub const OUTPUT_POSITION: [usize; 3] = [2, 1, 0];

/// Fractional bits of the fixed-point coefficients.
pub(crate) const FIXED_SHIFT: u32 = 20;

/// A 3×3 linear map from raw sensor samples to corrected samples.
///
/// Rows are stored in formula order: `rows[i]` produces `d_i`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorMatrix {
    rows: [[f64; 3]; 3],
}

impl ColorMatrix {
    /// The camera's calibrated correction matrix.
    ///
    /// ```text
    /// d0 = -0.636*s0 - 0.369*s1 + 2.092*s2
    /// d1 =  0.162*s0 + 1.315*s1 - 0.495*s2
    /// d2 =  3.017*s0 - 0.664*s1 - 0.139*s2
    /// ```
    pub const CAMERA: Self = Self {
        rows: [
            [-0.636, -0.369, 2.092],
            [0.162, 1.315, -0.495],
            [3.017, -0.664, -0.139],
        ],
    };

    /// Rows in formula order (`d0`, `d1`, `d2`).
    pub const fn rows(&self) -> [[f64; 3]; 3] {
        self.rows
    }

    /// Rows reordered so that index `k` produces output byte `k`.
    pub const fn rows_by_position(&self) -> [[f64; 3]; 3] {
        let mut out = [[0.0; 3]; 3];
        let mut i = 0;
        while i < 3 {
            out[OUTPUT_POSITION[i]] = self.rows[i];
            i += 1;
        }
        out
    }

    /// Unclamped linear combination, in formula order.
    #[inline]
    pub fn apply(&self, s: [u8; 3]) -> [f64; 3] {
        let s = [s[0] as f64, s[1] as f64, s[2] as f64];
        self.rows.map(|row| row[0] * s[0] + row[1] * s[1] + row[2] * s[2])
    }

    /// Single-precision coefficients by output position, as fed to the
    /// vector lanes.
    pub const fn lane_coefficients(&self) -> [[f32; 3]; 3] {
        let rows = self.rows_by_position();
        let mut out = [[0.0f32; 3]; 3];
        let mut k = 0;
        while k < 3 {
            let mut j = 0;
            while j < 3 {
                out[k][j] = rows[k][j] as f32;
                j += 1;
            }
            k += 1;
        }
        out
    }

    /// Q20 fixed-point coefficients by output position.
    pub const fn fixed_coefficients(&self) -> [[i32; 3]; 3] {
        let rows = self.rows_by_position();
        let scale = (1u32 << FIXED_SHIFT) as f64;
        let mut out = [[0i32; 3]; 3];
        let mut k = 0;
        while k < 3 {
            let mut j = 0;
            while j < 3 {
                let c = rows[k][j];
                out[k][j] = if c < 0.0 {
                    -((-c * scale + 0.5) as i32)
                } else {
                    (c * scale + 0.5) as i32
                };
                j += 1;
            }
            k += 1;
        }
        out
    }
}

pub(crate) const LANE_COEFFS: [[f32; 3]; 3] = ColorMatrix::CAMERA.lane_coefficients();
pub(crate) const FIXED_COEFFS: [[i32; 3]; 3] = ColorMatrix::CAMERA.fixed_coefficients();

/// Clamp to `[0, 255]`, then round half up.
///
/// Total: NaN maps to 0.
#[inline]
pub fn clamp_to_u8(x: f64) -> u8 {
    (x.clamp(0.0, 255.0) + 0.5) as u8
}

/// Round a Q20 accumulator to the nearest integer and saturate to `u8`.
#[inline]
pub(crate) fn narrow_q20(acc: i32) -> u8 {
    let rounded = (acc + (1 << (FIXED_SHIFT - 1))) >> FIXED_SHIFT;
    rounded.clamp(0, 255) as u8
}
