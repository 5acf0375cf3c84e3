//! Kernel dispatch.
//!
//! A [`Kernels`] handle fixes the backend once; each call then picks the
//! scalar or the wide lanes from the call's length (and, for the vertical
//! inverse, its position). Every backend returns bit-identical results.

use std::sync::LazyLock;

use crate::constants::{CANONICAL_GROUP_SIZE, MIN_LINE_LEN, VECTOR_MIN_LEN};
use crate::error::KernelError;
use crate::quant::{QuantType, dequantizer, quantizer};
use crate::simd::Backend;
use crate::simd::portable::{I32x4, U16x8};
#[cfg(target_arch = "x86_64")]
use crate::simd::x86_64::{Sse2I32, Sse2U16};
use crate::transform::idwt::VerticalPosition;
use crate::transform::{dwt, idwt};

static DETECTED: LazyLock<Kernels> = LazyLock::new(|| {
    let kernels = Kernels::new(Backend::detect());
    tracing::debug!(backend = %kernels.backend, "selected kernel backend");
    kernels
});

/// Runs `kernel::<lanes>(args)` with the i32 lanes of `$backend`, or with
/// scalar lanes when `$wide` is false.
macro_rules! with_i32_lanes {
    ($backend:expr, $wide:expr, $($kernel:ident)::+, [$($extra:ty),*], ($($arg:expr),* $(,)?)) => {
        match ($backend, $wide) {
            (_, false) | (Backend::Scalar, _) => $($kernel)::+::<i32 $(, $extra)*>($($arg),*),
            (Backend::Portable, true) => $($kernel)::+::<I32x4 $(, $extra)*>($($arg),*),
            #[cfg(target_arch = "x86_64")]
            (Backend::Sse2, true) => $($kernel)::+::<Sse2I32 $(, $extra)*>($($arg),*),
        }
    };
}

macro_rules! with_u16_lanes {
    ($backend:expr, $wide:expr, $($kernel:ident)::+, ($($arg:expr),* $(,)?)) => {
        match ($backend, $wide) {
            (_, false) | (Backend::Scalar, _) => $($kernel)::+::<u16>($($arg),*),
            (Backend::Portable, true) => $($kernel)::+::<U16x8>($($arg),*),
            #[cfg(target_arch = "x86_64")]
            (Backend::Sse2, true) => $($kernel)::+::<Sse2U16>($($arg),*),
        }
    };
}

/// Handle to one backend's implementation of every kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernels {
    backend: Backend,
}

impl Kernels {
    fn new(backend: Backend) -> Self {
        Self { backend }
    }

    /// Process-wide handle for the detected backend.
    pub fn detect() -> Self {
        *DETECTED
    }

    /// Scalar lanes only; the reference the other backends are checked against.
    pub fn scalar() -> Self {
        Self::new(Backend::Scalar)
    }

    pub fn with_backend(backend: Backend) -> Result<Self, KernelError> {
        if backend.is_available() {
            Ok(Self::new(backend))
        } else {
            Err(KernelError::BackendUnavailable(backend.name()))
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Forward 5/3 transform of one line into `ceil(len/2)` LF and
    /// `floor(len/2)` HF samples.
    ///
    /// # Panics
    /// If `input.len() < 2` or either output band is too short.
    pub fn dwt_horizontal_line(&self, input: &[i32], out_lf: &mut [i32], out_hf: &mut [i32]) {
        with_i32_lanes!(
            self.backend,
            input.len() >= VECTOR_MIN_LEN,
            dwt::horizontal_line,
            [],
            (input, out_lf, out_hf)
        )
    }

    /// Inverse horizontal transform with 16-bit LF; both bands are scaled by
    /// `shift`. `out.len()` is the reconstructed line length.
    ///
    /// # Panics
    /// If `out.len() < 2` or either input band is too short.
    pub fn idwt_horizontal_line_lf16(&self, lf: &[i16], hf: &[i16], out: &mut [i32], shift: u8) {
        with_i32_lanes!(
            self.backend,
            out.len() >= VECTOR_MIN_LEN,
            idwt::horizontal_line,
            [i16],
            (lf, hf, out, shift)
        )
    }

    /// Inverse horizontal transform with full-precision LF; only HF is scaled
    /// by `shift`.
    ///
    /// # Panics
    /// If `out.len() < 2` or either input band is too short.
    pub fn idwt_horizontal_line_lf32(&self, lf: &[i32], hf: &[i16], out: &mut [i32], shift: u8) {
        with_i32_lanes!(
            self.backend,
            out.len() >= VECTOR_MIN_LEN,
            idwt::horizontal_line,
            [i32],
            (lf, hf, out, shift)
        )
    }

    /// Inverse vertical transform of one LF row into the parity window `out`
    /// (see [`crate::transform::idwt`]). Slots the position does not touch may
    /// be empty slices.
    ///
    /// # Panics
    /// If `lf.len() < 2` or a row the position uses is shorter than `lf`.
    pub fn idwt_vertical_line(
        &self,
        lf: &[i32],
        hf0: &[i32],
        hf1: &[i32],
        out: &mut [&mut [i32]; 4],
        position: VerticalPosition,
    ) {
        let wide = position.uses_vector_path() && lf.len() >= VECTOR_MIN_LEN;
        with_i32_lanes!(
            self.backend,
            wide,
            idwt::vertical_line,
            [],
            (lf, hf0, hf1, out, position)
        )
    }

    /// Recomputes a boundary even row once `precinct_line_idx` lines of context
    /// are available.
    ///
    /// # Panics
    /// If `lf.len() < 2` or a row in use is shorter than `lf`.
    pub fn idwt_vertical_line_recalc(
        &self,
        lf: &[i32],
        hf0: &[i32],
        hf1: &[i32],
        out0: &mut [i32],
        precinct_line_idx: u32,
    ) {
        with_i32_lanes!(
            self.backend,
            lf.len() >= VECTOR_MIN_LEN,
            idwt::vertical_line_recalc,
            [],
            (lf, hf0, hf1, out0, precinct_line_idx)
        )
    }

    /// Quantizes sign-magnitude words in place, one gcli per `group_size`
    /// coefficients.
    ///
    /// # Panics
    /// If `group_size == 0` or `gclis` holds fewer than
    /// `ceil(coeffs.len() / group_size)` entries.
    pub fn quantize(
        &self,
        coeffs: &mut [u16],
        gclis: &[u8],
        group_size: usize,
        gtli: u8,
        quant_type: QuantType,
    ) {
        check_group_contract(coeffs.len(), gclis, group_size);
        match quant_type {
            QuantType::Deadzone => with_u16_lanes!(
                self.backend,
                coeffs.len() >= CANONICAL_GROUP_SIZE,
                quantizer::deadzone,
                (coeffs, gclis, group_size, gtli)
            ),
            QuantType::Uniform => quantizer::uniform(coeffs, gclis, group_size, gtli),
        }
    }

    /// Reconstructs quantized sign-magnitude words in place. A `gtli` of zero
    /// leaves the line untouched.
    ///
    /// # Panics
    /// Under the same conditions as [`Kernels::quantize`].
    pub fn dequantize(
        &self,
        coeffs: &mut [u16],
        gclis: &[u8],
        group_size: usize,
        gtli: u8,
        quant_type: QuantType,
    ) {
        check_group_contract(coeffs.len(), gclis, group_size);
        match quant_type {
            QuantType::Deadzone => with_u16_lanes!(
                self.backend,
                coeffs.len() >= CANONICAL_GROUP_SIZE,
                dequantizer::deadzone,
                (coeffs, gclis, group_size, gtli)
            ),
            QuantType::Uniform => dequantizer::uniform(coeffs, gclis, group_size, gtli),
        }
    }
}

impl Default for Kernels {
    fn default() -> Self {
        Self::detect()
    }
}

fn check_group_contract(size: usize, gclis: &[u8], group_size: usize) {
    assert!(group_size > 0, "group size must be non-zero");
    assert!(
        gclis.len() >= size.div_ceil(group_size),
        "{} gclis cannot cover {size} coefficients in groups of {group_size}",
        gclis.len()
    );
}

/// Checks a line length against the lifting minimum.
pub fn validate_line_len(len: usize) -> Result<(), KernelError> {
    if len < MIN_LINE_LEN {
        return Err(KernelError::LineTooShort {
            len,
            min: MIN_LINE_LEN,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_is_cached() {
        assert_eq!(Kernels::detect(), Kernels::detect());
        assert_eq!(Kernels::default().backend(), Backend::detect());
    }

    #[test]
    fn test_with_backend() {
        assert_eq!(
            Kernels::with_backend(Backend::Scalar).map(|k| k.backend()),
            Ok(Backend::Scalar)
        );
        assert!(Kernels::with_backend(Backend::Portable).is_ok());
    }

    #[test]
    fn test_validate_line_len() {
        assert!(validate_line_len(2).is_ok());
        assert_eq!(
            validate_line_len(1),
            Err(KernelError::LineTooShort { len: 1, min: 2 })
        );
    }

    #[test]
    #[should_panic(expected = "group size must be non-zero")]
    fn test_quantize_rejects_zero_group_size() {
        Kernels::scalar().quantize(&mut [1, 2], &[4], 0, 1, QuantType::Deadzone);
    }

    #[test]
    #[should_panic(expected = "cannot cover")]
    fn test_dequantize_rejects_short_gcli_table() {
        Kernels::scalar().dequantize(&mut [1; 9], &[4, 4], 4, 1, QuantType::Uniform);
    }
}
