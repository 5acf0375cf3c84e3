//! C Foreign Function Interface for jpegxs-rs.
//!
//! Entry points keep the parameter order of the codec's C kernels so they can
//! be linked in place of them. Every precondition that can be checked from the
//! arguments is reported through [`JxsStatus`]; nothing panics across the
//! boundary for a checkable input. All calls use the detected backend.

use std::os::raw::c_int;
use std::slice;

use crate::error::KernelError;
use crate::kernels::{Kernels, validate_line_len};
use crate::quant::{QuantType, validate_groups};
use crate::transform::VerticalPosition;

/// Status codes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JxsStatus {
    Ok = 0,
    NullPointer = 1,
    LineTooShort = 2,
    InvalidGroups = 3,
    UnknownQuantType = 4,
    InvalidArgument = 5,
}

impl From<KernelError> for JxsStatus {
    fn from(err: KernelError) -> Self {
        match err {
            KernelError::LineTooShort { .. } => JxsStatus::LineTooShort,
            KernelError::InvalidGroupSize
            | KernelError::GcliTableTooShort { .. }
            | KernelError::GcliOutOfRange(_) => JxsStatus::InvalidGroups,
            KernelError::UnknownQuantType(_) => JxsStatus::UnknownQuantType,
            _ => JxsStatus::InvalidArgument,
        }
    }
}

fn finish(result: Result<(), JxsStatus>) -> JxsStatus {
    result.err().unwrap_or(JxsStatus::Ok)
}

unsafe fn input<'a, T>(ptr: *const T, len: usize) -> Result<&'a [T], JxsStatus> {
    if ptr.is_null() {
        return Err(JxsStatus::NullPointer);
    }
    Ok(unsafe { slice::from_raw_parts(ptr, len) })
}

unsafe fn output<'a, T>(ptr: *mut T, len: usize) -> Result<&'a mut [T], JxsStatus> {
    if ptr.is_null() {
        return Err(JxsStatus::NullPointer);
    }
    Ok(unsafe { slice::from_raw_parts_mut(ptr, len) })
}

fn line_len(len: u32) -> Result<usize, JxsStatus> {
    let len = len as usize;
    validate_line_len(len)?;
    Ok(len)
}

fn check_shift(shift: u8) -> Result<(), JxsStatus> {
    if shift >= 32 {
        return Err(JxsStatus::InvalidArgument);
    }
    Ok(())
}

/// HF rows read and output rows written, as (hf0, hf1, out[0..4]).
fn footprint(position: VerticalPosition) -> (bool, bool, [bool; 4]) {
    match position {
        VerticalPosition::Height2 => (false, true, [false, false, true, true]),
        VerticalPosition::FirstPrecinct => (false, true, [false, false, true, false]),
        VerticalPosition::LastPrecinctOdd => (true, false, [true, true, true, false]),
        VerticalPosition::LastPrecinctEven => (true, true, [true, true, true, true]),
        VerticalPosition::Interior => (true, true, [true, true, true, false]),
    }
}

/// Forward horizontal transform of `len` samples.
///
/// # Safety
/// `input` must hold `len` samples, `out_lf` `ceil(len / 2)` and `out_hf`
/// `floor(len / 2)`. The output buffers must not overlap.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn jxs_dwt_horizontal_line(
    out_lf: *mut i32,
    out_hf: *mut i32,
    input_line: *const i32,
    len: u32,
) -> JxsStatus {
    finish((|| -> Result<(), JxsStatus> {
        let len = line_len(len)?;
        let src = unsafe { input(input_line, len)? };
        let lf = unsafe { output(out_lf, len.div_ceil(2))? };
        let hf = unsafe { output(out_hf, len / 2)? };
        Kernels::detect().dwt_horizontal_line(src, lf, hf);
        Ok(())
    })())
}

/// Inverse horizontal transform from 16-bit LF and HF.
///
/// # Safety
/// `in_lf` must hold `ceil(len / 2)` samples, `in_hf` `floor(len / 2)` and
/// `out` `len`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn jxs_idwt_horizontal_line_lf16_hf16(
    in_lf: *const i16,
    in_hf: *const i16,
    out: *mut i32,
    len: u32,
    shift: u8,
) -> JxsStatus {
    finish((|| -> Result<(), JxsStatus> {
        let len = line_len(len)?;
        check_shift(shift)?;
        let lf = unsafe { input(in_lf, len.div_ceil(2))? };
        let hf = unsafe { input(in_hf, len / 2)? };
        let out = unsafe { output(out, len)? };
        Kernels::detect().idwt_horizontal_line_lf16(lf, hf, out, shift);
        Ok(())
    })())
}

/// Inverse horizontal transform from 32-bit LF and 16-bit HF. `shift` applies
/// to HF only.
///
/// # Safety
/// Same buffer sizes as [`jxs_idwt_horizontal_line_lf16_hf16`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn jxs_idwt_horizontal_line_lf32_hf16(
    in_lf: *const i32,
    in_hf: *const i16,
    out: *mut i32,
    len: u32,
    shift: u8,
) -> JxsStatus {
    finish((|| -> Result<(), JxsStatus> {
        let len = line_len(len)?;
        check_shift(shift)?;
        let lf = unsafe { input(in_lf, len.div_ceil(2))? };
        let hf = unsafe { input(in_hf, len / 2)? };
        let out = unsafe { output(out, len)? };
        Kernels::detect().idwt_horizontal_line_lf32(lf, hf, out, shift);
        Ok(())
    })())
}

/// Vertical inverse of one LF row. The precinct flags select the rows used;
/// pointers the selected case does not use may be null.
///
/// # Safety
/// `out` must point to four row pointers. Every row the case uses must hold
/// `len` samples, and the output rows must not overlap each other or the
/// inputs.
#[unsafe(no_mangle)]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn jxs_idwt_vertical_line(
    in_lf: *const i32,
    in_hf0: *const i32,
    in_hf1: *const i32,
    out: *const *mut i32,
    len: u32,
    first_precinct: c_int,
    last_precinct: c_int,
    height: c_int,
) -> JxsStatus {
    finish((|| -> Result<(), JxsStatus> {
        let len = line_len(len)?;
        let height = usize::try_from(height).map_err(|_| JxsStatus::InvalidArgument)?;
        let position = VerticalPosition::classify(first_precinct != 0, last_precinct != 0, height);
        let (reads_hf0, reads_hf1, writes) = footprint(position);

        let lf = unsafe { input(in_lf, len)? };
        let hf0: &[i32] = if reads_hf0 { unsafe { input(in_hf0, len)? } } else { &[] };
        let hf1: &[i32] = if reads_hf1 { unsafe { input(in_hf1, len)? } } else { &[] };
        let row_ptrs = unsafe { input(out, 4)? };

        let mut rows: [&mut [i32]; 4] = [&mut [], &mut [], &mut [], &mut []];
        for ((row, &ptr), &used) in rows.iter_mut().zip(row_ptrs).zip(&writes) {
            if used {
                *row = unsafe { output(ptr, len)? };
            }
        }
        Kernels::detect().idwt_vertical_line(lf, hf0, hf1, &mut rows, position);
        Ok(())
    })())
}

/// Recomputes `out[0]` of a boundary row. `in_hf0` is read only when
/// `precinct_line_idx > 1`.
///
/// # Safety
/// `out` must point to four row pointers of which `out[0]` holds `len`
/// samples; the used inputs must hold `len` samples.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn jxs_idwt_vertical_line_recalc(
    in_lf: *const i32,
    in_hf0: *const i32,
    in_hf1: *const i32,
    out: *const *mut i32,
    len: u32,
    precinct_line_idx: u32,
) -> JxsStatus {
    finish((|| -> Result<(), JxsStatus> {
        let len = line_len(len)?;
        let lf = unsafe { input(in_lf, len)? };
        let hf0: &[i32] = if precinct_line_idx > 1 {
            unsafe { input(in_hf0, len)? }
        } else {
            &[]
        };
        let hf1 = unsafe { input(in_hf1, len)? };
        let row_ptrs = unsafe { input(out, 4)? };
        let out0 = unsafe { output(row_ptrs[0], len)? };
        Kernels::detect().idwt_vertical_line_recalc(lf, hf0, hf1, out0, precinct_line_idx);
        Ok(())
    })())
}

/// Quantizes `size` sign-magnitude words in place.
///
/// # Safety
/// `coeffs` must hold `size` words and `gclis` `ceil(size / group_size)`
/// entries.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn jxs_quantization(
    coeffs: *mut u16,
    size: u32,
    gclis: *const u8,
    group_size: u32,
    gtli: u8,
    quant_type: u8,
) -> JxsStatus {
    finish((|| -> Result<(), JxsStatus> {
        let (size, group_size) = (size as usize, group_size as usize);
        let quant_type = QuantType::try_from(quant_type)?;
        if group_size == 0 {
            return Err(JxsStatus::InvalidGroups);
        }
        let gclis = unsafe { input(gclis, size.div_ceil(group_size))? };
        validate_groups(size, gclis, group_size)?;
        let coeffs = unsafe { output(coeffs, size)? };
        Kernels::detect().quantize(coeffs, gclis, group_size, gtli, quant_type);
        Ok(())
    })())
}

/// Dequantizes `size` sign-magnitude words in place.
///
/// # Safety
/// Same buffer sizes as [`jxs_quantization`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn jxs_dequant(
    coeffs: *mut u16,
    size: u32,
    gclis: *const u8,
    group_size: u32,
    gtli: u8,
    dq_type: u8,
) -> JxsStatus {
    finish((|| -> Result<(), JxsStatus> {
        let (size, group_size) = (size as usize, group_size as usize);
        let quant_type = QuantType::try_from(dq_type)?;
        if group_size == 0 {
            return Err(JxsStatus::InvalidGroups);
        }
        let gclis = unsafe { input(gclis, size.div_ceil(group_size))? };
        validate_groups(size, gclis, group_size)?;
        let coeffs = unsafe { output(coeffs, size)? };
        Kernels::detect().dequantize(coeffs, gclis, group_size, gtli, quant_type);
        Ok(())
    })())
}
