//! Group-range parallelism on the rayon pool.
//!
//! A line is cut into chunks of whole groups, each paired with its own slice
//! of the gcli table, so chunks are independent and the result matches the
//! sequential kernels exactly.

use rayon::prelude::*;

use crate::kernels::Kernels;
use crate::quant::QuantType;

/// Quantizes `coeffs` with `groups_per_chunk` groups per rayon task.
///
/// # Panics
/// Under the conditions of [`Kernels::quantize`], or if
/// `groups_per_chunk == 0`.
pub fn quantize_par(
    kernels: &Kernels,
    coeffs: &mut [u16],
    gclis: &[u8],
    group_size: usize,
    gtli: u8,
    quant_type: QuantType,
    groups_per_chunk: usize,
) {
    for_each_chunk(coeffs, gclis, group_size, groups_per_chunk, |chunk, chunk_gclis| {
        kernels.quantize(chunk, chunk_gclis, group_size, gtli, quant_type)
    });
}

/// Dequantizes `coeffs` with `groups_per_chunk` groups per rayon task.
///
/// # Panics
/// Under the conditions of [`Kernels::dequantize`], or if
/// `groups_per_chunk == 0`.
pub fn dequantize_par(
    kernels: &Kernels,
    coeffs: &mut [u16],
    gclis: &[u8],
    group_size: usize,
    gtli: u8,
    quant_type: QuantType,
    groups_per_chunk: usize,
) {
    for_each_chunk(coeffs, gclis, group_size, groups_per_chunk, |chunk, chunk_gclis| {
        kernels.dequantize(chunk, chunk_gclis, group_size, gtli, quant_type)
    });
}

fn for_each_chunk<F>(
    coeffs: &mut [u16],
    gclis: &[u8],
    group_size: usize,
    groups_per_chunk: usize,
    op: F,
) where
    F: Fn(&mut [u16], &[u8]) + Sync,
{
    assert!(group_size > 0, "group size must be non-zero");
    assert!(groups_per_chunk > 0, "chunks must hold at least one group");
    let groups = coeffs.len().div_ceil(group_size);
    assert!(
        gclis.len() >= groups,
        "{} gclis cannot cover {} coefficients in groups of {group_size}",
        gclis.len(),
        coeffs.len()
    );

    coeffs
        .par_chunks_mut(groups_per_chunk * group_size)
        .zip(gclis[..groups].par_chunks(groups_per_chunk))
        .for_each(|(chunk, chunk_gclis)| op(chunk, chunk_gclis));
}
