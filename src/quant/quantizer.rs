//! Encoder-side quantization.

use crate::constants::{BITSTREAM_MASK_MAGNITUDE, BITSTREAM_MASK_SIGN};
use crate::simd::U16Lanes;

/// Truncates every magnitude to a multiple of `2^gtli`.
///
/// Groups with `gcli <= gtli` are cleared. The sign survives only on a
/// non-zero result. Full batches of `V::WIDTH` words run on `V`, the tail on
/// scalar lanes; the group gate is built per lane, so any group size works.
pub(crate) fn deadzone<V: U16Lanes>(coeffs: &mut [u16], gclis: &[u8], group_size: usize, gtli: u8) {
    let len = coeffs.len();
    let mut i = 0;
    if V::WIDTH > 1 {
        while i + V::WIDTH <= len {
            deadzone_batch::<V>(coeffs, gclis, group_size, gtli, i);
            i += V::WIDTH;
        }
    }
    while i < len {
        deadzone_batch::<u16>(coeffs, gclis, group_size, gtli, i);
        i += 1;
    }
}

#[inline(always)]
fn deadzone_batch<V: U16Lanes>(
    coeffs: &mut [u16],
    gclis: &[u8],
    group_size: usize,
    gtli: u8,
    i: usize,
) {
    let bits = u32::from(gtli);
    let words = V::load(&coeffs[i..]);
    let gate = V::group_gate(gclis, group_size, i, gtli);

    let sign = words.and(V::splat(BITSTREAM_MASK_SIGN));
    let magnitude = words
        .and(V::splat(BITSTREAM_MASK_MAGNITUDE))
        .shr(bits)
        .shl(bits);
    magnitude
        .or(sign.and(magnitude.nonzero_mask()))
        .and(gate)
        .store(&mut coeffs[i..]);
}

/// Rounding quantizer. With `scale = gcli - gtli + 1`:
///
/// ```text
/// d' = ((d << scale) - d + (1 << gcli)) >> (gcli + 1)
/// q  = d' << gtli
/// ```
///
/// evaluated in 32 bits and truncated to 16 bits at each assignment. The
/// per-coefficient shift amounts depend on the group, so this stays scalar on
/// every backend.
pub(crate) fn uniform(coeffs: &mut [u16], gclis: &[u8], group_size: usize, gtli: u8) {
    for (i, word) in coeffs.iter_mut().enumerate() {
        let gcli = gclis[i / group_size];
        *word = if gcli > gtli {
            uniform_word(*word, gcli, gtli)
        } else {
            0
        };
    }
}

fn uniform_word(word: u16, gcli: u8, gtli: u8) -> u16 {
    let sign = word & BITSTREAM_MASK_SIGN;
    let d = u32::from(word & BITSTREAM_MASK_MAGNITUDE);
    let scale = u32::from(gcli - gtli) + 1;
    let gcli = u32::from(gcli);

    let rounded = shl(d, scale)
        .wrapping_sub(d)
        .wrapping_add(shl(1, gcli))
        .checked_shr(gcli + 1)
        .unwrap_or(0) as u16;
    let q = shl(u32::from(rounded), u32::from(gtli)) as u16;
    if q != 0 { q | sign } else { q }
}

#[inline]
fn shl(value: u32, bits: u32) -> u32 {
    value.checked_shl(bits).unwrap_or(0)
}
