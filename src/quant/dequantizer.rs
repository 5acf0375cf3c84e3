//! Decoder-side reconstruction of quantized magnitudes.
//!
//! Only coefficients of live groups (`gcli > gtli`) with a non-zero magnitude
//! are touched; zeros stay zero and signless. Both policies are no-ops for
//! `gtli == 0`.

use crate::constants::{BITSTREAM_MASK_MAGNITUDE, BITSTREAM_MASK_SIGN};
use crate::simd::U16Lanes;

/// Sets bit `gtli - 1`, placing the value at the middle of its bin.
pub(crate) fn deadzone<V: U16Lanes>(coeffs: &mut [u16], gclis: &[u8], group_size: usize, gtli: u8) {
    if gtli == 0 {
        return;
    }
    let midpoint = 1u16.checked_shl(u32::from(gtli) - 1).unwrap_or(0);

    let len = coeffs.len();
    let mut i = 0;
    if V::WIDTH > 1 {
        while i + V::WIDTH <= len {
            deadzone_batch::<V>(coeffs, gclis, group_size, gtli, midpoint, i);
            i += V::WIDTH;
        }
    }
    while i < len {
        deadzone_batch::<u16>(coeffs, gclis, group_size, gtli, midpoint, i);
        i += 1;
    }
}

#[inline(always)]
fn deadzone_batch<V: U16Lanes>(
    coeffs: &mut [u16],
    gclis: &[u8],
    group_size: usize,
    gtli: u8,
    midpoint: u16,
    i: usize,
) {
    let words = V::load(&coeffs[i..]);
    let live = words
        .and(V::splat(BITSTREAM_MASK_MAGNITUDE))
        .nonzero_mask()
        .and(V::group_gate(gclis, group_size, i, gtli));
    words
        .or(V::splat(midpoint).and(live))
        .store(&mut coeffs[i..]);
}

/// Rebuilds the magnitude as `v + (v >> s) + (v >> 2s) + ...` with
/// `s = gcli - gtli + 1`, accumulating in 16 bits, then restores the sign.
pub(crate) fn uniform(coeffs: &mut [u16], gclis: &[u8], group_size: usize, gtli: u8) {
    if gtli == 0 {
        return;
    }
    for (i, word) in coeffs.iter_mut().enumerate() {
        let gcli = gclis[i / group_size];
        let mut value = *word & BITSTREAM_MASK_MAGNITUDE;
        if gcli <= gtli || value == 0 {
            continue;
        }
        let sign = *word & BITSTREAM_MASK_SIGN;
        let scale = u32::from(gcli - gtli) + 1;
        let mut acc = 0u16;
        while value > 0 {
            acc = acc.wrapping_add(value);
            value = value.checked_shr(scale).unwrap_or(0);
        }
        *word = acc | sign;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::portable::U16x8;

    #[test]
    fn test_deadzone_sets_midpoint() {
        let mut coeffs = [240u16, 224, BITSTREAM_MASK_SIGN | 32, 0];
        deadzone::<u16>(&mut coeffs, &[8], 4, 5);
        assert_eq!(coeffs, [240 | 16, 224 | 16, BITSTREAM_MASK_SIGN | 48, 0]);
    }

    #[test]
    fn test_deadzone_skips_signed_zero_and_dead_groups() {
        let mut coeffs = [BITSTREAM_MASK_SIGN, 64, 64, 64, 64, 64, 64, 64, 64];
        deadzone::<U16x8>(&mut coeffs, &[6, 3, 6], 4, 3);
        assert_eq!(coeffs, [BITSTREAM_MASK_SIGN, 68, 68, 68, 64, 64, 64, 64, 68]);
    }

    #[test]
    fn test_gtli_zero_is_noop() {
        let original = [0x1234u16, BITSTREAM_MASK_SIGN | 7, 0, 3];
        let mut coeffs = original;
        deadzone::<U16x8>(&mut coeffs, &[15], 4, 0);
        assert_eq!(coeffs, original);
        uniform(&mut coeffs, &[15], 4, 0);
        assert_eq!(coeffs, original);
    }

    #[test]
    fn test_uniform_accumulates() {
        // scale 5: 240 + 7
        let mut coeffs = [240u16, BITSTREAM_MASK_SIGN | 224];
        uniform(&mut coeffs, &[8], 4, 4);
        assert_eq!(coeffs, [247, BITSTREAM_MASK_SIGN | 231]);

        // scale 2: 64 + 16 + 4 + 1
        let mut coeffs = [BITSTREAM_MASK_SIGN | 64];
        uniform(&mut coeffs, &[7], 4, 6);
        assert_eq!(coeffs, [BITSTREAM_MASK_SIGN | 85]);
    }

    #[test]
    fn test_uniform_unvalidated_gcli_wraps() {
        // scale 255 leaves only the first term.
        let mut coeffs = [BITSTREAM_MASK_SIGN | 5, 9];
        uniform(&mut coeffs, &[255], 4, 1);
        assert_eq!(coeffs, [BITSTREAM_MASK_SIGN | 5, 9]);
    }

    #[test]
    fn test_deadzone_batches_match_scalar() {
        for len in 0usize..40 {
            let words: Vec<u16> = (0..len as u32).map(|i| (i * 52711 % 65536) as u16).collect();
            let gclis: Vec<u8> = (0..len.div_ceil(4) as u8).map(|g| (g * 7) % 16).collect();
            for gtli in [1, 4, 16] {
                let mut wide = words.clone();
                let mut narrow = words.clone();
                deadzone::<U16x8>(&mut wide, &gclis, 4, gtli);
                deadzone::<u16>(&mut narrow, &gclis, 4, gtli);
                assert_eq!(wide, narrow, "len {len} gtli {gtli}");
            }
        }
    }
}
