//! Forward 5/3 lifting (encoder side).

use crate::constants::MIN_LINE_LEN;
use crate::simd::I32Lanes;

/// Splits `input` into `ceil(len / 2)` low-pass and `floor(len / 2)` high-pass
/// coefficients.
///
/// Predict: `hf[i] = odd[i] - ((even[i] + even[i + 1]) >> 1)`, with the last
/// odd sample of an even-length line predicted from its left neighbor only.
/// Update: `lf[i] = even[i] + ((hf[i - 1] + hf[i] + 2) >> 2)`, mirrored at both
/// ends. Full batches of `V::WIDTH` pairs run on `V`, the rest on scalar lanes.
pub(crate) fn horizontal_line<V: I32Lanes>(
    input: &[i32],
    out_lf: &mut [i32],
    out_hf: &mut [i32],
) {
    let len = input.len();
    assert!(
        len >= MIN_LINE_LEN,
        "forward DWT needs at least {MIN_LINE_LEN} samples, got {len}"
    );
    assert!(
        out_lf.len() >= len.div_ceil(2) && out_hf.len() >= len / 2,
        "forward DWT output bands too short for {len} samples"
    );

    if len == 2 {
        out_hf[0] = input[1].wrapping_sub(input[0]);
        out_lf[0] = input[0].wrapping_add(out_hf[0].wrapping_add(1) >> 1);
        return;
    }

    out_hf[0] = input[1].wrapping_sub(input[0].wrapping_add(input[2]) >> 1);
    out_lf[0] = input[0].wrapping_add(out_hf[0].wrapping_add(1) >> 1);

    // Pairs with a right even neighbor.
    let count = (len - 1) / 2;
    let mut id = 1;
    if V::WIDTH > 1 {
        while id + V::WIDTH <= count {
            lift_batch::<V>(input, out_lf, out_hf, id);
            id += V::WIDTH;
        }
    }
    while id < count {
        lift_batch::<i32>(input, out_lf, out_hf, id);
        id += 1;
    }

    if len % 2 == 0 {
        let last = len / 2 - 1;
        out_hf[last] = input[len - 1].wrapping_sub(input[len - 2]);
        out_lf[last] = input[len - 2]
            .wrapping_add(out_hf[last - 1].wrapping_add(out_hf[last]).wrapping_add(2) >> 2);
    } else {
        let last = len / 2;
        out_lf[last] = input[len - 1].wrapping_add(out_hf[last - 1].wrapping_add(1) >> 1);
    }
}

#[inline(always)]
fn lift_batch<V: I32Lanes>(input: &[i32], out_lf: &mut [i32], out_hf: &mut [i32], id: usize) {
    let (even, odd) = V::load_deinterleaved(&input[2 * id..]);
    let even_next = even.shift_in_last(input[2 * (id + V::WIDTH)]);
    let hf = odd.sub(even.add(even_next).shr(1));
    hf.store(&mut out_hf[id..]);

    let hf_prev = hf.shift_in_first(out_hf[id - 1]);
    let lf = even.add(hf_prev.add(hf).add(V::splat(2)).shr(2));
    lf.store(&mut out_lf[id..]);
}
