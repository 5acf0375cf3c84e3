//! Inverse 5/3 lifting (decoder side).
//!
//! The horizontal pass rebuilds a full-precision line from one LF and one HF
//! line. The vertical pass works on whole rows: it combines an LF row with the
//! HF rows above (`hf0`) and below (`hf1`) and writes into a window of four
//! output rows addressed by parity:
//!
//! ```text
//! out[0]  row 2k - 2  (even, already reconstructed)
//! out[1]  row 2k - 1  (odd)
//! out[2]  row 2k      (even, from this LF row)
//! out[3]  row 2k + 1  (odd, closing row of an even-height component)
//! ```

use crate::constants::MIN_LINE_LEN;
use crate::simd::I32Lanes;

/// Storage precision of an LF line fed to the horizontal inverse.
pub trait LfSample: Copy {
    /// Full-precision value of one sample.
    fn widen(self, shift: u32) -> i32;
    /// Full-precision values of `V::WIDTH` samples.
    fn load_lanes<V: I32Lanes>(src: &[Self], shift: u32) -> V;
}

/// Transform-native LF: scaled by `shift` like the HF line.
impl LfSample for i16 {
    #[inline(always)]
    fn widen(self, shift: u32) -> i32 {
        i32::from(self).shl(shift)
    }

    #[inline(always)]
    fn load_lanes<V: I32Lanes>(src: &[Self], shift: u32) -> V {
        V::load_widened(src).shl(shift)
    }
}

/// Intermediate LF, already at full precision.
impl LfSample for i32 {
    #[inline(always)]
    fn widen(self, _shift: u32) -> i32 {
        self
    }

    #[inline(always)]
    fn load_lanes<V: I32Lanes>(src: &[Self], _shift: u32) -> V {
        V::load(src)
    }
}

/// Which rows a vertical inverse call may read and write, decided by where the
/// LF row sits inside its component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerticalPosition {
    /// Two-row component: writes `out[2]` and `out[3]` from `hf1`.
    Height2,
    /// No row above yet: writes `out[2]` from `hf1`.
    FirstPrecinct,
    /// Odd height, no row below: writes `out[1]`, `out[2]` from `hf0`.
    LastPrecinctOdd,
    /// Even height, closing row: writes `out[1]`, `out[2]`, `out[3]`.
    LastPrecinctEven,
    /// Steady state: writes `out[1]`, `out[2]` from `hf0` and `hf1`.
    Interior,
}

impl VerticalPosition {
    /// Maps the precinct flags carried by the decode orchestrator to a position.
    pub fn classify(first_precinct: bool, last_precinct: bool, height: usize) -> Self {
        if height == 2 {
            VerticalPosition::Height2
        } else if first_precinct {
            VerticalPosition::FirstPrecinct
        } else if last_precinct && height % 2 == 1 {
            VerticalPosition::LastPrecinctOdd
        } else if last_precinct {
            VerticalPosition::LastPrecinctEven
        } else {
            VerticalPosition::Interior
        }
    }

    /// Position of LF row `row` in a component of `height` rows processed
    /// top to bottom in a single sweep.
    ///
    /// # Panics
    /// If `height == 0`.
    pub fn for_lf_row(row: usize, height: usize) -> Self {
        assert!(height > 0, "component height must be non-zero");
        let last_row = (height - 1) / 2;
        Self::classify(row == 0, row == last_row, height)
    }

    /// Only the steady-state rows are vectorized.
    pub fn uses_vector_path(self) -> bool {
        self == VerticalPosition::Interior
    }
}

/// Rebuilds `out.len()` samples from `ceil(len / 2)` LF and `floor(len / 2)` HF
/// samples. HF (and 16-bit LF) samples are scaled by `shift` before use.
///
/// The even outputs carry a running value: each odd sample needs the even
/// samples on both sides. Batches compute `V::WIDTH` evens at once, derive the
/// odds from them plus the even carried in from the previous batch, and hand
/// the batch's last even to the next one.
pub(crate) fn horizontal_line<V: I32Lanes, L: LfSample>(
    lf: &[L],
    hf: &[i16],
    out: &mut [i32],
    shift: u8,
) {
    let len = out.len();
    assert!(
        len >= MIN_LINE_LEN,
        "inverse DWT needs at least {MIN_LINE_LEN} samples, got {len}"
    );
    assert!(
        lf.len() >= len.div_ceil(2) && hf.len() >= len / 2,
        "inverse DWT input bands too short for {len} samples"
    );
    assert!(shift < 32, "HF shift {shift} exceeds the 32-bit sample width");
    let shift = u32::from(shift);
    let hf_at = |k: usize| i32::from(hf[k]).shl(shift);

    let mut e_prev = lf[0].widen(shift).sub(hf_at(0).add(1).shr(1));
    out[0] = e_prev;

    let pairs = (len - 2) / 2;
    let mut m = 0;
    if V::WIDTH > 1 {
        while m + V::WIDTH <= pairs {
            e_prev = unlift_batch::<V, L>(lf, hf, out, m, shift, e_prev);
            m += V::WIDTH;
        }
    }
    while m < pairs {
        e_prev = unlift_batch::<i32, L>(lf, hf, out, m, shift, e_prev);
        m += 1;
    }

    let h_last = hf_at(pairs);
    if len % 2 == 1 {
        let e_next = lf[pairs + 1].widen(shift).sub(h_last.add(1).shr(1));
        out[2 * pairs + 1] = h_last.add(e_prev.add(e_next).shr(1));
        out[2 * pairs + 2] = e_next;
    } else {
        out[2 * pairs + 1] = h_last.add(e_prev);
    }
}

#[inline(always)]
fn unlift_batch<V: I32Lanes, L: LfSample>(
    lf: &[L],
    hf: &[i16],
    out: &mut [i32],
    m: usize,
    shift: u32,
    e_prev: i32,
) -> i32 {
    let h_curr = V::load_widened(&hf[m..]).shl(shift);
    let h_next = V::load_widened(&hf[m + 1..]).shl(shift);
    let l = L::load_lanes::<V>(&lf[m + 1..], shift);

    let e = l.sub(h_curr.add(h_next).add(V::splat(2)).shr(2));
    let o = h_curr.add(e.shift_in_first(e_prev).add(e).shr(1));
    V::store_interleaved(o, e, &mut out[2 * m + 1..]);
    e.last()
}

/// Vertical inverse of one LF row. Unused `hf0`/`hf1`/`out` slots may be empty.
///
/// Only [`VerticalPosition::Interior`] runs on `V`; every boundary position is
/// computed with scalar lanes.
pub(crate) fn vertical_line<V: I32Lanes>(
    lf: &[i32],
    hf0: &[i32],
    hf1: &[i32],
    out: &mut [&mut [i32]; 4],
    position: VerticalPosition,
) {
    let len = lf.len();
    assert!(
        len >= MIN_LINE_LEN,
        "inverse DWT needs at least {MIN_LINE_LEN} samples, got {len}"
    );

    match position {
        VerticalPosition::Height2 => {
            let hf1 = &hf1[..len];
            let [_, _, out2, out3] = out;
            for (i, (&l, &h1)) in lf.iter().zip(hf1).enumerate() {
                let e = l.sub(h1.add(1).shr(1));
                out2[i] = e;
                out3[i] = h1.add(e);
            }
        }
        VerticalPosition::FirstPrecinct => {
            let hf1 = &hf1[..len];
            for ((dst, &l), &h1) in out[2][..len].iter_mut().zip(lf).zip(hf1) {
                *dst = l.sub(h1.add(1).shr(1));
            }
        }
        VerticalPosition::LastPrecinctOdd => {
            let hf0 = &hf0[..len];
            let [out0, out1, out2, _] = out;
            for (i, (&l, &h0)) in lf.iter().zip(hf0).enumerate() {
                let e = l.sub(h0.add(1).shr(1));
                out2[i] = e;
                out1[i] = h0.add(out0[i].add(e).shr(1));
            }
        }
        VerticalPosition::LastPrecinctEven => {
            let (hf0, hf1) = (&hf0[..len], &hf1[..len]);
            let [out0, out1, out2, out3] = out;
            for i in 0..len {
                let e = lf[i].sub(hf0[i].add(hf1[i]).add(2).shr(2));
                out2[i] = e;
                out1[i] = hf0[i].add(out0[i].add(e).shr(1));
                out3[i] = hf1[i].add(e);
            }
        }
        VerticalPosition::Interior => {
            let mut i = 0;
            if V::WIDTH > 1 {
                while i + V::WIDTH <= len {
                    interior_batch::<V>(lf, hf0, hf1, out, i);
                    i += V::WIDTH;
                }
            }
            while i < len {
                interior_batch::<i32>(lf, hf0, hf1, out, i);
                i += 1;
            }
        }
    }
}

#[inline(always)]
fn interior_batch<V: I32Lanes>(
    lf: &[i32],
    hf0: &[i32],
    hf1: &[i32],
    out: &mut [&mut [i32]; 4],
    i: usize,
) {
    let h0 = V::load(&hf0[i..]);
    let h1 = V::load(&hf1[i..]);
    let prev = V::load(&out[0][i..]);

    let e = V::load(&lf[i..]).sub(h0.add(h1).add(V::splat(2)).shr(2));
    let o = h0.add(prev.add(e).shr(1));
    e.store(&mut out[2][i..]);
    o.store(&mut out[1][i..]);
}

/// Recomputes the even row `out0` once more context is available while
/// streaming. With `precinct_line_idx <= 1` only `hf1` is known; later lines
/// use both neighbors, as in the steady state.
pub(crate) fn vertical_line_recalc<V: I32Lanes>(
    lf: &[i32],
    hf0: &[i32],
    hf1: &[i32],
    out0: &mut [i32],
    precinct_line_idx: u32,
) {
    let len = lf.len();
    assert!(
        len >= MIN_LINE_LEN,
        "inverse DWT needs at least {MIN_LINE_LEN} samples, got {len}"
    );

    let both_neighbors = precinct_line_idx > 1;
    let mut i = 0;
    if V::WIDTH > 1 {
        while i + V::WIDTH <= len {
            recalc_batch::<V>(lf, hf0, hf1, out0, i, both_neighbors);
            i += V::WIDTH;
        }
    }
    while i < len {
        recalc_batch::<i32>(lf, hf0, hf1, out0, i, both_neighbors);
        i += 1;
    }
}

#[inline(always)]
fn recalc_batch<V: I32Lanes>(
    lf: &[i32],
    hf0: &[i32],
    hf1: &[i32],
    out0: &mut [i32],
    i: usize,
    both_neighbors: bool,
) {
    let l = V::load(&lf[i..]);
    let h1 = V::load(&hf1[i..]);
    let e = if both_neighbors {
        l.sub(V::load(&hf0[i..]).add(h1).add(V::splat(2)).shr(2))
    } else {
        l.sub(h1.add(V::splat(1)).shr(1))
    };
    e.store(&mut out0[i..]);
}
