//! Backend equivalence tests.
//!
//! Every vector backend available on the machine must reproduce the scalar
//! kernels bit for bit: around the vector threshold, across batch-width
//! remainders, on long lines, and for full-range random inputs.

use jpegxs_rs::{Backend, Kernels, QuantType, VerticalPosition};
use proptest::prelude::*;
use rand::{Rng, SeedableRng, rngs::StdRng};

const LENGTHS: &[usize] = &[
    2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 31, 32, 33, 64, 1003,
];

const POSITIONS: [VerticalPosition; 5] = [
    VerticalPosition::Height2,
    VerticalPosition::FirstPrecinct,
    VerticalPosition::LastPrecinctOdd,
    VerticalPosition::LastPrecinctEven,
    VerticalPosition::Interior,
];

fn vector_kernels() -> Vec<Kernels> {
    Backend::available()
        .into_iter()
        .filter(|&b| b != Backend::Scalar)
        .map(|b| Kernels::with_backend(b).expect("listed backend must be usable"))
        .collect()
}

fn random_i32(rng: &mut StdRng, len: usize) -> Vec<i32> {
    (0..len).map(|_| rng.gen_range(i32::MIN..=i32::MAX)).collect()
}

fn random_i16(rng: &mut StdRng, len: usize) -> Vec<i16> {
    (0..len).map(|_| rng.gen_range(i16::MIN..=i16::MAX)).collect()
}

fn random_words(rng: &mut StdRng, len: usize) -> Vec<u16> {
    (0..len).map(|_| rng.gen_range(0..=u16::MAX)).collect()
}

fn random_gclis(rng: &mut StdRng, groups: usize) -> Vec<u8> {
    (0..groups).map(|_| rng.gen_range(0..=15)).collect()
}

fn forward(kernels: &Kernels, input: &[i32]) -> (Vec<i32>, Vec<i32>) {
    let mut lf = vec![0; input.len().div_ceil(2)];
    let mut hf = vec![0; input.len() / 2];
    kernels.dwt_horizontal_line(input, &mut lf, &mut hf);
    (lf, hf)
}

fn inverse_lf16(kernels: &Kernels, lf: &[i16], hf: &[i16], len: usize, shift: u8) -> Vec<i32> {
    let mut out = vec![0; len];
    kernels.idwt_horizontal_line_lf16(lf, hf, &mut out, shift);
    out
}

fn inverse_lf32(kernels: &Kernels, lf: &[i32], hf: &[i16], len: usize, shift: u8) -> Vec<i32> {
    let mut out = vec![0; len];
    kernels.idwt_horizontal_line_lf32(lf, hf, &mut out, shift);
    out
}

fn vertical(
    kernels: &Kernels,
    lf: &[i32],
    hf0: &[i32],
    hf1: &[i32],
    rows: &[Vec<i32>; 4],
    position: VerticalPosition,
) -> [Vec<i32>; 4] {
    let mut rows = rows.clone();
    let [r0, r1, r2, r3] = &mut rows;
    let mut out = [&mut r0[..], &mut r1[..], &mut r2[..], &mut r3[..]];
    kernels.idwt_vertical_line(lf, hf0, hf1, &mut out, position);
    rows
}

fn quantized(
    kernels: &Kernels,
    words: &[u16],
    gclis: &[u8],
    group_size: usize,
    gtli: u8,
    quant_type: QuantType,
    inverse: bool,
) -> Vec<u16> {
    let mut coeffs = words.to_vec();
    if inverse {
        kernels.dequantize(&mut coeffs, gclis, group_size, gtli, quant_type);
    } else {
        kernels.quantize(&mut coeffs, gclis, group_size, gtli, quant_type);
    }
    coeffs
}

#[test]
fn test_dwt_horizontal_matches_scalar() {
    let mut rng = StdRng::seed_from_u64(0xD7_0001);
    for &len in LENGTHS {
        let input = random_i32(&mut rng, len);
        let expected = forward(&Kernels::scalar(), &input);
        for kernels in vector_kernels() {
            assert_eq!(
                forward(&kernels, &input),
                expected,
                "{} len {}",
                kernels.backend(),
                len
            );
        }
    }
}

#[test]
fn test_idwt_horizontal_matches_scalar() {
    let mut rng = StdRng::seed_from_u64(0xD7_0002);
    for &len in LENGTHS {
        let lf16 = random_i16(&mut rng, len.div_ceil(2));
        let lf32 = random_i32(&mut rng, len.div_ceil(2));
        let hf = random_i16(&mut rng, len / 2);
        for shift in [0, 1, 5, 17] {
            let expected16 = inverse_lf16(&Kernels::scalar(), &lf16, &hf, len, shift);
            let expected32 = inverse_lf32(&Kernels::scalar(), &lf32, &hf, len, shift);
            for kernels in vector_kernels() {
                assert_eq!(
                    inverse_lf16(&kernels, &lf16, &hf, len, shift),
                    expected16,
                    "lf16 {} len {} shift {}",
                    kernels.backend(),
                    len,
                    shift
                );
                assert_eq!(
                    inverse_lf32(&kernels, &lf32, &hf, len, shift),
                    expected32,
                    "lf32 {} len {} shift {}",
                    kernels.backend(),
                    len,
                    shift
                );
            }
        }
    }
}

#[test]
fn test_idwt_vertical_matches_scalar() {
    let mut rng = StdRng::seed_from_u64(0xD7_0003);
    for &len in LENGTHS {
        let lf = random_i32(&mut rng, len);
        let hf0 = random_i32(&mut rng, len);
        let hf1 = random_i32(&mut rng, len);
        let rows = [
            random_i32(&mut rng, len),
            random_i32(&mut rng, len),
            random_i32(&mut rng, len),
            random_i32(&mut rng, len),
        ];
        for position in POSITIONS {
            let expected = vertical(&Kernels::scalar(), &lf, &hf0, &hf1, &rows, position);
            for kernels in vector_kernels() {
                assert_eq!(
                    vertical(&kernels, &lf, &hf0, &hf1, &rows, position),
                    expected,
                    "{} len {} {:?}",
                    kernels.backend(),
                    len,
                    position
                );
            }
        }
    }
}

#[test]
fn test_idwt_vertical_recalc_matches_scalar() {
    let mut rng = StdRng::seed_from_u64(0xD7_0004);
    for &len in LENGTHS {
        let lf = random_i32(&mut rng, len);
        let hf0 = random_i32(&mut rng, len);
        let hf1 = random_i32(&mut rng, len);
        for idx in [0, 1, 2, 7] {
            let mut expected = vec![0; len];
            Kernels::scalar().idwt_vertical_line_recalc(&lf, &hf0, &hf1, &mut expected, idx);
            for kernels in vector_kernels() {
                let mut actual = vec![0; len];
                kernels.idwt_vertical_line_recalc(&lf, &hf0, &hf1, &mut actual, idx);
                assert_eq!(actual, expected, "{} len {} idx {}", kernels.backend(), len, idx);
            }
        }
    }
}

#[test]
fn test_quantization_matches_scalar() {
    let mut rng = StdRng::seed_from_u64(0xD7_0005);
    let mut sizes = vec![0, 1];
    sizes.extend_from_slice(LENGTHS);
    for &size in &sizes {
        let words = random_words(&mut rng, size);
        for group_size in [1, 3, 4, 5, 8] {
            let gclis = random_gclis(&mut rng, size.div_ceil(group_size));
            for gtli in [0, 1, 4, 9, 15, 16] {
                for quant_type in [QuantType::Deadzone, QuantType::Uniform] {
                    for inverse in [false, true] {
                        let expected = quantized(
                            &Kernels::scalar(),
                            &words,
                            &gclis,
                            group_size,
                            gtli,
                            quant_type,
                            inverse,
                        );
                        for kernels in vector_kernels() {
                            let actual = quantized(
                                &kernels, &words, &gclis, group_size, gtli, quant_type, inverse,
                            );
                            assert_eq!(
                                actual,
                                expected,
                                "{} size {} group {} gtli {} {:?} inverse {}",
                                kernels.backend(),
                                size,
                                group_size,
                                gtli,
                                quant_type,
                                inverse
                            );
                        }
                    }
                }
            }
        }
    }
}

proptest! {
    #[test]
    fn prop_dwt_matches_scalar(input in prop::collection::vec(any::<i32>(), 2..400)) {
        let expected = forward(&Kernels::scalar(), &input);
        for kernels in vector_kernels() {
            prop_assert_eq!(forward(&kernels, &input), expected.clone());
        }
    }

    #[test]
    fn prop_idwt_horizontal_matches_scalar(
        len in 2usize..400,
        shift in 0u8..12,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let lf16 = random_i16(&mut rng, len.div_ceil(2));
        let lf32 = random_i32(&mut rng, len.div_ceil(2));
        let hf = random_i16(&mut rng, len / 2);
        let expected16 = inverse_lf16(&Kernels::scalar(), &lf16, &hf, len, shift);
        let expected32 = inverse_lf32(&Kernels::scalar(), &lf32, &hf, len, shift);
        for kernels in vector_kernels() {
            prop_assert_eq!(inverse_lf16(&kernels, &lf16, &hf, len, shift), expected16.clone());
            prop_assert_eq!(inverse_lf32(&kernels, &lf32, &hf, len, shift), expected32.clone());
        }
    }

    #[test]
    fn prop_interior_vertical_matches_scalar(len in 2usize..400, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let lf = random_i32(&mut rng, len);
        let hf0 = random_i32(&mut rng, len);
        let hf1 = random_i32(&mut rng, len);
        let rows = [random_i32(&mut rng, len), vec![0; len], vec![0; len], vec![0; len]];
        let position = VerticalPosition::Interior;
        let expected = vertical(&Kernels::scalar(), &lf, &hf0, &hf1, &rows, position);
        for kernels in vector_kernels() {
            prop_assert_eq!(vertical(&kernels, &lf, &hf0, &hf1, &rows, position), expected.clone());
        }
    }

    #[test]
    fn prop_deadzone_matches_scalar(
        words in prop::collection::vec(any::<u16>(), 0..400),
        group_size in 1usize..9,
        gtli in 0u8..17,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let gclis = random_gclis(&mut rng, words.len().div_ceil(group_size));
        for inverse in [false, true] {
            let expected = quantized(
                &Kernels::scalar(), &words, &gclis, group_size, gtli, QuantType::Deadzone, inverse,
            );
            for kernels in vector_kernels() {
                let actual = quantized(
                    &kernels, &words, &gclis, group_size, gtli, QuantType::Deadzone, inverse,
                );
                prop_assert_eq!(actual, expected.clone());
            }
        }
    }
}
