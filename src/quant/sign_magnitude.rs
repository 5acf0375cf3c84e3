//! Conversion between signed coefficients and the 16-bit sign-magnitude words
//! the quantizer works on.

use crate::constants::{BITSTREAM_MASK_MAGNITUDE, BITSTREAM_MASK_SIGN};

/// Packs `value`, saturating the magnitude to 15 bits. Zero is always signless.
pub fn encode(value: i32) -> u16 {
    let magnitude = value
        .unsigned_abs()
        .min(u32::from(BITSTREAM_MASK_MAGNITUDE)) as u16;
    if value < 0 {
        magnitude | BITSTREAM_MASK_SIGN
    } else {
        magnitude
    }
}

pub fn decode(word: u16) -> i32 {
    let magnitude = i32::from(word & BITSTREAM_MASK_MAGNITUDE);
    if word & BITSTREAM_MASK_SIGN != 0 {
        -magnitude
    } else {
        magnitude
    }
}

pub fn encode_line(values: &[i32], out: &mut [u16]) {
    for (dst, &v) in out.iter_mut().zip(values) {
        *dst = encode(v);
    }
}

pub fn decode_line(words: &[u16], out: &mut [i32]) {
    for (dst, &w) in out.iter_mut().zip(words) {
        *dst = decode(w);
    }
}
