//! Fixed-size array lanes.
//!
//! Plain Rust over `[T; N]`, so it builds on every target and leaves the
//! vector instruction selection to LLVM.

use std::array;

use super::{I32Lanes, U16Lanes};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct I32x4(pub [i32; 4]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct U16x8(pub [u16; 8]);

impl I32x4 {
    #[inline(always)]
    fn map2(self, rhs: Self, f: impl Fn(i32, i32) -> i32) -> Self {
        Self(array::from_fn(|i| f(self.0[i], rhs.0[i])))
    }
}

impl I32Lanes for I32x4 {
    const WIDTH: usize = 4;

    #[inline(always)]
    fn splat(value: i32) -> Self {
        Self([value; 4])
    }

    #[inline(always)]
    fn load(src: &[i32]) -> Self {
        Self(array::from_fn(|i| src[i]))
    }

    #[inline(always)]
    fn load_widened(src: &[i16]) -> Self {
        Self(array::from_fn(|i| i32::from(src[i])))
    }

    #[inline(always)]
    fn load_deinterleaved(src: &[i32]) -> (Self, Self) {
        let src = &src[..8];
        (
            Self(array::from_fn(|i| src[2 * i])),
            Self(array::from_fn(|i| src[2 * i + 1])),
        )
    }

    #[inline(always)]
    fn store(self, dst: &mut [i32]) {
        dst[..4].copy_from_slice(&self.0);
    }

    #[inline(always)]
    fn store_interleaved(first: Self, second: Self, dst: &mut [i32]) {
        for (pair, (a, b)) in dst[..8]
            .chunks_exact_mut(2)
            .zip(first.0.into_iter().zip(second.0))
        {
            pair[0] = a;
            pair[1] = b;
        }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        self.map2(rhs, i32::wrapping_add)
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        self.map2(rhs, i32::wrapping_sub)
    }

    #[inline(always)]
    fn shr(self, bits: u32) -> Self {
        let bits = bits.min(31);
        Self(self.0.map(|v| v >> bits))
    }

    #[inline(always)]
    fn shl(self, bits: u32) -> Self {
        Self(self.0.map(|v| v.checked_shl(bits).unwrap_or(0)))
    }

    #[inline(always)]
    fn shift_in_first(self, first: i32) -> Self {
        let [a, b, c, _] = self.0;
        Self([first, a, b, c])
    }

    #[inline(always)]
    fn shift_in_last(self, last: i32) -> Self {
        let [_, b, c, d] = self.0;
        Self([b, c, d, last])
    }

    #[inline(always)]
    fn last(self) -> i32 {
        self.0[3]
    }
}

impl U16Lanes for U16x8 {
    const WIDTH: usize = 8;

    #[inline(always)]
    fn splat(value: u16) -> Self {
        Self([value; 8])
    }

    #[inline(always)]
    fn load(src: &[u16]) -> Self {
        Self(array::from_fn(|i| src[i]))
    }

    #[inline(always)]
    fn store(self, dst: &mut [u16]) {
        dst[..8].copy_from_slice(&self.0);
    }

    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        Self(array::from_fn(|i| self.0[i] & rhs.0[i]))
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        Self(array::from_fn(|i| self.0[i] | rhs.0[i]))
    }

    #[inline(always)]
    fn shr(self, bits: u32) -> Self {
        Self(self.0.map(|v| v.checked_shr(bits).unwrap_or(0)))
    }

    #[inline(always)]
    fn shl(self, bits: u32) -> Self {
        Self(self.0.map(|v| v.checked_shl(bits).unwrap_or(0)))
    }

    #[inline(always)]
    fn nonzero_mask(self) -> Self {
        Self(self.0.map(|v| if v != 0 { u16::MAX } else { 0 }))
    }
}
