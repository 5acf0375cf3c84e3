//! Width-1 lanes.
//!
//! These are the reference arithmetic: every wide backend must match them lane
//! for lane, and every kernel uses them to finish a line after its last full
//! batch.

use super::{I32Lanes, U16Lanes};

impl I32Lanes for i32 {
    const WIDTH: usize = 1;

    #[inline(always)]
    fn splat(value: i32) -> Self {
        value
    }

    #[inline(always)]
    fn load(src: &[i32]) -> Self {
        src[0]
    }

    #[inline(always)]
    fn load_widened(src: &[i16]) -> Self {
        i32::from(src[0])
    }

    #[inline(always)]
    fn load_deinterleaved(src: &[i32]) -> (Self, Self) {
        (src[0], src[1])
    }

    #[inline(always)]
    fn store(self, dst: &mut [i32]) {
        dst[0] = self;
    }

    #[inline(always)]
    fn store_interleaved(first: Self, second: Self, dst: &mut [i32]) {
        dst[0] = first;
        dst[1] = second;
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        self.wrapping_add(rhs)
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        self.wrapping_sub(rhs)
    }

    #[inline(always)]
    fn shr(self, bits: u32) -> Self {
        self >> bits.min(31)
    }

    #[inline(always)]
    fn shl(self, bits: u32) -> Self {
        self.checked_shl(bits).unwrap_or(0)
    }

    #[inline(always)]
    fn shift_in_first(self, first: i32) -> Self {
        first
    }

    #[inline(always)]
    fn shift_in_last(self, last: i32) -> Self {
        last
    }

    #[inline(always)]
    fn last(self) -> i32 {
        self
    }
}

impl U16Lanes for u16 {
    const WIDTH: usize = 1;

    #[inline(always)]
    fn splat(value: u16) -> Self {
        value
    }

    #[inline(always)]
    fn load(src: &[u16]) -> Self {
        src[0]
    }

    #[inline(always)]
    fn store(self, dst: &mut [u16]) {
        dst[0] = self;
    }

    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        self & rhs
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        self | rhs
    }

    #[inline(always)]
    fn shr(self, bits: u32) -> Self {
        self.checked_shr(bits).unwrap_or(0)
    }

    #[inline(always)]
    fn shl(self, bits: u32) -> Self {
        self.checked_shl(bits).unwrap_or(0)
    }

    #[inline(always)]
    fn nonzero_mask(self) -> Self {
        if self != 0 { u16::MAX } else { 0 }
    }

    #[inline(always)]
    fn group_gate(gclis: &[u8], group_size: usize, start: usize, gtli: u8) -> Self {
        if gclis[start / group_size] > gtli {
            u16::MAX
        } else {
            0
        }
    }
}
