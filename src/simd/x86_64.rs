//! SSE2 lanes.
//!
//! SSE2 is part of the x86_64 baseline, so these are usable without runtime
//! feature checks. Shift counts go through the register-count forms
//! (`_mm_sra_epi32`, `_mm_srl_epi16`, ...), whose out-of-range behavior the
//! scalar lanes reproduce.

use std::arch::x86_64::*;

use super::{I32Lanes, U16Lanes};

#[derive(Debug, Clone, Copy)]
pub struct Sse2I32(__m128i);

#[derive(Debug, Clone, Copy)]
pub struct Sse2U16(__m128i);

#[inline(always)]
fn shift_count(bits: u32) -> __m128i {
    unsafe { _mm_cvtsi32_si128(bits.min(i32::MAX as u32) as i32) }
}

impl I32Lanes for Sse2I32 {
    const WIDTH: usize = 4;

    #[inline(always)]
    fn splat(value: i32) -> Self {
        Self(unsafe { _mm_set1_epi32(value) })
    }

    #[inline(always)]
    fn load(src: &[i32]) -> Self {
        let src = &src[..4];
        Self(unsafe { _mm_loadu_si128(src.as_ptr() as *const __m128i) })
    }

    #[inline(always)]
    fn load_widened(src: &[i16]) -> Self {
        let src = &src[..4];
        unsafe {
            let raw = _mm_loadl_epi64(src.as_ptr() as *const __m128i);
            Self(_mm_srai_epi32::<16>(_mm_unpacklo_epi16(raw, raw)))
        }
    }

    #[inline(always)]
    fn load_deinterleaved(src: &[i32]) -> (Self, Self) {
        let src = &src[..8];
        unsafe {
            let lo = _mm_castsi128_ps(_mm_loadu_si128(src.as_ptr() as *const __m128i));
            let hi = _mm_castsi128_ps(_mm_loadu_si128(src[4..].as_ptr() as *const __m128i));
            let even = _mm_castps_si128(_mm_shuffle_ps::<0b10_00_10_00>(lo, hi));
            let odd = _mm_castps_si128(_mm_shuffle_ps::<0b11_01_11_01>(lo, hi));
            (Self(even), Self(odd))
        }
    }

    #[inline(always)]
    fn store(self, dst: &mut [i32]) {
        let dst = &mut dst[..4];
        unsafe { _mm_storeu_si128(dst.as_mut_ptr() as *mut __m128i, self.0) }
    }

    #[inline(always)]
    fn store_interleaved(first: Self, second: Self, dst: &mut [i32]) {
        let dst = &mut dst[..8];
        unsafe {
            let lo = _mm_unpacklo_epi32(first.0, second.0);
            let hi = _mm_unpackhi_epi32(first.0, second.0);
            _mm_storeu_si128(dst.as_mut_ptr() as *mut __m128i, lo);
            _mm_storeu_si128(dst[4..].as_mut_ptr() as *mut __m128i, hi);
        }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self(unsafe { _mm_add_epi32(self.0, rhs.0) })
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self(unsafe { _mm_sub_epi32(self.0, rhs.0) })
    }

    #[inline(always)]
    fn shr(self, bits: u32) -> Self {
        Self(unsafe { _mm_sra_epi32(self.0, shift_count(bits)) })
    }

    #[inline(always)]
    fn shl(self, bits: u32) -> Self {
        Self(unsafe { _mm_sll_epi32(self.0, shift_count(bits)) })
    }

    #[inline(always)]
    fn shift_in_first(self, first: i32) -> Self {
        unsafe {
            Self(_mm_or_si128(
                _mm_slli_si128::<4>(self.0),
                _mm_cvtsi32_si128(first),
            ))
        }
    }

    #[inline(always)]
    fn shift_in_last(self, last: i32) -> Self {
        unsafe {
            Self(_mm_or_si128(
                _mm_srli_si128::<4>(self.0),
                _mm_slli_si128::<12>(_mm_cvtsi32_si128(last)),
            ))
        }
    }

    #[inline(always)]
    fn last(self) -> i32 {
        unsafe { _mm_cvtsi128_si32(_mm_shuffle_epi32::<0xFF>(self.0)) }
    }
}

impl U16Lanes for Sse2U16 {
    const WIDTH: usize = 8;

    #[inline(always)]
    fn splat(value: u16) -> Self {
        Self(unsafe { _mm_set1_epi16(value as i16) })
    }

    #[inline(always)]
    fn load(src: &[u16]) -> Self {
        let src = &src[..8];
        Self(unsafe { _mm_loadu_si128(src.as_ptr() as *const __m128i) })
    }

    #[inline(always)]
    fn store(self, dst: &mut [u16]) {
        let dst = &mut dst[..8];
        unsafe { _mm_storeu_si128(dst.as_mut_ptr() as *mut __m128i, self.0) }
    }

    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        Self(unsafe { _mm_and_si128(self.0, rhs.0) })
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        Self(unsafe { _mm_or_si128(self.0, rhs.0) })
    }

    #[inline(always)]
    fn shr(self, bits: u32) -> Self {
        Self(unsafe { _mm_srl_epi16(self.0, shift_count(bits)) })
    }

    #[inline(always)]
    fn shl(self, bits: u32) -> Self {
        Self(unsafe { _mm_sll_epi16(self.0, shift_count(bits)) })
    }

    #[inline(always)]
    fn nonzero_mask(self) -> Self {
        unsafe {
            let zero = _mm_cmpeq_epi16(self.0, _mm_setzero_si128());
            Self(_mm_xor_si128(zero, _mm_set1_epi16(-1)))
        }
    }
}
