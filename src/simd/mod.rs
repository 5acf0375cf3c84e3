//! Lane abstraction shared by every kernel.
//!
//! Each kernel is written once against [`I32Lanes`] (lifting) or [`U16Lanes`]
//! (sign-magnitude quantization) and instantiated per backend:
//!
//! ```text
//! simd/
//! ├── mod.rs       # lane traits and backend selection
//! ├── scalar.rs    # width-1 lanes (plain i32 / u16)
//! ├── portable.rs  # fixed-size array lanes, autovectorized
//! └── x86_64.rs    # SSE2 intrinsics
//! ```
//!
//! Kernels run full batches on the wide lanes and finish the remainder with
//! the width-1 lanes, so every backend executes the same arithmetic. All lane
//! arithmetic wraps and shift counts past the lane width saturate the way the
//! SSE2 shift instructions do.

pub mod portable;
pub mod scalar;

// Newer toolchains make the register-only SSE2 intrinsics safe to call.
#[cfg(target_arch = "x86_64")]
#[allow(unused_unsafe)]
pub mod x86_64;

use std::fmt;
use std::str::FromStr;

use crate::constants::MAX_LANES;
use crate::error::KernelError;

/// A batch of signed 32-bit lanes used by the lifting kernels.
pub trait I32Lanes: Copy {
    const WIDTH: usize;

    fn splat(value: i32) -> Self;
    /// Loads `WIDTH` samples from the front of `src`.
    fn load(src: &[i32]) -> Self;
    /// Loads `WIDTH` 16-bit samples and sign-extends them.
    fn load_widened(src: &[i16]) -> Self;
    /// Loads `2 * WIDTH` samples and splits them into (even, odd) positions.
    fn load_deinterleaved(src: &[i32]) -> (Self, Self);
    fn store(self, dst: &mut [i32]);
    /// Stores `first[0], second[0], first[1], second[1], ...`.
    fn store_interleaved(first: Self, second: Self, dst: &mut [i32]);

    fn add(self, rhs: Self) -> Self;
    fn sub(self, rhs: Self) -> Self;
    /// Arithmetic right shift.
    fn shr(self, bits: u32) -> Self;
    fn shl(self, bits: u32) -> Self;

    /// `[first, self[0], .., self[WIDTH - 2]]`
    fn shift_in_first(self, first: i32) -> Self;
    /// `[self[1], .., self[WIDTH - 1], last]`
    fn shift_in_last(self, last: i32) -> Self;
    fn last(self) -> i32;
}

/// A batch of unsigned 16-bit lanes holding sign-magnitude coefficient words.
pub trait U16Lanes: Copy {
    const WIDTH: usize;

    fn splat(value: u16) -> Self;
    fn load(src: &[u16]) -> Self;
    fn store(self, dst: &mut [u16]);

    fn and(self, rhs: Self) -> Self;
    fn or(self, rhs: Self) -> Self;
    /// Logical right shift; counts of 16 or more clear the lane.
    fn shr(self, bits: u32) -> Self;
    /// Left shift; counts of 16 or more clear the lane.
    fn shl(self, bits: u32) -> Self;
    /// All-ones in every non-zero lane, zero elsewhere.
    fn nonzero_mask(self) -> Self;

    /// All-ones in each lane whose group has `gcli > gtli`.
    fn group_gate(gclis: &[u8], group_size: usize, start: usize, gtli: u8) -> Self {
        let mut gate = [0u16; MAX_LANES];
        for (lane, slot) in gate[..Self::WIDTH].iter_mut().enumerate() {
            if gclis[(start + lane) / group_size] > gtli {
                *slot = u16::MAX;
            }
        }
        Self::load(&gate)
    }
}

/// Kernel implementation family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Width-1 lanes everywhere.
    Scalar,
    /// Fixed-size array lanes (4 x i32, 8 x u16), left to the autovectorizer.
    Portable,
    /// SSE2 intrinsics (4 x i32, 8 x u16).
    #[cfg(target_arch = "x86_64")]
    Sse2,
}

impl Backend {
    /// Best backend for the running CPU and the enabled crate features.
    pub fn detect() -> Self {
        #[cfg(all(target_arch = "x86_64", feature = "simd"))]
        {
            if std::arch::is_x86_feature_detected!("sse2") {
                return Backend::Sse2;
            }
        }

        #[cfg(feature = "simd")]
        {
            Backend::Portable
        }

        #[cfg(not(feature = "simd"))]
        {
            Backend::Scalar
        }
    }

    /// Every backend usable on this target, scalar first.
    pub fn available() -> Vec<Backend> {
        let mut backends = vec![Backend::Scalar, Backend::Portable];
        #[cfg(target_arch = "x86_64")]
        {
            if std::arch::is_x86_feature_detected!("sse2") {
                backends.push(Backend::Sse2);
            }
        }
        backends
    }

    pub fn is_available(self) -> bool {
        Self::available().contains(&self)
    }

    pub fn name(self) -> &'static str {
        match self {
            Backend::Scalar => "scalar",
            Backend::Portable => "portable",
            #[cfg(target_arch = "x86_64")]
            Backend::Sse2 => "sse2",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = KernelError;

    /// Parses `scalar`, `portable`, `sse2` or `auto` (detected backend).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Backend::detect()),
            "scalar" => Ok(Backend::Scalar),
            "portable" => Ok(Backend::Portable),
            #[cfg(target_arch = "x86_64")]
            "sse2" => Ok(Backend::Sse2),
            #[cfg(not(target_arch = "x86_64"))]
            "sse2" => Err(KernelError::BackendUnavailable("sse2")),
            _ => Err(KernelError::UnknownBackend(s.to_string())),
        }
    }
}
