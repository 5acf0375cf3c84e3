//! Per-group quantization of sign-magnitude coefficient words.
//!
//! Coefficients arrive as 16-bit words whose top bit is the sign
//! ([`BITSTREAM_MASK_SIGN`](crate::constants::BITSTREAM_MASK_SIGN)). Each run of `group_size` coefficients shares one
//! gcli; a group whose gcli does not exceed the pass's gtli is dropped to zero.
//! A zero magnitude is always written back without its sign bit.

pub mod dequantizer;
pub mod quantizer;
pub mod sign_magnitude;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::constants::MAX_GCLI;
use crate::error::KernelError;

/// Rounding policy shared by the quantizer and the dequantizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, TryFromPrimitive, IntoPrimitive)]
#[num_enum(error_type(name = KernelError, constructor = KernelError::UnknownQuantType))]
#[repr(u8)]
pub enum QuantType {
    /// Truncate to the gtli, reconstruct at the bin midpoint.
    #[default]
    Deadzone = 0,
    /// Round toward the bin center, reconstruct by geometric accumulation.
    Uniform = 1,
}

/// Checks the group metadata of a `size`-coefficient line once, before the
/// line reaches the panicking kernels.
pub fn validate_groups(size: usize, gclis: &[u8], group_size: usize) -> Result<(), KernelError> {
    if group_size == 0 {
        return Err(KernelError::InvalidGroupSize);
    }
    let required = size.div_ceil(group_size);
    if gclis.len() < required {
        return Err(KernelError::GcliTableTooShort {
            required,
            actual: gclis.len(),
        });
    }
    if let Some(&gcli) = gclis[..required].iter().find(|&&g| g > MAX_GCLI) {
        return Err(KernelError::GcliOutOfRange(gcli));
    }
    Ok(())
}
