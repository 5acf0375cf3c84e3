use thiserror::Error;

use crate::constants::MAX_GCLI;

/// Errors reported by the validation layer that sits in front of the kernels.
///
/// The kernels themselves never return errors; out-of-contract calls panic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    #[error("line length {len} is below the minimum of {min}")]
    LineTooShort { len: usize, min: usize },
    #[error("group size must be non-zero")]
    InvalidGroupSize,
    #[error("gcli table has {actual} entries, {required} required")]
    GcliTableTooShort { required: usize, actual: usize },
    #[error("gcli {0} exceeds the maximum of {MAX_GCLI}")]
    GcliOutOfRange(u8),
    #[error("unknown quantization type {0}")]
    UnknownQuantType(u8),
    #[error("plane buffer holds {actual} samples, {expected} expected")]
    PlaneSizeMismatch { expected: usize, actual: usize },
    #[error("invalid decomposition: {vertical} vertical levels, {horizontal} horizontal levels")]
    InvalidDecomposition { horizontal: u8, vertical: u8 },
    #[error("{levels} decomposition levels do not fit a {width}x{height} plane")]
    TooManyLevels {
        levels: u8,
        width: usize,
        height: usize,
    },
    #[error("coefficient {0} does not fit a 16-bit band")]
    CoefficientOverflow(i32),
    #[error("unknown kernel backend \"{0}\"")]
    UnknownBackend(String),
    #[error("kernel backend {0} is not available on this target")]
    BackendUnavailable(&'static str),
}
