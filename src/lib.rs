//! # jpegxs-rs
//!
//! Numeric core of a JPEG XS codec: the reversible 5/3 wavelet transform and
//! the per-group quantizer/dequantizer, each with a scalar and vectorized
//! implementation that produce bit-identical results.
//!
//! ## Modules
//!
//! - [`transform`]: forward and inverse lifting (line, vertical row and
//!   multi-level plane drivers)
//! - [`quant`]: deadzone and uniform quantization of sign-magnitude words
//! - [`kernels`]: backend dispatch ([`Kernels`])
//! - [`simd`]: lane abstraction the kernels are written against
//!
//! ## Example
//!
//! ```
//! use jpegxs_rs::Kernels;
//!
//! let kernels = Kernels::detect();
//! let line = [10, 20, 30, 40, 50, 60];
//! let mut lf = [0; 3];
//! let mut hf = [0; 3];
//! kernels.dwt_horizontal_line(&line, &mut lf, &mut hf);
//!
//! let hf16 = hf.map(|v| v as i16);
//! let mut out = [0; 6];
//! kernels.idwt_horizontal_line_lf32(&lf, &hf16, &mut out, 0);
//! assert_eq!(out, line);
//! ```
//!
//! Kernels check their contracts with assertions; use the `validate_*`
//! helpers and the plane drivers for `Result`-based checks.

pub mod constants;
pub mod error;
pub mod kernels;
pub mod quant;
pub mod simd;
pub mod transform;

#[cfg(feature = "ffi")]
pub mod ffi;
#[cfg(feature = "parallel")]
pub mod parallel;

pub use error::KernelError;
pub use kernels::{Kernels, validate_line_len};
pub use quant::{QuantType, validate_groups};
pub use simd::Backend;
pub use transform::{Decomposition, Plane, VerticalPosition, forward_2d, inverse_2d};
