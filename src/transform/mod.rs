//! Reversible 5/3 wavelet transform.
//!
//! - [`dwt`]: forward lifting of one line into LF/HF bands.
//! - [`idwt`]: inverse lifting, horizontal (per line) and vertical (per row,
//!   driven by [`VerticalPosition`]).
//! - [`plane`]: multi-level 2D driver built on the line kernels.
//!
//! Rounding is add-then-arithmetic-shift throughout, so every step is exactly
//! reversible in integer arithmetic.

pub mod dwt;
pub mod idwt;
pub mod plane;

pub use idwt::{LfSample, VerticalPosition};
pub use plane::{Decomposition, Plane, forward_2d, inverse_2d};
