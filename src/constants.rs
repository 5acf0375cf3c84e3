/// Sign flag of a sign-magnitude coefficient word, shared with the bitstream packer.
pub const BITSTREAM_MASK_SIGN: u16 = 0x8000;

/// Magnitude bits of a sign-magnitude coefficient word.
pub const BITSTREAM_MASK_MAGNITUDE: u16 = !BITSTREAM_MASK_SIGN;

/// Coefficients per group in the JPEG XS significance coding (one gcli per group).
pub const CANONICAL_GROUP_SIZE: usize = 4;

/// Largest gcli a 15-bit magnitude can produce.
pub const MAX_GCLI: u8 = 15;

// Lines shorter than this always take the scalar path.
pub const VECTOR_MIN_LEN: usize = 16;

/// Minimum number of samples any lifting step accepts.
pub const MIN_LINE_LEN: usize = 2;

/// Upper bound on horizontal decomposition levels accepted by the plane driver.
pub const MAX_HORIZONTAL_LEVELS: u8 = 8;

/// Widest lane count any backend uses; sizes scratch arrays in the lane traits.
pub const MAX_LANES: usize = 8;
