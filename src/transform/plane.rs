//! Multi-level 2D transform of a whole component plane.
//!
//! Bands are kept in place in Mallat layout: after each level the low-pass
//! samples occupy the low indices of every transformed dimension and the next
//! level works on that top-left region only.
//!
//! The first `vertical` levels are 2D; the remaining ones transform rows only,
//! which gives the asymmetric decompositions JPEG XS uses for low-latency
//! profiles. On the inverse path, rows of vertical-HF bands (LH, HH) are fed to
//! the 16-bit LF variant and every other row to the 32-bit one; HF samples are
//! narrowed to 16 bits in both cases.

use tracing::trace;

use crate::constants::{MAX_HORIZONTAL_LEVELS, MIN_LINE_LEN};
use crate::error::KernelError;
use crate::kernels::Kernels;
use crate::transform::idwt::VerticalPosition;

/// A row-major plane of 32-bit samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane {
    width: usize,
    height: usize,
    data: Vec<i32>,
}

impl Plane {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    pub fn from_vec(width: usize, height: usize, data: Vec<i32>) -> Result<Self, KernelError> {
        let expected = width * height;
        if data.len() != expected {
            return Err(KernelError::PlaneSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[i32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [i32] {
        &mut self.data
    }

    pub fn row(&self, y: usize) -> &[i32] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    pub fn into_vec(self) -> Vec<i32> {
        self.data
    }
}

/// Number of horizontal and vertical decomposition levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decomposition {
    horizontal: u8,
    vertical: u8,
}

impl Decomposition {
    pub fn new(horizontal: u8, vertical: u8) -> Result<Self, KernelError> {
        if vertical > horizontal || horizontal > MAX_HORIZONTAL_LEVELS {
            return Err(KernelError::InvalidDecomposition {
                horizontal,
                vertical,
            });
        }
        Ok(Self {
            horizontal,
            vertical,
        })
    }

    pub fn horizontal(&self) -> u8 {
        self.horizontal
    }

    pub fn vertical(&self) -> u8 {
        self.vertical
    }

    /// Checks that every level leaves at least two samples in each dimension
    /// it transforms.
    pub fn validate_for(&self, width: usize, height: usize) -> Result<(), KernelError> {
        self.levels(width, height).map(|_| ())
    }

    fn levels(&self, width: usize, height: usize) -> Result<Vec<Level>, KernelError> {
        let mut levels = Vec::with_capacity(usize::from(self.horizontal));
        let (mut w, mut h) = (width, height);
        for index in 0..self.horizontal {
            let vertical = index < self.vertical;
            if w < MIN_LINE_LEN || (vertical && h < MIN_LINE_LEN) {
                return Err(KernelError::TooManyLevels {
                    levels: self.horizontal,
                    width,
                    height,
                });
            }
            let level = Level {
                width: w,
                height: h,
                vertical,
            };
            w = level.low_width();
            h = level.low_height();
            levels.push(level);
        }
        Ok(levels)
    }
}

/// Region transformed by one decomposition level.
#[derive(Debug, Clone, Copy)]
struct Level {
    width: usize,
    height: usize,
    vertical: bool,
}

impl Level {
    fn low_width(&self) -> usize {
        self.width.div_ceil(2)
    }

    fn low_height(&self) -> usize {
        if self.vertical {
            self.height.div_ceil(2)
        } else {
            self.height
        }
    }
}

/// Decomposes `plane` in place.
///
/// Fails with [`KernelError::CoefficientOverflow`] when a band that the inverse
/// reads at 16-bit precision does not fit; the plane is then partially
/// transformed.
pub fn forward_2d(
    kernels: &Kernels,
    plane: &mut Plane,
    decomposition: Decomposition,
) -> Result<(), KernelError> {
    let levels = decomposition.levels(plane.width, plane.height)?;
    let stride = plane.width;
    for (index, level) in levels.iter().enumerate() {
        trace!(
            level = index,
            width = level.width,
            height = level.height,
            vertical = level.vertical,
            "forward DWT level"
        );
        if level.vertical {
            forward_columns(kernels, &mut plane.data, stride, level);
        }
        forward_rows(kernels, &mut plane.data, stride, level)?;
    }
    Ok(())
}

/// Reconstructs a plane decomposed by [`forward_2d`] with the same
/// decomposition.
pub fn inverse_2d(
    kernels: &Kernels,
    plane: &mut Plane,
    decomposition: Decomposition,
) -> Result<(), KernelError> {
    let levels = decomposition.levels(plane.width, plane.height)?;
    let stride = plane.width;
    for (index, level) in levels.iter().enumerate().rev() {
        trace!(
            level = index,
            width = level.width,
            height = level.height,
            vertical = level.vertical,
            "inverse DWT level"
        );
        inverse_rows(kernels, &mut plane.data, stride, level)?;
        if level.vertical {
            inverse_columns(kernels, &mut plane.data, stride, level);
        }
    }
    Ok(())
}

fn forward_columns(kernels: &Kernels, data: &mut [i32], stride: usize, level: &Level) {
    let low = level.low_height();
    let mut column = vec![0i32; level.height];
    let mut lf = vec![0i32; low];
    let mut hf = vec![0i32; level.height - low];

    for x in 0..level.width {
        for (y, sample) in column.iter_mut().enumerate() {
            *sample = data[y * stride + x];
        }
        kernels.dwt_horizontal_line(&column, &mut lf, &mut hf);
        for (y, &coeff) in lf.iter().chain(&hf).enumerate() {
            data[y * stride + x] = coeff;
        }
    }
}

fn forward_rows(
    kernels: &Kernels,
    data: &mut [i32],
    stride: usize,
    level: &Level,
) -> Result<(), KernelError> {
    let low = level.low_width();
    let mut lf = vec![0i32; low];
    let mut hf = vec![0i32; level.width - low];

    for (y, row) in data.chunks_exact_mut(stride).take(level.height).enumerate() {
        let row = &mut row[..level.width];
        kernels.dwt_horizontal_line(row, &mut lf, &mut hf);
        check_narrow(&hf)?;
        if level.vertical && y >= level.low_height() {
            check_narrow(&lf)?;
        }
        row[..low].copy_from_slice(&lf);
        row[low..].copy_from_slice(&hf);
    }
    Ok(())
}

fn inverse_rows(
    kernels: &Kernels,
    data: &mut [i32],
    stride: usize,
    level: &Level,
) -> Result<(), KernelError> {
    let low = level.low_width();
    let mut lf16 = vec![0i16; low];
    let mut hf16 = vec![0i16; level.width - low];
    let mut line = vec![0i32; level.width];

    for (y, row) in data.chunks_exact_mut(stride).take(level.height).enumerate() {
        let row = &mut row[..level.width];
        narrow_into(&row[low..], &mut hf16)?;
        if level.vertical && y >= level.low_height() {
            narrow_into(&row[..low], &mut lf16)?;
            kernels.idwt_horizontal_line_lf16(&lf16, &hf16, &mut line, 0);
        } else {
            kernels.idwt_horizontal_line_lf32(&row[..low], &hf16, &mut line, 0);
        }
        row.copy_from_slice(&line);
    }
    Ok(())
}

fn inverse_columns(kernels: &Kernels, data: &mut [i32], stride: usize, level: &Level) {
    let (width, height, low) = (level.width, level.height, level.low_height());
    let lf_band = copy_rows(data, stride, width, 0..low);
    let hf_band = copy_rows(data, stride, width, low..height);

    for k in 0..low {
        let position = VerticalPosition::for_lf_row(k, height);
        let lf = &lf_band[k * width..(k + 1) * width];
        let hf0 = band_row(&hf_band, width, k.checked_sub(1));
        let hf1 = band_row(&hf_band, width, Some(k));
        let mut out = row_window(data, stride, width, height, 2 * k);
        kernels.idwt_vertical_line(lf, hf0, hf1, &mut out, position);
    }
}

fn copy_rows(data: &[i32], stride: usize, width: usize, rows: std::ops::Range<usize>) -> Vec<i32> {
    let mut band = Vec::with_capacity(rows.len() * width);
    for y in rows {
        band.extend_from_slice(&data[y * stride..y * stride + width]);
    }
    band
}

fn band_row(band: &[i32], width: usize, row: Option<usize>) -> &[i32] {
    row.and_then(|r| band.get(r * width..(r + 1) * width))
        .unwrap_or(&[])
}

/// Rows `center - 2 ..= center + 1` of the region; rows outside it stay empty.
fn row_window(
    data: &mut [i32],
    stride: usize,
    width: usize,
    height: usize,
    center: usize,
) -> [&mut [i32]; 4] {
    let mut window: [&mut [i32]; 4] = [&mut [], &mut [], &mut [], &mut []];
    let first = center.saturating_sub(2);
    for (y, row) in data
        .chunks_exact_mut(stride)
        .enumerate()
        .take(height)
        .skip(first)
        .take(center + 2 - first)
    {
        window[y + 2 - center] = &mut row[..width];
    }
    window
}

fn check_narrow(band: &[i32]) -> Result<(), KernelError> {
    match band.iter().find(|&&v| i16::try_from(v).is_err()) {
        Some(&v) => Err(KernelError::CoefficientOverflow(v)),
        None => Ok(()),
    }
}

fn narrow_into(src: &[i32], dst: &mut [i16]) -> Result<(), KernelError> {
    for (dst, &v) in dst.iter_mut().zip(src) {
        *dst = i16::try_from(v).map_err(|_| KernelError::CoefficientOverflow(v))?;
    }
    Ok(())
}
