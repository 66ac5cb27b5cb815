//! Luminance contrast between the frame center and its surroundings.
//!
//! A square grid of [`SAMPLE_SIZE`]² pixels is subsampled from the
//! centered square of the frame. The middle [`TARGET_SIZE`]² cells are the
//! target, where the signalling light is expected. Contrast is how much
//! brighter the target is than the whole grid; a target darker than its
//! surroundings reads as zero.

use crate::capture::LumaFrame;
use std::ops::Range;
use thiserror::Error;

/// Side of the subsampled grid, in cells.
pub const SAMPLE_SIZE: usize = 80;
/// Side of the centered target grid, in cells.
pub const TARGET_SIZE: usize = 20;

const TARGET_START: usize = (SAMPLE_SIZE - TARGET_SIZE) / 2;
const TARGET_END: usize = (SAMPLE_SIZE + TARGET_SIZE) / 2;

/// Errors raised while sampling a frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleError {
    #[error("{width}x{height} frame is smaller than the sample grid")]
    FrameTooSmall { width: u32, height: u32 },
    #[error("plane holds {actual} bytes but the frame layout needs {required}")]
    PlaneTooShort { actual: usize, required: usize },
}

/// Pixel geometry of the sample grid inside a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Grid {
    /// Left edge of the centered square.
    x0: usize,
    /// Top edge of the centered square.
    y0: usize,
    /// Pixels between neighbouring grid cells.
    offset: usize,
}

impl Grid {
    fn for_frame(width: u32, height: u32) -> Option<Self> {
        let (width, height) = (width as usize, height as usize);
        let side = width.min(height);
        let offset = side / SAMPLE_SIZE;
        if offset == 0 {
            return None;
        }
        Some(Self {
            x0: (width - side) / 2,
            y0: (height - side) / 2,
            offset,
        })
    }
}

/// Frame pixels covered by the target grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Pixel rows, top to bottom.
    pub rows: Range<usize>,
    /// Pixel columns, left to right.
    pub cols: Range<usize>,
}

/// Returns the pixel region of a `width` x `height` frame that the
/// sampler treats as the target, or `None` if the frame is too small.
pub fn target_region(width: u32, height: u32) -> Option<Region> {
    let grid = Grid::for_frame(width, height)?;
    Some(Region {
        rows: grid.y0 + TARGET_START * grid.offset..grid.y0 + TARGET_END * grid.offset,
        cols: grid.x0 + TARGET_START * grid.offset..grid.x0 + TARGET_END * grid.offset,
    })
}

/// Subsampled view of one frame.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageSample {
    /// Grid cells, row-major.
    sample: Vec<u8>,
    /// Target cells, row-major.
    target: Vec<u8>,
}

impl ImageSample {
    /// A sample with every cell zero. Its contrast is zero.
    pub fn zeros() -> Self {
        Self {
            sample: vec![0; SAMPLE_SIZE * SAMPLE_SIZE],
            target: vec![0; TARGET_SIZE * TARGET_SIZE],
        }
    }

    /// Samples a luminance plane described by its strides and dimensions.
    pub fn from_plane(
        row_stride: usize,
        pixel_stride: usize,
        width: u32,
        height: u32,
        plane: &[u8],
    ) -> Result<Self, SampleError> {
        let grid = Grid::for_frame(width, height)
            .ok_or(SampleError::FrameTooSmall { width, height })?;

        // Farthest byte the grid touches.
        let last_row = grid.y0 + (SAMPLE_SIZE - 1) * grid.offset;
        let last_col = grid.x0 + (SAMPLE_SIZE - 1) * grid.offset;
        let required = last_row * row_stride + last_col * pixel_stride + 1;
        if plane.len() < required {
            return Err(SampleError::PlaneTooShort {
                actual: plane.len(),
                required,
            });
        }

        let mut sample = Vec::with_capacity(SAMPLE_SIZE * SAMPLE_SIZE);
        for row in 0..SAMPLE_SIZE {
            let y = grid.y0 + row * grid.offset;
            for col in 0..SAMPLE_SIZE {
                let x = grid.x0 + col * grid.offset;
                sample.push(plane[y * row_stride + x * pixel_stride]);
            }
        }

        let target = (TARGET_START..TARGET_END)
            .flat_map(|row| {
                let start = row * SAMPLE_SIZE;
                sample[start + TARGET_START..start + TARGET_END].iter().copied()
            })
            .collect();

        Ok(Self { sample, target })
    }

    /// Samples a frame.
    pub fn from_frame(frame: &LumaFrame) -> Result<Self, SampleError> {
        Self::from_plane(
            frame.row_stride(),
            frame.pixel_stride(),
            frame.width(),
            frame.height(),
            frame.plane(),
        )
    }

    /// All grid cells, row-major.
    pub fn sample_pixels(&self) -> &[u8] {
        &self.sample
    }

    /// Target cells, row-major.
    pub fn target_pixels(&self) -> &[u8] {
        &self.target
    }

    /// Target mean minus grid mean, clamped at zero.
    pub fn contrast(&self) -> u8 {
        let sample_mean = mean(&self.sample);
        let target_mean = mean(&self.target);
        target_mean.saturating_sub(sample_mean)
    }
}

impl Default for ImageSample {
    fn default() -> Self {
        Self::zeros()
    }
}

impl std::fmt::Debug for ImageSample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSample")
            .field("sample_mean", &mean(&self.sample))
            .field("target_mean", &mean(&self.target))
            .finish()
    }
}

/// Truncating mean of unsigned bytes.
fn mean(pixels: &[u8]) -> u8 {
    if pixels.is_empty() {
        return 0;
    }
    let total: u64 = pixels.iter().map(|&p| p as u64).sum();
    (total / pixels.len() as u64) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: u32 = 240;
    const H: u32 = 320;

    fn frame_with_spot(background: u8, spot: u8) -> LumaFrame {
        let mut plane = vec![background; (W * H) as usize];
        let region = target_region(W, H).unwrap();
        for y in region.rows {
            for x in region.cols.clone() {
                plane[y * W as usize + x] = spot;
            }
        }
        LumaFrame::new(plane, W, H, 0)
    }

    #[test]
    fn test_zeros_have_no_contrast() {
        assert_eq!(ImageSample::zeros().contrast(), 0);
    }

    #[test]
    fn test_zeroed_frame_has_no_contrast() {
        let frame = LumaFrame::new(vec![0u8; (W * H) as usize], W, H, 0);
        assert_eq!(ImageSample::from_frame(&frame).unwrap().contrast(), 0);
    }

    #[test]
    fn test_bright_target() {
        let sample = ImageSample::from_frame(&frame_with_spot(40, 240)).unwrap();
        assert_eq!(sample.target_pixels().len(), TARGET_SIZE * TARGET_SIZE);
        assert!(sample.target_pixels().iter().all(|&p| p == 240));
        // Grid mean: (400 * 240 + 6000 * 40) / 6400 = 52
        assert_eq!(sample.contrast(), 240 - 52);
    }

    #[test]
    fn test_dark_target_clamps_to_zero() {
        let sample = ImageSample::from_frame(&frame_with_spot(200, 10)).unwrap();
        assert_eq!(sample.contrast(), 0);
    }

    #[test]
    fn test_values_are_unsigned() {
        // 0xF0 must be read as 240, not as a negative byte.
        let sample = ImageSample::from_frame(&frame_with_spot(0x10, 0xF0)).unwrap();
        assert!(sample.contrast() > 100);
    }

    #[test]
    fn test_landscape_frame_centers_on_short_axis() {
        let region = target_region(H, W).unwrap();
        // side 240, x0 = 40, y0 = 0, offset 3
        assert_eq!(region.rows, 90..150);
        assert_eq!(region.cols, 130..190);
    }

    #[test]
    fn test_strided_plane() {
        // Two bytes per pixel, luminance in the first byte.
        let (w, h) = (160u32, 160u32);
        let row_stride = w as usize * 2;
        let mut plane = vec![0u8; row_stride * h as usize];
        let region = target_region(w, h).unwrap();
        for y in region.rows {
            for x in region.cols.clone() {
                plane[y * row_stride + x * 2] = 100;
            }
        }
        let sample = ImageSample::from_plane(row_stride, 2, w, h, &plane).unwrap();
        // Grid mean: 400 * 100 / 6400 = 6
        assert_eq!(sample.contrast(), 94);
    }

    #[test]
    fn test_small_frame_rejected() {
        let err = ImageSample::from_plane(40, 1, 40, 40, &[0u8; 1600]).unwrap_err();
        assert_eq!(err, SampleError::FrameTooSmall { width: 40, height: 40 });
    }

    #[test]
    fn test_short_plane_rejected() {
        let err = ImageSample::from_plane(240, 1, 240, 320, &[0u8; 1000]).unwrap_err();
        assert!(matches!(err, SampleError::PlaneTooShort { .. }));
    }
}
