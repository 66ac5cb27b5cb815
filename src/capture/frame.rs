//! Luminance frame as delivered by a camera.

use std::time::Instant;

/// A single-channel luminance plane with its memory layout.
///
/// Cameras often pad rows or interleave planes, so pixel `(x, y)` lives
/// at `y * row_stride + x * pixel_stride`.
#[derive(Clone)]
pub struct LumaFrame {
    /// Raw luminance bytes.
    plane: Vec<u8>,
    /// Bytes between the starts of consecutive rows.
    row_stride: usize,
    /// Bytes between horizontally adjacent pixels.
    pixel_stride: usize,
    /// Frame width in pixels.
    width: u32,
    /// Frame height in pixels.
    height: u32,
    /// Capture timestamp.
    timestamp: Instant,
    /// Monotonic sequence number.
    sequence: u64,
}

impl LumaFrame {
    /// Creates a tightly packed frame (one byte per pixel, no row padding).
    pub fn new(plane: Vec<u8>, width: u32, height: u32, sequence: u64) -> Self {
        Self::with_strides(plane, width as usize, 1, width, height, sequence)
    }

    /// Creates a frame with an explicit memory layout.
    pub fn with_strides(
        plane: Vec<u8>,
        row_stride: usize,
        pixel_stride: usize,
        width: u32,
        height: u32,
        sequence: u64,
    ) -> Self {
        Self {
            plane,
            row_stride,
            pixel_stride,
            width,
            height,
            timestamp: Instant::now(),
            sequence,
        }
    }

    /// Returns the raw plane bytes.
    #[inline]
    pub fn plane(&self) -> &[u8] {
        &self.plane
    }

    #[inline]
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    #[inline]
    pub fn pixel_stride(&self) -> usize {
        self.pixel_stride
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Number of plane bytes the declared geometry requires.
    pub fn required_len(&self) -> usize {
        if self.width == 0 || self.height == 0 {
            return 0;
        }
        (self.height as usize - 1) * self.row_stride
            + (self.width as usize - 1) * self.pixel_stride
            + 1
    }

    /// Validates that the plane covers every addressed pixel.
    pub fn is_valid(&self) -> bool {
        self.required_len() > 0 && self.plane.len() >= self.required_len()
    }
}

impl std::fmt::Debug for LumaFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LumaFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("row_stride", &self.row_stride)
            .field("pixel_stride", &self.pixel_stride)
            .field("sequence", &self.sequence)
            .field("plane_bytes", &self.plane.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_frame() {
        let frame = LumaFrame::new(vec![0u8; 240 * 320], 240, 320, 1);

        assert_eq!(frame.width(), 240);
        assert_eq!(frame.row_stride(), 240);
        assert_eq!(frame.pixel_stride(), 1);
        assert_eq!(frame.sequence(), 1);
        assert!(frame.is_valid());
    }

    #[test]
    fn test_padded_rows() {
        // 4 bytes of padding per row; the last row needs no padding.
        let frame = LumaFrame::with_strides(vec![0u8; 12 * 7 + 8], 12, 1, 8, 8, 1);
        assert_eq!(frame.required_len(), 12 * 7 + 8);
        assert!(frame.is_valid());
    }

    #[test]
    fn test_short_plane_invalid() {
        let frame = LumaFrame::new(vec![0u8; 100], 240, 320, 1);
        assert!(!frame.is_valid());
    }
}
