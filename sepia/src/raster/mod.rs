//! Interleaved 3-channel 8-bit rasters and their planar (per-channel) form.

mod planar;


use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use planar::{PlanarBuffer, Sample, from_planar, to_planar};

/// Bytes per interleaved pixel.
pub const CHANNELS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}

impl Dimensions {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Pixel coordinate of planar index `i`.
    #[inline]
    pub fn coords(&self, i: usize) -> (usize, usize) {
        debug_assert!(i < self.pixel_count());
        (i % self.width, i / self.width)
    }
}

/// Byte layout of one interleaved pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChannelOrder {
    /// `[B, G, R]` per pixel.
    #[default]
    Bgr,
    /// `[R, G, B]` per pixel.
    Rgb,
}

impl ChannelOrder {
    /// Byte offsets of the blue, green and red samples within a pixel.
    #[inline]
    pub const fn offsets(self) -> [usize; 3] {
        match self {
            ChannelOrder::Bgr => [0, 1, 2],
            ChannelOrder::Rgb => [2, 1, 0],
        }
    }
}

/// Row-major interleaved raster with three 8-bit channels.
///
/// Rows may carry padding (`stride > width * 3`); padding bytes are never
/// read or written by the transform. A `Raster` is always well formed:
/// every constructor validates its dimensions and buffer length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    dims: Dimensions,
    stride: usize,
    order: ChannelOrder,
    bytes: Vec<u8>,
}

impl Raster {
    /// Creates a zeroed, tightly packed raster.
    pub fn new(width: usize, height: usize, order: ChannelOrder) -> Result<Self> {
        let stride = packed_row_len(width)?;
        let len = buffer_len(stride, height)?;
        Self::from_bytes(width, height, stride, order, vec![0; len])
    }

    /// Creates a packed raster with every pixel set to `(b, g, r)`.
    pub fn filled(
        width: usize,
        height: usize,
        order: ChannelOrder,
        (b, g, r): (u8, u8, u8),
    ) -> Result<Self> {
        let mut raster = Self::new(width, height, order)?;
        let [ob, og, or] = order.offsets();
        for px in raster.bytes.chunks_exact_mut(CHANNELS) {
            px[ob] = b;
            px[og] = g;
            px[or] = r;
        }
        Ok(raster)
    }

    /// Wraps an existing interleaved buffer handed over by a host.
    ///
    /// Rejects zero dimensions, a stride shorter than one row of pixels and a
    /// buffer whose length is not `stride * height`.
    pub fn from_bytes(
        width: usize,
        height: usize,
        stride: usize,
        order: ChannelOrder,
        bytes: Vec<u8>,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::MalformedRaster(format!(
                "zero-sized raster {}x{}",
                width, height
            )));
        }

        let row_len = packed_row_len(width)?;
        if stride < row_len {
            return Err(Error::MalformedRaster(format!(
                "stride {} is smaller than row length {}",
                stride, row_len
            )));
        }

        let expected = buffer_len(stride, height)?;
        if bytes.len() != expected {
            return Err(Error::MalformedRaster(format!(
                "buffer length {} does not match stride * height = {}",
                bytes.len(),
                expected
            )));
        }

        Ok(Self {
            dims: Dimensions::new(width, height),
            stride,
            order,
            bytes,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.dims.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.dims.height
    }

    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Returns the `(b, g, r)` samples of pixel `(x, y)`.
    ///
    /// Panics if `(x, y)` lies outside the raster, padding included.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> (u8, u8, u8) {
        let offset = self.pixel_offset(x, y);
        let [ob, og, or] = self.order.offsets();
        let px = &self.bytes[offset..offset + CHANNELS];
        (px[ob], px[og], px[or])
    }

    /// Writes the `(b, g, r)` samples of pixel `(x, y)`.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, (b, g, r): (u8, u8, u8)) {
        let offset = self.pixel_offset(x, y);
        let [ob, og, or] = self.order.offsets();
        let px = &mut self.bytes[offset..offset + CHANNELS];
        px[ob] = b;
        px[og] = g;
        px[or] = r;
    }

    /// Pixel bytes of each row, without padding.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        let row_len = self.dims.width * CHANNELS;
        self.bytes
            .chunks_exact(self.stride)
            .map(move |row| &row[..row_len])
    }

    /// Mutable pixel bytes of each row, without padding.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [u8]> {
        let row_len = self.dims.width * CHANNELS;
        self.bytes
            .chunks_exact_mut(self.stride)
            .map(move |row| &mut row[..row_len])
    }

    #[inline]
    fn pixel_offset(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.dims.width && y < self.dims.height,
            "pixel ({x}, {y}) out of bounds for {}x{} raster",
            self.dims.width,
            self.dims.height
        );
        y * self.stride + x * CHANNELS
    }
}

fn packed_row_len(width: usize) -> Result<usize> {
    width
        .checked_mul(CHANNELS)
        .ok_or_else(|| Error::MalformedRaster(format!("width {} overflows row length", width)))
}

fn buffer_len(stride: usize, height: usize) -> Result<usize> {
    stride.checked_mul(height).ok_or_else(|| {
        Error::MalformedRaster(format!(
            "stride {} * height {} overflows buffer length",
            stride, height
        ))
    })
}
