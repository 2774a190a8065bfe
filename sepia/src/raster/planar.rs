use super::{CHANNELS, Dimensions, Raster};
use crate::error::{Error, Result};

/// Numeric type a planar channel buffer stores its samples in.
pub trait Sample: Copy + Default + PartialEq + Send + Sync + std::fmt::Debug + 'static {
    fn from_u8(value: u8) -> Self;

    /// Converts back to an 8-bit sample, saturating to `0..=255`.
    fn to_u8(self) -> u8;
}

impl Sample for u8 {
    #[inline]
    fn from_u8(value: u8) -> Self {
        value
    }

    #[inline]
    fn to_u8(self) -> u8 {
        self
    }
}

impl Sample for i32 {
    #[inline]
    fn from_u8(value: u8) -> Self {
        value as i32
    }

    #[inline]
    fn to_u8(self) -> u8 {
        self.clamp(0, u8::MAX as i32) as u8
    }
}

impl Sample for f32 {
    #[inline]
    fn from_u8(value: u8) -> Self {
        value as f32
    }

    /// Clamps, then truncates toward zero (NaN maps to 0).
    #[inline]
    fn to_u8(self) -> u8 {
        self.clamp(0.0, u8::MAX as f32) as u8
    }
}

/// Three independent channel sequences of `width * height` samples each.
///
/// Index `i` of every channel refers to pixel `(i % width, i / width)`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarBuffer<T> {
    dims: Dimensions,
    b: Vec<T>,
    g: Vec<T>,
    r: Vec<T>,
}

impl<T: Sample> PlanarBuffer<T> {
    /// Builds a planar buffer from existing channels of `dims.pixel_count()` samples.
    pub fn from_channels(dims: Dimensions, b: Vec<T>, g: Vec<T>, r: Vec<T>) -> Result<Self> {
        let len = dims.pixel_count();
        if len == 0 {
            return Err(Error::MalformedRaster(format!(
                "zero-sized planar buffer {}x{}",
                dims.width, dims.height
            )));
        }
        for (name, channel) in [("blue", &b), ("green", &g), ("red", &r)] {
            if channel.len() != len {
                return Err(Error::MalformedRaster(format!(
                    "{} channel has {} samples, expected {}",
                    name,
                    channel.len(),
                    len
                )));
            }
        }
        Ok(Self { dims, b, g, r })
    }

    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.b.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.b.is_empty()
    }

    #[inline]
    pub fn b(&self) -> &[T] {
        &self.b
    }

    #[inline]
    pub fn g(&self) -> &[T] {
        &self.g
    }

    #[inline]
    pub fn r(&self) -> &[T] {
        &self.r
    }

    /// Mutable `(b, g, r)` channel slices.
    #[inline]
    pub fn channels_mut(&mut self) -> (&mut [T], &mut [T], &mut [T]) {
        (&mut self.b, &mut self.g, &mut self.r)
    }
}

/// Splits an interleaved raster into planar `(b, g, r)` buffers.
pub fn to_planar<T: Sample>(raster: &Raster) -> Result<PlanarBuffer<T>> {
    let dims = raster.dimensions();
    let len = dims.pixel_count();

    let mut b = alloc_channel("blue", len)?;
    let mut g = alloc_channel("green", len)?;
    let mut r = alloc_channel("red", len)?;

    let [ob, og, or] = raster.order().offsets();
    for row in raster.rows() {
        for px in row.chunks_exact(CHANNELS) {
            b.push(T::from_u8(px[ob]));
            g.push(T::from_u8(px[og]));
            r.push(T::from_u8(px[or]));
        }
    }
    debug_assert_eq!(b.len(), len);

    Ok(PlanarBuffer { dims, b, g, r })
}

/// Writes planar samples back into the raster in its native channel order.
///
/// The raster is left untouched if the dimensions do not match.
pub fn from_planar<T: Sample>(planar: &PlanarBuffer<T>, raster: &mut Raster) -> Result<()> {
    if planar.dims != raster.dimensions() {
        return Err(Error::DimensionMismatch {
            expected: raster.dimensions(),
            actual: planar.dims,
        });
    }

    let width = planar.dims.width;
    let [ob, og, or] = raster.order().offsets();
    let channel_rows = planar
        .b
        .chunks_exact(width)
        .zip(planar.g.chunks_exact(width))
        .zip(planar.r.chunks_exact(width));

    for (row, ((b, g), r)) in raster.rows_mut().zip(channel_rows) {
        for (i, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
            px[ob] = b[i].to_u8();
            px[og] = g[i].to_u8();
            px[or] = r[i].to_u8();
        }
    }

    Ok(())
}

fn alloc_channel<T>(channel: &'static str, len: usize) -> Result<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| Error::Allocation { channel, len })?;
    Ok(buf)
}
