//! Link bitmap construction: for each pixel, record which of its four
//! neighbours (N/S/E/W) belong to the same region.
//!
//! `build_links` is the compile-time generic entry point; `build_links_dispatch`
//! is the runtime-typed wrapper that reinterprets a raw byte buffer according
//! to a [`PixelType`] tag, per the design note in `spec.md` §9.

use crate::error::{Error, Result};
use crate::pixel::{PixelSample, PixelType};
use bytemuck::Pod;

/// Bit set on cell `(x, y)` when the pixel to the east is in the same region.
pub const EAST: u8 = 1;
/// Bit set on cell `(x, y)` when the pixel to the west is in the same region.
pub const WEST: u8 = 2;
/// Bit set on cell `(x, y)` when the pixel to the north is in the same region.
pub const NORTH: u8 = 4;
/// Bit set on cell `(x, y)` when the pixel to the south is in the same region.
pub const SOUTH: u8 = 8;
/// Internal bit used transiently by the region extractor to mark visited
/// pixels. Never appears in an emitted [`crate::segment::Point::link`].
pub(crate) const OWNED: u8 = 16;

const DIR_MASK: u8 = EAST | WEST | NORTH | SOUTH;

/// A per-pixel bitmask array the same shape as the source image.
///
/// Bits obey the symmetry invariant of `spec.md` §3: `(x,y)` has `EAST` iff
/// `(x+1,y)` has `WEST`, and `(x,y)` has `NORTH` iff `(x,y+1)` has `SOUTH`.
/// `build_links` never emits an asymmetric pair.
#[derive(Debug, Clone)]
pub struct LinkMap {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl LinkMap {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0u8; width * height],
        }
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The four-direction link mask at `(x, y)`, with the internal `OWNED`
    /// bit stripped.
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.cells[self.idx(x, y)] & DIR_MASK
    }

    pub(crate) fn set_bit(&mut self, x: usize, y: usize, bit: u8) {
        let i = self.idx(x, y);
        self.cells[i] |= bit;
    }

    pub(crate) fn is_owned(&self, x: usize, y: usize) -> bool {
        self.cells[self.idx(x, y)] & OWNED != 0
    }

    pub(crate) fn mark_owned(&mut self, x: usize, y: usize) {
        let i = self.idx(x, y);
        self.cells[i] |= OWNED;
    }
}

/// Fill a link bitmap for a `width x height` view into `samples`, starting
/// at element `offset` with `stride` elements between consecutive rows.
///
/// `threshold` is clamped to `>= 0.0`; `threshold == 0.0` uses exact
/// equality (see [`PixelSample::within_tolerance`]).
///
/// # Errors
///
/// [`Error::InvalidArgument`] if `width == 0`, `height == 0`, `stride < width`,
/// or the buffer is too small to hold the described view.
pub fn build_links<T: PixelSample>(
    samples: &[T],
    offset: usize,
    width: usize,
    height: usize,
    stride: usize,
    threshold: f64,
) -> Result<LinkMap> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidArgument(
            "width and height must be positive".into(),
        ));
    }
    if stride < width {
        return Err(Error::InvalidArgument(format!(
            "stride {stride} is smaller than width {width}"
        )));
    }
    let required = offset
        .checked_add((height - 1) * stride)
        .and_then(|v| v.checked_add(width))
        .ok_or_else(|| Error::InvalidArgument("view bounds overflow".into()))?;
    if samples.len() < required {
        return Err(Error::InvalidArgument(
            "buffer too small for the described image view".into(),
        ));
    }

    let threshold = threshold.max(0.0);
    let mut map = LinkMap::new(width, height);
    let at = |x: usize, y: usize| samples[offset + y * stride + x];

    for y in 0..height {
        for x in 0..width {
            let v = at(x, y);
            if x + 1 < width && v.within_tolerance(at(x + 1, y), threshold) {
                map.set_bit(x, y, EAST);
                map.set_bit(x + 1, y, WEST);
            }
            if y + 1 < height && v.within_tolerance(at(x, y + 1), threshold) {
                map.set_bit(x, y, NORTH);
                map.set_bit(x, y + 1, SOUTH);
            }
        }
    }

    log::trace!(
        "build_links: {}x{} view, threshold={}",
        width,
        height,
        threshold
    );
    Ok(map)
}

fn cast_samples<T: Pod>(bytes: &[u8]) -> Result<&[T]> {
    bytemuck::try_cast_slice(bytes)
        .map_err(|_| Error::InvalidArgument("buffer is not aligned/sized for pixel type".into()))
}

/// Runtime-typed entry point: reinterpret `bytes` as samples of `pixel_type`
/// and build the link bitmap. Rejects unsupported tags (`Complex*`, `Rgb*`)
/// and the `None`-like absence of a concrete numeric type.
pub fn build_links_dispatch(
    bytes: &[u8],
    pixel_type: PixelType,
    offset: usize,
    width: usize,
    height: usize,
    stride: usize,
    threshold: f64,
) -> Result<LinkMap> {
    if !pixel_type.is_supported() {
        return Err(Error::InvalidArgument(format!(
            "unsupported pixel type for segmentation: {pixel_type:?}"
        )));
    }

    macro_rules! dispatch {
        ($t:ty) => {
            build_links::<$t>(cast_samples::<$t>(bytes)?, offset, width, height, stride, threshold)
        };
    }

    match pixel_type {
        PixelType::I8 => dispatch!(i8),
        PixelType::U8 => dispatch!(u8),
        PixelType::I16 => dispatch!(i16),
        PixelType::U16 => dispatch!(u16),
        PixelType::I32 => dispatch!(i32),
        PixelType::U32 => dispatch!(u32),
        PixelType::I64 => dispatch!(i64),
        PixelType::U64 => dispatch!(u64),
        PixelType::F32 => dispatch!(f32),
        PixelType::F64 => dispatch!(f64),
        PixelType::None
        | PixelType::Complex32
        | PixelType::Complex64
        | PixelType::Rgb
        | PixelType::Rgba => {
            unreachable!("rejected above by is_supported()")
        }
    }
}
