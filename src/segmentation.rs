//! The segmentation handle: an immutable, reference-counted container for
//! a segment table plus the shared point buffer backing it.

use crate::error::{Error, Result};
use crate::link;
use crate::pixel::PixelType;
use crate::segment::{self, Point, Segment};
use std::sync::Arc;

struct SegmentationInner {
    points: Vec<Point>,
    segments: Vec<Segment>,
    image_width: usize,
    image_height: usize,
}

/// Immutable, reference-counted handle over a segment table and the point
/// buffer it was built from. Cheap to clone (bumps the reference count);
/// the backing data is freed when the last clone is dropped.
#[derive(Clone)]
pub struct Segmentation(Arc<SegmentationInner>);

impl Segmentation {
    fn from_parts(points: Vec<Point>, segments: Vec<Segment>, image_width: usize, image_height: usize) -> Self {
        Segmentation(Arc::new(SegmentationInner {
            points,
            segments,
            image_width,
            image_height,
        }))
    }

    /// Build a segmentation by running the link builder and region
    /// extractor over a raw, runtime-typed pixel buffer.
    ///
    /// A zero-pixel image (`width == 0 || height == 0`) short-circuits to
    /// an empty segmentation with zero segments, without invoking the link
    /// builder (whose own contract treats non-positive dimensions as an
    /// error — see `spec.md` §4.1 vs. §4.2/§8 scenario 1).
    pub fn new(
        image_base: &[u8],
        pixel_type: PixelType,
        offset: usize,
        width: usize,
        height: usize,
        stride: usize,
        threshold: f64,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Ok(Segmentation::from_parts(Vec::new(), Vec::new(), width, height));
        }
        let map = link::build_links_dispatch(image_base, pixel_type, offset, width, height, stride, threshold)?;
        let extraction = segment::extract_regions(map);
        log::debug!(
            "segmentation built: {} segments over {}x{} image",
            extraction.segments.len(),
            width,
            height
        );
        Ok(Segmentation::from_parts(extraction.points, extraction.segments, width, height))
    }

    /// Construct directly from an already-extracted region list (used by
    /// [`Segmentation::select`] and by tests that want to bypass the raw
    /// byte-buffer entry point).
    pub(crate) fn from_extraction(extraction: segment::RegionExtraction, image_width: usize, image_height: usize) -> Self {
        Segmentation::from_parts(extraction.points, extraction.segments, image_width, image_height)
    }

    /// Number of segments (`spec.md` §6 `count`).
    pub fn count(&self) -> usize {
        self.0.segments.len()
    }

    pub fn image_width(&self) -> usize {
        self.0.image_width
    }

    pub fn image_height(&self) -> usize {
        self.0.image_height
    }

    /// Current reference count of this handle's shared backing store.
    pub fn nrefs(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    /// Explicit reference-count bump, mirroring the host-binding contract
    /// of `spec.md` §6 (`link(handle) -> handle`). Equivalent to `Clone`.
    pub fn link(&self) -> Self {
        self.clone()
    }

    /// Explicit reference-count drop, mirroring `spec.md` §6
    /// (`unlink(handle)`). Equivalent to letting the handle go out of scope.
    pub fn unlink(self) {
        drop(self)
    }

    /// All segments, in raster-scan seed order.
    pub fn segments(&self) -> &[Segment] {
        &self.0.segments
    }

    fn segment(&self, index: usize) -> Result<&Segment> {
        self.0
            .segments
            .get(index)
            .ok_or_else(|| Error::InvalidArgument(format!("segment index {index} out of range")))
    }

    pub fn xmin(&self, index: usize) -> Result<i32> {
        Ok(self.segment(index)?.xmin)
    }
    pub fn xmax(&self, index: usize) -> Result<i32> {
        Ok(self.segment(index)?.xmax)
    }
    pub fn ymin(&self, index: usize) -> Result<i32> {
        Ok(self.segment(index)?.ymin)
    }
    pub fn ymax(&self, index: usize) -> Result<i32> {
        Ok(self.segment(index)?.ymax)
    }
    pub fn width(&self, index: usize) -> Result<i32> {
        Ok(self.segment(index)?.width())
    }
    pub fn height(&self, index: usize) -> Result<i32> {
        Ok(self.segment(index)?.height())
    }
    pub fn point_count(&self, index: usize) -> Result<usize> {
        Ok(self.segment(index)?.count)
    }
    pub fn xcen(&self, index: usize) -> Result<f64> {
        Ok(self.segment(index)?.xcen())
    }
    pub fn ycen(&self, index: usize) -> Result<f64> {
        Ok(self.segment(index)?.ycen())
    }

    /// Fill `out` with `point_count` for every segment, in segment order.
    pub fn fill_counts(&self, out: &mut Vec<usize>) {
        out.clear();
        out.extend(self.0.segments.iter().map(|s| s.count));
    }
    /// Fill `out` with `xmin` for every segment, in segment order.
    pub fn fill_xmins(&self, out: &mut Vec<i32>) {
        out.clear();
        out.extend(self.0.segments.iter().map(|s| s.xmin));
    }
    /// Fill `out` with `xmax` for every segment, in segment order.
    pub fn fill_xmaxs(&self, out: &mut Vec<i32>) {
        out.clear();
        out.extend(self.0.segments.iter().map(|s| s.xmax));
    }
    /// Fill `out` with `ymin` for every segment, in segment order.
    pub fn fill_ymins(&self, out: &mut Vec<i32>) {
        out.clear();
        out.extend(self.0.segments.iter().map(|s| s.ymin));
    }
    /// Fill `out` with `ymax` for every segment, in segment order.
    pub fn fill_ymaxs(&self, out: &mut Vec<i32>) {
        out.clear();
        out.extend(self.0.segments.iter().map(|s| s.ymax));
    }
    /// Fill `out` with `width` for every segment, in segment order.
    pub fn fill_widths(&self, out: &mut Vec<i32>) {
        out.clear();
        out.extend(self.0.segments.iter().map(|s| s.width()));
    }
    /// Fill `out` with `height` for every segment, in segment order.
    pub fn fill_heights(&self, out: &mut Vec<i32>) {
        out.clear();
        out.extend(self.0.segments.iter().map(|s| s.height()));
    }
    /// Fill `out` with `xcen` for every segment, in segment order.
    pub fn fill_xcens(&self, out: &mut Vec<f64>) {
        out.clear();
        out.extend(self.0.segments.iter().map(|s| s.xcen()));
    }
    /// Fill `out` with `ycen` for every segment, in segment order.
    pub fn fill_ycens(&self, out: &mut Vec<f64>) {
        out.clear();
        out.extend(self.0.segments.iter().map(|s| s.ycen()));
    }

    /// Points of segment `index`, in flood-fill order.
    pub fn segment_points(&self, index: usize) -> Result<&[Point]> {
        let seg = self.segment(index)?;
        Ok(&self.0.points[seg.first_point..seg.first_point + seg.count])
    }

    /// Fill `out` with the `x` coordinate of every point of segment `index`.
    pub fn fill_x(&self, index: usize, out: &mut Vec<i16>) -> Result<()> {
        out.clear();
        out.extend(self.segment_points(index)?.iter().map(|p| p.x));
        Ok(())
    }

    /// Fill `out` with the `y` coordinate of every point of segment `index`.
    pub fn fill_y(&self, index: usize, out: &mut Vec<i16>) -> Result<()> {
        out.clear();
        out.extend(self.segment_points(index)?.iter().map(|p| p.y));
        Ok(())
    }

    /// Fill `out` with the link mask of every point of segment `index`.
    pub fn fill_link(&self, index: usize, out: &mut Vec<u8>) -> Result<()> {
        out.clear();
        out.extend(self.segment_points(index)?.iter().map(|p| p.link));
        Ok(())
    }

    /// Construct a new handle containing only the segments at `indices`, in
    /// the given order. Points are copied into an independent point buffer;
    /// duplicates and reorderings of `indices` are permitted.
    pub fn select(&self, indices: &[usize]) -> Result<Segmentation> {
        if indices.is_empty() {
            return Err(Error::InvalidArgument("select: empty index list".into()));
        }

        let mut points = Vec::new();
        let mut segments = Vec::with_capacity(indices.len());
        for &index in indices {
            let src = self.segment(index)?;
            let first_point = points.len();
            points.extend_from_slice(&self.0.points[src.first_point..src.first_point + src.count]);
            segments.push(Segment {
                first_point,
                count: src.count,
                xmin: src.xmin,
                xmax: src.xmax,
                ymin: src.ymin,
                ymax: src.ymax,
            });
        }

        Ok(Segmentation::from_parts(points, segments, self.0.image_width, self.0.image_height))
    }
}

impl std::fmt::Debug for Segmentation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Segmentation")
            .field("count", &self.count())
            .field("image_width", &self.image_width())
            .field("image_height", &self.image_height())
            .field("nrefs", &self.nrefs())
            .finish()
    }
}
