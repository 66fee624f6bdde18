//! Region extraction: flood-fills a filled [`LinkMap`] into an ordered list
//! of connected segments, each with a contiguous run of points in a shared
//! packed buffer and an integer bounding box.

use crate::link::LinkMap;
use std::collections::VecDeque;

/// One point of a segment: its image coordinates and the four-direction
/// link mask it had in the source [`LinkMap`] (the internal `OWNED` bit is
/// never present here).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i16,
    pub y: i16,
    pub link: u8,
}

/// A maximal connected region of pixels linked by same-region `N/S/E/W`
/// links, plus its derived geometry.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    /// Index of this segment's first point in the owning
    /// [`crate::segmentation::Segmentation`]'s shared point buffer.
    pub first_point: usize,
    /// Number of points in this segment (always `> 0`).
    pub count: usize,
    pub xmin: i32,
    pub xmax: i32,
    pub ymin: i32,
    pub ymax: i32,
}

impl Segment {
    pub fn width(&self) -> i32 {
        self.xmax - self.xmin + 1
    }

    pub fn height(&self) -> i32 {
        self.ymax - self.ymin + 1
    }

    pub fn xcen(&self) -> f64 {
        (self.xmin as f64 + self.xmax as f64) / 2.0
    }

    pub fn ycen(&self) -> f64 {
        (self.ymin as f64 + self.ymax as f64) / 2.0
    }
}

/// The result of flood-filling a [`LinkMap`]: a packed point buffer
/// (segment after segment, in flood-fill order) and a parallel segment
/// table. Concatenating the points of all segments, in order, is a
/// permutation of all pixels of the image.
pub struct RegionExtraction {
    pub points: Vec<Point>,
    pub segments: Vec<Segment>,
}

/// Flood-fill `map` into an ordered list of regions.
///
/// Order is raster scan of seed pixels: the first unowned pixel in
/// row-major order seeds the next region. Within a region, points are
/// emitted in breadth-first order along a per-region work queue, giving a
/// deterministic traversal independent of hashing or allocator behaviour.
///
/// A zero-pixel map (`width == 0 || height == 0`) yields zero segments.
pub fn extract_regions(mut map: LinkMap) -> RegionExtraction {
    let width = map.width();
    let height = map.height();
    if width == 0 || height == 0 {
        return RegionExtraction {
            points: Vec::new(),
            segments: Vec::new(),
        };
    }

    let mut points = Vec::with_capacity(width * height);
    let mut segments = Vec::new();
    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();

    for seed_y in 0..height {
        for seed_x in 0..width {
            if map.is_owned(seed_x, seed_y) {
                continue;
            }

            let first_point = points.len();
            let mut xmin = seed_x as i32;
            let mut xmax = seed_x as i32;
            let mut ymin = seed_y as i32;
            let mut ymax = seed_y as i32;

            map.mark_owned(seed_x, seed_y);
            queue.push_back((seed_x, seed_y));

            while let Some((x, y)) = queue.pop_front() {
                let link = map.get(x, y);
                points.push(Point {
                    x: x as i16,
                    y: y as i16,
                    link,
                });
                xmin = xmin.min(x as i32);
                xmax = xmax.max(x as i32);
                ymin = ymin.min(y as i32);
                ymax = ymax.max(y as i32);

                if link & crate::link::EAST != 0 && !map.is_owned(x + 1, y) {
                    map.mark_owned(x + 1, y);
                    queue.push_back((x + 1, y));
                }
                if link & crate::link::WEST != 0 && !map.is_owned(x - 1, y) {
                    map.mark_owned(x - 1, y);
                    queue.push_back((x - 1, y));
                }
                if link & crate::link::NORTH != 0 && !map.is_owned(x, y + 1) {
                    map.mark_owned(x, y + 1);
                    queue.push_back((x, y + 1));
                }
                if link & crate::link::SOUTH != 0 && !map.is_owned(x, y - 1) {
                    map.mark_owned(x, y - 1);
                    queue.push_back((x, y - 1));
                }
            }

            segments.push(Segment {
                first_point,
                count: points.len() - first_point,
                xmin,
                xmax,
                ymin,
                ymax,
            });
        }
    }

    RegionExtraction { points, segments }
}
