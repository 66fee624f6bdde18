//! Text-line chaining: groups a segmentation's segments into maximal
//! left-to-right reading-order chains and fits a shear-correcting affine
//! transform to each. See `spec.md` §4.4-§4.5.

mod align;
mod graph;
mod params;
mod shear;

pub use params::ChainParams;

use crate::error::Result;
use crate::segmentation::Segmentation;

/// One maximal chain of segments in reading order, together with its
/// fitted shear-correcting affine and the transformed bounding box of its
/// boundary points.
#[derive(Debug, Clone)]
pub struct Chain {
    /// Segmentation-space segment indices, left to right.
    segments: Vec<usize>,
    affine: [f64; 4],
    vertical_shear: f64,
    horizontal_shear: f64,
    xmin: f64,
    xmax: f64,
    ymin: f64,
    ymax: f64,
}

impl Chain {
    /// Number of segments covered by this chain.
    pub fn length(&self) -> usize {
        self.segments.len()
    }

    /// Segmentation-space indices of the segments in this chain, in
    /// left-to-right reading order.
    pub fn segments(&self) -> &[usize] {
        &self.segments
    }

    pub fn affine(&self) -> [f64; 4] {
        self.affine
    }
    pub fn vertical_shear(&self) -> f64 {
        self.vertical_shear
    }
    pub fn horizontal_shear(&self) -> f64 {
        self.horizontal_shear
    }
    pub fn xmin(&self) -> f64 {
        self.xmin
    }
    pub fn xmax(&self) -> f64 {
        self.xmax
    }
    pub fn ymin(&self) -> f64 {
        self.ymin
    }
    pub fn ymax(&self) -> f64 {
        self.ymax
    }
}

/// A segmentation's chains, computed once and held alongside the
/// segmentation they were built from.
#[derive(Debug, Clone)]
pub struct ChainPool {
    segmentation: Segmentation,
    chains: Vec<Chain>,
}

impl ChainPool {
    /// Build every maximal chain of `segmentation` under `params`.
    ///
    /// A chain whose shear fit does not converge (`spec.md` §4.5's 10
    /// iteration cap) is dropped rather than failing the whole call: shear
    /// fitting is a per-chain refinement, not a precondition for a chain's
    /// existence, so one chain's singular fit does not invalidate the rest
    /// (`spec.md` §7's "partial failures recover locally" policy).
    pub fn new(segmentation: &Segmentation, params: ChainParams) -> Result<ChainPool> {
        let params = params.normalized();
        let sorted_chains = graph::build_chains(segmentation, &params);

        // `graph::build_chains` works in x-sorted space; recover the
        // mapping back to segmentation-space indices the same way it built
        // its own sorted order, so chain segment lists end up expressed in
        // the indices callers already know.
        let n = segmentation.count();
        let mut order: Vec<u32> = (0..n as u32).collect();
        order.sort_by(|&a, &b| {
            segmentation
                .xcen(a as usize)
                .unwrap()
                .partial_cmp(&segmentation.xcen(b as usize).unwrap())
                .unwrap()
        });

        let mut chains = Vec::with_capacity(sorted_chains.len());
        for sorted in sorted_chains {
            let segment_indices: Vec<usize> = sorted.iter().map(|&s| order[s as usize] as usize).collect();
            let point_lists: Vec<&[crate::segment::Point]> = segment_indices
                .iter()
                .map(|&idx| segmentation.segment_points(idx))
                .collect::<Result<Vec<_>>>()?;

            match shear::fit_shear(&point_lists, params.prec) {
                Ok(fit) => {
                    log::debug!("chain of {} segments fitted: vshear={}, hshear={}", segment_indices.len(), fit.vertical_shear, fit.horizontal_shear);
                    chains.push(Chain {
                        segments: segment_indices,
                        affine: fit.affine,
                        vertical_shear: fit.vertical_shear,
                        horizontal_shear: fit.horizontal_shear,
                        xmin: fit.xmin,
                        xmax: fit.xmax,
                        ymin: fit.ymin,
                        ymax: fit.ymax,
                    });
                }
                Err(_) => {
                    log::debug!("chain of {} segments dropped: shear fit did not converge", segment_indices.len());
                }
            }
        }

        Ok(ChainPool { segmentation: segmentation.clone(), chains })
    }

    /// Number of chains.
    pub fn number(&self) -> usize {
        self.chains.len()
    }

    pub fn image_width(&self) -> usize {
        self.segmentation.image_width()
    }

    pub fn image_height(&self) -> usize {
        self.segmentation.image_height()
    }

    /// The segmentation this pool was built over.
    pub fn segmentation(&self) -> &Segmentation {
        &self.segmentation
    }

    /// Chains, in descending-level discovery order (`spec.md` §4.4 step 4).
    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    fn chain(&self, index: usize) -> Result<&Chain> {
        self.chains
            .get(index)
            .ok_or_else(|| crate::error::Error::InvalidArgument(format!("chain index {index} out of range")))
    }

    /// Segmentation-space segment indices belonging to chain `index`.
    pub fn get_segments(&self, index: usize) -> Result<&[usize]> {
        Ok(self.chain(index)?.segments())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::PixelType;

    fn six_squares() -> Segmentation {
        let width = 70usize;
        let height = 20usize;
        let mut img = vec![0u8; width * height];
        for i in 0..6 {
            let cx = 10 + i * 10;
            for y in 8..13 {
                for x in cx..cx + 5 {
                    img[y * width + x] = 255;
                }
            }
        }
        Segmentation::new(&img, PixelType::U8, 0, width, height, width, 0.0).unwrap()
    }

    #[test]
    fn six_squares_form_one_chain_with_near_zero_shear() {
        let sgm = six_squares();
        let pool = ChainPool::new(&sgm, ChainParams::default()).unwrap();
        assert_eq!(pool.number(), 1);
        let segs = pool.get_segments(0).unwrap();
        assert_eq!(segs.len(), 6);
        assert!(pool.chains()[0].vertical_shear().abs() < 0.1);
    }

    #[test]
    fn empty_segmentation_has_no_chains() {
        let sgm = Segmentation::new(&[], PixelType::U8, 0, 0, 0, 0, 0.0).unwrap();
        let pool = ChainPool::new(&sgm, ChainParams::default()).unwrap();
        assert_eq!(pool.number(), 0);
        assert_eq!(pool.image_width(), 0);
    }

    #[test]
    fn out_of_range_chain_index_errors() {
        let sgm = Segmentation::new(&[], PixelType::U8, 0, 0, 0, 0, 0.0).unwrap();
        let pool = ChainPool::new(&sgm, ChainParams::default()).unwrap();
        assert!(pool.get_segments(0).is_err());
    }
}
