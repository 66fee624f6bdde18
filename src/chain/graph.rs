//! The chain-link graph builder: level-1 pairwise links over x-sorted
//! segments, then iterative higher-level extension, then maximal-chain
//! extraction. See `spec.md` §4.4.
//!
//! Chainlinks are arena-allocated in a single `Vec` local to one call of
//! [`build_chains`] (per the design note in `spec.md` §9: cross-references
//! are plain indices, and the whole arena is dropped once the surviving
//! chains are copied out as flat segment-index vectors).

use crate::chain::align::{short_line_accept, SegGeom};
use crate::chain::params::ChainParams;
use crate::segmentation::Segmentation;
use std::collections::HashMap;

/// A reference to either a leaf segment (level 0) or a composite chainlink,
/// both addressable uniformly as a "chainable" node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Chainable {
    /// Index into the x-sorted segment array.
    Segment(u32),
    /// Index into the chainlink arena.
    Link(u32),
}

impl Chainable {
    fn level(self, links: &[ChainLinkData]) -> u32 {
        match self {
            Chainable::Segment(_) => 0,
            Chainable::Link(id) => links[id as usize].level,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ChainLinkData {
    level: u32,
    left: Chainable,
    right: Chainable,
    /// Leftmost segment covered by this link (sorted index).
    first: u32,
    /// Rightmost segment covered by this link (sorted index).
    last: u32,
}

/// Materialise the full left-to-right segment sequence (sorted indices)
/// covered by `node`, by walking the left-child rib and appending each
/// level's cached `last` segment.
fn materialize(links: &[ChainLinkData], node: Chainable) -> Vec<u32> {
    match node {
        Chainable::Segment(idx) => vec![idx],
        Chainable::Link(id) => {
            let link = &links[id as usize];
            let mut segs = materialize(links, link.left);
            segs.push(link.last);
            segs
        }
    }
}

fn is_redundant(
    first_link_index: &HashMap<Chainable, Vec<u32>>,
    links: &[ChainLinkData],
    geoms: &[SegGeom],
    left_idx: u32,
    right_idx: u32,
    params: &ChainParams,
) -> bool {
    let Some(existing) = first_link_index.get(&Chainable::Segment(left_idx)) else {
        return false;
    };
    let pair = [geoms[left_idx as usize], geoms[right_idx as usize]];
    existing.iter().any(|&link_id| {
        let mid = links[link_id as usize].last;
        short_line_accept(&pair, geoms[mid as usize], params.slope, params.aatol, params.artol)
    })
}

/// Build all surviving maximal chains for `segmentation` under `params`.
///
/// Returns each chain as a dense vector of *sorted-array* segment indices,
/// left to right; the caller maps these back to segmentation-space indices
/// and fits shears.
pub fn build_chains(segmentation: &Segmentation, params: &ChainParams) -> Vec<Vec<u32>> {
    let n = segmentation.count();
    if n == 0 {
        return Vec::new();
    }
    let params = &params.normalized();

    // Step 1: x-sort. `order[i]` is the original segmentation index of the
    // segment at sorted position `i`.
    let mut order: Vec<u32> = (0..n as u32).collect();
    order.sort_by(|&a, &b| {
        segmentation
            .xcen(a as usize)
            .unwrap()
            .partial_cmp(&segmentation.xcen(b as usize).unwrap())
            .unwrap()
    });

    let geoms: Vec<SegGeom> = order
        .iter()
        .map(|&orig| SegGeom {
            xcen: segmentation.xcen(orig as usize).unwrap(),
            ycen: segmentation.ycen(orig as usize).unwrap(),
            height: segmentation.height(orig as usize).unwrap() as f64,
        })
        .collect();
    let widths: Vec<f64> = order.iter().map(|&orig| segmentation.width(orig as usize).unwrap() as f64).collect();

    let sa = 1.0 + 2.0 * params.satol;
    let sq = 2.0 - params.srtol;
    let sr = 2.0 + params.srtol;
    let rmax = params.drmax / 2.0;
    let rmin = params.drmin / 2.0;

    let mut links: Vec<ChainLinkData> = Vec::new();
    let mut nparents: Vec<u32> = Vec::new();
    let mut first_link_index: HashMap<Chainable, Vec<u32>> = HashMap::new();
    // Insertion order batches, newest (highest level) first — the global
    // "encountered first" order of `spec.md` §3.
    let mut frontier: Vec<u32> = Vec::new();

    // Step 2: level-1 links.
    for left_idx in 0..n as u32 {
        let left = geoms[left_idx as usize];
        let hmax = (sr * left.height + sa) / sq;
        let hmin = (sq * left.height - sa) / sr;
        let xbound = left.xcen + rmax * (left.height + hmax);

        for right_idx in (left_idx + 1)..n as u32 {
            let right = geoms[right_idx as usize];
            if right.xcen >= xbound {
                break;
            }
            if !(hmin < right.height && right.height < hmax) {
                continue;
            }
            if (right.ycen - left.ycen).abs() > params.slope * (right.xcen - left.xcen).abs() {
                continue;
            }
            let dx = right.xcen - left.xcen;
            let lowbound = 1.0 + rmin * (widths[left_idx as usize] + widths[right_idx as usize]);
            let highbound = rmax * (left.height + right.height);
            if !(dx >= lowbound && dx <= highbound) {
                continue;
            }
            if is_redundant(&first_link_index, &links, &geoms, left_idx, right_idx, params) {
                continue;
            }

            let id = links.len() as u32;
            links.push(ChainLinkData {
                level: 1,
                left: Chainable::Segment(left_idx),
                right: Chainable::Segment(right_idx),
                first: left_idx,
                last: right_idx,
            });
            nparents.push(0);
            first_link_index.entry(Chainable::Segment(left_idx)).or_default().push(id);
            frontier.push(id);
        }
    }

    // Step 3: iterative higher-level extension.
    while !frontier.is_empty() {
        let mut next_frontier = Vec::new();
        for &top_id in &frontier {
            let top = links[top_id as usize];
            let covered_len = top.level + 1;
            if covered_len >= params.lmax as u32 {
                continue; // would exceed lmax if extended further
            }

            let Some(candidates) = first_link_index.get(&top.right).cloned() else {
                continue;
            };

            let chain_segments = materialize(&links, Chainable::Link(top_id));
            debug_assert!(chain_segments.len() as u32 == covered_len);
            let chain_geoms: Vec<SegGeom> = chain_segments.iter().map(|&s| geoms[s as usize]).collect();

            for ext_id in candidates {
                let ext = links[ext_id as usize];
                let candidate_geom = geoms[ext.last as usize];
                if !short_line_accept(&chain_geoms, candidate_geom, params.slope, params.aatol, params.artol) {
                    continue;
                }

                let new_id = links.len() as u32;
                links.push(ChainLinkData {
                    level: top.level + 1,
                    left: Chainable::Link(top_id),
                    right: Chainable::Link(ext_id),
                    first: top.first,
                    last: ext.last,
                });
                nparents.push(0);
                nparents[top_id as usize] += 1;
                nparents[ext_id as usize] += 1;
                first_link_index.entry(Chainable::Link(top_id)).or_default().push(new_id);
                next_frontier.push(new_id);

                debug_assert!((top.level + 2) as usize <= n, "chain length exceeds segment count");
            }
        }
        frontier = next_frontier;
    }

    // Step 4: maximal chain emission. Walk newest-first (reverse insertion
    // order); levels are non-increasing along this walk, so the walk can
    // stop as soon as lengths fall below lmin.
    let mut chains = Vec::new();
    for id in (0..links.len() as u32).rev() {
        let link = links[id as usize];
        let length = link.level + 1;
        if length < params.lmin as u32 {
            break;
        }
        if nparents[id as usize] != 0 {
            continue;
        }
        chains.push(materialize(&links, Chainable::Link(id)));
    }

    chains
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
    fn six_collinear_squares_chain_into_one() {
        let sgm = six_squares();
        assert_eq!(sgm.count(), 6);
        let params = ChainParams::default();
        let chains = build_chains(&sgm, &params);
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].len(), 6);
    }

    #[test]
    fn two_offset_groups_stay_separate() {
        let width = 90usize;
        let height = 30usize;
        let mut img = vec![0u8; width * height];
        for i in 0..4 {
            let cx = 10 + i * 10;
            for y in 2..7 {
                for x in cx..cx + 5 {
                    img[y * width + x] = 255;
                }
            }
        }
        for i in 0..4 {
            let cx = 10 + i * 10;
            for y in 20..25 {
                for x in cx..cx + 5 {
                    img[y * width + x] = 255;
                }
            }
        }
        let sgm = Segmentation::new(&img, PixelType::U8, 0, width, height, width, 0.0).unwrap();
        assert_eq!(sgm.count(), 8);
        let params = ChainParams::default();
        let chains = build_chains(&sgm, &params);
        assert_eq!(chains.len(), 2);
        assert_eq!(chains[0].len(), 4);
        assert_eq!(chains[1].len(), 4);
    }
}
