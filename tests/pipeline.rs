//! End-to-end tests driving the raw pixel buffer through segmentation and
//! chaining, covering the concrete scenarios worked through by hand in the
//! design discussion for this crate.

use segchain::{ChainParams, ChainPool, PixelType, Segmentation};

fn draw_square(img: &mut [u8], width: usize, x0: usize, y0: usize, size: usize, value: u8) {
    for y in y0..y0 + size {
        for x in x0..x0 + size {
            img[y * width + x] = value;
        }
    }
}

#[test]
fn empty_image_has_zero_segments_and_zero_chains() {
    let sgm = Segmentation::new(&[], PixelType::U8, 0, 0, 0, 0, 0.0).unwrap();
    assert_eq!(sgm.count(), 0);
    let pool = ChainPool::new(&sgm, ChainParams::default()).unwrap();
    assert_eq!(pool.number(), 0);
}

#[test]
fn uniform_4x4_image_is_one_segment_with_expected_geometry() {
    let samples = vec![9u8; 16];
    let sgm = Segmentation::new(&samples, PixelType::U8, 0, 4, 4, 4, 0.0).unwrap();
    assert_eq!(sgm.count(), 1);
    assert_eq!((sgm.xmin(0).unwrap(), sgm.ymin(0).unwrap()), (0, 0));
    assert_eq!((sgm.xmax(0).unwrap(), sgm.ymax(0).unwrap()), (3, 3));
    assert_eq!(sgm.xcen(0).unwrap(), 1.5);
    assert_eq!(sgm.ycen(0).unwrap(), 1.5);
    assert_eq!(sgm.point_count(0).unwrap(), 16);

    let mut links = Vec::new();
    sgm.fill_link(0, &mut links).unwrap();
    let interior = segchain::EAST | segchain::WEST | segchain::NORTH | segchain::SOUTH;
    let non_interior = links.iter().filter(|&&l| l != interior).count();
    assert_eq!(non_interior, 12);
}

#[test]
fn four_pixel_row_splits_or_merges_by_threshold() {
    let samples = [10u8, 10, 20, 20];

    let merged = Segmentation::new(&samples, PixelType::U8, 0, 4, 1, 4, 5.0).unwrap();
    assert_eq!(merged.count(), 1);

    let split = Segmentation::new(&samples, PixelType::U8, 0, 4, 1, 4, 0.0).unwrap();
    assert_eq!(split.count(), 2);
    assert_eq!((split.xmin(0).unwrap(), split.xmax(0).unwrap()), (0, 1));
    assert_eq!((split.xmin(1).unwrap(), split.xmax(1).unwrap()), (2, 3));
}

#[test]
fn six_evenly_spaced_squares_chain_into_one_near_zero_shear() {
    let width = 70;
    let height = 20;
    let mut img = vec![0u8; width * height];
    for i in 0..6 {
        draw_square(&mut img, width, 10 + i * 10, 8, 5, 255);
    }
    let sgm = Segmentation::new(&img, PixelType::U8, 0, width, height, width, 0.0).unwrap();
    assert_eq!(sgm.count(), 6);

    let pool = ChainPool::new(&sgm, ChainParams::default()).unwrap();
    assert_eq!(pool.number(), 1);
    let chain = &pool.chains()[0];
    assert_eq!(chain.length(), 6);
    assert!(chain.vertical_shear().abs() < 0.05 + 1e-6);
    assert!(chain.horizontal_shear().abs() < 1.0);
    assert!(chain.xmax() > chain.xmin());
    assert!(chain.ymax() > chain.ymin());
}

#[test]
fn two_vertically_offset_groups_stay_as_separate_chains() {
    let width = 90;
    let height = 30;
    let mut img = vec![0u8; width * height];
    for i in 0..4 {
        draw_square(&mut img, width, 10 + i * 10, 2, 5, 255);
    }
    for i in 0..4 {
        draw_square(&mut img, width, 10 + i * 10, 20, 5, 255);
    }
    let sgm = Segmentation::new(&img, PixelType::U8, 0, width, height, width, 0.0).unwrap();
    assert_eq!(sgm.count(), 8);

    let pool = ChainPool::new(&sgm, ChainParams::default()).unwrap();
    assert_eq!(pool.number(), 2);
    for chain in pool.chains() {
        assert_eq!(chain.length(), 4);
    }
}

#[test]
fn oversized_inserted_square_is_skipped_but_chain_survives() {
    // Five small squares in a row at y=8..13 (height 5), with a much taller
    // square spliced in between positions 2 and 3 that fails the
    // hmin < h < hmax admissibility test and so cannot itself be chained
    // in, but does not prevent the remaining small squares from chaining
    // through it.
    let width = 90;
    let height = 40;
    let mut img = vec![0u8; width * height];
    let small_xs = [10usize, 20, 50, 60, 70];
    for &x in &small_xs {
        draw_square(&mut img, width, x, 8, 5, 255);
    }
    draw_square(&mut img, width, 30, 0, 18, 255); // much larger square, dropped into the gap with clearance on both sides

    let sgm = Segmentation::new(&img, PixelType::U8, 0, width, height, width, 0.0).unwrap();
    assert_eq!(sgm.count(), 6);

    let pool = ChainPool::new(&sgm, ChainParams::default()).unwrap();
    assert!(pool.number() >= 1);
    // The surviving chain(s) cover only the small, uniformly-sized squares;
    // none of them has length 6 (the oversized square never joins one).
    for chain in pool.chains() {
        assert!(chain.length() <= small_xs.len());
    }
}

#[test]
fn select_builds_an_independent_subset_handle() {
    let width = 70;
    let height = 20;
    let mut img = vec![0u8; width * height];
    for i in 0..6 {
        draw_square(&mut img, width, 10 + i * 10, 8, 5, 255);
    }
    let sgm = Segmentation::new(&img, PixelType::U8, 0, width, height, width, 0.0).unwrap();
    let pool = ChainPool::new(&sgm, ChainParams::default()).unwrap();
    let segs = pool.get_segments(0).unwrap().to_vec();

    let subset = sgm.select(&segs).unwrap();
    assert_eq!(subset.count(), segs.len());
    assert_eq!(subset.image_width(), sgm.image_width());
    assert_eq!(subset.image_height(), sgm.image_height());
}
