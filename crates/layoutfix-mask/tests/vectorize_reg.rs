//! Mask vectorization regression test
//!
//! Tests the structuring scale for small and large masks, joining of
//! nearby fragments, rejection of masks that stay fragmented, agreement
//! between polygon rasterization and box filling, and thin or tiny masks
//! whose outline does not survive simplification.

use layoutfix_mask::{
    MaskError, VectorizeOptions, close_brick, fill_polygon, structuring_scale, vectorize_mask,
};
use layoutfix_test::{RegParams, mask_with_rects, rect};

#[test]
fn vectorize_reg() {
    let mut rp = RegParams::new("vectorize");
    let opts = VectorizeOptions::default();

    // --- Test 1: a tiny mask still gets the smallest kernel ---
    let tiny = mask_with_rects(40, 40, &[(10, 10, 3, 3)]).unwrap();
    let v = vectorize_mask(&tiny, &opts).unwrap();
    rp.compare_values(3.0, f64::from(v.scale), 0.0);
    rp.compare_values(1.0, f64::from(v.rounds), 0.0);
    rp.compare_polygons(&rect(9.0, 9.0, 4.0, 4.0).unwrap(), &v.polygon, 1e-9);

    // --- Test 2: a large mask scales the kernel with its size ---
    let square = mask_with_rects(100, 100, &[(20, 20, 50, 50)]).unwrap();
    rp.compare_values(5.0, f64::from(structuring_scale(2500, 3)), 0.0);
    let v = vectorize_mask(&square, &opts).unwrap();
    rp.compare_values(5.0, f64::from(v.scale), 0.0);
    rp.compare_polygons(&rect(18.0, 18.0, 53.0, 53.0).unwrap(), &v.polygon, 1e-9);

    // --- Test 3: two blocks a few rows apart join in one round ---
    let split = mask_with_rects(80, 80, &[(10, 10, 40, 20), (10, 34, 40, 20)]).unwrap();
    let v = vectorize_mask(&split, &opts).unwrap();
    rp.compare_values(1.0, f64::from(v.rounds), 0.0);
    rp.compare_values(4.0, v.polygon.len() as f64, 0.0);
    rp.compare_polygons(&rect(8.0, 8.0, 43.0, 47.0).unwrap(), &v.polygon, 1e-9);
    rp.check(v.polygon.is_valid(), "joined polygon is valid");

    // --- Test 4: blocks too far apart are rejected ---
    let far = mask_with_rects(200, 50, &[(5, 5, 20, 20), (150, 5, 20, 20)]).unwrap();
    let fragments = match vectorize_mask(&far, &opts) {
        Err(MaskError::NonContiguousMask { fragments }) => fragments as f64,
        _ => 0.0,
    };
    rp.compare_values(2.0, fragments, 0.0);

    // Small squares 3px apart join after a few rounds; 50px apart they never do
    let near = mask_with_rects(100, 40, &[(10, 10, 10, 10), (23, 10, 10, 10)]).unwrap();
    let v = vectorize_mask(&near, &opts).unwrap();
    rp.compare_values(3.0, f64::from(v.scale), 0.0);
    rp.compare_values(2.0, f64::from(v.rounds), 0.0);
    let apart = mask_with_rects(100, 40, &[(10, 10, 10, 10), (70, 10, 10, 10)]).unwrap();
    rp.check(
        matches!(
            vectorize_mask(&apart, &opts),
            Err(MaskError::NonContiguousMask { fragments: 2 })
        ),
        "squares 50px apart stay apart",
    );

    // --- Test 5: rasterizing a rectangle fills the same pixels as a box ---
    let mut drawn = mask_with_rects(20, 20, &[]).unwrap();
    fill_polygon(&mut drawn, &rect(2.0, 3.0, 5.0, 4.0).unwrap(), 0, 0);
    let filled = mask_with_rects(20, 20, &[(2, 3, 6, 5)]).unwrap();
    rp.compare_masks(&filled, &drawn);

    // --- Test 6: vertical closing bridges a gap between lines ---
    let lines = mask_with_rects(30, 30, &[(2, 2, 20, 4), (2, 10, 20, 4)]).unwrap();
    let closed = close_brick(&lines, 1, 5).unwrap();
    let expected = mask_with_rects(30, 30, &[(2, 2, 20, 12)]).unwrap();
    rp.compare_masks(&expected, &closed);

    // --- Test 7: a one-pixel-high line keeps its traced outline ---
    let thin = mask_with_rects(100, 100, &[(10, 10, 60, 1)]).unwrap();
    let v = vectorize_mask(&thin, &opts).unwrap();
    rp.compare_values(3.0, f64::from(v.scale), 0.0);
    rp.compare_values(1.0, f64::from(v.rounds), 0.0);
    rp.compare_values(0.0, v.tolerance, 0.0);
    rp.compare_polygons(&rect(9.0, 9.0, 61.0, 2.0).unwrap(), &v.polygon, 1e-9);
    rp.check(v.polygon.is_valid(), "line outline is valid");

    // --- Test 8: masks of a few pixels ---
    // A 2x2 block grows to a ring that survives simplification
    let few = mask_with_rects(60, 60, &[(30, 30, 2, 2)]).unwrap();
    let v = vectorize_mask(&few, &opts).unwrap();
    rp.compare_values(2.0, v.tolerance, 0.0);
    rp.compare_polygons(&rect(29.0, 29.0, 3.0, 3.0).unwrap(), &v.polygon, 1e-9);

    // A single pixel grows to a ring that collapses at the first tolerance
    let speck = mask_with_rects(60, 60, &[(50, 50, 1, 1)]).unwrap();
    let v = vectorize_mask(&speck, &opts).unwrap();
    rp.compare_values(0.0, v.tolerance, 0.0);
    rp.compare_values(4.0, v.polygon.len() as f64, 0.0);
    rp.compare_polygons(&rect(49.0, 49.0, 2.0, 2.0).unwrap(), &v.polygon, 1e-9);

    assert!(rp.cleanup());
}
