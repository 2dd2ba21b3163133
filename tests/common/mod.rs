//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;
pub mod mock_helpers;

use pipeline_canvas::{geometry, GraphStore, NodeId, Point, Rect};
use std::path::PathBuf;

/// Path of a file under `tests/fixtures`
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}

/// Assert two points are approximately equal
pub fn assert_point_eq(a: Point, b: Point, epsilon: f64) {
    assert!(
        (a.x - b.x).abs() < epsilon && (a.y - b.y).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}

/// Canvas-space boxes of every visible node in `ids`
pub fn global_boxes<'a>(
    store: &GraphStore,
    ids: impl IntoIterator<Item = &'a NodeId>,
) -> Vec<(NodeId, Rect)> {
    ids.into_iter()
        .filter(|id| store.node(id).is_some_and(|n| !n.hidden))
        .filter_map(|id| geometry::bounding_box(store, id).map(|b| (id.clone(), b)))
        .collect()
}

/// Panic if any two of `boxes` overlap
pub fn assert_no_overlap(boxes: &[(NodeId, Rect)]) {
    for (i, (a, ra)) in boxes.iter().enumerate() {
        for (b, rb) in &boxes[i + 1..] {
            assert!(
                !ra.intersects(rb),
                "{} {:?} overlaps {} {:?}",
                a,
                ra,
                b,
                rb
            );
        }
    }
}
