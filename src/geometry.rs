//! Coordinate-space conversions.
//!
//! A node's `position` is local to its parent container, or canvas space for
//! top-level nodes. The global position of a node is its local position plus
//! the positions of every ancestor up to the root. All parent changes convert
//! positions through [`to_global`] / [`to_local`] so the two spaces are never
//! mixed.

use crate::graph::{GraphStore, NodeId, Viewport};
use crate::types::{Point, Rect, Size};

/// Canvas-space origin of `id` (its top-left corner).
pub fn global_origin(store: &GraphStore, id: &NodeId) -> Option<Point> {
    let node = store.node(id)?;
    let mut origin = node.position;
    for ancestor in store.ancestors(id) {
        if let Some(parent) = store.node(&ancestor) {
            origin += parent.position;
        }
    }
    Some(origin)
}

/// Convert a position local to `parent` into canvas space.
pub fn to_global(store: &GraphStore, local: Point, parent: Option<&NodeId>) -> Point {
    match parent.and_then(|p| global_origin(store, p)) {
        Some(origin) => local + origin,
        None => local,
    }
}

/// Convert a canvas-space position into the local space of `parent`.
pub fn to_local(store: &GraphStore, global: Point, parent: Option<&NodeId>) -> Point {
    match parent.and_then(|p| global_origin(store, p)) {
        Some(origin) => global - origin,
        None => global,
    }
}

/// Canvas-space bounding box of `id`.
pub fn bounding_box(store: &GraphStore, id: &NodeId) -> Option<Rect> {
    let node = store.node(id)?;
    Some(Rect::new(global_origin(store, id)?, node.size))
}

/// Clip a local position so a node of `size` stays inside a parent of
/// `parent_size`. A node larger than its parent is pinned to the origin.
pub fn clamp_within(position: Point, size: Size, parent_size: Size) -> Point {
    let max_x = (parent_size.width - size.width).max(0.0);
    let max_y = (parent_size.height - size.height).max(0.0);
    Point::new(position.x.clamp(0.0, max_x), position.y.clamp(0.0, max_y))
}

/// Smallest size that holds every child rect (local space) plus `padding`
/// on the far sides, never smaller than `minimum`.
pub fn fit_children(children: impl IntoIterator<Item = Rect>, padding: f64, minimum: Size) -> Size {
    let bounds = children.into_iter().reduce(|acc, r| acc.union(&r));
    match bounds {
        Some(b) => {
            let max = b.max();
            Size::new(
                (max.x + padding).max(minimum.width),
                (max.y + padding).max(minimum.height),
            )
        }
        None => minimum,
    }
}

/// Map a canvas point to screen space (`screen = canvas * zoom + pan`).
pub fn canvas_to_screen(viewport: Viewport, p: Point) -> Point {
    Point::new(p.x * viewport.zoom + viewport.x, p.y * viewport.zoom + viewport.y)
}

/// Map a screen point back to canvas space.
pub fn screen_to_canvas(viewport: Viewport, p: Point) -> Point {
    let zoom = if viewport.zoom.abs() < f64::EPSILON {
        1.0
    } else {
        viewport.zoom
    };
    Point::new((p.x - viewport.x) / zoom, (p.y - viewport.y) / zoom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Node, NodeKind};

    fn nested_store() -> GraphStore {
        let outer = Node::new(
            NodeId::from("outer"),
            NodeKind::Group,
            Point::new(100.0, 50.0),
            Size::new(600.0, 400.0),
        );
        let inner = Node::new(
            NodeId::from("inner"),
            NodeKind::Group,
            Point::new(20.0, 30.0),
            Size::new(300.0, 200.0),
        )
        .with_parent(NodeId::from("outer"));
        let leaf = Node::new(
            NodeId::from("leaf"),
            NodeKind::Filter,
            Point::new(5.0, 7.0),
            Size::new(100.0, 40.0),
        )
        .with_parent(NodeId::from("inner"));
        GraphStore::from_parts(vec![outer, inner, leaf], vec![], Viewport::default()).unwrap()
    }

    #[test]
    fn test_global_origin_sums_ancestor_chain() {
        let store = nested_store();
        assert_eq!(
            global_origin(&store, &NodeId::from("leaf")),
            Some(Point::new(125.0, 87.0))
        );
        assert_eq!(
            bounding_box(&store, &NodeId::from("leaf")),
            Some(Rect::from_xywh(125.0, 87.0, 100.0, 40.0))
        );
    }

    #[test]
    fn test_to_local_and_back() {
        let store = nested_store();
        let inner = NodeId::from("inner");
        let global = Point::new(400.0, 300.0);
        let local = to_local(&store, global, Some(&inner));
        assert_eq!(local, Point::new(280.0, 220.0));
        assert!(to_global(&store, local, Some(&inner)).approx_eq(global));
        assert_eq!(to_local(&store, global, None), global);
    }

    #[test]
    fn test_clamp_within() {
        let parent = Size::new(200.0, 100.0);
        let size = Size::new(50.0, 20.0);
        assert_eq!(
            clamp_within(Point::new(-10.0, 90.0), size, parent),
            Point::new(0.0, 80.0)
        );
        assert_eq!(
            clamp_within(Point::new(10.0, 10.0), Size::new(500.0, 500.0), parent),
            Point::new(0.0, 0.0)
        );
    }

    #[test]
    fn test_fit_children_adds_padding() {
        let store = nested_store();
        let inner = NodeId::from("inner");
        let rects = store
            .children(&inner)
            .map(Node::local_rect);
        let size = fit_children(rects, 20.0, Size::new(50.0, 50.0));
        assert_eq!(size, Size::new(125.0, 67.0));

        let minimum = Size::new(400.0, 300.0);
        assert_eq!(fit_children(std::iter::empty(), 20.0, minimum), minimum);
        assert_eq!(
            fit_children([Rect::from_xywh(24.0, 300.0, 40.0, 40.0)], 24.0, minimum),
            Size::new(400.0, 364.0)
        );
    }

    #[test]
    fn test_viewport_transform_round_trip() {
        let viewport = Viewport {
            x: 40.0,
            y: -20.0,
            zoom: 2.0,
        };
        let p = Point::new(12.5, 8.0);
        let screen = canvas_to_screen(viewport, p);
        assert_eq!(screen, Point::new(65.0, -4.0));
        assert!(screen_to_canvas(viewport, screen).approx_eq(p));
    }
}
