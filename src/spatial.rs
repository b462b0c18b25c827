//! Axis-aligned box operations on top of `geo::Rect`.
//!
//! Every geometry the search produces is an axis-aligned box, so these
//! helpers cover the whole geometric vocabulary of the crate.

use geo::{Area, Intersects, Point, Rect, coord};
use loci_types::point::Poi;

/// Bounding box of the selected points; zero-area for a single point.
///
/// Returns `None` when nothing is selected.
pub fn envelope_of(points: &[Poi], members: &[usize]) -> Option<Rect> {
    let mut selected = members.iter().filter_map(|&idx| points.get(idx));
    let first = selected.next()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x(), first.y(), first.x(), first.y());

    for poi in selected {
        min_x = min_x.min(poi.x());
        min_y = min_y.min(poi.y());
        max_x = max_x.max(poi.x());
        max_y = max_y.max(poi.y());
    }

    Some(Rect::new(
        coord! { x: min_x, y: min_y },
        coord! { x: max_x, y: max_y },
    ))
}

/// Square of side `side` centred on `center`.
pub fn square_around(center: Point<f64>, side: f64) -> Rect {
    let half = side / 2.0;
    Rect::new(
        coord! { x: center.x() - half, y: center.y() - half },
        coord! { x: center.x() + half, y: center.y() + half },
    )
}

/// Grow `rect` by `distance` on every side.
pub fn expand_by(rect: &Rect, distance: f64) -> Rect {
    Rect::new(
        coord! { x: rect.min().x - distance, y: rect.min().y - distance },
        coord! { x: rect.max().x + distance, y: rect.max().y + distance },
    )
}

/// Whether `point` lies inside `rect`, boundary included.
#[inline]
pub fn covers(rect: &Rect, point: &Point<f64>) -> bool {
    point.x() >= rect.min().x
        && point.x() <= rect.max().x
        && point.y() >= rect.min().y
        && point.y() <= rect.max().y
}

/// Whether two boxes share at least one point; touching edges count.
#[inline]
pub fn boxes_intersect(a: &Rect, b: &Rect) -> bool {
    a.intersects(b)
}

/// Area of the overlap of two boxes, zero when they are disjoint or only touch.
pub fn intersection_area(a: &Rect, b: &Rect) -> f64 {
    let width = a.max().x.min(b.max().x) - a.min().x.max(b.min().x);
    let height = a.max().y.min(b.max().y) - a.min().y.max(b.min().y);
    if width <= 0.0 || height <= 0.0 {
        return 0.0;
    }
    width * height
}

/// Area of a box.
#[inline]
pub fn area(rect: &Rect) -> f64 {
    rect.unsigned_area()
}
