use geo::{Coord, LineString, Polygon};
use imageproc::{
    geometry::{approximate_polygon_dp, arc_length},
    point::Point,
};

pub(crate) fn to_geo_poly(points: &[Point<i32>]) -> Polygon<f64> {
    let points = points
        .iter()
        .map(|point| Coord {
            x: point.x as f64,
            y: point.y as f64,
        })
        .collect();
    Polygon::new(LineString::new(points), vec![])
}

/// Cosine of the angle at `pt0` between the rays towards `pt1` and `pt2`.
pub(crate) fn corner_cosine(pt1: Coord<f64>, pt2: Coord<f64>, pt0: Coord<f64>) -> f64 {
    let d1 = pt1 - pt0;
    let d2 = pt2 - pt0;
    (d1.x * d2.x + d1.y * d2.y)
        / ((d1.x * d1.x + d1.y * d1.y) * (d2.x * d2.x + d2.y * d2.y) + 1e-10).sqrt()
}

/// Largest |cosine| over the corners at vertices 1, 2 and 3. For a convex
/// quadrilateral the fourth corner is fixed by the other three.
pub(crate) fn max_corner_cosine(coords: &[Coord<f64>; 4]) -> f64 {
    (2..5)
        .map(|j| corner_cosine(coords[j % 4], coords[j - 2], coords[j - 1]).abs())
        .fold(0.0, f64::max)
}

/// Closed Douglas-Peucker simplification with `epsilon = tolerance * perimeter`.
///
/// The ring is split at two mutually distant points before simplifying each
/// half, so the place where contour tracing happened to start never survives
/// as a spurious vertex.
pub(crate) fn approximate_closed_polygon(points: &[Point<i32>], tolerance: f64) -> Vec<Point<i32>> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let (first, spread) = farthest_from(points, points[0]);
    if spread == 0 {
        return vec![points[0]];
    }
    let epsilon = arc_length(points, true) * tolerance;
    if epsilon <= 0.0 {
        return points.to_vec();
    }
    let (second, _) = farthest_from(points, points[first]);
    let (a, b) = (first.min(second), first.max(second));

    let backward = points[b..]
        .iter()
        .chain(&points[..=a])
        .copied()
        .collect::<Vec<_>>();

    let mut polygon = approximate_polygon_dp(&points[a..=b], epsilon, false);
    polygon.pop();
    let mut tail = approximate_polygon_dp(&backward, epsilon, false);
    tail.pop();
    polygon.append(&mut tail);
    polygon
}

fn farthest_from(points: &[Point<i32>], origin: Point<i32>) -> (usize, i64) {
    points
        .iter()
        .map(|p| {
            let dx = (p.x - origin.x) as i64;
            let dy = (p.y - origin.y) as i64;
            dx * dx + dy * dy
        })
        .enumerate()
        .max_by_key(|(_, d)| *d)
        .unwrap_or((0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rectangle_outline(x0: i32, y0: i32, x1: i32, y1: i32, start: usize) -> Vec<Point<i32>> {
        let mut ring = Vec::new();
        for x in x0..x1 {
            ring.push(Point::new(x, y0));
        }
        for y in y0..y1 {
            ring.push(Point::new(x1, y));
        }
        for x in (x0 + 1..=x1).rev() {
            ring.push(Point::new(x, y1));
        }
        for y in (y0 + 1..=y1).rev() {
            ring.push(Point::new(x0, y));
        }
        ring.rotate_left(start);
        ring
    }

    #[test]
    fn right_angle_has_zero_cosine() {
        let o = Coord { x: 0.0, y: 0.0 };
        let a = Coord { x: 10.0, y: 0.0 };
        let b = Coord { x: 0.0, y: 7.0 };
        assert!(corner_cosine(a, b, o).abs() < 1e-12);
    }

    #[test]
    fn coincident_points_do_not_divide_by_zero() {
        let o = Coord { x: 3.0, y: 3.0 };
        assert_eq!(corner_cosine(o, o, o), 0.0);
    }

    #[test]
    fn rectangle_outline_simplifies_to_its_corners() {
        let ring = rectangle_outline(10, 20, 110, 70, 0);
        let polygon = approximate_closed_polygon(&ring, 0.02);
        assert_eq!(polygon.len(), 4);
        for corner in [
            Point::new(10, 20),
            Point::new(110, 20),
            Point::new(110, 70),
            Point::new(10, 70),
        ] {
            assert!(polygon.contains(&corner), "missing {corner:?} in {polygon:?}");
        }
    }

    #[test]
    fn trace_start_mid_edge_is_not_a_vertex() {
        let ring = rectangle_outline(0, 0, 120, 60, 37);
        let polygon = approximate_closed_polygon(&ring, 0.02);
        assert_eq!(polygon.len(), 4);
        assert!(!polygon.contains(&ring[0]));
    }

    #[test]
    fn tiny_contours_pass_through() {
        let ring = vec![Point::new(1, 1), Point::new(2, 1)];
        assert_eq!(approximate_closed_polygon(&ring, 0.02), ring);
        let dot = vec![Point::new(4, 4); 5];
        assert_eq!(approximate_closed_polygon(&dot, 0.02), vec![Point::new(4, 4)]);
    }
}
