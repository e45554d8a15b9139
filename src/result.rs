use geo::{Area, Centroid, Coord, Polygon};
use imageproc::point::Point;

use crate::{util::to_geo_poly, Error, Result};

/// Four vertices in contour-trace order. Always has non-zero enclosed area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadrilateral {
    points: [Point<i32>; 4],
}

impl Quadrilateral {
    pub fn new(points: &[Point<i32>]) -> Result<Self> {
        let points: [Point<i32>; 4] = points.try_into().map_err(|_| {
            Error::InvalidArgument(format!(
                "a quadrilateral needs exactly 4 vertices, got {}",
                points.len()
            ))
        })?;
        let quad = Self { points };
        if quad.signed_area() == 0.0 {
            return Err(Error::InvalidArgument(
                "quadrilateral encloses no area".to_string(),
            ));
        }
        Ok(quad)
    }

    pub fn points(&self) -> &[Point<i32>; 4] {
        &self.points
    }

    pub fn coords(&self) -> [Coord<f64>; 4] {
        self.points.map(|p| Coord {
            x: p.x as f64,
            y: p.y as f64,
        })
    }

    pub fn to_polygon(&self) -> Polygon<f64> {
        to_geo_poly(&self.points)
    }

    /// Shoelace area; the sign follows the vertex winding.
    pub fn signed_area(&self) -> f64 {
        self.to_polygon().signed_area()
    }

    pub fn centroid(&self) -> Coord<f64> {
        self.to_polygon()
            .centroid()
            .map(|it| it.0)
            .unwrap_or_else(|| {
                let [a, b, c, d] = self.coords();
                (a + b + c + d) / 4.0
            })
    }

    /// Same polygon with positive shoelace winding, starting at the top-most
    /// (then left-most) vertex.
    pub fn normalized(&self) -> Self {
        let mut points = self.points;
        if self.signed_area() < 0.0 {
            points.reverse();
        }
        let start = points
            .iter()
            .enumerate()
            .min_by_key(|(_, p)| (p.y, p.x))
            .map(|(i, _)| i)
            .unwrap_or(0);
        points.rotate_left(start);
        Self { points }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrintedLabel {
    pub position: Position,
    /// Degrees in `[0, 180)` of the longest edge against the raster x axis.
    ///
    /// The edge is taken in vertex order, so direction matters before the
    /// angle is folded into range: a nearly horizontal edge traced right to
    /// left reads close to 180 (e.g. 179.7), not close to 0.
    pub orientation: f64,
    pub area: f64,
    pub perimeter: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectedLabel {
    pub bounds: Quadrilateral,
    pub label: PrintedLabel,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(i32, i32)]) -> Vec<Point<i32>> {
        raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn rejects_wrong_vertex_count() {
        let err = Quadrilateral::new(&pts(&[(0, 0), (10, 0), (10, 10)])).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        let err = Quadrilateral::new(&pts(&[(0, 0), (10, 0), (10, 10), (0, 10), (0, 5)]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn rejects_zero_area() {
        let err = Quadrilateral::new(&pts(&[(0, 0), (10, 0), (20, 0), (30, 0)])).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn normalized_has_positive_winding_and_top_left_start() {
        let quad = Quadrilateral::new(&pts(&[(10, 10), (10, 0), (0, 0), (0, 10)])).unwrap();
        assert!(quad.signed_area() < 0.0);
        let normalized = quad.normalized();
        assert!(normalized.signed_area() > 0.0);
        assert_eq!(normalized.points()[0], Point::new(0, 0));
        assert_eq!(normalized.signed_area(), -quad.signed_area());
    }

    #[test]
    fn centroid_of_rectangle() {
        let quad = Quadrilateral::new(&pts(&[(0, 0), (40, 0), (40, 20), (0, 20)])).unwrap();
        let c = quad.centroid();
        assert!((c.x - 20.0).abs() < 1e-9);
        assert!((c.y - 10.0).abs() < 1e-9);
    }
}
