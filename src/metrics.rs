//! Label attributes derived from one accepted quadrilateral.
//!
//! Confidence is `angle_score * regularity`:
//! - `angle_score = 1 - max |cos|` over the corners checked at acceptance,
//! - `regularity` multiplies the short/long ratios of both pairs of opposite
//!   edges.
//!
//! A perfect rectangle scores exactly 1.0 and the score only falls as the
//! corners drift from 90 degrees or opposite edges differ in length.

use float_ord::FloatOrd;
use geo::{Area, BoundingRect, EuclideanLength};
use tracing::instrument;

use crate::{util::max_corner_cosine, Position, PrintedLabel, Quadrilateral};

#[instrument(level = "trace")]
pub fn compute_label(quad: &Quadrilateral) -> PrintedLabel {
    let polygon = quad.to_polygon();
    let position = polygon
        .bounding_rect()
        .map(|rect| Position {
            width: rect.width(),
            height: rect.height(),
        })
        .unwrap_or(Position {
            width: 0.0,
            height: 0.0,
        });

    let edges = polygon
        .exterior()
        .lines()
        .map(|line| (line.euclidean_length(), line))
        .collect::<Vec<_>>();
    // rev() so ties resolve to the first edge in vertex order
    let orientation = edges
        .iter()
        .rev()
        .max_by_key(|(length, _)| FloatOrd(*length))
        .map(|(_, line)| normalize_degrees(line.dy().atan2(line.dx()).to_degrees()))
        .unwrap_or(0.0);
    let lengths = edges.iter().map(|(length, _)| *length).collect::<Vec<_>>();

    PrintedLabel {
        position,
        orientation,
        area: polygon.signed_area().abs(),
        perimeter: polygon.exterior().euclidean_length(),
        confidence: confidence(quad, &lengths),
    }
}

fn confidence(quad: &Quadrilateral, lengths: &[f64]) -> f64 {
    let angle_score = (1.0 - max_corner_cosine(&quad.coords())).clamp(0.0, 1.0);
    let regularity = match lengths {
        [e0, e1, e2, e3] => length_ratio(*e0, *e2) * length_ratio(*e1, *e3),
        _ => 0.0,
    };
    (angle_score * regularity).clamp(0.0, 1.0)
}

fn length_ratio(a: f64, b: f64) -> f64 {
    let longest = a.max(b);
    if longest <= 0.0 {
        return 0.0;
    }
    a.min(b) / longest
}

fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(180.0);
    if normalized >= 180.0 {
        0.0
    } else {
        normalized
    }
}
