use crate::Quadrilateral;

/// Two finds are the same label when their areas are at least this close.
const MIN_AREA_RATIO: f64 = 0.8;

/// Drop quadrilaterals that repeat an earlier find: centroid within
/// `distance` pixels and a similar area. The first occurrence wins, so the
/// output keeps detection order.
pub fn dedupe_quadrilaterals(quads: Vec<Quadrilateral>, distance: f64) -> Vec<Quadrilateral> {
    let d2 = distance * distance;
    let mut kept: Vec<Quadrilateral> = Vec::with_capacity(quads.len());

    for quad in quads {
        let center = quad.centroid();
        let area = quad.signed_area().abs();
        let duplicate = kept.iter().any(|other| {
            let delta = other.centroid() - center;
            let other_area = other.signed_area().abs();
            delta.x * delta.x + delta.y * delta.y <= d2
                && area.min(other_area) / area.max(other_area) >= MIN_AREA_RATIO
        });
        if !duplicate {
            kept.push(quad);
        }
    }

    kept
}
