use super::types::Point;

/// Axis-aligned box covering every circle plus `border` on all sides.
pub(crate) fn bounding_box(positions: &[Point], radii: &[f64], border: f64) -> Option<(Point, Point)> {
    let mut iter = positions.iter().zip(radii);
    let (first, first_radius) = iter.next()?;
    let reach = first_radius + border;
    let mut min = Point::new(first.x - reach, first.y - reach);
    let mut max = Point::new(first.x + reach, first.y + reach);
    for (pos, radius) in iter {
        let reach = radius + border;
        min.x = min.x.min(pos.x - reach);
        min.y = min.y.min(pos.y - reach);
        max.x = max.x.max(pos.x + reach);
        max.y = max.y.max(pos.y + reach);
    }
    Some((min, max))
}

/// Moves the bounding box's minimum corner to the origin and returns the
/// canvas size. An empty graph has a zero-sized canvas.
///
/// Each node is shifted through its own box edge (`pos - reach`), so the node
/// that sets the minimum lands exactly on `reach` and no edge goes negative.
pub(crate) fn truncate(positions: &mut [Point], radii: &[f64], border: f64) -> (f64, f64) {
    let Some((min, max)) = bounding_box(positions, radii, border) else {
        return (0.0, 0.0);
    };
    for (pos, radius) in positions.iter_mut().zip(radii) {
        let reach = radius + border;
        pos.x = (pos.x - reach - min.x) + reach;
        pos.y = (pos.y - reach - min.y) + reach;
    }
    (max.x - min.x, max.y - min.y)
}
