//! Scan-line polygon fill.
//!
//! Pixel `(x, y)` is inside when its centre `(x + 0.5, y + 0.5)` is inside
//! the polygon by the even-odd rule. Crossings are computed at the row
//! centre; a centre exactly on a left edge is inside, on a right edge
//! outside.

use glam::IVec2;

use super::table::MaskTable;
use crate::geometry::ImageSize;

/// Rasterizes the polygon through `vertices` (implicitly closed).
pub fn fill_polygon(vertices: &[IVec2], size: ImageSize) -> MaskTable {
    let mut table = MaskTable::new_filled(size, false);
    if distinct_vertices(vertices) < 3 || size.is_empty() {
        return table;
    }

    let width = size.width as f64;
    let mut crossings: Vec<f64> = Vec::with_capacity(vertices.len());

    for y in 0..size.height as usize {
        let yc = y as f64 + 0.5;
        crossings.clear();

        for (i, a) in vertices.iter().enumerate() {
            let b = vertices[(i + 1) % vertices.len()];
            let (ay, by) = (a.y as f64, b.y as f64);
            if (ay > yc) != (by > yc) {
                let t = (yc - ay) / (by - ay);
                crossings.push(a.x as f64 + t * (b.x as f64 - a.x as f64));
            }
        }

        crossings.sort_by(f64::total_cmp);

        for span in crossings.chunks_exact(2) {
            let x0 = (span[0] - 0.5).ceil().clamp(0.0, width) as usize;
            let x1 = (span[1] - 0.5).ceil().clamp(0.0, width) as usize;
            if x0 < x1 {
                table.set_span(y, x0, x1, true);
            }
        }
    }

    table
}

fn distinct_vertices(vertices: &[IVec2]) -> usize {
    let mut seen: Vec<IVec2> = Vec::with_capacity(vertices.len());
    for v in vertices {
        if !seen.contains(v) {
            seen.push(*v);
        }
    }
    seen.len()
}
