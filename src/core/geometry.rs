use crate::types::{Coordinate, StackError, StackResult};

/// Averaging centroid of a vertex ring
///
/// Arithmetic mean of each coordinate dimension independently. This is not
/// an area-weighted polygon centroid; product footprints are small and
/// near-rectangular, so the plain mean is sufficient for a point-intersection
/// search filter.
pub fn centroid(ring: &[Coordinate]) -> StackResult<Coordinate> {
    if ring.is_empty() {
        return Err(StackError::EmptyGeometry);
    }

    let mut sum = [0.0f64; 2];
    for vertex in ring {
        sum[0] += vertex[0];
        sum[1] += vertex[1];
    }

    let n = ring.len() as f64;
    Ok([sum[0] / n, sum[1] / n])
}

/// WKT point literal for a coordinate, as SearchAPI expects in `intersectsWith`
pub fn wkt_point(point: Coordinate) -> String {
    format!("POINT({} {})", point[0], point[1])
}
