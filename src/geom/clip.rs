//! Sutherland–Hodgman convex polygon clipping and area primitives.
//!
//! The clip polygon must be convex and consistently wound; its handedness
//! is derived once from its first three vertices and fixes the "inside"
//! side for every edge pass. The subject polygon may be any simple
//! polygon. Degenerate results (fewer than 3 vertices) have zero area.

use crate::georef::GeoPoint;

/// 2D cross product of two direction vectors.
fn cross(a: GeoPoint, b: GeoPoint) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Classify point `c` relative to the directed line `a → b`.
///
/// Returns +1 counter-clockwise, -1 clockwise, 0 collinear.
pub fn side_of(a: GeoPoint, b: GeoPoint, c: GeoPoint) -> i8 {
    let x = cross(b - a, c - b);
    if x < 0.0 {
        -1
    } else if x > 0.0 {
        1
    } else {
        0
    }
}

/// Intersection of the open segment `s0 → s1` with the infinite line
/// through `e0 → e1`.
///
/// Parametric cross-product solve along the segment; `None` when the
/// lines are parallel or the intersection parameter falls outside (0, 1)
/// exclusive. `z` is interpolated linearly along the segment.
pub fn line_intersect(e0: GeoPoint, e1: GeoPoint, s0: GeoPoint, s1: GeoPoint) -> Option<GeoPoint> {
    let de = e1 - e0;
    let ds = s1 - s0;
    let denom = cross(ds, de);
    if denom == 0.0 {
        return None;
    }
    let t = cross(e0 - s0, de) / denom;
    if t <= 0.0 || t >= 1.0 {
        return None;
    }
    Some(GeoPoint::with_z(
        s0.x + t * ds.x,
        s0.y + t * ds.y,
        s0.z + t * ds.z,
    ))
}

/// One Sutherland–Hodgman pass: clip `subject` against the single directed
/// edge `e0 → e1`, keeping vertices whose side is not opposite `keep` and
/// inserting intersection points where the polygon crosses the edge line.
///
/// The wrap-around edge (last vertex back to first) is handled by seeding
/// the pass with the last vertex.
pub fn clip_edge(subject: &[GeoPoint], e0: GeoPoint, e1: GeoPoint, keep: i8) -> Vec<GeoPoint> {
    let mut out = Vec::with_capacity(subject.len() + 4);
    let Some(&last) = subject.last() else {
        return out;
    };

    let mut v0 = last;
    let mut side0 = side_of(e0, e1, v0);
    if side0 != -keep {
        out.push(v0);
    }

    for (i, &v1) in subject.iter().enumerate() {
        let side1 = side_of(e0, e1, v1);
        if side0 + side1 == 0 && side0 != 0 {
            // previous and current vertex strictly span the edge line
            if let Some(p) = line_intersect(e0, e1, v0, v1) {
                out.push(p);
            }
        }
        if i == subject.len() - 1 {
            break;
        }
        if side1 != -keep {
            out.push(v1);
        }
        v0 = v1;
        side0 = side1;
    }
    out
}

/// Clip `subject` against every edge of the convex polygon `clip`,
/// threading each pass's output into the next and short-circuiting as
/// soon as an intermediate result empties out.
///
/// A clip polygon whose first three vertices are collinear is degenerate
/// and clips everything away.
pub fn clip_polygon(subject: &[GeoPoint], clip: &[GeoPoint]) -> Vec<GeoPoint> {
    if subject.is_empty() || clip.len() < 3 {
        return Vec::new();
    }
    let keep = side_of(clip[0], clip[1], clip[2]);
    if keep == 0 {
        return Vec::new();
    }

    let mut current = clip_edge(subject, clip[clip.len() - 1], clip[0], keep);
    for edge in clip.windows(2) {
        if current.is_empty() {
            return Vec::new();
        }
        current = clip_edge(&current, edge[0], edge[1], keep);
    }
    current
}

/// Signed polygon area via the shoelace formula,
/// `0.5 * Σ(y_i * x_{i+1} - x_i * y_{i+1})`.
///
/// The sign encodes winding direction; degenerate input (fewer than 3
/// vertices) yields 0.
pub fn signed_area(polygon: &[GeoPoint]) -> f64 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let mut s = 0.0;
    for (i, p) in polygon.iter().enumerate() {
        let q = polygon[(i + 1) % polygon.len()];
        s += p.y * q.x - p.x * q.y;
    }
    s / 2.0
}

/// Physical (non-negative) polygon area, winding-independent.
pub fn area(polygon: &[GeoPoint]) -> f64 {
    signed_area(polygon).abs()
}
