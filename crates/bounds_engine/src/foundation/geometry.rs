//! Shared geometric queries
//!
//! Closest-point routines on segments and the interval arithmetic used by
//! separating-axis tests. Based on Ericson, "Real-Time Collision Detection",
//! sections 5.1.2 and 5.1.9.

use crate::foundation::math::Vec3;

/// Tolerance for degenerate lengths and parallel directions
pub const EPSILON: f32 = 1e-6;

/// Closest point on segment `[start, end]` to `point`
///
/// Returns the point and its parameter `t` in `[0, 1]`. A zero-length
/// segment returns `start` with `t = 0`.
pub fn closest_point_on_segment(start: Vec3, end: Vec3, point: Vec3) -> (Vec3, f32) {
    let segment = end - start;
    let length_squared = segment.magnitude_squared();
    if length_squared <= EPSILON * EPSILON {
        return (start, 0.0);
    }

    let t = ((point - start).dot(&segment) / length_squared).clamp(0.0, 1.0);
    (start + segment * t, t)
}

/// Closest pair of points between segments `[p1, q1]` and `[p2, q2]`
///
/// Returns `(point_on_first, point_on_second)`. Handles zero-length and
/// parallel segments; for parallel overlapping segments any closest pair
/// may be returned.
pub fn closest_points_between_segments(p1: Vec3, q1: Vec3, p2: Vec3, q2: Vec3) -> (Vec3, Vec3) {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.dot(&d1);
    let e = d2.dot(&d2);
    let f = d2.dot(&r);

    let degenerate = EPSILON * EPSILON;
    let (s, t) = if a <= degenerate && e <= degenerate {
        // Both segments are points
        (0.0, 0.0)
    } else if a <= degenerate {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(&r);
        if e <= degenerate {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(&d2);
            let denom = a * e - b * b;

            // Parallel segments: pick s = 0 and let the clamping below fix t
            let mut s = if denom > EPSILON * a * e {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };

            let mut t = (b * s + f) / e;
            if t < 0.0 {
                t = 0.0;
                s = (-c / a).clamp(0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = ((b - c) / a).clamp(0.0, 1.0);
            }
            (s, t)
        }
    };

    (p1 + d1 * s, p2 + d2 * t)
}

/// Closed interval of a shape projected onto an axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Lowest projection
    pub min: f32,
    /// Highest projection
    pub max: f32,
}

impl Interval {
    /// Create an interval, ordering the bounds
    pub fn new(a: f32, b: f32) -> Self {
        Self { min: a.min(b), max: a.max(b) }
    }

    /// Interval of a set of points projected onto `axis`
    pub fn of_points(axis: &Vec3, points: &[Vec3]) -> Self {
        points.iter().fold(
            Self { min: f32::INFINITY, max: f32::NEG_INFINITY },
            |acc, point| {
                let projection = axis.dot(point);
                Self { min: acc.min.min(projection), max: acc.max.max(projection) }
            },
        )
    }

    /// Interval centred on `center` with half-width `radius`
    pub fn around(center: f32, radius: f32) -> Self {
        Self::new(center - radius, center + radius)
    }

    /// Smallest signed push that moves `self` out of `other` along the axis
    ///
    /// Returns `None` when the intervals do not strictly overlap. Otherwise
    /// returns `(depth, sign)` where moving `self` by `sign * depth` along the
    /// axis separates the two. Swapping the arguments flips the sign, except
    /// on an exact tie, which always resolves to the negative direction.
    pub fn push_out_of(&self, other: &Interval) -> Option<(f32, f32)> {
        let push_positive = other.max - self.min;
        let push_negative = self.max - other.min;
        if push_positive <= 0.0 || push_negative <= 0.0 {
            return None;
        }

        if push_positive < push_negative {
            Some((push_positive, 1.0))
        } else {
            Some((push_negative, -1.0))
        }
    }
}

/// Minimum-overlap axis found by a separating-axis test
#[derive(Debug, Clone, Copy)]
pub struct AxisPush {
    /// Unit axis, signed so that moving the first shape along it separates
    pub direction: Vec3,
    /// Overlap along the axis
    pub depth: f32,
}

/// Run a separating-axis test over `axes` using the projection closures
///
/// Near-zero axes (from parallel edges) are skipped. Returns `None` as soon
/// as a separating axis is found, otherwise the axis of least overlap.
pub fn least_overlap_axis<A, B>(axes: &[Vec3], project_first: A, project_second: B) -> Option<AxisPush>
where
    A: Fn(&Vec3) -> Interval,
    B: Fn(&Vec3) -> Interval,
{
    let mut best: Option<AxisPush> = None;

    for axis in axes {
        let length_squared = axis.magnitude_squared();
        if length_squared < EPSILON {
            continue;
        }
        let axis = *axis / length_squared.sqrt();

        let (depth, sign) = project_first(&axis).push_out_of(&project_second(&axis))?;
        if best.map_or(true, |b| depth < b.depth) {
            best = Some(AxisPush { direction: axis * sign, depth });
        }
    }

    best
}
