//! Sweep queries
//!
//! A sweep is a discrete before/after check: the querying volume is tested
//! at its displaced position against every candidate, and the resulting
//! collisions are ordered so callers can resolve the nearest one first.

use log::debug;

use crate::foundation::math::Vec3;
use crate::physics::bounds::Bounds;
use crate::physics::collision::{Collision, PairRole};

/// Collisions `query` would have after moving by `delta`
///
/// Candidates sharing the query's node are skipped. The result is sorted by
/// distance from the query's current (undisplaced) position to each
/// collision's nearest contact point; ties keep candidate order.
pub fn sweep(query: &Bounds<'_>, delta: Vec3, candidates: &[Bounds<'_>]) -> Vec<Collision> {
    let origin = query.transform().position;
    let moved = query.world_shape().translated(delta);

    let mut collisions: Vec<(f32, Collision)> = candidates
        .iter()
        .filter(|candidate| candidate.id() != query.id())
        .filter_map(|candidate| {
            let role = PairRole::between(query.id(), candidate.id());
            Collision::new(candidate.id(), moved.intersections_as(&candidate.world_shape(), role))
        })
        .map(|collision| (collision.closest_contact_distance(origin), collision))
        .collect();

    collisions.sort_by(|(a, _), (b, _)| a.total_cmp(b));

    debug!(
        "Sweep of {} by {:?} hit {} of {} candidates",
        query.volume().kind(),
        delta.as_slice(),
        collisions.len(),
        candidates.len()
    );

    collisions.into_iter().map(|(_, collision)| collision).collect()
}
