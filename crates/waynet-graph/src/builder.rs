//! Graph construction heuristics: auto-scale and auto-connect.
//!
//! Both derive usable clearance data from scene geometry by probing 3D
//! space through a [`CollisionProbe`], descending from the widest test
//! radius until something fits. They are design-time / offline tools:
//! auto-connect is O(N²) in waypoint count and probes each pair up to
//! `(max_width - min_width) / step` times.

use glam::Vec3;
use log::debug;

use crate::error::{GraphError, Result};
use crate::probe::{CollisionProbe, LayerMask};
use crate::registry::Registry;
use crate::waypoint::WaypointId;

/// Probe range shared by [`auto_scale`] and [`auto_connect`].
///
/// Radii are tested from `max_width` down to `min_width` in decrements of
/// `step`; the first unobstructed radius wins.
#[derive(Copy, Clone, Debug)]
pub struct ProbeParams {
    /// Layers that count as obstacles.
    pub block_mask: LayerMask,
    /// Smallest radius worth testing.
    pub min_width: f32,
    /// Radius the descent starts from.
    pub max_width: f32,
    /// Decrement between tests. Must be positive.
    pub step: f32,
}

impl ProbeParams {
    fn validate(&self) -> Result<()> {
        if self.step <= 0.0 {
            return Err(GraphError::InvalidStep(self.step));
        }
        Ok(())
    }

    /// Radii tested during descent, widest first. Each radius is computed
    /// from the step index rather than by repeated subtraction, so
    /// fractional steps cannot drift and skip the final `min_width` probe.
    fn radii(&self) -> impl Iterator<Item = f32> + '_ {
        (0u32..)
            .map(move |k| self.max_width - k as f32 * self.step)
            .take_while(move |radius| *radius >= self.min_width)
    }
}

/// What [`auto_connect`] does about pre-existing edges for a pair it
/// accepts.
///
/// `Stack` leaves earlier edges in place, so re-running the builder piles
/// up parallel connections; `Replace` removes prior `from -> to` edges
/// first.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Keep existing edges; parallel connections may accumulate.
    #[default]
    Stack,
    /// Drop existing `from -> to` edges before adding the new one.
    Replace,
}

/// Descend the radius range and return the first radius that fits at
/// `position`, or `None` if nothing down to `min_width` is clear.
fn fit_radius(
    probe: &impl CollisionProbe,
    params: &ProbeParams,
    position: Vec3,
) -> Option<f32> {
    params
        .radii()
        .find(|&radius| !probe.is_region_blocked(position, radius, params.block_mask))
}

/// Derive waypoint radii from scene geometry.
///
/// For every enabled waypoint, the first clear radius in the probe range
/// becomes the waypoint's radius. Waypoints where nothing fits are left
/// unchanged. Returns the number of waypoints rescaled.
pub fn auto_scale(
    registry: &mut Registry,
    probe: &impl CollisionProbe,
    params: &ProbeParams,
) -> Result<usize> {
    params.validate()?;

    let candidates: Vec<(WaypointId, Vec3)> = registry
        .iter()
        .filter(|(_, w)| w.enabled)
        .map(|(id, w)| (id, w.position))
        .collect();

    let mut rescaled = 0;
    for (id, position) in candidates {
        if let Some(radius) = fit_radius(probe, params, position) {
            if let Some(waypoint) = registry.get_mut(id) {
                waypoint.radius = radius;
                rescaled += 1;
            }
        }
    }

    debug!("auto-scale: rescaled {rescaled} of {} waypoints", registry.len());
    Ok(rescaled)
}

/// Derive connections from scene geometry.
///
/// For every ordered pair of distinct enabled waypoints, the descent
/// accepts the first radius where a sphere at the source is clear and the
/// sweep along the straight line to the target is clear for the full
/// distance; the resulting connection gets `width = 2 × radius`. Pairs
/// where nothing fits are skipped. Returns the number of connections
/// created.
pub fn auto_connect(
    registry: &mut Registry,
    probe: &impl CollisionProbe,
    params: &ProbeParams,
    duplicates: DuplicatePolicy,
) -> Result<usize> {
    params.validate()?;

    let candidates: Vec<(WaypointId, Vec3)> = registry
        .iter()
        .filter(|(_, w)| w.enabled)
        .map(|(id, w)| (id, w.position))
        .collect();

    let mut created = 0;
    for &(from, from_position) in &candidates {
        for &(to, to_position) in &candidates {
            if from == to {
                continue;
            }
            let Some(radius) = fit_pair(probe, params, from_position, to_position) else {
                continue;
            };
            if duplicates == DuplicatePolicy::Replace {
                if let Some(waypoint) = registry.get_mut(from) {
                    waypoint.connections.retain(|c| c.to() != to);
                }
            }
            // Endpoints were collected from this registry, so connect only
            // fails if an id vanished mid-batch; skip such pairs.
            if let Ok(connection) = registry.connect(from, to) {
                connection.width = radius * 2.0;
                created += 1;
            }
        }
    }

    debug!("auto-connect: created {created} connections among {} waypoints", registry.len());
    Ok(created)
}

/// Widest radius that both fits at `from` and sweeps cleanly to `to`.
fn fit_pair(
    probe: &impl CollisionProbe,
    params: &ProbeParams,
    from: Vec3,
    to: Vec3,
) -> Option<f32> {
    let delta = to - from;
    let distance = delta.length();
    let direction = if distance > f32::EPSILON {
        delta / distance
    } else {
        Vec3::ZERO
    };

    params.radii().find(|&radius| {
        !probe.is_region_blocked(from, radius, params.block_mask)
            && !probe.is_sweep_blocked(from, radius, direction, distance, params.block_mask)
    })
}
