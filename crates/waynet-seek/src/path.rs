//! The immutable result of a successful search.

use glam::Vec3;
use waynet_graph::{Registry, WaypointId};

/// An ordered route from the waypoint nearest the requested start to the
/// waypoint nearest the requested goal, plus the accumulated cost.
///
/// Produced once by a [`Seeker`](crate::Seeker); never mutated after
/// return. Moving along it is the caller's job.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    waypoints: Vec<WaypointId>,
    cost: f32,
}

impl Path {
    pub(crate) fn new(waypoints: Vec<WaypointId>, cost: f32) -> Self {
        Self { waypoints, cost }
    }

    /// The route, in traversal order. Always holds at least one waypoint.
    #[inline]
    pub fn waypoints(&self) -> &[WaypointId] {
        &self.waypoints
    }

    /// Sum of the traversed connection weights.
    #[inline]
    pub fn cost(&self) -> f32 {
        self.cost
    }

    /// Number of waypoints on the route.
    #[inline]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether the route is empty. Never true for a seeker-produced path.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// First waypoint of the route.
    pub fn start(&self) -> Option<WaypointId> {
        self.waypoints.first().copied()
    }

    /// Last waypoint of the route.
    pub fn goal(&self) -> Option<WaypointId> {
        self.waypoints.last().copied()
    }

    /// Resolve the route to world positions against a registry.
    ///
    /// Waypoints unregistered since the search finished are skipped.
    pub fn positions(&self, registry: &Registry) -> Vec<Vec3> {
        self.waypoints
            .iter()
            .filter_map(|id| registry.get(*id).map(|w| w.position))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waynet_graph::Waypoint;

    #[test]
    fn accessors() {
        let mut reg = Registry::new();
        let a = reg.register(Waypoint::new(Vec3::ZERO));
        let b = reg.register(Waypoint::new(Vec3::new(1.0, 0.0, 0.0)));

        let path = Path::new(vec![a, b], 1.5);
        assert_eq!(path.len(), 2);
        assert!(!path.is_empty());
        assert_eq!(path.cost(), 1.5);
        assert_eq!(path.start(), Some(a));
        assert_eq!(path.goal(), Some(b));
        assert_eq!(
            path.positions(&reg),
            vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)]
        );
    }

    #[test]
    fn positions_skip_unregistered_waypoints() {
        let mut reg = Registry::new();
        let a = reg.register(Waypoint::new(Vec3::ZERO));
        let b = reg.register(Waypoint::new(Vec3::new(1.0, 0.0, 0.0)));
        let path = Path::new(vec![a, b], 1.0);

        reg.unregister(b);
        assert_eq!(path.positions(&reg), vec![Vec3::ZERO]);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn path_round_trip() {
        let mut reg = Registry::new();
        let a = reg.register(waynet_graph::Waypoint::new(Vec3::ZERO));
        let path = Path::new(vec![a], 0.0);
        let json = serde_json::to_string(&path).unwrap();
        let back: Path = serde_json::from_str(&json).unwrap();
        assert_eq!(path, back);
    }
}
