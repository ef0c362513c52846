//! The navigation registry: single owner of the waypoint graph.

use std::collections::HashMap;

use crate::error::{GraphError, Result};
use crate::waypoint::{Connection, Waypoint, WaypointId};

/// Default number of node expansions a seeker performs per scheduling tick.
pub const DEFAULT_ITERATION_CAP: usize = 100;

/// Owner of all waypoints in one scene or session.
///
/// The registry is the only shared mutable resource of the system: the
/// authoring surface and the builder write to it, seekers only read. Every
/// mutation leaves the graph internally consistent — no connection ever
/// references a waypoint that is not registered.
///
/// Iteration order is registration order, which keeps searches and builder
/// runs deterministic for tests.
pub struct Registry {
    waypoints: HashMap<WaypointId, Waypoint>,
    order: Vec<WaypointId>,
    next_id: u32,
    iteration_cap: usize,
}

impl Registry {
    /// Create an empty registry with the default iteration cap.
    pub fn new() -> Self {
        Self {
            waypoints: HashMap::new(),
            order: Vec::new(),
            next_id: 0,
            iteration_cap: DEFAULT_ITERATION_CAP,
        }
    }

    // -----------------------------------------------------------------------
    // Waypoint lifecycle
    // -----------------------------------------------------------------------

    /// Add a waypoint and return its id for chaining.
    ///
    /// Ids are minted here and never reused, so double registration of the
    /// same waypoint is unrepresentable.
    pub fn register(&mut self, waypoint: Waypoint) -> WaypointId {
        let id = WaypointId(self.next_id);
        self.next_id += 1;
        self.waypoints.insert(id, waypoint);
        self.order.push(id);
        id
    }

    /// Remove a waypoint together with every connection that targets it.
    ///
    /// Returns the removed waypoint (its own outgoing list cleared), or
    /// `None` if the id is unknown.
    pub fn unregister(&mut self, id: WaypointId) -> Option<Waypoint> {
        let mut removed = self.waypoints.remove(&id)?;
        self.order.retain(|other| *other != id);
        for waypoint in self.waypoints.values_mut() {
            waypoint.connections.retain(|c| c.to() != id);
        }
        removed.connections.clear();
        Some(removed)
    }

    // -----------------------------------------------------------------------
    // Connections
    // -----------------------------------------------------------------------

    /// Create a directed connection from `from` to `to` with default width,
    /// weight and tag, appended to `from`'s outgoing list.
    ///
    /// Returns a mutable reference to the new connection so callers can
    /// adjust its fields in place. Self-connections and unregistered
    /// endpoints are rejected.
    pub fn connect(&mut self, from: WaypointId, to: WaypointId) -> Result<&mut Connection> {
        if from == to {
            return Err(GraphError::SelfConnection);
        }
        if !self.waypoints.contains_key(&to) {
            return Err(GraphError::UnknownWaypoint(to));
        }
        let owner = self
            .waypoints
            .get_mut(&from)
            .ok_or(GraphError::UnknownWaypoint(from))?;
        owner.connections.push(Connection::new(from, to));
        // Just pushed, so the list is non-empty.
        Ok(owner.connections.last_mut().expect("connection list non-empty"))
    }

    /// Remove every outgoing connection of one waypoint.
    pub fn disconnect(&mut self, id: WaypointId) -> Result<()> {
        let waypoint = self
            .waypoints
            .get_mut(&id)
            .ok_or(GraphError::UnknownWaypoint(id))?;
        waypoint.disconnect();
        Ok(())
    }

    /// Remove every connection in the graph. The waypoint set is unchanged.
    pub fn disconnect_all(&mut self) {
        for waypoint in self.waypoints.values_mut() {
            waypoint.connections.clear();
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Look up a waypoint by id.
    #[inline]
    pub fn get(&self, id: WaypointId) -> Option<&Waypoint> {
        self.waypoints.get(&id)
    }

    /// Mutable lookup for editing position, radius, tag or enabled state.
    #[inline]
    pub fn get_mut(&mut self, id: WaypointId) -> Option<&mut Waypoint> {
        self.waypoints.get_mut(&id)
    }

    /// Whether the id resolves to a registered waypoint.
    #[inline]
    pub fn contains(&self, id: WaypointId) -> bool {
        self.waypoints.contains_key(&id)
    }

    /// Iterate over all waypoints in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (WaypointId, &Waypoint)> {
        self.order.iter().filter_map(|id| Some((*id, self.waypoints.get(id)?)))
    }

    /// Number of registered waypoints.
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the registry holds no waypoints.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // -----------------------------------------------------------------------
    // Tuning
    // -----------------------------------------------------------------------

    /// Node expansions a seeker may perform per scheduling tick.
    #[inline]
    pub fn iteration_cap(&self) -> usize {
        self.iteration_cap
    }

    /// Set the per-tick expansion budget. Clamped to at least 1 — a zero
    /// cap would stall every in-flight search forever.
    pub fn set_iteration_cap(&mut self, cap: usize) {
        self.iteration_cap = cap.max(1);
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn registry_with(n: usize) -> (Registry, Vec<WaypointId>) {
        let mut reg = Registry::new();
        let ids = (0..n)
            .map(|i| reg.register(Waypoint::new(Vec3::new(i as f32, 0.0, 0.0))))
            .collect();
        (reg, ids)
    }

    /// Every connection's endpoints must resolve to registered waypoints.
    fn assert_consistent(reg: &Registry) {
        for (_, waypoint) in reg.iter() {
            for connection in waypoint.connections() {
                assert!(reg.contains(connection.from()));
                assert!(reg.contains(connection.to()));
            }
        }
    }

    #[test]
    fn register_returns_fresh_ids_in_order() {
        let (reg, ids) = registry_with(3);
        assert_eq!(reg.len(), 3);
        let iterated: Vec<_> = reg.iter().map(|(id, _)| id).collect();
        assert_eq!(iterated, ids);
    }

    #[test]
    fn connect_rejects_self_connection() {
        let (mut reg, ids) = registry_with(1);
        assert_eq!(reg.connect(ids[0], ids[0]), Err(GraphError::SelfConnection));
    }

    #[test]
    fn connect_rejects_unknown_endpoints() {
        let (mut reg, ids) = registry_with(2);
        let ghost = ids[1];
        reg.unregister(ghost);
        assert_eq!(
            reg.connect(ids[0], ghost),
            Err(GraphError::UnknownWaypoint(ghost))
        );
        assert_eq!(
            reg.connect(ghost, ids[0]),
            Err(GraphError::UnknownWaypoint(ghost))
        );
        assert_consistent(&reg);
    }

    #[test]
    fn connect_appends_with_defaults() {
        let (mut reg, ids) = registry_with(2);
        let connection = reg.connect(ids[0], ids[1]).unwrap();
        assert_eq!(connection.weight, Connection::DEFAULT_WEIGHT);
        connection.weight = 4.0;
        let stored = &reg.get(ids[0]).unwrap().connections()[0];
        assert_eq!(stored.weight, 4.0);
        assert_eq!(stored.to(), ids[1]);
    }

    // Scenario: unregistering B where A→B and B→C exist leaves A without the
    // edge to B, removes B, and leaves C untouched.
    #[test]
    fn unregister_removes_targeting_connections() {
        let (mut reg, ids) = registry_with(3);
        let (a, b, c) = (ids[0], ids[1], ids[2]);
        reg.connect(a, b).unwrap();
        reg.connect(b, c).unwrap();

        let removed = reg.unregister(b).unwrap();
        assert!(removed.connections().is_empty());
        assert!(!reg.contains(b));
        assert!(reg.get(a).unwrap().connections().is_empty());
        assert!(reg.contains(c));
        assert_consistent(&reg);
    }

    #[test]
    fn unregister_unknown_is_none() {
        let (mut reg, ids) = registry_with(1);
        reg.unregister(ids[0]);
        assert!(reg.unregister(ids[0]).is_none());
    }

    #[test]
    fn disconnect_all_keeps_waypoints() {
        let (mut reg, ids) = registry_with(3);
        reg.connect(ids[0], ids[1]).unwrap();
        reg.connect(ids[1], ids[2]).unwrap();
        reg.connect(ids[2], ids[0]).unwrap();

        reg.disconnect_all();
        assert_eq!(reg.len(), 3);
        for (_, waypoint) in reg.iter() {
            assert!(waypoint.connections().is_empty());
        }
    }

    #[test]
    fn disconnect_clears_one_waypoint() {
        let (mut reg, ids) = registry_with(3);
        reg.connect(ids[0], ids[1]).unwrap();
        reg.connect(ids[0], ids[2]).unwrap();
        reg.connect(ids[1], ids[2]).unwrap();

        reg.disconnect(ids[0]).unwrap();
        assert!(reg.get(ids[0]).unwrap().connections().is_empty());
        assert_eq!(reg.get(ids[1]).unwrap().connections().len(), 1);
    }

    #[test]
    fn iteration_cap_clamps_to_one() {
        let mut reg = Registry::new();
        assert_eq!(reg.iteration_cap(), DEFAULT_ITERATION_CAP);
        reg.set_iteration_cap(0);
        assert_eq!(reg.iteration_cap(), 1);
        reg.set_iteration_cap(25);
        assert_eq!(reg.iteration_cap(), 25);
    }

    #[test]
    fn ids_are_not_reused_after_unregister() {
        let (mut reg, ids) = registry_with(2);
        reg.unregister(ids[1]);
        let fresh = reg.register(Waypoint::new(Vec3::ZERO));
        assert_ne!(fresh, ids[1]);
    }
}
