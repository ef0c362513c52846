//! Graph entities: [`Waypoint`] and [`Connection`].

use std::fmt;

use glam::Vec3;

// ---------------------------------------------------------------------------
// WaypointId
// ---------------------------------------------------------------------------

/// Opaque handle to a waypoint held by a
/// [`Registry`](crate::Registry).
///
/// Ids are minted by [`Registry::register`](crate::Registry::register) and
/// never reused within one registry, so a stale handle simply stops
/// resolving instead of aliasing a newer waypoint.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaypointId(pub(crate) u32);

impl fmt::Display for WaypointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Waypoint
// ---------------------------------------------------------------------------

/// A navigable point in the scene.
///
/// A disabled waypoint is excluded from search and from builder probing but
/// stays addressable for editing.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    /// World position.
    pub position: Vec3,
    /// Free-space clearance radius.
    pub radius: f32,
    /// Whether the waypoint participates in search and probing.
    pub enabled: bool,
    /// Opaque classification tag.
    pub tag: String,
    pub(crate) connections: Vec<Connection>,
}

impl Waypoint {
    /// Default clearance radius for newly placed waypoints.
    pub const DEFAULT_RADIUS: f32 = 1.0;

    /// Create an enabled waypoint at `position` with the default radius.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            radius: Self::DEFAULT_RADIUS,
            enabled: true,
            tag: String::new(),
            connections: Vec::new(),
        }
    }

    /// Create a waypoint with an explicit clearance radius.
    pub fn with_radius(position: Vec3, radius: f32) -> Self {
        Self {
            radius,
            ..Self::new(position)
        }
    }

    /// Outgoing connections, in creation order.
    #[inline]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Mutable access to the outgoing connections.
    ///
    /// Endpoints stay fixed (a connection's `from`/`to` are immutable);
    /// width, weight, tag and the enabled flag are free to edit.
    #[inline]
    pub fn connections_mut(&mut self) -> &mut [Connection] {
        &mut self.connections
    }

    /// Remove every outgoing connection in one operation.
    pub fn disconnect(&mut self) {
        self.connections.clear();
    }
}

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

/// A directed, weighted edge between two waypoints.
///
/// Owned exclusively by its `from` waypoint; a traversable return trip
/// requires a second connection in the other direction.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Connection {
    from: WaypointId,
    to: WaypointId,
    /// Whether the edge participates in search.
    pub enabled: bool,
    /// Lateral clearance. Used by the builder and by rendering, never by
    /// search cost.
    pub width: f32,
    /// Search cost of traversing the edge. Setting a weight ≤ 0 is the
    /// caller's responsibility; the search adds it unvalidated.
    pub weight: f32,
    /// Opaque classification tag.
    pub tag: String,
}

impl Connection {
    /// Default lateral clearance.
    pub const DEFAULT_WIDTH: f32 = 1.0;
    /// Default traversal cost.
    pub const DEFAULT_WEIGHT: f32 = 1.0;

    /// Construction goes through
    /// [`Registry::connect`](crate::Registry::connect), which checks that
    /// both endpoints are registered and distinct.
    pub(crate) fn new(from: WaypointId, to: WaypointId) -> Self {
        Self {
            from,
            to,
            enabled: true,
            width: Self::DEFAULT_WIDTH,
            weight: Self::DEFAULT_WEIGHT,
            tag: String::new(),
        }
    }

    /// The owning waypoint.
    #[inline]
    pub fn from(&self) -> WaypointId {
        self.from
    }

    /// The target waypoint.
    #[inline]
    pub fn to(&self) -> WaypointId {
        self.to
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn waypoint_round_trip() {
        let mut w = Waypoint::with_radius(Vec3::new(0.5, 1.5, -2.0), 3.0);
        w.tag = "cover".to_string();
        w.connections.push(Connection::new(WaypointId(3), WaypointId(4)));
        let json = serde_json::to_string(&w).unwrap();
        let back: Waypoint = serde_json::from_str(&json).unwrap();
        assert_eq!(w, back);
    }
}
