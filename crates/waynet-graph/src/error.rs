//! Error types for graph mutation and probing.

use thiserror::Error;

use crate::waypoint::WaypointId;

/// Structural violations rejected at the mutation boundary.
///
/// A failed operation is a no-op; the graph is never left with an edge
/// referencing an absent waypoint. Search failure is not an error — an
/// unreachable goal is reported through the seeker's status instead.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GraphError {
    /// The referenced waypoint is not registered.
    #[error("waypoint {0} is not registered")]
    UnknownWaypoint(WaypointId),

    /// A connection must join two distinct waypoints.
    #[error("a waypoint cannot connect to itself")]
    SelfConnection,

    /// Probe steps must be positive for the descending radius loop to
    /// terminate.
    #[error("probe step must be positive, got {0}")]
    InvalidStep(f32),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, GraphError>;
