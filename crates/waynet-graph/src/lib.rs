//! Waypoint-graph model for pathfinding in real-time 3D scenes.
//!
//! Designers place [`Waypoint`]s and link them with directed, weighted
//! [`Connection`]s; a [`Registry`] owns the resulting graph and keeps it
//! internally consistent under edits. The builder entry points
//! ([`auto_scale`], [`auto_connect`]) derive clearance radii and
//! connections from scene geometry through an abstract [`CollisionProbe`],
//! so the crate never depends on a particular physics engine.
//!
//! The incremental path search that answers route requests against this
//! graph lives in the companion `waynet-seek` crate.

mod builder;
mod error;
mod probe;
mod registry;
mod waypoint;

pub use builder::{DuplicatePolicy, ProbeParams, auto_connect, auto_scale};
pub use error::{GraphError, Result};
pub use probe::{CollisionProbe, LayerMask, NoObstacles, SphereField};
pub use registry::{DEFAULT_ITERATION_CAP, Registry};
pub use waypoint::{Connection, Waypoint, WaypointId};
