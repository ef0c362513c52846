//! Incremental path search over a waypoint graph.
//!
//! A [`Seeker`] answers one route request between two world positions:
//! it snaps both endpoints to the graph through a [`SnapPolicy`], then
//! runs an A*-style search that can be suspended and resumed at any
//! expansion boundary via [`Seeker::advance`]. The [`Navigator`] is the
//! cooperative scheduler on top — it drives every in-flight seeker by the
//! registry's iteration cap each tick and hands finished [`Path`]s (or
//! failures, echoing the requested goal) back through polling.
//!
//! ```
//! use glam::Vec3;
//! use waynet_graph::{Registry, Waypoint};
//! use waynet_seek::Navigator;
//!
//! let mut registry = Registry::new();
//! let a = registry.register(Waypoint::new(Vec3::ZERO));
//! let b = registry.register(Waypoint::new(Vec3::new(4.0, 0.0, 0.0)));
//! registry.connect(a, b).unwrap();
//!
//! let mut navigator = Navigator::new();
//! let request = navigator.request_path(&registry, Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0));
//! let outcome = loop {
//!     navigator.tick(&registry);
//!     if let Some(outcome) = navigator.poll(request) {
//!         break outcome;
//!     }
//! };
//! assert!(outcome.path().is_some());
//! ```

mod navigator;
mod path;
mod seeker;
mod weights;

pub use navigator::{DEFAULT_READY_CAPACITY, Navigator, PathOutcome, RequestId};
pub use path::Path;
pub use seeker::{NearestSnap, Seeker, SeekerStatus, SnapPolicy, SweepSnap};
pub use weights::{WeightHandler, WeightHandlers};
