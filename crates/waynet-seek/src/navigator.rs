//! Cooperative scheduler for in-flight path requests.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use glam::Vec3;
use log::{debug, trace};

use waynet_graph::{Connection, Registry};

use crate::path::Path;
use crate::seeker::{Seeker, SeekerStatus, SnapPolicy};
use crate::weights::WeightHandlers;

/// Default bound on parked, unpolled outcomes.
pub const DEFAULT_READY_CAPACITY: usize = 1024;

/// Handle correlating a request with its outcome.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request #{}", self.0)
    }
}

/// Final report for a path request.
///
/// Both variants echo the goal position the request was made with. Goals
/// can change while a search is in flight; comparing the echo against the
/// requester's current goal distinguishes a live result from a stale one.
#[derive(Clone, Debug, PartialEq)]
pub enum PathOutcome {
    /// A route exists; here it is.
    Found { goal: Vec3, path: Path },
    /// No route exists to this exact goal.
    Failed { goal: Vec3 },
}

impl PathOutcome {
    /// The goal position the request was made with.
    pub fn goal(&self) -> Vec3 {
        match self {
            PathOutcome::Found { goal, .. } | PathOutcome::Failed { goal } => *goal,
        }
    }

    /// The route, if one was found.
    pub fn path(&self) -> Option<&Path> {
        match self {
            PathOutcome::Found { path, .. } => Some(path),
            PathOutcome::Failed { .. } => None,
        }
    }
}

/// Single-threaded cooperative scheduler answering path requests without
/// stalling the frame loop.
///
/// Each [`tick`](Self::tick) advances every in-flight [`Seeker`] by the
/// registry's iteration cap — the one global knob trading path latency
/// against per-tick cost. Seekers share no state and may complete in any
/// order relative to each other. Finished requests park their
/// [`PathOutcome`] until the requester [`poll`](Self::poll)s it or
/// [`cancel`](Self::cancel)s the request.
///
/// Requesters that abandon a request without polling or cancelling would
/// otherwise leak their outcome, so the parked store is bounded: once it
/// exceeds its capacity ([`DEFAULT_READY_CAPACITY`] by default, see
/// [`set_ready_capacity`](Self::set_ready_capacity)) the oldest unpolled
/// outcome is dropped.
pub struct Navigator {
    in_flight: Vec<(RequestId, Seeker)>,
    ready: HashMap<RequestId, PathOutcome>,
    /// Completion order of parked outcomes; may contain already-polled
    /// ids, which eviction skips.
    ready_order: VecDeque<RequestId>,
    ready_capacity: usize,
    weights: WeightHandlers,
    next_id: u64,
}

impl Navigator {
    /// Create a scheduler with no outstanding requests.
    pub fn new() -> Self {
        Self {
            in_flight: Vec::new(),
            ready: HashMap::new(),
            ready_order: VecDeque::new(),
            ready_capacity: DEFAULT_READY_CAPACITY,
            weights: WeightHandlers::new(),
            next_id: 0,
        }
    }

    /// Bound the parked-outcome store. Clamped to at least 1; excess
    /// outcomes are evicted oldest-first right away.
    pub fn set_ready_capacity(&mut self, capacity: usize) {
        self.ready_capacity = capacity.max(1);
        self.evict_over_capacity();
    }

    /// Register a tag-keyed weight handler applied to every search this
    /// navigator schedules.
    ///
    /// Connections whose tag matches have their traversal cost passed
    /// through the handler; see [`WeightHandlers`] for chaining rules.
    pub fn register_weight_handler(
        &mut self,
        tag: impl Into<String>,
        handler: impl Fn(&Connection, f32) -> f32 + 'static,
    ) {
        self.weights.register(tag, handler);
    }

    /// The weight handlers this navigator searches with.
    pub fn weight_handlers(&self) -> &WeightHandlers {
        &self.weights
    }

    /// Queue a route request from `start` to `goal`, snapped through the
    /// default policy. The search begins on the next [`tick`](Self::tick).
    pub fn request_path(&mut self, registry: &Registry, start: Vec3, goal: Vec3) -> RequestId {
        self.push(Seeker::new(registry, start, goal))
    }

    /// Queue a route request with an explicit snap policy.
    pub fn request_path_with(
        &mut self,
        registry: &Registry,
        start: Vec3,
        goal: Vec3,
        snap: &dyn SnapPolicy,
    ) -> RequestId {
        self.push(Seeker::with_snap(registry, start, goal, snap))
    }

    fn push(&mut self, seeker: Seeker) -> RequestId {
        let id = RequestId(self.next_id);
        self.next_id += 1;
        trace!(
            "{id}: {} -> {}",
            seeker.start_position(),
            seeker.goal_position()
        );
        self.in_flight.push((id, seeker));
        id
    }

    /// Advance every in-flight search by the registry's iteration cap.
    pub fn tick(&mut self, registry: &Registry) {
        let cap = registry.iteration_cap();
        let weights = &self.weights;
        let mut finished: Vec<(RequestId, PathOutcome)> = Vec::new();

        self.in_flight.retain_mut(|(id, seeker)| {
            let goal = seeker.goal_position();
            match seeker.advance_weighted(registry, weights, cap) {
                SeekerStatus::Searching => true,
                SeekerStatus::Found(path) => {
                    debug!("{id}: found route, {} waypoints, cost {}", path.len(), path.cost());
                    finished.push((
                        *id,
                        PathOutcome::Found {
                            goal,
                            path: path.clone(),
                        },
                    ));
                    false
                }
                SeekerStatus::Failed => {
                    debug!("{id}: no route to {goal}");
                    finished.push((*id, PathOutcome::Failed { goal }));
                    false
                }
            }
        });

        for (id, outcome) in finished {
            self.park(id, outcome);
        }
    }

    fn park(&mut self, id: RequestId, outcome: PathOutcome) {
        self.ready.insert(id, outcome);
        self.ready_order.push_back(id);
        self.evict_over_capacity();
    }

    fn evict_over_capacity(&mut self) {
        while self.ready.len() > self.ready_capacity {
            // Ids already polled or cancelled linger in the deque; popping
            // them is a no-op on the map.
            let Some(oldest) = self.ready_order.pop_front() else {
                break;
            };
            if self.ready.remove(&oldest).is_some() {
                debug!("{oldest}: outcome never polled, evicted");
            }
        }
    }

    /// Take the outcome of a finished request, if any.
    ///
    /// Returns `None` while the search is still in flight (or if the id
    /// was never issued / already polled). The outcome is handed over
    /// exactly once.
    pub fn poll(&mut self, id: RequestId) -> Option<PathOutcome> {
        self.ready.remove(&id)
    }

    /// Abandon a request: drops the in-flight seeker or an unclaimed
    /// outcome. Safe to call with an unknown or already-polled id.
    pub fn cancel(&mut self, id: RequestId) {
        self.in_flight.retain(|(other, _)| *other != id);
        self.ready.remove(&id);
    }

    /// Number of searches still in flight.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Whether no search is in flight. Unpolled outcomes may still be
    /// parked.
    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty()
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}
