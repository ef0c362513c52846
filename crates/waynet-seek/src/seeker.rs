//! Stateful incremental path search.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use glam::Vec3;
use waynet_graph::{CollisionProbe, LayerMask, Registry, WaypointId};

use crate::path::Path;
use crate::weights::WeightHandlers;

// ---------------------------------------------------------------------------
// Snap policies
// ---------------------------------------------------------------------------

/// Maps a requested world position to the waypoint the search enters the
/// graph at.
///
/// The exact snapping behaviour is deliberately pluggable; pick the policy
/// matching how agents in the hosting scene relate to the graph.
pub trait SnapPolicy {
    /// The waypoint to snap `position` to, or `None` if the graph offers
    /// no candidate (empty, or every waypoint disabled).
    fn snap(&self, registry: &Registry, position: Vec3) -> Option<WaypointId>;
}

/// Nearest enabled waypoint by Euclidean distance; ties go to the earliest
/// registered waypoint.
#[derive(Copy, Clone, Debug, Default)]
pub struct NearestSnap;

impl SnapPolicy for NearestSnap {
    fn snap(&self, registry: &Registry, position: Vec3) -> Option<WaypointId> {
        let mut best: Option<(f32, WaypointId)> = None;
        for (id, waypoint) in registry.iter() {
            if !waypoint.enabled {
                continue;
            }
            let distance = waypoint.position.distance_squared(position);
            // Strictly-less keeps the earliest registered waypoint on ties.
            if best.is_none_or(|(best_distance, _)| distance < best_distance) {
                best = Some((distance, id));
            }
        }
        best.map(|(_, id)| id)
    }
}

/// Nearest enabled waypoint reachable by an unobstructed sphere sweep from
/// the query position.
///
/// Candidates are tried in nearness order (ties by registration order);
/// blocked ones are skipped, so an agent standing behind a wall snaps to a
/// waypoint it can actually walk toward.
pub struct SweepSnap<'a, P> {
    probe: &'a P,
    mask: LayerMask,
    radius: f32,
}

impl<'a, P: CollisionProbe> SweepSnap<'a, P> {
    /// Snap through `probe`, sweeping a sphere of `radius` against the
    /// obstacle layers in `mask`.
    pub fn new(probe: &'a P, mask: LayerMask, radius: f32) -> Self {
        Self {
            probe,
            mask,
            radius,
        }
    }
}

impl<P: CollisionProbe> SnapPolicy for SweepSnap<'_, P> {
    fn snap(&self, registry: &Registry, position: Vec3) -> Option<WaypointId> {
        let mut candidates: Vec<(f32, WaypointId, Vec3)> = registry
            .iter()
            .filter(|(_, w)| w.enabled)
            .map(|(id, w)| (w.position.distance_squared(position), id, w.position))
            .collect();
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        for (_, id, target) in candidates {
            let delta = target - position;
            let distance = delta.length();
            let direction = if distance > f32::EPSILON {
                delta / distance
            } else {
                Vec3::ZERO
            };
            if !self
                .probe
                .is_sweep_blocked(position, self.radius, direction, distance, self.mask)
            {
                return Some(id);
            }
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Search state
// ---------------------------------------------------------------------------

/// Where a seeker is in its `Searching → {Found, Failed}` state machine.
/// Terminal states are sticky; further `advance` calls are no-ops.
#[derive(Clone, Debug, PartialEq)]
pub enum SeekerStatus {
    /// The open set is not exhausted and the goal has not been reached.
    Searching,
    /// The goal waypoint was reached; the route is complete.
    Found(Path),
    /// No route exists from start to goal (or an endpoint failed to snap).
    Failed,
}

impl SeekerStatus {
    /// Whether the search has finished, successfully or not.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SeekerStatus::Searching)
    }

    /// The resulting path, if the search succeeded.
    pub fn path(&self) -> Option<&Path> {
        match self {
            SeekerStatus::Found(path) => Some(path),
            _ => None,
        }
    }
}

struct NodeRecord {
    g: f32,
    parent: Option<WaypointId>,
    /// Cleared when the node is expanded; set again if a cheaper route to
    /// it is discovered later (the heuristic is not guaranteed admissible).
    open: bool,
}

/// Heap entry ordered so the lowest f pops first; ties pop in discovery
/// order, which makes expansion deterministic.
struct OpenEntry {
    f: f32,
    seq: u64,
    id: WaypointId,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest f, then smallest seq.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// Seeker
// ---------------------------------------------------------------------------

/// One in-flight path request.
///
/// Created per request and discarded once it reports; holds the snapped
/// endpoints, the open heap and the per-node search records. The search is
/// driven by repeated [`advance`](Self::advance) calls, each bounded by an
/// expansion budget, so a long search never blocks the frame loop.
///
/// Seekers only read the graph. The requested goal position is retained as
/// [`goal_position`](Self::goal_position) so a requester whose goal moved
/// mid-search can recognise a stale result.
pub struct Seeker {
    start_position: Vec3,
    goal_position: Vec3,
    start: Option<WaypointId>,
    goal: Option<WaypointId>,
    open: BinaryHeap<OpenEntry>,
    nodes: HashMap<WaypointId, NodeRecord>,
    seq: u64,
    seeded: bool,
    status: SeekerStatus,
}

impl Seeker {
    /// Create a request from `start` to `goal`, snapping both through
    /// [`NearestSnap`].
    pub fn new(registry: &Registry, start: Vec3, goal: Vec3) -> Self {
        Self::with_snap(registry, start, goal, &NearestSnap)
    }

    /// Create a request with an explicit snap policy.
    ///
    /// If either endpoint fails to snap the seeker is terminally failed
    /// from the outset and the first `advance` reports it.
    pub fn with_snap(
        registry: &Registry,
        start: Vec3,
        goal: Vec3,
        snap: &dyn SnapPolicy,
    ) -> Self {
        let snapped_start = snap.snap(registry, start);
        let snapped_goal = snap.snap(registry, goal);
        let status = if snapped_start.is_some() && snapped_goal.is_some() {
            SeekerStatus::Searching
        } else {
            SeekerStatus::Failed
        };
        Self {
            start_position: start,
            goal_position: goal,
            start: snapped_start,
            goal: snapped_goal,
            open: BinaryHeap::new(),
            nodes: HashMap::new(),
            seq: 0,
            seeded: false,
            status,
        }
    }

    /// The requested start position.
    #[inline]
    pub fn start_position(&self) -> Vec3 {
        self.start_position
    }

    /// The requested goal position — the staleness discriminator echoed
    /// with every result.
    #[inline]
    pub fn goal_position(&self) -> Vec3 {
        self.goal_position
    }

    /// Current search status without advancing.
    #[inline]
    pub fn status(&self) -> &SeekerStatus {
        &self.status
    }

    /// Run at most `max_expansions` node expansions, then yield.
    ///
    /// The scheduler calls this once per tick with the registry's
    /// iteration cap. How the expansions are split across calls never
    /// changes the resulting path. A terminal status is returned unchanged
    /// on every subsequent call.
    ///
    /// Connections cost exactly their weight; use
    /// [`advance_weighted`](Self::advance_weighted) to bias costs by tag.
    pub fn advance(&mut self, registry: &Registry, max_expansions: usize) -> &SeekerStatus {
        self.advance_weighted(registry, &WeightHandlers::default(), max_expansions)
    }

    /// Like [`advance`](Self::advance), with connection costs passed
    /// through the tag-keyed `weights` handlers.
    ///
    /// The same handlers must be supplied on every call of one search —
    /// swapping them mid-flight changes costs under the open set.
    pub fn advance_weighted(
        &mut self,
        registry: &Registry,
        weights: &WeightHandlers,
        max_expansions: usize,
    ) -> &SeekerStatus {
        if self.status.is_terminal() {
            return &self.status;
        }
        if !self.seeded {
            self.seed(registry);
            if self.status.is_terminal() {
                return &self.status;
            }
        }

        let Some(goal) = self.goal else {
            self.status = SeekerStatus::Failed;
            return &self.status;
        };
        // The goal may be unregistered while the search is in flight.
        let Some(goal_position) = registry.get(goal).map(|w| w.position) else {
            self.status = SeekerStatus::Failed;
            return &self.status;
        };

        let mut expanded = 0;
        while expanded < max_expansions {
            let Some(entry) = self.open.pop() else {
                self.status = SeekerStatus::Failed;
                return &self.status;
            };
            // Entries superseded by a cheaper rediscovery are skipped.
            if !self.nodes.get(&entry.id).is_some_and(|n| n.open) {
                continue;
            }
            if entry.id == goal {
                let path = self.reconstruct(goal);
                self.status = SeekerStatus::Found(path);
                return &self.status;
            }

            expanded += 1;
            let current_g = match self.nodes.get_mut(&entry.id) {
                Some(node) => {
                    node.open = false;
                    node.g
                }
                None => continue,
            };
            // Waypoints can be unregistered or disabled mid-flight; their
            // outgoing edges simply stop being expandable.
            let Some(waypoint) = registry.get(entry.id) else {
                continue;
            };
            if !waypoint.enabled {
                continue;
            }

            for connection in waypoint.connections() {
                if !connection.enabled {
                    continue;
                }
                let to = connection.to();
                let Some(target) = registry.get(to) else {
                    continue;
                };
                if !target.enabled {
                    continue;
                }
                let tentative = current_g + weights.cost(connection);
                if self.nodes.get(&to).is_some_and(|n| tentative >= n.g) {
                    continue;
                }
                let f = tentative + target.position.distance(goal_position);
                self.nodes.insert(
                    to,
                    NodeRecord {
                        g: tentative,
                        parent: Some(entry.id),
                        open: true,
                    },
                );
                self.seq += 1;
                self.open.push(OpenEntry { f, seq: self.seq, id: to });
            }
        }

        &self.status
    }

    /// Seed the open set from the snapped start on the first advance.
    fn seed(&mut self, registry: &Registry) {
        self.seeded = true;
        let (Some(start), Some(goal)) = (self.start, self.goal) else {
            self.status = SeekerStatus::Failed;
            return;
        };
        // Endpoints may have been edited between snapping and the first tick.
        let (Some(start_waypoint), Some(goal_waypoint)) =
            (registry.get(start), registry.get(goal))
        else {
            self.status = SeekerStatus::Failed;
            return;
        };
        if !start_waypoint.enabled || !goal_waypoint.enabled {
            self.status = SeekerStatus::Failed;
            return;
        }
        if start == goal {
            self.status = SeekerStatus::Found(Path::new(vec![start], 0.0));
            return;
        }

        let h = start_waypoint.position.distance(goal_waypoint.position);
        self.nodes.insert(
            start,
            NodeRecord {
                g: 0.0,
                parent: None,
                open: true,
            },
        );
        self.open.push(OpenEntry {
            f: h,
            seq: self.seq,
            id: start,
        });
    }

    /// Walk the parent chain back from the goal and reverse it.
    fn reconstruct(&self, goal: WaypointId) -> Path {
        let mut waypoints = Vec::new();
        let mut cursor = Some(goal);
        while let Some(id) = cursor {
            waypoints.push(id);
            cursor = self.nodes.get(&id).and_then(|n| n.parent);
        }
        waypoints.reverse();
        let cost = self.nodes.get(&goal).map_or(0.0, |n| n.g);
        Path::new(waypoints, cost)
    }
}
