//! Collision probing consumed by the graph builder.
//!
//! The host engine's physics layer is an external collaborator; the builder
//! only needs two yes/no spatial queries, expressed by [`CollisionProbe`].
//! [`SphereField`] is an analytic implementation for headless tools and
//! tests.

use std::ops::{BitAnd, BitOr};

use glam::Vec3;

// ---------------------------------------------------------------------------
// LayerMask
// ---------------------------------------------------------------------------

/// Bitmask selecting which obstacle layers block a probe.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Matches no layer; probes against it never hit.
    pub const NONE: Self = Self(0);
    /// Matches every layer.
    pub const ALL: Self = Self(u32::MAX);

    /// Mask containing only the given layer index (0-31).
    #[inline]
    pub const fn layer(index: u32) -> Self {
        Self(1 << index)
    }

    /// Whether the two masks share at least one layer.
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for LayerMask {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for LayerMask {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

// ---------------------------------------------------------------------------
// CollisionProbe
// ---------------------------------------------------------------------------

/// Abstract collision-query capability.
///
/// Implementations answer conservatively: returning `true` ("blocked")
/// suppresses a candidate radius or connection, it never corrupts the
/// graph.
pub trait CollisionProbe {
    /// Whether a sphere of `radius` at `position` overlaps any obstacle in
    /// the masked layers.
    fn is_region_blocked(&self, position: Vec3, radius: f32, mask: LayerMask) -> bool;

    /// Whether sweeping a sphere of `radius` from `position` along
    /// `direction` for `distance` hits any obstacle in the masked layers.
    ///
    /// `direction` is expected to be normalized; a zero direction degrades
    /// to the region test at `position`.
    fn is_sweep_blocked(
        &self,
        position: Vec3,
        radius: f32,
        direction: Vec3,
        distance: f32,
        mask: LayerMask,
    ) -> bool;
}

/// Probe over empty space; nothing ever blocks.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoObstacles;

impl CollisionProbe for NoObstacles {
    fn is_region_blocked(&self, _position: Vec3, _radius: f32, _mask: LayerMask) -> bool {
        false
    }

    fn is_sweep_blocked(
        &self,
        _position: Vec3,
        _radius: f32,
        _direction: Vec3,
        _distance: f32,
        _mask: LayerMask,
    ) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// SphereField
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug)]
struct Obstacle {
    center: Vec3,
    radius: f32,
    layers: LayerMask,
}

/// Analytic obstacle field made of blocking spheres.
///
/// Region tests are sphere-sphere overlaps; sweep tests compare the
/// obstacle center against the swept segment. Good enough to exercise the
/// builder without a physics engine.
#[derive(Clone, Debug, Default)]
pub struct SphereField {
    obstacles: Vec<Obstacle>,
}

impl SphereField {
    /// Create an empty field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a blocking sphere on the given layers.
    pub fn push(&mut self, center: Vec3, radius: f32, layers: LayerMask) {
        self.obstacles.push(Obstacle {
            center,
            radius,
            layers,
        });
    }

    /// Number of obstacles in the field.
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// Whether the field holds no obstacles.
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

/// Distance from `p` to the segment `a..=b`.
fn segment_distance(a: Vec3, b: Vec3, p: Vec3) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return a.distance(p);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (a + ab * t).distance(p)
}

impl CollisionProbe for SphereField {
    fn is_region_blocked(&self, position: Vec3, radius: f32, mask: LayerMask) -> bool {
        self.obstacles.iter().any(|o| {
            o.layers.intersects(mask) && o.center.distance(position) < o.radius + radius
        })
    }

    fn is_sweep_blocked(
        &self,
        position: Vec3,
        radius: f32,
        direction: Vec3,
        distance: f32,
        mask: LayerMask,
    ) -> bool {
        let end = position + direction * distance;
        self.obstacles.iter().any(|o| {
            o.layers.intersects(mask)
                && segment_distance(position, end, o.center) < o.radius + radius
        })
    }
}
