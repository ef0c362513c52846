//! Tag-keyed traversal-cost modifiers.

use std::collections::HashMap;
use std::fmt;

use waynet_graph::Connection;

/// Adjusts the traversal cost of one connection during search.
///
/// The handler receives the connection and the cost produced so far
/// (starting from the connection's own weight) and returns the adjusted
/// cost.
pub type WeightHandler = Box<dyn Fn(&Connection, f32) -> f32>;

/// Registry of [`WeightHandler`]s keyed by connection tag.
///
/// Requesters register handlers against the opaque tags carried by
/// connections to bias search cost without editing the graph — make
/// "road" edges cheap for vehicles, "water" edges expensive for
/// pedestrians, and so on. Connections whose tag has no handler cost
/// exactly their weight.
///
/// Handlers for the same tag chain in registration order, each seeing the
/// cost produced by the previous one. Handlers must be pure functions of
/// their arguments: the determinism of repeated searches depends on it.
#[derive(Default)]
pub struct WeightHandlers {
    handlers: HashMap<String, Vec<WeightHandler>>,
}

impl WeightHandlers {
    /// Create an empty handler registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for connections carrying `tag`.
    pub fn register(
        &mut self,
        tag: impl Into<String>,
        handler: impl Fn(&Connection, f32) -> f32 + 'static,
    ) {
        self.handlers
            .entry(tag.into())
            .or_default()
            .push(Box::new(handler));
    }

    /// Number of handlers registered for `tag`.
    pub fn count(&self, tag: &str) -> usize {
        self.handlers.get(tag).map_or(0, Vec::len)
    }

    /// Whether no handler is registered at all.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Effective traversal cost of `connection`: its weight passed through
    /// every handler registered for its tag.
    pub fn cost(&self, connection: &Connection) -> f32 {
        let mut cost = connection.weight;
        if let Some(chain) = self.handlers.get(connection.tag.as_str()) {
            for handler in chain {
                cost = handler(connection, cost);
            }
        }
        cost
    }
}

impl fmt::Debug for WeightHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (tag, chain) in &self.handlers {
            map.entry(tag, &chain.len());
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use waynet_graph::{Registry, Waypoint};

    fn tagged_connection(tag: &str, weight: f32) -> Connection {
        let mut reg = Registry::new();
        let a = reg.register(Waypoint::new(Vec3::ZERO));
        let b = reg.register(Waypoint::new(Vec3::ONE));
        let connection = reg.connect(a, b).unwrap();
        connection.tag = tag.to_string();
        connection.weight = weight;
        connection.clone()
    }

    #[test]
    fn unhandled_tag_costs_the_weight() {
        let handlers = WeightHandlers::new();
        assert!(handlers.is_empty());
        assert_eq!(handlers.cost(&tagged_connection("water", 3.0)), 3.0);
    }

    #[test]
    fn handler_applies_to_matching_tag_only() {
        let mut handlers = WeightHandlers::new();
        handlers.register("water", |_, cost| cost * 10.0);
        assert_eq!(handlers.count("water"), 1);
        assert_eq!(handlers.cost(&tagged_connection("water", 2.0)), 20.0);
        assert_eq!(handlers.cost(&tagged_connection("road", 2.0)), 2.0);
    }

    #[test]
    fn handlers_chain_in_registration_order() {
        let mut handlers = WeightHandlers::new();
        handlers.register("toll", |_, cost| cost + 1.0);
        handlers.register("toll", |_, cost| cost * 2.0);
        // (1 + 1) * 2, not 1 * 2 + 1.
        assert_eq!(handlers.cost(&tagged_connection("toll", 1.0)), 4.0);
    }

    #[test]
    fn handler_sees_the_connection() {
        let mut handlers = WeightHandlers::new();
        handlers.register("narrow", |c, cost| if c.width < 2.0 { cost * 5.0 } else { cost });
        let mut connection = tagged_connection("narrow", 1.0);
        connection.width = 1.0;
        assert_eq!(handlers.cost(&connection), 5.0);
        connection.width = 4.0;
        assert_eq!(handlers.cost(&connection), 1.0);
    }
}
