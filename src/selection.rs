// Copyright 2026 Hypermesh Foundation. All rights reserved.
// WebTracking Simulation Suite - Selection

use crate::registry::NodeRegistry;
use crate::types::{NodeId, TrackingNode};

/// One pointer interaction on the graph panel. A gesture lands either on a
/// node or on the background, never both, so selecting a node can't also
/// trigger the clear-all path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    Node(NodeId),
    Background,
}

/// Tracks the focused node by id only. Reads re-resolve against the live
/// registry so the detail panel always shows current attributes.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    focused: Option<NodeId>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Focus `id` if the registry knows it; otherwise leave focus unchanged.
    pub fn select(&mut self, registry: &NodeRegistry, id: &NodeId) -> bool {
        if registry.contains(id) {
            self.focused = Some(id.clone());
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.focused = None;
    }

    pub fn focused_id(&self) -> Option<&NodeId> {
        self.focused.as_ref()
    }

    pub fn current(&self, registry: &NodeRegistry) -> Option<TrackingNode> {
        self.focused.as_ref().and_then(|id| registry.node(id)).cloned()
    }

    pub fn handle(&mut self, registry: &NodeRegistry, gesture: &Gesture) {
        match gesture {
            Gesture::Node(id) => {
                self.select(registry, id);
            }
            Gesture::Background => self.clear(),
        }
    }
}
