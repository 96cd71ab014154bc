// Copyright 2026 Hypermesh Foundation. All rights reserved.
// WebTracking Simulation Suite - Node Registry

use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::{NodeId, NodeStatus, NodeType, NodeUpdate, OwnershipStatus, TrackingNode};

/// Candidate results of the simulated IP geolocation lookup.
pub const LOCATIONS: [&str; 8] = [
    "Frankfurt, DE",
    "Ashburn, US",
    "Singapore, SG",
    "Tokyo, JP",
    "São Paulo, BR",
    "Reykjavik, IS",
    "Amsterdam, NL",
    "Sydney, AU",
];

/// The fixed tracking graph every session starts from.
pub fn initial_nodes() -> Vec<TrackingNode> {
    let mut nft = TrackingNode::new("n2", 30.0, 70.0, "PRIVATE", NodeType::Nft, NodeStatus::Secure);
    nft.contract_address = Some("0x7a3f9c21e04b8d5f6a1c2e3d4b5a69788f0e1d2c".to_string());
    nft.ownership_status = Some(OwnershipStatus::Owned);

    let mut hash = TrackingNode::new("n3", 50.0, 50.0, "HASH", NodeType::Hash, NodeStatus::Secure);
    hash.value = Some("0x...".to_string());

    vec![
        TrackingNode::new("n1", 10.0, 90.0, "DATA", NodeType::Root, NodeStatus::Active),
        nft,
        hash,
        TrackingNode::new("n4", 70.0, 30.0, "RELAY", NodeType::Relay, NodeStatus::Active),
        TrackingNode::new("n5", 90.0, 10.0, "KEY", NodeType::Server, NodeStatus::Idle),
        TrackingNode::new("n6", 30.0, 30.0, "ORIGIN", NodeType::Ip, NodeStatus::Idle),
    ]
}

/// Display edges by node index: the diagonal chain plus the IP uplink.
pub const EDGES: [(usize, usize); 5] = [(0, 1), (1, 2), (2, 3), (3, 4), (5, 3)];

// ─── NodeRegistry ────────────────────────────────────────────────────────────

/// Sole owner and sole writer of node state.
///
/// The node set is fixed at construction: updates address nodes by index and
/// only touch `status`, `traffic_load` and (once, in `assign_locations`)
/// `location`.
#[derive(Debug, Clone)]
pub struct NodeRegistry {
    nodes: Vec<TrackingNode>,
    locations_assigned: bool,
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new(initial_nodes())
    }
}

impl NodeRegistry {
    pub fn new(nodes: Vec<TrackingNode>) -> Self {
        Self { nodes, locations_assigned: false }
    }

    /// Read-only view for rules and renderers.
    pub fn current_nodes(&self) -> &[TrackingNode] {
        &self.nodes
    }

    pub fn snapshot(&self) -> Vec<TrackingNode> {
        self.nodes.clone()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn first(&self) -> Option<&TrackingNode> {
        self.nodes.first()
    }

    pub fn node(&self, id: &NodeId) -> Option<&TrackingNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Simulated lookup: every IP node without a location gets one drawn
    /// uniformly from [`LOCATIONS`]. Runs at most once per registry.
    pub fn assign_locations<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        if self.locations_assigned {
            return 0;
        }
        self.locations_assigned = true;
        let mut assigned = 0;
        for node in self.nodes.iter_mut() {
            if node.node_type == NodeType::Ip && node.location.is_none() {
                if let Some(loc) = LOCATIONS.choose(rng) {
                    node.location = Some((*loc).to_string());
                    assigned += 1;
                }
            }
        }
        assigned
    }

    /// Apply one tick's updates as a group. Out-of-range indices are skipped.
    pub fn apply(&mut self, updates: &[NodeUpdate]) -> usize {
        let mut applied = 0;
        for update in updates {
            match *update {
                NodeUpdate::Status { index, status } => {
                    if let Some(node) = self.nodes.get_mut(index) {
                        node.status = status;
                        applied += 1;
                    }
                }
                NodeUpdate::Traffic { index, load } => {
                    if let Some(node) = self.nodes.get_mut(index) {
                        node.traffic_load = Some(load);
                        applied += 1;
                    }
                }
            }
        }
        applied
    }
}
