// Copyright 2026 Hypermesh Foundation. All rights reserved.
// WebTracking Simulation Suite - Status Simulator

use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::{NodeStatus, NodeType, NodeUpdate, TrafficLoad, TrackingNode};

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Status rule for one tick, computed from a single snapshot.
///
/// HASH nodes flip `secure <-> analyzing` every tick. IP nodes, each with an
/// independent chance of `ip_change_probability`, pick a uniformly random
/// status among `active | idle | analyzing`. Other types are untouched.
pub fn status_tick<R: Rng + ?Sized>(
    nodes: &[TrackingNode],
    ip_change_probability: f64,
    rng: &mut R,
) -> Vec<NodeUpdate> {
    let mut updates = Vec::new();
    for (index, node) in nodes.iter().enumerate() {
        match node.node_type {
            NodeType::Hash => {
                updates.push(NodeUpdate::Status { index, status: node.status.toggled() });
            }
            NodeType::Ip => {
                if rng.gen_bool(ip_change_probability) {
                    if let Some(&status) = NodeStatus::IP_CHOICES.choose(rng) {
                        updates.push(NodeUpdate::Status { index, status });
                    }
                }
            }
            NodeType::Root | NodeType::Relay | NodeType::Server | NodeType::Nft => {}
        }
    }
    updates
}

/// Traffic rule for one tick: every node independently, with chance
/// `change_probability`, gets a uniformly random load.
pub fn traffic_tick<R: Rng + ?Sized>(
    nodes: &[TrackingNode],
    change_probability: f64,
    rng: &mut R,
) -> Vec<NodeUpdate> {
    let mut updates = Vec::new();
    for index in 0..nodes.len() {
        if rng.gen_bool(change_probability) {
            if let Some(&load) = TrafficLoad::ALL.choose(rng) {
                updates.push(NodeUpdate::Traffic { index, load });
            }
        }
    }
    updates
}

// ---------------------------------------------------------------------------
// StatusSimulator
// ---------------------------------------------------------------------------

/// Holds the rule parameters and tick counters. The rng lives in the session
/// so every random draw in a session comes from one seeded stream.
#[derive(Debug, Clone)]
pub struct StatusSimulator {
    ip_change_probability: f64,
    traffic_change_probability: f64,
    pub status_ticks: u64,
    pub traffic_ticks: u64,
}

impl StatusSimulator {
    pub fn new(ip_change_probability: f64, traffic_change_probability: f64) -> Self {
        Self {
            ip_change_probability,
            traffic_change_probability,
            status_ticks: 0,
            traffic_ticks: 0,
        }
    }

    pub fn on_status_tick<R: Rng + ?Sized>(&mut self, nodes: &[TrackingNode], rng: &mut R) -> Vec<NodeUpdate> {
        self.status_ticks += 1;
        status_tick(nodes, self.ip_change_probability, rng)
    }

    pub fn on_traffic_tick<R: Rng + ?Sized>(&mut self, nodes: &[TrackingNode], rng: &mut R) -> Vec<NodeUpdate> {
        self.traffic_ticks += 1;
        traffic_tick(nodes, self.traffic_change_probability, rng)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
