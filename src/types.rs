// Copyright 2026 Hypermesh Foundation. All rights reserved.
// WebTracking Simulation Suite - Type Definitions

use serde::{Deserialize, Serialize};
use std::fmt;

// ─── Node Type ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeType {
    Root,
    Hash,
    Ip,
    Relay,
    Server,
    Nft,
}

// ─── Node Status ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Active,
    Idle,
    Analyzing,
    Secure,
}

impl NodeStatus {
    /// Statuses an IP node may be reassigned to.
    pub const IP_CHOICES: [NodeStatus; 3] = [Self::Active, Self::Idle, Self::Analyzing];

    /// The HASH flip: `secure <-> analyzing`. Anything else starts analyzing.
    pub fn toggled(self) -> Self {
        match self {
            Self::Secure => Self::Analyzing,
            Self::Analyzing => Self::Secure,
            Self::Active | Self::Idle => Self::Analyzing,
        }
    }
}

// ─── Traffic Load ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLoad {
    Low,
    Medium,
    High,
}

impl TrafficLoad {
    pub const ALL: [TrafficLoad; 3] = [Self::Low, Self::Medium, Self::High];
}

// ─── NFT Ownership ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OwnershipStatus {
    Owned,
    Transferable,
    Minting,
}

// ─── NodeId ──────────────────────────────────────────────────────────────────

/// Stable node identifier (`n1`, `n2`, ...). Never reused within a session.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self { NodeId(s.to_string()) }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self { NodeId(s) }
}

// ─── TrackingNode ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingNode {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub status: NodeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_load: Option<TrafficLoad>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ownership_status: Option<OwnershipStatus>,
}

impl TrackingNode {
    pub fn new(id: &str, x: f64, y: f64, label: &str, node_type: NodeType, status: NodeStatus) -> Self {
        Self {
            id: NodeId::from(id),
            x,
            y,
            label: label.to_string(),
            node_type,
            status,
            traffic_load: None,
            location: None,
            value: None,
            contract_address: None,
            ownership_status: None,
        }
    }
}

// ─── NodeUpdate ──────────────────────────────────────────────────────────────

/// One pending write against the registry. Rules produce these from a
/// snapshot; the registry applies a whole tick's worth as one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeUpdate {
    Status { index: usize, status: NodeStatus },
    Traffic { index: usize, load: TrafficLoad },
}

// ─── Pulse ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pulse {
    pub id: u64,
    pub x: f64,
    pub y: f64,
}

// ─── Log Entries ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Success,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Success => "SUCCESS",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub module: String,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {:<7} {:<6} {}", self.timestamp, self.level, self.module, self.message)
    }
}

// ─── Chart Series ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub name: String,
    pub value: f64,
}

// ─── FrameSnapshot ───────────────────────────────────────────────────────────

/// What a host needs to redraw after one frame.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSnapshot {
    pub nodes: Vec<TrackingNode>,
    pub pulses: Vec<Pulse>,
    pub selected: Option<TrackingNode>,
    pub log_len: usize,
    pub active: bool,
    pub analyzing: bool,
}

// ─── StatusBar ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBar {
    pub status: &'static str,
    pub api: &'static str,
}
