// Copyright 2026 Hypermesh Foundation. All rights reserved.
// WebTracking Simulation Suite - Errors

use crate::types::NodeId;

/// Errors surfaced by the tracker engine.
///
/// None of these are fatal to the host. Orchestrator failures never reach the
/// caller as errors; they collapse to an absent result at the session boundary.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("input is blank")]
    EmptyInput,

    #[error("orchestrator unavailable: credential missing")]
    OrchestratorUnavailable,

    #[error("an analysis request is already in flight")]
    AnalysisInFlight,

    #[error("session has been disposed")]
    SessionDisposed,

    #[error("malformed orchestrator response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
