// Copyright 2026 Hypermesh Foundation. All rights reserved.
// WebTracking Simulation Suite - Analysis Orchestrator Boundary

//! The remote text-analysis service is an opaque collaborator. This module
//! owns both ends of the contract the engine can see: the request payload it
//! hands to the host, and the parsing of whatever text comes back. Every
//! failure on the way back collapses to "no result".

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::Result;
use crate::types::SeriesPoint;

/// Remote model the request targets.
pub const REMOTE_MODEL: &str = "gemini-2.5-flash";

/// Names of the scripted dispatch targets shown in the log.
pub const DISPATCH_MODELS: [&str; 8] = ["cube", "core", "loop", "wave", "line", "coin", "code", "work"];

// ─── AnalysisResult ──────────────────────────────────────────────────────────

/// Structured score record. Deserialization requires every field, so a
/// response missing any of them is rejected as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub define: f64,
    pub recognize: f64,
    pub sort: f64,
    pub order: f64,
    pub focus: String,
    pub spectrum: String,
    pub quality: f64,
    pub quantity: f64,
    pub analysis: String,
}

impl AnalysisResult {
    /// Radar projection: DEFINE, RECOGNIZE, ORDER, SORT.
    pub fn radar_series(&self) -> Vec<SeriesPoint> {
        [
            ("DEFINE", self.define),
            ("RECOGNIZE", self.recognize),
            ("ORDER", self.order),
            ("SORT", self.sort),
        ]
        .into_iter()
        .map(|(name, value)| SeriesPoint { name: name.to_string(), value: scale(value) })
        .collect()
    }

    /// Bar projection: QUALITY, QUANTITY.
    pub fn bar_series(&self) -> Vec<SeriesPoint> {
        [("QUALITY", self.quality), ("QUANTITY", self.quantity)]
            .into_iter()
            .map(|(name, value)| SeriesPoint { name: name.to_string(), value: scale(value) })
            .collect()
    }
}

fn scale(v: f64) -> f64 {
    if v.is_finite() { v.clamp(0.0, 100.0) } else { 0.0 }
}

/// Parse the model's JSON text. Missing fields, wrong types and non-JSON all
/// surface as `MalformedResponse`.
pub fn parse_response(text: &str) -> Result<AnalysisResult> {
    Ok(serde_json::from_str(text.trim())?)
}

// ─── AnalysisRequest ─────────────────────────────────────────────────────────

/// Everything the host needs to place the remote call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub model: String,
    /// Scripted dispatch target, for display only.
    pub dispatch_node: String,
    pub contents: String,
    pub response_mime_type: String,
    pub response_schema: Value,
}

impl AnalysisRequest {
    pub fn new(input: &str, dispatch_node: &str) -> Self {
        Self {
            model: REMOTE_MODEL.to_string(),
            dispatch_node: dispatch_node.to_string(),
            contents: build_prompt(input),
            response_mime_type: "application/json".to_string(),
            response_schema: response_schema(),
        }
    }
}

pub fn build_prompt(input: &str) -> String {
    format!(
        "Analyze the following system data or query within the context of a high-tech \
         \"WebTracking AI\" system.\n\
         Evaluate it based on abstract cybernetic concepts:\n\
         1. Define vs Recognize (Cognitive Axis)\n\
         2. Sort vs Order (Structural Axis)\n\
         3. Quality vs Quantity (Metric Axis)\n\n\
         Input: \"{input}\""
    )
}

/// Output shape requested from the model.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "define": { "type": "NUMBER", "description": "Score 0-100 for definition clarity" },
            "recognize": { "type": "NUMBER", "description": "Score 0-100 for pattern recognition" },
            "sort": { "type": "NUMBER", "description": "Score 0-100 for categorization capability" },
            "order": { "type": "NUMBER", "description": "Score 0-100 for sequential logic" },
            "focus": { "type": "STRING", "description": "Primary focus area (e.g., QUEST, LEARN, FOCUS)" },
            "spectrum": { "type": "STRING", "description": "Analysis spectrum type" },
            "quality": { "type": "NUMBER", "description": "Quality metric 0-100" },
            "quantity": { "type": "NUMBER", "description": "Quantity/Load metric 0-100" },
            "analysis": { "type": "STRING", "description": "Brief technical summary of the analysis" }
        },
        "required": [
            "define", "recognize", "sort", "order", "focus",
            "spectrum", "quality", "quantity", "analysis"
        ]
    })
}

// ─── Orchestrator trait ──────────────────────────────────────────────────────

/// A synchronous stand-in for the remote service. Implementations must not
/// panic or error: any failure is `None`.
pub trait Orchestrator {
    fn analyze(&mut self, request: &AnalysisRequest) -> Option<AnalysisResult>;
}

/// Answers every request with a canned response text, parsed the same way a
/// live response would be. `None` text models an empty reply.
#[derive(Debug, Clone, Default)]
pub struct ReplayOrchestrator {
    response: Option<String>,
    pub calls: usize,
}

impl ReplayOrchestrator {
    pub fn new(response: Option<String>) -> Self {
        Self { response, calls: 0 }
    }
}

impl Orchestrator for ReplayOrchestrator {
    fn analyze(&mut self, _request: &AnalysisRequest) -> Option<AnalysisResult> {
        self.calls += 1;
        let text = self.response.as_deref()?;
        match parse_response(text) {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::warn!(error = %e, "replayed response rejected");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackerError;

    const SAMPLE: &str = r#"{
        "define": 72, "recognize": 64.5, "sort": 40, "order": 88,
        "focus": "QUEST", "spectrum": "INFRARED",
        "quality": 91, "quantity": 37,
        "analysis": "Domain shows layered redirect tracking."
    }"#;

    #[test]
    fn test_parse_complete_response() {
        let r = parse_response(SAMPLE).unwrap();
        assert_eq!(r.focus, "QUEST");
        assert_eq!(r.recognize, 64.5);
        assert_eq!(r.quality, 91.0);
    }

    #[test]
    fn test_missing_field_rejects_whole_result() {
        let partial = r#"{"define": 1, "recognize": 2, "sort": 3, "order": 4,
            "focus": "F", "spectrum": "S", "quality": 5, "quantity": 6}"#;
        assert!(matches!(parse_response(partial), Err(TrackerError::MalformedResponse(_))));
    }

    #[test]
    fn test_non_json_rejected() {
        assert!(parse_response("I'm sorry, I can't help with that.").is_err());
        assert!(parse_response("").is_err());
    }

    #[test]
    fn test_projections_clamped_and_ordered() {
        let mut r = parse_response(SAMPLE).unwrap();
        r.order = 140.0;
        r.quantity = -3.0;
        let radar = r.radar_series();
        let names: Vec<&str> = radar.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["DEFINE", "RECOGNIZE", "ORDER", "SORT"]);
        assert_eq!(radar[2].value, 100.0);
        let bars = r.bar_series();
        assert_eq!(bars[0].name, "QUALITY");
        assert_eq!(bars[1].value, 0.0);
    }

    #[test]
    fn test_request_payload() {
        let req = AnalysisRequest::new("check this domain", "wave");
        assert_eq!(req.model, REMOTE_MODEL);
        assert!(req.contents.contains("Input: \"check this domain\""));
        let required = req.response_schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 9);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["responseMimeType"], "application/json");
        assert_eq!(json["dispatchNode"], "wave");
    }

    #[test]
    fn test_replay_orchestrator() {
        let req = AnalysisRequest::new("x", "core");
        let mut ok = ReplayOrchestrator::new(Some(SAMPLE.to_string()));
        assert!(ok.analyze(&req).is_some());
        let mut empty = ReplayOrchestrator::new(None);
        assert!(empty.analyze(&req).is_none());
        let mut bad = ReplayOrchestrator::new(Some("{}".to_string()));
        assert!(bad.analyze(&req).is_none());
        assert_eq!(bad.calls, 1);
    }
}
