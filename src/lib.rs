// Copyright 2026 Hypermesh Foundation. All rights reserved.
// WebTracking Simulation Suite

pub mod types;
pub mod config;
pub mod error;
pub mod registry;
pub mod status;
pub mod pulse;
pub mod log_feed;
pub mod selection;
pub mod scheduler;
pub mod orchestrator;
pub mod session;

pub use types::*;
pub use config::SessionConfig;
pub use error::TrackerError;
pub use orchestrator::{AnalysisRequest, AnalysisResult, Orchestrator, ReplayOrchestrator};
pub use selection::Gesture;
pub use session::TrackerSession;

use serde::Serialize;
use wasm_bindgen::prelude::*;

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChartData {
    radar: Vec<SeriesPoint>,
    bar: Vec<SeriesPoint>,
    focus: String,
    spectrum: String,
    analysis: String,
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

#[wasm_bindgen]
impl TrackerSession {
    /// `config` is a partial `SessionConfig` object with camelCase keys
    /// (`statusIntervalMs`, `seed`, ...) or undefined. The host passes its
    /// credential as `apiKey`; there is no process environment in the browser.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<TrackerSession, JsValue> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let config: SessionConfig = if config.is_undefined() || config.is_null() {
            SessionConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("invalid config: {e}")))?
        };
        TrackerSession::with_config(config).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn init(&mut self, now_ms: f64) {
        self.init_core(now_ms);
    }

    /// Call from `requestAnimationFrame`. Returns the redraw snapshot.
    pub fn frame(&mut self, now_ms: f64) -> JsValue {
        let snapshot = self.frame_core(now_ms);
        to_js(&snapshot)
    }

    /// Whether the host should keep scheduling frames. Stays true while a
    /// paused session still has boot messages to write.
    pub fn is_running(&self) -> bool {
        self.wants_frames()
    }

    pub fn set_active(&mut self, active: bool, now_ms: f64) {
        self.set_active_core(active, now_ms);
    }

    pub fn select(&mut self, node_id: &str) -> bool {
        self.select_core(node_id)
    }

    pub fn clear_selection(&mut self) {
        self.clear_selection_core();
    }

    /// Pointer landed on the panel background.
    pub fn background_click(&mut self) {
        self.handle_gesture(&Gesture::Background);
    }

    /// Returns the request to send, or `null` for blank input. Throws when
    /// the orchestrator is unusable or a request is already in flight.
    pub fn submit(&mut self, text: &str) -> Result<JsValue, JsValue> {
        match self.submit_core(text) {
            Ok(Some(request)) => Ok(to_js(&request)),
            Ok(None) => Ok(JsValue::NULL),
            Err(e) => Err(JsValue::from_str(&e.to_string())),
        }
    }

    /// Hand back the response text, or nothing when the call failed.
    pub fn complete_analysis(&mut self, response: Option<String>) -> bool {
        self.complete_analysis_core(response.as_deref())
    }

    pub fn get_nodes(&self) -> JsValue {
        to_js(self.nodes())
    }

    pub fn get_edges(&self) -> JsValue {
        to_js(&registry::EDGES[..])
    }

    pub fn get_pulses(&self) -> JsValue {
        to_js(self.active_pulses())
    }

    pub fn get_logs(&self) -> JsValue {
        to_js(self.log_entries())
    }

    pub fn get_logs_since(&self, from: usize) -> JsValue {
        to_js(self.log.since(from))
    }

    pub fn get_selected(&self) -> JsValue {
        match self.selected() {
            Some(node) => to_js(&node),
            None => JsValue::NULL,
        }
    }

    pub fn get_chart_data(&self) -> JsValue {
        match self.last_result() {
            Some(r) => to_js(&ChartData {
                radar: r.radar_series(),
                bar: r.bar_series(),
                focus: r.focus.clone(),
                spectrum: r.spectrum.clone(),
                analysis: r.analysis.clone(),
            }),
            None => JsValue::NULL,
        }
    }

    pub fn get_status_bar(&self) -> JsValue {
        to_js(&self.status_bar())
    }

    pub fn analyzing(&self) -> bool {
        self.is_analyzing()
    }

    pub fn api_connected(&self) -> bool {
        self.orchestrator_ready()
    }

    pub fn dispose(&mut self) {
        self.dispose_core();
    }
}
