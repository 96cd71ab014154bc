// Copyright 2026 Hypermesh Foundation. All rights reserved.
// WebTracking Simulation Suite - Session Core

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wasm_bindgen::prelude::*;

use crate::config::SessionConfig;
use crate::error::{Result, TrackerError};
use crate::log_feed::{LocalClock, LogFeed, TimeSource, BOOT_MESSAGES, MISSING_CREDENTIAL_MESSAGE};
use crate::orchestrator::{self, AnalysisRequest, AnalysisResult, Orchestrator, DISPATCH_MODELS};
use crate::pulse::PulseEngine;
use crate::registry::NodeRegistry;
use crate::scheduler::{Event, Scheduler, TimerKind};
use crate::selection::{Gesture, SelectionController};
use crate::status::StatusSimulator;
use crate::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Created,
    Running,
    Disposed,
}

// ─── TrackerSession struct ───────────────────────────────────────────────────

/// All state of one dashboard session. The host owns the clock: it calls
/// `init_core` once, `frame_core` on every animation frame and
/// `dispose_core` when the view goes away.
#[wasm_bindgen]
pub struct TrackerSession {
    pub(crate) config: SessionConfig,
    pub(crate) registry: NodeRegistry,
    pub(crate) simulator: StatusSimulator,
    pub(crate) pulses: PulseEngine,
    pub(crate) log: LogFeed,
    pub(crate) selection: SelectionController,
    pub(crate) scheduler: Scheduler,
    pub(crate) rng: ChaCha8Rng,

    pub(crate) phase: Phase,
    pub(crate) active: bool,
    pub(crate) frames: u64,

    // Orchestrator state: readiness is decided at construction and never restored
    pub(crate) orchestrator_ready: bool,
    pub(crate) in_flight: Option<AnalysisRequest>,
    pub(crate) last_result: Option<AnalysisResult>,

    // Due boot/credential events, written one per frame and held while a
    // request is in flight
    pub(crate) scripted: VecDeque<Event>,
}

// ─── Internal Logic (Testable, pure Rust) ────────────────────────────────────

impl TrackerSession {
    pub fn with_config(config: SessionConfig) -> Result<Self> {
        Self::with_clock(config, Box::new(LocalClock))
    }

    pub fn with_clock(config: SessionConfig, clock: Box<dyn TimeSource>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            registry: NodeRegistry::default(),
            simulator: StatusSimulator::new(
                config.ip_status_change_probability,
                config.traffic_change_probability,
            ),
            pulses: PulseEngine::new(config.pulse_step, config.pulse_terminal_x),
            log: LogFeed::new(clock),
            selection: SelectionController::new(),
            scheduler: Scheduler::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            phase: Phase::Created,
            active: false,
            frames: 0,
            orchestrator_ready: config.has_credential(),
            in_flight: None,
            last_result: None,
            scripted: VecDeque::new(),
            config,
        })
    }

    /// Start the session: geolocate IP nodes, queue the boot script and the
    /// credential notice, and arm the simulation timers. Idempotent.
    pub fn init_core(&mut self, now_ms: f64) {
        if self.phase != Phase::Created {
            return;
        }
        let located = self.registry.assign_locations(&mut self.rng);

        for i in 0..BOOT_MESSAGES.len() {
            self.scheduler.once(now_ms + i as f64 * self.config.boot_interval_ms, Event::BootMessage(i));
        }
        if !self.orchestrator_ready {
            self.scheduler.once(now_ms + self.config.credential_notice_delay_ms, Event::CredentialNotice);
        }

        self.scheduler.every(TimerKind::Status, self.config.status_interval_ms, now_ms);
        self.scheduler.every(TimerKind::Traffic, self.config.traffic_interval_ms, now_ms);
        self.scheduler.every(TimerKind::PulseSpawn, self.config.pulse_spawn_interval_ms, now_ms);

        self.phase = Phase::Running;
        self.active = true;
        tracing::info!(
            nodes = self.registry.len(),
            located,
            orchestrator_ready = self.orchestrator_ready,
            "tracker session started"
        );
    }

    /// One host animation frame. The lifecycle gates are checked before any
    /// work: a disposed session does nothing, an inactive one only lets the
    /// one-shot boot events through and does not move pulses.
    ///
    /// At most one scripted log entry is written per frame, so a backlog of
    /// overdue boot messages still appears one at a time.
    pub fn frame_core(&mut self, now_ms: f64) -> FrameSnapshot {
        if self.phase == Phase::Running {
            for event in self.scheduler.poll(now_ms) {
                self.handle_event(event);
            }
            if self.in_flight.is_none() {
                if let Some(event) = self.scripted.pop_front() {
                    self.write_scripted(event);
                }
            }
            if self.active {
                self.pulses.advance();
                self.frames += 1;
            }
        }
        self.snapshot()
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::StatusTick => {
                let updates = self.simulator.on_status_tick(self.registry.current_nodes(), &mut self.rng);
                self.registry.apply(&updates);
            }
            Event::TrafficTick => {
                let updates = self.simulator.on_traffic_tick(self.registry.current_nodes(), &mut self.rng);
                self.registry.apply(&updates);
            }
            Event::PulseSpawn => {
                if let Some(origin) = self.registry.first() {
                    let (x, y) = (origin.x, origin.y);
                    self.pulses.spawn(x, y);
                }
            }
            Event::BootMessage(_) | Event::CredentialNotice => self.scripted.push_back(event),
        }
    }

    fn write_scripted(&mut self, event: Event) {
        match event {
            Event::BootMessage(i) => {
                if let Some(msg) = BOOT_MESSAGES.get(i) {
                    self.log.append(LogLevel::Info, "BOOT", *msg);
                }
            }
            Event::CredentialNotice => {
                self.log.append(LogLevel::Error, "AUTH", MISSING_CREDENTIAL_MESSAGE);
            }
            Event::StatusTick | Event::TrafficTick | Event::PulseSpawn => {}
        }
    }

    /// The single suspension signal for timers and the frame loop. Resuming
    /// re-arms the timers from `now_ms`; missed ticks are not replayed.
    pub fn set_active_core(&mut self, active: bool, now_ms: f64) {
        if self.phase != Phase::Running || self.active == active {
            return;
        }
        self.active = active;
        if active {
            self.scheduler.resume(now_ms);
        } else {
            self.scheduler.suspend();
        }
        tracing::debug!(active, now_ms, "simulation activity changed");
    }

    /// Tear down: cancel every timer, drop pulses and any pending request.
    pub fn dispose_core(&mut self) {
        if self.phase == Phase::Disposed {
            return;
        }
        self.scheduler.cancel_all();
        self.pulses.clear();
        self.scripted.clear();
        self.in_flight = None;
        self.active = false;
        self.phase = Phase::Disposed;
        tracing::info!(frames = self.frames, log_entries = self.log.len(), "tracker session disposed");
    }

    // ─── Selection ───────────────────────────────────────────────────────────

    pub fn select_core(&mut self, id: &str) -> bool {
        self.selection.select(&self.registry, &NodeId::from(id))
    }

    pub fn handle_gesture(&mut self, gesture: &Gesture) {
        self.selection.handle(&self.registry, gesture);
    }

    pub fn clear_selection_core(&mut self) {
        self.selection.clear();
    }

    pub fn selected(&self) -> Option<TrackingNode> {
        self.selection.current(&self.registry)
    }

    // ─── Analysis ────────────────────────────────────────────────────────────

    /// Accept user input for analysis.
    ///
    /// Blank input returns `Ok(None)` without logging. A session whose
    /// orchestrator is unusable refuses without logging or calling out. On
    /// success the INPUT and ORCH entries are written and the request the
    /// host must send is returned.
    pub fn submit_core(&mut self, text: &str) -> Result<Option<AnalysisRequest>> {
        if self.phase == Phase::Disposed {
            return Err(TrackerError::SessionDisposed);
        }
        if text.trim().is_empty() {
            return Ok(None);
        }
        if !self.orchestrator_ready {
            return Err(TrackerError::OrchestratorUnavailable);
        }
        if self.in_flight.is_some() {
            return Err(TrackerError::AnalysisInFlight);
        }

        let preview: String = text.chars().take(self.config.preview_chars).collect();
        self.log.append(LogLevel::Info, "INPUT", format!("Receiving data stream: {preview}..."));

        let dispatch = DISPATCH_MODELS.choose(&mut self.rng).copied().unwrap_or(DISPATCH_MODELS[0]);
        self.log.append(LogLevel::Info, "ORCH", format!("Dispatching to model node: '{dispatch}'"));

        let request = AnalysisRequest::new(text, dispatch);
        self.in_flight = Some(request.clone());
        tracing::info!(dispatch, chars = text.chars().count(), "analysis request dispatched");
        Ok(Some(request))
    }

    /// Feed back the remote response text, or `None` if the call failed.
    /// Returns whether a result was accepted.
    pub fn complete_analysis_core(&mut self, response: Option<&str>) -> bool {
        let result = response.and_then(|text| match orchestrator::parse_response(text) {
            Ok(r) => Some(r),
            Err(e) => {
                tracing::warn!(error = %e, "orchestrator response rejected");
                None
            }
        });
        self.finish_analysis(result)
    }

    fn finish_analysis(&mut self, result: Option<AnalysisResult>) -> bool {
        if self.phase == Phase::Disposed {
            return false;
        }
        if self.in_flight.take().is_none() {
            self.log.append(LogLevel::Warn, "ORCH", "Discarding response with no request in flight.");
            return false;
        }

        let accepted = match result {
            Some(r) => {
                self.log.append(
                    LogLevel::Success,
                    "AI",
                    format!("Analysis complete. Focus: {}, Spectrum: {}", r.focus, r.spectrum),
                );
                self.log.append(
                    LogLevel::Info,
                    "METRIC",
                    format!("Quality: {}% | Quantity: {}%", r.quality, r.quantity),
                );
                self.last_result = Some(r);
                true
            }
            None => {
                self.log.append(LogLevel::Error, "AI", "Analysis failed or returned empty response.");
                false
            }
        };
        accepted
    }

    /// Submit, call `orchestrator` synchronously and complete, as one step.
    pub fn analyze_with<O: Orchestrator + ?Sized>(
        &mut self,
        orchestrator: &mut O,
        text: &str,
    ) -> Result<Option<AnalysisResult>> {
        let Some(request) = self.submit_core(text)? else {
            return Ok(None);
        };
        let result = orchestrator.analyze(&request);
        if self.finish_analysis(result) {
            Ok(self.last_result.clone())
        } else {
            Ok(None)
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase { self.phase }
    pub fn is_active(&self) -> bool { self.active }
    pub fn frame_count(&self) -> u64 { self.frames }
    pub fn is_analyzing(&self) -> bool { self.in_flight.is_some() }

    /// Whether the host should keep calling `frame_core`. An inactive session
    /// still needs frames until its boot script and credential notice are out.
    pub fn wants_frames(&self) -> bool {
        self.phase == Phase::Running
            && (self.active || self.scheduler.pending_once() > 0 || !self.scripted.is_empty())
    }
    pub fn orchestrator_ready(&self) -> bool { self.orchestrator_ready }
    pub fn nodes(&self) -> &[TrackingNode] { self.registry.current_nodes() }
    pub fn active_pulses(&self) -> &[Pulse] { self.pulses.pulses() }
    pub fn log_entries(&self) -> &[LogEntry] { self.log.entries() }
    pub fn last_result(&self) -> Option<&AnalysisResult> { self.last_result.as_ref() }

    pub fn radar_series(&self) -> Option<Vec<SeriesPoint>> {
        self.last_result.as_ref().map(AnalysisResult::radar_series)
    }

    pub fn bar_series(&self) -> Option<Vec<SeriesPoint>> {
        self.last_result.as_ref().map(AnalysisResult::bar_series)
    }

    pub fn status_bar(&self) -> StatusBar {
        StatusBar {
            status: if self.active { "MONITORING" } else { "IDLE" },
            api: if self.orchestrator_ready { "CONNECTED" } else { "DISCONNECTED" },
        }
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            nodes: self.registry.snapshot(),
            pulses: self.pulses.pulses().to_vec(),
            selected: self.selected(),
            log_len: self.log.len(),
            active: self.active,
            analyzing: self.in_flight.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_feed::FixedClock;

    fn session(api_key: Option<&str>) -> TrackerSession {
        let config = SessionConfig {
            api_key: api_key.map(str::to_string),
            seed: 1,
            ..SessionConfig::default()
        };
        TrackerSession::with_clock(config, Box::new(FixedClock("00:00:00".to_string()))).unwrap()
    }

    #[test]
    fn test_nothing_happens_before_init() {
        let mut s = session(Some("k"));
        s.frame_core(10_000.0);
        assert!(s.log_entries().is_empty());
        assert!(s.active_pulses().is_empty());
    }

    #[test]
    fn test_init_is_idempotent() {
        let mut s = session(Some("k"));
        s.init_core(0.0);
        s.init_core(0.0);
        s.frame_core(0.0);
        assert_eq!(s.log_entries().len(), 1);
    }

    #[test]
    fn test_pulse_spawned_at_first_node() {
        let mut s = session(Some("k"));
        s.init_core(0.0);
        s.frame_core(2000.0);
        // spawned then advanced once in the same frame
        assert_eq!(s.active_pulses().len(), 1);
        let p = s.active_pulses()[0];
        assert_eq!((p.x, p.y), (10.5, 89.5));
    }

    #[test]
    fn test_inactive_frame_does_not_move_pulses() {
        let mut s = session(Some("k"));
        s.init_core(0.0);
        s.frame_core(2000.0);
        s.set_active_core(false, 2000.0);
        let before = s.active_pulses().to_vec();
        for i in 1..100 {
            s.frame_core(2000.0 + i as f64 * 100.0);
        }
        assert_eq!(s.active_pulses(), &before[..]);
        assert_eq!(s.status_bar().status, "IDLE");
    }

    #[test]
    fn test_stale_completion_warns() {
        let mut s = session(Some("k"));
        s.init_core(0.0);
        assert!(!s.complete_analysis_core(Some("{}")));
        let last = s.log_entries().last().unwrap();
        assert_eq!(last.level, LogLevel::Warn);
        assert_eq!(last.module, "ORCH");
    }

    #[test]
    fn test_preview_truncates_to_twenty_chars() {
        let mut s = session(Some("k"));
        s.init_core(0.0);
        s.submit_core("abcdefghijklmnopqrstuvwxyz").unwrap();
        let input = &s.log_entries()[0];
        assert_eq!(input.message, "Receiving data stream: abcdefghijklmnopqrst...");
    }

    #[test]
    fn test_second_submit_refused_while_in_flight() {
        let mut s = session(Some("k"));
        s.init_core(0.0);
        assert!(s.submit_core("first").unwrap().is_some());
        let len = s.log_entries().len();
        assert!(matches!(s.submit_core("second"), Err(TrackerError::AnalysisInFlight)));
        assert_eq!(s.log_entries().len(), len);
        assert!(s.snapshot().analyzing);
    }

    #[test]
    fn test_overdue_boot_messages_written_one_per_frame() {
        let mut s = session(Some("k"));
        s.init_core(0.0);
        s.frame_core(0.0);
        s.set_active_core(false, 100.0);
        // host stopped calling frame while paused
        s.set_active_core(true, 5000.0);
        s.frame_core(5000.0);
        assert_eq!(s.log_entries().len(), 2);
        for i in 1..=3 {
            s.frame_core(5000.0 + i as f64 * 16.0);
            assert_eq!(s.log_entries().len(), 2 + i);
        }
        s.frame_core(5100.0);
        assert_eq!(s.log_entries().len(), 5);
    }

    #[test]
    fn test_paused_session_wants_frames_until_boot_is_out() {
        let mut s = session(None);
        assert!(!s.wants_frames());
        s.init_core(0.0);
        s.set_active_core(false, 0.0);
        assert!(s.wants_frames());
        let mut t = 0.0;
        while s.wants_frames() {
            s.frame_core(t);
            t += 100.0;
            assert!(t <= 10_000.0, "paused session never settled");
        }
        // boot script plus the credential notice, each on its own frame
        assert_eq!(s.log_entries().len(), BOOT_MESSAGES.len() + 1);
        s.set_active_core(true, t);
        assert!(s.wants_frames());
        s.dispose_core();
        assert!(!s.wants_frames());
    }

    #[test]
    fn test_dispose_stops_everything() {
        let mut s = session(Some("k"));
        s.init_core(0.0);
        s.frame_core(2000.0);
        s.dispose_core();
        let len = s.log_entries().len();
        let snap = s.frame_core(60_000.0);
        assert!(snap.pulses.is_empty());
        assert_eq!(s.log_entries().len(), len);
        assert!(matches!(s.submit_core("x"), Err(TrackerError::SessionDisposed)));
        s.set_active_core(true, 60_000.0);
        assert!(!s.is_active());
    }
}
