// Copyright 2026 Hypermesh Foundation. All rights reserved.
// WebTracking Simulation Suite - Pulse Engine

use crate::types::Pulse;

/// Transient packet markers travelling up-right along the hash-flow diagonal.
///
/// Pulses are spawned at an origin, stepped `(+step, -step)` once per frame
/// and evicted as soon as `x` passes `terminal_x`. Eviction is the normal
/// end of a pulse's life.
#[derive(Debug, Clone)]
pub struct PulseEngine {
    pulses: Vec<Pulse>,
    next_id: u64,
    step: f64,
    terminal_x: f64,
    pub spawned: u64,
    pub evicted: u64,
}

impl PulseEngine {
    pub fn new(step: f64, terminal_x: f64) -> Self {
        Self {
            pulses: Vec::new(),
            next_id: 0,
            step,
            terminal_x,
            spawned: 0,
            evicted: 0,
        }
    }

    pub fn pulses(&self) -> &[Pulse] {
        &self.pulses
    }

    pub fn spawn(&mut self, x: f64, y: f64) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.pulses.push(Pulse { id, x, y });
        self.spawned += 1;
        id
    }

    /// One animation frame: move every pulse, then drop those past the end.
    pub fn advance(&mut self) {
        let step = self.step;
        let terminal_x = self.terminal_x;
        let before = self.pulses.len();
        for p in self.pulses.iter_mut() {
            p.x += step;
            p.y -= step;
        }
        self.pulses.retain(|p| p.x <= terminal_x);
        self.evicted += (before - self.pulses.len()) as u64;
    }

    pub fn clear(&mut self) {
        self.pulses.clear();
    }
}

impl Default for PulseEngine {
    fn default() -> Self {
        Self::new(0.5, 90.0)
    }
}
