// Copyright 2026 Hypermesh Foundation. All rights reserved.
// WebTracking Simulation Suite - Event Scheduler

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Something that became due. The session handles these strictly in the
/// order `poll` returns them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    StatusTick,
    TrafficTick,
    PulseSpawn,
    BootMessage(usize),
    CredentialNotice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Status,
    Traffic,
    PulseSpawn,
}

impl TimerKind {
    fn event(self) -> Event {
        match self {
            Self::Status => Event::StatusTick,
            Self::Traffic => Event::TrafficTick,
            Self::PulseSpawn => Event::PulseSpawn,
        }
    }
}

#[derive(Debug, Clone)]
struct RepeatingTimer {
    kind: TimerKind,
    period_ms: f64,
    next_due_ms: f64,
}

/// One-shot event waiting to fire.
#[derive(Debug, Clone)]
struct Delayed {
    due_ms: f64,
    seq: u64,
    event: Event,
}

impl PartialEq for Delayed {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Delayed {}

impl PartialOrd for Delayed {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Delayed {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap: earliest deadline first, then insertion order
        other.due_ms.total_cmp(&self.due_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

// ─── Scheduler ───────────────────────────────────────────────────────────────

/// Single-threaded timer queue driven by the host clock.
///
/// Repeating timers fire at most once per `poll`; a timer that has fallen more
/// than one period behind re-anchors at `now` instead of replaying the gap.
/// Suspension freezes the repeating timers only; one-shot events keep their
/// deadlines.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    repeating: Vec<RepeatingTimer>,
    delayed: BinaryHeap<Delayed>,
    seq: u64,
    suspended: bool,
    cancelled: bool,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a repeating timer whose first tick is one period after `now_ms`.
    pub fn every(&mut self, kind: TimerKind, period_ms: f64, now_ms: f64) {
        self.repeating.retain(|t| t.kind != kind);
        self.repeating.push(RepeatingTimer { kind, period_ms, next_due_ms: now_ms + period_ms });
    }

    pub fn once(&mut self, due_ms: f64, event: Event) {
        if self.cancelled {
            return;
        }
        let seq = self.seq;
        self.seq += 1;
        self.delayed.push(Delayed { due_ms, seq, event });
    }

    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    /// Restart repeating timers one full period from `now_ms`.
    pub fn resume(&mut self, now_ms: f64) {
        if !self.suspended {
            return;
        }
        self.suspended = false;
        for timer in self.repeating.iter_mut() {
            timer.next_due_ms = now_ms + timer.period_ms;
        }
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Drop every timer and pending event. Nothing fires afterwards.
    pub fn cancel_all(&mut self) {
        self.cancelled = true;
        self.repeating.clear();
        self.delayed.clear();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn pending_once(&self) -> usize {
        self.delayed.len()
    }

    /// Everything due at or before `now_ms`, in deadline order.
    pub fn poll(&mut self, now_ms: f64) -> Vec<Event> {
        if self.cancelled {
            return Vec::new();
        }
        let mut due: Vec<(f64, Event)> = Vec::new();

        while let Some(top) = self.delayed.peek() {
            if top.due_ms > now_ms {
                break;
            }
            if let Some(d) = self.delayed.pop() {
                due.push((d.due_ms, d.event));
            }
        }

        if !self.suspended {
            for timer in self.repeating.iter_mut() {
                if timer.next_due_ms <= now_ms {
                    due.push((timer.next_due_ms, timer.kind.event()));
                    timer.next_due_ms += timer.period_ms;
                    if timer.next_due_ms <= now_ms {
                        timer.next_due_ms = now_ms + timer.period_ms;
                    }
                }
            }
        }

        // stable: equal deadlines keep one-shots first, then registration order
        due.sort_by(|a, b| a.0.total_cmp(&b.0));
        due.into_iter().map(|(_, e)| e).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeating_fires_each_period() {
        let mut s = Scheduler::new();
        s.every(TimerKind::Status, 100.0, 0.0);
        assert!(s.poll(99.0).is_empty());
        assert_eq!(s.poll(100.0), vec![Event::StatusTick]);
        assert!(s.poll(150.0).is_empty());
        assert_eq!(s.poll(200.0), vec![Event::StatusTick]);
    }

    #[test]
    fn test_no_burst_after_long_gap() {
        let mut s = Scheduler::new();
        s.every(TimerKind::PulseSpawn, 100.0, 0.0);
        assert_eq!(s.poll(1000.0), vec![Event::PulseSpawn]);
        // re-anchored at 1000
        assert!(s.poll(1099.0).is_empty());
        assert_eq!(s.poll(1100.0), vec![Event::PulseSpawn]);
    }

    #[test]
    fn test_events_ordered_by_deadline() {
        let mut s = Scheduler::new();
        s.every(TimerKind::Traffic, 50.0, 0.0);
        s.every(TimerKind::Status, 30.0, 0.0);
        s.once(10.0, Event::BootMessage(0));
        s.once(40.0, Event::CredentialNotice);
        assert_eq!(
            s.poll(50.0),
            vec![Event::BootMessage(0), Event::StatusTick, Event::CredentialNotice, Event::TrafficTick],
        );
    }

    #[test]
    fn test_one_shots_fire_in_insertion_order_on_ties() {
        let mut s = Scheduler::new();
        s.once(0.0, Event::BootMessage(0));
        s.once(0.0, Event::BootMessage(1));
        s.once(0.0, Event::BootMessage(2));
        assert_eq!(
            s.poll(0.0),
            vec![Event::BootMessage(0), Event::BootMessage(1), Event::BootMessage(2)],
        );
        assert!(s.poll(10.0).is_empty());
    }

    #[test]
    fn test_suspend_and_resume_without_backlog() {
        let mut s = Scheduler::new();
        s.every(TimerKind::Status, 100.0, 0.0);
        s.once(500.0, Event::CredentialNotice);
        s.suspend();
        // one-shots still fire while suspended
        assert_eq!(s.poll(600.0), vec![Event::CredentialNotice]);
        assert!(s.poll(5000.0).is_empty());
        s.resume(5000.0);
        assert!(s.poll(5099.0).is_empty());
        assert_eq!(s.poll(5100.0), vec![Event::StatusTick]);
    }

    #[test]
    fn test_cancel_all_stops_everything() {
        let mut s = Scheduler::new();
        s.every(TimerKind::Status, 10.0, 0.0);
        s.once(5.0, Event::BootMessage(0));
        s.cancel_all();
        assert!(s.poll(1000.0).is_empty());
        s.once(1.0, Event::BootMessage(1));
        assert_eq!(s.pending_once(), 0);
        assert!(s.is_cancelled());
    }
}
