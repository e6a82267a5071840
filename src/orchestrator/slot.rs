//! Per-action submission slots.
//!
//! Each action kind owns one slot. A slot accepts one in-flight submission
//! at a time; re-entrant submissions are rejected before anything is
//! broadcast. Independent slots interleave freely.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How a submission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalKind {
    Confirmed,
    Reverted,
    Rejected,
    Failed,
}

/// Observable lifecycle of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPhase {
    Idle,
    Validating,
    Estimating,
    AwaitingSignature,
    Pending,
    Terminal(TerminalKind),
}

#[derive(Debug, Clone, Copy)]
struct SlotEntry {
    busy: bool,
    phase: SlotPhase,
    terminal_at: Option<Instant>,
}

impl SlotEntry {
    fn idle() -> Self {
        Self {
            busy: false,
            phase: SlotPhase::Idle,
            terminal_at: None,
        }
    }
}

/// Registry of all action slots.
#[derive(Clone)]
pub struct SlotRegistry {
    slots: Arc<DashMap<&'static str, SlotEntry>>,
    terminal_hold: Duration,
}

impl SlotRegistry {
    /// `terminal_hold` is how long a terminal phase stays observable before
    /// the slot reads as idle again.
    pub fn new(terminal_hold: Duration) -> Self {
        Self {
            slots: Arc::new(DashMap::new()),
            terminal_hold,
        }
    }

    /// Claim a slot for one submission. `None` while a prior submission in
    /// the same slot is still in flight.
    pub fn acquire(&self, slot: &'static str) -> Option<SlotGuard> {
        let mut entry = self.slots.entry(slot).or_insert_with(SlotEntry::idle);
        if entry.busy {
            return None;
        }
        entry.busy = true;
        entry.phase = SlotPhase::Validating;
        entry.terminal_at = None;
        drop(entry);

        Some(SlotGuard {
            slots: self.slots.clone(),
            slot,
            finished: false,
        })
    }

    /// Current phase of a slot. Terminal phases decay to idle after the hold.
    pub fn phase(&self, slot: &'static str) -> SlotPhase {
        match self.slots.get(slot) {
            Some(entry) => match (entry.phase, entry.terminal_at) {
                (SlotPhase::Terminal(_), Some(at)) if at.elapsed() >= self.terminal_hold => {
                    SlotPhase::Idle
                }
                (phase, _) => phase,
            },
            None => SlotPhase::Idle,
        }
    }
}

/// Exclusive claim on a slot for the duration of one submission.
///
/// Dropping the guard without finishing resets the slot to idle, so an
/// aborted pipeline never wedges its slot.
pub struct SlotGuard {
    slots: Arc<DashMap<&'static str, SlotEntry>>,
    slot: &'static str,
    finished: bool,
}

impl SlotGuard {
    /// Record pipeline progress.
    pub fn set_phase(&self, phase: SlotPhase) {
        if let Some(mut entry) = self.slots.get_mut(self.slot) {
            entry.phase = phase;
        }
    }

    /// Record the terminal outcome and release the slot for the next
    /// submission. The terminal phase stays observable for the hold window.
    pub fn finish(&mut self, kind: TerminalKind) {
        if let Some(mut entry) = self.slots.get_mut(self.slot) {
            entry.phase = SlotPhase::Terminal(kind);
            entry.terminal_at = Some(Instant::now());
            entry.busy = false;
        }
        self.finished = true;
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        if !self.finished {
            if let Some(mut entry) = self.slots.get_mut(self.slot) {
                entry.phase = SlotPhase::Idle;
                entry.terminal_at = None;
                entry.busy = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SlotRegistry {
        SlotRegistry::new(Duration::from_millis(50))
    }

    #[test]
    fn test_second_acquire_rejected_while_busy() {
        let slots = registry();

        let guard = slots.acquire("stake").unwrap();
        assert!(slots.acquire("stake").is_none());
        drop(guard);
    }

    #[test]
    fn test_independent_slots_do_not_block() {
        let slots = registry();

        let _stake = slots.acquire("stake").unwrap();
        assert!(slots.acquire("claim").is_some());
    }

    #[test]
    fn test_slot_reusable_after_finish() {
        let slots = registry();

        let mut guard = slots.acquire("stake").unwrap();
        guard.finish(TerminalKind::Confirmed);
        drop(guard);

        assert!(slots.acquire("stake").is_some());
    }

    #[test]
    fn test_drop_without_finish_resets_to_idle() {
        let slots = registry();

        let guard = slots.acquire("migrate").unwrap();
        drop(guard);

        assert_eq!(slots.phase("migrate"), SlotPhase::Idle);
        assert!(slots.acquire("migrate").is_some());
    }

    #[test]
    fn test_terminal_phase_decays_to_idle() {
        let slots = registry();

        let mut guard = slots.acquire("stake").unwrap();
        guard.set_phase(SlotPhase::Pending);
        assert_eq!(slots.phase("stake"), SlotPhase::Pending);

        guard.finish(TerminalKind::Reverted);
        drop(guard);
        assert_eq!(
            slots.phase("stake"),
            SlotPhase::Terminal(TerminalKind::Reverted)
        );

        std::thread::sleep(Duration::from_millis(60));
        assert_eq!(slots.phase("stake"), SlotPhase::Idle);
    }
}
