//! Execution state shared by the dispatch tick, the wander controller and
//! the refill loop.
//!
//! Everything lives behind one lock so that "queue empty" and "nothing
//! executing" are always read together. The exclusive states are handed
//! out as RAII guards:
//!
//! - [`ExecutionGuard`] is held for the whole run of one action; dropping it
//!   clears `executing`.
//! - [`RefillTicket`] is held while a planner request is in flight; dropping
//!   it clears `refill_in_flight`.
//!
//! Every autopilot transition bumps a generation counter. A refill whose
//! ticket carries an older generation is discarded instead of installed.

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::Notify;

use super::queue::ActionQueue;
use crate::modules::planner::CursorAction;

#[derive(Debug, Default)]
struct ExecutionState {
    queue: ActionQueue,
    executing: bool,
    autopilot: bool,
    refill_in_flight: bool,
    generation: u64,
}

/// Result of handing a planner response back to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefillOutcome {
    /// The queue now holds this many actions.
    Installed(usize),
    /// Autopilot was disabled or toggled while the request was in flight.
    Discarded,
}

/// Point-in-time view of the scheduler flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerSnapshot {
    pub autopilot: bool,
    pub executing: bool,
    pub refill_in_flight: bool,
    pub queued: usize,
    pub generation: u64,
}

/// Single owner of the queue and the coordination flags.
#[derive(Debug, Default)]
pub struct Scheduler {
    state: Mutex<ExecutionState>,
    wake: Notify,
}

impl Scheduler {
    /// Creates a scheduler with autopilot disabled and an empty queue.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    // ========================================================================
    // Autopilot
    // ========================================================================

    /// Turns autopilot on or off.
    ///
    /// Returns `true` if the state changed. Disabling keeps the queue; the
    /// pending actions resume when autopilot comes back on.
    pub fn set_autopilot(&self, enabled: bool) -> bool {
        let generation = {
            let mut state = self.state.lock();
            if state.autopilot == enabled {
                return false;
            }
            state.autopilot = enabled;
            state.generation += 1;
            state.generation
        };

        tracing::debug!(enabled, generation, "ghost: autopilot toggled");
        self.wake();
        true
    }

    #[must_use]
    pub fn is_autopilot_enabled(&self) -> bool { self.state.lock().autopilot }

    // ========================================================================
    // Queue
    // ========================================================================

    /// Appends actions behind whatever is already queued.
    pub fn enqueue(&self, actions: impl IntoIterator<Item = CursorAction>) {
        self.state.lock().queue.extend(actions);
        self.wake();
    }

    /// Drops every queued action, returning how many were removed.
    pub fn clear_queue(&self) -> usize { self.state.lock().queue.clear() }

    #[must_use]
    pub fn queue_len(&self) -> usize { self.state.lock().queue.len() }

    /// Copies the queued actions in dispatch order.
    #[must_use]
    pub fn pending(&self) -> Vec<CursorAction> { self.state.lock().queue.pending() }

    // ========================================================================
    // Execution
    // ========================================================================

    #[must_use]
    pub fn is_executing(&self) -> bool { self.state.lock().executing }

    /// Takes the front action if autopilot is on and nothing is executing.
    ///
    /// The returned guard marks the executor busy until it is dropped.
    #[must_use]
    pub fn try_dispatch(&self) -> Option<(CursorAction, ExecutionGuard<'_>)> {
        let mut state = self.state.lock();
        if !state.autopilot || state.executing {
            return None;
        }
        let action = state.queue.pop_front()?;
        state.executing = true;
        drop(state);

        Some((action, ExecutionGuard { scheduler: self }))
    }

    /// Whether idle wandering may start right now.
    #[must_use]
    pub fn may_wander(&self) -> bool {
        let state = self.state.lock();
        state.autopilot && !state.executing && state.queue.is_empty()
    }

    // ========================================================================
    // Refill
    // ========================================================================

    #[must_use]
    pub fn is_refilling(&self) -> bool { self.state.lock().refill_in_flight }

    /// Claims the refill slot if a new plan is needed.
    ///
    /// A plan is needed when autopilot is on, the queue is empty, nothing is
    /// executing and no other refill is in flight.
    #[must_use]
    pub fn begin_refill(&self) -> Option<RefillTicket<'_>> {
        let mut state = self.state.lock();
        if !state.autopilot || state.executing || state.refill_in_flight || !state.queue.is_empty() {
            return None;
        }
        state.refill_in_flight = true;
        let generation = state.generation;
        drop(state);

        Some(RefillTicket { scheduler: self, generation })
    }

    /// Installs a planner response, replacing the queue wholesale.
    ///
    /// The response is discarded if autopilot is off or was toggled since
    /// `ticket` was issued.
    pub fn finish_refill(&self, ticket: RefillTicket<'_>, actions: Vec<CursorAction>) -> RefillOutcome {
        let outcome = {
            let mut state = self.state.lock();
            if state.autopilot && state.generation == ticket.generation {
                let count = actions.len();
                state.queue.replace(actions);
                RefillOutcome::Installed(count)
            } else {
                RefillOutcome::Discarded
            }
        };

        drop(ticket);
        outcome
    }

    // ========================================================================
    // Wake-ups
    // ========================================================================

    /// Wakes the refill loop so it re-evaluates its trigger.
    pub fn wake(&self) { self.wake.notify_one(); }

    /// Resolves after the next call to [`Self::wake`].
    ///
    /// A wake that happened while nobody was waiting is remembered once.
    pub async fn changed(&self) { self.wake.notified().await; }

    /// Copies the current flags.
    #[must_use]
    pub fn snapshot(&self) -> SchedulerSnapshot {
        let state = self.state.lock();
        SchedulerSnapshot {
            autopilot: state.autopilot,
            executing: state.executing,
            refill_in_flight: state.refill_in_flight,
            queued: state.queue.len(),
            generation: state.generation,
        }
    }
}

/// Marks the executor busy for as long as it lives.
#[must_use = "dropping the guard ends the execution slot immediately"]
pub struct ExecutionGuard<'a> {
    scheduler: &'a Scheduler,
}

impl Drop for ExecutionGuard<'_> {
    fn drop(&mut self) {
        self.scheduler.state.lock().executing = false;
        self.scheduler.wake();
    }
}

/// Marks a planner request as in flight for as long as it lives.
#[must_use = "dropping the ticket releases the refill slot"]
pub struct RefillTicket<'a> {
    scheduler: &'a Scheduler,
    generation: u64,
}

impl RefillTicket<'_> {
    /// Autopilot generation this request belongs to.
    #[must_use]
    pub const fn generation(&self) -> u64 { self.generation }
}

impl Drop for RefillTicket<'_> {
    fn drop(&mut self) { self.scheduler.state.lock().refill_in_flight = false; }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn enabled() -> Scheduler {
        let scheduler = Scheduler::new();
        scheduler.set_autopilot(true);
        scheduler
    }

    #[test]
    fn test_dispatch_requires_autopilot() {
        let scheduler = Scheduler::new();
        scheduler.enqueue([CursorAction::idle()]);
        assert!(scheduler.try_dispatch().is_none());

        scheduler.set_autopilot(true);
        assert!(scheduler.try_dispatch().is_some());
    }

    #[test]
    fn test_dispatch_is_exclusive() {
        let scheduler = enabled();
        scheduler.enqueue([CursorAction::click(), CursorAction::idle()]);

        let (first, guard) = scheduler.try_dispatch().unwrap();
        assert_eq!(first, CursorAction::click());
        assert!(scheduler.is_executing());
        assert!(scheduler.try_dispatch().is_none());
        assert_eq!(scheduler.queue_len(), 1);

        drop(guard);
        assert!(!scheduler.is_executing());
        let (second, _guard) = scheduler.try_dispatch().unwrap();
        assert_eq!(second, CursorAction::idle());
    }

    #[test]
    fn test_dispatch_on_empty_queue_does_not_mark_executing() {
        let scheduler = enabled();
        assert!(scheduler.try_dispatch().is_none());
        assert!(!scheduler.is_executing());
    }

    #[test]
    fn test_may_wander() {
        let scheduler = Scheduler::new();
        assert!(!scheduler.may_wander());

        scheduler.set_autopilot(true);
        assert!(scheduler.may_wander());

        scheduler.enqueue([CursorAction::idle()]);
        assert!(!scheduler.may_wander());

        let (_, guard) = scheduler.try_dispatch().unwrap();
        assert!(!scheduler.may_wander());
        drop(guard);
        assert!(scheduler.may_wander());
    }

    #[test]
    fn test_single_refill_in_flight() {
        let scheduler = enabled();
        let ticket = scheduler.begin_refill().unwrap();
        assert!(scheduler.is_refilling());
        assert!(scheduler.begin_refill().is_none());

        drop(ticket);
        assert!(!scheduler.is_refilling());
        assert!(scheduler.begin_refill().is_some());
    }

    #[test]
    fn test_refill_not_needed_with_pending_work() {
        let scheduler = enabled();
        scheduler.enqueue([CursorAction::idle()]);
        assert!(scheduler.begin_refill().is_none());

        let (_, _guard) = scheduler.try_dispatch().unwrap();
        assert!(scheduler.begin_refill().is_none());
    }

    #[test]
    fn test_finish_refill_replaces_queue() {
        let scheduler = enabled();
        let ticket = scheduler.begin_refill().unwrap();
        let outcome = scheduler.finish_refill(ticket, vec![CursorAction::click(), CursorAction::idle()]);

        assert_eq!(outcome, RefillOutcome::Installed(2));
        assert_eq!(scheduler.queue_len(), 2);
        assert!(!scheduler.is_refilling());
    }

    #[test]
    fn test_empty_plan_is_installed() {
        let scheduler = enabled();
        let ticket = scheduler.begin_refill().unwrap();
        assert_eq!(scheduler.finish_refill(ticket, Vec::new()), RefillOutcome::Installed(0));
    }

    #[test]
    fn test_response_after_disable_is_discarded() {
        let scheduler = enabled();
        let ticket = scheduler.begin_refill().unwrap();
        scheduler.set_autopilot(false);

        let outcome = scheduler.finish_refill(ticket, vec![CursorAction::click()]);
        assert_eq!(outcome, RefillOutcome::Discarded);
        assert_eq!(scheduler.queue_len(), 0);
        assert!(!scheduler.is_refilling());
    }

    #[test]
    fn test_response_after_toggle_is_discarded() {
        let scheduler = enabled();
        let ticket = scheduler.begin_refill().unwrap();
        scheduler.set_autopilot(false);
        scheduler.set_autopilot(true);

        let outcome = scheduler.finish_refill(ticket, vec![CursorAction::click()]);
        assert_eq!(outcome, RefillOutcome::Discarded);
        assert_eq!(scheduler.queue_len(), 0);
    }

    #[test]
    fn test_disable_keeps_queue() {
        let scheduler = enabled();
        scheduler.enqueue([CursorAction::idle(), CursorAction::click()]);
        scheduler.set_autopilot(false);
        assert_eq!(scheduler.queue_len(), 2);
        assert!(scheduler.try_dispatch().is_none());
    }

    #[test]
    fn test_set_autopilot_reports_change() {
        let scheduler = Scheduler::new();
        assert!(scheduler.set_autopilot(true));
        assert!(!scheduler.set_autopilot(true));
        assert!(scheduler.set_autopilot(false));
        assert_eq!(scheduler.snapshot().generation, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_guard_drop_wakes_waiter() {
        let scheduler = enabled();
        scheduler.enqueue([CursorAction::idle()]);
        // Consume the wake left behind by `enqueue`.
        scheduler.changed().await;

        let (_, guard) = scheduler.try_dispatch().unwrap();
        drop(guard);
        let woke = tokio::time::timeout(Duration::from_millis(10), scheduler.changed()).await;
        assert!(woke.is_ok());
    }
}
