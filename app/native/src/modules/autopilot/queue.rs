//! FIFO of pending cursor actions.

use std::collections::VecDeque;

use crate::modules::planner::CursorAction;

/// Ordered list of actions waiting to be dispatched.
///
/// The queue itself does no locking; it lives inside the scheduler's state
/// and is only touched while that lock is held.
#[derive(Debug, Default)]
pub struct ActionQueue {
    actions: VecDeque<CursorAction>,
}

impl ActionQueue {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Appends actions to the back of the queue.
    pub fn extend(&mut self, actions: impl IntoIterator<Item = CursorAction>) {
        self.actions.extend(actions);
    }

    /// Replaces the whole queue with `actions`.
    pub fn replace(&mut self, actions: Vec<CursorAction>) { self.actions = actions.into(); }

    /// Removes and returns the front action.
    pub fn pop_front(&mut self) -> Option<CursorAction> { self.actions.pop_front() }

    /// Drops every pending action, returning how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.actions.len();
        self.actions.clear();
        removed
    }

    #[must_use]
    pub fn len(&self) -> usize { self.actions.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.actions.is_empty() }

    /// Copies the pending actions in dispatch order.
    #[must_use]
    pub fn pending(&self) -> Vec<CursorAction> { self.actions.iter().cloned().collect() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = ActionQueue::new();
        queue.extend([CursorAction::click_window("A"), CursorAction::idle()]);
        queue.extend([CursorAction::move_to_window("B")]);

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop_front(), Some(CursorAction::click_window("A")));
        assert_eq!(queue.pop_front(), Some(CursorAction::idle()));
        assert_eq!(queue.pop_front(), Some(CursorAction::move_to_window("B")));
        assert_eq!(queue.pop_front(), None);
    }

    #[test]
    fn test_replace_is_wholesale() {
        let mut queue = ActionQueue::new();
        queue.extend([CursorAction::idle(), CursorAction::idle()]);
        queue.replace(vec![CursorAction::click()]);

        assert_eq!(queue.pending(), vec![CursorAction::click()]);

        queue.replace(Vec::new());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_clear_reports_removed() {
        let mut queue = ActionQueue::new();
        queue.extend([CursorAction::idle(), CursorAction::click()]);
        assert_eq!(queue.clear(), 2);
        assert_eq!(queue.clear(), 0);
    }
}
