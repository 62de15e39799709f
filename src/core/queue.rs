//! Cooperative event queue with priority insertion.
//!
//! Events produced while one event is being handled are inserted right
//! after it, ahead of everything that was already waiting. This is what
//! lets pseudostate auto-transitions run before the next external signal.

use serde::Serialize;

/// Ordered sequence of pending signal names, consumed through a cursor.
///
/// # Example
///
/// ```rust
/// use hsm_sim::core::EventQueue;
///
/// let mut queue = EventQueue::new();
/// queue.push("a");
/// queue.push("b");
///
/// assert_eq!(queue.pop().as_deref(), Some("a"));
/// // produced while handling "a": lands before "b"
/// queue.push("x");
/// queue.push("y");
///
/// assert_eq!(queue.pending(), ["x", "y", "b"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EventQueue {
    events: Vec<String>,
    read: usize,
    insert: usize,
    called: Vec<String>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a machine-internal event.
    pub fn push(&mut self, name: impl Into<String>) {
        self.insert_at_cursor(name.into());
    }

    /// Queue an event triggered by a component and record it in the
    /// called-events log.
    pub fn push_called(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.called.push(name.clone());
        self.insert_at_cursor(name);
    }

    fn insert_at_cursor(&mut self, name: String) {
        let at = self.insert.min(self.events.len());
        self.events.insert(at, name);
        self.insert = at + 1;
    }

    /// Take the next unconsumed event.
    pub fn pop(&mut self) -> Option<String> {
        let event = self.events.get(self.read)?.clone();
        self.read += 1;
        self.insert = self.read;
        Some(event)
    }

    /// Drop every event, both cursors and the called-events log.
    pub fn reset(&mut self) {
        self.events.clear();
        self.called.clear();
        self.read = 0;
        self.insert = 0;
    }

    /// Events already handed out by [`pop`](Self::pop), in order.
    pub fn processed(&self) -> &[String] {
        &self.events[..self.read]
    }

    /// Events still waiting, in the order they will be popped.
    pub fn pending(&self) -> &[String] {
        &self.events[self.read..]
    }

    /// Component-triggered events, in emission order.
    pub fn called(&self) -> &[String] {
        &self.called
    }

    pub fn is_empty(&self) -> bool {
        self.read >= self.events.len()
    }

    pub fn len(&self) -> usize {
        self.events.len() - self.read
    }

    /// Split into the processed events and the called-events log.
    pub fn into_logs(mut self) -> (Vec<String>, Vec<String>) {
        self.events.truncate(self.read);
        (self.events, self.called)
    }
}
