//! FIFO queue of pending work items

use crate::error::Result;
use crate::work::WorkItem;
use std::collections::VecDeque;

/// Ordered pending gates; application order is enqueue order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkQueue {
    items: VecDeque<WorkItem>,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an already validated item
    pub fn push(&mut self, item: WorkItem) {
        self.items.push_back(item);
    }

    /// Validate raw gate-call arguments and append the resulting item
    ///
    /// On error nothing is appended.
    pub fn enqueue_gate(
        &mut self,
        name: &str,
        targets: &[usize],
        controls: &[usize],
        angle: Option<f64>,
        num_qubits: usize,
    ) -> Result<()> {
        let item = WorkItem::new(name, targets, controls, angle, num_qubits)?;
        self.push(item);
        Ok(())
    }

    /// Next item without removing it
    pub fn peek(&self) -> Option<&WorkItem> {
        self.items.front()
    }

    /// Remove and return the next item
    pub fn pop(&mut self) -> Option<WorkItem> {
        self.items.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorkItem> {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl Extend<WorkItem> for WorkQueue {
    fn extend<I: IntoIterator<Item = WorkItem>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}
