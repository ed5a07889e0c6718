use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::models::execution::ExecutionResult;

/// Bounded, most-recent-first list of terminal execution results. Appended
/// on every terminal transition; records are read-only thereafter.
#[derive(Clone)]
pub struct HistoryStore {
    inner: Arc<Mutex<VecDeque<ExecutionResult>>>,
    limit: usize,
}

impl HistoryStore {
    pub fn new(limit: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(limit))),
            limit: limit.max(1),
        }
    }

    pub fn push(&self, result: ExecutionResult) {
        let mut history = self.inner.lock().expect("history lock poisoned");
        history.push_front(result);
        history.truncate(self.limit);
    }

    pub fn list(&self) -> Vec<ExecutionResult> {
        self.inner
            .lock()
            .expect("history lock poisoned")
            .iter()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("history lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
