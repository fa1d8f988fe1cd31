use std::collections::BTreeMap;

/// Handle for cancelling a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

/// A task that came due, with the generation it was scheduled under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Due<T> {
    pub id: TaskId,
    pub due_ms: u64,
    pub generation: u64,
    pub task: T,
}

/// Delayed work on a virtual millisecond clock. Tasks due at the same instant
/// come out in the order they were scheduled.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now_ms: u64,
    next_id: u64,
    queue: BTreeMap<(u64, TaskId), (u64, T)>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now_ms: 0,
            next_id: 0,
            queue: BTreeMap::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn schedule(&mut self, delay_ms: u64, generation: u64, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        let due = self.now_ms.saturating_add(delay_ms);
        self.queue.insert((due, id), (generation, task));
        id
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        let key = self.queue.keys().find(|(_, queued)| *queued == id).copied();
        key.and_then(|key| self.queue.remove(&key)).is_some()
    }

    pub fn next_due(&self) -> Option<u64> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    /// Removes the earliest task due at or before `until_ms` and moves the clock to it.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Due<T>> {
        let (&(due_ms, id), _) = self.queue.iter().next()?;
        if due_ms > until_ms {
            return None;
        }
        let (generation, task) = self.queue.remove(&(due_ms, id))?;
        self.now_ms = self.now_ms.max(due_ms);
        Some(Due {
            id,
            due_ms,
            generation,
            task,
        })
    }

    /// Moves the clock forward; never backwards.
    pub fn advance_to(&mut self, ms: u64) {
        self.now_ms = self.now_ms.max(ms);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
