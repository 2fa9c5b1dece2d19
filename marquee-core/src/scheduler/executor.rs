//! Run queue and task trait

use heapless::Vec;

/// When a task wants to run again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Yield {
    /// Run again on the next pass
    Now,
    /// Run again after the given delay
    After(u32),
    /// Remove the task from the run queue
    Done,
}

/// A cooperatively scheduled task
pub trait Task<S> {
    /// Run one step with exclusive access to the shared state
    fn run(&mut self, shared: &mut S, now_ms: u64) -> Yield;
}

impl<S, F> Task<S> for F
where
    F: FnMut(&mut S, u64) -> Yield,
{
    fn run(&mut self, shared: &mut S, now_ms: u64) -> Yield {
        self(shared, now_ms)
    }
}

/// Scheduler errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerError {
    /// Run queue has no free entry
    Full,
}

struct Entry<'a, S> {
    name: &'static str,
    task: &'a mut dyn Task<S>,
    next_run_ms: u64,
}

/// Round-robin scheduler owning the shared state `S`
///
/// Holds up to `N` tasks. Each pass runs every due task once, in spawn order.
pub struct Scheduler<'a, S, const N: usize> {
    shared: S,
    entries: Vec<Entry<'a, S>, N>,
}

impl<'a, S, const N: usize> Scheduler<'a, S, N> {
    pub fn new(shared: S) -> Self {
        Self {
            shared,
            entries: Vec::new(),
        }
    }

    /// Register a task; it first runs on the next pass
    pub fn spawn(
        &mut self,
        name: &'static str,
        task: &'a mut dyn Task<S>,
    ) -> Result<(), SchedulerError> {
        self.entries
            .push(Entry {
                name,
                task,
                next_run_ms: 0,
            })
            .map_err(|_| SchedulerError::Full)
    }

    /// Run every task due at `now_ms`
    ///
    /// Returns the uptime of the earliest next run, or `None` when no tasks
    /// remain.
    pub fn run_once(&mut self, now_ms: u64) -> Option<u64> {
        let shared = &mut self.shared;
        self.entries.retain_mut(|entry| {
            if entry.next_run_ms > now_ms {
                return true;
            }
            match entry.task.run(shared, now_ms) {
                Yield::Now => {
                    entry.next_run_ms = now_ms;
                    true
                }
                Yield::After(delay_ms) => {
                    entry.next_run_ms = now_ms.saturating_add(delay_ms as u64);
                    true
                }
                Yield::Done => false,
            }
        });
        self.next_wake()
    }

    /// Earliest scheduled run
    pub fn next_wake(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.next_run_ms).min()
    }

    pub fn shared(&self) -> &S {
        &self.shared
    }

    pub fn shared_mut(&mut self) -> &mut S {
        &mut self.shared
    }

    /// Number of registered tasks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }


    /// Bring a task's next run forward to `now_ms`
    ///
    /// Returns `false` when no task has that name. A task already due keeps
    /// its slot.
    pub fn wake(&mut self, name: &str, now_ms: u64) -> bool {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => {
                entry.next_run_ms = entry.next_run_ms.min(now_ms);
                true
            }
            None => false,
        }
    }
}
