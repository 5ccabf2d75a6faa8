//! Process registry
//!
//! The registry is the only owner of [`Process`] records. Everything else
//! (ready queue, scheduler, snapshots) refers to processes by [`Pid`].
//! Records are never removed: completed processes stay in the registry
//! until the whole simulation is dropped.

use crate::error::SchedulerError;
use crate::process::Process;
use crate::ready_queue::ReadyQueue;
use core_types::Pid;
use std::collections::HashMap;

/// Arena of processes in creation order
#[derive(Debug, Clone, Default)]
pub struct ProcessRegistry {
    processes: Vec<Process>,
    index: HashMap<Pid, usize>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a process and admits it to the ready queue
    ///
    /// The process starts `Ready` with its full burst outstanding. On any
    /// error nothing is registered and the queue is left unchanged.
    pub fn create(
        &mut self,
        queue: &mut ReadyQueue,
        pid: i64,
        burst_time: i64,
    ) -> Result<Pid, SchedulerError> {
        let checked_pid = Pid::try_from(pid).map_err(|_| SchedulerError::InvalidPid(pid))?;
        let burst = u64::try_from(burst_time)
            .map_err(|_| SchedulerError::InvalidBurstTime { pid, burst_time })?;
        if self.index.contains_key(&checked_pid) {
            return Err(SchedulerError::DuplicatePid(checked_pid));
        }

        queue.enqueue(checked_pid)?;

        self.index.insert(checked_pid, self.processes.len());
        self.processes.push(Process::new(checked_pid, burst));
        Ok(checked_pid)
    }

    pub fn get(&self, pid: Pid) -> Option<&Process> {
        let slot = *self.index.get(&pid)?;
        self.processes.get(slot)
    }

    pub(crate) fn get_mut(&mut self, pid: Pid) -> Option<&mut Process> {
        let slot = *self.index.get(&pid)?;
        self.processes.get_mut(slot)
    }

    /// Iterates processes in creation order
    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.processes.iter()
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Sum of burst times ever admitted
    pub fn total_burst(&self) -> u64 {
        self.processes.iter().map(Process::burst_time).sum()
    }

    /// Sum of remaining time over processes that have not completed
    pub fn outstanding_work(&self) -> u64 {
        self.processes
            .iter()
            .filter(|process| !process.is_completed())
            .map(Process::remaining_time)
            .sum()
    }

    /// Number of processes in the terminal state
    pub fn completed_count(&self) -> usize {
        self.processes
            .iter()
            .filter(|process| process.is_completed())
            .count()
    }
}
