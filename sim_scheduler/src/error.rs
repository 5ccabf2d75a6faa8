//! Scheduler error types

use core_types::Pid;
use thiserror::Error;

/// Errors surfaced by the scheduling core
///
/// None of these are fatal: the scheduler keeps operating correctly after
/// any of them, with the offending request simply not applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// Enqueue attempted against a full ready queue
    #[error("Ready queue full: cannot admit {pid} (capacity {capacity})")]
    QueueCapacityExceeded { pid: Pid, capacity: usize },

    /// Negative burst time supplied at creation
    #[error("Invalid burst time for process {pid}: {burst_time}")]
    InvalidBurstTime { pid: i64, burst_time: i64 },

    /// Process id is zero, negative or out of range
    #[error("Invalid process id: {0}")]
    InvalidPid(i64),

    /// Process id already used in this registry
    #[error("Process {0} already exists")]
    DuplicatePid(Pid),

    /// Handle is already waiting in the ready queue
    #[error("Process {0} is already queued")]
    AlreadyQueued(Pid),

    /// Configuration rejected at construction
    #[error("Invalid scheduler configuration: {0}")]
    InvalidConfig(String),
}
