//! Scheduler configuration

use crate::error::SchedulerError;
use serde::{Deserialize, Serialize};

/// Default number of ticks a process may run before preemption
pub const DEFAULT_TIME_QUANTUM: u64 = 4;

/// Default number of slots in the ready queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

/// Scheduler configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Number of ticks a process can run before being preempted
    pub quantum_ticks: u64,
    /// Maximum number of processes waiting in the ready queue
    pub queue_capacity: usize,
}

impl SchedulerConfig {
    /// Creates a validated configuration
    ///
    /// Both the quantum and the capacity must be non-zero.
    pub fn new(quantum_ticks: u64, queue_capacity: usize) -> Result<Self, SchedulerError> {
        let config = Self {
            quantum_ticks,
            queue_capacity,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants `new` enforces
    ///
    /// Useful when the struct was built field by field.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.quantum_ticks == 0 {
            return Err(SchedulerError::InvalidConfig(
                "time quantum must be at least one tick".to_string(),
            ));
        }
        if self.queue_capacity == 0 {
            return Err(SchedulerError::InvalidConfig(
                "ready queue capacity must be at least one slot".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            quantum_ticks: DEFAULT_TIME_QUANTUM,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}
