//! Round-Robin Scheduler
//!
//! This module decides, tick by tick, which process holds the CPU.
//!
//! ## Philosophy
//!
//! - **Determinism first**: Same workload + same ticks => same schedule.
//! - **No hidden yields**: Preemption happens only at the top of a tick and
//!   is recorded in the audit log.
//! - **Dispatch, then execute**: a process dispatched during a tick always
//!   runs for that tick.
//!
//! ## Per-tick order
//!
//! 1. Preemption check: no current process, quantum used up, or the current
//!    process has no remaining time.
//! 2. Requeue: a preempted process with work left goes to the tail.
//!    A finished one is only dropped from "current".
//! 3. Dispatch: the head of the ready queue becomes current.
//! 4. Execute: the current process consumes one unit of time.

use crate::config::SchedulerConfig;
use crate::error::SchedulerError;
use crate::process::Process;
use crate::ready_queue::ReadyQueue;
use crate::registry::ProcessRegistry;
use core_types::Pid;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Scheduling event for the decision trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleEvent {
    /// Process was given the CPU
    Dispatched { pid: Pid, tick: u64 },
    /// Process was taken off the CPU with work left
    Preempted {
        pid: Pid,
        reason: PreemptionReason,
        tick: u64,
    },
    /// Process ran out of remaining time
    Completed { pid: Pid, tick: u64 },
}

/// Reason for preemption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreemptionReason {
    /// Time quantum expired
    QuantumExpired,
}

/// What the preemption/dispatch phase of a tick did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Advance {
    /// Process moved back to the ready queue
    pub preempted: Option<Pid>,
    /// Completed process dropped from the CPU
    pub retired: Option<Pid>,
    /// Processes with no work that completed as soon as they were dispatched
    pub finished_on_dispatch: Vec<Pid>,
    /// Process that now holds the CPU, if it changed this tick
    pub dispatched: Option<Pid>,
}

/// What the execute phase of a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Execution {
    pub pid: Pid,
    /// True when this tick consumed the last unit of work
    pub completed: bool,
}

/// Preemptive round-robin scheduler
///
/// Owns the process registry and the ready queue of one simulation. Nothing
/// here is shared with other scheduler instances.
#[derive(Debug, Clone)]
pub struct Scheduler {
    config: SchedulerConfig,
    registry: ProcessRegistry,
    ready_queue: ReadyQueue,
    current: Option<Pid>,
    time_in_slice: u64,
    audit_log: Vec<ScheduleEvent>,
}

impl Scheduler {
    /// Creates a new scheduler with default configuration
    pub fn new() -> Self {
        Self::build(SchedulerConfig::default())
    }

    /// Creates a new scheduler with custom configuration
    pub fn with_config(config: SchedulerConfig) -> Result<Self, SchedulerError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: SchedulerConfig) -> Self {
        Self {
            ready_queue: ReadyQueue::new(config.queue_capacity),
            config,
            registry: ProcessRegistry::new(),
            current: None,
            time_in_slice: 0,
            audit_log: Vec::new(),
        }
    }

    /// Creates a process and puts it at the tail of the ready queue
    pub fn create_process(&mut self, pid: i64, burst_time: i64) -> Result<Pid, SchedulerError> {
        match self
            .registry
            .create(&mut self.ready_queue, pid, burst_time)
        {
            Ok(pid) => {
                debug!(%pid, burst_time, "process created");
                Ok(pid)
            }
            Err(err) => {
                warn!(pid, burst_time, error = %err, "process rejected");
                Err(err)
            }
        }
    }

    /// Returns true if the next `advance` will pick a new process
    pub fn needs_dispatch(&self) -> bool {
        match self.current_process() {
            None => true,
            Some(process) => {
                self.time_in_slice >= self.config.quantum_ticks || process.remaining_time() == 0
            }
        }
    }

    /// Runs the preemption check, requeue and dispatch steps for `tick`
    pub fn advance(&mut self, tick: u64) -> Advance {
        let mut outcome = Advance::default();
        if !self.needs_dispatch() {
            return outcome;
        }

        let mut next = match self.current.take() {
            Some(pid) => match self.registry.get_mut(pid) {
                Some(process) if process.remaining_time() > 0 => {
                    process.mark_ready();
                    self.audit_log.push(ScheduleEvent::Preempted {
                        pid,
                        reason: PreemptionReason::QuantumExpired,
                        tick,
                    });
                    debug!(%pid, tick, "quantum expired");
                    outcome.preempted = Some(pid);
                    Some(self.ready_queue.rotate(pid))
                }
                _ => {
                    trace!(%pid, tick, "finished process leaves the cpu");
                    outcome.retired = Some(pid);
                    self.ready_queue.dequeue()
                }
            },
            None => self.ready_queue.dequeue(),
        };

        while let Some(pid) = next {
            let Some(process) = self.registry.get_mut(pid) else {
                next = self.ready_queue.dequeue();
                continue;
            };

            process.mark_running();
            self.time_in_slice = 0;
            self.audit_log.push(ScheduleEvent::Dispatched { pid, tick });
            debug!(%pid, tick, remaining = process.remaining_time(), "dispatched");

            if process.remaining_time() == 0 {
                // Nothing to execute: completes without consuming the tick.
                process.mark_completed(tick);
                self.audit_log.push(ScheduleEvent::Completed { pid, tick });
                debug!(%pid, tick, "completed on dispatch");
                outcome.finished_on_dispatch.push(pid);
                next = self.ready_queue.dequeue();
                continue;
            }

            self.current = Some(pid);
            outcome.dispatched = Some(pid);
            break;
        }

        outcome
    }

    /// Runs the execute step for `tick`
    ///
    /// Returns `None` when the CPU is idle.
    pub fn execute_tick(&mut self, tick: u64) -> Option<Execution> {
        let pid = self.current?;
        let process = self.registry.get_mut(pid)?;
        if process.is_completed() {
            return None;
        }

        let completed = process.run_one_tick(tick);
        self.time_in_slice += 1;
        trace!(%pid, tick, remaining = process.remaining_time(), "executed");

        if completed {
            self.audit_log.push(ScheduleEvent::Completed { pid, tick });
            debug!(%pid, tick, "completed");
        }

        Some(Execution { pid, completed })
    }

    /// Returns true when nothing is left to run
    ///
    /// The ready queue is empty and the CPU is either empty or held by a
    /// process that has just completed.
    pub fn is_idle(&self) -> bool {
        self.ready_queue.is_empty()
            && self
                .current_process()
                .map_or(true, |process| process.is_completed())
    }

    /// Returns the process on the CPU
    ///
    /// A process that completed during the last tick stays current until
    /// the next preemption check drops it.
    pub fn current(&self) -> Option<Pid> {
        self.current
    }

    pub fn current_process(&self) -> Option<&Process> {
        self.current.and_then(|pid| self.registry.get(pid))
    }

    /// Ticks elapsed since the current process was dispatched
    pub fn time_in_slice(&self) -> u64 {
        self.time_in_slice
    }

    pub fn process(&self, pid: Pid) -> Option<&Process> {
        self.registry.get(pid)
    }

    pub fn registry(&self) -> &ProcessRegistry {
        &self.registry
    }

    pub fn ready_queue(&self) -> &ReadyQueue {
        &self.ready_queue
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Returns a reference to the audit log
    pub fn audit_log(&self) -> &[ScheduleEvent] {
        &self.audit_log
    }

    /// Clears the audit log
    pub fn clear_audit_log(&mut self) {
        self.audit_log.clear();
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
