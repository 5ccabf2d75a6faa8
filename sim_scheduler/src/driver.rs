//! # Tick Driver
//!
//! Advances simulated time one tick at a time.
//!
//! ## Philosophy
//!
//! **Determinism enables thorough testing.**
//!
//! Simulated time only moves when [`TickDriver::advance_one_tick`] is
//! called. There is no wall clock in here: pacing a live display is the
//! caller's business, and tests can drain a workload as fast as the CPU
//! allows.

use crate::config::SchedulerConfig;
use crate::error::SchedulerError;
use crate::scheduler::Scheduler;
use crate::snapshot::{Presenter, SchedulerSnapshot};
use core_types::{Pid, SimulationId};
use std::io;
use tracing::{debug, info_span, Span};

/// Simulated clock with controllable time progression
///
/// The clock is deterministic and only advances when explicitly told to.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    ticks: u64,
}

impl SimClock {
    /// Creates a new clock starting at tick 0
    pub fn new() -> Self {
        Self { ticks: 0 }
    }

    /// Returns the tick about to be executed
    pub fn now(&self) -> u64 {
        self.ticks
    }

    /// Moves to the next tick and returns the one just finished
    ///
    /// # Panics
    ///
    /// Panics if advancing would overflow u64 (extremely unlikely).
    pub fn tick(&mut self) -> u64 {
        let finished = self.ticks;
        self.ticks = self.ticks.checked_add(1).expect("Clock tick overflow");
        finished
    }
}

/// Everything that happened during one tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub preempted: Option<Pid>,
    pub retired: Option<Pid>,
    pub finished_on_dispatch: Vec<Pid>,
    pub dispatched: Option<Pid>,
    /// Process that consumed this tick, `None` when the CPU idled
    pub executed: Option<Pid>,
    /// Process whose last unit of work ran this tick
    pub completed: Option<Pid>,
}

/// Result of driving a workload towards completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainReport {
    /// Ticks advanced by this call
    pub ticks: u64,
    /// False when the tick limit stopped the run first
    pub drained: bool,
}

/// Owns one simulation: its scheduler, clock and counters
#[derive(Debug)]
pub struct TickDriver {
    id: SimulationId,
    scheduler: Scheduler,
    clock: SimClock,
    last_tick: Option<u64>,
    executed_ticks: u64,
    idle_ticks: u64,
    span: Span,
}

impl TickDriver {
    pub fn new(config: SchedulerConfig) -> Result<Self, SchedulerError> {
        let id = SimulationId::new();
        Ok(Self {
            id,
            scheduler: Scheduler::with_config(config)?,
            clock: SimClock::new(),
            last_tick: None,
            executed_ticks: 0,
            idle_ticks: 0,
            span: info_span!("simulation", sim = %id),
        })
    }

    /// Creates a process and admits it to the ready queue
    pub fn create_process(&mut self, pid: i64, burst_time: i64) -> Result<Pid, SchedulerError> {
        let _guard = self.span.enter();
        self.scheduler.create_process(pid, burst_time)
    }

    /// Advances simulated time by one tick
    ///
    /// Runs the scheduler's preemption/dispatch phase, then its execute
    /// phase, then moves the clock forward.
    pub fn advance_one_tick(&mut self) -> TickReport {
        let _guard = self.span.enter();
        let tick = self.clock.now();

        let advance = self.scheduler.advance(tick);
        let execution = self.scheduler.execute_tick(tick);

        match execution {
            Some(_) => self.executed_ticks += 1,
            None => {
                self.idle_ticks += 1;
                debug!(tick, "cpu idle");
            }
        }

        self.clock.tick();
        self.last_tick = Some(tick);

        TickReport {
            tick,
            preempted: advance.preempted,
            retired: advance.retired,
            finished_on_dispatch: advance.finished_on_dispatch,
            dispatched: advance.dispatched,
            executed: execution.map(|exec| exec.pid),
            completed: execution.filter(|exec| exec.completed).map(|exec| exec.pid),
        }
    }

    /// Returns true when no process is running and the ready queue is empty
    pub fn is_drained(&self) -> bool {
        self.scheduler.is_idle()
    }

    /// Advances until drained or until `limit` ticks have run
    pub fn run_until_drained(&mut self, limit: Option<u64>) -> DrainReport {
        let mut ticks = 0;
        while !self.is_drained() {
            if limit.is_some_and(|limit| ticks >= limit) {
                break;
            }
            self.advance_one_tick();
            ticks += 1;
        }
        DrainReport {
            ticks,
            drained: self.is_drained(),
        }
    }

    /// Advances exactly `ticks` ticks, presenting a snapshot after each
    pub fn run_ticks(&mut self, ticks: u64, presenter: &mut dyn Presenter) -> io::Result<()> {
        for _ in 0..ticks {
            self.advance_one_tick();
            presenter.present(&self.snapshot())?;
        }
        Ok(())
    }

    /// Snapshot of the state left by the most recent tick
    ///
    /// Before the first tick `current_time` is 0 and nothing is running.
    pub fn snapshot(&self) -> SchedulerSnapshot {
        SchedulerSnapshot::capture(&self.scheduler, self.last_tick.unwrap_or(0))
    }

    pub fn simulation_id(&self) -> SimulationId {
        self.id
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Number of ticks advanced so far
    pub fn elapsed_ticks(&self) -> u64 {
        self.clock.now()
    }

    /// Ticks during which some process consumed CPU time
    pub fn executed_ticks(&self) -> u64 {
        self.executed_ticks
    }

    /// Ticks during which the CPU had nothing to run
    pub fn idle_ticks(&self) -> u64 {
        self.idle_ticks
    }
}
