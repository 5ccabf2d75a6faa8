//! # Simulated Round-Robin Scheduler
//!
//! This crate is the scheduling core of the simulator: a process registry,
//! a bounded ready queue, a quantum-based preemptive scheduler, and a tick
//! driver that advances simulated time.
//!
//! ## Philosophy
//!
//! - **Determinism first**: Same workload + same ticks => same trace.
//! - **Explicit state**: every simulation is a [`TickDriver`] value owned by
//!   its caller. There are no globals, so instances never interfere.
//! - **Policy only**: no I/O, no wall clock, no rendering. Snapshots are
//!   handed to a [`Presenter`] supplied from outside.
//!
//! ## Example
//!
//! ```
//! use sim_scheduler::{SchedulerConfig, TickDriver};
//!
//! let mut driver = TickDriver::new(SchedulerConfig::default()).unwrap();
//! driver.create_process(1, 10).unwrap();
//! driver.create_process(2, 15).unwrap();
//! driver.create_process(3, 8).unwrap();
//!
//! let report = driver.run_until_drained(None);
//! assert!(report.drained);
//! assert_eq!(report.ticks, 33);
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod process;
pub mod ready_queue;
pub mod registry;
pub mod scheduler;
pub mod snapshot;

pub use config::{SchedulerConfig, DEFAULT_QUEUE_CAPACITY, DEFAULT_TIME_QUANTUM};
pub use driver::{DrainReport, SimClock, TickDriver, TickReport};
pub use error::SchedulerError;
pub use process::{Context, Process, ProcessState};
pub use ready_queue::ReadyQueue;
pub use registry::ProcessRegistry;
pub use scheduler::{Advance, Execution, PreemptionReason, ScheduleEvent, Scheduler};
pub use snapshot::{Presenter, ProcessView, RecordingPresenter, SchedulerSnapshot};

pub use core_types::{Pid, SimulationId};
