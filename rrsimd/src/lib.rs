//! # Round-Robin Simulator Host
//!
//! This crate provides the host runtime for the round-robin scheduling
//! simulator.
//!
//! ## Philosophy
//!
//! - **Host owns I/O**: the scheduler never prints or sleeps
//! - **Output is snapshot rendering**: one frame per tick
//! - **Deterministic mode is first-class**: drain mode runs without a wall
//!   clock, for tests and batch use
//!
//! ## Responsibilities
//!
//! The host runtime:
//! - Loads a workload (file, interactive prompt or built-in demo)
//! - Runs the tick loop in live or drain mode
//! - Hands every snapshot to the selected presenter
//! - Reports a run summary when the loop ends
//!
//! ## Non-Responsibilities
//!
//! The host does NOT:
//! - Make scheduling decisions
//! - Add processes once the run has started

pub mod logging;
pub mod runtime;
pub mod workload;

pub use logging::{init_tracing, LogConfig, LoggingError};
pub use runtime::{
    ProcessSummary, RejectedProcess, RunMode, RunSummary, SimRuntime, SimRuntimeConfig,
    SimRuntimeError,
};
pub use workload::{Workload, WorkloadEntry, WorkloadError};
