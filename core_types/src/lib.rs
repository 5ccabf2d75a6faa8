//! # Core Types
//!
//! This crate defines the identifiers shared by every crate of the
//! round-robin simulator.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: a process id is a `Pid`, never a bare integer.
//! - **Invalid states are unrepresentable**: a `Pid` is always positive.
//!
//! ## Key Types
//!
//! - [`Pid`]: Identity of a simulated process
//! - [`SimulationId`]: Identity of one isolated simulator instance

pub mod ids;

pub use ids::{Pid, PidError, SimulationId};
