//! Read-only views handed to presenters

use crate::scheduler::Scheduler;
use core_types::Pid;
use serde::{Deserialize, Serialize};
use std::io;

/// A process as shown to the outside world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessView {
    pub pid: Pid,
    pub remaining_time: u64,
}

/// Scheduler state after a tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerSnapshot {
    /// Tick whose effects this snapshot shows
    pub current_time: u64,
    /// Process on the CPU (may have just completed with zero remaining)
    pub running: Option<ProcessView>,
    /// Waiting processes in dispatch order
    pub ready_queue: Vec<ProcessView>,
}

impl SchedulerSnapshot {
    pub fn capture(scheduler: &Scheduler, current_time: u64) -> Self {
        let view = |pid: Pid| {
            scheduler.process(pid).map(|process| ProcessView {
                pid,
                remaining_time: process.remaining_time(),
            })
        };

        Self {
            current_time,
            running: scheduler.current().and_then(view),
            ready_queue: scheduler.ready_queue().iter().filter_map(view).collect(),
        }
    }
}

/// Receives one snapshot per tick
///
/// Implementations own all formatting and output. The scheduling core never
/// depends on how (or whether) snapshots are displayed.
pub trait Presenter {
    fn present(&mut self, snapshot: &SchedulerSnapshot) -> io::Result<()>;

    /// Called once after the last snapshot
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<P: Presenter + ?Sized> Presenter for Box<P> {
    fn present(&mut self, snapshot: &SchedulerSnapshot) -> io::Result<()> {
        (**self).present(snapshot)
    }

    fn finish(&mut self) -> io::Result<()> {
        (**self).finish()
    }
}

/// Presenter that keeps every snapshot in memory
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub frames: Vec<SchedulerSnapshot>,
}

impl Presenter for RecordingPresenter {
    fn present(&mut self, snapshot: &SchedulerSnapshot) -> io::Result<()> {
        self.frames.push(snapshot.clone());
        Ok(())
    }
}
