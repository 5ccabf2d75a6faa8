//! # Simulation Runtime
//!
//! The host loop around a [`TickDriver`]: loads the workload, advances
//! ticks, hands every snapshot to the presenter and paces live runs.

use crate::workload::{Workload, WorkloadError};
use serde::Serialize;
use sim_scheduler::{
    Pid, Presenter, Process, ScheduleEvent, SchedulerConfig, SchedulerError, SimulationId,
    TickDriver, TickReport,
};
use std::fmt;
use std::io;
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};
use trace_renderer::PresenterKind;

/// Runtime error types
#[derive(Debug, Error)]
pub enum SimRuntimeError {
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    #[error("Workload error: {0}")]
    Workload(#[from] WorkloadError),

    #[error("Output error: {0}")]
    Io(#[from] io::Error),
}

/// How the runtime drives the clock
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunMode {
    /// Paced by `tick_delay`, runs for `max_ticks` whether or not work remains
    #[default]
    Live,
    /// Unpaced, stops as soon as the workload is drained
    Drain,
}

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct SimRuntimeConfig {
    pub mode: RunMode,
    pub scheduler: SchedulerConfig,
    pub presenter: PresenterKind,
    /// Wall-clock pause after each tick (live mode only)
    pub tick_delay: Duration,
    /// Maximum ticks to run (0 = unlimited)
    pub max_ticks: u64,
    /// Workload text; the demo workload is used when absent
    pub workload: Option<String>,
}

impl Default for SimRuntimeConfig {
    fn default() -> Self {
        Self {
            mode: RunMode::Live,
            scheduler: SchedulerConfig::default(),
            presenter: PresenterKind::Plain,
            tick_delay: Duration::from_secs(1),
            max_ticks: 100,
            workload: None,
        }
    }
}

/// A workload entry the scheduler refused to admit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedProcess {
    pub pid: i64,
    pub burst_time: i64,
    pub reason: String,
}

/// Per-process outcome of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessSummary {
    pub pid: Pid,
    pub burst_time: u64,
    pub remaining_time: u64,
    pub dispatch_count: u64,
    /// Tick during which the process finished
    pub completed_at: Option<u64>,
    /// Ticks elapsed from time 0 until the process finished
    pub turnaround: Option<u64>,
    /// Turnaround minus the CPU time actually used
    pub waiting_time: Option<u64>,
}

impl ProcessSummary {
    fn from_process(process: &Process) -> Self {
        // A zero-burst process finishes at dispatch, before its tick runs.
        let turnaround = process.completed_at().map(|tick| {
            if process.burst_time() == 0 {
                tick
            } else {
                tick + 1
            }
        });

        Self {
            pid: process.pid(),
            burst_time: process.burst_time(),
            remaining_time: process.remaining_time(),
            dispatch_count: process.dispatch_count(),
            completed_at: process.completed_at(),
            turnaround,
            waiting_time: turnaround.map(|total| total.saturating_sub(process.burst_time())),
        }
    }
}

/// Outcome of a whole run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub simulation_id: SimulationId,
    pub ticks: u64,
    pub executed_ticks: u64,
    pub idle_ticks: u64,
    pub dispatches: u64,
    pub preemptions: u64,
    pub drained: bool,
    pub processes: Vec<ProcessSummary>,
    pub rejected: Vec<RejectedProcess>,
}

impl RunSummary {
    pub fn collect(driver: &TickDriver, rejected: &[RejectedProcess]) -> Self {
        let scheduler = driver.scheduler();
        let processes: Vec<ProcessSummary> = scheduler
            .registry()
            .iter()
            .map(ProcessSummary::from_process)
            .collect();

        Self {
            simulation_id: driver.simulation_id(),
            ticks: driver.elapsed_ticks(),
            executed_ticks: driver.executed_ticks(),
            idle_ticks: driver.idle_ticks(),
            dispatches: processes.iter().map(|p| p.dispatch_count).sum(),
            preemptions: scheduler
                .audit_log()
                .iter()
                .filter(|event| matches!(event, ScheduleEvent::Preempted { .. }))
                .count() as u64,
            drained: driver.is_drained(),
            processes,
            rejected: rejected.to_vec(),
        }
    }

    /// Mean waiting time over completed processes
    pub fn average_waiting_time(&self) -> Option<f64> {
        let waits: Vec<u64> = self
            .processes
            .iter()
            .filter_map(|process| process.waiting_time)
            .collect();
        if waits.is_empty() {
            return None;
        }
        Some(waits.iter().sum::<u64>() as f64 / waits.len() as f64)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Simulation finished after {} ticks ({} executed, {} idle)",
            self.ticks, self.executed_ticks, self.idle_ticks
        )?;
        writeln!(
            f,
            "Dispatches: {}, preemptions: {}, drained: {}",
            self.dispatches,
            self.preemptions,
            if self.drained { "yes" } else { "no" }
        )?;

        for process in &self.processes {
            match (process.completed_at, process.waiting_time) {
                (Some(tick), Some(wait)) => writeln!(
                    f,
                    "  {}: burst {}, completed at tick {}, dispatched {}x, waited {}",
                    process.pid, process.burst_time, tick, process.dispatch_count, wait
                )?,
                _ => writeln!(
                    f,
                    "  {}: burst {}, {} remaining, dispatched {}x",
                    process.pid,
                    process.burst_time,
                    process.remaining_time,
                    process.dispatch_count
                )?,
            }
        }

        for rejected in &self.rejected {
            writeln!(
                f,
                "  rejected pid {} (burst {}): {}",
                rejected.pid, rejected.burst_time, rejected.reason
            )?;
        }

        if let Some(average) = self.average_waiting_time() {
            writeln!(f, "Average waiting time: {:.2}", average)?;
        }

        Ok(())
    }
}

/// Simulation runtime
pub struct SimRuntime<P: Presenter = Box<dyn Presenter>> {
    config: SimRuntimeConfig,
    driver: TickDriver,
    presenter: P,
    rejected: Vec<RejectedProcess>,
}

impl<P: Presenter> SimRuntime<P> {
    /// Creates a runtime from the configured workload text (or the demo)
    pub fn new(config: SimRuntimeConfig, presenter: P) -> Result<Self, SimRuntimeError> {
        let workload = match &config.workload {
            Some(text) => Workload::from_text(text)?,
            None => Workload::demo(),
        };
        Self::with_workload(config, &workload, presenter)
    }

    /// Creates a runtime and admits every process in `workload`
    ///
    /// Entries the scheduler rejects are logged and recorded; the rest of
    /// the workload still runs.
    pub fn with_workload(
        config: SimRuntimeConfig,
        workload: &Workload,
        presenter: P,
    ) -> Result<Self, SimRuntimeError> {
        let mut driver = TickDriver::new(config.scheduler)?;
        let mut rejected = Vec::new();

        for entry in workload.entries() {
            if let Err(error) = driver.create_process(entry.pid, entry.burst_time) {
                warn!(
                    pid = entry.pid,
                    burst_time = entry.burst_time,
                    %error,
                    "workload entry skipped"
                );
                rejected.push(RejectedProcess {
                    pid: entry.pid,
                    burst_time: entry.burst_time,
                    reason: error.to_string(),
                });
            }
        }

        Ok(Self {
            config,
            driver,
            presenter,
            rejected,
        })
    }

    /// Advances one tick and presents the resulting snapshot
    pub fn step(&mut self) -> Result<TickReport, SimRuntimeError> {
        let report = self.driver.advance_one_tick();
        self.presenter.present(&self.driver.snapshot())?;
        Ok(report)
    }

    /// Runs the loop until the mode's stop condition
    ///
    /// Live mode stops after `max_ticks` (never when 0). Drain mode stops
    /// once the workload is drained, or at `max_ticks` if that comes first.
    pub fn run(&mut self) -> Result<RunSummary, SimRuntimeError> {
        info!(
            sim = %self.driver.simulation_id(),
            mode = ?self.config.mode,
            quantum = self.config.scheduler.quantum_ticks,
            processes = self.driver.scheduler().registry().len(),
            rejected = self.rejected.len(),
            "simulation started"
        );

        loop {
            if self.config.max_ticks > 0 && self.driver.elapsed_ticks() >= self.config.max_ticks {
                break;
            }

            if self.config.mode == RunMode::Drain && self.driver.is_drained() {
                break;
            }

            self.step()?;

            if self.config.mode == RunMode::Live && !self.config.tick_delay.is_zero() {
                thread::sleep(self.config.tick_delay);
            }
        }

        self.presenter.finish()?;

        let summary = self.summary();
        info!(
            ticks = summary.ticks,
            executed = summary.executed_ticks,
            idle = summary.idle_ticks,
            dispatches = summary.dispatches,
            preemptions = summary.preemptions,
            drained = summary.drained,
            "simulation finished"
        );
        Ok(summary)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary::collect(&self.driver, &self.rejected)
    }

    pub fn driver(&self) -> &TickDriver {
        &self.driver
    }

    pub fn rejected(&self) -> &[RejectedProcess] {
        &self.rejected
    }

    pub fn config(&self) -> &SimRuntimeConfig {
        &self.config
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn into_presenter(self) -> P {
        self.presenter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sim_scheduler::RecordingPresenter;

    fn drain_config() -> SimRuntimeConfig {
        SimRuntimeConfig {
            mode: RunMode::Drain,
            tick_delay: Duration::ZERO,
            max_ticks: 0,
            ..SimRuntimeConfig::default()
        }
    }

    fn pid(raw: u32) -> Pid {
        Pid::new(raw).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = SimRuntimeConfig::default();
        assert_eq!(config.mode, RunMode::Live);
        assert_eq!(config.scheduler.quantum_ticks, 4);
        assert_eq!(config.scheduler.queue_capacity, 10);
        assert_eq!(config.tick_delay, Duration::from_secs(1));
        assert_eq!(config.max_ticks, 100);
        assert!(config.workload.is_none());
    }

    #[test]
    fn test_drain_demo_workload() {
        let mut runtime = SimRuntime::new(drain_config(), RecordingPresenter::default()).unwrap();
        let summary = runtime.run().unwrap();

        assert_eq!(summary.ticks, 33);
        assert_eq!(summary.executed_ticks, 33);
        assert_eq!(summary.idle_ticks, 0);
        assert_eq!(summary.dispatches, 9);
        assert_eq!(summary.preemptions, 6);
        assert!(summary.drained);

        let completed: Vec<(Pid, Option<u64>, Option<u64>)> = summary
            .processes
            .iter()
            .map(|p| (p.pid, p.completed_at, p.waiting_time))
            .collect();
        assert_eq!(
            completed,
            vec![
                (pid(1), Some(25), Some(16)),
                (pid(2), Some(32), Some(18)),
                (pid(3), Some(23), Some(16)),
            ]
        );
        assert_eq!(summary.average_waiting_time(), Some(50.0 / 3.0));
        assert_eq!(runtime.presenter().frames.len(), 33);
    }

    #[test]
    fn test_live_mode_runs_past_drain_until_max_ticks() {
        let config = SimRuntimeConfig {
            mode: RunMode::Live,
            tick_delay: Duration::ZERO,
            max_ticks: 5,
            workload: Some("1 2\n".to_string()),
            ..SimRuntimeConfig::default()
        };
        let mut runtime = SimRuntime::new(config, RecordingPresenter::default()).unwrap();
        let summary = runtime.run().unwrap();

        assert_eq!(summary.ticks, 5);
        assert_eq!(summary.executed_ticks, 2);
        assert_eq!(summary.idle_ticks, 3);
        assert_eq!(runtime.into_presenter().frames.len(), 5);
    }

    #[test]
    fn test_drain_mode_bounded_by_max_ticks() {
        let config = SimRuntimeConfig {
            max_ticks: 10,
            ..drain_config()
        };
        let mut runtime = SimRuntime::new(config, RecordingPresenter::default()).unwrap();
        let summary = runtime.run().unwrap();

        assert_eq!(summary.ticks, 10);
        assert!(!summary.drained);
        assert!(summary.processes.iter().all(|p| p.completed_at.is_none()));
    }

    #[test]
    fn test_rejected_entries_are_recorded() {
        let config = SimRuntimeConfig {
            workload: Some("1 3\n2 -4\n1 5\n0 2\n".to_string()),
            ..drain_config()
        };
        let mut runtime = SimRuntime::new(config, RecordingPresenter::default()).unwrap();
        assert_eq!(runtime.rejected().len(), 3);
        assert_eq!(runtime.rejected()[0].pid, 2);
        assert!(runtime.rejected()[0].reason.contains("burst"));

        let summary = runtime.run().unwrap();
        assert_eq!(summary.ticks, 3);
        assert_eq!(summary.processes.len(), 1);
        assert_eq!(summary.rejected.len(), 3);
    }

    #[test]
    fn test_capacity_overflow_skips_extra_processes() {
        let mut config = drain_config();
        config.scheduler = SchedulerConfig::new(4, 2).unwrap();
        let workload = Workload::from_pairs([(1, 1), (2, 1), (3, 1)]);

        let runtime =
            SimRuntime::with_workload(config, &workload, RecordingPresenter::default()).unwrap();
        assert_eq!(runtime.driver().scheduler().registry().len(), 2);
        assert_eq!(runtime.rejected()[0].pid, 3);
    }

    #[test]
    fn test_invalid_workload_text_fails() {
        let config = SimRuntimeConfig {
            workload: Some("1 ten\n".to_string()),
            ..drain_config()
        };
        let result = SimRuntime::new(config, RecordingPresenter::default());
        assert!(matches!(result, Err(SimRuntimeError::Workload(_))));
    }

    #[test]
    fn test_zero_burst_turnaround() {
        let config = SimRuntimeConfig {
            workload: Some("1 2\n2 0\n".to_string()),
            ..drain_config()
        };
        let mut runtime = SimRuntime::new(config, RecordingPresenter::default()).unwrap();
        let summary = runtime.run().unwrap();

        let zero = &summary.processes[1];
        assert_eq!(zero.dispatch_count, 1);
        assert_eq!(zero.completed_at, Some(2));
        assert_eq!(zero.turnaround, Some(2));
        assert_eq!(zero.waiting_time, Some(2));
    }

    #[test]
    fn test_summary_display() {
        let mut runtime = SimRuntime::new(drain_config(), RecordingPresenter::default()).unwrap();
        let text = runtime.run().unwrap().to_string();

        assert!(text.starts_with("Simulation finished after 33 ticks (33 executed, 0 idle)\n"));
        assert!(text.contains("  P3: burst 8, completed at tick 23, dispatched 2x, waited 16\n"));
        assert!(text.contains("Average waiting time: 16.67"));
    }
}
