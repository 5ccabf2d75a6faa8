//! Process records owned by the registry

use core_types::Pid;
use serde::{Deserialize, Serialize};

/// Process state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessState {
    /// Waiting in the ready queue (or freshly created)
    Ready,
    /// Currently holding the CPU
    Running,
    /// Reserved for blocking I/O; no transition produces it
    Waiting,
    /// Remaining time reached zero; terminal
    Completed,
}

impl ProcessState {
    /// Returns true for the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessState::Completed)
    }
}

/// Saved register file of a process
///
/// Carried with the process but never read by the scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub registers: [u32; 4],
}

/// A simulated process
///
/// Invariant: `remaining_time <= burst_time`, and `state == Completed` iff
/// the process was dispatched at least once and has no remaining time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pid: Pid,
    state: ProcessState,
    burst_time: u64,
    remaining_time: u64,
    context: Context,
    dispatch_count: u64,
    completed_at: Option<u64>,
}

impl Process {
    pub(crate) fn new(pid: Pid, burst_time: u64) -> Self {
        Self {
            pid,
            state: ProcessState::Ready,
            burst_time,
            remaining_time: burst_time,
            context: Context::default(),
            dispatch_count: 0,
            completed_at: None,
        }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// Total CPU time requested at creation
    pub fn burst_time(&self) -> u64 {
        self.burst_time
    }

    /// CPU time still owed to the process
    pub fn remaining_time(&self) -> u64 {
        self.remaining_time
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Number of times the process became `Running`
    pub fn dispatch_count(&self) -> u64 {
        self.dispatch_count
    }

    /// Tick during which the last unit of work executed
    pub fn completed_at(&self) -> Option<u64> {
        self.completed_at
    }

    pub fn is_completed(&self) -> bool {
        self.state.is_terminal()
    }

    pub(crate) fn mark_running(&mut self) {
        debug_assert!(!self.is_completed(), "completed process dispatched");
        self.state = ProcessState::Running;
        self.dispatch_count += 1;
    }

    pub(crate) fn mark_ready(&mut self) {
        debug_assert!(self.remaining_time > 0, "finished process requeued");
        self.state = ProcessState::Ready;
    }

    pub(crate) fn mark_completed(&mut self, tick: u64) {
        self.state = ProcessState::Completed;
        self.completed_at = Some(tick);
    }

    /// Consumes one unit of CPU time
    ///
    /// Returns true when this tick finished the process.
    pub(crate) fn run_one_tick(&mut self, tick: u64) -> bool {
        if self.remaining_time == 0 {
            return false;
        }
        self.remaining_time -= 1;
        if self.remaining_time == 0 {
            self.mark_completed(tick);
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(raw: u32) -> Pid {
        Pid::new(raw).unwrap()
    }

    #[test]
    fn test_new_process_is_ready_with_full_budget() {
        let process = Process::new(pid(1), 10);
        assert_eq!(process.state(), ProcessState::Ready);
        assert_eq!(process.burst_time(), 10);
        assert_eq!(process.remaining_time(), 10);
        assert_eq!(process.context(), &Context::default());
        assert_eq!(process.dispatch_count(), 0);
        assert_eq!(process.completed_at(), None);
    }

    #[test]
    fn test_run_one_tick_completes_at_zero() {
        let mut process = Process::new(pid(1), 2);
        process.mark_running();

        assert!(!process.run_one_tick(0));
        assert_eq!(process.remaining_time(), 1);
        assert_eq!(process.state(), ProcessState::Running);

        assert!(process.run_one_tick(1));
        assert_eq!(process.remaining_time(), 0);
        assert_eq!(process.state(), ProcessState::Completed);
        assert_eq!(process.completed_at(), Some(1));
    }

    #[test]
    fn test_run_one_tick_never_underflows() {
        let mut process = Process::new(pid(1), 1);
        process.mark_running();
        assert!(process.run_one_tick(0));
        assert!(!process.run_one_tick(1));
        assert_eq!(process.remaining_time(), 0);
        assert_eq!(process.completed_at(), Some(0));
    }

    #[test]
    fn test_dispatch_count_increments() {
        let mut process = Process::new(pid(3), 8);
        process.mark_running();
        process.mark_ready();
        process.mark_running();
        assert_eq!(process.dispatch_count(), 2);
    }

    #[test]
    fn test_waiting_is_not_terminal() {
        assert!(!ProcessState::Waiting.is_terminal());
        assert!(ProcessState::Completed.is_terminal());
    }
}
