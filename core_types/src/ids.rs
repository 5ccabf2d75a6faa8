//! Unique identifiers for simulator entities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use thiserror::Error;
use uuid::Uuid;

/// Error returned when a raw integer is not a valid process id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PidError {
    /// Process ids must be strictly positive
    #[error("process id must be positive, got {0}")]
    NotPositive(i64),

    /// Process ids must fit in 32 bits
    #[error("process id {0} is out of range")]
    OutOfRange(i64),
}

/// Identifier of a simulated process
///
/// Pids are chosen by whoever supplies the workload, not generated by the
/// scheduler. They are positive and immutable once a process exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pid(NonZeroU32);

impl Pid {
    /// Creates a pid, returning `None` for zero
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    /// Returns the raw integer value
    pub fn get(&self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<i64> for Pid {
    type Error = PidError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        if raw <= 0 {
            return Err(PidError::NotPositive(raw));
        }
        let raw = u32::try_from(raw).map_err(|_| PidError::OutOfRange(raw))?;
        Pid::new(raw).ok_or(PidError::NotPositive(0))
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Unique identifier for one simulator instance
///
/// Independent simulations share no state. The id lets log lines from
/// several instances in one process be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimulationId(Uuid);

impl SimulationId {
    /// Creates a new random simulation ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a simulation ID from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SimulationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SimulationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sim({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pid_rejects_zero() {
        assert!(Pid::new(0).is_none());
        assert_eq!(Pid::new(7).map(|pid| pid.get()), Some(7));
    }

    #[test]
    fn test_pid_try_from_signed() {
        assert_eq!(Pid::try_from(3i64).map(|pid| pid.get()), Ok(3));
        assert_eq!(Pid::try_from(0i64), Err(PidError::NotPositive(0)));
        assert_eq!(Pid::try_from(-4i64), Err(PidError::NotPositive(-4)));
        assert_eq!(
            Pid::try_from(i64::from(u32::MAX) + 1),
            Err(PidError::OutOfRange(i64::from(u32::MAX) + 1))
        );
    }

    #[test]
    fn test_pid_ordering_follows_value() {
        let low = Pid::new(1).unwrap();
        let high = Pid::new(2).unwrap();
        assert!(low < high);
    }

    #[test]
    fn test_pid_display() {
        let pid = Pid::new(12).unwrap();
        assert_eq!(format!("{}", pid), "P12");
    }

    #[test]
    fn test_pid_serializes_as_number() {
        let pid = Pid::new(5).unwrap();
        assert_eq!(serde_json::to_string(&pid).unwrap(), "5");
        let back: Pid = serde_json::from_str("5").unwrap();
        assert_eq!(back, pid);
    }

    #[test]
    fn test_simulation_id_creation() {
        let id1 = SimulationId::new();
        let id2 = SimulationId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_simulation_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = SimulationId::from_uuid(uuid);
        assert_eq!(id.as_uuid(), uuid);
    }

    #[test]
    fn test_simulation_id_display() {
        let display = format!("{}", SimulationId::new());
        assert!(display.starts_with("Sim("));
    }
}
