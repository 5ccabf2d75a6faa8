//! Bounded FIFO of processes waiting for the CPU

use crate::error::SchedulerError;
use core_types::Pid;
use std::collections::{HashSet, VecDeque};

/// Ready queue
///
/// A FIFO of process handles with a fixed capacity. Processes are enqueued
/// at the back and dequeued from the front. Inserts past capacity are
/// rejected and leave the queue untouched.
#[derive(Debug, Clone)]
pub struct ReadyQueue {
    queue: VecDeque<Pid>,
    members: HashSet<Pid>,
    capacity: usize,
}

impl ReadyQueue {
    /// Creates an empty queue with room for `capacity` handles
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
            members: HashSet::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a handle at the tail
    pub fn enqueue(&mut self, pid: Pid) -> Result<(), SchedulerError> {
        if self.is_full() {
            return Err(SchedulerError::QueueCapacityExceeded {
                pid,
                capacity: self.capacity,
            });
        }
        if !self.members.insert(pid) {
            return Err(SchedulerError::AlreadyQueued(pid));
        }
        self.queue.push_back(pid);
        Ok(())
    }

    /// Removes and returns the head, or `None` when empty
    pub fn dequeue(&mut self) -> Option<Pid> {
        let pid = self.queue.pop_front()?;
        self.members.remove(&pid);
        Some(pid)
    }

    /// Swaps a preempted process for the head of the queue
    ///
    /// `pid` goes to the tail and the old head is returned. With an empty
    /// queue `pid` comes straight back. Equivalent to `enqueue` followed by
    /// `dequeue`, except that it cannot overflow: one slot is always freed
    /// before the preempted process is inserted.
    pub fn rotate(&mut self, pid: Pid) -> Pid {
        debug_assert!(!self.members.contains(&pid), "running process found in ready queue");
        match self.dequeue() {
            Some(next) => {
                self.members.insert(pid);
                self.queue.push_back(pid);
                next
            }
            None => pid,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.queue.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.members.contains(&pid)
    }

    /// Iterates handles in dispatch order
    pub fn iter(&self) -> impl Iterator<Item = Pid> + '_ {
        self.queue.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(raw: u32) -> Pid {
        Pid::new(raw).unwrap()
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = ReadyQueue::new(4);
        queue.enqueue(pid(1)).unwrap();
        queue.enqueue(pid(2)).unwrap();
        queue.enqueue(pid(3)).unwrap();

        assert_eq!(queue.dequeue(), Some(pid(1)));
        assert_eq!(queue.dequeue(), Some(pid(2)));
        assert_eq!(queue.dequeue(), Some(pid(3)));
        assert_eq!(queue.dequeue(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_full_queue_rejects_and_is_unchanged() {
        let mut queue = ReadyQueue::new(2);
        queue.enqueue(pid(1)).unwrap();
        queue.enqueue(pid(2)).unwrap();

        let result = queue.enqueue(pid(3));
        assert_eq!(
            result,
            Err(SchedulerError::QueueCapacityExceeded {
                pid: pid(3),
                capacity: 2
            })
        );
        assert_eq!(queue.len(), 2);
        assert!(!queue.contains(pid(3)));
        assert_eq!(queue.iter().collect::<Vec<_>>(), vec![pid(1), pid(2)]);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut queue = ReadyQueue::new(4);
        queue.enqueue(pid(1)).unwrap();
        assert_eq!(queue.enqueue(pid(1)), Err(SchedulerError::AlreadyQueued(pid(1))));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_dequeued_handle_can_return() {
        let mut queue = ReadyQueue::new(1);
        queue.enqueue(pid(1)).unwrap();
        assert_eq!(queue.dequeue(), Some(pid(1)));
        assert!(queue.enqueue(pid(1)).is_ok());
    }

    #[test]
    fn test_wraps_around_capacity_many_times() {
        let mut queue = ReadyQueue::new(3);
        for round in 1..=10u32 {
            queue.enqueue(pid(round)).unwrap();
            if queue.is_full() {
                queue.dequeue();
            }
        }
        assert_eq!(queue.iter().collect::<Vec<_>>(), vec![pid(9), pid(10)]);
    }

    #[test]
    fn test_rotate_moves_preempted_to_tail() {
        let mut queue = ReadyQueue::new(2);
        queue.enqueue(pid(2)).unwrap();
        queue.enqueue(pid(3)).unwrap();

        // Full queue still accepts the preempted process.
        let next = queue.rotate(pid(1));
        assert_eq!(next, pid(2));
        assert_eq!(queue.iter().collect::<Vec<_>>(), vec![pid(3), pid(1)]);
        assert!(!queue.contains(pid(2)));
    }

    #[test]
    fn test_rotate_on_empty_returns_same_process() {
        let mut queue = ReadyQueue::new(2);
        assert_eq!(queue.rotate(pid(5)), pid(5));
        assert!(queue.is_empty());
    }
}
