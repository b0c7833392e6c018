//! Fixed-capacity per-frame task scheduler.
//!
//! Tasks are secondary timed units that run alongside the controller
//! state machines: the experience chain and the intro ball-throw delay.
//! Each live task owns a [`TaskFunc`] (what runs next), a priority and
//! sixteen `i16` scratch slots.
//!
//! # Ordering
//!
//! Each tick, live tasks run once in ascending `(priority, slot)` order.
//! The order is captured before any task runs; a task destroyed by an
//! earlier one in the same tick is skipped, and a task created during
//! the tick first runs on the next one.

use smallvec::SmallVec;
use tandem_core::TaskId;

use crate::error::SchedulerError;

/// Scratch slots per task.
pub const TASK_DATA_LEN: usize = 16;

/// What a task does on its next run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskFunc {
    /// A step of the experience chain.
    Exp(ExpStep),
    /// Wait, then send out the intro battlers.
    IntroBallThrow,
}

/// Steps of the experience task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExpStep {
    /// Decide between the direct and the animated experience path.
    GiveExp,
    /// Start the experience bar and its sound.
    PrepareExpBar,
    /// Wait out the pre-delay, then step the bar.
    ExpBarFill,
    /// Launch the level-up animation.
    LevelUpAnim,
    /// Wait for the level-up animation.
    WaitLevelUpAnim,
    /// Hand the participant to the text wait and destroy the task.
    FinishExp,
}

/// One live task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    /// Next step.
    pub func: TaskFunc,
    /// Lower runs first.
    pub priority: u8,
    /// Scratch slots.
    pub data: [i16; TASK_DATA_LEN],
}

impl Task {
    /// Read a u32 stored low half first across `lo` and `lo + 1`.
    pub fn get_u32(&self, lo: usize) -> u32 {
        (self.data[lo] as u16 as u32) | ((self.data[lo + 1] as u16 as u32) << 16)
    }

    /// Store a u32 low half first across `lo` and `lo + 1`.
    pub fn set_u32(&mut self, lo: usize, value: u32) {
        self.data[lo] = value as u16 as i16;
        self.data[lo + 1] = (value >> 16) as u16 as i16;
    }
}

/// Bounded slot table of tasks.
#[derive(Debug)]
pub struct TaskScheduler {
    slots: Vec<Option<Task>>,
    live: usize,
}

impl TaskScheduler {
    /// Create a scheduler with `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or exceeds what a [`TaskId`] can address.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "TaskScheduler capacity must be at least 1");
        assert!(
            capacity <= u8::MAX as usize + 1,
            "TaskScheduler capacity must fit a u8 task id"
        );
        Self {
            slots: vec![None; capacity],
            live: 0,
        }
    }

    /// Occupy the lowest free slot.
    pub fn create(&mut self, func: TaskFunc, priority: u8) -> Result<TaskId, SchedulerError> {
        let slot = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(SchedulerError::Full {
                capacity: self.slots.len(),
            })?;
        self.slots[slot] = Some(Task {
            func,
            priority,
            data: [0; TASK_DATA_LEN],
        });
        self.live += 1;
        Ok(TaskId(slot as u8))
    }

    /// Free a slot. Destroying a free slot is a no-op.
    pub fn destroy(&mut self, id: TaskId) {
        if let Some(slot) = self.slots.get_mut(id.0 as usize) {
            if slot.take().is_some() {
                self.live -= 1;
            }
        }
    }

    /// The task in `id`, if live.
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.slots.get(id.0 as usize)?.as_ref()
    }

    /// Mutable access to the task in `id`, if live.
    pub fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.slots.get_mut(id.0 as usize)?.as_mut()
    }

    /// Whether `id` holds a live task.
    pub fn is_live(&self, id: TaskId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live tasks.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether no task is live.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Slot count.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Live task ids in run order for this tick.
    pub fn run_order(&self) -> SmallVec<[TaskId; 16]> {
        let mut order: SmallVec<[(u8, u8); 16]> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.as_ref().map(|t| (t.priority, i as u8)))
            .collect();
        order.sort_unstable();
        order.into_iter().map(|(_, slot)| TaskId(slot)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_uses_lowest_free_slot() {
        let mut s = TaskScheduler::new(4);
        let a = s.create(TaskFunc::Exp(ExpStep::GiveExp), 10).unwrap();
        let b = s.create(TaskFunc::Exp(ExpStep::GiveExp), 10).unwrap();
        assert_eq!((a, b), (TaskId(0), TaskId(1)));
        s.destroy(a);
        assert_eq!(s.create(TaskFunc::IntroBallThrow, 5).unwrap(), TaskId(0));
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn full_scheduler_rejects() {
        let mut s = TaskScheduler::new(2);
        s.create(TaskFunc::Exp(ExpStep::GiveExp), 0).unwrap();
        s.create(TaskFunc::Exp(ExpStep::GiveExp), 0).unwrap();
        assert_eq!(
            s.create(TaskFunc::Exp(ExpStep::GiveExp), 0),
            Err(SchedulerError::Full { capacity: 2 })
        );
    }

    #[test]
    fn run_order_is_priority_then_slot() {
        let mut s = TaskScheduler::new(8);
        let exp = s.create(TaskFunc::Exp(ExpStep::GiveExp), 10).unwrap();
        let intro = s.create(TaskFunc::IntroBallThrow, 5).unwrap();
        let exp2 = s.create(TaskFunc::Exp(ExpStep::GiveExp), 10).unwrap();
        assert_eq!(s.run_order().as_slice(), &[intro, exp, exp2]);
    }

    #[test]
    fn destroy_is_idempotent() {
        let mut s = TaskScheduler::new(2);
        let id = s.create(TaskFunc::Exp(ExpStep::FinishExp), 0).unwrap();
        s.destroy(id);
        s.destroy(id);
        s.destroy(TaskId(9));
        assert!(s.is_empty());
        assert!(!s.is_live(id));
    }

    #[test]
    fn u32_split_round_trips() {
        let mut t = Task {
            func: TaskFunc::Exp(ExpStep::GiveExp),
            priority: 0,
            data: [0; TASK_DATA_LEN],
        };
        for v in [0, 1, 0x7FFF, 0x8000, 0xFFFF, 0x1_0000, u32::MAX] {
            t.set_u32(1, v);
            assert_eq!(t.get_u32(1), v);
        }
    }
}
