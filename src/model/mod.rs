// File: ./src/model/mod.rs
pub mod item;
pub mod parser;
pub mod recurrence;
pub mod visibility;

pub use item::{DateType, Habit, HabitFrequency, Task, TaskPriority, weekday_number};
pub use recurrence::{RecurrenceEngine, RecurrenceFrequency, RecurrenceMode, RecurrenceRule};
pub use visibility::{
    DecisionObserver, HabitReason, LogObserver, Scheduler, TaskReason, VisibilityOptions,
    is_habit_visible, is_task_visible,
};
