// Crate root library declaration and module exports.
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod model;
pub mod snapshot;
pub mod store;

pub use error::{ScheduleError, ScheduleResult};
pub use model::{is_habit_visible, is_task_visible};
