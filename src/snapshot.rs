// Reads task/habit snapshots exported by the main application.
//
// ⚠️ VERSION BUMP REQUIRED:
// Changes to Task, Habit or RecurrenceRule serialization require
// incrementing SNAPSHOT_VERSION below.
use crate::error::{ScheduleError, ScheduleResult};
use crate::model::{Habit, Task};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// Version history:
// - v1: tasks + habits, DateType for due/dtstart, anchored recurrence rules
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub habits: Vec<Habit>,
}

impl Snapshot {
    pub fn new(tasks: Vec<Task>, habits: Vec<Habit>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            tasks,
            habits,
        }
    }

    pub fn load(path: &Path) -> ScheduleResult<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ScheduleError::SnapshotIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&contents).map_err(|e| match e {
            ScheduleError::SnapshotFormat { source, .. } => ScheduleError::SnapshotFormat {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })
    }

    /// Parses and validates a snapshot document. Rules with out-of-range
    /// weekdays or month days are rejected rather than silently evaluated.
    pub fn from_json(json: &str) -> ScheduleResult<Self> {
        let snapshot: Snapshot =
            serde_json::from_str(json).map_err(|source| ScheduleError::SnapshotFormat {
                path: "<inline>".to_string(),
                source,
            })?;

        if snapshot.version > SNAPSHOT_VERSION {
            return Err(ScheduleError::SnapshotVersion {
                found: snapshot.version,
                supported: SNAPSHOT_VERSION,
            });
        }

        for task in &snapshot.tasks {
            if let Some(rule) = &task.recurrence {
                rule.validate().map_err(|e| match e {
                    ScheduleError::InvalidArgument(msg) => ScheduleError::InvalidArgument(
                        format!("task {} ({}): {}", task.uid, task.title, msg),
                    ),
                    other => other,
                })?;
            }
        }

        log::info!(
            "Loaded snapshot v{} with {} tasks and {} habits",
            snapshot.version,
            snapshot.tasks.len(),
            snapshot.habits.len()
        );
        Ok(snapshot)
    }

    pub fn to_json(&self) -> ScheduleResult<String> {
        serde_json::to_string_pretty(self).map_err(|source| ScheduleError::SnapshotFormat {
            path: "<inline>".to_string(),
            source,
        })
    }
}
