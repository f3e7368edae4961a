// Decides which tasks and habits are shown for a given calendar date.
//
// Task visibility walks a fixed sequence of clauses and stops at the first
// one that holds:
//
//   completed   -> only on the completion day, and only if that day is today
//   recurrence  -> enabled rule recurs on the target date
//   due today   -> due day == target
//   overdue     -> due day < target (optional)
//   start window-> started, and not yet past due
//   priority    -> High/Urgent tasks without any date (optional)
//
// Habit visibility is a fixed weekday/day-of-month table; it never looks at
// history. All comparisons happen on local calendar days. "Today" is always
// passed in by the caller.

use crate::model::item::{DateType, Habit, HabitFrequency, Task, weekday_number};
use crate::model::recurrence::{RecurrenceEngine, RecurrenceMode};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

const SUNDAY: u8 = 0;
const MONDAY: u8 = 1;
const THURSDAY: u8 = 4;
const MON_WED_FRI: [u8; 3] = [1, 3, 5];

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityOptions {
    #[serde(default = "default_true")]
    pub include_overdue: bool,
    #[serde(default = "default_true")]
    pub include_high_priority_without_date: bool,
    /// Reserved. Accepted and carried, but no clause reads it yet.
    #[serde(default)]
    pub include_starting_soon: bool,
}

impl Default for VisibilityOptions {
    fn default() -> Self {
        Self {
            include_overdue: true,
            include_high_priority_without_date: true,
            include_starting_soon: false,
        }
    }
}

/// Which clause decided a task's visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskReason {
    CompletedToday,
    /// Completed, and the target is not today's completion day.
    CompletedHidden,
    Recurring,
    DueToday,
    Overdue,
    Started,
    PriorityFallback,
    NotScheduled,
}

impl TaskReason {
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::CompletedHidden | Self::NotScheduled)
    }
}

impl fmt::Display for TaskReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskReason::CompletedToday => write!(f, "done today"),
            TaskReason::CompletedHidden => write!(f, "completed"),
            TaskReason::Recurring => write!(f, "recurring"),
            TaskReason::DueToday => write!(f, "due"),
            TaskReason::Overdue => write!(f, "overdue"),
            TaskReason::Started => write!(f, "in progress"),
            TaskReason::PriorityFallback => write!(f, "priority"),
            TaskReason::NotScheduled => write!(f, "not scheduled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HabitReason {
    Scheduled,
    OffDay,
    UnrecognizedFrequency,
}

impl HabitReason {
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Scheduled)
    }
}

/// Receives every decision the scheduler makes. Must not influence results.
pub trait DecisionObserver {
    fn task_decided(&self, task: &Task, target: NaiveDate, reason: TaskReason);
    fn habit_decided(&self, habit: &Habit, target: NaiveDate, reason: HabitReason);
}

/// Forwards decisions to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl DecisionObserver for LogObserver {
    fn task_decided(&self, task: &Task, target: NaiveDate, reason: TaskReason) {
        log::debug!(
            "task {} ({}) on {}: {} [{}]",
            task.uid,
            task.title,
            target,
            if reason.is_visible() { "visible" } else { "hidden" },
            reason
        );
    }

    fn habit_decided(&self, habit: &Habit, target: NaiveDate, reason: HabitReason) {
        match reason {
            HabitReason::UnrecognizedFrequency => log::warn!(
                "habit {} ({}) has unrecognized frequency '{}', hiding it",
                habit.uid,
                habit.name,
                habit.frequency
            ),
            _ => log::debug!(
                "habit {} ({}) on {}: {:?}",
                habit.uid,
                habit.name,
                target,
                reason
            ),
        }
    }
}

static LOG_OBSERVER: LogObserver = LogObserver;

/// Evaluation context: the injected "today", the option flags, the
/// recurrence mode and an optional decision observer.
#[derive(Clone, Copy)]
pub struct Scheduler<'a> {
    pub today: NaiveDate,
    pub options: VisibilityOptions,
    pub mode: RecurrenceMode,
    observer: Option<&'a dyn DecisionObserver>,
}

impl fmt::Debug for Scheduler<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("today", &self.today)
            .field("options", &self.options)
            .field("mode", &self.mode)
            .field("observed", &self.observer.is_some())
            .finish()
    }
}

impl Scheduler<'static> {
    /// Default options, anchored recurrence, decisions logged through `log`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            options: VisibilityOptions::default(),
            mode: RecurrenceMode::default(),
            observer: Some(&LOG_OBSERVER),
        }
    }
}

impl<'a> Scheduler<'a> {
    pub fn with_options(mut self, options: VisibilityOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_mode(mut self, mode: RecurrenceMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_observer<'b>(self, observer: &'b dyn DecisionObserver) -> Scheduler<'b> {
        Scheduler {
            today: self.today,
            options: self.options,
            mode: self.mode,
            observer: Some(observer),
        }
    }

    /// Drops the observer; decisions are no longer reported anywhere.
    pub fn silent(mut self) -> Self {
        self.observer = None;
        self
    }

    pub fn is_task_visible(&self, task: &Task, target: NaiveDate) -> bool {
        self.task_decision(task, target).is_visible()
    }

    pub fn task_decision(&self, task: &Task, target: NaiveDate) -> TaskReason {
        let reason = self.evaluate_task(task, target);
        if let Some(observer) = self.observer {
            observer.task_decided(task, target, reason);
        }
        reason
    }

    pub fn is_habit_visible(&self, habit: &Habit, target: NaiveDate) -> bool {
        self.habit_decision(habit, target).is_visible()
    }

    pub fn habit_decision(&self, habit: &Habit, target: NaiveDate) -> HabitReason {
        let reason = evaluate_habit(habit, target);
        if let Some(observer) = self.observer {
            observer.habit_decided(habit, target, reason);
        }
        reason
    }

    fn evaluate_task(&self, task: &Task, target: NaiveDate) -> TaskReason {
        if task.completed {
            let done_today = target == self.today
                && task
                    .completed_at
                    .is_some_and(|at| DateType::Specific(at).to_date_naive() == target);
            return if done_today {
                TaskReason::CompletedToday
            } else {
                TaskReason::CompletedHidden
            };
        }

        if let Some(rule) = &task.recurrence
            && rule.enabled
            && RecurrenceEngine::is_recurring_on(rule, target, self.mode)
        {
            return TaskReason::Recurring;
        }

        let due = task.due.map(|d| d.to_date_naive());
        let start = task.dtstart.map(|d| d.to_date_naive());

        if let Some(due) = due {
            if due == target {
                return TaskReason::DueToday;
            }
            if self.options.include_overdue && due < target {
                return TaskReason::Overdue;
            }
        }

        if let Some(start) = start
            && start <= target
        {
            match due {
                Some(due) if due < target => {}
                _ => return TaskReason::Started,
            }
        }

        if self.options.include_high_priority_without_date
            && !task.has_any_date()
            && task.priority.is_elevated()
        {
            return TaskReason::PriorityFallback;
        }

        TaskReason::NotScheduled
    }
}

fn evaluate_habit(habit: &Habit, target: NaiveDate) -> HabitReason {
    let weekday = weekday_number(target);
    let scheduled = match &habit.frequency {
        HabitFrequency::Daily => true,
        HabitFrequency::ThreeTimesPerWeek => MON_WED_FRI.contains(&weekday),
        HabitFrequency::Weekly => weekday == SUNDAY,
        HabitFrequency::Monthly => target.day() == 1,
        HabitFrequency::Custom => match habit.frequency_count {
            None => true,
            Some(n) if n >= 7 => true,
            Some(n) if n >= 5 => (MONDAY..=5).contains(&weekday),
            Some(n) if n >= 3 => MON_WED_FRI.contains(&weekday),
            Some(2) => weekday == MONDAY || weekday == THURSDAY,
            Some(_) => weekday == MONDAY,
        },
        HabitFrequency::Unrecognized(_) => return HabitReason::UnrecognizedFrequency,
    };
    if scheduled {
        HabitReason::Scheduled
    } else {
        HabitReason::OffDay
    }
}

/// Task visibility with the given options, anchored recurrence and logged decisions.
pub fn is_task_visible(
    task: &Task,
    target: NaiveDate,
    today: NaiveDate,
    options: &VisibilityOptions,
) -> bool {
    Scheduler::new(today)
        .with_options(*options)
        .is_task_visible(task, target)
}

/// Habit visibility depends only on the target date, so no "today" is needed.
pub fn is_habit_visible(habit: &Habit, target: NaiveDate) -> bool {
    Scheduler::new(target).is_habit_visible(habit, target)
}
