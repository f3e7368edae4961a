// File: src/store.rs
// In-memory collection of tasks and habits, queried per date for agenda views.
use crate::model::{Habit, Scheduler, Task, TaskReason};
use crate::snapshot::Snapshot;
use chrono::{Days, NaiveDate};
use std::cmp::Ordering;

#[derive(Debug, Clone, Default)]
pub struct AgendaStore {
    pub tasks: Vec<Task>,
    pub habits: Vec<Habit>,
}

pub struct FilterOptions<'a> {
    pub date: NaiveDate,
    pub search_term: &'a str,
    pub hide_completed: bool,
}

impl<'a> FilterOptions<'a> {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date,
            search_term: "",
            hide_completed: false,
        }
    }
}

/// Everything visible on one date, in display order.
#[derive(Debug, Clone)]
pub struct AgendaDay<'a> {
    pub date: NaiveDate,
    pub tasks: Vec<(&'a Task, TaskReason)>,
    pub habits: Vec<&'a Habit>,
}

impl AgendaDay<'_> {
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty() && self.habits.is_empty()
    }
}

impl AgendaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            tasks: snapshot.tasks,
            habits: snapshot.habits,
        }
    }

    pub fn add_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    pub fn add_habit(&mut self, habit: Habit) {
        self.habits.push(habit);
    }

    pub fn filter<'s>(&'s self, scheduler: &Scheduler, options: FilterOptions) -> AgendaDay<'s> {
        let search_lower = options.search_term.to_lowercase();
        let matches_search = |title: &str| -> bool {
            search_lower.is_empty() || title.to_lowercase().contains(&search_lower)
        };

        let mut tasks: Vec<(&Task, TaskReason)> = self
            .tasks
            .iter()
            .filter(|t| !(options.hide_completed && t.completed))
            .filter(|t| matches_search(&t.title))
            .filter_map(|t| {
                let reason = scheduler.task_decision(t, options.date);
                reason.is_visible().then_some((t, reason))
            })
            .collect();
        tasks.sort_by(|a, b| compare_entries(a, b));

        let mut habits: Vec<&Habit> = self
            .habits
            .iter()
            .filter(|h| matches_search(&h.name))
            .filter(|h| scheduler.is_habit_visible(h, options.date))
            .collect();
        habits.sort_by(|a, b| a.name.cmp(&b.name));

        AgendaDay {
            date: options.date,
            tasks,
            habits,
        }
    }

    /// One `AgendaDay` per date, starting at `start`, for `days` days. Stops
    /// early at the last representable date.
    pub fn range<'s>(
        &'s self,
        scheduler: &Scheduler,
        start: NaiveDate,
        days: u32,
        search_term: &str,
        hide_completed: bool,
    ) -> Vec<AgendaDay<'s>> {
        (0..days as u64)
            .map_while(|offset| start.checked_add_days(Days::new(offset)))
            .map(|date| {
                self.filter(
                    scheduler,
                    FilterOptions {
                        date,
                        search_term,
                        hide_completed,
                    },
                )
            })
            .collect()
    }
}

fn section_rank(reason: TaskReason) -> u8 {
    match reason {
        TaskReason::Overdue => 0,
        TaskReason::DueToday => 1,
        TaskReason::Recurring => 2,
        TaskReason::Started => 3,
        TaskReason::PriorityFallback => 4,
        TaskReason::CompletedToday => 5,
        TaskReason::CompletedHidden | TaskReason::NotScheduled => 6,
    }
}

fn compare_entries(a: &(&Task, TaskReason), b: &(&Task, TaskReason)) -> Ordering {
    let (t1, r1) = a;
    let (t2, r2) = b;
    section_rank(*r1)
        .cmp(&section_rank(*r2))
        .then(t2.priority.cmp(&t1.priority))
        .then_with(|| match (&t1.due, &t2.due) {
            (Some(d1), Some(d2)) => d1.cmp(d2),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then(t1.title.cmp(&t2.title))
}
