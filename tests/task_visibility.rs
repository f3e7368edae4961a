use chrono::{Duration, Local, NaiveDate, TimeZone, Utc};
use lifequest::model::{
    DateType, RecurrenceRule, Scheduler, Task, TaskPriority, TaskReason, VisibilityOptions,
    is_task_visible,
};
use strum::IntoEnumIterator;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn local_utc(y: i32, m: u32, day: u32, h: u32, min: u32) -> chrono::DateTime<Utc> {
    Local
        .with_ymd_and_hms(y, m, day, h, min, 0)
        .unwrap()
        .with_timezone(&Utc)
}

fn task_due(date: NaiveDate) -> Task {
    let mut t = Task::new("Due task");
    t.due = Some(DateType::AllDay(date));
    t
}

fn no_overdue() -> VisibilityOptions {
    VisibilityOptions {
        include_overdue: false,
        ..VisibilityOptions::default()
    }
}

#[test]
fn test_overdue_scenario() {
    let task = task_due(d(2024, 3, 10));
    let today = d(2024, 3, 12);

    assert!(is_task_visible(&task, today, today, &VisibilityOptions::default()));
    assert!(!is_task_visible(&task, today, today, &no_overdue()));
}

#[test]
fn test_due_date_window() {
    let due = d(2024, 3, 10);
    let task = task_due(due);
    let today = d(2024, 3, 1);
    let opts = VisibilityOptions::default();

    assert!(is_task_visible(&task, due, today, &opts));
    // Overdue persists indefinitely
    for offset in [1, 2, 30, 400] {
        assert!(is_task_visible(&task, due + Duration::days(offset), today, &opts));
    }
    for offset in [1, 2, 30] {
        assert!(!is_task_visible(&task, due - Duration::days(offset), today, &opts));
    }
}

#[test]
fn test_due_time_of_day_is_ignored() {
    let mut task = Task::new("Late evening deadline");
    task.due = Some(DateType::Specific(local_utc(2024, 3, 10, 23, 59)));
    let today = d(2024, 3, 1);

    let scheduler = Scheduler::new(today).silent();
    assert_eq!(scheduler.task_decision(&task, d(2024, 3, 10)), TaskReason::DueToday);
    assert_eq!(scheduler.task_decision(&task, d(2024, 3, 9)), TaskReason::NotScheduled);
}

#[test]
fn test_start_only_task_visible_from_start_onwards() {
    let mut task = Task::new("Read a book");
    task.dtstart = Some(DateType::AllDay(d(2024, 5, 1)));
    let scheduler = Scheduler::new(d(2024, 1, 1)).silent();

    assert!(!scheduler.is_task_visible(&task, d(2024, 4, 30)));
    assert_eq!(scheduler.task_decision(&task, d(2024, 5, 1)), TaskReason::Started);
    assert!(scheduler.is_task_visible(&task, d(2025, 5, 1)));
}

#[test]
fn test_start_window_closes_after_due_without_overdue() {
    let mut task = Task::new("Prepare talk");
    task.dtstart = Some(DateType::AllDay(d(2024, 5, 1)));
    task.due = Some(DateType::AllDay(d(2024, 5, 5)));
    let scheduler = Scheduler::new(d(2024, 1, 1))
        .with_options(no_overdue())
        .silent();

    assert!(!scheduler.is_task_visible(&task, d(2024, 4, 30)));
    assert_eq!(scheduler.task_decision(&task, d(2024, 5, 3)), TaskReason::Started);
    assert_eq!(scheduler.task_decision(&task, d(2024, 5, 5)), TaskReason::DueToday);
    assert!(!scheduler.is_task_visible(&task, d(2024, 5, 6)));

    // With overdue enabled the same date is reported as overdue instead.
    let scheduler = scheduler.with_options(VisibilityOptions::default());
    assert_eq!(scheduler.task_decision(&task, d(2024, 5, 6)), TaskReason::Overdue);
}

#[test]
fn test_priority_fallback() {
    let today = d(2024, 3, 12);
    for priority in TaskPriority::iter() {
        let mut task = Task::new("Undated");
        task.priority = priority;

        let with = VisibilityOptions::default();
        let without = VisibilityOptions {
            include_high_priority_without_date: false,
            ..VisibilityOptions::default()
        };

        for target in [d(2020, 1, 1), today, d(2030, 12, 31)] {
            assert_eq!(
                is_task_visible(&task, target, today, &with),
                priority.is_elevated(),
                "{:?} on {}",
                priority,
                target
            );
            assert!(!is_task_visible(&task, target, today, &without));
        }
    }
}

#[test]
fn test_priority_fallback_needs_no_dates_at_all() {
    let mut task = Task::new("Urgent but scheduled later");
    task.priority = TaskPriority::Urgent;
    task.dtstart = Some(DateType::AllDay(d(2024, 6, 1)));
    let scheduler = Scheduler::new(d(2024, 1, 1)).silent();

    assert!(!scheduler.is_task_visible(&task, d(2024, 5, 1)));
}

#[test]
fn test_completed_task_only_visible_on_todays_completion() {
    let today = d(2024, 3, 12);
    let mut task = task_due(d(2024, 3, 10));
    task.priority = TaskPriority::Urgent;
    task.complete(local_utc(2024, 3, 12, 10, 0));
    let scheduler = Scheduler::new(today).silent();

    assert_eq!(scheduler.task_decision(&task, today), TaskReason::CompletedToday);
    for target in [d(2024, 3, 10), d(2024, 3, 11), d(2024, 3, 13)] {
        assert_eq!(scheduler.task_decision(&task, target), TaskReason::CompletedHidden);
    }
}

#[test]
fn test_completed_on_past_day_is_hidden_even_on_that_day() {
    let mut task = Task::new("Done yesterday");
    task.complete(local_utc(2024, 3, 11, 18, 30));
    let scheduler = Scheduler::new(d(2024, 3, 12)).silent();

    assert!(!scheduler.is_task_visible(&task, d(2024, 3, 11)));
    assert!(!scheduler.is_task_visible(&task, d(2024, 3, 12)));
}

#[test]
fn test_completed_without_timestamp_is_never_visible() {
    let mut task = Task::new("Legacy completion");
    task.completed = true;
    let today = d(2024, 3, 12);

    assert!(!is_task_visible(&task, today, today, &VisibilityOptions::default()));
}

#[test]
fn test_recurrence_short_circuits_before_dates() {
    let mut task = Task::new("Pay rent");
    task.recurrence = Some(RecurrenceRule::monthly_on(15));
    task.dtstart = Some(DateType::AllDay(d(2025, 1, 1)));
    let scheduler = Scheduler::new(d(2024, 1, 1)).silent();

    assert_eq!(scheduler.task_decision(&task, d(2024, 4, 15)), TaskReason::Recurring);
    assert!(!scheduler.is_task_visible(&task, d(2024, 4, 16)));
}

#[test]
fn test_disabled_recurrence_falls_through_to_dates() {
    let mut rule = RecurrenceRule::monthly_on(15);
    rule.enabled = false;
    let mut task = task_due(d(2024, 4, 20));
    task.recurrence = Some(rule);
    let scheduler = Scheduler::new(d(2024, 1, 1)).silent();

    assert!(!scheduler.is_task_visible(&task, d(2024, 4, 15)));
    assert_eq!(scheduler.task_decision(&task, d(2024, 4, 20)), TaskReason::DueToday);
}

#[test]
fn test_starting_soon_flag_is_inert() {
    let mut task = Task::new("Starts tomorrow");
    task.dtstart = Some(DateType::AllDay(d(2024, 3, 13)));
    let opts = VisibilityOptions {
        include_starting_soon: true,
        ..VisibilityOptions::default()
    };
    let today = d(2024, 3, 12);

    assert!(!is_task_visible(&task, today, today, &opts));
}
