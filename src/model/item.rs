// File: ./src/model/item.rs
use crate::model::recurrence::RecurrenceRule;
use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use strum::EnumIter;
use uuid::Uuid;

fn default_uid() -> String {
    Uuid::new_v4().to_string()
}

// --- DATE TYPES ---

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum DateType {
    AllDay(NaiveDate),
    Specific(DateTime<Utc>),
}

impl DateType {
    /// Calendar day in the local timezone. All visibility comparisons go through this.
    pub fn to_date_naive(&self) -> NaiveDate {
        self.to_date_in(&Local)
    }

    /// Calendar day as seen from `tz`. AllDay values are already calendar days.
    pub fn to_date_in<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        match self {
            DateType::AllDay(d) => *d,
            DateType::Specific(dt) => dt.with_timezone(tz).date_naive(),
        }
    }

    pub fn format_smart(&self) -> String {
        match self {
            DateType::AllDay(d) => d.format("%Y-%m-%d").to_string(),
            DateType::Specific(dt) => dt
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
        }
    }
}

impl From<NaiveDate> for DateType {
    fn from(d: NaiveDate) -> Self {
        DateType::AllDay(d)
    }
}

impl PartialOrd for DateType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DateType {
    fn cmp(&self, other: &Self) -> Ordering {
        let d1 = self.to_date_naive();
        let d2 = other.to_date_naive();
        match d1.cmp(&d2) {
            Ordering::Equal => match (self, other) {
                // Same day: Specific time comes BEFORE All Day (urgency)
                (DateType::Specific(t1), DateType::Specific(t2)) => t1.cmp(t2),
                (DateType::Specific(_), DateType::AllDay(_)) => Ordering::Less,
                (DateType::AllDay(_), DateType::Specific(_)) => Ordering::Greater,
                (DateType::AllDay(_), DateType::AllDay(_)) => Ordering::Equal,
            },
            ord => ord,
        }
    }
}

/// Weekday number with 0 = Sunday .. 6 = Saturday.
pub fn weekday_number(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

// --- TASKS ---

#[derive(
    Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, EnumIter,
)]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    /// High and Urgent tasks stay on the agenda even without any date.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Self::High | Self::Urgent)
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskPriority::Low => write!(f, "Low"),
            TaskPriority::Medium => write!(f, "Medium"),
            TaskPriority::High => write!(f, "High"),
            TaskPriority::Urgent => write!(f, "Urgent"),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default = "default_uid")]
    pub uid: String,
    pub title: String,

    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<DateType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dtstart: Option<DateType>,

    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceRule>,
}

impl Task {
    pub fn new(title: &str) -> Self {
        Self {
            uid: default_uid(),
            title: title.to_string(),
            completed: false,
            completed_at: None,
            due: None,
            dtstart: None,
            priority: TaskPriority::default(),
            recurrence: None,
        }
    }

    /// Marks the task done at `at`, the way the CRUD layer records completion.
    pub fn complete(&mut self, at: DateTime<Utc>) {
        self.completed = true;
        self.completed_at = Some(at);
    }

    pub fn has_any_date(&self) -> bool {
        self.due.is_some() || self.dtstart.is_some()
    }

    pub fn checkbox_symbol(&self) -> &'static str {
        if self.completed { "[✔]" } else { "[ ]" }
    }
}

// --- HABITS ---

pub const THREE_PER_WEEK_LABEL: &str = "3x per week";

/// How often a habit is expected. Stored as free text by the outer
/// application, so unknown labels survive a round trip as `Unrecognized`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HabitFrequency {
    Daily,
    ThreeTimesPerWeek,
    Weekly,
    Monthly,
    Custom,
    Unrecognized(String),
}

impl From<String> for HabitFrequency {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Daily" => Self::Daily,
            THREE_PER_WEEK_LABEL => Self::ThreeTimesPerWeek,
            "Weekly" => Self::Weekly,
            "Monthly" => Self::Monthly,
            "Custom" => Self::Custom,
            _ => Self::Unrecognized(s),
        }
    }
}

impl From<&str> for HabitFrequency {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<HabitFrequency> for String {
    fn from(f: HabitFrequency) -> Self {
        f.to_string()
    }
}

impl fmt::Display for HabitFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HabitFrequency::Daily => write!(f, "Daily"),
            HabitFrequency::ThreeTimesPerWeek => write!(f, "{}", THREE_PER_WEEK_LABEL),
            HabitFrequency::Weekly => write!(f, "Weekly"),
            HabitFrequency::Monthly => write!(f, "Monthly"),
            HabitFrequency::Custom => write!(f, "Custom"),
            HabitFrequency::Unrecognized(raw) => write!(f, "{}", raw),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    #[serde(default = "default_uid")]
    pub uid: String,
    pub name: String,
    pub frequency: HabitFrequency,
    /// Only meaningful for `HabitFrequency::Custom`: target sessions per week.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_count: Option<u32>,
}

impl Habit {
    pub fn new(name: &str, frequency: HabitFrequency) -> Self {
        Self {
            uid: default_uid(),
            name: name.to_string(),
            frequency,
            frequency_count: None,
        }
    }

    pub fn custom(name: &str, per_week: u32) -> Self {
        let mut habit = Self::new(name, HabitFrequency::Custom);
        habit.frequency_count = Some(per_week);
        habit
    }
}
