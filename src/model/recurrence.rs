// File: ./src/model/recurrence.rs
use crate::error::{ScheduleError, ScheduleResult};
use crate::model::item::{DateType, weekday_number};
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use strum::EnumIter;

// Upper bound for `next_occurrence` lookups. Long enough to reach a monthly
// rule on the 31st with a yearly interval.
const MAX_LOOKAHEAD_DAYS: u64 = 366 * 5;

fn default_true() -> bool {
    true
}

fn default_interval() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceFrequency {
    Daily,
    Weekly,
    Monthly,
    Custom,
}

/// How much of a rule the evaluator honors.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceMode {
    /// Only `end_date`, `days_of_week` and `day_of_month` matter. Weekly and
    /// monthly rules without explicit days match every date.
    Legacy,
    /// Uses `anchor_date` as the origin: unspecified days follow the anchor,
    /// `interval` skips periods and `max_occurrences` stops the series.
    #[default]
    Anchored,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub frequency: RecurrenceFrequency,
    #[serde(default = "default_interval")]
    pub interval: u32,
    /// 0 = Sunday .. 6 = Saturday. Empty means "not specified".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub days_of_week: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_occurrences: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_date: Option<DateType>,
}

impl RecurrenceRule {
    pub fn new(frequency: RecurrenceFrequency) -> Self {
        Self {
            enabled: true,
            frequency,
            interval: 1,
            days_of_week: Vec::new(),
            day_of_month: None,
            end_date: None,
            max_occurrences: None,
            anchor_date: None,
        }
    }

    pub fn weekly_on(days: &[u8]) -> Self {
        let mut rule = Self::new(RecurrenceFrequency::Weekly);
        rule.days_of_week = days.to_vec();
        rule
    }

    pub fn monthly_on(day: u32) -> Self {
        let mut rule = Self::new(RecurrenceFrequency::Monthly);
        rule.day_of_month = Some(day);
        rule
    }

    pub fn anchored_at(mut self, anchor: NaiveDate) -> Self {
        self.anchor_date = Some(DateType::AllDay(anchor));
        self
    }

    /// An interval of 0 is stored by some clients; it means the same as 1.
    pub fn effective_interval(&self) -> u32 {
        self.interval.max(1)
    }

    /// Rejects field values the evaluator could only misinterpret.
    pub fn validate(&self) -> ScheduleResult<()> {
        if let Some(bad) = self.days_of_week.iter().find(|d| **d > 6) {
            return Err(ScheduleError::InvalidArgument(format!(
                "weekday {} is outside 0 (Sunday) ..= 6 (Saturday)",
                bad
            )));
        }
        if let Some(day) = self.day_of_month
            && !(1..=31).contains(&day)
        {
            return Err(ScheduleError::InvalidArgument(format!(
                "day of month {} is outside 1..=31",
                day
            )));
        }
        Ok(())
    }
}

pub struct RecurrenceEngine;

impl RecurrenceEngine {
    /// Decides whether an enabled rule produces an occurrence on `target`.
    pub fn is_recurring_on(rule: &RecurrenceRule, target: NaiveDate, mode: RecurrenceMode) -> bool {
        if let Some(end) = &rule.end_date
            && target > end.to_date_naive()
        {
            return false;
        }

        let anchor = match mode {
            RecurrenceMode::Legacy => None,
            RecurrenceMode::Anchored => rule.anchor_date.map(|a| a.to_date_naive()),
        };

        // No origin to count from: interval and max_occurrences cannot apply.
        let Some(anchor) = anchor else {
            return Self::matches_pattern(rule, target, None);
        };

        if target < anchor {
            return false;
        }
        if !Self::matches_pattern(rule, target, Some(anchor))
            || !Self::in_active_period(rule, target, anchor)
        {
            return false;
        }

        rule.max_occurrences
            .is_none_or(|limit| Self::occurrences_through(rule, anchor, target) <= limit as u64)
    }

    /// First date strictly after `after` on which the rule recurs, if any
    /// falls within the lookahead window.
    pub fn next_occurrence(
        rule: &RecurrenceRule,
        after: NaiveDate,
        mode: RecurrenceMode,
    ) -> Option<NaiveDate> {
        if !rule.enabled {
            return None;
        }
        let mut day = after.succ_opt()?;
        let horizon = after
            .checked_add_days(Days::new(MAX_LOOKAHEAD_DAYS))
            .unwrap_or(NaiveDate::MAX);
        while day <= horizon {
            if Self::is_recurring_on(rule, day, mode) {
                return Some(day);
            }
            if let Some(end) = &rule.end_date
                && day > end.to_date_naive()
            {
                return None;
            }
            day = day.succ_opt()?;
        }
        None
    }

    fn matches_pattern(rule: &RecurrenceRule, target: NaiveDate, anchor: Option<NaiveDate>) -> bool {
        match rule.frequency {
            RecurrenceFrequency::Daily => true,
            RecurrenceFrequency::Weekly => {
                if !rule.days_of_week.is_empty() {
                    rule.days_of_week.contains(&weekday_number(target))
                } else {
                    anchor.is_none_or(|a| a.weekday() == target.weekday())
                }
            }
            RecurrenceFrequency::Monthly => {
                match rule.day_of_month.or(anchor.map(|a| a.day())) {
                    Some(day) => target.day() == day,
                    None => true,
                }
            }
            RecurrenceFrequency::Custom => false,
        }
    }

    fn in_active_period(rule: &RecurrenceRule, target: NaiveDate, anchor: NaiveDate) -> bool {
        let interval = rule.effective_interval() as i64;
        if interval == 1 {
            return true;
        }
        match rule.frequency {
            RecurrenceFrequency::Daily => (target - anchor).num_days() % interval == 0,
            RecurrenceFrequency::Weekly => {
                let weeks = (week_start(target) - week_start(anchor)).num_days() / 7;
                weeks % interval == 0
            }
            RecurrenceFrequency::Monthly => months_between(anchor, target) % interval == 0,
            RecurrenceFrequency::Custom => false,
        }
    }

    /// Number of dates the series produces in `anchor..=target`, counted per
    /// period instead of per day.
    fn occurrences_through(rule: &RecurrenceRule, anchor: NaiveDate, target: NaiveDate) -> u64 {
        let interval = rule.effective_interval() as i64;
        match rule.frequency {
            RecurrenceFrequency::Daily => ((target - anchor).num_days() / interval + 1) as u64,
            RecurrenceFrequency::Weekly => {
                let days = weekly_days(rule, anchor);
                let weeks = (week_start(target) - week_start(anchor)).num_days() / 7;
                let mut count = (weeks / interval + 1) * days.len() as i64;
                // Partial first and last weeks.
                count -= days.iter().filter(|d| **d < weekday_number(anchor)).count() as i64;
                if weeks % interval == 0 {
                    count -= days.iter().filter(|d| **d > weekday_number(target)).count() as i64;
                }
                count.max(0) as u64
            }
            RecurrenceFrequency::Monthly => {
                let day = rule.day_of_month.unwrap_or(anchor.day());
                let months = months_between(anchor, target);
                if day <= 28 {
                    let mut count = months / interval + 1;
                    if day < anchor.day() {
                        count -= 1;
                    }
                    if months % interval == 0 && day > target.day() {
                        count -= 1;
                    }
                    count.max(0) as u64
                } else {
                    // Not every month has a 29th..31st.
                    (0..=months)
                        .step_by(interval as usize)
                        .filter_map(|offset| nth_month_day(anchor, offset, day))
                        .filter(|date| (anchor..=target).contains(date))
                        .count() as u64
                }
            }
            RecurrenceFrequency::Custom => 0,
        }
    }
}

/// Distinct weekdays a weekly rule fires on: the explicit list, or the
/// anchor's weekday.
fn weekly_days(rule: &RecurrenceRule, anchor: NaiveDate) -> Vec<u8> {
    if rule.days_of_week.is_empty() {
        return vec![weekday_number(anchor)];
    }
    let mut days: Vec<u8> = rule.days_of_week.iter().copied().filter(|d| *d <= 6).collect();
    days.sort_unstable();
    days.dedup();
    days
}

/// `day` of the month `offset` months after the anchor's month, if it exists.
fn nth_month_day(anchor: NaiveDate, offset: i64, day: u32) -> Option<NaiveDate> {
    let index = anchor.year() as i64 * 12 + anchor.month0() as i64 + offset;
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    NaiveDate::from_ymd_opt(year, index.rem_euclid(12) as u32 + 1, day)
}

/// Sunday that opens the week containing `date`.
fn week_start(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(weekday_number(date) as u64))
        .unwrap_or(NaiveDate::MIN)
}

fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to.year() as i64 - from.year() as i64) * 12 + to.month() as i64 - from.month() as i64
}
