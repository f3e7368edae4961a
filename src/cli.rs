// File: ./src/cli.rs
//! Shared command-line interface logic: argument parsing and help output.

use crate::model::parser::parse_smart_date;
use crate::model::{RecurrenceFrequency, TaskPriority};
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use std::path::PathBuf;
use strum::IntoEnumIterator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub root: Option<PathBuf>,
    pub date: NaiveDate,
    pub days: Option<u32>,
    pub search: String,
    pub snapshot: Option<PathBuf>,
    pub show_help: bool,
}

impl CliArgs {
    /// Parses everything after the binary name. Relative dates given with
    /// `--date` are resolved against `today`.
    pub fn parse(args: &[String], today: NaiveDate) -> Result<Self> {
        let mut parsed = CliArgs {
            root: None,
            date: today,
            days: None,
            search: String::new(),
            snapshot: None,
            show_help: false,
        };

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "-h" | "--help" | "help" => parsed.show_help = true,
                "-r" | "--root" => {
                    let value = iter.next().ok_or_else(|| anyhow!("--root needs a path"))?;
                    parsed.root = Some(PathBuf::from(value));
                }
                "-d" | "--date" => {
                    let value = iter.next().ok_or_else(|| anyhow!("--date needs a value"))?;
                    parsed.date = parse_smart_date(value, today)?;
                }
                "-n" | "--days" => {
                    let value = iter.next().ok_or_else(|| anyhow!("--days needs a number"))?;
                    let days: u32 = value
                        .parse()
                        .map_err(|_| anyhow!("--days expects a positive number, got '{}'", value))?;
                    if days == 0 {
                        return Err(anyhow!("--days must be at least 1"));
                    }
                    parsed.days = Some(days);
                }
                "-s" | "--search" => {
                    let value = iter.next().ok_or_else(|| anyhow!("--search needs a term"))?;
                    parsed.search = value.clone();
                }
                other if other.starts_with('-') => {
                    return Err(anyhow!("Unknown option '{}'. See --help.", other));
                }
                path => {
                    if parsed.snapshot.is_some() {
                        return Err(anyhow!("Only one snapshot file may be given"));
                    }
                    parsed.snapshot = Some(PathBuf::from(path));
                }
            }
        }
        Ok(parsed)
    }
}

pub fn print_help(binary_name: &str) {
    println!(
        "Lifequest v{} - agenda of tasks and habits visible per day",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [OPTIONS] [snapshot.json]", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config and data.");
    println!("    -d, --date <date>     First day of the agenda (default: today).");
    println!("                          Accepts 2024-03-10, today, tomorrow, 3d, -1w, friday.");
    println!("    -n, --days <n>        Number of days to show (default from config).");
    println!("    -s, --search <term>   Only show items whose title contains <term>.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("Without a snapshot argument, <data dir>/snapshot.json is read.");
    println!();
    let priorities: Vec<String> = TaskPriority::iter().map(|p| p.to_string()).collect();
    println!("TASK PRIORITIES:      {}", priorities.join(", "));
    let frequencies: Vec<String> = RecurrenceFrequency::iter()
        .map(|f| format!("{:?}", f).to_lowercase())
        .collect();
    println!("RECURRENCE:           {}", frequencies.join(", "));
    println!("HABIT FREQUENCIES:    Daily, 3x per week, Weekly, Monthly, Custom");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 12).unwrap()
    }

    #[test]
    fn test_defaults_to_today() {
        let parsed = CliArgs::parse(&[], today()).unwrap();
        assert_eq!(parsed.date, today());
        assert_eq!(parsed.days, None);
        assert!(parsed.snapshot.is_none());
    }

    #[test]
    fn test_full_argument_set() {
        let parsed = CliArgs::parse(
            &args(&["--root", "/tmp/lq", "-d", "tomorrow", "--days", "3", "-s", "gym", "s.json"]),
            today(),
        )
        .unwrap();
        assert_eq!(parsed.root, Some(PathBuf::from("/tmp/lq")));
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2024, 3, 13).unwrap());
        assert_eq!(parsed.days, Some(3));
        assert_eq!(parsed.search, "gym");
        assert_eq!(parsed.snapshot, Some(PathBuf::from("s.json")));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(CliArgs::parse(&args(&["--date", "someday"]), today()).is_err());
        assert!(CliArgs::parse(&args(&["--days", "0"]), today()).is_err());
        assert!(CliArgs::parse(&args(&["--days"]), today()).is_err());
        assert!(CliArgs::parse(&args(&["--frobnicate"]), today()).is_err());
        assert!(CliArgs::parse(&args(&["a.json", "b.json"]), today()).is_err());
    }

    #[test]
    fn test_out_of_range_date_is_an_error() {
        let err = CliArgs::parse(&args(&["--date", "99999999d"]), today()).unwrap_err();
        assert!(err.to_string().contains("out of range"));
        assert!(CliArgs::parse(&args(&["-d", "2000000000000000000w"]), today()).is_err());
    }
}
