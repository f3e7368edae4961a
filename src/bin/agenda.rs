use anyhow::{Context, Result};
use chrono::Local;
use lifequest::cli::{CliArgs, print_help};
use lifequest::config::Config;
use lifequest::context::{AppContext, StandardContext};
use lifequest::model::{RecurrenceEngine, Scheduler};
use lifequest::snapshot::Snapshot;
use lifequest::store::{AgendaDay, AgendaStore};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::env;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    // The only place the wall clock is read; everything below receives it.
    let today = Local::now().date_naive();

    let cli = CliArgs::parse(&args, today)?;
    if cli.show_help {
        print_help("lifequest-agenda");
        return Ok(());
    }

    let ctx = StandardContext::new(cli.root.clone());
    let config = Config::load_or_default(&ctx)?;

    // Logs go to stderr so the agenda on stdout stays pipeable.
    let _ = TermLogger::init(
        config.log_level_filter(),
        ConfigBuilder::new().build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    let snapshot_path = match &cli.snapshot {
        Some(p) => p.clone(),
        None => ctx
            .snapshot_file()
            .context("Could not determine the data directory")?,
    };
    let snapshot = Snapshot::load(&snapshot_path)?;
    let store = AgendaStore::from_snapshot(snapshot);

    let scheduler = Scheduler::new(today)
        .with_options(config.visibility_options())
        .with_mode(config.recurrence_mode);

    let days = cli.days.unwrap_or(config.agenda_days).max(1);
    let agenda = store.range(
        &scheduler,
        cli.date,
        days,
        &cli.search,
        config.hide_completed,
    );

    for day in &agenda {
        print_day(day, &scheduler);
    }
    Ok(())
}

fn print_day(day: &AgendaDay, scheduler: &Scheduler) {
    let marker = if day.date == scheduler.today { " (today)" } else { "" };
    println!("{}{}", day.date.format("%a %Y-%m-%d"), marker);
    if day.is_empty() {
        println!("    nothing scheduled");
    }
    for (task, reason) in &day.tasks {
        let mut line = format!(
            "    {} {} [{}] !{}",
            task.checkbox_symbol(),
            task.title,
            reason,
            task.priority
        );
        if let Some(due) = &task.due {
            line.push_str(&format!(" @{}", due.format_smart()));
        }
        if let Some(rule) = &task.recurrence
            && let Some(next) = RecurrenceEngine::next_occurrence(rule, day.date, scheduler.mode)
        {
            line.push_str(&format!(" (next {})", next));
        }
        println!("{}", line);
    }
    for habit in &day.habits {
        println!("    ~ {} ({})", habit.name, habit.frequency);
    }
    println!();
}
