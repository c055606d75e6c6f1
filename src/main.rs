//! switchcalc - keypad-driven multi-mode calculator
//!
//! Key tokens come from the command line or, line by line, from stdin.
//! Date calculations live under the `date` subcommand.

use anyhow::{Result, bail};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::io::BufRead;
use std::path::PathBuf;
use switchcalc::calculator::{AngleMode, BitWidth, NumberBase};
use switchcalc::config::Config;
use switchcalc::datetime::{DATE_FORMAT, DateTimeCalc, format_difference, parse_date, parse_time_delta};
use switchcalc::keypad::{Mode, Session};

#[derive(Parser)]
#[command(name = "switchcalc")]
#[command(version, about = "Standard, scientific, programmer and date calculator", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Starting mode
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,

    /// Starting number base
    #[arg(short, long, value_enum)]
    base: Option<NumberBase>,

    /// Angle unit for trigonometry
    #[arg(short, long, value_enum)]
    angle: Option<AngleMode>,

    /// Word size for programmer mode (8, 16, 32 or 64)
    #[arg(short, long, value_parser = parse_width)]
    width: Option<BitWidth>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Keys to press, e.g. `5 + 3 =`. Reads stdin when empty.
    keys: Vec<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Date calculations (dates are DD/MM/YYYY)
    Date {
        #[command(subcommand)]
        action: DateCommands,
    },
}

#[derive(Subcommand)]
enum DateCommands {
    /// Difference between two dates
    Diff { start: String, end: String },

    /// Add an offset such as `1y 2m 3d` or `-2w` to a date
    Add {
        start: String,
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        delta: Vec<String>,
    },

    /// Age today of someone born on BIRTH
    Age { birth: String },

    /// Calendar facts about a date (today by default)
    Info { date: Option<String> },

    /// Convert a Unix timestamp to a local date
    Timestamp {
        #[arg(allow_negative_numbers = true)]
        timestamp: i64,
    },

    /// Convert a date to a Unix timestamp (local midnight)
    ToTimestamp { date: String },
}

fn parse_width(value: &str) -> std::result::Result<BitWidth, String> {
    let bits: u32 = value.parse().map_err(|e: std::num::ParseIntError| e.to_string())?;
    BitWidth::try_from(bits)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    if let Some(base) = cli.base {
        config.number_base = base;
    }
    if let Some(angle) = cli.angle {
        config.angle_mode = angle;
    }
    if let Some(width) = cli.width {
        config.bit_width = width;
    }

    match cli.command {
        Some(Commands::Date { action }) => run_date(action, &config, cli.json),
        None if cli.keys.is_empty() => run_repl(&config, cli.json),
        None => {
            let mut session = Session::new(&config);
            report(&mut session, &cli.keys.join(" "), cli.json)
        }
    }
}

/// Log to stderr so readouts on stdout stay clean.
fn setup_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("switchcalc=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("switchcalc=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Press one line of keys and print the resulting readout.
fn report(session: &mut Session, line: &str, json: bool) -> Result<()> {
    for err in session.press_line(line) {
        eprintln!("{err}");
    }

    let readout = session.readout();
    if json {
        println!("{}", serde_json::to_string(&readout)?);
    } else {
        println!("{}", readout.text());
    }
    Ok(())
}

fn run_repl(config: &Config, json: bool) -> Result<()> {
    let mut session = Session::new(config);
    tracing::debug!(mode = session.mode().label(), "reading keys from stdin");

    for line in std::io::stdin().lock().lines() {
        let line = line?;
        match line.trim() {
            "" => continue,
            "quit" | "exit" => break,
            keys => report(&mut session, keys, json)?,
        }
    }
    Ok(())
}

fn emit(json: bool, value: serde_json::Value, text: String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{text}");
    }
    Ok(())
}

fn run_date(action: DateCommands, config: &Config, json: bool) -> Result<()> {
    let mut calc = DateTimeCalc::new();

    match action {
        DateCommands::Diff { start, end } => {
            let start = calc.midnight(parse_date(&start)?)?;
            let end = calc.midnight(parse_date(&end)?)?;
            calc.set_start(start);
            calc.set_end(end);

            let diff = calc.calculate_difference();
            let working = calc.working_days(config.exclude_weekends);
            let text = format!(
                "{}\nTotal: {} days ({} weeks)\nWorking days: {}",
                format_difference(&diff),
                diff.total_days,
                diff.total_weeks,
                working
            );
            emit(json, json!({ "difference": diff, "working_days": working }), text)
        }
        DateCommands::Add { start, delta } => {
            let offset = parse_time_delta(&delta.join(" "));
            if offset.is_zero() {
                bail!("No usable offset in '{}' (expected e.g. 1y 2m 3d 2w)", delta.join(" "));
            }
            calc.set_start(calc.midnight(parse_date(&start)?)?);

            let result = calc.add_offset(offset)?;
            let date = result.format(DATE_FORMAT).to_string();
            let weekday = result.weekday();
            emit(
                json,
                json!({ "date": date, "weekday": weekday.to_string() }),
                format!("{date} ({weekday})"),
            )
        }
        DateCommands::Age { birth } => {
            let age = calc.age(parse_date(&birth)?)?;
            let next = age.next_birthday.format(DATE_FORMAT);
            let text = format!(
                "{} years, {} months, {} days\nDays alive: {}\nNext birthday: {} (in {} days)",
                age.years, age.months, age.days, age.total_days, next, age.days_until_birthday
            );
            emit(json, serde_json::to_value(age)?, text)
        }
        DateCommands::Info { date } => {
            if let Some(date) = date {
                calc.set_start(calc.midnight(parse_date(&date)?)?);
            }

            let info = json!({
                "date": calc.format_date(DATE_FORMAT),
                "weekday": calc.weekday().to_string(),
                "week_number": calc.week_number(),
                "day_of_year": calc.day_of_year(),
                "is_leap_year": calc.is_leap_year(),
                "days_in_year": calc.days_in_year(),
                "days_until_end_of_month": calc.days_until_end_of_month(),
                "days_until_end_of_year": calc.days_until_end_of_year(),
                "unix_timestamp": calc.unix_timestamp(),
            });
            let text = format!(
                "Date: {} ({})\nWeek: {}\nDay of year: {}/{}\nLeap year: {}\nDays until end of month: {}\nDays until end of year: {}\nUnix timestamp: {}",
                calc.format_date(DATE_FORMAT),
                calc.weekday(),
                calc.week_number(),
                calc.day_of_year(),
                calc.days_in_year(),
                if calc.is_leap_year() { "yes" } else { "no" },
                calc.days_until_end_of_month(),
                calc.days_until_end_of_year(),
                calc.unix_timestamp()
            );
            emit(json, info, text)
        }
        DateCommands::Timestamp { timestamp } => {
            let date = calc.from_unix_timestamp(timestamp)?;
            let text = date.format("%d/%m/%Y %H:%M:%S %:z").to_string();
            emit(json, json!({ "timestamp": timestamp, "date": text }), text)
        }
        DateCommands::ToTimestamp { date } => {
            calc.set_start(calc.midnight(parse_date(&date)?)?);
            let timestamp = calc.unix_timestamp();
            emit(json, json!({ "timestamp": timestamp }), timestamp.to_string())
        }
    }
}
