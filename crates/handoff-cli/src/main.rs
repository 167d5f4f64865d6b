use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand};
use handoff_engine::{
    format_window, next_closing, next_opening, parse_rfc3339, parse_timezone, render_instant,
    resolve_match_window, AcceptedTask, Coordinator, EngineConfig, InMemoryLedger, Ledger,
    Rfc3339Formatter, TimeOfDay, UsLocaleFormatter, WeeklySchedule,
};
use tracing_subscriber::EnvFilter;

/// Donor closing / recipient opening handoff windows from weekly operating hours.
#[derive(Parser)]
#[command(name = "handoff", version, about)]
struct Cli {
    /// TOML config file (timezone, recent_task_limit)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log search decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a 12-hour time like "1:15 PM" to 24-hour HH:MM
    ParseTime {
        /// Time text; malformed input prints 00:00
        text: String,
    },
    /// Next closing instant of a schedule
    Closing {
        /// Schedule or profile JSON file (use - for stdin)
        #[arg(long)]
        schedule: String,
        #[command(flatten)]
        clock: ClockArgs,
    },
    /// Next opening instant of a schedule after an anchor
    Opening {
        /// Schedule or profile JSON file (use - for stdin)
        #[arg(long)]
        schedule: String,
        /// Anchor instant (RFC 3339)
        #[arg(long)]
        anchor: String,
        #[command(flatten)]
        clock: ClockArgs,
    },
    /// Donor closing and recipient opening for a proposed pair
    Window {
        /// Donor schedule or profile JSON file (use - for stdin, on one side only)
        #[arg(long)]
        donor: String,
        /// Recipient schedule or profile JSON file (use - for stdin, on one side only)
        #[arg(long)]
        recipient: String,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        clock: ClockArgs,
    },
    /// A user's most recent accepted tasks, oldest first
    Recent {
        /// JSON array of accepted tasks (use - for stdin)
        #[arg(long)]
        tasks: String,
        /// Donor or recipient id
        #[arg(long)]
        user: String,
        /// How many tasks to show; overrides the config
        #[arg(long)]
        limit: Option<usize>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct ClockArgs {
    /// Reference instant (RFC 3339); defaults to the current time
    #[arg(long)]
    now: Option<String>,
    /// IANA time zone for operating hours; overrides the config
    #[arg(long)]
    tz: Option<String>,
}

impl ClockArgs {
    fn resolve(&self, config: &EngineConfig) -> Result<(Tz, DateTime<Tz>)> {
        let tz = match &self.tz {
            Some(name) => parse_timezone(name)?,
            None => config.tz()?,
        };
        let now = match &self.now {
            Some(text) => parse_instant(text)?.with_timezone(&tz),
            None => Utc::now().with_timezone(&tz),
        };
        Ok((tz, now))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => {
            let mut config = EngineConfig::default();
            config.apply_overrides(|key| std::env::var(key).ok());
            config
        }
    };

    match cli.command {
        Command::ParseTime { text } => {
            println!("{}", TimeOfDay::parse(&text));
        }
        Command::Closing { schedule, clock } => {
            let (_, now) = clock.resolve(&config)?;
            let schedule = read_schedule(&schedule)?;
            let closing = next_closing(schedule.as_ref(), &now);
            println!("{}", render_instant(&UsLocaleFormatter, closing.as_ref()));
        }
        Command::Opening {
            schedule,
            anchor,
            clock,
        } => {
            let (tz, now) = clock.resolve(&config)?;
            let anchor = parse_instant(&anchor)?.with_timezone(&tz);
            let schedule = read_schedule(&schedule)?;
            let opening = next_opening(schedule.as_ref(), &anchor, &now);
            println!("{}", render_instant(&UsLocaleFormatter, opening.as_ref()));
        }
        Command::Window {
            donor,
            recipient,
            json,
            clock,
        } => {
            ensure!(
                donor != "-" || recipient != "-",
                "Only one of --donor and --recipient can read from stdin"
            );
            let (_, now) = clock.resolve(&config)?;
            let donor = read_schedule(&donor)?;
            let recipient = read_schedule(&recipient)?;
            let window = resolve_match_window(donor.as_ref(), recipient.as_ref(), &now);
            let display = format_window(&window, &UsLocaleFormatter);

            if json {
                let raw = |dt: Option<&DateTime<Tz>>| {
                    dt.map(|dt| render_instant(&Rfc3339Formatter, Some(dt)))
                };
                let out = serde_json::json!({
                    "donorClosing": raw(window.donor_closing.as_ref()),
                    "recipientOpening": raw(window.recipient_opening.as_ref()),
                    "actionable": window.is_actionable(),
                    "display": display,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("Donor closing:     {}", display.donor_closing);
                println!("Recipient opening: {}", display.recipient_opening);
            }
        }
        Command::Recent {
            tasks: source,
            user,
            limit,
            json,
        } => {
            let content = read_source(&source)
                .with_context(|| format!("Failed to read tasks file: {source}"))?;
            let tasks: Vec<AcceptedTask> = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse accepted tasks from {source}"))?;

            let ledger = InMemoryLedger::new();
            for task in &tasks {
                ledger.append_accepted(task)?;
            }
            let mut coordinator = Coordinator::from_config(ledger, &config);
            if let Some(limit) = limit {
                coordinator = coordinator.with_recent_task_limit(limit);
            }
            let recent = coordinator.recent_tasks(&user)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&recent)?);
            } else if recent.is_empty() {
                println!("No accepted tasks for {user}");
            } else {
                for task in &recent {
                    println!(
                        "{}  {} -> {}  closes {}, opens {}",
                        task.timestamp.to_rfc3339(),
                        task.donor_name,
                        task.recipient_name,
                        task.donor_closing_time,
                        task.recipient_open_time
                    );
                }
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn parse_instant(text: &str) -> Result<DateTime<Utc>> {
    parse_rfc3339(text).context("Expected an RFC 3339 datetime such as 2025-05-05T10:00:00Z")
}

fn read_source(source: &str) -> Result<String> {
    if source == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(source)?)
    }
}

fn read_schedule(source: &str) -> Result<Option<WeeklySchedule>> {
    let content = read_source(source)
        .with_context(|| format!("Failed to read schedule file: {source}"))?;
    let schedule = WeeklySchedule::from_json_str(&content)
        .with_context(|| format!("Failed to parse schedule from {source}"))?;
    if schedule.is_none() {
        tracing::info!(source, "no operating hours present");
    }
    Ok(schedule)
}
