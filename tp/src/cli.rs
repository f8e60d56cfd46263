//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::domain::{Pace, SpotPriority, TransportMode};
use crate::form::{PlanForm, SpotField};

/// Trip planner - AI travel itinerary generator
#[derive(Parser)]
#[command(
    name = "tp",
    about = "Generate day-by-day travel itineraries and shareable plan links",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a plan
    Plan(PlanArgs),

    /// Print the JSON Schema the model output must follow
    Schema,

    /// Encode or decode share links
    Share {
        #[command(subcommand)]
        command: ShareCommand,
    },
}

/// Share subcommands
#[derive(Debug, Subcommand)]
pub enum ShareCommand {
    /// Encode a plan JSON file (stdin when omitted) into a share URL
    Encode {
        /// Plan JSON file
        file: Option<PathBuf>,
    },

    /// Decode a share URL or data value and print the plan
    Decode {
        /// Share URL, query string or raw data value
        #[arg(value_name = "DATA|URL")]
        input: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

/// Arguments for `tp plan`
#[derive(Debug, clap::Args)]
pub struct PlanArgs {
    /// First day (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub start_date: Option<String>,

    /// Last day (YYYY-MM-DD), defaults to the start date
    #[arg(long)]
    pub end_date: Option<String>,

    /// Departure point
    #[arg(short, long)]
    pub departure: String,

    /// Departure time (HH:MM)
    #[arg(long, default_value = crate::form::DEFAULT_DEPARTURE_TIME)]
    pub departure_time: String,

    /// Hotel or base for the stay
    #[arg(short, long)]
    pub base_stay: String,

    /// Spot to visit, as NAME or NAME:must / NAME:nice (repeatable)
    #[arg(short, long = "spot", value_name = "NAME[:must|nice]", value_parser = parse_spot, required = true)]
    pub spots: Vec<SpotField>,

    /// Final destination, defaults to returning to the departure point
    #[arg(long)]
    pub end_location: Option<String>,

    /// Latest arrival time (HH:MM)
    #[arg(long)]
    pub end_time: Option<String>,

    /// car, transit or walk
    #[arg(short, long, default_value = "transit")]
    pub transport: TransportMode,

    /// relaxed, normal or packed
    #[arg(short, long, default_value = "normal")]
    pub pace: Pace,

    /// Also print a share URL
    #[arg(long)]
    pub share: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

impl PlanArgs {
    /// Fill a form the same way a user would
    pub fn to_form(&self) -> PlanForm {
        debug!(spots = self.spots.len(), "PlanArgs::to_form: called");
        let defaults = PlanForm::default();
        let start_date = self.start_date.clone().unwrap_or(defaults.start_date);
        let end_date = self.end_date.clone().unwrap_or_else(|| start_date.clone());
        PlanForm {
            start_date,
            end_date,
            departure: self.departure.clone(),
            departure_time: self.departure_time.clone(),
            base_stay: self.base_stay.clone(),
            spots: self.spots.clone(),
            end_location: self.end_location.clone().unwrap_or_default(),
            end_time: self.end_time.clone().unwrap_or_default(),
            transport_mode: self.transport,
            pace: self.pace,
        }
    }
}

/// Parse `NAME`, `NAME:must` or `NAME:nice`
///
/// A suffix that is not a priority stays part of the name.
pub fn parse_spot(s: &str) -> Result<SpotField, String> {
    debug!(%s, "parse_spot: called");
    if let Some((name, suffix)) = s.rsplit_once(':')
        && let Ok(priority) = suffix.parse::<SpotPriority>()
    {
        return Ok(SpotField::new(name.trim(), priority));
    }
    Ok(SpotField::new(s.trim(), SpotPriority::Must))
}

/// Output format for plan output
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use text or json", s)),
        }
    }
}

/// Where `setup_logging` writes
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tripplanner")
        .join("logs")
        .join("tripplanner.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spot() {
        assert_eq!(parse_spot("首里城公園").unwrap(), SpotField::new("首里城公園", SpotPriority::Must));
        assert_eq!(parse_spot("美ら海水族館:nice").unwrap(), SpotField::new("美ら海水族館", SpotPriority::Nice));
        assert_eq!(parse_spot("清水寺:MUST").unwrap(), SpotField::new("清水寺", SpotPriority::Must));
        assert_eq!(parse_spot("Gate:9").unwrap(), SpotField::new("Gate:9", SpotPriority::Must));
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("plain".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("table".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_plan_args_to_form() {
        let cli = Cli::parse_from([
            "tp",
            "plan",
            "--start-date",
            "2026-01-21",
            "--departure",
            "那覇空港",
            "--base-stay",
            "オリオンホテル",
            "--spot",
            "首里城公園:must",
            "--spot",
            "国際通り:nice",
            "--transport",
            "car",
        ]);
        let Command::Plan(args) = cli.command else {
            panic!("expected plan command");
        };
        let form = args.to_form();

        assert_eq!(form.start_date, "2026-01-21");
        assert_eq!(form.end_date, "2026-01-21");
        assert_eq!(form.departure_time, "09:00");
        assert_eq!(form.spots.len(), 2);
        assert_eq!(form.spots[1].priority, SpotPriority::Nice);
        assert_eq!(form.transport_mode, TransportMode::Car);
        assert_eq!(form.pace, Pace::Normal);
        assert!(form.end_location.is_empty());
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_cli_verifies() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
