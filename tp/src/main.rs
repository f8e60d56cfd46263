//! Trip planner CLI
//!
//! Generates itineraries through the configured LLM and converts plans to and
//! from share links.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result, eyre};
use tracing::{debug, info};

use tripplanner::cli::{Cli, Command, OutputFormat, PlanArgs, ShareCommand, get_log_path};
use tripplanner::config::Config;
use tripplanner::domain::{Severity, TripPlanResponse};
use tripplanner::llm::create_client;
use tripplanner::planner::TripPlanner;
use tripplanner::schema::trip_plan_json_schema;
use tripplanner::session::{PlanSession, PlanSummary, SubmitError};
use tripplanner::share::{extract_data_param, share_url, try_decode};
use tripplanner::store::PlanStore;

fn setup_logging(cli_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_path = get_log_path();
    let log_dir = log_path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let level = match cli_log_level.map(|s| s.to_uppercase()) {
        None => tracing::Level::INFO,
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Plan(args) => {
            debug!("main: matched Plan command");
            cmd_plan(&config, &args).await
        }
        Command::Schema => {
            debug!("main: matched Schema command");
            cmd_schema()
        }
        Command::Share { command } => match command {
            ShareCommand::Encode { file } => {
                debug!(?file, "main: matched ShareCommand::Encode");
                cmd_share_encode(&config, file.as_deref())
            }
            ShareCommand::Decode { input, format } => {
                debug!(?format, "main: matched ShareCommand::Decode");
                cmd_share_decode(&input, format)
            }
        },
    }
}

async fn cmd_plan(config: &Config, args: &PlanArgs) -> Result<()> {
    debug!("cmd_plan: called");
    config.validate()?;

    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let planner = TripPlanner::new(llm).with_max_tokens(config.llm.max_tokens);
    let session = PlanSession::new(planner, PlanStore::spawn());

    eprintln!("{} Generating plan with {}...", "→".cyan(), config.llm.resolved_model());
    let plan = match session.submit(&args.to_form()).await {
        Ok(plan) => plan,
        Err(SubmitError::Invalid(errors)) => {
            for error in &errors.errors {
                eprintln!("{} {}: {}", "✗".red(), error.field, error.message);
            }
            return Err(eyre!("Invalid plan request"));
        }
        Err(e) => return Err(e.into()),
    };

    print_plan(&plan, args.format)?;

    if args.share {
        let url = share_url(&config.share, &plan)?;
        println!();
        println!("{} {}", "Share:".bold(), url);
    }
    Ok(())
}

fn cmd_schema() -> Result<()> {
    debug!("cmd_schema: called");
    let format = trip_plan_json_schema();
    println!("{}", serde_json::to_string_pretty(&format.schema)?);
    Ok(())
}

fn cmd_share_encode(config: &Config, file: Option<&Path>) -> Result<()> {
    debug!(?file, "cmd_share_encode: called");
    let json = match file {
        Some(path) => fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("Failed to read stdin")?;
            buf
        }
    };
    let plan: TripPlanResponse = serde_json::from_str(&json).context("Input is not a trip-plan.v3 response")?;
    plan.validate_structure()?;

    println!("{}", share_url(&config.share, &plan)?);
    Ok(())
}

fn cmd_share_decode(input: &str, format: OutputFormat) -> Result<()> {
    debug!("cmd_share_decode: called");
    let data = extract_data_param(input).ok_or_else(|| eyre!("No `data` parameter in {}", input))?;
    let plan = try_decode(&data).context("Not a valid share link")?;
    print_plan(&plan, format)
}

fn print_plan(plan: &TripPlanResponse, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(plan)?);
        return Ok(());
    }

    let summary = PlanSummary::from(plan);
    println!("{}", summary.title.bold());
    println!(
        "{} 〜 {}  {} {}  ({})",
        summary.start_date, summary.end_date, summary.start_location, summary.start_time, summary.base_stay
    );
    let feasibility = if summary.is_feasible {
        "feasible".green()
    } else {
        "not feasible".red()
    };
    println!("{}: {}", feasibility, summary.feasibility_summary);

    for variant in &plan.plans {
        println!();
        println!("{} {}", format!("[{}]", variant.id).cyan(), variant.title.bold());
        if !variant.rationale.is_empty() {
            println!("  {}", variant.rationale.dimmed());
        }
        if !variant.excluded_spots.is_empty() {
            println!("  {} {}", "excluded:".yellow(), variant.excluded_spots.join(", "));
        }
        for day in &variant.plan.days {
            println!("  {} {} {}", format!("Day {}", day.day_number).bold(), day.date, day.theme);
            for item in &day.items {
                println!("    {}-{}  {:<6} {}", item.start_time, item.end_time, item.kind, item.name);
            }
        }
    }

    if !plan.issues.is_empty() {
        println!();
        for issue in &plan.issues {
            let label = match issue.severity {
                Severity::Critical => issue.severity.as_str().red(),
                Severity::Warning => issue.severity.as_str().yellow(),
                Severity::Info => issue.severity.as_str().normal(),
            };
            println!("{} [{}] {}", label, issue.kind, issue.description);
        }
    }
    Ok(())
}
