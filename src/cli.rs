use chrono::Local;
use clap::{Args, Parser, Subcommand};
use clubroster::allocation::{rank, AllocationEngine, PriorityOverrides};
use clubroster::config::{AllocationRules, AppConfig};
use clubroster::error::AppError;
use clubroster::report::{self, RosterSummary};
use clubroster::{generator, intake, telemetry};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "clubroster",
    about = "Allocate pupils to after-school clubs from ranked preference submissions",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run an allocation over a request export and write the rosters
    Allocate(AllocateArgs),
    /// Generate a synthetic request export for testing
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
pub(crate) struct AllocateArgs {
    /// CSV export of ranked club requests
    requests: PathBuf,
    /// Optional list of pupil names whose submissions are re-timestamped to now
    #[arg(long)]
    priority: Option<PathBuf>,
    /// Output path for the per-pupil allocation CSV
    #[arg(long, default_value = "pupils.csv")]
    pupils_out: PathBuf,
    /// Output path for the per-club roster CSV
    #[arg(long, default_value = "clubs.csv")]
    clubs_out: PathBuf,
    /// Print the roster summary as JSON instead of text
    #[arg(long)]
    summary_json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct GenerateArgs {
    /// Number of synthetic responses to produce
    count: usize,
    /// Output path for the generated CSV
    #[arg(long, default_value = "data.csv")]
    out: PathBuf,
    /// RNG seed for reproducible data
    #[arg(long)]
    seed: Option<u64>,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Allocate(args) => run_allocate(args, &config.rules),
        Command::Generate(args) => run_generate(args),
    }
}

fn run_allocate(args: AllocateArgs, rules: &AllocationRules) -> Result<(), AppError> {
    let mut submissions = intake::read_submissions_from_path(&args.requests, rules)?;
    let overrides = match &args.priority {
        Some(path) => intake::read_priority_list_from_path(path)?,
        None => PriorityOverrides::default(),
    };

    overrides.apply(&mut submissions, Local::now().naive_local());
    rank(&mut submissions);

    let engine = AllocationEngine::new(rules.clone());
    let outcome = engine.run(submissions);

    report::write_pupils(File::create(&args.pupils_out)?, &outcome.submissions)?;
    report::write_clubs(File::create(&args.clubs_out)?, &outcome.ledger)?;
    tracing::info!(
        pupils = %args.pupils_out.display(),
        clubs = %args.clubs_out.display(),
        "wrote allocation reports"
    );

    let summary = RosterSummary::from_ledger(&outcome.ledger, rules);
    if args.summary_json {
        let rendered = serde_json::to_string_pretty(&summary)
            .map_err(clubroster::report::ReportError::from)?;
        println!("{rendered}");
    } else {
        print!("{}", summary.render_text());
    }
    Ok(())
}

fn run_generate(args: GenerateArgs) -> Result<(), AppError> {
    let base = Local::now().naive_local();
    generator::write_rows(File::create(&args.out)?, args.count, args.seed, base)?;
    tracing::info!(count = args.count, out = %args.out.display(), "wrote synthetic request data");
    Ok(())
}
