use ah_core::units::{as_kpa, constants::pressure_at_altitude};
use ah_process::{AirflowBalance, Process};
use ah_project::{EvaluateOptions, Evaluation, ProjectError, design_points, evaluate};
use ah_psychro::{
    PropertyCalculator, PsychroError, PsychrometricConstants, ResolveOptions, Season, StateInput,
    StatePoint, StatePointResolver,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Psychro(#[from] PsychroError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "ah-cli")]
#[command(about = "AirHandler CLI - Psychrometric state points and air-handling processes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate design document syntax and references
    Validate {
        /// Path to the design document (YAML or JSON)
        doc_path: PathBuf,
    },
    /// Evaluate the state points and processes of one season
    Evaluate {
        /// Path to the design document (YAML or JSON)
        doc_path: PathBuf,
        #[arg(long, value_enum)]
        season: SeasonArg,
        /// Back-solve the wet bulb of every point
        #[arg(long)]
        wet_bulb: bool,
        /// Print the evaluation as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve a single state point
    Point(PointArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum SeasonArg {
    Summer,
    Winter,
}

impl From<SeasonArg> for Season {
    fn from(s: SeasonArg) -> Self {
        match s {
            SeasonArg::Summer => Season::Summer,
            SeasonArg::Winter => Season::Winter,
        }
    }
}

#[derive(Args)]
struct PointArgs {
    /// Dry-bulb temperature [°C]
    #[arg(long, allow_negative_numbers = true)]
    dry_bulb: f64,
    #[command(flatten)]
    second: SecondProperty,
    /// Atmospheric pressure [kPa]
    #[arg(long, conflicts_with = "altitude")]
    pressure: Option<f64>,
    /// Site elevation [m]
    #[arg(long, allow_negative_numbers = true)]
    altitude: Option<f64>,
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct SecondProperty {
    /// Relative humidity [%]
    #[arg(long)]
    rh: Option<f64>,
    /// Wet-bulb temperature [°C]
    #[arg(long, allow_negative_numbers = true)]
    wet_bulb: Option<f64>,
    /// Humidity ratio [kg/kg']
    #[arg(long)]
    humidity: Option<f64>,
    /// Specific enthalpy [kJ/kg']
    #[arg(long, allow_negative_numbers = true)]
    enthalpy: Option<f64>,
}

impl PointArgs {
    fn input(&self) -> StateInput {
        let dry_bulb = self.dry_bulb;
        let s = &self.second;
        if let Some(relative_humidity) = s.rh {
            StateInput::DryBulbRh {
                dry_bulb,
                relative_humidity,
            }
        } else if let Some(wet_bulb) = s.wet_bulb {
            StateInput::DryBulbWetBulb { dry_bulb, wet_bulb }
        } else if let Some(humidity) = s.humidity {
            StateInput::DryBulbHumidity { dry_bulb, humidity }
        } else {
            // clap guarantees one of the four
            StateInput::DryBulbEnthalpy {
                dry_bulb,
                enthalpy: s.enthalpy.unwrap_or_default(),
            }
        }
    }
}

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { doc_path } => cmd_validate(&doc_path),
        Commands::Evaluate {
            doc_path,
            season,
            wet_bulb,
            json,
        } => cmd_evaluate(&doc_path, season.into(), wet_bulb, json),
        Commands::Point(args) => cmd_point(&args),
    }
}

fn cmd_validate(doc_path: &Path) -> CliResult<()> {
    println!("Validating design document: {}", doc_path.display());
    let doc = ah_project::load(doc_path)?;
    println!("✓ Document is valid");
    println!(
        "  {} state points, {} processes, {} air streams",
        doc.state_points.len(),
        doc.processes.len(),
        doc.air_streams.len()
    );
    Ok(())
}

fn cmd_evaluate(doc_path: &Path, season: Season, wet_bulb: bool, json: bool) -> CliResult<()> {
    let doc = ah_project::load(doc_path)?;
    tracing::debug!(path = %doc_path.display(), points = doc.state_points.len(), "loaded design document");
    let eval = evaluate(&doc, season, &EvaluateOptions { wet_bulb })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&eval)?);
        return Ok(());
    }

    println!("{} - {} design", doc.name, season.label());
    println!("  pressure = {:.3} kPa", eval.pressure);
    if let Some(points) = design_points(&doc, season)? {
        println!("\nDesign conditions:");
        print_point_row(&points.outdoor);
        print_point_row(&points.indoor);
    }
    print_evaluation(&eval);
    Ok(())
}

fn cmd_point(args: &PointArgs) -> CliResult<()> {
    let constants = PsychrometricConstants::standard();
    let pressure = match (args.pressure, args.altitude) {
        (Some(p), _) => p,
        (None, Some(z)) => as_kpa(pressure_at_altitude(z)),
        (None, None) => constants.standard_pressure,
    };
    let calc = PropertyCalculator::new(&constants, pressure)?;
    let resolver = StatePointResolver::new(calc);
    let resolved = resolver.resolve_input("point", args.input(), ResolveOptions::with_wet_bulb())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&resolved.point)?);
    } else {
        println!("pressure = {:.3} kPa", pressure);
        print_point_details(&resolved.point);
    }
    Ok(())
}

fn print_evaluation(eval: &Evaluation) {
    println!("\nState points:");
    println!(
        "  {:<16} {:>8} {:>8} {:>10} {:>8} {:>8} {:>8}",
        "id", "t [°C]", "RH [%]", "W [kg/kg]", "h", "dew", "v"
    );
    for point in &eval.state_points {
        print_point_row(point);
    }

    if !eval.processes.is_empty() {
        println!("\nProcesses:");
        for process in &eval.processes {
            print_process(process);
        }
    }

    if let Some(balance) = &eval.balance {
        print_balance(balance);
    }
    for message in &eval.mass_flow_errors {
        println!("  ✗ {}", message);
    }

    if !eval.diagnostics.is_empty() {
        println!("\nWarnings:");
        for diag in &eval.diagnostics {
            println!("  ! {}", diag);
        }
    }
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "-".to_string(),
    }
}

fn print_point_row(point: &StatePoint) {
    let p = &point.properties;
    println!(
        "  {:<16} {:>8} {:>8} {:>10} {:>8} {:>8} {:>8}",
        point.id,
        fmt_opt(p.dry_bulb, 2),
        fmt_opt(p.relative_humidity, 1),
        fmt_opt(p.humidity, 5),
        fmt_opt(p.enthalpy, 2),
        fmt_opt(p.dew_point, 2),
        fmt_opt(p.specific_volume, 4),
    );
}

fn print_point_details(point: &StatePoint) {
    let p = &point.properties;
    let rows = [
        ("dry bulb", p.dry_bulb, "°C", 2),
        ("wet bulb", p.wet_bulb, "°C", 2),
        ("relative humidity", p.relative_humidity, "%", 2),
        ("humidity ratio", p.humidity, "kg/kg'", 6),
        ("enthalpy", p.enthalpy, "kJ/kg'", 3),
        ("dew point", p.dew_point, "°C", 2),
        ("specific volume", p.specific_volume, "m³/kg'", 4),
    ];
    for (label, value, unit, precision) in rows {
        println!("  {:<18} {:>12} {}", label, fmt_opt(value, precision), unit);
    }
}

fn print_process(process: &Process) {
    let r = process.results.unwrap_or_default();
    println!(
        "  {:<16} {:<14} {} -> {}",
        process.id,
        process.kind.label(),
        process.from,
        process.to
    );
    let mut parts = Vec::new();
    if let Some(q) = r.sensible_heat {
        parts.push(format!("Qs={:.2} kW", q));
    }
    if let Some(q) = r.latent_heat {
        parts.push(format!("Ql={:.2} kW", q));
    }
    if let Some(q) = r.total_heat {
        parts.push(format!("Qt={:.2} kW", q));
    }
    if let Some(dt) = r.temperature_diff {
        parts.push(format!("dT={:.2} K", dt));
    }
    if let Some(dw) = r.humidity_diff {
        parts.push(format!("dW={:.5}", dw));
    }
    if let Some(m) = r.mass_flow {
        parts.push(format!("m={:.3} kg/s", m));
    }
    if let Some(w) = r.water_flow {
        parts.push(format!("water={:.1} L/min", w));
    }
    if !parts.is_empty() {
        println!("    {}", parts.join("  "));
    }
}

fn print_balance(balance: &AirflowBalance) {
    println!("\nAirflow balance:");
    println!(
        "  supply {:.0}  exhaust {:.0}  intake {:.0}  return {:.0} m³/h",
        balance.total_supply, balance.total_exhaust, balance.total_intake, balance.total_return
    );
    if balance.balanced {
        println!("  ✓ balanced");
    }
    for message in &balance.errors {
        println!("  ✗ {}", message);
    }
    for message in &balance.warnings {
        println!("  ! {}", message);
    }
}
