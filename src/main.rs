//! Rootsolve - Arbitrary-Precision Root Finder
//!
//! Approximates a root of a single-variable function and writes the full
//! iteration table next to a one-line summary.
//!
//! # Usage
//!
//! ```bash
//! rootsolve bisection --expr "x - cos(x)" --xl 0 --xr 1
//! rootsolve newton-raphson --expr "exp(-x) - x" --derivative "-exp(-x) - 1" --x0 0
//! rootsolve batch demos/classic.toml
//! ```

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rootsolve_core::{
    error::Result, report::writer::DEFAULT_OUTPUT_DIR, solver, write_result, BatchPlan, Bracket,
    Decimal, Fx, IterationResult, RoundingMode, RunConfig,
};

/// Arbitrary-precision root finder
#[derive(Parser, Debug)]
#[command(name = "rootsolve")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log every iteration
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Bisection on f(x) = 0
    Bisection {
        #[command(flatten)]
        bracket: BracketArgs,
        #[command(flatten)]
        run: RunArgs,
    },

    /// False position (regula falsi) on f(x) = 0
    FalsePosition {
        #[command(flatten)]
        bracket: BracketArgs,
        #[command(flatten)]
        run: RunArgs,
    },

    /// Fixed-point iteration on x = g(x)
    FixedPoint {
        /// g(x)
        #[arg(long, allow_hyphen_values = true)]
        expr: String,
        /// Initial x (searched from 0 when omitted)
        #[arg(long, allow_hyphen_values = true)]
        x0: Option<Decimal>,
        #[command(flatten)]
        run: RunArgs,
    },

    /// Newton-Raphson on f(x) = 0
    NewtonRaphson {
        /// f(x)
        #[arg(long, allow_hyphen_values = true)]
        expr: String,
        /// f'(x)
        #[arg(long, allow_hyphen_values = true)]
        derivative: String,
        /// Initial x (searched from 0 when omitted)
        #[arg(long, allow_hyphen_values = true)]
        x0: Option<Decimal>,
        #[command(flatten)]
        run: RunArgs,
    },

    /// Secant on f(x) = 0
    Secant {
        /// f(x)
        #[arg(long, allow_hyphen_values = true)]
        expr: String,
        /// First seed
        #[arg(long, allow_hyphen_values = true)]
        xa: Option<Decimal>,
        /// Second seed
        #[arg(long, allow_hyphen_values = true)]
        xb: Option<Decimal>,
        #[command(flatten)]
        run: RunArgs,
    },

    /// Run every entry of a TOML plan
    Batch {
        /// Path to the plan file
        #[arg(value_name = "PLAN")]
        plan: PathBuf,
    },
}

#[derive(Args, Debug)]
struct BracketArgs {
    /// f(x)
    #[arg(long, allow_hyphen_values = true)]
    expr: String,
    /// Left end of the bracket
    #[arg(long, allow_hyphen_values = true, requires = "xr")]
    xl: Option<Decimal>,
    /// Right end of the bracket
    #[arg(long, allow_hyphen_values = true, requires = "xl")]
    xr: Option<Decimal>,
}

impl BracketArgs {
    fn bracket(&self) -> Option<Bracket> {
        self.xl.clone().zip(self.xr.clone()).map(Bracket::from)
    }
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Iterations before a zero error may stop the run
    #[arg(long, default_value_t = rootsolve_core::config::DEFAULT_MIN_ITERATIONS)]
    min_iterations: usize,
    /// Hard cap on iterations
    #[arg(long, default_value_t = rootsolve_core::config::DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,
    /// Digits kept in intermediate values
    #[arg(long, default_value_t = rootsolve_core::config::DEFAULT_CALCULATION_SCALE)]
    calculation_scale: u32,
    /// Digits kept in the table and the error metric
    #[arg(long, default_value_t = rootsolve_core::config::DEFAULT_OUTPUT_SCALE)]
    scale: u32,
    /// Rounding mode
    #[arg(long, value_enum, default_value_t = RoundingMode::HalfEven)]
    rounding: RoundingMode,
    /// Candidates tried when searching an initial guess
    #[arg(long, default_value_t = rootsolve_core::config::DEFAULT_MAX_GUESS_ATTEMPTS)]
    max_guess_attempts: usize,
    /// Integer steps tried when searching a bracket
    #[arg(long, default_value_t = rootsolve_core::config::DEFAULT_MAX_SCAN_STEPS)]
    max_scan_steps: usize,
    /// Directory the result table is written to
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,
}

impl RunArgs {
    fn config(&self) -> RunConfig {
        RunConfig::new()
            .with_min_iterations(self.min_iterations)
            .with_max_iterations(self.max_iterations)
            .with_calculation_scale(self.calculation_scale)
            .with_output_scale(self.scale)
            .with_rounding(self.rounding)
            .with_max_guess_attempts(self.max_guess_attempts)
            .with_max_scan_steps(self.max_scan_steps)
    }
}

fn report(result: &IterationResult, path: &Path) {
    println!("{}", result.summary());
    println!("{}", result.termination());
    println!("Answer written to {}", path.display());
}

fn solve_and_report(result: IterationResult, dir: &Path) -> Result<()> {
    let path = write_result(&result, dir)?;
    report(&result, &path);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbosity flag
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Bisection { bracket, run } => {
            let fx = Fx::parse(&bracket.expr)?;
            let result = solver::bisection(&fx, bracket.bracket(), &run.config())?;
            solve_and_report(result, &run.output_dir)
        }
        Commands::FalsePosition { bracket, run } => {
            let fx = Fx::parse(&bracket.expr)?;
            let result = solver::false_position(&fx, bracket.bracket(), &run.config())?;
            solve_and_report(result, &run.output_dir)
        }
        Commands::FixedPoint { expr, x0, run } => {
            let g = Fx::parse(&expr)?;
            let result = solver::fixed_point(&g, x0, &run.config())?;
            solve_and_report(result, &run.output_dir)
        }
        Commands::NewtonRaphson {
            expr,
            derivative,
            x0,
            run,
        } => {
            let f = Fx::parse(&expr)?;
            let df = Fx::parse(&derivative)?;
            let result = solver::newton_raphson(&f, &df, x0, &run.config())?;
            solve_and_report(result, &run.output_dir)
        }
        Commands::Secant { expr, xa, xb, run } => {
            let f = Fx::parse(&expr)?;
            let result = solver::secant(&f, xa, xb, &run.config())?;
            solve_and_report(result, &run.output_dir)
        }
        Commands::Batch { plan } => {
            let plan = BatchPlan::load(&plan)?;
            for (result, path) in plan.execute()? {
                report(&result, &path);
            }
            Ok(())
        }
    }
}
