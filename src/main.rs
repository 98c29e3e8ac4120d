use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

use tutorial_lp::linprog::LinprogOptions;
use tutorial_lp::mip::BranchAndBound;
use tutorial_lp::model::Category;
use tutorial_lp::problem::{Method, SolverOptions};
use tutorial_lp::tutorial;

/// Solves the resource allocation tutorial problem.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Solve the problem stated as coefficient arrays (the default)
    Arrays {
        #[arg(long, value_enum, default_value_t = Algorithm::Simplex)]
        method: Algorithm,
        /// Iteration budget of the LP solver
        #[arg(long, default_value_t = SolverOptions::default().max_iter)]
        max_iter: usize,
    },
    /// Solve the problem stated as a named model
    Model {
        /// Method used for the relaxations inside branch-and-bound
        #[arg(long, value_enum, default_value_t = Algorithm::Simplex)]
        solver: Algorithm,
        /// Restrict x to integer values
        #[arg(long)]
        integer: bool,
        /// Print the model before solving it
        #[arg(long)]
        show: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    Simplex,
    Interior,
}

impl From<Algorithm> for Method {
    fn from(algorithm: Algorithm) -> Method {
        match algorithm {
            Algorithm::Simplex => Method::Simplex,
            Algorithm::Interior => Method::Interior,
        }
    }
}

fn setup_logger(log_level: LevelFilter) -> Result<(), fern::InitError> {
    use fern::colors::{Color, ColoredLevelConfig};
    let colors = ColoredLevelConfig::new()
        .debug(Color::White)
        .info(Color::Green)
        .warn(Color::BrightYellow)
        .error(Color::BrightRed);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} | {:5} | {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.6f"),
                colors.color(record.level()),
                message
            ))
        })
        .level(log_level)
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}

fn solve_arrays(method: Algorithm, max_iter: usize) -> Result<(), anyhow::Error> {
    let options = LinprogOptions {
        method: method.into(),
        solver: SolverOptions { max_iter, ..SolverOptions::default() },
    };
    let result = tutorial::solve_arrays(&options)?;
    println!("{}", result);
    Ok(())
}

fn solve_model(solver: Algorithm, integer: bool, show: bool) -> Result<(), anyhow::Error> {
    let category = if integer { Category::Integer } else { Category::Continuous };
    let mut model = tutorial::model(category)?;
    if show {
        println!("{}", model);
    }

    let status = model.solve_with(&BranchAndBound::new(solver.into()))?;
    println!("status: {}, {}", status.code(), status);
    if let Some(objective) = model.objective_value() {
        println!("objective: {}", objective);
    }
    for (name, value) in model.variables() {
        if let Some(value) = value {
            println!("{}: {}", name, value);
        }
    }
    for (name, value) in model.constraint_values().unwrap_or_default() {
        println!("{}: {}", name, value);
    }
    Ok(())
}

fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    let log_level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    setup_logger(log_level)?;

    match args.command {
        None => solve_arrays(Algorithm::Simplex, SolverOptions::default().max_iter),
        Some(Command::Arrays { method, max_iter }) => solve_arrays(method, max_iter),
        Some(Command::Model { solver, integer, show }) => solve_model(solver, integer, show),
    }
}
