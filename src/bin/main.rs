use std::path::PathBuf;

use anstream::eprintln;
use anstream::println;
use clap::Parser;
use hrsw::Stopwatch;
use human_duration::human_duration;
use owo_colors::OwoColorize;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;
use thiserror::Error;
use thousands::Separable;

use labyrinth::algorithms::bfs::count_reachable_states;
use labyrinth::problems::generator::GeneratorError;
use labyrinth::problems::generator::generate;
use labyrinth::problems::maze::Maze;
use labyrinth::problems::maze_file;
use labyrinth::problems::maze_file::MazeFileError;
use labyrinth::search::State;
use labyrinth::solver::SearchLimits;
use labyrinth::solver::SearchOutcome;
use labyrinth::solver::Strategy;

/// Memory the reachable-state count may take without `--count-limit`.
const COUNT_MEMORY_BUDGET: usize = 256 * 1024 * 1024;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(long_version = labyrinth::build::CLAP_LONG_VERSION)]
#[command(version, about = "Finds a way through a maze", long_about = None)]
pub struct Args {
    /// Maze definition to solve (JSON)
    #[arg(required_unless_present = "generate", conflicts_with = "generate")]
    pub maze: Option<PathBuf>,

    /// Generate a random SIZExSIZE maze instead, SIZE has to be odd
    #[arg(short, long, value_name = "SIZE")]
    pub generate: Option<usize>,
    #[arg(long, env = "LABYRINTH_SEED", default_value_t = 0u64)]
    pub seed: u64,

    /// Write the maze to a JSON definition before solving it
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,

    #[arg(short, long, value_enum, env = "LABYRINTH_STRATEGY", default_value = "astar")]
    pub strategy: Strategy,

    /// Print every state as it gets expanded
    #[arg(short, long)]
    pub verbose: bool,

    /// Give up after expanding this many states
    #[arg(long, env = "LABYRINTH_MAX_ITERATIONS")]
    pub max_iterations: Option<usize>,

    /// Stop counting reachable states after storing this many [default: as
    /// many as fit in 256 MiB]
    #[arg(long, env = "LABYRINTH_COUNT_LIMIT")]
    pub count_limit: Option<usize>,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

#[derive(Debug, Error)]
enum InputError {
    #[error(transparent)]
    File(#[from] MazeFileError),
    #[error(transparent)]
    Generator(#[from] GeneratorError),
}

fn read_maze(args: &Args) -> Result<Maze, InputError> {
    let maze = match (&args.maze, args.generate) {
        (Some(path), _) => maze_file::load(path)?,
        (None, Some(size)) => {
            let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
            generate(size, &mut rng)?
        }
        (None, None) => unreachable!("clap requires a maze or --generate"),
    };
    if let Some(path) = &args.save {
        maze_file::save(&maze, path)?;
        println!("Saved maze to {:?}", path.yellow());
    }
    Ok(maze)
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    args.color.write_global();
    env_logger::init_from_env(
        env_logger::Env::new()
            .filter("LABYRINTH_LOG")
            .write_style("LABYRINTH_LOG_STYLE"),
    );

    let maze = match read_maze(&args) {
        Ok(maze) => maze,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            std::process::exit(1);
        }
    };
    let (rows, cols) = maze.dimensions();
    println!("{} ({rows}x{cols})\n{maze}", "Maze".bold());

    let limits = args
        .max_iterations
        .map(SearchLimits::with_max_iterations)
        .unwrap_or_default();
    let mut solver = args.strategy.solver(limits);
    let root = State::root(maze.clone());

    let separator = "=".repeat(cols.max(1));
    let mut stopwatch = Stopwatch::new_started();
    let result = if args.verbose {
        solver.solve_observed(root, &mut |s: &State| {
            println!("{}\n{s}\n{}", separator.dimmed(), s.maze());
        })
    } else {
        solver.solve(root, false)
    };
    stopwatch.stop();
    if args.verbose {
        println!("{}", separator.dimmed());
    }
    let elapsed = stopwatch.elapsed();
    println!(
        "{} took {}",
        solver.name().cyan(),
        human_duration(&elapsed).yellow()
    );

    let SearchOutcome::Found {
        terminal,
        iterations,
        explored,
    } = result.outcome()
    else {
        println!("{}", "There is no way".red().bold());
        return Ok(());
    };

    let terminal = &result.tree()[terminal];
    println!("{} ({terminal})\n{}", "Solution".green().bold(), terminal.maze());
    println!("Iterations:   {}", iterations.separate_with_commas());
    println!("Dead ends:    {}", maze.dead_ends().separate_with_commas());
    let count_limit = args
        .count_limit
        .unwrap_or_else(|| COUNT_MEMORY_BUDGET / State::memory_size(&maze));
    match count_reachable_states(State::root(maze), count_limit) {
        Some(total) => println!("Total states: {}", total.separate_with_commas()),
        None => println!(
            "Total states: unknown, gave up after storing {}",
            count_limit.separate_with_commas()
        ),
    }
    println!("Stored:       {}", explored.separate_with_commas());

    let path: Vec<String> = result.path_coords().iter().map(|c| c.to_string()).collect();
    println!("Path ({} moves): {}", terminal.generation(), path.join(" -> "));

    result.print_memory_stats()
}
