use std::process::ExitCode;

use tracing::info;

use labgen::Maze;

/// Log to a file: stdout belongs to the maze itself.
fn init_logging() -> tracing_appender::non_blocking::WorkerGuard {
    let appender = tracing_appender::rolling::never(".", "labgen.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    guard
}

fn main() -> ExitCode {
    let _guard = init_logging();

    let mut args = std::env::args();
    args.next(); // Skip executable name
    let width = args.next().and_then(|s| s.parse::<i32>().ok()).unwrap_or(15);
    let height = args
        .next()
        .and_then(|s| s.parse::<i32>().ok())
        .unwrap_or(width);
    let seed = args.next().and_then(|s| s.parse::<u64>().ok());

    let mut maze = match Maze::new(width, height) {
        Ok(maze) => maze,
        Err(error) => {
            eprintln!("{error}");
            eprintln!("Usage: labgen [width] [height] [seed]");
            return ExitCode::FAILURE;
        }
    };

    let steps = maze.create_seeded(seed).count();
    info!("[main] generated a {}x{} maze in {} steps", width, height, steps);

    print!("{maze}");
    println!(
        "Generated a {width}x{height} maze in {steps} steps; the solution is {} cells long.",
        maze.solution().count()
    );
    ExitCode::SUCCESS
}
