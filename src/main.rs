mod solutions;

use std::{
    env,
    fmt::Display,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use solutions::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let [_, path] = args.as_slice() else {
        eprintln!("usage: aoc2021 <input-file>");
        return Ok(());
    };

    let input = load_input(path)?;
    execute_day(16, day16, input.as_str())?;
    Ok(())
}

fn format_duration(dur: Duration) -> String {
    if dur.as_millis() != 0 {
        format!("{} ms", dur.as_millis())
    } else {
        format!("{} us", dur.as_micros())
    }
}

fn load_input(path: &str) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read input {}", path))
}

fn execute_day<I: ?Sized, S: Display, T: Display>(
    n: usize,
    f: fn(&I) -> Result<(S, T)>,
    input: &I,
) -> Result<Duration> {
    println!("Day {}:", n);

    let start = Instant::now();
    let (part1, part2) = f(input)?;
    let elapsed = start.elapsed();

    println!("  Part 1: {}", part1);
    println!("  Part 2: {}", part2);
    println!("  Finished in {}", format_duration(elapsed));
    println!("---------------------");
    Ok(elapsed)
}
