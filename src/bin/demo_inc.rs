use std::env;

use anyhow::Context;

use approx_pi::cli::{self, IncrementArgs};
use approx_pi::{increment, timing};

fn main() -> anyhow::Result<()> {
    let args: IncrementArgs = cli::parse_or_exit(env::args_os(), cli::INCREMENT_USAGE);
    cli::init_tracing(false);

    print!("{}", cli::increment_preamble(args.n_iters, args.n_threads));

    let (value, elapsed) = timing::measure(|| increment::calculate(args.n_iters, args.n_threads))
        .context("timing the reduction")?;

    print!("{}", cli::increment_report(value, &elapsed));
    Ok(())
}
