use std::env;

use anyhow::Context;
use tracing::info;

use approx_pi::cli::{self, SamplerArgs};
use approx_pi::timing;

fn main() -> anyhow::Result<()> {
    let args: SamplerArgs = cli::parse_or_exit(env::args_os(), cli::SAMPLER_USAGE);
    let config = args.config();
    cli::init_tracing(config.debug);

    if config.debug {
        print!("{}", cli::sampler_preamble(args.n_points, args.n_threads));
    }
    info!(generator = ?config.generator, mode = ?config.mode, "estimating pi");

    let sampler = config.sampler();
    let (pi, elapsed) = timing::measure(|| sampler.estimate(args.n_points, args.n_threads))
        .context("timing the estimate")?;

    print!("{}", cli::sampler_report(&config, args.n_points, args.n_threads, &elapsed, pi));
    Ok(())
}
