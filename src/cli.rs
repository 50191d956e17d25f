//! Command-line surface shared by the two binaries: argument parsing, run
//! configuration, usage text and report formatting.

use std::ffi::OsString;
use std::fmt::Write as _;
use std::io;
use std::process;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::monte_carlo::{ExecutionMode, Sampler};
use crate::rng::GeneratorKind;
use crate::timing::Elapsed;

pub const SAMPLER_USAGE: &str = "\
Usage: approx-pi [-s] [-d] [-g generator] [-p] [--seed seed] nPoints nThreads
        -d: Enable debugging, more info is printed on the screen.
        -s: Silent mode, just print numbers with no explanation
            of their meaning.
        -g: Random generator: library (default), rotate, additive or wyhash.
            Also read from APPROX_PI_GENERATOR.
        -p: Split the points across nThreads workers.
    --seed: Fixed generator seed instead of one derived from time.
   nPoints: The total number of points to be used in the simulation
            (to be divided by the working threads).
  nThreads: The number of working threads.";

pub const INCREMENT_USAGE: &str = "\
Usage: demo-inc nIters nThreads
    nIters: The total number of iterations.
  nThreads: The number of working threads.";

#[derive(Debug, Parser)]
#[command(name = "approx-pi", disable_help_flag = true, disable_version_flag = true)]
pub struct SamplerArgs {
    #[arg(short = 's')]
    pub silent: bool,

    #[arg(short = 'd')]
    pub debug: bool,

    #[arg(short = 'g', long, value_enum, env = "APPROX_PI_GENERATOR", default_value_t = GeneratorKind::Library)]
    pub generator: GeneratorKind,

    #[arg(short = 'p', long)]
    pub partitioned: bool,

    #[arg(long)]
    pub seed: Option<u32>,

    #[arg(value_name = "nPoints", allow_negative_numbers = true)]
    pub n_points: i64,

    #[arg(value_name = "nThreads", allow_negative_numbers = true)]
    pub n_threads: i32,
}

impl SamplerArgs {
    pub fn config(&self) -> SamplerConfig {
        SamplerConfig {
            silent: self.silent,
            debug: self.debug,
            generator: self.generator,
            mode: if self.partitioned {
                ExecutionMode::Partitioned
            } else {
                ExecutionMode::Sequential
            },
            seed: self.seed,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "demo-inc", disable_help_flag = true, disable_version_flag = true)]
pub struct IncrementArgs {
    #[arg(value_name = "nIters", allow_negative_numbers = true)]
    pub n_iters: i64,

    #[arg(value_name = "nThreads", allow_negative_numbers = true)]
    pub n_threads: i32,
}

/// Output and generator settings for one sampler run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SamplerConfig {
    pub silent: bool,
    pub debug: bool,
    pub generator: GeneratorKind,
    pub mode: ExecutionMode,
    pub seed: Option<u32>,
}

impl SamplerConfig {
    pub fn sampler(&self) -> Sampler {
        let sampler = Sampler::new(self.generator).with_mode(self.mode);
        match self.seed {
            Some(seed) => sampler.with_seed(seed),
            None => sampler,
        }
    }
}

/// Parses `args` or prints `usage` to stdout and exits with status 1.
pub fn parse_or_exit<P, I, T>(args: I, usage: &str) -> P
where
    P: Parser,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match P::try_parse_from(args) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::debug!(error = %err, "rejected command line");
            println!("{usage}");
            process::exit(1);
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides the default level.
pub fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

pub fn sampler_preamble(n_points: i64, n_threads: i32) -> String {
    format!(" nPoints: {n_points}\nnThreads: {n_threads}\n")
}

pub fn sampler_report(config: &SamplerConfig, n_points: i64, n_threads: i32, elapsed: &Elapsed, pi: f64) -> String {
    let real = elapsed.real.as_secs_f64();
    let cpu = elapsed.cpu.as_secs_f64();
    let mut out = String::new();

    if config.silent {
        if config.debug {
            out.push_str("nPnt\tnThr\tReal\tCPU\tπ\n");
        }
        let _ = writeln!(out, "{n_points}\t{n_threads}\t{real:.6}\t{cpu:.6}\t{pi:.9}");
    } else {
        let _ = write!(out, "\nπ: {pi:.9}\n\n");
        let _ = writeln!(out, "Real Time:\t{real:.6}");
        let _ = writeln!(out, " CPU Time:\t{cpu:.6}");
    }

    out
}

pub fn increment_preamble(n_iters: i64, n_threads: i32) -> String {
    format!(" nIters: {n_iters}\nnThreads: {n_threads}\n")
}

pub fn increment_report(value: i64, elapsed: &Elapsed) -> String {
    format!(
        "\nOutput value: {:.9}\n\nReal Time:\t{:.6}\n CPU Time:\t{:.6}\n",
        value as f64,
        elapsed.real.as_secs_f64(),
        elapsed.cpu.as_secs_f64()
    )
}
