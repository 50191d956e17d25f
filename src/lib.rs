//! Monte Carlo π estimation with selectable random sources, plus a
//! parallel-for reduction demo.

pub mod cli;
pub mod error;
pub mod increment;
pub mod monte_carlo;
pub mod rng;
pub mod timing;

pub use error::{Error, Result};
pub use monte_carlo::{calculate_pi, calculate_pi_partitioned, ExecutionMode, Sampler};
pub use rng::{Generator, GeneratorKind, UniformSource};
