//! Uniform random sources for the sampler.
//!
//! Every source hands out one `f32` per call and advances its own state.
//! [`GeneratorKind`] picks one of the four implementations at run time.

use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;
const WY_INCREMENT: u64 = 0x60be_e2be_e120_fc15;
const WY_MUL_1: u128 = 0xa3b1_9535_4a39_b70d;
const WY_MUL_2: u128 = 0x1b03_7387_12fa_d5c9;

/// Produces the next uniform value and advances the source.
pub trait UniformSource {
    fn next_uniform(&mut self) -> f32;
}

#[inline]
fn normalize(value: u32) -> f32 {
    value as f32 / u32::MAX as f32
}

/// Rotates the seed right by one bit and returns it.
#[inline]
pub fn rotate_step(seed: &mut u32) -> u32 {
    *seed = seed.rotate_right(1);
    *seed
}

/// Adds the 32-bit truncation of the golden-ratio constant to the seed.
#[inline]
pub fn additive_step(seed: &mut u32) -> u32 {
    *seed = seed.wrapping_add(GOLDEN_GAMMA as u32);
    *seed
}

/// wyhash-style mix. The seed keeps the low half of the pre-mix sum.
#[inline]
pub fn wyhash_step(seed: &mut u32) -> u32 {
    let x = u64::from(*seed).wrapping_add(WY_INCREMENT);
    let tmp = u128::from(x) * WY_MUL_1;
    let m1 = ((tmp >> 64) ^ tmp) as u64;
    let tmp = u128::from(m1) * WY_MUL_2;
    let m2 = ((tmp >> 64) ^ tmp) as u64;
    *seed = x as u32;
    m2 as u32
}

/// The ecosystem default generator, seeded from the 32-bit seed.
#[derive(Debug, Clone)]
pub struct LibraryRng {
    inner: StdRng,
}

impl LibraryRng {
    pub fn new(seed: u32) -> Self {
        Self {
            inner: StdRng::seed_from_u64(u64::from(seed)),
        }
    }
}

impl UniformSource for LibraryRng {
    #[inline]
    fn next_uniform(&mut self) -> f32 {
        self.inner.gen::<f32>()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotateRng {
    seed: u32,
}

impl RotateRng {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }
}

impl UniformSource for RotateRng {
    #[inline]
    fn next_uniform(&mut self) -> f32 {
        normalize(rotate_step(&mut self.seed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdditiveRng {
    seed: u32,
}

impl AdditiveRng {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }
}

impl UniformSource for AdditiveRng {
    #[inline]
    fn next_uniform(&mut self) -> f32 {
        normalize(additive_step(&mut self.seed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WyhashRng {
    seed: u32,
}

impl WyhashRng {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }
}

impl UniformSource for WyhashRng {
    #[inline]
    fn next_uniform(&mut self) -> f32 {
        normalize(wyhash_step(&mut self.seed))
    }
}

/// Selects which generator a run draws from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum GeneratorKind {
    #[default]
    Library,
    Rotate,
    Additive,
    Wyhash,
}

impl GeneratorKind {
    pub fn build(self, seed: u32) -> Generator {
        match self {
            GeneratorKind::Library => Generator::Library(LibraryRng::new(seed)),
            GeneratorKind::Rotate => Generator::Rotate(RotateRng::new(seed)),
            GeneratorKind::Additive => Generator::Additive(AdditiveRng::new(seed)),
            GeneratorKind::Wyhash => Generator::Wyhash(WyhashRng::new(seed)),
        }
    }
}

/// One of the four sources, dispatched statically.
#[derive(Debug, Clone)]
pub enum Generator {
    Library(LibraryRng),
    Rotate(RotateRng),
    Additive(AdditiveRng),
    Wyhash(WyhashRng),
}

impl UniformSource for Generator {
    #[inline]
    fn next_uniform(&mut self) -> f32 {
        match self {
            Generator::Library(rng) => rng.next_uniform(),
            Generator::Rotate(rng) => rng.next_uniform(),
            Generator::Additive(rng) => rng.next_uniform(),
            Generator::Wyhash(rng) => rng.next_uniform(),
        }
    }
}

/// Seed from a stack address mixed with the wall-clock seconds.
pub fn entropy_seed() -> u32 {
    let marker = 0u8;
    let address = std::ptr::addr_of!(marker) as usize;
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    (address as u32) ^ (now as u32)
}
