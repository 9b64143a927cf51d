/// Largest number of particles a single system accepts.
pub const MAX_PARTICLES: usize = 100_000;

/// Prime multiplier used to derive independent RNG streams (setup versus
/// scheduling) from one base seed.
pub const RNG_DERIVATION_PRIME: u64 = 7919;

/// Side length of the bounding hexagon per square root of the particle count,
/// chosen so the enclosed area is roughly 3.7 times the particle count.
pub const HEXAGON_SIDE_FACTOR: f64 = 1.4;
