pub mod algorithms;
pub mod compass;
pub mod config;
pub mod connectivity;
pub mod constants;
pub mod label;
pub mod metrics;
pub mod node;
pub mod object;
pub mod outline;
pub mod particle;
pub mod registry;
pub mod rng;
pub mod setup;
pub mod system;

pub use compass::Compass;
pub use config::{AlgorithmKind, Layout, SimConfig, SimConfigError};
pub use constants::MAX_PARTICLES;
pub use metrics::{Measure, RunSummary};
pub use node::{Direction, Node};
pub use object::Object;
pub use registry::ParticleId;
pub use system::{
    Activation, Algorithm, Neighborhood, RunOutcome, StopReason, System, SystemError, Termination,
};
