use crate::system::Termination;
use serde::{Deserialize, Serialize};

/// Which local algorithm every particle runs, with its bias parameters.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AlgorithmKind {
    /// Compression with neighbor bias `lambda`; `lambda > 2 + sqrt(2)`
    /// compresses, `lambda < 2.17` expands.
    Compression { lambda: f64 },
    /// Two-color separation: `lambda` biases toward more neighbors, `kappa`
    /// toward more same-colored neighbors.
    Separation { lambda: f64, kappa: f64 },
}

impl Default for AlgorithmKind {
    fn default() -> Self {
        AlgorithmKind::Compression { lambda: 4.0 }
    }
}

impl AlgorithmKind {
    pub fn name(&self) -> &'static str {
        match self {
            AlgorithmKind::Compression { .. } => "compression",
            AlgorithmKind::Separation { .. } => "separation",
        }
    }
}

/// Initial placement of particles and objects.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Layout {
    /// A random connected blob grown from the origin; each frontier node is
    /// skipped with `hole_probability`.
    Blob { hole_probability: f64 },
    /// Particles scattered inside a hexagonal outline of objects.
    Hexagon,
}

impl Default for Layout {
    fn default() -> Self {
        Layout::Blob {
            hole_probability: 0.1,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    /// Deterministic seed for reproducible runs.
    pub seed: u64,
    /// Number of particles placed at setup.
    pub num_particles: usize,
    pub algorithm: AlgorithmKind,
    pub layout: Layout,
    /// Stop condition checked between activations.
    pub termination: Termination,
    /// Hard cap on activations per run (`None` = unbounded).
    pub max_activations: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            num_particles: 100,
            algorithm: AlgorithmKind::default(),
            layout: Layout::default(),
            termination: Termination::MaxActivations {
                activations: 1_000_000,
            },
            max_activations: Some(10_000_000),
        }
    }
}

macro_rules! define_sim_config_error {
    (
        $(
            $variant:ident $( { $($field:ident : $type:ty),* } )? => $fmt:literal $(, $arg:expr)*
        );* $(;)?
    ) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum SimConfigError {
            $(
                $variant $( { $($field : $type),* } )?,
            )*
        }

        impl std::fmt::Display for SimConfigError {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        Self::$variant $( { $($field),* } )? => write!(f, $fmt $(, $arg)*),
                    )*
                }
            }
        }
    };
}

define_sim_config_error! {
    InvalidNumParticles => "num_particles must be greater than 0";
    TooManyParticles { max: usize, actual: usize } => "Too many particles: {} > max {}", actual, max;
    InvalidLambda => "lambda must be positive and finite";
    InvalidKappa => "kappa must be positive and finite";
    InvalidHoleProbability => "hole_probability must be finite and within [0,1)";
    InvalidThreshold => "termination threshold must be finite";
    InvalidMaxActivations => "max_activations must be greater than 0 when set";
}

impl std::error::Error for SimConfigError {}

impl SimConfig {
    pub const MAX_PARTICLES: usize = crate::constants::MAX_PARTICLES;

    pub fn validate(&self) -> Result<(), SimConfigError> {
        self.validate_particles()?;
        self.validate_algorithm()?;
        self.validate_layout()?;
        self.validate_termination()?;
        Ok(())
    }

    fn validate_particles(&self) -> Result<(), SimConfigError> {
        if self.num_particles == 0 {
            return Err(SimConfigError::InvalidNumParticles);
        }
        if self.num_particles > Self::MAX_PARTICLES {
            return Err(SimConfigError::TooManyParticles {
                max: Self::MAX_PARTICLES,
                actual: self.num_particles,
            });
        }
        Ok(())
    }

    fn validate_algorithm(&self) -> Result<(), SimConfigError> {
        let (lambda, kappa) = match self.algorithm {
            AlgorithmKind::Compression { lambda } => (lambda, None),
            AlgorithmKind::Separation { lambda, kappa } => (lambda, Some(kappa)),
        };
        if !(lambda.is_finite() && lambda > 0.0) {
            return Err(SimConfigError::InvalidLambda);
        }
        if kappa.is_some_and(|kappa| !(kappa.is_finite() && kappa > 0.0)) {
            return Err(SimConfigError::InvalidKappa);
        }
        Ok(())
    }

    fn validate_layout(&self) -> Result<(), SimConfigError> {
        if let Layout::Blob { hole_probability } = self.layout {
            // A hole probability of 1 rejects every frontier node.
            if !(hole_probability.is_finite() && (0.0..1.0).contains(&hole_probability)) {
                return Err(SimConfigError::InvalidHoleProbability);
            }
        }
        Ok(())
    }

    fn validate_termination(&self) -> Result<(), SimConfigError> {
        match self.termination {
            Termination::MeasureAtMost { threshold, .. }
            | Termination::MeasureAtLeast { threshold, .. }
                if !threshold.is_finite() =>
            {
                return Err(SimConfigError::InvalidThreshold);
            }
            _ => {}
        }
        if self.max_activations == Some(0) {
            return Err(SimConfigError::InvalidMaxActivations);
        }
        Ok(())
    }
}
