use super::{Algorithm, Counters, System};
use crate::metrics::Measure;
use crate::registry::ParticleId;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// When a run stops, evaluated before every activation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Termination {
    /// Run until the algorithm itself terminates or the activation cap hits.
    #[default]
    Never,
    MaxActivations { activations: u64 },
    MaxRounds { rounds: u64 },
    /// Stop once `measure` is at or below `threshold`.
    MeasureAtMost { measure: Measure, threshold: f64 },
    /// Stop once `measure` is at or above `threshold`.
    MeasureAtLeast { measure: Measure, threshold: f64 },
    /// Stop as soon as the particles no longer form one component.
    Disconnected,
}

impl Termination {
    pub fn is_satisfied<M>(&self, system: &System<M>) -> bool {
        let counters = system.counters();
        match *self {
            Termination::Never => false,
            Termination::MaxActivations { activations } => counters.activations >= activations,
            Termination::MaxRounds { rounds } => counters.rounds >= rounds,
            Termination::MeasureAtMost { measure, threshold } => {
                measure.evaluate(system) <= threshold
            }
            Termination::MeasureAtLeast { measure, threshold } => {
                measure.evaluate(system) >= threshold
            }
            Termination::Disconnected => !system.is_connected(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    TerminationMet,
    AlgorithmTerminated,
    ActivationCap,
    StoppedExternally,
    NoParticles,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub reason: StopReason,
    pub counters: Counters,
}

impl<M> System<M> {
    /// Activate one particle chosen uniformly at random.
    ///
    /// Returns the activated particle, or `None` for an empty system.
    pub fn activate_once<A: Algorithm<M> + ?Sized>(&mut self, algorithm: &A) -> Option<ParticleId> {
        if self.particles.is_empty() {
            return None;
        }
        let id = ParticleId(self.rng.random_range(0..self.particles.len()));
        self.activate_particle(id, |ctx| algorithm.activate(ctx));
        Some(id)
    }

    /// Activate particles until `termination` holds, the algorithm reports
    /// termination, or `max_activations` more activations have run.
    pub fn run<A: Algorithm<M> + ?Sized>(
        &mut self,
        algorithm: &A,
        termination: &Termination,
        max_activations: Option<u64>,
    ) -> RunOutcome {
        let outcome = self.run_loop(algorithm, max_activations, |system| {
            if termination.is_satisfied(system) {
                Some(StopReason::TerminationMet)
            } else {
                None
            }
        });
        if matches!(termination, Termination::Disconnected)
            && outcome.reason == StopReason::TerminationMet
        {
            warn!(
                activations = outcome.counters.activations,
                "particle system became disconnected"
            );
        }
        info!(
            reason = ?outcome.reason,
            activations = outcome.counters.activations,
            moves = outcome.counters.moves,
            rounds = outcome.counters.rounds,
            "run finished"
        );
        outcome
    }

    /// Activate particles until `stop` returns true. `stop` is only ever
    /// consulted between activations.
    pub fn run_until<A, F>(&mut self, algorithm: &A, mut stop: F) -> RunOutcome
    where
        A: Algorithm<M> + ?Sized,
        F: FnMut(&System<M>) -> bool,
    {
        self.run_loop(algorithm, None, |system| {
            stop(system).then_some(StopReason::StoppedExternally)
        })
    }

    fn run_loop<A, F>(&mut self, algorithm: &A, max_activations: Option<u64>, mut check: F) -> RunOutcome
    where
        A: Algorithm<M> + ?Sized,
        F: FnMut(&System<M>) -> Option<StopReason>,
    {
        let start = self.counters.activations;
        let reason = loop {
            if self.particles.is_empty() {
                break StopReason::NoParticles;
            }
            if let Some(reason) = check(&*self) {
                break reason;
            }
            if algorithm.has_terminated(&*self) {
                break StopReason::AlgorithmTerminated;
            }
            if max_activations.is_some_and(|cap| self.counters.activations - start >= cap) {
                break StopReason::ActivationCap;
            }
            self.activate_once(algorithm);
        };
        RunOutcome {
            reason,
            counters: self.counters,
        }
    }
}
