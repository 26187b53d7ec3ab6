//! Sampled predict step for particle filters
//!
//! Each particle is pushed through the transition function with its own
//! standard normal noise sample. The model's noise matrix scales the sample
//! by the configured sigmas, so samples are drawn with unit variance here.

use alloc::vec::Vec;

use nalgebra::{DVector, RealField};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::models::StateTransitionFunction;
use crate::types::spaces::{InputVector, NoiseVector, StateVector};
use crate::types::transforms::ensure_dim;
use crate::{Result, TrackError};

/// Draws a standard normal noise sample of length `noise_dim`.
pub fn sample_noise<T, R>(noise_dim: usize, rng: &mut R) -> NoiseVector<T>
where
    T: RealField + Copy,
    R: Rng + ?Sized,
    StandardNormal: Distribution<T>,
{
    NoiseVector::from_dvector(DVector::from_fn(noise_dim, |_, _| {
        StandardNormal.sample(&mut *rng)
    }))
}

/// A weighted set of state samples.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleCloud<T: RealField> {
    particles: Vec<StateVector<T>>,
    weights: Vec<T>,
}

impl<T: RealField + Copy> ParticleCloud<T> {
    /// Creates a cloud with uniform weights.
    ///
    /// Fails if the cloud is empty or the particles differ in dimension.
    pub fn uniform(particles: Vec<StateVector<T>>) -> Result<Self> {
        let first = particles.first().ok_or(TrackError::invalid(
            "particles",
            "must contain at least one particle",
        ))?;
        let dim = first.len();
        for particle in &particles {
            ensure_dim("particle", dim, particle.len())?;
        }

        let count: T = nalgebra::convert(particles.len() as f64);
        let weights = alloc::vec![T::one() / count; particles.len()];
        Ok(Self { particles, weights })
    }

    /// Creates `count` copies of `state`.
    pub fn replicate(state: &StateVector<T>, count: usize) -> Result<Self> {
        Self::uniform(alloc::vec![state.clone(); count])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// State dimension shared by all particles.
    #[inline]
    pub fn dim(&self) -> usize {
        self.particles[0].len()
    }

    #[inline]
    pub fn particles(&self) -> &[StateVector<T>] {
        &self.particles
    }

    #[inline]
    pub fn weights(&self) -> &[T] {
        &self.weights
    }

    /// Weighted mean of the particles.
    pub fn mean(&self) -> StateVector<T> {
        let mut mean = DVector::zeros(self.dim());
        for (particle, weight) in self.particles.iter().zip(&self.weights) {
            mean += particle.as_dvector().scale(*weight);
        }
        StateVector::from_dvector(mean)
    }

    /// Moves every particle one step through `transition`.
    ///
    /// Weights are left untouched; reweighting is the observation model's job.
    pub fn predict<F, R>(
        &mut self,
        transition: &F,
        input: &InputVector<T>,
        rng: &mut R,
    ) -> Result<()>
    where
        F: StateTransitionFunction<T> + ?Sized,
        R: Rng + ?Sized,
        StandardNormal: Distribution<T>,
    {
        ensure_dim("particle", transition.state_dim(), self.dim())?;

        let noise_dim = transition.noise_dim();
        let mut predicted = Vec::with_capacity(self.particles.len());
        for particle in &self.particles {
            let noise = sample_noise(noise_dim, rng);
            predicted.push(transition.apply(particle, &noise, input)?);
        }

        log::trace!("propagated {} particles", predicted.len());
        self.particles = predicted;
        Ok(())
    }
}
