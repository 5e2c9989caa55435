use std::{f64::consts::FRAC_PI_2, ops::Range};

use nalgebra::{Rotation2, Vector2};
use rand::{
    rngs::{StdRng, ThreadRng},
    Rng, SeedableRng,
};
use rand_distr::{Distribution, Uniform, UnitCircle};

use crate::{
    body::Body,
    config::BodiesConfig,
    error::{Error, Result},
};

pub trait BodyCreator {
    fn create_body(&mut self) -> Body;

    fn create_bodies(&mut self, n: usize) -> Vec<Body> {
        (0..n).map(|_| self.create_body()).collect()
    }
}

/// Places bodies on a ring around the origin, each orbiting counterclockwise
/// with a speed independent of its radius.
#[derive(Clone, Debug)]
pub struct RingBodyCreator<R: Rng> {
    rng: R,
    radius_distr: Uniform<f64>,
    speed_distr: Uniform<f64>,
    mass_distr: Uniform<f64>,
}

impl RingBodyCreator<ThreadRng> {
    pub fn new(radius: Range<f64>, speed: Range<f64>, mass: Range<f64>) -> Result<Self> {
        Self::rng(rand::thread_rng(), radius, speed, mass)
    }
}

impl RingBodyCreator<StdRng> {
    /// A reproducible creator.
    pub fn seeded(
        seed: u64,
        radius: Range<f64>,
        speed: Range<f64>,
        mass: Range<f64>,
    ) -> Result<Self> {
        Self::rng(StdRng::seed_from_u64(seed), radius, speed, mass)
    }

    /// Seeded from the configuration if it has a seed, from entropy otherwise.
    pub fn from_config(config: &BodiesConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let [r0, r1] = config.radius;
        let [s0, s1] = config.speed;
        let [m0, m1] = config.mass;

        Self::rng(rng, r0..r1, s0..s1, m0..m1)
    }
}

impl<R: Rng> RingBodyCreator<R> {
    pub fn rng(rng: R, radius: Range<f64>, speed: Range<f64>, mass: Range<f64>) -> Result<Self> {
        if !(mass.start > 0.) {
            return Err(Error::InvalidMass(mass.start));
        }

        Ok(Self {
            rng,
            radius_distr: uniform("radius", radius)?,
            speed_distr: uniform("speed", speed)?,
            mass_distr: uniform("mass", mass)?,
        })
    }
}

fn uniform(name: &'static str, range: Range<f64>) -> Result<Uniform<f64>> {
    let invalid = |value| Err(Error::InvalidParameter { name, value });
    if !range.start.is_finite() {
        return invalid(range.start);
    }
    if !(range.end.is_finite() && range.start < range.end) {
        return invalid(range.end);
    }

    Ok(Uniform::new(range.start, range.end))
}

impl<R: Rng> BodyCreator for RingBodyCreator<R> {
    fn create_body(&mut self) -> Body {
        let rng = &mut self.rng;

        let [x, y]: [f64; 2] = UnitCircle.sample(rng);
        let direction = Vector2::new(x, y);

        let position = direction * self.radius_distr.sample(rng);
        let velocity = Rotation2::new(FRAC_PI_2) * direction * self.speed_distr.sample(rng);
        let mass = self.mass_distr.sample(rng);

        Body::unchecked(position, velocity, mass)
    }
}
