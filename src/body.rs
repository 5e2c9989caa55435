use nalgebra::Vector2;
use tracing::warn;

use crate::{
    error::{Error, Result},
    geometry::Point,
    gravity::Gravity,
};

/// Maximum speed a body keeps after integration.
pub const MAX_SPEED: f64 = 10.;

/// A point mass.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    position: Vector2<f64>,
    velocity: Vector2<f64>,
    acceleration: Vector2<f64>,
    mass: f64,
}

impl Body {
    /// Create a body with no accumulated acceleration.
    ///
    /// Fails if `mass` is not positive and finite.
    pub fn new(position: Vector2<f64>, velocity: Vector2<f64>, mass: f64) -> Result<Self> {
        if !(mass > 0. && mass.is_finite()) {
            warn!(mass, "rejecting body with invalid mass");
            return Err(Error::InvalidMass(mass));
        }

        Ok(Self::unchecked(position, velocity, mass))
    }

    // Callers guarantee a positive mass.
    pub(crate) fn unchecked(position: Vector2<f64>, velocity: Vector2<f64>, mass: f64) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vector2::zeros(),
            mass,
        }
    }

    #[must_use]
    pub fn position(&self) -> &Vector2<f64> {
        &self.position
    }

    #[must_use]
    pub fn velocity(&self) -> &Vector2<f64> {
        &self.velocity
    }

    #[must_use]
    pub fn acceleration(&self) -> &Vector2<f64> {
        &self.acceleration
    }

    #[must_use]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// The quadtree entry for this body, stored at `index` of its collection.
    #[must_use]
    pub fn point(&self, index: usize) -> Point {
        Point::new(self.position.x, self.position.y, index)
    }

    /// Accumulate `force / mass` into the acceleration of this step.
    pub fn apply_force(&mut self, force: Vector2<f64>) {
        self.acceleration += force / self.mass;
    }

    /// The gravitational force this body exerts on `other`.
    #[must_use]
    pub fn applicable_force(&self, other: &Body, gravity: &Gravity) -> Vector2<f64> {
        gravity.force(&self.position, self.mass, &other.position, other.mass)
    }

    /// Apply the gravitational force this body exerts to `other`.
    pub fn calculate_applicable_force(&self, other: &mut Body, gravity: &Gravity) {
        other.apply_force(self.applicable_force(other, gravity));
    }

    /// Semi-implicit Euler step.
    ///
    /// The position advances with the updated velocity, which is capped to
    /// `max_speed` afterwards. The acceleration is reset for the next step.
    pub fn integrate(&mut self, max_speed: f64) {
        self.velocity += self.acceleration;
        self.position += self.velocity;
        self.velocity = self.velocity.cap_magnitude(max_speed);
        self.acceleration = Vector2::zeros();
    }
}
