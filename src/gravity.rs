use nalgebra::Vector2;

use crate::error::{Error, Result};

pub const G: f64 = 0.3;
pub const MIN_DISTANCE_SQUARED: f64 = 100.;
pub const MAX_DISTANCE_SQUARED: f64 = 1000.;

/// Newtonian gravity with the squared distance clamped into a fixed interval.
///
/// The lower bound keeps close encounters from exploding, the upper bound
/// keeps far away bodies from becoming negligible. Neither is physical.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gravity {
    constant: f64,
    min_distance_squared: f64,
    max_distance_squared: f64,
}

impl Default for Gravity {
    fn default() -> Self {
        Self {
            constant: G,
            min_distance_squared: MIN_DISTANCE_SQUARED,
            max_distance_squared: MAX_DISTANCE_SQUARED,
        }
    }
}

impl Gravity {
    #[must_use]
    pub fn new(constant: f64) -> Self {
        Self {
            constant,
            ..Default::default()
        }
    }

    /// Replace the interval the squared distance is clamped into.
    pub fn with_distance_clamp(mut self, min_squared: f64, max_squared: f64) -> Result<Self> {
        if !(min_squared > 0. && min_squared.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "min_distance_squared",
                value: min_squared,
            });
        }
        if !(max_squared >= min_squared && max_squared.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "max_distance_squared",
                value: max_squared,
            });
        }

        self.min_distance_squared = min_squared;
        self.max_distance_squared = max_squared;
        Ok(self)
    }

    #[must_use]
    pub fn constant(&self) -> f64 {
        self.constant
    }

    #[must_use]
    pub fn min_distance_squared(&self) -> f64 {
        self.min_distance_squared
    }

    #[must_use]
    pub fn max_distance_squared(&self) -> f64 {
        self.max_distance_squared
    }

    /// The force a mass at `source` exerts on a mass at `target`.
    ///
    /// Points from `target` towards `source`. Coincident positions give no force.
    #[must_use]
    pub fn force(
        &self,
        source_position: &Vector2<f64>,
        source_mass: f64,
        target_position: &Vector2<f64>,
        target_mass: f64,
    ) -> Vector2<f64> {
        let r = source_position - target_position;
        let distance_squared = r
            .norm_squared()
            .clamp(self.min_distance_squared, self.max_distance_squared);
        let strength = self.constant * source_mass * target_mass / distance_squared;

        r.try_normalize(0.)
            .map_or_else(Vector2::zeros, |direction| direction * strength)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn attraction() {
        let gravity = Gravity::default();
        let f = gravity.force(&Vector2::new(-1., 0.), 1., &Vector2::new(1., 0.), 1.);

        assert!(f.x < 0.);
        assert_abs_diff_eq!(f.y, 0.);
    }

    #[test]
    fn clamped_far() {
        let gravity = Gravity::new(0.3);
        let f = gravity.force(&Vector2::new(-50., 0.), 10., &Vector2::new(50., 0.), 10.);

        assert_abs_diff_eq!(f, Vector2::new(-0.03, 0.), epsilon = 1e-12);
    }

    #[test]
    fn clamped_near() {
        let gravity = Gravity::new(1.);
        let f = gravity.force(&Vector2::new(0., 1.), 2., &Vector2::zeros(), 5.);

        assert_abs_diff_eq!(f.norm(), 2. * 5. / 100., epsilon = 1e-12);
    }

    #[test]
    fn coincident() {
        let gravity = Gravity::default();
        let p = Vector2::new(3., 4.);

        assert_eq!(gravity.force(&p, 10., &p, 10.), Vector2::zeros());
    }

    #[test]
    fn invalid_clamp() {
        assert!(Gravity::default().with_distance_clamp(0., 10.).is_err());
        assert!(Gravity::default().with_distance_clamp(10., 5.).is_err());

        let gravity = Gravity::default().with_distance_clamp(1., 4.).unwrap();
        assert_eq!(gravity.min_distance_squared(), 1.);
        assert_eq!(gravity.max_distance_squared(), 4.);
    }
}
