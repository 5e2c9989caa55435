//! Configuration of a simulation, loaded from TOML.
//!
//! Every field has a default, so a file only has to name what it changes:
//!
//! ```toml
//! [world]
//! width = 800.0
//! height = 800.0
//!
//! [tree]
//! capacity = 1
//! near_threshold = 25.0
//!
//! [gravity]
//! constant = 0.3
//! min_distance_squared = 100.0
//! max_distance_squared = 1000.0
//!
//! [integration]
//! max_speed = 10.0
//!
//! [bodies]
//! count = 350
//! seed = 42
//! radius = [150.0, 200.0]
//! speed = [10.0, 15.0]
//! mass = [10.0, 15.0]
//! ```

use std::{fs, num::NonZeroUsize, path::Path};

use serde::Deserialize;
use tracing::debug;

use crate::{
    barnes_hut::{BarnesHut, NEAR_THRESHOLD},
    body::MAX_SPEED,
    error::{Error, Result},
    geometry::Rectangle,
    gravity::{Gravity, G, MAX_DISTANCE_SQUARED, MIN_DISTANCE_SQUARED},
    SimulationParameters,
};

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub world: WorldConfig,
    pub tree: TreeConfig,
    pub gravity: GravityConfig,
    pub integration: IntegrationConfig,
    pub bodies: BodiesConfig,
}

/// The simulated area, centered at the origin.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 800.,
            height: 800.,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TreeConfig {
    pub capacity: usize,
    pub near_threshold: f64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            capacity: 1,
            near_threshold: NEAR_THRESHOLD,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GravityConfig {
    pub constant: f64,
    pub min_distance_squared: f64,
    pub max_distance_squared: f64,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            constant: G,
            min_distance_squared: MIN_DISTANCE_SQUARED,
            max_distance_squared: MAX_DISTANCE_SQUARED,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct IntegrationConfig {
    pub max_speed: f64,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            max_speed: MAX_SPEED,
        }
    }
}

/// Initial conditions: bodies on a ring around the origin.
///
/// Ranges are half-open `[low, high)`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BodiesConfig {
    pub count: usize,
    pub seed: Option<u64>,
    pub radius: [f64; 2],
    pub speed: [f64; 2],
    pub mass: [f64; 2],
}

impl Default for BodiesConfig {
    fn default() -> Self {
        Self {
            count: 350,
            seed: None,
            radius: [150., 200.],
            speed: [10., 15.],
            mass: [10., 15.],
        }
    }
}

impl SimulationConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading configuration");
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    pub fn bounds(&self) -> Result<Rectangle> {
        let WorldConfig { width, height } = self.world;
        positive("world.width", width)?;
        positive("world.height", height)?;

        Ok(Rectangle::new(0., 0., width, height))
    }

    pub fn capacity(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.tree.capacity).ok_or(Error::ZeroCapacity)
    }

    pub fn gravity(&self) -> Result<Gravity> {
        Gravity::new(self.gravity.constant).with_distance_clamp(
            self.gravity.min_distance_squared,
            self.gravity.max_distance_squared,
        )
    }

    pub fn parameters(&self) -> Result<SimulationParameters> {
        let barnes_hut = BarnesHut::new(self.gravity()?, self.tree.near_threshold)?;
        SimulationParameters::new(barnes_hut, self.integration.max_speed)
    }
}

fn positive(name: &'static str, value: f64) -> Result<()> {
    if value > 0. && value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidParameter { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SimulationConfig::default();

        assert_eq!(config.bounds().unwrap(), Rectangle::new(0., 0., 800., 800.));
        assert_eq!(config.capacity().unwrap().get(), 1);
        assert_eq!(config.parameters().unwrap(), SimulationParameters::default());
        assert_eq!(config.bodies.count, 350);
    }

    #[test]
    fn empty_file() {
        assert_eq!(
            SimulationConfig::from_toml_str("").unwrap(),
            SimulationConfig::default()
        );
    }

    #[test]
    fn partial_override() {
        let config = SimulationConfig::from_toml_str(
            r#"
            [tree]
            capacity = 4

            [gravity]
            constant = 1.5

            [bodies]
            count = 10
            seed = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.capacity().unwrap().get(), 4);
        assert_eq!(config.tree.near_threshold, NEAR_THRESHOLD);
        assert_eq!(config.gravity().unwrap().constant(), 1.5);
        assert_eq!(config.gravity.max_distance_squared, MAX_DISTANCE_SQUARED);
        assert_eq!(config.bodies.count, 10);
        assert_eq!(config.bodies.seed, Some(7));
        assert_eq!(config.bodies.mass, [10., 15.]);
    }

    #[test]
    fn zero_capacity() {
        let config = SimulationConfig::from_toml_str("[tree]\ncapacity = 0").unwrap();
        assert!(matches!(config.capacity(), Err(Error::ZeroCapacity)));
    }

    #[test]
    fn invalid_values() {
        let config = SimulationConfig::from_toml_str("[world]\nwidth = -1.0").unwrap();
        assert!(matches!(
            config.bounds(),
            Err(Error::InvalidParameter { name: "world.width", .. })
        ));

        let config = SimulationConfig::from_toml_str("[integration]\nmax_speed = 0.0").unwrap();
        assert!(config.parameters().is_err());

        let config = SimulationConfig::from_toml_str(
            "[gravity]\nmin_distance_squared = 10.0\nmax_distance_squared = 1.0",
        )
        .unwrap();
        assert!(config.parameters().is_err());
    }

    #[test]
    fn load_ring_demo() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/ring.toml");
        let config = SimulationConfig::load(path).unwrap();

        assert_eq!(config.bodies.seed, Some(42));
        assert_eq!(config.parameters().unwrap(), SimulationParameters::default());
    }

    #[test]
    fn load_missing_file() {
        assert!(matches!(
            SimulationConfig::load("does/not/exist.toml"),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn unknown_field() {
        assert!(matches!(
            SimulationConfig::from_toml_str("[tree]\ntheta = 0.5"),
            Err(Error::Config(_))
        ));
    }
}
