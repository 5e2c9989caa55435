pub mod barnes_hut;
pub mod body;
pub mod config;
#[cfg(feature = "randomization")]
pub mod creator;
pub mod csv;
pub mod error;
pub mod geometry;
pub mod gravity;
pub mod quadtree;

use std::num::NonZeroUsize;

use nalgebra::{DMatrix, Vector2};
use tracing::debug;

pub use crate::{
    barnes_hut::BarnesHut,
    body::Body,
    config::SimulationConfig,
    error::{Error, Result},
    geometry::{Point, Quadrant, Rectangle},
    gravity::Gravity,
    quadtree::QuadTree,
};

/// How the force pass of a step is executed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Execution {
    #[default]
    SingleThreaded,
    /// Split the bodies over the Rayon thread pool.
    #[cfg(feature = "rayon")]
    MultiThreaded,
}

/// The physical knobs of a step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationParameters {
    barnes_hut: BarnesHut,
    max_speed: f64,
}

impl SimulationParameters {
    pub fn new(barnes_hut: BarnesHut, max_speed: f64) -> Result<Self> {
        if !(max_speed > 0. && max_speed.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "max_speed",
                value: max_speed,
            });
        }

        Ok(Self {
            barnes_hut,
            max_speed,
        })
    }

    #[must_use]
    pub fn barnes_hut(&self) -> &BarnesHut {
        &self.barnes_hut
    }

    #[must_use]
    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            barnes_hut: BarnesHut::default(),
            max_speed: body::MAX_SPEED,
        }
    }
}

/// Advance `bodies` by one step and return the tree the forces were taken from.
///
/// Bodies outside of `bounds` are left out of the tree, but still feel
/// the forces from it and are integrated.
pub fn step(
    bodies: &mut [Body],
    bounds: Rectangle,
    capacity: NonZeroUsize,
    parameters: &SimulationParameters,
) -> QuadTree {
    step_with(bodies, bounds, capacity, parameters, Execution::SingleThreaded)
}

/// Like [`step`], with a choice of how the force pass is executed.
pub fn step_with(
    bodies: &mut [Body],
    bounds: Rectangle,
    capacity: NonZeroUsize,
    parameters: &SimulationParameters,
    execution: Execution,
) -> QuadTree {
    let mut tree = QuadTree::new(bounds, capacity);

    let mut rejected = 0usize;
    for (i, body) in bodies.iter().enumerate() {
        if !tree.insert(body.point(i)) {
            rejected += 1;
        }
    }
    if rejected > 0 {
        debug!(rejected, "bodies outside of the simulation bounds");
    }

    parameters.barnes_hut.apply_forces(&tree, bodies, execution);

    for body in bodies.iter_mut() {
        body.integrate(parameters.max_speed);
    }

    tree
}

/// Owns the bodies and everything needed to advance them.
#[derive(Clone, Debug)]
pub struct Simulation {
    bodies: Vec<Body>,
    bounds: Rectangle,
    capacity: NonZeroUsize,
    parameters: SimulationParameters,
    execution: Execution,
    steps: usize,
}

impl Simulation {
    #[must_use]
    pub fn new(
        bodies: Vec<Body>,
        bounds: Rectangle,
        capacity: NonZeroUsize,
        parameters: SimulationParameters,
    ) -> Self {
        Self {
            bodies,
            bounds,
            capacity,
            parameters,
            execution: Execution::SingleThreaded,
            steps: 0,
        }
    }

    /// Take bounds, capacity and parameters from a configuration.
    pub fn from_config(bodies: Vec<Body>, config: &SimulationConfig) -> Result<Self> {
        Ok(Self::new(
            bodies,
            config.bounds()?,
            config.capacity()?,
            config.parameters()?,
        ))
    }

    /// Use Rayon to calculate the forces with multiple threads.
    ///
    /// All threads share the tree of the step, splitting the bodies.
    #[cfg(feature = "rayon")]
    #[must_use]
    pub fn multi_threaded(mut self) -> Self {
        self.execution = Execution::MultiThreaded;
        self
    }

    /// Advance all bodies by one step.
    ///
    /// The returned tree is only kept by the caller, e.g. to draw it.
    pub fn step(&mut self) -> QuadTree {
        let tree = step_with(
            &mut self.bodies,
            self.bounds,
            self.capacity,
            &self.parameters,
            self.execution,
        );
        self.steps += 1;

        debug!(
            step = self.steps,
            depth = tree.depth(),
            nodes = tree.nodes().count(),
            "step done"
        );

        tree
    }

    /// Run `num_steps` steps and record the positions.
    ///
    /// Row `t` holds the positions after `t` steps, row 0 the initial ones.
    pub fn simulate(&mut self, num_steps: usize) -> DMatrix<Vector2<f64>> {
        let mut positions =
            DMatrix::from_element(num_steps + 1, self.bodies.len(), Vector2::zeros());
        self.record_positions(&mut positions, 0);

        for t in 1..=num_steps {
            self.step();
            self.record_positions(&mut positions, t);
        }

        positions
    }

    fn record_positions(&self, positions: &mut DMatrix<Vector2<f64>>, row: usize) {
        for (i, body) in self.bodies.iter().enumerate() {
            positions[(row, i)] = *body.position();
        }
    }

    #[must_use]
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    #[must_use]
    pub fn bounds(&self) -> &Rectangle {
        &self.bounds
    }

    #[must_use]
    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    #[must_use]
    pub fn parameters(&self) -> &SimulationParameters {
        &self.parameters
    }

    #[must_use]
    pub fn execution(&self) -> Execution {
        self.execution
    }

    /// Number of steps taken so far.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }
}
