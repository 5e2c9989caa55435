use nalgebra::Vector2;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::{
    body::Body,
    error::{Error, Result},
    gravity::Gravity,
    quadtree::QuadTree,
    Execution,
};

/// Distance to a node's center below which its bodies are summed exactly.
pub const NEAR_THRESHOLD: f64 = 25.;

/// Approximates the net gravitational force on each body from a [`QuadTree`].
///
/// Every node is classified on its own, relative to the body the force is
/// calculated for:
/// - near nodes (center closer than `near_threshold`) contribute the exact
///   force of every body stored in them,
/// - far nodes holding `k` points contribute one aggregate body at their
///   center with `k` times the mass of the body the force acts on.
///
/// Inner nodes are always descended into, independent of their classification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarnesHut {
    gravity: Gravity,
    near_threshold: f64,
}

impl Default for BarnesHut {
    fn default() -> Self {
        Self {
            gravity: Gravity::default(),
            near_threshold: NEAR_THRESHOLD,
        }
    }
}

impl BarnesHut {
    pub fn new(gravity: Gravity, near_threshold: f64) -> Result<Self> {
        if !(near_threshold >= 0. && near_threshold.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "near_threshold",
                value: near_threshold,
            });
        }

        Ok(Self {
            gravity,
            near_threshold,
        })
    }

    #[must_use]
    pub fn gravity(&self) -> &Gravity {
        &self.gravity
    }

    #[must_use]
    pub fn near_threshold(&self) -> f64 {
        self.near_threshold
    }

    /// The approximated net force on `bodies[index]`.
    ///
    /// `tree` has to be built from the points of `bodies`.
    #[must_use]
    pub fn net_force(&self, tree: &QuadTree, bodies: &[Body], index: usize) -> Vector2<f64> {
        let mut force = Vector2::zeros();
        self.accumulate_force(tree, bodies, index, &mut force);
        force
    }

    fn accumulate_force(
        &self,
        node: &QuadTree,
        bodies: &[Body],
        index: usize,
        force: &mut Vector2<f64>,
    ) {
        let body = &bodies[index];
        let center = node.boundary().center();
        let distance = (body.position() - center).norm();

        if distance < self.near_threshold {
            for point in node.points() {
                if point.body != index {
                    *force += bodies[point.body].applicable_force(body, &self.gravity);
                }
            }
        } else if !node.points().is_empty() {
            let aggregate = Body::unchecked(
                center,
                Vector2::zeros(),
                body.mass() * node.points().len() as f64,
            );
            *force += aggregate.applicable_force(body, &self.gravity);
        }

        if let Some(children) = node.children() {
            for child in children.iter() {
                self.accumulate_force(child, bodies, index, force);
            }
        }
    }

    /// Calculate the net force on every body into `forces`.
    ///
    /// The tree and the bodies are only read, so this can be split over threads.
    pub fn calculate_forces(
        &self,
        tree: &QuadTree,
        bodies: &[Body],
        forces: &mut [Vector2<f64>],
        execution: Execution,
    ) {
        debug_assert_eq!(bodies.len(), forces.len());

        match execution {
            Execution::SingleThreaded => {
                forces.iter_mut().enumerate().for_each(|(i, f)| {
                    *f = self.net_force(tree, bodies, i);
                });
            }
            #[cfg(feature = "rayon")]
            Execution::MultiThreaded => {
                forces.par_iter_mut().enumerate().for_each(|(i, f)| {
                    *f = self.net_force(tree, bodies, i);
                });
            }
        }
    }

    /// Calculate the net force on every body and apply it.
    ///
    /// All forces are calculated before the first one is applied,
    /// only the accelerations of the bodies change.
    pub fn apply_forces(&self, tree: &QuadTree, bodies: &mut [Body], execution: Execution) {
        let mut forces = vec![Vector2::zeros(); bodies.len()];
        self.calculate_forces(tree, bodies, &mut forces, execution);

        for (body, force) in bodies.iter_mut().zip(forces) {
            body.apply_force(force);
        }
    }
}
