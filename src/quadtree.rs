use std::num::NonZeroUsize;

use tracing::trace;

use crate::{
    error::{Error, Result},
    geometry::{Point, Quadrant, Rectangle},
};

/// Deepest level a node may be created at.
///
/// Leaves on this level keep accepting points past their capacity,
/// otherwise coincident points would subdivide forever.
pub const MAX_LEVEL: usize = 32;

type Children = [QuadTree; 4];

/// A region quadtree over [`Point`]s.
///
/// Every node is either a leaf holding at most `capacity` points,
/// or an inner node holding no points and exactly four children
/// in the order of [`Quadrant::ALL`].
#[derive(Clone, Debug)]
pub struct QuadTree {
    boundary: Rectangle,
    capacity: NonZeroUsize,
    level: usize,
    points: Vec<Point>,
    children: Option<Box<Children>>,
}

impl QuadTree {
    #[must_use]
    pub fn new(boundary: Rectangle, capacity: NonZeroUsize) -> Self {
        Self::with_level(boundary, capacity, 0)
    }

    /// Like [`QuadTree::new`], but rejects a capacity of zero at runtime.
    pub fn with_capacity(boundary: Rectangle, capacity: usize) -> Result<Self> {
        NonZeroUsize::new(capacity)
            .map(|capacity| Self::new(boundary, capacity))
            .ok_or(Error::ZeroCapacity)
    }

    fn with_level(boundary: Rectangle, capacity: NonZeroUsize, level: usize) -> Self {
        Self {
            boundary,
            capacity,
            level,
            points: Vec::with_capacity(capacity.get()),
            children: None,
        }
    }

    /// Insert a point, returning `false` if it lies outside of the boundary.
    pub fn insert(&mut self, point: Point) -> bool {
        if !self.boundary.contains(&point) {
            return false;
        }

        self.place(point);
        true
    }

    // Below the root a point is routed by comparing it to the node center,
    // the child boundaries are never asked. Rounding of the child edges
    // can't drop it and points on a split line are stored exactly once.
    fn place(&mut self, point: Point) {
        if self.children.is_none() {
            if self.points.len() < self.capacity.get() || self.level >= MAX_LEVEL {
                self.points.push(point);
                return;
            }

            self.subdivide();
        }

        let quadrant = self.boundary.quadrant_of(&point);
        if let Some(children) = &mut self.children {
            children[quadrant as usize].place(point);
        }
    }

    fn subdivide(&mut self) {
        trace!(
            level = self.level,
            x = self.boundary.x,
            y = self.boundary.y,
            "subdividing quadtree node"
        );

        let mut children = Quadrant::ALL.map(|quadrant| {
            Self::with_level(
                self.boundary.quadrant(quadrant),
                self.capacity,
                self.level + 1,
            )
        });
        for point in std::mem::take(&mut self.points) {
            children[self.boundary.quadrant_of(&point) as usize].place(point);
        }
        self.children = Some(Box::new(children));
    }

    /// All stored points inside of `range`.
    #[must_use]
    pub fn query(&self, range: &Rectangle) -> Vec<&Point> {
        let mut found = Vec::new();
        self.query_into(range, &mut found);
        found
    }

    fn query_into<'a>(&'a self, range: &Rectangle, found: &mut Vec<&'a Point>) {
        if !self.boundary.intersects(range) {
            return;
        }

        found.extend(self.points.iter().filter(|point| range.contains(point)));

        if let Some(children) = &self.children {
            for child in children.iter() {
                child.query_into(range, found);
            }
        }
    }

    #[must_use]
    pub fn boundary(&self) -> &Rectangle {
        &self.boundary
    }

    #[must_use]
    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// Depth of this node, the root is on level 0.
    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Points stored directly in this node. Always empty for inner nodes.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[must_use]
    pub fn children(&self) -> Option<&Children> {
        self.children.as_deref()
    }

    #[must_use]
    pub fn child(&self, quadrant: Quadrant) -> Option<&QuadTree> {
        self.children().map(|children| &children[quadrant as usize])
    }

    #[must_use]
    pub fn is_divided(&self) -> bool {
        self.children.is_some()
    }

    /// Iterate over this node and all of its descendants in pre-order.
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes { stack: vec![self] }
    }

    /// Number of points stored in this subtree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes().map(|node| node.points.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes().all(|node| node.points.is_empty())
    }

    /// The deepest level of any node in this subtree.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.nodes().map(|node| node.level).max().unwrap_or(self.level)
    }
}

/// Pre-order iterator over the nodes of a [`QuadTree`].
pub struct Nodes<'a> {
    stack: Vec<&'a QuadTree>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a QuadTree;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some(children) = node.children() {
            self.stack.extend(children.iter().rev());
        }
        Some(node)
    }
}
