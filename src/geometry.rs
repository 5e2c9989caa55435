use nalgebra::Vector2;

/// A point stored in the quadtree.
///
/// `body` is the index of the body this point was created from in the
/// slice the tree was built over. It is only meaningful for that slice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub body: usize,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64, body: usize) -> Self {
        Self { x, y, body }
    }

    #[must_use]
    pub fn position(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

/// One of the four quadrants of a [`Rectangle`].
///
/// The y axis points down, so north is the half with smaller y.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quadrant {
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Quadrant {
    /// The order in which children are stored and visited.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthEast,
        Quadrant::NorthWest,
        Quadrant::SouthEast,
        Quadrant::SouthWest,
    ];
}

/// An axis-aligned rectangle given by its center and its full width and height.
///
/// It covers `[x - w/2, x + w/2] × [y - h/2, y + h/2]`, edges included.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rectangle {
    #[must_use]
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    #[must_use]
    pub fn left(&self) -> f64 {
        self.x - self.w / 2.
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.w / 2.
    }

    #[must_use]
    pub fn top(&self) -> f64 {
        self.y - self.h / 2.
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.h / 2.
    }

    #[must_use]
    pub fn center(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    #[must_use]
    pub fn contains(&self, point: &Point) -> bool {
        self.left() <= point.x
            && point.x <= self.right()
            && self.top() <= point.y
            && point.y <= self.bottom()
    }

    /// Rectangles sharing only an edge or a corner intersect.
    #[must_use]
    pub fn intersects(&self, other: &Rectangle) -> bool {
        !(self.right() < other.left()
            || other.right() < self.left()
            || self.bottom() < other.top()
            || other.bottom() < self.top())
    }

    /// The quadrant of this rectangle a point belongs to, decided against the center.
    ///
    /// Points on the vertical center line go east, points on the horizontal
    /// one go north.
    #[must_use]
    pub fn quadrant_of(&self, point: &Point) -> Quadrant {
        match (point.x >= self.x, point.y <= self.y) {
            (true, true) => Quadrant::NorthEast,
            (false, true) => Quadrant::NorthWest,
            (true, false) => Quadrant::SouthEast,
            (false, false) => Quadrant::SouthWest,
        }
    }

    /// The quarter of this rectangle lying in `quadrant`.
    #[must_use]
    pub fn quadrant(&self, quadrant: Quadrant) -> Rectangle {
        let (dx, dy) = (self.w / 4., self.h / 4.);
        let (x, y) = match quadrant {
            Quadrant::NorthEast => (self.x + dx, self.y - dy),
            Quadrant::NorthWest => (self.x - dx, self.y - dy),
            Quadrant::SouthEast => (self.x + dx, self.y + dy),
            Quadrant::SouthWest => (self.x - dx, self.y + dy),
        };
        Rectangle::new(x, y, self.w / 2., self.h / 2.)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;

    fn random_rectangle(rng: &mut StdRng) -> Rectangle {
        Rectangle::new(
            rng.gen_range(-100.0..100.0),
            rng.gen_range(-100.0..100.0),
            rng.gen_range(0.0..80.0),
            rng.gen_range(0.0..80.0),
        )
    }

    #[test]
    fn contains_matches_corners() {
        let mut rng = StdRng::seed_from_u64(0);

        for _ in 0..1000 {
            let r = random_rectangle(&mut rng);
            let p = Point::new(rng.gen_range(-150.0..150.0), rng.gen_range(-150.0..150.0), 0);

            let expected = r.x - r.w / 2. <= p.x
                && p.x <= r.x + r.w / 2.
                && r.y - r.h / 2. <= p.y
                && p.y <= r.y + r.h / 2.;
            assert_eq!(r.contains(&p), expected);
        }
    }

    #[test]
    fn contains_edges() {
        let r = Rectangle::new(0., 0., 800., 800.);

        assert!(r.contains(&Point::new(-400., -400., 0)));
        assert!(r.contains(&Point::new(400., 400., 0)));
        assert!(r.contains(&Point::new(0., 400., 0)));
        assert!(!r.contains(&Point::new(400.001, 0., 0)));
        assert!(!r.contains(&Point::new(0., -400.001, 0)));
    }

    #[test]
    fn intersection_symmetry() {
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..1000 {
            let r1 = random_rectangle(&mut rng);
            let r2 = random_rectangle(&mut rng);
            assert_eq!(r1.intersects(&r2), r2.intersects(&r1));
        }
    }

    #[test]
    fn intersects() {
        let r = Rectangle::new(0., 0., 10., 10.);

        assert!(r.intersects(&r));
        assert!(r.intersects(&Rectangle::new(2., 2., 2., 2.)));
        assert!(r.intersects(&Rectangle::new(10., 0., 10., 10.)));
        assert!(!r.intersects(&Rectangle::new(20., 0., 10., 10.)));
        assert!(!r.intersects(&Rectangle::new(0., -20., 10., 10.)));
    }

    #[test]
    fn quadrants_partition() {
        let r = Rectangle::new(0., 0., 800., 800.);

        let ne = r.quadrant(Quadrant::NorthEast);
        assert_eq!(ne, Rectangle::new(200., -200., 400., 400.));
        let sw = r.quadrant(Quadrant::SouthWest);
        assert_eq!(sw, Rectangle::new(-200., 200., 400., 400.));

        let area: f64 = Quadrant::ALL
            .iter()
            .map(|&q| {
                let c = r.quadrant(q);
                c.w * c.h
            })
            .sum();
        assert_eq!(area, r.w * r.h);
    }

    #[test]
    fn quadrant_of() {
        let r = Rectangle::new(0., 0., 800., 800.);

        assert_eq!(r.quadrant_of(&Point::new(10., -10., 0)), Quadrant::NorthEast);
        assert_eq!(r.quadrant_of(&Point::new(-10., -10., 0)), Quadrant::NorthWest);
        assert_eq!(r.quadrant_of(&Point::new(10., 10., 0)), Quadrant::SouthEast);
        assert_eq!(r.quadrant_of(&Point::new(-10., 10., 0)), Quadrant::SouthWest);

        assert_eq!(r.quadrant_of(&Point::new(0., 0., 0)), Quadrant::NorthEast);
        assert_eq!(r.quadrant_of(&Point::new(0., 250., 0)), Quadrant::SouthEast);
        assert_eq!(r.quadrant_of(&Point::new(-250., 0., 0)), Quadrant::NorthWest);
    }

    #[test]
    fn quadrant_of_picks_side_of_center() {
        let mut rng = StdRng::seed_from_u64(2);

        for _ in 0..1000 {
            let r = random_rectangle(&mut rng);
            let p = Point::new(
                rng.gen_range(r.left()..=r.right()),
                rng.gen_range(r.top()..=r.bottom()),
                0,
            );

            let child = r.quadrant(r.quadrant_of(&p));
            assert!((p.x >= r.x) == (child.x >= r.x));
            assert!((p.y <= r.y) == (child.y <= r.y));
        }
    }
}
