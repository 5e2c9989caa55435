use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use nalgebra::{DMatrix, Vector2};

use crate::{error::Result, quadtree::QuadTree};

/// Write positions as returned by [`Simulation::simulate`](crate::Simulation::simulate).
///
/// One row per time step: `t,x0,y0,x1,y1,...`.
pub fn write_csv_positions(
    positions: &DMatrix<Vector2<f64>>,
    path: impl AsRef<Path>,
) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_positions(&mut file, positions)?;
    file.flush()?;
    Ok(())
}

fn write_positions(w: &mut impl Write, positions: &DMatrix<Vector2<f64>>) -> Result<()> {
    let (_, num_bodies) = positions.shape();

    write!(w, "t")?;
    for i in 0..num_bodies {
        write!(w, ",x{i},y{i}")?;
    }
    writeln!(w)?;

    for (t, row) in positions.row_iter().enumerate() {
        write!(w, "{t}")?;
        for pos in row.iter() {
            write!(w, ",{},{}", pos.x, pos.y)?;
        }
        writeln!(w)?;
    }

    Ok(())
}

/// Write the outline of every node of `tree`, one row per node in pre-order.
pub fn write_csv_tree(tree: &QuadTree, path: impl AsRef<Path>) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_tree(&mut file, tree)?;
    file.flush()?;
    Ok(())
}

fn write_tree(w: &mut impl Write, tree: &QuadTree) -> Result<()> {
    writeln!(w, "level,x,y,w,h,divided,points")?;

    for node in tree.nodes() {
        let b = node.boundary();
        writeln!(
            w,
            "{},{},{},{},{},{},{}",
            node.level(),
            b.x,
            b.y,
            b.w,
            b.h,
            node.is_divided(),
            node.points().len()
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;
    use crate::geometry::{Point, Rectangle};

    #[test]
    fn positions() {
        let positions = DMatrix::from_row_slice(
            2,
            2,
            &[
                Vector2::new(0., 1.),
                Vector2::new(2., 3.),
                Vector2::new(0.5, 1.5),
                Vector2::new(2.5, 3.5),
            ],
        );

        let mut out = Vec::new();
        write_positions(&mut out, &positions).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "t,x0,y0,x1,y1\n0,0,1,2,3\n1,0.5,1.5,2.5,3.5\n"
        );
    }

    #[test]
    fn tree() {
        let mut tree = QuadTree::new(
            Rectangle::new(0., 0., 8., 8.),
            NonZeroUsize::new(1).unwrap(),
        );
        tree.insert(Point::new(1., -1., 0));
        tree.insert(Point::new(-1., 1., 1));

        let mut out = Vec::new();
        write_tree(&mut out, &tree).unwrap();

        let out = String::from_utf8(out).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "level,x,y,w,h,divided,points",
                "0,0,0,8,8,true,0",
                "1,2,-2,4,4,false,1",
                "1,-2,-2,4,4,false,0",
                "1,2,2,4,4,false,0",
                "1,-2,2,4,4,false,1",
            ]
        );
    }

    #[test]
    fn write_file() {
        let path = std::env::temp_dir()
            .join(format!("quadtree_gravity_{}.csv", std::process::id()));
        let positions = DMatrix::from_element(3, 4, Vector2::new(1., 2.));

        write_csv_positions(&positions, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(content.lines().count(), 4);
    }
}
