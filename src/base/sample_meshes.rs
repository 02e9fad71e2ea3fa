use crate::StrError;
use gemlab::mesh::{Cell, Mesh, Point};
use gemlab::shapes::GeoKind;

/// Holds sample meshes for finite volume simulations
pub struct SampleMeshes {}

impl SampleMeshes {
    /// Returns two triangles forming a unit square
    #[rustfmt::skip]
    pub fn two_tri3() -> Mesh {
        //      y
        //      ^
        // 1.0  3------------2
        //      |`.      [1] |    [#] indicates id
        //      |  `.    (1) |    (#) indicates attribute
        //      |    `.      |
        //      |      `.    |
        //      | [0]    `.  |
        //      | (1)      `.|
        // 0.0  0------------1 -> x
        //     0.0          1.0
        Mesh {
            ndim: 2,
            points: vec![
                Point { id: 0, marker: 0, coords: vec![0.0, 0.0] },
                Point { id: 1, marker: 0, coords: vec![1.0, 0.0] },
                Point { id: 2, marker: 0, coords: vec![1.0, 1.0] },
                Point { id: 3, marker: 0, coords: vec![0.0, 1.0] },
            ],
            cells: vec![
                Cell { id: 0, attribute: 1, kind: GeoKind::Tri3, points: vec![0, 1, 3] },
                Cell { id: 1, attribute: 1, kind: GeoKind::Tri3, points: vec![2, 3, 1] },
            ],
        }
    }

    /// Returns two quadrilaterals side by side
    #[rustfmt::skip]
    pub fn two_qua4() -> Mesh {
        //      y
        //      ^
        // 1.0  3-----------2-----------5
        //      |           |           |
        //      |    [0]    |    [1]    |   [#] indicates id
        //      |    (1)    |    (2)    |   (#) indicates attribute
        //      |           |           |
        // 0.0  0-----------1-----------4 -> x
        //     0.0         1.0         2.0
        Mesh {
            ndim: 2,
            points: vec![
                Point { id: 0, marker: 0, coords: vec![0.0, 0.0] },
                Point { id: 1, marker: 0, coords: vec![1.0, 0.0] },
                Point { id: 2, marker: 0, coords: vec![1.0, 1.0] },
                Point { id: 3, marker: 0, coords: vec![0.0, 1.0] },
                Point { id: 4, marker: 0, coords: vec![2.0, 0.0] },
                Point { id: 5, marker: 0, coords: vec![2.0, 1.0] },
            ],
            cells: vec![
                Cell { id: 0, attribute: 1, kind: GeoKind::Qua4, points: vec![0, 1, 2, 3] },
                Cell { id: 1, attribute: 2, kind: GeoKind::Qua4, points: vec![1, 4, 5, 2] },
            ],
        }
    }

    /// Returns a single tetrahedron with three edges along the axes
    #[rustfmt::skip]
    pub fn one_tet4() -> Mesh {
        //          z
        //          3
        //          |
        //          |   [0]
        //          |   (1)
        //          0-------2 y
        //         /
        //        1
        //       x
        Mesh {
            ndim: 3,
            points: vec![
                Point { id: 0, marker: 0, coords: vec![0.0, 0.0, 0.0] },
                Point { id: 1, marker: 0, coords: vec![1.0, 0.0, 0.0] },
                Point { id: 2, marker: 0, coords: vec![0.0, 1.0, 0.0] },
                Point { id: 3, marker: 0, coords: vec![0.0, 0.0, 1.0] },
            ],
            cells: vec![
                Cell { id: 0, attribute: 1, kind: GeoKind::Tet4, points: vec![0, 1, 2, 3] },
            ],
        }
    }

    /// Returns two unit cubes stacked along z
    #[rustfmt::skip]
    pub fn two_hex8() -> Mesh {
        //       8--------------11  2.0
        //      /|             /|
        //     / |   [1]      / |    [#] indicates id
        //    /  |   (1)     /  |    (#) indicates attribute
        //   9--------------10  |
        //   |   4----------|---7  1.0
        //   |  /|          |  /|
        //   | / |   [0]    | / |          z
        //   |/  |   (1)    |/  |          ↑
        //   5--------------6   |          o → y
        //   |   0----------|---3  0.0    ↙
        //   |  /           |  /         x
        //   | /            | /
        //   |/             |/
        //   1--------------2
        Mesh {
            ndim: 3,
            points: vec![
                Point { id:  0, marker: 0, coords: vec![0.0, 0.0, 0.0] },
                Point { id:  1, marker: 0, coords: vec![1.0, 0.0, 0.0] },
                Point { id:  2, marker: 0, coords: vec![1.0, 1.0, 0.0] },
                Point { id:  3, marker: 0, coords: vec![0.0, 1.0, 0.0] },
                Point { id:  4, marker: 0, coords: vec![0.0, 0.0, 1.0] },
                Point { id:  5, marker: 0, coords: vec![1.0, 0.0, 1.0] },
                Point { id:  6, marker: 0, coords: vec![1.0, 1.0, 1.0] },
                Point { id:  7, marker: 0, coords: vec![0.0, 1.0, 1.0] },
                Point { id:  8, marker: 0, coords: vec![0.0, 0.0, 2.0] },
                Point { id:  9, marker: 0, coords: vec![1.0, 0.0, 2.0] },
                Point { id: 10, marker: 0, coords: vec![1.0, 1.0, 2.0] },
                Point { id: 11, marker: 0, coords: vec![0.0, 1.0, 2.0] },
            ],
            cells: vec![
                Cell { id: 0, attribute: 1, kind: GeoKind::Hex8, points: vec![0, 1, 2, 3, 4, 5, 6, 7] },
                Cell { id: 1, attribute: 1, kind: GeoKind::Hex8, points: vec![4, 5, 6, 7, 8, 9, 10, 11] },
            ],
        }
    }

    /// Generates a structured mesh of quadrilaterals over a rectangle
    ///
    /// The cells are numbered row by row starting at the bottom-left corner.
    ///
    /// # Input
    ///
    /// * `nx`, `ny` -- number of cells along x and y
    /// * `xmax`, `ymax` -- dimensions of the rectangle (the origin is at (0,0))
    /// * `attribute` -- returns the cell attribute given the coordinates of the cell center
    pub fn rectangle(
        nx: usize,
        ny: usize,
        xmax: f64,
        ymax: f64,
        attribute: fn(x: f64, y: f64) -> usize,
    ) -> Result<Mesh, StrError> {
        if nx < 1 || ny < 1 {
            return Err("the number of cells along each direction must be ≥ 1");
        }
        if xmax <= 0.0 || ymax <= 0.0 {
            return Err("the dimensions of the rectangle must be > 0.0");
        }
        let dx = xmax / (nx as f64);
        let dy = ymax / (ny as f64);
        let mut points = Vec::with_capacity((nx + 1) * (ny + 1));
        for j in 0..(ny + 1) {
            for i in 0..(nx + 1) {
                points.push(Point {
                    id: points.len(),
                    marker: 0,
                    coords: vec![(i as f64) * dx, (j as f64) * dy],
                });
            }
        }
        let mut cells = Vec::with_capacity(nx * ny);
        for j in 0..ny {
            for i in 0..nx {
                let a = i + j * (nx + 1);
                let xc = (i as f64 + 0.5) * dx;
                let yc = (j as f64 + 0.5) * dy;
                cells.push(Cell {
                    id: cells.len(),
                    attribute: attribute(xc, yc),
                    kind: GeoKind::Qua4,
                    points: vec![a, a + 1, a + nx + 2, a + nx + 1],
                });
            }
        }
        Ok(Mesh { ndim: 2, points, cells })
    }

    /// Generates a vertical column of quadrilaterals with unit width
    pub fn column(ny: usize, height: f64) -> Result<Mesh, StrError> {
        SampleMeshes::rectangle(1, ny, 1.0, height, |_, _| 1)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
