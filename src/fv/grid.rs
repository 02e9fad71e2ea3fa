use crate::StrError;
use gemlab::mesh::Mesh;
use gemlab::shapes::GeoKind;
use std::collections::HashMap;

/// Holds the geometry of a control volume (one mesh cell)
#[derive(Clone, Debug)]
pub struct FvCell {
    /// Holds the attribute of the mesh cell
    pub attribute: usize,

    /// Holds the volume (area in 2D)
    pub volume: f64,

    /// Holds the centroid
    pub centroid: Vec<f64>,

    /// Holds the indices of the interior faces of this cell
    pub faces: Vec<usize>,

    /// Holds the indices of the boundary faces of this cell
    pub boundary_faces: Vec<usize>,

    /// Holds the indices of the neighbouring cells (one per interior face)
    pub neighbors: Vec<usize>,
}

/// Holds the geometry of a face shared by two control volumes
#[derive(Clone, Debug)]
pub struct FvFace {
    /// Holds the two cells sharing this face
    ///
    /// The normal vector points from `cells[0]` to `cells[1]`
    pub cells: [usize; 2],

    /// Holds the area (length in 2D)
    pub area: f64,

    /// Holds the unit normal vector
    pub normal: Vec<f64>,

    /// Holds the centroid
    pub centroid: Vec<f64>,

    /// Holds the distance between the cell centroids projected onto the normal
    pub distance: f64,
}

/// Holds the geometry of a face on the boundary of the domain
#[derive(Clone, Debug)]
pub struct FvBoundaryFace {
    /// Holds the cell owning this face
    pub cell: usize,

    /// Holds the area (length in 2D)
    pub area: f64,

    /// Holds the unit outward normal vector
    pub normal: Vec<f64>,

    /// Holds the centroid
    pub centroid: Vec<f64>,

    /// Holds the distance between the cell centroid and the face centroid projected onto the normal
    pub distance: f64,

    /// Holds the ids of the mesh points of this face
    pub points: Vec<usize>,
}

/// Implements the finite volume geometry derived from a mesh
///
/// The control volumes are the mesh cells (cell-centred scheme).
/// Supported shapes are Tri3 and Qua4 in 2D and Tet4 and Hex8 in 3D.
#[derive(Clone, Debug)]
pub struct FvGrid {
    /// Holds the space dimension
    pub ndim: usize,

    /// Holds all control volumes
    pub cells: Vec<FvCell>,

    /// Holds all interior faces
    pub faces: Vec<FvFace>,

    /// Holds all boundary faces
    pub boundary_faces: Vec<FvBoundaryFace>,
}

/// Returns the local point indices of the faces of a cell
fn local_faces(kind: GeoKind) -> Result<&'static [&'static [usize]], StrError> {
    match kind {
        GeoKind::Tri3 => Ok(&[&[0, 1], &[1, 2], &[2, 0]]),
        GeoKind::Qua4 => Ok(&[&[0, 1], &[1, 2], &[2, 3], &[3, 0]]),
        GeoKind::Tet4 => Ok(&[&[0, 2, 1], &[0, 1, 3], &[0, 3, 2], &[1, 2, 3]]),
        GeoKind::Hex8 => Ok(&[
            &[0, 4, 7, 3],
            &[1, 2, 6, 5],
            &[0, 1, 5, 4],
            &[2, 3, 7, 6],
            &[0, 3, 2, 1],
            &[4, 5, 6, 7],
        ]),
        _ => Err("cell kind is not supported by the finite volume grid"),
    }
}

/// Holds the area, unit normal, and centroid of a face
struct FaceGeometry {
    area: f64,
    normal: Vec<f64>,
    centroid: Vec<f64>,
}

/// Computes the geometry of a face (segment, triangle, or quadrilateral)
///
/// The normal orientation follows the point ordering; it is fixed afterwards.
fn face_geometry(xx: &[&[f64]], ndim: usize) -> Result<FaceGeometry, StrError> {
    if ndim == 2 {
        let (a, b) = (xx[0], xx[1]);
        let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
        let area = f64::sqrt(dx * dx + dy * dy);
        if area <= 0.0 {
            return Err("found a face with zero area");
        }
        return Ok(FaceGeometry {
            area,
            normal: vec![dy / area, -dx / area],
            centroid: vec![(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0],
        });
    }
    // split polygon into triangles sharing the first point
    let mut nn = vec![0.0; 3];
    let mut cc = vec![0.0; 3];
    let mut area = 0.0;
    for k in 1..(xx.len() - 1) {
        let (a, b, c) = (xx[0], xx[k], xx[k + 1]);
        let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
        let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
        let w = [u[1] * v[2] - u[2] * v[1], u[2] * v[0] - u[0] * v[2], u[0] * v[1] - u[1] * v[0]];
        let tri = f64::sqrt(w[0] * w[0] + w[1] * w[1] + w[2] * w[2]) / 2.0;
        for i in 0..3 {
            nn[i] += w[i] / 2.0;
            cc[i] += tri * (a[i] + b[i] + c[i]) / 3.0;
        }
        area += tri;
    }
    let norm = f64::sqrt(nn[0] * nn[0] + nn[1] * nn[1] + nn[2] * nn[2]);
    if area <= 0.0 || norm <= 0.0 {
        return Err("found a face with zero area");
    }
    Ok(FaceGeometry {
        area,
        normal: nn.iter().map(|v| v / norm).collect(),
        centroid: cc.iter().map(|v| v / area).collect(),
    })
}

/// Returns the dot product of (a - b) and n
fn dot_diff(a: &[f64], b: &[f64], n: &[f64]) -> f64 {
    let mut res = 0.0;
    for i in 0..n.len() {
        res += (a[i] - b[i]) * n[i];
    }
    res
}

/// Returns the Euclidean distance between two points
fn distance(a: &[f64], b: &[f64]) -> f64 {
    let mut sum = 0.0;
    for i in 0..a.len() {
        sum += (a[i] - b[i]) * (a[i] - b[i]);
    }
    f64::sqrt(sum)
}

impl FvGrid {
    /// Allocates a new instance
    pub fn new(mesh: &Mesh) -> Result<Self, StrError> {
        let ndim = mesh.ndim;
        if ndim != 2 && ndim != 3 {
            return Err("the space dimension must be 2 or 3");
        }
        if mesh.cells.len() == 0 {
            return Err("there are no cells in the mesh");
        }

        // cells and their (outward) faces
        let mut cells = Vec::with_capacity(mesh.cells.len());
        let mut all_faces: Vec<(usize, Vec<usize>, FaceGeometry)> = Vec::new();
        let mut face_map: HashMap<Vec<usize>, Vec<usize>> = HashMap::new();
        for (cell_id, cell) in mesh.cells.iter().enumerate() {
            if cell.kind.ndim() != ndim {
                return Err("the cell kind is incompatible with the space dimension");
            }
            let faces = local_faces(cell.kind)?;
            let xx: Vec<&[f64]> = cell.points.iter().map(|p| mesh.points[*p].coords.as_slice()).collect();

            // vertex mean (used to orient the face normals)
            let mut xmean = vec![0.0; ndim];
            for x in &xx {
                for i in 0..ndim {
                    xmean[i] += x[i] / (xx.len() as f64);
                }
            }

            // faces
            let mut volume = 0.0;
            let mut moment = vec![0.0; ndim];
            for local in faces {
                let points: Vec<usize> = local.iter().map(|m| cell.points[*m]).collect();
                let xf: Vec<&[f64]> = points.iter().map(|p| mesh.points[*p].coords.as_slice()).collect();
                let mut geo = face_geometry(&xf, ndim)?;
                if dot_diff(&geo.centroid, &xmean, &geo.normal) < 0.0 {
                    for v in geo.normal.iter_mut() {
                        *v = -*v;
                    }
                }
                // divergence theorem: V = Σ (1/ndim) n·(c_f - x_ref) A
                let h = dot_diff(&geo.centroid, &xmean, &geo.normal);
                let pyramid = h * geo.area / (ndim as f64);
                volume += pyramid;
                // centroid of the pyramid (cone) with apex at xmean
                let factor = (ndim as f64) / (ndim as f64 + 1.0);
                for i in 0..ndim {
                    moment[i] += pyramid * (xmean[i] + factor * (geo.centroid[i] - xmean[i]));
                }
                let mut key = points.clone();
                key.sort();
                face_map.entry(key).or_insert_with(Vec::new).push(all_faces.len());
                all_faces.push((cell_id, points, geo));
            }
            if volume <= 0.0 {
                return Err("found a cell with zero or negative volume");
            }
            cells.push(FvCell {
                attribute: cell.attribute,
                volume,
                centroid: moment.iter().map(|m| m / volume).collect(),
                faces: Vec::new(),
                boundary_faces: Vec::new(),
                neighbors: Vec::new(),
            });
        }

        // match the faces (sorted to obtain a deterministic numbering)
        let mut groups: Vec<&Vec<usize>> = face_map.values().collect();
        groups.sort_by_key(|g| g[0]);
        let mut faces = Vec::new();
        let mut boundary_faces = Vec::new();
        for group in groups {
            match group.len() {
                1 => {
                    let (cell, points, geo) = &all_faces[group[0]];
                    let mut d = dot_diff(&geo.centroid, &cells[*cell].centroid, &geo.normal);
                    if d <= 0.0 {
                        d = distance(&geo.centroid, &cells[*cell].centroid);
                    }
                    cells[*cell].boundary_faces.push(boundary_faces.len());
                    boundary_faces.push(FvBoundaryFace {
                        cell: *cell,
                        area: geo.area,
                        normal: geo.normal.clone(),
                        centroid: geo.centroid.clone(),
                        distance: d,
                        points: points.clone(),
                    });
                }
                2 => {
                    let (a, _, geo) = &all_faces[group[0]];
                    let (b, _, _) = &all_faces[group[1]];
                    let mut d = dot_diff(&cells[*b].centroid, &cells[*a].centroid, &geo.normal);
                    if d <= 0.0 {
                        d = distance(&cells[*b].centroid, &cells[*a].centroid);
                    }
                    let index = faces.len();
                    cells[*a].faces.push(index);
                    cells[*a].neighbors.push(*b);
                    cells[*b].faces.push(index);
                    cells[*b].neighbors.push(*a);
                    faces.push(FvFace {
                        cells: [*a, *b],
                        area: geo.area,
                        normal: geo.normal.clone(),
                        centroid: geo.centroid.clone(),
                        distance: d,
                    });
                }
                _ => return Err("found a face shared by more than two cells"),
            }
        }
        Ok(FvGrid {
            ndim,
            cells,
            faces,
            boundary_faces,
        })
    }

    /// Returns the number of control volumes
    pub fn n_cell(&self) -> usize {
        self.cells.len()
    }

    /// Returns the total volume of the domain
    pub fn total_volume(&self) -> f64 {
        self.cells.iter().fold(0.0, |acc, c| acc + c.volume)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
