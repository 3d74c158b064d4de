//! Planar Voronoi diagram of the seed set.
//!
//! The diagram itself is computed by `voronoice`; this module caches what the
//! generator needs per cell (neighbors, area, centroid, border contact) and
//! adds nearest-site point location.

mod index;

use glam::Vec2;
use thiserror::Error;
use voronoice::{BoundingBox, Point, VoronoiBuilder};

use index::SiteIndex;

/// Id of a Voronoi cell. Equal to the index of the site that owns it.
pub type CellId = usize;

/// Vertices closer than this to the map boundary count as touching it.
const BORDER_EPSILON: f64 = 1e-4;

/// Errors that can occur while building or querying a diagram.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiagramError {
    #[error("At least 3 sites are needed to build a diagram, got {0}")]
    TooFewSites(usize),
    #[error("Voronoi construction failed for {0} sites")]
    BuildFailed(usize),
    #[error("No cell contains point ({0}, {1})")]
    CellNotFound(f32, f32),
}

/// Cached geometry and adjacency of one cell.
#[derive(Debug, Clone)]
struct CellInfo {
    neighbors: Vec<CellId>,
    area: f64,
    centroid: Vec2,
    touches_border: bool,
}

/// Voronoi diagram clipped to the `[0, width] x [0, height]` map rectangle.
#[derive(Debug, Clone)]
pub struct CellDiagram {
    width: f32,
    height: f32,
    sites: Vec<Vec2>,
    cells: Vec<CellInfo>,
    index: SiteIndex,
}

impl CellDiagram {
    /// Builds the diagram of `sites`. Cell ids follow the order of `sites`.
    pub fn build(sites: &[Vec2], width: f32, height: f32) -> Result<Self, DiagramError> {
        if sites.len() < 3 {
            return Err(DiagramError::TooFewSites(sites.len()));
        }

        let (w, h) = (width as f64, height as f64);
        let points: Vec<Point> = sites
            .iter()
            .map(|s| Point {
                x: s.x as f64,
                y: s.y as f64,
            })
            .collect();

        let voronoi = VoronoiBuilder::default()
            .set_sites(points)
            .set_bounding_box(BoundingBox::new(Point { x: w * 0.5, y: h * 0.5 }, w, h))
            .set_lloyd_relaxation_iterations(0)
            .build()
            .ok_or(DiagramError::BuildFailed(sites.len()))?;

        let cells = (0..sites.len())
            .map(|id| {
                let cell = voronoi.cell(id);
                let vertices: Vec<Point> = cell.iter_vertices().cloned().collect();

                let mut neighbors: Vec<CellId> = cell
                    .iter_neighbors()
                    .filter(|&n| n != id && n < sites.len())
                    .collect();
                neighbors.sort_unstable();
                neighbors.dedup();

                let touches_border = vertices.iter().any(|v| {
                    v.x <= BORDER_EPSILON
                        || v.y <= BORDER_EPSILON
                        || v.x >= w - BORDER_EPSILON
                        || v.y >= h - BORDER_EPSILON
                });

                let (area, centroid) = polygon_area_centroid(&vertices).unwrap_or((0.0, sites[id]));

                CellInfo {
                    neighbors,
                    area,
                    centroid,
                    touches_border,
                }
            })
            .collect();

        Ok(Self {
            width,
            height,
            sites: sites.to_vec(),
            cells,
            index: SiteIndex::new(sites, width, height),
        })
    }

    /// Returns the number of cells.
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Returns the site that owns a cell.
    pub fn site(&self, cell: CellId) -> Vec2 {
        self.sites[cell]
    }

    /// Finds which cell a point belongs to (its nearest site).
    pub fn find_cell(&self, pos: Vec2) -> Result<CellId, DiagramError> {
        self.index
            .nearest(&self.sites, pos)
            .ok_or(DiagramError::CellNotFound(pos.x, pos.y))
    }

    /// Returns the ids of the cells sharing an edge with `cell`.
    pub fn neighbors(&self, cell: CellId) -> &[CellId] {
        &self.cells[cell].neighbors
    }

    /// Area of the clipped cell.
    pub fn volume(&self, cell: CellId) -> f64 {
        self.cells[cell].area
    }

    /// Radius of the disc with the same area as the cell.
    pub fn equivalent_radius(&self, cell: CellId) -> f32 {
        (self.cells[cell].area / std::f64::consts::PI).sqrt() as f32
    }

    pub fn centroid(&self, cell: CellId) -> Vec2 {
        self.cells[cell].centroid
    }

    /// Whether the cell reaches any of the four map edges.
    pub fn touches_border(&self, cell: CellId) -> bool {
        self.cells[cell].touches_border
    }
}

/// Shoelace area and centroid of a simple polygon, independent of winding.
fn polygon_area_centroid(vertices: &[Point]) -> Option<(f64, Vec2)> {
    if vertices.len() < 3 {
        return None;
    }
    let mut twice_area = 0.0f64;
    let mut cx = 0.0f64;
    let mut cy = 0.0f64;
    for (i, a) in vertices.iter().enumerate() {
        let b = &vertices[(i + 1) % vertices.len()];
        let cross = a.x * b.y - b.x * a.y;
        twice_area += cross;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }
    if twice_area.abs() < f64::EPSILON {
        return None;
    }
    let area = twice_area * 0.5;
    let centroid = Vec2::new((cx / (6.0 * area)) as f32, (cy / (6.0 * area)) as f32);
    Some((area.abs(), centroid))
}
