//! Height quadtree stored as an arena of nodes.
//!
//! The tree is built in two passes. The first lays out the nodes and their
//! vertices from corner biomes alone. The second assigns vertex heights top
//! down: a midpoint on a side with no same-depth neighbor across it takes
//! its height from the coarser side it lies on, and the nodes along that
//! side follow the coarser interpolation. Cells of different depths then
//! meet without steps.

use glam::Vec2;

use super::config::HeightConfig;
use super::data::{HeightBlob, HeightData};
use super::node::{Corner, Edge, EdgeSpan, HeightNode};
use super::HeightError;
use crate::biome::Biome;
use crate::voronoi::DiagramError;
use crate::MapRng;

/// Handle of a node in a `HeightTree`.
pub type NodeId = usize;

type VertexId = usize;

/// Biome information at a point, as needed to derive a vertex height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiomeSample {
    pub biome: Biome,
    /// Position of the seed owning the point.
    pub site: Vec2,
    /// Radius of the owning region, used as the blob size.
    pub radius: f32,
}

/// Where the tree gets biomes from when it creates vertices.
pub trait BiomeSource {
    fn sample(&self, pos: Vec2) -> Result<BiomeSample, DiagramError>;
}

/// Decides how deep the tree goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubdivisionPolicy {
    pub depth_min: u32,
    pub depth_max: u32,
    pub refine_biome_boundaries: bool,
}

impl SubdivisionPolicy {
    pub fn from_config(config: &HeightConfig) -> Self {
        Self {
            depth_min: config.depth_min,
            depth_max: config.depth_max,
            refine_biome_boundaries: config.refine_biome_boundaries,
        }
    }

    /// `corners` are the node's corner biomes in `Corner` order.
    pub fn should_subdivide(&self, depth: u32, corners: &[Biome; 4]) -> bool {
        if depth >= self.depth_max {
            return false;
        }
        if depth < self.depth_min {
            return true;
        }
        self.refine_biome_boundaries && corners[1..].iter().any(|b| *b != corners[0])
    }
}

#[derive(Debug, Clone)]
struct TreeNode {
    data: HeightNode,
    depth: u32,
    children: Option<[NodeId; 4]>,
}

/// Quadtree synthesizing a continuous height field.
///
/// Each level interpolates its own corners; a point's height is the sum of
/// those interpolations down its ancestor chain, each level weighted by
/// `blending_coefficient` relative to its parent. A leaf above `depth_max`
/// stands in for the levels it was not split into, as if its children
/// repeated its own interpolation.
#[derive(Debug, Clone)]
pub struct HeightTree {
    nodes: Vec<TreeNode>,
    blending: f32,
    scale_limit_influence: f32,
    detection_threshold: f32,
    /// Total weight of a leaf at each depth, relative to its own level.
    leaf_weights: Vec<f32>,
}

/// A vertex laid out by the first pass.
struct Vertex {
    position: Vec2,
    biome: Biome,
    /// `None` for the root corners, whose heights are given.
    sample: Option<BiomeSample>,
}

#[derive(Debug, Clone, Copy)]
struct Split {
    children: [NodeId; 4],
    center: VertexId,
    /// Side midpoints, indexed by `Edge`.
    midpoints: [VertexId; 4],
}

/// Shape of a node before heights are known.
struct Cell {
    origin: Vec2,
    size: f32,
    depth: u32,
    vertices: [VertexId; 4],
    split: Option<Split>,
}

impl Cell {
    fn center(&self) -> Vec2 {
        self.origin + Vec2::splat(self.size * 0.5)
    }

    fn contains(&self, pos: Vec2, tolerance: f32) -> bool {
        let min = self.origin - Vec2::splat(tolerance);
        let max = self.origin + Vec2::splat(self.size + tolerance);
        pos.x >= min.x && pos.y >= min.y && pos.x <= max.x && pos.y <= max.y
    }
}

/// First pass: node shapes and shared vertices.
struct Layout<'a, S: BiomeSource + ?Sized> {
    policy: SubdivisionPolicy,
    source: &'a S,
    detection_threshold: f32,
    vertices: Vec<Vertex>,
    cells: Vec<Cell>,
    reused: usize,
}

impl<S: BiomeSource + ?Sized> Layout<'_, S> {
    fn new_vertex(&mut self, position: Vec2) -> Result<VertexId, HeightError> {
        let sample = self.source.sample(position)?;
        self.vertices.push(Vertex {
            position,
            biome: sample.biome,
            sample: Some(sample),
        });
        Ok(self.vertices.len() - 1)
    }

    /// Reuses a vertex already laid out at `position`, or creates one.
    fn shared_vertex(&mut self, position: Vec2, max_depth: u32) -> Result<VertexId, HeightError> {
        match self.find_vertex(0, position, max_depth) {
            Some(found) => {
                self.reused += 1;
                Ok(found)
            }
            None => self.new_vertex(position),
        }
    }

    fn find_vertex(&self, id: NodeId, pos: Vec2, max_depth: u32) -> Option<VertexId> {
        let cell = &self.cells[id];
        let threshold = self.detection_threshold;
        if cell.depth > max_depth || !cell.contains(pos, threshold) {
            return None;
        }
        let threshold_sq = threshold * threshold;
        if let Some(&found) = cell
            .vertices
            .iter()
            .find(|&&v| self.vertices[v].position.distance_squared(pos) <= threshold_sq)
        {
            return Some(found);
        }
        cell.split?
            .children
            .iter()
            .find_map(|&child| self.find_vertex(child, pos, max_depth))
    }

    /// Splits `id` and its descendants as the policy asks, children in TL,
    /// TR, BL, BR order.
    fn subdivide(&mut self, id: NodeId) -> Result<(), HeightError> {
        let cell = &self.cells[id];
        let biomes = cell.vertices.map(|v| self.vertices[v].biome);
        if !self.policy.should_subdivide(cell.depth, &biomes) {
            return Ok(());
        }

        let [tl, tr, bl, br] = cell.vertices;
        let (origin, size, depth) = (cell.origin, cell.size, cell.depth);
        let half = size * 0.5;

        // Cells above and to the left are always laid out first, so the
        // north and west midpoints may already exist there.
        let center = self.new_vertex(origin + Vec2::splat(half))?;
        let north = self.shared_vertex(origin + Vec2::new(half, 0.0), depth + 1)?;
        let south = self.new_vertex(origin + Vec2::new(half, size))?;
        let east = self.new_vertex(origin + Vec2::new(size, half))?;
        let west = self.shared_vertex(origin + Vec2::new(0.0, half), depth + 1)?;

        let quadrants = [
            [tl, north, west, center],
            [north, tr, center, east],
            [west, center, bl, south],
            [center, east, south, br],
        ];
        let first_child = self.cells.len();
        for (slot, vertices) in quadrants.into_iter().enumerate() {
            let offset = Vec2::new((slot % 2) as f32, (slot / 2) as f32) * half;
            self.cells.push(Cell {
                origin: origin + offset,
                size: half,
                depth: depth + 1,
                vertices,
                split: None,
            });
        }
        let children = [first_child, first_child + 1, first_child + 2, first_child + 3];
        let mut midpoints = [0; 4];
        midpoints[Edge::North as usize] = north;
        midpoints[Edge::South as usize] = south;
        midpoints[Edge::West as usize] = west;
        midpoints[Edge::East as usize] = east;
        self.cells[id].split = Some(Split {
            children,
            center,
            midpoints,
        });

        for child in children {
            self.subdivide(child)?;
        }
        Ok(())
    }

    /// The node of the same depth across `edge`, if the tree has one there.
    fn neighbor(&self, id: NodeId, edge: Edge) -> Option<&Cell> {
        let cell = &self.cells[id];
        let target = cell.center() + edge.outward() * cell.size;
        if !self.cells[0].contains(target, 0.0) {
            return None;
        }
        let mut current = 0;
        while self.cells[current].depth < cell.depth {
            let parent = &self.cells[current];
            let children = parent.split?.children;
            current = children[Corner::quadrant(parent.center(), target) as usize];
        }
        Some(&self.cells[current])
    }
}

/// Height of a fresh vertex: the blob of the seed owning it.
fn blob_height(config: &HeightConfig, position: Vec2, sample: &BiomeSample, rng: &mut MapRng) -> f32 {
    let height = config.bands.biome_height(sample.biome, config.random_heights, rng);
    let blob = HeightBlob::new(sample.site, height, sample.biome, config.blob_scale(sample.biome));
    blob.eval_height(position, sample.radius.max(f32::EPSILON))
}

impl HeightTree {
    /// Builds the tree below `root`.
    pub fn build<S: BiomeSource + ?Sized>(
        config: &HeightConfig,
        source: &S,
        root: HeightNode,
        rng: &mut MapRng,
    ) -> Result<Self, HeightError> {
        if config.depth_min > config.depth_max {
            return Err(HeightError::InvalidDepth {
                min: config.depth_min,
                max: config.depth_max,
            });
        }
        let sli = config.scale_limit_influence;

        let mut layout = Layout {
            policy: SubdivisionPolicy::from_config(config),
            source,
            detection_threshold: config.detection_threshold,
            vertices: root
                .corners()
                .iter()
                .map(|c| Vertex {
                    position: c.position,
                    biome: c.biome,
                    sample: None,
                })
                .collect(),
            cells: vec![Cell {
                origin: root.origin(),
                size: root.size(),
                depth: 0,
                vertices: [0, 1, 2, 3],
                split: None,
            }],
            reused: 0,
        };
        layout.subdivide(0)?;

        // NaN until assigned. Parents come before children in the arena, and
        // cells above or to the left before those below or to the right, so
        // every corner is assigned before its node is reached.
        let mut heights = vec![f32::NAN; layout.vertices.len()];
        for (i, corner) in root.corners().iter().enumerate() {
            heights[i] = corner.height;
        }
        let mut spans: Vec<[Option<EdgeSpan>; 4]> = vec![[None; 4]; layout.cells.len()];
        let mut nodes = Vec::with_capacity(layout.cells.len());
        let mut constrained = 0;

        for id in 0..layout.cells.len() {
            let cell = &layout.cells[id];
            let corners = cell.vertices.map(|v| {
                let vertex = &layout.vertices[v];
                HeightData::new(vertex.position, heights[v], vertex.biome)
            });
            let mut data = HeightNode::new(corners, cell.size);
            for edge in Edge::ALL {
                if let Some(span) = spans[id][edge as usize] {
                    data = data.with_span(edge, span);
                }
            }

            if let Some(split) = cell.split {
                // A side with no split node of the same depth across it is
                // only a part of a coarser side, which the children follow.
                let outer = Edge::ALL.map(|edge| match data.span(edge) {
                    Some(span) => Some(*span),
                    None => layout
                        .neighbor(id, edge)
                        .filter(|n| n.split.is_none())
                        .map(|_| data.edge_span(edge)),
                });

                let mut assign = |v: VertexId, span: Option<EdgeSpan>, rng: &mut MapRng| {
                    if !heights[v].is_nan() {
                        return;
                    }
                    let vertex = &layout.vertices[v];
                    heights[v] = match (span, &vertex.sample) {
                        (Some(span), _) => {
                            constrained += 1;
                            span.eval_height(vertex.position, sli)
                        }
                        (None, Some(sample)) => blob_height(config, vertex.position, sample, rng),
                        (None, None) => 0.0,
                    };
                };
                assign(split.center, None, &mut *rng);
                for edge in [Edge::North, Edge::South, Edge::East, Edge::West] {
                    assign(split.midpoints[edge as usize], outer[edge as usize], &mut *rng);
                }

                for (slot, &child) in split.children.iter().enumerate() {
                    for edge in Corner::ALL[slot].edges() {
                        spans[child][edge as usize] = outer[edge as usize];
                    }
                }
            }

            nodes.push(TreeNode {
                data,
                depth: cell.depth,
                children: cell.split.map(|s| s.children),
            });
        }

        let blending = config.blending_coefficient;
        let leaf_weights = (0..=config.depth_max)
            .map(|depth| {
                (0..=config.depth_max - depth)
                    .map(|i| blending.powi(i as i32))
                    .sum::<f32>()
            })
            .collect();

        let tree = Self {
            nodes,
            blending,
            scale_limit_influence: sli,
            detection_threshold: config.detection_threshold,
            leaf_weights,
        };
        tracing::debug!(
            nodes = tree.nodes.len(),
            leaves = tree.leaf_count(),
            reused = layout.reused,
            constrained,
            "height tree built"
        );
        Ok(tree)
    }

    /// Looks for an existing vertex at `pos` among nodes no deeper than `max_depth`.
    pub fn find_vertex_height(&self, pos: Vec2, max_depth: u32) -> Option<HeightData> {
        self.find_vertex_in(self.root(), pos, max_depth)
    }

    fn find_vertex_in(&self, id: NodeId, pos: Vec2, max_depth: u32) -> Option<HeightData> {
        let node = &self.nodes[id];
        let threshold = self.detection_threshold;
        if node.depth > max_depth || !node.data.contains(pos, threshold) {
            return None;
        }
        let threshold_sq = threshold * threshold;
        if let Some(found) = node
            .data
            .corners()
            .iter()
            .find(|c| c.position.distance_squared(pos) <= threshold_sq)
        {
            return Some(*found);
        }
        node.children?
            .iter()
            .find_map(|&child| self.find_vertex_in(child, pos, max_depth))
    }

    /// Height at `pos`: every level's interpolation, weighted down the chain.
    pub fn eval_height(&self, pos: Vec2) -> f32 {
        self.eval_height_toward(pos, pos)
    }

    /// Height at `pos` through the nodes containing `toward`. On a boundary
    /// between cells this picks the side whose cells are used.
    pub fn eval_height_toward(&self, pos: Vec2, toward: Vec2) -> f32 {
        let mut id = self.root();
        let mut weight = 1.0;
        let mut total = 0.0;
        loop {
            let node = &self.nodes[id];
            let own = node.data.eval_height(pos, self.scale_limit_influence);
            match node.children {
                Some(children) => {
                    total += weight * own;
                    id = children[Corner::quadrant(node.data.center(), toward) as usize];
                    weight *= self.blending;
                }
                None => {
                    let repeat = self.leaf_weights.get(node.depth as usize).copied().unwrap_or(1.0);
                    return total + weight * own * repeat;
                }
            }
        }
    }

    /// Interpolation of a single node, ignoring its ancestors and children.
    pub fn eval_node(&self, id: NodeId, pos: Vec2) -> f32 {
        self.nodes[id].data.eval_height(pos, self.scale_limit_influence)
    }

    /// Interpolation of the deepest node containing `pos` on its own.
    pub fn eval_leaf(&self, pos: Vec2) -> f32 {
        self.eval_node(self.leaf_at(pos), pos)
    }

    /// Deepest node containing `pos`.
    pub fn leaf_at(&self, pos: Vec2) -> NodeId {
        let mut id = self.root();
        while let Some(children) = self.nodes[id].children {
            id = children[Corner::quadrant(self.nodes[id].data.center(), pos) as usize];
        }
        id
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn node(&self, id: NodeId) -> &HeightNode {
        &self.nodes[id].data
    }

    pub fn depth(&self, id: NodeId) -> u32 {
        self.nodes[id].depth
    }

    pub fn children(&self, id: NodeId) -> Option<[NodeId; 4]> {
        self.nodes[id].children
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).filter(|&id| self.nodes[id].children.is_none())
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    pub fn max_depth(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Top-left corner and side length of a node.
    pub fn node_bounds(&self, id: NodeId) -> (Vec2, f32) {
        let data = &self.nodes[id].data;
        (data.origin(), data.size())
    }
}
