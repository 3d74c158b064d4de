//! Payload of one quadtree cell and its biome-aware interpolation.

use glam::Vec2;

use super::data::HeightData;
use crate::interpolation::compute_interpolation_coefficient;

/// Corner slots of a node, also used as child slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft = 0,
    TopRight = 1,
    BottomLeft = 2,
    BottomRight = 3,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// The quadrant of a square with center `center` that contains `pos`.
    /// Points on the dividing lines go right/bottom.
    pub fn quadrant(center: Vec2, pos: Vec2) -> Corner {
        match (pos.x >= center.x, pos.y >= center.y) {
            (false, false) => Corner::TopLeft,
            (true, false) => Corner::TopRight,
            (false, true) => Corner::BottomLeft,
            (true, true) => Corner::BottomRight,
        }
    }

    /// The two sides of the node that meet at this corner.
    pub fn edges(self) -> [Edge; 2] {
        match self {
            Corner::TopLeft => [Edge::North, Edge::West],
            Corner::TopRight => [Edge::North, Edge::East],
            Corner::BottomLeft => [Edge::South, Edge::West],
            Corner::BottomRight => [Edge::South, Edge::East],
        }
    }
}

/// Sides of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    North = 0,
    South = 1,
    West = 2,
    East = 3,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::North, Edge::South, Edge::West, Edge::East];

    /// Corners at the start (smaller coordinate) and the end of the side.
    pub fn corners(self) -> (Corner, Corner) {
        match self {
            Edge::North => (Corner::TopLeft, Corner::TopRight),
            Edge::South => (Corner::BottomLeft, Corner::BottomRight),
            Edge::West => (Corner::TopLeft, Corner::BottomLeft),
            Edge::East => (Corner::TopRight, Corner::BottomRight),
        }
    }

    /// Unit step leaving the node through this side.
    pub fn outward(self) -> Vec2 {
        match self {
            Edge::North => Vec2::NEG_Y,
            Edge::South => Vec2::Y,
            Edge::West => Vec2::NEG_X,
            Edge::East => Vec2::X,
        }
    }
}

/// A straight run of the height field between two samples, interpolated
/// the same way a node interpolates one of its sides.
///
/// A node whose side lies inside a longer, coarser side follows that
/// coarser span instead of its own corners, so both meet exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSpan {
    pub start: HeightData,
    pub end: HeightData,
}

impl EdgeSpan {
    pub fn new(start: HeightData, end: HeightData) -> Self {
        Self { start, end }
    }

    fn length(&self) -> f32 {
        self.start.position.distance(self.end.position)
    }

    /// Distance from `start`, measured along the span.
    fn along(&self, pos: Vec2) -> f32 {
        let axis = self.end.position - self.start.position;
        (pos - self.start.position).dot(axis) / axis.length()
    }

    /// Weight of `start` at the projection of `pos` onto the span.
    pub fn weight(&self, pos: Vec2, scale_limit_influence: f32) -> f32 {
        compute_interpolation_coefficient(
            self.start.biome,
            self.end.biome,
            self.along(pos),
            self.length(),
            scale_limit_influence,
        )
    }

    pub fn eval_height(&self, pos: Vec2, scale_limit_influence: f32) -> f32 {
        let w = self.weight(pos, scale_limit_influence);
        w * self.start.height + (1.0 - w) * self.end.height
    }

    /// Weight of `from` against `to` (two points on the span) that
    /// reproduces the span's own interpolation between them.
    ///
    /// When the span is flat between the two points any weight gives the
    /// same height, and the plain linear ratio is used.
    fn relative_weight(&self, from: Vec2, to: Vec2, pos: Vec2, scale_limit_influence: f32) -> f32 {
        let w_from = self.weight(from, scale_limit_influence);
        let w_to = self.weight(to, scale_limit_influence);
        let range = w_from - w_to;
        if range.abs() <= f32::EPSILON {
            let axis = to - from;
            return 1.0 - ((pos - from).dot(axis) / axis.length_squared()).clamp(0.0, 1.0);
        }
        ((self.weight(pos, scale_limit_influence) - w_to) / range).clamp(0.0, 1.0)
    }
}

/// Four corner samples of a square cell. `y` grows downward, so "top" is the
/// smaller `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightNode {
    corners: [HeightData; 4],
    size: f32,
    spans: [Option<EdgeSpan>; 4],
}

impl HeightNode {
    /// Builds a node from corners given in `Corner` order.
    pub fn new(corners: [HeightData; 4], size: f32) -> Self {
        debug_assert!(size > 0.0);
        Self {
            corners,
            size,
            spans: [None; 4],
        }
    }

    /// Makes side `edge` follow `span`. The corners on that side must lie on
    /// the span and carry its heights.
    pub fn with_span(mut self, edge: Edge, span: EdgeSpan) -> Self {
        self.spans[edge as usize] = Some(span);
        self
    }

    pub fn span(&self, edge: Edge) -> Option<&EdgeSpan> {
        self.spans[edge as usize].as_ref()
    }

    /// The side `edge` as a span between its own corners.
    pub fn edge_span(&self, edge: Edge) -> EdgeSpan {
        let (start, end) = edge.corners();
        EdgeSpan::new(*self.corner(start), *self.corner(end))
    }

    pub fn corner(&self, corner: Corner) -> &HeightData {
        &self.corners[corner as usize]
    }

    pub fn corners(&self) -> &[HeightData; 4] {
        &self.corners
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn origin(&self) -> Vec2 {
        self.corners[Corner::TopLeft as usize].position
    }

    pub fn center(&self) -> Vec2 {
        self.origin() + Vec2::splat(self.size * 0.5)
    }

    /// Whether `pos` lies inside the cell, widened by `tolerance`.
    pub fn contains(&self, pos: Vec2, tolerance: f32) -> bool {
        let min = self.origin() - Vec2::splat(tolerance);
        let max = self.origin() + Vec2::splat(self.size + tolerance);
        pos.x >= min.x && pos.y >= min.y && pos.x <= max.x && pos.y <= max.y
    }

    /// Weight of the start corner of `edge` at `pos`, `t` along the side.
    fn edge_weight(&self, edge: Edge, pos: Vec2, t: f32, scale_limit_influence: f32) -> f32 {
        let (start, end) = edge.corners();
        let (a, b) = (self.corner(start), self.corner(end));
        match &self.spans[edge as usize] {
            Some(span) => span.relative_weight(a.position, b.position, pos, scale_limit_influence),
            None => compute_interpolation_coefficient(a.biome, b.biome, t, self.size, scale_limit_influence),
        }
    }

    /// Biome-aware interpolation of the corner heights at `pos`.
    ///
    /// Each edge gets its own weight from the biomes at its ends. The
    /// vertical blend (top edge against bottom edge) uses the left/right edge
    /// weights, and the horizontal blend (left edge against right edge) uses
    /// the top/bottom edge weights; the result is their mean. On any edge of
    /// the cell this reduces to that edge's own interpolation, which keeps
    /// neighbouring cells sharing the edge's corners continuous.
    pub fn eval_height(&self, pos: Vec2, scale_limit_influence: f32) -> f32 {
        let [tl, tr, bl, br] = &self.corners;
        let size = self.size;
        let local = (pos - self.origin()).clamp(Vec2::ZERO, Vec2::splat(size));
        let (x, y) = (local.x, local.y);
        let inside = self.origin() + local;

        // Weight of the first endpoint along each edge.
        let w_top = self.edge_weight(Edge::North, inside, x, scale_limit_influence);
        let w_bottom = self.edge_weight(Edge::South, inside, x, scale_limit_influence);
        let w_left = self.edge_weight(Edge::West, inside, y, scale_limit_influence);
        let w_right = self.edge_weight(Edge::East, inside, y, scale_limit_influence);

        let top = w_top * tl.height + (1.0 - w_top) * tr.height;
        let bottom = w_bottom * bl.height + (1.0 - w_bottom) * br.height;
        let left = w_left * tl.height + (1.0 - w_left) * bl.height;
        let right = w_right * tr.height + (1.0 - w_right) * br.height;

        let fx = x / size;
        let fy = y / size;

        let w_vertical = w_left * (1.0 - fx) + w_right * fx;
        let vertical = w_vertical * top + (1.0 - w_vertical) * bottom;

        let w_horizontal = w_top * (1.0 - fy) + w_bottom * fy;
        let horizontal = w_horizontal * left + (1.0 - w_horizontal) * right;

        (vertical + horizontal) * 0.5
    }
}
