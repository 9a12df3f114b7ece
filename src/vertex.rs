use crate::math::distance;
use std::fmt;

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum LoadLevel {
    /// Low voltage customer.
    Low,
    /// Medium voltage customer.
    Medium,
}

/// Kind of point-like network object, lightest first.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum VertexKind {
    /// Line end synthesized by the graph. Placeholder for anything
    /// heavier at the same spot.
    Node,
    /// Generic point object.
    Vertex,
    Bus,
    Load(LoadLevel),
    Transformer,
}

impl VertexKind {
    /// Override priority. Higher ranks win placement conflicts.
    pub fn rank(&self) -> u8 {
        match self {
            VertexKind::Node => 0,
            VertexKind::Vertex => 1,
            VertexKind::Bus => 2,
            VertexKind::Load(_) => 3,
            VertexKind::Transformer => 4,
        }
    }

    /// Transformers and loads.
    pub fn is_heavy(&self) -> bool {
        matches!(self, VertexKind::Load(_) | VertexKind::Transformer)
    }
}

/// Outcome of a placement conflict between a stored vertex and a
/// candidate at the same spot.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Placement {
    /// Free spot, candidate stored at a new index.
    Insert,
    /// Incumbent stays, candidate is discarded.
    Keep,
    /// Candidate takes the incumbent's slot.
    Replace,
    /// Incumbent stays, candidate goes to the odd bucket.
    SideStore,
}

/// Resolves a conflict between two vertices within tolerance.
///
/// ```txt
/// +-------------+--------------+------------+
/// |  candidate  |  incumbent   | placement  |
/// +-------------+--------------+------------+
/// |  heavy      |  light       | Replace    |
/// |  Transf.    |  heavy       | Replace    |
/// |  Load       |  heavy       | SideStore  |
/// |  light      |  Node        | Replace    |
/// |  Bus        |  Vertex      | Replace    |
/// |  light      |  other       | Keep       |
/// +-------------+--------------+------------+
/// ```
pub fn resolve(incumbent: VertexKind, candidate: VertexKind) -> Placement {
    match (candidate.is_heavy(), incumbent.is_heavy()) {
        (true, false) => Placement::Replace,
        (true, true) => match candidate {
            VertexKind::Transformer => Placement::Replace,
            _ => Placement::SideStore,
        },
        (false, true) => Placement::Keep,
        (false, false) => match (incumbent, candidate) {
            (VertexKind::Node, _) => Placement::Replace,
            (VertexKind::Vertex, VertexKind::Bus) => Placement::Replace,
            _ => Placement::Keep,
        },
    }
}

/// Point-like network object.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub kind: VertexKind,
    pub x: f64,
    pub y: f64,
    pub id: Option<String>,
}

impl Vertex {
    pub fn new(kind: VertexKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            x,
            y,
            id: None,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn node(x: f64, y: f64) -> Self {
        Self::new(VertexKind::Node, x, y)
    }

    pub fn distance_to(&self, other: &Vertex) -> f64 {
        distance(self.x, self.y, other.x, other.y)
    }

    /// Same spatial location, regardless of kind or identifier.
    pub fn coincides(&self, other: &Vertex, tolerance: f64) -> bool {
        self.distance_to(other) < tolerance
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "<{}>", id),
            None => write!(f, "<{:?} ({}, {})>", self.kind, self.x, self.y),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum EdgeKind {
    UndergroundMv,
    OverheadMv,
    UndergroundLv,
    OverheadLv,
    Service,
}

/// Line to be attached to the graph by the coordinates of its ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub id: String,
    pub kind: EdgeKind,
    pub from: (f64, f64),
    pub to: (f64, f64),
    /// Net length. Sum of segment lengths for polylines.
    pub length: f64,
}

impl Connector {
    /// Straight connector whose length is the distance between its ends.
    pub fn segment(id: &str, kind: EdgeKind, from: (f64, f64), to: (f64, f64)) -> Self {
        Self {
            id: id.to_string(),
            kind,
            from,
            to,
            length: distance(from.0, from.1, to.0, to.1),
        }
    }
}

/// Connector attached to stored vertices, by index.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: String,
    pub kind: EdgeKind,
    pub from: usize,
    pub to: usize,
    pub length: f64,
}
