use crate::buses::BusLayers;
use crate::circuit::Circuit;
use crate::dense::Mat;
use crate::layer::{write_layer, Geometry, Layer, PointFeature};
use crate::lines::{LineFeature, LineLayers};
use crate::loads::LoadLayers;
use crate::math::TOL;
use crate::transformers::TransformerFeature;
use crate::vertex::*;
use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Undirected network graph. Point objects are deduplicated by spatial
/// coincidence, the heavier object winning, and lines attach to whatever
/// is stored at their ends.
///
/// Vertex indices are stable: a replacement takes over the slot of the
/// vertex it displaces, so edges keep pointing at the same location.
#[derive(Debug, Clone)]
pub struct CktGraph {
    tolerance: f64,
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    odd_bucket: BTreeMap<String, Vertex>,
}

impl Default for CktGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl CktGraph {
    pub fn new() -> Self {
        Self::with_tolerance(TOL)
    }

    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance,
            vertices: Vec::new(),
            edges: Vec::new(),
            odd_bucket: BTreeMap::new(),
        }
    }

    /// Builds the graph of a translated circuit. Transformers go in
    /// before loads so that a load sharing a transformer's spot ends up
    /// in the odd bucket rather than being overridden.
    pub fn from_circuit(ckt: &Circuit, tolerance: f64) -> Self {
        let mut g = Self::with_tolerance(tolerance);
        g.add_buses(&ckt.buses);
        g.add_transformers(&ckt.transformers);
        g.add_loads(&ckt.loads);
        g.add_lines(&ckt.lines);
        info!(
            "graph has {} vertices, {} edges and {} odd objects",
            g.vertices.len(),
            g.edges.len(),
            g.odd_bucket.len()
        );
        g
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Objects that lost a placement conflict to an object of the same
    /// weight, by identifier.
    pub fn odd_bucket(&self) -> &BTreeMap<String, Vertex> {
        &self.odd_bucket
    }

    /// Index of the first stored vertex within tolerance of `(x, y)`.
    pub fn find(&self, x: f64, y: f64) -> Option<usize> {
        let probe = Vertex::node(x, y);
        self.vertices
            .iter()
            .position(|v| v.coincides(&probe, self.tolerance))
    }

    /// Stores `candidate` unless a vertex within tolerance outranks it.
    pub fn add_vertex(&mut self, candidate: Vertex) -> Placement {
        let i = match self.find(candidate.x, candidate.y) {
            Some(i) => i,
            None => {
                self.vertices.push(candidate);
                return Placement::Insert;
            }
        };

        let incumbent = &self.vertices[i];
        let placement = resolve(incumbent.kind, candidate.kind);
        match placement {
            Placement::Keep | Placement::Insert => {}
            Placement::Replace => {
                if incumbent.kind.is_heavy() {
                    info!("{} overrode {}", candidate, incumbent);
                }
                self.vertices[i] = candidate;
            }
            Placement::SideStore => {
                warn!("{} shares the spot of {}, kept aside", candidate, incumbent);
                let key = candidate.id.clone().unwrap_or_else(|| candidate.to_string());
                self.odd_bucket.insert(key, candidate);
            }
        }
        placement
    }

    /// Index of the vertex at `(x, y)`, storing a Node there if the spot
    /// is free.
    fn attach(&mut self, x: f64, y: f64) -> usize {
        match self.find(x, y) {
            Some(i) => i,
            None => {
                self.vertices.push(Vertex::node(x, y));
                self.vertices.len() - 1
            }
        }
    }

    /// Stores a connector between the vertices at its ends. Self-loops
    /// and parallel edges are kept as they are.
    pub fn add_edge(&mut self, connector: Connector) -> &Edge {
        let from = self.attach(connector.from.0, connector.from.1);
        let to = self.attach(connector.to.0, connector.to.1);
        self.edges.push(Edge {
            id: connector.id,
            kind: connector.kind,
            from,
            to,
            length: connector.length,
        });
        &self.edges[self.edges.len() - 1]
    }

    fn add_points<T: PointFeature>(&mut self, layer: &Layer<T>, kind: VertexKind) {
        for feature in &layer.features {
            let (x, y) = feature.position();
            self.add_vertex(Vertex::new(kind, x, y).with_id(feature.object_id()));
        }
    }

    /// All buses weigh the same regardless of their layer.
    pub fn add_buses(&mut self, buses: &BusLayers) {
        for layer in buses.iter() {
            self.add_points(layer, VertexKind::Bus);
        }
    }

    pub fn add_loads(&mut self, loads: &LoadLayers) {
        self.add_points(&loads.lv, VertexKind::Load(LoadLevel::Low));
        self.add_points(&loads.mv, VertexKind::Load(LoadLevel::Medium));
    }

    pub fn add_transformers(&mut self, transformers: &Layer<TransformerFeature>) {
        self.add_points(transformers, VertexKind::Transformer);
    }

    /// Adds every line layer. Consecutive segments named
    /// `<line>__<segment>` collapse into one connector named `<line>`
    /// from the first segment's start to the last segment's end.
    pub fn add_lines(&mut self, lines: &LineLayers) {
        let layers = [
            (&lines.underground_mv, EdgeKind::UndergroundMv),
            (&lines.overhead_mv, EdgeKind::OverheadMv),
            (&lines.underground_lv, EdgeKind::UndergroundLv),
            (&lines.overhead_lv, EdgeKind::OverheadLv),
            (&lines.service_lv, EdgeKind::Service),
        ];
        for (layer, kind) in layers {
            for connector in polylines(&layer.features, kind) {
                self.add_edge(connector);
            }
        }
    }

    /// Neighbour indices of every vertex, in vertex order.
    pub fn adjacency_list(&self) -> Vec<Vec<usize>> {
        let mut adj = vec![Vec::new(); self.vertices.len()];
        for e in &self.edges {
            adj[e.from].push(e.to);
            adj[e.to].push(e.from);
        }
        adj
    }

    /// Neighbour vertices by identifier. Unnamed vertices are keyed
    /// `#<index>`.
    pub fn adjacency_dict(&self) -> BTreeMap<String, Vec<&Vertex>> {
        let mut adj: BTreeMap<String, Vec<&Vertex>> = BTreeMap::new();
        for (i, neighbours) in self.adjacency_list().into_iter().enumerate() {
            adj.entry(self.label(i))
                .or_default()
                .extend(neighbours.into_iter().map(|j| &self.vertices[j]));
        }
        adj
    }

    pub fn label(&self, i: usize) -> String {
        match &self.vertices[i].id {
            Some(id) => id.clone(),
            None => format!("#{}", i),
        }
    }

    /// Symmetric edge count matrix indexed by vertex order. Parallel
    /// edges add up and a self-loop counts twice on the diagonal, so row
    /// sums are vertex degrees.
    pub fn adjacency_matrix(&self) -> Mat<u32> {
        let n = self.vertices.len();
        let mut adj: Mat<u32> = Mat::zeros(n, n);
        for e in &self.edges {
            *adj.get_mut(e.from, e.to) += 1;
            *adj.get_mut(e.to, e.from) += 1;
        }
        adj
    }

    /// Straight-line distance between the ends an edge is attached to.
    pub fn edge_span(&self, edge: &Edge) -> f64 {
        self.vertices[edge.from].distance_to(&self.vertices[edge.to])
    }
}

/// Groups consecutive segments sharing the name prefix before `__`.
fn polylines(segments: &[LineFeature], kind: EdgeKind) -> Vec<Connector> {
    let mut connectors: Vec<Connector> = Vec::new();
    let mut prev: Option<&str> = None;
    for seg in segments {
        let name = seg
            .ice_obj_id
            .split_once("__")
            .map_or(seg.ice_obj_id.as_str(), |(prefix, _)| prefix);
        match connectors.last_mut() {
            Some(c) if prev == Some(name) => {
                c.to = (seg.x2, seg.y2);
                c.length += seg.length;
            }
            _ => connectors.push(Connector {
                id: name.to_string(),
                kind,
                from: (seg.x1, seg.y1),
                to: (seg.x2, seg.y2),
                length: seg.length,
            }),
        }
        prev = Some(name);
    }
    connectors
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "UPPERCASE")]
struct VertexRecord {
    #[serde(rename = "ICEobjID")]
    id: String,
    kind: String,
    x1: f64,
    y1: f64,
    neighbours: String,
    #[serde(rename = "geometry")]
    geometry: Geometry,
}

impl VertexRecord {
    const COLUMNS: [&'static str; 6] = ["ICEobjID", "KIND", "X1", "Y1", "NEIGHBOURS", "geometry"];

    fn new(id: String, v: &Vertex, neighbours: String) -> Self {
        Self {
            id,
            kind: format!("{:?}", v.kind),
            x1: v.x,
            y1: v.y,
            neighbours,
            geometry: Geometry::Point(v.x, v.y),
        }
    }
}

/// Writes the adjacency matrix, the adjacency list and the odd bucket of
/// `g` into `dir`. The matrix carries vertex labels on its first row and
/// column, the list holds one row per vertex with `;` separated
/// neighbour labels. An empty odd bucket is still written, header only.
pub fn write_graph(g: &CktGraph, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let labels: Vec<String> = (0..g.vertices().len()).map(|i| g.label(i)).collect();
    let mut written = Vec::new();

    let path = dir.join("adjacency_matrix.csv");
    let mut wtr =
        csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;
    let mut header = vec![String::new()];
    header.extend(labels.iter().cloned());
    wtr.write_record(&header)?;
    let adj = g.adjacency_matrix();
    for (i, label) in labels.iter().enumerate() {
        let mut record = vec![label.clone()];
        record.extend(adj.row(i).iter().map(|n| n.to_string()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    written.push(path);

    let mut list = Layer::new("adjacency_list");
    for (i, neighbours) in g.adjacency_list().into_iter().enumerate() {
        let names: Vec<&str> = neighbours.iter().map(|&j| labels[j].as_str()).collect();
        list.push(VertexRecord::new(
            labels[i].clone(),
            &g.vertices()[i],
            names.join(";"),
        ));
    }
    written.extend(write_layer(dir, &list)?);

    let mut odd = Layer::new("odd_bucket");
    for (id, v) in g.odd_bucket() {
        odd.push(VertexRecord::new(id.clone(), v, String::new()));
    }
    if odd.is_empty() {
        let path = dir.join(format!("{}.csv", odd.name));
        let mut wtr = csv::Writer::from_path(&path)
            .with_context(|| format!("creating {}", path.display()))?;
        wtr.write_record(VertexRecord::COLUMNS)?;
        wtr.flush()?;
        written.push(path);
    } else {
        written.extend(write_layer(dir, &odd)?);
    }

    info!("wrote graph tables to {}", dir.display());
    Ok(written)
}
