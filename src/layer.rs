use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Serialize, Serializer};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Feature geometry, serialized as WKT.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(f64, f64),
    LineString(Vec<(f64, f64)>),
}

impl Geometry {
    pub fn segment(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Geometry::LineString(vec![(x1, y1), (x2, y2)])
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Geometry::Point(x, y) => write!(f, "POINT ({} {})", x, y),
            Geometry::LineString(points) => {
                let coords: Vec<String> =
                    points.iter().map(|(x, y)| format!("{} {}", x, y)).collect();
                write!(f, "LINESTRING ({})", coords.join(", "))
            }
        }
    }
}

impl Serialize for Geometry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Point-like feature that can be placed in the network graph.
pub trait PointFeature {
    fn object_id(&self) -> &str;
    fn position(&self) -> (f64, f64);
}

/// Named collection of features of one kind, written as one attribute
/// table.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer<T> {
    pub name: &'static str,
    pub features: Vec<T>,
}

impl<T> Layer<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            features: Vec::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn push(&mut self, feature: T) {
        self.features.push(feature)
    }
}

/// Writes `layer` to `<dir>/<name>.csv`, replacing any existing file.
/// Returns `None` for empty layers, which are not written.
pub fn write_layer<T: Serialize>(dir: &Path, layer: &Layer<T>) -> Result<Option<PathBuf>> {
    if layer.is_empty() {
        debug!("layer {} is empty, skipped", layer.name);
        return Ok(None);
    }
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let path = dir.join(format!("{}.csv", layer.name));
    let mut wtr =
        csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;
    for feature in &layer.features {
        wtr.serialize(feature)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    wtr.flush()?;

    info!("wrote {} features to {}", layer.len(), path.display());
    Ok(Some(path))
}
