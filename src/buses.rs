use crate::codes::nom_volt;
use crate::error::DecodeError;
use crate::layer::{Geometry, Layer, PointFeature};
use crate::sheets::BusRow;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct BusFeature {
    #[serde(rename = "ICEobjID")]
    pub ice_obj_id: String,
    pub nomvolt: u16,
    pub x1: f64,
    pub y1: f64,
    #[serde(rename = "geometry")]
    pub geometry: Geometry,
}

impl PointFeature for BusFeature {
    fn object_id(&self) -> &str {
        &self.ice_obj_id
    }
    fn position(&self) -> (f64, f64) {
        (self.x1, self.y1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BusLayers {
    pub overhead_mv: Layer<BusFeature>,
    pub overhead_lv: Layer<BusFeature>,
    pub underground_mv: Layer<BusFeature>,
    pub underground_lv: Layer<BusFeature>,
}

impl BusLayers {
    pub fn iter(&self) -> impl Iterator<Item = &Layer<BusFeature>> {
        [
            &self.overhead_mv,
            &self.overhead_lv,
            &self.underground_mv,
            &self.underground_lv,
        ]
        .into_iter()
    }
}

/// Sorts buses into layers by name: `AREA` buses are overhead, names
/// ending in `_T` are overhead LV buses at transformer secondaries and
/// the rest are underground. `MT` marks medium voltage.
pub fn bus_layers(buses: &[BusRow]) -> Result<BusLayers, DecodeError> {
    let mut layers = BusLayers {
        overhead_mv: Layer::new("overH_MVbuses"),
        overhead_lv: Layer::new("overH_LVbuses"),
        underground_mv: Layer::new("underG_MVbuses"),
        underground_lv: Layer::new("underG_LVbuses"),
    };

    for row in buses {
        let name = row.name.as_str();
        let nomvolt = nom_volt(row.un).ok_or_else(|| DecodeError::UnknownVoltage {
            object: row.name.clone(),
            kv: row.un,
        })?;
        let feature = |id: &str| BusFeature {
            ice_obj_id: id.to_string(),
            nomvolt,
            x1: row.coord_x1,
            y1: row.coord_y1,
            geometry: Geometry::Point(row.coord_x1, row.coord_y1),
        };

        if name.contains("AREA") {
            if name.contains("MT") {
                layers.overhead_mv.push(feature(name));
            } else {
                layers.overhead_lv.push(feature(name));
            }
        } else if let Some(stem) = name.strip_suffix("_T") {
            layers.overhead_lv.push(feature(stem));
        } else if name.contains("MT") {
            layers.underground_mv.push(feature(name));
        } else {
            layers.underground_lv.push(feature(name));
        }
    }
    Ok(layers)
}

/// Bus coordinates by bus name.
pub(crate) struct BusIndex<'a>(HashMap<&'a str, (f64, f64)>);

impl<'a> BusIndex<'a> {
    pub(crate) fn new(buses: &'a [BusRow]) -> Self {
        Self(
            buses
                .iter()
                .map(|b| (b.name.as_str(), (b.coord_x1, b.coord_y1)))
                .collect(),
        )
    }

    pub(crate) fn coords(&self, object: &str, bus: &str) -> Result<(f64, f64), DecodeError> {
        self.0
            .get(bus.trim())
            .copied()
            .ok_or_else(|| DecodeError::UnknownBus {
                object: object.to_string(),
                bus: bus.to_string(),
            })
    }
}
