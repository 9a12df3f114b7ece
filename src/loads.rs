use crate::codes::{customer_class, nom_volt, phase_desig_code, service};
use crate::error::DecodeError;
use crate::layer::{Geometry, Layer, PointFeature};
use crate::sheets::LoadRow;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct LoadFeature {
    #[serde(rename = "ICEobjID")]
    pub ice_obj_id: String,
    pub kwhmonth: f64,
    pub nomvolt: u16,
    pub service: u16,
    pub phasedesig: u8,
    pub switch1: String,
    pub node1: String,
    pub pf: f64,
    pub class: Option<&'static str>,
    pub x1: f64,
    pub y1: f64,
    #[serde(rename = "geometry")]
    pub geometry: Geometry,
}

impl PointFeature for LoadFeature {
    fn object_id(&self) -> &str {
        &self.ice_obj_id
    }
    fn position(&self) -> (f64, f64) {
        (self.x1, self.y1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadLayers {
    pub lv: Layer<LoadFeature>,
    pub mv: Layer<LoadFeature>,
}

impl LoadLayers {
    pub fn iter(&self) -> impl Iterator<Item = &Layer<LoadFeature>> {
        [&self.lv, &self.mv].into_iter()
    }
}

/// Splits loads by the bus they hang from: `BT` and `_T` buses are low
/// voltage, `MT` buses medium voltage. Loads on any other bus are
/// dropped.
pub fn load_layers(loads: &[LoadRow]) -> Result<LoadLayers, DecodeError> {
    let mut layers = LoadLayers {
        lv: Layer::new("LV_load"),
        mv: Layer::new("MV_load"),
    };

    for row in loads {
        let unknown_phase = || DecodeError::UnknownPhase {
            object: row.name.clone(),
            code: row.phase.to_string(),
        };
        let code = row.phase as i64;
        let feature = LoadFeature {
            ice_obj_id: row.name.clone(),
            kwhmonth: row.e,
            nomvolt: nom_volt(row.un).ok_or_else(|| DecodeError::UnknownVoltage {
                object: row.name.clone(),
                kv: row.un,
            })?,
            service: service(code).ok_or_else(unknown_phase)?,
            phasedesig: phase_desig_code(code).ok_or_else(unknown_phase)?,
            switch1: row.switch1.clone(),
            node1: row.node1.clone(),
            pf: row.cos_phi,
            class: customer_class(&row.tipo),
            x1: row.coord_x1,
            y1: row.coord_y1,
            geometry: Geometry::Point(row.coord_x1, row.coord_y1),
        };

        if row.node1.contains("BT") || row.node1.contains("_T") {
            layers.lv.push(feature);
        } else if row.node1.contains("MT") {
            layers.mv.push(feature);
        } else {
            log::warn!("load {} on bus {} is neither LV nor MV", row.name, row.node1);
        }
    }
    Ok(layers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures;
    use anyhow::Result;

    #[test]
    fn test_load_layers() -> Result<()> {
        let wb = fixtures::workbook();
        let layers = load_layers(&wb.loads)?;
        assert_eq!(layers.lv.len(), 2);
        assert_eq!(layers.mv.len(), 1);

        let load = &layers.lv.features[0];
        assert_eq!(load.ice_obj_id, "CLI_1");
        assert_eq!(load.phasedesig, 4);
        assert_eq!(load.service, 1);
        assert_eq!(load.class, Some("R"));
        assert_eq!(load.kwhmonth, 300.0);

        let mv = &layers.mv.features[0];
        assert_eq!(mv.phasedesig, 7);
        assert_eq!(mv.service, 123);
        assert_eq!(mv.nomvolt, 380);
        Ok(())
    }

    #[test]
    fn test_unknown_phase_code() {
        let wb = fixtures::workbook();
        let mut row = wb.loads[0].clone();
        row.phase = 9.0;
        let err = load_layers(&[row]).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownPhase { .. }));
    }
}
