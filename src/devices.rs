//! Protection, control, generation and lighting layers.

use crate::buses::BusIndex;
use crate::codes::{nom_volt, normally_closed, phase_desig_code, pt_ratio, service};
use crate::error::DecodeError;
use crate::layer::{Geometry, Layer};
use crate::sheets::{BusRow, DerRow, FuseRow, PublicLightRow, RecloserRow, RegulatorRow};
use serde::Serialize;

/// Regulated secondary voltage assumed for every regulator.
pub const VREG: f64 = 120.0;
pub const BANDWIDTH: f64 = 2.0;
pub const TAPS: u32 = 32;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct FuseFeature {
    #[serde(rename = "ICEobjID")]
    pub ice_obj_id: String,
    pub phasedesig: u8,
    pub nc: &'static str,
    pub onelement: String,
    pub x1: f64,
    pub y1: f64,
    #[serde(rename = "geometry")]
    pub geometry: Geometry,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct PvFeature {
    #[serde(rename = "ICEobjID")]
    pub ice_obj_id: String,
    pub node1: String,
    pub switch1: String,
    pub kva: f64,
    pub tech: String,
    pub x1: f64,
    pub y1: f64,
    #[serde(rename = "geometry")]
    pub geometry: Geometry,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct RecloserFeature {
    #[serde(rename = "ICEobjID")]
    pub ice_obj_id: String,
    pub phasedesig: u8,
    pub nc: String,
    pub x1: f64,
    pub y1: f64,
    #[serde(rename = "geometry")]
    pub geometry: Geometry,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct RegulatorFeature {
    #[serde(rename = "ICEobjID")]
    pub ice_obj_id: String,
    pub phasedesig: u8,
    pub nomvolt: u16,
    pub kva: f64,
    pub vreg: f64,
    pub pt_ratio: f64,
    pub bandwidth: f64,
    pub taps: u32,
    pub x1: f64,
    pub y1: f64,
    #[serde(rename = "geometry")]
    pub geometry: Geometry,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct PublicLightFeature {
    #[serde(rename = "ICEobjectID")]
    pub ice_object_id: String,
    pub service: u16,
    pub kw: f64,
    pub nomvolt: u16,
    pub x1: f64,
    pub y1: f64,
    #[serde(rename = "geometry")]
    pub geometry: Geometry,
}

fn phase(object: &str, code: f64) -> Result<u8, DecodeError> {
    phase_desig_code(code as i64).ok_or_else(|| DecodeError::UnknownPhase {
        object: object.to_string(),
        code: code.to_string(),
    })
}

fn voltage(object: &str, kv: f64) -> Result<u16, DecodeError> {
    nom_volt(kv).ok_or_else(|| DecodeError::UnknownVoltage {
        object: object.to_string(),
        kv,
    })
}

fn strip<'a>(name: &'a str, suffix: &str) -> &'a str {
    name.strip_suffix(suffix).unwrap_or(name)
}

pub fn fuse_layer(fuses: &[FuseRow]) -> Result<Layer<FuseFeature>, DecodeError> {
    let mut layer = Layer::new("Fuses");
    for row in fuses {
        layer.push(FuseFeature {
            ice_obj_id: strip(&row.name, "_F").to_string(),
            phasedesig: phase(&row.name, row.phase)?,
            nc: normally_closed(&row.is_active),
            onelement: row.on_element.clone(),
            x1: row.x,
            y1: row.y,
            geometry: Geometry::Point(row.x, row.y),
        });
    }
    Ok(layer)
}

/// PV generators are placed at their bus. The technology is the fourth
/// `_` separated field of the name.
pub fn pv_layer(buses: &[BusRow], ders: &[DerRow]) -> Result<Layer<PvFeature>, DecodeError> {
    let index = BusIndex::new(buses);
    let mut layer = Layer::new("PVs");
    for row in ders {
        let tech = row
            .name
            .split('_')
            .nth(3)
            .ok_or_else(|| DecodeError::MalformedLibrary {
                object: row.name.clone(),
                library: row.name.clone(),
                reason: "missing technology field".to_string(),
            })?;
        let (x1, y1) = index.coords(&row.name, &row.node1)?;
        layer.push(PvFeature {
            ice_obj_id: strip(&row.name, "_PV").to_string(),
            node1: row.node1.clone(),
            switch1: row.switch1.clone(),
            kva: row.sr,
            tech: tech.to_string(),
            x1,
            y1,
            geometry: Geometry::Point(x1, y1),
        });
    }
    Ok(layer)
}

pub fn recloser_layer(reclosers: &[RecloserRow]) -> Result<Layer<RecloserFeature>, DecodeError> {
    let mut layer = Layer::new("Reclosers");
    for row in reclosers {
        layer.push(RecloserFeature {
            ice_obj_id: strip(&row.name, "R").to_string(),
            phasedesig: phase(&row.name, row.phase)?,
            nc: row.switch.clone(),
            x1: row.x,
            y1: row.y,
            geometry: Geometry::Point(row.x, row.y),
        });
    }
    Ok(layer)
}

/// Regulators carry their rating as the second `_` separated field of
/// the library type.
pub fn regulator_layer(
    regulators: &[RegulatorRow],
) -> Result<Layer<RegulatorFeature>, DecodeError> {
    let mut layer = Layer::new("Regulators");
    for row in regulators {
        let malformed = |reason: &str| DecodeError::MalformedLibrary {
            object: row.name.clone(),
            library: row.library_type.clone(),
            reason: reason.to_string(),
        };
        let kva = row
            .library_type
            .split('_')
            .nth(1)
            .ok_or_else(|| malformed("missing rating"))?
            .trim()
            .parse::<f64>()
            .map_err(|e| malformed(&e.to_string()))?;
        layer.push(RegulatorFeature {
            ice_obj_id: strip(&row.name, "_R").to_string(),
            phasedesig: phase(&row.name, row.phase)?,
            nomvolt: voltage(&row.name, row.un1)?,
            kva,
            vreg: VREG,
            pt_ratio: pt_ratio(row.un1, VREG),
            bandwidth: BANDWIDTH,
            taps: TAPS,
            x1: row.x,
            y1: row.y,
            geometry: Geometry::Point(row.x, row.y),
        });
    }
    Ok(layer)
}

pub fn public_light_layer(
    lights: &[PublicLightRow],
) -> Result<Layer<PublicLightFeature>, DecodeError> {
    let mut layer = Layer::new("Public_Lights");
    for row in lights {
        let service = service(row.phase as i64).ok_or_else(|| DecodeError::UnknownPhase {
            object: row.name.clone(),
            code: row.phase.to_string(),
        })?;
        layer.push(PublicLightFeature {
            ice_object_id: row.name.clone(),
            service,
            kw: row.potencia_kw,
            nomvolt: voltage(&row.name, row.un)?,
            x1: row.coord_x1,
            y1: row.coord_y1,
            geometry: Geometry::Point(row.coord_x1, row.coord_y1),
        });
    }
    Ok(layer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures;
    use anyhow::Result;

    #[test]
    fn test_fuses_and_reclosers() -> Result<()> {
        let wb = fixtures::workbook();
        let fuses = fuse_layer(&wb.fuses)?;
        assert_eq!(fuses.features[0].ice_obj_id, "F_1");
        assert_eq!(fuses.features[0].nc, "Yes");
        assert_eq!(fuses.features[0].phasedesig, 7);

        let reclosers = recloser_layer(&wb.reclosers)?;
        assert_eq!(reclosers.features[0].ice_obj_id, "REC_1");
        assert_eq!(reclosers.features[0].nc, "1");
        Ok(())
    }

    #[test]
    fn test_pv_layer() -> Result<()> {
        let wb = fixtures::workbook();
        let pvs = pv_layer(&wb.buses, &wb.ders)?;
        let pv = &pvs.features[0];
        assert_eq!(pv.ice_obj_id, "GD_BT_1_FV");
        assert_eq!(pv.tech, "FV");
        assert_eq!((pv.x1, pv.y1), (100.0, 50.0));
        assert_eq!(pv.kva, 5.0);
        Ok(())
    }

    #[test]
    fn test_regulator_layer() -> Result<()> {
        let wb = fixtures::workbook();
        let regs = regulator_layer(&wb.regulators)?;
        let reg = &regs.features[0];
        assert_eq!(reg.ice_obj_id, "REG_1");
        assert_eq!(reg.kva, 333.0);
        assert_eq!(reg.pt_ratio, 166.0);
        assert_eq!(reg.nomvolt, 380);
        assert_eq!(reg.taps, 32);

        let mut row = wb.regulators[0].clone();
        row.library_type = "REG".to_string();
        assert!(matches!(
            regulator_layer(&[row]).unwrap_err(),
            DecodeError::MalformedLibrary { .. }
        ));
        Ok(())
    }

    #[test]
    fn test_public_light_layer() -> Result<()> {
        let wb = fixtures::workbook();
        let lights = public_light_layer(&wb.public_lights)?;
        assert_eq!(lights.features[0].service, 1);
        assert_eq!(lights.features[0].kw, 0.15);
        assert_eq!(lights.features[0].nomvolt, 30);
        Ok(())
    }
}
