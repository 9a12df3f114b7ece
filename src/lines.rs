use crate::buses::BusIndex;
use crate::codes::{insul_volt, nom_volt, phase_desig, relabel_line_library};
use crate::error::DecodeError;
use crate::layer::{Geometry, Layer};
use crate::sheets::{BusRow, LineRow};
use serde::Serialize;

/// Line attributes. Columns that do not apply to a line layer are left
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct LineFeature {
    #[serde(rename = "ICEobjID")]
    pub ice_obj_id: String,
    #[serde(rename = "LibName")]
    pub lib_name: String,
    pub neutmat: Option<String>,
    pub neutsiz: Option<String>,
    pub phasemat: Option<String>,
    pub phasesiz: Option<String>,
    pub insulvolt: Option<String>,
    pub phasedesig: Option<u8>,
    pub insulmat: Option<String>,
    pub nomvolt: u16,
    pub shielding: Option<String>,
    pub neutper: Option<String>,
    pub linegeo: Option<String>,
    #[serde(rename = "TYPE")]
    pub line_type: Option<String>,
    /// Exporter length (km).
    pub length: f64,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    #[serde(rename = "geometry")]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineLayers {
    pub underground_mv: Layer<LineFeature>,
    pub overhead_mv: Layer<LineFeature>,
    pub underground_lv: Layer<LineFeature>,
    pub overhead_lv: Layer<LineFeature>,
    pub service_lv: Layer<LineFeature>,
}

impl LineLayers {
    pub fn iter(&self) -> impl Iterator<Item = &Layer<LineFeature>> {
        [
            &self.underground_mv,
            &self.overhead_mv,
            &self.underground_lv,
            &self.overhead_lv,
            &self.service_lv,
        ]
        .into_iter()
    }
}

const OVERHEAD_LV_TYPES: [(&str, &str); 6] = [
    ("1", "LVC"),
    ("2", "DPX"),
    ("3", "TPX"),
    ("4", "QPX"),
    ("5", "CC"),
    ("6", "SLC"),
];

const SERVICE_TYPES: [&str; 3] = ["DPX", "TPX", "QPX"];

/// Decodes line library types into line layers. Overhead LV conductors
/// of a service type (duplex, triplex, quadruplex) form the service layer.
pub fn line_layers(buses: &[BusRow], lines: &[LineRow]) -> Result<LineLayers, DecodeError> {
    let index = BusIndex::new(buses);
    let mut layers = LineLayers {
        underground_mv: Layer::new("underG_MVlines"),
        overhead_mv: Layer::new("overH_MVlines"),
        underground_lv: Layer::new("underG_LVlines"),
        overhead_lv: Layer::new("overH_LVlines"),
        service_lv: Layer::new("service_LVlines"),
    };

    for row in lines {
        let (x1, y1) = index.coords(&row.name, &row.node1)?;
        let (x2, y2) = index.coords(&row.name, &row.node2)?;
        let nomvolt = nom_volt(row.un).ok_or_else(|| DecodeError::UnknownVoltage {
            object: row.name.clone(),
            kv: row.un,
        })?;
        let mut line = LineFeature {
            ice_obj_id: row.name.clone(),
            lib_name: format!("LC::{}", row.library_type.replace(' ', "")),
            nomvolt,
            length: row.length,
            x1,
            y1,
            x2,
            y2,
            geometry: Some(Geometry::segment(x1, y1, x2, y2)),
            ..Default::default()
        };

        let label = relabel_line_library(&row.library_type);
        let tokens = LibraryTokens::new(row, &label);
        let kind = tokens.get(0)?;
        let underground = kind.contains("SUB");
        let low_voltage = kind.contains("BT");

        match (underground, low_voltage) {
            (true, lv) => {
                let ph = chop_last(tokens.part(0, '_', 2)?);
                line.phasedesig = Some(tokens.phase(ph)?);
                line.phasesiz = Some(tokens.get(1)?.trim_matches('_').to_string());
                line.phasemat = Some(tokens.get(2)?.to_string());
                line.insulmat = Some(tokens.part(3, '_', 0)?.to_string());
                line.neutmat = Some("CU".to_string());
                if lv {
                    line.neutsiz = Some(tokens.part(3, '_', 1)?.to_string());
                    layers.underground_lv.push(line);
                } else {
                    line.neutper = Some(tokens.part(3, '_', 1)?.to_string());
                    line.neutsiz = Some("1/0".to_string());
                    line.linegeo = Some("None".to_string());
                    line.shielding = Some("CN".to_string());
                    line.insulvolt = Some(insul_volt(row.un).to_string());
                    layers.underground_mv.push(line);
                }
            }
            (false, true) => {
                line.phasesiz = Some(tokens.part(0, '_', 1)?.to_string());
                line.phasemat = Some(tokens.part(1, '_', 0)?.to_string());
                line.neutmat = Some(tokens.part(1, '_', 1)?.to_string());
                line.neutsiz = Some(tokens.part(1, '_', 2)?.to_string());
                let code = tokens.part(1, '_', 3)?;
                let line_type = OVERHEAD_LV_TYPES
                    .iter()
                    .find(|(k, _)| *k == code)
                    .map_or(code, |(_, v)| *v);
                line.line_type = Some(line_type.to_string());
                if SERVICE_TYPES.contains(&line_type) {
                    layers.service_lv.push(line);
                } else {
                    layers.overhead_lv.push(line);
                }
            }
            (false, false) => {
                let ph = chop_last(tokens.part(0, '_', 1)?);
                line.phasedesig = Some(tokens.phase(ph)?);
                line.phasesiz = Some(tokens.get(1)?.to_string());
                line.phasemat = Some(tokens.part(2, '_', 0)?.to_string());
                line.neutmat = Some(tokens.part(2, '_', 1)?.to_string());
                line.neutsiz = Some(tokens.part(2, '_', 2)?.to_string());
                // <LVC>_<geometry code>_<guard size>_<guard material>
                line.linegeo = Some(format!(
                    "{}_{}_{}_{}",
                    tokens.part(2, '_', 6)?,
                    tokens.part(2, '_', 5)?,
                    tokens.part(2, '_', 4)?,
                    tokens.part(2, '_', 3)?
                ));
                layers.overhead_mv.push(line);
            }
        }
    }
    Ok(layers)
}

/// Drops the trailing character, the conductor count that follows the
/// phase letters in library types.
fn chop_last(s: &str) -> &str {
    match s.char_indices().last() {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

/// Whitespace separated tokens of a relabelled library type.
struct LibraryTokens<'a> {
    row: &'a LineRow,
    tokens: Vec<&'a str>,
}

impl<'a> LibraryTokens<'a> {
    fn new(row: &'a LineRow, label: &'a str) -> Self {
        Self {
            row,
            tokens: label.split_whitespace().collect(),
        }
    }

    fn malformed(&self, reason: String) -> DecodeError {
        DecodeError::MalformedLibrary {
            object: self.row.name.clone(),
            library: self.row.library_type.clone(),
            reason,
        }
    }

    fn get(&self, i: usize) -> Result<&'a str, DecodeError> {
        self.tokens
            .get(i)
            .copied()
            .ok_or_else(|| self.malformed(format!("missing token {}", i)))
    }

    fn part(&self, i: usize, sep: char, j: usize) -> Result<&'a str, DecodeError> {
        self.get(i)?
            .split(sep)
            .nth(j)
            .ok_or_else(|| self.malformed(format!("missing field {} of token {}", j, i)))
    }

    fn phase(&self, letters: &str) -> Result<u8, DecodeError> {
        phase_desig(letters).ok_or_else(|| DecodeError::UnknownPhase {
            object: self.row.name.clone(),
            code: letters.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures;
    use anyhow::Result;

    #[test]
    fn test_line_layers() -> Result<()> {
        let wb = fixtures::workbook();
        let layers = line_layers(&wb.buses, &wb.lines)?;

        assert_eq!(layers.overhead_mv.len(), 2);
        assert_eq!(layers.underground_lv.len(), 1);
        assert_eq!(layers.overhead_lv.len(), 1);
        assert_eq!(layers.service_lv.len(), 1);
        assert!(layers.underground_mv.is_empty());

        let mv = &layers.overhead_mv.features[0];
        assert_eq!(mv.phasedesig, Some(7));
        assert_eq!(mv.phasesiz.as_deref(), Some("1/0"));
        assert_eq!(mv.phasemat.as_deref(), Some("AL"));
        assert_eq!(mv.linegeo.as_deref(), Some("Y_2.1B_123.3_AAAC"));
        assert_eq!(mv.nomvolt, 380);
        assert_eq!((mv.x2, mv.y2), (50.0, 0.0));

        let ug = &layers.underground_lv.features[0];
        assert_eq!(ug.phasedesig, Some(7));
        assert_eq!(ug.phasemat.as_deref(), Some("CU"));
        assert_eq!(ug.insulmat.as_deref(), Some("INSUL"));
        assert_eq!(ug.neutsiz.as_deref(), Some("2"));
        assert_eq!(ug.lib_name, "LC::SUB_BT_ABC3_1/0COBREAISLA_2");

        assert_eq!(layers.overhead_lv.features[0].line_type.as_deref(), Some("LVC"));
        assert_eq!(layers.service_lv.features[0].line_type.as_deref(), Some("TPX"));
        Ok(())
    }

    #[test]
    fn test_malformed_library() {
        let wb = fixtures::workbook();
        let mut row = wb.lines[0].clone();
        row.library_type = "AER_ABC3".to_string();
        let err = line_layers(&wb.buses, &[row]).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedLibrary { .. }));
    }

    #[test]
    fn test_unknown_phase() {
        let wb = fixtures::workbook();
        let mut row = wb.lines[0].clone();
        row.library_type = row.library_type.replace("ABC3", "XY3");
        let err = line_layers(&wb.buses, &[row]).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownPhase { ref code, .. } if code == "XY"));
    }

    #[test]
    fn test_chop_last() {
        assert_eq!(chop_last("ABC3"), "ABC");
        assert_eq!(chop_last(""), "");
    }
}
