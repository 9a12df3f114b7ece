use crate::codes::{nom_volt, phase_desig, relabel_tx_library, tx_type};
use crate::error::DecodeError;
use crate::layer::{Geometry, Layer, PointFeature};
use crate::sheets::TransformerRow;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct TransformerFeature {
    #[serde(rename = "ICEobjID")]
    pub ice_obj_id: String,
    pub node1: String,
    pub node2: String,
    pub switch1: String,
    pub switch2: String,
    pub isreg: String,
    pub phasedesig: u8,
    pub primvolt: u16,
    pub secvolt: u16,
    pub primconn: Option<String>,
    pub secconn: Option<String>,
    pub kvaphasea: f64,
    pub kvaphaseb: f64,
    pub kvaphasec: f64,
    pub ratedkva: f64,
    pub tapsetting: f64,
    #[serde(rename = "MV/MV")]
    pub mv_mv: &'static str,
    pub ttype: Option<&'static str>,
    pub x1: f64,
    pub y1: f64,
    #[serde(rename = "geometry")]
    pub geometry: Geometry,
}

impl PointFeature for TransformerFeature {
    fn object_id(&self) -> &str {
        &self.ice_obj_id
    }
    fn position(&self) -> (f64, f64) {
        (self.x1, self.y1)
    }
}

/// Splits the rated power evenly across the energized phases.
fn kva_per_phase(letters: &str, kva: f64) -> [f64; 3] {
    let n = letters.len() as f64;
    let mut split = [0.0; 3];
    for c in letters.chars() {
        let i = match c {
            'A' | 'R' => 0,
            'B' | 'S' => 1,
            _ => 2,
        };
        split[i] = kva / n;
    }
    split
}

/// Translates both transformer sheets into the distribution transformer
/// layer, asymmetric units first.
///
/// Library types read `<phases>_<kVA>_<kV1>_kV_<kV2>_kV_<type>` and
/// symmetric units append `_<primary conn>_<secondary conn>`. Asymmetric
/// units are open wye/open delta when two phases are energized and line
/// to ground/split phase otherwise.
pub fn transformer_layer(
    asym: &[TransformerRow],
    sym: &[TransformerRow],
) -> Result<Layer<TransformerFeature>, DecodeError> {
    let mut layer = Layer::new("Distribution_transformers");

    let rows = asym
        .iter()
        .map(|row| (row, true))
        .chain(sym.iter().map(|row| (row, false)));
    for (row, asymmetric) in rows {
        let label = relabel_tx_library(&row.library_type);
        let fields: Vec<&str> = label.split('_').map(str::trim).collect();
        let malformed = |reason: &str| DecodeError::MalformedLibrary {
            object: row.name.clone(),
            library: row.library_type.clone(),
            reason: reason.to_string(),
        };

        let letters = fields[0];
        let phasedesig = phase_desig(letters).ok_or_else(|| DecodeError::UnknownPhase {
            object: row.name.clone(),
            code: letters.to_string(),
        })?;
        let ttype = fields.get(6).and_then(|code| tx_type(code));

        let (primconn, secconn) = if asymmetric {
            if letters.len() == 2 {
                ("OY".to_string(), "OD".to_string())
            } else {
                ("LG".to_string(), "SP".to_string())
            }
        } else {
            let primary = fields.get(7).ok_or_else(|| malformed("missing primary connection"))?;
            let secondary = fields
                .get(8)
                .ok_or_else(|| malformed("missing secondary connection"))?;
            (primary.to_string(), secondary.to_string())
        };

        let volt = |kv: f64| {
            nom_volt(kv).ok_or_else(|| DecodeError::UnknownVoltage {
                object: row.name.clone(),
                kv,
            })
        };
        let [kvaphasea, kvaphaseb, kvaphasec] = kva_per_phase(letters, row.sr);

        layer.push(TransformerFeature {
            ice_obj_id: row.name.strip_suffix("_T").unwrap_or(&row.name).to_string(),
            node1: row.node1.clone(),
            node2: row.node2.clone(),
            switch1: row.switch1.clone(),
            switch2: row.switch2.clone(),
            isreg: row.is_regulated.clone(),
            phasedesig,
            primvolt: volt(row.un1)?,
            secvolt: volt(row.un2)?,
            primconn: Some(primconn),
            secconn: Some(secconn),
            kvaphasea,
            kvaphaseb,
            kvaphasec,
            ratedkva: row.sr,
            tapsetting: 1.0,
            mv_mv: if row.un1 > 1.0 && row.un2 <= 100.0 {
                "YES"
            } else {
                "NO"
            },
            ttype,
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
    fn test_transformer_layer() -> Result<()> {
        let wb = fixtures::workbook();
        let layer = transformer_layer(&wb.asym_transformers, &wb.transformers)?;
        assert_eq!(layer.name, "Distribution_transformers");
        assert_eq!(layer.len(), 2);

        let single = &layer.features[0];
        assert_eq!(single.ice_obj_id, "TX_1");
        assert_eq!(single.phasedesig, 4);
        assert_eq!(single.primconn.as_deref(), Some("LG"));
        assert_eq!(single.secconn.as_deref(), Some("SP"));
        assert_eq!(
            [single.kvaphasea, single.kvaphaseb, single.kvaphasec],
            [25.0, 0.0, 0.0]
        );
        assert_eq!((single.primvolt, single.secvolt), (380, 30));
        assert_eq!(single.ttype, Some("Tipo poste"));

        let three = &layer.features[1];
        assert_eq!(three.ice_obj_id, "TX_2");
        assert_eq!(three.secvolt, 40);
        assert_eq!(three.primconn.as_deref(), Some("Y"));
        assert_eq!(three.secconn.as_deref(), Some("4D"));
        assert_eq!(three.kvaphaseb, 25.0);
        assert_eq!(three.ttype, Some("Pedestal"));
        Ok(())
    }

    #[test]
    fn test_open_wye_open_delta() -> Result<()> {
        let wb = fixtures::workbook();
        let mut row = wb.asym_transformers[0].clone();
        row.library_type = "AB_50_34.5_kV_.240_kV_1".to_string();
        row.sr = 50.0;
        let layer = transformer_layer(&[row], &[])?;
        let tx = &layer.features[0];
        assert_eq!(tx.primconn.as_deref(), Some("OY"));
        assert_eq!(tx.secconn.as_deref(), Some("OD"));
        assert_eq!([tx.kvaphasea, tx.kvaphaseb], [25.0, 25.0]);
        Ok(())
    }

    #[test]
    fn test_missing_connections() {
        let wb = fixtures::workbook();
        let mut row = wb.transformers[0].clone();
        row.library_type = "ABC_75_34.5_kV_.480_kV_2".to_string();
        let err = transformer_layer(&[], &[row]).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedLibrary { .. }));
    }
}
