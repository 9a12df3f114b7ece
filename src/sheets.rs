use anyhow::{Context, Result};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BusRow {
    pub name: String,
    /// Nominal line-to-line voltage (kV).
    pub un: f64,
    pub coord_x1: f64,
    pub coord_y1: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LineRow {
    pub node1: String,
    pub node2: String,
    pub name: String,
    pub library_type: String,
    pub length: f64,
    pub un: f64,
}

/// Row of either transformer sheet. Symmetric units carry their
/// connections in the library type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransformerRow {
    pub name: String,
    pub node1: String,
    pub node2: String,
    pub switch1: String,
    pub switch2: String,
    pub is_regulated: String,
    pub un1: f64,
    pub un2: f64,
    /// Rated power (kVA).
    pub sr: f64,
    pub library_type: String,
    pub coord_x1: f64,
    pub coord_y1: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoadRow {
    pub node1: String,
    pub name: String,
    pub phase: f64,
    pub switch1: String,
    pub un: f64,
    /// Monthly energy (kWh).
    pub e: f64,
    pub cos_phi: f64,
    pub coord_x1: f64,
    pub coord_y1: f64,
    pub tipo: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FuseRow {
    pub name: String,
    pub phase: f64,
    pub is_active: String,
    pub on_element: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DerRow {
    pub name: String,
    pub node1: String,
    pub switch1: String,
    pub sr: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecloserRow {
    pub name: String,
    pub phase: f64,
    pub switch: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegulatorRow {
    pub name: String,
    pub node1: String,
    pub node2: String,
    pub un1: f64,
    pub phase: f64,
    pub library_type: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PublicLightRow {
    pub node1: String,
    pub name: String,
    pub phase: f64,
    #[serde(rename = "Potencia_kW")]
    pub potencia_kw: f64,
    pub coord_x1: f64,
    pub coord_y1: f64,
    pub un: f64,
}

/// All sheets of one network export.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub buses: Vec<BusRow>,
    pub lines: Vec<LineRow>,
    pub asym_transformers: Vec<TransformerRow>,
    pub transformers: Vec<TransformerRow>,
    pub loads: Vec<LoadRow>,
    pub fuses: Vec<FuseRow>,
    pub regulators: Vec<RegulatorRow>,
    pub ders: Vec<DerRow>,
    pub reclosers: Vec<RecloserRow>,
    pub public_lights: Vec<PublicLightRow>,
}

/// Reads a workbook exported as one CSV file per sheet. Missing sheets
/// are empty.
pub fn load_workbook(dir: &Path) -> Result<Workbook> {
    Ok(Workbook {
        buses: read_sheet(&dir.join("buses.csv"))?,
        lines: read_sheet(&dir.join("lines.csv"))?,
        asym_transformers: read_sheet(&dir.join("asym_transformers.csv"))?,
        transformers: read_sheet(&dir.join("transformers.csv"))?,
        loads: read_sheet(&dir.join("loads.csv"))?,
        fuses: read_sheet(&dir.join("fuses.csv"))?,
        regulators: read_sheet(&dir.join("regulators.csv"))?,
        ders: read_sheet(&dir.join("ders.csv"))?,
        reclosers: read_sheet(&dir.join("reclosers.csv"))?,
        public_lights: read_sheet(&dir.join("public_lights.csv"))?,
    })
}

pub fn read_sheet<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        debug!("sheet {} not found", path.display());
        return Ok(Vec::default());
    }
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut rows = Vec::new();
    for (i, result) in rdr.deserialize().enumerate() {
        let row: T = result.with_context(|| format!("{} row {}", path.display(), i + 1))?;
        rows.push(row);
    }
    debug!("read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_read_sheet_ignores_extra_columns() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("buses.csv");
        fs::write(
            &path,
            "Name,Un,CoordX1,CoordY1,Extra\nAREA_MT_1, 34.5 ,10.0,20.5,x\n",
        )?;
        let rows: Vec<BusRow> = read_sheet(&path)?;
        assert_eq!(
            rows,
            vec![BusRow {
                name: "AREA_MT_1".to_string(),
                un: 34.5,
                coord_x1: 10.0,
                coord_y1: 20.5,
            }]
        );
        Ok(())
    }

    #[test]
    fn test_missing_sheets_are_empty() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(
            dir.path().join("public_lights.csv"),
            "Node1,Name,Phase,Potencia_kW,CoordX1,CoordY1,Un\nBT_1,AP_1,1,0.15,1,2,0.24\n",
        )?;
        let wb = load_workbook(dir.path())?;
        assert!(wb.buses.is_empty());
        assert_eq!(wb.public_lights.len(), 1);
        assert_eq!(wb.public_lights[0].potencia_kw, 0.15);
        Ok(())
    }
}
