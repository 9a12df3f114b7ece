use crate::buses::{bus_layers, BusLayers};
use crate::devices::*;
use crate::error::DecodeError;
use crate::layer::{write_layer, Layer};
use crate::lines::{line_layers, LineLayers};
use crate::loads::{load_layers, LoadLayers};
use crate::sheets::Workbook;
use crate::transformers::{transformer_layer, TransformerFeature};
use anyhow::Result;
use log::info;
use std::path::{Path, PathBuf};

/// Every layer of one network export.
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    pub buses: BusLayers,
    pub lines: LineLayers,
    pub transformers: Layer<TransformerFeature>,
    pub loads: LoadLayers,
    pub fuses: Layer<FuseFeature>,
    pub pvs: Layer<PvFeature>,
    pub reclosers: Layer<RecloserFeature>,
    pub regulators: Layer<RegulatorFeature>,
    pub public_lights: Layer<PublicLightFeature>,
}

impl Circuit {
    pub fn from_workbook(wb: &Workbook) -> Result<Self, DecodeError> {
        Ok(Self {
            buses: bus_layers(&wb.buses)?,
            lines: line_layers(&wb.buses, &wb.lines)?,
            transformers: transformer_layer(&wb.asym_transformers, &wb.transformers)?,
            loads: load_layers(&wb.loads)?,
            fuses: fuse_layer(&wb.fuses)?,
            pvs: pv_layer(&wb.buses, &wb.ders)?,
            reclosers: recloser_layer(&wb.reclosers)?,
            regulators: regulator_layer(&wb.regulators)?,
            public_lights: public_light_layer(&wb.public_lights)?,
        })
    }

    /// Writes each non-empty layer into `dir` and returns the written
    /// paths.
    pub fn write(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for layer in self.buses.iter() {
            written.extend(write_layer(dir, layer)?);
        }
        for layer in self.lines.iter() {
            written.extend(write_layer(dir, layer)?);
        }
        written.extend(write_layer(dir, &self.transformers)?);
        for layer in self.loads.iter() {
            written.extend(write_layer(dir, layer)?);
        }
        written.extend(write_layer(dir, &self.fuses)?);
        written.extend(write_layer(dir, &self.pvs)?);
        written.extend(write_layer(dir, &self.reclosers)?);
        written.extend(write_layer(dir, &self.regulators)?);
        written.extend(write_layer(dir, &self.public_lights)?);

        info!("wrote {} layers to {}", written.len(), dir.display());
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures;
    use std::fs;

    #[test]
    fn test_write_circuit() -> Result<()> {
        let ckt = Circuit::from_workbook(&fixtures::workbook())?;
        let dir = tempfile::tempdir()?;
        let written = ckt.write(dir.path())?;

        // Underground MV buses and lines are empty in the fixture.
        assert_eq!(written.len(), 15);
        assert!(!dir.path().join("underG_MVbuses.csv").exists());

        let fuses = fs::read_to_string(dir.path().join("Fuses.csv"))?;
        let mut rows = fuses.lines();
        assert_eq!(
            rows.next(),
            Some("ICEobjID,PHASEDESIG,NC,ONELEMENT,X1,Y1,geometry")
        );
        let fuse = rows.next().ok_or(anyhow::format_err!("no fuse row"))?;
        assert!(fuse.starts_with("F_1,7,Yes,L1__1,"));
        assert!(fuse.ends_with(",POINT (50 0)"));
        Ok(())
    }
}
