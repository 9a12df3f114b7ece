use crate::cmplx;
use crate::codes::{phase_count, strip_conductor_count};
use crate::dense::Mat;
use crate::error::DecodeError;
use crate::format::{format_f64, format_lower_triangle};
use crate::options::LengthUnit;
use anyhow::{format_err, Context, Result};
use log::{debug, info};
use num_complex::Complex64;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Self and mutual readings between phases R, S, T and the neutral N.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pairs {
    pub rr: f64,
    pub rs: f64,
    pub rt: f64,
    pub rn: f64,
    pub ss: f64,
    pub st: f64,
    pub sn: f64,
    pub tt: f64,
    pub tn: f64,
    pub nn: f64,
}

const PAIR_COLUMNS: [&str; 10] = ["RR", "RS", "RT", "RN", "SS", "ST", "SN", "TT", "TN", "NN"];

impl Pairs {
    fn from_row(row: &HashMap<String, String>, prefix: &str) -> Result<Self> {
        let mut v = [0.0; 10];
        for (value, pair) in v.iter_mut().zip(PAIR_COLUMNS) {
            *value = cell(row, &format!("{}_{}", prefix, pair))?;
        }
        let [rr, rs, rt, rn, ss, st, sn, tt, tn, nn] = v;
        Ok(Self {
            rr,
            rs,
            rt,
            rn,
            ss,
            st,
            sn,
            tt,
            tn,
            nn,
        })
    }

    /// Symmetric 4x4 matrix ordered R, S, T, N.
    pub fn matrix(&self) -> [[f64; 4]; 4] {
        [
            [self.rr, self.rs, self.rt, self.rn],
            [self.rs, self.ss, self.st, self.sn],
            [self.rt, self.st, self.tt, self.tn],
            [self.rn, self.sn, self.tn, self.nn],
        ]
    }

    pub fn scale(&mut self, factor: f64) {
        for v in [
            &mut self.rr,
            &mut self.rs,
            &mut self.rt,
            &mut self.rn,
            &mut self.ss,
            &mut self.st,
            &mut self.sn,
            &mut self.tt,
            &mut self.tn,
            &mut self.nn,
        ] {
            *v *= factor;
        }
    }
}

/// Parses a numeric cell. Empty cells read as zero.
fn cell(row: &HashMap<String, String>, column: &str) -> Result<f64> {
    let raw = row
        .get(column)
        .ok_or_else(|| format_err!("missing column {}", column))?
        .trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    raw.parse::<f64>()
        .with_context(|| format!("column {}: invalid number `{}`", column, raw))
}

/// Electrical readings of one conductor type.
#[derive(Debug, Clone, PartialEq)]
pub struct LineCodeRecord {
    pub name: String,
    /// Resistance.
    pub r: Pairs,
    /// Reactance.
    pub x: Pairs,
    /// Capacitance.
    pub c: Pairs,
    /// Current rating (A).
    pub imax: f64,
}

impl LineCodeRecord {
    pub fn from_row(row: &HashMap<String, String>) -> Result<Self> {
        let name = row
            .get("Name")
            .map(|s| s.trim().to_string())
            .ok_or_else(|| format_err!("missing column Name"))?;
        let parse = || -> Result<Self> {
            Ok(Self {
                name: name.clone(),
                r: Pairs::from_row(row, "R")?,
                x: Pairs::from_row(row, "X")?,
                c: Pairs::from_row(row, "C")?,
                imax: cell(row, "Imax")?,
            })
        };
        parse().with_context(|| format!("line code {}", name))
    }

    /// Scales capacitance readings, e.g. from uF to nF.
    pub fn scale_capacitance(&mut self, factor: f64) {
        self.c.scale(factor)
    }
}

/// Reads line code records from a CSV file with a `Name` column, the
/// `R_`, `X_` and `C_` pair columns (`R_RR`, `R_RS`, ..., `C_NN`) and
/// `Imax`.
pub fn read_line_codes(path: &Path) -> Result<Vec<LineCodeRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut records = Vec::new();
    for (i, result) in rdr.deserialize().enumerate() {
        let row: HashMap<String, String> =
            result.with_context(|| format!("{} row {}", path.display(), i + 1))?;
        records.push(LineCodeRecord::from_row(&row)?);
    }
    debug!("read {} line codes from {}", records.len(), path.display());
    Ok(records)
}

/// Phase count from an explicit phase token in the library name, such
/// as `AB` in `CU_AB_2` or `ABC3` in `AER_ABC3`, where the trailing
/// digits count conductors. Tokens are split on `_`, `-`, `:` and
/// whitespace.
pub fn explicit_phases(name: &str) -> Option<usize> {
    name.split(|c: char| c == '_' || c == '-' || c == ':' || c.is_whitespace())
        .find_map(|tok| phase_count(tok).or_else(|| phase_count(strip_conductor_count(tok))))
}

fn is_triplex(name: &str) -> bool {
    name.split(|c: char| c == '_' || c == '-' || c == ':' || c.is_whitespace())
        .any(|tok| tok == "TPX")
}

/// Number of energized phases of a conductor.
///
/// An explicit phase token in the name wins. Otherwise the exact zeros
/// among RR, RS and RT decide:
///
/// ```txt
/// +-------+--------+
/// | zeros | phases |
/// +-------+--------+
/// |   0   |   3    |
/// |   1   |   2    |  (3 for TPX)
/// |   2   |   1    |
/// +-------+--------+
/// ```
pub fn infer_phases(name: &str, r: &Pairs) -> Result<usize, DecodeError> {
    if let Some(n) = explicit_phases(name) {
        return Ok(n);
    }
    let zeros = [r.rr, r.rs, r.rt].iter().filter(|&&v| v == 0.0).count();
    match zeros {
        0 => Ok(3),
        // Triplex service drops read one zero mutual but carry three
        // conductors.
        1 if is_triplex(name) => Ok(3),
        1 => Ok(2),
        2 => Ok(1),
        _ => Err(DecodeError::AmbiguousPhases {
            name: name.to_string(),
            zeros,
        }),
    }
}

/// Reduced line code matrices, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct LineCode {
    pub name: String,
    pub nphases: usize,
    /// Series impedance `r + jx`.
    pub z: Mat<Complex64>,
    /// Capacitance, reduced independently of `z`.
    pub c: Mat<f64>,
    pub normamps: f64,
}

/// Builds the 4x4 impedance and capacitance matrices of a record and
/// drops their all-zero rows and columns. Readings are used as given.
pub fn build_line_code(rec: &LineCodeRecord) -> Result<LineCode, DecodeError> {
    let nphases = infer_phases(&rec.name, &rec.r)?;

    let (r, x) = (rec.r.matrix(), rec.x.matrix());
    let mut zv = Vec::with_capacity(16);
    for i in 0..4 {
        for j in 0..4 {
            zv.push(cmplx!(r[i][j], x[i][j]));
        }
    }
    let z: Mat<Complex64> = Mat::new(4, 4).values(zv).build()?;
    let c: Mat<f64> = Mat::new(4, 4)
        .values(rec.c.matrix().concat())
        .build()?;

    Ok(LineCode {
        name: rec.name.replace(' ', ""),
        nphases,
        z: z.reduced(),
        c: c.reduced(),
        normamps: rec.imax,
    })
}

impl LineCode {
    pub fn rmatrix(&self) -> Mat<f64> {
        self.z.map(|v| v.re)
    }

    pub fn xmatrix(&self) -> Mat<f64> {
        self.z.map(|v| v.im)
    }

    /// Simulator declaration of the line code.
    ///
    /// ```txt
    /// New Linecode.<name> nphases=<n> units=<unit>
    /// ~ rmatrix=[r11 | r21 r22]
    /// ~ xmatrix=[x11 | x21 x22]
    /// ~ cmatrix=[c11 | c21 c22]
    /// ~ normamps=<Imax>
    /// ```
    pub fn to_dss(&self, units: LengthUnit) -> String {
        let mut s = format!(
            "New Linecode.{} nphases={} units={}\n",
            self.name, self.nphases, units
        );
        s.push_str(&format!("~ rmatrix={}\n", format_lower_triangle(&self.rmatrix())));
        s.push_str(&format!("~ xmatrix={}\n", format_lower_triangle(&self.xmatrix())));
        if !self.c.is_empty() {
            s.push_str(&format!("~ cmatrix={}\n", format_lower_triangle(&self.c)));
        }
        s.push_str(&format!("~ normamps={}\n", format_f64(self.normamps)));
        s
    }
}

/// Writes the declarations of `codes` to `path`, blocks separated by
/// blank lines.
pub fn write_line_codes(path: &Path, codes: &[LineCode], units: LengthUnit) -> Result<()> {
    let blocks: Vec<String> = codes.iter().map(|lc| lc.to_dss(units)).collect();
    fs::write(path, blocks.join("\n")).with_context(|| format!("writing {}", path.display()))?;
    info!("wrote {} line codes to {}", codes.len(), path.display());
    Ok(())
}
