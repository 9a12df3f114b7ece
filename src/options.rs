use crate::math::TOL;
use clap::ValueEnum;
use std::fmt;

/// Length unit of line code impedances, written on each line code
/// header.
#[derive(Debug, PartialEq, Copy, Clone, Default, ValueEnum)]
pub enum LengthUnit {
    #[default]
    Km,
    M,
    Mi,
    Kft,
    Ft,
    None,
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LengthUnit::Km => "km",
            LengthUnit::M => "m",
            LengthUnit::Mi => "mi",
            LengthUnit::Kft => "kft",
            LengthUnit::Ft => "ft",
            LengthUnit::None => "none",
        };
        f.write_str(s)
    }
}

pub struct Options {
    /// Distance below which two point objects occupy the same spot.
    /// Default value is 1e-3.
    pub tolerance: f64,

    pub units: LengthUnit,

    /// Factor applied to capacitance readings before the line code
    /// matrices are built, e.g. 1000 for uF to nF. Default value is 1.
    pub capacitance_scale: f64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tolerance: TOL,
            units: LengthUnit::default(),
            capacitance_scale: 1.0,
        }
    }
}
