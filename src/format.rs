use crate::dense::Mat;
use pretty_dtoa::{dtoa, FmtFloatConfig};

const FLOAT_CONFIG: FmtFloatConfig = FmtFloatConfig::default()
    .add_point_zero(false)
    .max_significant_digits(9);

pub fn format_f64(v: f64) -> String {
    dtoa(v, FLOAT_CONFIG)
}

/// Formats the lower triangle of `m` as a matrix literal: values within a
/// row are space separated and rows are joined by `|`.
///
/// ```txt
/// [z11 | z21 z22 | z31 z32 z33]
/// ```
pub fn format_lower_triangle(m: &Mat<f64>) -> String {
    let rows: Vec<String> = m
        .lower_triangle()
        .map(|row| {
            row.iter()
                .map(|&v| format_f64(v))
                .collect::<Vec<String>>()
                .join(" ")
        })
        .collect();
    format!("[{}]", rows.join(" | "))
}
