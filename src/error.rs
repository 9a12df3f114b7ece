use crate::dense::MatBuilderError;
use thiserror::Error;

/// Failures while decoding exporter codes into layer attributes or line
/// code matrices.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("{object}: unrecognized phase designation `{code}`")]
    UnknownPhase { object: String, code: String },

    #[error("{object}: nominal voltage {kv} kV has no voltage code")]
    UnknownVoltage { object: String, kv: f64 },

    #[error("{object}: unknown bus `{bus}`")]
    UnknownBus { object: String, bus: String },

    #[error("{object}: malformed library type `{library}` ({reason})")]
    MalformedLibrary {
        object: String,
        library: String,
        reason: String,
    },

    #[error("line code {name}: cannot infer phase count, {zeros} of RR, RS, RT are zero")]
    AmbiguousPhases { name: String, zeros: usize },

    #[error("line code matrix: {0}")]
    Matrix(#[from] MatBuilderError),
}
