mod buses;
mod circuit;
mod dense;
mod devices;
mod error;
mod graph;
mod layer;
mod linecode;
mod lines;
mod loads;
mod math;
mod options;
mod sheets;
mod transformers;
mod vertex;

pub mod codes;
pub mod format;
pub mod libnames;

pub use buses::*;
pub use circuit::*;
pub use dense::*;
pub use devices::*;
pub use error::*;
pub use graph::*;
pub use layer::*;
pub use linecode::*;
pub use lines::*;
pub use loads::*;
pub use math::*;
pub use options::*;
pub use sheets::*;
pub use transformers::*;
pub use vertex::*;

#[cfg(test)]
mod tests;
