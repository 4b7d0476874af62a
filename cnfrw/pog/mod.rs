//! Proof-of-graph (POG) traces: AND/OR gates over the input variables with a
//! designated root.
pub mod node;
pub mod writer;

pub use crate::pog::node::{Gate, Node, PogDocument};
pub use crate::pog::writer::PogWriter;
