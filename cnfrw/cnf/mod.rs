//! Annotated DIMACS CNF: canonical clauses, documents, reading, and writing.
pub mod clause;
pub mod document;
pub mod lazy;
pub mod options;
pub mod reader;
pub mod summary;
pub mod writer;

pub use crate::cnf::clause::{clean, clean_all, Canonical};
pub use crate::cnf::document::{CnfDocument, TrackClass, VarSet, WeightMap};
pub use crate::cnf::lazy::LazyCnfWriter;
pub use crate::cnf::options::{HeaderMode, ReaderOptions};
pub use crate::cnf::reader::{read_header, read_header_path, CnfReader, Header};
pub use crate::cnf::summary::Summary;
pub use crate::cnf::writer::CnfWriter;
