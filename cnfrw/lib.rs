//! # Annotated DIMACS I/O for model-counting benchmarks.
//!
//! Read, validate, canonicalize, and write CNF formulas in the DIMACS dialect
//! used by model counters, write proof-of-graph (POG) certificate traces, and
//! run batches of independent jobs on a bounded thread pool.
//!
//! The dialect extends plain DIMACS with comment directives:
//! * `c t mc|wmc|pmc|pwmc` -- class of counting problem, before the problem line,
//! * `c p show V... 0` -- projection set,
//! * `c p forget V... 0` -- variables to eliminate,
//! * `c p weight LIT WEIGHT 0` -- weight of a literal, kept as a decimal string.
//!
//! The following snippet writes a weighted formula and reads it back.
//!
//! ```rust
//! use cnfrw::cnf::{CnfReader, CnfWriter, TrackClass};
//! use cnfrw::literal::{literals, Literal};
//!
//! let mut writer = CnfWriter::new(3, Vec::new());
//! writer.add_weight(Literal(1), "0.5").unwrap();
//! writer.do_clause(&literals([1, 2])).unwrap();
//! writer.do_clause(&literals([-1, 3])).unwrap();
//! let bytes = writer.finish().unwrap();
//!
//! let doc = CnfReader::default().read(&mut bytes.as_slice()).unwrap();
//! assert_eq!(doc.nvar(), 3);
//! assert_eq!(doc.track_class(), TrackClass::Wmc);
//! assert_eq!(doc.weight(Literal(1)), Some("0.5"));
//! ```
//!
//! ---
//!
//! Main entry points:
//!
//! * [`crate::cnf::CnfReader`] -- read a whole document
//! * [`crate::cnf::read_header`] -- read only the problem line
//! * [`crate::cnf::clean`] -- canonicalize a clause, detecting tautologies
//! * [`crate::cnf::CnfWriter`] -- write a document over a known number of variables
//! * [`crate::cnf::LazyCnfWriter`] -- write a document while allocating variables
//! * [`crate::pog::PogWriter`] -- write a POG trace
//! * [`crate::parallel::Scheduler`] -- run jobs on a fixed pool of threads
//! * [`crate::parallel::Printer`] -- print whole lines from several threads

pub mod cnf;
pub mod error;
/// Variables, polarities, and literals.
pub mod literal;
pub mod parallel;
pub mod pog;
pub(crate) mod sink;
#[macro_use]
pub(crate) mod util;

pub use crate::error::{CnfError, Result};
