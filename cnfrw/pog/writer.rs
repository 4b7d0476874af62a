use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::warn;

use crate::error::{CnfError, Result};
use crate::literal::{Literal, Variable};
use crate::pog::node::{Gate, Node};
use crate::sink::{self, LineSink};

/// Writes a POG trace line by line. Node ids continue after the input
/// variables: the first gate is `nvar + 1`, and each gate takes the next id.
pub struct PogWriter<W: Write> {
    sink: LineSink<W>,
    next_id: usize,
    root: Option<Literal>,
}

impl PogWriter<BufWriter<File>> {
    /// Writer to the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CnfError::Resource`] if the file cannot be created.
    pub fn create(nvar: usize, path: impl AsRef<Path>) -> Result<Self> {
        Ok(PogWriter::new(nvar, sink::create(path.as_ref())?))
    }
}

impl<W: Write> PogWriter<W> {
    #[must_use]
    pub fn new(nvar: usize, writer: W) -> Self {
        PogWriter {
            sink: LineSink::new(writer),
            next_id: nvar + 1,
            root: None,
        }
    }

    /// Id the next gate will receive.
    #[must_use]
    pub fn next_id(&self) -> Variable {
        Variable::from(self.next_id)
    }

    fn check(&self, lit: Literal) -> Result<()> {
        let var = lit.variable().0 as usize;
        if var == 0 || var >= self.next_id {
            return Err(CnfError::validation(
                None,
                format!("argument {lit} refers to no input or earlier node"),
            ));
        }
        Ok(())
    }

    fn do_op(&mut self, gate: Gate, args: &[Literal]) -> Result<Variable> {
        for &arg in args {
            self.check(arg)?;
        }
        let node = Node {
            gate,
            id: self.next_id(),
            args: args.to_vec(),
        };
        self.sink.show(&node.to_string())?;
        self.next_id += 1;
        Ok(node.id)
    }

    /// Emit a conjunction and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`CnfError::Validation`] if an argument is neither an input
    /// literal nor an earlier node.
    pub fn do_and(&mut self, args: &[Literal]) -> Result<Variable> {
        self.do_op(Gate::And, args)
    }

    /// Emit a disjunction and return its id.
    ///
    /// # Errors
    ///
    /// As [`PogWriter::do_and`].
    pub fn do_or(&mut self, args: &[Literal]) -> Result<Variable> {
        self.do_op(Gate::Or, args)
    }

    /// Designate the root.
    ///
    /// # Errors
    ///
    /// Returns [`CnfError::Validation`] if a root was already declared or the
    /// literal refers to nothing.
    pub fn do_root(&mut self, lit: Literal) -> Result<()> {
        if let Some(root) = self.root {
            return Err(CnfError::validation(
                None,
                format!("root already declared as {root}"),
            ));
        }
        self.check(lit)?;
        self.sink.show(&format!("r {lit}"))?;
        self.root = Some(lit);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`CnfError::Io`] if writing fails.
    pub fn do_comment(&mut self, line: &str) -> Result<()> {
        self.sink.show(&format!("c {line}"))
    }

    /// Flush the trace and return the writer.
    ///
    /// # Errors
    ///
    /// Returns [`CnfError::Io`] if flushing fails.
    pub fn finish(self) -> Result<W> {
        if self.root.is_none() {
            warn!("pog trace finished without a root");
        }
        self.sink.finish()
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::PogWriter;
    use crate::error::CnfError;
    use crate::literal::{literals, Literal, Variable};
    use crate::pog::node::{Gate, PogDocument};

    #[test]
    fn ids_follow_inputs() {
        let mut writer = PogWriter::new(3, Vec::new());
        assert_eq!(writer.next_id(), Variable(4));
        let and = writer.do_and(&literals([1, -2, 3])).unwrap();
        assert_eq!(and, Variable(4));
        writer.do_comment("single argument still takes an id").unwrap();
        let or = writer.do_or(&[Literal::from(and)]).unwrap();
        assert_eq!(or, Variable(5));
        let or = writer.do_or(&[-Literal::from(or), Literal(1)]).unwrap();
        writer.do_root(Literal::from(or)).unwrap();

        let out = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert_eq!(
            out,
            "p 4 1 -2 3
c single argument still takes an id
s 5 4
s 6 -5 1
r 6
"
        );

        let pog = PogDocument::parse(3, &mut out.as_bytes()).unwrap();
        assert_eq!(pog.root(), Literal(6));
        assert_eq!(
            pog.nodes().iter().map(|node| node.gate).collect::<Vec<_>>(),
            vec![Gate::And, Gate::Or, Gate::Or]
        );
    }

    #[test]
    fn trivial_circuit() {
        let mut writer = PogWriter::new(2, Vec::new());
        writer.do_root(Literal(-2)).unwrap();
        let out = writer.finish().unwrap();
        assert_eq!(out, b"r -2\n");
    }

    #[test]
    fn second_root_rejected() {
        let mut writer = PogWriter::new(2, Vec::new());
        writer.do_root(Literal(1)).unwrap();
        assert!(matches!(
            writer.do_root(Literal(2)),
            Err(CnfError::Validation { .. })
        ));
        assert_eq!(writer.finish().unwrap(), b"r 1\n");
    }

    #[test]
    fn forward_references_rejected() {
        let mut writer = PogWriter::new(2, Vec::new());
        assert!(writer.do_and(&literals([1, 3])).is_err());
        assert!(writer.do_or(&literals([0])).is_err());
        assert!(writer.do_root(Literal(3)).is_err());
        // Nothing was allocated by the failed calls.
        assert_eq!(writer.next_id(), Variable(3));
    }
}
