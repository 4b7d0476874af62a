//! Writer producing annotated CNF files.
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use bitvec::prelude::*;

use crate::cnf::document::TrackClass;
use crate::cnf::options::HeaderMode;
use crate::error::{CnfError, Result};
use crate::literal::{join, Literal, Variable};
use crate::sink::{self, LineSink};

/// Writer for a CNF file over a known number of variables.
///
/// The problem line states the number of clauses, so every line is kept in
/// memory until [`CnfWriter::finish`]. The file then consists of the track
/// class, the header comments, the problem line, and finally the clauses and
/// body comments in the order they were issued.
#[allow(clippy::module_name_repetitions)]
pub struct CnfWriter<W: Write> {
    sink: LineSink<W>,
    nvar: usize,
    clause_count: usize,
    class: TrackClass,
    header: Vec<String>,
    body: Vec<String>,
    occurring: BitVec,
}

impl CnfWriter<BufWriter<File>> {
    /// Writer to the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CnfError::Resource`] if the file cannot be created.
    pub fn create(nvar: usize, path: impl AsRef<Path>) -> Result<Self> {
        Ok(CnfWriter::new(nvar, sink::create(path.as_ref())?))
    }
}

impl<W: Write> CnfWriter<W> {
    #[must_use]
    pub fn new(nvar: usize, writer: W) -> Self {
        CnfWriter {
            sink: LineSink::new(writer),
            nvar,
            clause_count: 0,
            class: TrackClass::Mc,
            header: Vec::new(),
            body: Vec::new(),
            occurring: bitvec![0; nvar],
        }
    }

    /// Declared number of variables.
    #[must_use]
    pub fn vcount(&self) -> usize {
        self.nvar
    }

    /// Number of distinct variables used by the clauses so far.
    #[must_use]
    pub fn variable_count(&self) -> usize {
        self.occurring.count_ones()
    }

    #[must_use]
    pub fn clause_count(&self) -> usize {
        self.clause_count
    }

    #[must_use]
    pub fn track_class(&self) -> TrackClass {
        self.class
    }

    fn check(&self, variable: Variable) -> Result<()> {
        if variable.within(self.nvar) {
            Ok(())
        } else {
            Err(CnfError::validation(
                None,
                format!("variable {variable} out of range 1--{}", self.nvar),
            ))
        }
    }

    fn variables_line(&self, directive: &str, vars: &[Variable]) -> Result<String> {
        for &var in vars {
            self.check(var)?;
        }
        if vars.is_empty() {
            Ok(format!("p {directive} 0"))
        } else {
            Ok(format!("p {directive} {} 0", join(vars)))
        }
    }

    /// Declare the projection set.
    ///
    /// # Errors
    ///
    /// Returns [`CnfError::Validation`] if a variable is out of range.
    pub fn add_show(&mut self, vars: impl IntoIterator<Item = Variable>) -> Result<()> {
        let vars: Vec<Variable> = vars.into_iter().collect();
        let line = self.variables_line("show", &vars)?;
        self.do_comment(&line);
        self.class = self.class.projected();
        Ok(())
    }

    /// Declare variables to be eliminated.
    ///
    /// # Errors
    ///
    /// Returns [`CnfError::Validation`] if a variable is out of range.
    pub fn add_forget(&mut self, vars: impl IntoIterator<Item = Variable>) -> Result<()> {
        let vars: Vec<Variable> = vars.into_iter().collect();
        let line = self.variables_line("forget", &vars)?;
        self.do_comment(&line);
        Ok(())
    }

    /// Declare the weight of a literal. The weight is written as given and
    /// must be a single nonempty token.
    ///
    /// # Errors
    ///
    /// Returns [`CnfError::Validation`] if the literal's variable is out of
    /// range or the weight is empty or contains whitespace.
    pub fn add_weight(&mut self, lit: Literal, weight: impl Display) -> Result<()> {
        self.check(lit.variable())?;
        let weight = weight.to_string();
        if weight.is_empty() || weight.contains(char::is_whitespace) {
            return Err(CnfError::validation(
                None,
                format!("weight '{weight}' of literal {lit} is not a single token"),
            ));
        }
        self.do_comment(&format!("p weight {lit} {weight} 0"));
        self.class = self.class.weighted();
        Ok(())
    }

    /// Declare several weights, in iteration order.
    ///
    /// # Errors
    ///
    /// Stops at the first literal out of range, see [`CnfWriter::add_weight`].
    pub fn add_weights<D: Display>(
        &mut self,
        weights: impl IntoIterator<Item = (Literal, D)>,
    ) -> Result<()> {
        for (lit, weight) in weights {
            self.add_weight(lit, weight)?;
        }
        Ok(())
    }

    /// Comment placed before the problem line.
    pub fn do_header_comment(&mut self, line: &str) {
        self.header.push(format!("c {line}"));
    }

    /// Comment placed among the clauses.
    pub fn do_comment(&mut self, line: &str) {
        self.body.push(format!("c {line}"));
    }

    /// Add a clause and return its 1-based index.
    ///
    /// # Errors
    ///
    /// Returns [`CnfError::Validation`] if a literal's variable is out of range.
    pub fn do_clause(&mut self, literals: &[Literal]) -> Result<usize> {
        for lit in literals {
            self.check(lit.variable())?;
        }
        for lit in literals {
            self.occurring.set(lit.variable().index(), true);
        }

        if literals.is_empty() {
            self.body.push("0".to_owned());
        } else {
            self.body.push(format!("{} 0", join(literals)));
        }
        self.clause_count += 1;
        Ok(self.clause_count)
    }

    /// Write everything with a `p cnf` problem line and return the writer.
    ///
    /// # Errors
    ///
    /// Returns [`CnfError::Io`] if writing or flushing fails.
    pub fn finish(self) -> Result<W> {
        self.finish_with(HeaderMode::Fixed)
    }

    /// Write everything with the given kind of problem line.
    ///
    /// # Errors
    ///
    /// Returns [`CnfError::Io`] if writing or flushing fails.
    pub fn finish_with(mut self, mode: HeaderMode) -> Result<W> {
        self.sink.show(&format!("c t {}", self.class))?;
        for line in &self.header {
            self.sink.show(line)?;
        }
        match mode {
            HeaderMode::Fixed => self
                .sink
                .show(&format!("p cnf {} {}", self.nvar, self.clause_count))?,
            HeaderMode::Incremental => self.sink.show("p inccnf")?,
        }
        for line in &self.body {
            self.sink.show(line)?;
        }
        self.sink.finish()
    }
}
